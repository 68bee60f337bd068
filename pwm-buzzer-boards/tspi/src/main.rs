use std::io::{self, BufRead};

use pwm_buzzer_common::*;
use pwm_buzzer_core::{BuzzerModule, main_task};
use simulated_pwm::SimulatedMiscBus;
use static_cell::StaticCell;

pub mod drivers;

use crate::drivers::{BoardConfig, SysfsPwm, SysfsPwmChip};

static MODULE: StaticCell<BuzzerModule<SysfsPwm>> = StaticCell::new();

/// 第一个命令行参数为配置文件路径；缺省或读取失败时使用默认配置
fn load_board_config() -> BoardConfig {
    let Some(path) = std::env::args().nth(1) else {
        return BoardConfig::default();
    };
    match BoardConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load {}: {}, using defaults", path, e);
            BoardConfig::default()
        }
    }
}

struct Platform;

impl BoardTrait for Platform {
    type PwmProvider = SysfsPwmChip;

    // 用户态没有真正的 misc 总线，节点只在进程内可见
    type MiscRegistry = SimulatedMiscBus;

    fn init_logger() {
        env_logger::init();
    }

    fn init() -> BuzzerResult<BoardContext<Self>> {
        let board = load_board_config();
        info!("TSPI platform: {:?}", board);

        let device = PlatformDevice::new("buzzer@0")?
            .with_compatible("pwm-buzzer")?
            .with_pwms(board.pwm_channel)
            .with_platform_data(board.pwm_channel);

        Ok(BoardContext {
            pwm: SysfsPwmChip::new(board.pwm_chip),
            misc: SimulatedMiscBus::new(),
            device,
            config: board.buzzer_config()?,
        })
    }
}

fn main() {
    Platform::init_logger();
    match Platform::init() {
        Ok(ctx) => {
            let stdin = io::stdin();
            let lines = stdin.lock().lines().map_while(Result::ok);
            if let Err(e) = main_task::<Platform, _>(&MODULE, ctx, lines) {
                error!("Main task error: {}", e);
            }
        }
        Err(e) => {
            error!("Platform init error: {}", e);
        }
    }
}
