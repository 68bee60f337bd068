use std::io::{self, BufRead};

use pwm_buzzer_common::*;
use pwm_buzzer_core::{BuzzerModule, main_task};
use simulated_pwm::{SimulatedMiscBus, SimulatedPwm, SimulatedPwmChip};
use static_cell::StaticCell;

/// 模拟控制器上的通道数
const SIMULATED_NPWM: u32 = 4;

static MODULE: StaticCell<BuzzerModule<SimulatedPwm>> = StaticCell::new();

pub struct Platform;

impl BoardTrait for Platform {
    type PwmProvider = SimulatedPwmChip;

    type MiscRegistry = SimulatedMiscBus;

    fn init_logger() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    }

    fn init() -> BuzzerResult<BoardContext<Self>> {
        let device = PlatformDevice::new("buzzer@0")?
            .with_compatible("pwm-buzzer")?
            .with_pwms(0);

        info!("Simulator platform: {} channels", SIMULATED_NPWM);

        Ok(BoardContext {
            pwm: SimulatedPwmChip::new(SIMULATED_NPWM),
            misc: SimulatedMiscBus::new(),
            device,
            config: BuzzerConfig::default().with_restore_on_resume(true),
        })
    }
}

fn main() {
    Platform::init_logger();
    let ctx = match Platform::init() {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Platform init error: {}", e);
            return;
        }
    };

    let stdin = io::stdin();
    let lines = stdin.lock().lines().map_while(Result::ok);
    if let Err(e) = main_task::<Platform, _>(&MODULE, ctx, lines) {
        error!("Main task error: {}", e);
    }
}
