use crate::traits::{MiscRegistry, PwmProvider};
use crate::types::{BuzzerConfig, BuzzerResult, PlatformDevice};

/// 板级环境：提供 PWM 控制器、misc 注册表以及要绑定的平台设备
pub trait BoardTrait: Sized {
    type PwmProvider: PwmProvider;

    type MiscRegistry: MiscRegistry;

    /// Initialize the logger (optional)
    fn init_logger() {}

    fn init() -> BuzzerResult<BoardContext<Self>>;
}

pub struct BoardContext<B: BoardTrait> {
    pub pwm: B::PwmProvider,
    pub misc: B::MiscRegistry,
    pub device: PlatformDevice,
    pub config: BuzzerConfig,
}
