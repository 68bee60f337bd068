//! 内存中的 PWM 控制器与 misc 设备总线，供模拟器和测试使用

mod chip;
mod misc;

pub use chip::{ChannelState, PwmEvent, SimulatedPwm, SimulatedPwmChip};
pub use misc::SimulatedMiscBus;
