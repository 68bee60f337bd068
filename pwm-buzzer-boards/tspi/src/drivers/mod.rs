mod config;
mod pwm;

pub use config::BoardConfig;
pub use pwm::{SysfsPwm, SysfsPwmChip, SysfsPwmError};
