pub mod misc;
pub mod platform;
pub mod pwm;

pub use misc::*;
pub use platform::*;
pub use pwm::*;
