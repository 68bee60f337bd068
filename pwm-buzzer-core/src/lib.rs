#![cfg_attr(not(test), no_std)]

use pwm_buzzer_common as buzzer_common;

pub mod binding;
pub mod console;
pub mod device;
pub mod driver;
pub mod ioctl;
pub mod module;

mod main_task;

pub use binding::BindingSlot;
pub use device::BuzzerDevice;
pub use driver::{DRIVER_NAME, MODULE_INFO, OF_MATCH_TABLE, PwmBuzzerDriver};
pub use main_task::main_task;
pub use module::BuzzerModule;
