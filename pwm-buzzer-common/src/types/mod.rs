pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod waveform;

pub use command::*;
pub use config::*;
pub use device::*;
pub use error::*;
pub use waveform::*;
