use core::fmt;

use thiserror::Error;

pub type BuzzerResult<T> = core::result::Result<T, BuzzerError>;

/// 内核错误号（正数），对外返回时取负
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(i32);

impl Errno {
    pub const EIO: Errno = Errno(5);
    pub const ENOMEM: Errno = Errno(12);
    pub const EBUSY: Errno = Errno(16);
    pub const ENODEV: Errno = Errno(19);
    pub const EINVAL: Errno = Errno(22);
    pub const EPROBE_DEFER: Errno = Errno(517);

    pub const fn new(errno: i32) -> Self {
        Self(errno)
    }

    /// ioctl 返回给用户态的状态码
    pub const fn to_status(self) -> i64 {
        -(self.0 as i64)
    }

    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            5 => Some("EIO"),
            12 => Some("ENOMEM"),
            16 => Some("EBUSY"),
            19 => Some("ENODEV"),
            22 => Some("EINVAL"),
            517 => Some("EPROBE_DEFER"),
            _ => None,
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "-{} ({})", self.0, name),
            None => write!(f, "-{}", self.0),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerError {
    #[error("No buzzer bound or PWM handle missing")]
    ResourceUnavailable,

    #[error("Argument {0} out of range")]
    InvalidArgument(u64),

    #[error("Allocation failed")]
    AllocationFailure,

    #[error("Failed to request pwm device: {0}")]
    AcquisitionFailure(Errno),

    #[error("Misc device registration failed: {0}")]
    RegistrationFailure(Errno),

    #[error("PWM operation failed: {0}")]
    Pwm(Errno),

    #[error("Device does not match the driver")]
    NotMatched,
}

impl BuzzerError {
    pub const fn errno(&self) -> Errno {
        match self {
            BuzzerError::ResourceUnavailable | BuzzerError::InvalidArgument(_) => Errno::EINVAL,
            BuzzerError::AllocationFailure => Errno::ENOMEM,
            BuzzerError::AcquisitionFailure(e)
            | BuzzerError::RegistrationFailure(e)
            | BuzzerError::Pwm(e) => *e,
            BuzzerError::NotMatched => Errno::ENODEV,
        }
    }

    pub const fn to_status(&self) -> i64 {
        self.errno().to_status()
    }
}
