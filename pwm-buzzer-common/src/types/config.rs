use crate::types::{BuzzerError, BuzzerResult};

/// 字符设备节点名
pub const DEV_NAME: &str = "pwm-buzzer";
/// 旧式 PWM 申请接口使用的标签
pub const LEGACY_LABEL: &str = "pwm buzzer";
/// ioctl 参数上限（Hz）
pub const MAX_FREQUENCY_HZ: u64 = 8000;

pub const NAME_CAPACITY: usize = 32;

pub type DeviceName = heapless::String<NAME_CAPACITY>;

/// 把名称拷贝进定长缓冲区，超长时报 AllocationFailure
pub fn device_name(name: &str) -> BuzzerResult<DeviceName> {
    let mut buf = DeviceName::new();
    buf.push_str(name)
        .map_err(|_| BuzzerError::AllocationFailure)?;
    Ok(buf)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuzzerConfig {
    pub node_name: DeviceName,
    pub legacy_label: DeviceName,
    pub max_frequency_hz: u64,
    /// 为 true 时 SetFrequency 会记录周期，挂起/恢复随之关闭/还原输出。
    /// 默认 false：周期始终为 0，挂起/恢复不触碰硬件。
    pub restore_on_resume: bool,
}

impl BuzzerConfig {
    pub fn with_node_name(mut self, name: &str) -> BuzzerResult<Self> {
        self.node_name = device_name(name)?;
        Ok(self)
    }

    pub fn with_restore_on_resume(mut self, enabled: bool) -> Self {
        self.restore_on_resume = enabled;
        self
    }
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        let mut node_name = DeviceName::new();
        node_name.push_str(DEV_NAME).ok();
        let mut legacy_label = DeviceName::new();
        legacy_label.push_str(LEGACY_LABEL).ok();

        Self {
            node_name,
            legacy_label,
            max_frequency_hz: MAX_FREQUENCY_HZ,
            restore_on_resume: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_driver_constants() {
        let config = BuzzerConfig::default();
        assert_eq!(config.node_name.as_str(), "pwm-buzzer");
        assert_eq!(config.legacy_label.as_str(), "pwm buzzer");
        assert_eq!(config.max_frequency_hz, 8000);
        assert!(!config.restore_on_resume);
    }

    #[test]
    fn overlong_node_name_is_an_allocation_failure() {
        let name = "a-buzzer-node-name-that-does-not-fit";
        assert_eq!(
            BuzzerConfig::default().with_node_name(name),
            Err(BuzzerError::AllocationFailure)
        );
        let config = BuzzerConfig::default().with_node_name("beeper").unwrap();
        assert_eq!(config.node_name.as_str(), "beeper");
    }
}
