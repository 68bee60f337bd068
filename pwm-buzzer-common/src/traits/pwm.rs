use crate::types::{Errno, PlatformDevice, Waveform};

/// 独占的 PWM 通道
pub trait PwmDevice {
    /// 参数顺序与内核 `pwm_config` 一致：先高电平时间，后周期
    fn config(&mut self, duty_ns: u64, period_ns: u64) -> Result<(), Errno>;

    fn enable(&mut self) -> Result<(), Errno>;

    fn disable(&mut self);

    fn apply(&mut self, waveform: Waveform) -> Result<(), Errno> {
        self.config(waveform.duty_ns, waveform.period_ns)
    }
}

/// PWM 通道的获取与释放
pub trait PwmProvider {
    type Pwm: PwmDevice;

    /// 按设备描述（设备树 / 查找表）获取通道
    fn get(&mut self, dev: &PlatformDevice, con_id: Option<&str>) -> Result<Self::Pwm, Errno>;

    /// 旧式接口：按全局通道号申请
    fn request(&mut self, pwm_id: u32, label: &str) -> Result<Self::Pwm, Errno>;

    fn free(&mut self, pwm: Self::Pwm);
}
