use crate::buzzer_common::PwmDevice;

/// 绑定在平台设备上的蜂鸣器
pub struct BuzzerDevice<P> {
    pub(crate) pwm: Option<P>,
    /// 正在输出的周期（ns），只给挂起/恢复用；0 表示没有在响
    pub(crate) period: u64,
    /// 最近一次设置的周期，Enable 时成为 `period`
    pub(crate) tone: u64,
}

impl<P: PwmDevice> BuzzerDevice<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm: Some(pwm),
            period: 0,
            tone: 0,
        }
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    /// 交出 PWM 句柄，之后的 ioctl 将因缺少句柄而失败
    pub fn take_pwm(&mut self) -> Option<P> {
        self.pwm.take()
    }

    /// 挂起：记录过周期时关闭输出
    pub fn suspend(&mut self) {
        if self.period == 0 {
            return;
        }
        if let Some(pwm) = self.pwm.as_mut() {
            pwm.disable();
        }
    }

    /// 恢复：按记录的周期、50% 占空比重新输出
    pub fn resume(&mut self) -> Result<(), crate::buzzer_common::Errno> {
        if self.period == 0 {
            return Ok(());
        }
        if let Some(pwm) = self.pwm.as_mut() {
            pwm.config(self.period / 2, self.period)?;
            pwm.enable()?;
        }
        Ok(())
    }
}
