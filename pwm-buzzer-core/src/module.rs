use crate::binding::BindingSlot;
use crate::buzzer_common::{
    BuzzerConfig, BuzzerError, BuzzerResult, FileOperations, PwmDevice, debug,
};
use crate::device::BuzzerDevice;
use crate::ioctl;

/// 模块级状态：配置与全局唯一的设备绑定槽。
///
/// 注册到 misc 设备上的文件操作就是它本身，因此需要 `'static`。
pub struct BuzzerModule<P> {
    slot: BindingSlot<BuzzerDevice<P>>,
    config: BuzzerConfig,
}

impl<P: PwmDevice> BuzzerModule<P> {
    pub fn new(config: BuzzerConfig) -> Self {
        Self {
            slot: BindingSlot::new(),
            config,
        }
    }

    pub fn config(&self) -> &BuzzerConfig {
        &self.config
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_bound()
    }

    /// 当前绑定设备记录的周期；未绑定时为 None
    pub fn period(&self) -> Option<u64> {
        self.slot.with(|dev| dev.map(|dev| dev.period()))
    }

    pub fn ioctl(&self, cmd: u32, arg: u64) -> BuzzerResult<()> {
        self.slot
            .with(|dev| ioctl::handle(dev, &self.config, cmd, arg))
    }

    pub fn suspend(&self) -> BuzzerResult<()> {
        self.slot.with(|dev| {
            if let Some(dev) = dev {
                dev.suspend();
            }
        });
        Ok(())
    }

    pub fn resume(&self) -> BuzzerResult<()> {
        self.slot.with(|dev| match dev {
            Some(dev) => dev.resume().map_err(BuzzerError::Pwm),
            None => Ok(()),
        })
    }

    pub(crate) fn bind(&self, device: BuzzerDevice<P>) -> Result<(), BuzzerDevice<P>> {
        self.slot.bind(device)
    }

    pub(crate) fn unbind(&self) -> Option<BuzzerDevice<P>> {
        self.slot.unbind()
    }
}

impl<P: PwmDevice + Send> FileOperations for BuzzerModule<P> {
    fn open(&self) -> Result<(), crate::buzzer_common::Errno> {
        debug!("{} opened", self.config.node_name);
        Ok(())
    }

    fn release(&self) -> Result<(), crate::buzzer_common::Errno> {
        debug!("{} released", self.config.node_name);
        Ok(())
    }

    fn unlocked_ioctl(&self, cmd: u32, arg: u64) -> i64 {
        match self.ioctl(cmd, arg) {
            Ok(()) => 0,
            Err(e) => e.to_status(),
        }
    }
}
