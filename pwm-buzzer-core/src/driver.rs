//! 平台驱动：probe / remove 与总线匹配

use crate::buzzer_common::{
    BuzzerError, BuzzerResult, Errno, Minor, MiscDevice, MiscRegistry, ModuleInfo, OfDeviceId,
    PlatformDevice, PwmDevice, PwmProvider, debug, error, info,
};
use crate::device::BuzzerDevice;
use crate::module::BuzzerModule;

pub const DRIVER_NAME: &str = "pwm-buzzer";

pub static OF_MATCH_TABLE: [OfDeviceId; 1] = [OfDeviceId::compatible("pwm-buzzer")];

pub const MODULE_INFO: ModuleInfo = ModuleInfo {
    name: DRIVER_NAME,
    author: "Lee Lin <wensilin@gmail.com>",
    description: "PWM buzzer driver",
    license: "GPL",
    alias: "platform:pwm-buzzer",
};

/// 设备树匹配优先，其次按驱动名匹配
pub fn of_match_device<'a>(
    table: &'a [OfDeviceId],
    pdev: &PlatformDevice,
) -> Option<&'a OfDeviceId> {
    let compatible = pdev.compatible()?;
    table.iter().find(|id| id.compatible == compatible)
}

pub fn driver_match(pdev: &PlatformDevice) -> bool {
    of_match_device(&OF_MATCH_TABLE, pdev).is_some() || pdev.name() == DRIVER_NAME
}

pub struct PwmBuzzerDriver<H, R>
where
    H: PwmProvider,
    H::Pwm: 'static,
{
    module: &'static BuzzerModule<H::Pwm>,
    provider: H,
    registry: R,
    minor: Option<Minor>,
}

impl<H, R> PwmBuzzerDriver<H, R>
where
    H: PwmProvider,
    H::Pwm: Send + 'static,
    R: MiscRegistry,
{
    pub fn new(module: &'static BuzzerModule<H::Pwm>, provider: H, registry: R) -> Self {
        Self {
            module,
            provider,
            registry,
            minor: None,
        }
    }

    pub fn module(&self) -> &'static BuzzerModule<H::Pwm> {
        self.module
    }

    pub fn provider(&self) -> &H {
        &self.provider
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn minor(&self) -> Option<Minor> {
        self.minor
    }

    pub fn matches(&self, pdev: &PlatformDevice) -> bool {
        driver_match(pdev)
    }

    /// 获取 PWM、绑定设备、注册字符设备；任何一步失败都完整回滚
    pub fn probe(&mut self, pdev: &PlatformDevice) -> BuzzerResult<()> {
        let pwm_id = pdev.pwm_id();
        debug!("pwm_buzzer_probe: pwm_id: {}", pwm_id);

        let pwm = self.acquire(pdev, pwm_id)?;
        if let Err(mut rejected) = self.module.bind(BuzzerDevice::new(pwm)) {
            error!("{}: a buzzer is already bound", pdev.name());
            self.release_pwm(&mut rejected);
            return Err(BuzzerError::RegistrationFailure(Errno::EBUSY));
        }

        let misc = MiscDevice::new(self.module.config().node_name.clone(), self.module);
        match self.registry.register(misc) {
            Ok(minor) => {
                self.minor = Some(minor);
                info!(
                    "pwm_buzzer_probe pass, /dev/{} minor {}",
                    self.module.config().node_name,
                    minor
                );
                Ok(())
            }
            Err(errno) => {
                error!("{}: failed to register misc device: {}", pdev.name(), errno);
                if let Some(mut device) = self.module.unbind() {
                    self.release_pwm(&mut device);
                }
                Err(BuzzerError::RegistrationFailure(errno))
            }
        }
    }

    /// 先关输出再释放 PWM，然后注销字符设备
    pub fn remove(&mut self) -> BuzzerResult<()> {
        let Some(mut device) = self.module.unbind() else {
            return Err(BuzzerError::ResourceUnavailable);
        };
        if let Some(mut pwm) = device.take_pwm() {
            pwm.disable();
            self.provider.free(pwm);
        }
        if let Some(minor) = self.minor.take() {
            self.registry.deregister(minor);
        }
        info!("pwm_buzzer_remove done");
        Ok(())
    }

    pub fn suspend(&self) -> BuzzerResult<()> {
        self.module.suspend()
    }

    pub fn resume(&self) -> BuzzerResult<()> {
        self.module.resume()
    }

    fn acquire(&mut self, pdev: &PlatformDevice, pwm_id: u32) -> BuzzerResult<H::Pwm> {
        match self.provider.get(pdev, None) {
            Ok(pwm) => Ok(pwm),
            Err(errno) => {
                debug!("{}: unable to request PWM ({}), trying legacy API", pdev.name(), errno);
                let label = self.module.config().legacy_label.clone();
                self.provider.request(pwm_id, &label).map_err(|errno| {
                    error!("{}: Failed to request pwm device: {}", pdev.name(), errno);
                    BuzzerError::AcquisitionFailure(errno)
                })
            }
        }
    }

    fn release_pwm(&mut self, device: &mut BuzzerDevice<H::Pwm>) {
        if let Some(pwm) = device.take_pwm() {
            self.provider.free(pwm);
        }
    }
}
