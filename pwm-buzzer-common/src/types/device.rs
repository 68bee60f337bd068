//! 平台设备、设备树匹配项与 misc 字符设备描述

use core::fmt;

use crate::traits::FileOperations;
use crate::types::{BuzzerResult, DeviceName, device_name};

/// 总线上的平台设备
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDevice {
    name: DeviceName,
    compatible: Option<DeviceName>,
    /// 设备树 `pwms` 属性引用的通道
    pwms: Option<u32>,
    /// 旧式平台数据：PWM 通道号
    platform_data: Option<u32>,
}

impl PlatformDevice {
    pub fn new(name: &str) -> BuzzerResult<Self> {
        Ok(Self {
            name: device_name(name)?,
            compatible: None,
            pwms: None,
            platform_data: None,
        })
    }

    pub fn with_compatible(mut self, compatible: &str) -> BuzzerResult<Self> {
        self.compatible = Some(device_name(compatible)?);
        Ok(self)
    }

    pub fn with_pwms(mut self, channel: u32) -> Self {
        self.pwms = Some(channel);
        self
    }

    pub fn with_platform_data(mut self, pwm_id: u32) -> Self {
        self.platform_data = Some(pwm_id);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn compatible(&self) -> Option<&str> {
        self.compatible.as_deref()
    }

    pub fn pwms(&self) -> Option<u32> {
        self.pwms
    }

    pub fn platform_data(&self) -> Option<u32> {
        self.platform_data
    }

    /// 没有平台数据时按 0 号通道处理
    pub fn pwm_id(&self) -> u32 {
        self.platform_data.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfDeviceId {
    pub compatible: &'static str,
}

impl OfDeviceId {
    pub const fn compatible(compatible: &'static str) -> Self {
        Self { compatible }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Minor(pub u32);

impl Minor {
    /// 由注册方分配次设备号
    pub const DYNAMIC: Minor = Minor(255);
}

impl fmt::Display for Minor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 待注册的 misc 字符设备
pub struct MiscDevice {
    pub minor: Minor,
    pub name: DeviceName,
    pub fops: &'static dyn FileOperations,
}

impl MiscDevice {
    pub fn new(name: DeviceName, fops: &'static dyn FileOperations) -> Self {
        Self {
            minor: Minor::DYNAMIC,
            name,
            fops,
        }
    }
}

impl fmt::Debug for MiscDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiscDevice")
            .field("minor", &self.minor)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// 模块元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: &'static str,
    pub author: &'static str,
    pub description: &'static str,
    pub license: &'static str,
    pub alias: &'static str,
}
