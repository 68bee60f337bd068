use crate::types::{Errno, MiscDevice, Minor};

/// 字符设备的文件操作
pub trait FileOperations: Sync {
    fn open(&self) -> Result<(), Errno> {
        Ok(())
    }

    fn release(&self) -> Result<(), Errno> {
        Ok(())
    }

    /// 成功返回 0，失败返回负的错误号
    fn unlocked_ioctl(&self, cmd: u32, arg: u64) -> i64;
}

/// misc 字符设备注册表
pub trait MiscRegistry {
    fn register(&mut self, device: MiscDevice) -> Result<Minor, Errno>;

    fn deregister(&mut self, minor: Minor);

    /// 按节点名找到已注册设备的文件操作
    fn find(&self, name: &str) -> Option<&'static dyn FileOperations>;
}
