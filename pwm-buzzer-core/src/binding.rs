//! 全局唯一的设备绑定槽
//!
//! 字符设备只有一个节点，ioctl 通过这里找到当前绑定的设备。
//! probe 时绑定，remove 时解绑；所有访问都在临界区内完成。

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

pub struct BindingSlot<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Option<T>>>,
}

impl<T> BindingSlot<T> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// 槽已被占用时原样退回
    pub fn bind(&self, value: T) -> Result<(), T> {
        self.inner.lock(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.is_some() {
                return Err(value);
            }
            *slot = Some(value);
            Ok(())
        })
    }

    pub fn unbind(&self) -> Option<T> {
        self.inner.lock(|cell| cell.borrow_mut().take())
    }

    pub fn is_bound(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().is_some())
    }

    /// 在临界区内访问绑定的值；未绑定时传入 None
    pub fn with<R>(&self, f: impl FnOnce(Option<&mut T>) -> R) -> R {
        self.inner.lock(|cell| f(cell.borrow_mut().as_mut()))
    }
}

impl<T> Default for BindingSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
