use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pwm_buzzer_common::{Errno, FileOperations, Minor, MiscDevice, MiscRegistry};

/// 动态次设备号从这里向下分配
const DYNAMIC_MINOR_START: u32 = 63;

struct Node {
    minor: Minor,
    name: String,
    fops: &'static dyn FileOperations,
}

struct BusState {
    nodes: Vec<Node>,
    register_error: Option<Errno>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 模拟的 misc 字符设备总线，克隆后共享同一份状态
#[derive(Clone)]
pub struct SimulatedMiscBus {
    state: Arc<Mutex<BusState>>,
}

impl SimulatedMiscBus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState {
                nodes: Vec::new(),
                register_error: None,
            })),
        }
    }

    /// 之后的注册全部以该错误失败
    pub fn fail_register(&self, errno: Errno) {
        lock(&self.state).register_error = Some(errno);
    }

    pub fn node_names(&self) -> Vec<String> {
        lock(&self.state)
            .nodes
            .iter()
            .map(|node| node.name.clone())
            .collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.minor_of(name).is_some()
    }

    pub fn minor_of(&self, name: &str) -> Option<Minor> {
        lock(&self.state)
            .nodes
            .iter()
            .find(|node| node.name == name)
            .map(|node| node.minor)
    }
}

impl Default for SimulatedMiscBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MiscRegistry for SimulatedMiscBus {
    fn register(&mut self, device: MiscDevice) -> Result<Minor, Errno> {
        let mut state = lock(&self.state);
        if let Some(errno) = state.register_error {
            return Err(errno);
        }
        let in_use = |minor: Minor| state.nodes.iter().any(|node| node.minor == minor);
        if state.nodes.iter().any(|node| node.name == device.name.as_str()) {
            return Err(Errno::EBUSY);
        }

        let minor = if device.minor == Minor::DYNAMIC {
            (0..=DYNAMIC_MINOR_START)
                .rev()
                .map(Minor)
                .find(|minor| !in_use(*minor))
                .ok_or(Errno::EBUSY)?
        } else if in_use(device.minor) {
            return Err(Errno::EBUSY);
        } else {
            device.minor
        };

        log::info!("[Simulator misc] /dev/{} registered, minor {}", device.name, minor);
        state.nodes.push(Node {
            minor,
            name: device.name.as_str().to_string(),
            fops: device.fops,
        });
        Ok(minor)
    }

    fn deregister(&mut self, minor: Minor) {
        let mut state = lock(&self.state);
        if let Some(pos) = state.nodes.iter().position(|node| node.minor == minor) {
            let node = state.nodes.remove(pos);
            log::info!("[Simulator misc] /dev/{} deregistered", node.name);
        }
    }

    fn find(&self, name: &str) -> Option<&'static dyn FileOperations> {
        lock(&self.state)
            .nodes
            .iter()
            .find(|node| node.name == name)
            .map(|node| node.fops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwm_buzzer_common::device_name;

    struct Silent;

    impl FileOperations for Silent {
        fn unlocked_ioctl(&self, _cmd: u32, _arg: u64) -> i64 {
            0
        }
    }

    static SILENT: Silent = Silent;

    #[test]
    fn dynamic_minors_count_down() {
        let mut bus = SimulatedMiscBus::new();
        let a = bus
            .register(MiscDevice::new(device_name("a").unwrap(), &SILENT))
            .unwrap();
        let b = bus
            .register(MiscDevice::new(device_name("b").unwrap(), &SILENT))
            .unwrap();
        assert_eq!(a, Minor(63));
        assert_eq!(b, Minor(62));

        bus.deregister(a);
        assert_eq!(bus.node_names(), ["b"]);
        assert!(bus.find("a").is_none());
        assert!(bus.find("b").is_some());
    }

    #[test]
    fn duplicate_name_is_busy() {
        let mut bus = SimulatedMiscBus::new();
        bus.register(MiscDevice::new(device_name("a").unwrap(), &SILENT))
            .unwrap();
        let err = bus
            .register(MiscDevice::new(device_name("a").unwrap(), &SILENT))
            .unwrap_err();
        assert_eq!(err, Errno::EBUSY);
    }
}
