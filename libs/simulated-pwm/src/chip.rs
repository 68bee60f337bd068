use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pwm_buzzer_common::{Errno, PlatformDevice, PwmDevice, PwmProvider};

/// 控制器上发生的每一次操作，按时间顺序记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PwmEvent {
    Requested { channel: u32, label: String },
    Configured { channel: u32, duty_ns: u64, period_ns: u64 },
    Enabled { channel: u32 },
    Disabled { channel: u32 },
    Freed { channel: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelState {
    pub label: Option<String>,
    pub duty_ns: u64,
    pub period_ns: u64,
    pub enabled: bool,
}

impl ChannelState {
    pub fn is_requested(&self) -> bool {
        self.label.is_some()
    }
}

#[derive(Default)]
struct ChipState {
    channels: Vec<ChannelState>,
    events: Vec<PwmEvent>,
    lookup_error: Option<Errno>,
    request_error: Option<Errno>,
    config_error: Option<Errno>,
    enable_error: Option<Errno>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 模拟的 PWM 控制器，克隆后共享同一份状态
#[derive(Clone)]
pub struct SimulatedPwmChip {
    state: Arc<Mutex<ChipState>>,
}

impl SimulatedPwmChip {
    pub fn new(npwm: u32) -> Self {
        let state = ChipState {
            channels: (0..npwm).map(|_| ChannelState::default()).collect(),
            ..ChipState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// 之后的 `get` 全部以该错误失败
    pub fn fail_lookup(&self, errno: Errno) {
        lock(&self.state).lookup_error = Some(errno);
    }

    /// 之后的 `request` 全部以该错误失败
    pub fn fail_request(&self, errno: Errno) {
        lock(&self.state).request_error = Some(errno);
    }

    pub fn fail_config(&self, errno: Errno) {
        lock(&self.state).config_error = Some(errno);
    }

    pub fn fail_enable(&self, errno: Errno) {
        lock(&self.state).enable_error = Some(errno);
    }

    pub fn events(&self) -> Vec<PwmEvent> {
        lock(&self.state).events.clone()
    }

    pub fn clear_events(&self) {
        lock(&self.state).events.clear();
    }

    pub fn channel(&self, channel: u32) -> Option<ChannelState> {
        lock(&self.state).channels.get(channel as usize).cloned()
    }

    pub fn requested_count(&self) -> usize {
        lock(&self.state)
            .channels
            .iter()
            .filter(|ch| ch.is_requested())
            .count()
    }

    fn claim(&self, channel: u32, label: &str) -> Result<SimulatedPwm, Errno> {
        let mut state = lock(&self.state);
        let slot = state
            .channels
            .get_mut(channel as usize)
            .ok_or(Errno::EINVAL)?;
        if slot.is_requested() {
            return Err(Errno::EBUSY);
        }
        slot.label = Some(label.to_string());
        state.events.push(PwmEvent::Requested {
            channel,
            label: label.to_string(),
        });
        log::info!("[Simulator PWM] pwm{} requested by {}", channel, label);

        Ok(SimulatedPwm {
            state: self.state.clone(),
            channel,
        })
    }
}

impl PwmProvider for SimulatedPwmChip {
    type Pwm = SimulatedPwm;

    fn get(&mut self, dev: &PlatformDevice, con_id: Option<&str>) -> Result<Self::Pwm, Errno> {
        if let Some(errno) = lock(&self.state).lookup_error {
            return Err(errno);
        }
        let channel = dev.pwms().ok_or(Errno::ENODEV)?;
        self.claim(channel, con_id.unwrap_or(dev.name()))
    }

    fn request(&mut self, pwm_id: u32, label: &str) -> Result<Self::Pwm, Errno> {
        if let Some(errno) = lock(&self.state).request_error {
            return Err(errno);
        }
        self.claim(pwm_id, label)
    }

    fn free(&mut self, pwm: Self::Pwm) {
        let mut state = lock(&self.state);
        if let Some(slot) = state.channels.get_mut(pwm.channel as usize) {
            slot.label = None;
        }
        state.events.push(PwmEvent::Freed {
            channel: pwm.channel,
        });
        log::info!("[Simulator PWM] pwm{} freed", pwm.channel);
    }
}

/// 从 [`SimulatedPwmChip`] 申请到的通道
pub struct SimulatedPwm {
    state: Arc<Mutex<ChipState>>,
    channel: u32,
}

impl SimulatedPwm {
    pub fn channel(&self) -> u32 {
        self.channel
    }
}

impl PwmDevice for SimulatedPwm {
    fn config(&mut self, duty_ns: u64, period_ns: u64) -> Result<(), Errno> {
        let mut state = lock(&self.state);
        if let Some(errno) = state.config_error {
            return Err(errno);
        }
        if period_ns == 0 || duty_ns > period_ns {
            return Err(Errno::EINVAL);
        }
        if let Some(slot) = state.channels.get_mut(self.channel as usize) {
            slot.duty_ns = duty_ns;
            slot.period_ns = period_ns;
        }
        state.events.push(PwmEvent::Configured {
            channel: self.channel,
            duty_ns,
            period_ns,
        });
        log::info!(
            "[Simulator PWM] pwm{} configured: duty {}ns, period {}ns",
            self.channel,
            duty_ns,
            period_ns
        );
        Ok(())
    }

    fn enable(&mut self) -> Result<(), Errno> {
        let mut state = lock(&self.state);
        if let Some(errno) = state.enable_error {
            return Err(errno);
        }
        if let Some(slot) = state.channels.get_mut(self.channel as usize) {
            slot.enabled = true;
        }
        state.events.push(PwmEvent::Enabled {
            channel: self.channel,
        });
        log::info!("[Simulator PWM] pwm{} enabled", self.channel);
        Ok(())
    }

    fn disable(&mut self) {
        let mut state = lock(&self.state);
        if let Some(slot) = state.channels.get_mut(self.channel as usize) {
            slot.enabled = false;
        }
        state.events.push(PwmEvent::Disabled {
            channel: self.channel,
        });
        log::info!("[Simulator PWM] pwm{} disabled", self.channel);
    }
}
