//! PWM 波形（周期与高电平时间，单位纳秒）

pub const NSEC_PER_SEC: u64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waveform {
    pub period_ns: u64,
    pub duty_ns: u64,
}

impl Waveform {
    /// 50% 占空比的方波；频率为 0 时没有对应波形
    pub const fn from_frequency(frequency_hz: u64) -> Option<Self> {
        if frequency_hz == 0 {
            return None;
        }
        Some(Self::from_period(NSEC_PER_SEC / frequency_hz))
    }

    pub const fn from_period(period_ns: u64) -> Self {
        Self {
            period_ns,
            duty_ns: period_ns / 2,
        }
    }
}
