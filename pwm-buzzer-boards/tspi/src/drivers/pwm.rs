//! Linux sysfs PWM (`/sys/class/pwm/pwmchipN`)

use std::collections::HashSet;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use pwm_buzzer_common::*;
use thiserror::Error;

const SYSFS_PWM_ROOT: &str = "/sys/class/pwm";

/// 导出后等待 pwmN 目录出现的轮询次数
const EXPORT_POLL_TRIES: u32 = 10;
const EXPORT_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum SysfsPwmError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("pwm{0} 导出失败")]
    ExportFailed(u32),
    #[error("pwm{channel} 超出范围 (npwm = {npwm})")]
    OutOfRange { channel: u32, npwm: u32 },
    #[error("pwm{0} 已被占用")]
    Busy(u32),
    #[error("无法解析 {}", .0.display())]
    Parse(PathBuf),
}

impl SysfsPwmError {
    pub fn errno(&self) -> Errno {
        match self {
            SysfsPwmError::Io(e) => e.raw_os_error().map(Errno::new).unwrap_or(Errno::EIO),
            SysfsPwmError::ExportFailed(_) => Errno::ENODEV,
            SysfsPwmError::OutOfRange { .. } => Errno::EINVAL,
            SysfsPwmError::Busy(_) => Errno::EBUSY,
            SysfsPwmError::Parse(_) => Errno::EIO,
        }
    }
}

impl From<SysfsPwmError> for Errno {
    fn from(e: SysfsPwmError) -> Self {
        e.errno()
    }
}

fn write_attr(path: &Path, value: impl Display) -> Result<(), SysfsPwmError> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    writeln!(file, "{}", value)?;
    Ok(())
}

fn read_attr(path: &Path) -> Result<u64, SysfsPwmError> {
    let text = fs::read_to_string(path)?;
    text.trim()
        .parse()
        .map_err(|_| SysfsPwmError::Parse(path.to_path_buf()))
}

/// 一个 PWM 控制器
pub struct SysfsPwmChip {
    root: PathBuf,
    claimed: HashSet<u32>,
}

impl SysfsPwmChip {
    pub fn new(chip: u32) -> Self {
        Self::with_root(Path::new(SYSFS_PWM_ROOT).join(format!("pwmchip{}", chip)))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            claimed: HashSet::new(),
        }
    }

    pub fn npwm(&self) -> Result<u32, SysfsPwmError> {
        let path = self.root.join("npwm");
        let npwm = read_attr(&path)?;
        u32::try_from(npwm).map_err(|_| SysfsPwmError::Parse(path))
    }

    fn channel_dir(&self, channel: u32) -> PathBuf {
        self.root.join(format!("pwm{}", channel))
    }

    fn export(&mut self, channel: u32, label: &str) -> Result<SysfsPwm, SysfsPwmError> {
        let npwm = self.npwm()?;
        if channel >= npwm {
            return Err(SysfsPwmError::OutOfRange { channel, npwm });
        }
        if self.claimed.contains(&channel) {
            return Err(SysfsPwmError::Busy(channel));
        }

        let dir = self.channel_dir(channel);
        let exported = !dir.is_dir();
        if exported {
            write_attr(&self.root.join("export"), channel)?;
            // 等待 sysfs 节点创建
            let mut tries = 0;
            while !dir.is_dir() {
                if tries == EXPORT_POLL_TRIES {
                    return Err(SysfsPwmError::ExportFailed(channel));
                }
                thread::sleep(EXPORT_POLL_INTERVAL);
                tries += 1;
            }
        }

        let period_ns = read_attr(&dir.join("period")).unwrap_or(0);
        self.claimed.insert(channel);
        info!("[TSPI PWM] pwm{} exported for {}", channel, label);

        Ok(SysfsPwm {
            dir,
            channel,
            period_ns,
            exported,
        })
    }
}

impl PwmProvider for SysfsPwmChip {
    type Pwm = SysfsPwm;

    fn get(&mut self, dev: &PlatformDevice, con_id: Option<&str>) -> Result<Self::Pwm, Errno> {
        let channel = dev.pwms().ok_or(Errno::ENODEV)?;
        Ok(self.export(channel, con_id.unwrap_or(dev.name()))?)
    }

    fn request(&mut self, pwm_id: u32, label: &str) -> Result<Self::Pwm, Errno> {
        Ok(self.export(pwm_id, label)?)
    }

    /// 只撤销本进程做过的导出；已由别处导出的通道保持原状
    fn free(&mut self, pwm: Self::Pwm) {
        let channel = pwm.channel();
        self.claimed.remove(&channel);
        if !pwm.exported {
            return;
        }
        if let Err(e) = write_attr(&self.root.join("unexport"), channel) {
            warn!("[TSPI PWM] pwm{} unexport failed: {}", channel, e);
        }
    }
}

/// 已导出的通道
pub struct SysfsPwm {
    dir: PathBuf,
    channel: u32,
    /// 最近一次写入的周期，决定下次写入顺序
    period_ns: u64,
    /// 由本进程写 export 导出
    exported: bool,
}

/// 内核要求任何时刻 duty_cycle 不大于 period：缩短周期时先写 duty
fn ordered_writes(current_period: u64, duty_ns: u64, period_ns: u64) -> [(&'static str, u64); 2] {
    if period_ns < current_period {
        [("duty_cycle", duty_ns), ("period", period_ns)]
    } else {
        [("period", period_ns), ("duty_cycle", duty_ns)]
    }
}

impl SysfsPwm {
    pub fn channel(&self) -> u32 {
        self.channel
    }

    fn write_config(&mut self, duty_ns: u64, period_ns: u64) -> Result<(), SysfsPwmError> {
        for (attr, value) in ordered_writes(self.period_ns, duty_ns, period_ns) {
            write_attr(&self.dir.join(attr), value)?;
        }
        self.period_ns = period_ns;
        Ok(())
    }
}

impl PwmDevice for SysfsPwm {
    fn config(&mut self, duty_ns: u64, period_ns: u64) -> Result<(), Errno> {
        if period_ns == 0 || duty_ns > period_ns {
            return Err(Errno::EINVAL);
        }
        debug!(
            "[TSPI PWM] pwm{} duty {}ns, period {}ns",
            self.channel, duty_ns, period_ns
        );
        Ok(self.write_config(duty_ns, period_ns)?)
    }

    fn enable(&mut self) -> Result<(), Errno> {
        Ok(write_attr(&self.dir.join("enable"), 1)?)
    }

    fn disable(&mut self) {
        if let Err(e) = write_attr(&self.dir.join("enable"), 0) {
            warn!("[TSPI PWM] pwm{} disable failed: {}", self.channel, e);
        }
    }
}
