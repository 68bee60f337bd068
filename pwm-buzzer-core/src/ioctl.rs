//! 控制命令分发
//!
//! 检查顺序固定：设备已绑定、PWM 句柄存在、参数不超过上限。
//! 任何一项不满足都直接返回，不会触碰 PWM。

use crate::buzzer_common::{
    BuzzerCommand, BuzzerConfig, BuzzerError, BuzzerResult, PwmDevice, Waveform, debug,
};
use crate::device::BuzzerDevice;

/// 处理一次 ioctl；`device` 为 None 表示当前没有绑定的蜂鸣器
pub fn handle<P: PwmDevice>(
    device: Option<&mut BuzzerDevice<P>>,
    config: &BuzzerConfig,
    cmd: u32,
    arg: u64,
) -> BuzzerResult<()> {
    let Some(device) = device else {
        debug!("no buzzer bound");
        return Err(BuzzerError::ResourceUnavailable);
    };
    let Some(pwm) = device.pwm.as_mut() else {
        debug!("buzzer has no pwm handle");
        return Err(BuzzerError::ResourceUnavailable);
    };
    if arg > config.max_frequency_hz {
        debug!("argument {} out of range", arg);
        return Err(BuzzerError::InvalidArgument(arg));
    }
    debug!("cmd: {}, arg: {}", cmd, arg);

    let track = config.restore_on_resume;
    match (BuzzerCommand::from_code(cmd), Waveform::from_frequency(arg)) {
        (Some(BuzzerCommand::Enable), _) => {
            pwm.enable().map_err(BuzzerError::Pwm)?;
            if track {
                device.period = device.tone;
            }
            debug!("enable buzzer");
        }
        (Some(BuzzerCommand::SetFrequency), Some(waveform)) => {
            pwm.apply(waveform).map_err(BuzzerError::Pwm)?;
            if track {
                device.tone = waveform.period_ns;
                // 正在响时新波形立即生效
                if device.period != 0 {
                    device.period = waveform.period_ns;
                }
            }
            debug!("set buzzer pwm frequency");
        }
        // SetFrequency(0) 落到 Disable
        (Some(BuzzerCommand::SetFrequency), None) | (Some(BuzzerCommand::Disable), _) => {
            pwm.disable();
            if track {
                device.period = 0;
            }
            debug!("disable buzzer");
        }
        (None, _) => debug!("unknown command({})", cmd),
    }

    Ok(())
}
