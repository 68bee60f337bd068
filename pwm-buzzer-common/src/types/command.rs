//! 字符设备控制命令

pub const BUZZER_ENABLE: u32 = 182;
pub const BUZZER_FREQUENCY: u32 = 183;
pub const BUZZER_DISABLE: u32 = 184;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerCommand {
    /// 按上一次（或默认）的波形开始输出
    Enable,
    /// 参数为目标频率（Hz），0 等同于 Disable
    SetFrequency,
    /// 停止输出
    Disable,
}

impl BuzzerCommand {
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            BUZZER_ENABLE => Some(BuzzerCommand::Enable),
            BUZZER_FREQUENCY => Some(BuzzerCommand::SetFrequency),
            BUZZER_DISABLE => Some(BuzzerCommand::Disable),
            _ => None,
        }
    }
}
