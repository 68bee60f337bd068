//! 板级控制台的文本请求
//!
//! 每行一个请求，例如 `183 1000`、`freq 440`、`disable`、`suspend`。
//! 空行与 `#` 开头的行被忽略。

use thiserror::Error;

use crate::buzzer_common::{BUZZER_DISABLE, BUZZER_ENABLE, BUZZER_FREQUENCY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Open,
    Release,
    Ioctl { cmd: u32, arg: u64 },
    Suspend,
    Resume,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError<'a> {
    #[error("Unknown request: {0}")]
    UnknownRequest(&'a str),

    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),

    #[error("Invalid number: {0}")]
    InvalidNumber(&'a str),

    #[error("Unexpected input: {0}")]
    TrailingInput(&'a str),
}

pub fn parse(line: &str) -> Result<Option<Request>, ParseError<'_>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if let Some(extra) = words.next() {
        return Err(ParseError::TrailingInput(extra));
    }

    let request = match head {
        "open" => no_argument(Request::Open, arg)?,
        "release" | "close" => no_argument(Request::Release, arg)?,
        "suspend" => no_argument(Request::Suspend, arg)?,
        "resume" => no_argument(Request::Resume, arg)?,
        "quit" | "exit" => no_argument(Request::Quit, arg)?,
        "enable" => ioctl(BUZZER_ENABLE, optional(arg)?),
        "disable" => ioctl(BUZZER_DISABLE, optional(arg)?),
        "freq" | "frequency" => {
            let arg = arg.ok_or(ParseError::MissingArgument("frequency"))?;
            ioctl(BUZZER_FREQUENCY, number(arg)?)
        }
        _ => {
            let cmd = head
                .parse::<u32>()
                .map_err(|_| ParseError::UnknownRequest(head))?;
            ioctl(cmd, optional(arg)?)
        }
    };
    Ok(Some(request))
}

fn ioctl(cmd: u32, arg: u64) -> Request {
    Request::Ioctl { cmd, arg }
}

fn no_argument(request: Request, arg: Option<&str>) -> Result<Request, ParseError<'_>> {
    match arg {
        Some(extra) => Err(ParseError::TrailingInput(extra)),
        None => Ok(request),
    }
}

fn optional(arg: Option<&str>) -> Result<u64, ParseError<'_>> {
    arg.map_or(Ok(0), number)
}

fn number(word: &str) -> Result<u64, ParseError<'_>> {
    word.parse::<u64>()
        .map_err(|_| ParseError::InvalidNumber(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_requests_are_raw_ioctls() {
        assert_eq!(
            parse("183 1000"),
            Ok(Some(Request::Ioctl { cmd: 183, arg: 1000 }))
        );
        assert_eq!(parse("  7  "), Ok(Some(Request::Ioctl { cmd: 7, arg: 0 })));
    }

    #[test]
    fn named_requests() {
        assert_eq!(
            parse("freq 440"),
            Ok(Some(Request::Ioctl { cmd: 183, arg: 440 }))
        );
        assert_eq!(
            parse("enable"),
            Ok(Some(Request::Ioctl { cmd: 182, arg: 0 }))
        );
        assert_eq!(
            parse("disable 9000"),
            Ok(Some(Request::Ioctl { cmd: 184, arg: 9000 }))
        );
        assert_eq!(parse("suspend"), Ok(Some(Request::Suspend)));
        assert_eq!(parse("exit"), Ok(Some(Request::Quit)));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   # beep"), Ok(None));
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(parse("beep"), Err(ParseError::UnknownRequest("beep")));
        assert_eq!(parse("freq"), Err(ParseError::MissingArgument("frequency")));
        assert_eq!(parse("183 -1"), Err(ParseError::InvalidNumber("-1")));
        assert_eq!(parse("open now"), Err(ParseError::TrailingInput("now")));
        assert_eq!(parse("183 1 2"), Err(ParseError::TrailingInput("2")));
    }
}
