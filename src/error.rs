use std::fmt;
use std::process::ExitCode;

use baseplan_codec::{DecodeError, EncodeError};
use baseplan_layout::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// CLI usage error (missing args, invalid flags).
    Usage = 1,
    /// Input error (missing file, invalid document, corrupt share string).
    Input = 2,
    /// Processing error (encoding failed, limit exceeded under `--strict`).
    Processing = 3,
}

impl From<ErrorCode> for ExitCode {
    fn from(code: ErrorCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Input,
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Processing,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        Self::input(format!("invalid share string: {err}"))
    }
}

impl From<EncodeError> for CliError {
    fn from(err: EncodeError) -> Self {
        Self::processing(err.to_string())
    }
}

impl From<LayoutError> for CliError {
    fn from(err: LayoutError) -> Self {
        Self::input(err.to_string())
    }
}
