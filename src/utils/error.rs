use thiserror::Error;

/// 輸入行格式範例，出錯時提示使用者
pub const EXAMPLE_LINE: &str = "RENE=MO10:00-12:00,TU10:00-12:00";

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Wrong time{}", describe_line(.line_number, .line))]
    WrongTime {
        line_number: Option<usize>,
        line: String,
    },

    #[error("Input data corrupted{}", describe_line(.line_number, .line))]
    CorruptedData {
        line_number: Option<usize>,
        line: String,
    },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

fn describe_line(line_number: &Option<usize>, line: &str) -> String {
    let mut out = String::new();
    if line_number.is_some() || !line.is_empty() {
        out.push_str(" on line");
    }
    if let Some(n) = line_number {
        out.push_str(&format!(" {}", n));
    }
    if !line.is_empty() {
        out.push_str(&format!(": \"{}\"", line));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn wrong_time(line: impl Into<String>) -> Self {
        EtlError::WrongTime {
            line_number: None,
            line: line.into(),
        }
    }

    pub fn corrupted(line: impl Into<String>) -> Self {
        EtlError::CorruptedData {
            line_number: None,
            line: line.into(),
        }
    }

    /// 為輸入錯誤附上行號與原始內容；其他錯誤原樣返回
    pub fn at_line(self, line_number: usize, line: &str) -> Self {
        match self {
            EtlError::WrongTime { .. } => EtlError::WrongTime {
                line_number: Some(line_number),
                line: line.to_string(),
            },
            EtlError::CorruptedData { .. } => EtlError::CorruptedData {
                line_number: Some(line_number),
                line: line.to_string(),
            },
            other => other,
        }
    }

    /// Replace the offending text of an input error, keeping its line number.
    pub fn with_line_text(self, text: &str) -> Self {
        match self {
            EtlError::WrongTime { line_number, .. } => EtlError::WrongTime {
                line_number,
                line: text.to_string(),
            },
            EtlError::CorruptedData { line_number, .. } => EtlError::CorruptedData {
                line_number,
                line: text.to_string(),
            },
            other => other,
        }
    }

    /// Shift the line number of an input error, used when a document is a
    /// slice of a larger stream.
    pub fn offset_line(self, offset: usize) -> Self {
        match self {
            EtlError::WrongTime { line_number, line } => EtlError::WrongTime {
                line_number: line_number.map(|n| n + offset),
                line,
            },
            EtlError::CorruptedData { line_number, line } => EtlError::CorruptedData {
                line_number: line_number.map(|n| n + offset),
                line,
            },
            other => other,
        }
    }

    pub fn line_number(&self) -> Option<usize> {
        match self {
            EtlError::WrongTime { line_number, .. } | EtlError::CorruptedData { line_number, .. } => {
                *line_number
            }
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::WrongTime { .. } | EtlError::CorruptedData { .. } => ErrorCategory::Input,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::ZipError(_) | EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Output
            }
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Output | ErrorCategory::Processing => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::WrongTime { .. } => format!("[ERROR] {}", self),
            EtlError::CorruptedData { .. } => format!("[ERROR] {}", self),
            EtlError::IoError(e) => format!("Could not access a file: {}", e),
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::WrongTime { .. } => format!(
                "Times must satisfy 00:00 <= start <= finish <= 24:00. Example: \"{}\"",
                "RENE=MO10:00-12:00,TU13:00-18:00"
            ),
            EtlError::CorruptedData { .. } => {
                format!("Each line must look like NAME=DDhh:mm-hh:mm,... Example: \"{}\"", EXAMPLE_LINE)
            }
            EtlError::IoError(_) => "Check that the input file exists and the output directory is writable".to_string(),
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the configuration file or command line arguments".to_string()
            }
            _ => "Re-run with --verbose and inspect the log output".to_string(),
        }
    }
}
