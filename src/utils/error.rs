use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
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

    #[error("Unknown {kind} preset: {name}")]
    UnknownPresetError { kind: PresetKind, name: String },

    #[error("Host detection failed: {message}")]
    HostDetectionError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Model,
    Device,
}

impl std::fmt::Display for PresetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetKind::Model => write!(f, "model"),
            PresetKind::Device => write!(f, "device"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Io,
    Serialization,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CalcError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            CalcError::InvalidConfigValueError { .. } | CalcError::UnknownPresetError { .. } => {
                ErrorCategory::Input
            }
            CalcError::IoError(_) | CalcError::ZipError(_) => ErrorCategory::Io,
            CalcError::CsvError(_) | CalcError::SerializationError(_) => {
                ErrorCategory::Serialization
            }
            CalcError::HostDetectionError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Serialization => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CalcError::UnknownPresetError { kind, .. } => format!(
                "Run `memcalc {}s` to list the available presets, or pass custom values instead",
                kind
            ),
            CalcError::InvalidConfigValueError { field, .. } => {
                format!("Pass a finite, non-negative number for '{}'", field)
            }
            CalcError::ConfigValidationError { .. } => {
                "Check that the configuration file exists and is valid TOML".to_string()
            }
            CalcError::IoError(_) | CalcError::ZipError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            CalcError::CsvError(_) | CalcError::SerializationError(_) => {
                "Re-run with --verbose and report the failing inputs".to_string()
            }
            CalcError::HostDetectionError { .. } => {
                "Pass --device-memory explicitly instead of --host-device".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::UnknownPresetError { kind, name } => {
                format!("No {} named '{}' is known", kind, name)
            }
            CalcError::InvalidConfigValueError { field, value, .. } => {
                format!("'{}' is not a usable value for {}", value, field)
            }
            other => other.to_string(),
        }
    }

    pub fn invalid_value(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        CalcError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
