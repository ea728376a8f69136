use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Map link is empty")]
    EmptyLink,

    #[error("Could not resolve coordinates from link '{link}': {reason}")]
    LinkUnresolved { link: String, reason: String },

    #[error("Spatial query unavailable: {reason}")]
    QueryUnavailable { reason: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoutError::EmptyLink | ScoutError::LinkUnresolved { .. } => ErrorCategory::Input,
            ScoutError::HttpError(_) | ScoutError::QueryUnavailable { .. } => {
                ErrorCategory::Network
            }
            ScoutError::ConfigValidationError { .. }
            | ScoutError::InvalidConfigValueError { .. }
            | ScoutError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScoutError::CsvError(_) | ScoutError::IoError(_) | ScoutError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 查詢失敗只會降級為空結果
            ScoutError::QueryUnavailable { .. } => ErrorSeverity::Low,
            ScoutError::HttpError(_) | ScoutError::LinkUnresolved { .. } => ErrorSeverity::Medium,
            ScoutError::EmptyLink
            | ScoutError::ConfigValidationError { .. }
            | ScoutError::InvalidConfigValueError { .. }
            | ScoutError::MissingConfigError { .. } => ErrorSeverity::High,
            ScoutError::CsvError(_) | ScoutError::IoError(_) | ScoutError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScoutError::EmptyLink => "No map link was provided".to_string(),
            ScoutError::LinkUnresolved { .. } => {
                "Could not find a location in the map link".to_string()
            }
            ScoutError::QueryUnavailable { .. } => {
                "The map database did not answer; no sites were found".to_string()
            }
            ScoutError::HttpError(_) => "A network request failed".to_string(),
            ScoutError::ConfigValidationError { .. }
            | ScoutError::InvalidConfigValueError { .. }
            | ScoutError::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            ScoutError::CsvError(_) | ScoutError::IoError(_) | ScoutError::SerializationError(_) => {
                format!("Could not write results: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Paste a full map link that points at a place (shortened share links are fine)"
            }
            ErrorCategory::Network => "Check your connection and try again in a minute",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Output => "Check that the output path is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_not_critical() {
        let err = ScoutError::LinkUnresolved {
            link: "https://example.com".to_string(),
            reason: "no coordinates".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.to_string().contains("https://example.com"));
    }

    #[test]
    fn test_empty_link_is_rejected_as_input() {
        let err = ScoutError::EmptyLink;
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.user_friendly_message(), "No map link was provided");
    }
}
