use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Could not build request URL '{url}': {reason}")]
    Construction { url: String, reason: String },

    #[error("Network request failed: {message}")]
    Network { message: String },

    #[error("Server returned status code {status_code}")]
    Server { status_code: u16 },

    #[error("Response decoding failed: {message}")]
    Decode { message: String },

    #[error("No results found")]
    NoResults,

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// 錯誤分類，用於日誌與退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Server,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SearchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::EmptyQuery | SearchError::NoResults => ErrorCategory::Input,
            SearchError::Construction { .. } => ErrorCategory::Input,
            SearchError::Network { .. } => ErrorCategory::Network,
            SearchError::Server { .. } => ErrorCategory::Server,
            SearchError::Decode { .. } => ErrorCategory::Data,
            SearchError::InvalidConfigValue { .. } | SearchError::Config { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SearchError::EmptyQuery | SearchError::NoResults => ErrorSeverity::Low,
            SearchError::Network { .. } | SearchError::Server { .. } => ErrorSeverity::Medium,
            SearchError::Construction { .. } | SearchError::Decode { .. } => ErrorSeverity::High,
            SearchError::InvalidConfigValue { .. } | SearchError::Config { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 可重試的錯誤（暫時性網路或伺服器問題）
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::Network { .. } => true,
            SearchError::Server { status_code } => *status_code >= 500 || *status_code == 429,
            _ => false,
        }
    }

    /// 給終端使用者看的穩定訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            SearchError::EmptyQuery => "Please enter a search term.".to_string(),
            SearchError::Construction { .. } => {
                "Invalid search query. Please try a different search term.".to_string()
            }
            SearchError::Network { .. } => {
                "Network error occurred. Please check your internet connection and try again."
                    .to_string()
            }
            SearchError::Server { status_code } => format!(
                "Server error occurred (Status: {}). Please try again later.",
                status_code
            ),
            SearchError::Decode { .. } => {
                "Error processing the response from the server. Please try again.".to_string()
            }
            SearchError::NoResults => {
                "No results found. Try a different search term or category.".to_string()
            }
            SearchError::InvalidConfigValue { .. } => format!("Configuration error: {}", self),
            SearchError::Config { message } => format!("Configuration error: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SearchError::EmptyQuery => "Type a team, player or venue name before searching",
            SearchError::Construction { .. } => "Remove unusual characters from the search term",
            SearchError::Network { .. } => "Check network connectivity and try again",
            SearchError::Server { .. } => "The sports data service may be down; retry later",
            SearchError::Decode { .. } => "Check that the base URL points at a compatible API",
            SearchError::NoResults => "Try a shorter term or switch to the 'all' category",
            SearchError::InvalidConfigValue { .. } => "Fix the configuration value and run again",
            SearchError::Config { .. } => "Make sure the config file exists and is valid TOML",
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Decode {
                message: err.to_string(),
            }
        } else {
            SearchError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Config {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SearchError {
    fn from(err: toml::de::Error) -> Self {
        SearchError::Config {
            message: format!("TOML parsing error: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages_are_stable() {
        assert_eq!(
            SearchError::EmptyQuery.user_friendly_message(),
            "Please enter a search term."
        );
        assert_eq!(
            SearchError::Server { status_code: 503 }.user_friendly_message(),
            "Server error occurred (Status: 503). Please try again later."
        );
        assert_eq!(
            SearchError::NoResults.user_friendly_message(),
            "No results found. Try a different search term or category."
        );
    }

    #[test]
    fn test_severity_and_category() {
        assert_eq!(SearchError::NoResults.severity(), ErrorSeverity::Low);
        assert_eq!(
            SearchError::Network {
                message: "refused".into()
            }
            .category(),
            ErrorCategory::Network
        );
        assert_eq!(
            SearchError::InvalidConfigValue {
                field: "api.base_url".into(),
                value: "nope".into(),
                reason: "Invalid URL format".into()
            }
            .severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SearchError::Server { status_code: 502 }.is_retryable());
        assert!(SearchError::Server { status_code: 429 }.is_retryable());
        assert!(!SearchError::Server { status_code: 404 }.is_retryable());
        assert!(!SearchError::EmptyQuery.is_retryable());
    }

    #[test]
    fn test_io_error_maps_to_config() {
        let err: SearchError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml").into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
