//! Conversions from library errors into `AppError` and `FetchError`.

use super::{AppError, FetchError};

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            operation: "io_operation".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigParse {
            message: err.to_string(),
            line: err.location().map(|loc| loc.line()),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::load(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ),
            None => Self::transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_parse_failures() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let fetch = FetchError::from(err);
        assert!(matches!(fetch, FetchError::Parse { .. }));
        assert!(fetch.to_string().starts_with("Failed to parse portfolio config"));
    }

    #[test]
    fn yaml_errors_keep_line_numbers() {
        let err = serde_yaml::from_str::<serde_yaml::Value>("a: [1,\n b").unwrap_err();
        match AppError::from(err) {
            AppError::ConfigParse { line, .. } => assert!(line.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
