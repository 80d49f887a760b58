use thiserror::Error;

/// Why a fragment could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The request completed with a non-success status.
    #[error("HTTP error! status: {status}")]
    Fetch { status: u16 },

    /// The request never completed: network failure, bad URL, unreadable body.
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_status() {
        let err = LoadError::Fetch { status: 404 };
        assert_eq!(err.to_string(), "HTTP error! status: 404");
    }

    #[test]
    fn test_transport_error_is_verbatim() {
        let err = LoadError::Transport("Failed to fetch".to_string());
        assert_eq!(err.to_string(), "Failed to fetch");
    }

    #[test]
    fn test_site_error_names_its_kind() {
        let err = SiteError::Config("bad toml".to_string());
        assert_eq!(err.to_string(), "Config error: bad toml");
    }
}
