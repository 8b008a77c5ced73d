//! Configuration for the dispatcher

/// Header GitHub uses for the event name
pub const GITHUB_EVENT_HEADER: &str = "X-GitHub-Event";

/// Header GitHub uses for the unique delivery GUID
pub const GITHUB_DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Header carrying the event name
    pub event_header: String,

    /// Header carrying the delivery id, used for log correlation only
    pub delivery_header: String,

    /// Log registrations, drops and handler invocations
    pub enable_logging: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            event_header: GITHUB_EVENT_HEADER.to_string(),
            delivery_header: GITHUB_DELIVERY_HEADER.to_string(),
            enable_logging: true,
        }
    }
}

impl DispatcherConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the event header name
    pub fn event_header(mut self, header: impl Into<String>) -> Self {
        self.event_header = header.into();
        self
    }

    /// Set the delivery header name
    pub fn delivery_header(mut self, header: impl Into<String>) -> Self {
        self.delivery_header = header.into();
        self
    }

    /// Enable/disable logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DispatcherConfig::default();
        assert_eq!(config.event_header, "X-GitHub-Event");
        assert_eq!(config.delivery_header, "X-GitHub-Delivery");
        assert!(config.enable_logging);
    }

    #[test]
    fn test_setters() {
        let config = DispatcherConfig::new()
            .event_header("X-Gitea-Event")
            .delivery_header("X-Gitea-Delivery")
            .enable_logging(false);

        assert_eq!(config.event_header, "X-Gitea-Event");
        assert_eq!(config.delivery_header, "X-Gitea-Delivery");
        assert!(!config.enable_logging);
    }
}
