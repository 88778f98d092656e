use serde::Deserialize;

/// Top-level configuration settings for the dispatcher.
///
/// Includes settings for both the bus itself and for logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub bus: BusSettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the bus.
///
/// Capacity hints for pre-allocating the topic map and each topic's handler
/// collection. They only affect allocation, never behavior.
#[derive(Debug, Deserialize, Clone)]
pub struct BusSettings {
    pub topic_capacity: usize,
    pub handler_capacity: usize,
}

/// Configuration settings for logging.
///
/// Defines the default level used when the host initializes tracing.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub bus: Option<PartialBusSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

/// Partial bus settings.
///
/// Used when loading bus configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialBusSettings {
    pub topic_capacity: Option<usize>,
    pub handler_capacity: Option<usize>,
}

/// Partial logging settings.
///
/// Used for logging configuration from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the dispatcher has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            bus: BusSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            topic_capacity: 16,
            handler_capacity: 4,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
