//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MarkersError, MarkersResult};

/// Native id of the view whose first draw marks TTI completion.
pub const DEFAULT_COMPLETION_VIEW_ID: &str = "tti_complete";
/// Marker appended when TTI completes.
pub const DEFAULT_COMPLETION_MARKER: &str = "TTI_COMPLETE";
/// Marker appended at the session start time.
pub const DEFAULT_BIRTH_MARKER: &str = "BEGINNING_OF_TIME";
/// Global variable the payload is published under.
pub const DEFAULT_VARIABLE_NAME: &str = "AXE_PERFLOGGER";
/// Event emitted once the variable is available.
pub const DEFAULT_READY_EVENT: &str = "MarkersLog.ready";

/// Names used by a markers session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    /// Native id of the completion view
    pub completion_view_id: String,
    /// Terminal marker name
    pub completion_marker: String,
    /// Name of the record stamped with the session start time
    pub birth_marker: String,
    /// Script-side variable receiving the payload
    pub variable_name: String,
    /// Script-side event announcing the variable
    pub ready_event: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            completion_view_id: DEFAULT_COMPLETION_VIEW_ID.to_string(),
            completion_marker: DEFAULT_COMPLETION_MARKER.to_string(),
            birth_marker: DEFAULT_BIRTH_MARKER.to_string(),
            variable_name: DEFAULT_VARIABLE_NAME.to_string(),
            ready_event: DEFAULT_READY_EVENT.to_string(),
        }
    }
}

impl MarkersConfig {
    /// Create a config with default names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config blob; missing fields keep their defaults.
    pub fn from_json(json: &str) -> MarkersResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the native id of the completion view.
    pub fn with_completion_view_id(mut self, id: &str) -> Self {
        self.completion_view_id = id.to_string();
        self
    }

    /// Set the terminal marker name.
    pub fn with_completion_marker(mut self, name: &str) -> Self {
        self.completion_marker = name.to_string();
        self
    }

    /// Set the birth marker name.
    pub fn with_birth_marker(mut self, name: &str) -> Self {
        self.birth_marker = name.to_string();
        self
    }

    /// Set the script-side variable name.
    pub fn with_variable_name(mut self, name: &str) -> Self {
        self.variable_name = name.to_string();
        self
    }

    /// Set the ready event name.
    pub fn with_ready_event(mut self, name: &str) -> Self {
        self.ready_event = name.to_string();
        self
    }

    /// Check that every name is usable.
    pub fn validate(&self) -> MarkersResult<()> {
        let fields = [
            ("completion_view_id", &self.completion_view_id),
            ("completion_marker", &self.completion_marker),
            ("birth_marker", &self.birth_marker),
            ("variable_name", &self.variable_name),
            ("ready_event", &self.ready_event),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(MarkersError::InvalidConfig(format!("{field} must not be empty"))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MarkersConfig::default();
        assert_eq!(config.completion_view_id, "tti_complete");
        assert_eq!(config.completion_marker, "TTI_COMPLETE");
        assert_eq!(config.birth_marker, "BEGINNING_OF_TIME");
        assert_eq!(config.variable_name, "AXE_PERFLOGGER");
        assert_eq!(config.ready_event, "MarkersLog.ready");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = MarkersConfig::new()
            .with_completion_view_id("feed_ready")
            .with_completion_marker("FEED_DRAWN")
            .with_birth_marker("PROCESS_START")
            .with_variable_name("STARTUP_LOG")
            .with_ready_event("StartupLog.ready");

        assert_eq!(config.completion_view_id, "feed_ready");
        assert_eq!(config.completion_marker, "FEED_DRAWN");
        assert_eq!(config.birth_marker, "PROCESS_START");
        assert_eq!(config.variable_name, "STARTUP_LOG");
        assert_eq!(config.ready_event, "StartupLog.ready");
    }

    #[test]
    fn test_from_json_partial() {
        let config = MarkersConfig::from_json(r#"{"variable_name":"PERF"}"#).unwrap();
        assert_eq!(config.variable_name, "PERF");
        assert_eq!(config.ready_event, DEFAULT_READY_EVENT);
    }

    #[test]
    fn test_validate_rejects_blank() {
        let err = MarkersConfig::new().with_ready_event("  ").validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: ready_event must not be empty");

        assert!(MarkersConfig::from_json(r#"{"completion_view_id":""}"#).is_err());
    }
}
