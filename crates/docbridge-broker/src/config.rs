//! Broker configuration
//!
//! The settings surfaced to the host registration tool and the service
//! metadata describing the broker itself.

use serde::{Deserialize, Serialize};

use crate::error::{BrokerError, BrokerResult};

/// A configuration field declared to the host registration tool.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigField {
    /// Setting name.
    pub name: &'static str,

    /// Whether the person registering the instance must supply a value.
    pub required: bool,

    /// Default value shown by the registration tool.
    pub default: &'static str,
}

/// Connection settings for a broker instance, supplied at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerSettings {
    /// Repository server host.
    pub repository_server: String,

    /// Workflow server host.
    pub workflow_server: String,

    /// Name of the repository to open.
    pub repository_name: String,
}

impl BrokerSettings {
    /// Create settings from the three required values.
    pub fn new(
        repository_server: impl Into<String>,
        workflow_server: impl Into<String>,
        repository_name: impl Into<String>,
    ) -> Self {
        Self {
            repository_server: repository_server.into(),
            workflow_server: workflow_server.into(),
            repository_name: repository_name.into(),
        }
    }

    /// The fields this broker declares to the registration tool.
    #[must_use]
    pub fn config_fields() -> Vec<ConfigField> {
        vec![
            ConfigField {
                name: "Repository Server",
                required: true,
                default: "",
            },
            ConfigField {
                name: "Workflow Server",
                required: true,
                default: "",
            },
            ConfigField {
                name: "Repository",
                required: true,
                default: "",
            },
        ]
    }

    /// Validate the settings.
    pub fn validate(&self) -> BrokerResult<()> {
        if self.repository_server.is_empty() {
            return Err(BrokerError::InvalidConfiguration {
                message: "repository server is required".to_string(),
            });
        }
        if self.workflow_server.is_empty() {
            return Err(BrokerError::InvalidConfiguration {
                message: "workflow server is required".to_string(),
            });
        }
        if self.repository_name.is_empty() {
            return Err(BrokerError::InvalidConfiguration {
                message: "repository name is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Metadata describing the broker service itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name (no spaces).
    pub name: String,

    /// Display name for UI presentation.
    pub display_name: String,

    /// Description surfaced to the host tooling.
    pub description: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "DocbridgeServiceBroker".to_string(),
            display_name: "Docbridge".to_string(),
            description: "Exposes document repository templates and documents as service objects."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_values() {
        assert!(BrokerSettings::new("app26", "app9", "Archive").validate().is_ok());
        assert!(BrokerSettings::new("", "app9", "Archive").validate().is_err());
        assert!(BrokerSettings::new("app26", "", "Archive").validate().is_err());
        assert!(BrokerSettings::new("app26", "app9", "").validate().is_err());
    }

    #[test]
    fn test_declared_fields_are_required() {
        let fields = BrokerSettings::config_fields();
        assert_eq!(fields.len(), 3);
        assert!(fields.iter().all(|f| f.required));
    }

    #[test]
    fn test_service_name_has_no_spaces() {
        let info = ServiceInfo::default();
        assert!(!info.name.contains(' '));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = BrokerSettings::new("app26", "app9", "Archive");
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: BrokerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.repository_name, "Archive");
    }
}
