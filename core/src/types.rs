//! Domain DTOs for the IntelOwl configuration endpoints.
//!
//! # Design
//! These types mirror the server's JSON but are defined independently of the
//! mock-server crate; integration tests catch schema drift. Missing fields
//! take their default value, while a field present with the wrong JSON type
//! is a decode error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Plugin families that expose a config listing and a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Analyzer,
    Connector,
}

impl PluginKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Analyzer => "analyzer",
            PluginKind::Connector => "connector",
        }
    }

    pub(crate) fn configs_path(&self) -> String {
        format!("api/get_{}_configs", self.as_str())
    }

    /// `name` is percent-encoded as a single path segment.
    pub(crate) fn healthcheck_path(&self, name: &str) -> crate::error::Result<String> {
        if name.is_empty() {
            return Err(ClientError::Construction(format!(
                "{} name must not be empty",
                self.as_str()
            )));
        }
        Ok(format!(
            "api/{}/{}/healthcheck",
            self.as_str(),
            urlencoding::encode(name)
        ))
    }
}

/// Worker settings shared by every plugin config.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigParams {
    pub queue: String,
    pub soft_time_limit: u64,
}

/// A secret a plugin needs before it can run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Secret {
    pub env_var_key: String,
    pub description: String,
    pub required: bool,
}

/// A tunable plugin parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Parameter {
    pub value: serde_json::Value,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
}

/// Whether the server considers the plugin ready to run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Verification {
    pub configured: bool,
    pub error_message: Option<String>,
    pub missing_secrets: Vec<String>,
}

/// Fields common to analyzer and connector configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BaseConfig {
    pub name: String,
    pub python_module: String,
    pub description: String,
    pub disabled: bool,
    pub config: ConfigParams,
    pub secrets: BTreeMap<String, Secret>,
    pub params: BTreeMap<String, Parameter>,
    pub verification: Verification,
}

/// How an analyzer is configured on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    /// `"file"` or `"observable"`.
    #[serde(rename = "type")]
    pub analyzer_type: String,
    pub external_service: bool,
    pub leaks_info: bool,
    pub docker_based: bool,
    pub run_hash: bool,
    pub run_hash_type: String,
    pub supported_filetypes: Vec<String>,
    pub not_supported_filetypes: Vec<String>,
    pub observable_supported: Vec<String>,
}

/// How a connector is configured on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectorConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    /// Highest TLP a job may carry for this connector to run on it.
    pub maximum_tlp: String,
    pub run_on_failure: bool,
}

/// Body of a health-check response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plugin_paths() {
        assert_eq!(PluginKind::Analyzer.configs_path(), "api/get_analyzer_configs");
        assert_eq!(PluginKind::Connector.configs_path(), "api/get_connector_configs");
        assert_eq!(
            PluginKind::Analyzer.healthcheck_path("Yara").unwrap(),
            "api/analyzer/Yara/healthcheck"
        );
    }

    #[test]
    fn healthcheck_name_is_one_segment() {
        assert_eq!(
            PluginKind::Connector.healthcheck_path("a/b c").unwrap(),
            "api/connector/a%2Fb%20c/healthcheck"
        );
        assert!(matches!(
            PluginKind::Analyzer.healthcheck_path(""),
            Err(ClientError::Construction(_))
        ));
    }

    #[test]
    fn analyzer_config_reads_base_and_specific_fields() {
        let config: AnalyzerConfig = serde_json::from_value(json!({
            "name": "Shodan_Honeyscore",
            "python_module": "shodan.Shodan",
            "description": "scan an IP against Shodan Honeyscore API",
            "disabled": false,
            "config": {"queue": "default", "soft_time_limit": 30},
            "secrets": {
                "api_key_name": {"env_var_key": "SHODAN_KEY", "description": "", "required": true}
            },
            "params": {
                "shodan_analysis": {"value": "honeyscore", "type": "str", "description": ""}
            },
            "verification": {"configured": false, "error_message": "api_key_name not set", "missing_secrets": ["api_key_name"]},
            "type": "observable",
            "external_service": true,
            "leaks_info": true,
            "docker_based": false,
            "run_hash": false,
            "run_hash_type": "",
            "supported_filetypes": [],
            "not_supported_filetypes": [],
            "observable_supported": ["ip"]
        }))
        .unwrap();

        assert_eq!(config.base.name, "Shodan_Honeyscore");
        assert_eq!(config.base.config.soft_time_limit, 30);
        assert!(config.base.secrets["api_key_name"].required);
        assert_eq!(config.base.params["shodan_analysis"].param_type, "str");
        assert_eq!(config.base.verification.missing_secrets, ["api_key_name"]);
        assert_eq!(config.analyzer_type, "observable");
        assert!(config.external_service);
        assert!(config.leaks_info);
        assert_eq!(config.observable_supported, ["ip"]);
    }

    #[test]
    fn missing_fields_default() {
        let config: AnalyzerConfig = serde_json::from_value(json!({"name": "Minimal"})).unwrap();
        assert_eq!(config.base.name, "Minimal");
        assert!(!config.base.disabled);
        assert!(config.supported_filetypes.is_empty());
        assert!(config.base.verification.error_message.is_none());
    }

    #[test]
    fn mistyped_field_is_rejected() {
        let result: Result<AnalyzerConfig, _> =
            serde_json::from_value(json!({"name": "Bad", "docker_based": "yes"}));
        assert!(result.is_err());
    }

    #[test]
    fn connector_config_reads_specific_fields() {
        let config: ConnectorConfig = serde_json::from_value(json!({
            "name": "MISP",
            "disabled": true,
            "maximum_tlp": "CLEAR",
            "run_on_failure": true
        }))
        .unwrap();
        assert_eq!(config.base.name, "MISP");
        assert!(config.base.disabled);
        assert_eq!(config.maximum_tlp, "CLEAR");
        assert!(config.run_on_failure);
    }

    #[test]
    fn status_is_required() {
        let result: Result<StatusResponse, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());
    }
}
