use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A registered plugin: its config JSON and what its health check reports.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plugin {
    pub config: Value,
    pub healthy: bool,
}

#[derive(Debug, Default)]
struct Registry {
    token: String,
    analyzers: HashMap<String, Plugin>,
    connectors: HashMap<String, Plugin>,
    latency: Duration,
}

/// Read-only server state, assembled before the router is built.
#[derive(Clone, Debug)]
pub struct MockState {
    registry: Arc<Registry>,
}

/// Builder for `MockState`.
#[derive(Debug, Default)]
pub struct MockStateBuilder {
    registry: Registry,
}

impl MockState {
    pub fn builder(token: impl Into<String>) -> MockStateBuilder {
        MockStateBuilder {
            registry: Registry {
                token: token.into(),
                ..Registry::default()
            },
        }
    }

    /// A registry with a handful of realistic analyzers and connectors.
    pub fn seeded(token: impl Into<String>) -> Self {
        Self::builder(token)
            .analyzer("Yara", yara_config(), true)
            .analyzer("Classic_DNS", classic_dns_config(), true)
            .analyzer("Shodan_Honeyscore", shodan_config(), false)
            .connector("MISP", connector_config("MISP", "AMBER"), true)
            .connector("OpenCTI", connector_config("OpenCTI", "AMBER"), true)
            .connector("YETI", connector_config("YETI", "CLEAR"), false)
            .build()
    }
}

impl MockStateBuilder {
    pub fn analyzer(mut self, name: &str, config: Value, healthy: bool) -> Self {
        self.registry
            .analyzers
            .insert(name.to_string(), Plugin { config, healthy });
        self
    }

    pub fn connector(mut self, name: &str, config: Value, healthy: bool) -> Self {
        self.registry
            .connectors
            .insert(name.to_string(), Plugin { config, healthy });
        self
    }

    /// Delay applied to every request before it is handled.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.registry.latency = latency;
        self
    }

    pub fn build(self) -> MockState {
        MockState {
            registry: Arc::new(self.registry),
        }
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/api/get_analyzer_configs", get(analyzer_configs))
        .route("/api/get_connector_configs", get(connector_configs))
        .route("/api/{kind}/{name}/healthcheck", get(healthcheck))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Token check, latency injection and request logging.
async fn authenticate(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let registry = &state.registry;
    if !registry.latency.is_zero() {
        tokio::time::sleep(registry.latency).await;
    }

    let method = request.method().clone();
    let uri = request.uri().clone();
    let expected = format!("Token {}", registry.token);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);

    let response = if authorized {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid token." })),
        )
            .into_response()
    };

    tracing::info!(%method, %uri, status = response.status().as_u16(), "served");
    response
}

fn configs(plugins: &HashMap<String, Plugin>) -> Json<HashMap<String, Value>> {
    Json(
        plugins
            .iter()
            .map(|(name, plugin)| (name.clone(), plugin.config.clone()))
            .collect(),
    )
}

async fn analyzer_configs(State(state): State<MockState>) -> Json<HashMap<String, Value>> {
    configs(&state.registry.analyzers)
}

async fn connector_configs(State(state): State<MockState>) -> Json<HashMap<String, Value>> {
    configs(&state.registry.connectors)
}

async fn healthcheck(
    State(state): State<MockState>,
    Path((kind, name)): Path<(String, String)>,
) -> Response {
    let plugins = match kind.as_str() {
        "analyzer" => &state.registry.analyzers,
        "connector" => &state.registry.connectors,
        _ => return error(StatusCode::NOT_FOUND, "unknown plugin kind"),
    };
    match plugins.get(&name) {
        Some(plugin) => Json(json!({ "status": plugin.healthy })).into_response(),
        None => error(StatusCode::NOT_FOUND, "not found"),
    }
}

fn base_config(name: &str, python_module: &str, description: &str) -> Value {
    json!({
        "name": name,
        "python_module": python_module,
        "description": description,
        "disabled": false,
        "config": { "queue": "default", "soft_time_limit": 60 },
        "secrets": {},
        "params": {},
        "verification": { "configured": true, "error_message": null, "missing_secrets": [] }
    })
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    base
}

fn yara_config() -> Value {
    merge(
        base_config("Yara", "yara_scan.YaraScan", "scan a file with Yara rules"),
        json!({
            "type": "file",
            "external_service": false,
            "leaks_info": false,
            "docker_based": false,
            "run_hash": false,
            "run_hash_type": "",
            "supported_filetypes": [],
            "not_supported_filetypes": [],
            "observable_supported": []
        }),
    )
}

fn classic_dns_config() -> Value {
    merge(
        base_config("Classic_DNS", "dns.classic.ClassicDNSResolver", "resolve a domain"),
        json!({
            "type": "observable",
            "external_service": true,
            "leaks_info": false,
            "docker_based": false,
            "run_hash": false,
            "run_hash_type": "",
            "supported_filetypes": [],
            "not_supported_filetypes": [],
            "observable_supported": ["domain", "url"]
        }),
    )
}

fn shodan_config() -> Value {
    let mut config = merge(
        base_config("Shodan_Honeyscore", "shodan.Shodan", "Shodan Honeyscore lookup"),
        json!({
            "type": "observable",
            "external_service": true,
            "leaks_info": true,
            "docker_based": false,
            "run_hash": false,
            "run_hash_type": "",
            "supported_filetypes": [],
            "not_supported_filetypes": [],
            "observable_supported": ["ip"]
        }),
    );
    config["secrets"] = json!({
        "api_key_name": { "env_var_key": "SHODAN_KEY", "description": "", "required": true }
    });
    config["verification"] = json!({
        "configured": false,
        "error_message": "api_key_name not set",
        "missing_secrets": ["api_key_name"]
    });
    config
}

fn connector_config(name: &str, maximum_tlp: &str) -> Value {
    merge(
        base_config(name, &format!("{}.{name}", name.to_lowercase()), "export job results"),
        json!({ "maximum_tlp": maximum_tlp, "run_on_failure": false }),
    )
}
