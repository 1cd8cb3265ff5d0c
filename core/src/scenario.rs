//! Client scenarios handed to task widgets.
//!
//! Selection is round-robin, not random: every client appears once before
//! any repeats, and the cursor wraps. An empty catalog still yields a
//! generic walk-in client, so task creation can never fail.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientScenario {
    pub client_name:    String,
    pub business_name:  String,
    pub industry:       String,
    #[serde(default)]
    pub coverage_needs: Vec<String>,
    /// Widget-specific data (quotes, call options, COI holder...). Opaque here.
    #[serde(default)]
    pub payload:        serde_json::Value,
}

impl ClientScenario {
    pub fn walk_in() -> Self {
        Self {
            client_name:    "Walk-in Client".into(),
            business_name:  "Main Street Business".into(),
            industry:       "General".into(),
            coverage_needs: vec!["GL".into()],
            payload:        serde_json::Value::Null,
        }
    }

    /// Everything a widget needs, as one opaque JSON value.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "client_name":    self.client_name,
            "business_name":  self.business_name,
            "industry":       self.industry,
            "coverage_needs": self.coverage_needs,
            "details":        self.payload,
        })
    }
}

pub trait ScenarioSource: Send {
    fn next_scenario(&mut self) -> ClientScenario;

    /// Rewind to the first scenario. Called at session start.
    fn reset(&mut self);
}

pub struct RoundRobinScenarios {
    catalog: Vec<ClientScenario>,
    cursor:  usize,
}

impl RoundRobinScenarios {
    pub fn new(catalog: Vec<ClientScenario>) -> Self {
        if catalog.is_empty() {
            log::warn!("scenario catalog is empty; tasks will use a walk-in client");
        }
        Self { catalog, cursor: 0 }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_catalog())
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

impl ScenarioSource for RoundRobinScenarios {
    fn next_scenario(&mut self) -> ClientScenario {
        if self.catalog.is_empty() {
            return ClientScenario::walk_in();
        }
        let scenario = self.catalog[self.cursor % self.catalog.len()].clone();
        self.cursor = (self.cursor + 1) % self.catalog.len();
        scenario
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ScenarioFile {
    scenarios: Vec<ClientScenario>,
}

/// The shipped client book, compiled in from `data/scenarios.json`.
const BUILTIN_SCENARIOS: &str = include_str!("../../data/scenarios.json");

/// Load `{data_dir}/scenarios.json`.
pub fn load_catalog(data_dir: &str) -> anyhow::Result<Vec<ClientScenario>> {
    let path = format!("{data_dir}/scenarios.json");
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    parse_catalog(&content).map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))
}

/// The shipped client book, used when no data directory is given.
/// An unparseable embedded file leaves the catalog empty and every task
/// falls back to a walk-in client.
pub fn builtin_catalog() -> Vec<ClientScenario> {
    parse_catalog(BUILTIN_SCENARIOS).unwrap_or_else(|e| {
        log::error!("built-in scenario catalog is invalid: {e}");
        Vec::new()
    })
}

fn parse_catalog(content: &str) -> serde_json::Result<Vec<ClientScenario>> {
    serde_json::from_str::<ScenarioFile>(content).map(|file| file.scenarios)
}
