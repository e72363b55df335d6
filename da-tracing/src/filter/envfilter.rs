// std
use std::collections::BTreeMap;
// crates
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::{EnvFilter, ParseError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvFilterConfig {
    /// Target (crate or module path) to level, e.g. `da_network_client: debug`.
    /// More: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives
    pub filters: BTreeMap<String, String>,
}

impl EnvFilterConfig {
    fn directives(&self) -> String {
        self.filters
            .iter()
            .map(|(target, level)| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub fn create_envfilter_layer(config: &EnvFilterConfig) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_new(config.directives())
}
