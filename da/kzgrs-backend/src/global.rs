// std
use std::path::PathBuf;
use std::sync::Arc;

// crates
use da_kzgrs::{global_parameters_from_file, global_parameters_from_randomness, GlobalParameters};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// internal
use crate::verifier::VerifierError;

/// Where the trusted setup comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SetupConfig {
    /// Uncompressed serialized `UniversalParams`.
    File { path: PathBuf },
    /// Generated at startup from local randomness. Not a trusted setup.
    Random { max_degree: usize },
}

pub fn load_global_parameters(
    config: &SetupConfig,
) -> Result<Arc<GlobalParameters>, VerifierError> {
    let params = match config {
        SetupConfig::File { path } => {
            let params = global_parameters_from_file(path).map_err(|e| {
                VerifierError::SetupUnavailable(format!("{}: {e}", path.display()))
            })?;
            info!(path = %path.display(), powers = params.powers_of_g.len(), "Loaded KZG setup");
            params
        }
        SetupConfig::Random { max_degree } => {
            warn!("Global parameters are randomly generated. Use for development only.");
            let mut rng = rand::thread_rng();
            global_parameters_from_randomness(*max_degree, &mut rng)
                .map_err(|e| VerifierError::SetupUnavailable(e.to_string()))?
        }
    };
    if params.powers_of_g.is_empty() {
        return Err(VerifierError::SetupUnavailable(
            "setup holds no powers of g".to_string(),
        ));
    }
    Ok(Arc::new(params))
}
