pub mod filter;
pub mod logging;
pub mod panic;

// crates
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};
// internal
use crate::filter::envfilter::{create_envfilter_layer, EnvFilterConfig};
use crate::logging::local::{create_file_layer, create_writer_layer, FileConfig};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoggerLayer {
    File(FileConfig),
    Stdout,
    Stderr,
    // do not collect logs
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterLayer {
    EnvFilter(EnvFilterConfig),
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingSettings {
    pub logger: LoggerLayer,
    pub filter: FilterLayer,
    #[serde(with = "serde_level")]
    pub level: Level,
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self {
            logger: LoggerLayer::Stdout,
            filter: FilterLayer::None,
            level: Level::INFO,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Invalid filter directives: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("Failed to install the global subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn logger_layer(logger: LoggerLayer) -> Option<(BoxedLayer, WorkerGuard)> {
    let (layer, guard) = match logger {
        LoggerLayer::File(config) => create_file_layer(config),
        LoggerLayer::Stdout => create_writer_layer(std::io::stdout()),
        LoggerLayer::Stderr => create_writer_layer(std::io::stderr()),
        LoggerLayer::None => return None,
    };
    Some((Box::new(layer), guard))
}

/// Installs the global subscriber and the panic hook.
///
/// The returned guard has to be kept alive for as long as logs should be written, dropping it
/// flushes pending records.
pub fn init_tracing(settings: TracingSettings) -> Result<Option<WorkerGuard>, TracingError> {
    let mut layers: Vec<BoxedLayer> = vec![];

    let logger_guard = logger_layer(settings.logger).map(|(layer, guard)| {
        layers.push(layer);
        guard
    });

    if let FilterLayer::EnvFilter(config) = settings.filter {
        layers.push(Box::new(create_envfilter_layer(&config)?));
    }

    // If no layers are created, tracing subscriber is not required.
    if layers.is_empty() {
        return Ok(None);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(LevelFilter::from(settings.level))
        .try_init()?;

    panic::install_panic_hook();

    Ok(logger_guard)
}

mod serde_level {
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    use super::Level;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        <String>::deserialize(deserializer).and_then(|v| {
            v.parse()
                .map_err(|e| D::Error::custom(format!("invalid log level {e}")))
        })
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.as_str().serialize(serializer)
    }
}
