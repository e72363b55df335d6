// std
use std::{net::SocketAddr, path::PathBuf};
// crates
use clap::{Args, ValueEnum};
use color_eyre::eyre::{eyre, Result};
use da_kzgrs_backend::SetupConfig;
use da_network_client::{backend::http::HttpBackendSettings, DaClientSettings};
use da_store::{MemStoreSettings, NetworkStoreSettings};
use da_tracing::{logging::local::FileConfig, LoggerLayer, TracingSettings};
use serde::{Deserialize, Serialize};
use tracing::Level;

#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LoggerLayerType {
    File,
    #[default]
    Stdout,
    Stderr,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Directory for the File backend
    #[clap(long = "log-dir", env = "LOG_DIR", required_if_eq("backend", "file"))]
    directory: Option<PathBuf>,

    /// Prefix for the File backend
    #[clap(long = "log-path", env = "LOG_PATH")]
    prefix: Option<PathBuf>,

    /// Backend type
    #[clap(long = "log-backend", env = "LOG_BACKEND", value_enum)]
    backend: Option<LoggerLayerType>,

    #[clap(long = "log-level", env = "LOG_LEVEL")]
    level: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct HttpArgs {
    /// Address the proxy listens on
    #[clap(long = "http-addr", env = "HTTP_ADDR")]
    http_addr: Option<SocketAddr>,

    #[clap(long = "http-cors-origin", env = "HTTP_CORS_ORIGIN")]
    cors_origins: Option<Vec<String>>,
}

/// Configuration for the Http Server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Socket where the server will be listening on for incoming requests.
    pub address: SocketAddr,
    /// Allowed origins for this server deployment requests.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub max_blob_size: usize,
    pub disperser: HttpBackendSettings,
    #[serde(default)]
    pub client: DaClientSettings,
    pub setup: SetupConfig,
}

impl NetworkSettings {
    #[must_use]
    pub fn store_settings(&self) -> NetworkStoreSettings {
        NetworkStoreSettings {
            max_blob_size: self.max_blob_size,
            client: self.client.clone(),
        }
    }
}

/// Backend behind the proxy, fixed for the lifetime of the process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreSettings {
    Memory(MemStoreSettings),
    Network(NetworkSettings),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub log: TracingSettings,
    pub http: HttpSettings,
    pub store: StoreSettings,
}

impl Config {
    pub fn update_from_args(mut self, log_args: LogArgs, http_args: HttpArgs) -> Result<Self> {
        update_log(&mut self.log, log_args)?;
        update_http(&mut self.http, http_args);
        Ok(self)
    }
}

pub fn update_log(log: &mut TracingSettings, log_args: LogArgs) -> Result<()> {
    let LogArgs {
        backend,
        directory,
        prefix,
        level,
    } = log_args;

    // Override the file config with the one from env variables.
    if let Some(backend) = backend {
        log.logger = match backend {
            LoggerLayerType::File => LoggerLayer::File(FileConfig {
                directory: directory.ok_or_else(|| eyre!("File backend requires a directory."))?,
                prefix,
            }),
            LoggerLayerType::Stdout => LoggerLayer::Stdout,
            LoggerLayerType::Stderr => LoggerLayer::Stderr,
        }
    };

    if let Some(level) = level {
        log.level = level
            .parse::<Level>()
            .map_err(|_| eyre!("Invalid log level provided: {level}"))?;
    }
    Ok(())
}

pub fn update_http(http: &mut HttpSettings, http_args: HttpArgs) {
    let HttpArgs {
        http_addr,
        cors_origins,
    } = http_args;

    if let Some(address) = http_addr {
        http.address = address;
    }
    if let Some(cors_origins) = cors_origins {
        http.cors_origins = cors_origins;
    }
}
