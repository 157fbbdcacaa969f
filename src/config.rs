use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::db::RestStoreConfig;

/// Application-level constants
pub const APP_NAME: &str = "AegisTriage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PROJECT_NAME: &str = "AegisTriage 2.0";
const DEFAULT_API_PREFIX: &str = "/api/v1";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TABLE: &str = "patients";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "aegis_triage=info,tower_http=warn"
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Which `PatientStore` backs the API.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreSettings {
    Remote(RestStoreConfig),
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub project_name: String,
    pub api_prefix: String,
    pub bind_addr: SocketAddr,
    pub store: StoreSettings,
    pub prediction_seed: Option<u64>,
    pub model_artifacts: Vec<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_prefix = get("API_V1_STR").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        if !api_prefix.starts_with('/') || api_prefix.len() < 2 {
            return Err(ConfigError::Invalid {
                key: "API_V1_STR",
                value: api_prefix,
            });
        }
        let api_prefix = api_prefix.trim_end_matches('/').to_string();

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host.parse().map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: host.clone(),
        })?;
        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;

        let store = match get("PATIENT_STORE").as_deref() {
            None | Some("remote") => StoreSettings::Remote(RestStoreConfig {
                url: get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?,
                key: get("SUPABASE_KEY").ok_or(ConfigError::Missing("SUPABASE_KEY"))?,
                table: get("PATIENTS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
                timeout_secs: parse_or(
                    "STORE_TIMEOUT_SECS",
                    get("STORE_TIMEOUT_SECS"),
                    DEFAULT_STORE_TIMEOUT_SECS,
                )?,
            }),
            Some("memory") => StoreSettings::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "PATIENT_STORE",
                    value: other.to_string(),
                })
            }
        };

        let prediction_seed = get("PREDICTION_SEED")
            .map(|raw| {
                raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                    key: "PREDICTION_SEED",
                    value: raw,
                })
            })
            .transpose()?;

        Ok(Self {
            project_name: get("PROJECT_NAME").unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            api_prefix,
            bind_addr: SocketAddr::new(ip, port),
            store,
            prediction_seed,
            model_artifacts: split_list(get("MODEL_ARTIFACTS"))
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            cors_origins: split_list(get("CORS_ORIGINS")),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
