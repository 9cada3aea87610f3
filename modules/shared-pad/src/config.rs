use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    /// "memory", "fs" or "blob"
    pub const BACKEND: &str = "PAD_BACKEND";
    pub const PAD_DIR: &str = "PAD_DIR";
    /// Pin every pad to a single file (fs backend only)
    pub const PAD_FILE: &str = "PAD_FILE";
    pub const BLOB_READ_WRITE_TOKEN: &str = "BLOB_READ_WRITE_TOKEN";
    /// Set to "1", "true", "yes" or "on" to prepend frontmatter to responses.
    pub const FRONTMATTER: &str = "PAD_FRONTMATTER";
    pub const PORT: &str = "PAD_PORT";
    pub const HOST: &str = "PAD_HOST";
}

/// Default values
pub mod defaults {
    pub const PAD_DIR: &str = "./pads";
    pub const PORT: u16 = 8000;
    pub const HOST: &str = "0.0.0.0";
    /// Local-dev file consulted after `.env` for the blob token
    pub const ENV_LOCAL_FILE: &str = ".env.local";
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown PAD_BACKEND value '{value}' (expected memory, fs or blob)")]
    UnknownBackend { value: String },
    #[error("BLOB_READ_WRITE_TOKEN is not set. Configure it in the environment or .env.local")]
    MissingBlobToken,
    #[error("could not parse store id from BLOB_READ_WRITE_TOKEN")]
    MalformedBlobToken,
    #[error("invalid PAD_PORT value '{value}'")]
    InvalidPort { value: String },
}

/// Blob store credential plus the store id parsed out of it.
///
/// Token format: `vercel_blob_rw_<storeId>_<secret>`. The store id is the
/// fourth `_`-delimited segment.
#[derive(Clone, PartialEq, Eq)]
pub struct BlobCredentials {
    token: String,
    store_id: String,
}

impl BlobCredentials {
    pub fn parse(token: &str) -> Result<Self, ConfigError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingBlobToken);
        }
        let store_id = token
            .split('_')
            .nth(3)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MalformedBlobToken)?;
        Ok(Self {
            store_id: store_id.to_string(),
            token: token.to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }
}

// Keep the secret out of logs.
impl std::fmt::Debug for BlobCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobCredentials")
            .field("store_id", &self.store_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Memory,
    Fs {
        dir: PathBuf,
        single_file: Option<PathBuf>,
    },
    Blob(BlobCredentials),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub frontmatter: bool,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load `.env` / `.env.local` then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        dotenvy::from_filename(defaults::ENV_LOCAL_FILE).ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get(env_vars::BLOB_READ_WRITE_TOKEN);
        let kind = match get(env_vars::BACKEND) {
            Some(v) => v.trim().to_lowercase(),
            None if token.is_some() => "blob".to_string(),
            None => "fs".to_string(),
        };

        let backend = match kind.as_str() {
            "memory" | "mem" => BackendConfig::Memory,
            "fs" | "file" | "filesystem" => BackendConfig::Fs {
                dir: PathBuf::from(
                    get(env_vars::PAD_DIR).unwrap_or_else(|| defaults::PAD_DIR.to_string()),
                ),
                single_file: get(env_vars::PAD_FILE).map(PathBuf::from),
            },
            "blob" => {
                let token = token.ok_or(ConfigError::MissingBlobToken)?;
                BackendConfig::Blob(BlobCredentials::parse(&token)?)
            }
            _ => return Err(ConfigError::UnknownBackend { value: kind.clone() }),
        };

        let port = match get(env_vars::PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw.clone() })?,
            None => defaults::PORT,
        };

        Ok(Self {
            backend,
            frontmatter: get(env_vars::FRONTMATTER)
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            host: get(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_string()),
            port,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
