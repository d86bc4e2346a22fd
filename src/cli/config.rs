use super::commands::PlayArgs;
use crate::network::config::{DEFAULT_HOST, DEFAULT_INTERVAL, DEFAULT_PORT, DEFAULT_TIMEOUT};
use crate::network::{Network, SessionConfig};
use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Effective client configuration.
///
/// Built from defaults, then the config file, then environment variables,
/// then command-line flags; later layers win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: Network,
    pub host: String,
    pub port: u16,
    #[serde(with = "duration_text")]
    pub timeout: Duration,
    #[serde(with = "duration_text")]
    pub interval: Duration,
    pub debug: bool,
    pub clear_screen: bool,
    pub ascii: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Tcp,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
            debug: false,
            clear_screen: true,
            ascii: false,
        }
    }
}

impl Config {
    /// Get the default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "pawnwire", "pawnwire")
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
    }

    /// Get the default config file path
    pub fn default_config_file() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Resolve the effective configuration for a run
    pub fn resolve(args: &PlayArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(args.config.as_deref())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with a TOML file.
    ///
    /// An explicit path must exist; the default location is only read when
    /// a file is there.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_file() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Overlay `NETWORK`, `SERVER_HOST`, `SERVER_PORT`, `TIMEOUT`, `INTERVAL`
    /// and `DEBUG` as returned by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("NETWORK") {
            self.network = value
                .parse()
                .map_err(|e: crate::network::SessionError| invalid("NETWORK", &value, e))?;
        }
        if let Some(value) = lookup("SERVER_HOST") {
            self.host = value;
        }
        if let Some(value) = lookup("SERVER_PORT") {
            self.port = value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("SERVER_PORT", &value, e))?;
        }
        if let Some(value) = lookup("TIMEOUT") {
            self.timeout = parse_duration(&value).map_err(|e| invalid("TIMEOUT", &value, e))?;
        }
        if let Some(value) = lookup("INTERVAL") {
            self.interval = parse_duration(&value).map_err(|e| invalid("INTERVAL", &value, e))?;
        }
        if let Some(value) = lookup("DEBUG") {
            self.debug = parse_flag(&value).ok_or_else(|| {
                invalid("DEBUG", &value, "expected true or false")
            })?;
        }
        Ok(())
    }

    /// Overlay command-line flags
    pub fn apply_args(&mut self, args: &PlayArgs) {
        if let Some(network) = args.network {
            self.network = network;
        }
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(timeout) = args.timeout {
            self.timeout = timeout;
        }
        if let Some(interval) = args.interval {
            self.interval = interval;
        }
        if args.debug {
            self.debug = true;
        }
        if args.no_clear {
            self.clear_screen = false;
        }
        if args.ascii {
            self.ascii = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", &self.host, "host must not be empty"));
        }
        if self.port == 0 {
            return Err(invalid("port", "0", "port must be between 1 and 65535"));
        }
        if self.timeout.is_zero() {
            return Err(invalid(
                "timeout",
                &format_duration(self.timeout),
                "timeout must be greater than zero",
            ));
        }
        if self.interval.is_zero() {
            return Err(invalid(
                "interval",
                &format_duration(self.interval),
                "interval must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            network: self.network,
            host: self.host.trim().to_string(),
            port: self.port,
            timeout: self.timeout,
            interval: self.interval,
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn invalid(key: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn duration_regex() -> &'static Regex {
    static DURATION: OnceLock<Regex> = OnceLock::new();
    DURATION.get_or_init(|| Regex::new(r"^(\d+)(ms|s|m|h)?$").expect("valid duration pattern"))
}

/// Parse `500ms`, `30s`, `2m`, `1h` or a bare number of seconds
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    let caps = duration_regex()
        .captures(text)
        .ok_or_else(|| format!("'{}' is not a duration (try 500ms, 30s, 2m or 1h)", text))?;
    let amount: u64 = caps[1]
        .parse()
        .map_err(|_| format!("'{}' is out of range", text))?;

    let duration = match caps.get(2).map(|m| m.as_str()) {
        Some("ms") => Duration::from_millis(amount),
        Some("m") => Duration::from_secs(amount.saturating_mul(60)),
        Some("h") => Duration::from_secs(amount.saturating_mul(3600)),
        _ => Duration::from_secs(amount),
    };
    Ok(duration)
}

/// Shortest text form `parse_duration` reads back to the same value
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1000 != 0 {
        return format!("{}ms", millis);
    }
    let secs = duration.as_secs();
    if secs != 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs != 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

mod duration_text {
    use super::{format_duration, parse_duration};
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
            Raw::Text(text) => parse_duration(&text).map_err(de::Error::custom),
        }
    }
}
