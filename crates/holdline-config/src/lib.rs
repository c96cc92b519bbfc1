use std::env;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use holdline_core::twiml::Greeting;
use holdline_core::PhoneHashKey;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "holdline";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_ASSETS_DIR: &str = "public";
pub const DEFAULT_RECENT_CALLS: i64 = 10;
pub const MAX_RECENT_CALLS: i64 = 100;
pub const DEFAULT_ACTIVE_WINDOW_MINUTES: i64 = 240;
pub const MAX_ACTIVE_WINDOW_MINUTES: i64 = 1440;

pub const ENV_PHONE_HASH_SECRET: &str = "HOLDLINE_PHONE_HASH_SECRET";
pub const ENV_TWILIO_AUTH_TOKEN: &str = "HOLDLINE_TWILIO_AUTH_TOKEN";
pub const ENV_PUBLIC_URL: &str = "HOLDLINE_PUBLIC_URL";
pub const ENV_BIND: &str = "HOLDLINE_BIND";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub privacy: PrivacyConfig,
    pub twilio: TwilioConfig,
    pub greeting: Greeting,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub public_url: Option<String>,
    pub assets_dir: PathBuf,
}

#[derive(Clone, Default)]
pub struct PrivacyConfig {
    pub phone_hash_secret: Option<String>,
}

#[derive(Clone, Default)]
pub struct TwilioConfig {
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyticsConfig {
    pub recent_calls: i64,
    pub active_window_minutes: i64,
}

impl fmt::Debug for PrivacyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivacyConfig")
            .field("phone_hash_secret", &redacted(&self.phone_hash_secret))
            .finish()
    }
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("auth_token", &redacted(&self.auth_token))
            .finish()
    }
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
                public_url: None,
                assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            },
            privacy: PrivacyConfig::default(),
            twilio: TwilioConfig::default(),
            greeting: Greeting::default(),
            analytics: AnalyticsConfig {
                recent_calls: DEFAULT_RECENT_CALLS,
                active_window_minutes: DEFAULT_ACTIVE_WINDOW_MINUTES,
            },
        }
    }
}

impl AppConfig {
    /// Key for the caller-number processor; there is no unkeyed fallback.
    pub fn phone_hash_key(&self) -> Result<PhoneHashKey> {
        let secret = self
            .privacy
            .phone_hash_secret
            .as_deref()
            .ok_or(ConfigError::MissingPhoneHashSecret)?;
        PhoneHashKey::new(secret).map_err(|_| ConfigError::MissingPhoneHashSecret)
    }

    pub fn active_window_secs(&self) -> i64 {
        self.analytics.active_window_minutes * 60
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("phone hash secret is not configured (set [privacy].phone_hash_secret or HOLDLINE_PHONE_HASH_SECRET)")]
    MissingPhoneHashSecret,
    #[error("invalid bind address: {0}")]
    InvalidBind(String),
    #[error("invalid public_url (expected http:// or https://): {0}")]
    InvalidPublicUrl(String),
    #[error("invalid greeting field {field}: value cannot be empty")]
    InvalidGreeting { field: &'static str },
    #[error("invalid analytics.recent_calls value: {0}")]
    InvalidRecentCalls(i64),
    #[error("invalid analytics.active_window_minutes value: {0}")]
    InvalidActiveWindow(i64),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<ServerFile>,
    privacy: Option<PrivacyFile>,
    twilio: Option<TwilioFile>,
    greeting: Option<GreetingFile>,
    analytics: Option<AnalyticsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
    public_url: Option<String>,
    assets_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PrivacyFile {
    phone_hash_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TwilioFile {
    auth_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GreetingFile {
    message: Option<String>,
    voice: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnalyticsFile {
    recent_calls: Option<i64>,
    active_window_minutes: Option<i64>,
}

/// Loads the config file (if any) and applies `HOLDLINE_*` environment overrides.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = load_file(config_path)?;
    apply_env(config, |name| env::var(name).ok())
}

fn load_file(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(server) = parsed.server {
        if let Some(bind) = server.bind {
            config.server.bind = parse_bind(&bind)?;
        }
        if let Some(url) = server.public_url {
            config.server.public_url = non_empty(url).map(validate_public_url).transpose()?;
        }
        if let Some(dir) = server.assets_dir {
            config.server.assets_dir = dir;
        }
    }

    if let Some(privacy) = parsed.privacy {
        config.privacy.phone_hash_secret = privacy.phone_hash_secret.and_then(non_blank);
    }

    if let Some(twilio) = parsed.twilio {
        config.twilio.auth_token = twilio.auth_token.and_then(non_blank);
    }

    if let Some(greeting) = parsed.greeting {
        if let Some(message) = greeting.message {
            config.greeting.message = require_text(message, "greeting.message")?;
        }
        if let Some(voice) = greeting.voice {
            config.greeting.voice = require_text(voice, "greeting.voice")?;
        }
        if let Some(language) = greeting.language {
            config.greeting.language = require_text(language, "greeting.language")?;
        }
    }

    if let Some(analytics) = parsed.analytics {
        if let Some(recent) = analytics.recent_calls {
            if recent <= 0 || recent > MAX_RECENT_CALLS {
                return Err(ConfigError::InvalidRecentCalls(recent));
            }
            config.analytics.recent_calls = recent;
        }
        if let Some(window) = analytics.active_window_minutes {
            if window <= 0 || window > MAX_ACTIVE_WINDOW_MINUTES {
                return Err(ConfigError::InvalidActiveWindow(window));
            }
            config.analytics.active_window_minutes = window;
        }
    }

    Ok(config)
}

fn apply_env<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).and_then(non_empty);
    let get_secret = |name: &str| lookup(name).and_then(non_blank);

    if let Some(secret) = get_secret(ENV_PHONE_HASH_SECRET) {
        config.privacy.phone_hash_secret = Some(secret);
    }
    if let Some(token) = get_secret(ENV_TWILIO_AUTH_TOKEN) {
        config.twilio.auth_token = Some(token);
    }
    if let Some(url) = get(ENV_PUBLIC_URL) {
        config.server.public_url = Some(validate_public_url(url)?);
    }
    if let Some(bind) = get(ENV_BIND) {
        config.server.bind = parse_bind(&bind)?;
    }

    Ok(config)
}

fn parse_bind(value: &str) -> Result<SocketAddr> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBind(value.to_string()))
}

fn validate_public_url(value: String) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidPublicUrl(value));
    }
    Ok(trimmed.to_string())
}

fn require_text(value: String, field: &'static str) -> Result<String> {
    non_empty(value).ok_or(ConfigError::InvalidGreeting { field })
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Secrets are kept byte for byte; whitespace only decides whether one is set.
fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
