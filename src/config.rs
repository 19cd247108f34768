use serde::{Deserialize, Serialize};

/// Capacity ceiling used when nothing else is configured.
pub const DEFAULT_MAX_SLOTS: usize = 10;

/// Roster size a new junta starts with (a typical group).
pub const DEFAULT_INITIAL_SIZE: usize = 10;

/// Capacity and growth rules for a roster.
///
/// `max_slots` and `auto_expand_on_full` are independent knobs: a roster may
/// grow on demand up to its cap, or reject joins as soon as every slot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPolicy {
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,
    #[serde(default = "default_auto_expand")]
    pub auto_expand_on_full: bool,
    #[serde(default = "default_initial_size")]
    pub initial_size: usize,
}

fn default_max_slots() -> usize {
    DEFAULT_MAX_SLOTS
}

fn default_auto_expand() -> bool {
    true
}

fn default_initial_size() -> usize {
    DEFAULT_INITIAL_SIZE
}

impl Default for RosterPolicy {
    fn default() -> Self {
        Self {
            max_slots: DEFAULT_MAX_SLOTS,
            auto_expand_on_full: true,
            initial_size: DEFAULT_INITIAL_SIZE,
        }
    }
}

impl RosterPolicy {
    pub fn with_max_slots(mut self, max_slots: usize) -> Self {
        self.max_slots = max_slots;
        self
    }

    pub fn with_auto_expand(mut self, enabled: bool) -> Self {
        self.auto_expand_on_full = enabled;
        self
    }

    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.initial_size = size;
        self
    }

    /// Initial size clamped into `[1, max_slots]`
    pub fn effective_initial_size(&self) -> usize {
        self.initial_size.clamp(1, self.max_slots.max(1))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Process configuration for the binary, read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub group_name: String,
    pub admin_password: String,
    pub port: u16,
    pub policy: RosterPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            group_name: "My Junta".to_string(),
            admin_password: "admin123".to_string(),
            port: 8080,
            policy: RosterPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(name) = lookup("JUNTA_NAME") {
            config.group_name = name;
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            config.admin_password = password;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse_value("PORT", &port)?;
        }
        if let Some(max) = lookup("JUNTA_MAX_SLOTS") {
            let max: usize = parse_value("JUNTA_MAX_SLOTS", &max)?;
            if max == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "JUNTA_MAX_SLOTS",
                    value: max.to_string(),
                });
            }
            config.policy.max_slots = max;
        }
        if let Some(flag) = lookup("JUNTA_AUTO_EXPAND") {
            config.policy.auto_expand_on_full = parse_flag("JUNTA_AUTO_EXPAND", &flag)?;
        }
        if let Some(size) = lookup("JUNTA_INITIAL_SIZE") {
            config.policy.initial_size = parse_value("JUNTA_INITIAL_SIZE", &size)?;
        }

        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}
