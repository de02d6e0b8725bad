use serde::Deserialize;

/// Complete Hearth configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on (HEARTH_PORT overrides)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_port() -> u16 {
    3000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Seconds between simulation ticks on each connection
    #[serde(default = "default_tick_interval")]
    pub tick_interval_seconds: u64,
}

fn default_tick_interval() -> u64 {
    2
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_seconds: default_tick_interval(),
        }
    }
}

/// Analytics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Maximum age of retained history samples (hours)
    #[serde(default = "default_retention_hours")]
    pub retention_hours: i64,
}

fn default_retention_hours() -> i64 {
    24
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            retention_hours: default_retention_hours(),
        }
    }
}

impl Default for HearthConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl HearthConfig {
    /// Apply environment overrides (deployment knobs only).
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("HEARTH_PORT") {
            if let Ok(port) = v.parse::<u16>() {
                self.server.port = port;
            }
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<HearthConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: HearthConfig = toml::from_str(&contents)?;
    Ok(config)
}
