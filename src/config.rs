use crate::ml::PricingPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Rotation thresholds and price adjustments used by `/pricing`
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Daily rotation at or below which a product counts as a slow mover
    #[validate(custom = "validate_fraction")]
    #[serde(default = "default_rotation_low")]
    pub rotation_low: f64,

    /// Daily rotation at or above which a product counts as a fast mover
    #[validate(custom = "validate_non_negative")]
    #[serde(default = "default_rotation_high")]
    pub rotation_high: f64,

    /// Fractional increase for fast movers
    #[validate(custom = "validate_fraction")]
    #[serde(default = "default_adjust_up")]
    pub adjust_up: f64,

    /// Fractional decrease for slow movers
    #[validate(custom = "validate_fraction")]
    #[serde(default = "default_adjust_down")]
    pub adjust_down: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rotation_low: default_rotation_low(),
            rotation_high: default_rotation_high(),
            adjust_up: default_adjust_up(),
            adjust_down: default_adjust_down(),
        }
    }
}

impl PricingConfig {
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            rotation_low: self.rotation_low,
            rotation_high: self.rotation_high,
            adjust_up: self.adjust_up,
            adjust_down: self.adjust_down,
        }
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[validate(length(min = 1))]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_size")]
    #[validate(custom = "validate_max_body_size")]
    pub max_body_size: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    #[validate(custom = "validate_request_timeout")]
    pub request_timeout_secs: u64,

    /// Longest forecast or replenishment horizon accepted, unlimited when unset
    #[serde(default)]
    pub max_horizon_days: Option<i64>,

    /// Most series, products or points accepted in one request, unlimited when unset
    #[serde(default)]
    pub max_series_items: Option<usize>,

    /// Pricing policy
    #[serde(default)]
    #[validate]
    pub pricing: PricingConfig,
}

impl AppConfig {
    /// Creates a new AppConfig with required fields and defaults for everything else
    pub fn new(host: String, port: u16, environment: String) -> Self {
        Self {
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            max_body_size: default_max_body_size(),
            request_timeout_secs: default_request_timeout_secs(),
            max_horizon_days: None,
            max_series_items: None,
            pricing: PricingConfig::default(),
        }
    }

    /// Checks if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Checks if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Non-empty, trimmed CORS origins
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true if explicit CORS origins are configured
    pub fn has_cors_allowed_origins(&self) -> bool {
        !self.cors_origins().is_empty()
    }

    /// Whether we should fall back to permissive CORS
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        self.pricing.policy()
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.should_allow_permissive_cors() && !self.has_cors_allowed_origins() {
            let mut err = ValidationError::new("cors_allowed_origins_required");
            err.message = Some(
                "Set APP__CORS_ALLOWED_ORIGINS for non-development environments or explicitly opt-in via APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
            );
            errors.add("cors_allowed_origins", err);
        }

        if matches!(self.max_horizon_days, Some(days) if days < 1) {
            let mut err = ValidationError::new("max_horizon_days");
            err.message = Some("max_horizon_days must be at least 1 when set".into());
            errors.add("max_horizon_days", err);
        }

        if self.max_series_items == Some(0) {
            let mut err = ValidationError::new("max_series_items");
            err.message = Some("max_series_items must be greater than 0 when set".into());
            errors.add("max_series_items", err);
        }

        if self.pricing.rotation_low >= self.pricing.rotation_high {
            let mut err = ValidationError::new("rotation_thresholds");
            err.message = Some("pricing.rotation_low must be lower than pricing.rotation_high".into());
            errors.add("pricing", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_rotation_low() -> f64 {
    crate::ml::pricing::DEFAULT_ROTATION_LOW
}

fn default_rotation_high() -> f64 {
    crate::ml::pricing::DEFAULT_ROTATION_HIGH
}

fn default_adjust_up() -> f64 {
    crate::ml::pricing::DEFAULT_ADJUST_UP
}

fn default_adjust_down() -> f64 {
    crate::ml::pricing::DEFAULT_ADJUST_DOWN
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_fraction(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 || value > 1.0 {
        let mut err = ValidationError::new("fraction");
        err.message = Some("must be a finite value between 0.0 and 1.0".into());
        return Err(err);
    }
    Ok(())
}

fn validate_non_negative(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must be a finite value of at least 0.0".into());
        return Err(err);
    }
    Ok(())
}

fn validate_max_body_size(size: usize) -> Result<(), ValidationError> {
    if size < 1024 {
        let mut err = ValidationError::new("max_body_size");
        err.message = Some("max_body_size must be at least 1024 bytes".into());
        return Err(err);
    }
    Ok(())
}

fn validate_request_timeout(secs: u64) -> Result<(), ValidationError> {
    if secs == 0 || secs > 600 {
        let mut err = ValidationError::new("request_timeout_secs");
        err.message = Some("request_timeout_secs must be between 1 and 600".into());
        return Err(err);
    }
    Ok(())
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("stock_insights_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Docker config (config/docker.toml) if DOCKER env var is set
/// 5. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    load_config_from(Path::new(CONFIG_DIR), &run_env, env::var("DOCKER").is_ok())
}

/// Loads configuration from `config_dir` for the `run_env` profile
pub fn load_config_from(
    config_dir: &Path,
    run_env: &str,
    docker: bool,
) -> Result<AppConfig, AppConfigError> {
    let mut builder = Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(run_env)).required(false));

    if docker {
        info!("Docker environment detected");
        builder = builder.add_source(File::from(config_dir.join("docker")).required(false));
    }

    let config = builder
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration consistency validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
