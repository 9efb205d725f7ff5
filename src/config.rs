use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use thiserror::Error;
use tracing::{info, warn};

use crate::model::PalletPreset;
use crate::solver::CalculatorConfig;
use crate::units::LengthUnit;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub calculator: CalculatorSettings,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            calculator: CalculatorSettings::from_env(),
        }
    }
}

/// Why an environment value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("could not parse '{raw}': {reason}")]
    Unparsable { raw: String, reason: String },
    #[error("'{raw}' {hint}")]
    OutOfRange { raw: String, hint: &'static str },
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
    docs_enabled: bool,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "PALLET_FIT_API_HOST";
    const PORT_VAR: &'static str = "PALLET_FIT_API_PORT";
    const DOCS_VAR: &'static str = "PALLET_FIT_API_DOCS";

    fn from_env() -> Self {
        let default_ip = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        let (bind_ip, display_host) = match env_string(Self::HOST_VAR) {
            Some(raw) => match raw.parse::<IpAddr>() {
                Ok(ip) => (ip, raw),
                Err(err) => {
                    warn!(
                        "Could not parse {} ('{}'): {}. Using {}.",
                        Self::HOST_VAR,
                        raw,
                        err,
                        Self::DEFAULT_HOST
                    );
                    (default_ip, Self::DEFAULT_HOST.to_string())
                }
            },
            None => (default_ip, Self::DEFAULT_HOST.to_string()),
        };

        let port = env_string(Self::PORT_VAR)
            .and_then(|raw| report(Self::PORT_VAR, parse_port(&raw), Self::DEFAULT_PORT))
            .unwrap_or(Self::DEFAULT_PORT);

        let docs_enabled = env_string(Self::DOCS_VAR)
            .and_then(|raw| report(Self::DOCS_VAR, parse_bool(&raw), true))
            .unwrap_or(true);

        Self {
            bind_ip,
            display_host,
            port,
            docs_enabled,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Whether `/docs` and `/docs/openapi.json` are served.
    pub fn docs_enabled(&self) -> bool {
        self.docs_enabled
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }

    /// Checks whether the hostname matches the default value.
    pub fn uses_default_host(&self) -> bool {
        self.display_host == Self::DEFAULT_HOST
    }
}

/// Request defaults for the calculator.
#[derive(Clone, Debug, Default)]
pub struct CalculatorSettings {
    calculator: CalculatorConfig,
}

impl CalculatorSettings {
    const PRESET_VAR: &'static str = "PALLET_FIT_DEFAULT_PRESET";
    const BASE_HEIGHT_VAR: &'static str = "PALLET_FIT_DEFAULT_BASE_HEIGHT";
    const UNIT_VAR: &'static str = "PALLET_FIT_DEFAULT_UNIT";

    fn from_env() -> Self {
        let preset = env_string(Self::PRESET_VAR)
            .and_then(|raw| {
                let parsed = raw.parse::<PalletPreset>().map_err(|err| {
                    ConfigError::Unparsable {
                        raw: raw.clone(),
                        reason: err.to_string(),
                    }
                });
                report(Self::PRESET_VAR, parsed, CalculatorConfig::DEFAULT_PRESET.name())
            })
            .unwrap_or(CalculatorConfig::DEFAULT_PRESET);

        let base_height = env_string(Self::BASE_HEIGHT_VAR)
            .and_then(|raw| {
                let parsed = parse_f64_in(&raw, |value| value >= 0.0, "must be 0 or greater");
                report(
                    Self::BASE_HEIGHT_VAR,
                    parsed,
                    CalculatorConfig::DEFAULT_BASE_HEIGHT,
                )
            })
            .unwrap_or(CalculatorConfig::DEFAULT_BASE_HEIGHT);
        if (base_height - CalculatorConfig::DEFAULT_BASE_HEIGHT).abs() > 1e-9 {
            info!(
                "Pallet base height default changed ({} = {}).",
                Self::BASE_HEIGHT_VAR,
                base_height
            );
        }

        let unit = env_string(Self::UNIT_VAR)
            .and_then(|raw| {
                let parsed = raw.parse::<LengthUnit>().map_err(|err| ConfigError::Unparsable {
                    raw: raw.clone(),
                    reason: err.to_string(),
                });
                report(Self::UNIT_VAR, parsed, CalculatorConfig::DEFAULT_UNIT)
            })
            .unwrap_or(CalculatorConfig::DEFAULT_UNIT);

        let calculator = CalculatorConfig::builder()
            .default_preset(preset)
            .default_base_height(base_height)
            .default_unit(unit)
            .build();

        Self { calculator }
    }

    /// Returns the configured CalculatorConfig.
    pub fn calculator_config(&self) -> CalculatorConfig {
        self.calculator
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!("Access to {} failed: {}. Using default value.", name, err);
            None
        }
    }
}

/// Logs a rejected value and turns the result into an option.
fn report<T>(
    var_name: &str,
    parsed: Result<T, ConfigError>,
    default: impl std::fmt::Display,
) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{} {}. Using {}.", var_name, err, default);
            None
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ConfigError::Unparsable {
            raw: raw.to_string(),
            reason: "not a boolean value".to_string(),
        }),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(0) => Err(ConfigError::OutOfRange {
            raw: raw.to_string(),
            hint: "must not be 0",
        }),
        Ok(port) => Ok(port),
        Err(err) => Err(ConfigError::Unparsable {
            raw: raw.to_string(),
            reason: err.to_string(),
        }),
    }
}

fn parse_f64_in(
    raw: &str,
    validator: impl Fn(f64) -> bool,
    hint: &'static str,
) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| ConfigError::Unparsable {
            raw: raw.to_string(),
            reason: err.to_string(),
        })?;
    if value.is_finite() && validator(value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            raw: raw.to_string(),
            hint,
        })
    }
}
