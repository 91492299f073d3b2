use rust_decimal::Decimal;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub statements: StatementConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = StatementConfig::default();
        let owner_share_percent =
            decimal_var("STATEMENT_OWNER_SHARE")?.unwrap_or(defaults.owner_share_percent);
        if owner_share_percent <= Decimal::ZERO || owner_share_percent > Decimal::ONE_HUNDRED {
            return Err(ConfigError::InvalidOwnerShare);
        }
        let default_driver_rate =
            decimal_var("STATEMENT_DRIVER_RATE")?.unwrap_or(defaults.default_driver_rate);
        let company_name = env::var("STATEMENT_COMPANY_NAME")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.company_name);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            statements: StatementConfig {
                owner_share_percent,
                default_driver_rate,
                company_name,
                fixed_deductions: defaults.fixed_deductions,
            },
        })
    }
}

fn decimal_var(key: &'static str) -> Result<Option<Decimal>, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|_| ConfigError::InvalidDecimal { key }),
        _ => Ok(None),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// A deduction charged on every settlement statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedDeduction {
    pub description: String,
    pub amount: Decimal,
}

/// Compensation defaults and fixed charges used when generating statements.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementConfig {
    /// Percent of gross revenue paid to an owner when the sheet names no share.
    pub owner_share_percent: Decimal,
    /// Per-mile rate for drivers with no persisted or sheet rate.
    pub default_driver_rate: Decimal,
    pub company_name: String,
    pub fixed_deductions: Vec<FixedDeduction>,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            owner_share_percent: Decimal::new(88, 0),
            default_driver_rate: Decimal::new(65, 2),
            company_name: "ARBA EXPRESS".to_string(),
            fixed_deductions: vec![
                FixedDeduction {
                    description: "ELD (weekly)".to_string(),
                    amount: Decimal::new(11000, 2),
                },
                FixedDeduction {
                    description: "Cargo insurance (weekly)".to_string(),
                    amount: Decimal::new(40000, 2),
                },
                FixedDeduction {
                    description: "Trailer (weekly)".to_string(),
                    amount: Decimal::new(20000, 2),
                },
            ],
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDecimal { key: &'static str },
    InvalidOwnerShare,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDecimal { key } => {
                write!(f, "{key} must be a decimal number")
            }
            ConfigError::InvalidOwnerShare => {
                write!(f, "STATEMENT_OWNER_SHARE must be above 0 and at most 100")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidDecimal { .. }
            | ConfigError::InvalidOwnerShare => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
