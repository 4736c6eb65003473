use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use crate::features::reports::models::{FineSchedule, ViolationType};
use crate::shared::constants::{
    DEFAULT_CHALLAN_DUE_DAYS, DEFAULT_REWARD_PERCENTAGE, DEFAULT_STATION_SEARCH_RADIUS_METERS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub swagger: SwaggerConfig,
    pub reward: RewardConfig,
    pub challan: ChallanConfig,
    pub stations: StationConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Percentage of the challan fine paid out to the reporter
#[derive(Debug, Clone)]
pub struct RewardConfig {
    pub percentage: u32,
}

#[derive(Debug, Clone)]
pub struct ChallanConfig {
    /// Days between issuance and the payment due date
    pub due_days: i64,
    pub fines: FineSchedule,
}

#[derive(Debug, Clone)]
pub struct StationConfig {
    pub search_radius_meters: f64,
    /// JSON file with the station directory; built-in seed when unset
    pub stations_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub app_name: String,
    /// Prefixed to phone numbers that carry no country code
    pub sms_default_country_code: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            // Only error if it's not "file not found" - that's acceptable
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            reward: RewardConfig::from_env()?,
            challan: ChallanConfig::from_env()?,
            stations: StationConfig::from_env()?,
            notifications: NotificationConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_PORT: u16 = 5000;
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| Self::DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "CACHE API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Crowdsourced traffic violation reporting API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl RewardConfig {
    pub fn from_env() -> Result<Self, String> {
        let percentage = env::var("REWARD_PERCENTAGE")
            .unwrap_or_else(|_| DEFAULT_REWARD_PERCENTAGE.to_string())
            .parse::<u32>()
            .map_err(|_| "REWARD_PERCENTAGE must be a non-negative integer".to_string())?;

        Ok(Self { percentage })
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            percentage: DEFAULT_REWARD_PERCENTAGE,
        }
    }
}

impl ChallanConfig {
    pub fn from_env() -> Result<Self, String> {
        let due_days = env::var("CHALLAN_DUE_DAYS")
            .unwrap_or_else(|_| DEFAULT_CHALLAN_DUE_DAYS.to_string())
            .parse::<i64>()
            .map_err(|_| "CHALLAN_DUE_DAYS must be a valid number".to_string())?;

        if due_days < 0 {
            return Err("CHALLAN_DUE_DAYS cannot be negative".to_string());
        }

        // FINE_NO_HELMET, FINE_SIGNAL_JUMP, ...
        let mut overrides = HashMap::new();
        for violation in ViolationType::ALL {
            let key = format!("FINE_{}", violation.as_str().to_uppercase());
            if let Ok(raw) = env::var(&key) {
                let fine = raw
                    .parse::<i64>()
                    .map_err(|_| format!("{} must be a valid number", key))?;
                if fine < 0 {
                    return Err(format!("{} cannot be negative", key));
                }
                overrides.insert(violation, fine);
            }
        }

        Ok(Self {
            due_days,
            fines: FineSchedule::new(overrides),
        })
    }
}

impl Default for ChallanConfig {
    fn default() -> Self {
        Self {
            due_days: DEFAULT_CHALLAN_DUE_DAYS,
            fines: FineSchedule::default(),
        }
    }
}

impl StationConfig {
    pub fn from_env() -> Result<Self, String> {
        let search_radius_meters = env::var("STATION_SEARCH_RADIUS_METERS")
            .unwrap_or_else(|_| DEFAULT_STATION_SEARCH_RADIUS_METERS.to_string())
            .parse::<f64>()
            .map_err(|_| "STATION_SEARCH_RADIUS_METERS must be a valid number".to_string())?;

        if !search_radius_meters.is_finite() || search_radius_meters <= 0.0 {
            return Err("STATION_SEARCH_RADIUS_METERS must be positive".to_string());
        }

        let stations_file = env::var("STATIONS_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            search_radius_meters,
            stations_file,
        })
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: DEFAULT_STATION_SEARCH_RADIUS_METERS,
            stations_file: None,
        }
    }
}

impl NotificationConfig {
    const DEFAULT_APP_NAME: &'static str = "CACHE";
    const DEFAULT_SMS_COUNTRY_CODE: &'static str = "+91";

    pub fn from_env() -> Result<Self, String> {
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| Self::DEFAULT_APP_NAME.to_string());

        let sms_default_country_code = env::var("SMS_DEFAULT_COUNTRY_CODE")
            .unwrap_or_else(|_| Self::DEFAULT_SMS_COUNTRY_CODE.to_string());

        if !sms_default_country_code.starts_with('+') {
            return Err("SMS_DEFAULT_COUNTRY_CODE must start with '+'".to_string());
        }

        Ok(Self {
            app_name,
            sms_default_country_code,
        })
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            app_name: Self::DEFAULT_APP_NAME.to_string(),
            sms_default_country_code: Self::DEFAULT_SMS_COUNTRY_CODE.to_string(),
        }
    }
}
