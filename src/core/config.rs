use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub map: MapConfig,
}

/// Deployment environment, read from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(format!(
                "APP_ENV must be 'development' or 'production', got '{}'",
                other
            )),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: AppEnvironment,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Absent only in development, where the development fixtures are served instead
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub require_ssl: bool,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Choropleth map settings
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// GeoJSON FeatureCollection served at `/china.json`
    pub shape_path: PathBuf,
    pub title: String,
    pub scale_min: f64,
    pub scale_max: f64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        let app = AppConfig::from_env()?;
        let database = DatabaseConfig::from_env(app.environment)?;

        Ok(Config {
            app,
            database,
            swagger: SwaggerConfig::from_env()?,
            map: MapConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let environment = AppEnvironment::parse(&env::var("APP_ENV").unwrap_or_default())?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            environment,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 20;
    const DEFAULT_MIN_CONNECTIONS: u32 = 0;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 2;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env(environment: AppEnvironment) -> Result<Self, String> {
        let url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if url.is_none() {
            if environment.is_production() {
                return Err("DATABASE_URL must be set in production".to_string());
            }
            tracing::warn!("DATABASE_URL is not set; serving development fixtures");
        }

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        let require_ssl = match env::var("DB_REQUIRE_SSL") {
            Ok(raw) => parse_bool(&raw)
                .ok_or_else(|| "DB_REQUIRE_SSL must be true or false".to_string())?,
            Err(_) => environment.is_production(),
        };

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            require_ssl,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Deploy Heatmap API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Province deployment heat-map data".to_string());

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

impl MapConfig {
    const DEFAULT_SHAPE_PATH: &'static str = "public/china.json";
    const DEFAULT_TITLE: &'static str = "DeepSeek中国部署热力图";
    const DEFAULT_SCALE_MIN: f64 = 0.0;
    const DEFAULT_SCALE_MAX: f64 = 10.0;

    pub fn from_env() -> Result<Self, String> {
        let shape_path = env::var("MAP_SHAPE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(Self::DEFAULT_SHAPE_PATH));

        let title = env::var("MAP_TITLE").unwrap_or_else(|_| Self::DEFAULT_TITLE.to_string());

        let scale_min = env::var("MAP_SCALE_MIN")
            .unwrap_or_else(|_| Self::DEFAULT_SCALE_MIN.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_SCALE_MIN must be a valid number".to_string())?;

        let scale_max = env::var("MAP_SCALE_MAX")
            .unwrap_or_else(|_| Self::DEFAULT_SCALE_MAX.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_SCALE_MAX must be a valid number".to_string())?;

        if scale_max <= scale_min {
            return Err("MAP_SCALE_MAX must be greater than MAP_SCALE_MIN".to_string());
        }

        Ok(Self {
            shape_path,
            title,
            scale_min,
            scale_max,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
