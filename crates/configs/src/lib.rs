use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

/// Which document store backs the collections.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Mongo,
    Memory,
}

impl StoreKind {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreKind::Mongo),
            "memory" => Ok(StoreKind::Memory),
            other => Err(anyhow!("unknown store kind `{other}` (expected mongo or memory)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub store: StoreKind,
    /// Full connection string; when set, `user`/`password`/`cluster` are ignored.
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_cluster")]
    pub cluster: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_services_collection")]
    pub services_collection: String,
    #[serde(default = "default_reviews_collection")]
    pub reviews_collection: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            uri: String::new(),
            user: String::new(),
            password: String::new(),
            cluster: default_cluster(),
            app_name: default_app_name(),
            name: default_db_name(),
            services_collection: default_services_collection(),
            reviews_collection: default_reviews_collection(),
            connect_timeout_secs: default_connect_timeout(),
            connect_retries: default_connect_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
fn default_cluster() -> String { "imran.chugnik.mongodb.net".into() }
fn default_app_name() -> String { "Imran".into() }
fn default_db_name() -> String { "serviceSpot".into() }
fn default_services_collection() -> String { "services".into() }
fn default_reviews_collection() -> String { "reviews".into() }
fn default_connect_timeout() -> u64 { 10 }
fn default_connect_retries() -> u32 { 3 }
fn default_retry_backoff() -> u64 { 1000 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` when present (defaults otherwise), apply environment
    /// overrides and validate the result.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if Path::new(&path).exists() { load_from_file(&path)? } else { AppConfig::default() };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay environment variables. `lookup` abstracts `std::env::var` so the
    /// precedence rules can be exercised without touching the process env.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("PORT must be a number in 1..=65535, got `{port}`"))?;
        }
        if let Some(threads) = get("TOKIO_WORKER_THREADS").and_then(|v| v.trim().parse().ok()) {
            self.server.worker_threads = Some(threads);
        }

        if let Some(store) = get("STORE") {
            self.database.store = StoreKind::parse(&store)?;
        }
        if let Some(uri) = get("MONGODB_URI") {
            self.database.uri = uri;
        }
        if let Some(user) = get("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = get("DB_PASS") {
            self.database.password = password;
        }
        if let Some(name) = get("DB_NAME") {
            self.database.name = name;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl DatabaseConfig {
    /// Connection string without credentials. Credentials travel separately
    /// (see [`DatabaseConfig::credentials`]) so they never need URL escaping.
    pub fn connection_uri(&self) -> String {
        if !self.uri.trim().is_empty() {
            return self.uri.clone();
        }
        format!(
            "mongodb+srv://{}/?retryWrites=true&w=majority&appName={}",
            self.cluster, self.app_name
        )
    }

    /// `(user, password)` when the connection string is assembled from parts.
    pub fn credentials(&self) -> Option<(String, String)> {
        if !self.uri.trim().is_empty() || self.user.is_empty() {
            return None;
        }
        Some((self.user.clone(), self.password.clone()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow!("database.name must not be empty"));
        }
        if self.services_collection.trim().is_empty() || self.reviews_collection.trim().is_empty() {
            return Err(anyhow!("collection names must not be empty"));
        }
        if self.store == StoreKind::Memory {
            return Ok(());
        }
        if self.uri.trim().is_empty() {
            if self.user.trim().is_empty() || self.password.is_empty() {
                return Err(anyhow!(
                    "database credentials missing; set DB_USER and DB_PASS or provide MONGODB_URI"
                ));
            }
            if self.cluster.trim().is_empty() {
                return Err(anyhow!("database.cluster must not be empty"));
            }
        } else {
            let lower = self.uri.to_lowercase();
            if !(lower.starts_with("mongodb://") || lower.starts_with("mongodb+srv://")) {
                return Err(anyhow!("database.uri must start with mongodb:// or mongodb+srv://"));
            }
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("database.connect_timeout_secs must be positive"));
        }
        Ok(())
    }
}
