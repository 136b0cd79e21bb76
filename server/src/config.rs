use serde::Deserialize;

/// Process settings, read from environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_version")]
    pub app_version: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Not used by the in-memory store; reserved for a relational backend.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_mysql_host")]
    pub mysql_host: String,
    #[serde(default = "default_mysql_port")]
    pub mysql_port: u16,
    #[serde(default = "default_mysql_user")]
    pub mysql_user: String,
    #[serde(default)]
    pub mysql_password: String,
    #[serde(default = "default_mysql_database")]
    pub mysql_database: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(config::Environment::default())
    }

    pub fn from_source(env: config::Environment) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(env)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection URL for a relational backend. `DATABASE_URL` wins over the
    /// individual MySQL settings.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "mysql://{}:{}@{}:{}/{}",
                self.mysql_user,
                self.mysql_password,
                self.mysql_host,
                self.mysql_port,
                self.mysql_database
            ),
        }
    }

    /// Same as [`Config::database_url`] with the password masked, for logs.
    pub fn redacted_database_url(&self) -> String {
        match &self.database_url {
            Some(_) => "<DATABASE_URL>".to_string(),
            None => format!(
                "mysql://{}:***@{}:{}/{}",
                self.mysql_user, self.mysql_host, self.mysql_port, self.mysql_database
            ),
        }
    }

    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_version: default_app_version(),
            host: default_host(),
            port: default_port(),
            debug: false,
            environment: default_environment(),
            database_url: None,
            mysql_host: default_mysql_host(),
            mysql_port: default_mysql_port(),
            mysql_user: default_mysql_user(),
            mysql_password: String::new(),
            mysql_database: default_mysql_database(),
        }
    }
}

fn default_app_name() -> String {
    "ToDo API".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_mysql_host() -> String {
    "localhost".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_mysql_user() -> String {
    "root".to_string()
}

fn default_mysql_database() -> String {
    "todo_db".to_string()
}
