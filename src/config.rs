use std::path::PathBuf;
use std::time::Duration;

/// File name of the trained model artifact.
pub const MODEL_FILE_NAME: &str = "modelo_3_regressao_linear.json";

const DEFAULT_EXTERNAL_API_URL: &str = "http://127.0.0.1:8000/predict";
const DEFAULT_EXTERNAL_API_TIMEOUT_MS: u64 = 5000;

/// Location of the model artifact: next to the running executable.
///
/// Falls back to the bare file name (current directory) when the executable
/// path cannot be determined.
pub fn default_model_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(MODEL_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(MODEL_FILE_NAME))
}

/// Configuration for the HTTP front end.
///
/// The command-line estimator takes no configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub model_path: PathBuf,
    /// External prediction API, `None` when disabled.
    pub external_api_url: Option<String>,
    pub external_api_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            model_path: std::env::var("MODEL_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_model_path),
            external_api_url: match std::env::var("EXTERNAL_API_URL") {
                Err(_) => Some(DEFAULT_EXTERNAL_API_URL.to_string()),
                Ok(url) if url.trim().is_empty() => None,
                Ok(url) => {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("EXTERNAL_API_URL must start with http:// or https://");
                    }
                    Some(url)
                }
            },
            external_api_timeout: std::env::var("EXTERNAL_API_TIMEOUT_MS")
                .unwrap_or_else(|_| DEFAULT_EXTERNAL_API_TIMEOUT_MS.to_string())
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| {
                    anyhow::anyhow!("EXTERNAL_API_TIMEOUT_MS must be a number of milliseconds")
                })?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Model path: {}", config.model_path.display());
        match &config.external_api_url {
            Some(url) => tracing::info!(
                "External prediction API configured: {} (timeout {:?})",
                url,
                config.external_api_timeout
            ),
            None => tracing::info!("External prediction API disabled"),
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
