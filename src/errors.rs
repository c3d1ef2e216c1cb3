use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The input document is not a well-formed JSON object.
    InputParse(String),
    /// A property field could not be coerced to its numeric type.
    FieldCoercion {
        /// Name of the offending field, as it appears in the input.
        field: String,
        /// The raw value that failed to coerce.
        value: String,
    },
    /// The model artifact is missing or cannot be decoded.
    ModelLoad(String),
    /// The regression step failed (shape mismatch, non-finite output).
    Prediction(String),
    /// Bad request error (invalid input).
    BadRequest(String),
    /// Error interacting with the external prediction API.
    ExternalApiError(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputParse(msg) => write!(f, "Invalid input: {}", msg),
            AppError::FieldCoercion { field, value } => {
                write!(f, "Field '{}' has an invalid value: {}", field, value)
            }
            AppError::ModelLoad(msg) => write!(f, "Model load error: {}", msg),
            AppError::Prediction(msg) => write!(f, "Prediction error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Client-side problems (bad body, missing or malformed fields) become 400
    /// with the message echoed back; everything else is logged and hidden
    /// behind a generic message.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InputParse(_) | AppError::FieldCoercion { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "External service error".to_string(),
                )
            }
            AppError::ModelLoad(msg) | AppError::Prediction(msg) | AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process the prediction".to_string(),
                )
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return source.as_ref().clone().into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApiError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InputParse(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

/// Artifact I/O is the only filesystem access; its failures are load errors.
impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::ModelLoad(e.to_string())),
            context: f(),
        })
    }
}
