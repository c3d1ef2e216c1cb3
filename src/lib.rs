//! Rent Estimator Library
//!
//! Estimates the monthly rent of a property, compares it with a simulated
//! market and ranks improvements that would raise it. The same pipeline backs
//! the one-shot command-line estimator and the HTTP front end.
//!
//! # Modules
//!
//! - `property`: Property record and field coercion.
//! - `features`: Feature vector for the trained regression.
//! - `model`: Trained model loading and the `PriceModel` capability.
//! - `predictor`: Regression and fallback-formula estimators.
//! - `market`: Simulated market comparison.
//! - `suggestions`: Ranked optimization suggestions.
//! - `pipeline`: One record in, one response document out.
//! - `models`: Response documents.
//! - `diagnostics`: Non-fatal diagnostic channel.
//! - `errors`: Error handling types.
//! - `config`: Configuration management.
//! - `external_api`: External prediction API client.
//! - `circuit_breaker`: Circuit breaker for the external API.
//! - `handlers`: HTTP request handlers.

pub mod circuit_breaker;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod external_api;
pub mod features;
pub mod handlers;
pub mod market;
pub mod model;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod property;
pub mod suggestions;
