//! Non-fatal diagnostics raised while loading or running the model.
//!
//! On the command line each diagnostic is one JSON object with a single
//! `error` field, written to stderr. The HTTP front end only logs them.

use serde_json::json;
use std::io::Write;
use std::sync::Mutex;

/// Receives non-fatal problems that were absorbed by a fallback.
pub trait DiagnosticSink {
    fn report(&self, message: &str);
}

/// Writes `{"error": "..."}` lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrDiagnostics;

impl DiagnosticSink for StderrDiagnostics {
    fn report(&self, message: &str) {
        tracing::warn!("{}", message);
        let line = json!({ "error": message });
        let mut stderr = std::io::stderr().lock();
        if let Err(e) = writeln!(stderr, "{}", line) {
            tracing::error!("Failed to write diagnostic to stderr: {}", e);
        }
    }
}

/// Forwards diagnostics to the tracing subscriber only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Keeps diagnostics in memory so callers can inspect them afterwards.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn report(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
