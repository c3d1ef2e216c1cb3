use anyhow::Context;
use rust_rent_estimator::config::default_model_path;
use rust_rent_estimator::diagnostics::{DiagnosticSink, StderrDiagnostics};
use rust_rent_estimator::model::{load_trained_model, PriceModel};
use rust_rent_estimator::pipeline;
use std::io::{Read, Write};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reads one property record from stdin and writes one estimate to stdout.
///
/// A missing or broken model is reported on stderr and the fallback formula
/// is used. Unparseable input is fatal: nothing is written to stdout, one
/// `{"error": ...}` diagnostic is written to stderr and the exit status is 1.
fn main() -> ExitCode {
    // Logs share stderr with diagnostics, so only errors by default
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_rent_estimator=error".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let diagnostics = StderrDiagnostics;
    match run(&diagnostics) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics.report(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(diagnostics: &StderrDiagnostics) -> anyhow::Result<()> {
    let model = load_trained_model(&default_model_path(), diagnostics);

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read property record from stdin")?;

    let response = pipeline::run(
        &input,
        model.as_ref().map(|m| m as &dyn PriceModel),
        diagnostics,
    )?;
    let line = pipeline::render(&response)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line).context("Failed to write estimate to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}
