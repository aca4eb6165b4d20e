use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};
use xmlcon_updater::{run, Config};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configure dirs ───────────────────────────────────────────
    let config = Config::default();
    info!(
        work_dir = %config.work_dir.display(),
        output_dir = %config.output_dir.display(),
        "configured"
    );

    // ─── 3) patch every certificate ──────────────────────────────────
    let report = run(&config)?;
    if let Ok(json) = serde_json::to_string(&report) {
        debug!(report = %json, "run report");
    }

    // ─── 4) summary ──────────────────────────────────────────────────
    // failures were already logged one by one inside run()
    info!(
        written = report.written.len(),
        failed = report.failed.len(),
        "summary"
    );
    if !report.is_success() {
        anyhow::bail!(
            "{} of {} certificates failed",
            report.failed.len(),
            report.failed.len() + report.written.len()
        );
    }

    info!("all done");
    Ok(())
}
