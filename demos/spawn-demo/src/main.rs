use anyhow::Context;
use spawn_layer::{LaunchRequest, LauncherConfig, PlatformLauncher, ProcessLauncher};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: spawn-demo [--no-exec-report] [--legacy] <program> [args...]";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let mut config = LauncherConfig::default();
    let mut cli = std::env::args().skip(1).peekable();
    while let Some(flag) = cli.next_if(|arg| arg.starts_with("--")) {
        match flag.as_str() {
            "--no-exec-report" => config.report_exec_failure = false,
            "--legacy" => config = LauncherConfig::legacy(),
            other => anyhow::bail!("unknown flag {other}\n{USAGE}"),
        }
    }
    config.validate()?;

    let program = cli.next().context(USAGE)?;
    // The child sees the program name as its first argument
    let request = LaunchRequest::builder()
        .program(program.as_str())
        .args(std::iter::once(program.clone()).chain(cli))
        .build()?;

    tracing::info!(platform = PlatformLauncher::platform_name(), "Launching {program}");
    let launched = PlatformLauncher::new(config)
        .spawn(&request)
        .with_context(|| format!("Failed to launch {program}"))?;

    println!("{}", launched.pid());
    Ok(())
}
