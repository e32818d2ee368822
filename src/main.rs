use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rgs_api_tester::output::render;
use rgs_api_tester::{ApiTester, HttpFetch, Opts, TesterConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
	dotenv().ok();

	// logs go to stderr so they never interleave with the report on stdout
	let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::new(env_filter))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.try_init()
		.ok();

	let opts = Opts::parse();
	let config = match TesterConfig::from_opts(opts) {
		Ok(config) => config,
		Err(err) => {
			eprintln!("Error: {}", err);
			return Ok(ExitCode::from(err.exit_code()));
		}
	};
	tracing::info!(base = %config.base_url, mp = %config.monitoring_point, checks = ?config.checks, "starting run");

	let fetch = HttpFetch::new(&config.transport, config.credentials.clone())?;
	let tester = ApiTester::new(&config, fetch);
	let report = tester.run_all(&config.checks).await;

	println!("{}", render(&report, config.format)?.trim_end());
	Ok(if report.has_errors() { ExitCode::from(1) } else { ExitCode::SUCCESS })
}
