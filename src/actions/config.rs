use clap::Parser;
use miette::{IntoDiagnostic as _, Result, miette};
use tracing::debug;

use super::Context;
use crate::{args::CommonArgs, config::AppConfig, model::FileDataSink};

/// Show or change the app config.
///
/// The app config holds the access token and the addresses of the services.
/// Without `--set`, prints the config with the token masked.
#[derive(Debug, Clone, Parser)]
pub struct ConfigArgs {
	/// Change a setting, as KEY=VALUE.
	///
	/// Keys: token, identity-service, public-key-service, private-key-service.
	#[arg(long, value_name = "KEY=VALUE")]
	pub set: Vec<String>,

	/// Only print where the config file is.
	#[arg(long)]
	pub path: bool,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let path = ctx
		.config_path
		.clone()
		.ok_or_else(|| miette!("no config directory on this system"))?;
	let stdout = FileDataSink::Stdout;

	if ctx.io.is_path_only()? {
		return Ok(stdout
			.write(format!("{}\n", path.display()).as_bytes())
			.await?);
	}

	let settings = ctx.io.get_settings()?;
	if settings.is_empty() {
		let shown = masked(&ctx.config);
		let text = toml::to_string_pretty(&shown).into_diagnostic()?;
		return Ok(stdout
			.write(format!("# {}\n{text}", path.display()).as_bytes())
			.await?);
	}

	for setting in &settings {
		debug!(key = %setting.key, "changing setting");
		ctx.config.set(setting)?;
	}
	ctx.config.save(&path).await?;
	ctx.notice(&format!("saved {} settings to {}", settings.len(), path.display()))
}

fn masked(config: &AppConfig) -> AppConfig {
	let mut shown = config.clone();
	if let Some(token) = &mut shown.access.token {
		*token = mask(token);
	}
	shown
}

/// Keeps the first four characters.
fn mask(token: &str) -> String {
	let shown: String = token.chars().take(4).collect();
	format!("{shown}****")
}


#[test]
fn verify_cli() {
	use clap::CommandFactory;
	ConfigArgs::command().debug_assert()
}
