use std::{fmt, path::PathBuf};

use clap::{Parser, Subcommand};
use lloggs::{LoggingArgs, PreArgs, WorkerGuard};
use miette::{Result, miette};
use tracing::debug;

use crate::argument::source::parse_error;

/// Encrypt, decrypt, sign and verify data, and look up identity cards.
#[derive(Debug, Clone, Parser)]
#[command(
	name = "virgil",
	author,
	version,
	after_help = "Commands:\n  keygen       Generate a private key\n  key2pub      Extract the public key of a private key\n  encrypt      Encrypt data for recipients\n  decrypt      Decrypt data\n  sign         Sign data\n  verify       Verify a signature\n  card-get     Fetch cards by id\n  card-search  Search cards by identity\n  card-info    Show properties of saved cards\n  config       Show or change the app config\n\nSee 'virgil <command> --help' for the options of a command."
)]
pub struct Args {
	#[command(flatten)]
	pub logging: LoggingArgs,

	/// Read argument defaults from this YAML file.
	///
	/// Keys are argument names, like `private_key_password` or `recipient`. Without this option,
	/// `defaults.yml` in the config directory is used when it exists.
	#[arg(long, env = "VIRGIL_CONFIG", value_name = "PATH")]
	pub config: Option<PathBuf>,

	#[command(flatten)]
	pub common: CommonArgs,

	/// The command, followed by its arguments.
	#[command(subcommand)]
	pub command: Option<External>,
}

/// Everything after the command name, kept for the command's own grammar.
#[derive(Clone, Subcommand)]
pub enum External {
	#[command(external_subcommand)]
	Run(Vec<String>),
}

impl External {
	pub fn name(&self) -> &str {
		match self {
			Self::Run(argv) => argv.first().map(String::as_str).unwrap_or_default(),
		}
	}
}

/// Command arguments may hold passwords; only the command name is shown.
impl fmt::Debug for External {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Run(argv) => f
				.debug_struct("Run")
				.field("command", &self.name())
				.field("arguments", &argv.len().saturating_sub(1))
				.finish(),
		}
	}
}

/// Options every command accepts.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CommonArgs {
	/// Prompt for missing arguments.
	#[arg(short = 'I', long)]
	pub interactive: bool,

	/// Don't report progress.
	#[arg(short, long)]
	pub quiet: bool,

	/// Access token for the card service.
	#[arg(long, value_name = "TOKEN")]
	pub application_token: Option<String>,
}

pub fn get_args() -> Result<(Args, WorkerGuard)> {
	let log_guard = PreArgs::parse().setup().map_err(|err| miette!("{err}"))?;

	debug!("parsing arguments");
	let args = Args::try_parse().map_err(parse_error)?;

	let log_guard = match log_guard {
		Some(g) => g,
		None => args
			.logging
			.setup(|v| match v {
				0 => "info",
				1 => "info,virgil_cli=debug",
				2 => "debug",
				3 => "debug,virgil_cli=trace",
				_ => "trace",
			})
			.map_err(|err| miette!("{err}"))?,
	};

	debug!(
		config = ?args.config,
		command = ?args.command,
		interactive = args.common.interactive,
		quiet = args.common.quiet,
		"got arguments"
	);
	Ok((args, log_guard))
}

#[test]
fn command_arguments_stay_out_of_debug() {
	let command = External::Run(vec!["keygen".into(), "-p".into(), "hunter2".into()]);
	assert_eq!(command.name(), "keygen");
	let shown = format!("{command:?}");
	assert!(shown.contains("keygen"));
	assert!(!shown.contains("hunter2"));
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	Args::command().debug_assert()
}
