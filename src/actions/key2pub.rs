use std::path::PathBuf;

use clap::Parser;
use miette::{Result, WrapErr as _};

use super::Context;
use crate::{args::CommonArgs, model::PrivateKey};

/// Extract the public key of a private key.
#[derive(Debug, Clone, Parser)]
pub struct Key2pubArgs {
	/// Private key to read. Reads stdin when absent.
	#[arg(short, long, value_name = "PATH")]
	pub input: Option<PathBuf>,

	/// Password of the private key, if it has one.
	#[arg(short = 'p', long, value_name = "PASSWORD")]
	pub private_key_password: Option<String>,

	/// Write the public key to this file instead of stdout.
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let input = ctx.io.get_input()?;
	let output = ctx.io.get_output()?;

	let stored = PrivateKey::from_bytes(input.read_all().await?)?;
	let password = if stored.is_encrypted() {
		Some(ctx.io.get_key_password()?)
	} else {
		None
	};

	let public = stored
		.unlock(password.as_ref())
		.wrap_err("reading the private key")?
		.public();
	output.write(public.to_text()?.as_bytes()).await?;

	ctx.notice(&format!("wrote {} public key", public.algorithm()))
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	Key2pubArgs::command().debug_assert()
}
