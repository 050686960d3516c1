use std::path::PathBuf;

use clap::Parser;
use miette::{Result, WrapErr as _};

use super::Context;
use crate::{args::CommonArgs, crypto, error::Error};

/// Sign data with an ed25519 private key.
///
/// The signature is written base64-encoded.
#[derive(Debug, Clone, Parser)]
pub struct SignArgs {
	/// Data to sign. Reads stdin when absent.
	#[arg(short, long, value_name = "PATH")]
	pub input: Option<PathBuf>,

	/// Write the signature to this file instead of stdout.
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,

	/// Private key to sign with, as a file or literally.
	#[arg(short = 'k', long, value_name = "KEY")]
	pub private_key: Option<String>,

	/// Password of the private key, if it has one.
	#[arg(short = 'p', long, value_name = "PASSWORD")]
	pub private_key_password: Option<String>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let input = ctx.io.get_input()?;
	let output = ctx.io.get_output()?;
	let stored = ctx.io.get_private_key()?;
	let password = if stored.is_encrypted() {
		Some(ctx.io.get_key_password()?)
	} else {
		None
	};

	let key = stored
		.unlock(password.as_ref())
		.wrap_err("reading the private key")?;
	let signing = key.signing_key().ok_or_else(|| {
		Error::Key(format!("{} keys can not sign, use an ed25519 key", key.algorithm()))
	})?;

	let data = input.read_all().await?;
	let signature = crypto::sign(&data, signing);
	output.write(format!("{signature}\n").as_bytes()).await?;

	ctx.notice("signed")
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	SignArgs::command().debug_assert()
}
