use std::path::PathBuf;

use clap::Parser;
use miette::Result;
use tracing::debug;

use super::Context;
use crate::{
	args::CommonArgs,
	model::{PrivateKey, SecretKey},
};

/// Generate a private key.
///
/// The key is protected with a password unless `--no-password` is given. Use
/// x25519 keys to encrypt and decrypt, ed25519 keys to sign and verify.
#[derive(Debug, Clone, Parser)]
pub struct KeygenArgs {
	/// Key algorithm: x25519 or ed25519.
	#[arg(short, long, value_name = "ALG")]
	pub algorithm: Option<String>,

	/// Password protecting the private key.
	#[arg(short = 'p', long, value_name = "PASSWORD")]
	pub private_key_password: Option<String>,

	/// Store the private key without a password.
	#[arg(long, conflicts_with = "private_key_password")]
	pub no_password: bool,

	/// Write the key to this file instead of stdout.
	///
	/// Existing files are never overwritten.
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let algorithm = ctx.io.get_key_algorithm()?;
	let password = ctx.io.get_key_password()?;
	let output = ctx.io.get_output()?;

	debug!(%algorithm, protected = !password.is_empty(), "generating key");
	let key = SecretKey::generate(algorithm);
	let stored = PrivateKey::seal(&key, &password)?;
	output.write(&stored.to_bytes()).await?;

	ctx.notice(&format!("generated {algorithm} private key"))
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	KeygenArgs::command().debug_assert()
}
