use std::path::PathBuf;

use clap::Parser;
use miette::Result;
use tracing::{debug, warn};

use super::Context;
use crate::{args::CommonArgs, crypto, error::Error};

/// Verify a signature made by `sign`.
///
/// The sender is given as a `pubkey:`, `vcard:`, `email:` or `id:` token. Exits
/// with status 65 when the signature does not match.
#[derive(Debug, Clone, Parser)]
pub struct VerifyArgs {
	/// Signed data. Reads stdin when absent.
	#[arg(short, long, value_name = "PATH")]
	pub input: Option<PathBuf>,

	/// File holding the signature.
	#[arg(short, long, value_name = "PATH")]
	pub signature: Option<PathBuf>,

	/// Whose key the signature is checked against.
	#[arg(short = 'r', long, value_name = "SENDER")]
	pub sender: Vec<String>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let input = ctx.io.get_input()?;
	let signature = ctx.io.get_signature_input()?;
	let client = ctx.io.get_client(&ctx.config)?;
	let senders = ctx.io.get_sender()?;

	let signature = signature.read_text().await?;
	let data = input.read_all().await?;

	for sender in &senders {
		for key in sender.public_keys(&client).await? {
			let Some(verifying) = key.verifying_key() else {
				warn!(alias = ?key.alias(), "skipping {} key, only ed25519 keys verify", key.algorithm());
				continue;
			};

			if crypto::verify(&data, &signature, verifying)? {
				debug!(alias = ?key.alias(), "signature matches");
				return ctx.notice("verified");
			}
		}
	}

	Err(Error::VerificationFailed.into())
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	VerifyArgs::command().debug_assert()
}
