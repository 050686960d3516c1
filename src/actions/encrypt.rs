use std::path::PathBuf;

use clap::Parser;
use miette::Result;
use tracing::debug;

use super::Context;
use crate::{
	args::CommonArgs,
	crypto::{Cipher, split_content_info},
};

/// Encrypt data for one or more recipients.
///
/// Recipients are given as `kind:value` tokens, optionally followed by
/// `:alias`:
///
/// - `password:<PASSWORD>` encrypts with a password (can't be combined with others);
/// - `pubkey:<KEY>` encrypts for an x25519 public key, given as a file or literally;
/// - `email:<ADDRESS>` encrypts for every card of that identity;
/// - `vcard:<CARD>` encrypts for the key of a card file;
/// - `id:<CARD ID>` encrypts for the key of a card fetched by id.
#[derive(Debug, Clone, Parser)]
pub struct EncryptArgs {
	/// Data to encrypt. Reads stdin when absent.
	#[arg(short, long, value_name = "PATH")]
	pub input: Option<PathBuf>,

	/// Write encrypted data to this file instead of stdout.
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,

	/// Write the content info to this file, apart from the encrypted data.
	///
	/// The content info is the header naming who can decrypt the data. Give the same file to
	/// `decrypt --content-info` to put it back.
	#[arg(short, long, value_name = "PATH")]
	pub content_info: Option<PathBuf>,

	/// Who to encrypt for.
	#[arg(value_name = "RECIPIENT")]
	pub recipient: Vec<String>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let input = ctx.io.get_input()?;
	let output = ctx.io.get_output()?;
	let content_info = ctx.io.get_content_info_output()?;
	let client = ctx.io.get_client(&ctx.config)?;
	let recipients = ctx.io.get_recipients()?;

	let mut cipher = Cipher::new();
	for recipient in &recipients {
		debug!(kind = recipient.kind(), "adding recipient");
		recipient.add_self_to(&mut cipher, &client).await?;
	}

	let plaintext = input.read_all().await?;
	let ciphertext = cipher.encrypt(&plaintext)?;

	match content_info {
		Some(sink) => {
			let (info, payload) = split_content_info(&ciphertext)?;
			debug!(header = info.len(), "writing detached content info");
			sink.write(info).await?;
			output.write(payload).await?;
		}
		None => output.write(&ciphertext).await?,
	}

	ctx.notice(&format!("encrypted for {} recipients", recipients.len()))
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	EncryptArgs::command().debug_assert()
}
