use std::path::PathBuf;

use clap::Parser;
use miette::Result;
use tracing::debug;

use super::Context;
use crate::{
	args::CommonArgs,
	crypto::join_content_info,
	error::Error,
	model::{Password, Recipient},
};

/// Decrypt data.
///
/// Candidates are given as `privkey:<KEY>` or `password:<PASSWORD>` tokens and
/// tried in order; the first one the data was encrypted for wins.
#[derive(Debug, Clone, Parser)]
pub struct DecryptArgs {
	/// Data to decrypt. Reads stdin when absent.
	#[arg(short, long, value_name = "PATH")]
	pub input: Option<PathBuf>,

	/// Write decrypted data to this file instead of stdout.
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,

	/// Read the content info from this file, for data encrypted with `--content-info`.
	#[arg(short, long, value_name = "PATH")]
	pub content_info: Option<PathBuf>,

	/// Password of the private keys given.
	#[arg(short = 'p', long, value_name = "PASSWORD")]
	pub private_key_password: Option<String>,

	/// Private keys or passwords to try.
	#[arg(value_name = "KEYPASS")]
	pub keypass: Vec<String>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let input = ctx.io.get_input()?;
	let output = ctx.io.get_output()?;
	let content_info = ctx.io.get_content_info_input()?;
	let recipients = ctx.io.get_decrypt_recipients()?;

	let key_password = match ctx.io.get_key_password_optional()? {
		Some(password) => Some(password),
		None if recipients.iter().any(Recipient::needs_key_password) => {
			Some(ctx.io.get_key_password()?)
		}
		None => None,
	};

	let mut ciphertext = input.read_all().await?;
	if let Some(source) = content_info {
		ciphertext = join_content_info(&source.read_all().await?, &ciphertext);
	}

	let plaintext = decrypt_first(&recipients, &ciphertext, key_password.as_ref())?;
	output.write(&plaintext).await?;

	ctx.notice("decrypted")
}

/// Try each candidate in turn; the first that decrypts wins.
pub fn decrypt_first(
	recipients: &[Recipient],
	ciphertext: &[u8],
	key_password: Option<&Password>,
) -> Result<Vec<u8>, Error> {
	for (index, recipient) in recipients.iter().enumerate() {
		debug!(index, kind = recipient.kind(), "trying recipient");
		if let Some(plaintext) = recipient.decrypt(ciphertext, key_password)? {
			debug!(index, "recipient decrypted the data");
			return Ok(plaintext);
		}
	}

	Err(Error::RecipientDecryption)
}


#[test]
fn verify_cli() {
	use clap::CommandFactory;
	DecryptArgs::command().debug_assert()
}
