use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic as _, Result, WrapErr as _};
use tracing::debug;

use super::Context;
use crate::{
	args::CommonArgs,
	model::{Card, FileDataSource},
};

/// Show properties of cards saved by `card-get` or `card-search`.
///
/// With one property, prints its bare value per card. With several, prints an
/// aligned table of labels and values.
#[derive(Debug, Clone, Parser)]
pub struct CardInfoArgs {
	/// Cards to describe: a JSON file, or the JSON itself. Reads stdin when omitted.
	#[arg(short, long, value_name = "CARDS")]
	pub input: Option<String>,

	/// Property to show; repeat for several.
	///
	/// One of: id, identity, identity_type, scope, public_key, data, created_at.
	#[arg(short = 's', long = "show", value_name = "PROPERTY")]
	pub property: Vec<String>,

	/// Write to this file instead of stdout.
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let cards = match ctx.io.get_input_cards()? {
		Some(cards) => cards,
		None => {
			let data = FileDataSource::Stdin.read_all().await?;
			let json = String::from_utf8(data)
				.into_diagnostic()
				.wrap_err("reading cards from stdin")?;
			Card::import(&json)?
		}
	};
	let properties = ctx.io.get_card_properties()?;
	let output = ctx.io.get_output()?;

	let mut text = String::new();
	for card in &cards {
		debug!(id = %card.id, identity = %card.identity, "describing card");
		text.push_str(&card.describe(&properties));
	}
	output.write(text.as_bytes()).await?;

	ctx.notice(&format!("described {} cards", cards.len()))
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	CardInfoArgs::command().debug_assert()
}
