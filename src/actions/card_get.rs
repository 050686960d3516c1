use std::path::PathBuf;

use clap::Parser;
use miette::Result;

use super::Context;
use crate::{args::CommonArgs, model::Card, service::CardService as _};

/// Fetch cards by id from the card service and write them as JSON.
#[derive(Debug, Clone, Parser)]
pub struct CardGetArgs {
	/// Ids of the cards to fetch.
	#[arg(value_name = "ID")]
	pub card_id: Vec<String>,

	/// Write the cards to this file instead of stdout.
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let ids = ctx.io.get_card_ids()?;
	let output = ctx.io.get_output()?;
	let client = ctx.io.get_client(&ctx.config)?;

	let mut cards = Vec::with_capacity(ids.len());
	for id in &ids {
		cards.push(client.get_card(id).await?);
	}

	output.write(Card::export(&cards)?.as_bytes()).await?;
	ctx.notice(&format!("fetched {} cards", cards.len()))
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	CardGetArgs::command().debug_assert()
}
