use std::path::PathBuf;

use clap::Parser;
use miette::Result;

use super::Context;
use crate::{
	args::CommonArgs,
	model::Card,
	service::{CardService as _, SearchCriteria},
};

/// Search the card service for the cards of some identities.
#[derive(Debug, Clone, Parser)]
pub struct CardSearchArgs {
	/// Identities to search for, like email addresses.
	#[arg(value_name = "IDENTITY")]
	pub identity: Vec<String>,

	/// Type of the identities.
	#[arg(short = 't', long, value_name = "TYPE")]
	pub identity_type: Option<String>,

	/// Where to search: application or global.
	#[arg(short, long)]
	pub scope: Option<String>,

	/// Write the cards to this file instead of stdout.
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,

	#[command(flatten)]
	pub common: CommonArgs,
}

pub async fn run(ctx: &mut Context) -> Result<()> {
	let criteria = SearchCriteria {
		identities: ctx.io.get_identities()?,
		identity_type: ctx.io.get_identity_type()?,
		scope: ctx.io.get_scope()?,
	};
	let output = ctx.io.get_output()?;
	let client = ctx.io.get_client(&ctx.config)?;

	let cards = client.search_cards(&criteria).await?;
	output.write(Card::export(&cards)?.as_bytes()).await?;
	ctx.notice(&format!("found {} cards", cards.len()))
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	CardSearchArgs::command().debug_assert()
}
