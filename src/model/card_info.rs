use std::{fmt, str::FromStr};

use super::Card;
use crate::{argument::names, error::Error};

const SEPARATOR: &str = " : ";

/// A card property `card-info` can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CardProperty {
	Id,
	Identity,
	IdentityType,
	Scope,
	PublicKey,
	Data,
	CreatedAt,
}

impl CardProperty {
	/// In display order.
	pub const ALL: &'static [Self] = &[
		Self::Id,
		Self::Identity,
		Self::IdentityType,
		Self::Scope,
		Self::PublicKey,
		Self::Data,
		Self::CreatedAt,
	];

	pub const NAMES: &'static [&'static str] = &[
		"id",
		"identity",
		"identity_type",
		"scope",
		"public_key",
		"data",
		"created_at",
	];

	pub fn name(self) -> &'static str {
		match self {
			Self::Id => "id",
			Self::Identity => "identity",
			Self::IdentityType => "identity_type",
			Self::Scope => "scope",
			Self::PublicKey => "public_key",
			Self::Data => "data",
			Self::CreatedAt => "created_at",
		}
	}

	fn label(self) -> &'static str {
		match self {
			Self::Id => "id",
			Self::Identity => "identity",
			Self::IdentityType => "identity type",
			Self::Scope => "scope",
			Self::PublicKey => "public key",
			Self::Data => "data",
			Self::CreatedAt => "created at",
		}
	}

	/// Labelled values of this property; data yields one entry per item.
	fn entries(self, card: &Card) -> Vec<(String, String)> {
		let one = |value: &str| vec![(self.label().to_owned(), value.trim_end().to_owned())];
		match self {
			Self::Id => one(&card.id),
			Self::Identity => one(&card.identity),
			Self::IdentityType => one(&card.identity_type),
			Self::Scope => one(&card.scope.to_string()),
			Self::PublicKey => one(&card.public_key),
			Self::CreatedAt => card.created_at.as_deref().map(one).unwrap_or_default(),
			Self::Data => card
				.data
				.iter()
				.map(|(key, value)| (key.clone(), value.clone()))
				.collect(),
		}
	}
}

impl fmt::Display for CardProperty {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for CardProperty {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.iter()
			.copied()
			.find(|property| property.name() == s)
			.ok_or_else(|| Error::Value {
				name: names::PROPERTY.into(),
				value: s.into(),
			})
	}
}

impl Card {
	/// Describe the requested properties, in display order.
	///
	/// A single property is printed bare, one value per line (data items as
	/// `key -> value`). Several are printed as an aligned `label : value` table.
	pub fn describe(&self, properties: &[CardProperty]) -> String {
		let shown = CardProperty::ALL
			.iter()
			.copied()
			.filter(|property| properties.contains(property));

		if properties.len() == 1 {
			let mut out = String::new();
			for property in shown {
				for (key, value) in property.entries(self) {
					if property == CardProperty::Data {
						out.push_str(&format!("{key} -> {value}\n"));
					} else {
						out.push_str(&format!("{value}\n"));
					}
				}
			}
			return out;
		}

		let entries: Vec<(String, String)> = shown
			.flat_map(|property| match property {
				CardProperty::Data => property
					.entries(self)
					.into_iter()
					.map(|(key, value)| (format!("data ({key})"), value))
					.collect(),
				_ => property.entries(self),
			})
			.collect();
		key_value_table(&entries)
	}
}

/// Continuation lines of multi-line values are indented under the first.
fn key_value_table(entries: &[(String, String)]) -> String {
	let width = entries
		.iter()
		.map(|(key, _)| key.chars().count())
		.max()
		.unwrap_or_default();
	let indent = format!("\n{}", " ".repeat(width + SEPARATOR.len()));

	let mut out = String::new();
	for (key, value) in entries {
		let value = value.trim_end().replace('\n', &indent);
		out.push_str(&format!("{key:<width$}{SEPARATOR}{value}\n"));
	}
	out
}
