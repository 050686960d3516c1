use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::PublicKey;
use crate::{argument::names, error::Error};

/// Where a card is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardScope {
	#[default]
	Application,
	Global,
}

impl CardScope {
	pub const NAMES: &'static [&'static str] = &["application", "global"];
}

impl fmt::Display for CardScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Application => "application",
			Self::Global => "global",
		})
	}
}

impl FromStr for CardScope {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"application" => Ok(Self::Application),
			"global" => Ok(Self::Global),
			other => Err(Error::Value {
				name: names::SCOPE.into(),
				value: other.into(),
			}),
		}
	}
}

/// An identity card: a public key bound to an identity by the card service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
	pub id: String,
	pub identity: String,
	pub identity_type: String,
	pub public_key: String,

	#[serde(default)]
	pub scope: CardScope,

	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub data: BTreeMap<String, String>,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CardPayload {
	Many(Vec<Card>),
	One(Box<Card>),
}

impl Card {
	/// Parse a JSON payload holding one card or a list of cards.
	pub fn import(json: &str) -> Result<Vec<Self>, Error> {
		let payload: CardPayload = serde_json::from_str(json)
			.map_err(|err| Error::Key(format!("invalid card payload: {err}")))?;
		Ok(match payload {
			CardPayload::Many(cards) => cards,
			CardPayload::One(card) => vec![*card],
		})
	}

	pub fn export(cards: &[Self]) -> Result<String, Error> {
		serde_json::to_string_pretty(cards)
			.map(|json| json + "\n")
			.map_err(|err| Error::Logic(format!("serialising cards: {err}")))
	}

	/// The card's key, aliased with the card id.
	pub fn key(&self) -> Result<PublicKey, Error> {
		PublicKey::parse(&self.public_key, Some(&self.id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{KeyAlgorithm, SecretKey};

	fn card(id: &str) -> Card {
		Card {
			id: id.into(),
			identity: "alice@example.com".into(),
			identity_type: "email".into(),
			public_key: SecretKey::generate(KeyAlgorithm::X25519)
				.public()
				.to_text()
				.unwrap(),
			scope: CardScope::Application,
			data: BTreeMap::new(),
			created_at: None,
		}
	}

	#[test]
	fn import_one_or_many() {
		let one = serde_json::to_string(&card("a")).unwrap();
		assert_eq!(Card::import(&one).unwrap().len(), 1);

		let many = Card::export(&[card("a"), card("b")]).unwrap();
		let cards = Card::import(&many).unwrap();
		assert_eq!(cards.len(), 2);
		assert_eq!(cards[1].id, "b");

		assert!(Card::import("not json").is_err());
	}

	#[test]
	fn scope_defaults_to_application() {
		let json = r#"{"id":"c","identity":"bob","identity_type":"email","public_key":"x"}"#;
		assert_eq!(Card::import(json).unwrap()[0].scope, CardScope::Application);
	}

	#[test]
	fn key_is_aliased_with_id() {
		let key = card("card-1").key().unwrap();
		assert_eq!(key.alias(), Some("card-1"));
	}
}
