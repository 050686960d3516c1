use age::secrecy::zeroize::Zeroizing;
use base64::{Engine as _, prelude::BASE64_STANDARD_NO_PAD};
use tracing::debug;

use super::{ArgumentValueSource, alias, payload};
use crate::{
	argument::ArgumentValue,
	error::Error,
	model::{Card, KeyAlgorithm, Password, PrivateKey, PublicKey},
};

/// Reads objects from the literal text of a value.
///
/// Keys may be given as-is or base64-encoded. Text that does not parse is
/// reported as "can't", leaving the decision to the rest of the chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentValueParserSource;

/// Read a literal key, or failing that the base64 decode of the text.
///
/// Padding is optional: token parsing strips a trailing `=`. Decoding works on
/// bytes, so a base64 password-protected key (binary age data) is accepted too.
fn literal_or_base64<T>(text: &str, read: impl Fn(&[u8]) -> Option<T>) -> Option<T> {
	if let Some(key) = read(text.as_bytes()) {
		return Some(key);
	}

	let decoded = BASE64_STANDARD_NO_PAD
		.decode(text.trim().trim_end_matches('='))
		.map(Zeroizing::new)
		.ok()?;
	read(&decoded)
}

impl ArgumentValueSource for ArgumentValueParserSource {
	fn name(&self) -> &'static str {
		"parser"
	}

	fn read_key_algorithm(&self, value: &ArgumentValue) -> Result<Option<KeyAlgorithm>, Error> {
		let text = payload(value)?;
		Ok(text.parse().ok())
	}

	fn read_password(&self, value: &ArgumentValue) -> Result<Option<Password>, Error> {
		Ok(Some(Password::new(payload(value)?)))
	}

	fn read_public_key(&self, value: &ArgumentValue) -> Result<Option<PublicKey>, Error> {
		let text = payload(value)?;
		let key = literal_or_base64(&text, |bytes| {
			let text = std::str::from_utf8(bytes).ok()?;
			PublicKey::parse(text, alias(value)).ok()
		});
		if key.is_none() {
			debug!("value is not a literal public key");
		}
		Ok(key)
	}

	fn read_private_key(&self, value: &ArgumentValue) -> Result<Option<PrivateKey>, Error> {
		let text = Zeroizing::new(payload(value)?);
		let key = literal_or_base64(&text, |bytes| PrivateKey::from_bytes(bytes.to_vec()).ok());
		if key.is_none() {
			debug!("value is not a literal private key");
		}
		Ok(key)
	}

	fn read_cards(&self, value: &ArgumentValue) -> Result<Option<Vec<Card>>, Error> {
		let text = payload(value)?;
		match Card::import(&text) {
			Ok(cards) => Ok(Some(cards)),
			Err(err) => {
				debug!(%err, "value is not a literal card payload");
				Ok(None)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use age::secrecy::ExposeSecret;
	use base64::prelude::BASE64_STANDARD;

	use super::*;
	use crate::model::SecretKey;

	#[test]
	fn algorithms() {
		let source = ArgumentValueParserSource;
		assert_eq!(
			source
				.read_key_algorithm(&ArgumentValue::from("ed25519"))
				.unwrap(),
			Some(KeyAlgorithm::Ed25519)
		);
		assert_eq!(
			source.read_key_algorithm(&ArgumentValue::from("rsa")).unwrap(),
			None
		);
	}

	#[test]
	fn password_takes_the_token_value() {
		let mut value = ArgumentValue::from("password:hunter2");
		value.parse();
		let password = ArgumentValueParserSource
			.read_password(&value)
			.unwrap()
			.unwrap();
		assert_eq!(password.secret().expose_secret(), "hunter2");
	}

	#[test]
	fn public_key_literal_and_base64() {
		let key = SecretKey::generate(KeyAlgorithm::X25519).public();
		let text = key.to_text().unwrap();
		let source = ArgumentValueParserSource;

		let plain = source
			.read_public_key(&ArgumentValue::from(text.trim()))
			.unwrap()
			.unwrap();
		assert_eq!(plain.to_text().unwrap(), text);

		let encoded = BASE64_STANDARD.encode(&text);
		let decoded = source
			.read_public_key(&ArgumentValue::from(encoded))
			.unwrap()
			.unwrap();
		assert_eq!(decoded.to_text().unwrap(), text);

		assert!(
			source
				.read_public_key(&ArgumentValue::from("not a key"))
				.unwrap()
				.is_none()
		);
	}

	#[test]
	fn protected_private_key_in_base64() {
		let key = SecretKey::generate(KeyAlgorithm::X25519);
		let password = Password::new("open sesame");
		let sealed = PrivateKey::seal(&key, &password).unwrap();
		let encoded = BASE64_STANDARD.encode(sealed.to_bytes().as_slice());

		let mut value = ArgumentValue::from(format!("privkey:{encoded}"));
		value.parse();
		let read = ArgumentValueParserSource
			.read_private_key(&value)
			.unwrap()
			.unwrap();
		assert!(read.is_encrypted());
		assert_eq!(
			read.unlock(Some(&password))
				.unwrap()
				.public()
				.to_text()
				.unwrap(),
			key.public().to_text().unwrap()
		);

		assert!(
			ArgumentValueParserSource
				.read_private_key(&ArgumentValue::from("bm90IGEga2V5"))
				.unwrap()
				.is_none()
		);
	}

	#[test]
	fn cards() {
		let json = r#"{"id":"c1","identity":"bob@example.com","identity_type":"email","public_key":"x"}"#;
		let cards = ArgumentValueParserSource
			.read_cards(&ArgumentValue::from(json))
			.unwrap()
			.unwrap();
		assert_eq!(cards[0].id, "c1");

		assert!(
			ArgumentValueParserSource
				.read_cards(&ArgumentValue::from("nope"))
				.unwrap()
				.is_none()
		);
	}
}
