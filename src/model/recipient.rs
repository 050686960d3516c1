use tracing::{debug, warn};

use super::{Card, Password, PrivateKey, PublicKey};
use crate::{
	crypto::{self, Cipher},
	error::Error,
	service::{CardService, SearchCriteria},
};

/// Someone data is encrypted for, or something data is decrypted with.
#[derive(Debug)]
pub enum Recipient {
	Password(Password),
	PublicKey(PublicKey),
	PrivateKey(PrivateKey),
	Email(String),
	Cards(Vec<Card>),
	CardId(String),
}

impl Recipient {
	/// Token kinds accepted as encryption recipients.
	pub const ENCRYPT_KINDS: &'static [&'static str] =
		&["password", "pubkey", "email", "vcard", "id"];

	/// Token kinds accepted as decryption recipients.
	pub const DECRYPT_KINDS: &'static [&'static str] = &["privkey", "password"];

	pub fn kind(&self) -> &'static str {
		match self {
			Self::Password(_) => "password",
			Self::PublicKey(_) => "pubkey",
			Self::PrivateKey(_) => "privkey",
			Self::Email(_) => "email",
			Self::Cards(_) => "vcard",
			Self::CardId(_) => "id",
		}
	}

	fn invalid(&self, expected: &[&str]) -> Error {
		Error::InvalidRecipient {
			kind: self.kind().into(),
			expected: expected.join(", "),
		}
	}

	/// Resolve to public keys, asking the card service for identities.
	pub async fn public_keys(&self, service: &impl CardService) -> Result<Vec<PublicKey>, Error> {
		match self {
			Self::PublicKey(key) => Ok(vec![key.clone()]),
			Self::Cards(cards) => cards.iter().map(Card::key).collect(),
			Self::CardId(id) => service.get_card(id).await?.key().map(|key| vec![key]),
			Self::Email(address) => {
				let cards = service
					.search_cards(&SearchCriteria::email(address))
					.await?;
				if cards.is_empty() {
					return Err(Error::RecipientNotFound(address.clone()));
				}
				debug!(%address, cards = cards.len(), "resolved email");
				cards.iter().map(Card::key).collect()
			}
			Self::Password(_) | Self::PrivateKey(_) => {
				Err(self.invalid(&["pubkey", "email", "vcard", "id"]))
			}
		}
	}

	/// Register with a cipher as someone the data is encrypted for.
	pub async fn add_self_to(
		&self,
		cipher: &mut Cipher,
		service: &impl CardService,
	) -> Result<(), Error> {
		if let Self::Password(password) = self {
			return cipher.add_password_recipient(password);
		}

		for key in self.public_keys(service).await? {
			cipher.add_key_recipient(&key)?;
		}
		Ok(())
	}

	/// Try to decrypt; `Ok(None)` when the data was not encrypted for this recipient
	/// or its key can't decrypt at all.
	pub fn decrypt(
		&self,
		ciphertext: &[u8],
		key_password: Option<&Password>,
	) -> Result<Option<Vec<u8>>, Error> {
		match self {
			Self::Password(password) => crypto::decrypt_with_password(ciphertext, password),
			Self::PrivateKey(key) => {
				let key = key.unlock(key_password)?;
				let Some(identity) = key.identity() else {
					warn!(algorithm = %key.algorithm(), "skipping key that can not decrypt data");
					return Ok(None);
				};
				crypto::decrypt_with_key(ciphertext, identity)
			}
			_ => Err(self.invalid(Self::DECRYPT_KINDS)),
		}
	}

	pub fn needs_key_password(&self) -> bool {
		matches!(self, Self::PrivateKey(key) if key.is_encrypted())
	}
}
