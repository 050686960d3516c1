//! Encryption and signatures on top of `age` and `ed25519-dalek`.

use std::{
	io::{Read, Write},
	iter,
};

use age::{DecryptError, Decryptor, Encryptor, x25519};
use base64::{Engine as _, prelude::BASE64_STANDARD};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use tracing::{debug, trace};

use crate::{
	error::Error,
	model::{Password, PublicKey},
};

/// Marks the end of an age header: the MAC line.
const MAC_LINE: &[u8] = b"\n--- ";

/// Collects recipients, then encrypts one payload for all of them.
#[derive(Default)]
pub struct Cipher {
	recipients: Vec<Box<dyn age::Recipient>>,
	has_password: bool,
}

impl Cipher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_empty(&self) -> bool {
		self.recipients.is_empty()
	}

	pub fn add_key_recipient(&mut self, key: &PublicKey) -> Result<(), Error> {
		let recipient = key.recipient().ok_or_else(|| {
			Error::Key(format!(
				"{} keys can not receive encrypted data",
				key.algorithm()
			))
		})?;
		debug!(alias = ?key.alias(), "add key recipient");
		self.recipients.push(Box::new(recipient.clone()));
		Ok(())
	}

	/// Passwords can't be mixed with other recipients, and only one is allowed.
	pub fn add_password_recipient(&mut self, password: &Password) -> Result<(), Error> {
		if self.has_password {
			return Err(Error::Crypto(
				"data can only be encrypted for one password".into(),
			));
		}
		debug!("add password recipient");
		self.has_password = true;
		self.recipients
			.push(Box::new(age::scrypt::Recipient::new(password.secret().clone())));
		Ok(())
	}

	pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
		if self.has_password && self.recipients.len() > 1 {
			return Err(Error::Crypto(
				"a password recipient can not be combined with other recipients".into(),
			));
		}

		let encryptor = Encryptor::with_recipients(self.recipients.iter().map(|r| r.as_ref()))
			.map_err(|err| Error::Crypto(format!("preparing encryption: {err}")))?;

		let mut ciphertext = Vec::with_capacity(plaintext.len() + 256);
		let mut writer = encryptor
			.wrap_output(&mut ciphertext)
			.map_err(|err| Error::io("writing encryption header", err))?;
		writer
			.write_all(plaintext)
			.map_err(|err| Error::io("encrypting data", err))?;
		writer
			.finish()
			.map_err(|err| Error::io("finishing encryption", err))?;

		trace!(bytes = ciphertext.len(), "encrypted");
		Ok(ciphertext)
	}
}

/// Decrypt with a single identity.
///
/// `Ok(None)` means the data was not encrypted for this identity; any other
/// failure is an error.
pub fn decrypt_with(
	ciphertext: &[u8],
	identity: &dyn age::Identity,
) -> Result<Option<Vec<u8>>, Error> {
	let decryptor = Decryptor::new(ciphertext)
		.map_err(|err| Error::Crypto(format!("reading encrypted data: {err}")))?;

	let mut reader = match decryptor.decrypt(iter::once(identity)) {
		Ok(reader) => reader,
		Err(DecryptError::NoMatchingKeys | DecryptError::DecryptionFailed) => return Ok(None),
		Err(err) => return Err(Error::Crypto(format!("decrypting: {err}"))),
	};

	let mut plaintext = Vec::with_capacity(ciphertext.len());
	reader
		.read_to_end(&mut plaintext)
		.map_err(|err| Error::Crypto(format!("decrypting payload: {err}")))?;
	Ok(Some(plaintext))
}

pub fn decrypt_with_key(
	ciphertext: &[u8],
	identity: &x25519::Identity,
) -> Result<Option<Vec<u8>>, Error> {
	decrypt_with(ciphertext, identity)
}

pub fn decrypt_with_password(
	ciphertext: &[u8],
	password: &Password,
) -> Result<Option<Vec<u8>>, Error> {
	let identity = age::scrypt::Identity::new(password.secret().clone());
	decrypt_with(ciphertext, &identity)
}

/// Split encrypted data into its header ("content info") and its payload.
pub fn split_content_info(ciphertext: &[u8]) -> Result<(&[u8], &[u8]), Error> {
	let mac = ciphertext
		.windows(MAC_LINE.len())
		.position(|window| window == MAC_LINE)
		.ok_or_else(|| Error::Crypto("encrypted data has no header".into()))?;
	let end = ciphertext[mac + 1..]
		.iter()
		.position(|b| *b == b'\n')
		.map(|newline| mac + 1 + newline + 1)
		.ok_or_else(|| Error::Crypto("encrypted data header is truncated".into()))?;
	Ok(ciphertext.split_at(end))
}

/// Inverse of [`split_content_info`].
pub fn join_content_info(content_info: &[u8], payload: &[u8]) -> Vec<u8> {
	let mut joined = Vec::with_capacity(content_info.len() + payload.len());
	joined.extend_from_slice(content_info);
	joined.extend_from_slice(payload);
	joined
}

/// Base64 ed25519 signature over `data`.
pub fn sign(data: &[u8], key: &SigningKey) -> String {
	BASE64_STANDARD.encode(key.sign(data).to_bytes())
}

pub fn verify(data: &[u8], signature: &str, key: &VerifyingKey) -> Result<bool, Error> {
	let bytes = BASE64_STANDARD
		.decode(signature.trim())
		.map_err(|err| Error::Crypto(format!("signature is not base64: {err}")))?;
	let signature = Signature::from_slice(&bytes)
		.map_err(|err| Error::Crypto(format!("malformed signature: {err}")))?;
	Ok(key.verify(data, &signature).is_ok())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{KeyAlgorithm, SecretKey};

	fn identity() -> x25519::Identity {
		x25519::Identity::generate()
	}

	#[test]
	fn keys() {
		let alice = identity();
		let bob = identity();
		let eve = identity();

		let mut cipher = Cipher::new();
		for id in [&alice, &bob] {
			let key = PublicKey::parse(&id.to_public().to_string(), None).unwrap();
			cipher.add_key_recipient(&key).unwrap();
		}
		let ciphertext = cipher.encrypt(b"attack at dawn").unwrap();

		assert_eq!(
			decrypt_with_key(&ciphertext, &alice).unwrap().as_deref(),
			Some(&b"attack at dawn"[..])
		);
		assert!(decrypt_with_key(&ciphertext, &bob).unwrap().is_some());
		assert!(decrypt_with_key(&ciphertext, &eve).unwrap().is_none());
	}

	#[test]
	fn password() {
		let mut cipher = Cipher::new();
		cipher
			.add_password_recipient(&Password::new("sesame"))
			.unwrap();
		let ciphertext = cipher.encrypt(b"hi").unwrap();

		assert_eq!(
			decrypt_with_password(&ciphertext, &Password::new("sesame"))
				.unwrap()
				.as_deref(),
			Some(&b"hi"[..])
		);
		assert!(
			decrypt_with_password(&ciphertext, &Password::new("nope"))
				.unwrap()
				.is_none()
		);
	}

	#[test]
	fn password_is_exclusive() {
		let mut cipher = Cipher::new();
		cipher.add_password_recipient(&Password::new("a")).unwrap();
		assert!(cipher.add_password_recipient(&Password::new("b")).is_err());

		let key = PublicKey::parse(&identity().to_public().to_string(), None).unwrap();
		cipher.add_key_recipient(&key).unwrap();
		assert!(cipher.encrypt(b"x").is_err());
	}

	#[test]
	fn signing_keys_can_not_receive() {
		let key = SecretKey::generate(KeyAlgorithm::Ed25519).public();
		assert!(Cipher::new().add_key_recipient(&key).is_err());
	}

	#[test]
	fn empty_cipher() {
		assert!(Cipher::new().encrypt(b"x").is_err());
	}

	#[test]
	fn content_info() {
		let alice = identity();
		let mut cipher = Cipher::new();
		cipher
			.add_key_recipient(&PublicKey::parse(&alice.to_public().to_string(), None).unwrap())
			.unwrap();
		let ciphertext = cipher.encrypt(b"detached").unwrap();

		let (info, payload) = split_content_info(&ciphertext).unwrap();
		assert!(info.starts_with(b"age-encryption.org/v1\n"));
		assert!(info.ends_with(b"\n"));
		assert!(decrypt_with_key(payload, &alice).is_err());

		let joined = join_content_info(info, payload);
		assert_eq!(joined, ciphertext);
		assert_eq!(
			decrypt_with_key(&joined, &alice).unwrap().as_deref(),
			Some(&b"detached"[..])
		);
	}

	#[test]
	fn signatures() {
		let key = SecretKey::generate(KeyAlgorithm::Ed25519);
		let signing = key.signing_key().unwrap();
		let signature = sign(b"message", signing);

		let public = key.public();
		let verifying = public.verifying_key().unwrap();
		assert!(verify(b"message", &signature, verifying).unwrap());
		assert!(!verify(b"tampered", &signature, verifying).unwrap());
		assert!(verify(b"message", "!!!", verifying).is_err());
	}
}
