use std::path::{Path, PathBuf};

use age::secrecy::zeroize::Zeroizing;
use tracing::{debug, trace};

use super::{ArgumentValueSource, alias, payload};
use crate::{
	argument::ArgumentValue,
	error::Error,
	model::{Card, Password, PrivateKey, PublicKey},
};

/// Treats a value as a path, and reads the object from that file when it exists.
///
/// A value naming an existing file is always read from that file, even when the
/// text would also parse as a literal key or password.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentValueFileSource;

impl ArgumentValueFileSource {
	fn existing(value: &ArgumentValue) -> Option<PathBuf> {
		let text = payload(value).ok()?;
		let path = Path::new(&text);
		let exists = path.is_file();
		// values may be literal secrets: no path until one is found
		trace!(exists, "probing value as a file");
		exists.then(|| path.to_path_buf())
	}

	/// Files may hold secrets, so their content is wiped after use.
	fn read(path: &Path) -> Result<Zeroizing<Vec<u8>>, Error> {
		std::fs::read(path)
			.map(Zeroizing::new)
			.map_err(|err| Error::io(format!("reading {}", path.display()), err))
	}

	fn read_text(path: &Path) -> Result<Zeroizing<String>, Error> {
		let bytes = Self::read(path)?;
		std::str::from_utf8(&bytes)
			.map(|text| Zeroizing::new(text.to_owned()))
			.map_err(|_| Error::Key(format!("{} is not a text file", path.display())))
	}
}

impl ArgumentValueSource for ArgumentValueFileSource {
	fn name(&self) -> &'static str {
		"file"
	}

	/// The first line of the file, without its line ending.
	fn read_password(&self, value: &ArgumentValue) -> Result<Option<Password>, Error> {
		let Some(path) = Self::existing(value) else {
			return Ok(None);
		};
		debug!(?path, "reading password from file");
		let text = Self::read_text(&path)?;
		let line = text.lines().next().unwrap_or_default();
		Ok(Some(Password::new(line)))
	}

	fn read_public_key(&self, value: &ArgumentValue) -> Result<Option<PublicKey>, Error> {
		let Some(path) = Self::existing(value) else {
			return Ok(None);
		};
		debug!(?path, "reading public key from file");
		PublicKey::parse(&Self::read_text(&path)?, alias(value)).map(Some)
	}

	fn read_private_key(&self, value: &ArgumentValue) -> Result<Option<PrivateKey>, Error> {
		let Some(path) = Self::existing(value) else {
			return Ok(None);
		};
		debug!(?path, "reading private key from file");
		PrivateKey::from_bytes(Self::read(&path)?.to_vec()).map(Some)
	}

	fn read_cards(&self, value: &ArgumentValue) -> Result<Option<Vec<Card>>, Error> {
		let Some(path) = Self::existing(value) else {
			return Ok(None);
		};
		debug!(?path, "reading cards from file");
		Card::import(&Self::read_text(&path)?).map(Some)
	}
}
