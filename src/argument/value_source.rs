//! Turning raw argument values into domain objects.
//!
//! Each [`ArgumentValueSource`] may or may not know how to produce a given
//! type; the chain asks them in order and the first `Some` wins.

use std::rc::Rc;

use tracing::debug;

use super::ArgumentValue;
use crate::{
	error::Error,
	model::{Card, KeyAlgorithm, Password, PrivateKey, PublicKey},
};

pub use file::ArgumentValueFileSource;
pub use parser::ArgumentValueParserSource;

mod file;
mod parser;

/// Produces domain objects from raw values. Every method defaults to "can't".
pub trait ArgumentValueSource {
	fn name(&self) -> &'static str;

	fn read_key_algorithm(&self, _value: &ArgumentValue) -> Result<Option<KeyAlgorithm>, Error> {
		Ok(None)
	}

	fn read_password(&self, _value: &ArgumentValue) -> Result<Option<Password>, Error> {
		Ok(None)
	}

	fn read_public_key(&self, _value: &ArgumentValue) -> Result<Option<PublicKey>, Error> {
		Ok(None)
	}

	fn read_private_key(&self, _value: &ArgumentValue) -> Result<Option<PrivateKey>, Error> {
		Ok(None)
	}

	fn read_cards(&self, _value: &ArgumentValue) -> Result<Option<Vec<Card>>, Error> {
		Ok(None)
	}
}

/// The text a value carries: the value part of a key-value token, or the
/// whole string.
pub fn payload(value: &ArgumentValue) -> Result<String, Error> {
	if value.is_key_value() {
		value.value().map(ToOwned::to_owned)
	} else {
		value.to_text()
	}
}

/// The alias of a `kind:value:alias` token, if any.
pub fn alias(value: &ArgumentValue) -> Option<&str> {
	value.alias().ok()
}

/// Value sources in order; shared so one chain can serve many reads.
#[derive(Clone, Default)]
pub struct ArgumentValueSourceChain {
	sources: Vec<Rc<dyn ArgumentValueSource>>,
}

impl ArgumentValueSourceChain {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append_source(&mut self, source: Rc<dyn ArgumentValueSource>) -> &mut Self {
		self.sources.push(source);
		self
	}

	pub fn insert_source(&mut self, source: Rc<dyn ArgumentValueSource>) -> &mut Self {
		self.sources.insert(0, source);
		self
	}

	fn read<T>(
		&self,
		what: &'static str,
		value: &ArgumentValue,
		shown: impl FnOnce() -> String,
		read: impl Fn(&dyn ArgumentValueSource) -> Result<Option<T>, Error>,
	) -> Result<T, Error> {
		for source in &self.sources {
			debug!(what, source = source.name(), "try read from value source");
			if let Some(found) = read(source.as_ref())? {
				return Ok(found);
			}
			debug!(what, source = source.name(), "value source can not read, try next");
		}

		debug!(what, kind = value.type_name(), "no value source could read");
		Err(Error::ValueSource {
			what,
			value: shown(),
		})
	}

	pub fn read_key_algorithm(&self, value: &ArgumentValue) -> Result<KeyAlgorithm, Error> {
		self.read(
			"key algorithm",
			value,
			|| payload(value).unwrap_or_default(),
			|source| source.read_key_algorithm(value),
		)
	}

	pub fn read_password(&self, value: &ArgumentValue) -> Result<Password, Error> {
		self.read(
			"password",
			value,
			|| "<hidden>".into(),
			|source| source.read_password(value),
		)
	}

	pub fn read_public_key(&self, value: &ArgumentValue) -> Result<PublicKey, Error> {
		self.read(
			"public key",
			value,
			|| payload(value).unwrap_or_default(),
			|source| source.read_public_key(value),
		)
	}

	pub fn read_private_key(&self, value: &ArgumentValue) -> Result<PrivateKey, Error> {
		self.read(
			"private key",
			value,
			|| "<hidden>".into(),
			|source| source.read_private_key(value),
		)
	}

	pub fn read_cards(&self, value: &ArgumentValue) -> Result<Vec<Card>, Error> {
		self.read(
			"cards",
			value,
			|| payload(value).unwrap_or_default(),
			|source| source.read_cards(value),
		)
	}
}
