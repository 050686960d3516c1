//! Argument resolution.
//!
//! Commands never look at argv directly. They ask [`io::ArgumentIo`] for what they
//! need, which finds a raw [`Argument`] through a chain of [`source`]s (command
//! line, config file, prompt, built-in defaults), checks it with a
//! [`validation`] and turns it into a domain object through a chain of
//! [`value_source`]s.

use std::fmt;

use crate::error::Error;

pub use value::ArgumentValue;

pub mod io;
pub mod source;
pub mod validation;
pub mod value;
pub mod value_source;

/// Argument ids, shared by the usage grammars and every source.
pub mod names {
	pub const COMMAND: &str = "command";
	pub const ALGORITHM: &str = "algorithm";
	pub const INPUT: &str = "input";
	pub const OUTPUT: &str = "output";
	pub const CONTENT_INFO: &str = "content_info";
	pub const RECIPIENT: &str = "recipient";
	pub const KEYPASS: &str = "keypass";
	pub const PRIVATE_KEY: &str = "private_key";
	pub const PRIVATE_KEY_PASSWORD: &str = "private_key_password";
	pub const NO_PASSWORD: &str = "no_password";
	pub const SIGNATURE: &str = "signature";
	pub const SENDER: &str = "sender";
	pub const CARD_ID: &str = "card_id";
	pub const IDENTITY: &str = "identity";
	pub const IDENTITY_TYPE: &str = "identity_type";
	pub const SCOPE: &str = "scope";
	pub const PROPERTY: &str = "property";
	pub const APPLICATION_TOKEN: &str = "application_token";
	pub const INTERACTIVE: &str = "interactive";
	pub const INTERACTIVE_OPTIONAL: &str = "interactive_optional";
	pub const QUIET: &str = "quiet";
	pub const SET: &str = "set";
	pub const PATH: &str = "path";
}

/// Whether a missing argument is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentImportance {
	Required,
	Optional,
}

impl fmt::Display for ArgumentImportance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Required => "required",
			Self::Optional => "optional",
		})
	}
}

/// Policy shared by all sources of a chain.
///
/// Sources may change it during [`source::ArgumentSourceChain::init`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgumentRules {
	pub allow_user_interaction: bool,
	pub allow_user_interaction_for_optional: bool,
}

/// How a usage grammar is applied to the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgumentParseOptions {
	/// Stop at the first positional and keep the rest for a nested grammar.
	pub options_first: bool,
}

impl ArgumentParseOptions {
	pub fn options_first() -> Self {
		Self {
			options_first: true,
		}
	}
}

/// All values read for one named argument, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argument(Vec<ArgumentValue>);

impl Argument {
	pub fn new(values: Vec<ArgumentValue>) -> Self {
		Self(values)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Exactly one value.
	pub fn is_value(&self) -> bool {
		self.0.len() == 1
	}

	/// One value or more.
	pub fn is_list(&self) -> bool {
		!self.0.is_empty()
	}

	/// The first value, or [`ArgumentValue::Empty`] when there is none.
	pub fn as_value(&self) -> ArgumentValue {
		self.0.first().cloned().unwrap_or_default()
	}

	pub fn as_list(&self) -> &[ArgumentValue] {
		&self.0
	}

	pub fn into_list(self) -> Vec<ArgumentValue> {
		self.0
	}

	/// Every value as a string; fails on the first value of another type.
	pub fn as_string_list(&self) -> Result<Vec<String>, Error> {
		self.0
			.iter()
			.map(|value| value.as_string().map(ToOwned::to_owned))
			.collect()
	}

	/// Apply [`ArgumentValue::parse`] to every value.
	pub fn parse(&mut self) {
		for value in &mut self.0 {
			value.parse();
		}
	}
}

impl From<ArgumentValue> for Argument {
	fn from(value: ArgumentValue) -> Self {
		Self(vec![value])
	}
}

impl From<bool> for Argument {
	fn from(value: bool) -> Self {
		ArgumentValue::from(value).into()
	}
}

impl From<usize> for Argument {
	fn from(value: usize) -> Self {
		ArgumentValue::from(value).into()
	}
}

impl From<String> for Argument {
	fn from(value: String) -> Self {
		ArgumentValue::from(value).into()
	}
}

impl From<&str> for Argument {
	fn from(value: &str) -> Self {
		ArgumentValue::from(value).into()
	}
}

impl From<Vec<String>> for Argument {
	fn from(values: Vec<String>) -> Self {
		values.into_iter().map(ArgumentValue::from).collect()
	}
}

impl FromIterator<ArgumentValue> for Argument {
	fn from_iter<I: IntoIterator<Item = ArgumentValue>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn arity() {
		let single = Argument::from("alice");
		assert!(single.is_value());
		assert!(single.is_list());

		let none = Argument::default();
		assert!(!none.is_value());
		assert!(!none.is_list());

		let many = Argument::from(vec!["a".to_string(), "b".to_string()]);
		assert!(!many.is_value());
		assert!(many.is_list());
		assert_eq!(many.len(), 2);
	}

	#[test]
	fn empty_as_value() {
		assert!(Argument::default().as_value().is_empty());
	}

	#[test]
	fn string_list() {
		let list = Argument::from(vec!["a".to_string(), "b".to_string()]);
		assert_eq!(list.as_string_list().unwrap(), vec!["a", "b"]);

		let mixed: Argument = [ArgumentValue::from("a"), ArgumentValue::from(true)]
			.into_iter()
			.collect();
		assert!(mixed.as_string_list().is_err());
	}

	#[test]
	fn parse_keeps_arity() {
		let mut list = Argument::from(vec![
			"pubkey:alice.pub".to_string(),
			"7".to_string(),
			"plain".to_string(),
		]);
		list.parse();
		assert_eq!(list.len(), 3);
		assert!(list.as_list()[0].is_key_value());
		assert!(list.as_list()[1].is_number());
		assert!(list.as_list()[2].is_string());
	}
}
