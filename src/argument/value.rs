use std::fmt;

use age::secrecy::zeroize::Zeroize;

use crate::error::Error;

/// A single raw value read for an argument.
///
/// Values arrive as text from the command line, a config file or a prompt.
/// [`ArgumentValue::parse`] interprets text as a number or a
/// `key:value[:alias]` token; nothing else is coerced implicitly.
///
/// Text held by a value is wiped on drop, and the [`Debug`] impl only shows the
/// variant, as arguments routinely carry passwords.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum ArgumentValue {
	#[default]
	Empty,
	Bool(bool),
	Number(usize),
	String(String),
	KeyValue {
		key: String,
		value: String,
	},
	KeyValueAlias {
		key: String,
		value: String,
		alias: String,
	},
}

const DELIMITERS: &[char] = &[':', '='];

impl ArgumentValue {
	/// Interpret string content in place.
	///
	/// A string of ASCII digits becomes a number. Otherwise the string is split on
	/// `:` and `=` with empty pieces dropped: two pieces make a key-value, three
	/// make a key-value with alias. Anything else is left untouched, so calling
	/// this more than once is harmless.
	pub fn parse(&mut self) {
		let Self::String(text) = self else {
			return;
		};

		if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
			if let Ok(number) = text.parse() {
				*self = Self::Number(number);
			}
			return;
		}

		let parsed = {
			let tokens: Vec<&str> = text.split(DELIMITERS).filter(|t| !t.is_empty()).collect();
			match tokens.as_slice() {
				[key, value] => Self::KeyValue {
					key: key.to_string(),
					value: value.to_string(),
				},
				[key, value, alias] => Self::KeyValueAlias {
					key: key.to_string(),
					value: value.to_string(),
					alias: alias.to_string(),
				},
				_ => return,
			}
		};
		*self = parsed;
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Empty => "empty",
			Self::Bool(_) => "bool",
			Self::Number(_) => "number",
			Self::String(_) => "string",
			Self::KeyValue { .. } => "key-value",
			Self::KeyValueAlias { .. } => "key-value-alias",
		}
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Self::Empty)
	}

	pub fn is_bool(&self) -> bool {
		matches!(self, Self::Bool(_))
	}

	pub fn is_number(&self) -> bool {
		matches!(self, Self::Number(_))
	}

	pub fn is_string(&self) -> bool {
		matches!(self, Self::String(_))
	}

	/// True for both key-value shapes.
	pub fn is_key_value(&self) -> bool {
		matches!(self, Self::KeyValue { .. } | Self::KeyValueAlias { .. })
	}

	pub fn is_key_value_alias(&self) -> bool {
		matches!(self, Self::KeyValueAlias { .. })
	}

	fn cast(&self, expected: &'static str) -> Error {
		Error::Cast {
			found: self.type_name(),
			expected,
		}
	}

	pub fn as_bool(&self) -> Result<bool, Error> {
		match self {
			Self::Bool(value) => Ok(*value),
			_ => Err(self.cast("bool")),
		}
	}

	/// Lenient boolean: numbers count as true when positive, anything else as false.
	pub fn as_optional_bool(&self) -> bool {
		match self {
			Self::Bool(value) => *value,
			Self::Number(value) => *value > 0,
			_ => false,
		}
	}

	pub fn as_number(&self) -> Result<usize, Error> {
		match self {
			Self::Number(value) => Ok(*value),
			_ => Err(self.cast("number")),
		}
	}

	pub fn as_string(&self) -> Result<&str, Error> {
		match self {
			Self::String(value) => Ok(value),
			_ => Err(self.cast("string")),
		}
	}

	pub fn key(&self) -> Result<&str, Error> {
		match self {
			Self::KeyValue { key, .. } | Self::KeyValueAlias { key, .. } => Ok(key),
			_ => Err(self.cast("key-value")),
		}
	}

	pub fn value(&self) -> Result<&str, Error> {
		match self {
			Self::KeyValue { value, .. } | Self::KeyValueAlias { value, .. } => Ok(value),
			_ => Err(self.cast("key-value")),
		}
	}

	pub fn alias(&self) -> Result<&str, Error> {
		match self {
			Self::KeyValueAlias { alias, .. } => Ok(alias),
			_ => Err(self.cast("key-value-alias")),
		}
	}

	/// Text form of a scalar value, as the user would have typed it.
	pub fn to_text(&self) -> Result<String, Error> {
		match self {
			Self::String(value) => Ok(value.clone()),
			Self::Number(value) => Ok(value.to_string()),
			Self::Bool(value) => Ok(value.to_string()),
			_ => Err(self.cast("string")),
		}
	}
}

impl Drop for ArgumentValue {
	fn drop(&mut self) {
		match self {
			Self::String(value) => value.zeroize(),
			Self::KeyValue { key, value } => {
				key.zeroize();
				value.zeroize();
			}
			Self::KeyValueAlias { key, value, alias } => {
				key.zeroize();
				value.zeroize();
				alias.zeroize();
			}
			Self::Empty | Self::Bool(_) | Self::Number(_) => {}
		}
	}
}

impl fmt::Debug for ArgumentValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(value) => write!(f, "Bool({value})"),
			Self::Number(value) => write!(f, "Number({value})"),
			other => write!(f, "{}(..)", other.type_name()),
		}
	}
}

impl From<bool> for ArgumentValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<usize> for ArgumentValue {
	fn from(value: usize) -> Self {
		Self::Number(value)
	}
}

impl From<String> for ArgumentValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<&str> for ArgumentValue {
	fn from(value: &str) -> Self {
		Self::String(value.into())
	}
}
