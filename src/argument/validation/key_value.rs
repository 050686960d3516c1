use std::collections::HashMap;

use super::{ArgumentValidation, ValidationResult};
use crate::argument::ArgumentValue;

/// Accepts a `key:value` token, checking the key and, for keys that have one
/// registered, the value.
///
/// Keys without a registered value validation pass through unchecked.
#[derive(Default)]
pub struct KeyValueValidation {
	key: Option<Box<dyn ArgumentValidation>>,
	values: HashMap<String, Box<dyn ArgumentValidation>>,
}

impl KeyValueValidation {
	pub fn with_key(mut self, validation: impl ArgumentValidation + 'static) -> Self {
		self.key = Some(Box::new(validation));
		self
	}

	/// Register the value validation for one key, replacing any previous one.
	pub fn with_value(
		mut self,
		key: impl Into<String>,
		validation: impl ArgumentValidation + 'static,
	) -> Self {
		self.values.insert(key.into(), Box::new(validation));
		self
	}

	fn validate_pair(&self, key: &str, value: &str) -> ValidationResult {
		let key_result = match &self.key {
			Some(validation) => validation
				.do_validate(&ArgumentValue::from(key))
				.prepend("Key validation:"),
			None => ValidationResult::Success,
		};

		let value_result = match self.values.get(key) {
			Some(validation) => validation
				.do_validate(&ArgumentValue::from(value))
				.prepend("Value validation:"),
			None => ValidationResult::Success,
		};

		key_result + value_result
	}
}

impl ArgumentValidation for KeyValueValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult {
		match (value.key(), value.value()) {
			(Ok(key), Ok(inner)) => self.validate_pair(key, inner),
			_ => ValidationResult::failure(format!(
				"Expected KeyValue, but found value of the type {}.",
				value.type_name()
			)),
		}
	}
}

/// Like [`KeyValueValidation`], but the token must also carry an alias.
#[derive(Default)]
pub struct KeyValueAliasValidation(KeyValueValidation);

impl KeyValueAliasValidation {
	pub fn with_key(self, validation: impl ArgumentValidation + 'static) -> Self {
		Self(self.0.with_key(validation))
	}

	pub fn with_value(
		self,
		key: impl Into<String>,
		validation: impl ArgumentValidation + 'static,
	) -> Self {
		Self(self.0.with_value(key, validation))
	}
}

impl ArgumentValidation for KeyValueAliasValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult {
		if value.is_key_value_alias() {
			self.0.do_validate(value)
		} else {
			ValidationResult::failure(format!(
				"Expected KeyValueAlias, but found value of the type {}.",
				value.type_name()
			))
		}
	}
}
