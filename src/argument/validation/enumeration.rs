use super::{ArgumentValidation, ValidationResult};
use crate::{argument::ArgumentValue, error::Error};

/// Accepts a string equal to one of a fixed set of candidates.
#[derive(Debug, Clone)]
pub struct EnumValidation {
	valid_values: Vec<String>,
}

impl EnumValidation {
	pub fn new(valid_values: &[&str]) -> Result<Self, Error> {
		if valid_values.is_empty() {
			return Err(Error::Logic("valid values are not defined.".into()));
		}

		Ok(Self {
			valid_values: valid_values.iter().map(|v| v.to_string()).collect(),
		})
	}

	pub fn check(&self, value: &str) -> ValidationResult {
		if self.valid_values.iter().any(|valid| valid == value) {
			ValidationResult::Success
		} else {
			ValidationResult::failure(format!(
				"Expected one of the values {{{}}}, but got '{value}'.",
				self.valid_values.join(", ")
			))
		}
	}
}

impl ArgumentValidation for EnumValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult {
		match value {
			ArgumentValue::String(text) => self.check(text),
			other => ValidationResult::failure(format!(
				"Expected enum string, but found value of the type {}.",
				other.type_name()
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exact_match_only() {
		let validation = EnumValidation::new(&["x25519", "ed25519"]).unwrap();
		assert!(validation.check("x25519").is_success());
		assert!(validation.check("ed25519").is_success());
		assert_eq!(
			validation.check("X25519").message(),
			Some("Expected one of the values {x25519, ed25519}, but got 'X25519'.")
		);
		assert!(!validation.check("x25519 ").is_success());
	}

	#[test]
	fn rejects_non_strings() {
		let validation = EnumValidation::new(&["yes"]).unwrap();
		assert_eq!(
			validation.do_validate(&ArgumentValue::from(true)).message(),
			Some("Expected enum string, but found value of the type bool.")
		);
	}

	#[test]
	fn no_candidates_is_a_bug() {
		assert!(matches!(EnumValidation::new(&[]), Err(Error::Logic(_))));
	}
}
