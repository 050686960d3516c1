//! Composable checks over raw argument values.
//!
//! Validation never fails for an expected mismatch: it returns a
//! [`ValidationResult`] which the caller turns into an error with
//! [`ValidationResult::check`]. Only a malformed validator (an enum with no
//! candidates, a range with `min > max`) is an error, at construction.

use std::ops::{Add, AddAssign};

use crate::{
	argument::{Argument, ArgumentImportance, ArgumentValue},
	error::Error,
};

pub use basic::{
	AnyValidation, BoolValidation, NotEmptyValidation, NumberValidation, TextValidation,
};
pub use enumeration::EnumValidation;
pub use key_value::{KeyValueAliasValidation, KeyValueValidation};
pub use range::RangeValidation;

mod basic;
mod enumeration;
mod key_value;
mod range;

/// Outcome of a validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
	Success,
	Failure(String),
}

impl ValidationResult {
	pub fn failure(message: impl Into<String>) -> Self {
		Self::Failure(message.into())
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success)
	}

	pub fn message(&self) -> Option<&str> {
		match self {
			Self::Success => None,
			Self::Failure(message) => Some(message),
		}
	}

	/// Prefix a failure message; success is left alone.
	pub fn prepend(self, prefix: &str) -> Self {
		match self {
			Self::Success => Self::Success,
			Self::Failure(message) => Self::Failure(format!("{prefix} {message}")),
		}
	}

	/// Suffix a failure message; success is left alone.
	pub fn append(self, suffix: &str) -> Self {
		match self {
			Self::Success => Self::Success,
			Self::Failure(message) => Self::Failure(format!("{message} {suffix}")),
		}
	}

	/// Turn a failure into a validation error for the named argument.
	pub fn check(self, name: &str) -> Result<(), Error> {
		match self {
			Self::Success => Ok(()),
			Self::Failure(message) => Err(Error::validation(name, message)),
		}
	}
}

impl Add for ValidationResult {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		match (self, rhs) {
			(Self::Success, Self::Success) => Self::Success,
			(Self::Failure(left), Self::Failure(right)) => Self::Failure(format!("{left} {right}")),
			(failure @ Self::Failure(_), Self::Success) | (Self::Success, failure) => failure,
		}
	}
}

impl AddAssign for ValidationResult {
	fn add_assign(&mut self, rhs: Self) {
		let lhs = std::mem::replace(self, Self::Success);
		*self = lhs + rhs;
	}
}

/// A check over a single [`ArgumentValue`].
///
/// Implementors only provide [`do_validate`](Self::do_validate); arity and
/// importance handling come from the provided methods.
pub trait ArgumentValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult;

	/// Validate an argument which must hold a single value.
	fn try_validate(&self, argument: &Argument, importance: ArgumentImportance) -> ValidationResult {
		if argument.is_empty() {
			return match importance {
				ArgumentImportance::Optional => ValidationResult::Success,
				ArgumentImportance::Required => {
					ValidationResult::failure("Expected one argument, but got empty.")
				}
			};
		}

		if !argument.is_value() {
			return ValidationResult::failure("Expected one argument, but got more than one.");
		}

		self.do_validate(&argument.as_value())
	}

	/// Validate every value of a list argument.
	fn try_validate_list(
		&self,
		argument: &Argument,
		importance: ArgumentImportance,
	) -> ValidationResult {
		if argument.is_empty() {
			return match importance {
				ArgumentImportance::Optional => ValidationResult::Success,
				ArgumentImportance::Required => {
					ValidationResult::failure("Expected one or more arguments, but got zero.")
				}
			};
		}

		argument
			.as_list()
			.iter()
			.fold(ValidationResult::Success, |result, value| {
				result + self.do_validate(value)
			})
	}

	fn validate(
		&self,
		name: &str,
		argument: &Argument,
		importance: ArgumentImportance,
	) -> Result<(), Error> {
		self.try_validate(argument, importance).check(name)
	}

	fn validate_list(
		&self,
		name: &str,
		argument: &Argument,
		importance: ArgumentImportance,
	) -> Result<(), Error> {
		self.try_validate_list(argument, importance).check(name)
	}
}

/// Factories for the stock validators.
pub struct ArgumentValidationHub;

impl ArgumentValidationHub {
	pub fn is_any() -> AnyValidation {
		AnyValidation
	}

	pub fn is_not_empty() -> NotEmptyValidation {
		NotEmptyValidation
	}

	pub fn is_text() -> TextValidation {
		TextValidation
	}

	pub fn is_bool() -> BoolValidation {
		BoolValidation
	}

	pub fn is_number() -> NumberValidation {
		NumberValidation
	}

	pub fn is_enum(valid_values: &[&str]) -> Result<EnumValidation, Error> {
		EnumValidation::new(valid_values)
	}

	pub fn is_range(min: usize, max: usize) -> Result<RangeValidation, Error> {
		RangeValidation::new(min, max)
	}

	pub fn is_key_value() -> KeyValueValidation {
		KeyValueValidation::default()
	}

	pub fn is_key_value_alias() -> KeyValueAliasValidation {
		KeyValueAliasValidation::default()
	}
}
