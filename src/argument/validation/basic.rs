use super::{ArgumentValidation, ValidationResult};
use crate::argument::ArgumentValue;

/// Accepts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValidation;

impl ArgumentValidation for AnyValidation {
	fn do_validate(&self, _value: &ArgumentValue) -> ValidationResult {
		ValidationResult::Success
	}
}

/// Rejects absent values and empty strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmptyValidation;

impl ArgumentValidation for NotEmptyValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult {
		match value {
			ArgumentValue::Empty => ValidationResult::failure("Expected not empty value."),
			ArgumentValue::String(text) if text.is_empty() => {
				ValidationResult::failure("Expected not empty value.")
			}
			_ => ValidationResult::Success,
		}
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextValidation;

impl ArgumentValidation for TextValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult {
		expect_type(value, "text", ArgumentValue::is_string)
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolValidation;

impl ArgumentValidation for BoolValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult {
		expect_type(value, "boolean", ArgumentValue::is_bool)
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValidation;

impl ArgumentValidation for NumberValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult {
		expect_type(value, "number", ArgumentValue::is_number)
	}
}

fn expect_type(
	value: &ArgumentValue,
	expected: &str,
	is: fn(&ArgumentValue) -> bool,
) -> ValidationResult {
	if is(value) {
		ValidationResult::Success
	} else {
		ValidationResult::failure(format!(
			"Expected {expected}, but found value of the type {}.",
			value.type_name()
		))
	}
}
