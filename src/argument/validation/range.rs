use super::{ArgumentValidation, ValidationResult};
use crate::{argument::ArgumentValue, error::Error};

/// Accepts a number within `min..=max`.
#[derive(Debug, Clone, Copy)]
pub struct RangeValidation {
	min: usize,
	max: usize,
}

impl RangeValidation {
	pub fn new(min: usize, max: usize) -> Result<Self, Error> {
		if min > max {
			return Err(Error::Logic("min greater than max.".into()));
		}

		Ok(Self { min, max })
	}

	pub fn check(&self, value: usize) -> ValidationResult {
		if value < self.min {
			ValidationResult::failure(format!("Invalid range: {value} < {}.", self.min))
		} else if value > self.max {
			ValidationResult::failure(format!("Invalid range: {value} > {}.", self.max))
		} else {
			ValidationResult::Success
		}
	}
}

impl ArgumentValidation for RangeValidation {
	fn do_validate(&self, value: &ArgumentValue) -> ValidationResult {
		match value {
			ArgumentValue::Number(number) => self.check(*number),
			other => ValidationResult::failure(format!(
				"Expected number, but found value of the type {}.",
				other.type_name()
			)),
		}
	}
}
