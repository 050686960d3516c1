use std::collections::BTreeMap;

use clap::Command;

use super::ArgumentSource;
use crate::{
	argument::{Argument, ArgumentImportance, ArgumentParseOptions, ArgumentRules, names},
	error::Error,
};

/// Built-in fallback values, asked last.
#[derive(Debug, Clone)]
pub struct ArgumentDefaultsSource {
	values: BTreeMap<String, Argument>,
}

impl ArgumentDefaultsSource {
	pub fn empty() -> Self {
		Self {
			values: BTreeMap::new(),
		}
	}

	pub fn with(mut self, name: &str, value: impl Into<Argument>) -> Self {
		self.values.insert(name.into(), value.into());
		self
	}
}

impl Default for ArgumentDefaultsSource {
	fn default() -> Self {
		Self::empty()
			.with(names::ALGORITHM, "x25519")
			.with(names::IDENTITY_TYPE, "email")
			.with(names::SCOPE, "application")
	}
}

impl ArgumentSource for ArgumentDefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn init(&mut self, _usage: &Command, _options: ArgumentParseOptions) -> Result<(), Error> {
		Ok(())
	}

	fn can_read(&self, name: &str, _importance: ArgumentImportance, _rules: &ArgumentRules) -> bool {
		self.values.contains_key(name)
	}

	fn read(&self, name: &str) -> Result<Argument, Error> {
		self.values
			.get(name)
			.cloned()
			.ok_or_else(|| Error::NotFound(name.into()))
	}
}
