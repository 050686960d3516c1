use std::path::PathBuf;

use clap::Command;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::ArgumentSource;
use crate::{
	argument::{
		Argument, ArgumentImportance, ArgumentParseOptions, ArgumentRules, ArgumentValue, names,
	},
	error::Error,
};

/// Argument values from a YAML mapping of argument ids to values.
///
/// ```yaml
/// algorithm: ed25519
/// interactive: true
/// recipient:
///   - pubkey:alice.pub
///   - email:bob@example.com
/// ```
#[derive(Debug)]
pub struct ArgumentConfigSource {
	path: PathBuf,
	values: Option<Mapping>,
}

impl ArgumentConfigSource {
	/// The file must exist now; it is read on first [`init`](ArgumentSource::init).
	pub fn new(path: impl Into<PathBuf>) -> Result<Self, Error> {
		let path = path.into();
		if !path.is_file() {
			return Err(Error::FileNotFound(path));
		}

		Ok(Self { path, values: None })
	}

	fn load(&self) -> Result<Mapping, Error> {
		let text = std::fs::read_to_string(&self.path)
			.map_err(|err| Error::io(format!("reading {}", self.path.display()), err))?;
		match serde_yaml::from_str(&text) {
			Ok(Value::Mapping(values)) => Ok(values),
			Ok(Value::Null) => Ok(Mapping::new()),
			Ok(_) => Err(self.malformed("expected a mapping of argument names to values")),
			Err(err) => Err(self.malformed(err.to_string())),
		}
	}

	fn malformed(&self, message: impl Into<String>) -> Error {
		Error::Config {
			path: self.path.clone(),
			message: message.into(),
		}
	}

	fn get(&self, name: &str) -> Option<&Value> {
		self.values
			.as_ref()?
			.get(name)
			.filter(|value| !value.is_null())
	}

	fn flag(&self, name: &str) -> Result<Option<bool>, Error> {
		match self.get(name) {
			None => Ok(None),
			Some(Value::Bool(value)) => Ok(Some(*value)),
			Some(_) => Err(Error::Type {
				name: name.into(),
				expected: "bool",
			}),
		}
	}
}

fn scalar(name: &str, value: &Value) -> Result<ArgumentValue, Error> {
	match value {
		Value::Bool(value) => Ok(ArgumentValue::from(*value)),
		Value::Number(number) => Ok(match number.as_u64().map(usize::try_from) {
			Some(Ok(number)) => ArgumentValue::from(number),
			_ => ArgumentValue::from(number.to_string()),
		}),
		Value::String(text) => Ok(ArgumentValue::from(text.as_str())),
		_ => Err(Error::Type {
			name: name.into(),
			expected: "scalar",
		}),
	}
}

impl ArgumentSource for ArgumentConfigSource {
	fn name(&self) -> &'static str {
		"config file"
	}

	fn init(&mut self, _usage: &Command, _options: ArgumentParseOptions) -> Result<(), Error> {
		if self.values.is_none() {
			debug!(path = ?self.path, "loading argument config");
			self.values = Some(self.load()?);
		}
		Ok(())
	}

	fn update_rules(&self, rules: &mut ArgumentRules) -> Result<(), Error> {
		if let Some(interactive) = self.flag(names::INTERACTIVE)? {
			rules.allow_user_interaction = interactive;
		}
		if let Some(interactive) = self.flag(names::INTERACTIVE_OPTIONAL)? {
			rules.allow_user_interaction_for_optional = interactive;
		}
		Ok(())
	}

	fn can_read(&self, name: &str, _importance: ArgumentImportance, _rules: &ArgumentRules) -> bool {
		self.get(name).is_some()
	}

	fn read(&self, name: &str) -> Result<Argument, Error> {
		match self.get(name) {
			None => Ok(Argument::default()),
			Some(Value::Sequence(items)) => items.iter().map(|item| scalar(name, item)).collect(),
			Some(value) => scalar(name, value).map(Argument::from),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn loaded(yaml: &str) -> (tempfile::TempDir, ArgumentConfigSource) {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("virgil.yml");
		std::fs::write(&path, yaml).unwrap();
		let mut source = ArgumentConfigSource::new(path).unwrap();
		source
			.init(&Command::new("test"), ArgumentParseOptions::default())
			.unwrap();
		(dir, source)
	}

	#[test]
	fn missing_file_fails_at_construction() {
		let dir = tempfile::tempdir().unwrap();
		assert!(matches!(
			ArgumentConfigSource::new(dir.path().join("nope.yml")),
			Err(Error::FileNotFound(_))
		));
	}

	#[test]
	fn malformed_file_fails_at_init() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.yml");
		std::fs::write(&path, "key: [unclosed").unwrap();

		let mut source = ArgumentConfigSource::new(&path).unwrap();
		assert!(matches!(
			source.init(&Command::new("test"), ArgumentParseOptions::default()),
			Err(Error::Config { .. })
		));

		std::fs::write(&path, "- just\n- a list\n").unwrap();
		let mut source = ArgumentConfigSource::new(&path).unwrap();
		assert!(
			source
				.init(&Command::new("test"), ArgumentParseOptions::default())
				.is_err()
		);
	}

	#[test]
	fn values() {
		let (_dir, source) = loaded(
			"algorithm: ed25519\n\
			 count: 3\n\
			 quiet: true\n\
			 input: ~\n\
			 recipient:\n  - pubkey:alice.pub\n  - email:bob@example.com\n",
		);
		let rules = ArgumentRules::default();

		assert!(source.can_read("algorithm", ArgumentImportance::Required, &rules));
		assert!(!source.can_read("input", ArgumentImportance::Optional, &rules));
		assert!(!source.can_read("output", ArgumentImportance::Optional, &rules));

		assert_eq!(source.read("algorithm").unwrap(), Argument::from("ed25519"));
		assert_eq!(source.read("count").unwrap(), Argument::from(3_usize));
		assert_eq!(source.read("quiet").unwrap(), Argument::from(true));

		let recipients = source.read("recipient").unwrap();
		assert_eq!(
			recipients.as_string_list().unwrap(),
			vec!["pubkey:alice.pub", "email:bob@example.com"]
		);
	}

	#[test]
	fn empty_file_answers_nothing() {
		let (_dir, source) = loaded("");
		assert!(!source.can_read(
			"algorithm",
			ArgumentImportance::Optional,
			&ArgumentRules::default()
		));
	}

	#[test]
	fn rules() {
		let (_dir, source) = loaded("interactive: true\ninteractive_optional: true\n");
		let mut rules = ArgumentRules::default();
		source.update_rules(&mut rules).unwrap();
		assert!(rules.allow_user_interaction);
		assert!(rules.allow_user_interaction_for_optional);

		let (_dir, source) = loaded("interactive: maybe\n");
		assert!(source.update_rules(&mut rules).is_err());
	}
}
