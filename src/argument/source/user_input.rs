use age::secrecy::{ExposeSecret, SecretString};
use clap::{ArgAction, Command};
use dialoguer::{Confirm, Input, Password};
use pinentry::PassphraseInput;
use tracing::debug;

use super::ArgumentSource;
use crate::{
	argument::{Argument, ArgumentImportance, ArgumentParseOptions, ArgumentRules, names},
	error::Error,
};

/// Asks the user for values.
pub trait CommandPrompt {
	/// Repeats until the answer is not empty.
	fn read_string(&self, message: &str) -> Result<String, Error>;

	/// Does not echo the answer.
	fn read_secure_string(&self, message: &str) -> Result<SecretString, Error>;

	/// Reads answers until an empty one.
	fn read_string_list(&self, message: &str) -> Result<Vec<String>, Error>;

	fn read_bool(&self, message: &str) -> Result<bool, Error>;
}

/// [`CommandPrompt`] on the controlling terminal, using pinentry for secrets
/// when one is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

fn prompt_error(err: dialoguer::Error) -> Error {
	Error::io("reading user input", std::io::Error::other(err.to_string()))
}

impl CommandPrompt for TerminalPrompt {
	fn read_string(&self, message: &str) -> Result<String, Error> {
		Input::<String>::new()
			.with_prompt(message)
			.interact_text()
			.map_err(prompt_error)
	}

	fn read_secure_string(&self, message: &str) -> Result<SecretString, Error> {
		let prompt = format!("{message}:");
		if let Some(mut input) = PassphraseInput::with_default_binary() {
			input
				.with_prompt(&prompt)
				.required("Cannot use an empty value");
			input.interact().map_err(|err| {
				Error::io("reading user input", std::io::Error::other(err.to_string()))
			})
		} else {
			Password::new()
				.with_prompt(message)
				.interact()
				.map(SecretString::from)
				.map_err(prompt_error)
		}
	}

	fn read_string_list(&self, message: &str) -> Result<Vec<String>, Error> {
		let mut values = Vec::new();
		loop {
			let value = Input::<String>::new()
				.with_prompt(format!("{message} (empty to finish)"))
				.allow_empty(true)
				.interact_text()
				.map_err(prompt_error)?;
			if value.is_empty() {
				return Ok(values);
			}
			values.push(value);
		}
	}

	fn read_bool(&self, message: &str) -> Result<bool, Error> {
		Confirm::new()
			.with_prompt(message)
			.interact()
			.map_err(prompt_error)
	}
}

enum Shape {
	Flag,
	List,
	Single,
}

/// Prompts for arguments no other source could answer, when the rules allow it.
pub struct ArgumentUserSource<P = TerminalPrompt> {
	prompt: P,
	usage: Option<Command>,
}

impl ArgumentUserSource {
	pub fn new() -> Self {
		Self::with_prompt(TerminalPrompt)
	}
}

impl Default for ArgumentUserSource {
	fn default() -> Self {
		Self::new()
	}
}

impl<P: CommandPrompt> ArgumentUserSource<P> {
	pub fn with_prompt(prompt: P) -> Self {
		Self {
			prompt,
			usage: None,
		}
	}

	/// Only arguments of the current grammar, and the command name, are asked for.
	fn declares(&self, name: &str) -> bool {
		name == names::COMMAND
			|| self
				.usage
				.as_ref()
				.is_some_and(|usage| usage.get_arguments().any(|arg| arg.get_id() == name))
	}

	fn describe(&self, name: &str) -> (Shape, String) {
		let arg = self
			.usage
			.as_ref()
			.and_then(|usage| usage.get_arguments().find(|arg| arg.get_id() == name));

		let shape = match arg.map(|arg| arg.get_action()) {
			Some(ArgAction::SetTrue | ArgAction::SetFalse) => Shape::Flag,
			Some(ArgAction::Append) => Shape::List,
			_ => Shape::Single,
		};

		let message = arg
			.and_then(|arg| arg.get_help())
			.map(|help| help.to_string().trim_end_matches('.').to_string())
			.unwrap_or_else(|| format!("Type value for option: {name}"));

		(shape, message)
	}
}

impl<P: CommandPrompt> ArgumentSource for ArgumentUserSource<P> {
	fn name(&self) -> &'static str {
		"user input"
	}

	fn init(&mut self, usage: &Command, _options: ArgumentParseOptions) -> Result<(), Error> {
		self.usage = Some(usage.clone());
		Ok(())
	}

	fn can_read(&self, name: &str, importance: ArgumentImportance, rules: &ArgumentRules) -> bool {
		if !self.declares(name) {
			return false;
		}

		match importance {
			ArgumentImportance::Required => rules.allow_user_interaction,
			ArgumentImportance::Optional => {
				rules.allow_user_interaction && rules.allow_user_interaction_for_optional
			}
		}
	}

	fn read(&self, name: &str) -> Result<Argument, Error> {
		let (shape, message) = self.describe(name);
		debug!(%name, "prompting for argument");
		Ok(match shape {
			Shape::Flag => Argument::from(self.prompt.read_bool(&message)?),
			Shape::List => Argument::from(self.prompt.read_string_list(&message)?),
			Shape::Single => Argument::from(self.prompt.read_string(&message)?),
		})
	}

	fn read_secure(&self, name: &str) -> Result<Argument, Error> {
		let (_, message) = self.describe(name);
		debug!(%name, "prompting for secret argument");
		let secret = self.prompt.read_secure_string(&message)?;
		Ok(Argument::from(secret.expose_secret()))
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use clap::Arg;

	use super::*;

	#[derive(Default)]
	struct Scripted {
		asked: RefCell<Vec<String>>,
	}

	impl CommandPrompt for Scripted {
		fn read_string(&self, message: &str) -> Result<String, Error> {
			self.asked.borrow_mut().push(message.into());
			Ok("typed".into())
		}

		fn read_secure_string(&self, message: &str) -> Result<SecretString, Error> {
			self.asked.borrow_mut().push(message.into());
			Ok(SecretString::from("hunter2".to_string()))
		}

		fn read_string_list(&self, message: &str) -> Result<Vec<String>, Error> {
			self.asked.borrow_mut().push(message.into());
			Ok(vec!["one".into(), "two".into()])
		}

		fn read_bool(&self, message: &str) -> Result<bool, Error> {
			self.asked.borrow_mut().push(message.into());
			Ok(true)
		}
	}

	fn usage() -> Command {
		Command::new("test")
			.arg(Arg::new("input").long("input").help("Data to read."))
			.arg(Arg::new("recipient").action(ArgAction::Append))
			.arg(Arg::new("quiet").long("quiet").action(ArgAction::SetTrue))
	}

	#[test]
	fn rules_gate_prompts() {
		let mut source = ArgumentUserSource::with_prompt(Scripted::default());
		source
			.init(&usage(), ArgumentParseOptions::default())
			.unwrap();
		let mut rules = ArgumentRules::default();
		assert!(!source.can_read("input", ArgumentImportance::Required, &rules));

		rules.allow_user_interaction = true;
		assert!(source.can_read("input", ArgumentImportance::Required, &rules));
		assert!(!source.can_read("input", ArgumentImportance::Optional, &rules));

		rules.allow_user_interaction_for_optional = true;
		assert!(source.can_read("input", ArgumentImportance::Optional, &rules));
		assert!(!source.can_read("undeclared", ArgumentImportance::Optional, &rules));
		assert!(source.can_read(names::COMMAND, ArgumentImportance::Required, &rules));
	}

	#[test]
	fn prompt_follows_the_grammar() {
		let mut source = ArgumentUserSource::with_prompt(Scripted::default());
		source
			.init(&usage(), ArgumentParseOptions::default())
			.unwrap();

		assert_eq!(source.read("input").unwrap(), Argument::from("typed"));
		assert_eq!(source.read("recipient").unwrap().len(), 2);
		assert_eq!(source.read("quiet").unwrap(), Argument::from(true));
		assert_eq!(
			source.read_secure("password").unwrap(),
			Argument::from("hunter2")
		);

		assert_eq!(
			*source.prompt.asked.borrow(),
			vec![
				"Data to read".to_string(),
				"Type value for option: recipient".to_string(),
				"Type value for option: quiet".to_string(),
				"Type value for option: password".to_string(),
			]
		);
	}
}
