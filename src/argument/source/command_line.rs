use std::ffi::OsString;

use clap::{
	ArgAction, ArgMatches, Command,
	error::ErrorKind,
	parser::ValueSource,
};
use tracing::{debug, trace};

use super::ArgumentSource;
use crate::{
	argument::{
		Argument, ArgumentImportance, ArgumentParseOptions, ArgumentRules, ArgumentValue, names,
	},
	error::Error,
};

/// One usage grammar applied to (part of) the command line.
#[derive(Debug)]
struct Scope {
	usage: Command,
	matches: ArgMatches,
}

impl Scope {
	fn declares(&self, name: &str) -> bool {
		self.usage.get_arguments().any(|arg| arg.get_id() == name)
	}

	/// Given by the user, not filled in by a clap default.
	fn given(&self, name: &str) -> bool {
		self.declares(name)
			&& matches!(
				self.matches.value_source(name),
				Some(ValueSource::CommandLine | ValueSource::EnvVariable)
			)
	}

	fn read(&self, name: &str) -> Result<Argument, Error> {
		let action = self
			.usage
			.get_arguments()
			.find(|arg| arg.get_id() == name)
			.map(|arg| arg.get_action().clone());

		match action {
			Some(ArgAction::SetTrue | ArgAction::SetFalse) => {
				Ok(Argument::from(self.matches.get_flag(name)))
			}
			Some(ArgAction::Count) => Ok(Argument::from(usize::from(
				self.matches.get_count(name),
			))),
			_ => self
				.matches
				.get_raw(name)
				.into_iter()
				.flatten()
				.map(|raw| {
					raw.to_str()
						.map(ArgumentValue::from)
						.ok_or_else(|| Error::Value {
							name: name.into(),
							value: raw.to_string_lossy().into_owned(),
						})
				})
				.collect(),
		}
	}
}

/// Arguments the user typed, parsed against each usage grammar in turn.
///
/// With [`ArgumentParseOptions::options_first`], parsing stops at the command
/// name and the rest of the line is kept for the next grammar. Reads look at
/// the innermost grammar first, so options given before the command name still
/// count.
#[derive(Debug)]
pub struct ArgumentCommandLineSource {
	argv: Vec<OsString>,
	rest: Option<Vec<OsString>>,
	scopes: Vec<Scope>,
}

impl ArgumentCommandLineSource {
	pub fn new<I, T>(argv: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString>,
	{
		Self {
			argv: argv.into_iter().map(Into::into).collect(),
			rest: None,
			scopes: Vec::new(),
		}
	}

	pub fn from_env() -> Self {
		Self::new(std::env::args_os())
	}

	fn command(&self) -> Option<&str> {
		self.scopes
			.iter()
			.rev()
			.find_map(|scope| scope.matches.subcommand_name())
	}
}

/// Help and version requests become [`Error::ShowUsage`] / [`Error::ShowVersion`].
pub fn parse_error(err: clap::Error) -> Error {
	let rendered = err.render().to_string();
	match err.kind() {
		ErrorKind::DisplayHelp => Error::ShowUsage(rendered),
		ErrorKind::DisplayVersion => Error::ShowVersion(rendered),
		_ => Error::Parse(rendered.trim_end().into()),
	}
}

impl ArgumentSource for ArgumentCommandLineSource {
	fn name(&self) -> &'static str {
		"command line"
	}

	fn init(&mut self, usage: &Command, options: ArgumentParseOptions) -> Result<(), Error> {
		let argv = self.rest.take().unwrap_or_else(|| self.argv.clone());
		trace!(args = argv.len(), usage = %usage.get_name(), "parsing command line");
		let matches = usage.clone().try_get_matches_from(argv).map_err(parse_error)?;

		if options.options_first {
			if let Some((command, nested)) = matches.subcommand() {
				let mut rest = vec![OsString::from(command)];
				rest.extend(nested.get_raw("").into_iter().flatten().map(ToOwned::to_owned));
				debug!(%command, "command line continues with a command");
				self.rest = Some(rest);
			}
		}

		self.scopes.push(Scope {
			usage: usage.clone(),
			matches,
		});
		Ok(())
	}

	fn update_rules(&self, rules: &mut ArgumentRules) -> Result<(), Error> {
		if self.scopes.iter().any(|scope| scope.given(names::INTERACTIVE)) {
			rules.allow_user_interaction = true;
		}
		Ok(())
	}

	fn can_read(&self, name: &str, _importance: ArgumentImportance, _rules: &ArgumentRules) -> bool {
		if name == names::COMMAND {
			return self.command().is_some();
		}

		self.scopes.iter().any(|scope| scope.given(name))
	}

	fn read(&self, name: &str) -> Result<Argument, Error> {
		if name == names::COMMAND {
			return Ok(self.command().map(Argument::from).unwrap_or_default());
		}

		match self.scopes.iter().rev().find(|scope| scope.given(name)) {
			Some(scope) => scope.read(name),
			None => Ok(Argument::default()),
		}
	}
}
