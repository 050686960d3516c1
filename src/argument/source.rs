//! Where raw argument values come from.

use clap::Command;
use tracing::{debug, trace};

use super::{Argument, ArgumentImportance, ArgumentParseOptions, ArgumentRules};
use crate::error::Error;

pub use command_line::{ArgumentCommandLineSource, parse_error};
pub use config::ArgumentConfigSource;
pub use defaults::ArgumentDefaultsSource;
pub use user_input::{ArgumentUserSource, CommandPrompt, TerminalPrompt};

mod command_line;
mod config;
mod defaults;
mod user_input;

/// One origin of raw arguments.
pub trait ArgumentSource {
	/// For diagnostics.
	fn name(&self) -> &'static str;

	/// Prepare to answer reads for the given usage grammar. Called once per
	/// grammar, in chain order.
	fn init(&mut self, usage: &Command, options: ArgumentParseOptions) -> Result<(), Error>;

	/// Adjust the chain's shared rules. Called after every source is
	/// initialised, in reverse chain order, so sources nearer the head win.
	fn update_rules(&self, _rules: &mut ArgumentRules) -> Result<(), Error> {
		Ok(())
	}

	/// Whether this source has an answer for `name`. Must not have side effects.
	fn can_read(&self, name: &str, importance: ArgumentImportance, rules: &ArgumentRules)
	-> bool;

	/// Only called after [`can_read`](Self::can_read) returned true.
	fn read(&self, name: &str) -> Result<Argument, Error>;

	/// Read a value which must not be echoed or logged.
	fn read_secure(&self, name: &str) -> Result<Argument, Error> {
		self.read(name)
	}
}

/// Sources in priority order, asked in turn until one can answer.
#[derive(Default)]
pub struct ArgumentSourceChain {
	sources: Vec<Box<dyn ArgumentSource>>,
	rules: ArgumentRules,
}

impl ArgumentSourceChain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a source with the lowest priority.
	pub fn append_source(&mut self, source: impl ArgumentSource + 'static) -> &mut Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Add a source with the highest priority.
	pub fn insert_source(&mut self, source: impl ArgumentSource + 'static) -> &mut Self {
		self.sources.insert(0, Box::new(source));
		self
	}

	pub fn rules(&self) -> ArgumentRules {
		self.rules
	}

	pub fn source_names(&self) -> Vec<&'static str> {
		self.sources.iter().map(|source| source.name()).collect()
	}

	pub fn init(&mut self, usage: &Command, options: ArgumentParseOptions) -> Result<(), Error> {
		for source in &mut self.sources {
			debug!(source = source.name(), usage = %usage.get_name(), "init argument source");
			source.init(usage, options)?;
		}

		for source in self.sources.iter().rev() {
			source.update_rules(&mut self.rules)?;
		}
		debug!(rules = ?self.rules, "argument rules");
		Ok(())
	}

	pub fn read(&self, name: &str, importance: ArgumentImportance) -> Result<Argument, Error> {
		self.read_from_sources(name, importance, false)
	}

	pub fn read_secure(
		&self,
		name: &str,
		importance: ArgumentImportance,
	) -> Result<Argument, Error> {
		self.read_from_sources(name, importance, true)
	}

	fn read_from_sources(
		&self,
		name: &str,
		importance: ArgumentImportance,
		secure: bool,
	) -> Result<Argument, Error> {
		debug!(%name, %importance, "search argument");
		for source in &self.sources {
			trace!(%name, source = source.name(), "ask source");
			if source.can_read(name, importance, &self.rules) {
				debug!(%name, source = source.name(), "read argument");
				return if secure {
					source.read_secure(name)
				} else {
					source.read(name)
				};
			}
		}

		match importance {
			ArgumentImportance::Required => Err(Error::NotFound(name.into())),
			ArgumentImportance::Optional => {
				debug!(%name, "optional argument not found");
				Ok(Argument::default())
			}
		}
	}
}
