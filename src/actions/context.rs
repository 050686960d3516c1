use std::{fmt, path::PathBuf, rc::Rc};

use miette::Result;
use tracing::{debug, info};

use crate::{
	args::Args,
	argument::{
		io::ArgumentIo,
		source::{
			ArgumentCommandLineSource, ArgumentConfigSource, ArgumentDefaultsSource,
			ArgumentSourceChain, ArgumentUserSource,
		},
		value_source::{
			ArgumentValueFileSource, ArgumentValueParserSource, ArgumentValueSourceChain,
		},
	},
	config::AppConfig,
};

/// What a command runs with: its arguments and the app config.
pub struct Context {
	pub io: ArgumentIo,
	pub config: AppConfig,
	/// Where `config` was loaded from, and is saved to.
	pub config_path: Option<PathBuf>,
}

impl fmt::Debug for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("rules", &self.io.rules())
			.field("config_path", &self.config_path)
			.finish_non_exhaustive()
	}
}

impl Context {
	/// Wire the argument chains for a run from the command line.
	pub async fn new(args: &Args) -> Result<Self> {
		let mut sources = ArgumentSourceChain::new();
		sources.append_source(ArgumentCommandLineSource::from_env());

		let defaults_file = args.config.clone().or_else(|| {
			AppConfig::dir()
				.map(|dir| dir.join("defaults.yml"))
				.filter(|path| path.is_file())
		});
		if let Some(path) = defaults_file {
			debug!(?path, "using argument defaults file");
			sources.append_source(ArgumentConfigSource::new(path)?);
		}

		sources
			.append_source(ArgumentUserSource::new())
			.append_source(ArgumentDefaultsSource::default());

		let config_path = AppConfig::default_path();
		let config = match &config_path {
			Some(path) => AppConfig::load(path).await?,
			None => AppConfig::default(),
		};

		Ok(Self::with_io(ArgumentIo::new(sources, value_sources()), config, config_path))
	}

	pub fn with_io(io: ArgumentIo, config: AppConfig, config_path: Option<PathBuf>) -> Self {
		Self {
			io,
			config,
			config_path,
		}
	}

	/// Report progress, unless asked to be quiet.
	pub fn notice(&self, message: &str) -> Result<()> {
		if !self.io.is_quiet()? {
			info!("{message}");
		}
		Ok(())
	}
}

/// Files first, then literal values.
pub fn value_sources() -> ArgumentValueSourceChain {
	let mut values = ArgumentValueSourceChain::new();
	values
		.append_source(Rc::new(ArgumentValueFileSource))
		.append_source(Rc::new(ArgumentValueParserSource));
	values
}
