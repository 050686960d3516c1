use clap::CommandFactory as _;
use miette::Result;
use tracing::{debug, trace};

pub use context::Context;
pub mod context;

use crate::{
	args::Args,
	argument::ArgumentParseOptions,
	error::Error,
};

macro_rules! commands {
	(
		$(
			$modname:ident => $name:literal($argname:ident)
		),+
	) => {
		$(
			pub mod $modname;
		)*

		/// Names the hub dispatches on.
		pub const COMMANDS: &[&str] = &[$($name),*];

		/// The usage grammar of a command.
		pub fn usage(command: &str) -> Option<clap::Command> {
			match command {
				$(
					$name => Some($modname::$argname::command().name($name)),
				)*
				_ => None,
			}
		}

		async fn dispatch(command: &str, ctx: &mut Context) -> Result<()> {
			match command {
				$(
					$name => $modname::run(ctx).await,
				)*
				other => Err(Error::Logic(format!("no command named {other}")).into()),
			}
		}
	};
}

commands! {
	keygen => "keygen"(KeygenArgs),
	key2pub => "key2pub"(Key2pubArgs),
	encrypt => "encrypt"(EncryptArgs),
	decrypt => "decrypt"(DecryptArgs),
	sign => "sign"(SignArgs),
	verify => "verify"(VerifyArgs),
	card_get => "card-get"(CardGetArgs),
	card_search => "card-search"(CardSearchArgs),
	card_info => "card-info"(CardInfoArgs),
	config => "config"(ConfigArgs)
}

pub async fn run(args: Args) -> Result<()> {
	debug!(version=%env!("CARGO_PKG_VERSION"), "starting up");
	let ctx = Context::new(&args).await?;
	trace!(?ctx, "context");
	run_in(ctx).await
}

/// Resolve the command through the argument chain, then run it.
pub async fn run_in(mut ctx: Context) -> Result<()> {
	ctx.io
		.configure_usage(&Args::command(), ArgumentParseOptions::options_first())?;
	let command = ctx.io.get_command(COMMANDS)?;
	debug!(%command, "dispatching");

	let usage =
		usage(&command).ok_or_else(|| Error::Logic(format!("no usage for command {command}")))?;
	ctx.io
		.configure_usage(&usage, ArgumentParseOptions::default())?;
	dispatch(&command, &mut ctx).await
}

#[test]
fn verify_commands() {
	for command in COMMANDS {
		let usage = usage(command).unwrap();
		assert_eq!(usage.get_name(), *command);
		usage.debug_assert();
	}
}
