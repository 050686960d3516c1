#![deny(rust_2018_idioms)]

pub use crate::actions::run;
pub use crate::args::get_args as args;

pub mod actions;
pub mod args;
pub mod argument;
pub mod config;
pub mod crypto;
pub mod error;
pub mod model;
pub mod service;

/// Turn the outcome of a run into a process exit status, reporting failures.
///
/// Help and version output go to stdout with success; anything else is printed
/// to stderr with the status of the first [`error::Error`] in its chain, or
/// [`error::ExitCode::Software`] when there is none.
pub fn exit(result: miette::Result<()>) -> std::process::ExitCode {
	use error::{Error, ExitCode};

	let Err(report) = result else {
		return ExitCode::Ok.into();
	};

	let error = report
		.chain()
		.find_map(|err| err.downcast_ref::<Error>());
	match error {
		Some(Error::ShowUsage(text) | Error::ShowVersion(text)) => {
			print!("{text}");
			ExitCode::Ok.into()
		}
		Some(error) => {
			eprintln!("{report:?}");
			error.exit_code().into()
		}
		None => {
			eprintln!("{report:?}");
			ExitCode::Software.into()
		}
	}
}
