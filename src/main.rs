use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
	let runtime = match tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()
	{
		Ok(runtime) => runtime,
		Err(err) => {
			eprintln!("failed to start the runtime: {err}");
			return virgil_cli::error::ExitCode::OsErr.into();
		}
	};

	virgil_cli::exit(runtime.block_on(async {
		let (args, _guard) = virgil_cli::args()?;
		virgil_cli::run(args).await
	}))
}
