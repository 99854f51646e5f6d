use std::{error::Error, io, process::ExitCode};

use env_logger::Env;

use onenote_instance::{args, config, dispatch::ShellDispatcher, launcher::SystemLauncher, run};

// Logging is off unless asked for, stderr is reserved for error messages.
const LOG_ENV_VAR: &str = "ONENOTE_INSTANCE_LOG";

fn main() -> Result<ExitCode, Box<(dyn Error + 'static)>> {
    env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV_VAR, "off")).init();

    let args = args::from_os(std::env::args_os().skip(1));

    let status = run(
        &args,
        config::base_dir,
        &mut SystemLauncher,
        &ShellDispatcher,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;

    Ok(ExitCode::from(status.code()))
}
