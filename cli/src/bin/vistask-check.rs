use clap::Parser;
use vistask_cli::commands::cli::CheckArgs;
use vistask_cli::commands::{check, load_config};
use vistask_cli::{logging, report_error};
use vistask_core::error::CliError;

fn main() {
    let exit = match real_main() {
        Ok(code) => code,
        Err(e) => report_error(&e),
    };

    std::process::exit(exit);
}

fn real_main() -> Result<i32, CliError> {
    let args = CheckArgs::parse();
    let cfg = load_config(args.config.as_deref())?;
    logging::init_tracing("vistask-check", &cfg.logging).map_err(CliError::Logging)?;
    check::run(args, &cfg)
}
