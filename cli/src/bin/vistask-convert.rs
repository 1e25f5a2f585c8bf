use clap::Parser;
use vistask_cli::commands::cli::ConvertArgs;
use vistask_cli::commands::{convert, load_config};
use vistask_cli::{logging, report_error};
use vistask_core::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => report_error(&e),
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = ConvertArgs::parse();
    let cfg = load_config(args.config.as_deref())?;
    logging::init_tracing("vistask-convert", &cfg.logging).map_err(CliError::Logging)?;
    convert::run(args, &cfg).await
}
