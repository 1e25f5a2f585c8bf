//! vistask-cli library: argument parsing, logging setup and the command
//! bodies shared by the `vistask-*` binaries.

pub mod commands;
pub mod logging;

use vistask_core::error::CliError;

/// Print `e` the way the tools report it and pick the process exit code.
///
/// Configuration problems go to stdout as `Error: ...` and end normally;
/// anything else goes to stderr.
pub fn report_error(e: &CliError) -> i32 {
    match e {
        CliError::Config(inner) => println!("Error: {inner}"),
        other => eprintln!("{other}"),
    }
    e.exit_code()
}
