use std::process::ExitCode;

use gitmem::cli::{self, Cli};
use gitmem::ui::output;

fn main() -> ExitCode {
    let args = Cli::parse_args();
    cli::init_logging(&args);

    match cli::run(args) {
        Ok(code) => code,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
