use std::process::ExitCode;

use hourtrack::cli::{report_failure, run_cli};
use tracing::error;

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error running cli {e:?}");
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}
