//! gitt - Git branch management

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = gitt::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
