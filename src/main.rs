//! flashdeck - Local-first flashcards with tag-filtered study sessions

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = flashdeck::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
