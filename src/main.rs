//! Normalise every expression in a given file and print the results to
//! standard output.
//!
//! Example usage:
//!
//!     RUST_LOG=debug cargo run -- \
//!         --src-filepath test_programs/church_numerals.lc \
//!         --max-steps 5000

use clap::Parser;
use lambda_normalise::end_to_end::{run_interpreter, InterpreterConfig};

fn main() {
    env_logger::init();

    let interpreter_config = InterpreterConfig::parse();

    match run_interpreter(&interpreter_config) {
        Ok(report) => {
            println!("{}", report);
        }

        Err(run_error) => {
            eprintln!("{}", run_error);
            std::process::exit(1);
        }
    }
}
