#![forbid(unsafe_code)]

use std::process::ExitCode;

use rca_harness::{Opts, logging, run};

fn main() -> ExitCode {
    let opts = Opts::parse();
    logging::init(&opts.log_filter, opts.log_json);

    match run(&opts) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "harness failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
