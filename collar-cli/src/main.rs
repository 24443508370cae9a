//! Command-line entry point.
//!
//! Mirrors the original tool's argv contract: one argument decodes the
//! whole file to binary output, three arguments decode a bounded number of
//! blocks and optionally also emit CSV. All the actual argument parsing
//! lives in [`collar_core::DecodeConfig::from_args`]; this binary just
//! wires stdin/stdout/logging around it.
use std::env;
use std::process::ExitCode;
use std::time::Instant;

use collar_core::DecodeConfig;
use collar_in::run;
use collar_out::OutputSet;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = match DecodeConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: collar-cli <input-file>");
            eprintln!("       collar-cli <input-file> <num-blocks> <emit-csv: 0|1>");
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "decoding {} into {} (num_blocks={:?}, csv={}, channels={})",
        config.input_path().display(),
        config.output_dir().display(),
        config.num_blocks(),
        config.emit_csv(),
        config.channel_count()
    );

    let mut sink = OutputSet::new(config.output_dir(), config.emit_csv());

    let start = Instant::now();
    match run(&config, &mut sink) {
        Ok(summary) => {
            summary.log_elapsed(start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("decode failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
