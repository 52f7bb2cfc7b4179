#![forbid(unsafe_code)]

use std::env;
use std::fs;

use feeworks_engines::FeeEngineConfig;
use feeworks_tools::logging::init_tracing_subscriber;
use feeworks_tools::summary_cli::{execute_summary_command, USAGE};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    init_tracing_subscriber();

    let args: Vec<String> = env::args().skip(1).collect();
    let subcommand = args.first().ok_or_else(|| USAGE.to_string())?.as_str();
    let snapshot_path = args.get(1).ok_or_else(|| USAGE.to_string())?;
    let snapshot_json = read_file(snapshot_path)?;

    let arg = match subcommand {
        "apply" => {
            let command_path = args
                .get(2)
                .ok_or_else(|| "usage: feeworks apply <snapshot.json> <command.json>".to_string())?;
            Some(read_file(command_path)?)
        }
        _ => args.get(2).cloned(),
    };

    let output = execute_summary_command(
        FeeEngineConfig::mvp_v1(),
        subcommand,
        &snapshot_json,
        arg.as_deref(),
    )?;
    println!("{output}");
    Ok(())
}

fn read_file(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))
}
