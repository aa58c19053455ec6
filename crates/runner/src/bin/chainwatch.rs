use chainwatch_runner::report::{render_json, render_text};
use chainwatch_runner::{AnalysisConfig, AnalysisKind, RunOptions, RunnerError, run};
use chrono::Utc;
use serde_json::Value;

fn print_help() {
    eprintln!(
        r#"Chainwatch - on-chain swap fraud detection

USAGE:
    chainwatch <ANALYSIS> <INPUT> [OPTIONS]

ANALYSIS:
    token       Wash trading, price manipulation, pump & dump
    sandwich    Sandwich attacks within blocks
    pool        Rug pulls, coordinated dumps, concentrated attacks, domination
    wallet      Insider entries and sniping-bot profile
    threat      Weighted risk score from a risk-flags document

OPTIONS:
    --config <PATH>     Load thresholds from a JSON file
    --wallet <ADDR>     Wallet to analyze (wallet) or address assessed (threat)
    --json              Print JSON instead of the text report
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (default: info)

EXAMPLES:
    chainwatch token swaps.json --config high.json
    chainwatch wallet history.json --wallet 0xabc --json
"#
    );
}

fn usage_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    print_help();
    std::process::exit(1);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mut positional: Vec<String> = Vec::new();
    let mut config_path: Option<String> = None;
    let mut subject: Option<String> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(path.clone()),
                    None => usage_error("--config requires a path argument"),
                }
            }
            "--wallet" | "--address" | "-w" => {
                i += 1;
                match args.get(i) {
                    Some(address) => subject = Some(address.clone()),
                    None => usage_error("--wallet requires an address argument"),
                }
            }
            "--json" => json = true,
            arg if arg.starts_with('-') => usage_error(&format!("Unknown argument: {}", arg)),
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }

    let [kind, input] = positional.as_slice() else {
        usage_error("expected <ANALYSIS> and <INPUT>");
    };
    let kind: AnalysisKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => usage_error(&e.to_string()),
    };

    let config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            AnalysisConfig::from_file(&path)?
        }
        None => AnalysisConfig::default(),
    };

    let content = std::fs::read_to_string(input).map_err(|source| RunnerError::Io {
        path: input.clone(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&content).map_err(RunnerError::from)?;

    let options = RunOptions {
        subject,
        as_of: Some(Utc::now()),
    };
    let analysis = run(kind, &doc, &config, &options)?;

    if json {
        println!("{}", render_json(&analysis)?);
    } else {
        print!("{}", render_text(&analysis, &config.report));
    }

    Ok(())
}
