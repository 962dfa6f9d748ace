//! contract-runner: headless host for the seeded-sampling contract.
//!
//! Reads one JSON command per line, writes one JSON reply per line.
//!
//! Usage:
//!   contract-runner --settings settings.json --db contract.db < commands.jsonl
//!   contract-runner --beacon-seed 12345 --script demo.jsonl

use anyhow::Result;
use seedsample_core::{
    command::{execute, ContractCommand},
    config::ContractSettings,
    contract::RandomContract,
    store::ContractStore,
    types::Height,
};
use serde_json::json;
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

/// Host-level commands that never reach the contract.
#[derive(serde::Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum HostCommand {
    Finalize { height: Height },
    Summary,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let mut settings = match flag_value(&args, "--settings") {
        Some(path) => ContractSettings::load(path)?,
        None => ContractSettings::default_test(),
    };
    settings.beacon_seed = parse_arg(&args, "--beacon-seed", settings.beacon_seed);
    let script = flag_value(&args, "--script");

    log::info!(
        "contract-runner session {} (contract={}, db={db}, beacon_seed={})",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
        settings.contract_address,
        settings.beacon_seed
    );

    let store = ContractStore::open(db)?;
    store.migrate()?;
    let mut contract = RandomContract::build(&settings, store);

    match script {
        Some(path) => run_loop(&mut contract, &settings, BufReader::new(File::open(path)?)),
        None => run_loop(&mut contract, &settings, io::stdin().lock()),
    }
}

fn run_loop(
    contract: &mut RandomContract,
    settings: &ContractSettings,
    mut input: impl BufRead,
) -> Result<()> {
    let mut stdout = io::stdout();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = input.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }

        if let Ok(host) = serde_json::from_str::<HostCommand>(line) {
            match host {
                HostCommand::Quit => break,
                HostCommand::Finalize { height } => {
                    contract.finalize_randomness(height);
                    writeln!(stdout, "{}", json!({ "ok": null }))?;
                }
                HostCommand::Summary => {
                    writeln!(stdout, "{}", summary(contract)?)?;
                }
            }
            stdout.flush()?;
            continue;
        }

        let reply = match parse_command(line) {
            Ok(command) => {
                if settings.auto_finalize {
                    if let Some(height) = command.height() {
                        contract.finalize_randomness(height);
                    }
                }
                match execute(contract, command) {
                    Ok(value) => json!({ "ok": value }),
                    Err(e) => json!({ "error": { "kind": e.kind(), "message": e.to_string() } }),
                }
            }
            Err(e) => json!({ "error": { "kind": "bad_request", "message": e.to_string() } }),
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

/// Parse a contract command. A `generate` without a key gets a fresh one.
fn parse_command(line: &str) -> serde_json::Result<ContractCommand> {
    let mut value: serde_json::Value = serde_json::from_str(line)?;
    if value["cmd"] == "generate" && value.get("key").is_none() {
        let key = uuid::Uuid::new_v4().to_string();
        log::debug!("generate without key: assigned {key}");
        value["key"] = json!(key);
    }
    serde_json::from_value(value)
}

fn summary(contract: &RandomContract) -> Result<serde_json::Value> {
    let config = contract.config()?;
    Ok(json!({
        "ok": {
            "contract":    contract.address(),
            "initialized": config.initialized,
            "admin":       config.admin,
            "max_value":   config.max_value,
            "max_count":   config.max_count,
            "samples":     contract.store().sample_count()?,
            "events":      contract.store().all_events()?.len(),
        }
    }))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
