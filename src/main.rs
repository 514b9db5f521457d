// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, bail, Context};
use serde_json::Value;
use std::env;

use gradflow::config::{load_and_validate_config, RuntimeBuilder};
use gradflow::engine::handoff::RETURN_VALUE_KEY;
use gradflow::engine::RunContext;
use gradflow::observability::init_tracing;
use gradflow::sources::{SourceRecord, SqliteSourceRepository};
use gradflow::training::{load_training_config, Trainer, TrainingConfig};

const USAGE: &str = "\
Usage:
  gradflow train [training.yaml]     fit the two-layer ReLU network
  gradflow dag <dag.yaml>            run every task of a DAG once
  gradflow seed-sources <db-file>    create a demo 'sources' table";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str);
    let argument = args.get(1).map(String::as_str);

    match command {
        Some("train") => train(argument),
        Some("dag") => run_dag(argument.ok_or_else(|| anyhow!("missing DAG file\n{}", USAGE))?).await,
        Some("seed-sources") => {
            seed_sources(argument.ok_or_else(|| anyhow!("missing database file\n{}", USAGE))?)
        }
        Some("-h") | Some("--help") | None => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(other) => bail!("unknown command '{}'\n{}", other, USAGE),
    }
}

fn train(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => load_training_config(path)?,
        None => TrainingConfig::default(),
    };

    let report = Trainer::new(config).run_with(|record| println!("{} {}", record.iteration, record.loss))?;
    if let Some(loss) = report.final_loss {
        println!("final loss {}", loss);
    }
    Ok(())
}

async fn run_dag(path: &str) -> anyhow::Result<()> {
    let config = load_and_validate_config(path)?;
    let runtime = RuntimeBuilder::from_config(&config)
        .with_context(|| format!("failed to build DAG '{}'", config.dag_id))?;

    let dag_run = runtime.run(RunContext::manual(&config.dag_id)).await?;

    for ((task_id, key), value) in &dag_run.handoff {
        if key != RETURN_VALUE_KEY {
            continue;
        }
        match value {
            Value::String(line) => println!("{}", line),
            other => println!("{}: {}", task_id, other),
        }
    }

    for task in &config.tasks {
        if let Some(result) = dag_run.states.get(&task.id) {
            println!(
                "{:<16} {:?} (tries: {}, {:?})",
                task.id, result.state, result.attempts, result.duration
            );
        }
    }

    if !dag_run.is_success() {
        bail!(
            "run {} of '{}' finished with failed tasks",
            dag_run.run_id,
            dag_run.dag_id
        );
    }
    Ok(())
}

fn seed_sources(path: &str) -> anyhow::Result<()> {
    let repository = SqliteSourceRepository::open(path)?;
    let rows = [
        SourceRecord::new("twitter", false),
        SourceRecord::new("reddit", true),
        SourceRecord::new("rss", true),
    ];
    repository.seed(&rows)?;
    println!("seeded {} rows into {}", rows.len(), path);
    Ok(())
}
