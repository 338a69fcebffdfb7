use std::env;
use std::path::PathBuf;
use struggle_win_table::{run, CliOptions, Command};
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --release -- [sweep|damage-table|optimize] [--species species.json] \
[--trials N] [--seed SEED] [--workers N] [--output path] [--stream] [--attacker NAME]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut opts = CliOptions::default();
    let mut output_set = false;

    let mut args = env::args().skip(1).peekable();
    if let Some(first) = args.peek() {
        let command = match first.as_str() {
            "sweep" => Some(Command::Sweep),
            "damage-table" => Some(Command::DamageTable),
            "optimize" => Some(Command::Optimize),
            _ => None,
        };
        if let Some(command) = command {
            opts.command = command;
            args.next();
        }
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--species" => {
                opts.species_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--species requires a path (e.g. --species species.json)")
                })?);
            }
            "--trials" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--trials requires a number"))?;
                opts.trials = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                opts.seed = val.parse()?;
            }
            "--workers" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--workers requires a number"))?;
                opts.workers = val.parse()?;
            }
            "--output" => {
                opts.output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output win_table.json)")
                })?;
                output_set = true;
            }
            "--stream" => opts.stream = true,
            "--attacker" => {
                opts.attacker = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--attacker requires a species name"))?;
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    if !output_set {
        match (opts.command, opts.stream) {
            (Command::DamageTable, _) => opts.output_path = PathBuf::from("damage_table.csv"),
            (Command::Sweep, true) => opts.output_path = PathBuf::from("win_table.jsonl"),
            _ => {}
        }
    }
    Ok(opts)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();
    let opts = parse_args()?;
    run(opts)
}
