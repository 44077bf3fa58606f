use std::{env, fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use host::{default_max_frames, final_snapshot, verify_tape_file};

#[derive(Debug)]
struct Cli {
    tape_path: PathBuf,
    max_frames: u32,
    journal_out: Option<PathBuf>,
    snapshot_out: Option<PathBuf>,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);

        let mut tape_path: Option<PathBuf> = None;
        let mut max_frames = default_max_frames();
        let mut journal_out: Option<PathBuf> = None;
        let mut snapshot_out: Option<PathBuf> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tape" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--tape requires a file path"))?;
                    tape_path = Some(PathBuf::from(value));
                }
                "--max-frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--max-frames requires a number"))?;
                    max_frames = value
                        .parse::<u32>()
                        .with_context(|| format!("invalid --max-frames value: {value}"))?;
                }
                "--journal-out" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--journal-out requires a file path"))?;
                    journal_out = Some(PathBuf::from(value));
                }
                "--snapshot-out" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--snapshot-out requires a file path"))?;
                    snapshot_out = Some(PathBuf::from(value));
                }
                "-h" | "--help" => {
                    println!(
                        "Usage: host --tape <file.tape> [--max-frames <n>] [--journal-out <file.json>] [--snapshot-out <file.json>]"
                    );
                    std::process::exit(0);
                }
                other => return Err(anyhow!("unknown argument: {other}. Use --help for usage.")),
            }
        }

        let tape_path = tape_path.ok_or_else(|| anyhow!("--tape is required"))?;

        Ok(Self {
            tape_path,
            max_frames,
            journal_out,
            snapshot_out,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse()?;
    let journal = verify_tape_file(&cli.tape_path, cli.max_frames)?;

    println!("Tape verified.");
    println!("  Seed:              0x{:08x}", journal.seed);
    println!("  Frames:            {}", journal.frame_count);
    println!("  Kills:             {}", journal.kills);
    println!("  Obstacles cleared: {}", journal.obstacles_cleared);
    println!("  Final RNG:         0x{:08x}", journal.final_rng_state);
    println!("  Tape checksum:     0x{:08x}", journal.tape_checksum);

    if let Some(path) = cli.journal_out {
        let json =
            serde_json::to_vec_pretty(&journal).context("failed to serialize journal json")?;
        fs::write(&path, json)
            .with_context(|| format!("failed writing journal output: {}", path.display()))?;
        println!("  Journal JSON:      {}", path.display());
    }

    if let Some(path) = cli.snapshot_out {
        let bytes = fs::read(&cli.tape_path)
            .with_context(|| format!("failed to read tape: {}", cli.tape_path.display()))?;
        let snapshot = final_snapshot(&bytes, cli.max_frames)?;
        let json =
            serde_json::to_vec_pretty(&snapshot).context("failed to serialize snapshot json")?;
        fs::write(&path, json)
            .with_context(|| format!("failed writing snapshot output: {}", path.display()))?;
        println!("  Snapshot JSON:     {}", path.display());
    }

    Ok(())
}
