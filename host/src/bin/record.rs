use std::{env, fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use host::record_demo_tape;

#[derive(Debug)]
struct Cli {
    seed: u32,
    frames: u32,
    out: PathBuf,
    summary_out: Option<PathBuf>,
}

fn parse_u32(value: &str) -> Result<u32> {
    let parsed = if let Some(hex) = value.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else {
        value.parse::<u32>()
    };
    parsed.with_context(|| format!("invalid number: {value}"))
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);

        let mut seed = 0xDEAD_BEEFu32;
        let mut frames = 3_600u32;
        let mut out: Option<PathBuf> = None;
        let mut summary_out: Option<PathBuf> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--seed requires a number"))?;
                    seed = parse_u32(&value)?;
                }
                "--frames" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--frames requires a number"))?;
                    frames = parse_u32(&value)?;
                }
                "--out" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--out requires a file path"))?;
                    out = Some(PathBuf::from(value));
                }
                "--summary-out" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--summary-out requires a file path"))?;
                    summary_out = Some(PathBuf::from(value));
                }
                "-h" | "--help" => {
                    println!(
                        "Usage: record --out <file.tape> [--seed <n|0xhex>] [--frames <n>] [--summary-out <file.json>]"
                    );
                    std::process::exit(0);
                }
                other => return Err(anyhow!("unknown argument: {other}. Use --help for usage.")),
            }
        }

        let out = out.ok_or_else(|| anyhow!("--out is required"))?;

        Ok(Self {
            seed,
            frames,
            out,
            summary_out,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse()?;
    if cli.frames == 0 {
        return Err(anyhow!("--frames must be at least 1"));
    }

    let (tape, summary) = record_demo_tape(cli.seed, cli.frames);
    fs::write(&cli.out, &tape)
        .with_context(|| format!("failed writing tape: {}", cli.out.display()))?;

    println!("Demo tape recorded: {}", cli.out.display());
    println!("  Seed:              0x{:08x}", summary.seed);
    println!("  Frames:            {}", summary.frame_count);
    println!("  Kills:             {}", summary.kills);
    println!("  Obstacles cleared: {}", summary.obstacles_cleared);
    println!("  Final RNG:         0x{:08x}", summary.final_rng_state);
    println!("  Tape size:         {} bytes", summary.tape_bytes);

    if let Some(path) = cli.summary_out {
        let json =
            serde_json::to_vec_pretty(&summary).context("failed to serialize summary json")?;
        fs::write(&path, json)
            .with_context(|| format!("failed writing summary output: {}", path.display()))?;
        println!("  Summary JSON:      {}", path.display());
    }

    Ok(())
}
