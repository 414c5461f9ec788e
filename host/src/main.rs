use host::{run_headless_match, GameConfig, MatchSummary};
use pong_core::GameLevel;
use std::env;
use std::fs;
use std::str::FromStr;
use std::time::Instant;

/// Frame budget when `--frames` is not given (about ten minutes at 60 fps)
const DEFAULT_MAX_FRAMES: u64 = 36_000;

/// Reject summary files above this size before reading them.
const MAX_SUMMARY_SIZE: u64 = 1024 * 1024; // 1 MB

/// Saved summary file format
#[derive(serde::Serialize, serde::Deserialize)]
struct SavedMatch {
    /// Config the match was played with, so it can be replayed
    config: GameConfig,
    summary: MatchSummary,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    println!("🏓 Pong Headless Simulator");
    println!("{}", "=".repeat(70));
    println!();

    // Parse CLI arguments
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "simulate" => {
            let opts = parse_simulate_args(&args[2..]).unwrap_or_else(|e| {
                eprintln!("❌ Error: {}", e);
                std::process::exit(1);
            });
            simulate_command(opts);
        }

        "replay" => {
            if args.len() < 3 {
                eprintln!("Usage: {} replay <summary_file>", args[0]);
                eprintln!("Error: Missing required argument");
                std::process::exit(1);
            }

            replay_command(&args[2]);
        }

        "--help" | "-h" => {
            print_usage(&args[0]);
            std::process::exit(0);
        }

        _ => {
            eprintln!("❌ Unknown command: {}", command);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  simulate [--level <level>] [--seed <n>] [--frames <n>] [--config <file>] [output_file]");
    eprintln!("      Play a bot-vs-bot match without a display");
    eprintln!("      - --level: easy|medium|hard (overrides the config file)");
    eprintln!("      - --seed: Serve-angle seed (overrides the config file)");
    eprintln!("      - --frames: Frame budget, default {}", DEFAULT_MAX_FRAMES);
    eprintln!("      - --config: JSON game config; missing fields use defaults");
    eprintln!("      - output_file: Optional file to save the summary (JSON)");
    eprintln!("                     Defaults to: pong-match_<level>_seed<seed>_<timestamp>.json");
    eprintln!();
    eprintln!("  replay <summary_file>");
    eprintln!("      Replay a saved match and check its event digest");
    eprintln!();
    eprintln!("Example workflow:");
    eprintln!("  1. Simulate: {} simulate --level hard --seed 42", program);
    eprintln!("  2. Replay:   {} replay pong-match_HARD_seed42_<timestamp>.json", program);
}

struct SimulateOpts {
    config: GameConfig,
    max_frames: u64,
    output_file: Option<String>,
}

fn parse_simulate_args(args: &[String]) -> Result<SimulateOpts, Box<dyn std::error::Error>> {
    let mut level: Option<GameLevel> = None;
    let mut seed: Option<u64> = None;
    let mut config_file: Option<&str> = None;
    let mut max_frames = DEFAULT_MAX_FRAMES;
    let mut output_file = None;

    let mut it = args.iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .map(|s| s.as_str())
                .ok_or_else(|| format!("{} requires a value", flag))
        };
        match arg.as_str() {
            "--level" | "-l" => level = Some(GameLevel::from_str(value("--level")?)?),
            "--seed" | "-s" => seed = Some(value("--seed")?.parse()?),
            "--frames" | "-f" => max_frames = value("--frames")?.parse()?,
            "--config" | "-c" => config_file = Some(value("--config")?),
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other).into()),
            other => output_file = Some(other.to_string()),
        }
    }

    let mut config = match config_file {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(level) = level {
        config.level = level;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }

    Ok(SimulateOpts {
        config,
        max_frames,
        output_file,
    })
}

fn simulate_command(opts: SimulateOpts) {
    println!("📋 Simulating match");
    println!("  Level: {}", opts.config.level);
    println!("  Seed: {}", opts.config.seed);
    println!("  Frame budget: {}", opts.max_frames);
    println!();

    let start = Instant::now();
    let summary = run_headless_match(&opts.config, opts.max_frames).unwrap_or_else(|e| {
        eprintln!("❌ Simulation failed: {}", e);
        std::process::exit(1);
    });
    println!("  Simulation time: {:.2}s", start.elapsed().as_secs_f64());
    println!();

    let default_filename = format!(
        "pong-match_{}_seed{}_{}.json",
        summary.level,
        summary.seed,
        chrono::Utc::now().timestamp()
    );
    let file_to_save = opts.output_file.as_deref().unwrap_or(&default_filename);

    let saved = SavedMatch {
        config: opts.config,
        summary: summary.clone(),
    };

    match save_match(&saved, file_to_save) {
        Ok(_) => {
            println!("✅ Match complete!");
            println!("  Result: {}", if summary.finished { "FINISHED" } else { "FRAME BUDGET EXHAUSTED" });
            println!("  Score: {}-{}", summary.score.left, summary.score.right);
            if let Some(winner) = summary.winner {
                println!("  Winner: {}", winner);
            }
            println!("  Frames: {}", summary.frames);
            println!("  Paddle bounces: {}", summary.bounces);
            println!("  Event Hash: 0x{}", summary.events_hash);
            println!();
            println!("💾 Summary saved to: {}", file_to_save);
            println!("   Use 'replay {}' to check it replays identically", file_to_save);
            println!("{}", "=".repeat(70));
        }
        Err(e) => {
            eprintln!("❌ Error saving summary: {}", e);
            std::process::exit(1);
        }
    }
}

fn replay_command(summary_file: &str) {
    println!("📋 Replaying match");
    println!("  Summary file: {}", summary_file);
    println!();

    let saved = match load_match(summary_file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Error loading summary: {}", e);
            std::process::exit(1);
        }
    };

    println!("📦 Loaded summary");
    println!("  Level: {}", saved.summary.level);
    println!("  Seed: {}", saved.summary.seed);
    println!("  Recorded hash: 0x{}", saved.summary.events_hash);
    println!();

    let start = Instant::now();
    let replayed = run_headless_match(&saved.config, saved.summary.max_frames).unwrap_or_else(|e| {
        eprintln!("❌ Replay failed: {}", e);
        std::process::exit(1);
    });
    println!("  Replay time: {:.2}s", start.elapsed().as_secs_f64());
    println!();

    if replayed == saved.summary {
        println!("✅ Replay matches the recorded match!");
        println!("  Score: {}-{}", replayed.score.left, replayed.score.right);
        println!("  Event Hash: 0x{}", replayed.events_hash);
        println!("{}", "=".repeat(70));
    } else {
        eprintln!("❌ Replay diverged from the recorded match");
        eprintln!("  Recorded: {}-{} hash 0x{}", saved.summary.score.left, saved.summary.score.right, saved.summary.events_hash);
        eprintln!("  Replayed: {}-{} hash 0x{}", replayed.score.left, replayed.score.right, replayed.events_hash);
        eprintln!("{}", "=".repeat(70));
        std::process::exit(1);
    }
}

fn save_match(saved: &SavedMatch, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(saved)?;
    fs::write(path, json)?;
    Ok(())
}

fn load_match(path: &str) -> Result<SavedMatch, Box<dyn std::error::Error>> {
    let size = fs::metadata(path)?.len();
    if size > MAX_SUMMARY_SIZE {
        return Err(format!("Summary file too large: {} bytes (max {} bytes)", size, MAX_SUMMARY_SIZE).into());
    }
    let json = fs::read_to_string(path)?;
    let saved: SavedMatch = serde_json::from_str(&json)?;
    Ok(saved)
}
