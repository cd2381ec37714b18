// quotewheel CLI — inspect notification times and quote rotation from the
// terminal. All logic lives in the `quotewheel` library; this binary only
// parses arguments and formats output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use quotewheel::engine::schedule::split_against_now;
use quotewheel::{
    compute_times, plan_notifications, AppConfig, Offset, QuoteEngine, QuotePool, QuoteResult,
    SystemClock, TimePoint, TimeWindow, WeightedSampler,
};

#[derive(Parser)]
#[command(name = "quotewheel", version, about = "Quote rotation and notification timing")]
struct Cli {
    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Spread notification times across a window.
    Times {
        #[arg(long)]
        start: TimePoint,
        #[arg(long)]
        end: TimePoint,
        #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
        count: i32,
        /// Also split the times around this clock time.
        #[arg(long)]
        now: Option<TimePoint>,
    },
    /// Today's notification plan from a config file, against the local clock.
    Plan {
        #[arg(long, env = "QUOTEWHEEL_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Draw quotes from the weighted bag.
    Draw {
        #[arg(long)]
        pool: PathBuf,
        #[arg(long, default_value_t = 5)]
        draws: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, env = "QUOTEWHEEL_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Walk forward through today's quote history.
    Browse {
        #[arg(long)]
        pool: PathBuf,
        #[arg(long, default_value_t = 5)]
        steps: usize,
        #[arg(long, env = "QUOTEWHEEL_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print shell completions.
    Completions { shell: Shell },
}

#[derive(Serialize)]
struct TimesOutput {
    times: Vec<TimePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    past: Option<Vec<TimePoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    future: Option<Vec<TimePoint>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> QuoteResult<AppConfig> {
    match path {
        Some(p) => AppConfig::load(p),
        None => Ok(AppConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> QuoteResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn join(times: &[TimePoint]) -> String {
    times.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
}

fn run(cli: Cli) -> QuoteResult<()> {
    match cli.command {
        Command::Times { start, end, count, now } => {
            let times = compute_times(&TimeWindow::between(start, end), count);
            let split = now.map(|n| split_against_now(&times, n));
            if cli.json {
                return print_json(&TimesOutput {
                    past: split.as_ref().map(|s| s.past.clone()),
                    future: split.as_ref().map(|s| s.future.clone()),
                    times,
                });
            }
            println!("{}", join(&times));
            if let Some(s) = split {
                println!("past:   {}", join(&s.past));
                println!("future: {}", join(&s.future));
            }
        }

        Command::Plan { config } => {
            let config = load_config(config.as_ref())?;
            let plan = plan_notifications(&config.notifications, &SystemClock);
            if cli.json {
                return print_json(&plan);
            }
            if plan.is_empty() {
                println!("notifications disabled");
                return Ok(());
            }
            println!("date:     {}", plan.date);
            println!("daily:    {}", join(&plan.times));
            println!("one-shot: {}", join(&plan.split.future));
        }

        Command::Draw { pool, draws, seed, config } => {
            let config = load_config(config.as_ref())?;
            let pool = QuotePool::load(&pool)?;
            let mut sampler =
                WeightedSampler::new(quotewheel::engine::quotes::build_items(&pool, &config.pool));
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };
            let drawn: Vec<String> = (0..draws)
                .filter_map(|_| sampler.sample_with(&mut rng).map(|item| item.text))
                .collect();
            if cli.json {
                return print_json(&serde_json::json!({
                    "drawn": drawn,
                    "stats": sampler.stats(),
                }));
            }
            for text in &drawn {
                println!("{text}");
            }
            let stats = sampler.stats();
            println!(
                "-- {}/{} used, {:.0}% exhausted",
                stats.used,
                stats.total,
                stats.exhaustion * 100.0
            );
        }

        Command::Browse { pool, steps, config } => {
            let config = load_config(config.as_ref())?;
            let pool = QuotePool::load(&pool)?;
            let today = chrono::Local::now().date_naive();
            let engine = QuoteEngine::new(pool, config.pool, today);
            let mut shown = vec![engine.current()];
            for _ in 0..steps {
                if let Some(next) = engine.preview(Offset::Next) {
                    log::debug!("[cli] Next up: {}", next);
                }
                shown.push(engine.advance());
            }
            if cli.json {
                return print_json(&serde_json::json!({
                    "history": shown,
                    "stats": engine.stats(),
                }));
            }
            for (i, text) in shown.iter().enumerate() {
                println!("{i:>3}  {text}");
            }
        }

        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "quotewheel", &mut std::io::stdout());
        }
    }
    Ok(())
}
