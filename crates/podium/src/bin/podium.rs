//! Podium championship runner.
//!
//! Runs a full championship with random per-heat delays, prints each heat's
//! arrivals once every competitor has crossed, then the final table and
//! podium.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use tracing::info;

use podium::engine::{
    ChampionshipResult, HeatControl, HeatReport, RaceConfig, RaceCoordinator, RaceObserver, RandomDelays,
};
use podium::types::{HeatId, ScoringRule};

/// Championship command line arguments.
#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(about = "Run a motorcycle championship of concurrent competitor threads")]
struct Args {
    /// Competitors in the field
    #[arg(short = 'n', long, default_value_t = 10)]
    competitors: u32,

    /// Heats in the championship
    #[arg(short = 'H', long, default_value_t = 10)]
    heats: u32,

    /// Seed for the delay generator (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Upper bound on a competitor's pre-crossing wait, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    max_delay_ms: u64,

    /// Points awarded per finishing position
    #[arg(long, value_enum, default_value_t = Scoring::Linear)]
    scoring: Scoring,

    /// Red-flag and fail a heat that runs longer than this, in milliseconds
    #[arg(long, value_name = "MS")]
    stall_timeout_ms: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scoring {
    /// N points for the winner down to 1 for last place
    Linear,
    /// 25, 20, 16, 13, 11, 10, ... 1, then nothing
    Motogp,
}

impl From<Scoring> for ScoringRule {
    fn from(scoring: Scoring) -> Self {
        match scoring {
            Scoring::Linear => ScoringRule::Linear,
            Scoring::Motogp => ScoringRule::motogp(),
        }
    }
}

/// Prints each heat as it starts and, after the barrier, its arrivals.
struct HeatPrinter {
    names: Vec<String>,
}

impl HeatPrinter {
    fn name(&self, index: usize) -> &str {
        self.names.get(index).map(String::as_str).unwrap_or("?")
    }
}

impl RaceObserver for HeatPrinter {
    fn on_heat_start(&mut self, heat: HeatId, _control: &HeatControl) {
        println!("Starting heat {heat}...");
    }

    fn on_heat_finished(&mut self, report: &HeatReport) {
        for arrival in &report.arrivals {
            println!(
                "  {:>3}. {:<20} +{:<3} total {}",
                arrival.position,
                self.name(arrival.competitor.index()),
                arrival.points,
                arrival.total
            );
        }
        println!(
            "Heat {} finished in {} ms\n",
            report.heat,
            report.metrics.total_us / 1000
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_tracing(args.verbose);

    let seed = args.seed.unwrap_or_else(clock_seed);
    let config = RaceConfig {
        scoring: args.scoring.into(),
        stall_timeout: args.stall_timeout_ms.map(Duration::from_millis),
        ..RaceConfig::new(args.competitors, args.heats)
    };
    let delays = RandomDelays::new(seed, Duration::from_millis(args.max_delay_ms));

    info!(
        competitors = args.competitors,
        heats = args.heats,
        seed,
        "starting championship"
    );

    let coordinator = RaceCoordinator::new(config, delays)?;
    let mut printer = HeatPrinter {
        names: coordinator
            .scores()
            .iter()
            .map(|(_, entry)| entry.name.clone())
            .collect(),
    };

    println!("Motorcycle Racing Championship\n");
    let result = coordinator.run(&mut printer)?;
    print_summary(&result);

    Ok(())
}

fn print_summary(result: &ChampionshipResult) {
    println!("Final scores:");
    for (_, entry) in result.scores.iter() {
        println!("  {:<20} {}", entry.name, entry.score);
    }

    println!("\nPodium:");
    for standing in &result.podium {
        println!(
            "  {}. {} with {} points",
            standing.place, standing.name, standing.score
        );
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("podium=debug,podium_engine=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    // Results go to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
