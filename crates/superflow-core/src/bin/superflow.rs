//! superflow command-line tool.
//!
//! Solves the reference cross-section (or a JSON scenario) for a flow rate,
//! prints its regime table, or prints a rating curve.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use superflow_core::config::Scenario;
use superflow_core::rating::{flow_rates, rating_curve};
use superflow_core::{Channel, FlowOutcome};

#[derive(Parser)]
#[command(name = "superflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Water levels in a compound river cross-section", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// JSON scenario file; flags below override its values
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Overrides {
    /// Summer bed width [m]
    #[arg(long, global = true)]
    summer_bed_width: Option<f64>,
    /// Summer bed depth [m]
    #[arg(long, global = true)]
    summer_bed_depth: Option<f64>,
    /// Left summer dyke height [m]
    #[arg(long, global = true)]
    left_summer_height: Option<f64>,
    /// Left summer dyke distance from the bed [m]
    #[arg(long, global = true)]
    left_summer_distance: Option<f64>,
    /// Right summer dyke height [m]
    #[arg(long, global = true)]
    right_summer_height: Option<f64>,
    /// Right summer dyke distance from the bed [m]
    #[arg(long, global = true)]
    right_summer_distance: Option<f64>,
    /// Left winter dyke height [m]
    #[arg(long, global = true)]
    left_winter_height: Option<f64>,
    /// Left winter dyke distance from the bed [m]
    #[arg(long, global = true)]
    left_winter_distance: Option<f64>,
    /// Right winter dyke height [m]
    #[arg(long, global = true)]
    right_winter_height: Option<f64>,
    /// Right winter dyke distance from the bed [m]
    #[arg(long, global = true)]
    right_winter_distance: Option<f64>,
    /// Manning roughness coefficient
    #[arg(long, global = true)]
    manning: Option<f64>,
    /// Longitudinal slope
    #[arg(long, global = true)]
    slope: Option<f64>,
}

impl Overrides {
    fn apply(&self, scenario: &mut Scenario) {
        let g = &mut scenario.geometry;
        let fields = [
            (self.summer_bed_width, &mut g.summer_bed_width),
            (self.summer_bed_depth, &mut g.summer_bed_depth),
            (self.left_summer_height, &mut g.left_summer_height),
            (self.left_summer_distance, &mut g.left_summer_distance),
            (self.right_summer_height, &mut g.right_summer_height),
            (self.right_summer_distance, &mut g.right_summer_distance),
            (self.left_winter_height, &mut g.left_winter_height),
            (self.left_winter_distance, &mut g.left_winter_distance),
            (self.right_winter_height, &mut g.right_winter_height),
            (self.right_winter_distance, &mut g.right_winter_distance),
        ];
        for (value, field) in fields {
            if let Some(v) = value {
                *field = v;
            }
        }
        if let Some(n) = self.manning {
            scenario.hydraulics.manning_coefficient = n;
        }
        if let Some(s) = self.slope {
            scenario.hydraulics.slope = s;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve for one flow rate
    Solve {
        /// Flow rate [m3/s]; defaults to the scenario's
        #[arg(short, long)]
        flow_rate: Option<f64>,
    },
    /// Print the regime table
    Table,
    /// Print a rating curve from dry to brim-full
    Rating {
        /// Number of points
        #[arg(short, long, default_value_t = 20)]
        points: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::from_file(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::default(),
    };
    cli.overrides.apply(&mut scenario);
    scenario.validate()?;

    let channel = Channel::new(scenario.geometry, scenario.hydraulics)?;

    match cli.command {
        Commands::Solve { flow_rate } => solve(&channel, flow_rate.unwrap_or(scenario.flow_rate)),
        Commands::Table => {
            print_table(&channel);
            Ok(())
        }
        Commands::Rating { points } => {
            print_rating(&channel, points);
            Ok(())
        }
    }
}

fn solve(channel: &Channel, flow_rate: f64) -> anyhow::Result<()> {
    match channel.solve(flow_rate)? {
        FlowOutcome::Solved(s) => {
            println!("Flow rate        {:>10.2} m3/s", s.flow_rate);
            println!("Regime           {}", s.regime);
            println!("Surface          {:>10.3} m above bed floor", s.surface_elevation);
            for (region, level) in s.levels.iter() {
                println!("  {:<20} {:>8.3} m", region.name(), level);
            }
            println!("Flow area        {:>10.2} m2", s.flow_area);
            println!("Wetted perimeter {:>10.2} m", s.wetted_perimeter);
            println!("Mean velocity    {:>10.2} m/s", s.mean_velocity());
        }
        FlowOutcome::Overflow {
            flow_rate,
            capacity,
        } => {
            println!(
                "OVERFLOW: {:.2} m3/s exceeds the channel capacity of {:.2} m3/s",
                flow_rate, capacity
            );
        }
    }
    Ok(())
}

fn print_table(channel: &Channel) {
    println!(
        "{:<28} {:>12} {:>10} {:>10} {:>14}",
        "Regime", "Unknown", "Lower", "Upper", "Q max (m3/s)"
    );
    println!("{}", "-".repeat(78));
    for r in channel.table().regimes() {
        println!(
            "{:<28} {:>12} {:>10.3} {:>10.3} {:>14.2}",
            r.kind.to_string(),
            format!("{:?}", r.unknown),
            r.lower,
            r.upper,
            r.max_flow_rate
        );
    }
    if let Some(b) = channel.table().broken() {
        println!(
            "table stops before the {} regime: {:.2} m3/s at saturation, below {:.2} m3/s",
            b.regime, b.max_flow_rate, b.previous
        );
    }
}

fn print_rating(channel: &Channel, points: usize) {
    let curve = rating_curve(channel.table(), &flow_rates(channel.capacity(), points));
    println!(
        "{:>10} | {:>8} | {:>7} {:>7} {:>7} {:>7} {:>7} | {:>8} {:>8}",
        "Q", "Stage", "Bed", "Plains", "Left", "Right", "Upper", "Area", "Perim"
    );
    println!("{}", "-".repeat(96));
    for i in 0..curve.len() {
        println!(
            "{:>10.2} | {:>8.3} | {:>7.3} {:>7.3} {:>7.3} {:>7.3} {:>7.3} | {:>8.2} {:>8.2}",
            curve.flow_rate[i],
            curve.surface_elevation[i],
            curve.summer_bed[i],
            curve.summer_plains[i],
            curve.left_winter_plain[i],
            curve.right_winter_plain[i],
            curve.upper_winter_plains[i],
            curve.flow_area[i],
            curve.wetted_perimeter[i],
        );
    }
}
