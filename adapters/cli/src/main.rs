#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Grid Sweeper experience.

mod scenario;

use std::{
    io::{self, Write as _},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_sweeper_core::{Command, Event, Outcome, StrategyKind};
use grid_sweeper_rendering::{Frame, FramePresenter, LEGEND};
use grid_sweeper_system_bootstrap::Bootstrap;
use grid_sweeper_system_traversal::{strategy_for, RunObserver, Runner, SilentObserver};
use grid_sweeper_world::{self as world, query, World};
use rand::RngCore;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use crate::scenario::ScenarioSnapshot;

const STRATEGY_POOL: [StrategyKind; 4] = [
    StrategyKind::PerimeterHugger,
    StrategyKind::SPattern,
    StrategyKind::Spiral,
    StrategyKind::RandomWalk,
];

/// Command-line arguments accepted by the sweeper binary.
#[derive(Debug, Parser)]
#[command(name = "grid-sweeper", about = "Strategy-driven cleaning robot simulation")]
struct Args {
    /// Traversal strategy to run; `auto` picks one at random per run.
    #[arg(long, value_enum, default_value = "auto")]
    strategy: StrategyArg,

    /// Battery capacity override; the scenario's capacity applies otherwise.
    #[arg(long)]
    energy: Option<u32>,

    /// Pacing delay between presented frames, in whole milliseconds.
    #[arg(long, default_value_t = 250)]
    step_delay_ms: u64,

    /// Seed for the strategy pick and the random walk; entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Encoded scenario replacing the built-in demo room.
    #[arg(long)]
    layout: Option<String>,

    /// Print the encoded scenario that would run, then exit.
    #[arg(long)]
    print_layout: bool,

    /// Skip frame rendering and pacing delays.
    #[arg(long)]
    headless: bool,

    /// Number of cleaning runs; the battery recharges between runs.
    #[arg(long, default_value_t = 1)]
    runs: u32,
}

/// Strategy selection exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Pick a strategy at random for every run.
    Auto,
    /// Boundary sweep: East, South, West, North.
    Perimeter,
    /// Boustrophedon column sweep.
    SPattern,
    /// Expanding rectangular spiral.
    Spiral,
    /// Uniform random walk.
    RandomWalk,
}

impl StrategyArg {
    fn fixed_kind(self) -> Option<StrategyKind> {
        match self {
            Self::Auto => None,
            Self::Perimeter => Some(StrategyKind::PerimeterHugger),
            Self::SPattern => Some(StrategyKind::SPattern),
            Self::Spiral => Some(StrategyKind::Spiral),
            Self::RandomWalk => Some(StrategyKind::RandomWalk),
        }
    }
}

/// Entry point for the Grid Sweeper command-line interface.
fn main() -> Result<()> {
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    let mut events = Vec::new();

    let setup_commands = match &args.layout {
        Some(encoded) => ScenarioSnapshot::decode(encoded)
            .map_err(anyhow::Error::new)
            .context("could not decode the --layout scenario")?
            .commands(),
        None => bootstrap.demo_scenario(),
    };
    for command in setup_commands {
        world::apply(&mut world, command, &mut events);
    }
    if let Some(max_energy) = args.energy {
        world::apply(&mut world, Command::ConfigureAgent { max_energy }, &mut events);
    }
    world::adjust_speed(&mut world, Duration::from_millis(args.step_delay_ms))
        .context("could not apply --step-delay-ms")?;

    if args.print_layout {
        println!("{}", ScenarioSnapshot::capture(&world).encode());
        return Ok(());
    }

    println!("{}", bootstrap.welcome_banner(&world));

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut driver_rng = ChaCha8Rng::seed_from_u64(seed);
    let fixed_kind = args.strategy.fixed_kind();
    let first_kind = fixed_kind.unwrap_or_else(|| pick_strategy(&mut driver_rng));
    let mut runner = Runner::new(strategy_for(first_kind, driver_rng.next_u64()));

    for run_index in 0..args.runs {
        if run_index > 0 {
            events.clear();
            world::apply(&mut world, Command::Recharge, &mut events);
            let kind = fixed_kind.unwrap_or_else(|| pick_strategy(&mut driver_rng));
            runner.set_strategy(strategy_for(kind, driver_rng.next_u64()));
        }

        println!("Selected strategy: {}", runner.strategy_kind().label());
        let outcome = if args.headless {
            runner.run(&mut world, &mut SilentObserver)
        } else {
            let mut observer = ConsoleObserver::new();
            runner.run(&mut world, &mut observer)
        };
        println!("{}", outcome_line(runner.strategy_kind(), outcome));
    }

    println!(
        "Dirt patches remaining: {}",
        query::remaining_dirt(&world)
    );
    println!("Cleaning session finished.");
    Ok(())
}

fn pick_strategy(rng: &mut ChaCha8Rng) -> StrategyKind {
    STRATEGY_POOL[rng.next_u32() as usize % STRATEGY_POOL.len()]
}

fn outcome_line(kind: StrategyKind, outcome: Outcome) -> String {
    match outcome {
        Outcome::Completed => format!("Cleaning completed: {} finished.", kind.label()),
        Outcome::Obstructed => {
            "Cleaning stopped: boundary or obstacle blocked the sweep.".to_owned()
        }
        Outcome::EnergyExhausted => "Cleaning stopped: battery depleted.".to_owned(),
    }
}

/// Observer that redraws the terminal after every move or clean and paces
/// the run with the agent's step delay.
#[derive(Debug)]
struct ConsoleObserver {
    out: io::Stdout,
}

impl ConsoleObserver {
    fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl RunObserver for ConsoleObserver {
    fn frame(&mut self, world: &World, events: &[Event]) {
        let visible = events.iter().any(|event| {
            matches!(
                event,
                Event::AgentMoved { .. } | Event::CellCleaned { .. }
            )
        });
        if !visible {
            return;
        }

        let view = query::grid_view(world);
        let agent = query::agent(world);
        let status = format!(
            "Robot at ({}, {}) | Energy {}/{}",
            agent.cell.x(),
            agent.cell.y(),
            agent.energy,
            agent.max_energy
        );
        match Frame::compose(view.extent(), view.cells(), agent.cell) {
            Ok(frame) => {
                if let Err(error) = self.present(&frame, &status) {
                    eprintln!("frame presentation failed: {error:#}");
                }
                thread::sleep(agent.step_delay);
            }
            Err(error) => eprintln!("frame composition failed: {error}"),
        }
    }
}

impl FramePresenter for ConsoleObserver {
    fn present(&mut self, frame: &Frame, status: &str) -> Result<()> {
        let mut handle = self.out.lock();
        // Clear the screen and home the cursor before redrawing.
        write!(handle, "\x1b[2J\x1b[H")?;
        writeln!(handle, "Grid Sweeper cleaning robot simulation")?;
        writeln!(handle, "--------------------------------------")?;
        writeln!(handle, "{LEGEND}")?;
        writeln!(handle)?;
        write!(handle, "{frame}")?;
        writeln!(handle)?;
        writeln!(handle, "{status}")?;
        handle.flush()?;
        Ok(())
    }
}
