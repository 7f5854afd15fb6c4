#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Traversal systems that steer the sweeper through its grid.
//!
//! Each strategy is a pure system in the engine's usual shape: it keeps local
//! state, consumes the events produced by its previous command batch together
//! with immutable snapshots, and responds with new commands. Motion is only
//! ever requested through [`Command::MoveAgent`]; the world decides whether
//! the move happens, and the resulting [`Event::AgentMoved`] or
//! [`Event::MoveRejected`] drives the strategy's next transition. A rejected
//! move is the normal steering signal here, not a failure.

use std::fmt;

use grid_sweeper_core::{
    BlockReason, CellCoord, Command, Direction, Event, GridExtent, Outcome, StrategyKind,
};
use grid_sweeper_world::{self as world, query, query::AgentSnapshot, World};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Control value returned by [`Strategy::drive`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drive {
    /// The strategy emitted further commands and expects their events on the
    /// next call.
    Continue,
    /// The strategy finished; it emitted no further commands.
    Finished(Outcome),
}

/// A pluggable traversal algorithm.
///
/// The first `drive` call of a run receives an empty event slice and must
/// emit the opening move. Every `Continue` return must emit at least one
/// `MoveAgent` command so the following call always observes a move result.
pub trait Strategy: fmt::Debug {
    /// Identifies which of the interchangeable algorithms this is.
    fn kind(&self) -> StrategyKind;

    /// Consumes the previous batch's events and emits the next commands.
    fn drive(
        &mut self,
        events: &[Event],
        agent: &AgentSnapshot,
        extent: GridExtent,
        out: &mut Vec<Command>,
    ) -> Drive;
}

/// Constructs the strategy matching the requested kind.
///
/// `walk_seed` feeds the random walk's generator; the other strategies are
/// fully deterministic and ignore it.
#[must_use]
pub fn strategy_for(kind: StrategyKind, walk_seed: u64) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::PerimeterHugger => Box::new(PerimeterHugger::new()),
        StrategyKind::SPattern => Box::new(SPattern::new()),
        StrategyKind::Spiral => Box::new(Spiral::new()),
        StrategyKind::RandomWalk => Box::new(RandomWalk::new(walk_seed)),
    }
}

enum MoveResult {
    Advanced(CellCoord),
    Rejected(BlockReason),
}

fn move_result(events: &[Event]) -> Option<MoveResult> {
    events.iter().find_map(|event| match event {
        Event::AgentMoved { to, .. } => Some(MoveResult::Advanced(*to)),
        Event::MoveRejected { reason, .. } => Some(MoveResult::Rejected(*reason)),
        _ => None,
    })
}

fn push_move(out: &mut Vec<Command>, to: CellCoord) {
    out.push(Command::MoveAgent { to });
}

fn push_clean_and_move(out: &mut Vec<Command>, to: CellCoord) {
    out.push(Command::CleanCell);
    out.push(Command::MoveAgent { to });
}

/// Sweeps the boundary: one run East, South, West, then North.
///
/// Each leg repeats single steps in its direction until the world rejects
/// one; a bounds or obstacle rejection simply starts the next leg, and the
/// run completes after the North leg. The agent never resumes a leg once its
/// energy dies.
#[derive(Debug, Default)]
pub struct PerimeterHugger {
    leg: usize,
}

const LEG_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];

impl PerimeterHugger {
    /// Creates a fresh perimeter sweep starting with the East leg.
    #[must_use]
    pub fn new() -> Self {
        Self { leg: 0 }
    }
}

impl Strategy for PerimeterHugger {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PerimeterHugger
    }

    fn drive(
        &mut self,
        events: &[Event],
        agent: &AgentSnapshot,
        _extent: GridExtent,
        out: &mut Vec<Command>,
    ) -> Drive {
        match move_result(events) {
            None => {
                push_move(out, agent.cell.step(LEG_ORDER[self.leg]));
                Drive::Continue
            }
            Some(MoveResult::Advanced(to)) => {
                push_clean_and_move(out, to.step(LEG_ORDER[self.leg]));
                Drive::Continue
            }
            Some(MoveResult::Rejected(BlockReason::EnergyExhausted)) => {
                Drive::Finished(Outcome::EnergyExhausted)
            }
            Some(MoveResult::Rejected(_)) => {
                self.leg += 1;
                if self.leg == LEG_ORDER.len() {
                    return Drive::Finished(Outcome::Completed);
                }
                push_move(out, agent.cell.step(LEG_ORDER[self.leg]));
                Drive::Continue
            }
        }
    }
}

/// Boustrophedon sweep: columns left to right, alternating vertical runs.
///
/// The opening move targets the grid origin no matter where the agent stands.
/// A blocked step inside a column reverses the sweep and immediately targets
/// the cell one step from the agent in the new direction; the column ends
/// when its next target would leave the grid. Re-walking rows the reversal
/// already visited is deliberate — the pattern is a cheap heuristic, not a
/// coverage planner.
#[derive(Debug)]
pub struct SPattern {
    column: i32,
    southward: bool,
}

impl Default for SPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl SPattern {
    /// Creates a fresh sweep entering the leftmost column heading south.
    #[must_use]
    pub fn new() -> Self {
        Self {
            column: 0,
            southward: true,
        }
    }

    fn sweep_direction(&self) -> Direction {
        if self.southward {
            Direction::South
        } else {
            Direction::North
        }
    }

    fn enter_next_column(&mut self, extent: GridExtent, out: &mut Vec<Command>) -> Drive {
        self.column += 1;
        self.southward = !self.southward;
        if self.column >= extent.width() as i32 {
            return Drive::Finished(Outcome::Completed);
        }
        let entry_row = if self.southward {
            0
        } else {
            extent.height() as i32 - 1
        };
        push_move(out, CellCoord::new(self.column, entry_row));
        Drive::Continue
    }
}

impl Strategy for SPattern {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SPattern
    }

    fn drive(
        &mut self,
        events: &[Event],
        agent: &AgentSnapshot,
        extent: GridExtent,
        out: &mut Vec<Command>,
    ) -> Drive {
        match move_result(events) {
            None => {
                if extent.cell_count() == 0 {
                    return Drive::Finished(Outcome::Completed);
                }
                push_move(out, CellCoord::new(0, 0));
                Drive::Continue
            }
            Some(MoveResult::Advanced(to)) => {
                out.push(Command::CleanCell);
                let next = to.step(self.sweep_direction());
                if extent.contains(next) {
                    push_move(out, next);
                    Drive::Continue
                } else {
                    self.enter_next_column(extent, out)
                }
            }
            Some(MoveResult::Rejected(BlockReason::EnergyExhausted)) => {
                Drive::Finished(Outcome::EnergyExhausted)
            }
            Some(MoveResult::Rejected(_)) => {
                self.southward = !self.southward;
                let next = agent.cell.step(self.sweep_direction());
                let next = CellCoord::new(self.column, next.y());
                if extent.contains(next) {
                    push_move(out, next);
                    Drive::Continue
                } else {
                    self.enter_next_column(extent, out)
                }
            }
        }
    }
}

/// Expanding rectangular spiral outward from the agent's position.
///
/// Directions cycle East, South, West, North; the segment length grows by
/// one every second turn. Unlike the axis-sweeping strategies, any blocked
/// move ends the whole traversal: the spiral shape cannot survive a detour.
#[derive(Debug)]
pub struct Spiral {
    direction_index: usize,
    segment_length: u32,
    remaining: u32,
    turns: u32,
}

const SPIRAL_CYCLE: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];

impl Spiral {
    /// Creates a fresh spiral whose first segment heads East.
    #[must_use]
    pub fn new() -> Self {
        Self {
            direction_index: 0,
            segment_length: 1,
            remaining: 1,
            turns: 0,
        }
    }

    fn direction(&self) -> Direction {
        SPIRAL_CYCLE[self.direction_index]
    }

    fn advance_segment(&mut self) {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.direction_index = (self.direction_index + 1) % SPIRAL_CYCLE.len();
            self.turns += 1;
            if self.turns % 2 == 0 {
                self.segment_length += 1;
            }
            self.remaining = self.segment_length;
        }
    }
}

impl Default for Spiral {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Spiral {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Spiral
    }

    fn drive(
        &mut self,
        events: &[Event],
        agent: &AgentSnapshot,
        _extent: GridExtent,
        out: &mut Vec<Command>,
    ) -> Drive {
        match move_result(events) {
            None => {
                push_move(out, agent.cell.step(self.direction()));
                Drive::Continue
            }
            Some(MoveResult::Advanced(to)) => {
                self.advance_segment();
                push_clean_and_move(out, to.step(self.direction()));
                Drive::Continue
            }
            Some(MoveResult::Rejected(BlockReason::EnergyExhausted)) => {
                Drive::Finished(Outcome::EnergyExhausted)
            }
            Some(MoveResult::Rejected(_)) => Drive::Finished(Outcome::Obstructed),
        }
    }
}

/// Uniform random walk that only stops when the energy budget is spent.
///
/// Bounds and obstacle rejections re-sample the direction without consuming
/// energy, so a run always performs exactly as many successful moves as the
/// agent had energy, provided an open neighbor keeps existing.
#[derive(Debug)]
pub struct RandomWalk {
    rng_state: u64,
}

const WALK_DIRECTIONS: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];

impl RandomWalk {
    /// Creates a random walk driven by the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng_state: seed }
    }

    fn next_direction(&mut self) -> Direction {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        WALK_DIRECTIONS[(self.rng_state >> 32) as usize % WALK_DIRECTIONS.len()]
    }
}

impl Strategy for RandomWalk {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RandomWalk
    }

    fn drive(
        &mut self,
        events: &[Event],
        agent: &AgentSnapshot,
        _extent: GridExtent,
        out: &mut Vec<Command>,
    ) -> Drive {
        match move_result(events) {
            None => {
                let direction = self.next_direction();
                push_move(out, agent.cell.step(direction));
                Drive::Continue
            }
            Some(MoveResult::Advanced(to)) => {
                let direction = self.next_direction();
                push_clean_and_move(out, to.step(direction));
                Drive::Continue
            }
            Some(MoveResult::Rejected(BlockReason::EnergyExhausted)) => {
                Drive::Finished(Outcome::EnergyExhausted)
            }
            Some(MoveResult::Rejected(_)) => {
                let direction = self.next_direction();
                push_move(out, agent.cell.step(direction));
                Drive::Continue
            }
        }
    }
}

/// Sink through which a run reports every applied event batch.
///
/// This is the seam between the simulation and its presentation: the console
/// adapter redraws and paces here, while tests and headless runs plug in
/// [`SilentObserver`].
pub trait RunObserver {
    /// Called after each non-empty event batch has been applied.
    fn frame(&mut self, world: &World, events: &[Event]);
}

/// Observer that ignores every frame.
#[derive(Debug, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {
    fn frame(&mut self, _world: &World, _events: &[Event]) {}
}

/// Owns the currently bound strategy and drives it to completion.
#[derive(Debug)]
pub struct Runner {
    strategy: Box<dyn Strategy>,
}

impl Runner {
    /// Creates a runner bound to the provided strategy.
    #[must_use]
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self { strategy }
    }

    /// Replaces the bound strategy; takes effect on the next run.
    pub fn set_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.strategy = strategy;
    }

    /// Kind of the currently bound strategy.
    #[must_use]
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Runs the bound strategy against the world until it finishes.
    ///
    /// Blocks for the duration of the run; the observer sees every applied
    /// event batch and may pace the loop however it likes.
    pub fn run(&mut self, world: &mut World, observer: &mut dyn RunObserver) -> Outcome {
        let mut events: Vec<Event> = Vec::new();
        let mut commands: Vec<Command> = Vec::new();

        loop {
            let agent = query::agent(world);
            let extent = query::grid_extent(world);
            let flow = self.strategy.drive(&events, &agent, extent, &mut commands);

            events.clear();
            for command in commands.drain(..) {
                world::apply(world, command, &mut events);
            }
            if !events.is_empty() {
                observer.frame(world, &events);
            }

            if let Drive::Finished(outcome) = flow {
                return outcome;
            }
        }
    }
}
