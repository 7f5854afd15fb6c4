#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Sweeper.
//!
//! The world owns the cell grid and the cleaning agent. Every mutation flows
//! through [`apply`], which enforces the motion rules (energy, bounds,
//! obstacles) in one place and reports what happened as [`Event`] values.
//! Blocked moves are reported, never raised: traversal systems consume the
//! rejection reason to drive their next transition.

use std::time::Duration;

use grid_sweeper_core::{
    BlockReason, Cell, CellCoord, Command, Event, GridExtent, WELCOME_BANNER,
};
use thiserror::Error;

const DEFAULT_GRID_EXTENT: GridExtent = GridExtent::new(10, 10);
const DEFAULT_MAX_ENERGY: u32 = 200;
const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(150);
const AGENT_ORIGIN: CellCoord = CellCoord::new(0, 0);

/// Errors raised for programmer misuse of the world's fallible operations.
///
/// Blocked moves never appear here; they surface as
/// [`Event::MoveRejected`] values instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// A coordinate outside the grid was passed to a bounds-checked query.
    #[error("cell ({}, {}) lies outside the {}x{} grid", .cell.x(), .cell.y(), .extent.width(), .extent.height())]
    OutOfRange {
        /// Coordinate that failed the bounds check.
        cell: CellCoord,
        /// Dimensions of the grid the coordinate was checked against.
        extent: GridExtent,
    },
    /// A zero pacing delay was requested; the delay must be strictly positive.
    #[error("step delay must be greater than zero")]
    InvalidStepDelay,
}

/// Represents the authoritative Grid Sweeper world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    agent: Agent,
}

impl World {
    /// Creates a new world with the default grid, agent and energy budget.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(DEFAULT_GRID_EXTENT),
            agent: Agent::new(DEFAULT_MAX_ENERGY, DEFAULT_STEP_DELAY),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { extent } => {
            world.grid = Grid::new(extent);
            world.agent.cell = AGENT_ORIGIN;
            out_events.push(Event::GridConfigured { extent });
        }
        Command::ConfigureAgent { max_energy } => {
            world.agent.max_energy = max_energy;
            world.agent.energy = max_energy;
            out_events.push(Event::AgentConfigured { max_energy });
        }
        Command::SeedDirt { cell } => {
            debug_assert!(
                world.grid.extent.contains(cell),
                "seed targets must lie inside the grid"
            );
            if world.grid.set(cell, Cell::Dirt) {
                out_events.push(Event::DirtSeeded { cell });
            }
        }
        Command::SeedObstacle { cell } => {
            debug_assert!(
                world.grid.extent.contains(cell),
                "seed targets must lie inside the grid"
            );
            if world.grid.set(cell, Cell::Obstacle) {
                out_events.push(Event::ObstacleSeeded { cell });
            }
        }
        Command::MoveAgent { to } => {
            let from = world.agent.cell;
            match world.agent.attempt_move(&world.grid, to) {
                Ok(()) => out_events.push(Event::AgentMoved { from, to }),
                Err(reason) => out_events.push(Event::MoveRejected { from, to, reason }),
            }
        }
        Command::CleanCell => {
            let cell = world.agent.cell;
            if world.grid.clean(cell) {
                out_events.push(Event::CellCleaned { cell });
            }
        }
        Command::Recharge => {
            world.agent.energy = world.agent.max_energy;
            out_events.push(Event::EnergyRecharged {
                energy: world.agent.energy,
            });
        }
    }
}

/// Replaces the agent's pacing delay.
///
/// The delay only throttles presentation; it has no effect on simulation
/// outcomes. Returns [`WorldError::InvalidStepDelay`] when the requested
/// delay is zero.
pub fn adjust_speed(world: &mut World, step_delay: Duration) -> Result<(), WorldError> {
    if step_delay.is_zero() {
        return Err(WorldError::InvalidStepDelay);
    }
    world.agent.step_delay = step_delay;
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{World, WorldError};
    use grid_sweeper_core::{Cell, CellCoord, GridExtent};

    /// Retrieves the welcome banner that adapters may display.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Dimensions of the current grid.
    #[must_use]
    pub fn grid_extent(world: &World) -> GridExtent {
        world.grid.extent
    }

    /// Captures a read-only view of the grid cells.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView {
            extent: world.grid.extent,
            cells: &world.grid.cells,
        }
    }

    /// Bounds-checked lookup of a single cell's state.
    ///
    /// Traversal systems never need this (the move chokepoint performs its
    /// own checks); it exists for external callers that index the grid with
    /// coordinates of their own making.
    pub fn cell_at(world: &World, cell: CellCoord) -> Result<Cell, WorldError> {
        world
            .grid
            .cell(cell)
            .ok_or(WorldError::OutOfRange {
                cell,
                extent: world.grid.extent,
            })
    }

    /// Captures an immutable snapshot of the agent's state.
    #[must_use]
    pub fn agent(world: &World) -> AgentSnapshot {
        AgentSnapshot {
            cell: world.agent.cell,
            energy: world.agent.energy,
            max_energy: world.agent.max_energy,
            step_delay: world.agent.step_delay,
        }
    }

    /// Number of dirt cells still awaiting the sweeper.
    #[must_use]
    pub fn remaining_dirt(world: &World) -> usize {
        world
            .grid
            .cells
            .iter()
            .filter(|cell| **cell == Cell::Dirt)
            .count()
    }

    /// Read-only view into the dense cell grid.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        extent: GridExtent,
        cells: &'a [Cell],
    }

    impl<'a> GridView<'a> {
        /// Dimensions of the viewed grid.
        #[must_use]
        pub const fn extent(&self) -> GridExtent {
            self.extent
        }

        /// All cells in row-major order.
        #[must_use]
        pub const fn cells(&self) -> &'a [Cell] {
            self.cells
        }

        /// Returns the state of the provided cell, if it lies inside the grid.
        #[must_use]
        pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
            let index = self.extent.index_of(cell)?;
            self.cells.get(index).copied()
        }
    }

    /// Immutable representation of the agent's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AgentSnapshot {
        /// Cell currently occupied by the agent.
        pub cell: CellCoord,
        /// Energy remaining in the agent's budget.
        pub energy: u32,
        /// Energy available after a full recharge.
        pub max_energy: u32,
        /// Pacing delay applied between presented frames.
        pub step_delay: Duration,
    }
}

#[derive(Debug)]
struct Grid {
    extent: GridExtent,
    cells: Vec<Cell>,
}

impl Grid {
    fn new(extent: GridExtent) -> Self {
        Self {
            extent,
            cells: vec![Cell::Empty; extent.cell_count()],
        }
    }

    fn cell(&self, cell: CellCoord) -> Option<Cell> {
        let index = self.extent.index_of(cell)?;
        self.cells.get(index).copied()
    }

    fn set(&mut self, cell: CellCoord, state: Cell) -> bool {
        let Some(index) = self.extent.index_of(cell) else {
            return false;
        };
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = state;
            return true;
        }
        false
    }

    fn clean(&mut self, cell: CellCoord) -> bool {
        if self.cell(cell) != Some(Cell::Dirt) {
            return false;
        }
        self.set(cell, Cell::Cleaned)
    }
}

#[derive(Debug)]
struct Agent {
    cell: CellCoord,
    energy: u32,
    max_energy: u32,
    step_delay: Duration,
}

impl Agent {
    fn new(max_energy: u32, step_delay: Duration) -> Self {
        Self {
            cell: AGENT_ORIGIN,
            energy: max_energy,
            max_energy,
            step_delay,
        }
    }

    /// Single chokepoint for agent motion: checks energy, then bounds, then
    /// obstacles, and only mutates state when every check passes.
    fn attempt_move(&mut self, grid: &Grid, to: CellCoord) -> Result<(), BlockReason> {
        if self.energy == 0 {
            return Err(BlockReason::EnergyExhausted);
        }
        if !grid.extent.contains(to) {
            return Err(BlockReason::OutOfBounds);
        }
        if grid.cell(to) == Some(Cell::Obstacle) {
            return Err(BlockReason::Obstacle);
        }

        self.cell = to;
        self.energy -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_world(extent: GridExtent, max_energy: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::ConfigureGrid { extent }, &mut events);
        apply(&mut world, Command::ConfigureAgent { max_energy }, &mut events);
        world
    }

    #[test]
    fn configure_grid_rebuilds_cells_and_rehomes_agent() {
        let mut world = World::new();
        let mut events = Vec::new();
        let extent = GridExtent::new(4, 3);

        apply(&mut world, Command::ConfigureGrid { extent }, &mut events);

        assert_eq!(events, vec![Event::GridConfigured { extent }]);
        assert_eq!(query::grid_extent(&world), extent);
        assert_eq!(query::agent(&world).cell, CellCoord::new(0, 0));
        assert_eq!(query::grid_view(&world).cells().len(), 12);
        assert!(query::grid_view(&world)
            .cells()
            .iter()
            .all(|cell| *cell == Cell::Empty));
    }

    #[test]
    fn seeding_overwrites_cells_and_reports_events() {
        let mut world = seeded_world(GridExtent::new(5, 5), 10);
        let mut events = Vec::new();
        let dirt = CellCoord::new(2, 3);
        let wall = CellCoord::new(1, 1);

        apply(&mut world, Command::SeedDirt { cell: dirt }, &mut events);
        apply(&mut world, Command::SeedObstacle { cell: wall }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::DirtSeeded { cell: dirt },
                Event::ObstacleSeeded { cell: wall },
            ]
        );
        assert_eq!(query::cell_at(&world, dirt), Ok(Cell::Dirt));
        assert_eq!(query::cell_at(&world, wall), Ok(Cell::Obstacle));
        assert_eq!(query::remaining_dirt(&world), 1);
    }

    #[test]
    fn successful_move_costs_one_energy() {
        let mut world = seeded_world(GridExtent::new(5, 5), 10);
        let mut events = Vec::new();
        let target = CellCoord::new(1, 0);

        apply(&mut world, Command::MoveAgent { to: target }, &mut events);

        assert_eq!(
            events,
            vec![Event::AgentMoved {
                from: CellCoord::new(0, 0),
                to: target,
            }]
        );
        let agent = query::agent(&world);
        assert_eq!(agent.cell, target);
        assert_eq!(agent.energy, 9);
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut world = seeded_world(GridExtent::new(5, 5), 10);
        let mut events = Vec::new();
        let wall = CellCoord::new(1, 0);
        apply(&mut world, Command::SeedObstacle { cell: wall }, &mut events);
        events.clear();

        apply(&mut world, Command::MoveAgent { to: wall }, &mut events);

        assert_eq!(
            events,
            vec![Event::MoveRejected {
                from: CellCoord::new(0, 0),
                to: wall,
                reason: BlockReason::Obstacle,
            }]
        );
        let agent = query::agent(&world);
        assert_eq!(agent.cell, CellCoord::new(0, 0));
        assert_eq!(agent.energy, 10);
    }

    #[test]
    fn out_of_bounds_move_is_rejected() {
        let mut world = seeded_world(GridExtent::new(3, 3), 10);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAgent {
                to: CellCoord::new(0, -1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveRejected {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, -1),
                reason: BlockReason::OutOfBounds,
            }]
        );
    }

    #[test]
    fn energy_check_precedes_bounds_check() {
        let mut world = seeded_world(GridExtent::new(3, 3), 0);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MoveAgent {
                to: CellCoord::new(-5, -5),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveRejected {
                from: CellCoord::new(0, 0),
                to: CellCoord::new(-5, -5),
                reason: BlockReason::EnergyExhausted,
            }]
        );
    }

    #[test]
    fn energy_never_increases_without_recharge() {
        let mut world = seeded_world(GridExtent::new(4, 1), 3);
        let mut events = Vec::new();
        let mut last_energy = query::agent(&world).energy;

        let targets = [
            CellCoord::new(1, 0),
            CellCoord::new(1, 0),
            CellCoord::new(9, 9),
            CellCoord::new(2, 0),
            CellCoord::new(3, 0),
            CellCoord::new(3, 0),
        ];
        for target in targets {
            apply(&mut world, Command::MoveAgent { to: target }, &mut events);
            let energy = query::agent(&world).energy;
            assert!(energy <= last_energy);
            assert!(last_energy - energy <= 1);
            last_energy = energy;
        }
        assert_eq!(last_energy, 0);
    }

    #[test]
    fn recharge_restores_capacity_and_reports() {
        let mut world = seeded_world(GridExtent::new(3, 3), 2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MoveAgent {
                to: CellCoord::new(1, 0),
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::Recharge, &mut events);

        assert_eq!(events, vec![Event::EnergyRecharged { energy: 2 }]);
        assert_eq!(query::agent(&world).energy, 2);
    }

    #[test]
    fn cleaning_transitions_dirt_exactly_once() {
        let mut world = seeded_world(GridExtent::new(3, 3), 5);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SeedDirt {
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::CleanCell, &mut events);
        assert_eq!(
            events,
            vec![Event::CellCleaned {
                cell: CellCoord::new(0, 0),
            }]
        );
        assert_eq!(query::cell_at(&world, CellCoord::new(0, 0)), Ok(Cell::Cleaned));

        events.clear();
        apply(&mut world, Command::CleanCell, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::cell_at(&world, CellCoord::new(0, 0)), Ok(Cell::Cleaned));
    }

    #[test]
    fn cleaning_an_empty_cell_is_silent() {
        let mut world = seeded_world(GridExtent::new(3, 3), 5);
        let mut events = Vec::new();

        apply(&mut world, Command::CleanCell, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::cell_at(&world, CellCoord::new(0, 0)), Ok(Cell::Empty));
    }

    #[test]
    fn cell_queries_outside_the_grid_report_out_of_range() {
        let world = seeded_world(GridExtent::new(3, 3), 5);
        let probe = CellCoord::new(3, 0);

        assert_eq!(
            query::cell_at(&world, probe),
            Err(WorldError::OutOfRange {
                cell: probe,
                extent: GridExtent::new(3, 3),
            })
        );
    }

    #[test]
    fn zero_step_delay_is_rejected() {
        let mut world = World::new();

        assert_eq!(
            adjust_speed(&mut world, Duration::ZERO),
            Err(WorldError::InvalidStepDelay)
        );
        assert_eq!(adjust_speed(&mut world, Duration::from_millis(250)), Ok(()));
        assert_eq!(
            query::agent(&world).step_delay,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn agent_never_rests_on_an_obstacle() {
        let mut world = seeded_world(GridExtent::new(4, 4), 20);
        let mut events = Vec::new();
        for cell in [CellCoord::new(1, 0), CellCoord::new(2, 2)] {
            apply(&mut world, Command::SeedObstacle { cell }, &mut events);
        }

        let targets = [
            CellCoord::new(1, 0),
            CellCoord::new(0, 1),
            CellCoord::new(1, 1),
            CellCoord::new(2, 2),
            CellCoord::new(2, 1),
            CellCoord::new(4, 1),
        ];
        for target in targets {
            apply(&mut world, Command::MoveAgent { to: target }, &mut events);
            let occupied = query::agent(&world).cell;
            assert!(query::grid_extent(&world).contains(occupied));
            assert_ne!(query::cell_at(&world, occupied), Ok(Cell::Obstacle));
        }
    }
}
