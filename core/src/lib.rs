#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Sweeper engine.
//!
//! This crate defines the message surface that connects the authoritative
//! world, the traversal systems, and the presentation adapters. Systems
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values describing what actually happened. Traversal systems consume event
//! streams together with immutable snapshots and respond exclusively with new
//! command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the simulation boots.
pub const WELCOME_BANNER: &str = "Grid Sweeper cleaning robot simulation";

/// Location of a single grid cell expressed as signed axis coordinates.
///
/// Coordinates are signed so that a move target just beyond the grid edge is
/// representable; the world rejects such targets instead of the caller having
/// to pre-clamp them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the coordinate, growing rightward.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component of the coordinate, growing downward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate one step away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Dimensions of the playable grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridExtent {
    width: u32,
    height: u32,
}

impl GridExtent {
    /// Creates a new grid extent descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cell columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cell rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the provided coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x() >= 0
            && cell.y() >= 0
            && (cell.x() as u32) < self.width
            && (cell.y() as u32) < self.height
    }

    /// Row-major index of the provided coordinate, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.y()).ok()?;
        let column = usize::try_from(cell.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }
}

/// State of a single grid cell.
///
/// The only runtime transition is `Dirt` to `Cleaned`; `Empty` and `Obstacle`
/// are immutable once setup finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Nothing to clean and nothing in the way.
    Empty,
    /// A patch of dirt awaiting the sweeper.
    Dirt,
    /// An impassable cell the agent can never occupy.
    Obstacle,
    /// A former dirt cell the sweeper already visited.
    Cleaned,
}

/// Cardinal movement directions available to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Unit offset applied to a coordinate when stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the grid with the provided dimensions, all cells empty, and
    /// returns the agent to the origin.
    ConfigureGrid {
        /// Dimensions the rebuilt grid should have.
        extent: GridExtent,
    },
    /// Replaces the agent's energy capacity and refills its charge.
    ConfigureAgent {
        /// Energy budget available after configuration.
        max_energy: u32,
    },
    /// Marks a cell as dirt during scenario setup, overwriting its state.
    SeedDirt {
        /// Cell to cover with dirt.
        cell: CellCoord,
    },
    /// Marks a cell as an obstacle during scenario setup, overwriting its state.
    SeedObstacle {
        /// Cell to block permanently.
        cell: CellCoord,
    },
    /// Requests that the agent relocate to the provided cell.
    ///
    /// This is the only motion primitive: energy, bounds and obstacle rules
    /// are enforced here and nowhere else.
    MoveAgent {
        /// Target cell of the attempted move.
        to: CellCoord,
    },
    /// Requests that the agent clean the cell it currently occupies.
    CleanCell,
    /// Restores the agent's energy to its configured capacity.
    Recharge,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was rebuilt with new dimensions.
    GridConfigured {
        /// Dimensions of the rebuilt grid.
        extent: GridExtent,
    },
    /// Confirms that the agent's energy capacity changed.
    AgentConfigured {
        /// Energy budget now available to the agent.
        max_energy: u32,
    },
    /// Confirms that a cell now holds dirt.
    DirtSeeded {
        /// Cell that was covered with dirt.
        cell: CellCoord,
    },
    /// Confirms that a cell is now an obstacle.
    ObstacleSeeded {
        /// Cell that was blocked.
        cell: CellCoord,
    },
    /// Confirms that the agent relocated between two cells.
    AgentMoved {
        /// Cell the agent occupied before the move.
        from: CellCoord,
        /// Cell the agent occupies after the move.
        to: CellCoord,
    },
    /// Reports that a requested move was rejected and nothing changed.
    MoveRejected {
        /// Cell the agent occupied when the move was requested.
        from: CellCoord,
        /// Target cell of the rejected move.
        to: CellCoord,
        /// Specific rule that blocked the move.
        reason: BlockReason,
    },
    /// Confirms that a dirt cell transitioned to cleaned.
    CellCleaned {
        /// Cell that was cleaned.
        cell: CellCoord,
    },
    /// Confirms that the agent's energy was restored to capacity.
    EnergyRecharged {
        /// Energy available after the recharge.
        energy: u32,
    },
}

/// Rules that can block a requested move.
///
/// A blocked move is ordinary control flow for the traversal systems, never
/// an error: each strategy consumes the reason to drive its next transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockReason {
    /// The agent has no energy left to spend on motion.
    EnergyExhausted,
    /// The target cell lies outside the grid.
    OutOfBounds,
    /// The target cell is occupied by an obstacle.
    Obstacle,
}

/// Terminal result of a single cleaning run, surfaced once per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The strategy ran its full pattern to the end.
    Completed,
    /// The strategy gave up after a boundary or obstacle blocked it.
    Obstructed,
    /// The agent's energy ran out mid-pattern.
    EnergyExhausted,
}

/// Identifies one of the interchangeable traversal strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Hugs the boundary: one sweep East, South, West, then North.
    PerimeterHugger,
    /// Boustrophedon column sweep, alternating direction per column.
    SPattern,
    /// Expanding rectangular spiral outward from the agent's position.
    Spiral,
    /// Uniform random walk until the energy budget is spent.
    RandomWalk,
}

impl StrategyKind {
    /// Human-readable name used in run logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PerimeterHugger => "Perimeter Hugger",
            Self::SPattern => "S-Pattern",
            Self::Spiral => "Spiral",
            Self::RandomWalk => "Random Walk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, GridExtent, Outcome, StrategyKind};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn steps_move_one_cell_in_each_direction() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(origin.step(Direction::North), CellCoord::new(3, 2));
        assert_eq!(origin.step(Direction::East), CellCoord::new(4, 3));
        assert_eq!(origin.step(Direction::South), CellCoord::new(3, 4));
        assert_eq!(origin.step(Direction::West), CellCoord::new(2, 3));
    }

    #[test]
    fn extent_contains_interior_but_not_edges_beyond() {
        let extent = GridExtent::new(4, 3);
        assert!(extent.contains(CellCoord::new(0, 0)));
        assert!(extent.contains(CellCoord::new(3, 2)));
        assert!(!extent.contains(CellCoord::new(4, 0)));
        assert!(!extent.contains(CellCoord::new(0, 3)));
        assert!(!extent.contains(CellCoord::new(-1, 0)));
        assert!(!extent.contains(CellCoord::new(0, -1)));
    }

    #[test]
    fn index_of_is_row_major() {
        let extent = GridExtent::new(4, 3);
        assert_eq!(extent.index_of(CellCoord::new(0, 0)), Some(0));
        assert_eq!(extent.index_of(CellCoord::new(3, 0)), Some(3));
        assert_eq!(extent.index_of(CellCoord::new(0, 1)), Some(4));
        assert_eq!(extent.index_of(CellCoord::new(3, 2)), Some(11));
        assert_eq!(extent.index_of(CellCoord::new(4, 2)), None);
    }

    #[test]
    fn cell_count_matches_extent() {
        assert_eq!(GridExtent::new(10, 10).cell_count(), 100);
        assert_eq!(GridExtent::new(0, 7).cell_count(), 0);
    }

    #[test]
    fn opposite_directions_cancel() {
        let origin = CellCoord::new(5, 5);
        assert_eq!(origin.step(Direction::East).step(Direction::West), origin);
        assert_eq!(origin.step(Direction::South).step(Direction::North), origin);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(-2, 7));
    }

    #[test]
    fn grid_extent_round_trips_through_bincode() {
        assert_round_trip(&GridExtent::new(12, 8));
    }

    #[test]
    fn strategy_kind_round_trips_through_bincode() {
        assert_round_trip(&StrategyKind::Spiral);
    }

    #[test]
    fn outcome_round_trips_through_bincode() {
        assert_round_trip(&Outcome::Obstructed);
    }
}
