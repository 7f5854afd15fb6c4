#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Grid Sweeper experience.

use grid_sweeper_core::{CellCoord, Command, GridExtent};
use grid_sweeper_world::{query, World};

const DEMO_EXTENT: GridExtent = GridExtent::new(10, 10);
const DEMO_MAX_ENERGY: u32 = 200;
const DEMO_DIRT: [CellCoord; 4] = [
    CellCoord::new(2, 3),
    CellCoord::new(6, 2),
    CellCoord::new(3, 1),
    CellCoord::new(7, 9),
];
const DEMO_OBSTACLES: [CellCoord; 2] = [CellCoord::new(3, 2), CellCoord::new(5, 5)];

/// Produces the data required to greet the player and seed the demo room.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Command batch that builds the canned demo room: a 10x10 grid with a
    /// handful of dirt patches, two obstacles and a full battery.
    #[must_use]
    pub fn demo_scenario(&self) -> Vec<Command> {
        let mut commands = vec![
            Command::ConfigureGrid { extent: DEMO_EXTENT },
            Command::ConfigureAgent {
                max_energy: DEMO_MAX_ENERGY,
            },
        ];
        commands.extend(DEMO_DIRT.iter().map(|cell| Command::SeedDirt { cell: *cell }));
        commands.extend(
            DEMO_OBSTACLES
                .iter()
                .map(|cell| Command::SeedObstacle { cell: *cell }),
        );
        commands
    }
}
