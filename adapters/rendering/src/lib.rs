#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Sweeper adapters.
//!
//! The simulation is presented as a character grid: one glyph per cell, the
//! agent overlaid on whichever cell it occupies. Adapters decide where the
//! composed frame goes (terminal, log, test buffer) by implementing
//! [`FramePresenter`].

use anyhow::Result as AnyResult;
use grid_sweeper_core::{Cell, CellCoord, GridExtent};
use std::{error::Error, fmt};

/// Glyph drawn for a cell with nothing in it.
pub const EMPTY_GLYPH: char = '.';
/// Glyph drawn for a dirt cell.
pub const DIRT_GLYPH: char = 'D';
/// Glyph drawn for an obstacle cell.
pub const OBSTACLE_GLYPH: char = '#';
/// Glyph drawn for a cleaned cell.
pub const CLEANED_GLYPH: char = 'C';
/// Glyph drawn for the cell the agent occupies, hiding the cell beneath.
pub const AGENT_GLYPH: char = 'R';

/// Legend line shown above the rendered grid.
pub const LEGEND: &str = "Legends: #=Obstacle, D=Dirt, C=Cleaned, R=Robot, .=Empty";

/// Maps a cell state to its presentation glyph.
#[must_use]
pub const fn glyph_for(cell: Cell) -> char {
    match cell {
        Cell::Empty => EMPTY_GLYPH,
        Cell::Dirt => DIRT_GLYPH,
        Cell::Obstacle => OBSTACLE_GLYPH,
        Cell::Cleaned => CLEANED_GLYPH,
    }
}

/// Errors that can occur while composing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The provided cell slice does not match the grid extent.
    CellCountMismatch {
        /// Number of cells the extent requires.
        expected: usize,
        /// Number of cells actually provided.
        actual: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellCountMismatch { expected, actual } => write!(
                f,
                "grid snapshot holds {actual} cells but the extent requires {expected}"
            ),
        }
    }
}

impl Error for RenderingError {}

/// A fully composed character frame ready for presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    rows: Vec<String>,
}

impl Frame {
    /// Composes a frame from a grid snapshot and the agent's position.
    ///
    /// Cells are drawn row by row, two characters per cell (glyph plus a
    /// spacer), with the agent glyph taking priority over the cell beneath
    /// it. Returns an error when the slice length disagrees with the extent.
    pub fn compose(
        extent: GridExtent,
        cells: &[Cell],
        agent: CellCoord,
    ) -> Result<Self, RenderingError> {
        if cells.len() != extent.cell_count() {
            return Err(RenderingError::CellCountMismatch {
                expected: extent.cell_count(),
                actual: cells.len(),
            });
        }

        let width = extent.width() as usize;
        let mut rows = Vec::with_capacity(extent.height() as usize);
        for (row_index, row) in cells.chunks(width.max(1)).enumerate() {
            let mut line = String::with_capacity(width * 2);
            for (column_index, cell) in row.iter().enumerate() {
                let here = CellCoord::new(column_index as i32, row_index as i32);
                let glyph = if here == agent {
                    AGENT_GLYPH
                } else {
                    glyph_for(*cell)
                };
                line.push(glyph);
                line.push(' ');
            }
            rows.push(line);
        }

        Ok(Self { rows })
    }

    /// Rendered rows from top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Sink that delivers composed frames to their display surface.
pub trait FramePresenter {
    /// Presents a frame and a one-line status summary, replacing whatever
    /// was shown before.
    fn present(&mut self, frame: &Frame, status: &str) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_draws_glyphs_with_agent_priority() {
        let extent = GridExtent::new(3, 2);
        let cells = [
            Cell::Empty,
            Cell::Dirt,
            Cell::Obstacle,
            Cell::Cleaned,
            Cell::Empty,
            Cell::Dirt,
        ];

        let frame = Frame::compose(extent, &cells, CellCoord::new(1, 0)).expect("frame composes");

        assert_eq!(frame.rows(), &[". R # ".to_owned(), "C . D ".to_owned()]);
    }

    #[test]
    fn frame_rejects_mismatched_snapshots() {
        let extent = GridExtent::new(2, 2);
        let cells = [Cell::Empty; 3];

        assert_eq!(
            Frame::compose(extent, &cells, CellCoord::new(0, 0)),
            Err(RenderingError::CellCountMismatch {
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn display_joins_rows_with_newlines() {
        let extent = GridExtent::new(2, 1);
        let cells = [Cell::Empty, Cell::Empty];
        let frame = Frame::compose(extent, &cells, CellCoord::new(0, 0)).expect("frame composes");

        assert_eq!(frame.to_string(), "R . \n");
    }

    #[test]
    fn every_cell_state_has_a_distinct_glyph() {
        let glyphs = [
            glyph_for(Cell::Empty),
            glyph_for(Cell::Dirt),
            glyph_for(Cell::Obstacle),
            glyph_for(Cell::Cleaned),
        ];
        for (index, glyph) in glyphs.iter().enumerate() {
            assert!(!glyphs[index + 1..].contains(glyph));
        }
    }
}
