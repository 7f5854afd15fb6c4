#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use grid_sweeper_core::{Cell, CellCoord, Command, GridExtent};
use grid_sweeper_world::{query, World};
use serde::{Deserialize, Serialize};

const SNAPSHOT_DOMAIN: &str = "sweep";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded scenario payload.
pub(crate) const SNAPSHOT_HEADER: &str = "sweep:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of a cleaning scenario: grid dimensions, battery capacity and
/// the cells seeded with dirt or obstacles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct ScenarioSnapshot {
    /// Number of cell columns contained in the grid.
    pub width: u32,
    /// Number of cell rows contained in the grid.
    pub height: u32,
    /// Energy budget the agent starts each run with.
    pub max_energy: u32,
    /// Cells covered with dirt when the scenario starts.
    pub dirt: Vec<CellCoord>,
    /// Cells permanently blocked by obstacles.
    pub obstacles: Vec<CellCoord>,
}

impl ScenarioSnapshot {
    /// Encodes the scenario into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableScenario {
            max_energy: self.max_energy,
            dirt: self.dirt.clone(),
            obstacles: self.obstacles.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("scenario serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.width, self.height)
    }

    /// Decodes a scenario from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ScenarioTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ScenarioTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ScenarioTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(ScenarioTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(ScenarioTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(ScenarioTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(ScenarioTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(ScenarioTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ScenarioTransferError::InvalidEncoding)?;
        let decoded: SerializableScenario =
            serde_json::from_slice(&bytes).map_err(ScenarioTransferError::InvalidPayload)?;

        let extent = GridExtent::new(width, height);
        for cell in decoded.dirt.iter().chain(decoded.obstacles.iter()) {
            if !extent.contains(*cell) {
                return Err(ScenarioTransferError::OutOfBoundsCell(*cell));
            }
        }

        Ok(Self {
            width,
            height,
            max_energy: decoded.max_energy,
            dirt: decoded.dirt,
            obstacles: decoded.obstacles,
        })
    }

    /// Captures the world's setup-time state as a shareable scenario.
    ///
    /// Cleaned cells are not captured; a scenario describes a room before
    /// any sweeping has happened.
    #[must_use]
    pub(crate) fn capture(world: &World) -> Self {
        let view = query::grid_view(world);
        let extent = view.extent();
        let width = extent.width().max(1) as usize;
        let mut dirt = Vec::new();
        let mut obstacles = Vec::new();
        for (index, cell) in view.cells().iter().enumerate() {
            let coord = CellCoord::new((index % width) as i32, (index / width) as i32);
            match cell {
                Cell::Dirt => dirt.push(coord),
                Cell::Obstacle => obstacles.push(coord),
                Cell::Empty | Cell::Cleaned => {}
            }
        }

        Self {
            width: extent.width(),
            height: extent.height(),
            max_energy: query::agent(world).max_energy,
            dirt,
            obstacles,
        }
    }

    /// Command batch that builds this scenario inside a world.
    #[must_use]
    pub(crate) fn commands(&self) -> Vec<Command> {
        let mut commands = vec![
            Command::ConfigureGrid {
                extent: GridExtent::new(self.width, self.height),
            },
            Command::ConfigureAgent {
                max_energy: self.max_energy,
            },
        ];
        commands.extend(self.dirt.iter().map(|cell| Command::SeedDirt { cell: *cell }));
        commands.extend(
            self.obstacles
                .iter()
                .map(|cell| Command::SeedObstacle { cell: *cell }),
        );
        commands
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableScenario {
    max_energy: u32,
    dirt: Vec<CellCoord>,
    obstacles: Vec<CellCoord>,
}

/// Errors that can occur while decoding scenario transfer strings.
#[derive(Debug)]
pub(crate) enum ScenarioTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded scenario.
    MissingPrefix,
    /// The encoded scenario did not contain a version segment.
    MissingVersion,
    /// The encoded scenario did not include grid dimensions.
    MissingDimensions,
    /// The encoded scenario did not include the payload segment.
    MissingPayload,
    /// The encoded scenario used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded scenario used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded scenario.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// A seeded cell lies outside the declared grid dimensions.
    OutOfBoundsCell(CellCoord),
}

impl fmt::Display for ScenarioTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "scenario payload was empty"),
            Self::MissingPrefix => write!(f, "scenario string is missing the prefix"),
            Self::MissingVersion => write!(f, "scenario string is missing the version"),
            Self::MissingDimensions => write!(f, "scenario string is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "scenario string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "scenario prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "scenario version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode scenario payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse scenario payload: {error}")
            }
            Self::OutOfBoundsCell(cell) => {
                write!(
                    f,
                    "cell ({}, {}) lies outside the declared grid dimensions",
                    cell.x(),
                    cell.y()
                )
            }
        }
    }
}

impl Error for ScenarioTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), ScenarioTransferError> {
    let (width, height) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| ScenarioTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| ScenarioTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|_| ScenarioTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if width == 0 || height == 0 {
        return Err(ScenarioTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((width, height))
}
