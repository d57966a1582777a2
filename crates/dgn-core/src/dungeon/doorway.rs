//! Doorway model
//!
//! A doorway is a typed, oriented connection point on a room template. Each
//! room instance gets its own copy of the template's doorway list, so
//! connecting or retiring a doorway during placement never touches the
//! template.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::bounds::GridPoint;

/// Compass orientation of a doorway
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Orientation {
    North,
    South,
    East,
    West,
    #[default]
    None,
}

impl Orientation {
    /// The exact compass opposite (north<->south, east<->west)
    pub const fn opposite(self) -> Orientation {
        match self {
            Orientation::North => Orientation::South,
            Orientation::South => Orientation::North,
            Orientation::East => Orientation::West,
            Orientation::West => Orientation::East,
            Orientation::None => Orientation::None,
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Orientation::North | Orientation::South)
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Orientation::East | Orientation::West)
    }

    /// Unit step that places a doorway tile immediately across the shared
    /// wall from its partner.
    ///
    /// A north-facing doorway docks onto a south-facing one directly above
    /// it, so its room shifts one tile down, and so on around the compass.
    pub const fn adjacency_step(self) -> GridPoint {
        match self {
            Orientation::North => GridPoint::new(0, -1),
            Orientation::South => GridPoint::new(0, 1),
            Orientation::East => GridPoint::new(-1, 0),
            Orientation::West => GridPoint::new(1, 0),
            Orientation::None => GridPoint::new(0, 0),
        }
    }
}

bitflags! {
    /// Doorway connection state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DoorwayState: u8 {
        /// Joined to a doorway of another placed room
        const CONNECTED = 0x01;
        /// Consumed for this build attempt; not retried
        const UNAVAILABLE = 0x02;
    }
}

/// A connection point on a room template or placed room
///
/// Positions are template-local tile coordinates. The copy rectangle
/// describes which tiles the scene layer stamps over the opening when the
/// doorway ends up unconnected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Doorway {
    /// Middle tile of the opening, template-local
    pub position: GridPoint,
    pub orientation: Orientation,
    /// Opaque handle to the door asset placed here when connected
    pub door_asset: String,
    /// Upper-left tile to start copying blocking tiles from
    pub copy_start: GridPoint,
    /// Width in tiles of the blocking copy
    pub copy_width: i32,
    /// Height in tiles of the blocking copy
    pub copy_height: i32,
    #[serde(skip)]
    pub state: DoorwayState,
}

impl Doorway {
    pub fn new(position: GridPoint, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
            ..Default::default()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state.contains(DoorwayState::CONNECTED)
    }

    pub fn is_unavailable(&self) -> bool {
        self.state.contains(DoorwayState::UNAVAILABLE)
    }

    /// Neither connected nor retired: still a candidate for attachment
    pub fn is_open_for_connection(&self) -> bool {
        self.state.is_empty()
    }
}
