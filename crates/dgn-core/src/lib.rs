//! dgn-core: procedural dungeon layout generation.
//!
//! Builds a non-overlapping spatial layout of rooms from two inputs: an
//! abstract room node graph describing the desired dungeon topology, and a
//! catalog of fixed-geometry room templates with typed doorways. The builder
//! walks the graph breadth-first from the entrance, attaching each room to an
//! unconnected doorway of its already-placed parent, with bounded retries at
//! every level.
//!
//! This crate contains pure generation logic with no I/O or rendering.
//! Rendering, door objects, and tile blocking of unused doorways are the
//! responsibility of the consumer of the finished [`DungeonLayout`].

pub mod dungeon;

mod consts;
mod rng;

pub use consts::*;
pub use dungeon::{
    Bounds, BuildError, BuildState, BuildStats, Doorway, DoorwayState, DungeonBuilder,
    DungeonLayout, DungeonLevel, GraphError, GridPoint, LevelError, Orientation,
    PlacementFailure, Room, RoomNode, RoomNodeGraph, RoomNodeType, RoomTemplate,
    TemplateCatalog,
};
pub use rng::BuildRng;
