//! Dungeon layout system
//!
//! Contains grid geometry, the doorway and room models, the template catalog,
//! the room node graph, and the placement engine plus build orchestrator.

mod bounds;
mod builder;
mod doorway;
mod errors;
mod layout;
mod level;
mod node_graph;
mod placement;
mod room;
mod template;

pub use bounds::{intervals_overlap, Bounds, GridPoint};
pub use builder::{BuildState, BuildStats, DungeonBuilder};
pub use doorway::{Doorway, DoorwayState, Orientation};
pub use errors::{BuildError, GraphError, LevelError, PlacementFailure};
pub use layout::DungeonLayout;
pub use level::DungeonLevel;
pub use node_graph::{RoomNode, RoomNodeGraph, RoomNodeType};
pub use placement::try_place_child_room;
pub use room::Room;
pub use template::{RoomTemplate, TemplateCatalog};
