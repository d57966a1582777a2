//! Builder limits and room constants.

/// Maximum number of room node graph selections per generate call.
///
/// A graph that exhausts its inner rebuild attempts is abandoned and a new
/// graph is selected, up to this many times.
pub const MAX_REBUILD_ATTEMPTS: u32 = 10;

/// Maximum number of build attempts against a single selected graph.
///
/// Most placement failures are local dead ends recoverable by re-rolling
/// doorway and template choices, so this limit is high and cheap.
pub const MAX_REBUILD_ATTEMPTS_FOR_GRAPH: u32 = 1000;

/// Maximum number of child corridors leading out of a room node.
///
/// More than this makes rooms unlikely to fit together and dungeon builds
/// prone to failure.
pub const MAX_CHILD_CORRIDORS: usize = 3;

/// Maximum doorways on a room template, one per compass direction.
pub const MAX_DOORWAYS_PER_ROOM: usize = 4;
