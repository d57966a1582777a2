//! Error types for dungeon generation.
//!
//! Only two things are fatal to a generate call: a level with no graphs, and
//! exhaustion of the outer retry budget. Everything else is handled locally
//! by falling through to the next retry tier; [`PlacementFailure`] values are
//! recorded as diagnostics so designers can see why attempts failed.

use thiserror::Error;

use super::doorway::Orientation;
use super::node_graph::RoomNodeType;

/// Fatal outcome of a generate call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("dungeon level '{level}' has no room node graphs")]
    NoGraphs { level: String },

    #[error("invalid dungeon level: {0}")]
    Level(#[from] LevelError),

    #[error(
        "dungeon build failed after {graph_selections} graph selections \
         and {total_attempts} build attempts"
    )]
    RetriesExhausted {
        graph_selections: u32,
        total_attempts: u32,
    },
}

/// A recoverable failure during one build attempt
///
/// These never propagate past the orchestrator; they trigger the next retry
/// tier and are kept as the failure trail of the attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementFailure {
    #[error("no entrance node in room node graph")]
    NoEntranceNode,

    #[error("no room template found for room node type {0}")]
    NoTemplateForType(RoomNodeType),

    #[error("template {template_id} has no doorway opposite to {orientation}")]
    NoOppositeDoorway {
        template_id: String,
        orientation: Orientation,
    },

    #[error("room {room_id} would overlap placed room {other_id}")]
    Overlap { room_id: String, other_id: String },

    #[error("all parent doorways exhausted while placing node {node_id}")]
    ParentDoorwaysExhausted { node_id: String },

    #[error("parent room for node {node_id} is not in the layout")]
    ParentNotPlaced { node_id: String },
}

/// Structural problems in a room node graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("graph has no entrance node")]
    NoEntrance,

    #[error("graph has more than one entrance node")]
    MultipleEntrances,

    #[error("entrance node {node_id} has parent nodes")]
    EntranceHasParents { node_id: String },

    #[error("duplicate node id {node_id}")]
    DuplicateNodeId { node_id: String },

    #[error("node {node_id} has multiple parents, which is unsupported")]
    MultiParentNode { node_id: String },

    #[error("corridor node {child_id} is connected directly to corridor node {parent_id}")]
    CorridorToCorridor { parent_id: String, child_id: String },

    #[error("node {node_id} references unknown child {child_id}")]
    DanglingChild { node_id: String, child_id: String },

    #[error("node {node_id} has {count} corridor children, more than the allowed maximum")]
    TooManyCorridorChildren { node_id: String, count: usize },
}

/// Problems in a dungeon level descriptor or its template list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("level name is empty")]
    EmptyName,

    #[error("level has no room templates")]
    NoTemplates,

    #[error("level has no room node graphs")]
    NoGraphs,

    #[error("no room template provided for required type {0}")]
    MissingTemplateType(RoomNodeType),

    #[error("duplicate room template guid {guid}")]
    DuplicateTemplateGuid { guid: String },

    #[error("template {guid} has more than one {orientation} doorway")]
    DuplicateDoorwayOrientation {
        guid: String,
        orientation: Orientation,
    },

    #[error("template {guid} has {count} doorways, more than the allowed maximum")]
    TooManyDoorways { guid: String, count: usize },

    #[error("invalid room node graph: {0}")]
    Graph(#[from] GraphError),
}
