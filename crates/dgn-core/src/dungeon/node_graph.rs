//! Room node graph
//!
//! The abstract topology of a dungeon: typed slots connected parent to
//! child, independent of any concrete geometry. Graphs are authored in an
//! external editor and consumed read-only by the builder.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::MAX_CHILD_CORRIDORS;

use super::errors::GraphError;

/// Room node type tags
///
/// Graphs use the generic `Corridor` tag; templates are tagged with the
/// specialized `CorridorNS`/`CorridorEW` variants, chosen at placement time
/// from the parent doorway's orientation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomNodeType {
    #[default]
    None,
    Entrance,
    Corridor,
    CorridorNS,
    CorridorEW,
    BossRoom,
    SmallRoom,
    MediumRoom,
    LargeRoom,
    ChestRoom,
}

impl RoomNodeType {
    pub const fn is_entrance(self) -> bool {
        matches!(self, RoomNodeType::Entrance)
    }

    /// Any of the three corridor tags
    pub const fn is_corridor(self) -> bool {
        matches!(
            self,
            RoomNodeType::Corridor | RoomNodeType::CorridorNS | RoomNodeType::CorridorEW
        )
    }

    pub const fn is_corridor_ns(self) -> bool {
        matches!(self, RoomNodeType::CorridorNS)
    }

    pub const fn is_corridor_ew(self) -> bool {
        matches!(self, RoomNodeType::CorridorEW)
    }

    pub const fn is_boss_room(self) -> bool {
        matches!(self, RoomNodeType::BossRoom)
    }

    pub const fn is_none(self) -> bool {
        matches!(self, RoomNodeType::None)
    }

    /// Types a designer can place in the graph editor. The specialized
    /// corridor tags are template-only.
    pub const fn is_displayable_in_graph_editor(self) -> bool {
        !matches!(
            self,
            RoomNodeType::None | RoomNodeType::CorridorNS | RoomNodeType::CorridorEW
        )
    }
}

/// One typed slot in a room node graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomNode {
    pub id: String,
    pub node_type: RoomNodeType,
    pub parent_ids: Vec<String>,
    pub child_ids: Vec<String>,
}

impl RoomNode {
    pub fn new(id: impl Into<String>, node_type: RoomNodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            parent_ids: Vec::new(),
            child_ids: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct RoomNodeGraphData {
    nodes: Vec<RoomNode>,
}

/// A directed graph of room nodes
///
/// The id index is rebuilt on construction and after deserialization; only
/// the node list is serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RoomNodeGraphData")]
pub struct RoomNodeGraph {
    nodes: Vec<RoomNode>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl From<RoomNodeGraphData> for RoomNodeGraph {
    fn from(data: RoomNodeGraphData) -> Self {
        RoomNodeGraph::new(data.nodes)
    }
}

impl RoomNodeGraph {
    pub fn new(nodes: Vec<RoomNode>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        Self { nodes, index }
    }

    pub fn nodes(&self) -> &[RoomNode] {
        &self.nodes
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&RoomNode> {
        self.index.get(id).and_then(|&i| self.nodes.get(i))
    }

    /// The entrance node, if the graph has one
    pub fn entrance(&self) -> Option<&RoomNode> {
        self.nodes.iter().find(|n| n.node_type.is_entrance())
    }

    /// Resolve a node's children, skipping nothing: dangling child ids are
    /// caught by [`RoomNodeGraph::validate`]
    pub fn children_of(&self, node: &RoomNode) -> Vec<&RoomNode> {
        node.child_ids
            .iter()
            .filter_map(|id| self.node(id))
            .collect()
    }

    /// Record a parent -> child edge on both endpoints
    ///
    /// Returns false when either id is unknown.
    pub fn connect(&mut self, parent_id: &str, child_id: &str) -> bool {
        let (Some(&pi), Some(&ci)) = (self.index.get(parent_id), self.index.get(child_id)) else {
            return false;
        };
        self.nodes[pi].child_ids.push(child_id.to_owned());
        self.nodes[ci].parent_ids.push(parent_id.to_owned());
        true
    }

    /// Check the structural invariants the builder relies on.
    ///
    /// The build path itself tolerates some of these (it only ever reads the
    /// first parent id), but authoring tools should reject such graphs
    /// instead of silently ignoring parts of them.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNodeId {
                    node_id: node.id.clone(),
                });
            }
        }

        let mut entrances = self.nodes.iter().filter(|n| n.node_type.is_entrance());
        let entrance = entrances.next().ok_or(GraphError::NoEntrance)?;
        if entrances.next().is_some() {
            return Err(GraphError::MultipleEntrances);
        }
        if !entrance.parent_ids.is_empty() {
            return Err(GraphError::EntranceHasParents {
                node_id: entrance.id.clone(),
            });
        }

        for node in &self.nodes {
            if node.parent_ids.len() > 1 {
                return Err(GraphError::MultiParentNode {
                    node_id: node.id.clone(),
                });
            }

            let mut corridor_children = 0;
            for child_id in &node.child_ids {
                let child = self.node(child_id).ok_or_else(|| GraphError::DanglingChild {
                    node_id: node.id.clone(),
                    child_id: child_id.clone(),
                })?;

                if node.node_type.is_corridor() && child.node_type.is_corridor() {
                    return Err(GraphError::CorridorToCorridor {
                        parent_id: node.id.clone(),
                        child_id: child.id.clone(),
                    });
                }
                if child.node_type.is_corridor() {
                    corridor_children += 1;
                }
            }
            if corridor_children > MAX_CHILD_CORRIDORS {
                return Err(GraphError::TooManyCorridorChildren {
                    node_id: node.id.clone(),
                    count: corridor_children,
                });
            }
        }

        Ok(())
    }
}
