//! Placed room instance
//!
//! A `Room` is created from a (template, node) pair during a build attempt.
//! It carries its own deep copies of the template's doorways and spawn
//! points, plus the placed bounds computed by the placement engine. The
//! template bounds are kept frozen as the reference frame for offset math.

use serde::{Deserialize, Serialize};

use super::bounds::{Bounds, GridPoint};
use super::doorway::{Doorway, Orientation};
use super::node_graph::{RoomNode, RoomNodeType};
use super::template::RoomTemplate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Id of the originating room node
    pub id: String,
    /// Guid of the template this room was stamped from
    pub template_id: String,
    pub node_type: RoomNodeType,
    /// Opaque handle to the renderable room content
    pub prefab: String,
    /// World bounds once placed; equal to the template bounds before that
    pub bounds: Bounds,
    /// Frozen copy of the template's own bounds
    pub template_bounds: Bounds,
    pub spawn_positions: Vec<GridPoint>,
    /// Independent copy of the template's doorways, mutated during placement
    pub doorways: Vec<Doorway>,
    /// Empty for the entrance room
    pub parent_id: String,
    pub child_ids: Vec<String>,
    pub is_positioned: bool,
    /// The player starts in the entrance, so only the entrance begins visited
    pub is_previously_visited: bool,
    /// Gameplay state owned by external systems, never mutated here
    pub is_lit: bool,
    pub is_clear_of_enemies: bool,
}

impl Room {
    /// Instantiate a room for a node from a template.
    ///
    /// Bounds start at the template's own bounds; the placement engine
    /// translates them when the room is attached to its parent.
    pub fn from_template(template: &RoomTemplate, node: &RoomNode) -> Self {
        let is_entrance = node.parent_ids.is_empty();
        Self {
            id: node.id.clone(),
            template_id: template.guid.clone(),
            node_type: template.node_type,
            prefab: template.prefab.clone(),
            bounds: template.bounds,
            template_bounds: template.bounds,
            spawn_positions: template.spawn_positions.clone(),
            doorways: template.doorways.clone(),
            parent_id: node.parent_ids.first().cloned().unwrap_or_default(),
            child_ids: node.child_ids.clone(),
            is_positioned: false,
            is_previously_visited: is_entrance,
            is_lit: false,
            is_clear_of_enemies: false,
        }
    }

    /// Indices of doorways still open for connection
    pub fn open_doorway_indices(&self) -> Vec<usize> {
        self.doorways
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_open_for_connection())
            .map(|(i, _)| i)
            .collect()
    }

    /// Doorways left unconnected after the build; the scene layer stamps
    /// blocking tiles over these openings
    pub fn unconnected_doorways(&self) -> impl Iterator<Item = &Doorway> {
        self.doorways.iter().filter(|d| !d.is_connected())
    }

    /// Index of the doorway facing the exact compass opposite of the given
    /// orientation
    pub fn doorway_opposite(&self, orientation: Orientation) -> Option<usize> {
        let wanted = orientation.opposite();
        if wanted == Orientation::None {
            return None;
        }
        self.doorways.iter().position(|d| d.orientation == wanted)
    }

    /// World grid position of one of this room's doorway tiles
    pub fn doorway_world_position(&self, doorway: &Doorway) -> GridPoint {
        self.bounds.lower + doorway.position - self.template_bounds.lower
    }
}
