//! Placement engine
//!
//! Attaches a child room to an unconnected doorway of its already-placed
//! parent. Each loop iteration either succeeds or permanently consumes one of
//! the parent's finite doorways, so the search always terminates; once the
//! parent has no open doorways left the node cannot be placed and the whole
//! build attempt fails.

use crate::rng::BuildRng;

use super::bounds::Bounds;
use super::doorway::{Doorway, DoorwayState};
use super::errors::PlacementFailure;
use super::layout::DungeonLayout;
use super::node_graph::RoomNode;
use super::room::Room;
use super::template::TemplateCatalog;

/// Attempt to create and place a room for `node` against its parent.
///
/// On success the room is registered in the layout with both joined doorways
/// marked connected. Recoverable rejections (no template for the doorway, no
/// opposite doorway on the candidate, overlap) retire the chosen parent
/// doorway and are pushed onto `failures`; the terminal failure is returned.
pub fn try_place_child_room(
    layout: &mut DungeonLayout,
    parent_id: &str,
    node: &RoomNode,
    catalog: &TemplateCatalog,
    rng: &mut BuildRng,
    failures: &mut Vec<PlacementFailure>,
) -> Result<(), PlacementFailure> {
    loop {
        // Copy out what we need from the parent so the layout borrow ends
        // before we mutate doorway state.
        let (doorway_index, parent_doorway, parent_bounds, parent_template_bounds) = {
            let parent =
                layout
                    .room(parent_id)
                    .ok_or_else(|| PlacementFailure::ParentNotPlaced {
                        node_id: node.id.clone(),
                    })?;

            let open = parent.open_doorway_indices();
            let Some(&doorway_index) = rng.choose(&open) else {
                return Err(PlacementFailure::ParentDoorwaysExhausted {
                    node_id: node.id.clone(),
                });
            };

            (
                doorway_index,
                parent.doorways[doorway_index].clone(),
                parent.bounds,
                parent.template_bounds,
            )
        };

        let Some(template) =
            catalog.template_for_parent_doorway(node.node_type, parent_doorway.orientation, rng)
        else {
            failures.push(PlacementFailure::NoTemplateForType(node.node_type));
            retire_parent_doorway(layout, parent_id, doorway_index);
            continue;
        };

        let mut room = Room::from_template(template, node);

        let Some(room_doorway_index) = room.doorway_opposite(parent_doorway.orientation) else {
            failures.push(PlacementFailure::NoOppositeDoorway {
                template_id: template.guid.clone(),
                orientation: parent_doorway.orientation,
            });
            retire_parent_doorway(layout, parent_id, doorway_index);
            continue;
        };

        room.bounds = placed_bounds(
            &room,
            room_doorway_index,
            &parent_doorway,
            parent_bounds,
            parent_template_bounds,
        );

        if let Some(other) = layout.overlapping_room(&room) {
            failures.push(PlacementFailure::Overlap {
                room_id: room.id.clone(),
                other_id: other.id.clone(),
            });
            retire_parent_doorway(layout, parent_id, doorway_index);
            continue;
        }

        room.doorways[room_doorway_index].state =
            DoorwayState::CONNECTED | DoorwayState::UNAVAILABLE;
        room.is_positioned = true;

        if let Some(parent) = layout.room_mut(parent_id) {
            if let Some(d) = parent.doorways.get_mut(doorway_index) {
                d.state = DoorwayState::CONNECTED | DoorwayState::UNAVAILABLE;
            }
        }

        layout.insert(room);
        return Ok(());
    }
}

/// Compute the world bounds that align the room's doorway tile immediately
/// adjacent to the parent's doorway tile.
///
/// The parent doorway tile is moved into world space through the parent's
/// placed bounds, stepped one tile across the shared wall in the direction of
/// the room's own doorway, and the room is then translated so that its
/// doorway lands on that tile. The template footprint is preserved.
fn placed_bounds(
    room: &Room,
    room_doorway_index: usize,
    parent_doorway: &Doorway,
    parent_bounds: Bounds,
    parent_template_bounds: Bounds,
) -> Bounds {
    let room_doorway = &room.doorways[room_doorway_index];

    let parent_doorway_world =
        parent_bounds.lower + parent_doorway.position - parent_template_bounds.lower;
    let docked_tile = parent_doorway_world + room_doorway.orientation.adjacency_step();
    let lower = docked_tile + room.template_bounds.lower - room_doorway.position;

    room.template_bounds.translated_to(lower)
}

/// Mark one of the parent's doorways unavailable for the rest of this build
/// attempt.
fn retire_parent_doorway(layout: &mut DungeonLayout, parent_id: &str, doorway_index: usize) {
    if let Some(parent) = layout.room_mut(parent_id) {
        if let Some(doorway) = parent.doorways.get_mut(doorway_index) {
            doorway.state.insert(DoorwayState::UNAVAILABLE);
        }
    }
}
