//! Dungeon layout registry
//!
//! The aggregate result of a build: every placed room keyed by its node id.
//! Built incrementally during an attempt and discarded wholesale when the
//! attempt fails.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::room::Room;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DungeonLayout {
    rooms: HashMap<String, Room>,
}

impl DungeonLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a room under its node id
    pub fn insert(&mut self, room: Room) {
        self.rooms.insert(room.id.clone(), room);
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn room_mut(&mut self, id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn clear(&mut self) {
        self.rooms.clear();
    }

    /// First positioned room whose bounds overlap the candidate's, skipping
    /// the candidate itself
    pub fn overlapping_room(&self, candidate: &Room) -> Option<&Room> {
        self.rooms.values().find(|room| {
            room.id != candidate.id && room.is_positioned && room.bounds.overlaps(&candidate.bounds)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::dungeon::bounds::{Bounds, GridPoint};
    use crate::dungeon::node_graph::{RoomNode, RoomNodeType};
    use crate::dungeon::template::RoomTemplate;

    use super::*;

    fn placed_room(id: &str, lower: (i32, i32), upper: (i32, i32)) -> Room {
        let bounds = Bounds::new(
            GridPoint::new(lower.0, lower.1),
            GridPoint::new(upper.0, upper.1),
        );
        let template = RoomTemplate::new(format!("t-{id}"), RoomNodeType::SmallRoom, bounds);
        let node = RoomNode::new(id, RoomNodeType::SmallRoom);
        let mut room = Room::from_template(&template, &node);
        room.is_positioned = true;
        room
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut layout = DungeonLayout::new();
        layout.insert(placed_room("a", (0, 0), (5, 5)));

        assert_eq!(layout.len(), 1);
        assert!(layout.room("a").is_some());
        assert!(layout.room("b").is_none());
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut layout = DungeonLayout::new();
        layout.insert(placed_room("a", (0, 0), (5, 5)));
        layout.clear();
        assert!(layout.is_empty());
    }

    #[test]
    fn test_overlapping_room_detects_overlap() {
        let mut layout = DungeonLayout::new();
        layout.insert(placed_room("a", (0, 0), (5, 5)));

        let overlapping = placed_room("b", (4, 4), (9, 9));
        assert_eq!(layout.overlapping_room(&overlapping).unwrap().id, "a");

        let separate = placed_room("c", (10, 10), (15, 15));
        assert!(layout.overlapping_room(&separate).is_none());
    }

    #[test]
    fn test_overlapping_room_skips_self() {
        let mut layout = DungeonLayout::new();
        layout.insert(placed_room("a", (0, 0), (5, 5)));

        let same = placed_room("a", (0, 0), (5, 5));
        assert!(layout.overlapping_room(&same).is_none());
    }

    #[test]
    fn test_overlapping_room_skips_unpositioned() {
        let mut layout = DungeonLayout::new();
        let mut unplaced = placed_room("a", (0, 0), (5, 5));
        unplaced.is_positioned = false;
        layout.insert(unplaced);

        let candidate = placed_room("b", (0, 0), (5, 5));
        assert!(layout.overlapping_room(&candidate).is_none());
    }

    #[test]
    fn test_touching_rooms_count_as_overlapping() {
        let mut layout = DungeonLayout::new();
        layout.insert(placed_room("a", (0, 0), (5, 5)));

        // Flush against the right edge, sharing boundary x = 5
        let flush = placed_room("b", (5, 0), (9, 5));
        assert!(layout.overlapping_room(&flush).is_some());
    }
}
