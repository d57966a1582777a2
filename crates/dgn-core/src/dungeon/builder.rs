//! Dungeon build orchestrator
//!
//! Walks a selected room node graph breadth-first from the entrance, placing
//! each room against its parent through the placement engine, inside a
//! two-tier retry loop: many cheap rebuild attempts per graph, and a few
//! graph reselections when a graph shape turns out to be geometrically
//! infeasible.

use std::collections::VecDeque;

use crate::consts::{MAX_REBUILD_ATTEMPTS, MAX_REBUILD_ATTEMPTS_FOR_GRAPH};
use crate::rng::BuildRng;

use super::errors::{BuildError, PlacementFailure};
use super::layout::DungeonLayout;
use super::level::DungeonLevel;
use super::node_graph::{RoomNodeGraph, RoomNodeType};
use super::placement::try_place_child_room;
use super::room::Room;
use super::template::TemplateCatalog;

/// Where the builder currently is in a generate call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    Idle,
    SelectingGraph,
    BuildingRooms,
    Success,
    Retrying,
}

/// Diagnostics accumulated across a generate call.
///
/// `failures` holds the failure trail of the most recent build attempt; it is
/// cleared when a new attempt starts. Failures never alter control flow
/// beyond triggering the next retry tier.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// How many graphs were selected (outer tier)
    pub graph_selections: u32,
    /// Total build attempts across all selected graphs (inner tier)
    pub total_attempts: u32,
    pub failures: Vec<PlacementFailure>,
}

/// Builds dungeon layouts from level descriptors.
///
/// All collaborators arrive as call parameters; the builder holds only the
/// catalog loaded from the current level plus observable state and stats.
#[derive(Debug, Default)]
pub struct DungeonBuilder {
    catalog: TemplateCatalog,
    state: BuildState,
    stats: BuildStats,
}

impl DungeonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// The catalog loaded by the last generate call
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Generate a dungeon layout for the given level.
    ///
    /// Selects a random node graph and attempts to build it up to
    /// [`MAX_REBUILD_ATTEMPTS_FOR_GRAPH`] times, reselecting a new graph up
    /// to [`MAX_REBUILD_ATTEMPTS`] times. Each attempt starts from an empty
    /// layout. On success the finished layout is returned for the scene
    /// layer to instantiate.
    pub fn generate(
        &mut self,
        level: &DungeonLevel,
        rng: &mut BuildRng,
    ) -> Result<DungeonLayout, BuildError> {
        self.catalog = TemplateCatalog::load(level.templates.clone())?;
        self.stats = BuildStats::default();
        self.state = BuildState::Idle;

        if level.graphs.is_empty() {
            return Err(BuildError::NoGraphs {
                level: level.name.clone(),
            });
        }

        for _ in 0..MAX_REBUILD_ATTEMPTS {
            self.state = BuildState::SelectingGraph;
            let Some(graph) = rng.choose(&level.graphs) else {
                return Err(BuildError::NoGraphs {
                    level: level.name.clone(),
                });
            };
            self.stats.graph_selections += 1;

            for _ in 0..MAX_REBUILD_ATTEMPTS_FOR_GRAPH {
                self.state = BuildState::BuildingRooms;
                self.stats.total_attempts += 1;
                self.stats.failures.clear();

                let mut layout = DungeonLayout::new();
                match self.attempt_build(graph, &mut layout, rng) {
                    Ok(()) => {
                        self.state = BuildState::Success;
                        return Ok(layout);
                    }
                    Err(failure) => {
                        // A graph without an entrance can never succeed:
                        // abandon it for a fresh selection instead of
                        // burning the inner budget.
                        let abandon_graph = failure == PlacementFailure::NoEntranceNode;
                        self.stats.failures.push(failure);
                        if abandon_graph {
                            break;
                        }
                    }
                }
            }
            self.state = BuildState::Retrying;
        }

        Err(BuildError::RetriesExhausted {
            graph_selections: self.stats.graph_selections,
            total_attempts: self.stats.total_attempts,
        })
    }

    /// One full traversal-and-placement pass over a selected graph.
    ///
    /// Breadth-first from the entrance, parents before children; the
    /// entrance room anchors the dungeon at its template's own bounds, every
    /// other room is placed against its parent. The first placement failure
    /// aborts the rest of the traversal.
    fn attempt_build(
        &mut self,
        graph: &RoomNodeGraph,
        layout: &mut DungeonLayout,
        rng: &mut BuildRng,
    ) -> Result<(), PlacementFailure> {
        let entrance = graph.entrance().ok_or(PlacementFailure::NoEntranceNode)?;

        let mut queue = VecDeque::new();
        queue.push_back(entrance.id.clone());

        while let Some(id) = queue.pop_front() {
            let Some(node) = graph.node(&id) else {
                continue;
            };

            for child in graph.children_of(node) {
                queue.push_back(child.id.clone());
            }

            if node.node_type.is_entrance() {
                let template = self
                    .catalog
                    .random_template(RoomNodeType::Entrance, rng)
                    .ok_or(PlacementFailure::NoTemplateForType(RoomNodeType::Entrance))?;

                let mut room = Room::from_template(template, node);
                room.is_positioned = true;
                layout.insert(room);
            } else {
                let parent_id = node.parent_ids.first().cloned().ok_or_else(|| {
                    PlacementFailure::ParentNotPlaced {
                        node_id: node.id.clone(),
                    }
                })?;

                try_place_child_room(
                    layout,
                    &parent_id,
                    node,
                    &self.catalog,
                    rng,
                    &mut self.stats.failures,
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::dungeon::bounds::{Bounds, GridPoint};
    use crate::dungeon::doorway::{Doorway, Orientation};
    use crate::dungeon::node_graph::RoomNode;
    use crate::dungeon::template::RoomTemplate;

    use super::*;

    fn entrance_template() -> RoomTemplate {
        RoomTemplate::new(
            "t-entrance",
            RoomNodeType::Entrance,
            Bounds::new(GridPoint::new(0, 0), GridPoint::new(5, 5)),
        )
        .with_doorway(Doorway::new(GridPoint::new(2, 0), Orientation::South))
        .with_doorway(Doorway::new(GridPoint::new(5, 2), Orientation::East))
        .with_spawn_positions(vec![GridPoint::new(2, 2)])
    }

    fn corridor_ns_template() -> RoomTemplate {
        RoomTemplate::new(
            "t-corridor-ns",
            RoomNodeType::CorridorNS,
            Bounds::new(GridPoint::new(0, 0), GridPoint::new(1, 3)),
        )
        .with_doorway(Doorway::new(GridPoint::new(0, 3), Orientation::North))
        .with_doorway(Doorway::new(GridPoint::new(0, 0), Orientation::South))
    }

    fn corridor_ew_template() -> RoomTemplate {
        RoomTemplate::new(
            "t-corridor-ew",
            RoomNodeType::CorridorEW,
            Bounds::new(GridPoint::new(0, 0), GridPoint::new(3, 1)),
        )
        .with_doorway(Doorway::new(GridPoint::new(0, 0), Orientation::West))
        .with_doorway(Doorway::new(GridPoint::new(3, 0), Orientation::East))
    }

    fn small_room_template() -> RoomTemplate {
        RoomTemplate::new(
            "t-small",
            RoomNodeType::SmallRoom,
            Bounds::new(GridPoint::new(0, 0), GridPoint::new(7, 7)),
        )
        .with_doorway(Doorway::new(GridPoint::new(3, 7), Orientation::North))
        .with_doorway(Doorway::new(GridPoint::new(0, 3), Orientation::West))
    }

    fn boss_room_template() -> RoomTemplate {
        RoomTemplate::new(
            "t-boss",
            RoomNodeType::BossRoom,
            Bounds::new(GridPoint::new(0, 0), GridPoint::new(9, 9)),
        )
        .with_doorway(Doorway::new(GridPoint::new(4, 9), Orientation::North))
        .with_doorway(Doorway::new(GridPoint::new(4, 0), Orientation::South))
        .with_doorway(Doorway::new(GridPoint::new(9, 4), Orientation::East))
        .with_doorway(Doorway::new(GridPoint::new(0, 4), Orientation::West))
    }

    fn full_template_set() -> Vec<RoomTemplate> {
        vec![
            entrance_template(),
            corridor_ns_template(),
            corridor_ew_template(),
            small_room_template(),
            boss_room_template(),
        ]
    }

    /// entrance -> corridor -> small room -> corridor -> boss room
    fn five_node_graph() -> RoomNodeGraph {
        let mut graph = RoomNodeGraph::new(vec![
            RoomNode::new("entrance", RoomNodeType::Entrance),
            RoomNode::new("c1", RoomNodeType::Corridor),
            RoomNode::new("room-1", RoomNodeType::SmallRoom),
            RoomNode::new("c2", RoomNodeType::Corridor),
            RoomNode::new("boss", RoomNodeType::BossRoom),
        ]);
        graph.connect("entrance", "c1");
        graph.connect("c1", "room-1");
        graph.connect("room-1", "c2");
        graph.connect("c2", "boss");
        graph
    }

    fn assert_no_overlaps(layout: &DungeonLayout) {
        let rooms: Vec<_> = layout.rooms().collect();
        for (i, a) in rooms.iter().enumerate() {
            for b in rooms.iter().skip(i + 1) {
                assert!(
                    !a.bounds.overlaps(&b.bounds),
                    "rooms {} and {} overlap: {:?} vs {:?}",
                    a.id,
                    b.id,
                    a.bounds,
                    b.bounds
                );
            }
        }
    }

    /// Every connected doorway must have exactly one partner doorway in
    /// another room: adjacent tile, opposite orientation, also connected.
    fn assert_connection_symmetry(layout: &DungeonLayout) {
        for room in layout.rooms() {
            for doorway in room.doorways.iter().filter(|d| d.is_connected()) {
                let world = room.doorway_world_position(doorway);
                let partner_pos = world + doorway.orientation.opposite().adjacency_step();
                let partner_orientation = doorway.orientation.opposite();

                let partners = layout
                    .rooms()
                    .filter(|other| other.id != room.id)
                    .flat_map(|other| {
                        other
                            .doorways
                            .iter()
                            .filter(|d| d.is_connected())
                            .filter(|d| other.doorway_world_position(d) == partner_pos)
                            .filter(|d| d.orientation == partner_orientation)
                            .map(move |_| other.id.clone())
                    })
                    .count();

                assert_eq!(
                    partners, 1,
                    "doorway {} on room {} should have exactly one partner",
                    doorway.orientation, room.id
                );
            }
        }
    }

    #[test]
    fn test_entrance_anchors_at_template_bounds() {
        let level = DungeonLevel::new(
            "level-1",
            full_template_set(),
            vec![RoomNodeGraph::new(vec![RoomNode::new(
                "entrance",
                RoomNodeType::Entrance,
            )])],
        );
        let mut builder = DungeonBuilder::new();
        let mut rng = BuildRng::new(1);

        let layout = builder.generate(&level, &mut rng).unwrap();

        let entrance = layout.room("entrance").unwrap();
        assert!(entrance.is_positioned);
        assert!(entrance.is_previously_visited);
        assert_eq!(entrance.bounds, entrance.template_bounds);
        assert_eq!(builder.state(), BuildState::Success);
    }

    #[test]
    fn test_entrance_corridor_alignment() {
        // Catalog reduced to one entrance and one NS corridor so the
        // corridor must dock on the entrance's south doorway.
        let entrance = RoomTemplate::new(
            "t-entrance",
            RoomNodeType::Entrance,
            Bounds::new(GridPoint::new(0, 0), GridPoint::new(5, 5)),
        )
        .with_doorway(Doorway::new(GridPoint::new(2, 0), Orientation::South));

        let mut graph = RoomNodeGraph::new(vec![
            RoomNode::new("entrance", RoomNodeType::Entrance),
            RoomNode::new("corridor", RoomNodeType::Corridor),
        ]);
        graph.connect("entrance", "corridor");

        let level = DungeonLevel::new(
            "level-1",
            vec![entrance, corridor_ns_template()],
            vec![graph],
        );
        let mut builder = DungeonBuilder::new();
        let mut rng = BuildRng::new(3);

        let layout = builder.generate(&level, &mut rng).unwrap();
        assert_eq!(layout.len(), 2);

        let corridor = layout.room("corridor").unwrap();
        assert_eq!(corridor.bounds.lower, GridPoint::new(2, -4));
        assert_eq!(corridor.bounds.upper, GridPoint::new(3, -1));
        assert_no_overlaps(&layout);
        assert_connection_symmetry(&layout);
    }

    #[test]
    fn test_five_node_build() {
        let level = DungeonLevel::new("level-1", full_template_set(), vec![five_node_graph()]);
        let mut builder = DungeonBuilder::new();
        let mut rng = BuildRng::new(12345);

        let layout = builder.generate(&level, &mut rng).unwrap();

        assert_eq!(layout.len(), 5);
        assert!(layout.rooms().all(|r| r.is_positioned));
        assert_no_overlaps(&layout);
        assert_connection_symmetry(&layout);

        // Lineage is carried through from the graph
        let boss = layout.room("boss").unwrap();
        assert_eq!(boss.parent_id, "c2");
        assert!(boss.node_type.is_boss_room());
    }

    #[test]
    fn test_generate_is_reproducible() {
        let level = DungeonLevel::new("level-1", full_template_set(), vec![five_node_graph()]);

        let layout1 = DungeonBuilder::new()
            .generate(&level, &mut BuildRng::new(99))
            .unwrap();
        let layout2 = DungeonBuilder::new()
            .generate(&level, &mut BuildRng::new(99))
            .unwrap();

        for room in layout1.rooms() {
            let twin = layout2.room(&room.id).unwrap();
            assert_eq!(room.bounds, twin.bounds);
            assert_eq!(room.template_id, twin.template_id);
        }
    }

    #[test]
    fn test_empty_graph_list_fails_immediately() {
        let level = DungeonLevel::new("level-1", full_template_set(), vec![]);
        let mut builder = DungeonBuilder::new();
        let mut rng = BuildRng::new(1);

        let result = builder.generate(&level, &mut rng);
        assert_eq!(
            result.err(),
            Some(BuildError::NoGraphs {
                level: "level-1".into()
            })
        );
        assert_eq!(builder.stats().total_attempts, 0);
    }

    #[test]
    fn test_graph_without_entrance_consumes_no_templates() {
        let graph = RoomNodeGraph::new(vec![RoomNode::new("lonely", RoomNodeType::SmallRoom)]);
        let level = DungeonLevel::new("level-1", full_template_set(), vec![graph]);
        let mut builder = DungeonBuilder::new();
        let mut rng = BuildRng::new(1);

        let result = builder.generate(&level, &mut rng);

        assert!(matches!(
            result,
            Err(BuildError::RetriesExhausted { .. })
        ));
        // Each graph selection aborts after a single attempt, before any
        // template draw.
        assert_eq!(builder.stats().graph_selections, MAX_REBUILD_ATTEMPTS);
        assert_eq!(builder.stats().total_attempts, MAX_REBUILD_ATTEMPTS);
        assert_eq!(
            builder.stats().failures,
            vec![PlacementFailure::NoEntranceNode]
        );
    }

    #[test]
    fn test_impossible_pairing_exhausts_retries() {
        // The only corridor template's doorways face the same way as the
        // entrance's, so no opposite pairing ever exists.
        let entrance = RoomTemplate::new(
            "t-entrance",
            RoomNodeType::Entrance,
            Bounds::new(GridPoint::new(0, 0), GridPoint::new(5, 5)),
        )
        .with_doorway(Doorway::new(GridPoint::new(2, 0), Orientation::South));
        let corridor = RoomTemplate::new(
            "t-ns",
            RoomNodeType::CorridorNS,
            Bounds::new(GridPoint::new(0, 0), GridPoint::new(1, 3)),
        )
        .with_doorway(Doorway::new(GridPoint::new(0, 0), Orientation::South));

        let mut graph = RoomNodeGraph::new(vec![
            RoomNode::new("entrance", RoomNodeType::Entrance),
            RoomNode::new("corridor", RoomNodeType::Corridor),
        ]);
        graph.connect("entrance", "corridor");

        let level = DungeonLevel::new("level-1", vec![entrance, corridor], vec![graph]);
        let mut builder = DungeonBuilder::new();
        let mut rng = BuildRng::new(7);

        let result = builder.generate(&level, &mut rng);

        assert_eq!(
            result.err(),
            Some(BuildError::RetriesExhausted {
                graph_selections: MAX_REBUILD_ATTEMPTS,
                total_attempts: MAX_REBUILD_ATTEMPTS * MAX_REBUILD_ATTEMPTS_FOR_GRAPH,
            })
        );
        assert_eq!(builder.state(), BuildState::Retrying);
    }

    #[test]
    fn test_duplicate_template_guid_is_fatal() {
        let mut templates = full_template_set();
        templates.push(entrance_template());
        let level = DungeonLevel::new("level-1", templates, vec![five_node_graph()]);
        let mut builder = DungeonBuilder::new();
        let mut rng = BuildRng::new(1);

        assert!(matches!(
            builder.generate(&level, &mut rng),
            Err(BuildError::Level(_))
        ));
    }

    #[test]
    fn test_unconnected_doorways_left_for_blocking() {
        let level = DungeonLevel::new("level-1", full_template_set(), vec![five_node_graph()]);
        let layout = DungeonBuilder::new()
            .generate(&level, &mut BuildRng::new(12345))
            .unwrap();

        // The boss room connects through exactly one doorway; the rest stay
        // unconnected for the scene layer to stamp over.
        let boss = layout.room("boss").unwrap();
        let connected = boss.doorways.iter().filter(|d| d.is_connected()).count();
        assert_eq!(connected, 1);
        assert_eq!(boss.unconnected_doorways().count(), boss.doorways.len() - 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Successful builds never contain overlapping rooms and every
        /// connection is mutual, whatever the seed.
        #[test]
        fn prop_layout_invariants_hold(seed in any::<u64>()) {
            let level = DungeonLevel::new(
                "level-prop",
                full_template_set(),
                vec![five_node_graph()],
            );
            let mut builder = DungeonBuilder::new();
            let mut rng = BuildRng::new(seed);

            if let Ok(layout) = builder.generate(&level, &mut rng) {
                prop_assert_eq!(layout.len(), 5);
                for (a, b) in layout
                    .rooms()
                    .flat_map(|a| layout.rooms().map(move |b| (a, b)))
                    .filter(|(a, b)| a.id < b.id)
                {
                    prop_assert!(!a.bounds.overlaps(&b.bounds));
                }
                assert_connection_symmetry(&layout);
            }
        }
    }
}
