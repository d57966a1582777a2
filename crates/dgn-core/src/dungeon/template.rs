//! Room templates and the template catalog
//!
//! A template is an immutable, fixed-geometry blueprint for one room node
//! type: tile bounds, doorways, and spawn points. The catalog indexes the
//! level's templates by guid and serves seeded random picks by type.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_DOORWAYS_PER_ROOM;
use crate::rng::BuildRng;

use super::bounds::{Bounds, GridPoint};
use super::doorway::{Doorway, Orientation};
use super::errors::LevelError;
use super::node_graph::RoomNodeType;

/// An immutable room blueprint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomTemplate {
    /// Unique, stable identifier
    pub guid: String,
    pub node_type: RoomNodeType,
    /// Rectangle enclosing the room's tilemap, template-local
    pub bounds: Bounds,
    /// At most one doorway per compass orientation
    pub doorways: Vec<Doorway>,
    /// Candidate enemy/chest spawn tiles, template-local
    pub spawn_positions: Vec<GridPoint>,
    /// Opaque handle to the renderable room content
    pub prefab: String,
}

impl RoomTemplate {
    pub fn new(guid: impl Into<String>, node_type: RoomNodeType, bounds: Bounds) -> Self {
        Self {
            guid: guid.into(),
            node_type,
            bounds,
            ..Default::default()
        }
    }

    pub fn with_doorway(mut self, doorway: Doorway) -> Self {
        self.doorways.push(doorway);
        self
    }

    pub fn with_spawn_positions(mut self, positions: Vec<GridPoint>) -> Self {
        self.spawn_positions = positions;
        self
    }
}

/// Indexes a level's room templates and serves random candidates
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<RoomTemplate>,
    by_guid: HashMap<String, usize>,
}

impl TemplateCatalog {
    /// Build a catalog, rejecting duplicate guids and malformed doorway sets
    pub fn load(templates: Vec<RoomTemplate>) -> Result<Self, LevelError> {
        let mut by_guid = HashMap::with_capacity(templates.len());

        for (i, template) in templates.iter().enumerate() {
            if by_guid.insert(template.guid.clone(), i).is_some() {
                return Err(LevelError::DuplicateTemplateGuid {
                    guid: template.guid.clone(),
                });
            }
            if template.doorways.len() > MAX_DOORWAYS_PER_ROOM {
                return Err(LevelError::TooManyDoorways {
                    guid: template.guid.clone(),
                    count: template.doorways.len(),
                });
            }
            for (j, doorway) in template.doorways.iter().enumerate() {
                let duplicated = template.doorways[..j]
                    .iter()
                    .any(|d| d.orientation == doorway.orientation);
                if duplicated {
                    return Err(LevelError::DuplicateDoorwayOrientation {
                        guid: template.guid.clone(),
                        orientation: doorway.orientation,
                    });
                }
            }
        }

        Ok(Self { templates, by_guid })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Look up a template by guid
    pub fn template(&self, guid: &str) -> Option<&RoomTemplate> {
        self.by_guid.get(guid).and_then(|&i| self.templates.get(i))
    }

    /// All templates tagged with the given room node type
    pub fn templates_for_type(&self, node_type: RoomNodeType) -> Vec<&RoomTemplate> {
        self.templates
            .iter()
            .filter(|t| t.node_type == node_type)
            .collect()
    }

    /// Uniform random pick among the templates of a type, None when the pool
    /// is empty
    pub fn random_template(
        &self,
        node_type: RoomNodeType,
        rng: &mut BuildRng,
    ) -> Option<&RoomTemplate> {
        let matching = self.templates_for_type(node_type);
        rng.choose(&matching).copied()
    }

    /// Pick a template for a node that must dock onto the given parent
    /// doorway.
    ///
    /// Generic corridor nodes dispatch on the doorway's orientation to the
    /// specialized NS/EW corridor pools; a doorway without orientation can
    /// take no corridor at all. Non-corridor nodes use their own pool.
    pub fn template_for_parent_doorway(
        &self,
        node_type: RoomNodeType,
        parent_orientation: Orientation,
        rng: &mut BuildRng,
    ) -> Option<&RoomTemplate> {
        if !node_type.is_corridor() {
            return self.random_template(node_type, rng);
        }

        match parent_orientation {
            Orientation::North | Orientation::South => {
                self.random_template(RoomNodeType::CorridorNS, rng)
            }
            Orientation::East | Orientation::West => {
                self.random_template(RoomNodeType::CorridorEW, rng)
            }
            Orientation::None => None,
        }
    }
}
