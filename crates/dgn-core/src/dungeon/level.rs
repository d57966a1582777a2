//! Dungeon level descriptor
//!
//! The data handed to a generate call: the room templates available on this
//! level and the candidate room node graphs, one of which is selected at
//! random per outer build attempt. Serde-derived so levels can be authored as
//! data files.

use serde::{Deserialize, Serialize};

use super::errors::LevelError;
use super::node_graph::{RoomNodeGraph, RoomNodeType};
use super::template::{RoomTemplate, TemplateCatalog};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DungeonLevel {
    pub name: String,
    pub templates: Vec<RoomTemplate>,
    pub graphs: Vec<RoomNodeGraph>,
}

impl DungeonLevel {
    pub fn new(
        name: impl Into<String>,
        templates: Vec<RoomTemplate>,
        graphs: Vec<RoomNodeGraph>,
    ) -> Self {
        Self {
            name: name.into(),
            templates,
            graphs,
        }
    }

    /// Authoring-time checks for a complete level configuration.
    ///
    /// Every graph must be structurally sound, and the template pool must
    /// cover the types any graph can demand: an entrance plus both
    /// specialized corridor pools.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.name.is_empty() {
            return Err(LevelError::EmptyName);
        }
        if self.templates.is_empty() {
            return Err(LevelError::NoTemplates);
        }
        if self.graphs.is_empty() {
            return Err(LevelError::NoGraphs);
        }

        // Surfaces duplicate guids and malformed doorway sets
        TemplateCatalog::load(self.templates.clone())?;

        for required in [
            RoomNodeType::Entrance,
            RoomNodeType::CorridorNS,
            RoomNodeType::CorridorEW,
        ] {
            if !self.templates.iter().any(|t| t.node_type == required) {
                return Err(LevelError::MissingTemplateType(required));
            }
        }

        for graph in &self.graphs {
            graph.validate()?;
        }

        Ok(())
    }
}
