//! Project data sources.
//!
//! A [`ProjectDataSource`] hands the scanner a fully loaded [`ProjectData`]. Collections hold
//! `Option` slots because exported databases start with a `null` entry and may contain
//! records that failed to decode.

pub mod loader;

pub use loader::JsonDataSource;

use crate::error::Result;
use crate::model::{Actor, Animation, BaseItem, CommonEvent, Enemy, Map, System, Tileset, Troop};
use std::fmt;

/// Database collections in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Actors,
    Classes,
    Skills,
    Items,
    Weapons,
    Armors,
    Enemies,
    Animations,
    Tilesets,
    CommonEvents,
    Troops,
    System,
    Maps,
}

impl DataKind {
    pub const ALL: [DataKind; 13] = [
        DataKind::Actors,
        DataKind::Classes,
        DataKind::Skills,
        DataKind::Items,
        DataKind::Weapons,
        DataKind::Armors,
        DataKind::Enemies,
        DataKind::Animations,
        DataKind::Tilesets,
        DataKind::CommonEvents,
        DataKind::Troops,
        DataKind::System,
        DataKind::Maps,
    ];

    /// File stem of the exported collection. Maps are globbed instead.
    pub fn file_stem(&self) -> &'static str {
        match self {
            DataKind::Actors => "Actors",
            DataKind::Classes => "Classes",
            DataKind::Skills => "Skills",
            DataKind::Items => "Items",
            DataKind::Weapons => "Weapons",
            DataKind::Armors => "Armors",
            DataKind::Enemies => "Enemies",
            DataKind::Animations => "Animations",
            DataKind::Tilesets => "Tilesets",
            DataKind::CommonEvents => "CommonEvents",
            DataKind::Troops => "Troops",
            DataKind::System => "System",
            DataKind::Maps => "Map",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectData {
    pub actors: Vec<Option<Actor>>,
    pub classes: Vec<Option<BaseItem>>,
    pub skills: Vec<Option<BaseItem>>,
    pub items: Vec<Option<BaseItem>>,
    pub weapons: Vec<Option<BaseItem>>,
    pub armors: Vec<Option<BaseItem>>,
    pub enemies: Vec<Option<Enemy>>,
    pub animations: Vec<Option<Animation>>,
    pub tilesets: Vec<Option<Tileset>>,
    pub common_events: Vec<Option<CommonEvent>>,
    pub troops: Vec<Option<Troop>>,
    pub system: Option<System>,
    /// Ordered by map id
    pub maps: Vec<Option<Map>>,
}

impl ProjectData {
    /// Number of slots in a collection, `null` entries included.
    pub fn slot_count(&self, kind: DataKind) -> usize {
        match kind {
            DataKind::Actors => self.actors.len(),
            DataKind::Classes => self.classes.len(),
            DataKind::Skills => self.skills.len(),
            DataKind::Items => self.items.len(),
            DataKind::Weapons => self.weapons.len(),
            DataKind::Armors => self.armors.len(),
            DataKind::Enemies => self.enemies.len(),
            DataKind::Animations => self.animations.len(),
            DataKind::Tilesets => self.tilesets.len(),
            DataKind::CommonEvents => self.common_events.len(),
            DataKind::Troops => self.troops.len(),
            DataKind::System => usize::from(self.system.is_some()),
            DataKind::Maps => self.maps.len(),
        }
    }
}

pub trait ProjectDataSource {
    fn load(&self) -> Result<ProjectData>;

    /// Source name (for logging)
    fn name(&self) -> &str;
}

/// In-memory data is its own source.
impl ProjectDataSource for ProjectData {
    fn load(&self) -> Result<ProjectData> {
        Ok(self.clone())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
