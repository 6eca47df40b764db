//! Typed project database records.
//!
//! Only the fields that matter for asset discovery are modelled; everything else in the
//! exported JSON is ignored. Fields are read through [`lenient`], so a `null` or mistyped value
//! defaults that field (or drops one list element) instead of losing the record.

pub mod command;
pub mod lenient;

pub use command::{AssetCommand, EventCommand, MoveCommand, MoveRoute};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioFile {
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub volume: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub pitch: u32,
}

impl AudioFile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume: 100,
            pitch: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub character_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub character_index: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub face_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub face_index: u32,
}

/// Classes, skills, items, weapons and armors. None of them name a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseItem {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub icon_index: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enemy {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub battler_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub battler_hue: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTiming {
    #[serde(deserialize_with = "lenient::or_default")]
    pub frame: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub se: AudioFile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Animation {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub animation1_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub animation2_name: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub timings: Vec<AnimationTiming>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tileset {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub tileset_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonEvent {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub list: Vec<EventCommand>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TroopPage {
    #[serde(deserialize_with = "lenient::or_default")]
    pub span: u32,
    #[serde(deserialize_with = "lenient::seq")]
    pub list: Vec<EventCommand>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Troop {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub pages: Vec<TroopPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    #[serde(deserialize_with = "lenient::or_default")]
    pub character_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub character_index: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub bgm: AudioFile,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct System {
    #[serde(deserialize_with = "lenient::or_default")]
    pub game_title: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub battler_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub title1_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub title2_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub title_bgm: AudioFile,
    #[serde(deserialize_with = "lenient::or_default")]
    pub battle_bgm: AudioFile,
    #[serde(deserialize_with = "lenient::or_default")]
    pub battle_end_me: AudioFile,
    #[serde(deserialize_with = "lenient::or_default")]
    pub gameover_me: AudioFile,
    #[serde(deserialize_with = "lenient::seq")]
    pub sounds: Vec<AudioFile>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub boat: Vehicle,
    #[serde(deserialize_with = "lenient::or_default")]
    pub ship: Vehicle,
    #[serde(deserialize_with = "lenient::or_default")]
    pub airship: Vehicle,
}

impl System {
    pub fn vehicles(&self) -> [&Vehicle; 3] {
        [&self.boat, &self.ship, &self.airship]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventGraphic {
    #[serde(deserialize_with = "lenient::or_default")]
    pub tile_id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub character_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub character_index: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPage {
    #[serde(deserialize_with = "lenient::or_default")]
    pub graphic: EventGraphic,
    #[serde(deserialize_with = "lenient::or_default")]
    pub move_route: MoveRoute,
    #[serde(deserialize_with = "lenient::seq")]
    pub list: Vec<EventCommand>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapEvent {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub x: i32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub y: i32,
    #[serde(deserialize_with = "lenient::seq")]
    pub pages: Vec<EventPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Map {
    #[serde(deserialize_with = "lenient::or_default")]
    pub display_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub tileset_id: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub battleback1_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub battleback2_name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub bgm: AudioFile,
    #[serde(deserialize_with = "lenient::or_default")]
    pub bgs: AudioFile,
    #[serde(deserialize_with = "lenient::or_default")]
    pub parallax_name: String,
    /// Keyed by event id; exported data may contain `null` slots.
    #[serde(deserialize_with = "lenient::slots")]
    pub events: BTreeMap<u32, Option<MapEvent>>,
}
