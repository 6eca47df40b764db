//! Event command lists and the closed set of commands that name asset files.

use super::{AudioFile, lenient};
use crate::asset::catalog::AssetType;
use crate::error::{MigrationError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event command opcodes that reference assets.
pub mod codes {
    pub const CHANGE_BATTLE_BGM: i32 = 132;
    pub const CHANGE_BATTLE_END_ME: i32 = 133;
    pub const CHANGE_VEHICLE_BGM: i32 = 140;
    pub const SET_MOVE_ROUTE: i32 = 205;
    pub const SHOW_PICTURE: i32 = 231;
    pub const PLAY_BGM: i32 = 241;
    pub const PLAY_BGS: i32 = 245;
    pub const PLAY_ME: i32 = 249;
    pub const PLAY_SE: i32 = 250;
    pub const CHANGE_BATTLE_BACKGROUND: i32 = 283;
    pub const CHANGE_PARALLAX: i32 = 284;
    pub const CHANGE_ACTOR_GRAPHIC: i32 = 322;
    pub const CHANGE_VEHICLE_GRAPHIC: i32 = 323;

    /// Move route opcodes
    pub const ROUTE_CHANGE_GRAPHIC: i32 = 41;
    pub const ROUTE_PLAY_SE: i32 = 44;
}

/// Generic `(code, parameters)` instruction as stored in project data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventCommand {
    #[serde(deserialize_with = "lenient::or_default")]
    pub code: i32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub indent: i32,
    /// Positional, so `null` entries are kept
    #[serde(deserialize_with = "lenient::or_default")]
    pub parameters: Vec<Value>,
}

impl EventCommand {
    pub fn new(code: i32, parameters: Vec<Value>) -> Self {
        Self {
            code,
            indent: 0,
            parameters,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveCommand {
    #[serde(deserialize_with = "lenient::or_default")]
    pub code: i32,
    /// Positional, so `null` entries are kept
    #[serde(deserialize_with = "lenient::or_default")]
    pub parameters: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveRoute {
    #[serde(deserialize_with = "lenient::or_default")]
    pub repeat: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub skippable: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub wait: bool,
    #[serde(deserialize_with = "lenient::seq")]
    pub list: Vec<MoveCommand>,
}

impl MoveRoute {
    /// Graphic and sound files named by the route's commands. Malformed steps are skipped.
    pub fn references(&self) -> Vec<(AssetType, String)> {
        let mut refs = Vec::new();
        for step in &self.list {
            let found = match step.code {
                codes::ROUTE_CHANGE_GRAPHIC => {
                    string_param(step.code, &step.parameters, 0).map(|n| (AssetType::Character, n))
                }
                codes::ROUTE_PLAY_SE => {
                    audio_param(step.code, &step.parameters, 0).map(|a| (AssetType::Se, a.name))
                }
                _ => continue,
            };
            match found {
                Ok(reference) => refs.push(reference),
                Err(e) => tracing::debug!("Skipping move route step: {}", e),
            }
        }
        refs
    }
}

/// Recognized asset-bearing command, decoded from an [`EventCommand`].
#[derive(Debug, Clone, PartialEq)]
pub enum AssetCommand {
    ChangeBattleBgm(AudioFile),
    ChangeBattleEndMe(AudioFile),
    ChangeVehicleBgm(AudioFile),
    SetMoveRoute(MoveRoute),
    ShowPicture(String),
    PlayBgm(AudioFile),
    PlayBgs(AudioFile),
    PlayMe(AudioFile),
    PlaySe(AudioFile),
    ChangeBattleBackground { floor: String, wall: String },
    ChangeParallax(String),
    ChangeActorGraphic { character: String, face: String },
    ChangeVehicleGraphic(String),
}

impl AssetCommand {
    /// `Ok(None)` for opcodes that never name assets; `Err` when a known opcode has bad parameters.
    pub fn decode(command: &EventCommand) -> Result<Option<Self>> {
        let code = command.code;
        let params = command.parameters.as_slice();

        let decoded = match code {
            codes::CHANGE_BATTLE_BGM => Self::ChangeBattleBgm(audio_param(code, params, 0)?),
            codes::CHANGE_BATTLE_END_ME => Self::ChangeBattleEndMe(audio_param(code, params, 0)?),
            codes::CHANGE_VEHICLE_BGM => Self::ChangeVehicleBgm(audio_param(code, params, 1)?),
            codes::SET_MOVE_ROUTE => {
                let route = params.get(1).ok_or_else(|| missing_param(code, 1))?;
                let route = serde_json::from_value(route.clone())
                    .map_err(|e| malformed(code, 1, e.to_string()))?;
                Self::SetMoveRoute(route)
            }
            codes::SHOW_PICTURE => Self::ShowPicture(string_param(code, params, 1)?),
            codes::PLAY_BGM => Self::PlayBgm(audio_param(code, params, 0)?),
            codes::PLAY_BGS => Self::PlayBgs(audio_param(code, params, 0)?),
            codes::PLAY_ME => Self::PlayMe(audio_param(code, params, 0)?),
            codes::PLAY_SE => Self::PlaySe(audio_param(code, params, 0)?),
            codes::CHANGE_BATTLE_BACKGROUND => Self::ChangeBattleBackground {
                floor: string_param(code, params, 0)?,
                wall: string_param(code, params, 1)?,
            },
            codes::CHANGE_PARALLAX => Self::ChangeParallax(string_param(code, params, 0)?),
            codes::CHANGE_ACTOR_GRAPHIC => Self::ChangeActorGraphic {
                character: string_param(code, params, 1)?,
                face: string_param(code, params, 3)?,
            },
            codes::CHANGE_VEHICLE_GRAPHIC => {
                Self::ChangeVehicleGraphic(string_param(code, params, 1)?)
            }
            _ => return Ok(None),
        };

        Ok(Some(decoded))
    }

    /// Every (type, name) pair the command names. Names may be empty.
    pub fn references(&self) -> Vec<(AssetType, String)> {
        match self {
            Self::ChangeBattleBgm(bgm) | Self::ChangeVehicleBgm(bgm) | Self::PlayBgm(bgm) => {
                vec![(AssetType::Bgm, bgm.name.clone())]
            }
            Self::ChangeBattleEndMe(me) | Self::PlayMe(me) => vec![(AssetType::Me, me.name.clone())],
            Self::PlayBgs(bgs) => vec![(AssetType::Bgs, bgs.name.clone())],
            Self::PlaySe(se) => vec![(AssetType::Se, se.name.clone())],
            Self::SetMoveRoute(route) => route.references(),
            Self::ShowPicture(name) => vec![(AssetType::Picture, name.clone())],
            Self::ChangeBattleBackground { floor, wall } => vec![
                (AssetType::Battleback1, floor.clone()),
                (AssetType::Battleback2, wall.clone()),
            ],
            Self::ChangeParallax(name) => vec![(AssetType::Parallax, name.clone())],
            Self::ChangeActorGraphic { character, face } => vec![
                (AssetType::Character, character.clone()),
                (AssetType::Face, face.clone()),
            ],
            Self::ChangeVehicleGraphic(name) => vec![(AssetType::Character, name.clone())],
        }
    }
}

fn malformed(code: i32, index: usize, reason: impl Into<String>) -> MigrationError {
    MigrationError::MalformedRecord {
        kind: format!("command {}", code),
        index,
        reason: reason.into(),
    }
}

fn missing_param(code: i32, index: usize) -> MigrationError {
    malformed(code, index, "missing parameter")
}

/// `null` reads as "no file selected".
fn string_param(code: i32, params: &[Value], index: usize) -> Result<String> {
    match params.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) => Ok(String::new()),
        Some(other) => Err(malformed(code, index, format!("expected string, got {}", other))),
        None => Err(missing_param(code, index)),
    }
}

fn audio_param(code: i32, params: &[Value], index: usize) -> Result<AudioFile> {
    match params.get(index) {
        Some(Value::Null) => Ok(AudioFile::default()),
        Some(value @ Value::Object(_)) => serde_json::from_value(value.clone())
            .map_err(|e| malformed(code, index, e.to_string())),
        Some(other) => Err(malformed(code, index, format!("expected audio, got {}", other))),
        None => Err(missing_param(code, index)),
    }
}
