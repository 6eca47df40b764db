//! Data scanner: walks every database collection and records the asset names it references.
//!
//! The dispatch is flat and per [`DataKind`]; each handler lists the fields of its record
//! that name files. Adding a new asset-bearing field means adding one line here.

use crate::asset::catalog::AssetType;
use crate::asset::collector::ReferenceCollector;
use crate::config::STANDARD_SYSTEM_FILES;
use crate::model::{
    Actor, Animation, AssetCommand, CommonEvent, Enemy, EventCommand, Map, System, Tileset, Troop,
};
use crate::project::{DataKind, ProjectData};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct DataScanner {
    standard_system_files: Vec<String>,
}

impl DataScanner {
    pub fn new() -> Self {
        Self {
            standard_system_files: STANDARD_SYSTEM_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the always-required system graphics
    pub fn with_standard_system_files(mut self, files: impl IntoIterator<Item = String>) -> Self {
        self.standard_system_files = files.into_iter().collect();
        self
    }

    /// Scan all collections in [`DataKind::ALL`] order. Never fails: absent collections,
    /// `null` slots and malformed commands are skipped.
    pub fn scan(&self, data: &ProjectData, collector: &mut ReferenceCollector) -> ScanResult {
        let start = Instant::now();
        let mut ctx = ScanContext {
            collector,
            result: ScanResult::default(),
        };

        for kind in DataKind::ALL {
            let before = ctx.result.references_added;
            scan_kind(kind, data, &mut ctx);
            debug!(
                "Scanned {} ({} slots): {} new references",
                kind,
                data.slot_count(kind),
                ctx.result.references_added - before
            );
        }

        for name in &self.standard_system_files {
            ctx.add(AssetType::System, name);
        }

        let mut result = ctx.result;
        result.duration = start.elapsed();
        info!(
            "Data scan complete: {} records ({} skipped), {} commands, {} references in {:?}",
            result.records_visited,
            result.records_skipped,
            result.commands_inspected,
            result.references_added,
            result.duration
        );
        result
    }
}

impl Default for DataScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters for one scan
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanResult {
    /// Non-null records handed to a handler
    pub records_visited: usize,
    /// `null` or undecodable slots
    pub records_skipped: usize,
    pub commands_inspected: usize,
    /// Recognized commands whose parameters did not match
    pub malformed_commands: usize,
    /// Distinct references this scan added to the collector
    pub references_added: usize,
    #[serde(skip)]
    pub duration: Duration,
}

struct ScanContext<'a> {
    collector: &'a mut ReferenceCollector,
    result: ScanResult,
}

impl ScanContext<'_> {
    fn add(&mut self, asset_type: AssetType, name: &str) {
        if self.collector.add(asset_type, name) {
            self.result.references_added += 1;
        }
    }

    fn visit<T>(&mut self, records: &[Option<T>], mut handler: impl FnMut(&mut Self, &T)) {
        for record in records {
            match record {
                Some(record) => {
                    self.result.records_visited += 1;
                    handler(self, record);
                }
                None => self.result.records_skipped += 1,
            }
        }
    }

    fn scan_commands(&mut self, list: &[EventCommand]) {
        for command in list {
            self.result.commands_inspected += 1;
            match AssetCommand::decode(command) {
                Ok(Some(decoded)) => {
                    for (asset_type, name) in decoded.references() {
                        self.add(asset_type, &name);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    self.result.malformed_commands += 1;
                    debug!("Skipping command: {}", e);
                }
            }
        }
    }
}

fn scan_kind(kind: DataKind, data: &ProjectData, ctx: &mut ScanContext<'_>) {
    match kind {
        DataKind::Actors => ctx.visit(&data.actors, scan_actor),
        // Database entries without file fields are still counted as visited
        DataKind::Classes => ctx.visit(&data.classes, |_, _| {}),
        DataKind::Skills => ctx.visit(&data.skills, |_, _| {}),
        DataKind::Items => ctx.visit(&data.items, |_, _| {}),
        DataKind::Weapons => ctx.visit(&data.weapons, |_, _| {}),
        DataKind::Armors => ctx.visit(&data.armors, |_, _| {}),
        DataKind::Enemies => ctx.visit(&data.enemies, scan_enemy),
        DataKind::Animations => ctx.visit(&data.animations, scan_animation),
        DataKind::Tilesets => ctx.visit(&data.tilesets, scan_tileset),
        DataKind::CommonEvents => ctx.visit(&data.common_events, scan_common_event),
        DataKind::Troops => ctx.visit(&data.troops, scan_troop),
        // An absent System record is an absent source, not a skipped slot
        DataKind::System => {
            if let Some(system) = &data.system {
                ctx.result.records_visited += 1;
                scan_system(ctx, system);
            }
        }
        DataKind::Maps => ctx.visit(&data.maps, scan_map),
    }
}

fn scan_actor(ctx: &mut ScanContext<'_>, actor: &Actor) {
    ctx.add(AssetType::Character, &actor.character_name);
    ctx.add(AssetType::Face, &actor.face_name);
}

fn scan_enemy(ctx: &mut ScanContext<'_>, enemy: &Enemy) {
    ctx.add(AssetType::Battler, &enemy.battler_name);
}

fn scan_animation(ctx: &mut ScanContext<'_>, animation: &Animation) {
    ctx.add(AssetType::Animation, &animation.animation1_name);
    ctx.add(AssetType::Animation, &animation.animation2_name);
    for timing in &animation.timings {
        ctx.add(AssetType::Se, &timing.se.name);
    }
}

fn scan_tileset(ctx: &mut ScanContext<'_>, tileset: &Tileset) {
    for name in &tileset.tileset_names {
        ctx.add(AssetType::Tileset, name);
    }
}

fn scan_common_event(ctx: &mut ScanContext<'_>, event: &CommonEvent) {
    ctx.scan_commands(&event.list);
}

fn scan_troop(ctx: &mut ScanContext<'_>, troop: &Troop) {
    for page in &troop.pages {
        ctx.scan_commands(&page.list);
    }
}

fn scan_system(ctx: &mut ScanContext<'_>, system: &System) {
    ctx.add(AssetType::Battler, &system.battler_name);
    ctx.add(AssetType::Title1, &system.title1_name);
    ctx.add(AssetType::Title2, &system.title2_name);
    ctx.add(AssetType::Bgm, &system.title_bgm.name);
    ctx.add(AssetType::Bgm, &system.battle_bgm.name);
    ctx.add(AssetType::Me, &system.battle_end_me.name);
    ctx.add(AssetType::Me, &system.gameover_me.name);
    for se in &system.sounds {
        ctx.add(AssetType::Se, &se.name);
    }
    for vehicle in system.vehicles() {
        ctx.add(AssetType::Character, &vehicle.character_name);
        ctx.add(AssetType::Bgm, &vehicle.bgm.name);
    }
}

fn scan_map(ctx: &mut ScanContext<'_>, map: &Map) {
    ctx.add(AssetType::Battleback1, &map.battleback1_name);
    ctx.add(AssetType::Battleback2, &map.battleback2_name);
    ctx.add(AssetType::Bgm, &map.bgm.name);
    ctx.add(AssetType::Bgs, &map.bgs.name);
    ctx.add(AssetType::Parallax, &map.parallax_name);

    for event in map.events.values().flatten() {
        for page in &event.pages {
            ctx.add(AssetType::Character, &page.graphic.character_name);
            for (asset_type, name) in page.move_route.references() {
                ctx.add(asset_type, &name);
            }
            ctx.scan_commands(&page.list);
        }
    }
}
