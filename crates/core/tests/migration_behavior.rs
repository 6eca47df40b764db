use rtpsync_core::asset::{AssetCatalog, AssetReference, AssetType, MigrationOutcome};
use rtpsync_core::config::MigrationConfig;
use rtpsync_core::locator::{ExplicitLocator, RuntimeLocator};
use rtpsync_core::migration::{MigrationDriver, MigrationReport, MigrationState};
use rtpsync_core::project::{JsonDataSource, ProjectData, ProjectDataSource};
use rtpsync_core::MigrationError;
use std::fs;
use std::path::{Path, PathBuf};

struct Workspace {
    _temp: tempfile::TempDir,
    project: PathBuf,
    rtp: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let project = temp.path().join("Game");
        let rtp = temp.path().join("RPGVXAce");
        fs::create_dir_all(project.join("Data")).unwrap();
        fs::create_dir_all(&rtp).unwrap();
        Self {
            _temp: temp,
            project,
            rtp,
        }
    }

    fn data(&self, name: &str, json: &str) {
        fs::write(self.project.join("Data").join(name), json).unwrap();
    }

    fn rtp_file(&self, rel: &str, content: &[u8]) {
        put(&self.rtp, rel, content);
    }

    fn project_file(&self, rel: &str, content: &[u8]) {
        put(&self.project, rel, content);
    }

    fn driver(&self, config: MigrationConfig) -> MigrationDriver {
        self.driver_with(config, Box::new(ExplicitLocator::new(&self.rtp)))
    }

    fn driver_with(
        &self,
        config: MigrationConfig,
        locator: Box<dyn RuntimeLocator>,
    ) -> MigrationDriver {
        let source = JsonDataSource::new(self.project.join(&config.data_dir));
        MigrationDriver::new(
            &self.project,
            AssetCatalog::from_config(&config).unwrap(),
            config,
            locator,
            Box::new(source),
        )
    }

    fn run(&self) -> MigrationReport {
        self.driver(quiet_config()).run().unwrap()
    }
}

fn put(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// No implicit system graphics, so reports only contain what the data references
fn quiet_config() -> MigrationConfig {
    MigrationConfig {
        standard_system_files: Vec::new(),
        ..MigrationConfig::default()
    }
}

fn outcome_for<'a>(
    report: &'a MigrationReport,
    asset_type: AssetType,
    name: &str,
) -> Vec<&'a MigrationOutcome> {
    let wanted = AssetReference::new(asset_type, name);
    report
        .entries
        .iter()
        .filter(|e| e.reference == wanted)
        .map(|e| &e.outcome)
        .collect()
}

#[test]
fn copies_referenced_character_byte_for_byte() {
    let ws = Workspace::new();
    ws.data("Actors.json", r#"[null, {"id": 1, "character_name": "Hero"}]"#);
    ws.rtp_file("Graphics/Characters/Hero.png", &[0x89, b'P', b'N', b'G', 0, 1, 2, 3]);

    let report = ws.run();

    let dest = ws.project.join("Graphics/Characters/Hero.png");
    assert_eq!(
        fs::read(&dest).unwrap(),
        fs::read(ws.rtp.join("Graphics/Characters/Hero.png")).unwrap()
    );
    assert_eq!(
        outcome_for(&report, AssetType::Character, "Hero"),
        vec![&MigrationOutcome::Copied {
            source: ws.rtp.join("Graphics/Characters/Hero.png"),
            destination: dest,
            extension: ".png".to_string(),
        }]
    );
}

#[test]
fn second_run_copies_nothing() {
    let ws = Workspace::new();
    ws.data(
        "System.json",
        r#"{"title1_name": "Castle", "title_bgm": {"name": "Theme1"}}"#,
    );
    ws.rtp_file("Graphics/Titles1/Castle.jpg", b"castle");
    ws.rtp_file("Audio/BGM/Theme1.ogg", b"theme");

    let first = ws.run().summary();
    assert_eq!(first.copied, 2);

    let second = ws.run().summary();
    assert_eq!(second.copied, 0);
    assert_eq!(second.already_present, 2);
}

#[test]
fn existing_project_file_blocks_library_lookup() {
    let ws = Workspace::new();
    ws.data("Enemies.json", r#"[null, {"battler_name": "Slime"}]"#);
    ws.project_file("Graphics/Battlers/Slime.jpeg", b"custom slime");
    ws.rtp_file("Graphics/Battlers/Slime.png", b"rtp slime");

    let report = ws.run();

    assert!(matches!(
        outcome_for(&report, AssetType::Battler, "Slime")[0],
        MigrationOutcome::AlreadyPresent { .. }
    ));
    assert!(!ws.project.join("Graphics/Battlers/Slime.png").exists());
    assert_eq!(
        fs::read(ws.project.join("Graphics/Battlers/Slime.jpeg")).unwrap(),
        b"custom slime"
    );
}

#[test]
fn library_extension_precedence_is_png_first() {
    let ws = Workspace::new();
    ws.data("Actors.json", r#"[{"face_name": "Foo"}]"#);
    ws.rtp_file("Graphics/Faces/Foo.jpg", b"jpg");
    ws.rtp_file("Graphics/Faces/Foo.png", b"png");

    let report = ws.run();

    assert!(matches!(
        outcome_for(&report, AssetType::Face, "Foo")[0],
        MigrationOutcome::Copied { extension, .. } if extension == ".png"
    ));
    assert!(!ws.project.join("Graphics/Faces/Foo.jpg").exists());
}

#[test]
fn shared_reference_resolved_once() {
    let ws = Workspace::new();
    ws.data(
        "Actors.json",
        r#"[null, {"character_name": "Hero"}, {"character_name": "Hero"}]"#,
    );
    ws.data(
        "CommonEvents.json",
        r#"[null, {"list": [{"code": 322, "parameters": [1, "Hero", 0, "", 0]}]}]"#,
    );
    ws.rtp_file("Graphics/Characters/Hero.png", b"hero");

    let report = ws.run();

    assert_eq!(outcome_for(&report, AssetType::Character, "Hero").len(), 1);
    assert_eq!(report.summary().copied, 1);
    assert_eq!(report.summary().total, 1);
}

#[test]
fn malformed_and_null_records_do_not_block_others() {
    let ws = Workspace::new();
    ws.data(
        "Actors.json",
        r#"[null, {"character_name": "A"}, {"character_name": ["not", "a", "string"]}, {"character_name": "B"}]"#,
    );
    ws.data("Troops.json", "this is not json");
    ws.rtp_file("Graphics/Characters/A.png", b"a");
    ws.rtp_file("Graphics/Characters/B.png", b"b");

    let report = ws.run();

    let names: Vec<_> = report
        .entries
        .iter()
        .map(|e| e.reference.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(report.scan.records_skipped, 2);
    assert_eq!(report.summary().copied, 2);
}

#[test]
fn nested_null_values_do_not_drop_their_record() {
    let ws = Workspace::new();
    ws.data(
        "Map001.json",
        r#"{"parallax_name": "Sky", "bgm": {"name": "Town1", "pitch": null}, "events": null}"#,
    );
    ws.data(
        "Map002.json",
        r#"{"events": {"1": {"pages": [{"graphic": {"character_name": "People1"}, "list": null}]}}}"#,
    );
    ws.data(
        "Tilesets.json",
        r#"[null, {"tileset_names": ["World_A1", null]}]"#,
    );
    ws.rtp_file("Graphics/Parallaxes/Sky.png", b"sky");
    ws.rtp_file("Audio/BGM/Town1.ogg", b"town");
    ws.rtp_file("Graphics/Characters/People1.png", b"people");
    ws.rtp_file("Graphics/Tilesets/World_A1.png", b"a1");

    let report = ws.run();

    assert_eq!(report.summary().total, 4);
    assert_eq!(report.summary().copied, 4);
    assert_eq!(report.scan.records_skipped, 1);
}

#[test]
fn empty_names_never_become_references() {
    let ws = Workspace::new();
    ws.data(
        "Actors.json",
        r#"[{"character_name": "", "face_name": ""}]"#,
    );
    ws.data("Map001.json", r#"{"bgm": {"name": ""}, "parallax_name": ""}"#);

    let report = ws.run();
    assert!(report.entries.is_empty());
}

#[test]
fn names_with_directory_parts_stay_inside_asset_folders() {
    let ws = Workspace::new();
    ws.data(
        "Actors.json",
        r#"[{"character_name": "../../Escape", "face_name": "Actor1"}]"#,
    );
    ws.rtp_file("Escape.png", b"outside the folder");
    ws.rtp_file("Graphics/Faces/Actor1.png", b"face");

    let report = ws.run();

    assert_eq!(report.summary().total, 1);
    assert_eq!(report.summary().copied, 1);
    assert!(!ws.project.join("Escape.png").exists());
}

#[test]
fn missing_assets_are_reported_not_fatal() {
    let ws = Workspace::new();
    ws.data(
        "Map001.json",
        r#"{
            "bgm": {"name": "Town1"},
            "bgs": {"name": "Nowhere"},
            "events": {"1": {"pages": [{"graphic": {"character_name": "People1"}, "list": [
                {"code": 241, "parameters": [{"name": "Dungeon1"}]},
                {"code": 231, "parameters": [1, "Ghost"]}
            ]}]}}
        }"#,
    );
    ws.rtp_file("Audio/BGM/Town1.ogg", b"town");
    ws.rtp_file("Audio/BGM/Dungeon1.mid", b"dungeon");
    ws.rtp_file("Graphics/Characters/People1.png", b"people");

    let report = ws.run();
    let summary = report.summary();

    assert_eq!(summary.total, 5);
    assert_eq!(summary.copied, 3);
    assert_eq!(summary.missing, 2);
    assert_eq!(
        outcome_for(&report, AssetType::Picture, "Ghost"),
        vec![&MigrationOutcome::Missing]
    );
    assert!(ws.project.join("Audio/BGM/Dungeon1.mid").is_file());
}

#[test]
fn copy_failure_is_isolated() {
    let ws = Workspace::new();
    ws.data(
        "Actors.json",
        r#"[{"character_name": "Hero", "face_name": "Hero"}]"#,
    );
    ws.rtp_file("Graphics/Characters/Hero.png", b"hero");
    ws.rtp_file("Graphics/Faces/Hero.png", b"face");
    // Blocks creation of Graphics/Characters
    ws.project_file("Graphics/Characters", b"file in the way");

    let report = ws.run();
    let summary = report.summary();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.copied, 1);
    assert!(ws.project.join("Graphics/Faces/Hero.png").is_file());
}

#[test]
fn missing_runtime_root_aborts_before_scanning() {
    let ws = Workspace::new();
    ws.data("Actors.json", r#"[{"character_name": "Hero"}]"#);
    let gone = ws.rtp.join("does-not-exist");

    let mut driver = ws.driver_with(quiet_config(), Box::new(ExplicitLocator::new(&gone)));
    let err = driver.run().unwrap_err();

    assert!(matches!(err, MigrationError::RuntimeLibraryNotFound { .. }));
    assert_eq!(driver.state(), MigrationState::Aborted);
    assert!(!ws.project.join("Graphics").exists());
}

#[test]
fn standard_system_files_are_always_requested() {
    let ws = Workspace::new();
    ws.rtp_file("Graphics/System/IconSet.png", b"icons");
    ws.project_file("Graphics/System/Window.png", b"custom window");

    let report = ws.driver(MigrationConfig::default()).run().unwrap();
    let summary = report.summary();

    assert_eq!(summary.total, 6);
    assert_eq!(summary.copied, 1);
    assert_eq!(summary.already_present, 1);
    assert_eq!(summary.missing, 4);
}

#[test]
fn collected_references_independent_of_collection_order() {
    let mut forward = ProjectData::default();
    let mut backward = ProjectData::default();
    for (i, name) in ["Actor1", "Actor2", "Actor3"].iter().enumerate() {
        let actor = rtpsync_core::model::Actor {
            id: i as u32 + 1,
            character_name: name.to_string(),
            face_name: name.to_string(),
            ..Default::default()
        };
        forward.actors.push(Some(actor.clone()));
        backward.actors.insert(0, Some(actor));
    }

    let collect = |data: &ProjectData| {
        let mut collector = rtpsync_core::asset::ReferenceCollector::new();
        rtpsync_core::scanner::DataScanner::new().scan(&data.load().unwrap(), &mut collector);
        collector.all_references()
    };

    assert_eq!(collect(&forward), collect(&backward));
}

#[test]
fn config_folder_override_changes_destination() {
    let ws = Workspace::new();
    ws.data("System.json", r#"{"gameover_me": {"name": "Gameover1"}}"#);
    ws.rtp_file("Sound/Jingles/Gameover1.wav", b"jingle");

    let mut config = quiet_config();
    config
        .folders
        .insert(AssetType::Me, PathBuf::from("Sound/Jingles"));
    let report = ws.driver(config).run().unwrap();

    assert_eq!(report.summary().copied, 1);
    assert!(ws.project.join("Sound/Jingles/Gameover1.wav").is_file());
}

#[test]
fn dry_run_leaves_project_untouched() {
    let ws = Workspace::new();
    ws.data("Tilesets.json", r#"[null, {"tileset_names": ["World_A1", "World_B"]}]"#);
    ws.rtp_file("Graphics/Tilesets/World_A1.png", b"a1");

    let config = MigrationConfig {
        dry_run: true,
        ..quiet_config()
    };
    let report = ws.driver(config).run().unwrap();
    let summary = report.summary();

    assert_eq!(summary.planned, 1);
    assert_eq!(summary.missing, 1);
    assert!(!ws.project.join("Graphics").exists());
}
