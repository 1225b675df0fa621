use savepoint::save::{CancelToken, SaveOrchestrator, SettleWait, StringPair, WaitStatus};
use savepoint::scene::{Character, FacingDirection, Flowchart, Stage, VariableValue};
use savepoint::snapshot::{capture_portraits, snapshot_lists_match};
use savepoint::{SaveConfig, SaveError, SaveManager, Scene, SerializerRegistry};

// Simulated host frame time
const FRAME_DT: f32 = 1.0 / 60.0;

/// Two characters on one stage, one dimmed mid-fade
fn build_demo_scene() -> Result<Scene, SaveError> {
    let mut scene = Scene::new("BakerStreet");
    scene.add_stage(Stage::new("MainStage", ["Left", "Right"]).with_fade_duration(0.5));

    let mut dialogue = Flowchart::new("Dialogue");
    dialogue.set("metWatson", VariableValue::Boolean(true));
    dialogue.set("clues", VariableValue::Integer(2));
    scene.add_flowchart(dialogue);

    scene.add_character(Character::new("Sherlock Holmes"));
    scene.add_character(Character::new("John Watson"));
    scene.show("Sherlock Holmes", "MainStage", "Right", FacingDirection::Left)?;
    scene.show("John Watson", "MainStage", "Left", FacingDirection::Right)?;
    scene.set_dimmed("John Watson", true)?;

    Ok(scene)
}

/// Steps the scene until fades settle (or the wait gives up)
fn wait_for_settle(scene: &mut Scene, timeout_secs: f32) -> WaitStatus {
    let mut wait = SettleWait::new(timeout_secs, CancelToken::new());
    loop {
        match wait.poll(scene, FRAME_DT) {
            WaitStatus::Pending => scene.advance(FRAME_DT),
            status => return status,
        }
    }
}

fn run() -> Result<(), SaveError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SaveConfig::load_from_file(&path)?,
        None => SaveConfig::default(),
    };

    let registry = SerializerRegistry::with_builtins()?;
    let orchestrator = SaveOrchestrator::new(&registry);
    let save_manager = SaveManager::from_config(&config)?;

    let mut scene = build_demo_scene()?;
    let status = wait_for_settle(&mut scene, config.settle_timeout_secs);
    log::info!("Scene settle wait finished: {:?}", status);

    let before = capture_portraits(&scene);
    let entities = scene.entities();
    let save_data = orchestrator.capture_all(
        "demo",
        &scene,
        entities,
        vec![StringPair::new("saveDescription", "Baker Street, evening")],
    )?;
    save_manager.save_to_slot(1, &save_data)?;

    let loaded = save_manager.load_from_slot(1)?;
    let mut fresh = build_demo_scene()?;
    fresh.hide("Sherlock Holmes")?;
    fresh.set_dimmed("John Watson", false)?;

    let failures = orchestrator.restore_all(&loaded, &mut fresh);
    for failure in &failures {
        log::warn!("{}", failure);
    }

    let restored = capture_portraits(&fresh);
    log::info!(
        "Restored {} of {} items; portraits match: {}",
        loaded.items().len() - failures.len(),
        loaded.items().len(),
        snapshot_lists_match(&before, &restored)
    );
    log::info!("Saves in {}:", save_manager.save_directory().display());
    for info in save_manager.list_saves()? {
        log::info!("  - {} ({})", info.filename, info.save_name);
    }

    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("savepoint demo starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
