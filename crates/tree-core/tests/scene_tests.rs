// Frame driver: one tick advances every batch and publishes progress.

use glam::Vec2;
use tree_core::constants::FEATURED_CARD_POSITION;
use tree_core::{
    Camera, CameraFollower, ConfigError, Mode, OrnamentKind, SceneConfig, SceneStore, TreeScene,
};

fn small_scene() -> TreeScene {
    scene_with(SceneStore::new())
}

fn scene_with(store: SceneStore) -> TreeScene {
    TreeScene::new(SceneConfig::default().scaled(0.02), store).unwrap()
}

#[test]
fn frame_view_covers_every_batch() {
    let mut scene = small_scene();
    let view = scene.tick(1.0 / 60.0);
    assert_eq!(view.mode, Mode::Formed);
    assert_eq!(view.ornaments.len(), 8);
    assert_eq!(view.card_frames.len(), 7);
    assert_eq!(view.card_panels.len(), 7);
    assert_eq!(view.ornaments[0].kind, OrnamentKind::Gift);
    assert!(view.ornaments.iter().all(|o| !o.instances.is_empty()));
}

#[test]
fn progress_is_written_back_to_the_store() {
    let store = SceneStore::new();
    let mut scene = scene_with(store.clone());
    store.set_mode(Mode::Chaos);
    for _ in 0..30 {
        scene.tick(1.0 / 60.0);
    }
    let p = store.progress();
    assert!(p > 0.0 && p < 1.0);
    assert_eq!(p, scene.foliage().progress());
    assert_eq!(scene.store().progress(), p);
}

#[test]
fn upload_adds_a_featured_card_next_frame() {
    let store = SceneStore::new();
    let mut scene = scene_with(store.clone());
    store.add_photo("blob:upload");
    let view = scene.tick(1.0 / 60.0);
    assert_eq!(view.card_frames.len(), 8);
    let featured = &scene.cards().cards()[7];
    assert!(featured.featured);
    assert_eq!(featured.entity.current, FEATURED_CARD_POSITION);
}

#[test]
fn invalid_config_is_rejected_before_generation() {
    let mut config = SceneConfig::default().scaled(0.02);
    config.ornaments[0].count = 0;
    assert!(matches!(
        TreeScene::new(config, SceneStore::new()),
        Err(ConfigError::EmptyBatch { .. })
    ));
}

#[test]
fn reconfigure_rebuilds_only_changed_batches() {
    let base = SceneConfig::default().scaled(0.02);
    let mut scene = TreeScene::new(base.clone(), SceneStore::new()).unwrap();
    assert_eq!(scene.reconfigure(base.clone()).unwrap(), 0);

    let mut recolored = base.clone();
    recolored.ornaments[1].color = [0.2, 0.4, 0.6];
    assert_eq!(scene.reconfigure(recolored).unwrap(), 0);

    let mut grown = base.clone();
    grown.ornaments[2].count += 3;
    grown.ornaments.push(grown.ornaments[0].clone());
    assert_eq!(scene.reconfigure(grown).unwrap(), 2);
    assert_eq!(scene.ornaments().len(), 9);

    let mut bad = base;
    bad.ornaments[0].scale = -1.0;
    assert!(scene.reconfigure(bad).is_err());
    assert_eq!(scene.ornaments().len(), 9);
}

#[test]
fn group_follows_camera_target() {
    let store = SceneStore::new();
    let mut scene = scene_with(store.clone());
    store.set_camera_target(2.0, 1.0);
    for _ in 0..600 {
        scene.tick(1.0 / 60.0);
    }
    let f = scene.follower();
    assert!((f.pitch - 0.5).abs() < 1e-3);
    assert!((f.yaw - 1.0).abs() < 1e-3);
}

#[test]
fn bad_dt_does_not_advance_time() {
    let mut scene = small_scene();
    scene.tick(0.5);
    scene.tick(f32::NAN);
    scene.tick(-3.0);
    assert_eq!(scene.elapsed(), 0.5);
}

#[test]
fn follower_ignores_non_finite_targets() {
    let mut f = CameraFollower::default();
    f.tick(0.1, Vec2::new(1.0, 1.0));
    let before = f;
    f.tick(0.1, Vec2::new(f32::NAN, 0.0));
    assert_eq!(f, before);
}

#[test]
fn camera_viewport_sets_aspect() {
    let mut camera = Camera::default();
    camera.set_viewport(1600, 800);
    assert_eq!(camera.aspect, 2.0);
    camera.set_viewport(0, 0);
    assert!(camera.aspect.is_finite());
    assert!(camera.view_proj().is_finite());
}
