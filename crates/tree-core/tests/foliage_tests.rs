// Shader-driven point fields and their progress scalar.

use glam::{Vec2, Vec3};
use tree_core::constants::*;
use tree_core::foliage::*;
use tree_core::Mode;

#[test]
fn progress_moves_monotonically_and_stays_in_unit_range() {
    let mut p = 0.0;
    for _ in 0..500 {
        let next = advance_progress(p, 1.0, 1.0 / 60.0);
        assert!(next >= p);
        assert!((0.0..=1.0).contains(&next));
        p = next;
    }
    assert!(p > 0.99);
    for _ in 0..500 {
        let next = advance_progress(p, 0.0, 1.0 / 60.0);
        assert!(next <= p);
        assert!((0.0..=1.0).contains(&next));
        p = next;
    }
    assert!(p < 0.01);
}

#[test]
fn long_frame_gap_is_clamped() {
    let p = advance_progress(0.0, 1.0, 10.0);
    assert!((p - PROGRESS_MAX_DT * PROGRESS_RATE).abs() < 1e-6);
}

#[test]
fn bad_dt_leaves_progress_unchanged() {
    assert_eq!(advance_progress(0.3, 1.0, f32::NAN), 0.3);
    assert_eq!(advance_progress(0.3, 1.0, -1.0), 0.3);
}

#[test]
fn foliage_targets_respect_shapes() {
    let points = generate_foliage(2_000);
    assert_eq!(points.len(), 2_000);
    let half = FOLIAGE_HEIGHT / 2.0;
    for p in &points {
        let chaos = Vec3::from(p.chaos).length();
        assert!(chaos >= FOLIAGE_CHAOS_BASE - 1e-3, "{chaos}");
        assert!(chaos <= FOLIAGE_CHAOS_BASE + FOLIAGE_CHAOS_SPREAD + 1e-3, "{chaos}");
        let formed = Vec3::from(p.formed);
        assert!(formed.y >= -half - 1.0 && formed.y <= half + 1.0);
        assert!((0.0..1.0).contains(&p.random));
    }
}

#[test]
fn generation_is_deterministic() {
    assert_eq!(generate_foliage(300), generate_foliage(300));
    assert_eq!(generate_aura(300), generate_aura(300));
}

#[test]
fn blend_at_zero_progress_is_the_formed_target() {
    for p in generate_foliage(200) {
        assert_eq!(blend_point(&p, 0.0, 12.5), Vec3::from(p.formed));
    }
}

#[test]
fn blend_at_full_progress_is_near_chaos() {
    for p in generate_foliage(200) {
        let d = blend_point(&p, 1.0, 3.0).distance(Vec3::from(p.chaos));
        assert!(d <= FOLIAGE_CHAOS_WOBBLE * 3f32.sqrt() + 1e-3);
    }
}

#[test]
fn field_tick_scales_pointer_and_tracks_mode() {
    let mut field = FoliageField::new(100);
    assert_eq!(field.len(), 100);
    let u = field.tick(0.05, 1.0, Mode::Chaos, Vec2::new(0.5, -1.0));
    assert_eq!(u.pointer_world, [3.0, -7.0]);
    assert_eq!(u.time, 1.0);
    assert_eq!(u.pointer_radius, FOLIAGE_POINTER_RADIUS);
    assert!(u.progress > 0.0);
    assert_eq!(field.progress(), u.progress);
}

#[test]
fn empty_field_still_ticks() {
    let mut field = FoliageField::new(0);
    assert!(field.is_empty());
    let u = field.tick(0.05, 0.0, Mode::Chaos, Vec2::ZERO);
    assert!(u.progress > 0.0);
}

#[test]
fn aura_stays_inside_its_box() {
    let half = AURA_EXTENT / 2.0;
    for p in generate_aura(1_000) {
        let [x, y, z] = p.position;
        assert!(x.abs() <= half.x);
        assert!(y.abs() <= half.y);
        assert!((z - AURA_Z_OFFSET).abs() <= half.z);
        assert!(p.size >= AURA_SIZE_MIN && p.size < AURA_SIZE_MIN + AURA_SIZE_SPAN);
    }
    let mut aura = AuraField::new(10);
    let u = aura.tick(2.0, Vec2::new(1.0, 0.0));
    assert_eq!(u.pointer_world, [AURA_POINTER_SCALE, 0.0]);
    assert_eq!(aura.points().len(), 10);
}

#[test]
fn field_uniforms_match_shader_layout() {
    assert_eq!(std::mem::size_of::<FieldUniforms>(), 32);
}
