// Placement of formed (cone) and chaos (sphere) targets.

use glam::Vec3;
use tree_core::math::*;

fn flat(jitter: f32) -> ConeOptions {
    ConeOptions {
        layers: 1,
        layer_gap: 0.08,
        jitter,
    }
}

#[test]
fn base_of_seven_point_cone_sits_at_angle_zero() {
    let p = formed_position(0, 7, 1.0, 2.0, &flat(0.0));
    assert_eq!(p, Vec3::new(1.0, -1.0, 0.0));
}

#[test]
fn formed_position_is_bit_identical_across_calls() {
    let opts = ConeOptions::layered(14, 0.12, 0.28);
    for total in [1usize, 7, 100, 15_000] {
        for index in (0..total).step_by((total / 200).max(1)) {
            let a = formed_position(index, total, 6.5, 14.5, &opts);
            let b = formed_position(index, total, 6.5, 14.5, &opts);
            assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
        }
    }
}

#[test]
fn single_entity_population_is_finite() {
    let p = formed_position(0, 1, 6.5, 14.5, &ConeOptions::default());
    assert!(p.is_finite());
    assert!((p.y + 7.25).abs() < 1e-5);
}

#[test]
fn spiral_angle_does_not_depend_on_total() {
    for index in 0..50 {
        assert_eq!(spiral_angle(index), GOLDEN_ANGLE * index as f32);
        let a = formed_position(index, 100, 5.0, 10.0, &flat(0.0));
        let b = formed_position(index, 1000, 5.0, 10.0, &flat(0.0));
        let dir_a = glam::Vec2::new(a.x, a.z).normalize();
        let dir_b = glam::Vec2::new(b.x, b.z).normalize();
        assert!(
            (dir_a - dir_b).length() < 1e-4,
            "index {index}: {dir_a:?} vs {dir_b:?}"
        );
    }
}

#[test]
fn cone_narrows_toward_the_top() {
    let opts = flat(0.0);
    let total = 500;
    let mut last_radius = f32::INFINITY;
    for index in 0..total {
        let p = formed_position(index, total, 6.0, 12.0, &opts);
        let r = glam::Vec2::new(p.x, p.z).length();
        assert!(r <= last_radius + 1e-4);
        assert!((-6.0..=6.0).contains(&p.y));
        last_radius = r;
    }
}

#[test]
fn chaos_position_lies_on_the_sphere() {
    for radius in [0.5f32, 1.0, 24.0, 50.0] {
        for s in 0..500 {
            let p = chaos_position(radius, Some(s as f64 * 2.11));
            assert!(
                (p.length() - radius).abs() <= 1e-4 * radius.max(1.0),
                "radius {radius}, seed {s}: {}",
                p.length()
            );
        }
    }
}

#[test]
fn seeded_chaos_is_reproducible_and_unseeded_stays_on_shell() {
    for s in 0..100 {
        let seed = s as f64 * 2.33;
        assert_eq!(chaos_position(20.0, Some(seed)), chaos_position(20.0, Some(seed)));
        let free = chaos_position(20.0, None);
        assert!((free.length() - 20.0).abs() < 1e-3);
    }
}

#[test]
fn distinct_seeds_give_distinct_chaos_points() {
    assert_eq!(chaos_position(10.0, Some(0.0)), chaos_position(10.0, Some(0.0)));
    assert_ne!(chaos_position(10.0, Some(0.0)), chaos_position(10.0, Some(2.0)));
}

#[test]
fn layered_heights_stay_in_unit_range() {
    for layers in [1u32, 2, 5, 14] {
        for gap in [0.0f32, 0.12, 0.5] {
            for step in 0..=1000 {
                let u = step as f32 / 1000.0;
                let y = layered_height(u, layers, gap);
                assert!((0.0..=1.0).contains(&y), "L={layers} gap={gap} u={u}: {y}");
            }
        }
    }
}

#[test]
fn bands_are_monotonic_for_shared_fractional_rank() {
    for layers in [2u32, 5, 14] {
        for gap in [0.0f32, 0.12, 0.5] {
            for f in [0.1f32, 0.5, 0.9] {
                for k in 0..layers - 1 {
                    let lower = layered_height((k as f32 + f) / layers as f32, layers, gap);
                    let upper = layered_height((k as f32 + 1.0 + f) / layers as f32, layers, gap);
                    assert!(lower < upper, "L={layers} gap={gap} f={f} k={k}");
                }
            }
        }
    }
}

#[test]
fn pseudo_random_is_in_half_open_unit_interval() {
    for i in 0..20_000 {
        let seed = i as f64;
        for v in [
            pseudo_random(seed),
            pseudo_random(seed * 1.73 + 5.0),
            pseudo_random(seed * 3.17 + 1.0),
        ] {
            assert!((0.0..1.0).contains(&v), "seed {seed}: {v}");
        }
    }
}

#[test]
fn smoothstep_matches_endpoints() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
}
