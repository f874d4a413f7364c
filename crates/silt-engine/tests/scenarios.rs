//! End-to-end scenarios across all three schemes.

use proptest::prelude::*;
use silt_core::{DepositMode, FieldError, Scheme, SourceSpec};
use silt_engine::{ConfigError, SimConfig, SimError, Simulation};
use silt_field::{FieldRead, InitialCondition};
use silt_test_utils::{max_abs_diff, peak};

fn square(scheme: Scheme, cells: usize) -> SimConfig {
    SimConfig {
        width: cells as f64,
        height: cells as f64,
        dx: 1.0,
        dy: 1.0,
        initial: InitialCondition::Zero,
        ..SimConfig::reference(scheme)
    }
}

fn in_disc(r: usize, c: usize, center: (usize, usize), radius: usize) -> bool {
    let dr = r as i64 - center.0 as i64;
    let dc = c as i64 - center.1 as i64;
    dr * dr + dc * dc <= (radius * radius) as i64
}

// ── reset ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reset_zeroes_every_cell(
        rows in 3usize..24,
        cols in 3usize..24,
        scheme_idx in 0usize..3,
        row_frac in 0.0f64..1.0,
        col_frac in 0.0f64..1.0,
        radius in 1u32..=10,
        intensity in 1.0f64..=10.0,
        ticks in 0usize..4,
    ) {
        let scheme = Scheme::ALL[scheme_idx];
        let cfg = SimConfig {
            width: rows as f64,
            height: cols as f64,
            dx: 1.0,
            dy: 1.0,
            dt: 0.01,
            ..SimConfig::reference(scheme)
        };
        let mut sim = Simulation::new(cfg).unwrap();
        let center = (
            ((rows as f64 * row_frac) as usize).min(rows - 1),
            ((cols as f64 * col_frac) as usize).min(cols - 1),
        );
        sim.inject(center, radius, intensity).unwrap();
        for _ in 0..ticks {
            sim.tick().unwrap();
        }
        sim.reset().unwrap();
        for r in 0..rows {
            for c in 0..cols {
                prop_assert_eq!(sim.sample(r, c).unwrap(), 0.0);
            }
        }
    }
}

// ── finite difference ───────────────────────────────────────────

#[test]
fn finite_difference_zero_field_stays_zero() {
    let mut sim = Simulation::new(SimConfig::reference(Scheme::FiniteDifference)).unwrap();
    for _ in 0..5 {
        let step = sim.tick().unwrap();
        assert!(step.view.as_slice().iter().all(|&v| v == 0.0));
    }
}

#[test]
fn finite_difference_conserves_interior_mass() {
    let mut sim = Simulation::new(SimConfig::reference(Scheme::FiniteDifference)).unwrap();
    sim.inject((100, 100), 5, 10.0).unwrap();
    let mut before = sim.view().interior_total();
    for _ in 0..10 {
        let after = sim.tick().unwrap().view.interior_total();
        assert!(
            (after - before).abs() < 1e-9 * before,
            "interior mass drifted: {before} -> {after}"
        );
        before = after;
    }
}

#[test]
fn finite_difference_reference_scenario() {
    let mut sim = Simulation::new(SimConfig::reference(Scheme::FiniteDifference)).unwrap();
    let touched = sim.inject((100, 100), 5, 10.0).unwrap();
    assert_eq!(touched, 81);
    assert_eq!(sim.view().peak(), 10.0);

    let mut peaks = Vec::with_capacity(100);
    for _ in 0..100 {
        let step = sim.tick().unwrap();
        assert!(step.metrics.is_finite(), "non-finite at {}", step.metrics.tick);
        peaks.push(step.metrics.peak);
    }
    // Max principle: 1 - 4*D*dt/dx^2 = 0.2 >= 0, so no cell can exceed
    // the previous maximum.
    for pair in peaks.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12, "peak rose: {} -> {}", pair[0], pair[1]);
    }
    let last = peaks[99];
    assert!(last < peaks[0], "peak never fell: {} -> {last}", peaks[0]);
    assert!(last < 10.0);
    assert!(last > 0.0);
}

// ── flux Euler ──────────────────────────────────────────────────

#[test]
fn flux_euler_edges_mirror_interior_every_tick() {
    let mut sim = Simulation::new(SimConfig::reference(Scheme::FluxEuler)).unwrap();
    let shape = sim.shape();
    let (rows, cols) = (shape.rows(), shape.cols());
    sim.inject((2, 3), 6, 10.0).unwrap();
    sim.inject((rows - 2, cols - 4), 4, 5.0).unwrap();

    for _ in 0..25 {
        let step = sim.tick().unwrap();
        let v = step.view;
        assert_eq!(v.row(0), v.row(1));
        assert_eq!(v.row(rows - 1), v.row(rows - 2));
        for r in 0..rows {
            assert_eq!(v.value_at(r, 0), v.value_at(r, 1));
            assert_eq!(v.value_at(r, cols - 1), v.value_at(r, cols - 2));
        }
    }
}

#[test]
fn flux_euler_reference_run_stays_bounded() {
    let mut sim = Simulation::new(SimConfig::reference(Scheme::FluxEuler)).unwrap();
    sim.inject((100, 100), 5, 10.0).unwrap();
    for _ in 0..300 {
        let step = sim.tick().unwrap();
        assert!(step.metrics.is_finite());
        assert!(step.metrics.peak.abs() < 100.0, "peak {}", step.metrics.peak);
    }
}

#[test]
fn flux_euler_disc_seed_is_available() {
    let cfg = SimConfig {
        initial: InitialCondition::Disc {
            radius: 5,
            value: 1.0,
        },
        ..SimConfig::reference(Scheme::FluxEuler)
    };
    let sim = Simulation::new(cfg).unwrap();
    assert_eq!(sim.sample(100, 100).unwrap(), 1.0);
    assert_eq!(sim.view().total(), 81.0);
}

// ── spectral ────────────────────────────────────────────────────

#[test]
fn spectral_conserves_mass_across_ticks_and_injections() {
    let mut sim = Simulation::new(SimConfig::reference(Scheme::Spectral)).unwrap();
    let mut mass = sim.view().total();
    let axis: f64 = (-50i32..50).map(|m| (-f64::from(m * m)).exp()).sum();
    assert!((mass - axis * axis).abs() < 1e-9, "gaussian mass {mass}");

    for round in 0..4 {
        if round > 0 {
            sim.inject((20 * round, 30), 3, 2.5).unwrap();
            let after = sim.view().total();
            assert!(after > mass);
            mass = after;
        }
        for _ in 0..25 {
            let total = sim.tick().unwrap().metrics.total_mass;
            assert!(
                (total - mass).abs() < 1e-9 * mass,
                "mass drifted: {mass} -> {total}"
            );
        }
    }
}

#[test]
fn spectral_injection_survives_next_tick() {
    let mut sim = Simulation::new(square(Scheme::Spectral, 64)).unwrap();
    sim.inject((32, 32), 4, 10.0).unwrap();
    let deposited = sim.view().total();
    let step = sim.tick().unwrap();
    assert!((step.metrics.total_mass - deposited).abs() < 1e-9 * deposited);
    assert!(step.metrics.peak > 1.0);
}

#[test]
fn spectral_wraps_across_edges() {
    let mut sim = Simulation::new(square(Scheme::Spectral, 32)).unwrap();
    sim.inject((0, 0), 2, 10.0).unwrap();
    for _ in 0..20 {
        sim.tick().unwrap();
    }
    let near_far_corner = sim.sample(31, 31).unwrap();
    assert!(near_far_corner > 1e-3, "no wraparound: {near_far_corner}");
}

#[test]
fn spectral_state_visible_through_simulation() {
    let mut sim = Simulation::new(square(Scheme::Spectral, 48)).unwrap();
    sim.inject((10, 30), 5, 8.0).unwrap();
    let dc = sim.spectral().unwrap().dc_mode();
    assert!((dc.re - sim.view().total()).abs() < 1e-9 * dc.re);
    for _ in 0..30 {
        sim.tick().unwrap();
        let spectral = sim.spectral().unwrap();
        assert_eq!(spectral.dc_mode(), dc);
        assert!(spectral.imaginary_residue() < 1e-9);
    }
    assert_eq!(sim.spectral().unwrap().field_hat().len(), 48 * 48);

    let fd = Simulation::new(square(Scheme::FiniteDifference, 16)).unwrap();
    assert!(fd.spectral().is_none());
}

// ── injection ───────────────────────────────────────────────────

#[test]
fn absolute_injection_on_100x100() {
    let mut sim = Simulation::new(square(Scheme::FiniteDifference, 100)).unwrap();
    sim.inject((10, 10), 3, 4.0).unwrap();
    let before = sim.snapshot();
    sim.inject((50, 50), 5, 10.0).unwrap();
    let after = sim.view();

    for r in 0..100 {
        for c in 0..100 {
            let v = after.value_at(r, c).unwrap();
            if in_disc(r, c, (50, 50), 5) {
                assert_eq!(v, 10.0, "({r}, {c})");
            } else {
                assert_eq!(v, before.value_at(r, c).unwrap(), "({r}, {c}) touched");
            }
        }
    }
}

#[test]
fn absolute_injection_never_accumulates() {
    let mut sim = Simulation::new(square(Scheme::FluxEuler, 40)).unwrap();
    for _ in 0..3 {
        sim.inject((20, 20), 4, 7.0).unwrap();
    }
    assert_eq!(sim.view().peak(), 7.0);
}

#[test]
fn additive_injection_on_100x100() {
    let mut sim = Simulation::new(SimConfig::reference(Scheme::Spectral)).unwrap();
    assert_eq!(sim.deposit_mode(), DepositMode::Additive);
    let before = sim.snapshot();
    sim.inject((50, 50), 5, 10.0).unwrap();
    let after = sim.view();

    for r in 0..100 {
        for c in 0..100 {
            let prior = before.value_at(r, c).unwrap();
            let v = after.value_at(r, c).unwrap();
            if in_disc(r, c, (50, 50), 5) {
                assert_eq!(v, prior + 10.0, "({r}, {c})");
            } else {
                assert_eq!(v, prior, "({r}, {c}) touched");
            }
        }
    }
}

#[test]
fn additive_injection_accumulates_without_bound() {
    let cfg = SimConfig {
        deposit: Some(DepositMode::Additive),
        ..square(Scheme::FiniteDifference, 30)
    };
    let mut sim = Simulation::new(cfg).unwrap();
    let source = SourceSpec::new((15, 15), 2, 10.0).unwrap();
    for _ in 0..12 {
        sim.inject_source(source).unwrap();
    }
    assert_eq!(sim.sample(15, 15).unwrap(), 120.0);
}

#[test]
fn injection_clips_at_edges() {
    let mut sim = Simulation::new(square(Scheme::FiniteDifference, 20)).unwrap();
    let touched = sim.inject((0, 0), 3, 5.0).unwrap();
    // Quarter disc of radius 3 including both axes.
    assert_eq!(touched, 11);
    assert_eq!(sim.view().total(), 55.0);
}

#[test]
fn injection_far_beyond_grid_touches_nothing() {
    for scheme in Scheme::ALL {
        let mut sim = Simulation::new(square(scheme, 10)).unwrap();
        let before = sim.snapshot();
        let top_bit = 1usize << (usize::BITS - 1);
        for center in [(usize::MAX, 3), (3, usize::MAX), (top_bit, 3), (3, top_bit)] {
            assert_eq!(sim.inject(center, 3, 5.0).unwrap(), 0, "{scheme} {center:?}");
        }
        assert_eq!(sim.view().as_slice(), before.as_slice());
    }
}

// ── errors ──────────────────────────────────────────────────────

#[test]
fn sample_outside_grid_is_out_of_range() {
    let sim = Simulation::new(square(Scheme::Spectral, 16)).unwrap();
    assert!(matches!(
        sim.sample(0, 16),
        Err(SimError::Field(FieldError::OutOfRange { row: 0, col: 16, .. }))
    ));
    assert!(matches!(
        sim.sample(99, 0),
        Err(SimError::Field(FieldError::OutOfRange { .. }))
    ));
}

#[test]
fn unstable_parameters_fail_fast() {
    let cfg = SimConfig {
        dt: 0.01,
        diffusion: 60.0,
        ..SimConfig::reference(Scheme::FluxEuler)
    };
    assert!(matches!(
        Simulation::new(cfg),
        Err(ConfigError::UnstableParameters {
            scheme: Scheme::FluxEuler,
            ..
        })
    ));
}

#[test]
fn oversized_grid_rejected_before_allocation() {
    let cfg = SimConfig {
        width: 1e30,
        height: 1e30,
        ..SimConfig::reference(Scheme::Spectral)
    };
    assert!(matches!(
        Simulation::new(cfg),
        Err(ConfigError::GridTooLarge { .. })
    ));
}

#[test]
fn unchecked_unstable_run_diverges_without_error() {
    let cfg = SimConfig {
        dt: 1.0,
        check_stability: false,
        ..square(Scheme::FiniteDifference, 40)
    };
    let mut sim = Simulation::new(cfg).unwrap();
    sim.inject((20, 20), 3, 10.0).unwrap();
    let mut last = None;
    for _ in 0..400 {
        last = Some(sim.tick().unwrap().metrics);
    }
    let last = last.unwrap();
    assert!(
        last.non_finite > 0 || last.peak > 1e100,
        "expected divergence, peak {}",
        last.peak
    );
}

#[test]
fn snapshot_is_independent_of_later_ticks() {
    let mut sim = Simulation::new(square(Scheme::FiniteDifference, 30)).unwrap();
    sim.inject((15, 15), 3, 10.0).unwrap();
    let snap = sim.snapshot();
    for _ in 0..5 {
        sim.tick().unwrap();
    }
    assert_eq!(snap.tick().0, 0);
    assert_eq!(peak(snap.as_slice()), 10.0);
    assert!(max_abs_diff(snap.as_slice(), sim.view().as_slice()) > 0.0);
}
