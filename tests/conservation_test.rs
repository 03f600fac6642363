use fluidt::{FieldKind, Simulation, SimulationParams};
use glam::DVec2;
use proptest::prelude::*;

fn max_density(sim: &Simulation) -> f64 {
    sim.field(FieldKind::Density).max()
}

#[test]
fn test_mass_never_grows_without_sources() {
    let params = SimulationParams {
        viscosity: 0.5,
        decay: 0.0,
        iterations: 5,
        parallel: true,
    };
    let mut sim = Simulation::new(8, 8, params).unwrap();
    sim.set(3, 3, 4.0, DVec2::new(2.0, 1.0));
    sim.set(4, 3, 4.0, DVec2::new(2.0, 1.0));

    let mut previous = sim.total_density();
    for step in 0..10 {
        sim.update();
        let current = sim.total_density();
        assert!(
            current <= previous + 1e-9,
            "step {step}: mass grew from {previous} to {current}"
        );
        previous = current;
    }
}

proptest! {
    #[test]
    fn decay_bounds_maximum_density(
        sources in prop::collection::vec((0isize..8, 0isize..8, 0.0f64..20.0, -2.0f64..2.0, -2.0f64..2.0), 1..6),
        viscosity in 0.0f64..1.0,
        decay in 0.05f64..0.9,
        iterations in 1usize..6,
        steps in 1i32..6,
    ) {
        let params = SimulationParams { viscosity, decay, iterations, parallel: false };
        let mut sim = Simulation::new(8, 8, params).unwrap();
        for (x, y, d, vx, vy) in sources {
            sim.set(x, y, d, DVec2::new(vx, vy));
        }

        let initial = max_density(&sim);
        for _ in 0..steps {
            sim.update();
        }

        let bound = initial * (1.0 - decay).powi(steps);
        prop_assert!(max_density(&sim) <= bound * (1.0 + 1e-9) + 1e-12,
            "max {} exceeds bound {}", max_density(&sim), bound);
    }

    #[test]
    fn out_of_range_reads_are_zero(
        width in 1usize..12,
        height in 1usize..12,
        offset in 0isize..50,
        seed_density in 0.1f64..10.0,
    ) {
        let mut sim = Simulation::new(width, height, SimulationParams::default()).unwrap();
        for y in 0..height as isize {
            for x in 0..width as isize {
                sim.set(x, y, seed_density, DVec2::ZERO);
            }
        }
        sim.update();

        let (w, h) = (width as isize, height as isize);
        prop_assert_eq!(sim.density_at(-1 - offset, 0), 0.0);
        prop_assert_eq!(sim.density_at(w + offset, 0), 0.0);
        prop_assert_eq!(sim.density_at(0, -1 - offset), 0.0);
        prop_assert_eq!(sim.density_at(0, h + offset), 0.0);
    }

    #[test]
    fn resize_keeps_common_cells(
        new_width in 1usize..10,
        new_height in 1usize..10,
    ) {
        let mut sim = Simulation::new(5, 5, SimulationParams::default()).unwrap();
        for y in 0..5isize {
            for x in 0..5isize {
                sim.set(x, y, (y * 5 + x + 1) as f64, DVec2::ZERO);
            }
        }
        sim.resize(new_width, new_height).unwrap();

        for y in 0..new_height as isize {
            for x in 0..new_width as isize {
                let expected = if x < 5 && y < 5 { (y * 5 + x + 1) as f64 } else { 0.0 };
                prop_assert_eq!(sim.density_at(x, y), expected);
            }
        }
    }
}
