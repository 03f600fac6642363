use std::path::PathBuf;

use fluidt::{AnalysisRecorder, FluidMetrics, ImageExporter, Palette, Renderer, Simulation, SimulationParams};
use glam::DVec2;
use image::Rgb;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fluidt-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_render_blends_density() {
    let mut sim = Simulation::new(3, 2, SimulationParams::default()).unwrap();
    sim.set(0, 0, 5.0, DVec2::ZERO);
    sim.set(1, 0, 0.5, DVec2::ZERO);
    let palette = Palette::from_hex("#ffffff", "#000000").unwrap();

    let img = Renderer::new(palette, 2).render_to_image(&sim);

    assert_eq!(img.dimensions(), (6, 4));
    assert_eq!(*img.get_pixel(0, 0), Rgb([255, 255, 255]));
    assert_eq!(*img.get_pixel(1, 1), Rgb([255, 255, 255]));
    assert_eq!(*img.get_pixel(2, 0), Rgb([127, 127, 127]));
    assert_eq!(*img.get_pixel(5, 3), Rgb([0, 0, 0]));
}

#[test]
fn test_export_frame_sequence() {
    let dir = scratch_dir("frames");
    let mut sim = Simulation::new(8, 6, SimulationParams::default()).unwrap();
    sim.set(4, 3, 15.0, DVec2::new(1.0, 0.0));

    let exporter = ImageExporter::new(Palette::default(), 1);
    exporter.export_frame_sequence(&mut sim, 3, &dir, "test").unwrap();

    for i in 0..3 {
        let path = dir.join(format!("test_frame_{:04}.png", i));
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (8, 6));
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_metrics_track_decay() {
    let params = SimulationParams {
        decay: 0.2,
        ..SimulationParams::default()
    };
    let mut sim = Simulation::new(10, 10, params).unwrap();
    sim.set(5, 5, 10.0, DVec2::new(1.0, 0.0));

    let initial = FluidMetrics::analyze(&sim, 0);
    assert_eq!(initial.total_mass, 10.0);
    assert_eq!(initial.max_density, 10.0);
    assert!(initial.divergence_norm > 0.0);

    let mut recorder = AnalysisRecorder::new();
    recorder.record_frame(&sim, 0);
    for frame in 1..=5 {
        sim.update();
        recorder.record_frame(&sim, frame);
    }
    recorder.log_trends();

    let first = recorder.first().unwrap();
    let last = recorder.last().unwrap();
    assert_eq!(recorder.metrics_history.len(), 6);
    assert!(last.total_mass < first.total_mass);
    assert!(last.max_density < first.max_density);
}
