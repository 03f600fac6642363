use std::thread::JoinHandle;
use std::time::Duration;

use eframe::egui;
use glam::DVec2;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::error::Result;
use crate::render::Renderer;
use crate::shared::{SharedSimulation, SimulationContext, join_logged, spawn_update_loop};
use crate::strokes::{AutoRunner, Stroke};

/// Interactive window around a [`SharedSimulation`].
///
/// Stepping happens on a background thread at a fixed interval; the UI
/// thread only injects strokes, handles keys and paints the density field.
/// Every screen cell holds two grid rows, so the grid is twice as tall as
/// the canvas is in cells.
pub struct FluidApp {
    shared: SharedSimulation,
    ctx: SimulationContext,
    renderer: Renderer,
    cell_size: f32,
    frame_interval: Duration,
    last_pointer: Option<DVec2>,
    texture: Option<egui::TextureHandle>,
    update_loop: Option<JoinHandle<u64>>,
    auto_runner: Option<JoinHandle<()>>,
}

impl FluidApp {
    pub fn new(config: &Config) -> Result<Self> {
        let shared = SharedSimulation::new(config.build_simulation()?);
        let ctx = SimulationContext::new();

        let update_loop = spawn_update_loop(shared.clone(), ctx.clone(), config.frame_interval());
        let auto_runner = config.auto_run.then(|| {
            AutoRunner::new(shared.clone(), ctx.clone(), StdRng::from_entropy()).spawn()
        });

        Ok(Self {
            shared,
            ctx,
            renderer: Renderer::new(config.palette, 1),
            cell_size: config.cell_size.max(1.0),
            frame_interval: config.frame_interval(),
            last_pointer: None,
            texture: None,
            update_loop: Some(update_loop),
            auto_runner,
        })
    }

    pub fn shared(&self) -> &SharedSimulation {
        &self.shared
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (quit, pause, reset) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::R),
            )
        });

        if quit {
            self.ctx.cancel();
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if pause {
            let paused = self.ctx.toggle_pause();
            info!("{}", if paused { "paused" } else { "resumed" });
        }
        if reset {
            self.shared.reset();
        }
    }

    /// Keeps the grid matched to the canvas, one column per cell and two
    /// rows per cell.
    fn fit_grid(&self, canvas: egui::Vec2) {
        let width = ((canvas.x / self.cell_size) as usize).max(1);
        let height = ((canvas.y / self.cell_size) as usize).max(1) * 2;
        if self.shared.dimensions() != (width, height) {
            if let Err(e) = self.shared.resize(width, height) {
                error!("failed to resize simulation: {e}");
            }
        }
    }

    fn to_grid(&self, rect: egui::Rect, pos: egui::Pos2) -> DVec2 {
        DVec2::new(
            ((pos.x - rect.left()) / self.cell_size) as f64,
            ((pos.y - rect.top()) / (self.cell_size / 2.0)) as f64,
        )
    }

    fn handle_pointer(&mut self, rect: egui::Rect, response: &egui::Response) {
        let dragging = response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Secondary);
        let Some(pos) = response.interact_pointer_pos().filter(|_| dragging) else {
            self.last_pointer = None;
            return;
        };

        let current = self.to_grid(rect, pos);
        if self.ctx.is_paused() {
            self.last_pointer = Some(current);
            return;
        }
        if let Some(previous) = self.last_pointer {
            match Stroke::new(previous, current) {
                Some(stroke) => stroke.apply(&mut self.shared.write()),
                // Too short to draw; keep the old anchor so slow drags still accumulate.
                None => return,
            }
        }
        self.last_pointer = Some(current);
    }

    fn paint(&mut self, ctx: &egui::Context, ui: &egui::Ui, rect: egui::Rect) {
        let image = self.shared.with_read(|sim| {
            let rgb = self.renderer.render_to_image(sim);
            egui::ColorImage::from_rgb([sim.width(), sim.height()], rgb.as_raw())
        });

        if let Some(texture) = self.texture.as_mut() {
            texture.set(image, egui::TextureOptions::NEAREST);
        } else {
            self.texture = Some(ctx.load_texture("density", image, egui::TextureOptions::NEAREST));
        }

        if let Some(texture) = &self.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter().image(texture.id(), rect, uv, egui::Color32::WHITE);
        }
    }
}

impl eframe::App for FluidApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let (width, height) = self.shared.dimensions();
            ui.label(format!(
                "{} | {}x{} | drag: stir | space: pause | r: reset | q: quit",
                if self.ctx.is_paused() { "paused" } else { "running" },
                width,
                height
            ));
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

                self.fit_grid(rect.size());
                self.handle_pointer(rect, &response);
                self.paint(ctx, ui, rect);
            });

        ctx.request_repaint_after(self.frame_interval);
    }
}

impl Drop for FluidApp {
    fn drop(&mut self) {
        self.ctx.cancel();
        if let Some(handle) = self.auto_runner.take() {
            join_logged("auto-runner", handle);
        }
        if let Some(handle) = self.update_loop.take() {
            if let Some(frames) = join_logged("update loop", handle) {
                info!("simulation ran {frames} frames");
            }
        }
    }
}
