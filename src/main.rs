use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fluidt::{AnalysisRecorder, AutoRunner, Config, FluidApp, ImageExporter, Palette, SharedSimulation, SimulationContext};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser)]
#[command(name = "fluidt", about = "Interactive stable-fluids simulation")]
struct Cli {
    /// Viscosity
    #[arg(short = 'v', long)]
    viscosity: Option<f64>,
    /// Fraction of density lost per step
    #[arg(short = 'd', long)]
    decay: Option<f64>,
    /// Solver iterations per step
    #[arg(short = 'i', long)]
    iterations: Option<usize>,
    /// Disable the automatic stroke generator
    #[arg(short = 'a', long = "no-auto-run")]
    no_auto_run: bool,
    /// Foreground color (#rrggbb)
    #[arg(long)]
    fg: Option<String>,
    /// Background color (#rrggbb)
    #[arg(long)]
    bg: Option<String>,
    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run without a window and export PNG frames
    Headless {
        #[arg(long, default_value_t = 100)]
        frames: usize,
        #[arg(long, default_value = "frames")]
        output: PathBuf,
        /// Draw a random stroke every N frames
        #[arg(long, default_value_t = 10)]
        stroke_every: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Cli {
    fn resolve_config(&self) -> fluidt::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(viscosity) = self.viscosity {
            config.params.viscosity = viscosity;
        }
        if let Some(decay) = self.decay {
            config.params.decay = decay;
        }
        if let Some(iterations) = self.iterations {
            config.params.iterations = iterations;
        }
        if self.no_auto_run {
            config.auto_run = false;
        }
        if self.fg.is_some() || self.bg.is_some() {
            let current = fluidt::render::to_hex;
            let fg = self.fg.clone().unwrap_or_else(|| current(config.palette.foreground));
            let bg = self.bg.clone().unwrap_or_else(|| current(config.palette.background));
            config.palette = Palette::from_hex(&fg, &bg)?;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        Some(Command::Headless {
            frames,
            output,
            stroke_every,
            seed,
        }) => run_headless(&config, frames, &output, stroke_every, seed)?,
        None => run_gui_app(config)?,
    }

    Ok(())
}

fn run_headless(
    config: &Config,
    frames: usize,
    output: &Path,
    stroke_every: usize,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "running {} headless frames on a {}x{} grid",
        frames, config.width, config.height
    );
    std::fs::create_dir_all(output)?;

    let shared = SharedSimulation::new(config.build_simulation()?);
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut runner = AutoRunner::new(shared.clone(), SimulationContext::new(), rng);
    let exporter = ImageExporter::new(config.palette, config.cell_size.max(1.0) as u32);
    let mut recorder = AnalysisRecorder::new();

    for frame in 0..frames {
        if config.auto_run && stroke_every > 0 && frame % stroke_every == 0 {
            let points = runner.apply_random_stroke();
            info!("frame {frame}: stroke of {points} points");
        }

        shared.update();

        let sim = shared.read();
        exporter.export_density_png(&*sim, &output.join(format!("frame_{frame:04}.png")))?;
        let metrics = recorder.record_frame(&*sim, frame);
        if frame % 10 == 0 {
            metrics.log_summary();
        }
    }

    recorder.log_trends();
    info!("wrote {} frames to {}", frames, output.display());
    Ok(())
}

fn run_gui_app(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let app = FluidApp::new(&config)?;

    let window_width = config.width as f32 * config.cell_size;
    let window_height = (config.height / 2).max(1) as f32 * config.cell_size + 24.0;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window_width, window_height])
            .with_title("fluidt"),
        ..Default::default()
    };

    eframe::run_native("fluidt", options, Box::new(|_cc| Box::new(app)))
        .map_err(|e| e.to_string())?;
    Ok(())
}
