use clap::{Parser, Subcommand};
use glam::UVec2;
use rubix_common::{
    AppConfig, AppState, Axis, CUBE_COUNT, CullMode, FRAME_RESOURCE_COUNT, Face, FillMode,
    FrameInput,
};
use rubix_input::Action;
use rubix_render::{
    DriverOptions, FrameBackend, FrameDriver, FrameStats, HeadlessBackend, MaterialConstants,
    ObjectConstants, PassConstants, PipelineVariant,
};
use rubix_scene::{CubeScene, SceneUpdate};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rubix-cli", about = "Headless tools for the rubix renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, ring layout and constant buffer sizes
    Info,
    /// Run the frame loop against a simulated GPU
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "12")]
        frames: u64,
        /// Spin the whole cube about this axis (x, y, z)
        #[arg(long)]
        spin: Option<Axis>,
        /// Queue face turns, one per frame from the first (front, left, right, back, top, bottom)
        #[arg(long, value_delimiter = ',')]
        turn: Vec<Face>,
        /// Rasterizer fill mode (solid, wireframe)
        #[arg(long, default_value = "solid")]
        fill: FillMode,
        /// Rasterizer cull mode (none, front, back)
        #[arg(long, default_value = "none")]
        cull: CullMode,
        /// Frames the simulated GPU may fall behind before the CPU blocks
        #[arg(long, default_value = "1")]
        gpu_lag: usize,
        /// Only print the final summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    Ok(match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    })
}

/// `RUST_LOG` wins when set; otherwise `--verbose` picks debug over info.
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn print_frame(stats: &FrameStats) {
    let mut events = Vec::new();
    if stats.tick.reset {
        events.push("reset".to_string());
    }
    if let Some(axis) = stats.tick.spun {
        events.push(format!("spin {axis}"));
    }
    if let Some(face) = stats.tick.turned {
        events.push(format!("turn {face}"));
    }
    println!(
        "frame {:>4} slot {} fence {:>4} objects {:>2} materials {} pipeline {:<10} draws {} {}{}",
        stats.frame,
        stats.slot,
        stats.fence_value,
        stats.objects_synced,
        stats.materials_synced,
        stats.pipeline,
        stats.draws,
        if stats.stalled { "stalled " } else { "" },
        events.join(", ")
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("rubix-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("frame resources: {FRAME_RESOURCE_COUNT}");
            println!("cubes: {CUBE_COUNT}");
            println!(
                "constants: object={}B material={}B pass={}B",
                size_of::<ObjectConstants>(),
                size_of::<MaterialConstants>(),
                size_of::<PassConstants>()
            );
            let variants: Vec<&str> = PipelineVariant::ALL.iter().map(|v| v.label()).collect();
            println!("pipelines: {}", variants.join(", "));
        }
        Commands::Simulate {
            frames,
            spin,
            turn,
            fill,
            cull,
            gpu_lag,
            quiet,
        } => {
            let mut scene = CubeScene::new(&config.camera);
            let mut intent = AppState::new();
            Action::SetFill(fill).apply(&mut intent);
            Action::SetCull(cull).apply(&mut intent);
            if let Some(axis) = spin {
                Action::ToggleRotatable.apply(&mut intent);
                Action::SelectAxis(axis).apply(&mut intent);
            }

            let mut driver = FrameDriver::new(
                HeadlessBackend::default(),
                &scene,
                SceneUpdate::new(&config.scene),
                DriverOptions::from_config(&config.render),
            )?;

            let size = UVec2::new(config.window.width, config.window.height);
            let dt = 1.0 / 60.0;
            let mut turns = turn.into_iter();
            for frame in 0..frames {
                if let Some(face) = turns.next() {
                    Action::TurnFace(face).apply(&mut intent);
                }
                let input = FrameInput::idle(dt, frame as f32 * dt, size);
                let stats = driver.run_frame(&mut scene, &mut intent, &input)?;
                if !quiet {
                    print_frame(&stats);
                }

                let fence = driver.backend_mut().fence_mut();
                let pending = fence.pending();
                if pending > gpu_lag {
                    fence.advance(pending - gpu_lag);
                }
            }
            driver.flush()?;

            print!("{}", driver.backend().describe());
            println!(
                "Camera: theta={:.3} phi={:.3} radius={:.1}",
                scene.camera.theta(),
                scene.camera.phi(),
                scene.camera.radius()
            );
            println!("Spin angle: {:.1} deg", driver.update().spin_angle().to_degrees());
            if !driver.backend().hazards().is_empty() {
                anyhow::bail!(
                    "{} slot writes raced the simulated GPU",
                    driver.backend().hazards().len()
                );
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}
