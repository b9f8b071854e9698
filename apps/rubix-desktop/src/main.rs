mod keymap;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{UVec2, Vec2};
use rubix_assets::TextureAtlas;
use rubix_common::{AppConfig, AppState, FrameInput};
use rubix_render::{DriverOptions, FrameDriver};
use rubix_render_wgpu::{BackendOptions, WgpuBackend};
use rubix_scene::{CubeScene, SceneUpdate};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "rubix-desktop", about = "Interactive Rubik's cube viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sticker atlas PNG (overrides the config file)
    #[arg(long)]
    atlas: Option<PathBuf>,

    /// Present without waiting for vertical sync
    #[arg(long)]
    no_vsync: bool,

    /// Upper bound on a single GPU fence wait
    #[arg(long)]
    fence_timeout_ms: Option<u64>,
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AppConfig::default(),
        };
        if let Some(atlas) = &self.atlas {
            config.render.atlas_path = Some(atlas.clone());
        }
        if self.no_vsync {
            config.render.vsync = false;
        }
        if let Some(ms) = self.fence_timeout_ms {
            config.render.fence_timeout_ms = ms;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Pointer and keyboard state accumulated between frames.
#[derive(Default)]
struct InputState {
    keys_held: HashSet<KeyCode>,
    left_down: bool,
    right_down: bool,
    cursor: Option<PhysicalPosition<f64>>,
    orbit_drag: Vec2,
    zoom_drag: Vec2,
}

impl InputState {
    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        if let Some(last) = self.cursor {
            let delta = Vec2::new((position.x - last.x) as f32, (position.y - last.y) as f32);
            if self.left_down {
                self.orbit_drag += delta;
            } else if self.right_down {
                self.zoom_drag += delta;
            }
        }
        self.cursor = Some(position);
    }

    fn take_frame_input(&mut self, dt: f32, total: f32, size: UVec2) -> FrameInput {
        FrameInput {
            delta_seconds: dt,
            total_seconds: total,
            client_size: size,
            orbit_drag: std::mem::take(&mut self.orbit_drag),
            zoom_drag: std::mem::take(&mut self.zoom_drag),
            pan: keymap::pan_direction(&self.keys_held),
        }
    }
}

/// Everything that exists only once the window and device are up.
struct Gpu {
    window: Arc<Window>,
    driver: FrameDriver<WgpuBackend>,
}

struct RubixApp {
    config: AppConfig,
    scene: CubeScene,
    intent: AppState,
    input: InputState,
    gpu: Option<Gpu>,
    started: Instant,
    last_frame: Instant,
    title: String,
    error: Option<anyhow::Error>,
}

impl RubixApp {
    fn new(config: AppConfig) -> Self {
        let scene = CubeScene::new(&config.camera);
        let now = Instant::now();
        Self {
            config,
            scene,
            intent: AppState::new(),
            input: InputState::default(),
            gpu: None,
            started: now,
            last_frame: now,
            title: String::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("creating surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let line_fill = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if line_fill {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("rubix_device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("creating device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if self.config.render.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: rubix_common::FRAME_RESOURCE_COUNT as u32,
        };

        let atlas = TextureAtlas::load_or_procedural(self.config.render.atlas_path.as_deref())
            .context("loading sticker atlas")?;

        let backend = WgpuBackend::new(
            Arc::new(device),
            Arc::new(queue),
            surface,
            surface_config,
            &self.scene,
            &atlas,
            BackendOptions { line_fill },
        );
        let driver = FrameDriver::new(
            backend,
            &self.scene,
            SceneUpdate::new(&self.config.scene),
            DriverOptions::from_config(&self.config.render),
        )?;

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
        Ok(Gpu { window, driver })
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            self.input.keys_held.remove(&key);
            return;
        }
        // Repeats arrive as presses for keys already held.
        if !self.input.keys_held.insert(key) {
            return;
        }
        if let Some(action) = keymap::action_for_key(key) {
            action.apply(&mut self.intent);
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;
        let total = (now - self.started).as_secs_f32();

        let (width, height) = gpu.driver.backend().surface_size();
        let input = self
            .input
            .take_frame_input(dt, total, UVec2::new(width, height));
        gpu.driver.run_frame(&mut self.scene, &mut self.intent, &input)?;

        let title = format!(
            "{} [fill: {} | cull: {} | camera: {}]",
            self.config.window.title,
            self.intent.fill_mode(),
            self.intent.cull_mode(),
            self.intent.camera_preset()
        );
        if title != self.title {
            gpu.window.set_title(&title);
            self.title = title;
        }
        gpu.window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for RubixApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => self.fail(event_loop, e.context("GPU initialisation failed")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.driver
                        .backend_mut()
                        .resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let down = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.input.left_down = down,
                    MouseButton::Right => self.input.right_down = down,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.cursor_moved(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.cursor = None;
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e.context("frame failed"));
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &mut self.gpu {
            match gpu.driver.flush() {
                Ok(()) => tracing::info!("flushed {} frames", gpu.driver.frames()),
                Err(e) => tracing::error!("flush on shutdown failed: {e}"),
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = cli.resolve_config()?;
    tracing::info!("rubix-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = RubixApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drags_accumulate_per_button() {
        let mut input = InputState::default();
        input.cursor_moved(PhysicalPosition::new(10.0, 10.0));
        input.left_down = true;
        input.cursor_moved(PhysicalPosition::new(14.0, 7.0));
        input.cursor_moved(PhysicalPosition::new(16.0, 7.0));
        input.left_down = false;
        input.right_down = true;
        input.cursor_moved(PhysicalPosition::new(16.0, 12.0));

        let frame = input.take_frame_input(0.016, 1.0, UVec2::new(640, 480));
        assert_eq!(frame.orbit_drag, Vec2::new(6.0, -3.0));
        assert_eq!(frame.zoom_drag, Vec2::new(0.0, 5.0));

        let next = input.take_frame_input(0.016, 1.016, UVec2::new(640, 480));
        assert_eq!(next.orbit_drag, Vec2::ZERO);
        assert_eq!(next.zoom_drag, Vec2::ZERO);
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "rubix-desktop",
            "--no-vsync",
            "--fence-timeout-ms",
            "250",
            "--atlas",
            "stickers.png",
        ]);
        let config = cli.resolve_config().unwrap();
        assert!(!config.render.vsync);
        assert_eq!(config.render.fence_timeout_ms, 250);
        assert_eq!(config.render.atlas_path, Some(PathBuf::from("stickers.png")));
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let cli = Cli::parse_from(["rubix-desktop", "--fence-timeout-ms", "0"]);
        assert!(cli.resolve_config().is_err());
    }
}
