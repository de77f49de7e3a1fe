use anyhow::{Context as _, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use framelab_common::{DemoKind, LaunchConfig, OrthoCamera, WindowSize};
use framelab_demos::FrameDriver;
use framelab_input::{InputState, Key, MouseButton};
use framelab_render_wgpu::{TextRun, Tessellator, WgpuRenderer};
use framelab_tools::{CameraStatus, Inspector};
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "framelab-desktop", about = "Framelab demo launcher")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML launch configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Demo to run (physics, camera, hello); overrides the config file
    #[arg(short, long)]
    demo: Option<DemoKind>,
}

fn load_config(cli: &Cli) -> Result<LaunchConfig> {
    let mut config = match &cli.config {
        Some(path) => LaunchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LaunchConfig::default(),
    };
    if let Some(demo) = cli.demo {
        config.demo = demo;
    }
    Ok(config)
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyE => Key::E,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::F1 => Key::F1,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    };
    Some(key)
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Window-bound GPU state, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    tessellator: Tessellator,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(window: Arc<Window>, egui_ctx: &EguiContext) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no GPU adapter compatible with the window surface"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("framelab_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // Colors reach the target unconverted.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&device, renderer.surface_format(), None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            tessellator: Tessellator::new(),
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }
}

/// Paint text runs at their projected window positions.
fn draw_texts(ctx: &EguiContext, texts: &[TextRun], camera: &OrthoCamera, window: WindowSize) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let pixels_per_point = ctx.pixels_per_point();
    for run in texts {
        let pixel = camera.project(run.position, window) / pixels_per_point;
        let [r, g, b, a] = run
            .color
            .to_array()
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        painter.text(
            egui::pos2(pixel.x, pixel.y),
            egui::Align2::LEFT_TOP,
            &run.text,
            egui::FontId::proportional(16.0),
            egui::Color32::from_rgba_unmultiplied(r, g, b, a),
        );
    }
}

fn inspector_lines(driver: &FrameDriver) -> Vec<String> {
    let demo = driver.demo();
    let mut lines = vec![
        format!("Demo: {}", demo.name()),
        format!("Frame: {}", driver.context().frame_index),
    ];
    lines.extend(
        CameraStatus::from(demo.camera())
            .to_string()
            .lines()
            .map(str::to_owned),
    );
    if let Some(world) = demo.world() {
        let summary = Inspector::summary(world);
        lines.push(format!(
            "Tick: {}  Time: {:.2}s",
            summary.tick, summary.sim_time
        ));
        lines.push(format!(
            "Bodies: {} (static {}, dynamic {})",
            summary.body_count, summary.static_count, summary.dynamic_count
        ));
        lines.push(format!("Awake: {}", summary.awake_count));
        if summary.recording {
            lines.push(format!("Recorded events: {}", summary.pending_events));
        }
        let newest = Inspector::list_bodies(world)
            .last()
            .and_then(|id| Inspector::inspect_body(world, *id));
        if let Some(info) = newest {
            lines.push(format!("Newest: {info}"));
        }
    }
    lines
}

fn draw_inspector(ctx: &EguiContext, lines: &[String]) {
    egui::SidePanel::left("inspector")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Framelab");
            ui.separator();
            for line in lines {
                ui.label(line.as_str());
            }
            ui.separator();
            ui.small("F1: Toggle Inspector | Esc: Quit");
        });
}

struct App {
    title: String,
    size: WindowSize,
    driver: FrameDriver,
    input: InputState,
    show_inspector: bool,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
}

impl App {
    fn new(config: &LaunchConfig, driver: FrameDriver) -> Self {
        Self {
            title: config.title.clone(),
            size: config.window_size(),
            driver,
            input: InputState::new(),
            show_inspector: false,
            egui_ctx: EguiContext::default(),
            gpu: None,
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };

        self.driver.frame(self.input.snapshot())?;
        let frame = self.driver.last_frame();
        let window = self.driver.context().window;
        let geometry = gpu
            .tessellator
            .tessellate(&frame.draw, &self.driver.context().textures)?;

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("surface error: {e}");
                return Ok(());
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            frame.clear_color,
            &frame.camera,
            &geometry,
        );

        let panel = self.show_inspector.then(|| inspector_lines(&self.driver));
        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            draw_texts(ctx, &geometry.texts, &frame.camera, window);
            if let Some(lines) = &panel {
                draw_inspector(ctx, lines);
            }
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(PhysicalSize::new(self.size.width, self.size.height));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match Gpu::new(window, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.driver.resize(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("GPU initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
                self.driver.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let Some(key) = map_key(code) else {
                    return;
                };
                let pressed = key_state == ElementState::Pressed;
                self.input.key(key, pressed);
                if pressed && !repeat {
                    match key {
                        Key::F1 => self.show_inspector = !self.show_inspector,
                        Key::Escape => event_loop.exit(),
                        _ => {}
                    }
                }
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                if let Some(button) = map_button(button) {
                    self.input
                        .button(button, btn_state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .pointer_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.pointer_left();
            }
            WindowEvent::Focused(false) => {
                self.input.focus_lost();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    tracing::error!("frame failed: {e:#}");
                    event_loop.exit();
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
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(&cli)?;
    tracing::info!(demo = %config.demo, "framelab-desktop starting");

    let driver = FrameDriver::new(config.clone())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&config, driver);
    event_loop.run_app(&mut app)?;

    Ok(())
}
