use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use hubworld_input::{MovementFlags, MovementKey};
use hubworld_render_wgpu::{OrbitCamera, WgpuRenderer};
use hubworld_sim::{HubLayout, HubSession};
use hubworld_view::{CONTROLS, HudModel, door_label, scene_props};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "hubworld-desktop", about = "Hub world demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Fixed binding table from physical keys to logical movement keys.
fn map_movement_key(key: KeyCode) -> Option<MovementKey> {
    match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(MovementKey::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(MovementKey::Backward),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(MovementKey::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(MovementKey::Right),
        KeyCode::Space => Some(MovementKey::Jump),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(MovementKey::Sprint),
        KeyCode::KeyE => Some(MovementKey::Interact),
        _ => None,
    }
}

/// Application state.
struct AppState {
    session: HubSession,
    camera: OrbitCamera,
    flags: MovementFlags,
    hud: HudModel,
    show_hud: bool,
    mouse_captured: bool,
    last_frame: Instant,
}

impl AppState {
    fn new() -> Result<Self> {
        let mut session = HubSession::new(HubLayout::hub())?;
        session.set_teleport_callback(|area| {
            tracing::info!(area = %area, "teleported");
        });
        let hud = HudModel::project(session.state());

        Ok(Self {
            session,
            camera: OrbitCamera::default(),
            flags: MovementFlags::default(),
            hud,
            show_hud: true,
            mouse_captured: false,
            last_frame: Instant::now(),
        })
    }

    fn update(&mut self, dt: f32) {
        if let Err(e) = self.session.frame(&self.flags, dt) {
            tracing::error!("simulation frame failed: {e}");
            return;
        }
        // Re-render the HUD snapshot only when the state actually changed
        if !self.session.drain_events().is_empty() {
            self.hud = HudModel::project(self.session.state());
        }
        self.camera.follow(self.session.state().position());
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(movement) = map_movement_key(key) {
            self.flags.apply(movement, pressed);
            return;
        }

        if !pressed {
            return;
        }

        match key {
            KeyCode::KeyR => {
                if let Err(e) = self.session.reset() {
                    tracing::error!("reset failed: {e}");
                } else {
                    tracing::info!("hub reset");
                }
            }
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
            }
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let completed_color = egui::Color32::from_rgb(52, 211, 153);
        let pending_color = egui::Color32::from_rgb(226, 232, 240);
        let locked_color = egui::Color32::from_rgb(148, 163, 184);

        egui::Window::new("Objectives")
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(16.0, 16.0))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                for objective in &self.hud.objectives {
                    let color = if objective.completed {
                        completed_color
                    } else {
                        pending_color
                    };
                    ui.horizontal(|ui| {
                        ui.colored_label(color, if objective.completed { "●" } else { "○" });
                        ui.colored_label(color, &objective.label);
                    });
                }
            });

        egui::Window::new("Controls")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                for (key, action) in CONTROLS {
                    ui.horizontal(|ui| {
                        ui.strong(*key);
                        ui.label(*action);
                    });
                }
                ui.separator();
                ui.small("R: Reset | F1: Toggle HUD | RMB: Orbit");
            });

        egui::Window::new("Status")
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Position: {}", self.hud.position_text()));
                ui.separator();

                ui.strong("Unlocked");
                for area in &self.hud.unlocked_areas {
                    ui.label(area);
                }
                ui.separator();

                ui.strong("Inventory");
                if self.hud.inventory.is_empty() {
                    ui.colored_label(locked_color, "Empty");
                } else {
                    for item in &self.hud.inventory {
                        ui.label(item);
                    }
                }
                ui.separator();

                ui.strong("Teleporters");
                let state = self.session.state();
                for door in &self.session.layout().doors {
                    let accessible = door.is_accessible(state);
                    let color = if accessible {
                        pending_color
                    } else {
                        locked_color
                    };
                    ui.colored_label(color, door_label(door, state));
                }
            });

        egui::Window::new("Minimap")
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.colored_label(locked_color, "Map rendering placeholder");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Hub World")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("hubworld_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.camera.aspect = size.width as f32 / size.height.max(1) as f32;

        let renderer = WgpuRenderer::new(&device, surface_format, size.width, size.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.camera.aspect =
                        config.width as f32 / config.height.max(1) as f32;
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
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
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.mouse_captured = btn_state == ElementState::Pressed;
                if let Some(window) = &self.window {
                    let _ = window.set_cursor_visible(!self.state.mouse_captured);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 2.0,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                self.state.camera.zoom(amount);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;
                self.state.update(dt);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    let props =
                        scene_props(self.state.session.layout(), self.state.session.state());
                    renderer.render(device, queue, &view, &self.state.camera, &props);
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
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
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.mouse_captured {
                self.state
                    .camera
                    .orbit(delta.0 as f32, -(delta.1 as f32));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("hubworld-desktop starting");

    let state = AppState::new()?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
