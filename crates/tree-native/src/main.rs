mod replay;

use std::path::PathBuf;
use std::time::Duration;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use glam::Vec2;
use tree_core::constants::{GESTURE_POLL_INTERVAL_MS, MOUSE_CAMERA_GAIN};
use tree_core::gesture::GesturePoller;
use tree_core::gpu::SceneRenderer;
use tree_core::photos::uploaded_ref;
use tree_core::{FrameClock, Mode, SceneConfig, SceneStore, TreeScene};

/// Env var naming a landmark recording to replay through the gesture poller.
const LANDMARKS_ENV: &str = "TREE_LANDMARKS";

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    scene: TreeScene,
    clock: FrameClock,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window, store: SceneStore) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let mut scene = TreeScene::new(SceneConfig::default(), store)?;
        scene.set_viewport(config.width, config.height);
        let renderer = SceneRenderer::new(&device, format, config.width, config.height, &scene);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            scene,
            clock: FrameClock::new(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, new_size.width, new_size.height);
        self.scene.set_viewport(new_size.width, new_size.height);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let dt = self.clock.tick();
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.sync_points(&self.device, &self.scene);
        let frame_view = self.scene.tick(dt);
        self.renderer
            .render(&self.device, &self.queue, &view, &frame_view);
        frame.present();
        Ok(())
    }
}

/// Window-space cursor to `[-1, 1]` with y up.
fn normalized_cursor(
    position: winit::dpi::PhysicalPosition<f64>,
    width: u32,
    height: u32,
) -> Vec2 {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    Vec2::new(
        ((position.x / w) * 2.0 - 1.0) as f32,
        (-(position.y / h) * 2.0 + 1.0) as f32,
    )
}

fn start_landmark_replay(store: &SceneStore) -> Option<GesturePoller> {
    let path = PathBuf::from(std::env::var_os(LANDMARKS_ENV)?);
    let source = match replay::ReplaySource::open(&path) {
        Ok(source) => source,
        Err(e) => {
            log::error!("[gesture] cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    log::info!(
        "[gesture] replaying {} frames from {}",
        source.len(),
        path.display()
    );
    let interval = Duration::from_millis(GESTURE_POLL_INTERVAL_MS);
    match GesturePoller::spawn(source, store.clone(), interval) {
        Ok(poller) => Some(poller),
        Err(e) => {
            log::error!("[gesture] poller failed to start: {}", e);
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let store = SceneStore::new();
    let _poller = start_landmark_replay(&store);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Particle Tree (native)")
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window, store.clone()))?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                let p = normalized_cursor(position, state.config.width, state.config.height);
                store.set_pointer(p.x, p.y);
                let target = p * MOUSE_CAMERA_GAIN;
                store.set_camera_target(target.x, target.y);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed => store.set_mode(Mode::Chaos),
                ElementState::Released => store.set_mode(Mode::Formed),
            },
            WindowEvent::DroppedFile(path) => {
                store.add_photo(uploaded_ref(&path.display().to_string()));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Space) => store.set_mode(store.mode().toggled()),
                Key::Named(NamedKey::Escape) => elwt.exit(),
                _ => {}
            },
            _ => {}
        },
        Event::AboutToWait => match state.render() {
            Ok(_) => state.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                state.resize(state.window.inner_size())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory; exiting");
                elwt.exit()
            }
            Err(e) => log::warn!("[gpu] frame skipped: {:?}", e),
        },
        _ => {}
    })?;
    Ok(())
}
