mod camera;
mod camera_controller;
mod color;
mod config;
mod model;
mod renderer;
mod world;

use anyhow::{Context, Result};
use config::{DiamondNeighbors, LandscapeConfig};
use renderer::State;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{CursorGrabMode, Window, WindowId},
};
use world::Heightfield;

const SEED_VAR: &str = "LANDSCAPE_SEED";
const DIAMOND_VAR: &str = "LANDSCAPE_DIAMOND";

struct App {
    config: LandscapeConfig,
    heightfield: Option<Heightfield>,
    window: Option<Arc<Window>>,
    state: Option<State>,
    started: Instant,
    last_frame: Instant,
}

impl App {
    fn new(config: LandscapeConfig, heightfield: Heightfield) -> Self {
        let now = Instant::now();
        Self {
            config,
            heightfield: Some(heightfield),
            window: None,
            state: None,
            started: now,
            last_frame: now,
        }
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("Cursor grab unavailable, mouse look may drift: {e}");
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(heightfield) = self.heightfield.take() else {
            return;
        };

        let window_attributes = Window::default_attributes().with_title("Landscape");
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        grab_cursor(&window);
        self.window = Some(window.clone());

        match pollster::block_on(State::new(window, &self.config, heightfield)) {
            Ok(state) => {
                self.state = Some(state);
                self.last_frame = Instant::now();
            }
            Err(e) => {
                log::error!("Failed to create state: {e:?}");
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = self.state.as_mut() {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.mouse_motion(delta);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let window = match self.window.as_ref() {
            Some(w) => w,
            None => return,
        };
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        if id != window.id() {
            return;
        }

        if !state.input(&event) {
            match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            logical_key: Key::Named(NamedKey::Escape),
                            ..
                        },
                    ..
                } => {
                    event_loop.exit();
                }
                WindowEvent::Focused(true) => grab_cursor(window),
                WindowEvent::Resized(physical_size) => {
                    state.resize(physical_size);
                    window.request_redraw();
                }
                WindowEvent::RedrawRequested => {
                    match state.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => state.resize(state.size()),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("Surface out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::error!("{e:?}"),
                    }
                }
                _ => {}
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_mut() {
            let now = Instant::now();
            let elapsed_ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
            self.last_frame = now;
            state.update(elapsed_ms, now.duration_since(self.started).as_secs_f32());
        }
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn env_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(raw) => Ok(Some(raw)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {name}")),
    }
}

fn seed_from_env() -> Result<Option<u64>> {
    env_var(SEED_VAR)?
        .map(|raw| {
            raw.trim()
                .parse()
                .with_context(|| format!("{SEED_VAR} must be an unsigned integer, got {raw:?}"))
        })
        .transpose()
}

fn diamond_from_env() -> Result<Option<DiamondNeighbors>> {
    env_var(DIAMOND_VAR)?
        .map(|raw| raw.parse().with_context(|| format!("parsing {DIAMOND_VAR}")))
        .transpose()
}

fn main() -> Result<()> {
    env_logger::init();

    let config = LandscapeConfig::default()
        .with_seed(seed_from_env()?)
        .with_diamond_neighbors(diamond_from_env()?);
    config.validate().context("invalid landscape configuration")?;
    let heightfield = Heightfield::generate(&config.terrain)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, heightfield);
    event_loop.run_app(&mut app)?;
    Ok(())
}
