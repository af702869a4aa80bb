//! Pounce -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Input events are
//! translated into `InputEvent`s (pointer positions mapped into the 640x360
//! logical surface) and handed to the active scene, whose returned command is
//! applied to the scene stack. Simulation runs inside `RedrawRequested`:
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- tick the active scene once per fixed step
//!   3. Draw the active scene into the sprite batch and render it letterboxed
//!   4. Block in the frame limiter until the next frame deadline
//!
//! Quitting only raises a flag; `about_to_wait` checks it once per loop
//! iteration and exits after the current frame has finished.

mod assets;
mod button;
mod character;
mod collision;
mod error;
#[cfg(test)]
mod replay;
mod scene_stack;
mod scenes;
mod settings;
mod surface;

use std::error::Error;
use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::ImageRegistry;
use error::GameError;
use pounce_core::input::{InputEvent, InputState, Key, MouseBtn};
use pounce_core::time::{FrameLimiter, TimeState};
use pounce_core::viewport::{Viewport, GAME_HEIGHT, GAME_WIDTH};
use pounce_platform::window::PlatformConfig;
use pounce_render::{Camera2D, Renderer, SpriteBatch};
use scene_stack::SceneStack;
use scenes::{apply_command, GameScene, Outcome, Scene, SceneCommand, SceneRequest};
use settings::{GameSettings, SettingsCache};

const ASSET_DIR: &str = "assets";
const SETTINGS_DIR: &str = "assets/settings";

struct EngineState {
    window: Arc<Window>,
    renderer: Renderer,
    time: TimeState,
    limiter: FrameLimiter,
    input: InputState,
    viewport: Viewport,
    camera: Camera2D,
    batch: SpriteBatch,
    settings: SettingsCache,
    images: ImageRegistry,
    scenes: SceneStack<GameScene>,
}

impl EngineState {
    fn new(
        window: Arc<Window>,
        game: &GameSettings,
        settings: SettingsCache,
    ) -> Result<Self, Box<dyn Error>> {
        let camera = Camera2D::new(GAME_WIDTH, GAME_HEIGHT);
        let renderer = Renderer::new(Arc::clone(&window), &camera)?;
        let (width, height) = renderer.size();

        let mut state = Self {
            window,
            renderer,
            time: TimeState::new(game.framerate),
            limiter: FrameLimiter::new(game.framerate),
            input: InputState::new(),
            viewport: Viewport::new(width, height),
            camera,
            batch: SpriteBatch::new(),
            settings,
            images: ImageRegistry::new(ASSET_DIR),
            scenes: SceneStack::new(),
        };
        state.apply(SceneCommand::Push(SceneRequest::MainMenu))?;
        Ok(state)
    }

    fn apply(&mut self, command: SceneCommand) -> Result<Outcome, GameError> {
        let outcome = apply_command(
            &mut self.scenes,
            command,
            &mut self.settings,
            &mut self.images,
        )?;
        if matches!(command, SceneCommand::Push(_)) {
            self.sync_textures();
        }
        Ok(outcome)
    }

    /// Uploads every decoded image the renderer has not seen yet.
    fn sync_textures(&mut self) {
        for (key, pixels) in self.images.iter() {
            if !self.renderer.has_texture(key) {
                self.renderer.upload_texture(Arc::clone(key), pixels);
            }
        }
    }

    /// Routes one input event to the active scene and applies its command.
    fn dispatch(&mut self, event: InputEvent) -> Result<Outcome, GameError> {
        if !self.input.apply(&event) || self.scenes.is_empty() {
            return Ok(Outcome::Continue);
        }
        let command = self.scenes.active_mut()?.handle_input(&event);
        self.apply(command)
    }

    fn redraw(&mut self) -> Result<(), GameError> {
        let (width, height) = self.renderer.size();
        // Minimised, or the stack is empty between the last pop and the
        // loop exiting. Keep pacing without banking simulation time.
        if width == 0 || height == 0 || self.scenes.is_empty() {
            self.time.pause();
            self.limiter.wait();
            return Ok(());
        }

        self.time.begin_frame();
        let dt = self.time.fixed_dt as f32;
        while self.time.should_step() {
            self.scenes.active_mut()?.tick(dt, &self.input);
        }
        if self.time.steps_this_frame > 1 {
            log::debug!("Caught up {} fixed steps", self.time.steps_this_frame);
        }

        self.batch.clear();
        self.scenes.active()?.draw(&mut self.batch);
        self.renderer
            .render(&self.batch, &self.camera, self.viewport.letterbox());

        self.limiter.wait();
        Ok(())
    }
}

struct App {
    game: GameSettings,
    settings: Option<SettingsCache>,
    state: Option<EngineState>,
    quit_requested: bool,
    fatal: Option<String>,
}

impl App {
    fn new(game: GameSettings, settings: SettingsCache) -> Self {
        Self {
            game,
            settings: Some(settings),
            state: None,
            quit_requested: false,
            fatal: None,
        }
    }

    fn fail(&mut self, message: String) {
        self.fatal = Some(message);
        self.quit_requested = true;
    }

    fn handle_outcome(&mut self, outcome: Result<Outcome, GameError>) {
        match outcome {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::ToggleFullscreen) => {
                if let Some(state) = &self.state {
                    pounce_platform::window::toggle_fullscreen(&state.window);
                }
            }
            Ok(Outcome::Quit) => {
                log::info!("Quit requested");
                self.quit_requested = true;
            }
            Err(err) => self.fail(err.to_string()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(settings) = self.settings.take() else {
            return;
        };

        let config = PlatformConfig {
            title: self.game.title.clone(),
            width: self.game.screen_width,
            height: self.game.screen_height,
            fullscreen: self.game.fullscreen,
        };
        let window = match pounce_platform::window::create_window(event_loop, &config) {
            Ok(window) => window,
            Err(err) => {
                self.fail(format!("Failed to create window: {err}"));
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{} (fullscreen: {})",
            config.width,
            config.height,
            config.fullscreen
        );

        match EngineState::new(window, &self.game, settings) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                self.fail(format!("Failed to start: {err}"));
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.quit_requested {
            event_loop.exit();
            return;
        }
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let outcome = match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                Ok(Outcome::Quit)
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.renderer.resize(w, h);
                    state.viewport.resize(w, h);
                    log::info!(
                        "Resized to {}x{} (scale {:.2})",
                        w,
                        h,
                        state.viewport.scale_factor()
                    );
                }
                Ok(Outcome::Continue)
            }

            WindowEvent::Focused(false) => {
                state.input.release_all();
                Ok(Outcome::Continue)
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key_code) = event.physical_key else {
                    return;
                };
                let Some(key) = map_key(key_code) else {
                    return;
                };
                match event.state {
                    ElementState::Pressed if key == Key::F11 => {
                        if event.repeat {
                            Ok(Outcome::Continue)
                        } else {
                            Ok(Outcome::ToggleFullscreen)
                        }
                    }
                    ElementState::Pressed => state.dispatch(InputEvent::KeyPressed(key)),
                    ElementState::Released => state.dispatch(InputEvent::KeyReleased(key)),
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let screen = Vec2::new(position.x as f32, position.y as f32);
                let game = state.viewport.screen_to_game(screen);
                state.dispatch(InputEvent::PointerMoved(game))
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let Some(button) = map_mouse(button) else {
                    return;
                };
                let position = state.input.pointer_position;
                match button_state {
                    ElementState::Pressed => {
                        state.dispatch(InputEvent::PointerPressed { button, position })
                    }
                    ElementState::Released => {
                        state.dispatch(InputEvent::PointerReleased { button, position })
                    }
                }
            }

            WindowEvent::RedrawRequested => state.redraw().map(|()| Outcome::Continue),

            _ => Ok(Outcome::Continue),
        };

        self.handle_outcome(outcome);
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F11 => Some(Key::F11),
        _ => None,
    }
}

fn map_mouse(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let settings = SettingsCache::new(SETTINGS_DIR);
    let game = settings.game()?;
    log::info!(
        "Loaded game settings: {}x{} at {} fps",
        game.screen_width,
        game.screen_height,
        game.framerate
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(game, settings);
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Pounce starting...");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
