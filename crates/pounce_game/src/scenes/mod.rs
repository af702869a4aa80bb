//! The closed set of scenes and the commands they send back to the loop.
//!
//! Scenes never touch the stack themselves. `handle_input` returns a
//! `SceneCommand` and the loop applies it through `apply_command`, which is
//! the only place scenes are built, pushed and popped.

pub mod cat_game;
pub mod menu;

use pounce_core::input::{InputEvent, InputState};
use pounce_render::SpriteBatch;

use crate::assets::ImageRegistry;
use crate::error::{ConfigError, GameError};
use crate::scene_stack::{SceneStack, StackSignal};
use crate::settings::{
    SettingsCache, CAT_GAME_SETTINGS_FILE, MAIN_MENU_SETTINGS_FILE, OPTIONS_MENU_SETTINGS_FILE,
};

pub use cat_game::CatGameScene;
pub use menu::MenuScene;

pub trait Scene {
    fn name(&self) -> &'static str;
    fn handle_input(&mut self, event: &InputEvent) -> SceneCommand;
    /// One fixed step. `input` is the held-key state for this step.
    fn tick(&mut self, dt: f32, input: &InputState);
    fn draw(&self, batch: &mut SpriteBatch);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest {
    MainMenu,
    OptionsMenu,
    CatGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Push(SceneRequest),
    Pop,
    ToggleFullscreen,
    Quit,
}

/// What the loop has to do after a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    ToggleFullscreen,
    Quit,
}

pub enum GameScene {
    Menu(MenuScene),
    CatGame(CatGameScene),
}

impl Scene for GameScene {
    fn name(&self) -> &'static str {
        match self {
            GameScene::Menu(scene) => scene.name(),
            GameScene::CatGame(scene) => scene.name(),
        }
    }

    fn handle_input(&mut self, event: &InputEvent) -> SceneCommand {
        match self {
            GameScene::Menu(scene) => scene.handle_input(event),
            GameScene::CatGame(scene) => scene.handle_input(event),
        }
    }

    fn tick(&mut self, dt: f32, input: &InputState) {
        match self {
            GameScene::Menu(scene) => scene.tick(dt, input),
            GameScene::CatGame(scene) => scene.tick(dt, input),
        }
    }

    fn draw(&self, batch: &mut SpriteBatch) {
        match self {
            GameScene::Menu(scene) => scene.draw(batch),
            GameScene::CatGame(scene) => scene.draw(batch),
        }
    }
}

pub fn build_scene(
    request: SceneRequest,
    settings: &mut SettingsCache,
    images: &mut ImageRegistry,
) -> Result<GameScene, ConfigError> {
    let scene = match request {
        SceneRequest::MainMenu => {
            let menu = settings.menu(MAIN_MENU_SETTINGS_FILE)?;
            GameScene::Menu(MenuScene::from_settings("main_menu", &menu, images)?)
        }
        SceneRequest::OptionsMenu => {
            let menu = settings.menu(OPTIONS_MENU_SETTINGS_FILE)?;
            GameScene::Menu(MenuScene::from_settings("options_menu", &menu, images)?)
        }
        SceneRequest::CatGame => {
            let game = settings.cat_game(CAT_GAME_SETTINGS_FILE)?;
            GameScene::CatGame(CatGameScene::from_settings(&game, settings, images)?)
        }
    };
    Ok(scene)
}

/// Applies one scene command to the stack. A failed build leaves the stack
/// untouched.
pub fn apply_command(
    scenes: &mut SceneStack<GameScene>,
    command: SceneCommand,
    settings: &mut SettingsCache,
    images: &mut ImageRegistry,
) -> Result<Outcome, GameError> {
    match command {
        SceneCommand::None => Ok(Outcome::Continue),
        SceneCommand::Push(request) => {
            let scene = build_scene(request, settings, images)?;
            log::info!("Pushing scene '{}' (depth {})", scene.name(), scenes.len() + 1);
            scenes.push(scene);
            Ok(Outcome::Continue)
        }
        SceneCommand::Pop => {
            let name = scenes.active()?.name();
            match scenes.pop()? {
                StackSignal::Resumed => {
                    let resumed = scenes.active()?.name();
                    log::info!("Popped scene '{}', resuming '{}'", name, resumed);
                    Ok(Outcome::Continue)
                }
                StackSignal::Quit => {
                    log::info!("Popped last scene '{}'", name);
                    Ok(Outcome::Quit)
                }
            }
        }
        SceneCommand::ToggleFullscreen => Ok(Outcome::ToggleFullscreen),
        SceneCommand::Quit => Ok(Outcome::Quit),
    }
}
