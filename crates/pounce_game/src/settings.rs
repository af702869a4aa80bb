//! Typed settings records and their loaders.
//!
//! Every settings file deserialises straight into one of the structs below
//! and is validated before anything is built from it. Shared geometry and
//! collision options live in `CollidableSettings`, which character and
//! surface settings embed by value (flattened, so the JSON stays one level
//! deep).
//!
//! `SettingsCache` memoises parsed files by name. It is owned by the engine
//! and read-only after first load: re-pushing a scene rebuilds the scene from
//! the cached records rather than re-reading disk.

use glam::Vec2;
use pounce_core::geometry::{EdgeFlags, Rect};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ConfigError;

pub const GAME_SETTINGS_FILE: &str = "game.json";
pub const MAIN_MENU_SETTINGS_FILE: &str = "main_menu.json";
pub const OPTIONS_MENU_SETTINGS_FILE: &str = "options_menu.json";
pub const CAT_GAME_SETTINGS_FILE: &str = "cat_game.json";

#[derive(Debug, Deserialize, Clone)]
pub struct GameSettings {
    #[serde(default = "default_title")]
    pub title: String,
    pub framerate: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    #[serde(default)]
    pub fullscreen: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CollisionBoxSettings {
    #[serde(flatten)]
    pub edges: EdgeFlags,
    /// Box relative to the entity's top-left. Falls back to the opaque
    /// bounds of the image (or the full entity size without an image).
    #[serde(default)]
    pub rect: Option<Rect>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CollidableSettings {
    pub topleft: Vec2,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default)]
    pub collision_box: CollisionBoxSettings,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CharacterSettings {
    #[serde(flatten)]
    pub collidable: CollidableSettings,
    pub speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub acceleration_frames: u32,
    #[serde(default = "default_air_control_divisor")]
    pub air_control_divisor: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SurfaceSettings {
    #[serde(flatten)]
    pub collidable: CollidableSettings,
    pub friction_coefficient: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatGameSettings {
    #[serde(default = "default_background")]
    pub background: [f32; 4],
    pub player: String,
    pub surfaces: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    StartGame,
    Options,
    ToggleFullscreen,
    Back,
    Quit,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ButtonSettings {
    pub label: String,
    pub action: MenuAction,
    pub topleft: Vec2,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default = "default_hover_color")]
    pub hover_color: [f32; 4],
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MenuSettings {
    #[serde(default = "default_background")]
    pub background: [f32; 4],
    #[serde(default)]
    pub buttons: Vec<ButtonSettings>,
}

fn read_settings<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn checked<T>(
    path: &Path,
    settings: T,
    validate: fn(&T) -> Result<(), String>,
) -> Result<T, ConfigError> {
    validate(&settings).map_err(|reason| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(settings)
}

pub fn load_game_settings(path: &Path) -> Result<GameSettings, ConfigError> {
    checked(path, read_settings(path)?, validate_game)
}

pub fn load_character_settings(path: &Path) -> Result<CharacterSettings, ConfigError> {
    checked(path, read_settings(path)?, validate_character)
}

pub fn load_surface_settings(path: &Path) -> Result<SurfaceSettings, ConfigError> {
    checked(path, read_settings(path)?, validate_surface)
}

pub fn load_cat_game_settings(path: &Path) -> Result<CatGameSettings, ConfigError> {
    checked(path, read_settings(path)?, validate_cat_game)
}

pub fn load_menu_settings(path: &Path) -> Result<MenuSettings, ConfigError> {
    checked(path, read_settings(path)?, validate_menu)
}

fn validate_game(settings: &GameSettings) -> Result<(), String> {
    if settings.framerate == 0 {
        return Err("framerate must be > 0".to_string());
    }
    if settings.screen_width == 0 || settings.screen_height == 0 {
        return Err("screen_width and screen_height must be > 0".to_string());
    }
    Ok(())
}

fn validate_collidable(settings: &CollidableSettings) -> Result<(), String> {
    if settings.image.is_none() && (settings.width <= 0.0 || settings.height <= 0.0) {
        return Err("an entity without an image needs width and height > 0".to_string());
    }
    if let Some(rect) = &settings.collision_box.rect {
        if rect.w <= 0.0 || rect.h <= 0.0 {
            return Err("collision_box.rect must have width and height > 0".to_string());
        }
    }
    Ok(())
}

fn validate_character(settings: &CharacterSettings) -> Result<(), String> {
    validate_collidable(&settings.collidable)?;
    if settings.speed <= 0.0 {
        return Err("speed must be > 0".to_string());
    }
    if settings.acceleration_frames == 0 {
        return Err("acceleration_frames must be >= 1".to_string());
    }
    if settings.jump_speed < 0.0 || settings.gravity < 0.0 {
        return Err("jump_speed and gravity must be >= 0".to_string());
    }
    if settings.terminal_velocity <= 0.0 {
        return Err("terminal_velocity must be > 0".to_string());
    }
    if settings.air_control_divisor < 1.0 {
        return Err("air_control_divisor must be >= 1".to_string());
    }
    Ok(())
}

fn validate_surface(settings: &SurfaceSettings) -> Result<(), String> {
    validate_collidable(&settings.collidable)?;
    if settings.friction_coefficient < 0.0 {
        return Err("friction_coefficient must be >= 0".to_string());
    }
    Ok(())
}

fn validate_cat_game(settings: &CatGameSettings) -> Result<(), String> {
    if settings.player.is_empty() {
        return Err("player settings file is required".to_string());
    }
    if settings.surfaces.is_empty() {
        log::warn!("Cat game has no surfaces. The player will fall forever.");
    }
    Ok(())
}

fn validate_menu(settings: &MenuSettings) -> Result<(), String> {
    if settings.buttons.is_empty() {
        log::warn!("Menu has no buttons. Only Escape will leave it.");
    }
    for button in &settings.buttons {
        if button.width <= 0.0 || button.height <= 0.0 {
            return Err(format!(
                "button '{}' must have width and height > 0",
                button.label
            ));
        }
    }
    Ok(())
}

/// Parsed settings keyed by file name, one map per record type.
pub struct SettingsCache {
    root: PathBuf,
    characters: HashMap<String, Arc<CharacterSettings>>,
    surfaces: HashMap<String, Arc<SurfaceSettings>>,
    cat_games: HashMap<String, Arc<CatGameSettings>>,
    menus: HashMap<String, Arc<MenuSettings>>,
}

impl SettingsCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            characters: HashMap::new(),
            surfaces: HashMap::new(),
            cat_games: HashMap::new(),
            menus: HashMap::new(),
        }
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Game settings are read once at startup and handed to the loop by
    /// value, so they are not cached here.
    pub fn game(&self) -> Result<GameSettings, ConfigError> {
        load_game_settings(&self.path_of(GAME_SETTINGS_FILE))
    }

    pub fn character(&mut self, file: &str) -> Result<Arc<CharacterSettings>, ConfigError> {
        cached(&mut self.characters, &self.root, file, load_character_settings)
    }

    pub fn surface(&mut self, file: &str) -> Result<Arc<SurfaceSettings>, ConfigError> {
        cached(&mut self.surfaces, &self.root, file, load_surface_settings)
    }

    pub fn cat_game(&mut self, file: &str) -> Result<Arc<CatGameSettings>, ConfigError> {
        cached(&mut self.cat_games, &self.root, file, load_cat_game_settings)
    }

    pub fn menu(&mut self, file: &str) -> Result<Arc<MenuSettings>, ConfigError> {
        cached(&mut self.menus, &self.root, file, load_menu_settings)
    }
}

fn cached<T>(
    map: &mut HashMap<String, Arc<T>>,
    root: &Path,
    file: &str,
    load: fn(&Path) -> Result<T, ConfigError>,
) -> Result<Arc<T>, ConfigError> {
    if let Some(settings) = map.get(file) {
        return Ok(Arc::clone(settings));
    }
    let path = root.join(file);
    let settings = Arc::new(load(&path)?);
    log::info!("Loaded settings '{}'", path.display());
    map.insert(file.to_string(), Arc::clone(&settings));
    Ok(settings)
}

fn default_title() -> String {
    "Pounce".to_string()
}

const fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

const fn default_hover_color() -> [f32; 4] {
    [0.85, 0.85, 1.0, 1.0]
}

const fn default_background() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

const fn default_visible() -> bool {
    true
}

const fn default_air_control_divisor() -> f32 {
    6.0
}
