use pounce_core::geometry::Rect;
use pounce_core::input::{InputEvent, InputState, Key};
use pounce_core::viewport::{GAME_HEIGHT, GAME_WIDTH};
use pounce_render::SpriteBatch;

use super::{Scene, SceneCommand};
use crate::assets::ImageRegistry;
use crate::character::{Character, MoveInput};
use crate::collision::resolve;
use crate::error::ConfigError;
use crate::settings::{CatGameSettings, SettingsCache};
use crate::surface::{Surface, SurfaceSet};

/// The platforming scene: one player character and the surfaces it moves on.
pub struct CatGameScene {
    background: [f32; 4],
    player: Character,
    surfaces: SurfaceSet,
}

impl CatGameScene {
    pub fn from_settings(
        game: &CatGameSettings,
        settings: &mut SettingsCache,
        images: &mut ImageRegistry,
    ) -> Result<Self, ConfigError> {
        let player_settings = settings.character(&game.player)?;
        let player_image = images.load_optional(player_settings.collidable.image.as_deref())?;
        let player = Character::from_settings(&game.player, &player_settings, player_image)?;

        let mut surfaces = SurfaceSet::new();
        for file in &game.surfaces {
            let surface_settings = settings.surface(file)?;
            let image = images.load_optional(surface_settings.collidable.image.as_deref())?;
            surfaces.push(Surface::from_settings(file, &surface_settings, image)?);
        }
        log::info!("Cat game built with {} surfaces", surfaces.len());

        Ok(Self {
            background: game.background,
            player,
            surfaces,
        })
    }

    /// One physics tick for the given held keys.
    pub fn step(&mut self, input: MoveInput) {
        self.player.refresh_support(&self.surfaces);
        self.player.move_with(input, &self.surfaces);
        let collision = resolve(&self.player, self.surfaces.visible());
        self.player.handle_collision(&collision);

        if self.player.body.rect.top() > GAME_HEIGHT {
            log::info!("Player fell out of the level, respawning");
            self.player.reset();
        }
    }
}

impl Scene for CatGameScene {
    fn name(&self) -> &'static str {
        "cat_game"
    }

    fn handle_input(&mut self, event: &InputEvent) -> SceneCommand {
        match event {
            InputEvent::KeyPressed(Key::Escape) => SceneCommand::Pop,
            _ => SceneCommand::None,
        }
    }

    fn tick(&mut self, _dt: f32, input: &InputState) {
        self.step(MoveInput::from_input(input));
    }

    fn draw(&self, batch: &mut SpriteBatch) {
        batch.push_rect(
            Rect::new(0.0, 0.0, GAME_WIDTH, GAME_HEIGHT),
            self.background,
        );
        self.surfaces.draw(batch);
        self.player.draw(batch);
    }
}
