use pounce_core::geometry::Rect;
use pounce_core::input::{InputEvent, InputState, Key, MouseBtn};
use pounce_core::viewport::{GAME_HEIGHT, GAME_WIDTH};
use pounce_render::SpriteBatch;

use super::{Scene, SceneCommand, SceneRequest};
use crate::assets::ImageRegistry;
use crate::button::Button;
use crate::error::ConfigError;
use crate::settings::{MenuAction, MenuSettings};

/// A background plus a column of buttons. Menus are event driven and do
/// nothing on tick.
pub struct MenuScene {
    name: &'static str,
    background: [f32; 4],
    buttons: Vec<Button>,
}

impl MenuScene {
    pub fn from_settings(
        name: &'static str,
        settings: &MenuSettings,
        images: &mut ImageRegistry,
    ) -> Result<Self, ConfigError> {
        let buttons = settings
            .buttons
            .iter()
            .map(|button| {
                let image = images.load_optional(button.image.as_deref())?;
                Ok(Button::from_settings(button, image))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self {
            name,
            background: settings.background,
            buttons,
        })
    }
}

fn command_for(action: MenuAction) -> SceneCommand {
    match action {
        MenuAction::StartGame => SceneCommand::Push(SceneRequest::CatGame),
        MenuAction::Options => SceneCommand::Push(SceneRequest::OptionsMenu),
        MenuAction::ToggleFullscreen => SceneCommand::ToggleFullscreen,
        MenuAction::Back => SceneCommand::Pop,
        MenuAction::Quit => SceneCommand::Quit,
    }
}

impl Scene for MenuScene {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle_input(&mut self, event: &InputEvent) -> SceneCommand {
        match *event {
            InputEvent::KeyPressed(Key::Escape) => SceneCommand::Pop,
            InputEvent::PointerMoved(position) => {
                for button in &mut self.buttons {
                    button.set_hover(position);
                }
                SceneCommand::None
            }
            InputEvent::PointerPressed {
                button: MouseBtn::Left,
                position,
            } => {
                for button in &self.buttons {
                    if let Some(action) = button.click(position) {
                        log::debug!("Menu '{}': '{}' -> {:?}", self.name, button.label, action);
                        return command_for(action);
                    }
                }
                SceneCommand::None
            }
            _ => SceneCommand::None,
        }
    }

    fn tick(&mut self, _dt: f32, _input: &InputState) {}

    fn draw(&self, batch: &mut SpriteBatch) {
        batch.push_rect(
            Rect::new(0.0, 0.0, GAME_WIDTH, GAME_HEIGHT),
            self.background,
        );
        for button in &self.buttons {
            button.draw(batch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::tests::button;
    use glam::Vec2;

    fn menu() -> MenuScene {
        MenuScene {
            name: "test_menu",
            background: [0.5, 0.0, 0.5, 1.0],
            buttons: vec![
                button(MenuAction::StartGame, Vec2::new(0.0, 0.0)),
                button(MenuAction::Back, Vec2::new(0.0, 40.0)),
            ],
        }
    }

    #[test]
    fn escape_pops_the_menu() {
        let mut scene = menu();
        assert_eq!(
            scene.handle_input(&InputEvent::KeyPressed(Key::Escape)),
            SceneCommand::Pop
        );
    }

    #[test]
    fn left_click_dispatches_button_action() {
        let mut scene = menu();
        let click = |x: f32, y: f32| InputEvent::PointerPressed {
            button: MouseBtn::Left,
            position: Vec2::new(x, y),
        };
        assert_eq!(
            scene.handle_input(&click(10.0, 10.0)),
            SceneCommand::Push(SceneRequest::CatGame)
        );
        assert_eq!(scene.handle_input(&click(10.0, 50.0)), SceneCommand::Pop);
        assert_eq!(scene.handle_input(&click(10.0, 35.0)), SceneCommand::None);
    }

    #[test]
    fn right_click_is_ignored() {
        let mut scene = menu();
        let event = InputEvent::PointerPressed {
            button: MouseBtn::Right,
            position: Vec2::new(10.0, 10.0),
        };
        assert_eq!(scene.handle_input(&event), SceneCommand::None);
    }

    #[test]
    fn pointer_motion_updates_hover() {
        let mut scene = menu();
        scene.handle_input(&InputEvent::PointerMoved(Vec2::new(10.0, 45.0)));
        let hovered: Vec<bool> = scene.buttons.iter().map(Button::hovered).collect();
        assert_eq!(hovered, vec![false, true]);
    }

    #[test]
    fn draws_background_then_buttons() {
        let scene = menu();
        let mut batch = SpriteBatch::new();
        scene.draw(&mut batch);
        assert_eq!(batch.quad_count(), 3);
        assert_eq!(batch.vertices()[0].color, [0.5, 0.0, 0.5, 1.0]);
        assert_eq!(batch.vertices()[2].position, [GAME_WIDTH, GAME_HEIGHT]);
    }
}
