//! Recorded input sequences for deterministic physics tests.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::character::MoveInput;
use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<MoveInput> {
        self.frames
            .iter()
            .flat_map(|frame| {
                let input = MoveInput {
                    right: frame.right,
                    left: frame.left,
                    jump: frame.jump,
                };
                std::iter::repeat(input).take(frame.repeat.max(1) as usize)
            })
            .collect()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let replay: ReplaySequence =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if replay.frames.is_empty() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: "frames list is empty".to_string(),
        });
    }
    Ok(replay)
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::tests::{player_at, tick};
    use crate::settings::tests::temp_dir;
    use crate::surface::tests::block;
    use crate::surface::SurfaceSet;
    use glam::Vec2;
    use pounce_core::geometry::Rect;

    #[test]
    fn replay_file_parses_and_expands() {
        let dir = temp_dir("replay_parse");
        let path = dir.join("replay.json");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump": true },
                { "left": true, "repeat": 0 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[0].right && !expanded[0].jump);
        assert!(expanded[3].jump);
        assert!(expanded[4].left);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let dir = temp_dir("replay_empty");
        let path = dir.join("replay.json");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");

        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn replayed_run_is_stopped_by_a_wall_too_tall_to_jump() {
        let dir = temp_dir("replay_wall");
        let path = dir.join("replay.json");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 60 },
                { "right": true, "jump": true },
                { "right": true, "repeat": 120 },
                { "left": true, "repeat": 45 },
                { "left": true, "right": true, "jump": true, "repeat": 30 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let inputs = replay.expanded_inputs();
        assert_eq!(inputs.len(), 256);

        let mut surfaces = SurfaceSet::new();
        let floor = surfaces.push(block(Rect::new(0.0, 320.0, 640.0, 40.0), 0.5));
        surfaces.push(block(Rect::new(300.0, 200.0, 20.0, 120.0), 0.5));
        let mut player = player_at(Vec2::new(100.0, 280.0));

        // Run right into the wall, jump against it, keep pushing.
        for input in &inputs[..181] {
            tick(&mut player, *input, &surfaces);
            assert!(player.body.collision_box.rect.right() <= 300.0);
        }
        assert_eq!(player.body.rect.top_left(), Vec2::new(280.0, 300.0));
        assert_eq!(player.velocity, Vec2::ZERO);
        assert!(player.is_grounded());
        assert_eq!(player.standing_on, Some(floor));

        // Back off to the left: friction eats half a unit per tick until
        // the speed cap is reached.
        for input in &inputs[181..226] {
            tick(&mut player, *input, &surfaces);
        }
        assert_eq!(player.body.rect.top_left(), Vec2::new(114.0, 300.0));
        assert_eq!(player.velocity, Vec2::new(-4.0, 0.0));
        assert!(player.inverted);
        assert_eq!(player.standing_on, Some(floor));

        // Opposing keys cancel in the air, so the jump keeps its momentum.
        for input in &inputs[226..] {
            tick(&mut player, *input, &surfaces);
        }
        assert_eq!(player.body.rect.top_left(), Vec2::new(-6.0, 277.5));
        assert_eq!(player.velocity, Vec2::new(-4.0, 6.5));
        assert!(player.jumping);
        assert!(player.inverted);
        assert_eq!(player.standing_on, None);

        let _ = fs::remove_dir_all(dir);
    }
}
