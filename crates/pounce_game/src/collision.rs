//! Directional box-vs-box collision resolution.
//!
//! Every collidable carries two rects: the image rect it is drawn with and a
//! collision box, which may be smaller (the opaque part of the sprite) and
//! which only blocks on the edges its flags enable. The resolver compares a
//! single moving target against a list of candidates and returns one
//! displacement; it never mutates anything itself.
//!
//! A correction on an edge only fires when the target was on the far side of
//! that edge last frame, i.e. it crossed the edge during this move. Bodies that
//! were already overlapping before the move are left alone, which is what lets
//! one-way platforms be jumped through from below.

use glam::Vec2;
use pounce_core::geometry::{CollisionBox, Rect};

use crate::assets::ImageHandle;
use crate::error::ConfigError;
use crate::settings::CollidableSettings;

pub trait Collidable {
    /// Rect the entity is drawn into.
    fn rect(&self) -> Rect;
    fn collision_box(&self) -> &CollisionBox;
    /// Collision box top-left before the most recent move.
    fn last_pos(&self) -> Vec2;
}

/// Shared positional state of every collidable entity.
#[derive(Debug, Clone)]
pub struct Body {
    pub image: Option<ImageHandle>,
    pub rect: Rect,
    pub collision_box: CollisionBox,
    pub last_pos: Vec2,
    spawn: Vec2,
    box_offset: Vec2,
}

impl Body {
    /// Size comes from the image when there is one, else from the settings.
    /// Without an explicit collision rect the box is the image's opaque
    /// bounds (or the whole entity when there is no image). A box with no
    /// area is rejected.
    pub fn from_settings(
        name: &str,
        settings: &CollidableSettings,
        image: Option<ImageHandle>,
    ) -> Result<Self, ConfigError> {
        let size = match &image {
            Some(handle) => Vec2::from(handle.size()),
            None => Vec2::new(settings.width, settings.height),
        };
        let local_box = settings
            .collision_box
            .rect
            .or_else(|| image.as_ref().map(|handle| handle.opaque_bounds))
            .unwrap_or(Rect::from_top_left(Vec2::ZERO, size));
        if local_box.w <= 0.0 || local_box.h <= 0.0 {
            return Err(ConfigError::EmptyCollisionBox {
                entity: name.to_string(),
            });
        }

        let spawn = settings.topleft;
        let collision_box = CollisionBox::new(
            local_box.translated(spawn),
            settings.collision_box.edges,
        );
        Ok(Self {
            image,
            rect: Rect::from_top_left(spawn, size),
            last_pos: collision_box.rect.top_left(),
            collision_box,
            spawn,
            box_offset: local_box.top_left(),
        })
    }

    /// Provisional move: remembers where the box was, then shifts both rects.
    pub fn move_by(&mut self, delta: Vec2) {
        self.last_pos = self.collision_box.rect.top_left();
        self.translate(delta);
    }

    /// Shift both rects without touching `last_pos`.
    pub fn translate(&mut self, delta: Vec2) {
        self.rect.translate(delta);
        self.collision_box.rect.translate(delta);
    }

    /// Put the entity back where its settings placed it.
    pub fn reset(&mut self) {
        self.rect.set_top_left(self.spawn);
        self.collision_box
            .rect
            .set_top_left(self.spawn + self.box_offset);
        self.last_pos = self.collision_box.rect.top_left();
    }
}

impl Collidable for Body {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn collision_box(&self) -> &CollisionBox {
        &self.collision_box
    }

    fn last_pos(&self) -> Vec2 {
        self.last_pos
    }
}

/// Resolved displacement for one target. `bottom` names the candidate whose
/// top edge produced the winning y correction, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision<K = usize> {
    pub dx: f32,
    pub dy: f32,
    pub bottom: Option<K>,
}

impl<K> Collision<K> {
    pub fn none() -> Self {
        Self {
            dx: 0.0,
            dy: 0.0,
            bottom: None,
        }
    }

    pub fn displacement(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    pub fn is_none(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Single displacement that takes `target` out of every candidate it crossed
/// into this frame. Later candidates overwrite earlier corrections on the same
/// axis.
pub fn resolve<'a, K, C, T>(
    target: &T,
    candidates: impl IntoIterator<Item = (K, &'a C)>,
) -> Collision<K>
where
    K: Copy,
    C: Collidable + 'a,
    T: Collidable + ?Sized,
{
    let mut collision = Collision::none();
    let t_box = target.collision_box();
    let t = t_box.rect;
    let last = target.last_pos();

    for (key, candidate) in candidates {
        let c_box = candidate.collision_box();
        let c = c_box.rect;
        if !t.overlaps(&c) {
            continue;
        }

        if t_box.edges.top
            && c_box.edges.bottom
            && t.top() <= c.bottom()
            && t.bottom() > c.bottom()
            && last.y >= c.bottom()
        {
            collision.dy = c.bottom() - t.top();
            collision.bottom = None;
        }
        if t_box.edges.left
            && c_box.edges.right
            && t.left() <= c.right()
            && t.right() > c.right()
            && last.x >= c.right()
        {
            collision.dx = c.right() - t.left();
        }
        if t_box.edges.right
            && c_box.edges.left
            && t.right() >= c.left()
            && t.left() < c.left()
            && last.x + t.w <= c.left()
        {
            collision.dx = c.left() - t.right();
        }
        if t_box.edges.bottom
            && c_box.edges.top
            && t.bottom() >= c.top()
            && t.top() < c.top()
            && last.y + t.h <= c.top()
        {
            collision.dy = c.top() - t.bottom();
            collision.bottom = Some(key);
        }
    }

    collision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::solid_handle;
    use crate::settings::CollisionBoxSettings;
    use pounce_core::geometry::EdgeFlags;
    use proptest::prelude::*;

    struct Probe {
        collision_box: CollisionBox,
        last_pos: Vec2,
    }

    impl Probe {
        fn new(rect: Rect, last_pos: Vec2) -> Self {
            Self {
                collision_box: CollisionBox::new(rect, EdgeFlags::ALL),
                last_pos,
            }
        }

        fn with_edges(mut self, edges: EdgeFlags) -> Self {
            self.collision_box.edges = edges;
            self
        }
    }

    impl Collidable for Probe {
        fn rect(&self) -> Rect {
            self.collision_box.rect
        }

        fn collision_box(&self) -> &CollisionBox {
            &self.collision_box
        }

        fn last_pos(&self) -> Vec2 {
            self.last_pos
        }
    }

    fn settings(topleft: Vec2) -> CollidableSettings {
        CollidableSettings {
            topleft,
            image: None,
            width: 20.0,
            height: 30.0,
            color: [1.0; 4],
            collision_box: CollisionBoxSettings::default(),
            visible: true,
        }
    }

    #[test]
    fn falling_onto_floor_snaps_to_top_and_reports_contact() {
        let floor = Probe::new(Rect::new(0.0, 100.0, 200.0, 20.0), Vec2::new(0.0, 100.0));
        // Box moved from y=68 (bottom 98) to y=74 (bottom 104).
        let player = Probe::new(Rect::new(50.0, 74.0, 10.0, 30.0), Vec2::new(50.0, 68.0));

        let collision = resolve(&player, [(7usize, &floor)]);
        assert_eq!(collision.dx, 0.0);
        assert_eq!(collision.dy, -4.0);
        assert_eq!(collision.bottom, Some(7));
    }

    #[test]
    fn walking_into_wall_snaps_flush_against_left_edge() {
        let wall = Probe::new(Rect::new(100.0, 0.0, 20.0, 200.0), Vec2::new(100.0, 0.0));
        let player = Probe::new(Rect::new(93.0, 50.0, 10.0, 30.0), Vec2::new(89.0, 50.0));

        let collision = resolve(&player, [(0usize, &wall)]);
        assert_eq!(collision.dx, -3.0);
        assert_eq!(collision.dy, 0.0);
        assert_eq!(collision.bottom, None);
    }

    #[test]
    fn rising_into_ceiling_pushes_down_without_contact() {
        let ceiling = Probe::new(Rect::new(0.0, 0.0, 200.0, 40.0), Vec2::ZERO);
        let player = Probe::new(Rect::new(50.0, 36.0, 10.0, 30.0), Vec2::new(50.0, 42.0));

        let collision = resolve(&player, [(0usize, &ceiling)]);
        assert_eq!(collision.dy, 4.0);
        assert_eq!(collision.dx, 0.0);
        assert_eq!(collision.bottom, None);
    }

    #[test]
    fn last_candidate_wins_on_the_same_axis() {
        let low = Probe::new(Rect::new(0.0, 100.0, 100.0, 20.0), Vec2::ZERO);
        let high = Probe::new(Rect::new(0.0, 98.0, 100.0, 20.0), Vec2::ZERO);
        let player = Probe::new(Rect::new(10.0, 75.0, 10.0, 30.0), Vec2::new(10.0, 60.0));

        let collision = resolve(&player, [(0usize, &high), (1usize, &low)]);
        assert_eq!(collision.dy, -5.0);
        assert_eq!(collision.bottom, Some(1));

        let collision = resolve(&player, [(1usize, &low), (0usize, &high)]);
        assert_eq!(collision.dy, -7.0);
        assert_eq!(collision.bottom, Some(0));
    }

    #[test]
    fn one_way_platform_lets_target_pass_from_below() {
        let platform = Probe::new(Rect::new(0.0, 100.0, 100.0, 10.0), Vec2::ZERO).with_edges(
            EdgeFlags {
                top: true,
                ..EdgeFlags::NONE
            },
        );
        // Rising through the platform: the top edge of the target crosses the
        // platform's bottom, but the platform's bottom edge is disabled.
        let rising = Probe::new(Rect::new(10.0, 105.0, 10.0, 30.0), Vec2::new(10.0, 112.0));
        assert!(resolve(&rising, [(0usize, &platform)]).is_none());

        let landing = Probe::new(Rect::new(10.0, 72.0, 10.0, 30.0), Vec2::new(10.0, 69.0));
        let collision = resolve(&landing, [(0usize, &platform)]);
        assert_eq!(collision.dy, -2.0);
        assert_eq!(collision.bottom, Some(0));
    }

    #[test]
    fn disabled_target_edge_never_resolves() {
        let floor = Probe::new(Rect::new(0.0, 100.0, 200.0, 20.0), Vec2::ZERO);
        let ghost = Probe::new(Rect::new(50.0, 74.0, 10.0, 30.0), Vec2::new(50.0, 68.0))
            .with_edges(EdgeFlags {
                bottom: false,
                ..EdgeFlags::ALL
            });
        assert!(resolve(&ghost, [(0usize, &floor)]).is_none());
    }

    #[test]
    fn body_box_defaults_to_opaque_bounds_offset_by_top_left() {
        let mut handle = solid_handle("cat.png", 32, 32);
        handle.opaque_bounds = Rect::new(4.0, 6.0, 24.0, 26.0);
        let mut s = settings(Vec2::new(100.0, 50.0));
        s.image = Some("cat.png".to_string());

        let body = Body::from_settings("cat", &s, Some(handle)).expect("body builds");
        assert_eq!(body.rect, Rect::new(100.0, 50.0, 32.0, 32.0));
        assert_eq!(body.collision_box.rect, Rect::new(104.0, 56.0, 24.0, 26.0));
        assert_eq!(body.last_pos, Vec2::new(104.0, 56.0));
    }

    #[test]
    fn transparent_image_without_explicit_rect_is_rejected() {
        let mut handle = solid_handle("ghost.png", 16, 16);
        handle.opaque_bounds = Rect::default();
        let mut s = settings(Vec2::ZERO);
        s.image = Some("ghost.png".to_string());

        let err = Body::from_settings("ghost", &s, Some(handle.clone()))
            .expect_err("a box with no area never collides");
        assert!(matches!(err, ConfigError::EmptyCollisionBox { ref entity } if entity == "ghost"));

        // An explicit rect still gives the entity something to stand on.
        s.collision_box.rect = Some(Rect::new(0.0, 0.0, 16.0, 16.0));
        assert!(Body::from_settings("ghost", &s, Some(handle)).is_ok());
    }

    #[test]
    fn explicit_collision_rect_overrides_image_bounds() {
        let mut s = settings(Vec2::new(10.0, 10.0));
        s.collision_box.rect = Some(Rect::new(2.0, 0.0, 16.0, 30.0));
        let body = Body::from_settings("cat", &s, Some(solid_handle("cat.png", 20, 30)))
            .expect("body builds");
        assert_eq!(body.collision_box.rect, Rect::new(12.0, 10.0, 16.0, 30.0));
    }

    #[test]
    fn move_by_records_pre_move_box_position_and_reset_restores_spawn() {
        let mut s = settings(Vec2::new(10.0, 20.0));
        s.collision_box.rect = Some(Rect::new(2.0, 3.0, 16.0, 27.0));
        let mut body = Body::from_settings("crate", &s, None).expect("body builds");

        body.move_by(Vec2::new(5.0, -2.0));
        assert_eq!(body.last_pos, Vec2::new(12.0, 23.0));
        assert_eq!(body.rect.top_left(), Vec2::new(15.0, 18.0));
        assert_eq!(body.collision_box.rect.top_left(), Vec2::new(17.0, 21.0));

        body.translate(Vec2::new(0.0, 1.0));
        assert_eq!(body.last_pos, Vec2::new(12.0, 23.0));

        body.reset();
        assert_eq!(body.rect.top_left(), Vec2::new(10.0, 20.0));
        assert_eq!(body.collision_box.rect.top_left(), Vec2::new(12.0, 23.0));
        assert_eq!(body.last_pos, Vec2::new(12.0, 23.0));
    }

    // Integer-valued coordinates keep the snap arithmetic exact in f32. The
    // candidate is placed near the target so overlaps are common.
    fn pair_strategy() -> impl Strategy<Value = (Rect, Rect)> {
        (
            (-200i32..200, -200i32..200, 1i32..80, 1i32..80),
            (-80i32..80, -80i32..80, 1i32..80, 1i32..80),
        )
            .prop_map(|((x, y, w, h), (ox, oy, cw, ch))| {
                (
                    Rect::new(x as f32, y as f32, w as f32, h as f32),
                    Rect::new((x + ox) as f32, (y + oy) as f32, cw as f32, ch as f32),
                )
            })
    }

    fn step_strategy() -> impl Strategy<Value = Vec2> {
        (-40i32..40, -40i32..40).prop_map(|(x, y)| Vec2::new(x as f32, y as f32))
    }

    proptest! {
        #[test]
        fn disjoint_boxes_never_resolve((target, candidate) in pair_strategy(), step in step_strategy()) {
            let probe = Probe::new(target, target.top_left() - step);
            let other = Probe::new(candidate, candidate.top_left());
            let collision = resolve(&probe, [(0usize, &other)]);
            if !target.overlaps(&candidate) {
                prop_assert_eq!(collision, Collision::none());
            }
        }

        #[test]
        fn already_overlapping_before_move_is_left_alone(
            (target, candidate) in pair_strategy(),
            step in step_strategy(),
        ) {
            let before = target.translated(-step);
            let probe = Probe::new(target, before.top_left());
            let other = Probe::new(candidate, candidate.top_left());
            let collision = resolve(&probe, [(0usize, &other)]);
            if before.overlaps(&candidate) {
                prop_assert!(collision.is_none());
            }
        }

        #[test]
        fn corrections_leave_edges_flush((target, candidate) in pair_strategy(), step in step_strategy()) {
            let probe = Probe::new(target, target.top_left() - step);
            let other = Probe::new(candidate, candidate.top_left());
            let collision = resolve(&probe, [(0usize, &other)]);
            let moved = target.translated(collision.displacement());

            if collision.dy != 0.0 {
                prop_assert!(
                    moved.bottom() == candidate.top() || moved.top() == candidate.bottom()
                );
            }
            if collision.dx != 0.0 {
                prop_assert!(
                    moved.right() == candidate.left() || moved.left() == candidate.right()
                );
            }
            if collision.bottom.is_some() {
                prop_assert_eq!(moved.bottom(), candidate.top());
            }
        }
    }
}
