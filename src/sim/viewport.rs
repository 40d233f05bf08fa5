//! Viewport scroll model
//!
//! The world is stored once, in world space (origin bottom-left, y up).
//! The viewport only tracks how far the camera has scrolled; screen
//! positions are derived on read as `world_y - scroll_offset`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Interval;

/// Vertical scrolling camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// World distance scrolled so far (bottom edge of the screen in world y)
    pub scroll_offset: f32,
    /// World units per second
    pub scroll_rate: f32,
    /// Total level height in world units
    pub world_height: f32,
    /// Visible height in world units
    pub screen_height: f32,
}

impl Viewport {
    pub fn new(world_height: f32, screen_height: f32, scroll_rate: f32) -> Self {
        Self {
            scroll_offset: 0.0,
            scroll_rate,
            world_height,
            screen_height,
        }
    }

    /// Largest reachable scroll offset (top of the level at top of screen)
    #[inline]
    pub fn max_offset(&self) -> f32 {
        (self.world_height - self.screen_height).max(0.0)
    }

    /// Scroll forward by `scroll_rate * dt`
    ///
    /// Returns the distance actually scrolled: zero once the offset is pinned
    /// at `max_offset`, and never more than the remaining headroom.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let before = self.scroll_offset;
        let delta = (self.scroll_rate * dt).max(0.0);
        self.scroll_offset = (before + delta).clamp(0.0, self.max_offset());
        self.scroll_offset - before
    }

    /// The camera has reached the top of the level
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.scroll_offset >= self.max_offset()
    }

    #[inline]
    pub fn to_screen_y(&self, world_y: f32) -> f32 {
        world_y - self.scroll_offset
    }

    #[inline]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x, self.to_screen_y(world.y))
    }

    #[inline]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x, screen.y + self.scroll_offset)
    }

    /// World y-range currently on screen
    pub fn visible_range(&self) -> Interval {
        Interval::new(self.scroll_offset, self.scroll_offset + self.screen_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn level_viewport() -> Viewport {
        // 70 tiles of 64px, 800px screen, 64px/s
        Viewport::new(70.0 * 64.0, 800.0, 64.0)
    }

    #[test]
    fn test_advance_accumulates() {
        let mut vp = level_viewport();
        for _ in 0..3 {
            assert_eq!(vp.advance(1.0), 64.0);
        }
        assert_eq!(vp.scroll_offset, 192.0);
    }

    #[test]
    fn test_advance_clamps_at_top() {
        let mut vp = level_viewport();
        assert_eq!(vp.max_offset(), 3680.0);

        let mut ticks = 0;
        while !vp.is_finished() {
            vp.advance(1.0);
            ticks += 1;
            assert!(ticks < 100, "viewport never finished");
        }
        assert_eq!(vp.scroll_offset, 3680.0);
        // 57 full steps reach 3648, the 58th only has 32 left
        assert_eq!(ticks, 58);

        assert_eq!(vp.advance(1.0), 0.0);
        assert_eq!(vp.scroll_offset, 3680.0);
    }

    #[test]
    fn test_advance_zero_is_noop() {
        let mut vp = level_viewport();
        vp.advance(2.5);
        let before = vp.scroll_offset;
        assert_eq!(vp.advance(0.0), 0.0);
        assert_eq!(vp.scroll_offset, before);
    }

    #[test]
    fn test_short_level_never_scrolls() {
        let mut vp = Viewport::new(600.0, 800.0, 64.0);
        assert_eq!(vp.max_offset(), 0.0);
        assert_eq!(vp.advance(1.0), 0.0);
        assert!(vp.is_finished());
    }

    #[test]
    fn test_screen_world_round_trip() {
        let mut vp = level_viewport();
        vp.advance(1.5);
        let world = Vec2::new(10.0, 500.0);
        let screen = vp.to_screen(world);
        assert_eq!(screen, Vec2::new(10.0, 404.0));
        assert_eq!(vp.to_world(screen), world);
        assert_eq!(vp.visible_range(), Interval::new(96.0, 896.0));
    }

    proptest! {
        #[test]
        fn prop_offset_stays_in_range(steps in proptest::collection::vec(-1.0f32..5.0, 0..200)) {
            let mut vp = level_viewport();
            let mut last = vp.scroll_offset;
            for dt in steps {
                vp.advance(dt);
                prop_assert!(vp.scroll_offset >= 0.0);
                prop_assert!(vp.scroll_offset <= vp.max_offset());
                prop_assert!(vp.scroll_offset >= last);
                last = vp.scroll_offset;
            }
        }
    }
}
