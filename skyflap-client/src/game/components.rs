//! Core 2D game components
//!
//! The simulation owns every body. Bevy entities here are only sprites that
//! mirror a simulated body, plus static scenery.

use bevy::prelude::*;

use skyflap::game::state::Tint;
use skyflap::game::world::{Body, BodyKind};
use skyflap::game::state::EntityId;

// ============================================================================
// BODY MIRRORS
// ============================================================================

/// Sprite mirroring a simulated body
#[derive(Component)]
pub struct BodyLink(pub EntityId);

/// Player sprite marker
#[derive(Component)]
pub struct PlayerSprite;

/// Obstacle sprite marker
#[derive(Component)]
pub struct ObstacleSprite;

// ============================================================================
// SCENERY
// ============================================================================

/// Sky backdrop
#[derive(Component)]
pub struct Backdrop;

/// Ground strip below the ground surface
#[derive(Component)]
pub struct Ground;

// ============================================================================
// COLORS
// ============================================================================

pub const SKY_COLOR: Color = Color::srgb(0.44, 0.77, 0.81);
pub const GROUND_COLOR: Color = Color::srgb(0.87, 0.85, 0.58);
pub const PLAYER_COLOR: Color = Color::srgb(0.98, 0.82, 0.18);
pub const OBSTACLE_COLOR: Color = Color::srgb(0.45, 0.75, 0.18);

/// Base color for a body before tinting
pub fn base_color(kind: BodyKind) -> Color {
    match kind {
        BodyKind::Player => PLAYER_COLOR,
        BodyKind::Obstacle(_) => OBSTACLE_COLOR,
    }
}

/// Multiply a base color by a sim tint (white-point tint like a sprite shader)
pub fn tinted(base: Color, tint: Option<Tint>) -> Color {
    let Some(tint) = tint else {
        return base;
    };
    let (r, g, b) = tint.rgb();
    let base = base.to_srgba();
    Color::srgb(
        base.red * r as f32 / 255.0,
        base.green * g as f32 / 255.0,
        base.blue * b as f32 / 255.0,
    )
}

// ============================================================================
// COORDINATES
// ============================================================================

/// Sim world (origin top-left, +Y down) to screen (origin centre, +Y up)
pub fn world_to_screen(point: (f32, f32), world_size: (f32, f32)) -> Vec2 {
    Vec2::new(point.0 - world_size.0 / 2.0, world_size.1 / 2.0 - point.1)
}

/// Screen-space centre and size of a body's hitbox
pub fn body_rect(body: &Body, world_size: (f32, f32)) -> (Vec2, Vec2) {
    let bounds = body.bounds();
    let (min_x, min_y) = bounds.min.to_floats();
    let (max_x, max_y) = bounds.max.to_floats();
    let center = world_to_screen(((min_x + max_x) / 2.0, (min_y + max_y) / 2.0), world_size);
    (center, Vec2::new(max_x - min_x, max_y - min_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_screen() {
        let size = (800.0, 600.0);
        assert_eq!(world_to_screen((400.0, 300.0), size), Vec2::ZERO);
        assert_eq!(world_to_screen((0.0, 0.0), size), Vec2::new(-400.0, 300.0));
        assert_eq!(world_to_screen((800.0, 536.0), size), Vec2::new(400.0, -236.0));
    }

    #[test]
    fn test_failure_tint_keeps_red() {
        let red = tinted(Color::WHITE, Some(Tint(0xFF0000))).to_srgba();
        assert_eq!((red.red, red.green, red.blue), (1.0, 0.0, 0.0));
        assert_eq!(tinted(PLAYER_COLOR, None), PLAYER_COLOR);
    }
}
