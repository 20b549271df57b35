//! Platformer - a small 2D platformer with rigid body physics
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, resolution, controller)
//! - `scene`: Level setup and the per-frame driver
//! - `renderer`: Draw targets and vertex generation
//! - `settings`: Data-driven tuning loaded from JSON

pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use scene::{FrameOutcome, HostInput, Level, SceneDriver};
pub use settings::Settings;

/// Game configuration constants
///
/// Velocities are in pixels per frame, screen space has y growing downward.
pub mod consts {
    /// Target frame rate of the host loop
    pub const FPS: u32 = 60;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Downward acceleration applied to every unlocked body (pixels/frame²)
    pub const GRAVITY: f32 = 0.25;

    /// Horizontal velocity added per frame while a direction is held
    pub const MOVE_DELTA: f32 = 1.0;
    /// Horizontal speed above which input stops adding velocity
    pub const MAX_WALK_SPEED: f32 = 2.0;
    /// Upward launch speed of a jump
    pub const JUMP_VELOCITY: f32 = 4.0;

    /// Fraction of penetration removed per contact (Baumgarte-style)
    pub const CORRECTION_PERCENT: f32 = 0.6;

    /// Default bounciness
    pub const DEFAULT_RESTITUTION: f32 = 0.5;
    /// Player bounciness
    pub const PLAYER_RESTITUTION: f32 = 0.25;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 10.0;

    /// Border wall thickness
    pub const WALL_THICKNESS: f32 = 20.0;
    /// Snap grid for walls placed with the mouse
    pub const GRID_SIZE: f32 = 20.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_SPEED: f32 = 8.0;

    /// Goal size (square)
    pub const GOAL_SIZE: f32 = 20.0;
    /// Goals the player must collect to clear a level
    pub const GOALS_TO_WIN: u32 = 2;

    /// Tolerance used when comparing wall edges for merging
    pub const EDGE_EPSILON: f32 = 1e-3;
}

/// RGB colour used when drawing a body
pub type Color = [u8; 3];

/// Colours for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0, 0, 0];
    pub const WALL: Color = [50, 50, 200];
    pub const WALL_LIGHT: Color = [200, 200, 200];
    pub const PLATFORM_DARK: Color = [50, 50, 0];
    pub const PLACED_WALL: Color = [50, 50, 255];
    pub const PLAYER: Color = [255, 50, 50];
    pub const GOAL: Color = [50, 220, 80];
    pub const BULLET: Color = [255, 255, 255];
    pub const PROP: Color = [160, 120, 60];
}

/// Convert an 8-bit RGB colour to normalized RGBA
#[inline]
pub fn color_to_rgba(color: Color) -> [f32; 4] {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        1.0,
    ]
}
