//! Levels and the per-frame scene driver
//!
//! The host (window, event loop, frame pacing) samples its input into a
//! `HostInput` once per tick and calls `SceneDriver::frame`. Everything else
//! happens here: input is applied, physics is stepped, the frame is drawn, and
//! the level advances once enough goals are collected.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::colors;
use crate::consts::{EDGE_EPSILON, GOAL_SIZE, PLAYER_RADIUS, WALL_THICKNESS};
use crate::renderer::Canvas;
use crate::settings::Settings;
use crate::sim::{
    BodyHandle, CharacterController, InputState, RigidBody, RoleTag, StepEvent, World,
    step_with_correction,
};

/// Playable levels, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    /// Bordered room with a platform, a staircase and two goals
    One,
    /// Same room in a different palette, no goals; the last level
    Two,
}

impl Level {
    pub fn next(self) -> Option<Level> {
        match self {
            Level::One => Some(Level::Two),
            Level::Two => None,
        }
    }

    /// Populate an empty world and return the player's handle
    pub fn build(self, world: &mut World, settings: &Settings) -> BodyHandle {
        let (w, h, t) = (settings.width, settings.height, WALL_THICKNESS);
        let (border, platform) = match self {
            Level::One => (colors::WALL, colors::WALL),
            Level::Two => (colors::WALL_LIGHT, colors::PLATFORM_DARK),
        };

        // Screen borders
        for (x, y, width, height) in [
            (0.0, 0.0, w, t),
            (0.0, 0.0, t, h),
            (w - t, 0.0, t, h),
            (0.0, h - t, w, t),
        ] {
            world.insert(RigidBody::wall(x, y, width, height).with_color(border));
        }

        // Floating platform spanning half the screen
        world.insert(
            RigidBody::wall((w / 4.0).floor(), (h / 2.0).floor(), (w / 2.0).floor(), t)
                .with_color(platform),
        );

        // Staircase of small blocks from the top-left corner
        for i in 0..20 {
            let offset = 10.0 + i as f32 * 10.0;
            world.insert(RigidBody::wall(offset, offset, 10.0, 10.0).with_color(colors::WALL));
        }

        if self == Level::One {
            let floor_top = h - t;
            world.insert(RigidBody::goal(w - 80.0, floor_top - GOAL_SIZE));
            world.insert(RigidBody::goal(40.0, floor_top - GOAL_SIZE));
        }

        world.insert(RigidBody::player(Vec2::new((w / 2.0).floor(), 50.0), PLAYER_RADIUS))
    }
}

/// Raw input gathered by the host for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostInput {
    /// Window close requested
    pub quit: bool,
    pub escape: bool,
    /// Jump key went down this frame
    pub jump_pressed: bool,
    pub left_held: bool,
    pub right_held: bool,
    pub down_held: bool,
    /// Primary clicks: place a wall snapped to the grid
    pub left_clicks: Vec<Vec2>,
    /// Secondary clicks: fire a bullet toward the point
    pub right_clicks: Vec<Vec2>,
}

impl HostInput {
    pub fn input_state(&self) -> InputState {
        InputState {
            left: self.left_held,
            right: self.right_held,
            jump: self.jump_pressed,
            down: self.down_held,
        }
    }
}

/// Result of one call to `SceneDriver::frame`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Running,
    /// The previous level was cleared and this one has been set up
    LevelChanged(Level),
    /// The host should exit its loop
    Stopped,
}

/// Owns the world for the current level and runs frames
pub struct SceneDriver {
    settings: Settings,
    world: World,
    controller: CharacterController,
    level: Level,
    running: bool,
    frame_count: u64,
    last_events: Vec<StepEvent>,
}

impl SceneDriver {
    /// Start at the first level
    pub fn new(settings: Settings) -> Self {
        Self::with_level(settings, Level::One)
    }

    pub fn with_level(settings: Settings, level: Level) -> Self {
        let mut world = World::new();
        let player = level.build(&mut world, &settings);
        let controller = Self::controller_for(player, &settings);
        log::info!("Level {:?} ready ({} bodies)", level, world.len());

        Self {
            settings,
            world,
            controller,
            level,
            running: true,
            frame_count: 0,
            last_events: Vec::new(),
        }
    }

    fn controller_for(player: BodyHandle, settings: &Settings) -> CharacterController {
        CharacterController::new(player).with_tuning(
            settings.move_delta,
            settings.max_walk_speed,
            settings.jump_velocity,
        )
    }

    fn load_level(&mut self, level: Level) {
        self.world.clear();
        let player = level.build(&mut self.world, &self.settings);
        self.controller = Self::controller_for(player, &self.settings);
        self.level = level;
        self.last_events.clear();
        log::info!("Level {:?} ready ({} bodies)", level, self.world.len());
    }

    /// Run one frame: input, controller, physics, draw, level check
    pub fn frame(&mut self, host: &HostInput, canvas: &mut dyn Canvas) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Stopped;
        }
        if host.quit || host.escape {
            log::info!("Quit requested after {} frames", self.frame_count);
            self.running = false;
            return FrameOutcome::Stopped;
        }

        for &at in &host.left_clicks {
            self.place_wall(at);
        }
        for &target in &host.right_clicks {
            self.fire_bullet(target);
        }

        self.controller.set_input(&mut self.world, &host.input_state());
        self.last_events = step_with_correction(
            &mut self.world,
            self.settings.gravity,
            self.settings.correction_percent,
        );
        self.world.draw(canvas, colors::BACKGROUND);
        self.frame_count += 1;

        if self.score() >= self.settings.goals_to_win {
            if let Some(next) = self.level.next() {
                log::info!("Level {:?} cleared in {} frames", self.level, self.frame_count);
                self.load_level(next);
                return FrameOutcome::LevelChanged(next);
            }
        }

        FrameOutcome::Running
    }

    /// Place a grid-sized wall at the grid cell containing `at`, then merge
    ///
    /// Returns the wall that covers the cell afterwards. When the new wall was
    /// merged into one above it, that is the surviving upper wall.
    pub fn place_wall(&mut self, at: Vec2) -> BodyHandle {
        let grid = self.settings.grid_size;
        let corner = (at / grid).floor() * grid;
        let handle = self.world.insert(
            RigidBody::wall(corner.x, corner.y, grid, grid).with_color(colors::PLACED_WALL),
        );
        let merges = self.world.merge_walls();
        if merges == 0 {
            return handle;
        }
        log::debug!("Placed wall at {:?} merged {} times", corner, merges);

        if self.world.contains(handle) {
            return handle;
        }
        self.wall_covering_cell(corner, grid).unwrap_or(handle)
    }

    /// Wall in the same column as the grid cell at `corner` that spans it
    fn wall_covering_cell(&self, corner: Vec2, grid: f32) -> Option<BodyHandle> {
        self.world
            .with_role(RoleTag::Wall)
            .find(|wall| {
                let b = wall.bounds();
                (b.min.x - corner.x).abs() < EDGE_EPSILON
                    && (b.width() - grid).abs() < EDGE_EPSILON
                    && b.min.y <= corner.y + EDGE_EPSILON
                    && b.max.y >= corner.y + grid - EDGE_EPSILON
            })
            .map(|wall| wall.id)
    }

    /// Fire a bullet from the player toward `target`
    ///
    /// Returns `None` when there is no player to fire from.
    pub fn fire_bullet(&mut self, target: Vec2) -> Option<BodyHandle> {
        let player = self.world.get(self.controller.player)?;
        let mut dir = (target - player.pos).normalize_or_zero();
        if dir == Vec2::ZERO {
            dir = self.controller.facing(&self.world);
        }

        let radius = self.settings.bullet_radius;
        let spawn = player.pos + dir * (player.shape.half_size().x + radius + 1.0);
        let bullet = RigidBody::bullet(spawn, dir * self.settings.bullet_speed, radius);
        Some(self.world.insert(bullet))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn player(&self) -> BodyHandle {
        self.controller.player
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Events from the most recent physics step
    pub fn last_events(&self) -> &[StepEvent] {
        &self.last_events
    }

    /// Goals collected by the player in this level
    pub fn score(&self) -> u32 {
        self.world
            .get(self.controller.player)
            .and_then(|p| p.player_state())
            .map(|s| s.score)
            .unwrap_or(0)
    }

    pub fn goals_left(&self) -> usize {
        self.world.with_role(RoleTag::Goal).count()
    }
}
