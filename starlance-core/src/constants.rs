//! Gameplay tuning constants.
//!
//! Distances are world units, angles radians, timers either seconds or
//! 60 Hz frame counts as noted.

use glam::Vec3;

// Simulation clock
pub const TICK_SECONDS: f32 = 1.0 / 60.0;

// Difficulty
pub const DIFFICULTY_RATE: f32 = 0.1; // difficulty gained per second

// Player ship
pub const PLAYER_START_Z: f32 = -5.0;
pub const LANE_REACH_X: f32 = 50.0;
pub const LANE_REACH_Y: f32 = 40.0;
pub const BASE_FORWARD_SPEED: f32 = 1.0;
pub const BOOST_MULTIPLIER: f32 = 2.0;
pub const WARP_MULTIPLIER: f32 = 8.0;
pub const BANKING_SENSITIVITY: f32 = 0.1;
pub const BOOST_SENSITIVITY_FACTOR: f32 = 0.8;
pub const WARP_SENSITIVITY_FACTOR: f32 = 0.6;
pub const MAX_ROLL: f32 = 1.5;
pub const HARD_BANK_FACTOR: f32 = 1.5;
pub const FIRE_COOLDOWN_FRAMES: i32 = 9; // 150 ms at 60 fps
pub const STAT_CAP: i32 = 100;

// Aim reticle
pub const RETICLE_DISTANCE: f32 = 100.0;
pub const RETICLE_MAX_OFFSET: f32 = 5.0;
pub const RETICLE_SMOOTHING: f32 = 0.05;
pub const BANKING_SHOT_SKEW: f32 = 2.0;

// Projectiles
pub const PROJECTILE_SPEED: f32 = 8.0; // units per tick
pub const PROJECTILE_DESPAWN_Z: f32 = -1000.0;
pub const PROJECTILE_HALF_EXTENTS: Vec3 = Vec3::new(0.05, 0.05, 2.0);
pub const PROJECTILE_TRAIL_LENGTH: usize = 50;

// Hostiles
pub const HOSTILE_HEALTH_PER_LEVEL: i32 = 100;
pub const HOSTILE_BASE_SPEED: f32 = 0.2;
pub const HOSTILE_SPEED_PER_LEVEL: f32 = 0.1;
pub const HOSTILE_HALF_EXTENT: f32 = 1.5;
pub const HOSTILE_PULSE_RATE: f32 = 0.1; // cosmetic oscillator, radians per tick
pub const HIT_DAMAGE: i32 = 50;
pub const DAMAGE_FLASH_SECONDS: f32 = 0.1;

// Obstacles
pub const OBSTACLE_RADIUS: f32 = 2.0;
pub const OBSTACLE_SCALE_MIN: f32 = 0.8;
pub const OBSTACLE_SCALE_MAX: f32 = 2.0;
pub const OBSTACLE_SPIN_LIMIT: f32 = 0.01; // radians per tick, per axis
pub const CLEANUP_BEHIND_DISTANCE: f32 = 100.0;

// Spawning
pub const SPAWN_AHEAD_DISTANCE: f32 = 300.0;
pub const SPAWN_TRIGGER_BASE: f32 = 20.0;
pub const SPAWN_INTERVAL_START: f32 = 30.0;
pub const SPAWN_INTERVAL_FLOOR: f32 = 20.0;
pub const SPAWN_INTERVAL_DECAY: f32 = 0.1;
pub const SPAWN_CELL_SIZE: f32 = 30.0;
pub const SPAWN_JITTER_SPREAD: f32 = 1.5; // +/- 75% of a cell
pub const SPAWN_COUNT_MIN: i32 = 4;
pub const SPAWN_COUNT_MAX: i32 = 10;
pub const HOSTILE_SPAWN_PCT: u32 = 30;
pub const LANE_CLEAR_HALF_EXTENT: f32 = 8.0;
pub const LANE_PUSH_OUT: f32 = 8.0;

// Tape format
pub const TAPE_MAGIC: u32 = u32::from_le_bytes(*b"SLT1");
pub const TAPE_VERSION: u8 = 1;
pub const TAPE_HEADER_SIZE: usize = 16;
pub const TAPE_FOOTER_SIZE: usize = 16;
pub const MAX_FRAMES_DEFAULT: u32 = 18_000; // five minutes at 60 fps
