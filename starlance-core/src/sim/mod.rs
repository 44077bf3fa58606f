//! World simulation: entity types, the per-frame game loop, and the
//! replay API over recorded input tapes.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::{
    BANKING_SENSITIVITY, BASE_FORWARD_SPEED, BOOST_MULTIPLIER, BOOST_SENSITIVITY_FACTOR,
    FIRE_COOLDOWN_FRAMES, HARD_BANK_FACTOR, HOSTILE_BASE_SPEED, HOSTILE_HALF_EXTENT,
    HOSTILE_HEALTH_PER_LEVEL, HOSTILE_PULSE_RATE, HOSTILE_SPEED_PER_LEVEL, LANE_REACH_X,
    LANE_REACH_Y, MAX_ROLL, OBSTACLE_RADIUS, PLAYER_START_Z, PROJECTILE_DESPAWN_Z,
    PROJECTILE_HALF_EXTENTS, PROJECTILE_SPEED, PROJECTILE_TRAIL_LENGTH, RETICLE_DISTANCE,
    RETICLE_MAX_OFFSET, RETICLE_SMOOTHING, STAT_CAP, WARP_MULTIPLIER, WARP_SENSITIVITY_FACTOR,
};
use crate::error::RuleCode;
use crate::geom::Aabb;
use crate::tape::FrameInput;

mod game;

use game::Game;

/// Time-driven difficulty scalar, read by the spawner to size new hostiles.
#[derive(Clone, Copy, Debug)]
pub struct DifficultyTrack {
    difficulty: f32,
}

impl DifficultyTrack {
    pub fn new() -> Self {
        Self { difficulty: 1.0 }
    }

    pub fn advance(&mut self, dt: f32) {
        self.difficulty += dt * crate::constants::DIFFICULTY_RATE;
    }

    pub fn get(&self) -> f32 {
        self.difficulty
    }

    pub fn level(&self) -> i32 {
        self.difficulty.floor() as i32
    }
}

impl Default for DifficultyTrack {
    fn default() -> Self {
        Self::new()
    }
}

/// Player health/shield/energy block. Damage drains the shield first and
/// overflows into health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipStats {
    health: i32,
    shield: i32,
    energy: i32,
}

impl ShipStats {
    pub fn new() -> Self {
        Self {
            health: STAT_CAP,
            shield: STAT_CAP,
            energy: STAT_CAP,
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        if self.shield > 0 {
            self.shield -= amount;
            if self.shield < 0 {
                self.health += self.shield;
                self.shield = 0;
            }
        } else {
            self.health -= amount;
        }
    }

    pub fn use_energy(&mut self, amount: i32) -> bool {
        if self.energy >= amount {
            self.energy -= amount;
            true
        } else {
            false
        }
    }

    pub fn recharge_energy(&mut self, amount: i32) {
        self.energy = (self.energy + amount).min(STAT_CAP);
    }

    pub fn recharge_shield(&mut self, amount: i32) {
        self.shield = (self.shield + amount).min(STAT_CAP);
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn shield(&self) -> i32 {
        self.shield
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }
}

impl Default for ShipStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Aim model: a point ahead of the ship plus a smoothed fine-aim offset.
#[derive(Clone, Copy, Debug, Default)]
pub struct Reticle {
    offset: Vec2,
}

impl Reticle {
    pub fn update(&mut self, move_x: i32, move_y: i32) {
        let target = Vec2::new(move_x as f32, move_y as f32) * RETICLE_MAX_OFFSET;
        self.offset += (target - self.offset) * RETICLE_SMOOTHING;
    }

    pub fn aim_point(&self, ship_position: Vec3) -> Vec3 {
        ship_position + Vec3::new(self.offset.x, self.offset.y, -RETICLE_DISTANCE)
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

/// The player's ship. Seeks lane targets from the intent snapshot and
/// carries the frame-counted fire cooldown.
#[derive(Clone, Debug)]
pub struct PlayerShip {
    pub position: Vec3,
    pub roll: f32,
    fire_cooldown: i32,
    stats: ShipStats,
}

impl PlayerShip {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, PLAYER_START_Z),
            roll: 0.0,
            fire_cooldown: 0,
            stats: ShipStats::new(),
        }
    }

    pub fn steer(&mut self, input: FrameInput) {
        if self.fire_cooldown > 0 {
            self.fire_cooldown -= 1;
        }

        let sensitivity_scale = if input.warp {
            WARP_SENSITIVITY_FACTOR
        } else if input.boost {
            BOOST_SENSITIVITY_FACTOR
        } else {
            1.0
        };
        let sensitivity = BANKING_SENSITIVITY * sensitivity_scale;

        let forward_speed = BASE_FORWARD_SPEED
            * if input.warp {
                WARP_MULTIPLIER
            } else if input.boost {
                BOOST_MULTIPLIER
            } else {
                1.0
            };

        let target_x = input.move_x as f32 * LANE_REACH_X;
        let target_y = input.move_y as f32 * LANE_REACH_Y;
        self.position.x += (target_x - self.position.x) * sensitivity;
        self.position.y += (target_y - self.position.y) * sensitivity;
        self.position.z -= forward_speed;

        let roll_target = -(input.move_x as f32) * MAX_ROLL;
        let bank_factor = if input.move_x != 0 { HARD_BANK_FACTOR } else { 1.0 };
        self.roll += (roll_target - self.roll) * sensitivity * bank_factor;
    }

    pub fn ready_to_fire(&self) -> bool {
        self.fire_cooldown == 0
    }

    pub fn reset_fire_cooldown(&mut self) {
        self.fire_cooldown = FIRE_COOLDOWN_FRAMES;
    }

    pub fn fire_cooldown(&self) -> i32 {
        self.fire_cooldown
    }

    pub fn stats(&self) -> &ShipStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut ShipStats {
        &mut self.stats
    }
}

impl Default for PlayerShip {
    fn default() -> Self {
        Self::new()
    }
}

/// Static hazard. Spins for show, retires once it falls behind the player.
#[derive(Clone, Debug)]
pub struct Obstacle {
    id: u32,
    pub position: Vec3,
    pub rotation: Vec3,
    spin: Vec3,
    scale: f32,
    alive: bool,
}

impl Obstacle {
    pub fn new(id: u32, position: Vec3, rotation: Vec3, spin: Vec3, scale: f32) -> Self {
        Self {
            id,
            position,
            rotation,
            spin,
            scale,
            alive: true,
        }
    }

    pub fn update_spin(&mut self) {
        self.rotation += self.spin;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(OBSTACLE_RADIUS * self.scale))
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// Pursuing enemy. Health and speed scale with the difficulty level it was
/// spawned at.
#[derive(Clone, Debug)]
pub struct Hostile {
    id: u32,
    pub position: Vec3,
    /// Euler (pitch, yaw, roll); yaw snaps toward the target each tick,
    /// pitch carries the cosmetic wobble.
    pub orientation: Vec3,
    level: i32,
    health: i32,
    speed: f32,
    pulse: f32,
    glow: f32,
    flash: bool,
    alive: bool,
}

impl Hostile {
    pub fn new(id: u32, position: Vec3, level: i32) -> Self {
        let level = level.max(1);
        Self {
            id,
            position,
            orientation: Vec3::ZERO,
            level,
            health: HOSTILE_HEALTH_PER_LEVEL * level,
            speed: HOSTILE_BASE_SPEED + HOSTILE_SPEED_PER_LEVEL * level as f32,
            pulse: 0.0,
            glow: 1.0,
            flash: false,
            alive: true,
        }
    }

    /// Seek steering: full re-evaluation every tick, no velocity smoothing.
    pub fn update(&mut self, target: Vec3) {
        if !self.alive {
            return;
        }

        let direction = (target - self.position).normalize_or_zero();
        self.position += direction * self.speed;
        self.orientation.y = direction.x.atan2(direction.z);

        self.pulse += HOSTILE_PULSE_RATE;
        self.glow = 0.7 + self.pulse.sin() * 0.3;
        self.orientation.x = (self.pulse * 0.5).sin() * 0.1;
    }

    /// Returns true when this hit killed the hostile. A surviving hostile
    /// raises its damage flash; the caller owns scheduling the revert.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }

        self.health -= amount;
        if self.health <= 0 {
            self.destroy();
            return true;
        }

        self.flash = true;
        false
    }

    pub fn destroy(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.flash = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn clear_flash(&mut self) {
        self.flash = false;
    }

    pub fn is_flashing(&self) -> bool {
        self.flash
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(HOSTILE_HALF_EXTENT))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn glow(&self) -> f32 {
        self.glow
    }
}

/// Player-fired laser bolt. Travels along a fixed direction and retires
/// itself past the depth bound.
#[derive(Clone, Debug)]
pub struct Projectile {
    id: u32,
    pub position: Vec3,
    direction: Vec3,
    trail: Vec<Vec3>,
    alive: bool,
}

impl Projectile {
    pub fn new(id: u32, position: Vec3, direction: Vec3) -> Self {
        Self {
            id,
            position,
            direction,
            trail: Vec::with_capacity(PROJECTILE_TRAIL_LENGTH),
            alive: true,
        }
    }

    /// Advances one tick. Returns true exactly once, on the call that
    /// crosses the depth bound; the projectile is already retired when
    /// that call returns. Calling on a retired projectile is a no-op.
    pub fn update(&mut self) -> bool {
        if !self.alive {
            return false;
        }

        self.position += self.direction * PROJECTILE_SPEED;

        if self.trail.len() == PROJECTILE_TRAIL_LENGTH {
            self.trail.pop();
        }
        self.trail.insert(0, self.position);

        if self.position.z < PROJECTILE_DESPAWN_Z {
            self.destroy();
            return true;
        }
        false
    }

    pub fn destroy(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        // Release the trail buffer along with the entity.
        self.trail = Vec::new();
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, PROJECTILE_HALF_EXTENTS)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn trail(&self) -> &[Vec3] {
        &self.trail
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub frame_count: u32,
    pub kills: u32,
    pub obstacles_cleared: u32,
    pub final_rng_state: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayCheckpoint {
    pub frame_count: u32,
    pub rng_state: u32,
    pub kills: u32,
    pub obstacles_cleared: u32,
    pub difficulty: f32,
    pub spawn_interval: f32,
    pub obstacles: usize,
    pub hostiles: usize,
    pub projectiles: usize,
    pub player_x: f32,
    pub player_y: f32,
    pub player_z: f32,
    pub fire_cooldown: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayViolation {
    pub frame_count: u32,
    pub rule: RuleCode,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: Vec3,
    pub roll: f32,
    pub fire_cooldown: i32,
    pub health: i32,
    pub shield: i32,
    pub energy: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub id: u32,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostileSnapshot {
    pub id: u32,
    pub position: Vec3,
    pub orientation: Vec3,
    pub level: i32,
    pub health: i32,
    pub glow: f32,
    pub flash: bool,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub id: u32,
    pub position: Vec3,
    pub direction: Vec3,
    pub trail: Vec<Vec3>,
    pub alive: bool,
}

/// Render-facing view of the whole world; nothing else crosses the
/// rendering boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub frame_count: u32,
    pub difficulty: f32,
    pub rng_state: u32,
    pub kills: u32,
    pub obstacles_cleared: u32,
    pub spawn_interval: f32,
    pub last_spawn_z: f32,
    pub player: PlayerSnapshot,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub hostiles: Vec<HostileSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
}

pub fn replay(seed: u32, inputs: &[u8]) -> ReplayResult {
    let mut game = Game::new(seed);

    for input in inputs {
        game.step(*input);
    }

    game.result()
}

pub fn replay_strict(seed: u32, inputs: &[u8]) -> Result<ReplayResult, ReplayViolation> {
    let mut game = Game::new(seed);
    game.validate_invariants().map_err(|rule| ReplayViolation {
        frame_count: game.frame_count(),
        rule,
    })?;

    for input in inputs {
        game.step(*input);
        game.validate_invariants().map_err(|rule| ReplayViolation {
            frame_count: game.frame_count(),
            rule,
        })?;
    }

    Ok(game.result())
}

pub fn replay_with_checkpoints(
    seed: u32,
    inputs: &[u8],
    sample_every: u32,
) -> Vec<ReplayCheckpoint> {
    let mut game = Game::new(seed);
    let stride = if sample_every == 0 { 1 } else { sample_every };
    let total_frames = inputs.len() as u32;
    let mut checkpoints = Vec::new();
    checkpoints.push(game.checkpoint());

    for (index, input) in inputs.iter().enumerate() {
        game.step(*input);
        let frame = (index + 1) as u32;
        if frame % stride == 0 || frame == total_frames {
            checkpoints.push(game.checkpoint());
        }
    }

    checkpoints
}

/// Incrementally stepped game for an interactive frame driver.
pub struct LiveGame {
    game: Game,
}

impl LiveGame {
    pub fn new(seed: u32) -> Self {
        Self {
            game: Game::new(seed),
        }
    }

    #[inline]
    pub fn step(&mut self, input_byte: u8) {
        self.game.step(input_byte);
    }

    #[inline]
    pub fn step_input(&mut self, input: FrameInput) {
        self.game.step_decoded(input);
    }

    /// Pump the deferred cosmetic-effect queue with wall-clock elapsed
    /// seconds. Fire-and-forget: effects whose owner has been retired are
    /// dropped silently.
    #[inline]
    pub fn pump_fx(&mut self, elapsed_seconds: f32) {
        self.game.pump_fx(elapsed_seconds);
    }

    #[inline]
    pub fn snapshot(&self) -> WorldSnapshot {
        self.game.world_snapshot()
    }

    #[inline]
    pub fn checkpoint(&self) -> ReplayCheckpoint {
        self.game.checkpoint()
    }

    #[inline]
    pub fn result(&self) -> ReplayResult {
        self.game.result()
    }

    #[inline]
    pub fn validate(&self) -> Result<(), RuleCode> {
        self.game.validate_invariants()
    }
}
