use super::*;

use glam::Vec3;

use crate::constants::{
    BANKING_SHOT_SKEW, CLEANUP_BEHIND_DISTANCE, DAMAGE_FLASH_SECONDS, FIRE_COOLDOWN_FRAMES,
    HIT_DAMAGE, HOSTILE_SPAWN_PCT, LANE_CLEAR_HALF_EXTENT, LANE_PUSH_OUT, LANE_REACH_X,
    LANE_REACH_Y, OBSTACLE_SCALE_MAX, OBSTACLE_SCALE_MIN, OBSTACLE_SPIN_LIMIT,
    PROJECTILE_DESPAWN_Z, SPAWN_AHEAD_DISTANCE, SPAWN_CELL_SIZE, SPAWN_COUNT_MAX, SPAWN_COUNT_MIN,
    SPAWN_INTERVAL_DECAY, SPAWN_INTERVAL_FLOOR, SPAWN_INTERVAL_START, SPAWN_JITTER_SPREAD,
    SPAWN_TRIGGER_BASE, STAT_CAP, TICK_SECONDS,
};
use crate::error::RuleCode;
use crate::fx::{Effect, FxQueue};
use crate::rng::SeededRng;
use crate::tape::{decode_input_byte, FrameInput};

const OBSTACLE_VEC_CAPACITY: usize = 64;
const HOSTILE_VEC_CAPACITY: usize = 32;
const PROJECTILE_VEC_CAPACITY: usize = 32;

#[derive(Clone)]
pub(super) struct Game {
    player: PlayerShip,
    reticle: Reticle,
    obstacles: Vec<Obstacle>,
    hostiles: Vec<Hostile>,
    projectiles: Vec<Projectile>,
    difficulty: DifficultyTrack,
    fx: FxQueue,
    last_spawn_z: f32,
    spawn_interval: f32,
    kills: u32,
    obstacles_cleared: u32,
    next_entity_id: u32,
    frame_count: u32,
    rng: SeededRng,
}

impl Game {
    pub(super) fn new(seed: u32) -> Self {
        Self {
            player: PlayerShip::new(),
            reticle: Reticle::default(),
            obstacles: Vec::with_capacity(OBSTACLE_VEC_CAPACITY),
            hostiles: Vec::with_capacity(HOSTILE_VEC_CAPACITY),
            projectiles: Vec::with_capacity(PROJECTILE_VEC_CAPACITY),
            difficulty: DifficultyTrack::new(),
            fx: FxQueue::new(),
            last_spawn_z: 0.0,
            spawn_interval: SPAWN_INTERVAL_START,
            kills: 0,
            obstacles_cleared: 0,
            next_entity_id: 1,
            frame_count: 0,
            rng: SeededRng::new(seed),
        }
    }

    pub(super) fn step(&mut self, input_byte: u8) {
        self.step_decoded(decode_input_byte(input_byte));
    }

    pub(super) fn step_decoded(&mut self, input: FrameInput) {
        self.frame_count += 1;

        self.difficulty.advance(TICK_SECONDS);
        self.update_player(input);
        self.spawn_check();
        self.update_entities();
        self.update_projectiles();
        self.check_laser_collisions();
        self.prune_retired();
    }

    fn update_player(&mut self, input: FrameInput) {
        self.player.steer(input);
        self.reticle.update(input.move_x, input.move_y);

        if input.fire && self.player.ready_to_fire() {
            self.fire_projectile();
        }
    }

    fn fire_projectile(&mut self) {
        let start = self.player.position;
        let aim = self.reticle.aim_point(start);

        // Banking skews the shot sideways, the way the ship's nose points.
        let mut towards = aim - start;
        towards.x += self.player.roll.sin() * BANKING_SHOT_SKEW;

        let direction = towards.normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }

        let id = self.alloc_id();
        self.projectiles.push(Projectile::new(id, start, direction));
        self.player.reset_fire_cooldown();
        tracing::debug!(id, "projectile fired");
    }

    /// One-shot spawn trigger: the player's own forward motion is the
    /// clock. The trigger distance consumes the decaying spawn interval,
    /// so batches pack tighter as a run goes on.
    fn spawn_check(&mut self) {
        let trigger = SPAWN_TRIGGER_BASE + self.spawn_interval;
        if self.player.position.z < self.last_spawn_z - trigger {
            self.spawn_batch();
            self.last_spawn_z = self.player.position.z;
        }
    }

    fn spawn_batch(&mut self) {
        let count = self.rng.next_range(SPAWN_COUNT_MIN, SPAWN_COUNT_MAX + 1);
        let grid = (count as f32).sqrt().ceil() as i32;
        let spawn_z = self.player.position.z - SPAWN_AHEAD_DISTANCE;
        let mut hostiles_spawned = 0u32;

        for slot in 0..count {
            let grid_x = (slot % grid) as f32 - grid as f32 / 2.0;
            let grid_y = (slot / grid) as f32 - grid as f32 / 2.0;

            let mut x = grid_x * SPAWN_CELL_SIZE
                + (self.rng.next_f32() - 0.5) * SPAWN_CELL_SIZE * SPAWN_JITTER_SPREAD;
            let y = grid_y * SPAWN_CELL_SIZE
                + (self.rng.next_f32() - 0.5) * SPAWN_CELL_SIZE * SPAWN_JITTER_SPREAD;

            // Never drop a spawn straight into the player's current lane.
            if x.abs() < LANE_CLEAR_HALF_EXTENT && y.abs() < LANE_CLEAR_HALF_EXTENT {
                x += if x < 0.0 { -LANE_PUSH_OUT } else { LANE_PUSH_OUT };
            }

            let position = Vec3::new(x, y, spawn_z);
            if self.rng.next_int(100) < HOSTILE_SPAWN_PCT {
                self.spawn_hostile(position);
                hostiles_spawned += 1;
            } else {
                self.spawn_obstacle(position);
            }
        }

        self.spawn_interval = (self.spawn_interval - SPAWN_INTERVAL_DECAY).max(SPAWN_INTERVAL_FLOOR);
        tracing::debug!(
            count,
            hostiles = hostiles_spawned,
            spawn_interval = %self.spawn_interval,
            "spawned batch ahead of player"
        );
    }

    fn spawn_hostile(&mut self, position: Vec3) {
        let id = self.alloc_id();
        let level = self.difficulty.level();
        self.hostiles.push(Hostile::new(id, position, level));
        tracing::debug!(id, level, "hostile spawned");
    }

    fn spawn_obstacle(&mut self, position: Vec3) {
        let id = self.alloc_id();
        let rotation = Vec3::new(
            self.rng.next_f32() * core::f32::consts::TAU,
            self.rng.next_f32() * core::f32::consts::TAU,
            self.rng.next_f32() * core::f32::consts::TAU,
        );
        let spin = Vec3::new(
            (self.rng.next_f32() - 0.5) * (2.0 * OBSTACLE_SPIN_LIMIT),
            (self.rng.next_f32() - 0.5) * (2.0 * OBSTACLE_SPIN_LIMIT),
            (self.rng.next_f32() - 0.5) * (2.0 * OBSTACLE_SPIN_LIMIT),
        );
        let scale = self.rng.next_range_f32(OBSTACLE_SCALE_MIN, OBSTACLE_SCALE_MAX);
        self.obstacles
            .push(Obstacle::new(id, position, rotation, spin, scale));
    }

    fn update_entities(&mut self) {
        let player_z = self.player.position.z;
        for obstacle in &mut self.obstacles {
            if !obstacle.is_alive() {
                continue;
            }
            obstacle.update_spin();
            if obstacle.position.z > player_z + CLEANUP_BEHIND_DISTANCE {
                obstacle.destroy();
            }
        }

        let target = self.player.position;
        for hostile in &mut self.hostiles {
            if !hostile.is_alive() {
                continue;
            }
            hostile.update(target);
        }
    }

    fn update_projectiles(&mut self) {
        for projectile in &mut self.projectiles {
            if !projectile.is_alive() {
                continue;
            }
            projectile.update();
        }
    }

    /// Obstacles take priority over hostiles, tested in live-collection
    /// order; a projectile records at most one hit per pass.
    fn check_laser_collisions(&mut self) {
        for projectile_index in 0..self.projectiles.len() {
            if !self.projectiles[projectile_index].is_alive() {
                continue;
            }
            let laser_bounds = self.projectiles[projectile_index].bounds();

            let mut hit_obstacle = false;
            for obstacle_index in 0..self.obstacles.len() {
                if !self.obstacles[obstacle_index].is_alive() {
                    continue;
                }
                if laser_bounds.intersects(&self.obstacles[obstacle_index].bounds()) {
                    self.obstacles[obstacle_index].destroy();
                    self.obstacles_cleared += 1;
                    self.projectiles[projectile_index].destroy();
                    hit_obstacle = true;
                    break;
                }
            }
            if hit_obstacle {
                continue;
            }

            for hostile_index in 0..self.hostiles.len() {
                if !self.hostiles[hostile_index].is_alive() {
                    continue;
                }
                if laser_bounds.intersects(&self.hostiles[hostile_index].bounds()) {
                    let hostile_id = self.hostiles[hostile_index].id();
                    if self.hostiles[hostile_index].take_damage(HIT_DAMAGE) {
                        self.kills += 1;
                        tracing::debug!(id = hostile_id, "hostile destroyed");
                    } else {
                        self.fx.schedule(
                            DAMAGE_FLASH_SECONDS,
                            Effect::FlashRevert {
                                hostile: hostile_id,
                            },
                        );
                    }
                    self.projectiles[projectile_index].destroy();
                    break;
                }
            }
        }
    }

    /// Compact the live collections once per frame. Retirement inside the
    /// frame is tombstoned (alive flag) so iteration never splices.
    fn prune_retired(&mut self) {
        self.obstacles.retain(|entry| entry.is_alive());
        self.hostiles.retain(|entry| entry.is_alive());
        self.projectiles.retain(|entry| entry.is_alive());
    }

    pub(super) fn pump_fx(&mut self, elapsed_seconds: f32) {
        for effect in self.fx.pump(elapsed_seconds) {
            match effect {
                Effect::FlashRevert { hostile } => {
                    // The owner may have been retired since the effect was
                    // scheduled; that must be a silent no-op.
                    if let Some(entry) =
                        self.hostiles.iter_mut().find(|entry| entry.id() == hostile)
                    {
                        if entry.is_alive() {
                            entry.clear_flash();
                        }
                    }
                }
            }
        }
    }

    pub(super) fn validate_invariants(&self) -> Result<(), RuleCode> {
        let difficulty = self.difficulty.get();
        if !difficulty.is_finite() || difficulty < 1.0 {
            return Err(RuleCode::DifficultyFloor);
        }

        if !(SPAWN_INTERVAL_FLOOR..=SPAWN_INTERVAL_START).contains(&self.spawn_interval) {
            return Err(RuleCode::SpawnIntervalRange);
        }

        if !self.player.position.is_finite()
            || self.player.position.x.abs() > LANE_REACH_X + 1.0
            || self.player.position.y.abs() > LANE_REACH_Y + 1.0
        {
            return Err(RuleCode::PlayerState);
        }

        if self.player.fire_cooldown < 0 || self.player.fire_cooldown > FIRE_COOLDOWN_FRAMES {
            return Err(RuleCode::PlayerCooldownRange);
        }

        let stats = self.player.stats();
        if !(0..=STAT_CAP).contains(&stats.shield())
            || !(0..=STAT_CAP).contains(&stats.energy())
            || stats.health() > STAT_CAP
        {
            return Err(RuleCode::PlayerStatsRange);
        }

        for hostile in &self.hostiles {
            if !hostile.is_alive()
                || hostile.health() <= 0
                || hostile.level() < 1
                || hostile.speed() <= 0.0
                || !hostile.position.is_finite()
            {
                return Err(RuleCode::HostileState);
            }
        }

        for projectile in &self.projectiles {
            let direction_error = (projectile.direction().length() - 1.0).abs();
            if !projectile.is_alive()
                || !projectile.position.is_finite()
                || projectile.position.z < PROJECTILE_DESPAWN_Z
                || direction_error > 1e-3
            {
                return Err(RuleCode::ProjectileState);
            }
        }

        for obstacle in &self.obstacles {
            if !obstacle.is_alive()
                || !obstacle.position.is_finite()
                || !(OBSTACLE_SCALE_MIN..OBSTACLE_SCALE_MAX).contains(&obstacle.scale())
            {
                return Err(RuleCode::ObstacleState);
            }
        }

        Ok(())
    }

    pub(super) fn checkpoint(&self) -> ReplayCheckpoint {
        ReplayCheckpoint {
            frame_count: self.frame_count,
            rng_state: self.rng.state(),
            kills: self.kills,
            obstacles_cleared: self.obstacles_cleared,
            difficulty: self.difficulty.get(),
            spawn_interval: self.spawn_interval,
            obstacles: self.obstacles.len(),
            hostiles: self.hostiles.len(),
            projectiles: self.projectiles.len(),
            player_x: self.player.position.x,
            player_y: self.player.position.y,
            player_z: self.player.position.z,
            fire_cooldown: self.player.fire_cooldown(),
        }
    }

    pub(super) fn world_snapshot(&self) -> WorldSnapshot {
        let stats = self.player.stats();
        WorldSnapshot {
            frame_count: self.frame_count,
            difficulty: self.difficulty.get(),
            rng_state: self.rng.state(),
            kills: self.kills,
            obstacles_cleared: self.obstacles_cleared,
            spawn_interval: self.spawn_interval,
            last_spawn_z: self.last_spawn_z,
            player: PlayerSnapshot {
                position: self.player.position,
                roll: self.player.roll,
                fire_cooldown: self.player.fire_cooldown(),
                health: stats.health(),
                shield: stats.shield(),
                energy: stats.energy(),
            },
            obstacles: self
                .obstacles
                .iter()
                .map(|entry| ObstacleSnapshot {
                    id: entry.id(),
                    position: entry.position,
                    rotation: entry.rotation,
                    scale: entry.scale(),
                    alive: entry.is_alive(),
                })
                .collect(),
            hostiles: self
                .hostiles
                .iter()
                .map(|entry| HostileSnapshot {
                    id: entry.id(),
                    position: entry.position,
                    orientation: entry.orientation,
                    level: entry.level(),
                    health: entry.health(),
                    glow: entry.glow(),
                    flash: entry.is_flashing(),
                    alive: entry.is_alive(),
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|entry| ProjectileSnapshot {
                    id: entry.id(),
                    position: entry.position,
                    direction: entry.direction(),
                    trail: entry.trail().to_vec(),
                    alive: entry.is_alive(),
                })
                .collect(),
        }
    }

    pub(super) fn result(&self) -> ReplayResult {
        ReplayResult {
            frame_count: self.frame_count,
            kills: self.kills,
            obstacles_cleared: self.obstacles_cleared,
            final_rng_state: self.rng.state(),
        }
    }

    pub(super) fn frame_count(&self) -> u32 {
        self.frame_count
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }
}
