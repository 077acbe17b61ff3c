//! The particle emitter: pooling, spawn scheduling and per-frame updates.
//!
//! An [`Emitter`] owns every particle it creates. Live particles are listed in
//! an active set; expired ones go to a LIFO pool and are reused by later
//! spawns. The host calls [`Emitter::update`] once per frame and draws the
//! particles the emitter attached to its [`ParticleContainer`].
//!
//! # Spawn schedule
//!
//! Each update subtracts the frame time from a spawn timer. While the timer
//! is negative a spawn slot is due; every slot adds one `frequency` back.
//! Particles spawned in the middle of a frame are fast-forwarded by how
//! overdue their slot was, and their spawn point is interpolated along the
//! emitter's movement, so a moving emitter leaves an even trail.
//!
//! # Example
//!
//! ```
//! use spritefx::prelude::*;
//!
//! let config = EmitterConfig::new()
//!     .with_lifetime(0.5, 0.5)
//!     .with_speed(100.0, 100.0)
//!     .with_frequency(0.1);
//!
//! let mut emitter = Emitter::new(DisplayList::new());
//! emitter.init(vec![TextureHandle::new(1).into()], &config);
//! emitter.update(1.0 / 60.0);
//! emitter.update(0.25);
//! assert!(emitter.particle_count() > 0);
//! assert_eq!(emitter.container().len(), emitter.particle_count());
//! ```

use crate::config::{EmitterConfig, MinMax};
use crate::ease::Ease;
use crate::error::ConfigError;
use crate::particles::{Particle, ParticleBehavior, ParticleKind, SharedExtraData, SharedVec2};
use crate::render::{DisplayList, ParticleContainer, ParticleId, ParticleInstance};
use crate::spawn::{SpawnContext, SpawnShape};
use crate::textures::{shares_base_image, ParticleArt};
use crate::utils::{hex_to_rgb, random_between, rotate_point};
use crate::visuals::{get_blend_mode, BlendMode};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Particle cap used when the config gives none.
pub const DEFAULT_MAX_PARTICLES: usize = 1000;

/// Step used by [`Emitter::jump_forward_in_time`].
const JUMP_STEP: f32 = 1.0 / 60.0;

/// Creates a fresh particle for an empty pool.
pub type ParticleFactory = Box<dyn Fn() -> Box<dyn ParticleBehavior>>;

struct Slot {
    particle: Box<dyn ParticleBehavior>,
    /// Position in `active`. Meaningless while pooled.
    active_index: usize,
}

/// A configured source of particles.
///
/// `C` is the display container particles are attached to. The default,
/// [`DisplayList`], just records the draw order.
pub struct Emitter<C: ParticleContainer = DisplayList> {
    // Particle ranges.
    art: Vec<ParticleArt>,
    start_alpha: f32,
    end_alpha: f32,
    start_speed: f32,
    end_speed: f32,
    acceleration: Option<SharedVec2>,
    start_scale: f32,
    end_scale: f32,
    minimum_scale_multiplier: f32,
    start_color: Option<[u8; 3]>,
    end_color: Option<[u8; 3]>,
    start_rotation: MinMax,
    rotation_speed: MinMax,
    lifetime: MinMax,
    blend_mode: BlendMode,
    ease: Option<Ease>,
    extra_data: Option<Rc<serde_json::Value>>,
    shared_extra_data: SharedExtraData,

    // Emission.
    spawn_shape: SpawnShape,
    frequency: f32,
    emitter_lifetime: Option<f32>,
    max_particles: usize,
    add_at_back: bool,
    rotation: f32,
    owner_pos: Vec2,
    spawn_pos: Vec2,
    prev_emitter_pos: Vec2,
    prev_pos_is_valid: bool,
    pos_changed: bool,
    spawn_timer: f32,
    emitter_life: f32,
    emit: bool,

    // Storage.
    slots: Vec<Slot>,
    active: Vec<ParticleId>,
    pool: Vec<ParticleId>,
    factory: ParticleFactory,
    container: C,
    rng: Box<dyn RngCore>,
}

impl Default for Emitter<DisplayList> {
    fn default() -> Self {
        Self::new(DisplayList::new())
    }
}

impl<C: ParticleContainer> Emitter<C> {
    /// An idle emitter. Call [`Emitter::init`] to configure it.
    pub fn new(container: C) -> Self {
        Self {
            art: Vec::new(),
            start_alpha: 1.0,
            end_alpha: 1.0,
            start_speed: 0.0,
            end_speed: 0.0,
            acceleration: None,
            start_scale: 1.0,
            end_scale: 1.0,
            minimum_scale_multiplier: 1.0,
            start_color: None,
            end_color: None,
            start_rotation: MinMax::default(),
            rotation_speed: MinMax::default(),
            lifetime: MinMax::default(),
            blend_mode: BlendMode::Normal,
            ease: None,
            extra_data: None,
            shared_extra_data: SharedExtraData::new(),
            spawn_shape: SpawnShape::Point,
            frequency: 1.0,
            emitter_lifetime: None,
            max_particles: DEFAULT_MAX_PARTICLES,
            add_at_back: false,
            rotation: 0.0,
            owner_pos: Vec2::ZERO,
            spawn_pos: Vec2::ZERO,
            prev_emitter_pos: Vec2::ZERO,
            prev_pos_is_valid: false,
            pos_changed: false,
            spawn_timer: 0.0,
            emitter_life: 0.0,
            emit: false,
            slots: Vec::new(),
            active: Vec::new(),
            pool: Vec::new(),
            factory: Box::new(|| ParticleKind::Basic.create()),
            container,
            rng: Box::new(SmallRng::from_entropy()),
        }
    }

    /// Create and configure in one step.
    pub fn with_config(container: C, art: Vec<ParticleArt>, config: &EmitterConfig) -> Self {
        let mut emitter = Self::new(container);
        emitter.init(art, config);
        emitter
    }

    /// Replace the random source, e.g. with a seeded rng for reproducible runs.
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.set_rng(rng);
        self
    }

    pub fn set_rng(&mut self, rng: impl RngCore + 'static) {
        self.rng = Box::new(rng);
    }

    /// Use `kind` for particles created from now on.
    pub fn with_particle_kind(mut self, kind: ParticleKind) -> Self {
        self.set_particle_kind(kind);
        self
    }

    /// (Re)configure the emitter.
    ///
    /// All live particles are retired first. Problems in `config` are logged
    /// and replaced by safe values; this never fails. Empty `art` leaves the
    /// emitter untouched.
    pub fn init(&mut self, art: Vec<ParticleArt>, config: &EmitterConfig) {
        if art.is_empty() {
            log::warn!("Emitter init called without particle art; ignoring");
            return;
        }
        self.cleanup();

        if art.len() > 1 && !shares_base_image(&art) {
            log::warn!("Particle textures come from different images; this may hinder batching");
        }
        self.art = art;

        // Particle properties.
        (self.start_alpha, self.end_alpha) = config.alpha.map_or((1.0, 1.0), |a| (a.start, a.end));
        (self.start_speed, self.end_speed) = config.speed.map_or((0.0, 0.0), |s| (s.start, s.end));

        self.acceleration = match config.acceleration.map(Vec2::from) {
            Some(acceleration) if acceleration != Vec2::ZERO => {
                self.end_speed = self.start_speed;
                Some(Rc::new(Cell::new(acceleration)))
            }
            _ => None,
        };

        match config.scale {
            Some(scale) => {
                self.start_scale = scale.start;
                self.end_scale = scale.end;
                self.minimum_scale_multiplier = scale
                    .minimum_scale_multiplier
                    .filter(|&m| m != 0.0)
                    .unwrap_or(1.0);
            }
            None => {
                self.start_scale = 1.0;
                self.end_scale = 1.0;
                self.minimum_scale_multiplier = 1.0;
            }
        }

        (self.start_color, self.end_color) = match &config.color {
            Some(color) => {
                let start = parse_color(&color.start);
                let end = if color.end != color.start {
                    parse_color(&color.end)
                } else {
                    None
                };
                (start, end)
            }
            None => (None, None),
        };

        self.start_rotation = config.start_rotation.unwrap_or_default();
        self.rotation_speed = config.rotation_speed.unwrap_or_default();
        self.lifetime = config.lifetime.unwrap_or_else(|| {
            log::error!("{}", ConfigError::MissingLifetime);
            MinMax::default()
        });
        self.blend_mode = get_blend_mode(config.blend_mode.as_deref());
        self.ease = match (&config.custom_ease, &config.ease) {
            (Some(ease), _) => Some(ease.clone()),
            (None, Some(segments)) if !segments.is_empty() => Some(Ease::from_segments(segments)),
            _ => None,
        };
        self.extra_data = config.extra_data.clone().map(Rc::new);
        self.shared_extra_data = SharedExtraData::new();

        // Emitter properties.
        self.spawn_shape = SpawnShape::from_config(config).unwrap_or_else(|err| {
            log::warn!("{err}");
            SpawnShape::Point
        });
        self.frequency = config.frequency;
        self.emitter_lifetime = config.emitter_lifetime.filter(|&life| life > 0.0);
        self.max_particles = config
            .max_particles
            .filter(|&max| max > 0)
            .map_or(DEFAULT_MAX_PARTICLES, |max| max as usize);
        self.add_at_back = config.add_at_back;

        self.rotation = 0.0;
        self.owner_pos = Vec2::ZERO;
        self.spawn_pos = config.pos.into();
        self.prev_emitter_pos = self.spawn_pos;
        self.prev_pos_is_valid = false;
        self.pos_changed = false;

        self.spawn_timer = 0.0;
        let frequency_ok = self.frequency > 0.0;
        if !frequency_ok {
            log::error!("{}", ConfigError::InvalidFrequency(self.frequency));
        }
        self.set_emit(frequency_ok);

        log::debug!(
            "Emitter initialized: {} spawn, frequency {}s, max {} particles",
            self.spawn_shape.name(),
            self.frequency,
            self.max_particles
        );
    }

    /// Advance the effect by `delta` seconds.
    ///
    /// Ages live particles (reclaiming the ones that expire), then spawns
    /// whatever came due during the frame.
    pub fn update(&mut self, delta: f32) {
        for i in (0..self.active.len()).rev() {
            let id = self.active[i];
            if self.slots[id.index()].particle.update(delta).is_none() {
                self.recycle(id);
            }
        }

        let prev = self.prev_emitter_pos;
        let current = self.owner_pos + self.spawn_pos;

        if self.emit && self.frequency > 0.0 {
            self.spawn_timer -= delta;
            self.skip_expired_slots();
            while self.spawn_timer < 0.0 {
                if self.active.len() < self.max_particles {
                    let lifetime = random_between(&mut *self.rng, self.lifetime.min, self.lifetime.max);
                    let overdue = -self.spawn_timer;
                    // A particle that would already be dead is counted but never shown.
                    if overdue < lifetime {
                        let origin = if self.prev_pos_is_valid && self.pos_changed {
                            prev.lerp(current, 1.0 + self.spawn_timer / delta)
                        } else {
                            current
                        };
                        let wave = self
                            .spawn_shape
                            .wave_size()
                            .min(self.max_particles - self.active.len());
                        for wave_index in 0..wave {
                            self.spawn_particle(origin, wave_index, lifetime, overdue);
                        }
                    }
                }

                let next = self.spawn_timer + self.frequency;
                if next == self.spawn_timer {
                    // frequency is below f32 resolution at this magnitude
                    log::warn!(
                        "Spawn timer {} cannot advance by {}s; dropping the backlog",
                        self.spawn_timer,
                        self.frequency
                    );
                    self.spawn_timer = 0.0;
                    break;
                }
                self.spawn_timer = next;

                if self.emitter_lifetime.is_some() {
                    self.emitter_life -= self.frequency;
                    if self.emitter_life <= 0.0 {
                        self.stop_emitter_life();
                        break;
                    }
                }
            }
        }

        if self.pos_changed {
            self.prev_emitter_pos = current;
            self.prev_pos_is_valid = true;
            self.pos_changed = false;
        }
    }

    /// Skips the whole spawn slots that are overdue by more than the longest
    /// lifetime. Their particles would expire before being shown.
    fn skip_expired_slots(&mut self) {
        let dead_time = f64::from(-self.spawn_timer) - f64::from(self.lifetime.max);
        let frequency = f64::from(self.frequency);
        let skipped = (dead_time / frequency).floor();
        if skipped < 1.0 {
            return;
        }

        if self.emitter_lifetime.is_some() {
            let life = f64::from(self.emitter_life) - skipped * frequency;
            if life <= 0.0 {
                self.stop_emitter_life();
                return;
            }
            self.emitter_life = life as f32;
        }
        self.spawn_timer = (f64::from(self.spawn_timer) + skipped * frequency) as f32;
        log::trace!("Skipped {skipped} expired spawn slots");
    }

    fn stop_emitter_life(&mut self) {
        self.spawn_timer = 0.0;
        self.emitter_life = 0.0;
        self.emit = false;
        log::debug!("Emitter lifetime used up; emission stopped");
    }

    fn spawn_particle(&mut self, origin: Vec2, wave_index: usize, lifetime: f32, overdue: f32) {
        let id = match self.pool.pop() {
            Some(id) => id,
            None => {
                let id = ParticleId(self.slots.len() as u32);
                self.slots.push(Slot {
                    particle: (self.factory)(),
                    active_index: 0,
                });
                id
            }
        };

        let art = match self.art.len() {
            0 | 1 => self.art.first(),
            len => self.art.get(self.rng.gen_range(0..len)),
        };

        let slot = &mut self.slots[id.index()];
        let particle = slot.particle.as_mut();
        if let Some(art) = art {
            particle.apply_art(art);
        }

        let core = particle.particle_mut();
        core.start_alpha = self.start_alpha;
        core.end_alpha = self.end_alpha;
        core.start_speed = self.start_speed;
        core.end_speed = self.end_speed;
        core.acceleration = self.acceleration.clone();
        if self.minimum_scale_multiplier != 1.0 {
            let multiplier = self.rng.gen::<f32>() * (1.0 - self.minimum_scale_multiplier)
                + self.minimum_scale_multiplier;
            core.start_scale = self.start_scale * multiplier;
            core.end_scale = self.end_scale * multiplier;
        } else {
            core.start_scale = self.start_scale;
            core.end_scale = self.end_scale;
        }
        core.start_color = self.start_color;
        core.end_color = self.end_color;
        core.rotation_speed = random_between(
            &mut *self.rng,
            self.rotation_speed.min,
            self.rotation_speed.max,
        );
        core.max_life = lifetime;
        core.blend_mode = self.blend_mode;
        core.ease = self.ease.clone();
        core.extra_data = self.extra_data.clone();

        let mut ctx = SpawnContext::new(
            &mut *self.rng,
            origin,
            self.rotation,
            self.start_rotation,
            wave_index,
        );
        let placement = self.spawn_shape.place(&mut ctx);
        core.rotation = placement.rotation;
        core.position = placement.position;

        particle.init(&mut self.shared_extra_data);
        if particle.update(overdue).is_none() {
            log::trace!("Particle {id:?} expired while catching up; returned to pool");
            self.stash(id);
            return;
        }

        let core = particle.particle_mut();
        if !self.container.is_batched() || !core.attached {
            self.container.attach(id, self.add_at_back);
            core.attached = true;
        } else {
            self.container.reorder(id, self.add_at_back);
        }

        slot.active_index = self.active.len();
        self.active.push(id);
    }

    /// Retire an active particle: remove it from the active set (swapping
    /// the last one into its place) and return it to the pool.
    ///
    /// Ids that are not active are ignored.
    pub fn recycle(&mut self, id: ParticleId) {
        let Some(index) = self.slots.get(id.index()).map(|slot| slot.active_index) else {
            return;
        };
        if self.active.get(index) != Some(&id) {
            log::warn!("Ignoring recycle of inactive particle {id:?}");
            return;
        }

        self.active.swap_remove(index);
        if let Some(&moved) = self.active.get(index) {
            self.slots[moved.index()].active_index = index;
        }
        self.stash(id);
    }

    /// Put a particle that is not in the active set back into the pool.
    fn stash(&mut self, id: ParticleId) {
        let core = self.slots[id.index()].particle.particle_mut();
        core.reset_for_pool();
        if self.container.is_batched() {
            core.alpha = 0.0;
            core.visible = false;
        } else if core.attached {
            self.container.detach(id);
            core.attached = false;
        }
        self.pool.push(id);
    }

    /// Retire every active particle immediately.
    pub fn cleanup(&mut self) {
        for i in (0..self.active.len()).rev() {
            let id = self.active[i];
            self.recycle(id);
            let core = self.slots[id.index()].particle.particle_mut();
            if core.attached {
                self.container.detach(id);
                core.attached = false;
            }
        }
    }

    /// Tear the emitter down, destroying every particle. Returns the container.
    pub fn destroy(mut self) -> C {
        self.cleanup();
        self.release_particles();
        self.container
    }

    fn release_particles(&mut self) {
        for slot in &mut self.slots {
            slot.particle.destroy();
        }
        self.slots.clear();
        self.pool.clear();
    }

    /// Switch to a different particle type.
    ///
    /// Retires and destroys every existing particle; previously handed out
    /// [`ParticleId`]s become invalid.
    pub fn set_particle_factory(
        &mut self,
        factory: impl Fn() -> Box<dyn ParticleBehavior> + 'static,
    ) {
        self.cleanup();
        for &id in &self.pool {
            let core = self.slots[id.index()].particle.particle_mut();
            if core.attached {
                self.container.detach(id);
                core.attached = false;
            }
        }
        self.release_particles();
        self.factory = Box::new(factory);
    }

    /// Switch to one of the built-in particle types.
    pub fn set_particle_kind(&mut self, kind: ParticleKind) {
        self.set_particle_factory(move || kind.create());
    }

    /// Swap the display container. Live particles are retired first.
    pub fn set_container(&mut self, container: C) -> C {
        self.cleanup();
        for slot in &mut self.slots {
            slot.particle.particle_mut().attached = false;
        }
        std::mem::replace(&mut self.container, container)
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    /// Set the emitter's rotation in degrees, turning the spawn offset with it.
    pub fn rotate(&mut self, new_rotation: f32) {
        if self.rotation == new_rotation {
            return;
        }
        let diff = new_rotation - self.rotation;
        self.rotation = new_rotation;
        rotate_point(diff, &mut self.spawn_pos);
        self.pos_changed = true;
    }

    /// Emitter rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Move the spawn point, relative to the owner.
    pub fn update_spawn_pos(&mut self, x: f32, y: f32) {
        self.pos_changed = true;
        self.spawn_pos = Vec2::new(x, y);
    }

    /// Move the owner (world position the spawn point is relative to).
    pub fn update_owner_pos(&mut self, x: f32, y: f32) {
        self.pos_changed = true;
        self.owner_pos = Vec2::new(x, y);
    }

    pub fn spawn_pos(&self) -> Vec2 {
        self.spawn_pos
    }

    pub fn owner_pos(&self) -> Vec2 {
        self.owner_pos
    }

    /// Don't interpolate spawn positions on the next update, e.g. after a
    /// teleport.
    pub fn reset_position_tracking(&mut self) {
        self.prev_pos_is_valid = false;
    }

    /// Whether new particles are being spawned.
    pub fn is_emitting(&self) -> bool {
        self.emit
    }

    /// Turn emission on or off. Restarts the emitter lifetime countdown.
    pub fn set_emit(&mut self, emit: bool) {
        self.emit = emit;
        self.emitter_life = self.emitter_lifetime.unwrap_or(0.0);
    }

    /// Run the effect forward by `seconds` in small steps, e.g. to show a
    /// fire that has already been burning.
    pub fn jump_forward_in_time(&mut self, seconds: f32) {
        let mut remaining = seconds;
        while remaining > 0.0 {
            let step = remaining.min(JUMP_STEP);
            self.update(step);
            remaining -= step;
        }
    }

    /// Number of live particles.
    pub fn particle_count(&self) -> usize {
        self.active.len()
    }

    /// Number of idle particles waiting for reuse.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Not emitting and nothing left alive.
    pub fn no_more_particles(&self) -> bool {
        !self.emit && self.active.is_empty()
    }

    /// Ids of the live particles, in no particular order.
    pub fn active_ids(&self) -> &[ParticleId] {
        &self.active
    }

    /// Live particles.
    pub fn particles(&self) -> impl Iterator<Item = (ParticleId, &Particle)> + '_ {
        self.active
            .iter()
            .map(|&id| (id, self.slots[id.index()].particle.particle()))
    }

    /// Any particle owned by this emitter, live or pooled.
    pub fn particle(&self, id: ParticleId) -> Option<&dyn ParticleBehavior> {
        self.slots.get(id.index()).map(|slot| slot.particle.as_ref())
    }

    /// Append a render snapshot of every visible live particle to `out`.
    pub fn write_instances(&self, out: &mut Vec<ParticleInstance>) {
        out.extend(
            self.particles()
                .map(|(_, p)| p)
                .filter(|p| p.visible)
                .map(ParticleInstance::from),
        );
    }

    pub fn art(&self) -> &[ParticleArt] {
        &self.art
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Seconds between spawns. Non-positive values stop emission.
    pub fn set_frequency(&mut self, seconds: f32) {
        self.frequency = seconds;
        if seconds <= 0.0 {
            log::warn!("{}", ConfigError::InvalidFrequency(seconds));
            self.emit = false;
        }
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    /// Cap on live particles. 0 means [`DEFAULT_MAX_PARTICLES`]. Lowering it
    /// does not retire live particles; it only blocks spawns until the count
    /// drops below the cap.
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = if max == 0 { DEFAULT_MAX_PARTICLES } else { max };
    }

    /// Emitter lifetime in seconds; `None` runs forever.
    pub fn emitter_lifetime(&self) -> Option<f32> {
        self.emitter_lifetime
    }

    /// Takes effect the next time emission is turned on.
    pub fn set_emitter_lifetime(&mut self, seconds: Option<f32>) {
        self.emitter_lifetime = seconds.filter(|&s| s > 0.0);
    }

    pub fn lifetime(&self) -> MinMax {
        self.lifetime
    }

    pub fn set_lifetime(&mut self, min: f32, max: f32) {
        self.lifetime = MinMax::new(min, max);
    }

    pub fn set_start_rotation(&mut self, min: f32, max: f32) {
        self.start_rotation = MinMax::new(min, max);
    }

    pub fn set_rotation_speed(&mut self, min: f32, max: f32) {
        self.rotation_speed = MinMax::new(min, max);
    }

    pub fn acceleration(&self) -> Option<Vec2> {
        self.acceleration.as_ref().map(|a| a.get())
    }

    /// Change the acceleration. Live particles that already accelerate see
    /// the new value immediately.
    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        match &self.acceleration {
            Some(shared) => shared.set(acceleration),
            None if acceleration != Vec2::ZERO => {
                self.end_speed = self.start_speed;
                self.acceleration = Some(Rc::new(Cell::new(acceleration)));
            }
            None => {}
        }
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Blend mode for particles spawned from now on.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    pub fn spawn_shape(&self) -> SpawnShape {
        self.spawn_shape
    }

    pub fn set_spawn_shape(&mut self, shape: SpawnShape) {
        self.spawn_shape = shape;
    }
}

fn parse_color(hex: &str) -> Option<[u8; 3]> {
    match hex_to_rgb(hex) {
        Ok(rgb) => Some([rgb[0], rgb[1], rgb[2]]),
        Err(err) => {
            log::error!("{err}");
            None
        }
    }
}

impl<C: ParticleContainer + fmt::Debug> fmt::Debug for Emitter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("spawn_shape", &self.spawn_shape)
            .field("emit", &self.emit)
            .field("active", &self.active.len())
            .field("pooled", &self.pool.len())
            .field("max_particles", &self.max_particles)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::TextureHandle;
    use rand::rngs::mock::StepRng;

    fn art() -> Vec<ParticleArt> {
        vec![TextureHandle::new(1).into()]
    }

    fn emitter(config: &EmitterConfig) -> Emitter {
        let mut e = Emitter::new(DisplayList::new()).with_rng(StepRng::new(0, 1 << 40));
        e.init(art(), config);
        e
    }

    #[test]
    fn test_recycle_keeps_indices_consistent() {
        let config = EmitterConfig::new().with_lifetime(10.0, 10.0).with_frequency(0.1);
        let mut e = emitter(&config);
        e.update(0.55);
        assert_eq!(e.particle_count(), 6);

        let victim = e.active_ids()[1];
        e.recycle(victim);
        assert_eq!(e.particle_count(), 4);
        assert_eq!(e.pool_len(), 1);
        for (i, &id) in e.active_ids().iter().enumerate() {
            assert_eq!(e.slots[id.index()].active_index, i);
        }

        e.recycle(victim);
        assert_eq!(e.pool_len(), 1);
        assert!(!e.container().children().contains(&victim));
    }

    #[test]
    fn test_pool_is_reused() {
        let config = EmitterConfig::new().with_lifetime(0.25, 0.25).with_frequency(0.1);
        let mut e = emitter(&config);
        for _ in 0..20 {
            e.update(0.05);
        }
        assert!(e.slots.len() <= 4);
        assert_eq!(e.slots.len(), e.particle_count() + e.pool_len());
    }

    #[test]
    fn test_invalid_frequency_disables_emission() {
        let config = EmitterConfig::new().with_lifetime(1.0, 1.0);
        let mut e = emitter(&config);
        assert!(!e.is_emitting());
        e.update(1.0);
        assert_eq!(e.particle_count(), 0);
    }

    #[test]
    fn test_init_without_art_is_ignored() {
        let config = EmitterConfig::new().with_lifetime(1.0, 1.0).with_frequency(0.1);
        let mut e = Emitter::default();
        e.init(Vec::new(), &config);
        assert!(!e.is_emitting());
    }

    #[test]
    fn test_rotate_turns_spawn_offset() {
        let config = EmitterConfig::new()
            .with_lifetime(1.0, 1.0)
            .with_frequency(1.0)
            .with_pos(10.0, 0.0);
        let mut e = emitter(&config);
        e.rotate(90.0);
        e.rotate(90.0);
        assert!((e.spawn_pos() - Vec2::new(0.0, 10.0)).length() < 1e-4);
        assert_eq!(e.rotation(), 90.0);
    }

    #[test]
    fn test_acceleration_locks_end_speed() {
        let config = EmitterConfig::new()
            .with_lifetime(1.0, 1.0)
            .with_frequency(1.0)
            .with_speed(10.0, 50.0)
            .with_acceleration(0.0, 5.0);
        let e = emitter(&config);
        assert_eq!(e.end_speed, 10.0);
        assert_eq!(e.acceleration(), Some(Vec2::new(0.0, 5.0)));
    }

    #[test]
    fn test_same_colors_do_not_interpolate() {
        let config = EmitterConfig::new()
            .with_lifetime(1.0, 1.0)
            .with_frequency(1.0)
            .with_color("#ff0000", "#ff0000");
        let e = emitter(&config);
        assert_eq!(e.start_color, Some([255, 0, 0]));
        assert_eq!(e.end_color, None);

        let config = config.with_color("nonsense", "#00ff00");
        let e = emitter(&config);
        assert_eq!(e.start_color, None);
        assert_eq!(e.end_color, Some([0, 255, 0]));
    }
}
