//! Particles that follow `y = f(x)` instead of a straight line.
//!
//! The curve comes from `extraData.path`, e.g. `"sin(x / 20) * 30"`. `x` is
//! the distance travelled along the spawn heading; the resulting offset is
//! rotated by the spawn angle and added to the spawn position.

use super::{Particle, ParticleBehavior, PathCache, SharedExtraData};
use crate::expression::PathExpr;
use crate::utils::rotate_point;
use glam::Vec2;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct PathParticle {
    core: Particle,
    path: Option<Rc<PathExpr>>,
    /// Spawn rotation in degrees.
    initial_rotation: f32,
    initial_position: Vec2,
    /// Distance travelled along the path's x axis.
    movement: f32,
}

impl PathParticle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled path, or `None` when the particle moves in a straight line.
    pub fn path(&self) -> Option<&PathExpr> {
        self.path.as_deref()
    }

    fn resolve_path(&self, shared: &mut SharedExtraData) -> Option<Rc<PathExpr>> {
        match &shared.path {
            PathCache::Ready(expr) => return Some(Rc::clone(expr)),
            PathCache::Failed => return None,
            PathCache::Unresolved => {}
        }

        let source = self
            .core
            .extra_data
            .as_deref()
            .and_then(|data| data.get("path"))
            .and_then(|path| path.as_str());
        let compiled = match source {
            Some(source) => match PathExpr::parse(source) {
                Ok(expr) => Some(Rc::new(expr)),
                Err(err) => {
                    log::error!("Failed to parse path expression {source:?}: {err}");
                    None
                }
            },
            None => {
                log::error!("Path particle requires a path string in extraData");
                None
            }
        };

        shared.path = match &compiled {
            Some(expr) => PathCache::Ready(Rc::clone(expr)),
            None => PathCache::Failed,
        };
        compiled
    }
}

impl ParticleBehavior for PathParticle {
    fn particle(&self) -> &Particle {
        &self.core
    }

    fn particle_mut(&mut self) -> &mut Particle {
        &mut self.core
    }

    fn init(&mut self, shared: &mut SharedExtraData) {
        self.initial_rotation = self.core.rotation;
        self.core.init();

        self.path = self.resolve_path(shared);
        self.core.set_normal_movement(self.path.is_none());
        self.movement = 0.0;
        self.initial_position = self.core.position;
    }

    fn update(&mut self, delta: f32) -> Option<f32> {
        let lerp = self.core.update(delta)?;
        if let Some(path) = &self.path {
            self.movement += self.core.speed_at(lerp) * delta;
            let mut offset = Vec2::new(self.movement, path.eval(self.movement));
            rotate_point(self.initial_rotation, &mut offset);
            self.core.position = self.initial_position + offset;
        }
        Some(lerp)
    }

    fn destroy(&mut self) {
        self.path = None;
        self.core.destroy();
    }
}
