//! Boundary between emitters and the host renderer.
//!
//! The emitter owns particle state; the renderer owns display objects. The
//! two meet through [`ParticleId`]s: the emitter tells a
//! [`ParticleContainer`] when a particle should appear or disappear, and the
//! renderer reads the particle's visual fields (or a packed
//! [`ParticleInstance`]) each frame.

use crate::particles::Particle;
use bytemuck::{Pod, Zeroable};

/// Stable index of a particle slot inside one emitter.
///
/// Ids are reused when a pooled particle is spawned again. They are
/// invalidated by [`crate::Emitter::set_particle_factory`] and
/// [`crate::Emitter::destroy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub(crate) u32);

impl ParticleId {
    /// Slot index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Display-side collection that spawned particles are added to.
///
/// Two strategies exist. A regular container detaches particles when they
/// are recycled. A batched container (`is_batched() == true`) keeps them as
/// children and the emitter hides them instead (alpha 0, invisible), because
/// removing children from a batch is expensive.
pub trait ParticleContainer {
    /// Add a particle, at the front (drawn last) or the back (drawn first).
    fn attach(&mut self, id: ParticleId, at_back: bool);

    /// Remove a particle from the display.
    fn detach(&mut self, id: ParticleId);

    /// Move an already attached particle to the front or back.
    fn reorder(&mut self, id: ParticleId, at_back: bool) {
        self.detach(id);
        self.attach(id, at_back);
    }

    /// Whether recycled particles stay attached (and are hidden).
    fn is_batched(&self) -> bool {
        false
    }
}

/// Ordered list of attached particle ids, back to front.
///
/// The reference [`ParticleContainer`]; renderers that keep their own scene
/// graph can mirror it or implement the trait directly.
#[derive(Debug, Default, Clone)]
pub struct DisplayList {
    children: Vec<ParticleId>,
    batched: bool,
}

impl DisplayList {
    /// An empty container that detaches recycled particles.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty container that keeps recycled particles attached and hidden.
    pub fn batched() -> Self {
        Self {
            children: Vec::new(),
            batched: true,
        }
    }

    /// Attached ids, back to front.
    pub fn children(&self) -> &[ParticleId] {
        &self.children
    }

    /// Number of attached particles.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl ParticleContainer for DisplayList {
    fn attach(&mut self, id: ParticleId, at_back: bool) {
        if at_back {
            self.children.insert(0, id);
        } else {
            self.children.push(id);
        }
    }

    fn detach(&mut self, id: ParticleId) {
        if let Some(pos) = self.children.iter().position(|&c| c == id) {
            self.children.remove(pos);
        }
    }

    fn reorder(&mut self, id: ParticleId, at_back: bool) {
        let Some(pos) = self.children.iter().position(|&c| c == id) else {
            self.attach(id, at_back);
            return;
        };
        // Avoid shifting the whole list when the child is already at an end.
        if (at_back && pos == 0) || (!at_back && pos + 1 == self.children.len()) {
            return;
        }
        self.children.remove(pos);
        self.attach(id, at_back);
    }

    fn is_batched(&self) -> bool {
        self.batched
    }
}

/// Packed per-particle render data, ready for a vertex/instance buffer.
///
/// 32 bytes, no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// World position.
    pub position: [f32; 2],
    /// Rotation in radians.
    pub rotation: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Opacity, 0-1.
    pub alpha: f32,
    /// Tint as `0xRRGGBB`.
    pub tint: u32,
    /// [`crate::TextureHandle::id`] currently shown.
    pub texture: u32,
    /// [`crate::BlendMode`] discriminant.
    pub blend_mode: u32,
}

impl From<&Particle> for ParticleInstance {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            rotation: p.rotation,
            scale: p.scale,
            alpha: p.alpha,
            tint: p.tint,
            texture: p.texture.map_or(0, |t| t.id),
            blend_mode: p.blend_mode as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_list_front_and_back() {
        let mut list = DisplayList::new();
        list.attach(ParticleId(1), false);
        list.attach(ParticleId(2), false);
        list.attach(ParticleId(3), true);
        assert_eq!(list.children(), &[ParticleId(3), ParticleId(1), ParticleId(2)]);

        list.reorder(ParticleId(3), false);
        assert_eq!(list.children(), &[ParticleId(1), ParticleId(2), ParticleId(3)]);

        list.detach(ParticleId(1));
        list.detach(ParticleId(42));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
        let instances = [ParticleInstance::zeroed(); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 96);
    }
}
