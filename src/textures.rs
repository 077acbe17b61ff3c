//! Texture tokens for particle art.
//!
//! spritefx never loads images. The host renderer registers its textures and
//! hands the emitter opaque [`TextureHandle`]s; particles store whichever
//! handle they are currently showing.
//!
//! # Art kinds
//!
//! | Kind | Used by |
//! |------|---------|
//! | [`ParticleArt::Texture`] | plain and path particles |
//! | [`ParticleArt::Frames`] | animated particles (a flipbook) |

/// Opaque reference to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle {
    /// Renderer-side texture id.
    pub id: u32,
    /// Id of the backing image. Frames cut from one atlas share a base.
    pub base: u32,
}

impl TextureHandle {
    /// A texture that is its own image.
    pub fn new(id: u32) -> Self {
        Self { id, base: id }
    }

    /// A region of a shared atlas image.
    pub fn in_atlas(id: u32, base: u32) -> Self {
        Self { id, base }
    }
}

/// Art assigned to a particle when it is spawned.
#[derive(Debug, Clone, PartialEq)]
pub enum ParticleArt {
    /// A single still texture.
    Texture(TextureHandle),
    /// An ordered list of animation frames.
    Frames(Vec<TextureHandle>),
}

impl ParticleArt {
    /// The first texture of this art, if any.
    pub fn first(&self) -> Option<TextureHandle> {
        match self {
            ParticleArt::Texture(t) => Some(*t),
            ParticleArt::Frames(frames) => frames.first().copied(),
        }
    }

    /// Base image ids referenced by this art.
    fn bases(&self) -> impl Iterator<Item = u32> + '_ {
        let (single, frames) = match self {
            ParticleArt::Texture(t) => (Some(t.base), &[][..]),
            ParticleArt::Frames(frames) => (None, frames.as_slice()),
        };
        single.into_iter().chain(frames.iter().map(|t| t.base))
    }
}

impl From<TextureHandle> for ParticleArt {
    fn from(t: TextureHandle) -> Self {
        ParticleArt::Texture(t)
    }
}

impl From<Vec<TextureHandle>> for ParticleArt {
    fn from(frames: Vec<TextureHandle>) -> Self {
        ParticleArt::Frames(frames)
    }
}

/// Whether every texture in `art` comes from the same backing image.
///
/// Renderers batch draws per image, so mixing images costs draw calls.
pub fn shares_base_image(art: &[ParticleArt]) -> bool {
    let mut bases = art.iter().flat_map(ParticleArt::bases);
    match bases.next() {
        Some(first) => bases.all(|b| b == first),
        None => true,
    }
}
