//! Easing for particle interpolation.
//!
//! Particles interpolate alpha, scale, speed and color by a progress value
//! in `[0, 1]`. An [`Ease`] remaps that progress before it is used.
//!
//! Three flavours are supported:
//!
//! | Variant | Signature | Source |
//! |---------|-----------|--------|
//! | [`Ease::Curve`] | segment list | curve editors (`{s, cp, e}` triples) |
//! | [`Ease::Simple`] | `t -> p` | one-argument ease functions |
//! | [`Ease::Tween`] | `(t, b, c, d) -> v` | classic tween libraries |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// One quadratic piece of a custom ease curve: start, control point, end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EaseSegment {
    /// Value at the start of the segment.
    pub s: f32,
    /// Control value.
    pub cp: f32,
    /// Value at the end of the segment.
    pub e: f32,
}

impl EaseSegment {
    /// Create a segment.
    pub fn new(s: f32, cp: f32, e: f32) -> Self {
        Self { s, cp, e }
    }

    #[inline]
    fn blend(&self, t: f32) -> f32 {
        self.s + t * (2.0 * (1.0 - t) * (self.cp - self.s) + t * (self.e - self.s))
    }
}

/// Progress remapping applied by particles each update.
#[derive(Clone)]
pub enum Ease {
    /// Piecewise quadratic curve, see [`generate_ease`].
    Curve(Rc<[EaseSegment]>),
    /// `progress -> progress`.
    Simple(Rc<dyn Fn(f32) -> f32>),
    /// `(time, begin, change, duration) -> value`, called as `(t, 0, 1, 1)`.
    Tween(Rc<dyn Fn(f32, f32, f32, f32) -> f32>),
}

impl Ease {
    /// Build a curve ease from a segment list.
    pub fn from_segments(segments: &[EaseSegment]) -> Self {
        Ease::Curve(segments.into())
    }

    /// Wrap a one-argument ease function.
    pub fn simple(f: impl Fn(f32) -> f32 + 'static) -> Self {
        Ease::Simple(Rc::new(f))
    }

    /// Wrap a four-argument tween function.
    pub fn tween(f: impl Fn(f32, f32, f32, f32) -> f32 + 'static) -> Self {
        Ease::Tween(Rc::new(f))
    }

    /// Remap `time` in `[0, 1]` to eased progress.
    #[inline]
    pub fn apply(&self, time: f32) -> f32 {
        match self {
            Ease::Curve(segments) => evaluate_segments(segments, time),
            Ease::Simple(f) => f(time),
            Ease::Tween(f) => f(time, 0.0, 1.0, 1.0),
        }
    }
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Curve(segments) => f.debug_tuple("Curve").field(&segments.len()).finish(),
            Ease::Simple(_) => f.write_str("Simple(..)"),
            Ease::Tween(_) => f.write_str("Tween(..)"),
        }
    }
}

/// Generate an ease function from curve-editor segments.
///
/// `[0, 1]` is split into `segments.len()` equal buckets; `time` picks a
/// bucket and is re-parameterised within it. Times past the last bucket are
/// evaluated against the last segment. An empty list is linear.
pub fn generate_ease(segments: &[EaseSegment]) -> impl Fn(f32) -> f32 {
    let segments: Vec<EaseSegment> = segments.to_vec();
    move |time| evaluate_segments(&segments, time)
}

fn evaluate_segments(segments: &[EaseSegment], time: f32) -> f32 {
    let qty = segments.len();
    if qty == 0 {
        return time;
    }
    let scaled = time * qty as f32;
    // `as usize` saturates negatives to 0
    let i = (scaled.floor() as usize).min(qty - 1);
    let t = scaled - i as f32;
    segments[i].blend(t)
}
