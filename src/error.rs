//! Error types for spritefx.
//!
//! This module provides error types for configuration loading, color parsing
//! and path-expression compilation. None of these abort an emitter: the
//! emitter logs them and degrades (see [`crate::Emitter::init`]).

use thiserror::Error;

/// Errors that can occur while reading or validating an emitter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text was not valid JSON for [`crate::EmitterConfig`].
    #[error("Failed to decode emitter config: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read a configuration file from disk.
    #[error("Failed to read emitter config file: {0}")]
    Io(#[from] std::io::Error),

    /// A color string could not be parsed as hex.
    #[error("Invalid color {value:?}: expected #RRGGBB, #AARRGGBB, 0xRRGGBB or RRGGBB")]
    InvalidColor {
        /// The offending color text.
        value: String,
    },

    /// No `lifetime` range was given; particles cannot be timed.
    #[error("Emitter config has no lifetime range; particles will expire immediately")]
    MissingLifetime,

    /// `spawnType` is `rect` but `spawnRect` is absent.
    #[error("Spawn type 'rect' requires a spawnRect; falling back to point")]
    MissingSpawnRect,

    /// `spawnType` is `circle` or `ring` but `spawnCircle` is absent.
    #[error("Spawn type '{0}' requires a spawnCircle; falling back to point")]
    MissingSpawnCircle(&'static str),

    /// The spawn type name is not one of point, rect, circle, ring, burst.
    #[error("Unknown spawn type {0:?}; falling back to point")]
    UnknownSpawnType(String),

    /// `frequency` must be strictly positive or the spawn loop never ends.
    #[error("Spawn frequency must be positive, got {0}; emission disabled")]
    InvalidFrequency(f32),
}

/// Errors produced while compiling a path expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// The expression contained nothing to evaluate.
    #[error("Path expression is empty")]
    Empty,

    /// A character outside the allowed set was found.
    #[error("Disallowed character {ch:?} at offset {offset}")]
    DisallowedChar {
        /// The rejected character.
        ch: char,
        /// Byte offset in the source text.
        offset: usize,
    },

    /// An identifier that is not `x` or a whitelisted math name.
    #[error("Unknown identifier {0:?}")]
    UnknownIdentifier(String),

    /// A numeric literal could not be parsed (e.g. `1.2.3`).
    #[error("Malformed number {0:?}")]
    BadNumber(String),

    /// A token appeared where the grammar does not allow it.
    #[error("Unexpected {found} at token {position}")]
    Unexpected {
        /// Description of the token found.
        found: String,
        /// Token index.
        position: usize,
    },

    /// The expression ended in the middle of a construct.
    #[error("Unexpected end of path expression")]
    UnexpectedEnd,

    /// A function was called with the wrong number of arguments.
    #[error("Function {name} expects {expected} argument(s), got {found}")]
    Arity {
        /// Function name.
        name: &'static str,
        /// Required argument count.
        expected: usize,
        /// Provided argument count.
        found: usize,
    },

    /// Parentheses, calls or signs nest deeper than the parser allows.
    #[error("Path expression nests deeper than {limit} levels")]
    TooDeep {
        /// Maximum nesting depth.
        limit: usize,
    },

    /// The expression has more tokens than the parser accepts.
    #[error("Path expression has {tokens} tokens, limit is {limit}")]
    TooLong {
        /// Token count of the rejected expression.
        tokens: usize,
        /// Maximum token count.
        limit: usize,
    },
}
