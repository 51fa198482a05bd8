use std::ops::Range;

use crate::foundation::core::Dimensions;

pub type BlendResult<T> = Result<T, BlendError>;

#[derive(thiserror::Error, Debug)]
pub enum BlendError {
    #[error("dimension mismatch: expected {expected}, image {index} is {found}")]
    DimensionMismatch {
        expected: Dimensions,
        found: Dimensions,
        index: usize,
    },

    #[error("insufficient images: blending a batch needs at least 2, got {count}")]
    InsufficientImages { count: usize },

    #[error("algorithm count mismatch: expected {expected} per-step algorithms, got {found}")]
    AlgorithmCountMismatch { expected: usize, found: usize },

    #[error("decode error: '{input}'")]
    Decode {
        input: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("encode error: '{output}'")]
    Encode {
        output: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown blend algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("work unit for rows {}..{} failed: {message}", .rows.start, .rows.end)]
    WorkUnit { rows: Range<u32>, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlendError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    pub fn decode(input: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Decode {
            input: input.into(),
            source: source.into(),
        }
    }

    pub fn encode(output: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Encode {
            output: output.into(),
            source: source.into(),
        }
    }

    /// `true` for errors raised by argument or geometry validation, before any pixel work.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. }
                | Self::InsufficientImages { .. }
                | Self::AlgorithmCountMismatch { .. }
                | Self::InvalidConfiguration(_)
                | Self::UnknownAlgorithm(_)
                | Self::InvalidBuffer(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
