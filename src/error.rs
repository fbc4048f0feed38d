//! Shape generation error types.

use thiserror::Error;

/// Errors reported when a shape is configured or assembled.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("{shape}: {parameter} must be positive and finite, got {value}")]
    InvalidDimension {
        shape: &'static str,
        parameter: &'static str,
        value: f32,
    },
    #[error("{shape}: {parameter} must be at least {min}, got {value}")]
    TooFewSegments {
        shape: &'static str,
        parameter: &'static str,
        min: u32,
        value: u32,
    },
    #[error("{shape}: {vertices} vertices and {indices} indices exceed the u32 index range")]
    TooManySegments {
        shape: &'static str,
        vertices: u64,
        indices: u64,
    },
    #[error("sphere: cut planes must satisfy -{radius} <= bottom ({bottom}) < top ({top}) <= {radius}")]
    InvalidCutRange { radius: f32, top: f32, bottom: f32 },
    #[error("no vertex attributes selected")]
    EmptyAttributeSet,
}

pub type ShapeResult<T> = Result<T, ShapeError>;

/// Reject non-positive or non-finite dimensions.
pub(crate) fn positive(shape: &'static str, parameter: &'static str, value: f32) -> ShapeResult<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ShapeError::InvalidDimension {
            shape,
            parameter,
            value,
        })
    }
}

/// Reject segment counts below `min`.
pub(crate) fn at_least(
    shape: &'static str,
    parameter: &'static str,
    min: u32,
    value: u32,
) -> ShapeResult<u32> {
    if value >= min {
        Ok(value)
    } else {
        Err(ShapeError::TooFewSegments {
            shape,
            parameter,
            min,
            value,
        })
    }
}

/// Reject segment counts whose vertex or index totals do not fit in `u32`.
pub(crate) fn within_index_range(shape: &'static str, vertices: u64, indices: u64) -> ShapeResult<()> {
    if vertices <= u32::MAX as u64 && indices <= u32::MAX as u64 {
        Ok(())
    } else {
        Err(ShapeError::TooManySegments {
            shape,
            vertices,
            indices,
        })
    }
}
