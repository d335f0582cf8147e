/*!
 * Resource Vectors
 * Elementwise arithmetic over per-resource-type quantities
 */

use crate::core::limits::STANDARD_REQUEST_UNIT;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Vector arithmetic result
pub type VectorResult<T> = Result<T, VectorError>;

/// Vector arithmetic errors
///
/// Quantities are unsigned, so an operation that would go negative is
/// reported instead of clamped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorError {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("resource {resource} would go negative")]
    Underflow { resource: usize },

    #[error("resource {resource} overflowed")]
    Overflow { resource: usize },
}

/// Quantity of every resource type, one entry per type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector(Vec<u32>);

impl ResourceVector {
    #[inline]
    pub fn new(units: Vec<u32>) -> Self {
        Self(units)
    }

    /// All-zero vector with `len` resource types
    #[inline]
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    /// `value` units of every resource type
    #[inline]
    pub fn splat(len: usize, value: u32) -> Self {
        Self(vec![value; len])
    }

    /// The standard request: [`STANDARD_REQUEST_UNIT`] of every resource type
    #[inline]
    pub fn unit(len: usize) -> Self {
        Self::splat(len, STANDARD_REQUEST_UNIT)
    }

    /// Number of resource types
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    #[inline]
    pub fn get(&self, resource: usize) -> Option<u32> {
        self.0.get(resource).copied()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }

    /// Fail unless `other` has the same number of resource types
    #[inline]
    pub fn check_dimension(&self, other: &ResourceVector) -> VectorResult<()> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(VectorError::DimensionMismatch {
                expected: self.len(),
                actual: other.len(),
            })
        }
    }

    /// `self - other`, failing on the first component that would go negative
    pub fn checked_sub(&self, other: &ResourceVector) -> VectorResult<ResourceVector> {
        self.check_dimension(other)?;
        self.0
            .iter()
            .zip(&other.0)
            .enumerate()
            .map(|(resource, (&a, &b))| {
                a.checked_sub(b).ok_or(VectorError::Underflow { resource })
            })
            .collect::<VectorResult<Vec<_>>>()
            .map(ResourceVector)
    }

    /// `self + other`
    pub fn checked_add(&self, other: &ResourceVector) -> VectorResult<ResourceVector> {
        let mut sum = self.clone();
        sum.accumulate(other)?;
        Ok(sum)
    }

    /// In-place `self += other`
    ///
    /// On error `self` is left unchanged.
    pub fn accumulate(&mut self, other: &ResourceVector) -> VectorResult<()> {
        self.check_dimension(other)?;
        if let Some(resource) = self
            .0
            .iter()
            .zip(&other.0)
            .position(|(&a, &b)| a.checked_add(b).is_none())
        {
            return Err(VectorError::Overflow { resource });
        }
        for (a, &b) in self.0.iter_mut().zip(&other.0) {
            *a += b;
        }
        Ok(())
    }

    /// True when every component is `<=` the matching component of `bound`
    ///
    /// Both vectors must have the same dimension.
    #[inline]
    pub fn fits_within(&self, bound: &ResourceVector) -> bool {
        debug_assert_eq!(self.len(), bound.len());
        self.0.iter().zip(&bound.0).all(|(&a, &b)| a <= b)
    }

    /// First resource index where `self` exceeds `bound`
    pub fn first_excess(&self, bound: &ResourceVector) -> Option<usize> {
        self.0.iter().zip(&bound.0).position(|(&a, &b)| a > b)
    }
}

impl From<Vec<u32>> for ResourceVector {
    fn from(units: Vec<u32>) -> Self {
        Self(units)
    }
}

impl<const N: usize> From<[u32; N]> for ResourceVector {
    fn from(units: [u32; N]) -> Self {
        Self(units.to_vec())
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}
