/*!
 * Resource Module
 * Fixed-length resource quantity vectors
 */

mod vector;

pub use vector::{ResourceVector, VectorError, VectorResult};
