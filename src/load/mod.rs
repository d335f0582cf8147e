/*!
 * Load Generation
 * Randomized process populations for stress runs and benchmarks
 */

mod generator;

pub use generator::StressGenerator;
