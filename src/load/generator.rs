/*!
 * Stress Generator
 *
 * Injects batches of fresh processes through the public
 * `create_process` contract, so generated load is subject to exactly the
 * same validation as any other caller.
 */

use crate::admission::AdmissionController;
use crate::config::EngineConfig;
use crate::core::errors::EngineResult;
use crate::core::types::ProcessId;
use crate::resources::ResourceVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Random process population generator
pub struct StressGenerator {
    rng: StdRng,
    batch: usize,
    max_claim: u32,
}

impl StressGenerator {
    /// Generator seeded from OS entropy
    pub fn new(batch: usize, max_claim: u32) -> Self {
        Self::with_rng(StdRng::from_entropy(), batch, max_claim)
    }

    /// Reproducible generator
    pub fn seeded(seed: u64, batch: usize, max_claim: u32) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), batch, max_claim)
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.stress_batch, config.stress_max_claim)
    }

    fn with_rng(rng: StdRng, batch: usize, max_claim: u32) -> Self {
        Self {
            rng,
            batch,
            max_claim: max_claim.max(1),
        }
    }

    /// Random max claim in `1..=max_claim` per type, capped by `total`
    pub fn random_claim(&mut self, total: &ResourceVector) -> ResourceVector {
        ResourceVector::new(
            total
                .iter()
                .map(|cap| match self.max_claim.min(cap) {
                    0 => 0,
                    upper => self.rng.gen_range(1..=upper),
                })
                .collect(),
        )
    }

    /// Create one batch of zero-allocation processes
    ///
    /// Stops at the first creation error; processes created before it stay.
    pub fn inject(&mut self, controller: &AdmissionController) -> EngineResult<Vec<ProcessId>> {
        let total = controller.total_resources().clone();
        let mut created = Vec::with_capacity(self.batch);

        for _ in 0..self.batch {
            let max = self.random_claim(&total);
            created.push(controller.create_process(ResourceVector::zeros(total.len()), max)?);
        }

        info!(count = created.len(), "stress test: processes injected");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_stay_in_range() {
        let mut gen = StressGenerator::seeded(7, 10, 5);
        let total = ResourceVector::from([15, 3, 0]);
        for _ in 0..200 {
            let claim = gen.random_claim(&total);
            assert!((1..=5).contains(&claim.as_slice()[0]));
            assert!((1..=3).contains(&claim.as_slice()[1]));
            assert_eq!(claim.as_slice()[2], 0);
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let total = ResourceVector::from([15, 12, 10]);
        let mut a = StressGenerator::seeded(42, 10, 5);
        let mut b = StressGenerator::seeded(42, 10, 5);
        for _ in 0..20 {
            assert_eq!(a.random_claim(&total), b.random_claim(&total));
        }
    }

    #[test]
    fn test_inject_creates_batch() {
        let controller = AdmissionController::new([15, 12, 10]);
        let mut gen = StressGenerator::seeded(1, 10, 5);
        let pids = gen.inject(&controller).unwrap();

        assert_eq!(pids.len(), 10);
        assert_eq!(controller.active_count(), 10);
        assert_eq!(controller.available(), ResourceVector::from([15, 12, 10]));
        for pid in pids {
            assert!(controller.process(pid).unwrap().allocation().is_zero());
        }
    }
}
