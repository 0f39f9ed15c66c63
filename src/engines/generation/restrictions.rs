use crate::config::RestrictionConfig;
use crate::engines::evaluation::fitness::PenaltyWeights;

/// Adapts the penalty weights from how often the best individual satisfied
/// each soft constraint over the last `nf` generations.
#[derive(Debug, Clone)]
pub struct RestrictionController {
    config: RestrictionConfig,
    within_len_bound: usize,
    feasible_integration_const: usize,
}

impl RestrictionController {
    pub fn new(config: RestrictionConfig) -> Self {
        Self {
            config,
            within_len_bound: 0,
            feasible_integration_const: 0,
        }
    }

    pub fn initial_weights(&self) -> PenaltyWeights {
        PenaltyWeights::new(
            self.config.initial_lambda_len,
            self.config.initial_lambda_integration_const,
        )
    }

    /// Record one generation's best individual.
    pub fn observe(&mut self, within_len_bound: bool, feasible: bool) {
        if within_len_bound {
            self.within_len_bound += 1;
        }
        if feasible {
            self.feasible_integration_const += 1;
        }
    }

    pub fn is_due(&self, generation: usize) -> bool {
        generation > 0 && generation % self.config.nf == 0
    }

    /// Relax a weight whose constraint held in all `nf` observations, tighten
    /// one whose constraint never held, then reset both counters.
    ///
    /// Returns `true` when either weight changed; every cached fitness is
    /// stale from that point on.
    pub fn adapt(&mut self, weights: &mut PenaltyWeights) -> bool {
        let lambda_len = self.rescale(
            weights.lambda_genotype_len,
            self.within_len_bound,
            self.config.max_lambda_len,
        );
        let lambda_ic = self.rescale(
            weights.lambda_integration_const,
            self.feasible_integration_const,
            self.config.max_lambda_integration_const,
        );

        self.within_len_bound = 0;
        self.feasible_integration_const = 0;

        let changed = lambda_len != weights.lambda_genotype_len
            || lambda_ic != weights.lambda_integration_const;

        if changed {
            weights.lambda_genotype_len = lambda_len;
            weights.lambda_integration_const = lambda_ic;
            weights.version += 1;
            log::info!(
                "Penalty weights updated: lambda_len = {:.4}, lambda_integration_const = {:.4}",
                lambda_len,
                lambda_ic
            );
        }

        changed
    }

    fn rescale(&self, lambda: f64, satisfied: usize, max_lambda: f64) -> f64 {
        if satisfied == self.config.nf {
            (lambda / self.config.beta2).max(self.config.min_lambda)
        } else if satisfied == 0 {
            (lambda * self.config.beta1).min(max_lambda)
        } else {
            lambda
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> RestrictionController {
        RestrictionController::new(RestrictionConfig::default())
    }

    #[test]
    fn all_within_bound_relaxes_length_weight() {
        let mut controller = controller();
        let mut weights = controller.initial_weights();
        for _ in 0..5 {
            controller.observe(true, false);
        }

        assert!(controller.adapt(&mut weights));
        assert!((weights.lambda_genotype_len - 1.0 / 2.8).abs() < 1e-12);
        // never feasible: tightened but capped at the integration maximum of 1
        assert_eq!(weights.lambda_integration_const, 1.0);
        assert_eq!(weights.version, 1);
    }

    #[test]
    fn relaxation_is_floored_at_min_lambda() {
        let mut controller = controller();
        let mut weights = PenaltyWeights::new(0.15, 0.15);
        for _ in 0..5 {
            controller.observe(true, true);
        }

        assert!(controller.adapt(&mut weights));
        assert_eq!(weights.lambda_genotype_len, 0.1);
        assert_eq!(weights.lambda_integration_const, 0.1);
    }

    #[test]
    fn never_within_bound_tightens_up_to_max() {
        let mut controller = controller();
        let mut weights = controller.initial_weights();

        controller.adapt(&mut weights);
        assert_eq!(weights.lambda_genotype_len, 4.0);
        controller.adapt(&mut weights);
        assert_eq!(weights.lambda_genotype_len, 10.0);
        controller.adapt(&mut weights);
        assert_eq!(weights.lambda_genotype_len, 10.0);
    }

    #[test]
    fn mixed_observations_leave_weights_alone() {
        let mut controller = controller();
        let mut weights = controller.initial_weights();
        controller.observe(true, true);
        controller.observe(false, false);

        assert!(!controller.adapt(&mut weights));
        assert_eq!(weights, controller.initial_weights());
    }

    #[test]
    fn counters_reset_after_adapting() {
        let mut controller = controller();
        let mut weights = PenaltyWeights::new(1.0, 0.5);
        for _ in 0..5 {
            controller.observe(true, true);
        }
        controller.adapt(&mut weights);

        // No observations since the last adaptation: both weights tighten.
        let before = weights;
        assert!(controller.adapt(&mut weights));
        assert!(weights.lambda_genotype_len > before.lambda_genotype_len);
        assert!(weights.lambda_integration_const > before.lambda_integration_const);
    }

    #[test]
    fn version_counts_only_actual_changes() {
        let mut controller = controller();
        let mut weights = PenaltyWeights::new(10.0, 1.0);

        // Both weights already sit at their caps: tightening changes nothing.
        assert!(!controller.adapt(&mut weights));
        assert_eq!(weights.version, 0);

        for _ in 0..5 {
            controller.observe(true, false);
        }
        assert!(controller.adapt(&mut weights));
        assert_eq!(weights.version, 1);
    }

    #[test]
    fn due_every_nf_generations() {
        let controller = controller();
        assert!(!controller.is_due(0));
        assert!(!controller.is_due(4));
        assert!(controller.is_due(5));
        assert!(controller.is_due(10));
    }
}
