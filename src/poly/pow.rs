use rayon::prelude::*;

use crate::field::HonkField;
use crate::utils::math::Math;

const PARALLEL_THRESHOLD: usize = 16;

/// Gate-separation weights for a trace with `betas.len()` variables:
/// `pow_i(β) = ∏_L β_L^{bit_L(i)}`, where bit 0 is the least significant bit of the row
/// index `i`.
pub struct PowPolynomial<F> {
    betas: Vec<F>,
}

impl<F: HonkField> PowPolynomial<F> {
    pub fn new(betas: Vec<F>) -> Self {
        PowPolynomial { betas }
    }

    pub fn num_vars(&self) -> usize {
        self.betas.len()
    }

    /// `pow_i(β)` for a single row.
    pub fn evaluate_at_row(&self, row: usize) -> F {
        self.betas
            .iter()
            .enumerate()
            .filter(|(level, _)| (row >> level) & 1 == 1)
            .map(|(_, beta)| *beta)
            .product()
    }

    /// All `2^num_vars` weights. Level `L` doubles the table: the upper half is the lower
    /// half scaled by `β_L`.
    #[tracing::instrument(skip_all, name = "PowPolynomial::evals")]
    pub fn evals(&self) -> Vec<F> {
        let mut evals: Vec<F> = Vec::with_capacity(self.num_vars().pow2());
        evals.push(F::one());
        for (level, beta) in self.betas.iter().enumerate() {
            let upper: Vec<F> = if level < PARALLEL_THRESHOLD {
                evals.iter().map(|eval| *eval * beta).collect()
            } else {
                evals.par_iter().map(|eval| *eval * beta).collect()
            };
            evals.extend(upper);
        }
        evals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::test_rng;

    #[test]
    fn evals_match_pointwise_evaluation() {
        let mut rng = test_rng();
        let betas: Vec<Fr> = (0..5).map(|_| Fr::random(&mut rng)).collect();
        let pow = PowPolynomial::new(betas.clone());
        let evals = pow.evals();
        assert_eq!(evals.len(), 32);
        for (row, eval) in evals.iter().enumerate() {
            assert_eq!(*eval, pow.evaluate_at_row(row));
        }
        assert_eq!(evals[0b00101], betas[0] * betas[2]);
    }
}
