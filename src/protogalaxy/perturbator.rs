//! The perturbator `F(X) = Σ_i e_i·∏_L (β_L + δ_L·X)^{bit_L(i)}`, where `e_i` is the batched
//! relation value of accumulator row `i`.
//!
//! The sum is built bottom-up over the binary tree of row indices: level `L` combines
//! pairs of degree-`L` polynomials `(p_even, p_odd)` into
//! `p_even + (β_L + δ_L·X)·p_odd`. All nodes of a level live in one flat buffer, node `j`
//! occupying the `2^(L+1)` slots starting at `j·2^(L+1)`; two buffers alternate as input and
//! output between levels.

use rayon::prelude::*;

use super::Instance;
use crate::field::HonkField;
use crate::poly::unipoly::UniPoly;
use crate::relations::utils::compute_full_honk_relation_row_value;
use crate::utils::errors::ProtoGalaxyError;
use crate::utils::math::Math;

const PARALLEL_THRESHOLD: usize = 16;

/// `[δ, δ², δ⁴, .., δ^(2^(log_n - 1))]`
pub fn compute_round_challenge_pows<F: HonkField>(log_n: usize, delta: F) -> Vec<F> {
    std::iter::successors(Some(delta), |pow| Some(pow.square()))
        .take(log_n)
        .collect()
}

/// Reusable buffers for the perturbator tree, kept by the prover across folds.
#[derive(Clone, Debug, Default)]
pub struct PerturbatorWorkspace<F> {
    current: Vec<F>,
    next: Vec<F>,
}

impl<F: HonkField> PerturbatorWorkspace<F> {
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
            next: Vec::new(),
        }
    }

    pub fn with_capacity(size: usize) -> Self {
        Self {
            current: Vec::with_capacity(size),
            next: Vec::with_capacity(size),
        }
    }

    pub fn capacity(&self) -> usize {
        self.current.capacity().min(self.next.capacity())
    }

    /// Runs the tree over the row values `e`.
    #[tracing::instrument(skip_all, name = "PerturbatorWorkspace::construct")]
    pub fn construct(
        &mut self,
        betas: &[F],
        deltas: &[F],
        e: &[F],
    ) -> Result<UniPoly<F>, ProtoGalaxyError> {
        let n = e.len();
        if n == 0 || !n.is_power_of_two() {
            return Err(ProtoGalaxyError::InvalidInstanceSize(n));
        }
        let log_n = n.log_2();
        for challenges in [betas, deltas] {
            if challenges.len() != log_n {
                return Err(ProtoGalaxyError::ChallengeLengthMismatch {
                    expected: log_n,
                    got: challenges.len(),
                });
            }
        }

        self.current.clear();
        self.current.extend_from_slice(e);
        self.next.clear();
        self.next.resize(n, F::zero());

        for (level, (beta, delta)) in betas.iter().zip(deltas.iter()).enumerate() {
            let width = 2 << level;
            let combine = |(out, input): (&mut [F], &[F])| {
                combine_node(out, input, level, *beta, *delta)
            };
            if n / width < PARALLEL_THRESHOLD {
                self.next
                    .chunks_mut(width)
                    .zip(self.current.chunks(width))
                    .for_each(combine);
            } else {
                self.next
                    .par_chunks_mut(width)
                    .zip(self.current.par_chunks(width))
                    .for_each(combine);
            }
            std::mem::swap(&mut self.current, &mut self.next);
        }

        Ok(UniPoly::from_coeff(self.current[..log_n + 1].to_vec()))
    }
}

/// Combines the two level-`level` nodes stored in `input` (halves of the slice) into one
/// node of degree `level + 1` stored at the start of `out`.
#[inline]
fn combine_node<F: HonkField>(out: &mut [F], input: &[F], level: usize, beta: F, delta: F) {
    let half = input.len() / 2;
    let (even, odd) = (&input[..level + 1], &input[half..half + level + 1]);
    out[..level + 1].copy_from_slice(even);
    out[level + 1] = F::zero();
    for (d, coeff) in odd.iter().enumerate() {
        out[d] += *coeff * beta;
        out[d + 1] += *coeff * delta;
    }
}

/// One-shot [`PerturbatorWorkspace::construct`].
pub fn construct_perturbator_coeffs<F: HonkField>(
    betas: &[F],
    deltas: &[F],
    e: &[F],
) -> Result<UniPoly<F>, ProtoGalaxyError> {
    PerturbatorWorkspace::with_capacity(e.len()).construct(betas, deltas, e)
}

/// Evaluates the batched relation on every accumulator row (in parallel) and builds the
/// perturbator from the row values.
#[tracing::instrument(skip_all, name = "compute_perturbator")]
pub fn compute_perturbator<F: HonkField>(
    accumulator: &Instance<F>,
    deltas: &[F],
    alpha: F,
    workspace: &mut PerturbatorWorkspace<F>,
) -> Result<UniPoly<F>, ProtoGalaxyError> {
    let log_n = accumulator.log_instance_size()?;
    let betas = &accumulator.folding_parameters.gate_separation_challenges;
    if betas.len() != log_n {
        return Err(ProtoGalaxyError::ChallengeLengthMismatch {
            expected: log_n,
            got: betas.len(),
        });
    }
    if deltas.len() != log_n {
        return Err(ProtoGalaxyError::ChallengeLengthMismatch {
            expected: log_n,
            got: deltas.len(),
        });
    }

    let polynomials = &accumulator.polynomials;
    let params = &accumulator.relation_parameters;
    let e: Vec<F> = (0..polynomials.size())
        .into_par_iter()
        .map(|i| compute_full_honk_relation_row_value(&polynomials.get_row(i), alpha, params))
        .collect();
    tracing::debug!(rows = e.len(), "relation row values computed");

    workspace.construct(betas, deltas, &e)
}
