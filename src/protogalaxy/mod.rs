//! ProtoGalaxy folding of Honk instances.
//!
//! A round folds the running accumulator with one incoming instance:
//!
//! 1. the prover evaluates the batched relation on every accumulator row and compresses
//!    the row values into the *perturbator* `F(X)`, using the accumulator's gate
//!    separation challenges `β` and fresh round challenges `δ`;
//! 2. after the verifier's challenge `α'`, the new gate separation challenges are
//!    `β*_L = β_L + α'·δ_L` and the *combiner* `G(X)` is evaluated over the line between
//!    the two instances, trace columns and relation parameters alike;
//! 3. after the challenge `γ`, both instances are combined linearly and the new target sum
//!    is derived from `F(α')` and the combiner quotient.

use crate::columns::ProverPolynomials;
use crate::field::HonkField;
use crate::poly::unipoly::UniPoly;
use crate::poly::univariate::MAX_UNIVARIATE_LENGTH;
use crate::relations::{RelationParameters, MAX_TOTAL_RELATION_LENGTH};
use crate::utils::errors::ProtoGalaxyError;
use crate::utils::math::Math;

pub mod combiner;
pub mod perturbator;
pub mod prover;
pub mod verifier;

pub use prover::ProtoGalaxyProver;
pub use verifier::ProtoGalaxyVerifier;

/// Instances folded per round: the accumulator and one incoming instance.
pub const NUM_INSTANCES: usize = 2;
/// Number of points the combiner is evaluated on. Relation parameters are folded too, so
/// the bound is the total relation length.
pub const COMBINER_LENGTH: usize = (MAX_TOTAL_RELATION_LENGTH - 1) * (NUM_INSTANCES - 1) + 1;
/// Number of combiner quotient evaluations sent per round, on `{2, .., COMBINER_LENGTH - 1}`.
pub const COMBINER_QUOTIENT_LENGTH: usize = COMBINER_LENGTH - NUM_INSTANCES;

const _: () = assert!(COMBINER_LENGTH <= MAX_UNIVARIATE_LENGTH);

/// Relaxation data carried by an instance: for a fresh instance, zero target sum.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FoldingParameters<F> {
    /// `β`, one per trace variable.
    pub gate_separation_challenges: Vec<F>,
    /// Claimed `Σ_i pow_i(β)·f_i`.
    pub target_sum: F,
}

/// A Honk trace together with everything needed to evaluate its relations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance<F: HonkField> {
    pub polynomials: ProverPolynomials<F>,
    pub relation_parameters: RelationParameters<F>,
    /// Subrelation separator.
    pub alpha: F,
    pub folding_parameters: FoldingParameters<F>,
}

impl<F: HonkField> Instance<F> {
    pub fn new(
        polynomials: ProverPolynomials<F>,
        relation_parameters: RelationParameters<F>,
        alpha: F,
        folding_parameters: FoldingParameters<F>,
    ) -> Self {
        Self {
            polynomials,
            relation_parameters,
            alpha,
            folding_parameters,
        }
    }

    pub fn instance_size(&self) -> usize {
        self.polynomials.size()
    }

    /// `log2` of the number of rows, for power-of-two traces.
    pub fn log_instance_size(&self) -> Result<usize, ProtoGalaxyError> {
        let size = self.instance_size();
        if size == 0 || !size.is_power_of_two() {
            return Err(ProtoGalaxyError::InvalidInstanceSize(size));
        }
        Ok(size.log_2())
    }

    pub fn to_verifier_instance(&self) -> VerifierInstance<F> {
        VerifierInstance {
            instance_size: self.instance_size(),
            relation_parameters: self.relation_parameters,
            folding_parameters: self.folding_parameters.clone(),
        }
    }
}

/// The part of an instance the folding verifier sees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifierInstance<F> {
    pub instance_size: usize,
    pub relation_parameters: RelationParameters<F>,
    pub folding_parameters: FoldingParameters<F>,
}

/// Prover messages of one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoldingProof<F: HonkField> {
    /// `F(X)`, of length `log2(instance_size) + 1`.
    pub perturbator: UniPoly<F>,
    /// `K(x)` for `x ∈ {2, .., COMBINER_LENGTH - 1}`.
    pub combiner_quotient: Vec<F>,
}

/// Output of [`ProtoGalaxyProver::fold_instances`].
#[derive(Clone, Debug)]
pub struct ProverFoldingResult<F: HonkField> {
    /// The folded instance, to be used as the next round's accumulator.
    pub accumulator: Instance<F>,
    pub proof: FoldingProof<F>,
    pub deltas: Vec<F>,
    /// `α'`
    pub perturbator_challenge: F,
    /// `F(α')`
    pub perturbator_evaluation: F,
    /// `γ`
    pub combiner_challenge: F,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::IntoStaticStr)]
pub enum FoldingState {
    Unfolded,
    PreparedForFolding,
    PerturbatorComputed,
    ChallengeReceived,
    Folded,
}

/// `β*_L = β_L + α'·δ_L`
pub fn update_gate_separation_challenges<F: HonkField>(
    betas: &[F],
    deltas: &[F],
    perturbator_challenge: F,
) -> Vec<F> {
    betas
        .iter()
        .zip(deltas.iter())
        .map(|(beta, delta)| *beta + perturbator_challenge * delta)
        .collect()
}

/// Checks shared by prover and verifier: `NUM_INSTANCES` power-of-two instances of equal
/// size, and accumulator challenges matching that size. Returns `log2` of the size.
pub(crate) fn validate_instance_shapes<F: HonkField>(
    instances: &[VerifierInstance<F>],
) -> Result<usize, ProtoGalaxyError> {
    if instances.len() != NUM_INSTANCES {
        return Err(ProtoGalaxyError::InstanceCountMismatch {
            expected: NUM_INSTANCES,
            got: instances.len(),
        });
    }
    let expected = instances[0].instance_size;
    for instance in instances.iter().skip(1) {
        if instance.instance_size != expected {
            return Err(ProtoGalaxyError::InstanceSizeMismatch {
                expected,
                got: instance.instance_size,
            });
        }
    }
    if expected == 0 || !expected.is_power_of_two() {
        return Err(ProtoGalaxyError::InvalidInstanceSize(expected));
    }
    let log_n = expected.log_2();
    let betas = &instances[0].folding_parameters.gate_separation_challenges;
    if betas.len() != log_n {
        return Err(ProtoGalaxyError::ChallengeLengthMismatch {
            expected: log_n,
            got: betas.len(),
        });
    }
    Ok(log_n)
}
