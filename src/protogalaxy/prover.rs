use itertools::Itertools;
use rayon::prelude::*;

use super::combiner::{compute_combiner, compute_combiner_quotient, compute_new_target_sum};
use super::perturbator::{compute_perturbator, compute_round_challenge_pows, PerturbatorWorkspace};
use super::{
    update_gate_separation_challenges, validate_instance_shapes, FoldingParameters, FoldingProof,
    FoldingState, Instance, ProverFoldingResult, VerifierInstance,
};
use crate::columns::ProverPolynomials;
use crate::field::HonkField;
use crate::poly::pow::PowPolynomial;
use crate::transcripts::{AppendToTranscript, Transcript};
use crate::utils::errors::ProtoGalaxyError;
use crate::utils::thread::drop_in_background_thread;

/// Folds the running accumulator with one incoming instance per round.
///
/// The prover owns its transcript and perturbator buffers across rounds: after a fold the
/// folded instance becomes the accumulator and [`ProtoGalaxyProver::next_round`] supplies the
/// next incoming instance.
pub struct ProtoGalaxyProver<F: HonkField, ProofTranscript: Transcript> {
    instances: Vec<Instance<F>>,
    transcript: ProofTranscript,
    state: FoldingState,
    workspace: PerturbatorWorkspace<F>,
}

impl<F: HonkField, ProofTranscript: Transcript> ProtoGalaxyProver<F, ProofTranscript> {
    /// The first instance is the accumulator. Nothing is checked until
    /// [`ProtoGalaxyProver::prepare_for_folding`].
    pub fn new(instances: Vec<Instance<F>>, transcript: ProofTranscript) -> Self {
        let size = instances.first().map_or(0, |instance| instance.instance_size());
        Self {
            instances,
            transcript,
            state: FoldingState::Unfolded,
            workspace: PerturbatorWorkspace::with_capacity(size),
        }
    }

    pub fn state(&self) -> FoldingState {
        self.state
    }

    pub fn transcript(&self) -> &ProofTranscript {
        &self.transcript
    }

    pub fn get_accumulator(&self) -> Option<&Instance<F>> {
        self.instances.first()
    }

    /// Queues `incoming` to be folded into the current accumulator.
    pub fn next_round(&mut self, incoming: Instance<F>) {
        self.instances.push(incoming);
        Self::transition(&mut self.state, FoldingState::Unfolded);
    }

    fn transition(state: &mut FoldingState, next: FoldingState) {
        tracing::debug!(from = ?*state, to = ?next, "folding state transition");
        *state = next;
    }

    /// Validates the instances and absorbs their public data into the transcript. Fails
    /// before any field arithmetic if the instances cannot be folded together. Relation
    /// parameters may differ between instances; they are folded along with the trace.
    #[tracing::instrument(skip_all, name = "ProtoGalaxyProver::prepare_for_folding")]
    pub fn prepare_for_folding(&mut self) -> Result<(), ProtoGalaxyError> {
        if self.state == FoldingState::PreparedForFolding {
            return Ok(());
        }
        let shapes: Vec<VerifierInstance<F>> = self
            .instances
            .iter()
            .map(Instance::to_verifier_instance)
            .collect();
        validate_instance_shapes(&shapes)?;

        for shape in shapes.iter() {
            absorb_instance(&mut self.transcript, shape);
        }
        Self::transition(&mut self.state, FoldingState::PreparedForFolding);
        Ok(())
    }

    /// Runs one folding round and returns the folded instance with the round's proof.
    #[tracing::instrument(skip_all, name = "ProtoGalaxyProver::fold_instances")]
    pub fn fold_instances(&mut self) -> Result<ProverFoldingResult<F>, ProtoGalaxyError> {
        self.prepare_for_folding()?;

        let log_n = self.instances[0].log_instance_size()?;
        let delta: F = self.transcript.get_challenge(b"delta");
        let deltas = compute_round_challenge_pows(log_n, delta);

        let (perturbator, betas_star, perturbator_challenge, perturbator_evaluation, combiner) = {
            let (accumulator, incoming) = (&self.instances[0], &self.instances[1]);
            let perturbator =
                compute_perturbator(accumulator, &deltas, accumulator.alpha, &mut self.workspace)?;
            perturbator.append_to_transcript(b"perturbator", &mut self.transcript);
            Self::transition(&mut self.state, FoldingState::PerturbatorComputed);

            let perturbator_challenge: F = self.transcript.get_challenge(b"perturbator_challenge");
            Self::transition(&mut self.state, FoldingState::ChallengeReceived);
            let perturbator_evaluation = perturbator.evaluate(&perturbator_challenge);
            let betas_star = update_gate_separation_challenges(
                &accumulator.folding_parameters.gate_separation_challenges,
                &deltas,
                perturbator_challenge,
            );
            let combiner = compute_combiner(
                accumulator,
                incoming,
                &PowPolynomial::new(betas_star.clone()),
                accumulator.alpha,
            );
            (
                perturbator,
                betas_star,
                perturbator_challenge,
                perturbator_evaluation,
                combiner,
            )
        };

        let combiner_quotient = compute_combiner_quotient(&combiner, perturbator_evaluation)?;
        self.transcript
            .send_scalars_to_verifier(b"combiner_quotient", &combiner_quotient);
        let combiner_challenge: F = self.transcript.get_challenge(b"combiner_quotient_challenge");
        let target_sum =
            compute_new_target_sum(perturbator_evaluation, &combiner_quotient, combiner_challenge)?;

        let mut instances = std::mem::take(&mut self.instances).into_iter();
        let (accumulator, incoming) = match (instances.next(), instances.next()) {
            (Some(accumulator), Some(incoming)) => (accumulator, incoming),
            _ => unreachable!("instance count is validated"),
        };
        let folded = Instance::new(
            fold_polynomials(&accumulator.polynomials, &incoming.polynomials, combiner_challenge),
            accumulator
                .relation_parameters
                .fold(&incoming.relation_parameters, combiner_challenge),
            accumulator.alpha,
            FoldingParameters {
                gate_separation_challenges: betas_star,
                target_sum,
            },
        );
        drop_in_background_thread(accumulator);
        drop_in_background_thread(incoming);

        self.instances = vec![folded.clone()];
        Self::transition(&mut self.state, FoldingState::Folded);
        tracing::info!(log_n, "folded instances");

        Ok(ProverFoldingResult {
            accumulator: folded,
            proof: FoldingProof {
                perturbator,
                combiner_quotient,
            },
            deltas,
            perturbator_challenge,
            perturbator_evaluation,
            combiner_challenge,
        })
    }
}

/// Public data of an instance, absorbed before the round's first challenge.
pub(crate) fn absorb_instance<F: HonkField, ProofTranscript: Transcript>(
    transcript: &mut ProofTranscript,
    instance: &VerifierInstance<F>,
) {
    transcript.send_u64_to_verifier(b"instance_size", instance.instance_size as u64);
    transcript.send_scalars_to_verifier(
        b"relation_parameters",
        &instance.relation_parameters.to_vec(),
    );
    transcript.send_scalars_to_verifier(
        b"gate_separation_challenges",
        &instance.folding_parameters.gate_separation_challenges,
    );
    transcript.send_to_verifier(b"target_sum", &instance.folding_parameters.target_sum);
}

/// `(1 - γ)·ω_0 + γ·ω_1`, column by column.
#[tracing::instrument(skip_all, name = "fold_polynomials")]
fn fold_polynomials<F: HonkField>(
    accumulator: &ProverPolynomials<F>,
    incoming: &ProverPolynomials<F>,
    challenge: F,
) -> ProverPolynomials<F> {
    let columns: Vec<Vec<F>> = accumulator
        .columns()
        .par_iter()
        .zip_eq(incoming.columns().par_iter())
        .map(|(lhs, rhs)| {
            lhs.iter()
                .zip_eq(rhs.iter())
                .map(|(l, r)| *l + challenge * (*r - l))
                .collect::<Vec<F>>()
        })
        .collect();
    ProverPolynomials::from_columns_unchecked(columns, accumulator.size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::HonkColumn;
    use crate::poly::univariate::Univariate;
    use crate::relations::utils::compute_full_honk_relation_row_value;
    use crate::relations::RelationParameters;
    use crate::transcripts::KeccakTranscript;
    use crate::utils::test_trace::{random_relation_parameters, satisfying_instance};
    use ark_bn254::Fr;
    use ark_std::{test_rng, Zero};

    fn pow_weighted_relation_sum(instance: &Instance<Fr>) -> Fr {
        let pow = PowPolynomial::new(instance.folding_parameters.gate_separation_challenges.clone());
        pow.evals()
            .iter()
            .enumerate()
            .map(|(i, weight)| {
                *weight
                    * compute_full_honk_relation_row_value(
                        &instance.polynomials.get_row(i),
                        instance.alpha,
                        &instance.relation_parameters,
                    )
            })
            .sum()
    }

    fn instances(log_n: usize) -> (Instance<Fr>, Instance<Fr>, RelationParameters<Fr>, Fr) {
        let mut rng = test_rng();
        let params = random_relation_parameters::<Fr, _>(&mut rng, 1 << log_n);
        let alpha = Fr::random(&mut rng);
        let acc = satisfying_instance(log_n, &params, alpha, &mut rng).unwrap();
        let incoming = satisfying_instance(log_n, &params, alpha, &mut rng).unwrap();
        (acc, incoming, params, alpha)
    }

    #[test]
    fn folded_target_sum_is_relation_sum_of_folded_instance() {
        let (acc, incoming, _, _) = instances(3);
        let mut prover = ProtoGalaxyProver::new(vec![acc, incoming], KeccakTranscript::new(b"fold"));
        assert_eq!(prover.state(), FoldingState::Unfolded);

        let result = prover.fold_instances().unwrap();
        assert_eq!(prover.state(), FoldingState::Folded);
        assert_eq!(prover.get_accumulator(), Some(&result.accumulator));

        let folded = &result.accumulator;
        assert!(!folded.folding_parameters.target_sum.is_zero());
        assert_eq!(folded.folding_parameters.target_sum, pow_weighted_relation_sum(folded));
        assert_eq!(result.proof.perturbator.len(), 4);
        assert!(result.proof.perturbator.is_zero());
        assert_eq!(result.perturbator_evaluation, Fr::zero());
    }

    #[test]
    fn folding_is_linear_in_the_challenge() {
        let (acc, incoming, _, _) = instances(2);
        let (lhs, rhs) = (acc.polynomials.clone(), incoming.polynomials.clone());
        let mut prover = ProtoGalaxyProver::new(vec![acc, incoming], KeccakTranscript::new(b"fold"));
        let result = prover.fold_instances().unwrap();
        let gamma = result.combiner_challenge;
        for column in HonkColumn::unshifted() {
            for row in 0..lhs.size() {
                let line = Univariate::extend_edge(lhs[column][row], rhs[column][row], 2);
                assert_eq!(result.accumulator.polynomials[column][row], line.evaluate(gamma));
            }
        }
    }

    #[test]
    fn consecutive_rounds_keep_the_invariant() {
        let mut rng = test_rng();
        let (acc, incoming, params, alpha) = instances(3);
        let mut prover = ProtoGalaxyProver::new(vec![acc, incoming], KeccakTranscript::new(b"fold"));
        prover.fold_instances().unwrap();

        let fresh = satisfying_instance(3, &params, alpha, &mut rng).unwrap();
        prover.next_round(fresh);
        assert_eq!(prover.state(), FoldingState::Unfolded);
        let result = prover.fold_instances().unwrap();
        let folded = &result.accumulator;
        assert_eq!(folded.folding_parameters.target_sum, pow_weighted_relation_sum(folded));
        // The second round's perturbator opens to the first round's target sum.
        assert!(!result.proof.perturbator.eval_at_zero().is_zero());
    }

    #[test]
    fn mismatched_sizes_fail_before_any_work() {
        let mut rng = test_rng();
        let params = random_relation_parameters::<Fr, _>(&mut rng, 4);
        let alpha = Fr::random(&mut rng);
        let acc = satisfying_instance(2, &params, alpha, &mut rng).unwrap();
        let mut small = satisfying_instance(2, &params, alpha, &mut rng).unwrap();
        let columns = small
            .polynomials
            .columns()
            .iter()
            .map(|column| column[..3].to_vec())
            .collect();
        small.polynomials = ProverPolynomials::new(columns).unwrap();

        let transcript = KeccakTranscript::new(b"fold");
        let untouched = transcript.state;
        let mut prover = ProtoGalaxyProver::new(vec![acc, small], transcript);
        let err = prover.fold_instances().unwrap_err();
        assert_eq!(
            err,
            ProtoGalaxyError::InstanceSizeMismatch {
                expected: 4,
                got: 3
            }
        );
        assert!(err.is_configuration_error());
        assert_eq!(prover.state(), FoldingState::Unfolded);
        assert_eq!(prover.transcript().state, untouched);
    }

    #[test]
    fn other_configuration_errors() {
        let (acc, incoming, _, _) = instances(2);

        let mut prover = ProtoGalaxyProver::new(vec![acc.clone()], KeccakTranscript::new(b"fold"));
        assert_eq!(
            prover.prepare_for_folding(),
            Err(ProtoGalaxyError::InstanceCountMismatch {
                expected: 2,
                got: 1
            })
        );

        let mut short = acc.clone();
        short.folding_parameters.gate_separation_challenges.pop();
        let mut prover =
            ProtoGalaxyProver::new(vec![short, incoming.clone()], KeccakTranscript::new(b"fold"));
        assert_eq!(
            prover.prepare_for_folding(),
            Err(ProtoGalaxyError::ChallengeLengthMismatch {
                expected: 2,
                got: 1
            })
        );

        let mut prover = ProtoGalaxyProver::new(
            vec![acc.clone(), acc.clone(), incoming],
            KeccakTranscript::new(b"fold"),
        );
        assert_eq!(
            prover.prepare_for_folding(),
            Err(ProtoGalaxyError::InstanceCountMismatch {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn instances_with_their_own_parameters_fold() {
        let mut rng = test_rng();
        let alpha = Fr::random(&mut rng);
        let acc_params = random_relation_parameters::<Fr, _>(&mut rng, 8);
        let incoming_params = random_relation_parameters::<Fr, _>(&mut rng, 8);
        let acc = satisfying_instance(3, &acc_params, alpha, &mut rng).unwrap();
        let incoming = satisfying_instance(3, &incoming_params, alpha, &mut rng).unwrap();

        let mut prover = ProtoGalaxyProver::new(vec![acc, incoming], KeccakTranscript::new(b"fold"));
        let result = prover.fold_instances().unwrap();
        let folded = &result.accumulator;
        assert_eq!(
            folded.relation_parameters,
            acc_params.fold(&incoming_params, result.combiner_challenge)
        );
        assert_eq!(folded.folding_parameters.target_sum, pow_weighted_relation_sum(folded));

        let fresh_params = random_relation_parameters::<Fr, _>(&mut rng, 8);
        prover.next_round(satisfying_instance(3, &fresh_params, alpha, &mut rng).unwrap());
        let result = prover.fold_instances().unwrap();
        let folded = &result.accumulator;
        assert_eq!(folded.folding_parameters.target_sum, pow_weighted_relation_sum(folded));
    }

    #[test]
    fn round_challenges_depend_on_gate_separation_challenges() {
        let (acc, incoming, _, _) = instances(2);
        let mut shifted = acc.clone();
        shifted.folding_parameters.gate_separation_challenges[0] += Fr::from(1u64);

        let deltas = |accumulator: Instance<Fr>| {
            ProtoGalaxyProver::new(vec![accumulator, incoming.clone()], KeccakTranscript::new(b"fold"))
                .fold_instances()
                .unwrap()
                .deltas
        };
        assert_ne!(deltas(acc), deltas(shifted));
    }

    #[test]
    fn folding_twice_without_new_instance_is_rejected() {
        let (acc, incoming, _, _) = instances(2);
        let mut prover = ProtoGalaxyProver::new(vec![acc, incoming], KeccakTranscript::new(b"fold"));
        prover.fold_instances().unwrap();
        assert!(matches!(
            prover.fold_instances(),
            Err(ProtoGalaxyError::InstanceCountMismatch { got: 1, .. })
        ));
    }
}
