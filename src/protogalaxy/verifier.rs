use std::marker::PhantomData;

use super::combiner::compute_new_target_sum;
use super::perturbator::compute_round_challenge_pows;
use super::prover::absorb_instance;
use super::{
    update_gate_separation_challenges, validate_instance_shapes, FoldingParameters, FoldingProof,
    VerifierInstance, COMBINER_QUOTIENT_LENGTH,
};
use crate::field::HonkField;
use crate::transcripts::{AppendToTranscript, Transcript};
use crate::utils::errors::ProtoGalaxyError;

/// Replays a folding round from public data only and derives the folded instance's
/// challenges and target sum.
pub struct ProtoGalaxyVerifier<F: HonkField, ProofTranscript: Transcript> {
    transcript: ProofTranscript,
    _marker: PhantomData<F>,
}

impl<F: HonkField, ProofTranscript: Transcript> ProtoGalaxyVerifier<F, ProofTranscript> {
    pub fn new(transcript: ProofTranscript) -> Self {
        Self {
            transcript,
            _marker: PhantomData,
        }
    }

    pub fn transcript(&self) -> &ProofTranscript {
        &self.transcript
    }

    #[cfg(test)]
    pub(crate) fn transcript_mut(&mut self) -> &mut ProofTranscript {
        &mut self.transcript
    }

    /// Checks `proof` against the accumulator's target sum and returns the public part of
    /// the folded instance.
    #[tracing::instrument(skip_all, name = "ProtoGalaxyVerifier::verify_folding")]
    pub fn verify_folding(
        &mut self,
        accumulator: &VerifierInstance<F>,
        incoming: &VerifierInstance<F>,
        proof: &FoldingProof<F>,
    ) -> Result<VerifierInstance<F>, ProtoGalaxyError> {
        let instances = [accumulator.clone(), incoming.clone()];
        let log_n = validate_instance_shapes(&instances)?;
        if proof.perturbator.len() != log_n + 1 {
            return Err(ProtoGalaxyError::FoldingVerificationFailed(
                "perturbator has the wrong number of coefficients",
            ));
        }
        if proof.combiner_quotient.len() != COMBINER_QUOTIENT_LENGTH {
            return Err(ProtoGalaxyError::FoldingVerificationFailed(
                "combiner quotient has the wrong number of evaluations",
            ));
        }
        if proof.perturbator.eval_at_zero() != accumulator.folding_parameters.target_sum {
            return Err(ProtoGalaxyError::FoldingVerificationFailed(
                "perturbator does not open to the accumulator's target sum",
            ));
        }

        for instance in instances.iter() {
            absorb_instance(&mut self.transcript, instance);
        }
        let delta: F = self.transcript.get_challenge(b"delta");
        let deltas = compute_round_challenge_pows(log_n, delta);

        proof
            .perturbator
            .append_to_transcript(b"perturbator", &mut self.transcript);
        let perturbator_challenge: F = self.transcript.get_challenge(b"perturbator_challenge");
        let perturbator_evaluation = proof.perturbator.evaluate(&perturbator_challenge);
        let gate_separation_challenges = update_gate_separation_challenges(
            &accumulator.folding_parameters.gate_separation_challenges,
            &deltas,
            perturbator_challenge,
        );

        self.transcript
            .receive_scalars_from_prover(b"combiner_quotient", &proof.combiner_quotient);
        let combiner_challenge: F = self.transcript.get_challenge(b"combiner_quotient_challenge");
        let target_sum = compute_new_target_sum(
            perturbator_evaluation,
            &proof.combiner_quotient,
            combiner_challenge,
        )?;

        Ok(VerifierInstance {
            instance_size: accumulator.instance_size,
            relation_parameters: accumulator
                .relation_parameters
                .fold(&incoming.relation_parameters, combiner_challenge),
            folding_parameters: FoldingParameters {
                gate_separation_challenges,
                target_sum,
            },
        })
    }
}

/// Compares the verifier's view of the folded instance with the prover's claim.
pub fn check_folded_instance<F: HonkField>(
    expected: &VerifierInstance<F>,
    claimed: &VerifierInstance<F>,
) -> Result<(), ProtoGalaxyError> {
    if expected.instance_size != claimed.instance_size {
        return Err(ProtoGalaxyError::FoldingVerificationFailed(
            "folded instance size differs",
        ));
    }
    if expected.relation_parameters != claimed.relation_parameters {
        return Err(ProtoGalaxyError::FoldingVerificationFailed(
            "folded relation parameters differ",
        ));
    }
    if expected.folding_parameters.gate_separation_challenges
        != claimed.folding_parameters.gate_separation_challenges
    {
        return Err(ProtoGalaxyError::FoldingVerificationFailed(
            "folded gate separation challenges differ",
        ));
    }
    if expected.folding_parameters.target_sum != claimed.folding_parameters.target_sum {
        return Err(ProtoGalaxyError::FoldingVerificationFailed(
            "folded target sum differs",
        ));
    }
    Ok(())
}
