use crate::field::HonkField;

/// Fiat-Shamir transcript shared by the folding prover and verifier.
///
/// Every operation is labelled and absorbs its label together with its payload. The order
/// of calls is part of the protocol: prover and verifier must issue them identically or
/// their challenges diverge.
pub trait Transcript: Clone + Sync + Send + 'static {
    fn new(label: &'static [u8]) -> Self;
    #[cfg(test)]
    fn compare_to(&mut self, other: Self);

    /// Absorbs a labelled prover message.
    fn send_to_verifier<F: HonkField>(&mut self, label: &'static [u8], value: &F);
    fn send_scalars_to_verifier<F: HonkField>(&mut self, label: &'static [u8], values: &[F]);
    fn send_u64_to_verifier(&mut self, label: &'static [u8], value: u64);

    /// Derives a labelled challenge from everything absorbed so far.
    fn get_challenge<F: HonkField>(&mut self, label: &'static [u8]) -> F;

    /// Verifier-side mirror of [`Transcript::send_to_verifier`].
    fn receive_from_prover<F: HonkField>(&mut self, label: &'static [u8], value: &F) {
        self.send_to_verifier(label, value);
    }

    fn receive_scalars_from_prover<F: HonkField>(&mut self, label: &'static [u8], values: &[F]) {
        self.send_scalars_to_verifier(label, values);
    }

    fn get_challenges<F: HonkField>(&mut self, labels: &[&'static [u8]]) -> Vec<F> {
        labels.iter().map(|label| self.get_challenge(*label)).collect()
    }
}

pub trait AppendToTranscript {
    fn append_to_transcript<ProofTranscript: Transcript>(
        &self,
        label: &'static [u8],
        transcript: &mut ProofTranscript,
    );
}
