use ark_serialize::CanonicalSerialize;
use sha3::{Digest, Keccak256};

use super::transcript::Transcript;
use crate::field::HonkField;

/// Keccak-256 Fiat-Shamir transcript.
///
/// Each labelled message or challenge is a single hashing round over
/// `state ‖ round ‖ len(label) ‖ label ‖ len(payload) ‖ payload`, whose digest replaces the
/// state. Challenges are squeezed from the state right after their label is absorbed.
#[derive(Clone)]
pub struct KeccakTranscript {
    pub state: [u8; 32],
    round: u64,
    #[cfg(test)]
    /// Every state the transcript went through, starting with the initial one.
    history: Vec<[u8; 32]>,
    #[cfg(test)]
    /// Another transcript's history to check each new state against, so that a diverging
    /// verifier panics at the first differing call.
    expected_history: Option<Vec<[u8; 32]>>,
}

impl KeccakTranscript {
    fn absorb(&mut self, label: &'static [u8], payload: &[u8]) {
        assert!(label.len() <= u8::MAX as usize, "transcript labels are at most 255 bytes");
        let digest: [u8; 32] = Keccak256::new()
            .chain_update(self.state)
            .chain_update(self.round.to_be_bytes())
            .chain_update([label.len() as u8])
            .chain_update(label)
            .chain_update((payload.len() as u64).to_be_bytes())
            .chain_update(payload)
            .finalize()
            .into();
        self.state = digest;
        self.round += 1;
        #[cfg(test)]
        {
            if let Some(expected) = &self.expected_history {
                assert!(
                    expected.get(self.history.len()) == Some(&digest),
                    "Fiat-Shamir transcript mismatch"
                );
            }
            self.history.push(digest);
        }
    }

    fn scalar_bytes<F: HonkField>(values: &[F]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(values.len() * F::NUM_BYTES);
        for value in values {
            value
                .serialize_uncompressed(&mut bytes)
                .expect("serializing into a Vec cannot fail");
        }
        bytes
    }

    /// `F::NUM_BYTES` bytes expanded from the state, one Keccak block per 32 bytes.
    fn squeeze<F: HonkField>(&self) -> F {
        let mut bytes = vec![0u8; F::NUM_BYTES];
        for (counter, chunk) in bytes.chunks_mut(32).enumerate() {
            let block = Keccak256::new()
                .chain_update(self.state)
                .chain_update((counter as u32).to_be_bytes())
                .finalize();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        F::from_bytes(&bytes)
    }
}

impl Transcript for KeccakTranscript {
    fn new(label: &'static [u8]) -> Self {
        let state: [u8; 32] = Keccak256::new()
            .chain_update(b"honk-fold transcript")
            .chain_update(label)
            .finalize()
            .into();
        Self {
            state,
            round: 0,
            #[cfg(test)]
            history: vec![state],
            #[cfg(test)]
            expected_history: None,
        }
    }

    #[cfg(test)]
    fn compare_to(&mut self, other: Self) {
        self.expected_history = Some(other.history);
    }

    fn send_to_verifier<F: HonkField>(&mut self, label: &'static [u8], value: &F) {
        self.absorb(label, &Self::scalar_bytes(std::slice::from_ref(value)));
    }

    fn send_scalars_to_verifier<F: HonkField>(&mut self, label: &'static [u8], values: &[F]) {
        self.absorb(label, &Self::scalar_bytes(values));
    }

    fn send_u64_to_verifier(&mut self, label: &'static [u8], value: u64) {
        self.absorb(label, &value.to_be_bytes());
    }

    fn get_challenge<F: HonkField>(&mut self, label: &'static [u8]) -> F {
        self.absorb(label, &[]);
        self.squeeze()
    }
}
