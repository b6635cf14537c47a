mod keccak;
mod transcript;

pub use keccak::KeccakTranscript;
pub use transcript::{AppendToTranscript, Transcript};
