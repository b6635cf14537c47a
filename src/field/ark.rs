use ark_ff::{PrimeField, UniformRand};

use super::{FieldOps, HonkField};

impl FieldOps for ark_bn254::Fr {}
impl FieldOps<&ark_bn254::Fr, ark_bn254::Fr> for &ark_bn254::Fr {}
impl FieldOps<&ark_bn254::Fr, ark_bn254::Fr> for ark_bn254::Fr {}

lazy_static::lazy_static! {
    static ref NEG_HALF: ark_bn254::Fr = -<ark_bn254::Fr as ark_ff::Field>::inverse(
        &ark_bn254::Fr::from(2u64)
    )
    .expect("2 is invertible in a field of odd characteristic");
}

impl HonkField for ark_bn254::Fr {
    const NUM_BYTES: usize = 32;

    fn random<R: rand_core::RngCore>(rng: &mut R) -> Self {
        <Self as UniformRand>::rand(rng)
    }

    #[inline]
    fn from_u64(n: u64) -> Self {
        Self::from(n)
    }

    fn from_i64(val: i64) -> Self {
        if val.is_negative() {
            -<Self as HonkField>::from_u64(val.unsigned_abs())
        } else {
            <Self as HonkField>::from_u64(val as u64)
        }
    }

    fn square(&self) -> Self {
        <Self as ark_ff::Field>::square(self)
    }

    fn inverse(&self) -> Option<Self> {
        <Self as ark_ff::Field>::inverse(self)
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), Self::NUM_BYTES);
        ark_bn254::Fr::from_le_bytes_mod_order(bytes)
    }

    fn neg_half() -> Self {
        *NEG_HALF
    }

    fn pow(&self, exp: u64) -> Self {
        <Self as ark_ff::Field>::pow(self, [exp])
    }
}
