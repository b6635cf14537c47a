use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{One, Zero};

use crate::utils::errors::ProtoGalaxyError;

pub trait FieldOps<Rhs = Self, Output = Self>:
    Add<Rhs, Output = Output>
    + Sub<Rhs, Output = Output>
    + Mul<Rhs, Output = Output>
    + Div<Rhs, Output = Output>
{
}

/// The scalar field every relation, polynomial and folding step is generic over.
///
/// Arithmetic is exact; the only partial operation is [`HonkField::inverse`], which
/// returns `None` on zero.
pub trait HonkField:
    'static
    + Sized
    + Zero
    + One
    + Neg<Output = Self>
    + FieldOps<Self, Self>
    + for<'a> FieldOps<&'a Self, Self>
    + AddAssign<Self>
    + SubAssign<Self>
    + MulAssign<Self>
    + core::iter::Sum<Self>
    + for<'a> core::iter::Sum<&'a Self>
    + core::iter::Product<Self>
    + for<'a> core::iter::Product<&'a Self>
    + Eq
    + Copy
    + Sync
    + Send
    + Display
    + Debug
    + Default
    + CanonicalSerialize
    + CanonicalDeserialize
    + Hash
{
    /// Number of bytes occupied by a single field element.
    const NUM_BYTES: usize;

    fn random<R: rand_core::RngCore>(rng: &mut R) -> Self;
    fn from_u64(n: u64) -> Self;
    fn from_i64(n: i64) -> Self;
    fn square(&self) -> Self;
    fn inverse(&self) -> Option<Self>;
    /// Interprets `bytes` (exactly `NUM_BYTES` of them) as a little-endian integer reduced
    /// modulo the field order.
    fn from_bytes(bytes: &[u8]) -> Self;
    /// `-1/2`, used by the arithmetic relation to normalise the multiplication term.
    fn neg_half() -> Self;

    /// Square-and-multiply exponentiation.
    fn pow(&self, mut exp: u64) -> Self {
        let mut base = *self;
        let mut result = Self::one();
        while exp > 0 {
            if exp & 1 == 1 {
                result *= base;
            }
            base = base.square();
            exp >>= 1;
        }
        result
    }

    /// Like [`HonkField::inverse`], but surfaces inversion of zero as an arithmetic error
    /// attributed to `context`.
    fn try_inverse(&self, context: &'static str) -> Result<Self, ProtoGalaxyError> {
        self.inverse()
            .ok_or(ProtoGalaxyError::ZeroInversion(context))
    }
}

/// Inverts every element of `values` in place using Montgomery's trick (one inversion in
/// total). Fails without modifying `values` if any element is zero.
#[tracing::instrument(skip_all, name = "batch_inverse")]
pub fn batch_inverse<F: HonkField>(
    values: &mut [F],
    context: &'static str,
) -> Result<(), ProtoGalaxyError> {
    let mut prefix_products = Vec::with_capacity(values.len());
    let mut acc = F::one();
    for value in values.iter() {
        if value.is_zero() {
            return Err(ProtoGalaxyError::ZeroInversion(context));
        }
        prefix_products.push(acc);
        acc *= *value;
    }

    let mut acc_inverse = acc.try_inverse(context)?;
    for (value, prefix) in values.iter_mut().zip(prefix_products).rev() {
        let inverse = acc_inverse * prefix;
        acc_inverse *= *value;
        *value = inverse;
    }
    Ok(())
}

pub mod ark;
