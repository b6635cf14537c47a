use std::fmt;
use std::ops::{Add, AddAssign, Index, Mul, Neg, Sub};

use itertools::Itertools;

use crate::field::{batch_inverse, HonkField};
use crate::utils::errors::ProtoGalaxyError;

/// Capacity of the inline evaluation buffer. Every subrelation length and the combiner
/// length fit in it.
pub const MAX_UNIVARIATE_LENGTH: usize = 16;

/// A univariate polynomial of bounded degree in evaluation form: `evaluations()[i]` is its
/// value at the integer point `i`. A univariate of length `n` represents a polynomial of
/// degree at most `n - 1`.
///
/// Evaluations live inline, so views and arithmetic never touch the heap. Arithmetic is
/// pointwise and both operands must live on the same domain; relations first take a
/// [`Univariate::view`] of each input, truncating it to the length their subrelation needs.
#[derive(Clone, Copy)]
pub struct Univariate<F> {
    evaluations: [F; MAX_UNIVARIATE_LENGTH],
    len: usize,
}

impl<F: HonkField> Univariate<F> {
    pub fn new(evaluations: &[F]) -> Self {
        let mut univariate = Self::zero(evaluations.len());
        univariate.evaluations[..evaluations.len()].copy_from_slice(evaluations);
        univariate
    }

    pub fn zero(len: usize) -> Self {
        assert!(len <= MAX_UNIVARIATE_LENGTH, "univariate of length {len} exceeds capacity");
        Self {
            evaluations: [F::zero(); MAX_UNIVARIATE_LENGTH],
            len,
        }
    }

    /// The constant polynomial `value` on `{0, .., len-1}`.
    pub fn constant(value: F, len: usize) -> Self {
        let mut univariate = Self::zero(len);
        univariate.evaluations[..len].fill(value);
        univariate
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn evaluations(&self) -> &[F] {
        &self.evaluations[..self.len]
    }

    fn evaluations_mut(&mut self) -> &mut [F] {
        &mut self.evaluations[..self.len]
    }

    pub fn is_zero(&self) -> bool {
        self.evaluations().iter().all(|e| e.is_zero())
    }

    pub fn value_at(&self, i: usize) -> F {
        self.evaluations()[i]
    }

    /// The degree-1 univariate through `(0, v0)` and `(1, v1)`, evaluated on `{0, .., len-1}`.
    pub fn extend_edge(v0: F, v1: F, len: usize) -> Self {
        let delta = v1 - v0;
        let mut univariate = Self::zero(len);
        let mut current = v0;
        for eval in univariate.evaluations_mut() {
            *eval = current;
            current += delta;
        }
        univariate
    }

    /// The first `len` evaluations. Truncation keeps the represented polynomial only if its
    /// degree is below `len`, which the subrelation lengths guarantee.
    #[inline]
    pub fn view(&self, len: usize) -> Self {
        debug_assert!(len <= self.len);
        let mut view = *self;
        view.len = len;
        view
    }

    /// Evaluates the represented polynomial at an arbitrary point.
    pub fn evaluate(&self, x: F) -> F {
        let nodes = integer_domain::<F>(self.len);
        lagrange_evaluate(&nodes, self.evaluations(), x)
            .expect("integer evaluation domain has distinct points")
    }

    /// Re-expresses the polynomial on the larger domain `{0, .., len-1}`.
    pub fn extend_to(&self, len: usize) -> Self {
        assert!(len >= self.len);
        let mut extended = Self::zero(len);
        extended.evaluations[..self.len].copy_from_slice(self.evaluations());
        for i in self.len..len {
            extended.evaluations[i] = self.evaluate(F::from_u64(i as u64));
        }
        extended
    }
}

impl<F: HonkField> PartialEq for Univariate<F> {
    fn eq(&self, other: &Self) -> bool {
        self.evaluations() == other.evaluations()
    }
}

impl<F: HonkField> Eq for Univariate<F> {}

impl<F: HonkField> fmt::Debug for Univariate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Univariate")
            .field("evaluations", &self.evaluations())
            .finish()
    }
}

/// `[0, 1, .., len-1]` as field elements.
pub fn integer_domain<F: HonkField>(len: usize) -> Vec<F> {
    (0..len as u64).map(F::from_u64).collect()
}

/// Evaluates at `x` the unique polynomial of degree `< nodes.len()` taking value
/// `evals[j]` at `nodes[j]`.
pub fn lagrange_evaluate<F: HonkField>(
    nodes: &[F],
    evals: &[F],
    x: F,
) -> Result<F, ProtoGalaxyError> {
    assert_eq!(nodes.len(), evals.len());
    if let Some(j) = nodes.iter().position(|node| *node == x) {
        return Ok(evals[j]);
    }

    // denominators[j] = (x - x_j) * prod_{k != j} (x_j - x_k)
    let mut denominators: Vec<F> = nodes
        .iter()
        .enumerate()
        .map(|(j, x_j)| {
            nodes
                .iter()
                .enumerate()
                .filter(|(k, _)| *k != j)
                .fold(x - x_j, |acc, (_, x_k)| acc * (*x_j - x_k))
        })
        .collect();
    batch_inverse(&mut denominators, "repeated interpolation node")?;

    let vanishing: F = nodes.iter().map(|x_j| x - x_j).product();
    let sum: F = evals
        .iter()
        .zip(denominators.iter())
        .map(|(eval, inv)| *eval * inv)
        .sum();
    Ok(vanishing * sum)
}

impl<F: HonkField> Index<usize> for Univariate<F> {
    type Output = F;

    #[inline(always)]
    fn index(&self, index: usize) -> &F {
        &self.evaluations()[index]
    }
}

impl<F: HonkField> Add for Univariate<F> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<F: HonkField> AddAssign for Univariate<F> {
    fn add_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.evaluations_mut().iter_mut().zip_eq(rhs.evaluations()) {
            *lhs += *rhs;
        }
    }
}

impl<F: HonkField> Sub for Univariate<F> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        for (lhs, rhs) in self.evaluations_mut().iter_mut().zip_eq(rhs.evaluations()) {
            *lhs -= *rhs;
        }
        self
    }
}

impl<F: HonkField> Mul for Univariate<F> {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        for (lhs, rhs) in self.evaluations_mut().iter_mut().zip_eq(rhs.evaluations()) {
            *lhs *= *rhs;
        }
        self
    }
}

impl<F: HonkField> Add<F> for Univariate<F> {
    type Output = Self;

    fn add(mut self, rhs: F) -> Self {
        self.evaluations_mut().iter_mut().for_each(|e| *e += rhs);
        self
    }
}

impl<F: HonkField> Sub<F> for Univariate<F> {
    type Output = Self;

    fn sub(mut self, rhs: F) -> Self {
        self.evaluations_mut().iter_mut().for_each(|e| *e -= rhs);
        self
    }
}

impl<F: HonkField> Mul<F> for Univariate<F> {
    type Output = Self;

    fn mul(mut self, rhs: F) -> Self {
        self.evaluations_mut().iter_mut().for_each(|e| *e *= rhs);
        self
    }
}

impl<F: HonkField> Neg for Univariate<F> {
    type Output = Self;

    fn neg(mut self) -> Self {
        self.evaluations_mut().iter_mut().for_each(|e| *e = -*e);
        self
    }
}
