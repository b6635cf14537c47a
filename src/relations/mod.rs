//! Shared accumulation machinery for Honk relations.
//!
//! A relation is a set of subrelations, each a polynomial identity over the columns of a
//! single row with its own degree bound. The same `accumulate` code serves two callers:
//!
//! - the prover, which accumulates bounded-length [`Univariate`]s (one container per
//!   subrelation, of that subrelation's length), and
//! - the verifier, which accumulates plain field elements.
//!
//! Both are [`SubrelationAccumulators`] over a different element type; the element type
//! implements [`RelationAccumulator`].

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use strum_macros::{EnumCount as EnumCountMacro, EnumIter, IntoStaticStr};

use crate::columns::AllEntities;
use crate::field::HonkField;
use crate::poly::univariate::Univariate;

pub mod arithmetic;
pub mod grand_product;
pub mod lookup;
pub mod permutation;
pub mod relation_parameters;
pub mod utils;

pub use arithmetic::ArithmeticRelation;
pub use grand_product::GrandProductRelation;
pub use lookup::LookupRelation;
pub use permutation::PermutationRelation;
pub use relation_parameters::RelationParameters;

/// An element relations can be evaluated over: a field element (verifier) or an
/// evaluation-form univariate (prover).
pub trait RelationAccumulator<F: HonkField>:
    Clone
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Add<F, Output = Self>
    + Sub<F, Output = Self>
    + Mul<F, Output = Self>
    + Neg<Output = Self>
    + AddAssign
{
    /// The additive identity, sized for a subrelation of length `len`.
    fn zero_with_length(len: usize) -> Self;
    /// Restriction to the first `len` points. A no-op for field elements.
    fn view(&self, len: usize) -> Self;
    /// Number of points carried; 1 for field elements.
    fn length(&self) -> usize;
}

impl<F: HonkField> RelationAccumulator<F> for F {
    #[inline(always)]
    fn zero_with_length(_len: usize) -> Self {
        F::zero()
    }

    #[inline(always)]
    fn view(&self, _len: usize) -> Self {
        *self
    }

    #[inline(always)]
    fn length(&self) -> usize {
        1
    }
}

impl<F: HonkField> RelationAccumulator<F> for Univariate<F> {
    fn zero_with_length(len: usize) -> Self {
        Univariate::zero(len)
    }

    fn view(&self, len: usize) -> Self {
        Univariate::view(self, len)
    }

    fn length(&self) -> usize {
        Univariate::len(self)
    }
}

/// One container per subrelation. The number of containers and the length of each are
/// fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubrelationAccumulators<E> {
    containers: Vec<E>,
}

/// Prover form: one univariate per subrelation, of that subrelation's length.
pub type UnivariateAccumulators<F> = SubrelationAccumulators<Univariate<F>>;
/// Verifier form: one scalar per subrelation.
pub type ValueAccumulators<F> = SubrelationAccumulators<F>;

impl<E> SubrelationAccumulators<E> {
    pub fn new<F: HonkField>(subrelation_lengths: &[usize]) -> Self
    where
        E: RelationAccumulator<F>,
    {
        Self {
            containers: subrelation_lengths
                .iter()
                .map(|len| E::zero_with_length(*len))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.containers.iter()
    }

    pub fn get(&self, subrelation: usize) -> &E {
        &self.containers[subrelation]
    }

    /// `accumulators[subrelation] += contribution * scaling_factor`
    #[inline]
    pub fn accumulate<F: HonkField>(&mut self, subrelation: usize, contribution: E, scaling_factor: &F)
    where
        E: RelationAccumulator<F>,
    {
        self.containers[subrelation] += contribution * *scaling_factor;
    }

    /// Adds `other` container-wise; used to reduce per-thread partial accumulators.
    pub fn merge(&mut self, other: Self)
    where
        E: AddAssign,
    {
        assert_eq!(self.len(), other.len());
        for (lhs, rhs) in self.containers.iter_mut().zip(other.containers) {
            *lhs += rhs;
        }
    }
}

/// The capability set every relation implements.
///
/// `accumulate` is written once, generically over the accumulator element, and is used by
/// both the prover (univariates) and the verifier (scalars). Relation parameters come in the
/// same element type: constant for a single instance, degree 1 when two instances are folded.
/// Inputs are viewed to the length of the container they accumulate into.
pub trait Relation: Send + Sync {
    const NAME: &'static str;
    /// Length (degree + 1) of each subrelation in the trace columns, parameters fixed.
    const SUBRELATION_LENGTHS: &'static [usize];
    /// Length of each subrelation when the relation parameters are degree 1 as well.
    const SUBRELATION_TOTAL_LENGTHS: &'static [usize];
    /// Per-subrelation linear independence. Subrelations without an entry are independent.
    const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool] = &[];
    const RELATION_LENGTH: usize = max_length(Self::SUBRELATION_LENGTHS);
    const TOTAL_RELATION_LENGTH: usize = max_length(Self::SUBRELATION_TOTAL_LENGTHS);

    fn num_subrelations() -> usize {
        Self::SUBRELATION_LENGTHS.len()
    }

    /// Independent subrelations must vanish on every row; dependent ones only when summed
    /// over the whole trace.
    fn is_subrelation_linearly_independent(subrelation: usize) -> bool {
        Self::SUBRELATION_LINEARLY_INDEPENDENT
            .get(subrelation)
            .copied()
            .unwrap_or(true)
    }

    fn accumulators<F: HonkField, E: RelationAccumulator<F>>() -> SubrelationAccumulators<E> {
        SubrelationAccumulators::new::<F>(Self::SUBRELATION_LENGTHS)
    }

    /// Adds `scaling_factor` times each subrelation's value at `row` into `accumulators`.
    fn accumulate<F: HonkField, E: RelationAccumulator<F>>(
        accumulators: &mut SubrelationAccumulators<E>,
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        scaling_factor: &F,
    );
}

pub const fn max_length(lengths: &[usize]) -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < lengths.len() {
        if lengths[i] > max {
            max = lengths[i];
        }
        i += 1;
    }
    max
}

/// The relations active in the Honk identity. Dispatch is static per variant, so the
/// subrelation lengths stay compile-time constants of each relation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCountMacro, EnumIter, IntoStaticStr,
)]
pub enum RelationKind {
    Arithmetic,
    Permutation,
    Lookup,
}

/// Longest subrelation across every active relation.
pub const MAX_RELATION_LENGTH: usize = max_length(&[
    ArithmeticRelation::RELATION_LENGTH,
    PermutationRelation::RELATION_LENGTH,
    LookupRelation::RELATION_LENGTH,
]);

/// Longest subrelation across every active relation, relation parameters included.
pub const MAX_TOTAL_RELATION_LENGTH: usize = max_length(&[
    ArithmeticRelation::TOTAL_RELATION_LENGTH,
    PermutationRelation::TOTAL_RELATION_LENGTH,
    LookupRelation::TOTAL_RELATION_LENGTH,
]);

/// Total number of subrelations across every active relation.
pub const NUM_SUBRELATIONS: usize = ArithmeticRelation::SUBRELATION_LENGTHS.len()
    + PermutationRelation::SUBRELATION_LENGTHS.len()
    + LookupRelation::SUBRELATION_LENGTHS.len();

impl RelationKind {
    pub fn name(self) -> &'static str {
        match self {
            RelationKind::Arithmetic => ArithmeticRelation::NAME,
            RelationKind::Permutation => PermutationRelation::NAME,
            RelationKind::Lookup => LookupRelation::NAME,
        }
    }

    pub fn subrelation_lengths(self) -> &'static [usize] {
        match self {
            RelationKind::Arithmetic => ArithmeticRelation::SUBRELATION_LENGTHS,
            RelationKind::Permutation => PermutationRelation::SUBRELATION_LENGTHS,
            RelationKind::Lookup => LookupRelation::SUBRELATION_LENGTHS,
        }
    }

    pub fn subrelation_total_lengths(self) -> &'static [usize] {
        match self {
            RelationKind::Arithmetic => ArithmeticRelation::SUBRELATION_TOTAL_LENGTHS,
            RelationKind::Permutation => PermutationRelation::SUBRELATION_TOTAL_LENGTHS,
            RelationKind::Lookup => LookupRelation::SUBRELATION_TOTAL_LENGTHS,
        }
    }

    pub fn is_subrelation_linearly_independent(self, subrelation: usize) -> bool {
        match self {
            RelationKind::Arithmetic => {
                ArithmeticRelation::is_subrelation_linearly_independent(subrelation)
            }
            RelationKind::Permutation => {
                PermutationRelation::is_subrelation_linearly_independent(subrelation)
            }
            RelationKind::Lookup => LookupRelation::is_subrelation_linearly_independent(subrelation),
        }
    }

    pub fn accumulators<F: HonkField, E: RelationAccumulator<F>>(self) -> SubrelationAccumulators<E> {
        SubrelationAccumulators::new::<F>(self.subrelation_lengths())
    }

    pub fn prover_accumulators<F: HonkField>(self) -> UnivariateAccumulators<F> {
        self.accumulators::<F, Univariate<F>>()
    }

    pub fn verifier_accumulators<F: HonkField>(self) -> ValueAccumulators<F> {
        self.accumulators::<F, F>()
    }

    /// Prover form sized for folding, where the relation parameters vary along with the
    /// trace columns.
    pub fn folding_accumulators<F: HonkField>(self) -> UnivariateAccumulators<F> {
        SubrelationAccumulators::new::<F>(self.subrelation_total_lengths())
    }

    pub fn accumulate<F: HonkField, E: RelationAccumulator<F>>(
        self,
        accumulators: &mut SubrelationAccumulators<E>,
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        scaling_factor: &F,
    ) {
        match self {
            RelationKind::Arithmetic => {
                ArithmeticRelation::accumulate(accumulators, row, params, scaling_factor)
            }
            RelationKind::Permutation => {
                PermutationRelation::accumulate(accumulators, row, params, scaling_factor)
            }
            RelationKind::Lookup => LookupRelation::accumulate(accumulators, row, params, scaling_factor),
        }
    }
}
