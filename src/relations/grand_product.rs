//! Grand product columns shared by the permutation and lookup relations.
//!
//! Both relations constrain a column `z` through
//! `(z_i + L_first)·N_i = (z_{i+1} + L_last·Δ)·D_i`, so that `z` accumulates the running
//! product of `N/D` and the total product over the trace equals the public `Δ`.

use rayon::prelude::*;

use super::{Relation, RelationAccumulator, RelationParameters};
use crate::columns::{AllEntities, HonkColumn, ProverPolynomials};
use crate::field::{batch_inverse, HonkField};
use crate::utils::errors::ProtoGalaxyError;

pub trait GrandProductRelation: Relation {
    /// Column holding the running product.
    const GRAND_PRODUCT: HonkColumn;
    const GRAND_PRODUCT_SHIFT: HonkColumn;

    /// Per-row numerator `N_i`, with every input viewed to `len`.
    fn numerator<F: HonkField, E: RelationAccumulator<F>>(
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        len: usize,
    ) -> E;

    /// Per-row denominator `D_i`, with every input viewed to `len`.
    fn denominator<F: HonkField, E: RelationAccumulator<F>>(
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        len: usize,
    ) -> E;
}

/// Fills `R`'s grand product column with `z_0 = 0`, `z_{i+1} = ∏_{j<=i} N_j/D_j` and returns
/// the product over every row. The zero first entry is paired with `L_first` in the
/// relation; the full product is what `Δ` must equal for the last row to hold.
#[tracing::instrument(skip_all, name = "compute_grand_product")]
pub fn compute_grand_product<R: GrandProductRelation, F: HonkField>(
    polynomials: &mut ProverPolynomials<F>,
    params: &RelationParameters<F>,
) -> Result<F, ProtoGalaxyError> {
    let size = polynomials.size();
    let (numerators, mut denominators): (Vec<F>, Vec<F>) = (0..size)
        .into_par_iter()
        .map(|i| {
            let row = polynomials.get_row(i);
            (
                R::numerator::<F, F>(&row, params, 1),
                R::denominator::<F, F>(&row, params, 1),
            )
        })
        .unzip();
    batch_inverse(&mut denominators, R::NAME)?;

    let mut running = F::one();
    let mut z = Vec::with_capacity(size);
    for (numerator, denominator_inverse) in numerators.iter().zip(denominators.iter()) {
        z.push(running);
        running *= *numerator * denominator_inverse;
    }
    if let Some(first) = z.first_mut() {
        *first = F::zero();
    }

    tracing::debug!(relation = R::NAME, size, "grand product column computed");
    polynomials[R::GRAND_PRODUCT].copy_from_slice(&z);
    Ok(running)
}
