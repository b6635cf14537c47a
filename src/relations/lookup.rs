use super::grand_product::GrandProductRelation;
use super::{Relation, RelationAccumulator, RelationParameters, SubrelationAccumulators};
use crate::columns::{AllEntities, HonkColumn};
use crate::field::HonkField;

/// Plookup-style table lookups, enforced through the grand product `z_lookup`:
///
/// ```text
///              ∏ (1 + β)·(q_lookup·f_i + γ)·(t_i + β·t_{i+1} + γ(1 + β))
/// z_lookup  =  ---------------------------------------------------------
///                          ∏ (s_i + β·s_{i+1} + γ(1 + β))
/// ```
///
/// where `f` compresses the looked-up wires, `t` the four table columns and `s` is the
/// sorted concatenation of both, all with powers of `η`. On lookup gates `q_r`, `q_m` and
/// `q_c` act as per-column step sizes into the next row and `q_o` as the table index.
pub struct LookupRelation;

impl LookupRelation {
    fn compress<F: HonkField, E: RelationAccumulator<F>>(columns: [E; 4], eta: &E) -> E {
        let [c1, c2, c3, c4] = columns;
        let eta_sqr = eta.clone() * eta.clone();
        let eta_cube = eta_sqr.clone() * eta.clone();
        c1 + c2 * eta.clone() + c3 * eta_sqr + c4 * eta_cube
    }
}

impl GrandProductRelation for LookupRelation {
    const GRAND_PRODUCT: HonkColumn = HonkColumn::ZLookup;
    const GRAND_PRODUCT_SHIFT: HonkColumn = HonkColumn::ZLookupShift;

    fn numerator<F: HonkField, E: RelationAccumulator<F>>(
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        len: usize,
    ) -> E {
        let view = |column: HonkColumn| row[column].view(len);
        let eta = params.eta.view(len);
        let beta = params.beta.view(len);
        let gamma = params.gamma.view(len);
        let one_plus_beta = beta.clone() + F::one();
        let gamma_by_one_plus_beta = gamma.clone() * one_plus_beta.clone();

        // (w_1 + q_r·w_1_shift) + η(w_2 + q_m·w_2_shift) + η²(w_3 + q_c·w_3_shift) + η³·q_o
        let wire_accum = Self::compress(
            [
                view(HonkColumn::WL) + view(HonkColumn::QR) * view(HonkColumn::WLShift),
                view(HonkColumn::WR) + view(HonkColumn::QM) * view(HonkColumn::WRShift),
                view(HonkColumn::WO) + view(HonkColumn::QC) * view(HonkColumn::WOShift),
                view(HonkColumn::QO),
            ],
            &eta,
        );
        let table_accum = Self::compress(
            [
                view(HonkColumn::Table1),
                view(HonkColumn::Table2),
                view(HonkColumn::Table3),
                view(HonkColumn::Table4),
            ],
            &eta,
        );
        let table_accum_shift = Self::compress(
            [
                view(HonkColumn::Table1Shift),
                view(HonkColumn::Table2Shift),
                view(HonkColumn::Table3Shift),
                view(HonkColumn::Table4Shift),
            ],
            &eta,
        );

        let tmp = view(HonkColumn::QLookup) * wire_accum + gamma;
        let tmp = tmp * (table_accum + table_accum_shift * beta + gamma_by_one_plus_beta);
        tmp * one_plus_beta
    }

    fn denominator<F: HonkField, E: RelationAccumulator<F>>(
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        len: usize,
    ) -> E {
        let beta = params.beta.view(len);
        let gamma_by_one_plus_beta = params.gamma.view(len) * (beta.clone() + F::one());
        row[HonkColumn::SortedAccum].view(len)
            + row[HonkColumn::SortedAccumShift].view(len) * beta
            + gamma_by_one_plus_beta
    }
}

impl Relation for LookupRelation {
    const NAME: &'static str = "Lookup";
    const SUBRELATION_LENGTHS: &'static [usize] = &[
        6, // grand product construction
        3, // z_lookup_shift vanishes on the last row
    ];
    const SUBRELATION_TOTAL_LENGTHS: &'static [usize] = &[13, 3];

    fn accumulate<F: HonkField, E: RelationAccumulator<F>>(
        accumulators: &mut SubrelationAccumulators<E>,
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        scaling_factor: &F,
    ) {
        {
            let len = accumulators.get(0).length();
            let z_lookup = row[Self::GRAND_PRODUCT].view(len);
            let z_lookup_shift = row[Self::GRAND_PRODUCT_SHIFT].view(len);
            let lagrange_first = row[HonkColumn::LagrangeFirst].view(len);
            let lagrange_last = row[HonkColumn::LagrangeLast].view(len);

            let numerator = Self::numerator(row, params, len);
            let denominator = Self::denominator(row, params, len);
            let tmp = numerator * (z_lookup + lagrange_first)
                - denominator
                    * (z_lookup_shift + lagrange_last * params.lookup_grand_product_delta.view(len));
            accumulators.accumulate(0, tmp, scaling_factor);
        }
        {
            let len = accumulators.get(1).length();
            let z_lookup_shift = row[Self::GRAND_PRODUCT_SHIFT].view(len);
            let lagrange_last = row[HonkColumn::LagrangeLast].view(len);
            accumulators.accumulate(1, lagrange_last * z_lookup_shift, scaling_factor);
        }
    }
}
