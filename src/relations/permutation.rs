use super::grand_product::GrandProductRelation;
use super::{Relation, RelationAccumulator, RelationParameters, SubrelationAccumulators};
use crate::columns::{AllEntities, HonkColumn};
use crate::field::HonkField;

const WIRES: [HonkColumn; 4] = [HonkColumn::WL, HonkColumn::WR, HonkColumn::WO, HonkColumn::W4];
const IDS: [HonkColumn; 4] = [HonkColumn::Id1, HonkColumn::Id2, HonkColumn::Id3, HonkColumn::Id4];
const SIGMAS: [HonkColumn; 4] = [
    HonkColumn::Sigma1,
    HonkColumn::Sigma2,
    HonkColumn::Sigma3,
    HonkColumn::Sigma4,
];

/// Copy constraints between wire cells, enforced through the grand product `z_perm`:
///
/// ```text
///             ∏ (w_j + β·id_j + γ)
/// z_perm  =  ---------------------
///             ∏ (w_j + β·σ_j + γ)
/// ```
pub struct PermutationRelation;

impl GrandProductRelation for PermutationRelation {
    const GRAND_PRODUCT: HonkColumn = HonkColumn::ZPerm;
    const GRAND_PRODUCT_SHIFT: HonkColumn = HonkColumn::ZPermShift;

    fn numerator<F: HonkField, E: RelationAccumulator<F>>(
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        len: usize,
    ) -> E {
        copy_product(row, params, &IDS, len)
    }

    fn denominator<F: HonkField, E: RelationAccumulator<F>>(
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        len: usize,
    ) -> E {
        copy_product(row, params, &SIGMAS, len)
    }
}

fn copy_product<F: HonkField, E: RelationAccumulator<F>>(
    row: &AllEntities<E>,
    params: &RelationParameters<E>,
    labels: &[HonkColumn; 4],
    len: usize,
) -> E {
    let (beta, gamma) = (params.beta.view(len), params.gamma.view(len));
    let factor = |j: usize| {
        row[WIRES[j]].view(len) + row[labels[j]].view(len) * beta.clone() + gamma.clone()
    };
    factor(0) * factor(1) * factor(2) * factor(3)
}

impl Relation for PermutationRelation {
    const NAME: &'static str = "Permutation";
    const SUBRELATION_LENGTHS: &'static [usize] = &[
        6, // grand product construction
        3, // z_perm_shift vanishes on the last row
    ];
    const SUBRELATION_TOTAL_LENGTHS: &'static [usize] = &[11, 3];

    fn accumulate<F: HonkField, E: RelationAccumulator<F>>(
        accumulators: &mut SubrelationAccumulators<E>,
        row: &AllEntities<E>,
        params: &RelationParameters<E>,
        scaling_factor: &F,
    ) {
        {
            let len = accumulators.get(0).length();
            let z_perm = row[Self::GRAND_PRODUCT].view(len);
            let z_perm_shift = row[Self::GRAND_PRODUCT_SHIFT].view(len);
            let lagrange_first = row[HonkColumn::LagrangeFirst].view(len);
            let lagrange_last = row[HonkColumn::LagrangeLast].view(len);

            let numerator = Self::numerator(row, params, len);
            let denominator = Self::denominator(row, params, len);
            let tmp = (z_perm + lagrange_first) * numerator
                - (z_perm_shift + lagrange_last * params.public_input_delta.view(len)) * denominator;
            accumulators.accumulate(0, tmp, scaling_factor);
        }
        {
            let len = accumulators.get(1).length();
            let z_perm_shift = row[Self::GRAND_PRODUCT_SHIFT].view(len);
            let lagrange_last = row[HonkColumn::LagrangeLast].view(len);
            accumulators.accumulate(1, lagrange_last * z_perm_shift, scaling_factor);
        }
    }
}
