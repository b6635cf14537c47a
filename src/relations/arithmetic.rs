use super::{Relation, RelationAccumulator, RelationParameters, SubrelationAccumulators};
use crate::columns::{AllEntities, HonkColumn};
use crate::field::HonkField;

/// Width-4 arithmetic gates.
///
/// With `q_arith = 1` the main subrelation is the standard gate
/// `q_m·w_l·w_r + q_l·w_l + q_r·w_r + q_o·w_o + q_4·w_4 + q_c = 0`. Larger `q_arith`
/// values switch on a term using the next row's `w_4` (`q_arith = 2`) and a second
/// subrelation relating `w_l` and `w_4` to the next row's `w_l` (`q_arith = 3`).
pub struct ArithmeticRelation;

impl Relation for ArithmeticRelation {
    const NAME: &'static str = "Arithmetic";
    const SUBRELATION_LENGTHS: &'static [usize] = &[
        6, // gate identity
        5, // next-row w_l identity
    ];
    const SUBRELATION_TOTAL_LENGTHS: &'static [usize] = Self::SUBRELATION_LENGTHS;

    fn accumulate<F: HonkField, E: RelationAccumulator<F>>(
        accumulators: &mut SubrelationAccumulators<E>,
        row: &AllEntities<E>,
        _params: &RelationParameters<E>,
        scaling_factor: &F,
    ) {
        {
            let len = accumulators.get(0).length();
            let w_l = row[HonkColumn::WL].view(len);
            let w_r = row[HonkColumn::WR].view(len);
            let w_o = row[HonkColumn::WO].view(len);
            let w_4 = row[HonkColumn::W4].view(len);
            let w_4_shift = row[HonkColumn::W4Shift].view(len);
            let q_m = row[HonkColumn::QM].view(len);
            let q_l = row[HonkColumn::QL].view(len);
            let q_r = row[HonkColumn::QR].view(len);
            let q_o = row[HonkColumn::QO].view(len);
            let q_4 = row[HonkColumn::Q4].view(len);
            let q_c = row[HonkColumn::QC].view(len);
            let q_arith = row[HonkColumn::QArith].view(len);

            let mut tmp = (q_arith.clone() - F::from_u64(3)) * q_m * w_r.clone() * w_l.clone();
            tmp = tmp * F::neg_half();
            tmp += q_l * w_l + q_r * w_r + q_o * w_o + q_4 * w_4 + q_c;
            tmp += (q_arith.clone() - F::one()) * w_4_shift;
            accumulators.accumulate(0, tmp * q_arith, scaling_factor);
        }
        {
            let len = accumulators.get(1).length();
            let w_l = row[HonkColumn::WL].view(len);
            let w_4 = row[HonkColumn::W4].view(len);
            let w_l_shift = row[HonkColumn::WLShift].view(len);
            let q_m = row[HonkColumn::QM].view(len);
            let q_arith = row[HonkColumn::QArith].view(len);

            let tmp = w_l + w_4 - w_l_shift + q_m;
            let tmp = tmp * (q_arith.clone() - F::from_u64(2));
            let tmp = tmp * (q_arith.clone() - F::one());
            accumulators.accumulate(1, tmp * q_arith, scaling_factor);
        }
    }
}
