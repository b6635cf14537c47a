//! Batching subrelations into a single value and checking whole traces.

use itertools::Itertools;
use rayon::prelude::*;
use strum::IntoEnumIterator;

use super::{
    Relation, RelationKind, RelationParameters, SubrelationAccumulators, UnivariateAccumulators,
    ValueAccumulators, NUM_SUBRELATIONS,
};
use crate::columns::{AllEntities, ProverPolynomials};
use crate::field::HonkField;
use crate::poly::univariate::Univariate;
use crate::utils::errors::ProtoGalaxyError;

/// `1, α, α², ..`: one separator per subrelation, in [`RelationKind`] order.
pub fn subrelation_separators<F: HonkField>(alpha: F) -> impl Iterator<Item = F> {
    std::iter::successors(Some(F::one()), move |power| Some(*power * alpha)).take(NUM_SUBRELATIONS)
}

/// Random linear combination of every subrelation value, the first weighted by 1 and each
/// following one by the next power of `alpha`.
pub fn scale_and_batch<F: HonkField>(accumulators: &[ValueAccumulators<F>], alpha: F) -> F {
    accumulators
        .iter()
        .flat_map(|acc| acc.iter())
        .zip_eq(subrelation_separators(alpha))
        .map(|(value, separator)| *value * separator)
        .sum()
}

/// Prover counterpart of [`scale_and_batch`]: every subrelation univariate is first
/// extended to `len` points.
pub fn scale_and_batch_univariates<F: HonkField>(
    accumulators: &[UnivariateAccumulators<F>],
    alpha: F,
    len: usize,
) -> Univariate<F> {
    accumulators
        .iter()
        .flat_map(|acc| acc.iter())
        .zip_eq(subrelation_separators(alpha))
        .fold(Univariate::zero(len), |mut batched, (univariate, separator)| {
            batched += univariate.extend_to(len) * separator;
            batched
        })
}

/// Every subrelation of every relation in the registry, evaluated at `row` and batched with
/// powers of `alpha`. Zero on every row of a satisfying trace.
pub fn compute_full_honk_relation_row_value<F: HonkField>(
    row: &AllEntities<F>,
    alpha: F,
    params: &RelationParameters<F>,
) -> F {
    let accumulators: Vec<ValueAccumulators<F>> = RelationKind::iter()
        .map(|kind| {
            let mut acc = kind.verifier_accumulators::<F>();
            kind.accumulate(&mut acc, row, params, &F::one());
            acc
        })
        .collect();
    scale_and_batch(&accumulators, alpha)
}

/// Checks every relation in the registry against the whole trace.
#[tracing::instrument(skip_all, name = "check_relations")]
pub fn check_relations<F: HonkField>(
    polynomials: &ProverPolynomials<F>,
    params: &RelationParameters<F>,
) -> Result<(), ProtoGalaxyError> {
    for kind in RelationKind::iter() {
        check_rows(
            polynomials,
            kind.name(),
            kind.subrelation_lengths(),
            |subrelation| kind.is_subrelation_linearly_independent(subrelation),
            |acc, row| kind.accumulate(acc, row, params, &F::one()),
        )?;
    }
    Ok(())
}

/// Checks a single relation against the whole trace.
pub fn check_relation<R: Relation, F: HonkField>(
    polynomials: &ProverPolynomials<F>,
    params: &RelationParameters<F>,
) -> Result<(), ProtoGalaxyError> {
    check_rows(
        polynomials,
        R::NAME,
        R::SUBRELATION_LENGTHS,
        R::is_subrelation_linearly_independent,
        |acc, row| R::accumulate(acc, row, params, &F::one()),
    )
}

fn check_rows<F, I, A>(
    polynomials: &ProverPolynomials<F>,
    relation: &'static str,
    subrelation_lengths: &[usize],
    is_linearly_independent: I,
    accumulate: A,
) -> Result<(), ProtoGalaxyError>
where
    F: HonkField,
    I: Fn(usize) -> bool,
    A: Fn(&mut ValueAccumulators<F>, &AllEntities<F>) + Sync,
{
    let per_row: Vec<ValueAccumulators<F>> = (0..polynomials.size())
        .into_par_iter()
        .map(|i| {
            let mut acc = SubrelationAccumulators::new::<F>(subrelation_lengths);
            accumulate(&mut acc, &polynomials.get_row(i));
            acc
        })
        .collect();

    for (row, acc) in per_row.iter().enumerate() {
        for (subrelation, value) in acc.iter().enumerate() {
            if is_linearly_independent(subrelation) && !value.is_zero() {
                return Err(ProtoGalaxyError::ProtocolViolation {
                    relation,
                    subrelation,
                    row,
                });
            }
        }
    }

    for subrelation in (0..subrelation_lengths.len()).filter(|i| !is_linearly_independent(*i)) {
        let sum: F = per_row.iter().map(|acc| *acc.get(subrelation)).sum();
        if !sum.is_zero() {
            return Err(ProtoGalaxyError::ProtocolSumViolation {
                relation,
                subrelation,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::HonkColumn;
    use crate::relations::grand_product::compute_grand_product;
    use crate::relations::{LookupRelation, RelationAccumulator};
    use crate::utils::test_trace::{random_relation_parameters, satisfying_polynomials};
    use ark_bn254::Fr;
    use ark_std::{test_rng, One, Zero};

    #[test]
    fn satisfying_trace_has_zero_rows() {
        let mut rng = test_rng();
        let params = random_relation_parameters::<Fr, _>(&mut rng, 16);
        let polys = satisfying_polynomials(4, &params, &mut rng).unwrap();
        let alpha = Fr::random(&mut rng);
        for i in 0..polys.size() {
            assert!(compute_full_honk_relation_row_value(&polys.get_row(i), alpha, &params).is_zero());
        }
        check_relations(&polys, &params).unwrap();
    }

    #[test]
    fn violations_are_located() {
        let mut rng = test_rng();
        let params = random_relation_parameters::<Fr, _>(&mut rng, 16);
        let mut polys = satisfying_polynomials(4, &params, &mut rng).unwrap();
        polys[HonkColumn::QC][5] += Fr::one();
        assert_eq!(
            check_relations(&polys, &params),
            Err(ProtoGalaxyError::ProtocolViolation {
                relation: "Arithmetic",
                subrelation: 0,
                row: 5
            })
        );
        let alpha = Fr::random(&mut rng);
        assert!(!compute_full_honk_relation_row_value(&polys.get_row(5), alpha, &params).is_zero());
    }

    #[test]
    fn unused_lookup_contributes_nothing_for_any_table() {
        let mut rng = test_rng();
        let params = random_relation_parameters::<Fr, _>(&mut rng, 8);
        let mut polys = satisfying_polynomials(3, &params, &mut rng).unwrap();
        for column in [
            HonkColumn::Table1,
            HonkColumn::Table2,
            HonkColumn::Table3,
            HonkColumn::Table4,
            HonkColumn::WL,
            HonkColumn::WR,
        ] {
            for v in polys[column].iter_mut() {
                *v = Fr::random(&mut rng);
            }
        }
        // Sorted accumulator tracks the new tables; the grand product is rebuilt.
        let eta = params.eta;
        let sorted: Vec<Fr> = (0..polys.size())
            .map(|i| {
                polys[HonkColumn::Table1][i]
                    + eta * polys[HonkColumn::Table2][i]
                    + eta * eta * polys[HonkColumn::Table3][i]
                    + eta * eta * eta * polys[HonkColumn::Table4][i]
            })
            .collect();
        polys[HonkColumn::SortedAccum].copy_from_slice(&sorted);
        compute_grand_product::<LookupRelation, _>(&mut polys, &params).unwrap();

        let mut total = RelationKind::Lookup.verifier_accumulators::<Fr>();
        for i in 0..polys.size() {
            RelationKind::Lookup.accumulate(&mut total, &polys.get_row(i), &params, &Fr::one());
        }
        assert!(total.iter().all(|v| v.is_zero()));
    }

    #[test]
    fn separators_follow_registry_order() {
        let alpha = Fr::from(3u64);
        let mut accumulators: Vec<ValueAccumulators<Fr>> =
            RelationKind::iter().map(|kind| kind.verifier_accumulators()).collect();
        // Only the lookup boundary subrelation (the sixth overall) is non-zero.
        accumulators[2].accumulate(1, Fr::one(), &Fr::one());
        assert_eq!(scale_and_batch(&accumulators, alpha), Fr::from(243u64));

        let univariates: Vec<UnivariateAccumulators<Fr>> = accumulators
            .iter()
            .zip(RelationKind::iter())
            .map(|(values, kind)| {
                let mut acc = kind.prover_accumulators::<Fr>();
                for (i, value) in values.iter().enumerate() {
                    let len = kind.subrelation_lengths()[i];
                    acc.accumulate(i, Univariate::constant(*value, len), &Fr::one());
                }
                acc
            })
            .collect();
        let batched = scale_and_batch_univariates(&univariates, alpha, 6);
        assert_eq!(batched, Univariate::constant(Fr::from(243u64), 6));
    }

    struct BalancedRelation;

    impl Relation for BalancedRelation {
        const NAME: &'static str = "Balanced";
        const SUBRELATION_LENGTHS: &'static [usize] = &[2];
        const SUBRELATION_TOTAL_LENGTHS: &'static [usize] = &[2];
        const SUBRELATION_LINEARLY_INDEPENDENT: &'static [bool] = &[false];

        fn accumulate<F: HonkField, E: RelationAccumulator<F>>(
            accumulators: &mut SubrelationAccumulators<E>,
            row: &AllEntities<E>,
            _params: &RelationParameters<E>,
            scaling_factor: &F,
        ) {
            accumulators.accumulate(0, row[HonkColumn::WL].view(2), scaling_factor);
        }
    }

    #[test]
    fn dependent_subrelations_are_checked_over_the_trace() {
        let params = RelationParameters::<Fr>::default();
        let mut polys = ProverPolynomials::<Fr>::zero(4);
        polys[HonkColumn::WL].copy_from_slice(&[
            Fr::from(5u64),
            -Fr::from(2u64),
            -Fr::from(3u64),
            Fr::zero(),
        ]);
        // Non-zero rows, but they cancel over the trace.
        check_relation::<BalancedRelation, _>(&polys, &params).unwrap();

        polys[HonkColumn::WL][3] = Fr::one();
        assert_eq!(
            check_relation::<BalancedRelation, _>(&polys, &params),
            Err(ProtoGalaxyError::ProtocolSumViolation {
                relation: "Balanced",
                subrelation: 0
            })
        );
    }
}
