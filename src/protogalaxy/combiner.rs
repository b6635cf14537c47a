//! The combiner `G(X) = Σ_i pow_i(β*)·f_i(L_0(X)·ω_0 + L_1(X)·ω_1)` and its quotient.
//!
//! `f_i` is evaluated with the relation parameters on the same line, `L_0(X)·p_0 + L_1(X)·p_1`,
//! so each instance is checked against its own parameters at `X = 0` and `X = 1`.

use rayon::prelude::*;
use strum::IntoEnumIterator;

use super::{Instance, COMBINER_LENGTH};
use crate::columns::AllEntities;
use crate::field::HonkField;
use crate::poly::pow::PowPolynomial;
use crate::poly::univariate::{integer_domain, lagrange_evaluate, Univariate};
use crate::relations::utils::scale_and_batch_univariates;
use crate::relations::{RelationKind, RelationParameters, UnivariateAccumulators};
use crate::utils::errors::ProtoGalaxyError;

fn fresh_accumulators<F: HonkField>() -> Vec<UnivariateAccumulators<F>> {
    RelationKind::iter()
        .map(|kind| kind.folding_accumulators())
        .collect()
}

/// Evaluates `G` on `{0, .., COMBINER_LENGTH - 1}`.
///
/// Row `i` contributes the relation evaluated on the per-column line from the accumulator's
/// row to the incoming instance's row, scaled by `pow_i(β*)`. Workers accumulate into their
/// own containers, which are merged at the end.
#[tracing::instrument(skip_all, name = "compute_combiner")]
pub fn compute_combiner<F: HonkField>(
    accumulator: &Instance<F>,
    incoming: &Instance<F>,
    pow_betas: &PowPolynomial<F>,
    alpha: F,
) -> Univariate<F> {
    let (lhs, rhs) = (&accumulator.polynomials, &incoming.polynomials);
    let params = RelationParameters::extend_edge(
        &accumulator.relation_parameters,
        &incoming.relation_parameters,
        COMBINER_LENGTH,
    );
    let pow_evals = pow_betas.evals();
    debug_assert_eq!(pow_evals.len(), lhs.size());

    let accumulators = (0..lhs.size())
        .into_par_iter()
        .fold(fresh_accumulators::<F>, |mut accumulators, i| {
            let edges = AllEntities::from_fn(|column| {
                Univariate::extend_edge(lhs.value(column, i), rhs.value(column, i), COMBINER_LENGTH)
            });
            for (kind, acc) in RelationKind::iter().zip(accumulators.iter_mut()) {
                kind.accumulate(acc, &edges, &params, &pow_evals[i]);
            }
            accumulators
        })
        .reduce(fresh_accumulators::<F>, |mut left, right| {
            for (l, r) in left.iter_mut().zip(right) {
                l.merge(r);
            }
            left
        });

    scale_and_batch_univariates(&accumulators, alpha, COMBINER_LENGTH)
}

/// `K(x) = (G(x) - F(α')·(1 - x)) / (x(x - 1))` for `x ∈ {2, .., COMBINER_LENGTH - 1}`.
///
/// `G - F(α')·L_0` vanishes on `{0, 1}` for honest inputs, so `K` is a polynomial of degree
/// `COMBINER_LENGTH - 3` determined by these evaluations.
pub fn compute_combiner_quotient<F: HonkField>(
    combiner: &Univariate<F>,
    perturbator_evaluation: F,
) -> Result<Vec<F>, ProtoGalaxyError> {
    let points: Vec<F> = integer_domain::<F>(combiner.len()).split_off(2);
    let mut denominators: Vec<F> = points.iter().map(|x| *x * (*x - F::one())).collect();
    crate::field::batch_inverse(&mut denominators, "combiner quotient domain")?;

    Ok(points
        .iter()
        .zip(denominators.iter())
        .enumerate()
        .map(|(j, (x, inverse))| {
            let lagrange_0 = F::one() - x;
            (combiner[j + 2] - perturbator_evaluation * lagrange_0) * inverse
        })
        .collect())
}

/// `e* = F(α')·L_0(γ) + Z(γ)·K(γ)` with `Z(X) = X(X - 1)`; equals `G(γ)`.
pub fn compute_new_target_sum<F: HonkField>(
    perturbator_evaluation: F,
    combiner_quotient: &[F],
    challenge: F,
) -> Result<F, ProtoGalaxyError> {
    let nodes: Vec<F> = (2..2 + combiner_quotient.len() as u64).map(F::from_u64).collect();
    let quotient_at_challenge = lagrange_evaluate(&nodes, combiner_quotient, challenge)?;
    let vanishing = challenge * (challenge - F::one());
    Ok(perturbator_evaluation * (F::one() - challenge) + vanishing * quotient_at_challenge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protogalaxy::perturbator::{
        compute_perturbator, compute_round_challenge_pows, PerturbatorWorkspace,
    };
    use crate::utils::test_trace::{random_relation_parameters, satisfying_instance};
    use ark_bn254::Fr;
    use ark_std::{test_rng, Zero};

    #[test]
    fn combiner_of_satisfying_instances_is_zero_at_the_ends() {
        let mut rng = test_rng();
        let params = random_relation_parameters::<Fr, _>(&mut rng, 8);
        let alpha = Fr::random(&mut rng);
        let acc = satisfying_instance(3, &params, alpha, &mut rng).unwrap();
        let incoming = satisfying_instance(3, &params, alpha, &mut rng).unwrap();
        let pow = PowPolynomial::new((0..3).map(|_| Fr::random(&mut rng)).collect());

        let combiner = compute_combiner(&acc, &incoming, &pow, alpha);
        assert_eq!(combiner.len(), COMBINER_LENGTH);
        assert!(combiner[0].is_zero());
        assert!(combiner[1].is_zero());
        // The line between two satisfying traces leaves the relation's zero set.
        assert!(!combiner[3].is_zero());
    }

    #[test]
    fn combiner_at_zero_matches_perturbator() {
        let mut rng = test_rng();
        let params = random_relation_parameters::<Fr, _>(&mut rng, 8);
        let alpha = Fr::random(&mut rng);
        let mut acc = satisfying_instance(3, &params, alpha, &mut rng).unwrap();
        // Relaxed accumulator: perturb a witness value.
        acc.polynomials[crate::columns::HonkColumn::W4][2] += Fr::from(5u64);
        let incoming = satisfying_instance(3, &params, alpha, &mut rng).unwrap();

        let deltas = compute_round_challenge_pows(3, Fr::random(&mut rng));
        let perturbator =
            compute_perturbator(&acc, &deltas, alpha, &mut PerturbatorWorkspace::new()).unwrap();
        let challenge = Fr::random(&mut rng);
        let betas_star: Vec<Fr> = acc
            .folding_parameters
            .gate_separation_challenges
            .iter()
            .zip(&deltas)
            .map(|(beta, delta)| *beta + challenge * delta)
            .collect();

        let combiner = compute_combiner(&acc, &incoming, &PowPolynomial::new(betas_star), alpha);
        let evaluation = perturbator.evaluate(&challenge);
        assert_eq!(combiner[0], evaluation);
        assert!(combiner[1].is_zero());

        let quotient = compute_combiner_quotient(&combiner, evaluation).unwrap();
        let gamma = Fr::random(&mut rng);
        assert_eq!(
            compute_new_target_sum(evaluation, &quotient, gamma).unwrap(),
            combiner.evaluate(gamma)
        );
    }

    #[test]
    fn each_instance_is_checked_against_its_own_parameters() {
        let mut rng = test_rng();
        let alpha = Fr::random(&mut rng);
        let acc_params = random_relation_parameters::<Fr, _>(&mut rng, 8);
        let incoming_params = random_relation_parameters::<Fr, _>(&mut rng, 8);
        let acc = satisfying_instance(3, &acc_params, alpha, &mut rng).unwrap();
        let incoming = satisfying_instance(3, &incoming_params, alpha, &mut rng).unwrap();
        let pow = PowPolynomial::new((0..3).map(|_| Fr::random(&mut rng)).collect());

        let combiner = compute_combiner(&acc, &incoming, &pow, alpha);
        assert!(combiner[0].is_zero());
        assert!(combiner[1].is_zero());
    }
}
