//! Random satisfying traces for tests and benchmarks.
//!
//! Every row is an arithmetic gate (`q_arith = 1`, `q_o = -1`) whose `w_o` is computed
//! from random inputs, consecutive rows are chained by a copy constraint
//! `w_l[i] = w_o[i - 1]`, and lookup gates are switched off over random tables.

use rand_core::RngCore;

use crate::columns::{HonkColumn, ProverPolynomials};
use crate::field::HonkField;
use crate::protogalaxy::{FoldingParameters, Instance};
use crate::relations::grand_product::compute_grand_product;
use crate::relations::{LookupRelation, PermutationRelation, RelationParameters};
use crate::utils::errors::ProtoGalaxyError;
use crate::utils::math::Math;

/// Random `η, β, γ` with `public_input_delta = 1` and the lookup delta of a trace with
/// `circuit_size` rows.
pub fn random_relation_parameters<F: HonkField, R: RngCore>(
    rng: &mut R,
    circuit_size: usize,
) -> RelationParameters<F> {
    RelationParameters::new(
        F::random(rng),
        F::random(rng),
        F::random(rng),
        F::one(),
        circuit_size,
    )
}

/// A trace of `2^log_n` rows satisfying every relation under `params`, grand products
/// included.
pub fn satisfying_polynomials<F: HonkField, R: RngCore>(
    log_n: usize,
    params: &RelationParameters<F>,
    rng: &mut R,
) -> Result<ProverPolynomials<F>, ProtoGalaxyError> {
    use HonkColumn::*;

    let n = log_n.pow2();
    let mut polys = ProverPolynomials::zero(n);

    for i in 0..n {
        let w_l = if i == 0 {
            F::random(rng)
        } else {
            polys[WO][i - 1]
        };
        let (w_r, w_4) = (F::random(rng), F::random(rng));
        let (q_m, q_l, q_r, q_4, q_c) = (
            F::random(rng),
            F::random(rng),
            F::random(rng),
            F::random(rng),
            F::random(rng),
        );
        let w_o = q_m * w_l * w_r + q_l * w_l + q_r * w_r + q_4 * w_4 + q_c;

        for (column, value) in [
            (WL, w_l),
            (WR, w_r),
            (WO, w_o),
            (W4, w_4),
            (QM, q_m),
            (QL, q_l),
            (QR, q_r),
            (QO, -F::one()),
            (Q4, q_4),
            (QC, q_c),
            (QArith, F::one()),
        ] {
            polys[column][i] = value;
        }
    }

    // Cell (j, i) is labelled j·n + i; σ swaps the labels of (WL, i) and (WO, i - 1).
    for (j, (id, sigma)) in [(Id1, Sigma1), (Id2, Sigma2), (Id3, Sigma3), (Id4, Sigma4)]
        .into_iter()
        .enumerate()
    {
        for i in 0..n {
            let label = F::from_u64((j * n + i) as u64);
            polys[id][i] = label;
            polys[sigma][i] = label;
        }
    }
    for i in 1..n {
        polys[Sigma1][i] = polys[Id3][i - 1];
        polys[Sigma3][i - 1] = polys[Id1][i];
    }

    polys[LagrangeFirst][0] = F::one();
    polys[LagrangeLast][n - 1] = F::one();

    let eta = params.eta;
    for i in 0..n {
        let tables = [F::random(rng), F::random(rng), F::random(rng), F::random(rng)];
        polys[Table1][i] = tables[0];
        polys[Table2][i] = tables[1];
        polys[Table3][i] = tables[2];
        polys[Table4][i] = tables[3];
        polys[SortedAccum][i] =
            tables[0] + eta * (tables[1] + eta * (tables[2] + eta * tables[3]));
    }

    let permutation_delta = compute_grand_product::<PermutationRelation, F>(&mut polys, params)?;
    let lookup_delta = compute_grand_product::<LookupRelation, F>(&mut polys, params)?;
    debug_assert_eq!(permutation_delta, params.public_input_delta);
    debug_assert_eq!(lookup_delta, params.lookup_grand_product_delta);
    Ok(polys)
}

/// A satisfying instance with zero target sum and random gate separation challenges.
pub fn satisfying_instance<F: HonkField, R: RngCore>(
    log_n: usize,
    params: &RelationParameters<F>,
    alpha: F,
    rng: &mut R,
) -> Result<Instance<F>, ProtoGalaxyError> {
    let polynomials = satisfying_polynomials(log_n, params, rng)?;
    let gate_separation_challenges = (0..log_n).map(|_| F::random(rng)).collect();
    Ok(Instance::new(
        polynomials,
        *params,
        alpha,
        FoldingParameters {
            gate_separation_challenges,
            target_sum: F::zero(),
        },
    ))
}
