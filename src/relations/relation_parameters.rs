use crate::field::HonkField;
use crate::poly::univariate::Univariate;

/// Challenges and public quantities shared by every row of a relation evaluation.
///
/// `T` is a field element for a single instance, or a [`Univariate`] along the line between
/// two instances being folded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelationParameters<T> {
    /// Lookup column compression challenge.
    pub eta: T,
    pub beta: T,
    pub gamma: T,
    pub public_input_delta: T,
    pub lookup_grand_product_delta: T,
}

impl<T> RelationParameters<T> {
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> RelationParameters<U> {
        RelationParameters {
            eta: f(&self.eta),
            beta: f(&self.beta),
            gamma: f(&self.gamma),
            public_input_delta: f(&self.public_input_delta),
            lookup_grand_product_delta: f(&self.lookup_grand_product_delta),
        }
    }

    fn zip_map<U>(&self, other: &Self, f: impl Fn(&T, &T) -> U) -> RelationParameters<U> {
        RelationParameters {
            eta: f(&self.eta, &other.eta),
            beta: f(&self.beta, &other.beta),
            gamma: f(&self.gamma, &other.gamma),
            public_input_delta: f(&self.public_input_delta, &other.public_input_delta),
            lookup_grand_product_delta: f(
                &self.lookup_grand_product_delta,
                &other.lookup_grand_product_delta,
            ),
        }
    }

    /// Values in absorption order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Copy,
    {
        vec![
            self.eta,
            self.beta,
            self.gamma,
            self.public_input_delta,
            self.lookup_grand_product_delta,
        ]
    }
}

impl<F: HonkField> RelationParameters<F> {
    pub fn new(eta: F, beta: F, gamma: F, public_input_delta: F, circuit_size: usize) -> Self {
        Self {
            eta,
            beta,
            gamma,
            public_input_delta,
            lookup_grand_product_delta: compute_lookup_grand_product_delta(beta, gamma, circuit_size),
        }
    }

    /// `(1 - challenge)·self + challenge·other`, parameter by parameter.
    pub fn fold(&self, other: &Self, challenge: F) -> Self {
        self.zip_map(other, |lhs, rhs| *lhs + challenge * (*rhs - lhs))
    }

    /// Each parameter as the degree-1 univariate from `first` (at 0) to `second` (at 1).
    pub fn extend_edge(first: &Self, second: &Self, len: usize) -> RelationParameters<Univariate<F>> {
        first.zip_map(second, |lhs, rhs| Univariate::extend_edge(*lhs, *rhs, len))
    }
}

/// `(γ(1 + β))^n`: the value the lookup grand product takes over a trace of `n` rows.
pub fn compute_lookup_grand_product_delta<F: HonkField>(beta: F, gamma: F, circuit_size: usize) -> F {
    (gamma * (F::one() + beta)).pow(circuit_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn lookup_delta() {
        let beta = Fr::from(2u64);
        let gamma = Fr::from(5u64);
        // (5 * 3)^3
        assert_eq!(
            compute_lookup_grand_product_delta(beta, gamma, 3),
            Fr::from(3375u64)
        );
        let params = RelationParameters::new(Fr::from(1u64), beta, gamma, Fr::from(1u64), 3);
        assert_eq!(params.lookup_grand_product_delta, Fr::from(3375u64));
    }

    #[test]
    fn folding_follows_the_edge() {
        let first = RelationParameters::new(Fr::from(1u64), Fr::from(2u64), Fr::from(3u64), Fr::from(4u64), 2);
        let second = RelationParameters::new(Fr::from(9u64), Fr::from(8u64), Fr::from(7u64), Fr::from(6u64), 2);
        let edges = RelationParameters::extend_edge(&first, &second, 4);
        let challenge = Fr::from(3u64);
        let folded = first.fold(&second, challenge);
        assert_eq!(folded, edges.map(|edge| edge.value_at(3)));
        // eta: 1 + 3·(9 - 1)
        assert_eq!(folded.eta, Fr::from(25u64));
        assert_eq!(first.fold(&second, Fr::from(0u64)), first);
    }
}
