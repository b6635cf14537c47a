use std::cmp::Ordering;
use std::ops::{AddAssign, Index, IndexMut, Mul};

use crate::field::HonkField;
use crate::transcripts::{AppendToTranscript, Transcript};

// ax^2 + bx + c stored as vec![c,b,a]
// ax^3 + bx^2 + cx + d stored as vec![d,c,b,a]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniPoly<F> {
    pub coeffs: Vec<F>,
}

impl<F: HonkField> UniPoly<F> {
    pub fn from_coeff(coeffs: Vec<F>) -> Self {
        UniPoly { coeffs }
    }

    pub fn zero() -> Self {
        Self::from_coeff(Vec::new())
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn as_vec(&self) -> Vec<F> {
        self.coeffs.clone()
    }

    pub fn eval_at_zero(&self) -> F {
        self.coeffs.first().copied().unwrap_or_else(F::zero)
    }

    pub fn eval_at_one(&self) -> F {
        self.coeffs.iter().sum()
    }

    /// Horner evaluation.
    pub fn evaluate(&self, r: &F) -> F {
        self.coeffs
            .iter()
            .rev()
            .fold(F::zero(), |acc, coeff| acc * r + coeff)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }
}

impl<F: HonkField> AddAssign<&Self> for UniPoly<F> {
    fn add_assign(&mut self, rhs: &Self) {
        let ordering = self.coeffs.len().cmp(&rhs.coeffs.len());
        for (lhs, rhs) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *lhs += *rhs;
        }
        if matches!(ordering, Ordering::Less) {
            self.coeffs
                .extend(rhs.coeffs[self.coeffs.len()..].iter().cloned());
        }
    }
}

impl<F: HonkField> Mul<F> for UniPoly<F> {
    type Output = Self;

    fn mul(self, rhs: F) -> Self {
        Self::from_coeff(self.coeffs.into_iter().map(|c| c * rhs).collect())
    }
}

impl<F: HonkField> AsRef<Vec<F>> for UniPoly<F> {
    fn as_ref(&self) -> &Vec<F> {
        &self.coeffs
    }
}

impl<F: HonkField> Index<usize> for UniPoly<F> {
    type Output = F;

    #[inline(always)]
    fn index(&self, index: usize) -> &F {
        &(self.coeffs[index])
    }
}

impl<F: HonkField> IndexMut<usize> for UniPoly<F> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut F {
        &mut (self.coeffs[index])
    }
}

impl<F: HonkField> AppendToTranscript for UniPoly<F> {
    fn append_to_transcript<ProofTranscript: Transcript>(
        &self,
        label: &'static [u8],
        transcript: &mut ProofTranscript,
    ) {
        transcript.send_scalars_to_verifier(label, &self.coeffs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_std::{One, Zero};

    #[test]
    fn evaluation() {
        // 3x^2 + 2x + 1
        let poly = UniPoly::from_coeff(vec![
            Fr::from(1u64),
            Fr::from(2u64),
            Fr::from(3u64),
        ]);
        assert_eq!(poly.degree(), 2);
        assert_eq!(poly.eval_at_zero(), Fr::one());
        assert_eq!(poly.eval_at_one(), Fr::from(6u64));
        assert_eq!(poly.evaluate(&Fr::from(2u64)), Fr::from(17u64));
    }

    #[test]
    fn add_assign_extends_shorter_lhs() {
        let mut lhs = UniPoly::from_coeff(vec![Fr::one()]);
        let rhs = UniPoly::from_coeff(vec![Fr::one(), Fr::from(5u64)]);
        lhs += &rhs;
        assert_eq!(lhs.coeffs, vec![Fr::from(2u64), Fr::from(5u64)]);
        assert!((lhs * Fr::zero()).is_zero());
    }
}
