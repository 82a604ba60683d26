//! # Shamir splitting over the secp256k1 scalar field
//!
//! The delegation secret is the constant term of a random polynomial of degree
//! `threshold - 1`. Shares are evaluations of that polynomial at caller-chosen
//! identifiers, so any `threshold` of them determine the constant term while fewer
//! reveal nothing about it.

use ark_ff::UniformRand;
use ark_poly::{univariate::DensePolynomial, Polynomial};
use rand::Rng;

use crate::crypto::F;

#[derive(Clone, Debug)]
pub struct ShamirPolynomial {
    poly: DensePolynomial<F>,
}

impl ShamirPolynomial {
    /// Samples a degree `threshold - 1` polynomial whose evaluation at zero is `secret`.
    /// A threshold of zero is treated as one.
    pub fn sample<R: Rng + ?Sized>(secret: F, threshold: usize, rng: &mut R) -> Self {
        let coeffs: Vec<F> = (0..threshold.max(1))
            .map(|i| if i == 0 { secret } else { F::rand(rng) })
            .collect();
        ShamirPolynomial { poly: DensePolynomial { coeffs } }
    }

    pub fn secret(&self) -> F {
        self.poly.coeffs[0]
    }

    pub fn threshold(&self) -> usize {
        self.poly.coeffs.len()
    }

    /// Evaluates the polynomial at `x` (Horner's rule, mod the group order).
    pub fn evaluate(&self, x: &F) -> F {
        self.poly.evaluate(x)
    }
}
