use std::collections::HashSet;

use ark_ff::{Field, One, Zero};
use rayon::prelude::*;

use crate::crypto::curve::{self, CurvePoint};
use crate::crypto::F;

/// Interpolation failed because of duplicate x-coordinates.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InterpolationError {
    DuplicateX,
}

fn contains_duplicates(scalars: &[F]) -> bool {
    let mut set = HashSet::with_capacity(scalars.len());
    scalars.iter().any(|x| !set.insert(*x))
}

/// Compute the Lagrange coefficients at x=0.
///
/// # Arguments
/// * `samples` is a list of values x_0, x_1, ...x_n.
/// # Result
/// * `[lagrange_0, lagrange_1, ..., lagrange_n]` where:
///    * lagrange_i = numerator_i/denominator_i
///    * numerator_i = x_0 * x_1 * ... * x_(i-1) * x_(i+1) * ... * x_n
///    * denominator_i = (x_0 - x_i) * (x_1 - x_i) * ... * (x_(i-1) - x_i) *
///      (x_(i+1) - x_i) * ... * (x_n - x_i)
/// # Errors
/// `InterpolationError::DuplicateX`: in case the interpolation points `samples` are not all distinct.
pub fn lagrange_coefficients_at_zero(samples: &[F]) -> Result<Vec<F>, InterpolationError> {
    let len = samples.len();
    if len == 0 {
        return Ok(Vec::new());
    }
    if len == 1 {
        return Ok(vec![F::one()]);
    }

    if contains_duplicates(samples) {
        return Err(InterpolationError::DuplicateX);
    }

    // The i'th numerator is the product of all x_j for j != i, built from
    // prefix and suffix products.
    let mut x_prod: Vec<F> = Vec::with_capacity(len);
    let mut tmp = F::one();
    x_prod.push(tmp);
    for x in samples.iter().take(len - 1) {
        tmp *= x;
        x_prod.push(tmp);
    }
    tmp = F::one();
    for (i, x) in samples[1..].iter().enumerate().rev() {
        tmp *= x;
        x_prod[i] *= tmp;
    }

    for (i, (lagrange_0, x_i)) in x_prod.iter_mut().zip(samples).enumerate() {
        let denom = samples
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .fold(F::one(), |acc, (_, x_j)| acc * (*x_j - x_i));

        if denom.is_zero() {
            return Err(InterpolationError::DuplicateX);
        }
        let inv = denom.inverse().ok_or(InterpolationError::DuplicateX)?;
        *lagrange_0 *= inv;
    }
    Ok(x_prod)
}

/// Given samples `(x, f(x)·P)` for a polynomial `f` over the scalar field and a fixed
/// point `P`, returns `f(0)·P`.
///
/// The weighted terms are independent, so they are computed on the rayon pool and
/// summed in whatever order the reduction picks.
pub fn interpolate_points(samples: &[(F, CurvePoint)]) -> Result<CurvePoint, InterpolationError> {
    let all_x: Vec<F> = samples.iter().map(|(x, _)| *x).collect();
    let coefficients = lagrange_coefficients_at_zero(&all_x)?;

    let sum = coefficients
        .par_iter()
        .zip(samples.par_iter())
        .map(|(lambda, (_, point))| Some(point.scalar_mul(lambda)))
        .reduce(
            || None,
            |acc, term| match term {
                Some(term) => Some(curve::add(acc.as_ref(), &term)),
                None => acc,
            },
        );
    Ok(sum.unwrap_or_else(CurvePoint::identity))
}

pub fn interpolate_scalar(samples: &[(F, F)]) -> Result<F, InterpolationError> {
    let all_x: Vec<F> = samples.iter().map(|(x, _)| *x).collect();
    let coefficients = lagrange_coefficients_at_zero(&all_x)?;
    let mut result = F::zero();
    for (coefficient, sample) in coefficients.iter().zip(samples.iter().map(|(_, y)| y)) {
        result += *sample * coefficient;
    }
    Ok(result)
}
