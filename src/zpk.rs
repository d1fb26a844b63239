//! Zero/pole/gain representation of a transfer function

use num_complex::Complex64;

/// Roots whose imaginary part is below this fraction of their magnitude are treated as real
const REAL_TOLERANCE: f64 = 100. * f64::EPSILON;

/// A rational transfer function given by its roots.
///
/// In the s-plane this describes `k·Π(s − zᵢ)/Π(s − pᵢ)`, in the z-plane the same expression in `z`.
/// Complex roots always come in conjugate pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Zpk {
    pub zeros: Vec<Complex64>,
    pub poles: Vec<Complex64>,
    pub gain: f64,
}

impl Zpk {
    pub fn new(zeros: Vec<Complex64>, poles: Vec<Complex64>, gain: f64) -> Self {
        Zpk { zeros, poles, gain }
    }

    /// Number of zeros at infinity
    pub fn degree(&self) -> usize {
        self.poles.len().saturating_sub(self.zeros.len())
    }

    /// Largest pole magnitude, 0 for an all-zero system
    pub fn max_pole_magnitude(&self) -> f64 {
        self.poles.iter().map(|p| p.norm()).fold(0., f64::max)
    }
}

pub(crate) fn is_real(c: Complex64) -> bool {
    c.im.abs() <= REAL_TOLERANCE * c.norm()
}

pub(crate) fn product(values: impl IntoIterator<Item = Complex64>) -> Complex64 {
    values
        .into_iter()
        .fold(Complex64::new(1., 0.), |acc, v| acc * v)
}

/// Reduces a conjugate-symmetric root set to one representative per conjugate pair (the one with
/// a positive imaginary part) followed by the real roots, with imaginary parts of reals cleared.
pub(crate) fn representatives(roots: &[Complex64]) -> Vec<Complex64> {
    let mut sorted = roots.to_vec();
    sorted.sort_by(|a, b| {
        a.re.total_cmp(&b.re)
            .then_with(|| a.im.abs().total_cmp(&b.im.abs()))
    });

    let (real, complex): (Vec<_>, Vec<_>) = sorted.into_iter().partition(|c| is_real(*c));
    complex
        .into_iter()
        .filter(|c| c.im > 0.)
        .chain(real.into_iter().map(|c| Complex64::new(c.re, 0.)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_representatives() {
        let roots = [
            Complex64::new(0.5, -0.5),
            Complex64::new(-1., 1e-20),
            Complex64::new(0.5, 0.5),
            Complex64::new(0.2, 0.),
        ];
        let reps = representatives(&roots);
        assert_eq!(
            reps,
            vec![
                Complex64::new(0.5, 0.5),
                Complex64::new(-1., 0.),
                Complex64::new(0.2, 0.)
            ]
        );
    }

    #[test]
    fn test_degree() {
        let zpk = Zpk::new(vec![Complex64::new(0., 0.)], vec![Complex64::new(-1., 0.); 3], 1.);
        assert_eq!(zpk.degree(), 2);
        assert_eq!(zpk.max_pole_magnitude(), 1.);
    }
}
