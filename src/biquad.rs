//! Second-order sections and the streaming cascade runtime

use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Coefficients of a single section, `a0` is implicitly 1.
///
/// The transfer function is `(b0 + b1·z⁻¹ + b2·z⁻²)/(1 + a1·z⁻¹ + a2·z⁻²)`. A first order section
/// has `b2 = a2 = 0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biquad {
    pub index: u16,
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Biquad {
    pub fn to_array(&self) -> [f64; 5] {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
    }

    /// Evaluates the transfer function at `z⁻¹ = z_inv`
    pub fn response_at(&self, z_inv: Complex64) -> Complex64 {
        let z_inv2 = z_inv * z_inv;
        let num = z_inv2 * self.b2 + z_inv * self.b1 + self.b0;
        let den = z_inv2 * self.a2 + z_inv * self.a1 + 1.;
        num / den
    }

    /// Roots of `z² + a1·z + a2`
    pub fn poles(&self) -> [Complex64; 2] {
        let half = Complex64::new(-self.a1 / 2., 0.);
        let root = Complex64::new(self.a1 * self.a1 / 4. - self.a2, 0.).sqrt();
        [half + root, half - root]
    }

    pub fn max_pole_magnitude(&self) -> f64 {
        let [p1, p2] = self.poles();
        p1.norm().max(p2.norm())
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Biquad {
            index: 1,
            b0: 1.,
            b1: 0.,
            b2: 0.,
            a1: 0.,
            a2: 0.,
        }
    }
}

impl From<&Biquad> for [f64; 5] {
    fn from(biquad: &Biquad) -> Self {
        biquad.to_array()
    }
}

/// An ordered chain of sections, the output of one feeds the next
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cascade {
    pub sections: Vec<Biquad>,
}

impl Cascade {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Complex response at the normalized angular frequency `w` (rad/sample)
    pub fn response_at(&self, w: f64) -> Complex64 {
        let z_inv = Complex64::from_polar(1., -w);
        self.sections
            .iter()
            .fold(Complex64::new(1., 0.), |acc, s| acc * s.response_at(z_inv))
    }

    /// Magnitude of the response at `freq` Hz for a sampling rate of `sampling_rate` Hz
    pub fn gain_at(&self, freq: f64, sampling_rate: f64) -> f64 {
        self.response_at(2. * PI * freq / sampling_rate).norm()
    }

    pub fn max_pole_magnitude(&self) -> f64 {
        self.sections
            .iter()
            .map(Biquad::max_pole_magnitude)
            .fold(0., f64::max)
    }

    /// Creates a fresh streaming instance with zeroed state
    pub fn filter(&self) -> CascadeFilter {
        CascadeFilter::new(self)
    }
}

/// Streaming evaluation of a cascade.
///
/// Each instance exclusively owns its state registers, so independent instances can be driven
/// from different threads, one per channel.
#[derive(Clone, Debug)]
pub struct CascadeFilter {
    sections: Vec<Biquad>,
    state: Vec<[f64; 2]>,
}

impl CascadeFilter {
    pub fn new(cascade: &Cascade) -> Self {
        CascadeFilter {
            sections: cascade.sections.clone(),
            state: vec![[0.; 2]; cascade.len()],
        }
    }

    /// Runs one sample through every section in order
    pub fn process(&mut self, input: f64) -> f64 {
        let mut output = input;
        for (s, [z1, z2]) in self.sections.iter().zip(self.state.iter_mut()) {
            let x = output - s.a1 * *z1 - s.a2 * *z2;
            output = s.b0 * x + s.b1 * *z1 + s.b2 * *z2;
            *z2 = *z1;
            *z1 = x;
        }
        output
    }

    /// Filters `samples` in place
    pub fn process_block(&mut self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Zeroes the state, coefficients are kept
    pub fn reset(&mut self) {
        self.state.iter_mut().for_each(|s| *s = [0.; 2]);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn averager() -> Cascade {
        // Two point moving average followed by a one pole smoother
        Cascade {
            sections: vec![
                Biquad {
                    index: 1,
                    b0: 0.5,
                    b1: 0.5,
                    ..Default::default()
                },
                Biquad {
                    index: 2,
                    b0: 0.5,
                    a1: -0.5,
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn test_process() {
        let mut filter = averager().filter();
        assert_eq!(filter.process(1.), 0.25);
        // x = 0.5 + 0.5·0.5, out = 0.5·0.75
        assert_eq!(filter.process(0.), 0.375);

        filter.reset();
        assert_eq!(filter.process(1.), 0.25);
    }

    #[test]
    fn test_process_block() {
        let cascade = averager();
        let mut expected = cascade.filter();
        let expected: Vec<_> = (0..16).map(|i| expected.process(i as f64)).collect();

        let mut samples: Vec<_> = (0..16).map(|i| i as f64).collect();
        cascade.filter().process_block(&mut samples);
        assert_eq!(samples, expected);
    }

    #[test]
    fn test_gain() {
        let cascade = averager();
        assert_approx_eq!(cascade.gain_at(0., 100.), 1.);
        assert_approx_eq!(cascade.gain_at(50., 100.), 0., 1e-12);
    }

    #[test]
    fn test_poles() {
        let b = Biquad {
            a1: -1.,
            a2: 0.5,
            ..Default::default()
        };
        let [p1, p2] = b.poles();
        assert_approx_eq!(p1.re, 0.5);
        assert_approx_eq!(p1.im.abs(), 0.5);
        assert_eq!(p1, p2.conj());
        assert_approx_eq!(b.max_pole_magnitude(), 0.5f64.sqrt());
    }

    #[test]
    fn test_array() {
        let b = Biquad {
            index: 3,
            b0: 1.,
            b1: 2.,
            b2: 3.,
            a1: 4.,
            a2: 5.,
        };
        let arr: [f64; 5] = (&b).into();
        assert_eq!(arr, [1., 2., 3., 4., 5.]);
    }
}
