//! Frequency response of a cascade, as consumed by an external plotter

use std::f64::consts::PI;

use serde::Serialize;

use crate::biquad::Cascade;

/// Default number of frequencies evaluated for a plot
pub const DEFAULT_POINTS: usize = 512;

/// Floor applied before converting a magnitude to decibels
const MIN_MAGNITUDE: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponsePoint {
    /// Frequency in Hz
    pub freq: f64,
    pub magnitude: f64,
    pub magnitude_db: f64,
    /// Phase in radians, in `(-π, π]`
    pub phase: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrequencyResponse {
    pub sampling_rate: f64,
    pub points: Vec<ResponsePoint>,
}

impl FrequencyResponse {
    /// Evaluates the cascade at `points` equally spaced frequencies from DC up to, but excluding,
    /// the Nyquist frequency.
    pub fn compute(cascade: &Cascade, sampling_rate: f64, points: usize) -> Self {
        let nyquist = sampling_rate / 2.;
        let points = (0..points)
            .map(|i| {
                let freq = nyquist * i as f64 / points as f64;
                let h = cascade.response_at(PI * i as f64 / points as f64);
                let magnitude = h.norm();
                ResponsePoint {
                    freq,
                    magnitude,
                    magnitude_db: 20. * magnitude.max(MIN_MAGNITUDE).log10(),
                    phase: h.arg(),
                }
            })
            .collect();

        FrequencyResponse {
            sampling_rate,
            points,
        }
    }

    /// Frequency with the highest magnitude
    pub fn peak(&self) -> Option<&ResponsePoint> {
        self.points
            .iter()
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::biquad::Biquad;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_grid() {
        let cascade = Cascade {
            sections: vec![Biquad {
                b0: 0.5,
                b1: 0.5,
                ..Default::default()
            }],
        };
        let response = FrequencyResponse::compute(&cascade, 1000., 4);
        let freqs: Vec<_> = response.points.iter().map(|p| p.freq).collect();
        assert_eq!(freqs, vec![0., 125., 250., 375.]);

        assert_approx_eq!(response.points[0].magnitude, 1.);
        assert_approx_eq!(response.points[0].magnitude_db, 0.);
        assert_approx_eq!(response.points[2].magnitude, std::f64::consts::FRAC_1_SQRT_2);
        assert_approx_eq!(response.points[2].phase, -PI / 4.);
        assert_eq!(response.peak().map(|p| p.freq), Some(0.));
    }

    #[test]
    fn test_empty() {
        let response = FrequencyResponse::compute(&Cascade::default(), 48000., 0);
        assert!(response.points.is_empty());
        assert!(response.peak().is_none());
    }
}
