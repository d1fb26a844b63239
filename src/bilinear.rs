//! Bilinear mapping from the s-plane to the z-plane

use num_complex::Complex64;

use crate::{
    zpk::{product, Zpk},
    Error,
};

/// Designs closer than this to the unit circle are reported as barely stable
pub const MARGINAL_POLE_MAGNITUDE: f64 = 0.9999;

/// Maps an analog transfer function to the digital domain with `s = 2·fs·(z − 1)/(z + 1)`.
///
/// Every root moves to `(2·fs + s)/(2·fs − s)`, zeros at infinity land on `z = −1` (Nyquist), and
/// the gain is corrected so that both functions agree on the imaginary axis / unit circle.
pub fn bilinear(analog: &Zpk, sampling_rate: f64) -> Zpk {
    let fs2 = 2. * sampling_rate;
    let degree = analog.degree();
    let map = |s: &Complex64| (fs2 + *s) / (fs2 - *s);

    let zeros = analog
        .zeros
        .iter()
        .map(map)
        .chain(std::iter::repeat(Complex64::new(-1., 0.)).take(degree))
        .collect();
    let poles = analog.poles.iter().map(map).collect();

    // Π(2fs − z)/Π(2fs − p), accumulated pairwise to stay in range at high orders
    let ratios = analog
        .zeros
        .iter()
        .zip(&analog.poles)
        .map(|(z, p)| (fs2 - *z) / (fs2 - *p))
        .chain(
            analog.poles[analog.zeros.len().min(analog.poles.len())..]
                .iter()
                .map(|p| 1. / (fs2 - *p)),
        );
    let gain = analog.gain * product(ratios).re;

    Zpk::new(zeros, poles, gain)
}

/// Fails with [`Error::DesignInstability`] on the first pole that is not strictly inside the
/// unit circle.
pub fn check_stability(digital: &Zpk) -> Result<(), Error> {
    for (pole_index, pole) in digital.poles.iter().enumerate() {
        let magnitude = pole.norm();
        // Also catches NaN
        if !(magnitude < 1.) {
            return Err(Error::DesignInstability {
                pole_index,
                magnitude,
            });
        }
    }

    let max = digital.max_pole_magnitude();
    if max > MARGINAL_POLE_MAGNITUDE {
        log::warn!(
            "the design is marginally stable (max pole magnitude {}), expect long ringing and rounding noise",
            max
        );
    }
    Ok(())
}

/// Fails with [`Error::DesignPrecision`] when the overall gain is zero, subnormal or not finite.
pub fn check_gain(digital: &Zpk) -> Result<(), Error> {
    let gain = digital.gain;
    if gain.is_normal() {
        return Ok(());
    }
    let reason = if gain.is_finite() {
        "the overall gain underflows"
    } else {
        "the overall gain is not finite"
    };
    Err(Error::DesignPrecision { section: 1, reason })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{prototype::butterworth, transform::lowpass_to_lowpass};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_lowpass_mapping() {
        let fs = 500.;
        let analog = lowpass_to_lowpass(&butterworth(2), 100.);
        let digital = bilinear(&analog, fs);

        assert_eq!(digital.zeros, vec![Complex64::new(-1., 0.); 2]);
        assert_eq!(digital.poles.len(), 2);
        assert!(digital.poles.iter().all(|p| p.norm() < 1.));

        // Unity gain at z = 1
        let one = Complex64::new(1., 0.);
        let num = product(digital.zeros.iter().map(|z| one - *z));
        let den = product(digital.poles.iter().map(|p| one - *p));
        assert_approx_eq!((num / den * digital.gain).norm(), 1., 1e-12);
    }

    #[test]
    fn test_unstable_pole() {
        let zpk = Zpk::new(
            vec![],
            vec![Complex64::new(0.5, 0.), Complex64::new(0., 1.)],
            1.,
        );
        match check_stability(&zpk) {
            Err(Error::DesignInstability {
                pole_index,
                magnitude,
            }) => {
                assert_eq!(pole_index, 1);
                assert_approx_eq!(magnitude, 1.);
            }
            other => panic!("expected an instability error, got {:?}", other),
        }

        let nan = Zpk::new(vec![], vec![Complex64::new(f64::NAN, 0.)], 1.);
        assert!(check_stability(&nan).is_err());
    }

    #[test]
    fn test_gain_range() {
        let zpk = |gain| Zpk::new(vec![], vec![Complex64::new(0.5, 0.)], gain);
        assert!(check_gain(&zpk(1e-300)).is_ok());
        assert!(check_gain(&zpk(-2.)).is_ok());

        for gain in [0., 1e-320, f64::INFINITY, f64::NAN] {
            match check_gain(&zpk(gain)) {
                Err(Error::DesignPrecision { section, .. }) => assert_eq!(section, 1),
                other => panic!("expected a precision error for {}, got {:?}", gain, other),
            }
        }
    }

    #[test]
    fn test_stable_design() {
        let digital = bilinear(&lowpass_to_lowpass(&butterworth(5), 300.), 1000.);
        assert!(check_stability(&digital).is_ok());
    }
}
