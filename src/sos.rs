//! Packing of a digital transfer function into cascaded second-order sections
//!
//! Poles are paired with the zeros nearest to them, worst pole first (the one closest to the
//! unit circle). Sections are filled from the end of the cascade toward the front, so the
//! cascade is ordered by ascending pole magnitude. The overall gain is applied to the numerator
//! of the first section, every other section keeps a monic numerator. Gains further than
//! [`GAIN_DECADES`] decades from 1 are split evenly across all sections instead.

use num_complex::Complex64;

use crate::{
    biquad::{Biquad, Cascade},
    zpk::{representatives, Zpk},
    Error,
};

/// Overall gains within this many decades of 1 stay in the first section
pub const GAIN_DECADES: f64 = 8.;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Kind {
    Any,
    Real,
    Complex,
}

/// Roots of one section, either may hold zero, one or two values.
/// Complex values stand for themselves and their conjugate.
#[derive(Debug)]
struct Pairing {
    zeros: Vec<Complex64>,
    poles: Vec<Complex64>,
}

fn is_real(c: &Complex64) -> bool {
    c.im == 0.
}

/// Index of the root closest to the unit circle
fn worst(roots: &[Complex64], kind: Kind) -> Option<usize> {
    roots
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_kind(r, kind))
        .min_by(|(_, a), (_, b)| {
            (1. - a.norm())
                .abs()
                .total_cmp(&(1. - b.norm()).abs())
        })
        .map(|(i, _)| i)
}

/// Index of the root closest to `to`
fn nearest(roots: &[Complex64], to: Complex64, kind: Kind) -> Option<usize> {
    roots
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_kind(r, kind))
        .min_by(|(_, a), (_, b)| (**a - to).norm().total_cmp(&(**b - to).norm()))
        .map(|(i, _)| i)
}

fn matches_kind(root: &Complex64, kind: Kind) -> bool {
    match kind {
        Kind::Any => true,
        Kind::Real => is_real(root),
        Kind::Complex => !is_real(root),
    }
}

/// Expands up to two roots into `[c0, c1, c2]`, the coefficients of `z⁻¹` powers.
/// A complex single root implies its conjugate, missing roots sit at the origin.
fn polynomial(roots: &[Complex64]) -> [f64; 3] {
    match roots {
        [] => [1., 0., 0.],
        [r] if !is_real(r) => [1., -2. * r.re, r.norm_sqr()],
        [r] => [1., -r.re, 0.],
        [r1, r2] => [1., -(r1 + r2).re, (r1 * r2).re],
        _ => unreachable!("a section holds at most two roots"),
    }
}

/// Picks the roots of the next section, mutating the remaining sets
fn next_pairing(zeros: &mut Vec<Complex64>, poles: &mut Vec<Complex64>) -> Option<Pairing> {
    let p1 = poles.remove(worst(poles, Kind::Any)?);
    let real_poles = poles.iter().filter(|p| is_real(p)).count();
    let real_zeros = zeros.iter().filter(|z| is_real(z)).count();

    if is_real(&p1) && real_poles == 0 {
        // Lone real pole, first order section
        let zeros = match nearest(zeros, p1, Kind::Real) {
            Some(i) => vec![zeros.remove(i)],
            None => vec![],
        };
        return Some(Pairing {
            zeros,
            poles: vec![p1],
        });
    }

    if poles.len() + 1 == zeros.len() && !is_real(&p1) && real_poles == 1 && real_zeros == 1 {
        // Keep the last real zero for the last real pole
        if let Some(i) = nearest(zeros, p1, Kind::Complex) {
            return Some(Pairing {
                zeros: vec![zeros.remove(i)],
                poles: vec![p1],
            });
        }
    }

    let poles_pair = if is_real(&p1) {
        match worst(poles, Kind::Real) {
            Some(i) => vec![p1, poles.remove(i)],
            None => vec![p1],
        }
    } else {
        vec![p1]
    };

    let zeros_pair = match nearest(zeros, p1, Kind::Any) {
        None => vec![],
        Some(i) => {
            let z1 = zeros.remove(i);
            if !is_real(&z1) {
                vec![z1]
            } else {
                match nearest(zeros, p1, Kind::Real) {
                    Some(j) => vec![z1, zeros.remove(j)],
                    None => vec![z1],
                }
            }
        }
    };

    Some(Pairing {
        zeros: zeros_pair,
        poles: poles_pair,
    })
}

fn section(pairing: &Pairing) -> Biquad {
    let b = polynomial(&pairing.zeros);
    let a = match pairing.poles.as_slice() {
        // First order: `1 − p₁·z⁻¹`, with a literal zero for the unused tap
        [p1] if is_real(p1) => [1., -p1.re, 0.],
        poles => polynomial(poles),
    };

    Biquad {
        index: 0,
        b0: b[0],
        b1: b[1],
        b2: b[2],
        a1: a[1],
        a2: a[2],
    }
}

/// Numerator scale of every section for an overall `gain`
fn section_gains(gain: f64, count: usize) -> Vec<f64> {
    let mut gains = vec![1.; count];
    if count == 0 {
        return gains;
    }
    if count == 1 || gain == 0. || gain.abs().log10().abs() <= GAIN_DECADES {
        gains[0] = gain;
        return gains;
    }

    let share = gain.abs().powf(1. / count as f64);
    gains.iter_mut().for_each(|g| *g = share);
    if gain < 0. {
        gains[0] = -share;
    }
    gains
}

/// Converts a stable digital transfer function into an ordered cascade
pub fn zpk_to_sos(digital: &Zpk) -> Cascade {
    let count = (digital.poles.len() + 1) / 2;
    let mut zeros = representatives(&digital.zeros);
    let mut poles = representatives(&digital.poles);

    let mut sections = Vec::with_capacity(count);
    while let Some(pairing) = next_pairing(&mut zeros, &mut poles) {
        sections.push(section(&pairing));
    }
    // Built worst-first, the cascade runs the other way
    sections.reverse();

    if sections.is_empty() {
        sections.push(Biquad {
            b0: digital.gain,
            ..Default::default()
        });
    } else {
        let gains = section_gains(digital.gain, sections.len());
        for (s, gain) in sections.iter_mut().zip(gains) {
            s.b0 *= gain;
            s.b1 *= gain;
            s.b2 *= gain;
        }
    }

    for (i, s) in sections.iter_mut().enumerate() {
        s.index = i as u16 + 1;
    }

    let cascade = Cascade { sections };
    log::debug!("SOS filter: {:?}", cascade.sections);
    cascade
}

/// Fails with [`Error::DesignPrecision`] when a section's coefficients, as rounded to `f64`, are
/// not finite or put a pole on or outside the unit circle.
pub fn check_sections(cascade: &Cascade) -> Result<(), Error> {
    for s in &cascade.sections {
        let section = s.index as usize;
        if !s.to_array().iter().all(|c| c.is_finite()) {
            return Err(Error::DesignPrecision {
                section,
                reason: "a coefficient is not finite",
            });
        }
        // Stability triangle of `1 + a1·z⁻¹ + a2·z⁻²`
        if !(s.a2.abs() < 1. && s.a1.abs() < 1. + s.a2) {
            return Err(Error::DesignPrecision {
                section,
                reason: "the rounded coefficients put a pole on or outside the unit circle",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_polynomial() {
        assert_eq!(polynomial(&[]), [1., 0., 0.]);
        assert_eq!(polynomial(&[c(0.5, 0.)]), [1., -0.5, 0.]);
        assert_eq!(polynomial(&[c(-1., 0.), c(-1., 0.)]), [1., 2., 1.]);
        let p = polynomial(&[c(0.5, 0.5)]);
        assert_approx_eq!(p[1], -1.);
        assert_approx_eq!(p[2], 0.5);
    }

    #[test]
    fn test_pairing_order() {
        // Two conjugate pairs and a real pole, zeros at Nyquist
        let zpk = Zpk::new(
            vec![c(-1., 0.); 5],
            vec![
                c(0.3, 0.2),
                c(0.3, -0.2),
                c(0.5, 0.),
                c(0.6, 0.7),
                c(0.6, -0.7),
            ],
            2.,
        );
        let cascade = zpk_to_sos(&zpk);
        assert_eq!(cascade.sections.len(), 3);

        // Ascending pole magnitude, gain in front
        let mags: Vec<_> = cascade
            .sections
            .iter()
            .map(|s| s.max_pole_magnitude())
            .collect();
        assert!(mags.windows(2).all(|w| w[0] <= w[1]), "{:?}", mags);
        assert_approx_eq!(cascade.sections[0].a1, -0.6);
        assert_approx_eq!(cascade.sections[2].a1, -1.2);

        // The single real pole gets a first order section
        let first = &cascade.sections[1];
        assert_eq!(first.b2, 0.);
        assert_eq!(first.a2, 0.);
        assert_eq!((first.b0, first.b1), (1., 1.));
        assert_approx_eq!(first.a1, -0.5);

        assert_eq!(cascade.sections[0].b0, 2.);
        assert_eq!(
            cascade.sections.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_zero_pairing() {
        // Each pole pair takes the zero pair nearest to it
        let zpk = Zpk::new(
            vec![c(0., 1.), c(0., -1.), c(1., 0.), c(1., 0.)],
            vec![c(0.9, 0.05), c(0.9, -0.05), c(0.05, 0.9), c(0.05, -0.9)],
            1.,
        );
        let cascade = zpk_to_sos(&zpk);
        assert_eq!(cascade.sections.len(), 2);
        for s in &cascade.sections {
            if s.a1 < -1. {
                assert_eq!(s.to_array()[..3], [1., -2., 1.]);
            } else {
                assert_approx_eq!(s.b1, 0.);
                assert_approx_eq!(s.b2, 1.);
            }
        }
    }

    #[test]
    fn test_missing_zeros_add_no_delay() {
        // 1/(1 − 0.5·z⁻¹), the numerator must not turn into z⁻¹
        let cascade = zpk_to_sos(&Zpk::new(vec![], vec![c(0.5, 0.)], 1.));
        assert_eq!(cascade.sections[0].to_array(), [1., 0., 0., -0.5, 0.]);

        // 1/(1 − z⁻¹ + 0.5·z⁻²)
        let cascade = zpk_to_sos(&Zpk::new(vec![], vec![c(0.5, 0.5), c(0.5, -0.5)], 1.));
        assert_eq!(cascade.sections[0].to_array()[..3], [1., 0., 0.]);

        for w in [0.3, 1.1, 2.5] {
            let z_inv = Complex64::from_polar(1., -w);
            let expected = 1. / (1. - z_inv + z_inv * z_inv * 0.5);
            let actual = cascade.response_at(w);
            assert_approx_eq!(actual.re, expected.re, 1e-12);
            assert_approx_eq!(actual.im, expected.im, 1e-12);
        }

        // One real zero pads with a zero at the origin
        let cascade = zpk_to_sos(&Zpk::new(
            vec![c(0.2, 0.)],
            vec![c(0.5, 0.5), c(0.5, -0.5)],
            1.,
        ));
        assert_approx_eq!(cascade.sections[0].b0, 1.);
        assert_approx_eq!(cascade.sections[0].b1, -0.2);
        assert_eq!(cascade.sections[0].b2, 0.);
    }

    #[test]
    fn test_gain_split() {
        assert_eq!(section_gains(0.5, 3), vec![0.5, 1., 1.]);
        assert_eq!(section_gains(-1e-6, 2), vec![-1e-6, 1.]);
        assert_eq!(section_gains(1e-40, 1), vec![1e-40]);

        let gains = section_gains(-1e-40, 4);
        assert_approx_eq!(gains[0], -1e-10, 1e-20);
        for g in &gains[1..] {
            assert_approx_eq!(*g, 1e-10, 1e-20);
        }
        assert_approx_eq!(gains.iter().product::<f64>(), -1e-40, 1e-50);
    }

    #[test]
    fn test_check_sections() {
        let stable = Cascade {
            sections: vec![Biquad {
                a1: -1.,
                a2: 0.5,
                ..Default::default()
            }],
        };
        assert!(check_sections(&stable).is_ok());

        // A double pole at z = 1 left over by rounding
        for (a1, a2) in [(-2., 1.), (-1.5, -0.5), (f64::NAN, 0.)] {
            let cascade = Cascade {
                sections: vec![
                    Biquad::default(),
                    Biquad {
                        index: 2,
                        a1,
                        a2,
                        ..Default::default()
                    },
                ],
            };
            match check_sections(&cascade) {
                Err(Error::DesignPrecision { section, .. }) => assert_eq!(section, 2),
                other => panic!("expected a precision error, got {:?}", other),
            }
        }
    }
}
