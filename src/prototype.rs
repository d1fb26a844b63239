//! Normalized Butterworth analog prototype

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::zpk::Zpk;

/// Returns the all-pole Butterworth prototype of the given order, normalized to a cutoff of
/// 1 rad/s with unity gain at DC.
///
/// Pole `k` sits on the unit circle at angle `π·(2k + order + 1)/(2·order)`. Only the upper half
/// is computed, the lower half is mirrored so that conjugates are exact, and the middle pole of an
/// odd order is exactly `-1`.
pub fn butterworth(order: usize) -> Zpk {
    let mut poles = vec![Complex64::new(0., 0.); order];
    let n = order as f64;

    for k in 0..(order + 1) / 2 {
        if 2 * k + 1 == order {
            poles[k] = Complex64::new(-1., 0.);
        } else {
            let theta = PI * (2. * k as f64 + n + 1.) / (2. * n);
            poles[k] = Complex64::from_polar(1., theta);
            poles[order - 1 - k] = poles[k].conj();
        }
    }

    log::debug!("butterworth prototype (order {}): {:?}", order, poles);
    Zpk::new(Vec::new(), poles, 1.)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_prototype_poles() {
        for order in 1..=12 {
            let proto = butterworth(order);
            assert_eq!(proto.poles.len(), order);
            assert!(proto.zeros.is_empty());
            assert_eq!(proto.gain, 1.);

            for (i, p) in proto.poles.iter().enumerate() {
                assert_approx_eq!(p.norm(), 1., 1e-12);
                assert!(p.re < 0., "pole {} of order {} is not stable: {}", i, order, p);
                assert_eq!(*p, proto.poles[order - 1 - i].conj());
            }
        }
    }

    #[test]
    fn test_second_order() {
        let proto = butterworth(2);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert_approx_eq!(proto.poles[0].re, -s);
        assert_approx_eq!(proto.poles[0].im, s);
        assert_approx_eq!(proto.poles[1].im, -s);
    }

    #[test]
    fn test_odd_order_real_pole() {
        let proto = butterworth(3);
        assert_eq!(proto.poles[1], Complex64::new(-1., 0.));
        assert_approx_eq!(proto.poles[0].re, -0.5);
    }
}
