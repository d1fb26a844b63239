//! Analog frequency transforms of the normalized lowpass prototype
//!
//! Each transform takes a lowpass prototype with a cutoff of 1 rad/s and returns the analog
//! transfer function of the requested band, with the gain adjusted analytically so that the
//! reference gain of the prototype is preserved.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::{
    spec::{Band, FilterSpec, FilterType},
    zpk::{product, Zpk},
};

/// Maps a digital frequency (Hz) to the analog angular frequency (rad/s) that the bilinear
/// transform at `sampling_rate` sends back onto it.
pub fn prewarp(freq: f64, sampling_rate: f64) -> f64 {
    2. * sampling_rate * (PI * freq / sampling_rate).tan()
}

/// Scales the cutoff to `wo`: `s → s/wo`
pub fn lowpass_to_lowpass(proto: &Zpk, wo: f64) -> Zpk {
    let degree = proto.degree();
    Zpk::new(
        proto.zeros.iter().map(|z| *z * wo).collect(),
        proto.poles.iter().map(|p| *p * wo).collect(),
        proto.gain * wo.powi(degree as i32),
    )
}

/// Mirrors the response around the cutoff: `s → wo/s`.
/// Zeros at infinity move to the origin.
pub fn lowpass_to_highpass(proto: &Zpk, wo: f64) -> Zpk {
    let degree = proto.degree();
    let gain = proto.gain * gain_ratio(proto);

    let zeros = proto
        .zeros
        .iter()
        .map(|z| wo / *z)
        .chain(std::iter::repeat(Complex64::new(0., 0.)).take(degree))
        .collect();
    let poles = proto.poles.iter().map(|p| wo / *p).collect();

    Zpk::new(zeros, poles, gain)
}

/// Centers the passband on `wo` with width `bw`: `s → (s² + wo²)/(bw·s)`.
/// Every root splits in two, zeros at infinity get a counterpart at the origin.
pub fn lowpass_to_bandpass(proto: &Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = proto.degree();
    let scale = |r: &Complex64| *r * (bw / 2.);

    let zeros = split_roots(proto.zeros.iter().map(scale), wo)
        .chain(std::iter::repeat(Complex64::new(0., 0.)).take(degree))
        .collect();
    let poles = split_roots(proto.poles.iter().map(scale), wo).collect();

    Zpk::new(zeros, poles, proto.gain * bw.powi(degree as i32))
}

/// Centers the stopband on `wo` with width `bw`: `s → (bw·s)/(s² + wo²)`.
/// Every root splits in two, zeros at infinity become a notch pair at `±j·wo`.
pub fn lowpass_to_bandstop(proto: &Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = proto.degree();
    let gain = proto.gain * gain_ratio(proto);
    let invert = |r: &Complex64| (bw / 2.) / *r;

    let notch = Complex64::new(0., wo);
    let zeros = split_roots(proto.zeros.iter().map(invert), wo)
        .chain(std::iter::repeat(notch).take(degree))
        .chain(std::iter::repeat(notch.conj()).take(degree))
        .collect();
    let poles = split_roots(proto.poles.iter().map(invert), wo).collect();

    Zpk::new(zeros, poles, gain)
}

/// `Re(Π(−z)/Π(−p))`, the factor keeping the gain unchanged when roots are inverted
fn gain_ratio(zpk: &Zpk) -> f64 {
    let num = product(zpk.zeros.iter().map(|z| -*z));
    let den = product(zpk.poles.iter().map(|p| -*p));
    (num / den).re
}

/// Solves `s² − 2r·s + wo² = 0` for every scaled root `r`, all `+` solutions then all `−` solutions
fn split_roots(
    roots: impl Iterator<Item = Complex64> + Clone,
    wo: f64,
) -> impl Iterator<Item = Complex64> {
    let wo2 = wo * wo;
    let upper = roots.clone().map(move |r| r + (r * r - wo2).sqrt());
    let lower = roots.map(move |r| r - (r * r - wo2).sqrt());
    upper.chain(lower)
}

/// Builds the analog transfer function for a validated spec, pre-warping its critical
/// frequencies for a bilinear transform at its sampling rate.
pub fn analog_design(spec: &FilterSpec, proto: &Zpk) -> Zpk {
    let fs = spec.sampling_rate();

    let analog = match (spec.filter_type(), spec.band()) {
        (FilterType::Lowpass, Band::Cutoff(f)) => lowpass_to_lowpass(proto, prewarp(f, fs)),
        (FilterType::Highpass, Band::Cutoff(f)) => lowpass_to_highpass(proto, prewarp(f, fs)),
        (filter_type, band) => {
            let (lower, upper) = band.edges();
            let (w1, w2) = (prewarp(lower, fs), prewarp(upper, fs));
            let wo = (w1 * w2).sqrt();
            let bw = w2 - w1;
            if filter_type == FilterType::Bandstop {
                lowpass_to_bandstop(proto, wo, bw)
            } else {
                lowpass_to_bandpass(proto, wo, bw)
            }
        }
    };

    log::debug!(
        "analog {} design: zeros={:?} poles={:?} gain={}",
        spec.filter_type(),
        analog.zeros,
        analog.poles,
        analog.gain
    );
    analog
}
