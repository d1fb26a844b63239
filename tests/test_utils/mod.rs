#![allow(dead_code)]

use iirgen::{Biquad, Cascade, FilterRequest, FilterSpec};

/// Compares a section against `[b0, b1, b2]` and `[a1, a2]` with a 1e-6 tolerance
#[allow(unused_macros)]
macro_rules! assert_section {
    ($section:expr, [$b0:expr, $b1:expr, $b2:expr], [$a1:expr, $a2:expr]) => {
        let s = &$section;
        assert_approx_eq::assert_approx_eq!(s.b0, $b0, 1e-6);
        assert_approx_eq::assert_approx_eq!(s.b1, $b1, 1e-6);
        assert_approx_eq::assert_approx_eq!(s.b2, $b2, 1e-6);
        assert_approx_eq::assert_approx_eq!(s.a1, $a1, 1e-6);
        assert_approx_eq::assert_approx_eq!(s.a2, $a2, 1e-6);
    };
}

pub const FILTER_TYPES: [&str; 4] = ["lowpass", "highpass", "bandpass", "bandstop"];

pub fn request(filter_type: &str, rate: f64, order: i64, freq: f64) -> FilterRequest {
    FilterRequest {
        filter_type: Some(filter_type.to_string()),
        rate: Some(rate),
        order: Some(order),
        freq: Some(freq),
        ..Default::default()
    }
}

pub fn spec(filter_type: &str, rate: f64, order: i64, freq: f64, width: Option<f64>) -> FilterSpec {
    FilterRequest {
        width,
        ..request(filter_type, rate, order, freq)
    }
    .validate()
    .unwrap()
}

pub fn design(filter_type: &str, rate: f64, order: i64, freq: f64, width: Option<f64>) -> Cascade {
    iirgen::design(&spec(filter_type, rate, order, freq, width)).unwrap()
}

/// A few representative designs, one or two per filter type
pub fn sample_specs() -> Vec<FilterSpec> {
    vec![
        spec("lowpass", 500., 4, 50., None),
        spec("lowpass", 10., 5, 1., None),
        spec("highpass", 500., 3, 50., None),
        spec("highpass", 44100., 6, 20., None),
        spec("bandpass", 500., 3, 100., Some(20.)),
        spec("bandstop", 500., 2, 100., Some(20.)),
        spec("bandstop", 48000., 5, 1000., Some(200.)),
    ]
}

/// Deterministic test signal: two tones, an impulse and some noise from a small LCG
pub fn test_signal(len: usize) -> Vec<f64> {
    let mut seed: u32 = 0x1234_5678;
    (0..len)
        .map(|i| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = seed as f64 / u32::MAX as f64 - 0.5;
            let t = i as f64;
            let impulse = if i == 10 { 1. } else { 0. };
            (t * 0.05).sin() + 0.5 * (t * 1.3).cos() + 0.2 * noise + impulse
        })
        .collect()
}

pub fn run(cascade: &Cascade, input: &[f64]) -> Vec<f64> {
    let mut filter = cascade.filter();
    input.iter().map(|x| filter.process(*x)).collect()
}

/// Output after feeding a constant unit input for `len` samples
pub fn steady_state(cascade: &Cascade, len: usize) -> f64 {
    let mut filter = cascade.filter();
    (0..len).map(|_| filter.process(1.)).last().unwrap_or(0.)
}

/// Extracts the coefficient literals of a generated `process` body, in source order.
///
/// Every coefficient appears as `<literal> * <state>`, so the token before each lone `*` is
/// taken. Per section this gives `a1, a2, b0, b1, b2`.
pub fn extract_coefficients(source: &str) -> Vec<f64> {
    let body = source
        .lines()
        .skip_while(|l| !l.contains("process"))
        .take_while(|l| !l.contains("reset"));

    let mut coefficients = Vec::new();
    for line in body {
        let tokens: Vec<_> = line.split_whitespace().collect();
        for pair in tokens.windows(2) {
            if pair[1] == "*" {
                let literal = pair[0].trim_start_matches('(');
                let value = literal
                    .parse::<f64>()
                    .unwrap_or_else(|_| panic!("not a literal: {:?} in {:?}", literal, line));
                coefficients.push(value);
            }
        }
    }
    coefficients
}

/// Rebuilds a cascade from coefficients extracted with [`extract_coefficients`]
pub fn cascade_from_coefficients(coefficients: &[f64]) -> Cascade {
    assert_eq!(coefficients.len() % 5, 0, "{:?}", coefficients);
    let sections = coefficients
        .chunks(5)
        .enumerate()
        .map(|(i, c)| Biquad {
            index: i as u16 + 1,
            a1: c[0],
            a2: c[1],
            b0: c[2],
            b1: c[3],
            b2: c[4],
        })
        .collect();
    Cascade { sections }
}
