//! This crate designs digital Butterworth IIR filters and generates self-contained streaming
//! implementations of them as source code.
//!
//! A design goes through a fixed pipeline: a [`FilterRequest`] is validated into a
//! [`FilterSpec`], the analog prototype is transformed to the requested band, mapped to the
//! z-plane with the bilinear transform and packed into a [`Cascade`] of second-order sections,
//! which is finally rendered in the target language.
//!
//! ```no_run
//! use iirgen::{FilterRequest, Result};
//!
//! fn main() -> Result<()> {
//!     let spec = FilterRequest {
//!         filter_type: Some("lowpass".into()),
//!         rate: Some(500.),
//!         order: Some(4),
//!         freq: Some(50.),
//!         language: Some("rust".into()),
//!         ..Default::default()
//!     }
//!     .validate()?;
//!
//!     // Evaluate the filter directly
//!     let mut filter = iirgen::design(&spec)?.filter();
//!     let _smoothed: Vec<f64> = (0..100).map(|i| filter.process(i as f64)).collect();
//!
//!     // Or generate its source code
//!     let artifact = iirgen::generate(&spec)?;
//!     println!("{}", artifact.source);
//!     Ok(())
//! }
//! ```

pub mod bilinear;
pub mod biquad;
pub mod config;
pub mod emit;
pub mod error;
pub mod formats;
pub mod output;
pub mod prototype;
pub mod response;
pub mod sos;
pub mod spec;
pub mod transform;
pub mod zpk;

pub use biquad::{Biquad, Cascade, CascadeFilter};
pub use emit::{GeneratedArtifact, Language};
pub use error::{Error, Stage};
pub use response::FrequencyResponse;
pub use spec::{Band, FilterRequest, FilterSpec, FilterType, ValidationError};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Designs the cascade of second-order sections implementing `spec`
pub fn design(spec: &FilterSpec) -> Result<Cascade> {
    let proto = prototype::butterworth(spec.order());
    let analog = transform::analog_design(spec, &proto);
    let digital = bilinear::bilinear(&analog, spec.sampling_rate());
    log::debug!(
        "digital poles: {:?}, zeros: {:?}, gain: {}",
        digital.poles,
        digital.zeros,
        digital.gain
    );
    bilinear::check_stability(&digital)?;
    bilinear::check_gain(&digital)?;

    let cascade = sos::zpk_to_sos(&digital);
    sos::check_sections(&cascade)?;
    log::info!(
        "designed order {} {} filter as {} sections (max pole magnitude {:.6})",
        spec.order(),
        spec.filter_type(),
        cascade.len(),
        digital.max_pole_magnitude()
    );
    Ok(cascade)
}

/// Designs `spec` and renders it in its target language
pub fn generate(spec: &FilterSpec) -> Result<GeneratedArtifact> {
    let cascade = design(spec)?;
    Ok(emit::emit(spec, &cascade))
}
