//! Filter specifications and their validation
//!
//! A [`FilterRequest`] carries raw, possibly incomplete parameters as they arrive from the
//! command line or a request file. [`FilterRequest::validate`] either produces an immutable
//! [`FilterSpec`] or fails on the first offending field, without computing anything.

use std::str::FromStr;

use inflector::Inflector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{emit::Language, Error};

/// Highest supported prototype order
pub const MAX_ORDER: i64 = 32;

/// Band shape of the filter
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Lowpass,
    Highpass,
    Bandpass,
    Bandstop,
}

impl FilterType {
    /// Human readable form used in generated headers
    pub fn printable(&self) -> &'static str {
        match self {
            FilterType::Lowpass => "Low-Pass",
            FilterType::Highpass => "High-Pass",
            FilterType::Bandpass => "Band-Pass",
            FilterType::Bandstop => "Band-Stop",
        }
    }

    pub fn default_class_name(&self) -> &'static str {
        match self {
            FilterType::Lowpass => "LowpassFilter",
            FilterType::Highpass => "HighpassFilter",
            FilterType::Bandpass => "BandpassFilter",
            FilterType::Bandstop => "BandstopFilter",
        }
    }

    /// Whether the filter is described by a center frequency and a bandwidth
    pub fn is_band(&self) -> bool {
        matches!(self, FilterType::Bandpass | FilterType::Bandstop)
    }
}

/// Critical frequencies of a filter, in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Cutoff(f64),
    Band { center: f64, width: f64 },
}

impl Band {
    /// Lower and upper band edges, only meaningful for `Band::Band`
    pub fn edges(&self) -> (f64, f64) {
        match *self {
            Band::Cutoff(f) => (f, f),
            Band::Band { center, width } => (center - 0.5 * width, center + 0.5 * width),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field `{field}` is required")]
    MissingField { field: &'static str },

    #[error("`type` must be one of lowpass, highpass, bandpass, bandstop (got `{value}`)")]
    UnknownFilterType { value: String },

    #[error("`order` must be between 1 and 32 (got {value})")]
    InvalidOrder { value: i64 },

    #[error("`rate` must be a positive sampling rate in Hz (got {value})")]
    InvalidSamplingRate { value: f64 },

    #[error("`{field}` must lie strictly between 0 and the Nyquist frequency {nyquist} Hz (got {value})")]
    FrequencyOutOfRange {
        field: &'static str,
        value: f64,
        nyquist: f64,
    },

    #[error("`width` must be a positive bandwidth in Hz (got {value})")]
    InvalidBandwidth { value: f64 },

    #[error("the {edge} band edge {value} Hz must lie strictly between 0 and the Nyquist frequency {nyquist} Hz")]
    BandEdgeOutOfRange {
        edge: &'static str,
        value: f64,
        nyquist: f64,
    },

    #[error("`name` is not a usable class name ({reason}): `{value}`")]
    InvalidName { value: String, reason: &'static str },
}

impl ValidationError {
    /// Name of the request field that was rejected
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::UnknownFilterType { .. } => "type",
            ValidationError::InvalidOrder { .. } => "order",
            ValidationError::InvalidSamplingRate { .. } => "rate",
            ValidationError::FrequencyOutOfRange { field, .. } => field,
            ValidationError::InvalidBandwidth { .. } => "width",
            ValidationError::BandEdgeOutOfRange { .. } => "width",
            ValidationError::InvalidName { .. } => "name",
        }
    }
}

/// Raw generation parameters, every field optional until validation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    /// Filter type: lowpass, highpass, bandpass, bandstop (default lowpass)
    #[serde(rename = "type")]
    pub filter_type: Option<String>,

    /// Sampling frequency in Hz (default 10)
    pub rate: Option<f64>,

    /// Filter order (default 4)
    pub order: Option<i64>,

    /// Cutoff frequency, or center frequency of the band (default 1.0 Hz)
    pub freq: Option<f64>,

    /// Width of the band, required for bandpass and bandstop
    pub width: Option<f64>,

    /// Name of the generated class
    pub name: Option<String>,

    /// Target language token (default python)
    pub language: Option<String>,
}

impl FilterRequest {
    /// Overlays every field set in `other` on top of `self`
    pub fn merge(self, other: FilterRequest) -> FilterRequest {
        FilterRequest {
            filter_type: other.filter_type.or(self.filter_type),
            rate: other.rate.or(self.rate),
            order: other.order.or(self.order),
            freq: other.freq.or(self.freq),
            width: other.width.or(self.width),
            name: other.name.or(self.name),
            language: other.language.or(self.language),
        }
    }

    /// Checks every field and builds the immutable spec
    pub fn validate(&self) -> Result<FilterSpec, Error> {
        let filter_type = match &self.filter_type {
            Some(value) => FilterType::from_str(value.trim()).map_err(|_| {
                ValidationError::UnknownFilterType {
                    value: value.clone(),
                }
            })?,
            None => FilterType::Lowpass,
        };

        let order = self.order.unwrap_or(4);
        if !(1..=MAX_ORDER).contains(&order) {
            return Err(ValidationError::InvalidOrder { value: order }.into());
        }

        let sampling_rate = self.rate.unwrap_or(10.);
        if !(sampling_rate.is_finite() && sampling_rate > 0.) {
            return Err(ValidationError::InvalidSamplingRate {
                value: sampling_rate,
            }
            .into());
        }
        let nyquist = sampling_rate / 2.;

        let freq = self.freq.unwrap_or(1.0);
        check_frequency("freq", freq, nyquist)?;

        let band = if filter_type.is_band() {
            let width = self
                .width
                .ok_or(ValidationError::MissingField { field: "width" })?;
            if !(width.is_finite() && width > 0.) {
                return Err(ValidationError::InvalidBandwidth { value: width }.into());
            }
            let band = Band::Band {
                center: freq,
                width,
            };
            let (lower, upper) = band.edges();
            for (edge, value) in [("lower", lower), ("upper", upper)] {
                if !(value > 0. && value < nyquist) {
                    return Err(ValidationError::BandEdgeOutOfRange {
                        edge,
                        value,
                        nyquist,
                    }
                    .into());
                }
            }
            band
        } else {
            Band::Cutoff(freq)
        };

        let language = match &self.language {
            Some(token) => Language::from_str(token.trim())
                .map_err(|_| Error::UnsupportedLanguage(token.clone()))?,
            None => Language::Python,
        };

        let class_name = match &self.name {
            Some(name) => name.trim().to_string(),
            None => filter_type.default_class_name().to_string(),
        };
        check_identifier(&class_name)?;

        Ok(FilterSpec {
            filter_type,
            sampling_rate,
            order: order as usize,
            band,
            class_name,
            language,
        })
    }
}

fn check_frequency(field: &'static str, value: f64, nyquist: f64) -> Result<(), ValidationError> {
    // Negated comparison so that NaN is rejected as well
    if !(value > 0. && value < nyquist) {
        return Err(ValidationError::FrequencyOutOfRange {
            field,
            value,
            nyquist,
        });
    }
    Ok(())
}

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

const RUST_KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

const C_KEYWORDS: &[&str] = &[
    "_Bool", "_Complex", "_Imaginary", "auto", "break", "case", "char", "const", "continue",
    "default", "do", "double", "else", "enum", "extern", "float", "for", "goto", "if", "inline",
    "int", "long", "register", "restrict", "return", "short", "signed", "sizeof", "static",
    "struct", "switch", "typedef", "union", "unsigned", "void", "volatile", "while",
];

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "bitand", "bitor", "bool", "catch", "char16_t",
    "char32_t", "class", "compl", "const_cast", "constexpr", "decltype", "delete",
    "dynamic_cast", "explicit", "export", "false", "friend", "mutable", "namespace", "new",
    "noexcept", "not", "not_eq", "nullptr", "operator", "or", "or_eq", "private", "protected",
    "public", "reinterpret_cast", "static_assert", "static_cast", "template", "this",
    "thread_local", "throw", "true", "try", "typeid", "typename", "using", "virtual", "wchar_t",
    "xor", "xor_eq",
];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "record", "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "true", "try", "var", "void", "volatile", "while", "yield",
];

const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "any", "await", "boolean", "break", "case", "catch", "class", "const", "continue",
    "debugger", "declare", "default", "delete", "do", "else", "enum", "export", "extends",
    "false", "finally", "for", "function", "if", "implements", "import", "in", "instanceof",
    "interface", "let", "never", "new", "null", "number", "object", "package", "private",
    "protected", "public", "return", "static", "string", "super", "switch", "symbol", "this",
    "throw", "true", "try", "typeof", "undefined", "unknown", "var", "void", "while", "with",
    "yield",
];

/// Words reserved in at least one of the target languages. A class name is shared by every
/// target, so it has to be usable in all of them.
const RESERVED: &[&[&str]] = &[
    PYTHON_KEYWORDS,
    RUST_KEYWORDS,
    C_KEYWORDS,
    CPP_KEYWORDS,
    JAVA_KEYWORDS,
    JAVASCRIPT_KEYWORDS,
];

fn is_reserved(name: &str) -> bool {
    name == "_" || RESERVED.iter().any(|words| words.contains(&name))
}

fn check_identifier(name: &str) -> Result<(), ValidationError> {
    let invalid = |reason| ValidationError::InvalidName {
        value: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("it is empty")),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Err(invalid("it must start with a letter or an underscore"))
        }
        _ => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only ASCII letters, digits and underscores are allowed"));
    }
    if is_reserved(name) {
        return Err(invalid("it is a reserved word"));
    }

    // The C target prefixes its type and functions with the snake_cased name
    let prefix = name.to_snake_case();
    if !prefix.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err(invalid("its snake_case form is not an identifier"));
    }
    Ok(())
}

/// A validated, immutable filter specification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    filter_type: FilterType,
    sampling_rate: f64,
    order: usize,
    band: Band,
    class_name: String,
    language: Language,
}

impl FilterSpec {
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Sampling rate in Hz
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn nyquist(&self) -> f64 {
        self.sampling_rate / 2.
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Number of second-order sections the design produces
    pub fn section_count(&self) -> usize {
        if self.filter_type.is_band() {
            self.order
        } else {
            (self.order + 1) / 2
        }
    }

    /// Returns a copy targeting another language, the design itself is unchanged
    pub fn with_language(&self, language: Language) -> FilterSpec {
        FilterSpec {
            language,
            ..self.clone()
        }
    }
}
