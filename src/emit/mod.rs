//! Source code generation for the streaming filter
//!
//! A cascade is rendered through one [`Formatter`] per target language. Every formatter
//! implements the same runtime contract: a constructor zeroing the state, `process` running one
//! sample through every section in cascade order and `reset` zeroing the state again.
//!
//! For each section `i`, `process` computes
//!
//! ```text
//! x = output - a1·z1ᵢ - a2·z2ᵢ
//! output = b0·x + b1·z1ᵢ + b2·z2ᵢ
//! z2ᵢ = z1ᵢ
//! z1ᵢ = x
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
    biquad::{Biquad, Cascade},
    spec::{Band, FilterSpec},
};

mod c;
mod cpp;
mod java;
mod javascript;
mod python;
mod rust;
mod typescript;

/// Supported target languages
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    #[strum(to_string = "c++", serialize = "cpp")]
    #[serde(rename = "c++", alias = "cpp")]
    Cpp,
    C,
    #[strum(to_string = "javascript", serialize = "js")]
    #[serde(alias = "js")]
    Javascript,
    #[strum(to_string = "typescript", serialize = "ts")]
    #[serde(alias = "ts")]
    Typescript,
    Java,
    Rust,
}

impl Language {
    /// Conventional file extension, including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => ".py",
            Language::Cpp => ".cpp",
            Language::C => ".c",
            Language::Javascript => ".js",
            Language::Typescript => ".ts",
            Language::Java => ".java",
            Language::Rust => ".rs",
        }
    }

    pub fn formatter(&self) -> &'static dyn Formatter {
        match self {
            Language::Python => &python::Python,
            Language::Cpp => &cpp::Cpp,
            Language::C => &c::C,
            Language::Javascript => &javascript::Javascript,
            Language::Typescript => &typescript::Typescript,
            Language::Java => &java::Java,
            Language::Rust => &rust::Rust,
        }
    }

    /// Comma separated list of the accepted tokens, for help texts
    pub fn variants() -> String {
        Language::iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Renders a filter unit in one target language
pub trait Formatter {
    /// Line comment marker
    fn comment(&self) -> &'static str;

    /// Writes the class, struct or functions implementing the runtime contract
    fn render(&self, unit: &Unit, w: &mut CodeWriter);

    /// Example usage appended as comments at the end of the file
    fn usage(&self, _unit: &Unit) -> Vec<String> {
        Vec::new()
    }
}

/// Everything a formatter needs to know about the filter
pub struct Unit<'a> {
    pub class_name: &'a str,
    pub sections: &'a [Biquad],
}

impl<'a> Unit<'a> {
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Sections paired with their 0-based position and coefficient literals
    pub fn literals(&self) -> impl Iterator<Item = (usize, Literals)> + 'a {
        let sections: &'a [Biquad] = self.sections;
        sections
            .iter()
            .enumerate()
            .map(|(i, s)| (i, Literals::new(s)))
    }
}

/// Coefficients of one section rendered as source literals
#[derive(Debug, Clone, PartialEq)]
pub struct Literals {
    pub b0: String,
    pub b1: String,
    pub b2: String,
    pub a1: String,
    pub a2: String,
}

impl Literals {
    pub fn new(section: &Biquad) -> Self {
        Literals {
            b0: literal(section.b0),
            b1: literal(section.b1),
            b2: literal(section.b2),
            a1: literal(section.a1),
            a2: literal(section.a2),
        }
    }
}

/// Shortest decimal that reads back as exactly the same `f64`.
///
/// Always contains a `.` or an exponent, so it is a floating point literal in every target.
pub fn literal(value: f64) -> String {
    format!("{:?}", value)
}

/// Indentation aware line buffer
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

const INDENT: &str = "    ";

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    pub fn comment(&mut self, marker: &str, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if text.is_empty() {
            self.line(marker)
        } else {
            self.line(format!("{} {}", marker, text))
        }
    }

    /// Runs `body` one level deeper
    pub fn indented(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self
    }

    /// `open`, the indented `body`, then `close`
    pub fn block(
        &mut self,
        open: impl AsRef<str>,
        close: &str,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.line(open);
        self.indented(body);
        self.line(close)
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Descriptive header lines, without comment markers
pub fn header(spec: &FilterSpec, cascade: &Cascade) -> Vec<String> {
    let frequency = match spec.band() {
        Band::Cutoff(f) => format!("cutoff frequency: {:?} Hz", f),
        band @ Band::Band { center, width } => {
            let (lower, upper) = band.edges();
            format!(
                "center frequency: {:?} Hz, bandwidth: {:?} Hz ({:?} to {:?} Hz)",
                center, width, lower, upper
            )
        }
    };

    vec![
        format!(
            "{} Butterworth IIR digital filter",
            spec.filter_type().printable()
        ),
        format!(
            "Sampling rate: {:?} Hz, {}",
            spec.sampling_rate(),
            frequency
        ),
        format!(
            "Filter is order {}, implemented as {} second-order sections (biquads)",
            spec.order(),
            cascade.len()
        ),
        "Generated by iirgen".to_string(),
    ]
}

/// Generated source text with the metadata needed to store it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedArtifact {
    pub language: Language,
    pub class_name: String,
    /// File name used when no destination is given
    pub file_name_hint: String,
    #[serde(skip)]
    pub source: String,
}

impl GeneratedArtifact {
    /// Resolves the destination of the artifact.
    ///
    /// `out` is a base name, the language extension is appended unless already present.
    pub fn destination(&self, out: Option<&Path>) -> PathBuf {
        match out {
            None => PathBuf::from(&self.file_name_hint),
            Some(out) => with_extension(out, self.language.extension()),
        }
    }
}

pub(crate) fn with_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    if !path.to_string_lossy().ends_with(extension) {
        name.push(extension);
    }
    PathBuf::from(name)
}

/// Renders the cascade designed from `spec` in its target language
pub fn emit(spec: &FilterSpec, cascade: &Cascade) -> GeneratedArtifact {
    let language = spec.language();
    let formatter = language.formatter();
    let unit = Unit {
        class_name: spec.class_name(),
        sections: &cascade.sections,
    };

    let mut w = CodeWriter::new();
    for line in header(spec, cascade) {
        w.comment(formatter.comment(), line);
    }
    w.blank();
    formatter.render(&unit, &mut w);

    let usage = formatter.usage(&unit);
    if !usage.is_empty() {
        w.blank();
        for line in usage {
            w.comment(formatter.comment(), line);
        }
    }

    let base = match language {
        Language::Java => spec.class_name().to_string(),
        _ => spec.filter_type().to_string(),
    };

    log::info!(
        "rendered {} sections as {} class `{}`",
        cascade.len(),
        language,
        spec.class_name()
    );

    GeneratedArtifact {
        language,
        class_name: spec.class_name().to_string(),
        file_name_hint: format!("{}{}", base, language.extension()),
        source: w.finish(),
    }
}
