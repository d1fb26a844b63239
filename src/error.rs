//! Error taxonomy for the generation pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::spec::ValidationError;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Config,
    Validation,
    Design,
    Emission,
    Output,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid filter specification: {0}")]
    Validation(#[from] ValidationError),

    #[error("the design is unstable: pole {pole_index} has magnitude {magnitude} (must be < 1)")]
    DesignInstability { pole_index: usize, magnitude: f64 },

    #[error("the design cannot be represented in double precision: {reason} (section {section})")]
    DesignPrecision { section: usize, reason: &'static str },

    #[error("unsupported target language `{0}`, expected one of: python, c++, c, javascript, typescript, java, rust")]
    UnsupportedLanguage(String),

    #[error("couldn't write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't load configuration from {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub fn stage(&self) -> Stage {
        match self {
            Error::Validation(_) => Stage::Validation,
            Error::DesignInstability { .. } | Error::DesignPrecision { .. } => Stage::Design,
            Error::UnsupportedLanguage(_) => Stage::Emission,
            Error::Io { .. } => Stage::Output,
            Error::Config { .. } => Stage::Config,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Validation.to_string(), "validation");
        assert_eq!(
            Error::UnsupportedLanguage("cobol".into()).stage(),
            Stage::Emission
        );
        let err = Error::DesignInstability {
            pole_index: 3,
            magnitude: 1.0,
        };
        assert_eq!(err.stage(), Stage::Design);
        assert!(err.to_string().contains("pole 3"));

        let err = Error::DesignPrecision {
            section: 1,
            reason: "the overall gain underflows",
        };
        assert_eq!(err.stage(), Stage::Design);
        assert!(err.to_string().contains("(section 1)"));
    }
}
