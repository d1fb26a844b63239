//! Request files
//!
//! A request file is a TOML document holding the same keys as the command line:
//!
//! ```toml
//! type = "bandpass"
//! rate = 500.0
//! order = 3
//! freq = 100.0
//! width = 20.0
//! name = "MyFilter"
//! language = "rust"
//! out = "filters/my_filter"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{spec::FilterRequest, Error};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub request: FilterRequest,

    /// Base name of the generated source file
    pub out: Option<PathBuf>,

    /// Destination of the frequency response data
    pub plot: Option<PathBuf>,

    /// Number of frequencies in the response data
    pub plot_points: Option<usize>,

    /// Destination of the REW coefficient export
    pub rew: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config = Self::from_toml(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::debug!("loaded request file {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
