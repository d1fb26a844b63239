//! Room Eq Wizard utilities
//! Reads and writes cascades in REW's exported biquad text format.
//!
//! REW writes the feedback coefficients with the opposite sign, `a1` and `a2` are negated on the
//! way in and out.

use std::str::FromStr;

use thiserror::Error;

use crate::biquad::{Biquad, Cascade};

pub trait FromRew: Sized {
    fn from_rew_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Option<Self>;
}

pub trait ToRew {
    fn to_rew(&self) -> String;
}

impl FromRew for Biquad {
    /// Reads a single filter from the given line iterator
    fn from_rew_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Option<Biquad> {
        let mut lines = lines.filter(|s| !s.trim().is_empty());

        // The first line contains the index
        let index = lines.next()?.trim().strip_prefix("biquad")?;
        let index = u16::from_str(index.trim_end_matches(',')).ok()?;

        let parse_component = |line: &str, prefix: &str| -> Option<f64> {
            let line = line.trim().strip_prefix(prefix)?;
            f64::from_str(line.trim_end_matches(',')).ok()
        };

        let b0 = parse_component(lines.next()?, "b0=")?;
        let b1 = parse_component(lines.next()?, "b1=")?;
        let b2 = parse_component(lines.next()?, "b2=")?;
        let a1 = parse_component(lines.next()?, "a1=")?;
        let a2 = parse_component(lines.next()?, "a2=")?;

        Some(Biquad {
            index,
            b0,
            b1,
            b2,
            a1: -a1,
            a2: -a2,
        })
    }
}

impl ToRew for Biquad {
    fn to_rew(&self) -> String {
        format!(
            "biquad{},\nb0={:?},\nb1={:?},\nb2={:?},\na1={:?},\na2={:?},\n",
            self.index, self.b0, self.b1, self.b2, -self.a1, -self.a2
        )
    }
}

impl ToRew for Cascade {
    fn to_rew(&self) -> String {
        self.sections
            .iter()
            .map(ToRew::to_rew)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RewParseError {
    #[error("The filter text data was not in the expected format")]
    MalformedFilter,
}

impl FromStr for Cascade {
    type Err = RewParseError;

    /// Parses every filter of an exported REW file
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sections = Vec::new();
        let mut it = s.lines();
        while let Some(filter) = Biquad::from_rew_lines(&mut it) {
            sections.push(filter);
        }

        if sections.is_empty() || it.any(|l| !l.trim().is_empty()) {
            return Err(RewParseError::MalformedFilter);
        }
        Ok(Cascade { sections })
    }
}
