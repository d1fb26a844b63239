//! Coefficient exchange formats

pub mod rew;
