//! Keyword extraction, resume signals, classification and scoring

pub mod classifier;
pub mod keywords;
pub mod scorer;
pub mod signals;
