//! Input loading
//! Reads already-extracted resume and job description text

pub mod manager;
