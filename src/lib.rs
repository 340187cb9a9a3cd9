//! Epic postcard generator
//!
//! Turns a name, a profession and a photo into a generated "epic" portrait and a
//! short motivational description, through interchangeable generation
//! providers with retries and an offline demo mode.

pub mod ai;
pub mod error;
pub mod generation;
pub mod models;
pub mod photo;
pub mod professions;
pub mod prompts;

pub use error::{Error, Result};
