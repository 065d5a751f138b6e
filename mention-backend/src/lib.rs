//! Fetches, filters and ranks the mentions a reply bot should answer next.

pub mod config;
pub mod db;
pub mod error;
pub mod mentions;
pub mod models;
pub mod twitter;

pub use error::{MentionsError, Result};
