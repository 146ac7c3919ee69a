//! placematch - link scraped municipal-code URLs to canonical U.S. places.
//!
//! The library holds the matching engine and the pipeline around it; the
//! `placematch` binary wraps it in a CLI.

pub mod config;
pub mod input;
pub mod links;
pub mod matcher;
pub mod models;
pub mod repository;
pub mod wide;
