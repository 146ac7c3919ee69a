//! Data models for placematch.

mod link;
mod place;
mod publisher;
mod result;

pub use link::{RawLink, SourceLink};
pub use place::PlaceRecord;
pub use publisher::Publisher;
pub use result::{Assignment, Candidate, MatchResult};
