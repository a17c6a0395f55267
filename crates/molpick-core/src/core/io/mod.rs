//! Reading candidate identifier lists and writing selected libraries.
//!
//! Persistence sits outside the selection algorithm: the engine consumes and returns
//! identifiers in memory, and these helpers move them to and from plain-text or CSV files.

pub mod identifiers;
