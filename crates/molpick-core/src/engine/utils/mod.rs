//! Helper routines used by the selection engine.

pub mod sampling;
