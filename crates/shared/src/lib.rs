//! Wire-level types shared between the storytelling API client and the
//! presentation layer that drives it.

pub mod domain;
pub mod error;
pub mod protocol;
