//! Lesson matching: pairs students with instrument teachers across calendar
//! slots under capacity, availability and instrument-mixing constraints.
//!
//! Data flows one way: [`availability`] normalizes raw per-date fields into
//! slots, [`split`] optionally cuts slots into fixed-length pieces, and
//! [`solver`] assigns lessons. [`ingest`] and [`report`] sit at the edges.

pub mod availability;
pub mod config;
pub mod data;
pub mod error;
pub mod ingest;
pub mod report;
pub mod server;
pub mod solver;
pub mod split;

pub use config::{IdentityPolicy, MatchConfig};
pub use data::{Instrument, MatchResult, Person, Slot};
pub use error::{Error, Result};
pub use solver::solve;
