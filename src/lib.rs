//! Core library for prsweep: bulk readiness evaluation and conditional
//! merging of pull requests across a GitHub organization.
//!
//! The [`sweep::Sweeper`] walks an organization's repositories one at a
//! time, reduces every candidate pull request to a single outcome, and
//! produces the [`report::RunReport`] tree that both the human and JSON
//! renderers consume. The live API sits behind the
//! [`github::GitHubClient`] trait so the whole engine runs against an
//! in-memory double in tests.

pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod report;
pub mod sweep;

pub use error::{Error, Result};
