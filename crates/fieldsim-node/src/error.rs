//! Node error types.
//!
//! Uses `thiserror` for structured, matchable variants. Misses (a key absent
//! both locally and in the environment) are not errors -- they surface as
//! `None`. The variants here are contract violations: programming errors in
//! the caller that fail loudly and are never silently defaulted.

use fieldsim_core::ProgramId;
use thiserror::Error;

/// Errors produced by node operations.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Looked up the network manager of a program instance that was never
    /// registered. The aggregate VM must register before first use.
    #[error("no network manager registered for program {program}")]
    ManagerNotRegistered { program: ProgramId },
}
