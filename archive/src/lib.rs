//! Data layer of the past-exam archive.
//!
//! Holds the academic-organization hierarchy (faculty → department →
//! subject → professor) with exams attached to professors and questions
//! attached to exams, and everything needed to navigate it:
//!
//! - [`store::Store`] keeps the six collections in memory, seeded either
//!   from the embedded demo dataset or from a dataset file.
//! - [`filter`] resolves children of a parent at each level. Pure
//!   functions, safe to call repeatedly during cascade resets.
//! - [`cascade::Cascade`] is the selection state machine behind the
//!   four-level selector pages. Changing an ancestor clears everything
//!   below it; stale in-flight fetches are discarded.
//! - [`adapter::Backend`] is the seam between the demo dataset and the
//!   remote row store. Both implementations return the same ordering and
//!   filtering, so pages and tests do not care which one they run on.
//!
//! Reference tables are read-only here. They are written by the
//! `provision` tool, exams and questions by the submission endpoints.

pub mod adapter;
pub mod cascade;
pub mod credentials;
pub mod dataset;
pub mod filter;
pub mod models;
pub mod remote;
pub mod store;

pub use adapter::{Backend, BackendError, MockBackend};
pub use cascade::{Cascade, CascadeDriver, CascadeState};
pub use dataset::Dataset;
pub use models::{
    Department, EntityRef, Exam, Faculty, Level, NewExam, NewQuestion, Professor, Question,
    Subject,
};
pub use remote::RemoteBackend;
pub use store::Store;
