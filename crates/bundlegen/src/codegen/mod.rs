//! Class generation and the merge engine.
//!
//! New and existing files go through the same path: a [`ClassSkeleton`] is
//! built (empty, or reconstructed from disk), the generated methods are
//! merged into it with [`merge_methods`], and the result is rendered whole.

pub mod controller;
pub mod merge;
pub mod model;
pub mod skeleton;

pub use merge::{merge_methods, MergeReport, MethodCandidate, RenamedMethod, SkippedMethod};
pub use skeleton::{ClassHead, ClassSkeleton};
