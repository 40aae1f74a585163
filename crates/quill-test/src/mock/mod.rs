//! Mock collaborators for testing.
//!
//! Scripted mocks answer from a fixed script and keep every request they
//! receive, so tests can assert on what the pipeline asked for.

mod arbiter;
mod document;
mod failing;
mod fixer;
mod planner;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use arbiter::ScriptedArbiter;
pub use document::StaticDocumentStore;
pub use failing::{FailingCollaborator, StalledCollaborator};
pub use fixer::ScriptedFixer;
pub use planner::ScriptedPlanner;

/// Locks a mock's state, ignoring poisoning from a panicked test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
