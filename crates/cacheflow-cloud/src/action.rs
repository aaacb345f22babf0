//! Action types for cache cluster reconciliation

use serde::{Deserialize, Serialize};

/// Mutating call a reconciliation tick performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
    /// No changes needed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// What a reconciliation tick decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Creation was requested
    Created,
    /// Modification was requested
    Updated,
    /// Out of date, but the remote cluster is mid-transition
    Waiting,
    /// Deletion was requested
    Deleted,
    /// Deletion requested and nothing exists remotely
    Gone,
    /// Observed state already matches the desired state
    Unchanged,
}

impl ReconcileOutcome {
    pub fn action_type(&self) -> ActionType {
        match self {
            ReconcileOutcome::Created => ActionType::Create,
            ReconcileOutcome::Updated => ActionType::Update,
            ReconcileOutcome::Deleted => ActionType::Delete,
            ReconcileOutcome::Waiting | ReconcileOutcome::Gone | ReconcileOutcome::Unchanged => {
                ActionType::NoOp
            }
        }
    }

    /// Whether the remote resource has converged for now
    pub fn is_settled(&self) -> bool {
        matches!(self, ReconcileOutcome::Unchanged | ReconcileOutcome::Gone)
    }
}

impl std::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileOutcome::Created => write!(f, "created"),
            ReconcileOutcome::Updated => write!(f, "updated"),
            ReconcileOutcome::Waiting => write!(f, "waiting"),
            ReconcileOutcome::Deleted => write!(f, "deleted"),
            ReconcileOutcome::Gone => write!(f, "gone"),
            ReconcileOutcome::Unchanged => write!(f, "unchanged"),
        }
    }
}
