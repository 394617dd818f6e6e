//! Assignment resolution and intake.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::audit::AuditTrail;
use crate::core::model::{Assignment, AssignmentPatch};
use crate::core::store::{Entity, EntityStore, Filter, Stores};
use crate::core::{ResolutionError, StoreError};
use crate::util::clock::now;
use crate::util::{AssignmentId, Principal, PrincipalId};

/// What a resolve call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// This call performed the Pending -> Resolved transition.
    Resolved,
    /// The assignment was already resolved; nothing was written.
    AlreadyResolved,
}

/// Assignment after a resolve call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAssignment {
    /// Current assignment record.
    pub assignment: Assignment,
    /// Whether this call resolved it.
    pub outcome: ResolutionOutcome,
}

/// Transitions assignments from pending to resolved.
///
/// Re-resolving is an idempotent success reported as
/// `ResolutionOutcome::AlreadyResolved`; the stored actor and timestamp are
/// never overwritten.
#[derive(Clone)]
pub struct AssignmentResolver {
    assignments: Arc<dyn EntityStore<Assignment>>,
    audit: AuditTrail,
}

impl AssignmentResolver {
    /// Build from the injected stores.
    pub fn new(stores: &Stores, audit: AuditTrail) -> Self {
        Self {
            assignments: Arc::clone(&stores.assignments),
            audit,
        }
    }

    /// Resolve `assignment_id` on behalf of `actor_id`.
    pub async fn resolve(
        &self,
        assignment_id: AssignmentId,
        actor_id: PrincipalId,
    ) -> Result<ResolvedAssignment, ResolutionError> {
        let assignment = self.fetch(assignment_id).await?;
        if !assignment.active {
            tracing::debug!(%assignment_id, "assignment already resolved, nothing to do");
            return Ok(ResolvedAssignment {
                assignment,
                outcome: ResolutionOutcome::AlreadyResolved,
            });
        }

        let pending = Filter::by(|a: &Assignment| a.active);
        let patch = AssignmentPatch::Resolve {
            by: actor_id,
            at: now(),
        };
        match self.assignments.update_if(assignment_id, &pending, patch).await {
            Ok(assignment) => {
                tracing::info!(%assignment_id, %actor_id, "assignment resolved");
                self.audit.record(
                    Assignment::KIND,
                    assignment_id,
                    &actor_id.to_string(),
                    "resolve",
                    None,
                );
                Ok(ResolvedAssignment {
                    assignment,
                    outcome: ResolutionOutcome::Resolved,
                })
            }
            Err(StoreError::PreconditionFailed { .. }) => {
                tracing::debug!(%assignment_id, "assignment resolved concurrently");
                let assignment = self.fetch(assignment_id).await?;
                Ok(ResolvedAssignment {
                    assignment,
                    outcome: ResolutionOutcome::AlreadyResolved,
                })
            }
            Err(err) => {
                tracing::warn!(%assignment_id, error = %err, "assignment update failed");
                Err(ResolutionError::UpdateFailed {
                    assignment_id,
                    reason: err.to_string(),
                })
            }
        }
    }

    async fn fetch(&self, assignment_id: AssignmentId) -> Result<Assignment, ResolutionError> {
        self.assignments
            .find_by_id(assignment_id)
            .await?
            .ok_or(ResolutionError::NotFound { assignment_id })
    }
}

/// Creates assignments stamped with the requesting principal's type.
#[derive(Clone)]
pub struct AssignmentIntake {
    assignments: Arc<dyn EntityStore<Assignment>>,
    audit: AuditTrail,
}

impl AssignmentIntake {
    /// Build from the injected stores.
    pub fn new(stores: &Stores, audit: AuditTrail) -> Self {
        Self {
            assignments: Arc::clone(&stores.assignments),
            audit,
        }
    }

    /// Insert a pending assignment requested by `principal`.
    pub async fn create(&self, principal: &Principal) -> Result<Assignment, StoreError> {
        let assignment = self
            .assignments
            .insert(Assignment::pending(principal.principal_type.clone()))
            .await?;
        tracing::info!(
            assignment_id = %assignment.id,
            principal_type = %assignment.principal_type,
            "assignment created"
        );
        self.audit.record(
            Assignment::KIND,
            assignment.id,
            &principal.id.to_string(),
            "create",
            Some(principal.principal_type.clone()),
        );
        Ok(assignment)
    }
}
