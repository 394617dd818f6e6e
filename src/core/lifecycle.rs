//! Resident soft-delete.

use std::sync::Arc;

use crate::core::audit::AuditTrail;
use crate::core::model::{Resident, ResidentPatch};
use crate::core::store::{Entity, EntityStore, Filter, Stores};
use crate::core::{LifecycleError, StoreError};
use crate::util::{Principal, ResidentId};

/// Deactivates residents by flipping `active`; records are never removed.
#[derive(Clone)]
pub struct ResidentLifecycle {
    residents: Arc<dyn EntityStore<Resident>>,
    audit: AuditTrail,
}

impl ResidentLifecycle {
    /// Build from the injected stores.
    pub fn new(stores: &Stores, audit: AuditTrail) -> Self {
        Self {
            residents: Arc::clone(&stores.residents),
            audit,
        }
    }

    /// Deactivate `resident_id` on behalf of `actor`. A second call fails
    /// with `AlreadyInactive`.
    pub async fn deactivate_resident(
        &self,
        resident_id: ResidentId,
        actor: &Principal,
    ) -> Result<Resident, LifecycleError> {
        let resident = self
            .residents
            .find_by_id(resident_id)
            .await?
            .ok_or(LifecycleError::NotFound { resident_id })?;

        if !resident.active {
            tracing::warn!(%resident_id, "resident already inactive");
            return Err(LifecycleError::AlreadyInactive {
                name: resident.name,
            });
        }

        match self
            .residents
            .update_if(
                resident_id,
                &Filter::by(|r: &Resident| r.active),
                ResidentPatch::Deactivate,
            )
            .await
        {
            Ok(updated) => {
                tracing::info!(%resident_id, actor = %actor.id, "resident deactivated");
                self.audit.record(
                    Resident::KIND,
                    resident_id,
                    &actor.id.to_string(),
                    "deactivate",
                    Some(actor.principal_type.clone()),
                );
                Ok(updated)
            }
            Err(StoreError::PreconditionFailed { .. }) => Err(LifecycleError::AlreadyInactive {
                name: resident.name,
            }),
            Err(err) => Err(err.into()),
        }
    }
}
