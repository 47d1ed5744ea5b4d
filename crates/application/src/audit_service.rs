//! Append-only audit trail of catalog mutations.
//!
//! Recording is best-effort observability: the catalog mutation has already
//! committed by the time an entry is written, so a failed audit write is
//! reported through logging and never rolls the mutation back.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use storekeep_core::{AppResult, UserIdentity};
use storekeep_domain::{
    AuditAction, Permission, Product, ProductId, UserId, audit_product_name, update_details,
};

use crate::security_ports::{AccessPolicy, require_permission};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// An audit entry ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    /// Product the event concerns. Kept as a plain value so the entry
    /// survives the product's deletion.
    pub product_id: ProductId,
    /// Product name denormalized at event time.
    pub product_name: String,
    /// What happened.
    pub action: AuditAction,
    /// Human-readable description; a structured diff for updates.
    pub details: String,
    /// Acting user, if one could be attributed.
    pub user_id: Option<UserId>,
    /// When the event happened.
    pub action_date: DateTime<Utc>,
}

/// A stored audit entry with the actor resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntryRecord {
    /// Store-assigned entry identifier.
    pub id: i64,
    /// Product the event concerned.
    pub product_id: ProductId,
    /// Product name at event time.
    pub product_name: String,
    /// What happened.
    pub action: AuditAction,
    /// Description recorded with the event.
    pub details: String,
    /// When the event happened.
    pub action_date: DateTime<Utc>,
    /// Acting user id, if attribution survived.
    pub user_id: Option<UserId>,
    /// Actor email for display; `None` when the user record is gone.
    pub actor_email: Option<String>,
}

/// Port for persisting and reading audit entries.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Appends one entry.
    async fn append(&self, entry: NewAuditEntry) -> AppResult<()>;

    /// Returns all entries ordered by action date descending, with actor
    /// identity resolved where the user record still exists.
    async fn list_all(&self) -> AppResult<Vec<AuditEntryRecord>>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for the catalog audit trail.
#[derive(Clone)]
pub struct AuditService {
    repository: Arc<dyn AuditLogRepository>,
    policy: Arc<dyn AccessPolicy>,
}

impl AuditService {
    /// Creates a new audit service.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>, policy: Arc<dyn AccessPolicy>) -> Self {
        Self { repository, policy }
    }

    /// Records one catalog mutation that has already committed.
    ///
    /// The entry's product name comes from the post-state when available,
    /// then the pre-state, then a placeholder. For updates with both
    /// snapshots the details are synthesized as a field-by-field diff.
    /// A failed write is logged and swallowed so the caller still reports
    /// the mutation's success.
    pub async fn record_product_event(
        &self,
        product_id: ProductId,
        action: AuditAction,
        actor: Option<UserId>,
        before: Option<&Product>,
        after: Option<&Product>,
    ) {
        let product_name = audit_product_name(after, before);

        let details = match (action, before, after) {
            (AuditAction::Updated, Some(before), Some(after)) => update_details(before, after),
            (AuditAction::Updated, _, _) => "Product details updated.".to_owned(),
            (AuditAction::Created, _, _) => format!("New product created: {product_name}"),
            (AuditAction::Deleted, _, _) => format!("Product deleted: {product_name}"),
        };

        let entry = NewAuditEntry {
            product_id,
            product_name,
            action,
            details,
            user_id: actor,
            action_date: Utc::now(),
        };

        if let Err(error) = self.repository.append(entry).await {
            tracing::warn!(
                product_id = product_id.as_i64(),
                action = action.as_str(),
                "failed to append audit entry: {error}"
            );
        }
    }

    /// Returns the full audit trail, newest first.
    pub async fn list_entries(&self, actor: &UserIdentity) -> AppResult<Vec<AuditEntryRecord>> {
        require_permission(self.policy.as_ref(), actor, Permission::ViewAuditLog).await?;
        self.repository.list_all().await
    }
}
