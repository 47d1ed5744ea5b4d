//! Catalog listing and role-gated product mutations.

use std::sync::Arc;

use async_trait::async_trait;

use storekeep_core::{AppError, AppResult, UserIdentity};
use storekeep_domain::{
    AuditAction, Page, Permission, Product, ProductDraft, ProductId, ProductSort, UserId,
};

use crate::audit_service::AuditService;
use crate::security_ports::{AccessPolicy, require_permission};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Repository port for the product collection.
///
/// Filtering matches the search text case-insensitively against name or
/// unit; `list` applies filter, then sort, then the slice, and `count`
/// reports the post-filter total so pagination math stays consistent.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Counts products matching the search text.
    async fn count(&self, search: Option<&str>) -> AppResult<usize>;

    /// Returns one slice of the filtered, sorted collection.
    async fn list(
        &self,
        search: Option<&str>,
        sort: ProductSort,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Product>>;

    /// Finds a product by id.
    async fn find_by_id(&self, product_id: ProductId) -> AppResult<Option<Product>>;

    /// Inserts a new product. Returns the stored row with its assigned id.
    async fn insert(&self, draft: &ProductDraft) -> AppResult<Product>;

    /// Overwrites a product's fields. Fails with `NotFound` when the row no
    /// longer exists and `Conflict` when a concurrent write got in the way.
    async fn update(&self, product_id: ProductId, draft: &ProductDraft) -> AppResult<Product>;

    /// Deletes a product. Fails with `NotFound` when the row is gone.
    async fn delete(&self, product_id: ProductId) -> AppResult<()>;
}

/// Query describing one page of the product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPageQuery {
    /// Free-text search over name and unit; blank means no filtering.
    pub search: Option<String>,
    /// Sort order for the listing.
    pub sort: ProductSort,
    /// Requested 1-based page.
    pub page: usize,
    /// Page size for this call site.
    pub page_size: usize,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for catalog browsing and administration.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    audit: AuditService,
    policy: Arc<dyn AccessPolicy>,
}

impl CatalogService {
    /// Creates a new catalog service.
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductRepository>,
        audit: AuditService,
        policy: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            products,
            audit,
            policy,
        }
    }

    /// Returns one page of the filtered, sorted product listing.
    ///
    /// The filter is applied before sorting and pagination, so the returned
    /// totals describe the filtered collection. A page number past the end
    /// comes back clamped to the last page rather than failing.
    pub async fn browse(&self, query: CatalogPageQuery) -> AppResult<Page<Product>> {
        if query.page_size == 0 {
            return Err(AppError::Validation(
                "page size must be greater than zero".to_owned(),
            ));
        }

        let search = normalize_search(query.search.as_deref());
        let total = self.products.count(search).await?;
        let offset = Page::<Product>::offset_for(query.page, total, query.page_size);
        let items = self
            .products
            .list(search, query.sort, query.page_size, offset)
            .await?;

        Ok(Page::assemble(items, total, query.page, query.page_size))
    }

    /// Finds a product by id, failing when it does not exist.
    pub async fn find(&self, product_id: ProductId) -> AppResult<Product> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no product with id {product_id}")))
    }

    /// Creates a product and records a `Created` audit entry.
    pub async fn create(&self, actor: &UserIdentity, draft: ProductDraft) -> AppResult<Product> {
        require_permission(self.policy.as_ref(), actor, Permission::ManageCatalog).await?;

        let product = self.products.insert(&draft).await?;

        self.audit
            .record_product_event(
                product.id,
                AuditAction::Created,
                Some(UserId::from_uuid(actor.user_id())),
                None,
                Some(&product),
            )
            .await;

        Ok(product)
    }

    /// Updates a product and records an `Updated` audit entry carrying a
    /// field-by-field diff of the old and new state.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        product_id: ProductId,
        draft: ProductDraft,
    ) -> AppResult<Product> {
        require_permission(self.policy.as_ref(), actor, Permission::ManageCatalog).await?;

        let before = self.find(product_id).await?;
        let after = self.products.update(product_id, &draft).await?;

        self.audit
            .record_product_event(
                product_id,
                AuditAction::Updated,
                Some(UserId::from_uuid(actor.user_id())),
                Some(&before),
                Some(&after),
            )
            .await;

        Ok(after)
    }

    /// Deletes a product and records a `Deleted` audit entry naming it.
    ///
    /// The entry is written after the row is gone; the name survives through
    /// the pre-deletion snapshot.
    pub async fn delete(&self, actor: &UserIdentity, product_id: ProductId) -> AppResult<()> {
        require_permission(self.policy.as_ref(), actor, Permission::ManageCatalog).await?;

        let before = self.find(product_id).await?;
        self.products.delete(product_id).await?;

        self.audit
            .record_product_event(
                product_id,
                AuditAction::Deleted,
                Some(UserId::from_uuid(actor.user_id())),
                Some(&before),
                None,
            )
            .await;

        Ok(())
    }
}

/// Treats blank or whitespace-only search text as "no filter".
fn normalize_search(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests;
