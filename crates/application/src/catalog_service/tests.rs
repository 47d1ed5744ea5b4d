use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use storekeep_core::{AppError, AppResult, UserIdentity};
use storekeep_domain::{
    AuditAction, Permission, Product, ProductDraft, ProductId, ProductSort, UserId,
};

use crate::audit_service::{AuditEntryRecord, AuditLogRepository, AuditService, NewAuditEntry};
use crate::security_ports::AccessPolicy;

use super::{CatalogPageQuery, CatalogService, ProductRepository};

struct FakeProductRepository {
    products: Mutex<Vec<Product>>,
    next_id: Mutex<i64>,
}

impl FakeProductRepository {
    fn new(products: Vec<Product>) -> Self {
        let next_id = products
            .iter()
            .map(|product| product.id.as_i64())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            products: Mutex::new(products),
            next_id: Mutex::new(next_id),
        }
    }

    fn matches(product: &Product, search: Option<&str>) -> bool {
        let Some(search) = search else {
            return true;
        };
        let needle = search.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product.unit.to_lowercase().contains(&needle)
    }

    fn sorted(mut products: Vec<Product>, sort: ProductSort) -> Vec<Product> {
        match sort {
            ProductSort::Default => {
                products.sort_by_key(|product| product.id.as_i64());
            }
            ProductSort::NameAsc => products.sort_by(|a, b| a.name.cmp(&b.name)),
            ProductSort::NameDesc => products.sort_by(|a, b| b.name.cmp(&a.name)),
            ProductSort::PriceAsc => {
                products.sort_by(|a, b| a.price.total_cmp(&b.price));
            }
            ProductSort::PriceDesc => {
                products.sort_by(|a, b| b.price.total_cmp(&a.price));
            }
        }
        products
    }
}

#[async_trait]
impl ProductRepository for FakeProductRepository {
    async fn count(&self, search: Option<&str>) -> AppResult<usize> {
        Ok(self
            .products
            .lock()
            .await
            .iter()
            .filter(|product| Self::matches(product, search))
            .count())
    }

    async fn list(
        &self,
        search: Option<&str>,
        sort: ProductSort,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Product>> {
        let filtered: Vec<Product> = self
            .products
            .lock()
            .await
            .iter()
            .filter(|product| Self::matches(product, search))
            .cloned()
            .collect();

        Ok(Self::sorted(filtered, sort)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn find_by_id(&self, product_id: ProductId) -> AppResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .await
            .iter()
            .find(|product| product.id == product_id)
            .cloned())
    }

    async fn insert(&self, draft: &ProductDraft) -> AppResult<Product> {
        let mut next_id = self.next_id.lock().await;
        let product = Product {
            id: ProductId::new(*next_id),
            name: draft.name.clone(),
            unit: draft.unit.clone(),
            price: draft.price,
            quantity: draft.quantity,
            photo: draft.photo.clone(),
        };
        *next_id += 1;

        self.products.lock().await.push(product.clone());
        Ok(product)
    }

    async fn update(&self, product_id: ProductId, draft: &ProductDraft) -> AppResult<Product> {
        let mut products = self.products.lock().await;
        let Some(product) = products.iter_mut().find(|p| p.id == product_id) else {
            return Err(AppError::NotFound(format!(
                "no product with id {product_id}"
            )));
        };

        product.name = draft.name.clone();
        product.unit = draft.unit.clone();
        product.price = draft.price;
        product.quantity = draft.quantity;
        product.photo = draft.photo.clone();
        Ok(product.clone())
    }

    async fn delete(&self, product_id: ProductId) -> AppResult<()> {
        let mut products = self.products.lock().await;
        let before = products.len();
        products.retain(|product| product.id != product_id);

        if products.len() == before {
            return Err(AppError::NotFound(format!(
                "no product with id {product_id}"
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeAuditLogRepository {
    entries: Mutex<Vec<NewAuditEntry>>,
    fail_append: bool,
}

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn append(&self, entry: NewAuditEntry) -> AppResult<()> {
        if self.fail_append {
            return Err(AppError::Persistence("audit store is down".to_owned()));
        }
        self.entries.lock().await.push(entry);
        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<AuditEntryRecord>> {
        Ok(Vec::new())
    }
}

struct AllowAllPolicy;

#[async_trait]
impl AccessPolicy for AllowAllPolicy {
    async fn has_permission(&self, _user_id: UserId, _permission: Permission) -> AppResult<bool> {
        Ok(true)
    }
}

struct DenyAllPolicy;

#[async_trait]
impl AccessPolicy for DenyAllPolicy {
    async fn has_permission(&self, _user_id: UserId, _permission: Permission) -> AppResult<bool> {
        Ok(false)
    }
}

fn product(id: i64, name: &str, unit: &str, price: f64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        unit: unit.to_owned(),
        price,
        quantity: 100.0,
        photo: None,
    }
}

fn admin() -> UserIdentity {
    UserIdentity::new(UserId::new().as_uuid(), "Admin", None)
}

fn service_with(
    products: Vec<Product>,
    audit: Arc<FakeAuditLogRepository>,
    policy: Arc<dyn AccessPolicy>,
) -> CatalogService {
    CatalogService::new(
        Arc::new(FakeProductRepository::new(products)),
        AuditService::new(audit, Arc::clone(&policy)),
        policy,
    )
}

fn query(search: Option<&str>, sort: ProductSort, page: usize, page_size: usize) -> CatalogPageQuery {
    CatalogPageQuery {
        search: search.map(ToOwned::to_owned),
        sort,
        page,
        page_size,
    }
}

fn sample_catalog() -> Vec<Product> {
    vec![
        product(1, "Apple", "kg", 3.0),
        product(2, "Banana", "kg", 2.0),
        product(3, "Milk", "litre", 1.5),
        product(4, "Bread", "piece", 2.5),
        product(5, "Butter", "piece", 4.0),
        product(6, "Rice", "kg", 1.2),
    ]
}

#[tokio::test]
async fn browse_filters_before_counting_and_paging() {
    let service = service_with(sample_catalog(), Arc::default(), Arc::new(AllowAllPolicy));

    let page = service
        .browse(query(Some("kg"), ProductSort::Default, 2, 2))
        .await;

    let Ok(page) = page else {
        panic!("browse failed");
    };
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page_index, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Rice");
}

#[tokio::test]
async fn browse_matches_unit_case_insensitively() {
    let service = service_with(sample_catalog(), Arc::default(), Arc::new(AllowAllPolicy));

    let page = service
        .browse(query(Some("LITRE"), ProductSort::Default, 1, 10))
        .await;

    assert!(page.is_ok_and(|page| page.total_items == 1 && page.items[0].name == "Milk"));
}

#[tokio::test]
async fn browse_sorts_by_price_descending() {
    let service = service_with(sample_catalog(), Arc::default(), Arc::new(AllowAllPolicy));

    let page = service
        .browse(query(None, ProductSort::PriceDesc, 1, 3))
        .await;

    let Ok(page) = page else {
        panic!("browse failed");
    };
    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Butter", "Apple", "Bread"]);
}

#[tokio::test]
async fn browse_is_reproducible_for_the_same_query() {
    let service = service_with(sample_catalog(), Arc::default(), Arc::new(AllowAllPolicy));
    let q = query(None, ProductSort::NameAsc, 1, 4);

    let first = service.browse(q.clone()).await;
    let second = service.browse(q).await;

    match (first, second) {
        (Ok(first), Ok(second)) => assert_eq!(first, second),
        _ => panic!("browse failed"),
    }
}

#[tokio::test]
async fn browse_clamps_page_past_the_end() {
    let service = service_with(sample_catalog(), Arc::default(), Arc::new(AllowAllPolicy));

    let page = service
        .browse(query(None, ProductSort::Default, 99, 4))
        .await;

    let Ok(page) = page else {
        panic!("browse failed");
    };
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page_index, 2);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn browse_empty_catalog_is_one_empty_page() {
    let service = service_with(Vec::new(), Arc::default(), Arc::new(AllowAllPolicy));

    let page = service.browse(query(None, ProductSort::Default, 1, 8)).await;

    let Ok(page) = page else {
        panic!("browse failed");
    };
    assert_eq!(page.page_index, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_items, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn browse_with_unmatched_filter_is_one_empty_page() {
    let service = service_with(sample_catalog(), Arc::default(), Arc::new(AllowAllPolicy));

    let page = service
        .browse(query(Some("zzz"), ProductSort::Default, 1, 8))
        .await;

    assert!(page.is_ok_and(|page| page.total_pages == 1 && page.items.is_empty()));
}

#[tokio::test]
async fn browse_treats_whitespace_search_as_no_filter() {
    let service = service_with(sample_catalog(), Arc::default(), Arc::new(AllowAllPolicy));

    let page = service
        .browse(query(Some("   "), ProductSort::Default, 1, 10))
        .await;

    assert!(page.is_ok_and(|page| page.total_items == 6));
}

#[tokio::test]
async fn browse_rejects_zero_page_size() {
    let service = service_with(sample_catalog(), Arc::default(), Arc::new(AllowAllPolicy));

    let result = service.browse(query(None, ProductSort::Default, 1, 0)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_records_a_created_audit_entry() {
    let audit = Arc::new(FakeAuditLogRepository::default());
    let service = service_with(Vec::new(), Arc::clone(&audit), Arc::new(AllowAllPolicy));

    let draft = match ProductDraft::new("Widget", "piece", 10.0, 100.0, None) {
        Ok(draft) => draft,
        Err(error) => panic!("draft rejected: {error}"),
    };
    let created = service.create(&admin(), draft).await;
    assert!(created.is_ok());

    let entries = audit.entries.lock().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::Created);
    assert_eq!(entries[0].product_name, "Widget");
    assert_eq!(entries[0].details, "New product created: Widget");
    assert!(entries[0].user_id.is_some());
}

#[tokio::test]
async fn update_records_a_field_by_field_diff() {
    let audit = Arc::new(FakeAuditLogRepository::default());
    let service = service_with(
        vec![product(5, "Widget", "piece", 10.0)],
        Arc::clone(&audit),
        Arc::new(AllowAllPolicy),
    );

    let draft = match ProductDraft::new("Widget Pro", "piece", 12.0, 100.0, None) {
        Ok(draft) => draft,
        Err(error) => panic!("draft rejected: {error}"),
    };
    let updated = service.update(&admin(), ProductId::new(5), draft).await;
    assert!(updated.is_ok());

    let entries = audit.entries.lock().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::Updated);
    assert_eq!(
        entries[0].details,
        "Old Name: Widget, New Name: Widget Pro | Old Price: 10, New Price: 12 | \
         Old Quantity: 100, New Quantity: 100"
    );
}

#[tokio::test]
async fn delete_keeps_the_product_name_in_the_entry() {
    let audit = Arc::new(FakeAuditLogRepository::default());
    let service = service_with(
        vec![product(9, "Gadget", "piece", 3.0)],
        Arc::clone(&audit),
        Arc::new(AllowAllPolicy),
    );

    let deleted = service.delete(&admin(), ProductId::new(9)).await;
    assert!(deleted.is_ok());

    let find = service.find(ProductId::new(9)).await;
    assert!(matches!(find, Err(AppError::NotFound(_))));

    let entries = audit.entries.lock().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::Deleted);
    assert_eq!(entries[0].product_name, "Gadget");
}

#[tokio::test]
async fn mutations_are_forbidden_without_the_catalog_permission() {
    let audit = Arc::new(FakeAuditLogRepository::default());
    let service = service_with(
        vec![product(1, "Apple", "kg", 3.0)],
        Arc::clone(&audit),
        Arc::new(DenyAllPolicy),
    );

    let draft = match ProductDraft::new("Pear", "kg", 2.0, 10.0, None) {
        Ok(draft) => draft,
        Err(error) => panic!("draft rejected: {error}"),
    };
    let created = service.create(&admin(), draft).await;
    assert!(matches!(created, Err(AppError::Forbidden(_))));

    let deleted = service.delete(&admin(), ProductId::new(1)).await;
    assert!(matches!(deleted, Err(AppError::Forbidden(_))));

    assert!(audit.entries.lock().await.is_empty());
}

#[tokio::test]
async fn audit_write_failure_does_not_fail_the_mutation() {
    let audit = Arc::new(FakeAuditLogRepository {
        entries: Mutex::new(Vec::new()),
        fail_append: true,
    });
    let service = service_with(Vec::new(), Arc::clone(&audit), Arc::new(AllowAllPolicy));

    let draft = match ProductDraft::new("Widget", "piece", 10.0, 100.0, None) {
        Ok(draft) => draft,
        Err(error) => panic!("draft rejected: {error}"),
    };
    let created = service.create(&admin(), draft).await;

    assert!(created.is_ok());
    assert!(audit.entries.lock().await.is_empty());
}

#[tokio::test]
async fn updating_a_missing_product_is_not_found() {
    let service = service_with(Vec::new(), Arc::default(), Arc::new(AllowAllPolicy));

    let draft = match ProductDraft::new("Ghost", "piece", 1.0, 1.0, None) {
        Ok(draft) => draft,
        Err(error) => panic!("draft rejected: {error}"),
    };
    let result = service.update(&admin(), ProductId::new(42), draft).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
