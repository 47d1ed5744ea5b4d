use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use storekeep_application::ProductRepository;
use storekeep_core::{AppError, AppResult};
use storekeep_domain::{Product, ProductDraft, ProductId, ProductSort};

/// PostgreSQL-backed repository for the product catalog.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    product_id: i64,
    name: String,
    unit: String,
    price: f64,
    quantity: f64,
    photo: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.product_id),
            name: row.name,
            unit: row.unit,
            price: row.price,
            quantity: row.quantity,
            photo: row.photo,
        }
    }
}

/// Builds an ILIKE pattern matching the search text as a substring, with
/// LIKE metacharacters escaped so they match literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Maps a sort order onto a fixed ORDER BY clause. The product id is always
/// the tie-breaker so pagination stays reproducible.
fn order_clause(sort: ProductSort) -> &'static str {
    match sort {
        ProductSort::Default => "product_id ASC",
        ProductSort::NameAsc => "name ASC, product_id ASC",
        ProductSort::NameDesc => "name DESC, product_id ASC",
        ProductSort::PriceAsc => "price ASC, product_id ASC",
        ProductSort::PriceDesc => "price DESC, product_id ASC",
    }
}

/// Classifies a failed write: serialization and deadlock failures are
/// concurrent-modification conflicts, everything else is a store failure.
fn classify_write_error(context: &str, error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        let code = database_error.code();
        if matches!(code.as_deref(), Some("40001") | Some("40P01")) {
            return AppError::Conflict(format!("{context}: concurrent modification"));
        }
    }

    AppError::Persistence(format!("{context}: {error}"))
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn count(&self, search: Option<&str>) -> AppResult<usize> {
        let pattern = search.map(like_pattern);
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR unit ILIKE $1)
            "#,
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Persistence(format!("failed to count products: {error}")))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn list(
        &self,
        search: Option<&str>,
        sort: ProductSort,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Product>> {
        let pattern = search.map(like_pattern);
        let query = format!(
            r#"
            SELECT product_id, name, unit, price, quantity, photo
            FROM products
            WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR unit ILIKE $1)
            ORDER BY {}
            LIMIT $2
            OFFSET $3
            "#,
            order_clause(sort)
        );

        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(pattern)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Persistence(format!("failed to list products: {error}"))
            })?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, product_id: ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT product_id, name, unit, price, quantity, photo
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Persistence(format!("failed to load product: {error}")))?;

        Ok(row.map(Product::from))
    }

    async fn insert(&self, draft: &ProductDraft) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, unit, price, quantity, photo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING product_id, name, unit, price, quantity, photo
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.unit)
        .bind(draft.price)
        .bind(draft.quantity)
        .bind(&draft.photo)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| classify_write_error("failed to insert product", error))?;

        Ok(Product::from(row))
    }

    async fn update(&self, product_id: ProductId, draft: &ProductDraft) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $2, unit = $3, price = $4, quantity = $5, photo = $6
            WHERE product_id = $1
            RETURNING product_id, name, unit, price, quantity, photo
            "#,
        )
        .bind(product_id.as_i64())
        .bind(&draft.name)
        .bind(&draft.unit)
        .bind(draft.price)
        .bind(draft.quantity)
        .bind(&draft.photo)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| classify_write_error("failed to update product", error))?;

        row.map(Product::from)
            .ok_or_else(|| AppError::NotFound(format!("no product with id {product_id}")))
    }

    async fn delete(&self, product_id: ProductId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| classify_write_error("failed to delete product", error))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "no product with id {product_id}"
            )));
        }

        Ok(())
    }
}
