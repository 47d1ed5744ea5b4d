use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use storekeep_application::{CustomerOrders, OrderItemRecord, OrderRecord, OrderRepository};
use storekeep_core::{AppError, AppResult};
use storekeep_domain::{NewOrder, OrderId, OrderStatus, ProductId, UserId};

/// PostgreSQL-backed repository for orders and their items.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    order_id: i64,
    user_id: uuid::Uuid,
    order_date: DateTime<Utc>,
    status: String,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: i64,
    product_id: i64,
    product_name: Option<String>,
    quantity: f64,
    price: f64,
}

fn parse_status(value: &str) -> AppResult<OrderStatus> {
    value
        .parse::<OrderStatus>()
        .map_err(|_| AppError::Internal(format!("stored order has unknown status '{value}'")))
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: &NewOrder) -> AppResult<OrderId> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Persistence(format!("failed to open order transaction: {error}"))
        })?;

        let (order_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO orders (user_id, order_date, status)
            VALUES ($1, $2, $3)
            RETURNING order_id
            "#,
        )
        .bind(order.user_id.as_uuid())
        .bind(order.order_date)
        .bind(order.status.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Persistence(format!("failed to insert order: {error}")))?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order_id)
            .bind(item.product_id.as_i64())
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Persistence(format!("failed to insert order item: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Persistence(format!("failed to commit order transaction: {error}"))
        })?;

        Ok(OrderId::new(order_id))
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<OrderRecord>> {
        let orders = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, user_id, order_date, status
            FROM orders
            WHERE user_id = $1
            ORDER BY order_date DESC, order_id DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Persistence(format!("failed to list orders: {error}")))?;

        let order_ids: Vec<i64> = orders.iter().map(|row| row.order_id).collect();
        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT i.order_id, i.product_id, p.name AS product_name, i.quantity, i.price
            FROM order_items i
            LEFT JOIN products p ON p.product_id = i.product_id
            WHERE i.order_id = ANY($1)
            ORDER BY i.order_item_id ASC
            "#,
        )
        .bind(&order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Persistence(format!("failed to list order items: {error}"))
        })?;

        let mut items_by_order: HashMap<i64, Vec<OrderItemRecord>> = HashMap::new();
        for item in items {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderItemRecord {
                    product_id: ProductId::new(item.product_id),
                    product_name: item.product_name,
                    quantity: item.quantity,
                    price: item.price,
                });
        }

        orders
            .into_iter()
            .map(|row| {
                Ok(OrderRecord {
                    id: OrderId::new(row.order_id),
                    user_id: UserId::from_uuid(row.user_id),
                    order_date: row.order_date,
                    status: parse_status(&row.status)?,
                    items: items_by_order.remove(&row.order_id).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> AppResult<()> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE order_id = $1")
            .bind(order_id.as_i64())
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Persistence(format!("failed to update order status: {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("no order with id {order_id}")));
        }

        Ok(())
    }

    async fn customers_with_orders(&self) -> AppResult<Vec<CustomerOrders>> {
        let rows: Vec<(uuid::Uuid, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT o.user_id, u.email, u.display_name, MAX(o.order_id) AS latest_order_id
            FROM orders o
            JOIN users u ON u.user_id = o.user_id
            GROUP BY o.user_id, u.email, u.display_name
            ORDER BY latest_order_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Persistence(format!("failed to list customers with orders: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|(user_id, email, display_name, latest_order_id)| CustomerOrders {
                user_id: UserId::from_uuid(user_id),
                email,
                display_name,
                latest_order_id: OrderId::new(latest_order_id),
            })
            .collect())
    }
}
