use axum::Json;
use axum::extract::{Query, State};
use storekeep_application::CatalogPageQuery;
use storekeep_domain::ProductSort;

use crate::dto::{ProductListQuery, ProductPageResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Storefront listings show a shorter page than the admin catalog.
const STOREFRONT_PAGE_SIZE: usize = 8;

/// Maps the storefront's sort tokens; the storefront browses by name unless
/// asked otherwise.
fn storefront_sort(token: Option<&str>) -> ProductSort {
    match token.unwrap_or_default() {
        "name_desc" => ProductSort::NameDesc,
        "price" => ProductSort::PriceAsc,
        "price_desc" => ProductSort::PriceDesc,
        _ => ProductSort::NameAsc,
    }
}

pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Json<ProductPageResponse>> {
    let page = state
        .catalog_service
        .browse(CatalogPageQuery {
            search: query.search,
            sort: storefront_sort(query.sort.as_deref()),
            page: query.page.unwrap_or(1),
            page_size: STOREFRONT_PAGE_SIZE,
        })
        .await?;

    Ok(Json(ProductPageResponse::from(page)))
}
