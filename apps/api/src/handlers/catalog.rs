use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use storekeep_application::CatalogPageQuery;
use storekeep_core::UserIdentity;
use storekeep_domain::{ProductDraft, ProductId, ProductSort};

use crate::dto::{
    GenericMessageResponse, ProductListQuery, ProductPageResponse, ProductResponse,
    SaveProductRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// The admin catalog pages in tens.
const CATALOG_PAGE_SIZE: usize = 10;

/// Maps the admin catalog's sort tokens; anything unknown falls back to the
/// stable id order.
fn catalog_sort(token: Option<&str>) -> ProductSort {
    match token.unwrap_or_default() {
        "name_asc" => ProductSort::NameAsc,
        "name_desc" => ProductSort::NameDesc,
        "price_asc" => ProductSort::PriceAsc,
        "price_desc" => ProductSort::PriceDesc,
        _ => ProductSort::Default,
    }
}

fn draft_from(request: SaveProductRequest) -> storekeep_core::AppResult<ProductDraft> {
    ProductDraft::new(
        request.name,
        request.unit,
        request.price,
        request.quantity,
        request.photo,
    )
}

pub async fn list_catalog_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<Json<ProductPageResponse>> {
    let page = state
        .catalog_service
        .browse(CatalogPageQuery {
            search: query.search,
            sort: catalog_sort(query.sort.as_deref()),
            page: query.page.unwrap_or(1),
            page_size: CATALOG_PAGE_SIZE,
        })
        .await?;

    Ok(Json(ProductPageResponse::from(page)))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<ProductResponse>> {
    let product = state
        .catalog_service
        .find(ProductId::new(product_id))
        .await?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(request): Json<SaveProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let draft = draft_from(request)?;
    let product = state.catalog_service.create(&user, draft).await?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(product_id): Path<i64>,
    Json(request): Json<SaveProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let draft = draft_from(request)?;
    let product = state
        .catalog_service
        .update(&user, ProductId::new(product_id), draft)
        .await?;

    Ok(Json(ProductResponse::from(product)))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state
        .catalog_service
        .delete(&user, ProductId::new(product_id))
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "product deleted".to_owned(),
    }))
}
