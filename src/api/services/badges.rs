//! 可用状态徽章端点

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};

use crate::storage::SeaOrmStorage;
use crate::storage::models::{BadgeInput, BadgePatch};

use super::error_code::ErrorCode;
use super::helpers::{api_result, api_result_found};

/// GET /badges
pub async fn find_all_badges(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(storage.badges_all().await))
}

/// GET /badges/{id}
pub async fn find_badge(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.badge_by_id(&id).await,
        ErrorCode::BadgeNotFound,
        &format!("Badge {} not found", id),
    ))
}

/// POST /badges
pub async fn create_badge(
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<BadgeInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(storage.create_badge(body.into_inner()).await))
}

/// PATCH /badges/{id}
pub async fn update_badge(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    body: web::Json<BadgePatch>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.update_badge(&id, body.into_inner()).await,
        ErrorCode::BadgeNotFound,
        &format!("Badge {} not found", id),
    ))
}

/// DELETE /badges/{id}
pub async fn remove_badge(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.delete_badge(&id).await,
        ErrorCode::BadgeNotFound,
        &format!("Badge {} not found", id),
    ))
}
