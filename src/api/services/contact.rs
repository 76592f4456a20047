//! 留言端点
//!
//! 提交对访客开放，其余管理端点要管理员身份。

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};

use crate::services::ContactService;
use crate::storage::SeaOrmStorage;
use crate::storage::models::ContactInput;

use super::error_code::ErrorCode;
use super::helpers::{api_result, api_result_found, error_from_portfolio, success_response};
use super::types::CountResponse;

/// POST /contact - 访客提交留言
pub async fn submit_contact(
    contact_service: web::Data<Arc<ContactService>>,
    body: web::Json<ContactInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(contact_service.submit(body.into_inner()).await))
}

/// GET /contact
pub async fn find_all_contacts(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(storage.contacts_all().await))
}

/// GET /contact/unread-count
pub async fn unread_contact_count(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    match storage.count_unread_contacts().await {
        Ok(count) => Ok(success_response(CountResponse { count })),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// GET /contact/{id}
pub async fn find_contact(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.contact_by_id(&id).await,
        ErrorCode::ContactNotFound,
        &format!("Contact {} not found", id),
    ))
}

/// PUT /contact/{id}/read
pub async fn mark_contact_read(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.mark_contact_read(&id).await,
        ErrorCode::ContactNotFound,
        &format!("Contact {} not found", id),
    ))
}

/// DELETE /contact/{id}
pub async fn remove_contact(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.delete_contact(&id).await,
        ErrorCode::ContactNotFound,
        &format!("Contact {} not found", id),
    ))
}
