//! 项目与分类端点

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};

use crate::storage::SeaOrmStorage;
use crate::storage::models::{CategoryInput, CategoryPatch, ProjectInput, ProjectPatch};

use super::error_code::ErrorCode;
use super::helpers::{api_result, api_result_found, error_from_portfolio, error_response, success_response};
use super::types::UploadedFileResponse;
use super::upload::{IMAGE_EXTENSIONS, remove_file_if_exists, save_single_file};

/// GET /projects
pub async fn find_all_projects(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(storage.projects_all().await))
}

/// GET /projects/{id}
pub async fn find_project(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.project_by_id(&id).await,
        ErrorCode::ProjectNotFound,
        &format!("Project {} not found", id),
    ))
}

/// POST /projects
pub async fn create_project(
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<ProjectInput>,
) -> ActixResult<impl Responder> {
    let input = body.into_inner();
    match storage.create_project(input).await {
        Ok(Some(project)) => Ok(success_response(project)),
        // 分类不存在按请求错误处理
        Ok(None) => Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::CategoryNotFound,
            "Referenced category does not exist",
        )),
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// PATCH /projects/{id}
pub async fn update_project(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    body: web::Json<ProjectPatch>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.update_project(&id, body.into_inner()).await,
        ErrorCode::ProjectNotFound,
        &format!("Project {} not found", id),
    ))
}

/// DELETE /projects/{id}
pub async fn remove_project(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.delete_project(&id).await,
        ErrorCode::ProjectNotFound,
        &format!("Project {} not found", id),
    ))
}

/// POST /projects/upload-image - 落盘并返回文件信息
pub async fn upload_project_image(payload: Multipart) -> ActixResult<impl Responder> {
    match save_single_file(payload, IMAGE_EXTENSIONS).await {
        Ok(saved) => Ok(success_response(UploadedFileResponse::from(saved))),
        Err(response) => Ok(response),
    }
}

/// PATCH /projects/{id}/image - 替换项目配图
pub async fn replace_project_image(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    payload: Multipart,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    let existing = match storage.project_by_id(&id).await {
        Ok(Some(project)) => project,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::ProjectNotFound,
                &format!("Project {} not found", id),
            ));
        }
        Err(e) => return Ok(error_from_portfolio(&e)),
    };

    let saved = match save_single_file(payload, IMAGE_EXTENSIONS).await {
        Ok(saved) => saved,
        Err(response) => return Ok(response),
    };

    if let Some(old_image) = existing.image.as_deref() {
        remove_file_if_exists(old_image);
    }

    Ok(api_result_found(
        storage.set_project_image(&id, &saved.path).await,
        ErrorCode::ProjectNotFound,
        &format!("Project {} not found", id),
    ))
}

/// GET /projects/{id}/image - 项目配图
pub async fn project_image(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    let project = match storage.project_by_id(&id).await {
        Ok(Some(project)) => project,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::ProjectNotFound,
                &format!("Project {} not found", id),
            ));
        }
        Err(e) => return Ok(error_from_portfolio(&e)),
    };

    let Some(image_path) = project.image else {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "Project has no image",
        ));
    };

    match tokio::fs::read(&image_path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&image_path).first_or_octet_stream();
            Ok(HttpResponse::Ok().content_type(mime.as_ref()).body(bytes))
        }
        Err(_) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "Image file missing on disk",
        )),
    }
}

// ============ 分类 ============

/// GET /projects/categories
pub async fn find_all_categories(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(storage.categories_all().await))
}

/// GET /projects/categories/{id}
pub async fn find_category(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.category_by_id(&id).await,
        ErrorCode::CategoryNotFound,
        &format!("Category {} not found", id),
    ))
}

/// POST /projects/categories
pub async fn create_category(
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<CategoryInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(storage.create_category(body.into_inner()).await))
}

/// PATCH /projects/categories/{id}
pub async fn update_category(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    body: web::Json<CategoryPatch>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.update_category(&id, body.into_inner()).await,
        ErrorCode::CategoryNotFound,
        &format!("Category {} not found", id),
    ))
}

/// DELETE /projects/categories/{id}
pub async fn remove_category(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.delete_category(&id).await,
        ErrorCode::CategoryNotFound,
        &format!("Category {} not found", id),
    ))
}
