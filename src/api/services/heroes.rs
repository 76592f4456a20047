//! Hero 资料端点

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};

use crate::storage::SeaOrmStorage;
use crate::storage::models::{HeroInput, HeroPatch};

use super::error_code::ErrorCode;
use super::helpers::{api_result, api_result_found, error_from_portfolio, error_response, success_response};
use super::types::UploadedFileResponse;
use super::upload::{DOCUMENT_EXTENSIONS, remove_file_if_exists, save_single_file};

/// GET /heroes
pub async fn find_all_heroes(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(storage.heroes_all().await))
}

/// GET /heroes/{id}
pub async fn find_hero(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.hero_by_id(&id).await,
        ErrorCode::HeroNotFound,
        &format!("Hero {} not found", id),
    ))
}

/// POST /heroes
pub async fn create_hero(
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<HeroInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(storage.create_hero(body.into_inner()).await))
}

/// PATCH /heroes/{id}
pub async fn update_hero(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    body: web::Json<HeroPatch>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.update_hero(&id, body.into_inner()).await,
        ErrorCode::HeroNotFound,
        &format!("Hero {} not found", id),
    ))
}

/// DELETE /heroes/{id}
pub async fn remove_hero(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.delete_hero(&id).await,
        ErrorCode::HeroNotFound,
        &format!("Hero {} not found", id),
    ))
}

/// POST /heroes/upload-cv - 只落盘，返回文件信息，由后续 PATCH 挂到 hero 上
pub async fn upload_hero_cv(payload: Multipart) -> ActixResult<impl Responder> {
    match save_single_file(payload, DOCUMENT_EXTENSIONS).await {
        Ok(saved) => Ok(success_response(UploadedFileResponse::from(saved))),
        Err(response) => Ok(response),
    }
}

/// PATCH /heroes/{id}/cv - 替换 hero 关联的 CV 文件
pub async fn replace_hero_cv(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    payload: Multipart,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    let existing = match storage.hero_by_id(&id).await {
        Ok(Some(hero)) => hero,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::HeroNotFound,
                &format!("Hero {} not found", id),
            ));
        }
        Err(e) => return Ok(error_from_portfolio(&e)),
    };

    let saved = match save_single_file(payload, DOCUMENT_EXTENSIONS).await {
        Ok(saved) => saved,
        Err(response) => return Ok(response),
    };

    remove_file_if_exists(&existing.cv_path);

    Ok(api_result_found(
        storage.set_hero_cv_path(&id, &saved.path).await,
        ErrorCode::HeroNotFound,
        &format!("Hero {} not found", id),
    ))
}

/// GET /heroes/{id}/cv - 下载 hero 关联的 CV
pub async fn download_hero_cv(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    let hero = match storage.hero_by_id(&id).await {
        Ok(Some(hero)) => hero,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::HeroNotFound,
                &format!("Hero {} not found", id),
            ));
        }
        Err(e) => return Ok(error_from_portfolio(&e)),
    };

    if hero.cv_path.is_empty() {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::CvNotFound,
            "Hero has no CV file",
        ));
    }

    let bytes = match tokio::fs::read(&hero.cv_path).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::CvNotFound,
                "CV file missing on disk",
            ));
        }
    };

    let filename = hero
        .cv_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("cv.pdf")
        .to_string();
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok(HttpResponse::Ok()
        .content_type(mime.as_ref())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes))
}
