//! CV 文档端点
//!
//! 下载端点对外公开（访客要能拿简历），增删改和文件上传要管理员。

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use serde_json::json;

use crate::storage::SeaOrmStorage;
use crate::storage::models::CvInput;

use super::error_code::ErrorCode;
use super::helpers::{api_result, api_result_found, error_from_portfolio, error_response, success_response};
use super::types::CvFileInfoResponse;
use super::upload::{DOCUMENT_EXTENSIONS, remove_file_if_exists, save_single_file};

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn extension(path: &str) -> String {
    path.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn document_content_type(ext: &str) -> &'static str {
    match ext {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

/// POST /cv
pub async fn create_cv(
    storage: web::Data<Arc<SeaOrmStorage>>,
    body: web::Json<CvInput>,
) -> ActixResult<impl Responder> {
    let file_path = body.into_inner().file_path.unwrap_or_default();
    Ok(api_result(storage.create_cv(&file_path).await))
}

/// GET /cv/all
pub async fn find_all_cvs(storage: web::Data<Arc<SeaOrmStorage>>) -> ActixResult<impl Responder> {
    Ok(api_result(storage.cvs_all().await))
}

/// GET /cv/{id}
pub async fn find_cv(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.cv_by_id(&id).await,
        ErrorCode::CvNotFound,
        &format!("CV {} not found", id),
    ))
}

/// PATCH /cv/{id}
pub async fn update_cv(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    body: web::Json<CvInput>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let result = match body.into_inner().file_path {
        Some(file_path) => storage.update_cv_file_path(&id, &file_path).await,
        // 没给新路径就原样返回
        None => storage.cv_by_id(&id).await,
    };
    Ok(api_result_found(
        result,
        ErrorCode::CvNotFound,
        &format!("CV {} not found", id),
    ))
}

/// DELETE /cv/{id}
pub async fn remove_cv(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result_found(
        storage.delete_cv(&id).await,
        ErrorCode::CvNotFound,
        &format!("CV {} not found", id),
    ))
}

/// POST /cv/upload-file - 上传即建档
pub async fn upload_cv_file(
    storage: web::Data<Arc<SeaOrmStorage>>,
    payload: Multipart,
) -> ActixResult<impl Responder> {
    let saved = match save_single_file(payload, DOCUMENT_EXTENSIONS).await {
        Ok(saved) => saved,
        Err(response) => return Ok(response),
    };

    match storage.create_cv(&saved.path).await {
        Ok(cv) => {
            let ext = extension(&saved.filename);
            Ok(success_response(json!({
                "id": cv.id,
                "filename": saved.filename,
                "path": saved.path,
                "mimetype": document_content_type(&ext),
            })))
        }
        Err(e) => Ok(error_from_portfolio(&e)),
    }
}

/// PATCH /cv/{id}/file - 替换已有 CV 的文件
pub async fn replace_cv_file(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
    payload: Multipart,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    let existing = match storage.cv_by_id(&id).await {
        Ok(Some(cv)) => cv,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::CvNotFound,
                &format!("CV {} not found", id),
            ));
        }
        Err(e) => return Ok(error_from_portfolio(&e)),
    };

    let saved = match save_single_file(payload, DOCUMENT_EXTENSIONS).await {
        Ok(saved) => saved,
        Err(response) => return Ok(response),
    };

    remove_file_if_exists(&existing.file_path);

    Ok(api_result_found(
        storage.update_cv_file_path(&id, &saved.path).await,
        ErrorCode::CvNotFound,
        &format!("CV {} not found", id),
    ))
}

/// GET /cv - 下载第一份有文件的 CV
pub async fn download_cv(storage: web::Data<Arc<SeaOrmStorage>>) -> ActixResult<impl Responder> {
    let cv = match storage.first_cv_with_file().await {
        Ok(Some(cv)) => cv,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::CvNotFound,
                "No CV available",
            ));
        }
        Err(e) => return Ok(error_from_portfolio(&e)),
    };

    let bytes = match tokio::fs::read(&cv.file_path).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::CvNotFound,
                "CV file missing on disk",
            ));
        }
    };

    let filename = basename(&cv.file_path);
    let content_type = document_content_type(&extension(&cv.file_path));

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes))
}

/// GET /cv/{id}/file-info
pub async fn cv_file_info(
    storage: web::Data<Arc<SeaOrmStorage>>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    let cv = match storage.cv_by_id(&id).await {
        Ok(Some(cv)) => cv,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::CvNotFound,
                &format!("CV {} not found", id),
            ));
        }
        Err(e) => return Ok(error_from_portfolio(&e)),
    };

    if cv.file_path.is_empty() {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::CvNotFound,
            &format!("CV {} has no file", id),
        ));
    }

    let metadata = match tokio::fs::metadata(&cv.file_path).await {
        Ok(metadata) => metadata,
        Err(_) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::CvNotFound,
                "CV file missing on disk",
            ));
        }
    };

    let filename = basename(&cv.file_path).to_string();
    let ext = extension(&cv.file_path);
    let file_type = match ext.as_str() {
        "pdf" => "pdf",
        "doc" | "docx" => "word",
        _ => "unknown",
    };

    let last_modified = metadata
        .modified()
        .ok()
        .map(chrono::DateTime::<chrono::Utc>::from);

    Ok(success_response(CvFileInfoResponse {
        file_url: format!("/uploads/{}", filename),
        filename,
        file_type: file_type.to_string(),
        file_size: metadata.len(),
        last_modified,
        mimetype: document_content_type(&ext).to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_and_extension() {
        assert_eq!(basename("uploads/abc-cv.pdf"), "abc-cv.pdf");
        assert_eq!(basename("cv.pdf"), "cv.pdf");
        assert_eq!(extension("uploads/abc-cv.PDF"), "pdf");
        assert_eq!(extension("noext"), "");
    }

    #[test]
    fn test_document_content_type() {
        assert_eq!(document_content_type("pdf"), "application/pdf");
        assert_eq!(document_content_type("doc"), "application/msword");
        assert_eq!(
            document_content_type("docx"),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(document_content_type("txt"), "application/octet-stream");
    }
}
