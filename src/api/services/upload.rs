//! 文件上传与访问
//!
//! multipart 落盘的公共逻辑 + /upload 端点 + /uploads/{filename} 访问。
//! 文件名统一重写为 uuid 前缀，扩展名白名单校验，超限直接 413。

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use futures_util::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::get_config;

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_response};
use super::types::UploadedFileResponse;

/// 全量白名单（/upload 通用端点）
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "pdf", "doc", "docx",
];

/// 图片白名单（项目配图）
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// 文档白名单（CV 文件）
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// 单文件上传结果
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub original_name: String,
    pub filename: String,
    pub path: String,
}

impl From<SavedFile> for UploadedFileResponse {
    fn from(file: SavedFile) -> Self {
        Self {
            originalname: file.original_name,
            filename: file.filename,
            path: file.path,
        }
    }
}

/// 去掉路径部分、过滤危险字符后的文件名
fn sanitize_filename(raw: &str) -> String {
    let base = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// 把一个 multipart 文件字段写到上传目录
///
/// 返回 Err 时直接携带可回给客户端的响应。
async fn save_field(
    field: &mut actix_multipart::Field,
    allowed_exts: &[&str],
) -> Result<SavedFile, HttpResponse> {
    let config = get_config();
    let uploads_dir = config.uploads.dir.clone();
    let max_bytes = config.uploads.max_file_bytes;

    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename().map(String::from))
        .unwrap_or_else(|| "file".to_string());

    let sanitized = sanitize_filename(&original_name);
    let Some(ext) = extension_of(&sanitized) else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::UnsupportedFileType,
            "File must have an extension",
        ));
    };

    if !allowed_exts.contains(&ext.as_str()) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::UnsupportedFileType,
            &format!("Unsupported file type: .{}", ext),
        ));
    }

    if let Err(e) = tokio::fs::create_dir_all(&uploads_dir).await {
        error!("Failed to create uploads dir {}: {}", uploads_dir, e);
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::UploadFailed,
            "Failed to store file",
        ));
    }

    let filename = format!("{}-{}", Uuid::new_v4(), sanitized);
    let path = format!("{}/{}", uploads_dir.trim_end_matches('/'), filename);

    let mut file = match tokio::fs::File::create(&path).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create upload file {}: {}", path, e);
            return Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::UploadFailed,
                "Failed to store file",
            ));
        }
    };

    let mut written: usize = 0;
    loop {
        let chunk = match field.try_next().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                warn!("Multipart read error: {}", e);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    "Malformed multipart payload",
                ));
            }
        };

        written += chunk.len();
        if written > max_bytes {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorCode::FileTooLarge,
                &format!("File exceeds the {} byte limit", max_bytes),
            ));
        }

        if let Err(e) = file.write_all(&chunk).await {
            error!("Failed to write upload chunk to {}: {}", path, e);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::UploadFailed,
                "Failed to store file",
            ));
        }
    }

    if let Err(e) = file.flush().await {
        error!("Failed to flush upload file {}: {}", path, e);
        let _ = tokio::fs::remove_file(&path).await;
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::UploadFailed,
            "Failed to store file",
        ));
    }

    Ok(SavedFile {
        original_name,
        filename,
        path,
    })
}

/// 取 multipart 里的第一个文件字段并落盘
pub async fn save_single_file(
    mut payload: Multipart,
    allowed_exts: &[&str],
) -> Result<SavedFile, HttpResponse> {
    loop {
        match payload.try_next().await {
            Ok(Some(mut field)) => {
                let has_filename = field
                    .content_disposition()
                    .is_some_and(|cd| cd.get_filename().is_some());
                if !has_filename {
                    continue;
                }
                return save_field(&mut field, allowed_exts).await;
            }
            Ok(None) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    "No file field in multipart payload",
                ));
            }
            Err(e) => {
                warn!("Multipart parse error: {}", e);
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    "Malformed multipart payload",
                ));
            }
        }
    }
}

/// 删除旧文件；失败只记日志（跟不上的孤儿文件交给运维清理）
pub fn remove_file_if_exists(path: &str) {
    if path.is_empty() {
        return;
    }
    if std::path::Path::new(path).exists() {
        if let Err(e) = std::fs::remove_file(path) {
            error!("Failed to delete old file {}: {}", path, e);
        }
    }
}

// ============ 端点 ============

/// POST /upload/file - 单文件
pub async fn upload_file(payload: Multipart) -> ActixResult<impl Responder> {
    match save_single_file(payload, ALLOWED_EXTENSIONS).await {
        Ok(saved) => Ok(success_response(UploadedFileResponse::from(saved))),
        Err(response) => Ok(response),
    }
}

/// POST /upload/files - 多文件，至多 10 个
pub async fn upload_files(mut payload: Multipart) -> ActixResult<impl Responder> {
    const MAX_FILES: usize = 10;
    let mut saved_files: Vec<UploadedFileResponse> = Vec::new();

    loop {
        match payload.try_next().await {
            Ok(Some(mut field)) => {
                let has_filename = field
                    .content_disposition()
                    .is_some_and(|cd| cd.get_filename().is_some());
                if !has_filename {
                    continue;
                }
                if saved_files.len() >= MAX_FILES {
                    return Ok(error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::BadRequest,
                        &format!("At most {} files per request", MAX_FILES),
                    ));
                }
                match save_field(&mut field, ALLOWED_EXTENSIONS).await {
                    Ok(saved) => saved_files.push(saved.into()),
                    Err(response) => return Ok(response),
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Multipart parse error: {}", e);
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    "Malformed multipart payload",
                ));
            }
        }
    }

    if saved_files.is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidMultipartData,
            "No file field in multipart payload",
        ));
    }

    Ok(success_response(saved_files))
}

/// GET /uploads/{filename} - 访问已上传文件
pub async fn serve_upload(path: web::Path<String>) -> ActixResult<impl Responder> {
    let filename = path.into_inner();

    // 只接受纯文件名，拒绝任何路径穿越
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Invalid filename",
        ));
    }

    let config = get_config();
    let full_path = format!("{}/{}", config.uploads.dir.trim_end_matches('/'), filename);

    match tokio::fs::read(&full_path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&filename).first_or_octet_stream();
            Ok(HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(bytes))
        }
        Err(_) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "File not found",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("resume.pdf"), "resume.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my résumé.pdf"), "my_r_sum_.pdf");
        assert_eq!(sanitize_filename("C:\\Users\\x\\cv.docx"), "cv.docx");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("cv.pdf").as_deref(), Some("pdf"));
        assert_eq!(extension_of("photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("noext"), None);
    }

    #[test]
    fn test_extension_whitelists() {
        assert!(ALLOWED_EXTENSIONS.contains(&"pdf"));
        assert!(IMAGE_EXTENSIONS.contains(&"webp"));
        assert!(!IMAGE_EXTENSIONS.contains(&"pdf"));
        assert!(DOCUMENT_EXTENSIONS.contains(&"docx"));
        assert!(!DOCUMENT_EXTENSIONS.contains(&"svg"));
    }
}
