//! 路由配置
//!
//! 按功能模块拆分 scope。写保护用 Route 级 AdminAuth 包装：
//! 公开读（作品集前台要用）和管理员写混在同一个 scope 里，
//! scope 级中间件做不了这种粒度。

use actix_web::web;

use crate::api::middleware::AdminAuth;

use super::auth::{
    confirm_password_reset, login, login_rate_limiter, logout, me, refresh_rate_limiter,
    refresh_token, request_password_reset, verify_token,
};
use super::badges::{create_badge, find_all_badges, find_badge, remove_badge, update_badge};
use super::contact::{
    find_all_contacts, find_contact, mark_contact_read, remove_contact, submit_contact,
    unread_contact_count,
};
use super::cv::{
    create_cv, cv_file_info, download_cv, find_all_cvs, find_cv, remove_cv, replace_cv_file,
    update_cv, upload_cv_file,
};
use super::health::health_check;
use super::heroes::{
    create_hero, download_hero_cv, find_all_heroes, find_hero, remove_hero, replace_hero_cv,
    update_hero, upload_hero_cv,
};
use super::metrics::{
    create_metric, get_bot_metric_count, get_bot_metrics, get_bot_metrics_by_path,
    get_cv_click_metric_count, get_cv_visit_metric_count, get_metric_count, get_metrics,
    get_metrics_by_path, get_metrics_by_user, get_real_user_metric_count, get_real_user_metrics,
    get_real_user_metrics_by_path, get_unique_bots_count, get_unique_cv_clicks_count,
    get_unique_users_count, track_cv_click, track_visit,
};
use super::projects::{
    create_category, create_project, find_all_categories, find_all_projects, find_category,
    find_project, project_image, remove_category, remove_project, replace_project_image,
    update_category, update_project, upload_project_image,
};
use super::upload::{serve_upload, upload_file, upload_files};

/// 认证路由 `/auth`
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route(
            "/refresh",
            web::post().to(refresh_token).wrap(refresh_rate_limiter()),
        )
        .route("/logout", web::post().to(logout).wrap(AdminAuth))
        .route("/verify", web::get().to(verify_token).wrap(AdminAuth))
        .route("/me", web::get().to(me).wrap(AdminAuth))
        .route(
            "/password-reset/request",
            web::post().to(request_password_reset),
        )
        .route(
            "/password-reset/confirm",
            web::post().to(confirm_password_reset),
        )
}

/// 指标路由 `/metrics`
///
/// 写入端点公开（访客埋点），查询端点全部管理员。
pub fn metrics_routes() -> actix_web::Scope {
    web::scope("/metrics")
        // 写入
        .route("", web::post().to(create_metric))
        .route("/visit", web::post().to(track_visit))
        .route("/cv-click", web::post().to(track_cv_click))
        // 查询（静态段在前，避免吃掉子路径）
        .route("/path", web::get().to(get_metrics_by_path).wrap(AdminAuth))
        .route("/user", web::get().to(get_metrics_by_user).wrap(AdminAuth))
        .route("/count", web::get().to(get_metric_count).wrap(AdminAuth))
        .route(
            "/bots/path",
            web::get().to(get_bot_metrics_by_path).wrap(AdminAuth),
        )
        .route(
            "/bots/count",
            web::get().to(get_bot_metric_count).wrap(AdminAuth),
        )
        .route("/bots", web::get().to(get_bot_metrics).wrap(AdminAuth))
        .route(
            "/real-users/path",
            web::get().to(get_real_user_metrics_by_path).wrap(AdminAuth),
        )
        .route(
            "/real-users/count",
            web::get().to(get_real_user_metric_count).wrap(AdminAuth),
        )
        .route(
            "/real-users",
            web::get().to(get_real_user_metrics).wrap(AdminAuth),
        )
        .route(
            "/unique-users/count",
            web::get().to(get_unique_users_count).wrap(AdminAuth),
        )
        .route(
            "/unique-bots/count",
            web::get().to(get_unique_bots_count).wrap(AdminAuth),
        )
        .route(
            "/unique-cv-clicks/count",
            web::get().to(get_unique_cv_clicks_count).wrap(AdminAuth),
        )
        .route(
            "/cv/count",
            web::get().to(get_cv_visit_metric_count).wrap(AdminAuth),
        )
        .route(
            "/cv-clicks/count",
            web::get().to(get_cv_click_metric_count).wrap(AdminAuth),
        )
        .route("", web::get().to(get_metrics).wrap(AdminAuth))
}

/// Hero 路由 `/heroes`
pub fn hero_routes() -> actix_web::Scope {
    web::scope("/heroes")
        .route("", web::get().to(find_all_heroes))
        .route("", web::post().to(create_hero).wrap(AdminAuth))
        .route(
            "/upload-cv",
            web::post().to(upload_hero_cv).wrap(AdminAuth),
        )
        .route(
            "/{id}/cv",
            web::patch().to(replace_hero_cv).wrap(AdminAuth),
        )
        .route("/{id}/cv", web::get().to(download_hero_cv))
        .route("/{id}", web::get().to(find_hero))
        .route("/{id}", web::patch().to(update_hero).wrap(AdminAuth))
        .route("/{id}", web::delete().to(remove_hero).wrap(AdminAuth))
}

/// CV 路由 `/cv`
pub fn cv_routes() -> actix_web::Scope {
    web::scope("/cv")
        .route("/all", web::get().to(find_all_cvs))
        .route(
            "/upload-file",
            web::post().to(upload_cv_file).wrap(AdminAuth),
        )
        .route(
            "/{id}/file",
            web::patch().to(replace_cv_file).wrap(AdminAuth),
        )
        .route("/{id}/file-info", web::get().to(cv_file_info))
        .route("/{id}", web::get().to(find_cv))
        .route("/{id}", web::patch().to(update_cv).wrap(AdminAuth))
        .route("/{id}", web::delete().to(remove_cv).wrap(AdminAuth))
        .route("", web::get().to(download_cv))
        .route("", web::post().to(create_cv).wrap(AdminAuth))
}

/// 项目路由 `/projects`
pub fn project_routes() -> actix_web::Scope {
    web::scope("/projects")
        .route("", web::get().to(find_all_projects))
        .route("", web::post().to(create_project).wrap(AdminAuth))
        // categories 要先于 /{id} 注册
        .route("/categories", web::get().to(find_all_categories))
        .route(
            "/categories",
            web::post().to(create_category).wrap(AdminAuth),
        )
        .route("/categories/{id}", web::get().to(find_category))
        .route(
            "/categories/{id}",
            web::patch().to(update_category).wrap(AdminAuth),
        )
        .route(
            "/categories/{id}",
            web::delete().to(remove_category).wrap(AdminAuth),
        )
        .route(
            "/upload-image",
            web::post().to(upload_project_image).wrap(AdminAuth),
        )
        .route(
            "/{id}/image",
            web::patch().to(replace_project_image).wrap(AdminAuth),
        )
        .route("/{id}/image", web::get().to(project_image))
        .route("/{id}", web::get().to(find_project))
        .route("/{id}", web::patch().to(update_project).wrap(AdminAuth))
        .route("/{id}", web::delete().to(remove_project).wrap(AdminAuth))
}

/// 徽章路由 `/badges`
pub fn badge_routes() -> actix_web::Scope {
    web::scope("/badges")
        .route("", web::get().to(find_all_badges))
        .route("", web::post().to(create_badge).wrap(AdminAuth))
        .route("/{id}", web::get().to(find_badge))
        .route("/{id}", web::patch().to(update_badge).wrap(AdminAuth))
        .route("/{id}", web::delete().to(remove_badge).wrap(AdminAuth))
}

/// 留言路由 `/contact`
pub fn contact_routes() -> actix_web::Scope {
    web::scope("/contact")
        .route("", web::post().to(submit_contact))
        .route("", web::get().to(find_all_contacts).wrap(AdminAuth))
        .route(
            "/unread-count",
            web::get().to(unread_contact_count).wrap(AdminAuth),
        )
        .route(
            "/{id}/read",
            web::put().to(mark_contact_read).wrap(AdminAuth),
        )
        .route("/{id}", web::get().to(find_contact).wrap(AdminAuth))
        .route("/{id}", web::delete().to(remove_contact).wrap(AdminAuth))
}

/// 上传路由 `/upload`
pub fn upload_routes() -> actix_web::Scope {
    web::scope("/upload")
        .route("/file", web::post().to(upload_file).wrap(AdminAuth))
        .route("/files", web::post().to(upload_files).wrap(AdminAuth))
}

/// 注册全部路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth_routes())
        .service(metrics_routes())
        .service(hero_routes())
        .service(cv_routes())
        .service(project_routes())
        .service(badge_routes())
        .service(contact_routes())
        .service(upload_routes())
        .route("/uploads/{filename}", web::get().to(serve_upload))
        .route("/health", web::get().to(health_check));
}
