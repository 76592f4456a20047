use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http, web};
use tracing::{error, info};

use folio_backend::analytics::{MetricStore, MetricsRecorder};
use folio_backend::api::middleware::TrafficMetrics;
use folio_backend::api::services::{AppStartTime, routes};
use folio_backend::config;
use folio_backend::mail::Mailer;
use folio_backend::services::{AuthService, ContactService, MetricsQueryService};
use folio_backend::storage::SeaOrmStorage;
use folio_backend::storage::backend::infer_backend_from_url;
use folio_backend::system;

fn build_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
            http::header::ACCEPT,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::init_config();
    let _log_guard = system::init_logging(config);

    // 存储后端
    let backend_name = match infer_backend_from_url(&config.database.database_url) {
        Ok(name) => name,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let storage = match SeaOrmStorage::new(&config.database.database_url, &backend_name).await {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            eprintln!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    // 指标与业务服务
    let metric_store: Arc<dyn MetricStore> = storage.clone();
    let recorder = Arc::new(MetricsRecorder::new(metric_store));
    let mailer = Arc::new(Mailer::new(config.mail.clone(), recorder.clone()));
    let auth_service = Arc::new(AuthService::new(storage.clone(), mailer.clone()));
    let contact_service = Arc::new(ContactService::new(
        storage.clone(),
        recorder.clone(),
        mailer.clone(),
    ));
    let query_service = Arc::new(MetricsQueryService::new(storage.clone()));

    // 初始数据
    if let Err(e) = system::run_startup_tasks(&storage, config).await {
        error!("Startup tasks failed: {}", e);
        std::process::exit(1);
    }

    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(recorder.clone()))
            .app_data(web::Data::new(query_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(contact_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            // CORS 在最外层，指标中间件其次（wrap 后注册的先执行）
            .wrap(TrafficMetrics)
            .wrap(build_cors(&config.api.allowed_origins))
            .configure(routes::configure)
    })
    .workers(config.server.cpu_count)
    .bind(bind_address)?
    .run()
    .await
}
