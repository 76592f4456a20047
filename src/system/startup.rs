//! 启动阶段的数据初始化
//!
//! - users 表为空时按配置写入管理员账号
//! - badges 表为空时建一枚默认 AVAILABLE 徽章

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::SeaOrmStorage;
use crate::storage::models::{BadgeInput, BadgeStatus};
use crate::utils::password::hash_password;

pub async fn run_startup_tasks(storage: &Arc<SeaOrmStorage>, config: &AppConfig) -> Result<()> {
    ensure_admin_user(storage, config).await?;
    ensure_default_badge(storage).await?;
    Ok(())
}

async fn ensure_admin_user(storage: &Arc<SeaOrmStorage>, config: &AppConfig) -> Result<()> {
    if storage.count_users().await? > 0 {
        return Ok(());
    }

    if config.api.admin_password.is_empty() {
        warn!(
            "No admin user exists and api.admin_password is empty - admin login disabled until configured"
        );
        return Ok(());
    }

    let hash = hash_password(&config.api.admin_password)?;
    let user = storage
        .create_user(&config.api.admin_email, &hash, "ADMIN")
        .await?;
    info!("Admin user created: {}", user.email);
    Ok(())
}

async fn ensure_default_badge(storage: &Arc<SeaOrmStorage>) -> Result<()> {
    if storage.count_badges().await? > 0 {
        return Ok(());
    }

    storage
        .create_badge(BadgeInput {
            status: BadgeStatus::Available,
            available_from: None,
        })
        .await?;
    info!("Default badge created");
    Ok(())
}
