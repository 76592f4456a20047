//! 认证业务逻辑
//!
//! 凭据校验和密码重置流程。JWT 的签发在 API 层（`api::jwt`），
//! 这里只管数据库与邮件。

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::errors::Result;
use crate::mail::Mailer;
use crate::storage::SeaOrmStorage;
use crate::utils::generate_secure_token;
use crate::utils::password::{hash_password, verify_password};

use migration::entities::user;

pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
    mailer: Arc<Mailer>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>, mailer: Arc<Mailer>) -> Self {
        Self { storage, mailer }
    }

    /// 校验邮箱 + 密码；任何不匹配都归一为 None，不区分"账号不存在"
    pub async fn validate_user(&self, email: &str, password: &str) -> Result<Option<user::Model>> {
        let Some(user) = self.storage.user_by_email(email).await? else {
            return Ok(None);
        };

        match verify_password(password, &user.password) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                // 库里的哈希损坏属于运维问题，按认证失败处理
                warn!("Password verification error for {}: {}", email, e);
                Ok(None)
            }
        }
    }

    /// 发起密码重置：生成一次性 token 并发邮件
    ///
    /// 返回 false 表示用户不存在或邮件未发出；调用方对外统一回复，
    /// 避免暴露账号是否存在。
    pub async fn request_password_reset(
        &self,
        email: &str,
        frontend_url: &str,
        token_ttl_minutes: u64,
    ) -> Result<bool> {
        let Some(user) = self.storage.user_by_email(email).await? else {
            return Ok(false);
        };

        let token = generate_secure_token(32);
        let expires = Utc::now() + Duration::minutes(token_ttl_minutes as i64);
        let user = self.storage.set_reset_token(user, &token, expires).await?;

        let sent = self
            .mailer
            .send_password_reset(&user.email, &token, frontend_url)
            .await;
        if sent {
            info!("Password reset email sent to {}", user.email);
        }
        Ok(sent)
    }

    /// 用重置 token 设置新密码
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<bool> {
        let Some(user) = self.storage.user_by_valid_reset_token(token).await? else {
            return Ok(false);
        };

        let hash = hash_password(new_password)?;
        let user = self.storage.update_user_password(user, &hash).await?;

        // 确认邮件失败不影响重置本身
        self.mailer.send_password_changed(&user.email).await;
        info!("Password reset completed for {}", user.email);
        Ok(true)
    }
}
