//! Admin user persistence

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::user;

impl SeaOrmStorage {
    pub async fn user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    pub async fn user_by_id(&self, id: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn count_users(&self) -> Result<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<user::Model> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            password: Set(password_hash.to_string()),
            role: Set(role.to_string()),
            reset_token: Set(None),
            reset_token_expires: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn update_user_password(
        &self,
        existing: user::Model,
        password_hash: &str,
    ) -> Result<user::Model> {
        let mut active = existing.into_active_model();
        active.password = Set(password_hash.to_string());
        active.reset_token = Set(None);
        active.reset_token_expires = Set(None);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    pub async fn set_reset_token(
        &self,
        existing: user::Model,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<user::Model> {
        let mut active = existing.into_active_model();
        active.reset_token = Set(Some(token.to_string()));
        active.reset_token_expires = Set(Some(expires));
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }

    /// 按重置 token 找用户；过期 token 视同不存在
    pub async fn user_by_valid_reset_token(&self, token: &str) -> Result<Option<user::Model>> {
        let found = user::Entity::find()
            .filter(user::Column::ResetToken.eq(token))
            .one(&self.db)
            .await?;

        Ok(found.filter(|u| {
            u.reset_token_expires
                .is_some_and(|expires| expires > Utc::now())
        }))
    }
}
