//! CV document persistence

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, ModelTrait};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::Cv;

use migration::entities::cv;

impl SeaOrmStorage {
    pub async fn cvs_all(&self) -> Result<Vec<Cv>> {
        let models = cv::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(Cv::from).collect())
    }

    pub async fn cv_by_id(&self, id: &str) -> Result<Option<Cv>> {
        Ok(cv::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Cv::from))
    }

    pub async fn create_cv(&self, file_path: &str) -> Result<Cv> {
        let now = Utc::now();
        let model = cv::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            file_path: Set(file_path.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(Cv::from(model.insert(&self.db).await?))
    }

    pub async fn update_cv_file_path(&self, id: &str, file_path: &str) -> Result<Option<Cv>> {
        let Some(existing) = cv::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.file_path = Set(file_path.to_string());
        active.updated_at = Set(Utc::now());
        Ok(Some(Cv::from(active.update(&self.db).await?)))
    }

    pub async fn delete_cv(&self, id: &str) -> Result<Option<Cv>> {
        let Some(existing) = cv::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let removed = Cv::from(existing.clone());
        existing.delete(&self.db).await?;
        Ok(Some(removed))
    }

    /// 第一份真正带文件的 CV（下载端点用）
    pub async fn first_cv_with_file(&self) -> Result<Option<Cv>> {
        let models = cv::Entity::find().all(&self.db).await?;
        Ok(models
            .into_iter()
            .map(Cv::from)
            .find(|cv| !cv.file_path.trim().is_empty()))
    }
}
