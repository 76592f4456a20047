//! Availability badge persistence

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
};
use std::str::FromStr;
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::{Badge, BadgeInput, BadgePatch, BadgeStatus};

use migration::entities::badge;

impl SeaOrmStorage {
    pub async fn badges_all(&self) -> Result<Vec<Badge>> {
        let models = badge::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(Badge::from).collect())
    }

    pub async fn badge_by_id(&self, id: &str) -> Result<Option<Badge>> {
        Ok(badge::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Badge::from))
    }

    pub async fn count_badges(&self) -> Result<u64> {
        Ok(badge::Entity::find().count(&self.db).await?)
    }

    pub async fn create_badge(&self, input: BadgeInput) -> Result<Badge> {
        let is_available = input.status.resolve_availability(input.available_from);
        let now = Utc::now();
        let model = badge::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            status: Set(input.status.to_string()),
            available_from: Set(input.available_from),
            is_available: Set(is_available),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(Badge::from(model.insert(&self.db).await?))
    }

    pub async fn update_badge(&self, id: &str, patch: BadgePatch) -> Result<Option<Badge>> {
        let Some(existing) = badge::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        // 以 patch 的字段覆盖后重算可用性
        let status = match patch.status {
            Some(status) => status,
            None => BadgeStatus::from_str(&existing.status).unwrap_or(BadgeStatus::Available),
        };
        let available_from = patch.available_from.or(existing.available_from);
        let is_available = status.resolve_availability(available_from);

        let mut active = existing.into_active_model();
        active.status = Set(status.to_string());
        active.available_from = Set(available_from);
        active.is_available = Set(is_available);
        active.updated_at = Set(Utc::now());
        Ok(Some(Badge::from(active.update(&self.db).await?)))
    }

    pub async fn delete_badge(&self, id: &str) -> Result<Option<Badge>> {
        let Some(existing) = badge::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let removed = Badge::from(existing.clone());
        existing.delete(&self.db).await?;
        Ok(Some(removed))
    }
}
