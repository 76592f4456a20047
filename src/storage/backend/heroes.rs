//! Hero profile persistence

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, ModelTrait};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::{Hero, HeroInput, HeroPatch};

use migration::entities::hero;

impl SeaOrmStorage {
    pub async fn heroes_all(&self) -> Result<Vec<Hero>> {
        let models = hero::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(Hero::from).collect())
    }

    pub async fn hero_by_id(&self, id: &str) -> Result<Option<Hero>> {
        Ok(hero::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Hero::from))
    }

    pub async fn create_hero(&self, input: HeroInput) -> Result<Hero> {
        let now = Utc::now();
        let model = hero::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            job_title: Set(input.job_title),
            job_description: Set(input.job_description),
            cv_path: Set(input.cv_path.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(Hero::from(model.insert(&self.db).await?))
    }

    pub async fn update_hero(&self, id: &str, patch: HeroPatch) -> Result<Option<Hero>> {
        let Some(existing) = hero::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(first_name) = patch.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = patch.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(job_title) = patch.job_title {
            active.job_title = Set(job_title);
        }
        if let Some(job_description) = patch.job_description {
            active.job_description = Set(job_description);
        }
        if let Some(cv_path) = patch.cv_path {
            active.cv_path = Set(cv_path);
        }
        active.updated_at = Set(Utc::now());

        Ok(Some(Hero::from(active.update(&self.db).await?)))
    }

    pub async fn delete_hero(&self, id: &str) -> Result<Option<Hero>> {
        let Some(existing) = hero::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let removed = Hero::from(existing.clone());
        existing.delete(&self.db).await?;
        Ok(Some(removed))
    }

    pub async fn set_hero_cv_path(&self, id: &str, cv_path: &str) -> Result<Option<Hero>> {
        let Some(existing) = hero::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.cv_path = Set(cv_path.to_string());
        active.updated_at = Set(Utc::now());
        Ok(Some(Hero::from(active.update(&self.db).await?)))
    }
}
