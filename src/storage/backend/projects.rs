//! Project and category persistence
//!
//! 项目读取都会带上分类（原接口契约），列表按 priority 升序。

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder,
};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::{
    CategoryInput, CategoryPatch, Project, ProjectCategory, ProjectInput, ProjectPatch,
};

use migration::entities::{project, project_category};

impl SeaOrmStorage {
    pub async fn projects_all(&self) -> Result<Vec<Project>> {
        let rows = project::Entity::find()
            .find_also_related(project_category::Entity)
            .order_by_asc(project::Column::Priority)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, category)| Project::from_model(model, category))
            .collect())
    }

    pub async fn project_by_id(&self, id: &str) -> Result<Option<Project>> {
        let row = project::Entity::find_by_id(id)
            .find_also_related(project_category::Entity)
            .one(&self.db)
            .await?;

        Ok(row.map(|(model, category)| Project::from_model(model, category)))
    }

    pub async fn create_project(&self, input: ProjectInput) -> Result<Option<Project>> {
        // 分类必须存在，否则视为校验失败交给上层
        let Some(category) = project_category::Entity::find_by_id(&input.category_id)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let now = Utc::now();
        let model = project::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(input.title),
            description: Set(input.description),
            image: Set(input.image),
            category_id: Set(input.category_id),
            deploy_url: Set(input.deploy_url),
            icon_deploy: Set(input.icon_deploy),
            technologies: Set(serde_json::json!(input.technologies)),
            priority: Set(input.priority),
            repos: Set(input.repos),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(&self.db).await?;
        Ok(Some(Project::from_model(inserted, Some(category))))
    }

    pub async fn update_project(&self, id: &str, patch: ProjectPatch) -> Result<Option<Project>> {
        let Some(existing) = project::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(image) = patch.image {
            active.image = Set(Some(image));
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(deploy_url) = patch.deploy_url {
            active.deploy_url = Set(Some(deploy_url));
        }
        if let Some(icon_deploy) = patch.icon_deploy {
            active.icon_deploy = Set(icon_deploy);
        }
        if let Some(technologies) = patch.technologies {
            active.technologies = Set(serde_json::json!(technologies));
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority);
        }
        if let Some(repos) = patch.repos {
            active.repos = Set(repos);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await?;
        let category = project_category::Entity::find_by_id(&updated.category_id)
            .one(&self.db)
            .await?;
        Ok(Some(Project::from_model(updated, category)))
    }

    pub async fn delete_project(&self, id: &str) -> Result<Option<Project>> {
        let Some(existing) = project::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let removed = Project::from_model(existing.clone(), None);
        existing.delete(&self.db).await?;
        Ok(Some(removed))
    }

    pub async fn set_project_image(&self, id: &str, image: &str) -> Result<Option<Project>> {
        let Some(existing) = project::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.image = Set(Some(image.to_string()));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&self.db).await?;
        let category = project_category::Entity::find_by_id(&updated.category_id)
            .one(&self.db)
            .await?;
        Ok(Some(Project::from_model(updated, category)))
    }

    // ============ 分类 ============

    pub async fn categories_all(&self) -> Result<Vec<ProjectCategory>> {
        let models = project_category::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(ProjectCategory::from).collect())
    }

    pub async fn category_by_id(&self, id: &str) -> Result<Option<ProjectCategory>> {
        Ok(project_category::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(ProjectCategory::from))
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<ProjectCategory> {
        let now = Utc::now();
        let model = project_category::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            label: Set(input.label),
            icon: Set(input.icon),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(ProjectCategory::from(model.insert(&self.db).await?))
    }

    pub async fn update_category(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Option<ProjectCategory>> {
        let Some(existing) = project_category::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(label) = patch.label {
            active.label = Set(label);
        }
        if let Some(icon) = patch.icon {
            active.icon = Set(icon);
        }
        active.updated_at = Set(Utc::now());
        Ok(Some(ProjectCategory::from(active.update(&self.db).await?)))
    }

    pub async fn delete_category(&self, id: &str) -> Result<Option<ProjectCategory>> {
        let Some(existing) = project_category::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let removed = ProjectCategory::from(existing.clone());
        existing.delete(&self.db).await?;
        Ok(Some(removed))
    }
}
