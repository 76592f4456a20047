//! Contact submission persistence

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::{Contact, ContactInput};

use migration::entities::contact;

impl SeaOrmStorage {
    pub async fn create_contact(&self, input: ContactInput) -> Result<Contact> {
        let now = Utc::now();
        let model = contact::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(input.name),
            email: Set(input.email),
            subject: Set(input.subject),
            message: Set(input.message),
            is_read: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(Contact::from(model.insert(&self.db).await?))
    }

    pub async fn contacts_all(&self) -> Result<Vec<Contact>> {
        let models = contact::Entity::find()
            .order_by_desc(contact::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Contact::from).collect())
    }

    pub async fn contact_by_id(&self, id: &str) -> Result<Option<Contact>> {
        Ok(contact::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Contact::from))
    }

    pub async fn mark_contact_read(&self, id: &str) -> Result<Option<Contact>> {
        let Some(existing) = contact::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        active.is_read = Set(true);
        active.updated_at = Set(Utc::now());
        Ok(Some(Contact::from(active.update(&self.db).await?)))
    }

    pub async fn delete_contact(&self, id: &str) -> Result<Option<Contact>> {
        let Some(existing) = contact::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let removed = Contact::from(existing.clone());
        existing.delete(&self.db).await?;
        Ok(Some(removed))
    }

    pub async fn count_unread_contacts(&self) -> Result<u64> {
        Ok(contact::Entity::find()
            .filter(contact::Column::IsRead.eq(false))
            .count(&self.db)
            .await?)
    }
}
