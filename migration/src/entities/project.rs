use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: Option<String>,
    pub category_id: String,
    pub deploy_url: Option<String>,
    pub icon_deploy: String,
    /// JSON string array of technology ids
    #[sea_orm(column_type = "Json")]
    pub technologies: Json,
    pub priority: i32,
    /// JSON list of {label, url} repository links
    #[sea_orm(column_type = "Json")]
    pub repos: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project_category::Entity",
        from = "Column::CategoryId",
        to = "super::project_category::Column::Id"
    )]
    Category,
}

impl Related<super::project_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
