//! 初始表迁移
//!
//! 创建作品集内容相关的全部表：
//! - users（管理员账号）
//! - heroes（首页个人资料）
//! - cvs（简历文档）
//! - project_categories / projects
//! - badges（可用状态徽章）
//! - contacts（访客留言）

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users 表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(32)
                            .not_null()
                            .default("ADMIN"),
                    )
                    .col(ColumnDef::new(Users::ResetToken).string_len(64).null())
                    .col(
                        ColumnDef::new(Users::ResetTokenExpires)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // heroes 表
        manager
            .create_table(
                Table::create()
                    .table(Heroes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Heroes::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Heroes::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Heroes::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Heroes::JobTitle).string_len(255).not_null())
                    .col(ColumnDef::new(Heroes::JobDescription).text().not_null())
                    .col(
                        ColumnDef::new(Heroes::CvPath)
                            .string_len(512)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Heroes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Heroes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // cvs 表
        manager
            .create_table(
                Table::create()
                    .table(Cvs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cvs::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Cvs::FilePath)
                            .string_len(512)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Cvs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cvs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // project_categories 表
        manager
            .create_table(
                Table::create()
                    .table(ProjectCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectCategories::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProjectCategories::Label)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectCategories::Icon)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectCategories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // projects 表
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Projects::Description).text().not_null())
                    .col(ColumnDef::new(Projects::Image).string_len(512).null())
                    .col(
                        ColumnDef::new(Projects::CategoryId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Projects::DeployUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(Projects::IconDeploy)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Projects::Technologies).json().not_null())
                    .col(
                        ColumnDef::new(Projects::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Projects::Repos).json().not_null())
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_category")
                            .from(Projects::Table, Projects::CategoryId)
                            .to(ProjectCategories::Table, ProjectCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // priority 排序索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_priority")
                    .table(Projects::Table)
                    .col(Projects::Priority)
                    .to_owned(),
            )
            .await?;

        // badges 表
        manager
            .create_table(
                Table::create()
                    .table(Badges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Badges::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Badges::Status)
                            .string_len(32)
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(
                        ColumnDef::new(Badges::AvailableFrom)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Badges::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Badges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Badges::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // contacts 表
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contacts::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contacts::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Contacts::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Contacts::Subject).string_len(512).not_null())
                    .col(ColumnDef::new(Contacts::Message).text().not_null())
                    .col(
                        ColumnDef::new(Contacts::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 未读留言查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contacts_is_read")
                    .table(Contacts::Table)
                    .col(Contacts::IsRead)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_contacts_is_read").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_projects_priority").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Badges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cvs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Heroes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Password,
    Role,
    ResetToken,
    ResetTokenExpires,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Heroes {
    Table,
    Id,
    FirstName,
    LastName,
    JobTitle,
    JobDescription,
    CvPath,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Cvs {
    Table,
    Id,
    FilePath,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProjectCategories {
    Table,
    Id,
    Label,
    Icon,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Title,
    Description,
    Image,
    CategoryId,
    DeployUrl,
    IconDeploy,
    Technologies,
    Priority,
    Repos,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Badges {
    Table,
    Id,
    Status,
    AvailableFrom,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    Name,
    Email,
    Subject,
    Message,
    IsRead,
    CreatedAt,
    UpdatedAt,
}
