//! 流量指标表迁移
//!
//! 创建 metrics 表用于存储每次访问的观测记录，包括：
//! - 指标类型（VISIT / BOT / CV_VISIT / CV_CLICK / ...，开放集合，存为字符串）
//! - 规范化路径
//! - 可选的用户、UserAgent、IP 地址
//! - 分类细节的 JSON metadata

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Metrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Metrics::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Metrics::MetricType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Metrics::Path).string_len(512).not_null())
                    .col(ColumnDef::new(Metrics::UserId).string_len(36).null())
                    .col(ColumnDef::new(Metrics::UserAgent).text().null())
                    .col(ColumnDef::new(Metrics::IpAddress).string_len(45).null())
                    .col(ColumnDef::new(Metrics::Metadata).json().null())
                    .col(
                        ColumnDef::new(Metrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Metrics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 类型过滤索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metrics_type")
                    .table(Metrics::Table)
                    .col(Metrics::MetricType)
                    .to_owned(),
            )
            .await?;

        // 时间范围查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metrics_created_at")
                    .table(Metrics::Table)
                    .col(Metrics::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 路径查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metrics_path")
                    .table(Metrics::Table)
                    .col(Metrics::Path)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_metrics_path").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_metrics_created_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_metrics_type").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Metrics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Metrics {
    #[sea_orm(iden = "metrics")]
    Table,
    Id,
    MetricType,
    Path,
    UserId,
    UserAgent,
    IpAddress,
    Metadata,
    CreatedAt,
    UpdatedAt,
}
