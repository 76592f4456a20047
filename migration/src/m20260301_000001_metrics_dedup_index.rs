//! 去重探测复合索引
//!
//! 每次写入前都会按 (metric_type, ip_address, created_at 当日范围) 探测
//! 当天是否已有同类记录，单列索引不够用，补一个复合索引。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metrics_type_ip_time")
                    .table(Metrics::Table)
                    .col(Metrics::MetricType)
                    .col(Metrics::IpAddress)
                    .col(Metrics::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_metrics_type_ip_time").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Metrics {
    #[sea_orm(iden = "metrics")]
    Table,
    MetricType,
    IpAddress,
    CreatedAt,
}
