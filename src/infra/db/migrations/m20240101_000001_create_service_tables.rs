//! Migration: create the service and instance tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PikaService::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PikaService::ServiceId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PikaService::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Instances reference their service; removal is cascaded by the
        // service repository, not by the database.
        manager
            .create_table(
                Table::create()
                    .table(PikaInstance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PikaInstance::InstanceId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PikaInstance::ServiceId).integer().not_null())
                    .col(ColumnDef::new(PikaInstance::Name).string().not_null())
                    .col(ColumnDef::new(PikaInstance::UrlHealthCheck).string().not_null())
                    .col(ColumnDef::new(PikaInstance::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pika_instance_service_id")
                            .from(PikaInstance::Table, PikaInstance::ServiceId)
                            .to(PikaService::Table, PikaService::ServiceId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pika_instance_service_id")
                    .table(PikaInstance::Table)
                    .col(PikaInstance::ServiceId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PikaInstance::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PikaService::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PikaService {
    Table,
    ServiceId,
    Name,
}

#[derive(Iden)]
enum PikaInstance {
    Table,
    InstanceId,
    ServiceId,
    Name,
    UrlHealthCheck,
    Status,
}
