//! Consolidated initial schema migration

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. Create users table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Email, 255).not_null().unique_key())
                    .col(string_len(User::PasswordHash, 255).not_null())
                    .col(string_len(User::DisplayName, 255).not_null())
                    .col(string_len(User::Role, 32).not_null().default("user"))
                    .col(json(User::Permissions).not_null())
                    .col(boolean(User::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone_null(User::LastLogin))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(User::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_email")
                    .table(User::Table)
                    .col(User::Email)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. Create categories table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(uuid(Category::Id).primary_key())
                    .col(string_len(Category::Name, 255).not_null())
                    .col(text_null(Category::Description))
                    .col(string_len(Category::Color, 32).not_null())
                    .col(boolean(Category::IsActive).not_null().default(true))
                    .col(uuid_null(Category::CreatedBy))
                    .col(
                        timestamp_with_time_zone(Category::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_created_by")
                            .from(Category::Table, Category::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_categories_name")
                    .table(Category::Table)
                    .col(Category::Name)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. Create tags table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(uuid(Tag::Id).primary_key())
                    .col(string_len(Tag::Name, 255).not_null())
                    .col(string_len(Tag::Kind, 32).not_null())
                    .col(string_len(Tag::Color, 32).not_null())
                    .col(boolean(Tag::IsActive).not_null().default(true))
                    .col(uuid_null(Tag::CreatedBy))
                    .col(
                        timestamp_with_time_zone(Tag::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_created_by")
                            .from(Tag::Table, Tag::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 4. Create senders table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Sender::Table)
                    .if_not_exists()
                    .col(uuid(Sender::Id).primary_key())
                    .col(string_len(Sender::Name, 255).not_null())
                    .col(string_len_null(Sender::Email, 255))
                    .col(string_len_null(Sender::Phone, 64))
                    .col(string_len_null(Sender::Fax, 64))
                    .col(string_len_null(Sender::Organization, 255))
                    .col(boolean(Sender::IsActive).not_null().default(true))
                    .col(uuid_null(Sender::CreatedBy))
                    .col(
                        timestamp_with_time_zone(Sender::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_senders_created_by")
                            .from(Sender::Table, Sender::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 5. Create incoming_mails table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(IncomingMail::Table)
                    .if_not_exists()
                    .col(uuid(IncomingMail::Id).primary_key())
                    .col(string_len(IncomingMail::Reference, 255).not_null())
                    .col(string_len(IncomingMail::Subject, 512).not_null())
                    .col(text_null(IncomingMail::Summary))
                    .col(uuid(IncomingMail::CategoryId).not_null())
                    .col(uuid(IncomingMail::SenderId).not_null())
                    .col(date(IncomingMail::ArrivalDate).not_null())
                    .col(
                        string_len(IncomingMail::Priority, 32)
                            .not_null()
                            .default("normal"),
                    )
                    .col(text_null(IncomingMail::ScanUrl))
                    .col(boolean(IncomingMail::IsProcessed).not_null().default(false))
                    .col(uuid_null(IncomingMail::CreatedBy))
                    .col(
                        timestamp_with_time_zone(IncomingMail::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incoming_mails_category_id")
                            .from(IncomingMail::Table, IncomingMail::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incoming_mails_sender_id")
                            .from(IncomingMail::Table, IncomingMail::SenderId)
                            .to(Sender::Table, Sender::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_incoming_mails_created_by")
                            .from(IncomingMail::Table, IncomingMail::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_incoming_mails_arrival_date")
                    .table(IncomingMail::Table)
                    .col(IncomingMail::ArrivalDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_incoming_mails_category_id")
                    .table(IncomingMail::Table)
                    .col(IncomingMail::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_incoming_mails_sender_id")
                    .table(IncomingMail::Table)
                    .col(IncomingMail::SenderId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 6. Create outgoing_mails table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(OutgoingMail::Table)
                    .if_not_exists()
                    .col(uuid(OutgoingMail::Id).primary_key())
                    .col(string_len(OutgoingMail::Reference, 255).not_null())
                    .col(string_len(OutgoingMail::Subject, 512).not_null())
                    .col(text_null(OutgoingMail::Content))
                    .col(uuid(OutgoingMail::CategoryId).not_null())
                    .col(date(OutgoingMail::SendDate).not_null())
                    .col(
                        string_len(OutgoingMail::Priority, 32)
                            .not_null()
                            .default("normal"),
                    )
                    .col(text_null(OutgoingMail::ScanUrl))
                    .col(boolean(OutgoingMail::IsProcessed).not_null().default(false))
                    .col(uuid_null(OutgoingMail::CreatedBy))
                    .col(
                        timestamp_with_time_zone(OutgoingMail::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_outgoing_mails_category_id")
                            .from(OutgoingMail::Table, OutgoingMail::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_outgoing_mails_created_by")
                            .from(OutgoingMail::Table, OutgoingMail::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_outgoing_mails_send_date")
                    .table(OutgoingMail::Table)
                    .col(OutgoingMail::SendDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_outgoing_mails_category_id")
                    .table(OutgoingMail::Table)
                    .col(OutgoingMail::CategoryId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 7. Create mail_tags junction table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(MailTag::Table)
                    .if_not_exists()
                    .col(uuid(MailTag::Id).primary_key())
                    .col(uuid(MailTag::MailId).not_null())
                    .col(string_len(MailTag::MailType, 32).not_null())
                    .col(uuid(MailTag::TagId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mail_tags_tag_id")
                            .from(MailTag::Table, MailTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A (mail_id, mail_type, tag_id) triple must be unique; the join
        // rows carry no other payload.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_mail_tags_mail_type_tag")
                    .table(MailTag::Table)
                    .col(MailTag::MailId)
                    .col(MailTag::MailType)
                    .col(MailTag::TagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_mail_tags_tag_id")
                    .table(MailTag::Table)
                    .col(MailTag::TagId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 8. Create settings key/value table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Setting::Table)
                    .if_not_exists()
                    .col(string_len(Setting::Key, 255).primary_key())
                    .col(text(Setting::Value).not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Setting::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MailTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OutgoingMail::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomingMail::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sender::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    PasswordHash,
    DisplayName,
    Role,
    Permissions,
    IsActive,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Category {
    #[sea_orm(iden = "categories")]
    Table,
    Id,
    Name,
    Description,
    Color,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tag {
    #[sea_orm(iden = "tags")]
    Table,
    Id,
    Name,
    Kind,
    Color,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sender {
    #[sea_orm(iden = "senders")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    Fax,
    Organization,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum IncomingMail {
    #[sea_orm(iden = "incoming_mails")]
    Table,
    Id,
    Reference,
    Subject,
    Summary,
    CategoryId,
    SenderId,
    ArrivalDate,
    Priority,
    ScanUrl,
    IsProcessed,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OutgoingMail {
    #[sea_orm(iden = "outgoing_mails")]
    Table,
    Id,
    Reference,
    Subject,
    Content,
    CategoryId,
    SendDate,
    Priority,
    ScanUrl,
    IsProcessed,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MailTag {
    #[sea_orm(iden = "mail_tags")]
    Table,
    Id,
    MailId,
    MailType,
    TagId,
}

#[derive(DeriveIden)]
enum Setting {
    #[sea_orm(iden = "settings")]
    Table,
    Key,
    Value,
}
