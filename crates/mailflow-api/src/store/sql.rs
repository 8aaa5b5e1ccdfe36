//! SeaORM-backed [`MailStore`] implementation
//!
//! One store per process, holding the pooled connection. Multi-row writes
//! (mail + tag fan-out, tag deletion) run in transactions so the join table
//! can never disagree with the mail tables.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use mailflow_db::entities::{
    self, category, incoming_mail, mail_tag, outgoing_mail, sender, setting, tag, user,
};
use mailflow_db::entities::prelude::{
    Category as Categories, IncomingMail as IncomingMails, MailTag as MailTags,
    OutgoingMail as OutgoingMails, Sender as Senders, Setting as Settings, Tag as Tags,
    User as Users,
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    AppSettings, Category, CreateCategoryRequest, CreateIncomingMailRequest,
    CreateOutgoingMailRequest, CreateSenderRequest, CreateTagRequest, CreateUserRequest,
    IncomingMail, OutgoingMail, Permission, Sender, Statistics, Tag, TagRef,
    UpdateCategoryRequest, UpdateIncomingMailRequest, UpdateOutgoingMailRequest,
    UpdateSenderRequest, UpdateTagRequest, UpdateUserRequest, User,
};
use crate::search::{
    compose_condition, incoming_columns, merge_and_cap, outgoing_columns, CategoryRef,
    MailScope, SearchFilter, SearchHit, SenderRef, RESULT_CAP,
};
use crate::store::{MailStore, StoreError, UserWithSecret};

pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn categories_by_id(
        &self,
        ids: BTreeSet<Uuid>,
    ) -> Result<HashMap<Uuid, category::Model>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = Categories::find()
            .filter(category::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|c| (c.id, c)).collect())
    }

    async fn senders_by_id(
        &self,
        ids: BTreeSet<Uuid>,
    ) -> Result<HashMap<Uuid, sender::Model>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = Senders::find()
            .filter(sender::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|s| (s.id, s)).collect())
    }

    /// Resolve the full tag objects for a batch of mail ids in two queries.
    async fn tags_by_mail(
        &self,
        mail_ids: &[Uuid],
        kind: entities::MailKind,
    ) -> Result<HashMap<Uuid, Vec<TagRef>>, StoreError> {
        if mail_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let links = MailTags::find()
            .filter(mail_tag::Column::MailId.is_in(mail_ids.iter().copied()))
            .filter(mail_tag::Column::MailType.eq(kind))
            .all(&self.db)
            .await?;
        let tag_ids: BTreeSet<Uuid> = links.iter().map(|l| l.tag_id).collect();
        if tag_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let tags: HashMap<Uuid, tag::Model> = Tags::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let mut by_mail: HashMap<Uuid, Vec<TagRef>> = HashMap::new();
        for link in links {
            if let Some(t) = tags.get(&link.tag_id) {
                by_mail
                    .entry(link.mail_id)
                    .or_default()
                    .push(TagRef::from(t.clone()));
            }
        }
        Ok(by_mail)
    }

    async fn decorate_incoming(
        &self,
        mails: Vec<incoming_mail::Model>,
    ) -> Result<Vec<IncomingMail>, StoreError> {
        let ids: Vec<Uuid> = mails.iter().map(|m| m.id).collect();
        let categories = self
            .categories_by_id(mails.iter().map(|m| m.category_id).collect())
            .await?;
        let senders = self
            .senders_by_id(mails.iter().map(|m| m.sender_id).collect())
            .await?;
        let mut tags = self.tags_by_mail(&ids, entities::MailKind::Incoming).await?;

        Ok(mails
            .into_iter()
            .map(|m| {
                let category = categories.get(&m.category_id);
                let sender = senders.get(&m.sender_id);
                IncomingMail {
                    id: m.id,
                    reference: m.reference,
                    subject: m.subject,
                    summary: m.summary,
                    category_id: m.category_id,
                    category_name: category.map(|c| c.name.clone()),
                    category_color: category.map(|c| c.color.clone()),
                    sender_id: m.sender_id,
                    sender_name: sender.map(|s| s.name.clone()),
                    sender_email: sender.and_then(|s| s.email.clone()),
                    arrival_date: m.arrival_date,
                    priority: m.priority.into(),
                    scan_url: m.scan_url,
                    is_processed: m.is_processed,
                    created_by: m.created_by,
                    created_at: m.created_at,
                    tags: tags.remove(&m.id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn decorate_outgoing(
        &self,
        mails: Vec<outgoing_mail::Model>,
    ) -> Result<Vec<OutgoingMail>, StoreError> {
        let ids: Vec<Uuid> = mails.iter().map(|m| m.id).collect();
        let categories = self
            .categories_by_id(mails.iter().map(|m| m.category_id).collect())
            .await?;
        let mut tags = self.tags_by_mail(&ids, entities::MailKind::Outgoing).await?;

        Ok(mails
            .into_iter()
            .map(|m| {
                let category = categories.get(&m.category_id);
                OutgoingMail {
                    id: m.id,
                    reference: m.reference,
                    subject: m.subject,
                    content: m.content,
                    category_id: m.category_id,
                    category_name: category.map(|c| c.name.clone()),
                    category_color: category.map(|c| c.color.clone()),
                    send_date: m.send_date,
                    priority: m.priority.into(),
                    scan_url: m.scan_url,
                    is_processed: m.is_processed,
                    created_by: m.created_by,
                    created_at: m.created_at,
                    tags: tags.remove(&m.id).unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn fetch_incoming(&self, id: Uuid) -> Result<IncomingMail, StoreError> {
        let mail = IncomingMails::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("incoming mail"))?;
        let mut decorated = self.decorate_incoming(vec![mail]).await?;
        decorated.pop().ok_or(StoreError::NotFound("incoming mail"))
    }

    async fn fetch_outgoing(&self, id: Uuid) -> Result<OutgoingMail, StoreError> {
        let mail = OutgoingMails::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("outgoing mail"))?;
        let mut decorated = self.decorate_outgoing(vec![mail]).await?;
        decorated.pop().ok_or(StoreError::NotFound("outgoing mail"))
    }

    /// Resolve the mail ids carrying at least one of the filter's tags,
    /// split by mail kind. `None` when the filter has no tag constraint.
    async fn allowed_ids_for_tags(
        &self,
        tag_ids: &[Uuid],
    ) -> Result<Option<(Vec<Uuid>, Vec<Uuid>)>, StoreError> {
        if tag_ids.is_empty() {
            return Ok(None);
        }
        let unique: BTreeSet<Uuid> = tag_ids.iter().copied().collect();
        let links = MailTags::find()
            .filter(mail_tag::Column::TagId.is_in(unique))
            .all(&self.db)
            .await?;
        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        for link in links {
            match link.mail_type {
                entities::MailKind::Incoming => incoming.push(link.mail_id),
                entities::MailKind::Outgoing => outgoing.push(link.mail_id),
            }
        }
        incoming.sort_unstable();
        incoming.dedup();
        outgoing.sort_unstable();
        outgoing.dedup();
        Ok(Some((incoming, outgoing)))
    }

    async fn search_incoming(
        &self,
        filter: &SearchFilter,
        allowed: Option<&[Uuid]>,
    ) -> Result<Vec<SearchHit>, StoreError> {
        // Tag filter matched nothing on this side; no row can qualify.
        if matches!(allowed, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }
        let mails = IncomingMails::find()
            .filter(compose_condition(&incoming_columns(), filter, allowed))
            .order_by_desc(incoming_mail::Column::ArrivalDate)
            .limit(RESULT_CAP as u64)
            .all(&self.db)
            .await?;
        let decorated = self.decorate_incoming(mails).await?;
        Ok(decorated
            .into_iter()
            .map(|m| SearchHit {
                mail_type: crate::models::MailKind::Incoming,
                id: m.id,
                reference: m.reference,
                subject: m.subject,
                body: m.summary,
                mail_date: m.arrival_date,
                priority: m.priority,
                category: m.category_name.map(|name| CategoryRef {
                    id: m.category_id,
                    name,
                    color: m.category_color.unwrap_or_default(),
                }),
                sender: m.sender_name.map(|name| SenderRef {
                    id: m.sender_id,
                    name,
                    email: m.sender_email,
                }),
                scan_url: m.scan_url,
                tags: m.tags,
            })
            .collect())
    }

    async fn search_outgoing(
        &self,
        filter: &SearchFilter,
        allowed: Option<&[Uuid]>,
    ) -> Result<Vec<SearchHit>, StoreError> {
        if matches!(allowed, Some(ids) if ids.is_empty()) {
            return Ok(Vec::new());
        }
        let mails = OutgoingMails::find()
            .filter(compose_condition(&outgoing_columns(), filter, allowed))
            .order_by_desc(outgoing_mail::Column::SendDate)
            .limit(RESULT_CAP as u64)
            .all(&self.db)
            .await?;
        let decorated = self.decorate_outgoing(mails).await?;
        Ok(decorated
            .into_iter()
            .map(|m| SearchHit {
                mail_type: crate::models::MailKind::Outgoing,
                id: m.id,
                reference: m.reference,
                subject: m.subject,
                body: m.content,
                mail_date: m.send_date,
                priority: m.priority,
                category: m.category_name.map(|name| CategoryRef {
                    id: m.category_id,
                    name,
                    color: m.category_color.unwrap_or_default(),
                }),
                sender: None,
                scan_url: m.scan_url,
                tags: m.tags,
            })
            .collect())
    }
}

fn permissions_json(permissions: &[Permission]) -> Result<serde_json::Value, StoreError> {
    to_json(permissions)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::InvalidInput(format!("invalid JSON: {e}")))
}

async fn ensure_category<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), StoreError> {
    if Categories::find_by_id(id).count(conn).await? == 0 {
        return Err(StoreError::InvalidInput(format!("unknown category id {id}")));
    }
    Ok(())
}

async fn ensure_sender<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), StoreError> {
    if Senders::find_by_id(id).count(conn).await? == 0 {
        return Err(StoreError::InvalidInput(format!("unknown sender id {id}")));
    }
    Ok(())
}

/// Insert join rows for a mail, validating every tag id first. Duplicate ids
/// in the request collapse to one row each.
async fn attach_tags<C: ConnectionTrait>(
    conn: &C,
    mail_id: Uuid,
    kind: entities::MailKind,
    tag_ids: &[Uuid],
) -> Result<(), StoreError> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let unique: BTreeSet<Uuid> = tag_ids.iter().copied().collect();
    let known = Tags::find()
        .filter(tag::Column::Id.is_in(unique.iter().copied()))
        .count(conn)
        .await?;
    if known != unique.len() as u64 {
        return Err(StoreError::InvalidInput(
            "request references unknown tag ids".to_string(),
        ));
    }
    let rows = unique.into_iter().map(|tag_id| mail_tag::ActiveModel {
        id: Set(Uuid::new_v4()),
        mail_id: Set(mail_id),
        mail_type: Set(kind),
        tag_id: Set(tag_id),
    });
    MailTags::insert_many(rows).exec(conn).await?;
    Ok(())
}

/// Replace-all-tags: drop the mail's current join rows, then attach the new
/// set. Runs inside the caller's transaction.
async fn replace_tags<C: ConnectionTrait>(
    conn: &C,
    mail_id: Uuid,
    kind: entities::MailKind,
    tag_ids: &[Uuid],
) -> Result<(), StoreError> {
    MailTags::delete_many()
        .filter(mail_tag::Column::MailId.eq(mail_id))
        .filter(mail_tag::Column::MailType.eq(kind))
        .exec(conn)
        .await?;
    attach_tags(conn, mail_id, kind, tag_ids).await
}

#[async_trait]
impl MailStore for SqlStore {
    async fn find_user_for_login(&self, email: &str) -> Result<Option<UserWithSecret>, StoreError> {
        let found = Users::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(found.map(|model| UserWithSecret {
            password_hash: model.password_hash.clone(),
            user: model.into(),
        }))
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), StoreError> {
        let model = Users::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("user"))?;
        let mut active: user::ActiveModel = model.into();
        active.last_login = Set(Some(Utc::now()));
        active.update(&self.db).await?;
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(Users::find().count(&self.db).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = Users::find()
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        let model = Users::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("user"))?;
        Ok(model.into())
    }

    async fn create_user(
        &self,
        req: &CreateUserRequest,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let existing = Users::find()
            .filter(user::Column::Email.eq(req.email.as_str()))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(StoreError::Conflict(format!(
                "email '{}' is already in use",
                req.email
            )));
        }

        let permissions = match &req.permissions {
            Some(explicit) => permissions_json(explicit)?,
            None => permissions_json(&Permission::defaults_for(req.role))?,
        };
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(req.email.clone()),
            password_hash: Set(password_hash),
            display_name: Set(req.display_name.clone()),
            role: Set(req.role.into()),
            permissions: Set(permissions),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok(model.into())
    }

    async fn update_user(
        &self,
        id: Uuid,
        req: &UpdateUserRequest,
        password_hash: Option<String>,
    ) -> Result<User, StoreError> {
        let model = Users::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("user"))?;
        let mut active: user::ActiveModel = model.into();

        if let Some(display_name) = &req.display_name {
            active.display_name = Set(display_name.clone());
        }
        if let Some(role) = req.role {
            active.role = Set(role.into());
        }
        // A role change without explicit permissions resets to the new
        // role's defaults.
        match (&req.permissions, req.role) {
            (Some(explicit), _) => active.permissions = Set(permissions_json(explicit)?),
            (None, Some(role)) => {
                active.permissions = Set(permissions_json(&Permission::defaults_for(role))?)
            }
            (None, None) => {}
        }
        if let Some(is_active) = req.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(hash) = password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(model.into())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let result = Users::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("user"));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = Categories::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_category(
        &self,
        req: &CreateCategoryRequest,
        created_by: Option<Uuid>,
    ) -> Result<Category, StoreError> {
        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.clone()),
            description: Set(req.description.clone()),
            color: Set(req.color.clone()),
            is_active: Set(true),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(model.into())
    }

    async fn update_category(
        &self,
        id: Uuid,
        req: &UpdateCategoryRequest,
    ) -> Result<Category, StoreError> {
        let model = Categories::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("category"))?;
        let mut active: category::ActiveModel = model.into();
        if let Some(name) = &req.name {
            active.name = Set(name.clone());
        }
        if let Some(description) = &req.description {
            active.description = Set(Some(description.clone()));
        }
        if let Some(color) = &req.color {
            active.color = Set(color.clone());
        }
        if let Some(is_active) = req.is_active {
            active.is_active = Set(is_active);
        }
        let model = active.update(&self.db).await?;
        Ok(model.into())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), StoreError> {
        let incoming = IncomingMails::find()
            .filter(incoming_mail::Column::CategoryId.eq(id))
            .count(&self.db)
            .await?;
        let outgoing = OutgoingMails::find()
            .filter(outgoing_mail::Column::CategoryId.eq(id))
            .count(&self.db)
            .await?;
        let referenced = incoming + outgoing;
        if referenced > 0 {
            return Err(StoreError::Conflict(format!(
                "category is referenced by {referenced} mail record(s)"
            )));
        }
        let result = Categories::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("category"));
        }
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, StoreError> {
        let rows = Tags::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_tag(
        &self,
        req: &CreateTagRequest,
        created_by: Option<Uuid>,
    ) -> Result<Tag, StoreError> {
        let model = tag::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.clone()),
            kind: Set(req.kind.into()),
            color: Set(req.color.clone()),
            is_active: Set(true),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(model.into())
    }

    async fn update_tag(&self, id: Uuid, req: &UpdateTagRequest) -> Result<Tag, StoreError> {
        let model = Tags::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("tag"))?;
        let mut active: tag::ActiveModel = model.into();
        if let Some(name) = &req.name {
            active.name = Set(name.clone());
        }
        if let Some(kind) = req.kind {
            active.kind = Set(kind.into());
        }
        if let Some(color) = &req.color {
            active.color = Set(color.clone());
        }
        if let Some(is_active) = req.is_active {
            active.is_active = Set(is_active);
        }
        let model = active.update(&self.db).await?;
        Ok(model.into())
    }

    async fn delete_tag(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        MailTags::delete_many()
            .filter(mail_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await?;
        let result = Tags::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("tag"));
        }
        txn.commit().await?;
        Ok(())
    }

    async fn list_senders(&self) -> Result<Vec<Sender>, StoreError> {
        let rows = Senders::find()
            .order_by_asc(sender::Column::Name)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_sender(
        &self,
        req: &CreateSenderRequest,
        created_by: Option<Uuid>,
    ) -> Result<Sender, StoreError> {
        let model = sender::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.clone()),
            email: Set(req.email.clone()),
            phone: Set(req.phone.clone()),
            fax: Set(req.fax.clone()),
            organization: Set(req.organization.clone()),
            is_active: Set(true),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(model.into())
    }

    async fn update_sender(
        &self,
        id: Uuid,
        req: &UpdateSenderRequest,
    ) -> Result<Sender, StoreError> {
        let model = Senders::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("sender"))?;
        let mut active: sender::ActiveModel = model.into();
        if let Some(name) = &req.name {
            active.name = Set(name.clone());
        }
        if let Some(email) = &req.email {
            active.email = Set(Some(email.clone()));
        }
        if let Some(phone) = &req.phone {
            active.phone = Set(Some(phone.clone()));
        }
        if let Some(fax) = &req.fax {
            active.fax = Set(Some(fax.clone()));
        }
        if let Some(organization) = &req.organization {
            active.organization = Set(Some(organization.clone()));
        }
        if let Some(is_active) = req.is_active {
            active.is_active = Set(is_active);
        }
        let model = active.update(&self.db).await?;
        Ok(model.into())
    }

    async fn delete_sender(&self, id: Uuid) -> Result<(), StoreError> {
        let referenced = IncomingMails::find()
            .filter(incoming_mail::Column::SenderId.eq(id))
            .count(&self.db)
            .await?;
        if referenced > 0 {
            return Err(StoreError::Conflict(format!(
                "sender is referenced by {referenced} mail record(s)"
            )));
        }
        let result = Senders::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("sender"));
        }
        Ok(())
    }

    async fn list_incoming_mails(&self) -> Result<Vec<IncomingMail>, StoreError> {
        let mails = IncomingMails::find()
            .order_by_desc(incoming_mail::Column::ArrivalDate)
            .all(&self.db)
            .await?;
        self.decorate_incoming(mails).await
    }

    async fn create_incoming_mail(
        &self,
        req: &CreateIncomingMailRequest,
        created_by: Option<Uuid>,
    ) -> Result<IncomingMail, StoreError> {
        let txn = self.db.begin().await?;
        ensure_category(&txn, req.category_id).await?;
        ensure_sender(&txn, req.sender_id).await?;

        let mail = incoming_mail::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference: Set(req.reference.clone()),
            subject: Set(req.subject.clone()),
            summary: Set(req.summary.clone()),
            category_id: Set(req.category_id),
            sender_id: Set(req.sender_id),
            arrival_date: Set(req.arrival_date),
            priority: Set(req.priority.into()),
            scan_url: Set(req.scan_url.clone()),
            is_processed: Set(false),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;
        attach_tags(&txn, mail.id, entities::MailKind::Incoming, &req.tags).await?;
        txn.commit().await?;

        self.fetch_incoming(mail.id).await
    }

    async fn update_incoming_mail(
        &self,
        id: Uuid,
        req: &UpdateIncomingMailRequest,
    ) -> Result<IncomingMail, StoreError> {
        let txn = self.db.begin().await?;
        let model = IncomingMails::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound("incoming mail"))?;
        let mut active: incoming_mail::ActiveModel = model.into();

        if let Some(reference) = &req.reference {
            active.reference = Set(reference.clone());
        }
        if let Some(subject) = &req.subject {
            active.subject = Set(subject.clone());
        }
        if let Some(summary) = &req.summary {
            active.summary = Set(Some(summary.clone()));
        }
        if let Some(category_id) = req.category_id {
            ensure_category(&txn, category_id).await?;
            active.category_id = Set(category_id);
        }
        if let Some(sender_id) = req.sender_id {
            ensure_sender(&txn, sender_id).await?;
            active.sender_id = Set(sender_id);
        }
        if let Some(arrival_date) = req.arrival_date {
            active.arrival_date = Set(arrival_date);
        }
        if let Some(priority) = req.priority {
            active.priority = Set(priority.into());
        }
        if let Some(scan_url) = &req.scan_url {
            active.scan_url = Set(Some(scan_url.clone()));
        }
        if let Some(is_processed) = req.is_processed {
            active.is_processed = Set(is_processed);
        }
        active.update(&txn).await?;

        // Presence of `tags` means replace-all; omission leaves tags alone.
        if let Some(tag_ids) = &req.tags {
            replace_tags(&txn, id, entities::MailKind::Incoming, tag_ids).await?;
        }
        txn.commit().await?;

        self.fetch_incoming(id).await
    }

    async fn delete_incoming_mail(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        MailTags::delete_many()
            .filter(mail_tag::Column::MailId.eq(id))
            .filter(mail_tag::Column::MailType.eq(entities::MailKind::Incoming))
            .exec(&txn)
            .await?;
        let result = IncomingMails::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("incoming mail"));
        }
        txn.commit().await?;
        Ok(())
    }

    async fn list_outgoing_mails(&self) -> Result<Vec<OutgoingMail>, StoreError> {
        let mails = OutgoingMails::find()
            .order_by_desc(outgoing_mail::Column::SendDate)
            .all(&self.db)
            .await?;
        self.decorate_outgoing(mails).await
    }

    async fn create_outgoing_mail(
        &self,
        req: &CreateOutgoingMailRequest,
        created_by: Option<Uuid>,
    ) -> Result<OutgoingMail, StoreError> {
        let txn = self.db.begin().await?;
        ensure_category(&txn, req.category_id).await?;

        let mail = outgoing_mail::ActiveModel {
            id: Set(Uuid::new_v4()),
            reference: Set(req.reference.clone()),
            subject: Set(req.subject.clone()),
            content: Set(req.content.clone()),
            category_id: Set(req.category_id),
            send_date: Set(req.send_date),
            priority: Set(req.priority.into()),
            scan_url: Set(req.scan_url.clone()),
            is_processed: Set(false),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;
        attach_tags(&txn, mail.id, entities::MailKind::Outgoing, &req.tags).await?;
        txn.commit().await?;

        self.fetch_outgoing(mail.id).await
    }

    async fn update_outgoing_mail(
        &self,
        id: Uuid,
        req: &UpdateOutgoingMailRequest,
    ) -> Result<OutgoingMail, StoreError> {
        let txn = self.db.begin().await?;
        let model = OutgoingMails::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound("outgoing mail"))?;
        let mut active: outgoing_mail::ActiveModel = model.into();

        if let Some(reference) = &req.reference {
            active.reference = Set(reference.clone());
        }
        if let Some(subject) = &req.subject {
            active.subject = Set(subject.clone());
        }
        if let Some(content) = &req.content {
            active.content = Set(Some(content.clone()));
        }
        if let Some(category_id) = req.category_id {
            ensure_category(&txn, category_id).await?;
            active.category_id = Set(category_id);
        }
        if let Some(send_date) = req.send_date {
            active.send_date = Set(send_date);
        }
        if let Some(priority) = req.priority {
            active.priority = Set(priority.into());
        }
        if let Some(scan_url) = &req.scan_url {
            active.scan_url = Set(Some(scan_url.clone()));
        }
        if let Some(is_processed) = req.is_processed {
            active.is_processed = Set(is_processed);
        }
        active.update(&txn).await?;

        if let Some(tag_ids) = &req.tags {
            replace_tags(&txn, id, entities::MailKind::Outgoing, tag_ids).await?;
        }
        txn.commit().await?;

        self.fetch_outgoing(id).await
    }

    async fn delete_outgoing_mail(&self, id: Uuid) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;
        MailTags::delete_many()
            .filter(mail_tag::Column::MailId.eq(id))
            .filter(mail_tag::Column::MailType.eq(entities::MailKind::Outgoing))
            .exec(&txn)
            .await?;
        let result = OutgoingMails::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("outgoing mail"));
        }
        txn.commit().await?;
        Ok(())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<SearchHit>, StoreError> {
        filter.validate().map_err(StoreError::InvalidInput)?;

        let allowed = self.allowed_ids_for_tags(&filter.tag_ids).await?;
        let (incoming_allowed, outgoing_allowed) = match &allowed {
            Some((incoming, outgoing)) => (Some(incoming.as_slice()), Some(outgoing.as_slice())),
            None => (None, None),
        };

        let hits = match filter.mail_type {
            MailScope::Incoming => self.search_incoming(filter, incoming_allowed).await?,
            MailScope::Outgoing => self.search_outgoing(filter, outgoing_allowed).await?,
            MailScope::All => {
                // Independent tables, queried concurrently.
                let (incoming, outgoing) = tokio::join!(
                    self.search_incoming(filter, incoming_allowed),
                    self.search_outgoing(filter, outgoing_allowed)
                );
                let mut hits = incoming?;
                hits.extend(outgoing?);
                hits
            }
        };
        Ok(merge_and_cap(hits))
    }

    async fn statistics(&self) -> Result<Statistics, StoreError> {
        let today = Utc::now().date_naive();
        let total_incoming = IncomingMails::find().count(&self.db).await?;
        let total_outgoing = OutgoingMails::find().count(&self.db).await?;
        let today_incoming = IncomingMails::find()
            .filter(incoming_mail::Column::ArrivalDate.eq(today))
            .count(&self.db)
            .await?;
        let today_outgoing = OutgoingMails::find()
            .filter(outgoing_mail::Column::SendDate.eq(today))
            .count(&self.db)
            .await?;
        Ok(Statistics {
            total_incoming,
            total_outgoing,
            total_today: today_incoming + today_outgoing,
        })
    }

    async fn load_settings(&self) -> Result<AppSettings, StoreError> {
        let rows = Settings::find().all(&self.db).await?;
        let mut doc = serde_json::Map::new();
        for row in rows {
            // Values are stored JSON-encoded; tolerate legacy bare strings.
            let value = serde_json::from_str(&row.value)
                .unwrap_or(serde_json::Value::String(row.value.clone()));
            doc.insert(row.key, value);
        }
        // Missing or unreadable keys fall back to field defaults.
        Ok(serde_json::from_value(serde_json::Value::Object(doc)).unwrap_or_default())
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<AppSettings, StoreError> {
        let doc = to_json(settings)?;
        let object = match doc {
            serde_json::Value::Object(map) => map,
            _ => return Err(StoreError::InvalidInput("settings must be an object".into())),
        };
        let rows: Vec<setting::ActiveModel> = object
            .into_iter()
            .map(|(key, value)| setting::ActiveModel {
                key: Set(key),
                value: Set(value.to_string()),
            })
            .collect();
        Settings::insert_many(rows)
            .on_conflict(
                OnConflict::column(setting::Column::Key)
                    .update_column(setting::Column::Value)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        self.load_settings().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MailPriority, TagKind};
    use chrono::NaiveDate;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    async fn store() -> SqlStore {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        mailflow_db::Migrator::up(&db, None).await.unwrap();
        SqlStore::new(db)
    }

    async fn seed_refs(store: &SqlStore) -> (Uuid, Uuid) {
        let category = store
            .create_category(
                &CreateCategoryRequest {
                    name: "Admin".into(),
                    description: None,
                    color: "#3B82F6".into(),
                },
                None,
            )
            .await
            .unwrap();
        let sender = store
            .create_sender(
                &CreateSenderRequest {
                    name: "City Hall".into(),
                    email: Some("contact@city.example".into()),
                    phone: None,
                    fax: None,
                    organization: None,
                },
                None,
            )
            .await
            .unwrap();
        (category.id, sender.id)
    }

    fn incoming_req(
        reference: &str,
        category_id: Uuid,
        sender_id: Uuid,
        day: u32,
        tags: Vec<Uuid>,
    ) -> CreateIncomingMailRequest {
        CreateIncomingMailRequest {
            reference: reference.into(),
            subject: format!("Subject {reference}"),
            summary: None,
            category_id,
            sender_id,
            arrival_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            priority: MailPriority::Normal,
            scan_url: None,
            tags,
        }
    }

    #[tokio::test]
    async fn test_tag_replace_swaps_exact_set() {
        let store = store().await;
        let (category_id, sender_id) = seed_refs(&store).await;

        let mut tag_ids = Vec::new();
        for name in ["a", "b", "c"] {
            let tag = store
                .create_tag(
                    &CreateTagRequest {
                        name: name.into(),
                        kind: TagKind::Nature,
                        color: "#000000".into(),
                    },
                    None,
                )
                .await
                .unwrap();
            tag_ids.push(tag.id);
        }
        let (a, b, c) = (tag_ids[0], tag_ids[1], tag_ids[2]);

        let mail = store
            .create_incoming_mail(
                &incoming_req("REF-001", category_id, sender_id, 1, vec![a, b]),
                None,
            )
            .await
            .unwrap();
        assert_eq!(mail.tags.len(), 2);

        let updated = store
            .update_incoming_mail(
                mail.id,
                &UpdateIncomingMailRequest {
                    tags: Some(vec![b, c]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let mut got: Vec<Uuid> = updated.tags.iter().map(|t| t.id).collect();
        got.sort();
        let mut want = vec![b, c];
        want.sort();
        assert_eq!(got, want);

        // Omitting the field leaves tags untouched.
        let untouched = store
            .update_incoming_mail(
                mail.id,
                &UpdateIncomingMailRequest {
                    subject: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(untouched.tags.len(), 2);

        // An explicit empty list clears everything.
        let cleared = store
            .update_incoming_mail(
                mail.id,
                &UpdateIncomingMailRequest {
                    tags: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.tags.is_empty());
    }

    #[tokio::test]
    async fn test_search_tag_filter_uses_or_semantics() {
        let store = store().await;
        let (category_id, sender_id) = seed_refs(&store).await;

        let urgent = store
            .create_tag(
                &CreateTagRequest {
                    name: "Urgent".into(),
                    kind: TagKind::Priority,
                    color: "#EF4444".into(),
                },
                None,
            )
            .await
            .unwrap();
        let confidential = store
            .create_tag(
                &CreateTagRequest {
                    name: "Confidential".into(),
                    kind: TagKind::Nature,
                    color: "#6B7280".into(),
                },
                None,
            )
            .await
            .unwrap();

        store
            .create_incoming_mail(
                &incoming_req("REF-A", category_id, sender_id, 1, vec![urgent.id]),
                None,
            )
            .await
            .unwrap();
        store
            .create_incoming_mail(
                &incoming_req("REF-B", category_id, sender_id, 2, vec![confidential.id]),
                None,
            )
            .await
            .unwrap();
        store
            .create_incoming_mail(
                &incoming_req("REF-C", category_id, sender_id, 3, vec![]),
                None,
            )
            .await
            .unwrap();

        // Either tag qualifies; the untagged mail does not.
        let hits = store
            .search(&SearchFilter {
                tag_ids: vec![urgent.id, confidential.id],
                ..Default::default()
            })
            .await
            .unwrap();
        let mut refs: Vec<&str> = hits.iter().map(|h| h.reference.as_str()).collect();
        refs.sort();
        assert_eq!(refs, vec!["REF-A", "REF-B"]);
    }

    #[tokio::test]
    async fn test_delete_referenced_category_conflicts() {
        let store = store().await;
        let (category_id, sender_id) = seed_refs(&store).await;
        store
            .create_incoming_mail(
                &incoming_req("REF-001", category_id, sender_id, 1, vec![]),
                None,
            )
            .await
            .unwrap();

        let err = store.delete_category(category_id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_settings_round_trip_with_defaults() {
        let store = store().await;
        assert_eq!(store.load_settings().await.unwrap(), AppSettings::default());

        let mut settings = AppSettings::default();
        settings.auto_rename = true;
        settings.notifications.urgent_only = true;
        let saved = store.save_settings(&settings).await.unwrap();
        assert_eq!(saved, settings);
        assert_eq!(store.load_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_create_mail_with_unknown_category_is_rejected() {
        let store = store().await;
        let (_, sender_id) = seed_refs(&store).await;
        let err = store
            .create_incoming_mail(
                &incoming_req("REF-001", Uuid::new_v4(), sender_id, 1, vec![]),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        // Nothing was inserted.
        assert!(store.list_incoming_mails().await.unwrap().is_empty());
    }
}
