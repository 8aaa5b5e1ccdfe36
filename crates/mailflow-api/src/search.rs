//! Search/filter query composer
//!
//! Builds one predicate pipeline per mail table from a shared filter, so
//! incoming and outgoing mail are queried with identical semantics even
//! though their column names differ (summary vs content, arrival vs send
//! date). Scope `all` runs both pipelines and merges by date descending.

use chrono::NaiveDate;
use mailflow_db::entities::{incoming_mail, outgoing_mail};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{MailKind, MailPriority, TagRef};

/// Hard cap on merged search results. Truncation keeps the globally most
/// recent items and is not an error condition; no pagination cursor exists.
pub const RESULT_CAP: usize = 100;

/// Which mail tables a search spans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MailScope {
    Incoming,
    Outgoing,
    #[default]
    All,
}

/// Search criteria; absent fields mean "no constraint"
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SearchFilter {
    /// Case-insensitive substring match against reference, subject, and the
    /// kind-specific body field
    pub search_term: Option<String>,
    pub mail_type: MailScope,
    pub category_id: Option<Uuid>,
    pub priority: Option<MailPriority>,
    /// A mail matches when its tag set intersects this set (OR semantics)
    pub tag_ids: Vec<Uuid>,
    /// Inclusive lower bound on the kind-specific date field
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the kind-specific date field
    pub date_to: Option<NaiveDate>,
}

impl SearchFilter {
    /// Reject contradictory filters up front instead of silently matching
    /// nothing.
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(format!(
                    "date_from ({from}) must not be after date_to ({to})"
                ));
            }
        }
        Ok(())
    }
}

/// Category annotation on a search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

/// Sender annotation on a search hit (incoming mail only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SenderRef {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One merged search result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchHit {
    /// Which table the hit came from
    pub mail_type: MailKind,
    pub id: Uuid,
    pub reference: String,
    pub subject: String,
    /// Summary for incoming hits, content for outgoing hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Arrival date for incoming hits, send date for outgoing hits
    pub mail_date: NaiveDate,
    pub priority: MailPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<SenderRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_url: Option<String>,
    pub tags: Vec<TagRef>,
}

/// The columns one mail table contributes to the shared predicate logic
pub(crate) struct MailColumns<C> {
    pub id: C,
    pub reference: C,
    pub subject: C,
    pub body: C,
    pub date: C,
    pub category: C,
    pub priority: C,
}

pub(crate) fn incoming_columns() -> MailColumns<incoming_mail::Column> {
    MailColumns {
        id: incoming_mail::Column::Id,
        reference: incoming_mail::Column::Reference,
        subject: incoming_mail::Column::Subject,
        body: incoming_mail::Column::Summary,
        date: incoming_mail::Column::ArrivalDate,
        category: incoming_mail::Column::CategoryId,
        priority: incoming_mail::Column::Priority,
    }
}

pub(crate) fn outgoing_columns() -> MailColumns<outgoing_mail::Column> {
    MailColumns {
        id: outgoing_mail::Column::Id,
        reference: outgoing_mail::Column::Reference,
        subject: outgoing_mail::Column::Subject,
        body: outgoing_mail::Column::Content,
        date: outgoing_mail::Column::SendDate,
        category: outgoing_mail::Column::CategoryId,
        priority: outgoing_mail::Column::Priority,
    }
}

/// Compose the WHERE condition for one mail table.
///
/// `allowed_ids` is the pre-resolved set of mail ids carrying at least one of
/// the filter's tags; `None` means the filter has no tag constraint. Callers
/// must short-circuit to an empty result when the resolved set is empty
/// rather than pass an empty slice here.
pub(crate) fn compose_condition<C: ColumnTrait>(
    cols: &MailColumns<C>,
    filter: &SearchFilter,
    allowed_ids: Option<&[Uuid]>,
) -> Condition {
    let mut condition = Condition::all();

    if let Some(term) = filter.search_term.as_deref() {
        let term = term.trim();
        if !term.is_empty() {
            condition = condition.add(
                Condition::any()
                    .add(cols.reference.contains(term))
                    .add(cols.subject.contains(term))
                    .add(cols.body.contains(term)),
            );
        }
    }

    if let Some(category_id) = filter.category_id {
        condition = condition.add(cols.category.eq(category_id));
    }

    if let Some(priority) = filter.priority {
        let db_priority: mailflow_db::entities::MailPriority = priority.into();
        condition = condition.add(cols.priority.eq(db_priority));
    }

    if let Some(from) = filter.date_from {
        condition = condition.add(cols.date.gte(from));
    }

    if let Some(to) = filter.date_to {
        condition = condition.add(cols.date.lte(to));
    }

    if let Some(ids) = allowed_ids {
        condition = condition.add(cols.id.is_in(ids.iter().copied()));
    }

    condition
}

/// Merge per-table hits into one list sorted by mail date descending, then
/// apply the global cap. Capping after the merge keeps the globally most
/// recent items instead of favoring one table.
pub(crate) fn merge_and_cap(mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.sort_by(|a, b| b.mail_date.cmp(&a.mail_date));
    hits.truncate(RESULT_CAP);
    hits
}
