//! Integration tests for the unified search endpoint

mod common;

use axum::{http::StatusCode, Router};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::*;
use mailflow_api::models::{Category, MailKind, MailPriority, Sender};
use mailflow_api::search::SearchHit;

struct Fixture {
    category_id: Uuid,
    other_category_id: Uuid,
}

/// Seed one category pair, one sender, three incoming mails and two
/// outgoing mails with staggered dates.
async fn seed_mailbox(app: &Router, token: &str) -> Fixture {
    let category: Category = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/categories",
                Some(token),
                json!({ "name": "Admin", "color": "#3B82F6" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let other: Category = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/categories",
                Some(token),
                json!({ "name": "Legal", "color": "#10B981" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let sender: Sender = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/senders",
                Some(token),
                json!({ "name": "City Hall" }),
            ))
            .await
            .unwrap(),
    )
    .await;

    let incoming = [
        ("REF-001", "Water bill", "2025-01-01", "urgent", category.id),
        ("REF-002", "Permit notice", "2025-01-03", "normal", category.id),
        ("REF-003", "Court summons", "2025-01-05", "high", other.id),
    ];
    for (reference, subject, date, priority, category_id) in incoming {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/incoming-mails",
                Some(token),
                json!({
                    "reference": reference,
                    "subject": subject,
                    "category_id": category_id,
                    "sender_id": sender.id,
                    "arrival_date": date,
                    "priority": priority,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let outgoing = [
        ("REF-101", "Permit response", "2025-01-02", category.id),
        ("REF-102", "Legal reply", "2025-01-04", other.id),
    ];
    for (reference, subject, date, category_id) in outgoing {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/outgoing-mails",
                Some(token),
                json!({
                    "reference": reference,
                    "subject": subject,
                    "content": "Dear resident",
                    "category_id": category_id,
                    "send_date": date,
                    "priority": "normal",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    Fixture {
        category_id: category.id,
        other_category_id: other.id,
    }
}

async fn search(app: &Router, token: &str, filter: serde_json::Value) -> Vec<SearchHit> {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/search", Some(token), filter))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_search_by_reference_finds_single_hit() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;
    seed_mailbox(&app, &token).await;

    let hits = search(&app, &token, json!({ "search_term": "REF-001" })).await;

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].reference, "REF-001");
    assert_eq!(hits[0].priority, MailPriority::Urgent);
    assert_eq!(hits[0].mail_type, MailKind::Incoming);
    let category = hits[0].category.as_ref().unwrap();
    assert_eq!(category.name, "Admin");
    let sender = hits[0].sender.as_ref().unwrap();
    assert_eq!(sender.name, "City Hall");
}

#[tokio::test]
async fn test_search_all_merges_both_directions_sorted_by_date() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;
    seed_mailbox(&app, &token).await;

    let hits = search(&app, &token, json!({})).await;

    // All five mails, incoming and outgoing interleaved by date.
    assert_eq!(hits.len(), 5);
    let refs: Vec<&str> = hits.iter().map(|h| h.reference.as_str()).collect();
    assert_eq!(refs, vec!["REF-003", "REF-102", "REF-002", "REF-101", "REF-001"]);
    for pair in hits.windows(2) {
        assert!(pair[0].mail_date >= pair[1].mail_date);
    }
    assert!(hits.iter().any(|h| h.mail_type == MailKind::Incoming));
    assert!(hits.iter().any(|h| h.mail_type == MailKind::Outgoing));
}

#[tokio::test]
async fn test_search_scope_restricts_to_one_direction() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;
    seed_mailbox(&app, &token).await;

    let incoming = search(&app, &token, json!({ "mail_type": "incoming" })).await;
    assert_eq!(incoming.len(), 3);
    assert!(incoming.iter().all(|h| h.mail_type == MailKind::Incoming));

    let outgoing = search(&app, &token, json!({ "mail_type": "outgoing" })).await;
    assert_eq!(outgoing.len(), 2);
    assert!(outgoing.iter().all(|h| h.mail_type == MailKind::Outgoing));
    // Outgoing hits carry no sender.
    assert!(outgoing.iter().all(|h| h.sender.is_none()));
}

#[tokio::test]
async fn test_search_category_priority_and_date_filters() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;
    let fixture = seed_mailbox(&app, &token).await;

    let by_category = search(
        &app,
        &token,
        json!({ "category_id": fixture.other_category_id }),
    )
    .await;
    let refs: Vec<&str> = by_category.iter().map(|h| h.reference.as_str()).collect();
    assert_eq!(refs, vec!["REF-003", "REF-102"]);

    let main_category = search(
        &app,
        &token,
        json!({ "category_id": fixture.category_id }),
    )
    .await;
    assert_eq!(main_category.len(), 3);

    let by_priority = search(&app, &token, json!({ "priority": "urgent" })).await;
    assert_eq!(by_priority.len(), 1);
    assert_eq!(by_priority[0].reference, "REF-001");

    // Inclusive date bounds.
    let by_date = search(
        &app,
        &token,
        json!({ "date_from": "2025-01-02", "date_to": "2025-01-04" }),
    )
    .await;
    let refs: Vec<&str> = by_date.iter().map(|h| h.reference.as_str()).collect();
    assert_eq!(refs, vec!["REF-102", "REF-002", "REF-101"]);
}

#[tokio::test]
async fn test_search_body_matches_summary_and_content() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;
    seed_mailbox(&app, &token).await;

    // "Dear resident" only appears in outgoing content.
    let hits = search(&app, &token, json!({ "search_term": "Dear resident" })).await;
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.mail_type == MailKind::Outgoing));
}

#[tokio::test]
async fn test_search_by_tags_uses_or_semantics() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;
    seed_mailbox(&app, &token).await;

    let tag_a: mailflow_api::models::Tag = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/tags",
                Some(&token),
                json!({ "name": "Urgent", "type": "priority", "color": "#EF4444" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let tag_b: mailflow_api::models::Tag = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/tags",
                Some(&token),
                json!({ "name": "Confidential", "type": "nature", "color": "#6B7280" }),
            ))
            .await
            .unwrap(),
    )
    .await;

    // Tag two existing mails, one with each tag.
    let incoming: Vec<mailflow_api::models::IncomingMail> = body_json(
        app.clone()
            .oneshot(request("GET", "/api/incoming-mails", Some(&token)))
            .await
            .unwrap(),
    )
    .await;
    let first = incoming.iter().find(|m| m.reference == "REF-001").unwrap();
    let second = incoming.iter().find(|m| m.reference == "REF-002").unwrap();
    for (mail_id, tag_id) in [(first.id, tag_a.id), (second.id, tag_b.id)] {
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/incoming-mails/{}", mail_id),
                Some(&token),
                json!({ "tags": [tag_id] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Either tag qualifies a mail; everything untagged is excluded.
    let hits = search(
        &app,
        &token,
        json!({ "tag_ids": [tag_a.id, tag_b.id] }),
    )
    .await;
    let mut refs: Vec<&str> = hits.iter().map(|h| h.reference.as_str()).collect();
    refs.sort();
    assert_eq!(refs, vec!["REF-001", "REF-002"]);

    // The hits carry the resolved tag objects.
    assert!(hits.iter().all(|h| h.tags.len() == 1));

    // A tag nothing carries matches nothing.
    let none = search(&app, &token, json!({ "tag_ids": [Uuid::new_v4()] })).await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_inverted_date_range_fails_fast() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/search",
            Some(&token),
            json!({ "date_from": "2025-06-10", "date_to": "2025-06-01" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
