//! Integration tests for mail CRUD and tag fan-out consistency

mod common;

use axum::{http::StatusCode, Router};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::*;
use mailflow_api::models::{Category, ErrorResponse, IncomingMail, Sender, Tag};

async fn seed_category(app: &Router, token: &str, name: &str) -> Uuid {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            Some(token),
            json!({ "name": name, "color": "#3B82F6" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let category: Category = body_json(response).await;
    category.id
}

async fn seed_sender(app: &Router, token: &str, name: &str) -> Uuid {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/senders",
            Some(token),
            json!({ "name": name, "email": "contact@city.example" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let sender: Sender = body_json(response).await;
    sender.id
}

async fn seed_tag(app: &Router, token: &str, name: &str, kind: &str) -> Uuid {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tags",
            Some(token),
            json!({ "name": name, "type": kind, "color": "#EF4444" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let tag: Tag = body_json(response).await;
    tag.id
}

fn incoming_body(reference: &str, category_id: Uuid, sender_id: Uuid, tags: &[Uuid]) -> serde_json::Value {
    json!({
        "reference": reference,
        "subject": format!("Subject {reference}"),
        "category_id": category_id,
        "sender_id": sender_id,
        "arrival_date": "2025-01-01",
        "priority": "normal",
        "tags": tags,
    })
}

#[tokio::test]
async fn test_created_mail_lists_full_tag_objects() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;

    let category_id = seed_category(&app, &token, "Admin").await;
    let sender_id = seed_sender(&app, &token, "City Hall").await;
    let urgent = seed_tag(&app, &token, "Urgent", "priority").await;
    let confidential = seed_tag(&app, &token, "Confidential", "nature").await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/incoming-mails",
            Some(&token),
            incoming_body("REF-001", category_id, sender_id, &[urgent, confidential]),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let mail: IncomingMail = body_json(created).await;

    // Denormalized category and sender fields come back resolved.
    assert_eq!(mail.category_name.as_deref(), Some("Admin"));
    assert_eq!(mail.category_color.as_deref(), Some("#3B82F6"));
    assert_eq!(mail.sender_name.as_deref(), Some("City Hall"));
    assert_eq!(mail.sender_email.as_deref(), Some("contact@city.example"));

    // Both tags are present as full objects with id, name and color.
    assert_eq!(mail.tags.len(), 2);
    let mut names: Vec<&str> = mail.tags.iter().map(|t| t.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Confidential", "Urgent"]);
    assert!(mail.tags.iter().all(|t| !t.color.is_empty()));

    // The list endpoint shows the same tag set.
    let list = app
        .oneshot(request("GET", "/api/incoming-mails", Some(&token)))
        .await
        .unwrap();
    let mails: Vec<IncomingMail> = body_json(list).await;
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].tags.len(), 2);
}

#[tokio::test]
async fn test_tag_update_replace_omit_and_clear() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;

    let category_id = seed_category(&app, &token, "Admin").await;
    let sender_id = seed_sender(&app, &token, "City Hall").await;
    let a = seed_tag(&app, &token, "A", "nature").await;
    let b = seed_tag(&app, &token, "B", "nature").await;
    let c = seed_tag(&app, &token, "C", "nature").await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/incoming-mails",
            Some(&token),
            incoming_body("REF-001", category_id, sender_id, &[a, b]),
        ))
        .await
        .unwrap();
    let mail: IncomingMail = body_json(created).await;

    // Replace [A, B] with [B, C]: the result is exactly {B, C}.
    let replaced = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/incoming-mails/{}", mail.id),
            Some(&token),
            json!({ "tags": [b, c] }),
        ))
        .await
        .unwrap();
    assert_eq!(replaced.status(), StatusCode::OK);
    let mail_after: IncomingMail = body_json(replaced).await;
    let mut ids: Vec<Uuid> = mail_after.tags.iter().map(|t| t.id).collect();
    ids.sort();
    let mut want = vec![b, c];
    want.sort();
    assert_eq!(ids, want);

    // Omitting the tags field leaves the assignment untouched.
    let untouched = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/incoming-mails/{}", mail.id),
            Some(&token),
            json!({ "subject": "Renamed" }),
        ))
        .await
        .unwrap();
    let mail_after: IncomingMail = body_json(untouched).await;
    assert_eq!(mail_after.subject, "Renamed");
    assert_eq!(mail_after.tags.len(), 2);

    // An explicit empty list clears all tags.
    let cleared = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/incoming-mails/{}", mail.id),
            Some(&token),
            json!({ "tags": [] }),
        ))
        .await
        .unwrap();
    let mail_after: IncomingMail = body_json(cleared).await;
    assert!(mail_after.tags.is_empty());
}

#[tokio::test]
async fn test_create_with_unknown_tag_id_is_rejected() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;

    let category_id = seed_category(&app, &token, "Admin").await;
    let sender_id = seed_sender(&app, &token, "City Hall").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/incoming-mails",
            Some(&token),
            incoming_body("REF-001", category_id, sender_id, &[Uuid::new_v4()]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The transaction rolled back: no mail row was left behind.
    let list = app
        .oneshot(request("GET", "/api/incoming-mails", Some(&token)))
        .await
        .unwrap();
    let mails: Vec<IncomingMail> = body_json(list).await;
    assert!(mails.is_empty());
}

#[tokio::test]
async fn test_delete_referenced_category_and_sender_conflict() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;

    let category_id = seed_category(&app, &token, "Admin").await;
    let sender_id = seed_sender(&app, &token, "City Hall").await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/incoming-mails",
            Some(&token),
            incoming_body("REF-001", category_id, sender_id, &[]),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let category_delete = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/categories/{}", category_id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(category_delete.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = body_json(category_delete).await;
    assert_eq!(error.code.as_deref(), Some("CONFLICT"));

    let sender_delete = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/senders/{}", sender_id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(sender_delete.status(), StatusCode::CONFLICT);

    // Both rows survived the refused deletes.
    let categories = app
        .clone()
        .oneshot(request("GET", "/api/categories", Some(&token)))
        .await
        .unwrap();
    let categories: Vec<Category> = body_json(categories).await;
    assert_eq!(categories.len(), 1);

    let senders = app
        .oneshot(request("GET", "/api/senders", Some(&token)))
        .await
        .unwrap();
    let senders: Vec<Sender> = body_json(senders).await;
    assert_eq!(senders.len(), 1);
}

#[tokio::test]
async fn test_deleting_mail_removes_it_and_its_tag_rows() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;

    let category_id = seed_category(&app, &token, "Admin").await;
    let sender_id = seed_sender(&app, &token, "City Hall").await;
    let tag = seed_tag(&app, &token, "Urgent", "priority").await;

    let created = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/incoming-mails",
            Some(&token),
            incoming_body("REF-001", category_id, sender_id, &[tag]),
        ))
        .await
        .unwrap();
    let mail: IncomingMail = body_json(created).await;

    let deleted = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/incoming-mails/{}", mail.id),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let list = app
        .clone()
        .oneshot(request("GET", "/api/incoming-mails", Some(&token)))
        .await
        .unwrap();
    let mails: Vec<IncomingMail> = body_json(list).await;
    assert!(mails.is_empty());

    // With the join rows gone, the tag can be deleted without residue.
    let tag_delete = app
        .oneshot(request("DELETE", &format!("/api/tags/{}", tag), Some(&token)))
        .await
        .unwrap();
    assert_eq!(tag_delete.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_mail_id_is_404() {
    let (app, store) = test_app().await;
    let token = seed_and_login(&app, store.as_ref()).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/incoming-mails/{}", Uuid::new_v4()),
            Some(&token),
            json!({ "subject": "anything" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = body_json(response).await;
    assert_eq!(error.code.as_deref(), Some("NOT_FOUND"));
}
