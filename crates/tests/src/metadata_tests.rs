use serde_json::json;

use crate::fixtures::test_app::TestApp;

/// MongoDB-backed persistence routes; skipped when no server is reachable.
async fn mongo_available(app: &TestApp) -> bool {
    let resp = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("health request failed");
    if resp.status().is_success() {
        return true;
    }
    eprintln!("Skipping: MongoDB not reachable at {}", app.settings.database.url);
    false
}

async fn create_metadata(app: &TestApp, url_path: &str) -> String {
    let resp = app
        .client
        .post(app.url("/api/metadata"))
        .json(&json!({
            "url_path": url_path,
            "transcript": "the mitochondria is the powerhouse of the cell",
            "notes": "# Cell biology",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    body["metadata"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn metadata_create_returns_stored_fields() {
    let app = TestApp::spawn().await;
    if !mongo_available(&app).await {
        return;
    }

    let resp = app
        .client
        .post(app.url("/api/metadata"))
        .json(&json!({
            "url_path": "lectures/bio-101.mp4",
            "transcript": "some transcript",
            "notes": "some notes",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Metadata created successfully");
    assert_eq!(body["metadata"]["url_path"], "lectures/bio-101.mp4");
    assert_eq!(body["metadata"]["transcript"], "some transcript");
}

#[tokio::test]
async fn chat_messages_and_flashcards_append_to_metadata() {
    let app = TestApp::spawn().await;
    if !mongo_available(&app).await {
        return;
    }

    let id = create_metadata(&app, "lectures/cells.mp4").await;

    let resp = app
        .client
        .post(app.url(&format!("/api/metadata/{id}/chat")))
        .json(&json!({
            "question": "What organelle produces ATP?",
            "answer": "The mitochondria.",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Chat message added successfully");

    let resp = app
        .client
        .post(app.url(&format!("/api/metadata/{id}/flashcards")))
        .json(&json!({
            "question": "Powerhouse of the cell?",
            "answer": "Mitochondria",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Flashcard added successfully");
}

#[tokio::test]
async fn appending_to_malformed_metadata_id_returns_400() {
    let app = TestApp::spawn().await;
    if !mongo_available(&app).await {
        return;
    }

    let resp = app
        .client
        .post(app.url("/api/metadata/not-an-oid/chat"))
        .json(&json!({ "question": "q", "answer": "a" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid metadata_id");
}

#[tokio::test]
async fn history_entry_links_user_and_metadata() {
    let app = TestApp::spawn().await;
    if !mongo_available(&app).await {
        return;
    }

    let register: serde_json::Value = app
        .client
        .post(app.url("/api/users"))
        .json(&json!({
            "firstname": "Grace",
            "lastname": "Hopper",
            "email": "grace@example.com",
            "password": "correct horse battery staple",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let user_id = register["user"]["id"].as_str().unwrap().to_string();

    let metadata_id = create_metadata(&app, "lectures/compilers.mp4").await;

    let resp = app
        .client
        .post(app.url("/api/history"))
        .json(&json!({ "user_id": user_id, "metadata_id": metadata_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["history"]["user"], user_id);
    assert_eq!(body["history"]["metadata"], metadata_id);
}
