use std::time::Duration;

use crate::fixtures::mock_stages::MockStages;
use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn unknown_task_returns_404() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url(&format!("/status/{}", uuid::Uuid::new_v4())))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Task not found");
}

#[tokio::test]
async fn malformed_task_id_returns_400() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/status/not-a-uuid"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid task_id");
}

#[tokio::test]
async fn in_flight_task_reports_progress_without_results() {
    let app =
        TestApp::spawn_with(MockStages::new().with_convert_delay(Duration::from_millis(500)))
            .await;

    let resp = app.upload("slow.mp4", b"bytes").await;
    let body: serde_json::Value = resp.json().await.unwrap();
    let task_id = body["task_id"].as_str().unwrap().to_string();

    // While the convert stage is sleeping, the task must be visible in a
    // non-terminal state with neither results nor error.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let status = app.status(&task_id).await;
    let phase = status["status"].as_str().unwrap();
    assert!(
        matches!(phase, "uploaded" | "converting"),
        "unexpected in-flight status {phase}"
    );
    assert!(status.get("results").is_none());
    assert!(status.get("error").is_none());

    // wait_for_terminal asserts every completed poll carries results.
    let final_state = app.wait_for_terminal(&task_id).await;
    assert_eq!(final_state["status"], "completed");
}

#[tokio::test]
async fn status_polls_never_observe_completed_without_results() {
    let app = TestApp::spawn().await;

    // Hammer a batch of uploads; wait_for_terminal panics if any poll sees
    // a completed task with no results attached.
    let mut ids = Vec::new();
    for i in 0..8 {
        let resp = app.upload(&format!("batch-{i}.mp4"), b"bytes").await;
        let body: serde_json::Value = resp.json().await.unwrap();
        ids.push(body["task_id"].as_str().unwrap().to_string());
    }

    for id in &ids {
        let final_state = app.wait_for_terminal(id).await;
        assert_eq!(final_state["status"], "completed");
    }
}
