use contact_backend::submission::Acknowledgment;

use crate::helpers::TestApp;

#[tokio::test]
async fn is_present() {
    let app = TestApp::spawn().await;

    let res = app.health_check().await.expect("Failed to execute request");

    assert!(res.status().is_success());

    let ack: Acknowledgment = res.json().await.expect("Failed to parse body");
    assert!(ack.success);
    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn allows_any_origin() {
    let app = TestApp::spawn().await;

    let res = app
        .request(reqwest::Method::GET, "")
        .header("Origin", "https://photos.example.org")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(res.headers().contains_key("access-control-allow-origin"));
}
