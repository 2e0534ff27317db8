use axum::{http::StatusCode, routing::get, Json, Router};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientStatusResponse {
    overdue: bool,
    name: String,
    bike: String,
    tariff: String,
    comment: String,
    debt: f64,
    last_payment_amount: Option<String>,
    last_payment_date: Option<String>,
    next_payment_date: Option<String>,
}

static CLIENT: Lazy<Client> = Lazy::new(Client::new);

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(unix)]
mod cleanup {
    use std::sync::{Mutex, Once};

    static REGISTER: Once = Once::new();
    static PIDS: Mutex<Vec<i32>> = Mutex::new(Vec::new());

    pub fn register(pid: u32) {
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
        PIDS.lock().unwrap().push(pid as i32);
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter() {
                unsafe {
                    libc::kill(*pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Stands in for the spreadsheet proxy: serves one canned JSON body with a
/// fixed status on every GET.
async fn spawn_proxy(status: StatusCode, body: serde_json::Value) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind proxy port");
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/", get(move || async move { (status, Json(body)) }));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("proxy serve");
    });
    format!("http://{addr}/")
}

/// Like `spawn_proxy`, but answers with a body that is not JSON at all.
async fn spawn_text_proxy(body: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind proxy port");
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/", get(move || async move { body }));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("proxy serve");
    });
    format!("http://{addr}/")
}

async fn wait_until_ready(base_url: &str) {
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = CLIENT.get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(endpoint: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_bikerent_status"))
        .env("PORT", port.to_string())
        .env("STATUS_ENDPOINT", endpoint)
        .env("STATUS_SHEET_ID", "sheet-under-test")
        .env("STATUS_SHEET_NAME", "Client1")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

fn values_body() -> serde_json::Value {
    json!({
        "values": [
            ["Name", "Bike", "Tariff", "Comment", "Debt"],
            ["Ivan", "Trek FX2", "180", "Hello", "50"],
            ["23.01.2024", "x", "180"]
        ]
    })
}

#[tokio::test]
async fn http_api_returns_normalized_record() {
    let proxy = spawn_proxy(StatusCode::OK, values_body()).await;
    let server = spawn_server(&proxy).await;

    let status: ClientStatusResponse = CLIENT
        .get(format!("{}/api/client", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(status.name, "Ivan");
    assert_eq!(status.bike, "Trek FX2");
    assert_eq!(status.tariff, "180");
    assert_eq!(status.comment, "Hello");
    assert_eq!(status.debt, 50.0);
    assert!(status.overdue);
    assert_eq!(status.last_payment_amount.as_deref(), Some("180"));
    assert_eq!(status.last_payment_date.as_deref(), Some("23.01.2024"));
    assert_eq!(status.next_payment_date.as_deref(), Some("30.01.2024"));
}

#[tokio::test]
async fn http_index_renders_status_page() {
    let proxy = spawn_proxy(StatusCode::OK, values_body()).await;
    let server = spawn_server(&proxy).await;

    let page = CLIENT
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("Ivan"));
    assert!(page.contains("Trek FX2"));
    assert!(page.contains("180zł - 23.01.2024"));
    assert!(page.contains("30.01.2024"));
    assert!(page.contains("Задолженность"));
}

#[tokio::test]
async fn http_unknown_shape_maps_to_bad_gateway() {
    let proxy = spawn_proxy(StatusCode::OK, json!({ "rows": [] })).await;
    let server = spawn_server(&proxy).await;

    let response = CLIENT
        .get(format!("{}/api/client", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let page = CLIENT
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Ошибка"));
    assert!(page.contains("Обновить страницу"));
}

#[tokio::test]
async fn http_non_json_body_maps_to_bad_gateway() {
    let proxy = spawn_text_proxy("<html>maintenance</html>").await;
    let server = spawn_server(&proxy).await;

    let response = CLIENT
        .get(format!("{}/api/client", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.unwrap();
    assert!(body.contains("not valid JSON"));

    let page = CLIENT
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Ошибка"));
    assert!(page.contains("Обновить страницу"));
}

#[tokio::test]
async fn http_unreachable_proxy_maps_to_bad_gateway() {
    // Nothing listens on this port once the probe listener is dropped.
    let endpoint = format!("http://127.0.0.1:{}/", pick_free_port());
    let server = spawn_server(&endpoint).await;

    let response = CLIENT
        .get(format!("{}/api/client", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.unwrap();
    assert!(body.contains("request failed"));

    let page = CLIENT
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Ошибка"));
}

#[tokio::test]
async fn http_proxy_failure_maps_to_bad_gateway() {
    let proxy = spawn_proxy(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })).await;
    let server = spawn_server(&proxy).await;

    let response = CLIENT
        .get(format!("{}/api/client", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.unwrap();
    assert!(body.contains("500"));
}
