use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Signal {
    id: i64,
    title: String,
    description: String,
    target_value: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyLog {
    id: i64,
    signal_id: i64,
    completed_value: i64,
    log_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsRow {
    signal_id: i64,
    signal: Signal,
}

struct TestServer {
    base_url: String,
    data_path: String,
    keep_data: bool,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        if !self.keep_data {
            let _ = std::fs::remove_file(&self.data_path);
        }
    }
}

// Servers bind fresh ports, but spawning them one at a time keeps the
// free-port pick from racing.
static SPAWN_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    const SLOTS: usize = 32;

    static REGISTER: Once = Once::new();
    static PIDS: [AtomicI32; SLOTS] = [const { AtomicI32::new(0) }; SLOTS];

    pub fn register(pid: u32) {
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
        for slot in PIDS.iter() {
            if slot
                .compare_exchange(0, pid as i32, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return;
            }
        }
    }

    extern "C" fn on_exit() {
        for slot in PIDS.iter() {
            let pid = slot.load(Ordering::SeqCst);
            if pid > 0 {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("signal_app_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
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

async fn spawn_server_at(data_path: String, keep_data: bool) -> TestServer {
    let _guard = SPAWN_LOCK.lock().await;
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_signal_app"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_path,
        keep_data,
        child,
    }
}

async fn spawn_server() -> TestServer {
    spawn_server_at(unique_data_path(), false).await
}

async fn create_signal(client: &Client, server: &TestServer, title: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/signals", server.base_url))
        .json(&serde_json::json!({
            "title": title,
            "description": "",
            "targetValue": 80
        }))
        .send()
        .await
        .unwrap()
}

async fn create_log(
    client: &Client,
    server: &TestServer,
    signal_id: i64,
    completed_value: i64,
) -> reqwest::Response {
    client
        .post(format!("{}/api/dailylogs", server.base_url))
        .json(&serde_json::json!({
            "signalId": signal_id,
            "completedValue": completed_value,
            "logDate": "2001-01-01T00:00:00Z"
        }))
        .send()
        .await
        .unwrap()
}

async fn get_json<T: for<'de> Deserialize<'de>>(client: &Client, url: String) -> T {
    client.get(url).send().await.unwrap().json().await.unwrap()
}

#[tokio::test]
async fn http_sixth_signal_is_rejected() {
    let server = spawn_server().await;
    let client = Client::new();

    for n in 0..5 {
        let response = create_signal(&client, &server, &format!("signal {n}")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = create_signal(&client, &server, "sixth").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!response.text().await.unwrap().is_empty());

    let signals: Vec<Signal> = get_json(&client, format!("{}/api/signals", server.base_url)).await;
    assert_eq!(signals.len(), 5);
    assert!(signals.iter().all(|signal| signal.target_value == 80));
    assert!(signals.iter().all(|signal| signal.description.is_empty()));
}

#[tokio::test]
async fn http_delete_cascades_and_missing_is_404() {
    let server = spawn_server().await;
    let client = Client::new();

    let signal: Signal = create_signal(&client, &server, "run").await.json().await.unwrap();
    assert_eq!(signal.title, "run");
    create_log(&client, &server, signal.id, 50).await;
    create_log(&client, &server, signal.id, 70).await;

    let response = client
        .delete(format!("{}/api/signals/{}", server.base_url, signal.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let history: Vec<DailyLog> = get_json(
        &client,
        format!("{}/api/dailylogs/history/{}", server.base_url, signal.id),
    )
    .await;
    assert!(history.is_empty());

    let yearly: Vec<StatsRow> = get_json(
        &client,
        format!("{}/api/dailylogs/yearly-stats", server.base_url),
    )
    .await;
    assert!(yearly.is_empty());

    let response = client
        .delete(format!("{}/api/signals/{}", server.base_url, signal.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_log_for_missing_signal_is_rejected() {
    let server = spawn_server().await;
    let client = Client::new();

    let response = create_log(&client, &server, 404, 10).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let weekly: Vec<StatsRow> = get_json(
        &client,
        format!("{}/api/dailylogs/weekly-stats", server.base_url),
    )
    .await;
    assert!(weekly.is_empty());
}

#[tokio::test]
async fn http_history_is_newest_first_with_server_time() {
    let server = spawn_server().await;
    let client = Client::new();

    let walk: Signal = create_signal(&client, &server, "walk").await.json().await.unwrap();
    let read: Signal = create_signal(&client, &server, "read").await.json().await.unwrap();

    for value in [10, 20, 30] {
        let log: DailyLog = create_log(&client, &server, walk.id, value)
            .await
            .json()
            .await
            .unwrap();
        assert!(!log.log_date.starts_with("2001"));
        sleep(Duration::from_millis(5)).await;
    }
    create_log(&client, &server, read.id, 99).await;

    let history: Vec<DailyLog> = get_json(
        &client,
        format!("{}/api/dailylogs/history/{}", server.base_url, walk.id),
    )
    .await;
    let values: Vec<i64> = history.iter().map(|log| log.completed_value).collect();
    assert_eq!(values, vec![30, 20, 10]);
    assert!(history.iter().all(|log| log.signal_id == walk.id));
    assert!(history.windows(2).all(|pair| pair[0].id > pair[1].id));

    let monthly: Vec<StatsRow> = get_json(
        &client,
        format!("{}/api/dailylogs/monthly-stats", server.base_url),
    )
    .await;
    assert_eq!(monthly.len(), 4);
    assert!(monthly.iter().all(|row| row.signal.id == row.signal_id));
}

#[tokio::test]
async fn http_data_survives_restart() {
    let data_path = unique_data_path();
    let client = Client::new();

    // The first server must leave its snapshot behind for the second.
    let first = spawn_server_at(data_path.clone(), true).await;
    let signal: Signal = create_signal(&client, &first, "journal").await.json().await.unwrap();
    create_log(&client, &first, signal.id, 100).await;
    drop(first);

    let second = spawn_server_at(data_path, false).await;
    let signals: Vec<Signal> = get_json(&client, format!("{}/api/signals", second.base_url)).await;
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].id, signal.id);

    let history: Vec<DailyLog> = get_json(
        &client,
        format!("{}/api/dailylogs/history/{}", second.base_url, signal.id),
    )
    .await;
    assert_eq!(history.len(), 1);

    let next: Signal = create_signal(&client, &second, "stretch").await.json().await.unwrap();
    assert_eq!(next.id, signal.id + 1);
}

#[tokio::test]
async fn http_snapshot_is_removed_with_server() {
    let server = spawn_server().await;
    let client = Client::new();

    create_signal(&client, &server, "sleep").await;
    let data_path = server.data_path.clone();
    assert!(std::path::Path::new(&data_path).exists());

    drop(server);
    assert!(!std::path::Path::new(&data_path).exists());
}

#[tokio::test]
async fn http_rejected_write_leaves_snapshot_untouched() {
    let server = spawn_server().await;
    let client = Client::new();

    create_signal(&client, &server, "water").await;
    let before = std::fs::read(&server.data_path).unwrap();

    let response = create_signal(&client, &server, "   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = create_log(&client, &server, 999, 1).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = std::fs::read(&server.data_path).unwrap();
    assert_eq!(before, after);
}
