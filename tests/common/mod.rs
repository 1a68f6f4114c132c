#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/postboard");
        cmd.env("POSTBOARD_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_* and SECRET_KEY from .env
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Ready as soon as the router answers, even if the database is down
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when /health reports a reachable database. Flow tests that need
/// real tables skip themselves when this is false, so the suite still
/// passes on machines without Postgres.
pub async fn db_ready(server: &TestServer) -> Result<bool> {
    let client = reqwest::Client::new();
    let res = client.get(format!("{}/health", server.base_url)).send().await?;
    Ok(res.status() == StatusCode::OK)
}

/// Process-unique email so repeated runs never collide on the unique index
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_nanos();
    format!("{}-{}@test.example.com", prefix, nanos)
}

/// Register a fresh account and log it in, returning (user json, token)
pub async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<(Value, String)> {
    let res = client
        .post(format!("{}/users", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed with status {}",
        res.status()
    );
    let user = res.json::<Value>().await?["data"].clone();

    let res = client
        .post(format!("{}/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "login failed with status {}",
        res.status()
    );
    let body = res.json::<Value>().await?;
    let token = body["data"]["access_token"]
        .as_str()
        .context("login response missing access_token")?
        .to_string();

    Ok((user, token))
}

/// Create a post as the given user, returning the created post json
pub async fn create_post(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    title: &str,
    content: &str,
    published: bool,
) -> Result<Value> {
    let res = client
        .post(format!("{}/posts", base_url))
        .bearer_auth(token)
        .json(&json!({ "title": title, "content": content, "published": published }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "post creation failed with status {}",
        res.status()
    );
    Ok(res.json::<Value>().await?["data"].clone())
}
