pub mod mock;

use std::net::TcpListener;
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, web};
use fetch_client::HttpTransport;
use serde_json::json;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

pub use mock::{Responder, ScriptedTransport};

/// How long `/api/slow` waits before answering.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(10);

pub struct FixtureServer {
    pub port: u16,
    pub transport: HttpTransport,
}

pub fn get_subscriber(env_filter: String) -> impl Subscriber + Sync + Send {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));
    let stderr = fmt::Layer::new().with_writer(std::io::stderr).pretty();
    Registry::default().with(env_filter).with(stderr)
}

/// Install a stderr subscriber. Safe to call from every test.
pub fn init_test_logging() {
    let _ = LogTracer::init();
    let _ = get_subscriber("error".into()).try_init();
}

/// Start a local server with a handful of fixed endpoints under `/api`,
/// returning a transport pointed at it.
pub async fn spawn_fixture_server() -> anyhow::Result<FixtureServer> {
    init_test_logging();

    // OS assigns the port
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    let server = HttpServer::new(|| {
        App::new().service(
            web::scope("/api")
                .route("/items", web::get().to(items))
                .route("/empty", web::get().to(empty))
                .route("/bad", web::get().to(bad))
                .route("/not-json", web::get().to(not_json))
                .route("/slow", web::get().to(slow)),
        )
    })
    .workers(1)
    .listen(listener)?
    .run();
    tokio::spawn(server);

    Ok(FixtureServer {
        port,
        transport: HttpTransport::with_address(format!(
            "http://127.0.0.1:{port}"
        )),
    })
}

async fn items() -> HttpResponse {
    HttpResponse::Ok().json(json!([{ "id": 1 }]))
}

async fn empty() -> HttpResponse {
    HttpResponse::Ok().json(json!([]))
}

async fn bad() -> HttpResponse {
    HttpResponse::InternalServerError().body("something broke")
}

async fn not_json() -> HttpResponse {
    HttpResponse::Ok().body("<html></html>")
}

async fn slow() -> HttpResponse {
    actix_web::rt::time::sleep(SLOW_RESPONSE).await;
    items().await
}
