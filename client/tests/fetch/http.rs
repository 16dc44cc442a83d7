use std::rc::Rc;
use std::time::Duration;

use fetch_client::{
    CancellationToken, ClientError, FetchBinding, HttpTransport, Transport,
};
use serde_json::{Value, json};
use test_helpers::{SLOW_RESPONSE, spawn_fixture_server};

#[tokio::test]
async fn items_endpoint_populates_state() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await?;
    let mut binding =
        FetchBinding::<_, Vec<Value>>::new(Rc::new(server.transport));

    binding.observe("/api/items").unwrap().await;

    let state = binding.state();
    assert_eq!(state.data, vec![json!({ "id": 1 })]);
    assert_eq!(state.error, None);
    assert!(!state.is_loading);

    Ok(())
}

#[tokio::test]
async fn typed_payloads_decode() -> anyhow::Result<()> {
    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Item {
        id: u32,
    }

    let server = spawn_fixture_server().await?;
    let items: Vec<Item> = server
        .transport
        .get_json("/api/items", CancellationToken::new())
        .await?;
    assert_eq!(items, vec![Item { id: 1 }]);

    let empty: Vec<Item> = server
        .transport
        .get_json("/api/empty", CancellationToken::new())
        .await?;
    assert!(empty.is_empty());

    Ok(())
}

#[tokio::test]
async fn error_status_surfaces_as_message() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await?;
    let transport = Rc::new(server.transport);

    let result = transport
        .get_json::<Vec<Value>>("/api/bad", CancellationToken::new())
        .await;
    match result {
        Err(ClientError::APIError(status, text)) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(text, "something broke");
        }
        other => panic!("expected APIError, got {other:?}"),
    }

    let mut binding = FetchBinding::<_, Vec<Value>>::new(transport);
    binding.observe("/api/bad").unwrap().await;
    let state = binding.state();
    assert!(state.data.is_empty());
    assert_eq!(
        state.error.as_deref(),
        Some("Request failed with status code 500")
    );
    assert!(!state.is_loading);

    Ok(())
}

#[tokio::test]
async fn undecodable_body_is_a_fetch_failure() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await?;
    let mut binding =
        FetchBinding::<_, Vec<Value>>::new(Rc::new(server.transport));

    binding.observe("/api/not-json").unwrap().await;

    let state = binding.state();
    assert!(state.error.is_some());
    assert!(state.data.is_empty());
    assert!(!state.is_loading);

    Ok(())
}

#[tokio::test]
async fn unreachable_host_is_a_fetch_failure() {
    // Nothing listens on the discard port.
    let transport = HttpTransport::with_address("http://127.0.0.1:9");
    let mut binding = FetchBinding::<_, Vec<Value>>::new(Rc::new(transport));

    binding.observe("/api/items").unwrap().await;

    let state = binding.state();
    assert!(state.error.is_some());
    assert!(!state.is_loading);
}

#[tokio::test]
async fn teardown_abandons_slow_request() -> anyhow::Result<()> {
    let server = spawn_fixture_server().await?;
    let mut binding =
        FetchBinding::<_, Vec<Value>>::new(Rc::new(server.transport));

    let cycle = binding.observe("/api/slow").unwrap();
    let abandoned = tokio::time::timeout(SLOW_RESPONSE / 2, async {
        tokio::join!(cycle, async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            binding.teardown();
        })
    })
    .await;
    assert!(abandoned.is_ok(), "request outlived its teardown");

    let state = binding.state();
    assert!(state.is_loading);
    assert_eq!(state.error, None);

    Ok(())
}
