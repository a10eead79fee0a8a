//! Link queue behavior over HTTP.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use brandgate_client::{Backend, ClientError, ConsumeOutcome, PublicConsumer};
use brandgate_core::{LinkId, LinkItem};
use brandgate_integration_tests::TestServer;

fn urls(items: &[LinkItem]) -> Vec<&str> {
    items.iter().map(|item| item.url.as_str()).collect()
}

#[tokio::test]
async fn test_queue_scenario() {
    let server = TestServer::start().await;
    let admin = server.admin_client().await;
    let visitor = server.client();

    admin.add_link_to_queue("https://a.example.com/").await.unwrap();
    let items = admin.add_link_to_queue("https://b.example.com/").await.unwrap();
    assert_eq!(urls(&items), ["https://a.example.com/", "https://b.example.com/"]);

    assert_eq!(
        visitor.consume_next_link().await.unwrap().as_deref(),
        Some("https://a.example.com/")
    );
    assert_eq!(urls(&visitor.get_link_queue().await.unwrap()), ["https://b.example.com/"]);

    let items = admin.add_link_to_queue("https://c.example.com/").await.unwrap();
    assert_eq!(urls(&items), ["https://b.example.com/", "https://c.example.com/"]);

    assert!(admin.clear_queue().await.unwrap().is_empty());
    assert_eq!(visitor.consume_next_link().await.unwrap(), None);
}

#[tokio::test]
async fn test_invalid_url_leaves_queue_unchanged() {
    let server = TestServer::start().await;
    let admin = server.admin_client().await;
    admin.add_link_to_queue("https://a.example.com/").await.unwrap();

    let err = admin.add_link_to_queue("not-a-url").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(admin.get_link_queue().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove() {
    let server = TestServer::start().await;
    let admin = server.admin_client().await;
    let items = admin.add_link_to_queue("https://a.example.com/").await.unwrap();
    admin.add_link_to_queue("https://b.example.com/").await.unwrap();

    let unchanged = admin.remove_link_from_queue(LinkId::generate()).await.unwrap();
    assert_eq!(unchanged.len(), 2);

    let head = items.first().unwrap().id;
    let items = admin.remove_link_from_queue(head).await.unwrap();
    assert_eq!(urls(&items), ["https://b.example.com/"]);
}

#[tokio::test]
async fn test_consumer_flow() {
    let server = TestServer::start().await;
    let admin = server.admin_client().await;
    admin.add_link_to_queue("https://a.example.com/").await.unwrap();

    let consumer =
        PublicConsumer::new(server.client() as Arc<dyn Backend>).with_delay(Duration::ZERO);
    assert_eq!(
        consumer.confirm().await,
        ConsumeOutcome::Redirect("https://a.example.com/".to_owned())
    );
    assert_eq!(consumer.confirm().await, ConsumeOutcome::NoLinks);
}

#[tokio::test]
async fn test_concurrent_consumers_never_share_an_item() {
    let server = TestServer::start().await;
    let admin = server.admin_client().await;
    for i in 0..40 {
        admin
            .add_link_to_queue(&format!("https://example.com/{i}"))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..8 {
        let visitor = server.client();
        handles.push(tokio::spawn(async move {
            let mut taken = Vec::new();
            while let Some(url) = visitor.consume_next_link().await.unwrap() {
                taken.push(url);
            }
            taken
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for url in handle.await.unwrap() {
            assert!(seen.insert(url), "link handed out twice");
        }
    }
    assert_eq!(seen.len(), 40);
    assert!(admin.get_link_queue().await.unwrap().is_empty());
}
