//! Site config persistence through the API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use brandgate_client::{AdminConsole, Backend, ClientError};
use brandgate_core::{Route, SiteConfig};
use brandgate_integration_tests::TestServer;

#[tokio::test]
async fn test_default_config_when_nothing_saved() {
    let server = TestServer::start().await;
    let config = server.client().get_config().await.unwrap();
    assert_eq!(config, SiteConfig::default());
    assert_eq!(config.image_url, "https://picsum.photos/400/200");
}

#[tokio::test]
async fn test_saved_config_is_public() {
    let server = TestServer::start().await;
    let console = AdminConsole::new(server.admin_client().await as Arc<dyn Backend>, Route::Admin);
    console.load().await.unwrap();

    let config = SiteConfig {
        image_url: "https://cdn.example.com/banner.png".to_owned(),
        caption: "Bem-vindo".to_owned(),
    };
    console.save_config(config.clone()).await.unwrap();
    assert_eq!(console.snapshot().config, config);

    // Any visitor sees the new config.
    assert_eq!(server.client().get_config().await.unwrap(), config);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let server = TestServer::start().await;
    let client = server.admin_client().await;

    let err = client
        .save_config(&SiteConfig {
            image_url: "not a url".to_owned(),
            caption: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(client.get_config().await.unwrap(), SiteConfig::default());
}
