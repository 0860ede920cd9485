// End-to-end: remote → cache → paged list → detail, against a mock server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::watch;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use postdeck::app::AppContext;
use postdeck::config::Config;
use postdeck::repository::ItemRepository;
use postdeck::screens::{
    DetailArgs, DetailScreen, ListEffect, ListIntent, ListScreen, ListState,
};
use postdeck::store::ItemStore;

fn photos(n: usize, prefix: &str) -> Value {
    Value::Array(
        (1..=n)
            .map(|i| {
                json!({
                    "albumId": 1,
                    "id": i,
                    "title": format!("{prefix} {i}"),
                    "url": format!("https://img.example/{prefix}/{i}"),
                    "thumbnailUrl": format!("https://img.example/thumb/{i}")
                })
            })
            .collect(),
    )
}

async fn context(server: &MockServer) -> AppContext {
    let mut config = Config::default();
    config.remote.base_url = server.uri();
    AppContext::in_memory(config).unwrap()
}

async fn wait_for<S: Clone, F: Fn(&S) -> bool>(rx: &mut watch::Receiver<S>, pred: F) -> S {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let state = rx.borrow_and_update();
                if pred(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("state never matched")
}

#[tokio::test]
async fn test_list_then_detail_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(photos(30, "photo")))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server).await;
    let repo: Arc<dyn ItemRepository> = ctx.repository.clone();

    let list = ListScreen::new(repo.clone());
    let mut rx = list.state();
    let first = wait_for(&mut rx, |s: &ListState| !s.is_loading && !s.items.is_empty()).await;
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.items[0].title, "photo 1");
    assert_eq!(ctx.store.count().unwrap(), 30);

    list.post_intent(ListIntent::ItemVisible(19));
    let all = wait_for(&mut rx, |s: &ListState| s.end_reached).await;
    assert_eq!(all.items.len(), 30);

    let id = all.items[4].id;
    list.post_intent(ListIntent::ClickItem(id));
    assert_eq!(list.try_next_effect(), Some(ListEffect::NavigateToDetails(id)));

    let detail = DetailScreen::new(repo, DetailArgs { id });
    let shown = wait_for(&mut detail.state(), |s| !s.is_loading).await;
    let item = shown.item.expect("item should be cached");
    assert_eq!(item.title, "photo 5");
    assert_eq!(item.image_url, "https://img.example/photo/5");
}

#[tokio::test]
async fn test_failed_refresh_keeps_cache_and_reports_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(photos(3, "first")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let ctx = context(&server).await;
    let list = ListScreen::new(ctx.repository.clone());
    let mut rx = list.state();
    wait_for(&mut rx, |s: &ListState| s.items.len() == 3 && !s.is_loading).await;

    list.post_intent(ListIntent::Refresh);
    let failed = wait_for(&mut rx, |s: &ListState| s.error_message.is_some()).await;

    assert_eq!(failed.items.len(), 3);
    assert_eq!(ctx.store.count().unwrap(), 3);
    match list.next_effect().await {
        Some(ListEffect::ShowErrorMessage(message)) => assert!(message.contains("500")),
        other => panic!("expected an error message, got {other:?}"),
    }
    assert_eq!(list.try_next_effect(), None);
}

#[tokio::test]
async fn test_show_missing_item_is_not_found() {
    let server = MockServer::start().await;
    let ctx = context(&server).await;

    let outcome = ctx.repository.item(404).await;

    assert_eq!(outcome.error_message().as_deref(), Some("not found"));
    // Detail reads never reach the network.
    assert!(server.received_requests().await.unwrap().is_empty());
}
