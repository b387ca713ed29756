//! Integration tests for the crawler
//!
//! These tests use wiremock to serve small sites and drive full crawls
//! through the public iterator interface.

use itemize::{
    itemize, itemize_with_config, Config, ItemizeOptions, Itemizer, IteratorState,
};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Serves the /base/ tree:
///
/// - `/base/` links to `..`, `a/`, `b/`
/// - `/base/a/` links to `file.txt`, `../b/`
/// - `/base/b/` links to `notfound` (404), `/`, `foo/bar/baz/deep`
async fn start_base_site() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("root"))
        .mount(&server)
        .await;

    mount_html(
        &server,
        "/base/",
        "<html><body><a href='..'>..</a><a href='a/'>a</a><a href='b/'>b</b></body></html>",
    )
    .await;

    mount_html(
        &server,
        "/base/a/",
        "<html><body><a href='file.txt'>file</a><a href='../b/'>b</a></body></html>",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/base/a/file.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<a href='hidden'>not html</a>\n".as_bytes().to_vec(),
            "text/plain",
        ))
        .mount(&server)
        .await;

    mount_html(
        &server,
        "/base/b/",
        "<html><body><a href='notfound'>404</a><a href='/'>root</a><a href='foo/bar/baz/deep'>deep</a></body></html>",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/base/b/foo/bar/baz/deep"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deep"))
        .mount(&server)
        .await;

    server
}

/// Serves /options, which links to itself with a query and with a fragment
async fn start_options_site() -> MockServer {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/options",
        "<html><body><a href='/options?foo=bar'>query</a><a href='/options#foobar'>hash</a></body></html>",
    )
    .await;

    server
}

async fn drain(items: &mut Itemizer) -> Vec<String> {
    while !items.done() {
        items.next().await;
    }
    items.all().to_vec()
}

#[tokio::test]
async fn test_first_item_is_root() {
    let server = start_base_site().await;
    let root = format!("{}/base/", server.uri());

    let mut items = itemize(&root, ItemizeOptions::default().with_depth(2)).unwrap();
    assert_eq!(items.next().await, Some(root));
    items.close();
}

#[tokio::test]
async fn test_uses_keep_alive_connection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ka/"))
        .and(header("connection", "keep-alive"))
        .respond_with(html("<html><body><a href='next'>next</a></body></html>"))
        .expect(1..)
        .named("keep-alive requests")
        .mount(&server)
        .await;

    let mut items = itemize(
        &format!("{}/ka/", server.uri()),
        ItemizeOptions::default().with_depth(1),
    )
    .unwrap();
    assert!(items.next().await.is_some());
    assert_eq!(items.stats().dead_ends, 0);
    items.close();

    server.verify().await;
}

#[tokio::test]
async fn test_base_tree_finds_five_items() {
    let server = start_base_site().await;
    let base = server.uri();

    let mut items = itemize(
        &format!("{}/base/", base),
        ItemizeOptions::default().with_depth(2),
    )
    .unwrap();
    let all = drain(&mut items).await;

    assert_eq!(
        all,
        vec![
            format!("{}/base/", base),
            format!("{}/base/a/", base),
            format!("{}/base/b/", base),
            format!("{}/base/a/file.txt", base),
            format!("{}/base/b/notfound", base),
        ]
    );
    items.close();
}

#[tokio::test]
async fn test_does_not_find_deep_url() {
    let server = start_base_site().await;

    let mut items = itemize(
        &format!("{}/base/", server.uri()),
        ItemizeOptions::default().with_depth(2),
    )
    .unwrap();
    let all = drain(&mut items).await;

    assert!(!all.concat().contains("/deep"));
    items.close();
}

#[tokio::test]
async fn test_does_not_move_up_to_parent() {
    let server = start_base_site().await;
    let parent = format!("{}/", server.uri());

    let mut items = itemize(
        &format!("{}/base/", server.uri()),
        ItemizeOptions::default().with_depth(2),
    )
    .unwrap();
    let all = drain(&mut items).await;

    assert!(!all.contains(&parent));
    assert!(items.stats().rejected >= 2);
    items.close();
}

#[tokio::test]
async fn test_no_duplicates() {
    let server = start_base_site().await;

    let mut items = itemize(
        &format!("{}/base/", server.uri()),
        ItemizeOptions::default().with_depth(2),
    )
    .unwrap();
    let all = drain(&mut items).await;

    let mut unique = all.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), all.len());
    items.close();
}

#[tokio::test]
async fn test_depth_limits_fetching() {
    let server = start_base_site().await;
    let base = server.uri();

    let mut items = itemize(
        &format!("{}/base/", base),
        ItemizeOptions::default().with_depth(1),
    )
    .unwrap();
    let all = drain(&mut items).await;

    assert_eq!(
        all,
        vec![
            format!("{}/base/", base),
            format!("{}/base/a/", base),
            format!("{}/base/b/", base),
        ]
    );
    assert_eq!(items.stats().fetched, 3);
    items.close();
}

#[tokio::test]
async fn test_depth_zero_yields_only_root() {
    let server = start_base_site().await;
    let root = format!("{}/base/", server.uri());

    let mut items = itemize(&root, ItemizeOptions::default().with_depth(0)).unwrap();
    let all = drain(&mut items).await;

    assert_eq!(all, vec![root]);
    items.close();
}

#[tokio::test]
async fn test_returns_none_after_exhaustion() {
    let server = start_base_site().await;

    let mut items = itemize(
        &format!("{}/base/", server.uri()),
        ItemizeOptions::default().with_depth(2),
    )
    .unwrap();
    drain(&mut items).await;
    let fetched = items.stats().fetched;

    assert_eq!(items.state(), IteratorState::Exhausted);
    for _ in 0..10 {
        assert_eq!(items.next().await, None);
    }
    assert!(items.done());
    assert_eq!(items.stats().fetched, fetched);
    items.close();
    assert_eq!(items.all().len(), 5);
}

#[tokio::test]
async fn test_can_be_closed_before_completion() {
    let server = start_base_site().await;

    let mut unfinished = itemize(
        &format!("{}/base/", server.uri()),
        ItemizeOptions::default().with_depth(2),
    )
    .unwrap();
    assert!(unfinished.next().await.is_some());
    unfinished.close();

    assert!(unfinished.done());
    assert_eq!(unfinished.next().await, None);
    assert_eq!(unfinished.all().len(), 1);
}

#[tokio::test]
async fn test_closed_never_fetches() {
    let server = start_base_site().await;

    let mut items = itemize(
        &format!("{}/base/", server.uri()),
        ItemizeOptions::default().with_depth(2),
    )
    .unwrap();
    items.next().await;
    items.close();

    let before = server.received_requests().await.unwrap().len();
    for _ in 0..5 {
        assert_eq!(items.next().await, None);
    }
    let after = server.received_requests().await.unwrap().len();

    assert_eq!(before, 1);
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_close_abandons_inflight_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(html("<html></html>").set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let mut items = itemize(
        &format!("{}/slow/", server.uri()),
        ItemizeOptions::default().with_depth(1),
    )
    .unwrap();

    let handle = items.close_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.close();
    });

    let started = Instant::now();
    assert_eq!(items.next().await, None);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(items.state(), IteratorState::Closed);
    assert!(items.all().is_empty());
}

#[tokio::test]
async fn test_dead_root_is_emitted() {
    let server = MockServer::start().await;
    let root = format!("{}/missing/", server.uri());

    let mut items = itemize(&root, ItemizeOptions::default().with_depth(2)).unwrap();
    assert_eq!(items.next().await, Some(root));
    assert!(items.done());
    assert_eq!(items.stats().dead_ends, 1);
}

#[tokio::test]
async fn test_ignores_querystrings_and_hashes_by_default() {
    let server = start_options_site().await;
    let root = format!("{}/options", server.uri());

    let mut items = itemize(&root, ItemizeOptions::default().with_depth(2)).unwrap();
    let all = drain(&mut items).await;

    assert_eq!(all, vec![root]);
    items.close();
}

#[tokio::test]
async fn test_follows_querystrings_with_query() {
    let server = start_options_site().await;
    let root = format!("{}/options", server.uri());

    let mut items = itemize(
        &root,
        ItemizeOptions::default().with_depth(2).with_query(true),
    )
    .unwrap();
    let all = drain(&mut items).await;

    assert_eq!(all.len(), 2);
    assert_eq!(all[0], root);
    assert_eq!(all[1], format!("{}/options?foo=bar", server.uri()));
    items.close();
}

#[tokio::test]
async fn test_follows_hashes_with_hash() {
    let server = start_options_site().await;
    let root = format!("{}/options", server.uri());

    let mut items = itemize(
        &root,
        ItemizeOptions::default().with_depth(2).with_hash(true),
    )
    .unwrap();
    let all = drain(&mut items).await;

    assert_eq!(all.len(), 2);
    assert_eq!(all[0], root);
    assert_eq!(all[1], format!("{}/options#foobar", server.uri()));
    items.close();
}

#[tokio::test]
async fn test_independent_crawls() {
    let server = start_base_site().await;
    let root = format!("{}/base/", server.uri());

    let mut first = itemize(&root, ItemizeOptions::default().with_depth(2)).unwrap();
    let mut second = itemize(&root, ItemizeOptions::default().with_depth(2)).unwrap();

    first.next().await;
    first.close();

    let all = drain(&mut second).await;
    assert_eq!(all.len(), 5);
    assert_eq!(first.all().len(), 1);
    second.close();
}

/// Serves /r/, whose links include a 404, a malformed href and a page that
/// answers slower than the client timeout, ahead of a live subtree
async fn start_faulty_site() -> MockServer {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/r/",
        "<html><body><a href='dead'>404</a><a href='http://[::1'>bad</a><a href='slow'>slow</a><a href='live/'>live</a></body></html>",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/r/slow"))
        .respond_with(
            html("<html><body><a href='never'>x</a></body></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    mount_html(
        &server,
        "/r/live/",
        "<html><body><a href='leaf'>leaf</a></body></html>",
    )
    .await;

    mount_html(&server, "/r/live/leaf", "<html><body>leaf</body></html>").await;

    server
}

#[tokio::test]
async fn test_failures_only_end_their_own_branch() {
    let server = start_faulty_site().await;
    let base = server.uri();

    let mut config = Config::default();
    config.options = ItemizeOptions::default().with_depth(3);
    config.fetcher.timeout_secs = 1;
    config.fetcher.connect_timeout_secs = 1;

    let mut items = itemize_with_config(&format!("{}/r/", base), &config).unwrap();
    let all = drain(&mut items).await;

    assert_eq!(
        all,
        vec![
            format!("{}/r/", base),
            format!("{}/r/dead", base),
            format!("{}/r/slow", base),
            format!("{}/r/live/", base),
            format!("{}/r/live/leaf", base),
        ]
    );

    let stats = items.stats();
    assert_eq!(stats.dead_ends, 2);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.fetched, 5);
    assert!(!all.concat().contains("never"));
    items.close();
}
