//! End-to-end behavior of the view counter through the HTTP surface.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use folia::application::views::ViewStore;
use folia::domain::content;
use tower::ServiceExt;

async fn get(router: axum::Router, path: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 2 * 1024 * 1024)
        .await
        .expect("body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn first_view_shows_an_optimistic_count_of_one() {
    let harness = common::harness();
    let slug = content::all_posts()[0].slug;

    let (status, body) = get(harness.router, &format!("/blog/{slug}")).await;

    assert_eq!(status, StatusCode::OK);
    // Nothing is stored yet; the viewer who caused the increment sees 0 + 1.
    assert!(body.contains("1 views"), "optimistic label missing");
}

#[tokio::test]
async fn viewing_a_post_eventually_persists_the_increment() {
    let harness = common::harness();
    let slug = content::all_posts()[0].slug;
    let key = format!("{}{slug}", common::KEY_PREFIX);

    let (status, _) = get(harness.router, &format!("/blog/{slug}")).await;
    assert_eq!(status, StatusCode::OK);

    // The increment is detached from the request; give the spawned task a
    // bounded window to land.
    let mut stored = None;
    for _ in 0..100 {
        stored = harness.store.get(&key).await.expect("store read");
        if stored.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(stored, Some(1));
}

#[tokio::test]
async fn listing_shows_stored_counts_without_bumping_them() {
    let harness = common::harness();
    let slug = content::all_posts()[0].slug;
    harness
        .store
        .set(&format!("{}{slug}", common::KEY_PREFIX), 41)
        .await
        .expect("seed");

    let (status, body) = get(harness.router.clone(), "/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("41 views"));

    // Rendering the list did not record a view.
    let stored = harness
        .store
        .get(&format!("{}{slug}", common::KEY_PREFIX))
        .await
        .expect("store read");
    assert_eq!(stored, Some(41));
}

#[tokio::test]
async fn zero_count_posts_render_without_a_views_label() {
    let harness = common::harness();

    let (status, body) = get(harness.router, "/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("views</span>"), "unexpected views label");
}

#[tokio::test]
async fn increment_invalidates_the_cached_listing() {
    let harness = common::harness();
    let slug = content::all_posts()[0].slug;
    let key = format!("{}{slug}", common::KEY_PREFIX);
    harness.store.set(&key, 5).await.expect("seed");

    let (_, first) = get(harness.router.clone(), "/blog").await;
    assert!(first.contains("5 views"));

    // A direct store write is invisible while both cache layers are warm.
    harness.store.set(&key, 7).await.expect("reseed");
    let (_, second) = get(harness.router.clone(), "/blog").await;
    assert!(second.contains("5 views"));

    // An increment reads 7, writes 8, and invalidates the aggregate cache
    // and the cached listing response.
    harness.counter.increment(slug).await;
    let (_, third) = get(harness.router.clone(), "/blog").await;
    assert!(third.contains("8 views"), "stale listing after increment");
}
