use crate::common::*;
use catalog_harvest::crawler::{Coordinator, FailureCause, Phase};
use catalog_harvest::FetchCause;
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn expected(server: &MockServer, paths: &[&str]) -> HashSet<String> {
    paths
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect()
}

#[tokio::test]
async fn test_single_page_two_cards() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a", "/game/b"])).await;

    let coordinator = Coordinator::new(create_test_config(&server, 1)).unwrap();
    let harvest = coordinator.discover().await.unwrap();

    assert_eq!(harvest.links, expected(&server, &["/game/a", "/game/b"]));
    assert!(harvest.failures.is_empty());
    assert!(harvest.soft_misses.is_empty());
}

#[tokio::test]
async fn test_links_deduplicated_across_pages() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a", "/game/shared"])).await;
    mount_index_page(&server, 2, index_page(&["/game/shared", "/game/b"])).await;

    let coordinator = Coordinator::new(create_test_config(&server, 2)).unwrap();
    let harvest = coordinator.discover().await.unwrap();

    assert_eq!(harvest.links.len(), 3);
    assert_eq!(
        harvest.links,
        expected(&server, &["/game/a", "/game/shared", "/game/b"])
    );
}

#[tokio::test]
async fn test_failing_page_does_not_abort_harvest() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a"])).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_index_page(&server, 3, index_page(&["/game/c"])).await;

    let coordinator = Coordinator::new(create_test_config(&server, 3)).unwrap();
    let harvest = coordinator.discover().await.unwrap();

    assert_eq!(harvest.links, expected(&server, &["/game/a", "/game/c"]));
    assert_eq!(harvest.failures.len(), 1);

    let failure = &harvest.failures[0];
    assert_eq!(failure.phase, Phase::Discovery);
    assert!(failure.source_url.ends_with("page=2"));
    assert_eq!(failure.cause, FailureCause::Fetch(FetchCause::Status(503)));
}

#[tokio::test]
async fn test_unmatched_page_is_recorded_as_404() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a"])).await;

    let coordinator = Coordinator::new(create_test_config(&server, 2)).unwrap();
    let harvest = coordinator.discover().await.unwrap();

    assert_eq!(harvest.links.len(), 1);
    assert_eq!(harvest.failures.len(), 1);
    assert_eq!(harvest.failures[0].status(), Some(404));
}

#[tokio::test]
async fn test_page_without_grid_is_soft_miss() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a"])).await;
    mount_index_page(
        &server,
        2,
        "<html><body><p>No more games</p></body></html>".to_string(),
    )
    .await;

    let coordinator = Coordinator::new(create_test_config(&server, 2)).unwrap();
    let harvest = coordinator.discover().await.unwrap();

    assert_eq!(harvest.links.len(), 1);
    assert!(harvest.failures.is_empty());
    assert_eq!(harvest.soft_misses.len(), 1);
    assert!(harvest.soft_misses[0].ends_with("page=2"));
}

#[tokio::test]
async fn test_card_without_link_fails_only_its_page() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a"])).await;
    mount_index_page(
        &server,
        2,
        r#"<div class="row show-release toggle-fade">
             <div class="col-2 my-2 px-1 px-md-2"><a href="/game/b">B</a></div>
             <div class="col-2 my-2 px-1 px-md-2"><span>broken</span></div>
           </div>"#
            .to_string(),
    )
    .await;

    let coordinator = Coordinator::new(create_test_config(&server, 2)).unwrap();
    let harvest = coordinator.discover().await.unwrap();

    assert_eq!(harvest.links, expected(&server, &["/game/a"]));
    assert_eq!(harvest.failures.len(), 1);
    assert!(matches!(
        harvest.failures[0].cause,
        FailureCause::Extraction(_)
    ));
}

#[tokio::test]
async fn test_slow_page_times_out_and_is_recorded() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a"])).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(index_page(&["/game/slow"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, 2);
    config.harvest.request_timeout_ms = 300;

    let coordinator = Coordinator::new(config).unwrap();
    let harvest = coordinator.discover().await.unwrap();

    assert_eq!(harvest.links, expected(&server, &["/game/a"]));
    assert_eq!(harvest.failures.len(), 1);
    assert_eq!(
        harvest.failures[0].cause,
        FailureCause::Fetch(FetchCause::Timeout)
    );
}

#[tokio::test]
async fn test_requests_carry_pool_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(header("user-agent", TEST_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(&["/game/a"])))
        .expect(2)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(&server, 2)).unwrap();
    let harvest = coordinator.discover().await.unwrap();

    assert_eq!(harvest.links.len(), 1);
    assert!(harvest.failures.is_empty());
}

#[tokio::test]
async fn test_sequential_and_concurrent_agree() {
    let server = MockServer::start().await;
    for page in 1..=5 {
        let hrefs = [format!("/game/{}", page), "/game/common".to_string()];
        let hrefs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
        mount_index_page(&server, page, index_page(&hrefs)).await;
    }

    let mut sequential = create_test_config(&server, 5);
    sequential.harvest.max_concurrent_requests = 1;
    let mut concurrent = create_test_config(&server, 5);
    concurrent.harvest.max_concurrent_requests = 5;

    let a = Coordinator::new(sequential).unwrap().discover().await.unwrap();
    let b = Coordinator::new(concurrent).unwrap().discover().await.unwrap();

    assert_eq!(a.links, b.links);
    assert_eq!(a.links.len(), 6);
}
