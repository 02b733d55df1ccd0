use crate::common::*;
use catalog_harvest::crawler::{harvest, Coordinator, Count, Phase};
use catalog_harvest::output::{CsvSink, DatasetSink};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_harvest_writes_normalized_dataset() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a", "/game/b"])).await;
    mount_index_page(&server, 2, index_page(&["/game/b", "/game/missing"])).await;
    mount_page(&server, "/game/a", detail_page("Alpha", "Rating4.2", "12.5K", "340")).await;
    mount_page(&server, "/game/b", detail_page("Beta", "Rating--", "7", "n/a")).await;

    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("out/dataset.csv");

    let mut config = create_test_config(&server, 2);
    config.output.dataset_path = dataset_path.to_string_lossy().to_string();
    let sink = CsvSink::from_config(&config.output);

    let report = harvest(config, CancellationToken::new()).await.unwrap();
    sink.write(&report.dataset).unwrap();

    assert_eq!(report.links_discovered, 3);
    assert_eq!(report.dataset.len(), 2);

    // Sorted link order: /game/a before /game/b
    let alpha = &report.dataset.records()[0];
    assert_eq!(alpha.title.as_deref(), Some("Alpha"));
    assert_eq!(alpha.rating, Some(4.2));
    assert_eq!(alpha.listed, Some(Count::Value(12_500)));
    assert_eq!(alpha.reviewed, Some(Count::Value(340)));
    assert_eq!(alpha.plays, Some(Count::Value(340)));
    assert_eq!(alpha.backlogs, Some(Count::Value(1_100)));

    let beta = &report.dataset.records()[1];
    assert_eq!(beta.title.as_deref(), Some("Beta"));
    assert_eq!(beta.rating, None);
    assert_eq!(beta.listed, Some(Count::Value(7)));
    assert_eq!(beta.plays, None);

    assert_eq!(report.normalization_issues.len(), 1);
    assert_eq!(report.normalization_issues[0].error.field, "Plays");
    assert_eq!(report.normalization_issues[0].error.raw_value, "n/a");

    let item_failures: Vec<_> = report.failures_in(Phase::Extraction).collect();
    assert_eq!(item_failures.len(), 1);
    assert!(item_failures[0].source_url.ends_with("/game/missing"));
    assert_eq!(item_failures[0].status(), Some(404));
    assert_eq!(report.failures_in(Phase::Discovery).count(), 0);

    let content = std::fs::read_to_string(&dataset_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some(concat!(
            "Title,ParentGame,ReleaseDate,Team,Rating,xListed,xReviewed,",
            "Platforms,Genres,Summary,Reviews,Plays,Playing,Backlogs,Wishlist"
        ))
    );
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("12500"));
}

#[tokio::test]
async fn test_no_links_still_writes_header() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, "<html><body></body></html>".to_string()).await;

    let dir = TempDir::new().unwrap();
    let dataset_path = dir.path().join("dataset.csv");
    let mut config = create_test_config(&server, 1);
    config.output.dataset_path = dataset_path.to_string_lossy().to_string();
    let sink = CsvSink::from_config(&config.output);

    let report = harvest(config, CancellationToken::new()).await.unwrap();
    sink.write(&report.dataset).unwrap();

    assert_eq!(report.links_discovered, 0);
    assert!(report.dataset.is_empty());
    assert_eq!(report.soft_misses.len(), 1);
    assert_eq!(std::fs::read_to_string(&dataset_path).unwrap().lines().count(), 1);
}

#[tokio::test]
async fn test_cancelled_run_sends_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(&["/game/a"])))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = harvest(create_test_config(&server, 3), cancel).await.unwrap();

    assert_eq!(report.skipped, 3);
    assert!(report.dataset.is_empty());
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_cancellation_lets_in_flight_items_finish() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a", "/game/b"])).await;
    Mock::given(method("GET"))
        .and(path("/game/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page("Alpha", "4.0", "1K", "2K"))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/game/b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(detail_page("Beta", "3.0", "1K", "2K")),
        )
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, 1);
    config.harvest.max_concurrent_requests = 1;
    let cancel = CancellationToken::new();
    let coordinator = Coordinator::new(config)
        .unwrap()
        .with_cancellation(cancel.clone());

    let links = coordinator.discover().await.unwrap();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });
    let items = coordinator.extract(&links.sorted_links()).await;

    assert_eq!(items.dataset.len(), 1);
    let alpha = &items.dataset.records()[0];
    assert_eq!(alpha.title.as_deref(), Some("Alpha"));
    assert_eq!(alpha.rating, Some(4.0));
    assert_eq!(items.skipped, 1);
}

#[tokio::test]
async fn test_report_survives_unwritable_dataset_path() {
    let server = MockServer::start().await;
    mount_index_page(&server, 1, index_page(&["/game/a", "/game/gone"])).await;
    mount_page(&server, "/game/a", detail_page("Alpha", "4.0", "1K", "2K")).await;

    // A regular file where the output directory should be
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut config = create_test_config(&server, 1);
    config.output.dataset_path = blocker.join("dataset.csv").to_string_lossy().to_string();
    let sink = CsvSink::from_config(&config.output);

    let report = harvest(config, CancellationToken::new()).await.unwrap();

    assert!(sink.write(&report.dataset).is_err());
    assert_eq!(report.dataset.len(), 1);
    assert_eq!(report.failures_in(Phase::Extraction).count(), 1);
}
