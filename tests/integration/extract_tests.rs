use crate::common::*;
use catalog_harvest::crawler::{build_http_client, extract_record, Count, UserAgentPool};
use catalog_harvest::config::Config;
use catalog_harvest::FetchCause;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_and_agents() -> (reqwest::Client, UserAgentPool) {
    let config = Config::default();
    (
        build_http_client(&config.harvest).unwrap(),
        UserAgentPool::new(&config.user_agent),
    )
}

#[tokio::test]
async fn test_rating_parsed_from_tail() {
    let server = MockServer::start().await;
    mount_page(&server, "/game/a", detail_page("Celeste", "Rating4.2", "2K", "9K")).await;

    let (client, agents) = client_and_agents();
    let url = format!("{}/game/a", server.uri());
    let record = extract_record(&client, &agents, &url).await.unwrap();

    assert_eq!(record.url, url);
    assert_eq!(record.title.as_deref(), Some("Celeste"));
    assert_eq!(record.rating, Some(4.2));
    assert_eq!(record.release_date.as_deref(), Some("Mar 3, 2017"));
    assert_eq!(record.team, Some(vec!["Studio X".to_string()]));
    assert_eq!(record.listed, Some(Count::Raw("2K".to_string())));
    assert_eq!(record.reviewed, Some(Count::Raw("340".to_string())));
    assert_eq!(record.plays, Some(Count::Raw("9K".to_string())));
}

#[tokio::test]
async fn test_unparseable_rating_is_null() {
    let server = MockServer::start().await;
    mount_page(&server, "/game/a", detail_page("Celeste", "Rating--", "2K", "9K")).await;

    let (client, agents) = client_and_agents();
    let url = format!("{}/game/a", server.uri());
    let record = extract_record(&client, &agents, &url).await.unwrap();

    assert_eq!(record.rating, None);
    assert_eq!(record.title.as_deref(), Some("Celeste"));
}

#[tokio::test]
async fn test_missing_rating_element_keeps_other_fields() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/game/a",
        r#"<html><body>
             <div class="col-auto pr-1">Celeste</div>
             <p class="genre-tag">Platformer</p>
           </body></html>"#
            .to_string(),
    )
    .await;

    let (client, agents) = client_and_agents();
    let record = extract_record(&client, &agents, &format!("{}/game/a", server.uri()))
        .await
        .unwrap();

    assert_eq!(record.title.as_deref(), Some("Celeste"));
    assert_eq!(record.rating, None);
    assert_eq!(record.genres, vec!["Platformer"]);
    assert!(record.platforms.is_empty());
    assert!(record.reviews.is_empty());
}

#[tokio::test]
async fn test_failed_fetch_yields_no_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/game/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let (client, agents) = client_and_agents();
    let url = format!("{}/game/gone", server.uri());
    let err = extract_record(&client, &agents, &url).await.unwrap_err();

    assert_eq!(err.url, url);
    assert_eq!(err.cause, FetchCause::Status(410));
}

#[tokio::test]
async fn test_one_request_per_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/game/a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(detail_page("Celeste", "4.5", "1K", "2K")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, agents) = client_and_agents();
    let record = extract_record(&client, &agents, &format!("{}/game/a", server.uri()))
        .await
        .unwrap();
    assert_eq!(record.rating, Some(4.5));
}
