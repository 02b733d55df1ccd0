use catalog_harvest::config::Config;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_AGENT: &str = "TestAgent/1.0";
pub const LISTING_PATH: &str = "/games/lib/popular";

/// A valid config pointed at the mock server's listing
pub fn create_test_config(server: &MockServer, pages: u32) -> Config {
    let mut config = Config::default();
    config.harvest.base_url = format!("{}{}", server.uri(), LISTING_PATH);
    config.harvest.pages = pages;
    config.harvest.request_timeout_ms = 2_000;
    config.harvest.connect_timeout_ms = 1_000;
    config.user_agent.pool = vec![TEST_AGENT.to_string()];
    config
}

/// An index page whose item grid holds one card per href
pub fn index_page(hrefs: &[&str]) -> String {
    let cards: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="col-2 my-2 px-1 px-md-2"><a href="{}"><img alt="cover"></a></div>"#,
                href
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Games</title></head><body>
           <div class="row show-release toggle-fade">{}</div>
           </body></html>"#,
        cards
    )
}

/// A detail page with the given title, rating text and counters
pub fn detail_page(title: &str, rating: &str, listed: &str, plays: &str) -> String {
    format!(
        r#"<html><body>
          <div class="col-auto pr-1"><h1>{title}</h1></div>
          <div class="col-auto mt-auto pr-0">Released on Mar 3, 2017</div>
          <div class="col-auto pl-lg-1 sub-title"><a href="/company/x">Studio X</a></div>
          <h1 id="score">{rating}</h1>
          <p class="game-page-sidecard">{listed} Lists</p>
          <p class="game-page-sidecard">340 Reviews</p>
          <a class="game-page-platform">PC</a>
          <p class="genre-tag">Platformer</p>
          <div id="collapseSummary">A summary.</div>
          <div class="col-12 mb-1"><p>Plays</p><p>{plays}</p></div>
          <div class="col-12 mb-1"><p>Playing</p><p>12</p></div>
          <div class="col-12 mb-1"><p>Backlogs</p><p>1.1K</p></div>
          <div class="col-12 mb-1"><p>Wishlist</p><p>950</p></div>
        </body></html>"#
    )
}

/// Serves `body` for `GET LISTING_PATH?page=N`
pub async fn mount_index_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves `body` for `GET item_path`
pub async fn mount_page(server: &MockServer, item_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(item_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
