//! Shared HTTP client.
//!
//! One `reqwest::Client` serves every network call in the pipeline: a browser
//! User-Agent (several journal sites refuse default library agents) and a
//! bounded per-request timeout. Redirects are followed; callers that resolve
//! relative URLs get the final post-redirect URL back alongside the body.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
});

/// GET a URL and return the response body together with the final URL after
/// redirects. Non-success statuses are errors.
pub async fn get_text(url: &str) -> Result<(String, Url), Box<dyn Error>> {
    let response = CLIENT.get(url).send().await?.error_for_status()?;
    let final_url = response.url().clone();
    let body = response.text().await?;
    Ok((body, final_url))
}
