use chrono::{DateTime, Local};
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use super::Listing;
use crate::config::Config;
use crate::error::SourceError;
use crate::post::PostRecord;

/// Newest submissions per request, the endpoint maximum
const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct RedditListing {
    data: RedditListingData,
}

#[derive(Debug, Deserialize)]
struct RedditListingData {
    children: Vec<RedditListingChild>,
}

#[derive(Debug, Deserialize)]
struct RedditListingChild {
    data: RedditPostData,
}

#[derive(Debug, Deserialize)]
struct RedditPostData {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    link_flair_text: Option<String>,
}

impl RedditPostData {
    fn into_record(self, observed_at: DateTime<Local>) -> PostRecord {
        PostRecord {
            id: self.name.unwrap_or(self.id),
            subreddit: self.subreddit,
            title: self.title,
            selftext: self.selftext,
            url: self.url,
            flair: self.link_flair_text,
            observed_at,
        }
    }
}

/// Decode a `/new.json` listing body, newest first as the endpoint returns it.
pub fn parse_listing(body: &str, observed_at: DateTime<Local>) -> Result<Vec<PostRecord>, SourceError> {
    let listing: RedditListing = serde_json::from_str(body)?;

    Ok(listing
        .data
        .children
        .into_iter()
        .map(|child| child.data.into_record(observed_at))
        .collect())
}

/// Unauthenticated client for a subreddit's public listing
pub struct RedditClient {
    http: Client,
    endpoint: String,
}

impl RedditClient {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        Ok(RedditClient {
            http,
            endpoint: listing_url(&config.api_base, &config.subreddit),
        })
    }
}

impl Listing for RedditClient {
    fn fetch_new(&mut self) -> Result<Vec<PostRecord>, SourceError> {
        debug!(endpoint = %self.endpoint, "polling listing");

        let response = self.http.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status { status: status.as_u16() });
        }

        let body = response.text()?;
        parse_listing(&body, Local::now())
    }
}

fn listing_url(base: &str, subreddit: &str) -> String {
    format!(
        "{}/r/{}/new.json?limit={PAGE_SIZE}&raw_json=1",
        base.trim_end_matches('/'),
        subreddit
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "kind": "Listing",
        "data": {
            "after": "t3_bbb",
            "children": [
                {"kind": "t3", "data": {
                    "id": "bbb", "name": "t3_bbb", "subreddit": "relationships",
                    "title": "My [25F] breakup", "selftext": "long story",
                    "url": "https://www.reddit.com/r/relationships/comments/bbb/",
                    "link_flair_text": "Breakups", "score": 3
                }},
                {"kind": "t3", "data": {
                    "id": "aaa", "subreddit": "relationships",
                    "title": "Link post", "url": "https://example.com",
                    "link_flair_text": null
                }}
            ]
        }
    }"#;

    #[test]
    fn listing_decodes_into_records() {
        let now = Local::now();
        let posts = parse_listing(LISTING, now).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "t3_bbb");
        assert_eq!(posts[0].flair.as_deref(), Some("Breakups"));
        assert_eq!(posts[0].observed_at, now);
        assert_eq!(posts[1].selftext, "");
        assert_eq!(posts[1].flair, None);
    }

    #[test]
    fn missing_fullname_falls_back_to_bare_id() {
        let posts = parse_listing(LISTING, Local::now()).unwrap();
        assert_eq!(posts[1].id, "aaa");
        assert_eq!(posts[1].fullname(), "t3_aaa");
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let err = parse_listing(r#"{"kind": "Listing"}"#, Local::now()).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn url_targets_new_listing() {
        assert_eq!(
            listing_url("https://www.reddit.com/", "relationships"),
            "https://www.reddit.com/r/relationships/new.json?limit=100&raw_json=1"
        );
    }
}
