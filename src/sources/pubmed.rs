//! PubMed fetch adapter, built on the NCBI E-utilities.
//!
//! Three round-trip kinds:
//!
//! 1. `esearch.fcgi`: one call, returns PMIDs for a query sorted most
//!    recent first
//! 2. `esummary.fcgi`: one batched call, returns title / journal /
//!    publication date per PMID
//! 3. the article page itself: one fetch per surviving record, because the
//!    E-utilities summary payload carries no abstract text
//!
//! Records outside the lookback window are dropped between steps 2 and 3 so
//! out-of-window entries never cost an abstract fetch. The esummary payload
//! is iterated in `result.uids` order (the API's recency order), never in
//! JSON-map order.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use serde_json::Value;
use std::error::Error;
use tracing::{debug, info, instrument};

use crate::http;
use crate::models::RawRecord;
use crate::normalize::normalize_date;

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// One row of the batched esummary response.
#[derive(Debug, Clone)]
struct PubmedSummary {
    pmid: String,
    title: String,
    journal: String,
    pubdate: String,
}

/// Fetch records for a PubMed query, capped at `limit`, restricted to the
/// lookback window.
#[instrument(level = "info", skip_all, fields(limit = limit))]
pub async fn fetch_records(
    query: &str,
    lookback_days: i64,
    limit: usize,
    base_tags: &[String],
    today: NaiveDate,
) -> Result<Vec<RawRecord>, Box<dyn Error>> {
    let pmids = search(query, (limit * 2).min(100)).await?;
    debug!(count = pmids.len(), "PubMed search returned PMIDs");
    let summaries = fetch_summaries(&pmids).await?;

    let eligible: Vec<PubmedSummary> = summaries
        .into_iter()
        .filter(|s| within_lookback(&s.pubdate, today, lookback_days))
        .take(limit)
        .collect();

    let records: Vec<RawRecord> = stream::iter(eligible)
        .then(|s| {
            let tags = base_tags.to_vec();
            async move {
                let url = format!("https://pubmed.ncbi.nlm.nih.gov/{}/", s.pmid);
                let summary = fetch_abstract(&url).await.unwrap_or_default();
                RawRecord {
                    title: s.title,
                    summary,
                    url,
                    source: s.journal,
                    published: s.pubdate,
                    media: None,
                    base_tags: tags,
                }
            }
        })
        .collect()
        .await;

    info!(count = records.len(), "Fetched PubMed records");
    Ok(records)
}

fn within_lookback(raw_date: &str, today: NaiveDate, lookback_days: i64) -> bool {
    let date = normalize_date(raw_date, today);
    (today - date).num_days() <= lookback_days.max(0)
}

/// esearch: query → PMID list, most recent first.
async fn search(query: &str, retmax: usize) -> Result<Vec<String>, Box<dyn Error>> {
    let url = format!(
        "{EUTILS_BASE}/esearch.fcgi?db=pubmed&retmode=json&sort=most+recent&retmax={retmax}&term={}",
        urlencoding::encode(query)
    );
    let (body, _) = http::get_text(&url).await?;
    parse_search(&body)
}

fn parse_search(body: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let value: Value = serde_json::from_str(body)?;
    let ids = value
        .pointer("/esearchresult/idlist")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(ids)
}

/// esummary: one batched call for every PMID.
async fn fetch_summaries(pmids: &[String]) -> Result<Vec<PubmedSummary>, Box<dyn Error>> {
    if pmids.is_empty() {
        return Ok(Vec::new());
    }
    let url = format!(
        "{EUTILS_BASE}/esummary.fcgi?db=pubmed&retmode=json&id={}",
        pmids.join(",")
    );
    let (body, _) = http::get_text(&url).await?;
    parse_summaries(&body)
}

fn parse_summaries(body: &str) -> Result<Vec<PubmedSummary>, Box<dyn Error>> {
    let value: Value = serde_json::from_str(body)?;
    let result = match value.get("result") {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };
    let uids: Vec<String> = result
        .get("uids")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut summaries = Vec::with_capacity(uids.len());
    for uid in uids {
        let entry = match result.get(&uid) {
            Some(e) => e,
            None => continue,
        };
        let field = |name: &str| {
            entry
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string()
        };
        let journal = {
            let full = field("fulljournalname");
            if full.is_empty() { field("source") } else { full }
        };
        let pubdate = ["pubdate", "epubdate", "sortpubdate"]
            .into_iter()
            .map(&field)
            .find(|d| !d.is_empty())
            .unwrap_or_default();
        summaries.push(PubmedSummary {
            pmid: uid,
            title: field("title"),
            journal,
            pubdate,
        });
    }
    Ok(summaries)
}

/// Scrape the abstract text from a PubMed article page. `None` on fetch
/// failure or when the page carries no abstract.
async fn fetch_abstract(url: &str) -> Option<String> {
    let (body, _) = http::get_text(url).await.ok()?;
    extract_abstract(&body)
}

fn extract_abstract(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    for selector in ["div.abstract-content", "div#abstract"] {
        let sel = Selector::parse(selector).unwrap();
        if let Some(element) = document.select(&sel).next() {
            let text: Vec<&str> = element.text().collect();
            let joined = text.join(" ");
            let trimmed = joined.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}
