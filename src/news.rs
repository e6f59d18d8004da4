//! News fetch adapter.
//!
//! Turns a [`Category`] into a batch of articles by prompting a
//! search-grounded model and parsing its free-text reply:
//!
//! 1. **Prompt**: ask for six recent stories, filtered or mixed by category,
//!    summarized in Japanese, as raw JSON
//! 2. **Ask**: one call through [`AskAsync`], no retry
//! 3. **Clean**: strip Markdown code fences the model adds despite instructions
//! 4. **Parse**: decode as [`FetchResult`], rejecting an empty batch
//! 5. **Fallback**: any failure in 2-4 yields the single offline article
//!
//! [`fetch_news`] never returns an error; callers always get a non-empty batch.

use crate::api::{AskAsync, GeminiClient};
use crate::error::{Error, Result};
use crate::models::{Article, Category, FetchResult};
use crate::utils::{looks_truncated, today_dotted, truncate_for_log};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Identifier of the synthetic article served when fetching fails.
pub const FALLBACK_ID: &str = "err-1";

/// Number of stories requested per fetch. Not enforced on the reply.
pub const STORIES_PER_FETCH: usize = 6;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?").expect("valid regex"));

/// Anything that can produce a batch of news for a category.
///
/// Implementations must never fail: errors are folded into a fallback batch
/// before they reach the view.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self, category: Category) -> FetchResult;
}

#[async_trait]
impl NewsSource for GeminiClient {
    async fn fetch(&self, category: Category) -> FetchResult {
        fetch_news(self, category).await
    }
}

/// Build the instruction sent to the model for `category`.
pub fn build_prompt(category: Category) -> String {
    let focus = if category.is_concrete() {
        format!("Focus only on the \"{}\" category.", category)
    } else {
        let mix = Category::CONCRETE.map(|c| c.as_str()).join(", ");
        format!("No specific category was requested; mix {}.", mix)
    };

    format!(
        r#"
You are U-Space, a futuristic space news aggregator for Japan.

TASK:
1. Search for the very latest space news (focus on the last 24-48 hours) using Google Search.
2. Select {count} distinct, exciting stories.
3. {focus}
4. Translate and summarize the news into Japanese.

OUTPUT FORMAT:
Return a valid JSON object strictly matching this structure (do not use Markdown code blocks, just raw JSON string):
{{
  "articles": [
    {{
      "id": "unique_string",
      "title": "Japanese title (max 40 chars)",
      "summary": "Japanese summary (max 80 chars)",
      "content": "Detailed article body in Japanese (approx 400 chars). detailed and futuristic tone.",
      "date": "YYYY.MM.DD (The actual date of the news)",
      "category": "One of: ROCKETS, ASTRONOMY, TECH, FUTURE",
      "readTime": "e.g. '3 min'",
      "impactScore": number (1-100),
      "sourceUrl": "The actual URL of the news source found"
    }}
  ]
}}
"#,
        count = STORIES_PER_FETCH,
        focus = focus,
    )
}

/// Remove ```` ```json ```` / ```` ``` ```` markers and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

/// Decode a raw model reply into a non-empty batch.
pub fn parse_reply(raw: &str) -> Result<FetchResult> {
    let cleaned = strip_code_fences(raw);
    let result = serde_json::from_str::<FetchResult>(&cleaned).inspect_err(|e| {
        warn!(
            error = %e,
            truncated = looks_truncated(e),
            reply_preview = %truncate_for_log(&cleaned, 300),
            "Model returned non-conforming JSON"
        );
    })?;

    if result.articles.is_empty() {
        return Err(Error::NoArticles);
    }
    Ok(result)
}

/// The single synthetic article shown when news cannot be fetched.
pub fn fallback_article(date: String) -> Article {
    Article {
        id: FALLBACK_ID.to_string(),
        title: "システム通信障害: オフラインモード".to_string(),
        summary: "最新ニュースの取得に失敗しました。しばらく経ってから再試行してください。".to_string(),
        content: "現在、深宇宙通信ネットワークに障害が発生しています。APIクォータ制限、または接続エラーの可能性があります。手動での再接続を試みるか、しばらく待機してください。".to_string(),
        date,
        category: Category::Tech,
        readTime: "0 min".to_string(),
        impactScore: 0.0,
        sourceUrl: Some("#".to_string()),
    }
}

pub fn fallback_result() -> FetchResult {
    FetchResult {
        articles: vec![fallback_article(today_dotted())],
    }
}

async fn try_fetch<A>(api: &A, category: Category) -> Result<FetchResult>
where
    A: AskAsync<Response = String>,
{
    let prompt = build_prompt(category);
    let reply = api.ask(&prompt).await?;
    parse_reply(&reply)
}

/// Fetch news for `category`, degrading to [`fallback_result`] on any failure.
///
/// Whatever count the model returns is accepted as-is; only a reply with no
/// usable articles triggers the fallback.
#[instrument(level = "info", skip_all, fields(%category))]
pub async fn fetch_news<A>(api: &A, category: Category) -> FetchResult
where
    A: AskAsync<Response = String>,
{
    let t0 = Instant::now();
    match try_fetch(api, category).await {
        Ok(result) => {
            if result.articles.len() != STORIES_PER_FETCH {
                warn!(
                    count = result.articles.len(),
                    requested = STORIES_PER_FETCH,
                    "Model returned an unexpected number of stories"
                );
            }
            info!(
                count = result.articles.len(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Fetched news"
            );
            result
        }
        Err(e) => {
            error!(
                error = %e,
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "News fetch failed; serving offline fallback"
            );
            fallback_result()
        }
    }
}
