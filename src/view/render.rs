//! Text rendering of the feed screen.
//!
//! Produces the same composition as the page: hero, section header, then
//! either the loader or the card grid (never both), the category bar, and the
//! detail overlay when one is open.

use crate::models::{Article, Category};
use crate::view::state::{Detail, FeedState};
use itertools::Itertools;
use std::fmt::Write;

pub const LOADER_TEXT: &str = "SEARCHING COSMOS...";
const RULE: &str = "────────────────────────────────────────────────────────────";

/// Render a meter of `segments` cells, lighting cell `i` when `i < score / per_segment`.
fn meter(score: f64, segments: usize, per_segment: f64) -> String {
    (0..segments)
        .map(|i| if (i as f64) < score / per_segment { '▰' } else { '▱' })
        .collect()
}

/// Five cells, one per 20 points.
pub fn card_meter(score: f64) -> String {
    meter(score, 5, 20.0)
}

/// Ten cells, one per 10 points.
pub fn overlay_meter(score: f64) -> String {
    meter(score, 10, 10.0)
}

/// First eight characters of the id, upper-cased.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect::<String>().to_uppercase()
}

fn render_card(out: &mut String, number: usize, article: &Article) {
    writeln!(
        out,
        "[{}] {}  DATE: {}  {}",
        number, article.category, article.date, article.readTime
    )
    .unwrap();
    writeln!(out, "    {}", article.title).unwrap();
    writeln!(out, "    {}", article.summary).unwrap();
    let source_marker = if article.sourceUrl.is_some() { " •" } else { "" };
    writeln!(
        out,
        "    {}  ACCESS DATA{}",
        card_meter(article.impactScore),
        source_marker
    )
    .unwrap();
}

fn render_nav(out: &mut String, active: Category) {
    let items = Category::VALUES
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if *c == active {
                format!("[{}:{}]", i + 1, c.label())
            } else {
                format!(" {}:{} ", i + 1, c.label())
            }
        })
        .join(" ");
    writeln!(out, "{}", RULE).unwrap();
    writeln!(out, "{}", items).unwrap();
}

/// Render the full-article overlay.
pub fn render_detail(article: &Article) -> String {
    let mut out = String::new();
    writeln!(out, "╔{}", RULE).unwrap();
    writeln!(out, "║ ID: {} // SECURE", short_id(&article.id)).unwrap();
    writeln!(
        out,
        "║ {} // {}",
        article.category,
        article.date.replace('.', " :: ")
    )
    .unwrap();
    writeln!(out, "║").unwrap();
    writeln!(out, "║ {}", article.title).unwrap();
    writeln!(
        out,
        "║ IMPACT SCORE {}   READ TIME {}",
        overlay_meter(article.impactScore),
        article.readTime
    )
    .unwrap();
    writeln!(out, "║").unwrap();
    writeln!(out, "║ > {}", article.summary).unwrap();
    writeln!(out, "║").unwrap();
    for line in article.content.lines() {
        writeln!(out, "║ {}", line).unwrap();
    }
    if let Some(url) = &article.sourceUrl {
        writeln!(out, "║").unwrap();
        writeln!(out, "║ Source Data: {}", url).unwrap();
    }
    writeln!(out, "║ [close] Close Terminal").unwrap();
    writeln!(out, "╚{}", RULE).unwrap();
    out
}

/// Render the whole screen for `state`.
pub fn render(state: &FeedState) -> String {
    let mut out = String::new();

    writeln!(out, "U-SPACE").unwrap();
    writeln!(out, "Discover the Unknown Universe").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "LATEST NEWS  CATEGORY: {}  POWERED BY GEMINI 2.5",
        state.category()
    )
    .unwrap();
    writeln!(out, "{}", RULE).unwrap();

    if state.is_loading() {
        writeln!(out, "{}", LOADER_TEXT).unwrap();
    } else {
        // Three cards per row, like the wide layout.
        for row in &state.articles().iter().enumerate().chunks(3) {
            for (i, article) in row {
                render_card(&mut out, i + 1, article);
            }
            writeln!(out).unwrap();
        }
    }

    render_nav(&mut out, state.category());

    if let Detail::Open(article) = state.detail() {
        writeln!(out).unwrap();
        out.push_str(&render_detail(article));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FetchResult;
    use crate::news::fallback_article;

    fn article(id: &str, score: f64, source: Option<&str>) -> Article {
        Article {
            id: id.to_string(),
            title: format!("title {}", id),
            summary: format!("summary {}", id),
            content: "line one\nline two".to_string(),
            date: "2025.11.02".to_string(),
            category: Category::Astronomy,
            readTime: "4 min".to_string(),
            impactScore: score,
            sourceUrl: source.map(str::to_string),
        }
    }

    fn ready(articles: Vec<Article>) -> FeedState {
        let mut state = FeedState::new();
        let generation = state.begin_fetch(Category::Astronomy);
        state.commit(generation, FetchResult { articles });
        state
    }

    #[test]
    fn test_meters() {
        assert_eq!(card_meter(0.0), "▱▱▱▱▱");
        assert_eq!(card_meter(41.0), "▰▰▰▱▱");
        assert_eq!(card_meter(100.0), "▰▰▰▰▰");
        assert_eq!(overlay_meter(35.0), "▰▰▰▰▱▱▱▱▱▱");
        assert_eq!(overlay_meter(250.0), "▰▰▰▰▰▰▰▰▰▰");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("abcdefghijk"), "ABCDEFGH");
        assert_eq!(short_id("err-1"), "ERR-1");
    }

    #[test]
    fn test_loading_shows_only_loader() {
        let mut state = FeedState::new();
        state.begin_fetch(Category::All);
        let screen = render(&state);
        assert!(screen.contains(LOADER_TEXT));
        assert!(!screen.contains("DATE:"));
        assert!(screen.contains("CATEGORY: ALL"));
    }

    #[test]
    fn test_ready_shows_only_grid() {
        let state = ready(vec![article("a", 50.0, None), article("b", 10.0, Some("https://x"))]);
        let screen = render(&state);
        assert!(!screen.contains(LOADER_TEXT));
        assert!(screen.contains("[1] ASTRONOMY  DATE: 2025.11.02  4 min"));
        assert!(screen.contains("[2] ASTRONOMY"));
        assert!(screen.contains("title b"));
        assert!(screen.contains("ACCESS DATA •"));
        assert!(!screen.contains("║"));
    }

    #[test]
    fn test_grid_keeps_order_across_rows() {
        let articles = (0..5).map(|i| article(&i.to_string(), 0.0, None)).collect();
        let screen = render(&ready(articles));
        let first = screen.find("[1]").unwrap();
        let fourth = screen.find("[4]").unwrap();
        let fifth = screen.find("[5]").unwrap();
        assert!(first < fourth && fourth < fifth);
    }

    #[test]
    fn test_nav_marks_active_category() {
        let screen = render(&ready(vec![article("a", 0.0, None)]));
        assert!(screen.contains("[3:天文学]"));
        assert!(screen.contains(" 1:すべて "));
    }

    #[test]
    fn test_overlay_rendering() {
        let mut state = ready(vec![article("deadbeefcafe", 35.0, Some("https://src"))]);
        state.open(0);
        let screen = render(&state);
        assert!(screen.contains("ID: DEADBEEF // SECURE"));
        assert!(screen.contains("ASTRONOMY // 2025 :: 11 :: 02"));
        assert!(screen.contains("IMPACT SCORE ▰▰▰▰▱▱▱▱▱▱   READ TIME 4 min"));
        assert!(screen.contains("║ line two"));
        assert!(screen.contains("Source Data: https://src"));
    }

    #[test]
    fn test_overlay_without_source() {
        let detail = render_detail(&article("a", 0.0, None));
        assert!(!detail.contains("Source Data"));
    }

    #[test]
    fn test_fallback_card_renders() {
        let state = ready(vec![fallback_article("2025.01.01".to_string())]);
        let screen = render(&state);
        assert!(screen.contains("[1] TECH  DATE: 2025.01.01  0 min"));
        assert!(screen.contains("▱▱▱▱▱"));
    }
}
