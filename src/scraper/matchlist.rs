use ::scraper::Selector;
use itertools::Itertools;
use tracing::debug;

use crate::error::Result;
use crate::scraper::{absolute_url, select_attr, Html, BASE_URL};

pub(crate) fn matches_index_url() -> String {
    format!("{BASE_URL}/matches")
}

/// Collect the absolute URLs of all upcoming matches that already have teams.
pub(crate) fn parse_match_urls(document: &Html) -> Result<Vec<String>> {
    let item_selector =
        Selector::parse("div.upcomingMatchesSection div.upcomingMatch[team1]")?;
    let link_selector = Selector::parse("a.match")?;

    let urls = document
        .select(&item_selector)
        .filter_map(|item| select_attr(&item, &link_selector, "href"))
        .map(|href| absolute_url(&href))
        .unique()
        .collect_vec();
    debug!(count = urls.len(), "parsed upcoming match urls");
    Ok(urls)
}

/// Split a match URL into its numeric id and trailing slug.
///
/// `https://www.hltv.org/matches/2371234/mouz-vs-vitality-blast` yields
/// `("2371234", "mouz-vs-vitality-blast")`.
pub(crate) fn parse_match_id(url: &str) -> Option<(String, String)> {
    let path = url
        .split_once("/matches/")
        .map(|(_, rest)| rest)?
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let id = segments.next()?;
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let slug = segments.next().unwrap_or_default();
    Some((id.to_string(), slug.to_string()))
}
