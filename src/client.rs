use std::time::Duration;

use chrono::{Local, NaiveDate};
use futures::future::join_all;
use itertools::Itertools;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{HltvError, Result};
use crate::gate::AdmissionGate;
use crate::model::*;
use crate::render::PageRenderer;
use crate::scraper::{analytics, match_detail, matchlist, player, team, Html};

const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_CONCURRENT_RENDERS: usize = 10;

/// The main entry point for scraping HLTV.org.
///
/// `HltvClient` wraps a [`PageRenderer`] and exposes methods to discover
/// upcoming matches and to build a complete [`MatchRecord`] for each of them.
/// Every render goes through one process-wide admission gate, so the number
/// of pages being rendered at once never exceeds its capacity, however many
/// matches are in progress.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> hltv_scraper::Result<()> {
/// use hltv_scraper::{HltvClient, HttpRenderer};
///
/// let client = HltvClient::new(HttpRenderer::new());
/// for url in client.get_match_urls().await? {
///     let record = client.get_match(&url).await?;
///     println!("{} players", record.player_stats.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct HltvClient<R> {
    renderer: R,
    render_gate: AdmissionGate,
    render_timeout: Duration,
    render_retries: u32,
}

impl<R: PageRenderer> HltvClient<R> {
    /// Create a client with default render limits.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            render_gate: AdmissionGate::new(DEFAULT_MAX_CONCURRENT_RENDERS),
            render_timeout: DEFAULT_RENDER_TIMEOUT,
            render_retries: 0,
        }
    }

    /// Create a client with the render limits from `config`.
    pub fn from_config(renderer: R, config: &Config) -> Self {
        Self::new(renderer)
            .with_max_concurrent_renders(config.max_concurrent_renders)
            .with_render_timeout(config.render_timeout())
            .with_render_retries(config.render_retries)
    }

    pub fn with_max_concurrent_renders(mut self, n: usize) -> Self {
        self.render_gate = AdmissionGate::new(n);
        self
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    pub fn with_render_retries(mut self, retries: u32) -> Self {
        self.render_retries = retries;
        self
    }

    /// The gate bounding concurrent renders.
    pub fn render_gate(&self) -> &AdmissionGate {
        &self.render_gate
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Render a page through the render gate, retrying timeouts.
    #[instrument(skip(self))]
    pub async fn render(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            let result = {
                let _admission = self.render_gate.admit().await?;
                self.renderer.render(url, self.render_timeout).await
            };
            match result {
                Err(e) if e.is_timeout() && attempt < self.render_retries => {
                    attempt += 1;
                    warn!(url, attempt, "render timed out, retrying");
                }
                other => return other,
            }
        }
    }

    /// Discover the URLs of all upcoming matches with known teams.
    #[instrument(skip(self))]
    pub async fn get_match_urls(&self) -> Result<Vec<String>> {
        let markup = self.render(&matchlist::matches_index_url()).await?;
        let document = Html::parse_document(&markup);
        matchlist::parse_match_urls(&document)
    }

    /// Build the complete record for one match.
    ///
    /// Fails with [`HltvError::MatchFetchFailed`] only when the match page
    /// itself cannot be rendered or has no usable lineups. Player, team and
    /// analytics pages that fail are logged and degrade to empty data.
    #[instrument(skip(self))]
    pub async fn get_match(&self, url: &str) -> Result<MatchRecord> {
        self.build_match_record(url)
            .await
            .map_err(|e| HltvError::MatchFetchFailed {
                url: url.to_owned(),
                source: Box::new(e),
            })
    }

    async fn build_match_record(&self, url: &str) -> Result<MatchRecord> {
        let (match_id, slug) =
            matchlist::parse_match_id(url).ok_or(HltvError::RequiredFragmentMissing {
                context: "match id in match url",
            })?;

        let markup = self.render(url).await?;
        let page = {
            let document = Html::parse_document(&markup);
            match_detail::parse_match_page(&document)?
        };

        let players = page
            .lineups
            .iter()
            .flat_map(|lineup| lineup.players.iter())
            .collect_vec();
        let (player_stats, analytics, team_stats) = tokio::join!(
            self.get_players(&players),
            self.get_optional_analytics(page.analytics_url.as_deref()),
            join_all(
                page.lineups
                    .iter()
                    .map(|lineup| self.get_team_stats(lineup.team_id, &lineup.team_name))
            ),
        );

        info!(
            match_id = %match_id,
            players = player_stats.len(),
            analytics = analytics.is_some(),
            "built match record"
        );

        Ok(MatchRecord {
            match_id,
            slug,
            url: url.to_owned(),
            title: page.title,
            format: page.format,
            lineups: page.lineups,
            map_stats: page.map_stats,
            past_results: page.past_results,
            head_to_head: page.head_to_head,
            player_stats,
            analytics,
            team_stats,
        })
    }

    /// Fetch one player's stats page.
    #[instrument(skip(self))]
    pub async fn get_player(&self, player: &LineupPlayer) -> Result<PlayerProfile> {
        let markup = self.render(&player::player_url(player)).await?;
        let document = Html::parse_document(&markup);
        player::parse_player_profile(&document, player)
    }

    /// Fetch all players concurrently, keeping lineup order.
    async fn get_players(&self, players: &[&LineupPlayer]) -> Vec<PlayerProfile> {
        join_all(players.iter().map(|p| async move {
            self.get_player(p).await.unwrap_or_else(|e| {
                warn!(nickname = %p.nickname, error = %e, "player stats unavailable");
                PlayerProfile::unavailable(&p.player_id, &p.nickname)
            })
        }))
        .await
    }

    /// Fetch and parse a match analytics page.
    #[instrument(skip(self))]
    pub async fn get_match_analytics(&self, url: &str) -> Result<Option<MatchAnalytics>> {
        let markup = self.render(url).await?;
        let document = Html::parse_document(&markup);
        analytics::parse_match_analytics(&document)
    }

    async fn get_optional_analytics(&self, url: Option<&str>) -> Option<MatchAnalytics> {
        let url = url?;
        match self.get_match_analytics(url).await {
            Ok(analytics) => analytics,
            Err(e) => {
                warn!(url, error = %e, "match analytics unavailable");
                None
            }
        }
    }

    /// Fetch all six statistics pages of a team over the three months
    /// ending today.
    #[instrument(skip(self))]
    pub async fn get_team_stats(&self, team_id: u32, team_name: &str) -> TeamCategoryStats {
        let today = Local::now().date_naive();
        self.get_team_stats_until(team_id, team_name, today).await
    }

    /// Like [`HltvClient::get_team_stats`] with an explicit end date.
    pub async fn get_team_stats_until(
        &self,
        team_id: u32,
        team_name: &str,
        today: NaiveDate,
    ) -> TeamCategoryStats {
        let slug = team::team_slug(team_name);
        let window = team::stats_window(today);
        let mut stats = TeamCategoryStats::empty(team_name, team_id, &slug, window.0, window.1);

        let pages = join_all(TeamStatsCategory::iter().map(|category| {
            let slug = &slug;
            async move {
                self.get_team_category(category, team_id, slug, window)
                    .await
                    .unwrap_or_else(|e| {
                        warn!(team = %team_name, category = ?category, error = %e, "team stats page unavailable");
                        TeamCategoryPage::empty(category)
                    })
            }
        }))
        .await;
        for page in pages {
            page.merge_into(&mut stats);
        }
        debug!(team = %team_name, "collected team stats");
        stats
    }

    /// Fetch and parse a single team statistics page.
    pub async fn get_team_category(
        &self,
        category: TeamStatsCategory,
        team_id: u32,
        slug: &str,
        window: (NaiveDate, NaiveDate),
    ) -> Result<TeamCategoryPage> {
        let url = team::team_stats_url(category, team_id, slug, window);
        let markup = self.render(&url).await?;
        let document = Html::parse_document(&markup);
        team::parse_team_category(category, &document)
    }
}
