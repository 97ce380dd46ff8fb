use ::scraper::Selector;
use tracing::debug;

use crate::error::Result;
use crate::model::{LineupPlayer, PlayerProfile, StatTable};
use crate::scraper::{cell_text, child_cells, select_text, Html, BASE_URL};

pub(crate) fn player_url(player: &LineupPlayer) -> String {
    format!(
        "{BASE_URL}/stats/players/{}/{}",
        player.player_id, player.nickname
    )
}

/// Parse a player stats page. Falls back to the lineup nickname when the
/// page does not show one.
pub(crate) fn parse_player_profile(
    document: &Html,
    player: &LineupPlayer,
) -> Result<PlayerProfile> {
    let root = document.root_element();

    let nickname_selector = Selector::parse(".summaryNickname")?;
    let real_name_selector = Selector::parse(".summaryRealname")?;
    let team_selector = Selector::parse(".SummaryTeamname")?;
    let age_selector = Selector::parse(".summaryPlayerAge")?;

    let breakdown_selector = Selector::parse(".summaryStatBreakdown")?;
    let breakdown_label_selector = Selector::parse(".summaryStatTooltip b")?;
    let breakdown_value_selector = Selector::parse(".summaryStatBreakdownDataValue")?;
    let short_stats: StatTable = document
        .select(&breakdown_selector)
        .filter_map(|e| {
            let label = select_text(&e, &breakdown_label_selector)?;
            Some((label, select_text(&e, &breakdown_value_selector)))
        })
        .collect();

    let row_selector = Selector::parse(".stats-row")?;
    let full_stats: StatTable = document
        .select(&row_selector)
        .filter_map(|row| {
            let cells = child_cells(&row);
            Some((cell_text(&cells, 0)?, cell_text(&cells, 1)))
        })
        .collect();

    let profile = PlayerProfile {
        player_id: player.player_id.clone(),
        nickname: select_text(&root, &nickname_selector)
            .unwrap_or_else(|| player.nickname.clone()),
        real_name: select_text(&root, &real_name_selector),
        team: select_text(&root, &team_selector),
        age: select_text(&root, &age_selector),
        short_stats,
        full_stats,
    };
    debug!(
        nickname = %profile.nickname,
        short = profile.short_stats.len(),
        full = profile.full_stats.len(),
        "parsed player profile"
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> LineupPlayer {
        LineupPlayer {
            player_id: "11816".to_string(),
            nickname: "torzsi".to_string(),
        }
    }

    #[test]
    fn test_player_url() {
        assert_eq!(
            player_url(&player()),
            "https://www.hltv.org/stats/players/11816/torzsi"
        );
    }

    #[test]
    fn test_parse_player_profile() {
        let html = r#"<html><body>
          <h1 class="summaryNickname text-ellipsis">torzsi</h1>
          <div class="summaryRealname text-ellipsis"><div class="text-ellipsis">Ádám Torzsás</div></div>
          <div class="SummaryTeamname text-ellipsis"><a href="/stats/teams/4494/mouz">MOUZ</a></div>
          <div class="summaryPlayerAge">22 years</div>
          <div class="summaryStatBreakdownRow">
            <div class="summaryStatBreakdown">
              <div class="summaryStatTooltip"><b>Rating 2.0</b><span>tooltip</span></div>
              <div class="summaryStatBreakdownDataValue">1.15</div>
            </div>
            <div class="summaryStatBreakdown">
              <div class="summaryStatTooltip"><b>KAST</b></div>
              <div class="summaryStatBreakdownDataValue">74.1%</div>
            </div>
          </div>
          <div class="statistics">
            <div class="stats-row"><span>Total kills</span><span>12654</span></div>
            <div class="stats-row"><span>Headshot %</span><span>33.9%</span></div>
            <div class="stats-row"><span>Rounds with a kill</span><span></span></div>
          </div>
        </body></html>"#;
        let document = Html::parse_document(html);
        let profile = parse_player_profile(&document, &player()).unwrap();

        assert_eq!(profile.nickname, "torzsi");
        assert_eq!(profile.real_name.as_deref(), Some("Ádám Torzsás"));
        assert_eq!(profile.team.as_deref(), Some("MOUZ"));
        assert_eq!(profile.age.as_deref(), Some("22 years"));

        assert_eq!(profile.short_stats.keys().collect::<Vec<_>>(), vec!["Rating 2.0", "KAST"]);
        assert_eq!(profile.short_stats.get("KAST"), Some(&Some("74.1%".to_string())));

        assert_eq!(profile.full_stats.len(), 3);
        assert_eq!(
            profile.full_stats.keys().collect::<Vec<_>>(),
            vec!["Total kills", "Headshot %", "Rounds with a kill"]
        );
        assert_eq!(profile.full_stats.get("Rounds with a kill"), Some(&None));
    }

    #[test]
    fn test_parse_player_profile_empty_page() {
        let document = Html::parse_document("<html><body></body></html>");
        let profile = parse_player_profile(&document, &player()).unwrap();

        assert_eq!(profile.nickname, "torzsi");
        assert_eq!(profile.real_name, None);
        assert_eq!(profile.team, None);
        assert_eq!(profile.age, None);
        assert!(profile.short_stats.is_empty());
        assert!(profile.full_stats.is_empty());
    }
}
