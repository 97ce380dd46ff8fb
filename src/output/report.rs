use std::io::{self, Write};

use itertools::Itertools;

use crate::model::*;

const MISSING: &str = "-";

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(MISSING)
}

fn section<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "== {title} ==")
}

fn stat_table<W: Write>(w: &mut W, indent: &str, table: &StatTable) -> io::Result<()> {
    for (label, value) in table.iter() {
        writeln!(w, "{indent}{label}: {}", or_missing(value.as_deref()))?;
    }
    Ok(())
}

/// Write a human-readable summary of a match record.
///
/// Sections appear in a fixed order; the analytics sections are left out
/// when the match has no analytics panel.
pub fn write_report<W: Write>(w: &mut W, record: &MatchRecord) -> io::Result<()> {
    writeln!(w, "Tournament: {}", or_missing(record.title.as_deref()))?;
    writeln!(w, "Format: {}", or_missing(record.format.as_deref()))?;
    writeln!(w, "Match: {}", record.url)?;

    lineups(w, &record.lineups)?;
    player_stats(w, &record.player_stats)?;
    map_stats(w, &record.map_stats)?;
    past_results(w, &record.past_results)?;
    head_to_head(w, &record.head_to_head)?;
    if let Some(analytics) = &record.analytics {
        analytics_sections(w, analytics)?;
    }
    for team in &record.team_stats {
        team_stats(w, team)?;
    }
    Ok(())
}

fn lineups<W: Write>(w: &mut W, lineups: &[TeamLineup]) -> io::Result<()> {
    section(w, "Lineups")?;
    for lineup in lineups {
        match lineup.world_rank {
            Some(rank) => writeln!(w, "{} (#{rank})", lineup.team_name)?,
            None => writeln!(w, "{}", lineup.team_name)?,
        }
        writeln!(
            w,
            "  {}",
            lineup.players.iter().map(|p| p.nickname.as_str()).join(", ")
        )?;
    }
    Ok(())
}

fn player_stats<W: Write>(w: &mut W, players: &[PlayerProfile]) -> io::Result<()> {
    section(w, "Player stats")?;
    for player in players {
        writeln!(
            w,
            "{} ({}) team: {}, age: {}",
            player.nickname,
            or_missing(player.real_name.as_deref()),
            or_missing(player.team.as_deref()),
            or_missing(player.age.as_deref()),
        )?;
        stat_table(w, "  ", &player.short_stats)?;
        stat_table(w, "  ", &player.full_stats)?;
    }
    Ok(())
}

fn map_stats<W: Write>(w: &mut W, maps: &[MapStat]) -> io::Result<()> {
    section(w, "Map stats")?;
    for map in maps {
        writeln!(w, "{}", or_missing(map.map_name.as_deref()))?;
        for (team, stat) in map.per_team_stat.iter() {
            writeln!(
                w,
                "  {team}: {} won, {} played",
                or_missing(stat.win_percentage.as_deref()),
                or_missing(stat.maps_played.as_deref()),
            )?;
        }
    }
    Ok(())
}

fn past_results<W: Write>(w: &mut W, forms: &[TeamRecentForm]) -> io::Result<()> {
    section(w, "Past 3 months")?;
    for form in forms {
        writeln!(w, "{}", or_missing(form.team.as_deref()))?;
        for result in &form.matches {
            writeln!(
                w,
                "  vs {} on {}: {}",
                or_missing(result.opponent.as_deref()),
                or_missing(result.map.as_deref()),
                or_missing(result.score.as_deref()),
            )?;
        }
    }
    Ok(())
}

fn head_to_head<W: Write>(w: &mut W, h2h: &HeadToHead) -> io::Result<()> {
    section(w, "Head to head")?;
    for wins in [&h2h.stats.team1, &h2h.stats.team2].into_iter().flatten() {
        writeln!(
            w,
            "{}: {} wins",
            or_missing(wins.team.as_deref()),
            or_missing(wins.wins.as_deref())
        )?;
    }
    if let Some(overtimes) = &h2h.stats.overtimes {
        writeln!(w, "Overtimes: {overtimes}")?;
    }
    for m in &h2h.listing {
        writeln!(
            w,
            "  {} {} vs {} ({}) {} {}",
            or_missing(m.date.as_deref()),
            or_missing(m.team1.as_deref()),
            or_missing(m.team2.as_deref()),
            or_missing(m.event.as_deref()),
            or_missing(m.map.as_deref()),
            or_missing(m.result.as_deref()),
        )?;
    }
    Ok(())
}

fn analytics_sections<W: Write>(w: &mut W, analytics: &MatchAnalytics) -> io::Result<()> {
    section(w, "Analytics: insights")?;
    for team in &analytics.insights {
        writeln!(w, "{}", or_missing(team.team.as_deref()))?;
        for insight in team.insights.iter().flatten() {
            writeln!(w, "  {insight}")?;
        }
    }

    section(w, "Analytics: head to head")?;
    for side in &analytics.head_to_head {
        writeln!(w, "{}", or_missing(side.team.as_deref()))?;
        for (player, form) in side.players.iter() {
            writeln!(
                w,
                "  {player}: 3 months {}, event {}",
                or_missing(form.three_months.as_deref()),
                or_missing(form.event.as_deref()),
            )?;
        }
        for m in &side.last_matches {
            writeln!(
                w,
                "  vs {} {} ({})",
                or_missing(m.opponent.as_deref()),
                or_missing(m.score.as_deref()),
                or_missing(m.match_type.as_deref()),
            )?;
        }
    }

    section(w, "Analytics: handicap")?;
    for team in &analytics.handicap {
        writeln!(
            w,
            "{} ({})",
            or_missing(team.team.as_deref()),
            or_missing(team.match_map_count.as_deref())
        )?;
        for m in &team.matches {
            writeln!(
                w,
                "  {} handicap {}",
                or_missing(m.score.as_deref()),
                or_missing(m.handicap.as_deref())
            )?;
        }
    }

    section(w, "Analytics: map handicap")?;
    for side in &analytics.map_handicap {
        writeln!(
            w,
            "Overall: lost in wins {}, won in losses {}",
            or_missing(side.overall.avg_rounds_lost_in_wins.as_deref()),
            or_missing(side.overall.avg_rounds_won_in_losses.as_deref()),
        )?;
        for map in &side.maps {
            writeln!(
                w,
                "  {}: lost in wins {}, won in losses {}",
                or_missing(map.map.as_deref()),
                or_missing(map.avg_rounds_lost_in_wins.as_deref()),
                or_missing(map.avg_rounds_won_in_losses.as_deref()),
            )?;
        }
    }

    section(w, "Analytics: map stats")?;
    for row in &analytics.map_stats {
        writeln!(
            w,
            "{} {}: first pick {}, first ban {}, win {}, played {} {}",
            or_missing(row.map.as_deref()),
            or_missing(row.team.as_deref()),
            or_missing(row.first_pick.as_deref()),
            or_missing(row.first_ban.as_deref()),
            or_missing(row.win.as_deref()),
            or_missing(row.played.as_deref()),
            row.comment.as_deref().unwrap_or_default(),
        )?;
    }
    Ok(())
}

fn team_stats<W: Write>(w: &mut W, team: &TeamCategoryStats) -> io::Result<()> {
    section(w, &format!("Team {}", team.team))?;
    writeln!(w, "Window: {} to {}", team.window_start, team.window_end)?;

    writeln!(w, "Overview")?;
    stat_table(w, "  ", &team.overview)?;

    writeln!(w, "Matches")?;
    for m in &team.matches {
        writeln!(
            w,
            "  {} {} vs {} on {}: {} {}",
            or_missing(m.date.as_deref()),
            or_missing(m.event.as_deref()),
            or_missing(m.opponent.as_deref()),
            or_missing(m.map.as_deref()),
            or_missing(m.result.as_deref()),
            or_missing(m.outcome.as_deref()),
        )?;
    }

    writeln!(w, "Maps")?;
    for map in &team.maps {
        writeln!(w, "  {}", or_missing(map.map.as_deref()))?;
        stat_table(w, "    ", &map.stats)?;
    }

    writeln!(w, "Players")?;
    for p in &team.player_overview {
        writeln!(
            w,
            "  {}: maps {}, rounds {}, K-D diff {}, K/D {}, rating {}",
            or_missing(p.nickname.as_deref()),
            or_missing(p.maps.as_deref()),
            or_missing(p.rounds.as_deref()),
            or_missing(p.kd_diff.as_deref()),
            or_missing(p.kd.as_deref()),
            or_missing(p.rating.as_deref()),
        )?;
    }

    writeln!(w, "Flashes")?;
    for p in &team.flash_stats {
        writeln!(
            w,
            "  {}: thrown {}, blinded {}, opponents flashed {}, diff {}, assists {}, success {}",
            or_missing(p.nickname.as_deref()),
            or_missing(p.thrown.as_deref()),
            or_missing(p.blinded.as_deref()),
            or_missing(p.opponents_flashed.as_deref()),
            or_missing(p.diff.as_deref()),
            or_missing(p.flash_assists.as_deref()),
            or_missing(p.success.as_deref()),
        )?;
    }

    writeln!(w, "Opening kills")?;
    for p in &team.opening_kill_stats {
        writeln!(
            w,
            "  {}: KPR {}, DPR {}, attempts {}, success {}, rating {}",
            or_missing(p.nickname.as_deref()),
            or_missing(p.kpr.as_deref()),
            or_missing(p.dpr.as_deref()),
            or_missing(p.attempts.as_deref()),
            or_missing(p.success.as_deref()),
            or_missing(p.rating.as_deref()),
        )?;
    }
    Ok(())
}
