use colored::{ColoredString, Colorize};

use crate::domain::{AppSettings, Match, MatchStatus, Player, PlayerStats, TeamSide, Tournament};

const RULE_WIDTH: usize = 78;

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn header(title: &str) {
    println!("{}", title.bold());
    println!("{}", rule().dimmed());
}

pub fn print_players(players: &[Player]) {
    if players.is_empty() {
        println!("{}", "No players found".dimmed());
        return;
    }
    header(&format!(
        "{:<38} {:<24} {:<11} {:>3} {:>3} {:>4}",
        "ID", "Name", "Skill", "MP", "MW", "Pts"
    ));
    for player in players {
        println!(
            "{} {:<24} {:<11} {:>3} {:>3} {:>4}",
            format!("{:<38}", player.id).dimmed(),
            truncate(&player.display_name(), 24),
            player.skill_level.label(),
            player.matches_played,
            player.matches_won,
            player.points
        );
    }
}

pub fn print_player(player: &Player) {
    println!(
        "{} {} ({})",
        "Player".green().bold(),
        player.full_name(),
        player.id.dimmed()
    );
}

pub fn print_tournaments(tournaments: &[Tournament], current: Option<&str>) {
    if tournaments.is_empty() {
        println!("{}", "No tournaments yet".dimmed());
        return;
    }
    header(&format!(
        "  {:<38} {:<22} {:<10} {:>7} {:>5}",
        "ID", "Name", "Status", "Players", "Round"
    ));
    for tournament in tournaments {
        let marker = if current == Some(tournament.id.as_str()) {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "{} {} {:<22} {:<10} {:>3}/{:<3} {:>5}",
            marker,
            format!("{:<38}", tournament.id).dimmed(),
            truncate(&tournament.name, 22),
            tournament.status.as_str(),
            tournament.player_ids.len(),
            tournament.max_players,
            tournament.current_round
        );
    }
}

pub fn print_tournament(tournament: &Tournament) {
    println!(
        "{} '{}' ({}) with {} players",
        "Tournament".green().bold(),
        tournament.name,
        tournament.id.dimmed(),
        tournament.player_ids.len()
    );
}

pub fn print_matches(matches: &[Match]) {
    if matches.is_empty() {
        println!("{}", "No matches".dimmed());
        return;
    }
    let mut round = None;
    for m in matches {
        if round != Some(m.round) {
            round = Some(m.round);
            println!();
            header(&format!("Round {}", m.round));
        }
        print_match(m);
    }
}

pub fn print_match(m: &Match) {
    let score = if m.scores.iter().all(|s| s.is_blank()) {
        "-".to_string()
    } else {
        m.score_line()
    };
    let (team1, team2) = match m.winner_side() {
        Some(TeamSide::One) => (m.team1.label().bold(), m.team2.label().normal()),
        Some(TeamSide::Two) => (m.team1.label().normal(), m.team2.label().bold()),
        None => (m.team1.label().normal(), m.team2.label().normal()),
    };
    println!(
        "{} {} vs {}  [{}] {}{}",
        status_label(m.status),
        team1,
        team2,
        score,
        m.id.dimmed(),
        m.court
            .as_deref()
            .map(|c| format!(" court {}", c))
            .unwrap_or_default()
    );
}

fn status_label(status: MatchStatus) -> ColoredString {
    let label = format!("{:<11}", status.as_str());
    match status {
        MatchStatus::Pending => label.yellow(),
        MatchStatus::InProgress => label.cyan(),
        MatchStatus::Completed => label.green(),
    }
}

/// Standings table with the podium highlighted
pub fn print_standings(title: &str, standings: &[PlayerStats]) {
    if standings.is_empty() {
        println!("{}", "No standings yet".dimmed());
        return;
    }
    header(&format!(
        "{}\n{:>4}  {:<26} {:>4} {:>3} {:>3} {:>7} {:>7} {:>6}",
        title, "#", "Player", "Pts", "MP", "MW", "Sets", "Games", "Ratio"
    ));
    for (index, stats) in standings.iter().enumerate() {
        let line = format!(
            "{:>4}  {:<26} {:>4} {:>3} {:>3} {:>7} {:>7} {:>6}",
            index + 1,
            truncate(&stats.display_name(), 26),
            stats.points,
            stats.matches_played,
            stats.matches_won,
            format!("{}-{}", stats.sets_won, stats.sets_lost),
            format!("{}-{}", stats.games_won, stats.games_lost),
            stats.set_ratio().to_string()
        );
        println!("{}", podium(index, line));
    }
}

fn podium(index: usize, line: String) -> ColoredString {
    match index {
        0 => line.yellow().bold(),
        1 => line.bright_white(),
        2 => line.truecolor(205, 127, 50),
        _ => line.normal(),
    }
}

pub fn print_settings(settings: &AppSettings) {
    header("Settings");
    println!("{:<24} {}", "Points for a win", settings.points.win);
    println!(
        "{:<24} {}",
        "Points for a 1-2 loss", settings.points.tie_break_loss
    );
    println!("{:<24} {}", "Points for a loss", settings.points.loss);
    println!("{:<24} {}", "Pairing strategy", settings.pairing_strategy.as_str());
    println!("{:<24} {}", "Match format", settings.match_format.as_str());
    println!(
        "{:<24} {}",
        "Current tournament",
        settings.current_tournament_id.as_deref().unwrap_or("none")
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
