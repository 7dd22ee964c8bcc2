use anyhow::{Context, Result};
use rusqlite::params;

use super::columns::enum_column;
use super::connection::DbConn;
use crate::domain::PlayerStats;

/// Swap the stored stats of a tournament for a fresh computation
pub fn replace_for_tournament(
    conn: &mut DbConn,
    tournament_id: &str,
    stats: &[PlayerStats],
) -> Result<usize> {
    let tx = conn.transaction().context("Failed to open transaction")?;

    tx.execute(
        "DELETE FROM player_stats WHERE tournament_id = ?1",
        params![tournament_id],
    )
    .context("Failed to clear tournament stats")?;

    let sql = "INSERT INTO player_stats (player_id, tournament_id, matches_played, matches_won, sets_won, sets_lost, games_won, games_lost, points) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
    for s in stats {
        tx.execute(
            sql,
            params![
                s.player_id,
                tournament_id,
                s.matches_played,
                s.matches_won,
                s.sets_won,
                s.sets_lost,
                s.games_won,
                s.games_lost,
                s.points
            ],
        )
        .with_context(|| format!("Failed to store stats for player {}", s.player_id))?;
    }

    tx.commit().context("Failed to commit tournament stats")?;
    Ok(stats.len())
}

fn parse_stats_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerStats> {
    Ok(PlayerStats {
        player_id: row.get(0)?,
        tournament_id: row.get(1)?,
        name: row.get(2)?,
        surname: row.get(3)?,
        nickname: row.get(4)?,
        skill_level: enum_column(row, 5)?,
        matches_played: row.get(6)?,
        matches_won: row.get(7)?,
        sets_won: row.get(8)?,
        sets_lost: row.get(9)?,
        games_won: row.get(10)?,
        games_lost: row.get(11)?,
        points: row.get(12)?,
    })
}

/// Stored stats joined with current player identity, unordered
pub fn list_by_tournament(conn: &mut DbConn, tournament_id: &str) -> Result<Vec<PlayerStats>> {
    let sql = "
        SELECT
            s.player_id, s.tournament_id, p.name, p.surname, p.nickname, p.skill_level,
            s.matches_played, s.matches_won, s.sets_won, s.sets_lost,
            s.games_won, s.games_lost, s.points
        FROM player_stats s
        JOIN players p ON p.id = s.player_id
        WHERE s.tournament_id = ?1
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_stats_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
