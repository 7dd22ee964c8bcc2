use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::columns::{enum_column, json_column, to_json};
use super::connection::DbConn;
use crate::domain::{Match, MatchStatus};

const MATCH_COLUMNS: &str = "id, tournament_id, round, team1, team2, court, scores, winner_team_id, status, format, created_at";

pub fn insert_match(conn: &mut DbConn, m: &Match) -> Result<Match> {
    insert_row(conn, m)
}

/// All-or-nothing insert of a generated round
pub fn insert_many(conn: &mut DbConn, matches: &[Match]) -> Result<Vec<Match>> {
    let tx = conn.transaction().context("Failed to open transaction")?;
    let stored = matches
        .iter()
        .map(|m| insert_row(&tx, m))
        .collect::<Result<Vec<_>>>()?;
    tx.commit().context("Failed to commit generated matches")?;
    Ok(stored)
}

fn insert_row(conn: &Connection, m: &Match) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (id, tournament_id, round, team1, team2, court, scores, winner_team_id, status, format) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            m.id,
            m.tournament_id,
            m.round,
            to_json(&m.team1)?,
            to_json(&m.team2)?,
            m.court,
            to_json(&m.scores)?,
            m.winner_team_id,
            m.status.as_str(),
            m.format.as_str()
        ],
        parse_match_row,
    )
    .with_context(|| format!("Failed to insert match {}", m.id))
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        round: row.get(2)?,
        team1: json_column(row, 3)?,
        team2: json_column(row, 4)?,
        court: row.get(5)?,
        scores: json_column(row, 6)?,
        winner_team_id: row.get(7)?,
        status: enum_column(row, 8)?,
        format: enum_column(row, 9)?,
        created_at: row.get(10)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: &str) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

/// In round order, then creation order
pub fn list_by_tournament(conn: &mut DbConn, tournament_id: &str) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE tournament_id = ?1 ORDER BY round, rowid"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY round, rowid");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Persist scores, winner and status
pub fn update_result(conn: &mut DbConn, m: &Match) -> Result<Option<Match>> {
    let sql = format!(
        "UPDATE matches SET scores = ?2, winner_team_id = ?3, status = ?4, court = ?5 WHERE id = ?1 RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            m.id,
            to_json(&m.scores)?,
            m.winner_team_id,
            m.status.as_str(),
            m.court
        ],
        parse_match_row,
    )
    .optional()
    .context("Failed to update match result")
}

pub fn delete_unfinished(conn: &mut DbConn, tournament_id: &str) -> Result<usize> {
    conn.execute(
        "DELETE FROM matches WHERE tournament_id = ?1 AND status != ?2",
        params![tournament_id, MatchStatus::Completed.as_str()],
    )
    .context("Failed to delete unfinished matches")
}
