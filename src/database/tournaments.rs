use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::columns::{enum_column, json_column, to_json};
use super::connection::DbConn;
use crate::domain::Tournament;

const TOURNAMENT_COLUMNS: &str = "id, name, description, status, max_players, player_ids, current_round, start_date, end_date, created_at";

pub fn insert_tournament(conn: &mut DbConn, tournament: &Tournament) -> Result<Tournament> {
    let sql = format!(
        "INSERT INTO tournaments (id, name, description, status, max_players, player_ids, current_round, start_date, end_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) RETURNING {TOURNAMENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            tournament.id,
            tournament.name,
            tournament.description,
            tournament.status.as_str(),
            tournament.max_players,
            to_json(&tournament.player_ids)?,
            tournament.current_round,
            tournament.start_date,
            tournament.end_date
        ],
        parse_tournament_row,
    )
    .context("Failed to insert new tournament")
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        status: enum_column(row, 3)?,
        max_players: row.get(4)?,
        player_ids: json_column(row, 5)?,
        current_round: row.get(6)?,
        start_date: row.get(7)?,
        end_date: row.get(8)?,
        created_at: row.get(9)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: &str) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

/// Newest first
pub fn list_all(conn: &mut DbConn) -> Result<Vec<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY created_at DESC, rowid DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_tournament(conn: &mut DbConn, tournament: &Tournament) -> Result<Option<Tournament>> {
    let sql = format!(
        "UPDATE tournaments SET name = ?2, description = ?3, status = ?4, max_players = ?5, player_ids = ?6, current_round = ?7, start_date = ?8, end_date = ?9 WHERE id = ?1 RETURNING {TOURNAMENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            tournament.id,
            tournament.name,
            tournament.description,
            tournament.status.as_str(),
            tournament.max_players,
            to_json(&tournament.player_ids)?,
            tournament.current_round,
            tournament.start_date,
            tournament.end_date
        ],
        parse_tournament_row,
    )
    .optional()
    .context("Failed to update tournament")
}

/// Matches and stats of the tournament go with it
pub fn delete_tournament(conn: &mut DbConn, id: &str) -> Result<bool> {
    conn.execute("DELETE FROM tournaments WHERE id = ?1", params![id])
        .context("Failed to delete tournament")
        .map(|affected| affected > 0)
}
