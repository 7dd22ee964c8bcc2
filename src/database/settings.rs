use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::columns::enum_column;
use super::connection::DbConn;
use crate::domain::{AppSettings, PointsConfig};

const SETTINGS_ID: &str = "main_settings";
const SETTINGS_COLUMNS: &str = "points_win, points_tie_break_loss, points_loss, pairing_strategy, match_format, current_tournament_id";

/// Seed the settings row unless it already exists
pub fn insert_defaults(conn: &mut DbConn, defaults: &AppSettings) -> Result<()> {
    let sql = format!(
        "INSERT OR IGNORE INTO settings (id, {SETTINGS_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    );

    conn.execute(
        &sql,
        params![
            SETTINGS_ID,
            defaults.points.win,
            defaults.points.tie_break_loss,
            defaults.points.loss,
            defaults.pairing_strategy.as_str(),
            defaults.match_format.as_str(),
            defaults.current_tournament_id
        ],
    )
    .context("Failed to seed settings")
    .map(|_| ())
}

fn parse_settings_row(row: &rusqlite::Row) -> rusqlite::Result<AppSettings> {
    Ok(AppSettings {
        points: PointsConfig {
            win: row.get(0)?,
            tie_break_loss: row.get(1)?,
            loss: row.get(2)?,
        },
        pairing_strategy: enum_column(row, 3)?,
        match_format: enum_column(row, 4)?,
        current_tournament_id: row.get(5)?,
    })
}

pub fn load(conn: &mut DbConn) -> Result<Option<AppSettings>> {
    let sql = format!("SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = ?1");

    conn.query_row(&sql, params![SETTINGS_ID], parse_settings_row)
        .optional()
        .context("Failed to load settings")
}

pub fn save(conn: &mut DbConn, settings: &AppSettings) -> Result<AppSettings> {
    let sql = format!(
        "INSERT INTO settings (id, {SETTINGS_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
             points_win = excluded.points_win,
             points_tie_break_loss = excluded.points_tie_break_loss,
             points_loss = excluded.points_loss,
             pairing_strategy = excluded.pairing_strategy,
             match_format = excluded.match_format,
             current_tournament_id = excluded.current_tournament_id
         RETURNING {SETTINGS_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            SETTINGS_ID,
            settings.points.win,
            settings.points.tie_break_loss,
            settings.points.loss,
            settings.pairing_strategy.as_str(),
            settings.match_format.as_str(),
            settings.current_tournament_id
        ],
        parse_settings_row,
    )
    .context("Failed to save settings")
}
