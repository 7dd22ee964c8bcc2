use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::columns::enum_column;
use super::connection::DbConn;
use crate::domain::{Player, PlayerStats};

const PLAYER_COLUMNS: &str = "id, name, surname, nickname, contact, skill_level, matches_played, matches_won, sets_won, sets_lost, games_won, games_lost, points, created_at";

pub fn insert_player(conn: &mut DbConn, player: &Player) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (id, name, surname, nickname, contact, skill_level) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            player.id,
            player.name,
            player.surname,
            player.nickname,
            player.contact,
            player.skill_level.as_str()
        ],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        surname: row.get(2)?,
        nickname: row.get(3)?,
        contact: row.get(4)?,
        skill_level: enum_column(row, 5)?,
        matches_played: row.get(6)?,
        matches_won: row.get(7)?,
        sets_won: row.get(8)?,
        sets_lost: row.get(9)?,
        games_won: row.get(10)?,
        games_lost: row.get(11)?,
        points: row.get(12)?,
        created_at: row.get(13)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY name, surname, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Case-insensitive substring search over name, surname and nickname
pub fn search(conn: &mut DbConn, term: &str) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE LOWER(name || ' ' || surname || ' ' || COALESCE(nickname, '')) LIKE ?1 ORDER BY name, surname, id"
    );
    let pattern = format!("%{}%", term.trim().to_lowercase());

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![pattern], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_player(conn: &mut DbConn, player: &Player) -> Result<Option<Player>> {
    let sql = format!(
        "UPDATE players SET name = ?2, surname = ?3, nickname = ?4, contact = ?5, skill_level = ?6 WHERE id = ?1 RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            player.id,
            player.name,
            player.surname,
            player.nickname,
            player.contact,
            player.skill_level.as_str()
        ],
        parse_player_row,
    )
    .optional()
    .context("Failed to update player")
}

/// Overwrite the cumulative counters with a recomputed snapshot
pub fn update_counters(conn: &mut DbConn, stats: &PlayerStats) -> Result<()> {
    let sql = "UPDATE players SET matches_played = ?2, matches_won = ?3, sets_won = ?4, sets_lost = ?5, games_won = ?6, games_lost = ?7, points = ?8 WHERE id = ?1";

    conn.execute(
        sql,
        params![
            stats.player_id,
            stats.matches_played,
            stats.matches_won,
            stats.sets_won,
            stats.sets_lost,
            stats.games_won,
            stats.games_lost,
            stats.points
        ],
    )
    .context("Failed to update player counters")
    .map(|_| ())
}

pub fn delete_player(conn: &mut DbConn, id: &str) -> Result<bool> {
    conn.execute("DELETE FROM players WHERE id = ?1", params![id])
        .context("Failed to delete player")
        .map(|affected| affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::memory_connection;
    use crate::domain::SkillLevel;

    #[test]
    fn test_insert_and_find() {
        let mut conn = memory_connection();
        let player = Player::new("Mario", "Rossi", SkillLevel::High)
            .with_nickname(Some("Smash".to_string()));

        let stored = insert_player(&mut conn, &player).unwrap();
        assert_eq!(stored.id, player.id);
        assert_eq!(stored.skill_level, SkillLevel::High);
        assert!(stored.created_at.is_some());

        let found = find_by_id(&mut conn, &player.id).unwrap().unwrap();
        assert_eq!(found.nickname.as_deref(), Some("Smash"));
        assert!(find_by_id(&mut conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_search_matches_nickname_and_surname() {
        let mut conn = memory_connection();
        insert_player(
            &mut conn,
            &Player::new("Mario", "Rossi", SkillLevel::High).with_nickname(Some("Smash".into())),
        )
        .unwrap();
        insert_player(&mut conn, &Player::new("Anna", "Bianchi", SkillLevel::MediumLow)).unwrap();

        assert_eq!(search(&mut conn, "smash").unwrap().len(), 1);
        assert_eq!(search(&mut conn, "BIAN").unwrap()[0].name, "Anna");
        assert_eq!(search(&mut conn, "").unwrap().len(), 2);
        assert!(search(&mut conn, "verdi").unwrap().is_empty());
    }

    #[test]
    fn test_update_counters_and_delete() {
        let mut conn = memory_connection();
        let player = insert_player(&mut conn, &Player::new("Luca", "Verdi", SkillLevel::High)).unwrap();

        let mut stats = PlayerStats::zeroed(&player, None);
        stats.matches_played = 2;
        stats.points = 4;
        update_counters(&mut conn, &stats).unwrap();

        let found = find_by_id(&mut conn, &player.id).unwrap().unwrap();
        assert_eq!((found.matches_played, found.points), (2, 4));

        assert!(delete_player(&mut conn, &player.id).unwrap());
        assert!(!delete_player(&mut conn, &player.id).unwrap());
    }

    #[test]
    fn test_update_unknown_player_returns_none() {
        let mut conn = memory_connection();
        let ghost = Player::new("Ghost", "Player", SkillLevel::Unassigned);
        assert!(update_player(&mut conn, &ghost).unwrap().is_none());
    }
}
