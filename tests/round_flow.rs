use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use padel_tournament::config::AppConfig;
use padel_tournament::database::create_memory_pool;
use padel_tournament::domain::{
    MatchFormat, MatchSetScore, MatchStatus, PairingStrategy, Player, PointsConfig, SkillLevel,
    Tournament, TournamentStatus,
};
use padel_tournament::engine::{
    compute_standings, generate_round, resolve_result, EngineError, PreserveOrder,
    RandomShuffler, RoundRequest, StandingsScope,
};
use padel_tournament::services::tournament::{NewPlayer, NewTournament, RoundOptions};
use padel_tournament::services::TournamentService;

fn player(id: &str, skill: SkillLevel) -> Player {
    Player::new(id, "Test", skill).with_id(id)
}

fn roster() -> Vec<Player> {
    vec![
        player("h0", SkillLevel::High),
        player("h1", SkillLevel::High),
        player("m0", SkillLevel::MediumLow),
        player("m1", SkillLevel::MediumLow),
    ]
}

fn request(tournament: &Tournament, round: u32) -> RoundRequest<'_> {
    RoundRequest {
        tournament_id: Some(&tournament.id),
        round,
        strategy: PairingStrategy::Balanced,
        format: MatchFormat::BestOfThree,
        min_players: 4,
    }
}

#[test]
fn test_round_result_and_standings_pipeline() {
    let players = roster();
    let ids = players.iter().map(|p| p.id.clone()).collect();
    let tournament = Tournament::new("Friday Cup", 8, ids);

    let round_one =
        generate_round(&players, &[], &request(&tournament, 1), &mut PreserveOrder).unwrap();
    assert_eq!(round_one.len(), 1);
    let scheduled = &round_one[0];
    assert_eq!(scheduled.team1.player_ids(), ["h1", "m1"]);
    assert_eq!(scheduled.team2.player_ids(), ["h0", "m0"]);

    // the open match blocks the next draw
    let blocked = generate_round(&players, &round_one, &request(&tournament, 2), &mut PreserveOrder);
    assert!(matches!(blocked, Err(EngineError::RoundNotFinished { pending: 1 })));

    let scores = [
        MatchSetScore::numeric(1, 6, 4),
        MatchSetScore::numeric(2, 3, 6),
        MatchSetScore::numeric(3, 7, 5),
    ];
    let completed = resolve_result(scheduled, &scores, None).unwrap();
    assert_eq!(completed.status, MatchStatus::Completed);
    assert_eq!(completed.winner_team_id.as_deref(), Some(completed.team1.id.as_str()));

    let history = vec![completed];
    let standings = compute_standings(
        &history,
        &players,
        &PointsConfig::default(),
        Some(&StandingsScope::Tournament(&tournament)),
    )
    .unwrap();

    let order: Vec<&str> = standings.iter().map(|s| s.player_id.as_str()).collect();
    assert_eq!(order, vec!["h1", "m1", "h0", "m0"]);
    assert_eq!(standings[0].points, 3);
    assert_eq!((standings[0].sets_won, standings[0].sets_lost), (2, 1));
    assert_eq!((standings[0].games_won, standings[0].games_lost), (16, 15));
    // a 1-2 loss earns the tie-break point
    assert_eq!(standings[2].points, 1);

    let round_two =
        generate_round(&players, &history, &request(&tournament, 2), &mut PreserveOrder).unwrap();
    assert!(round_two.iter().all(|m| m.round == 2));
}

#[test]
fn test_seeded_balanced_round_uses_everyone_once() {
    let mut players: Vec<Player> = (0..4)
        .map(|i| player(&format!("h{i}"), SkillLevel::High))
        .collect();
    players.extend((0..4).map(|i| player(&format!("m{i}"), SkillLevel::MediumLow)));
    players.push(player("u0", SkillLevel::Unassigned));
    let tournament = Tournament::new("Seeded", 16, players.iter().map(|p| p.id.clone()).collect());

    let mut shuffler = RandomShuffler::from_rng(StdRng::seed_from_u64(7));
    let matches = generate_round(&players, &[], &request(&tournament, 1), &mut shuffler).unwrap();
    assert_eq!(matches.len(), 2);

    let mut seen = HashSet::new();
    for m in &matches {
        for team in [&m.team1, &m.team2] {
            let skills: HashSet<SkillLevel> =
                [team.player1.skill_level, team.player2.skill_level].into();
            assert_eq!(skills, HashSet::from([SkillLevel::High, SkillLevel::MediumLow]));
        }
        for id in m.player_ids() {
            assert!(seen.insert(id.to_string()), "{id} scheduled twice");
        }
    }
    assert_eq!(seen.len(), 8);
    assert!(!seen.contains("u0"));
}

#[test]
fn test_service_round_trip_on_memory_database() {
    let pool = create_memory_pool().unwrap();
    let config = AppConfig::default();
    let service = TournamentService::new(&pool, &config);
    service.initialize().unwrap();

    let mut ids = Vec::new();
    for (name, skill) in [
        ("Anna", SkillLevel::High),
        ("Bruno", SkillLevel::High),
        ("Carla", SkillLevel::MediumLow),
        ("Dario", SkillLevel::MediumLow),
    ] {
        let added = service
            .add_player(NewPlayer {
                name: name.to_string(),
                surname: "Rossi".to_string(),
                nickname: None,
                contact: None,
                skill_level: Some(skill),
            })
            .unwrap();
        ids.push(added.id);
    }

    let tournament = service
        .create_tournament(NewTournament {
            name: "Club Night".to_string(),
            description: None,
            max_players: Some(8),
            player_ids: ids,
            start_date: None,
            end_date: None,
        })
        .unwrap();

    let matches = service
        .generate_round_with(None, RoundOptions::default(), &mut PreserveOrder)
        .unwrap();
    assert_eq!(matches.len(), 1);

    let refreshed = service.find_tournament(&tournament.id).unwrap();
    assert_eq!(refreshed.current_round, 2);
    assert_eq!(refreshed.status, TournamentStatus::Active);

    let scores = [MatchSetScore::numeric(1, 6, 2), MatchSetScore::numeric(2, 6, 3)];
    let saved = service.save_result(&matches[0].id, &scores, None).unwrap();
    assert!(saved.is_completed());

    let standings = service.tournament_standings(None).unwrap();
    assert_eq!(standings.len(), 4);
    assert_eq!(standings[0].points, 3);
    assert_eq!(standings[3].points, 0);

    let winner = &saved.team1.player1.id;
    let counters = service.find_player(winner).unwrap();
    assert_eq!((counters.matches_played, counters.matches_won), (1, 1));
}
