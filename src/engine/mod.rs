pub mod errors;
pub mod pairing;
pub mod partition;
pub mod ranking;
pub mod resolution;
pub mod schedule;
pub mod shuffle;
pub mod standings;

pub use errors::{EngineError, EngineResult};
pub use pairing::form_teams;
pub use partition::{partition_by_skill, SkillBrackets};
pub use ranking::{compare_standings, filter_by_skill, rank_by, sort_standings, top, SortKey};
pub use resolution::{resolve_result, save_draft_scores};
pub use schedule::{
    assemble_team, create_manual_match, ensure_round_finished, generate_round, schedule_round,
    RoundRequest,
};
pub use shuffle::{PreserveOrder, RandomShuffler, Shuffler};
pub use standings::{compute_standings, StandingsScope};
