// Headless bot-vs-bot matches driven through the public session API.
use host::{run_headless_match, GameConfig};
use pong_core::{compute_event_log_hash, GameEvent, GameLevel, Score};

#[test]
fn same_seed_replays_identically() {
    for level in GameLevel::ALL {
        let config = GameConfig { level, seed: 930397884, ..GameConfig::default() };
        let first = run_headless_match(&config, 6_000).expect("first run");
        let second = run_headless_match(&config, 6_000).expect("second run");
        assert_eq!(first, second, "{level} diverged");
        assert_eq!(first.events_hash.len(), 64);
    }
}

#[test]
fn summary_stops_at_frame_budget() {
    // At HARD serve speed the ball needs about 50 frames to reach a paddle,
    // so 30 frames can only hold the opening serve.
    let config = GameConfig { level: GameLevel::Hard, seed: 237054789, score_max: 2, ..GameConfig::default() };
    let summary = run_headless_match(&config, 30).unwrap();
    assert_eq!(summary.frames, 30);
    assert!(!summary.finished);
    assert_eq!(summary.score, Score::default());
    assert_eq!(summary.winner, None);
    assert_eq!(summary.bounces, 0);
    let opening = [GameEvent::ScoreChanged { score: Score::default() }];
    assert_eq!(summary.events_hash, hex::encode(compute_event_log_hash(&opening)));
}

#[test]
fn zero_frame_budget_only_serves() {
    let summary = run_headless_match(&GameConfig::default(), 0).unwrap();
    assert_eq!(summary.frames, 0);
    assert!(!summary.finished);
    assert_eq!(summary.score, Score::default());
}

#[test]
fn bots_return_the_ball() {
    let config = GameConfig { seed: 725309225, ..GameConfig::default() };
    let summary = run_headless_match(&config, 3_000).unwrap();
    assert!(summary.bounces > 0, "bots never touched the ball");
}

#[test]
fn invalid_config_is_rejected() {
    let config = GameConfig { canvas_height: -1.0, ..GameConfig::default() };
    assert!(run_headless_match(&config, 10).is_err());
}
