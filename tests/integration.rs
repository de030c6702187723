// End-to-end gameplay tests for a single level session, driven by fixed 100 ms ticks.

use pinyin_air_force::scoring::calculate_stars;
use pinyin_air_force::{GameConfig, GameEvent, GamePhase, Session, SubmitOutcome};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn new_session(level: u32, seed: u64) -> Session {
    Session::new(level, GameConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
}

fn first_pinyin(s: &Session) -> Option<String> {
    s.characters().first().map(|c| c.character.pinyin.clone())
}

#[test]
fn ten_first_try_answers_clear_level_one() {
    let mut s = new_session(1, 21);
    let mut events = Vec::new();
    for _ in 0..10_000 {
        s.tick(100.0);
        if let Some(answer) = first_pinyin(&s) {
            assert!(matches!(s.submit(&answer), SubmitOutcome::Correct(r) if r.points == 10));
        }
        events.extend(s.drain_events());
        if s.phase() != GamePhase::Active {
            break;
        }
    }
    assert_eq!(s.phase(), GamePhase::Complete);
    assert_eq!(s.score(), 100);
    assert_eq!(s.state().correct_count, 10);
    assert_eq!(s.state().attempt_count, 10);
    assert_eq!(s.accuracy(), 100.0);
    assert_eq!(calculate_stars(s.accuracy()), 5);
    assert_eq!(s.lives(), 3);
    assert!(events.contains(&GameEvent::LevelComplete { score: 100, accuracy: 100.0 }));

    // results are announced after the completion delay
    s.tick(1400.0);
    assert!(s.drain_events().is_empty());
    s.tick(100.0);
    assert_eq!(s.drain_events(), vec![GameEvent::ShowResults]);
}

#[test]
fn three_misses_end_the_session() {
    let mut s = new_session(1, 5);
    let mut missed = 0;
    for _ in 0..10_000 {
        s.tick(100.0);
        missed += s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Missed { .. }))
            .count();
        if s.phase() != GamePhase::Active {
            break;
        }
    }
    assert_eq!(missed, 3);
    assert_eq!(s.lives(), 0);
    assert_eq!(s.phase(), GamePhase::GameOver);
    assert!(!s.state().is_game_active);
    assert_eq!(s.state().current_character_index, 3);
    assert_eq!(s.submit("ni"), SubmitOutcome::Ignored);

    s.tick(2000.0);
    assert_eq!(s.drain_events(), vec![GameEvent::ExitToLevelSelect]);
}

#[test]
fn character_reaches_base_after_full_traversal() {
    let mut s = new_session(1, 8);
    s.tick(2000.0);
    assert_eq!(s.characters().len(), 1);
    // 110 -> -10 is 120 steps of 100 ms at level 1
    for _ in 0..119 {
        s.tick(100.0);
    }
    assert_eq!(s.characters().len(), 1);
    assert_eq!(s.characters()[0].x_position, -9.0);
    s.tick(100.0);
    assert!(s.characters().is_empty());
    assert_eq!(s.lives(), 2);
}

#[test]
fn wrong_submission_only_bumps_attempts() {
    let mut s = new_session(1, 13);
    s.tick(2000.0);
    let before = s.characters()[0].clone();
    assert_eq!(s.submit("qqq"), SubmitOutcome::Wrong);
    let after = &s.characters()[0];
    assert_eq!(after.unique_id, before.unique_id);
    assert_eq!(after.attempt_count, 1);
    assert_eq!(after.x_position, before.x_position);
    assert_eq!(s.lives(), 3);
    assert_eq!(s.score(), 0);
    assert_eq!(s.state().attempt_count, 1);
    assert_eq!(s.state().correct_count, 0);

    // second try scores 7
    let answer = first_pinyin(&s).unwrap();
    assert!(matches!(s.submit(&answer), SubmitOutcome::Correct(r) if r.points == 7));
    assert_eq!(s.score(), 7);
}

#[test]
fn blank_input_is_ignored() {
    let mut s = new_session(1, 3);
    s.tick(2000.0);
    assert_eq!(s.submit("   "), SubmitOutcome::Ignored);
    assert_eq!(s.characters()[0].attempt_count, 0);
    assert_eq!(s.state().attempt_count, 0);
}

#[test]
fn tone_marks_and_case_do_not_matter_in_game() {
    let mut s = new_session(1, 17);
    s.tick(2000.0);
    let answer = first_pinyin(&s).unwrap().to_uppercase();
    assert!(matches!(s.submit(&answer), SubmitOutcome::Correct(_)));
}

#[test]
fn last_character_falling_still_completes_the_level() {
    let mut s = new_session(1, 34);
    let mut events = Vec::new();
    for _ in 0..10_000 {
        s.tick(100.0);
        if s.state().correct_count < 9 {
            if let Some(answer) = first_pinyin(&s) {
                s.submit(&answer);
            }
        }
        events.extend(s.drain_events());
        if s.phase() != GamePhase::Active {
            break;
        }
    }
    assert_eq!(s.phase(), GamePhase::Complete);
    assert_eq!(s.lives(), 2);
    assert_eq!(s.score(), 90);
    assert_eq!(s.accuracy(), 90.0);
    assert_eq!(calculate_stars(s.accuracy()), 5);
    assert_eq!(
        events.iter().filter(|e| matches!(e, GameEvent::Missed { .. })).count(),
        1
    );
    assert!(events.contains(&GameEvent::LevelComplete { score: 90, accuracy: 90.0 }));
}
