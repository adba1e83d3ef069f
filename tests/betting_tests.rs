//! Тесты торговли на уровне `BettingEngine`.
//!
//! Проверяем:
//! - минимальный рейз (50 → 75 отклонён, 50 → 100 принят);
//! - префлоп на 6 игроков с блайндами 10/20: все коллируют до 20, улица закрыта;
//! - ошибки: CannotCheck, AlreadyFolded, PlayerNotFound, InvalidAmount;
//! - неполный олл-ин не переоткрывает рейз уже походившим;
//! - атомарность: при отказе состояние не меняется.

use poker_table_engine::domain::chips::Chips;
use poker_table_engine::domain::hand::Phase;
use poker_table_engine::domain::player::{GamePlayer, PlayerStatus};
use poker_table_engine::domain::PlayerId;
use poker_table_engine::engine::{
    is_betting_round_complete, BetKind, BettingEngine, BettingError,
};

const STACK: u64 = 1_000;

/// Игроки с id = seat + 1.
fn engine_with(stacks: &[u64], big_blind: u64) -> BettingEngine {
    let players = stacks
        .iter()
        .enumerate()
        .map(|(seat, &chips)| GamePlayer::new(seat as PlayerId + 1, seat as u8, Chips(chips)))
        .collect();
    BettingEngine::new(players, Chips(big_blind))
}

fn flop_engine(stacks: &[u64], big_blind: u64) -> BettingEngine {
    let mut engine = engine_with(stacks, big_blind);
    engine.start_betting_round(Phase::Flop, 0);
    engine
}

#[test]
fn min_raise_follows_last_increment() {
    let mut engine = flop_engine(&[STACK, STACK, STACK], 20);

    assert_eq!(engine.process_bet(1, Chips(50)), Ok(BetKind::Bet));
    assert_eq!(engine.current_bet, Chips(50));
    assert_eq!(engine.min_raise, Chips(50));

    assert_eq!(
        engine.process_bet(2, Chips(75)),
        Err(BettingError::MinimumRaiseNotMet {
            increment: 25,
            min_raise: 50
        })
    );
    assert_eq!(engine.process_bet(2, Chips(100)), Ok(BetKind::Raise));
    assert_eq!(engine.current_bet, Chips(100));
    assert_eq!(engine.min_raise, Chips(50));

    // Следующий рейз: минимум до 150.
    assert!(engine.process_bet(3, Chips(149)).is_err());
    assert_eq!(engine.process_bet(3, Chips(250)), Ok(BetKind::Raise));
    assert_eq!(engine.min_raise, Chips(150));
}

#[test]
fn bet_below_big_blind_is_rejected() {
    let mut engine = flop_engine(&[STACK, STACK], 20);
    assert!(matches!(
        engine.process_bet(1, Chips(10)),
        Err(BettingError::MinimumRaiseNotMet { .. })
    ));
}

#[test]
fn six_handed_blinds_and_five_calls_close_the_round() {
    let mut engine = engine_with(&[STACK; 6], 20);

    // SB – место 1, BB – место 2, первым ходит место 3.
    assert_eq!(engine.post_blind(2, Chips(10)), Ok(Chips(10)));
    assert_eq!(engine.post_blind(3, Chips(20)), Ok(Chips(20)));
    engine.point_to_next_from(3);
    assert_eq!(engine.active_player_id(), Some(4));

    for pid in [4, 5, 6, 1, 2] {
        assert!(!engine.is_betting_round_complete());
        assert_eq!(engine.active_player_id(), Some(pid));
        assert_eq!(engine.process_bet(pid, Chips(20)), Ok(BetKind::Call));
        engine.advance_action();
    }

    // Блайнд – уже ход: после пяти коллов улица закрыта.
    assert!(engine.is_betting_round_complete());
    assert!(is_betting_round_complete(&engine.players));
    assert_eq!(engine.active_player_id(), None);
    assert_eq!(engine.calculate_total_pot(), Chips(120));
}

#[test]
fn small_blind_still_has_to_answer_the_big_blind() {
    let mut engine = engine_with(&[STACK, STACK], 20);
    engine.post_blind(1, Chips(10)).expect("sb");
    engine.post_blind(2, Chips(20)).expect("bb");
    engine.point_to_next_from(0);

    assert!(!engine.is_betting_round_complete());
    assert_eq!(engine.active_player_id(), Some(1));
    assert_eq!(engine.process_bet(1, Chips(20)), Ok(BetKind::Call));
    engine.advance_action();
    assert!(engine.is_betting_round_complete());
    assert_eq!(engine.calculate_total_pot(), Chips(40));
}

#[test]
fn check_facing_a_bet_is_rejected() {
    let mut engine = flop_engine(&[STACK, STACK], 20);
    engine.process_bet(1, Chips(40)).expect("bet");

    let before = engine.clone();
    assert_eq!(engine.process_bet(2, Chips::ZERO), Err(BettingError::CannotCheck));
    assert_eq!(engine, before, "отказ не должен менять состояние");
}

#[test]
fn folded_and_unknown_players_are_rejected() {
    let mut engine = flop_engine(&[STACK, STACK, STACK], 20);
    engine.fold(1).expect("fold");

    assert_eq!(engine.process_bet(1, Chips(40)), Err(BettingError::AlreadyFolded(1)));
    assert_eq!(engine.fold(1), Err(BettingError::AlreadyFolded(1)));
    assert_eq!(engine.process_bet(42, Chips(40)), Err(BettingError::PlayerNotFound(42)));
}

#[test]
fn street_bet_cannot_decrease() {
    let mut engine = flop_engine(&[STACK, STACK], 20);
    engine.process_bet(1, Chips(60)).expect("bet");
    engine.process_bet(2, Chips(200)).expect("raise");

    let before = engine.clone();
    assert_eq!(engine.process_bet(1, Chips(40)), Err(BettingError::InvalidAmount));
    assert_eq!(engine, before);
}

#[test]
fn bet_larger_than_stack_is_rejected() {
    let mut engine = flop_engine(&[100, STACK], 20);
    assert_eq!(engine.process_bet(1, Chips(101)), Err(BettingError::InsufficientChips));
    assert_eq!(engine.process_bet(1, Chips(100)), Ok(BetKind::Bet));
    assert_eq!(engine.player(1).map(|p| p.status), Some(PlayerStatus::AllIn));
}

#[test]
fn short_all_in_call_is_allowed() {
    let mut engine = flop_engine(&[STACK, 30], 20);
    engine.process_bet(1, Chips(100)).expect("bet");

    assert_eq!(engine.process_bet(2, Chips(30)), Ok(BetKind::ShortCall));
    assert_eq!(engine.player(2).map(|p| p.status), Some(PlayerStatus::AllIn));
    assert!(engine.is_betting_round_complete());
}

#[test]
fn partial_call_without_all_in_is_rejected() {
    let mut engine = flop_engine(&[STACK, STACK], 20);
    engine.process_bet(1, Chips(100)).expect("bet");
    assert_eq!(engine.process_bet(2, Chips(50)), Err(BettingError::IncompleteCall));
}

#[test]
fn incomplete_all_in_raise_does_not_reopen_betting() {
    let mut engine = flop_engine(&[STACK, 150, STACK], 20);

    assert_eq!(engine.process_bet(1, Chips(100)), Ok(BetKind::Bet));
    engine.advance_action();
    assert_eq!(engine.process_bet(2, Chips(150)), Ok(BetKind::IncompleteRaise));
    assert_eq!(engine.current_bet, Chips(150));
    assert_eq!(engine.min_raise, Chips(100), "неполный рейз не меняет минимальный шаг");
    engine.advance_action();

    // Игрок 3 ещё не ходил: ему рейз доступен, но он коллирует.
    assert_eq!(engine.active_player_id(), Some(3));
    assert_eq!(engine.process_bet(3, Chips(150)), Ok(BetKind::Call));
    engine.advance_action();

    // Игрок 1 уже ходил до олл-ина: только call или fold.
    assert_eq!(engine.active_player_id(), Some(1));
    assert!(engine.raise_closed.contains(&1));
    assert_eq!(engine.process_bet(1, Chips(400)), Err(BettingError::RaiseNotReopened));
    assert_eq!(engine.process_bet(1, Chips(150)), Ok(BetKind::Call));
    engine.advance_action();

    assert!(engine.is_betting_round_complete());
    assert_eq!(engine.calculate_total_pot(), Chips(450));
}

#[test]
fn full_raise_resets_has_acted_of_others() {
    let mut engine = flop_engine(&[STACK, STACK, STACK], 20);
    engine.process_bet(1, Chips::ZERO).expect("check");
    engine.process_bet(2, Chips(40)).expect("bet");

    let p1 = engine.player(1).expect("p1");
    assert!(!p1.has_acted);
    assert!(!engine.is_betting_round_complete());
}

#[test]
fn round_completes_when_only_one_player_remains() {
    let mut engine = flop_engine(&[STACK, STACK, STACK], 20);
    engine.process_bet(1, Chips(40)).expect("bet");
    engine.fold(2).expect("fold");
    engine.fold(3).expect("fold");

    assert_eq!(engine.in_hand_count(), 1);
    assert!(engine.is_betting_round_complete());
}

#[test]
fn blind_larger_than_stack_puts_player_all_in() {
    let mut engine = engine_with(&[STACK, 15], 20);
    engine.post_blind(1, Chips(10)).expect("sb");
    assert_eq!(engine.post_blind(2, Chips(20)), Ok(Chips(15)));
    assert_eq!(engine.player(2).map(|p| p.status), Some(PlayerStatus::AllIn));
    assert_eq!(engine.current_bet, Chips(15));
}
