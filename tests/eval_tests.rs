//! Тесты оценщика рук.
//!
//! Проверяем:
//! - порядок всех 10 категорий (45 пар);
//! - колесо A-2-3-4-5 как самый младший стрит;
//! - кикеры и выбор лучшей пятёрки из 7 карт;
//! - ошибки: неверный размер руки, дубликаты.

use std::cmp::Ordering;

use poker_table_engine::domain::card::{parse_cards, Card, Rank};
use poker_table_engine::eval::{
    compare_hands, evaluate, evaluate_best_hand, EvalError, HandEvaluation, HandRanking,
};

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("valid card string")
}

fn eval(s: &str) -> HandEvaluation {
    evaluate(&cards(s)).expect("valid hand")
}

/// По одному представителю на каждую категорию, от слабой к сильной.
fn representatives() -> Vec<(&'static str, HandRanking)> {
    vec![
        ("Ah Jd 8c 5s 3h", HandRanking::HighCard),
        ("Kh Kd 9c 5s 3h", HandRanking::Pair),
        ("Kh Kd 9c 9s 3h", HandRanking::TwoPair),
        ("7h 7d 7c Ks 3h", HandRanking::ThreeOfAKind),
        ("9h 8d 7c 6s 5h", HandRanking::Straight),
        ("Ah Jh 8h 5h 3h", HandRanking::Flush),
        ("7h 7d 7c 3s 3h", HandRanking::FullHouse),
        ("7h 7d 7c 7s 3h", HandRanking::FourOfAKind),
        ("9s 8s 7s 6s 5s", HandRanking::StraightFlush),
        ("As Ks Qs Js Ts", HandRanking::RoyalFlush),
    ]
}

#[test]
fn every_category_is_detected() {
    for (hand, expected) in representatives() {
        assert_eq!(eval(hand).ranking, expected, "рука {hand}");
    }
}

#[test]
fn categories_are_strictly_ordered() {
    let reps = representatives();
    let mut pairs = 0;
    for i in 0..reps.len() {
        for j in (i + 1)..reps.len() {
            let weaker = eval(reps[i].0);
            let stronger = eval(reps[j].0);
            assert_eq!(
                compare_hands(&weaker, &stronger),
                Ordering::Less,
                "{:?} должна быть слабее {:?}",
                reps[i].1,
                reps[j].1
            );
            assert_eq!(compare_hands(&stronger, &weaker), Ordering::Greater);
            pairs += 1;
        }
    }
    assert_eq!(pairs, 45);
}

#[test]
fn wheel_is_the_lowest_straight() {
    let wheel = eval("Ah 2d 3c 4s 5h");
    assert_eq!(wheel.ranking, HandRanking::Straight);
    assert_eq!(wheel.high_card, Rank::Five);

    let six_high = eval("2h 3d 4c 5s 6h");
    assert_eq!(compare_hands(&wheel, &six_high), Ordering::Less);

    let steel_wheel = eval("As 2s 3s 4s 5s");
    assert_eq!(steel_wheel.ranking, HandRanking::StraightFlush);
    assert_eq!(steel_wheel.high_card, Rank::Five);
}

#[test]
fn kickers_break_ties_within_a_category() {
    let ak = eval("Ah Ad Kc 7s 3h");
    let aq = eval("As Ac Qd 7h 3c");
    assert_eq!(compare_hands(&ak, &aq), Ordering::Greater);

    let same_a = eval("Ah Ad Kc 7s 3h");
    let same_b = eval("As Ac Kd 7h 3c");
    assert_eq!(compare_hands(&same_a, &same_b), Ordering::Equal);
}

#[test]
fn best_five_out_of_seven() {
    // Флеш на борде проигрывает стрит-флешу с карманными.
    let hole = cards("9h 8h");
    let board = cards("7h 6h 5h Ah 2c");
    let ev = evaluate_best_hand(&hole, &board).expect("valid");
    assert_eq!(ev.ranking, HandRanking::StraightFlush);
    assert_eq!(ev.high_card, Rank::Nine);
    assert_eq!(ev.best_five.len(), 5);

    // Два сета → фулл-хаус из старшего сета.
    let ev = evaluate(&cards("Kh Kd Kc 4s 4h 4d 2c")).expect("valid");
    assert_eq!(ev.ranking, HandRanking::FullHouse);
    assert_eq!(ev.high_card, Rank::King);
}

#[test]
fn invalid_hand_size_is_rejected() {
    assert_eq!(evaluate(&cards("Ah Kd 5c 2s")), Err(EvalError::InvalidHandSize(4)));
    assert_eq!(
        evaluate(&cards("Ah Kd 5c 2s 3s 4s 6s 7s")),
        Err(EvalError::InvalidHandSize(8))
    );
    assert_eq!(evaluate(&[]), Err(EvalError::InvalidHandSize(0)));
}

#[test]
fn duplicate_cards_are_rejected() {
    let dup = cards("Ah Ah 5c 2s 3s");
    assert!(matches!(evaluate(&dup), Err(EvalError::DuplicateCard(_))));
}
