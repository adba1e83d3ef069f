use core::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::card::{Card, Rank, Suit};

use super::hand_rank::{HandEvaluation, HandRanking};
use super::lookup_tables::{detect_straight, mask_of, straight_ranks, RankMask};
use super::EvalError;

/// Вычислить лучшую 5-карточную руку из 5–7 карт.
///
/// Для 6–7 карт перебираются ВСЕ 5-карточные комбинации (21 для семи карт),
/// без эвристик: иначе можно потерять кикер.
pub fn evaluate(cards: &[Card]) -> Result<HandEvaluation, EvalError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EvalError::InvalidHandSize(cards.len()));
    }

    let mut seen = HashSet::with_capacity(cards.len());
    for card in cards {
        if !seen.insert(*card) {
            return Err(EvalError::DuplicateCard(*card));
        }
    }

    let n = cards.len();
    let mut best: Option<HandEvaluation> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let candidate = evaluate_five(&five);
                        let better = best
                            .as_ref()
                            .map_or(true, |b| candidate.strength_cmp(b) == Ordering::Greater);
                        if better {
                            best = Some(candidate);
                        }
                    }
                }
            }
        }
    }

    best.ok_or(EvalError::InvalidHandSize(n))
}

/// Удобная обёртка: карманные карты + борд.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> Result<HandEvaluation, EvalError> {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);
    evaluate(&all_cards)
}

/// Сравнить две руки.
pub fn compare_hands(a: &HandEvaluation, b: &HandEvaluation) -> Ordering {
    a.strength_cmp(b)
}

/// Оценка строго 5-карточной комбинации.
fn evaluate_five(cards: &[Card; 5]) -> HandEvaluation {
    let first_suit: Suit = cards[0].suit;
    let is_flush = cards.iter().all(|c| c.suit == first_suit);
    let mask: RankMask = mask_of(cards.iter().map(|c| c.rank));
    let straight_high = detect_straight(mask);

    // Группы (ранг, количество): сначала по количеству, затем по рангу, по убыванию.
    let mut groups: Vec<(Rank, u8)> = Vec::with_capacity(5);
    for card in cards {
        match groups.iter_mut().find(|(r, _)| *r == card.rank) {
            Some((_, count)) => *count += 1,
            None => groups.push((card.rank, 1)),
        }
    }
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
    let pattern: Vec<u8> = groups.iter().map(|(_, c)| *c).collect();
    let ordered_ranks: Vec<Rank> = groups.iter().map(|(r, _)| *r).collect();

    if let (true, Some(high)) = (is_flush, straight_high) {
        let ranking = if high == Rank::Ace {
            HandRanking::RoyalFlush
        } else {
            HandRanking::StraightFlush
        };
        return build(ranking, high, Vec::new(), order_cards(cards, &straight_ranks(high)));
    }

    let ranking = match pattern.as_slice() {
        [4, 1] => HandRanking::FourOfAKind,
        [3, 2] => HandRanking::FullHouse,
        _ if is_flush => HandRanking::Flush,
        _ if straight_high.is_some() => HandRanking::Straight,
        [3, 1, 1] => HandRanking::ThreeOfAKind,
        [2, 2, 1] => HandRanking::TwoPair,
        [2, 1, 1, 1] => HandRanking::Pair,
        _ => HandRanking::HighCard,
    };

    if let (HandRanking::Straight, Some(high)) = (ranking, straight_high) {
        return build(ranking, high, Vec::new(), order_cards(cards, &straight_ranks(high)));
    }

    let high = ordered_ranks[0];
    let kickers = ordered_ranks[1..].to_vec();
    build(ranking, high, kickers, order_cards(cards, &ordered_ranks))
}

fn build(ranking: HandRanking, high_card: Rank, kickers: Vec<Rank>, best_five: Vec<Card>) -> HandEvaluation {
    HandEvaluation {
        ranking,
        high_card,
        kickers,
        best_five,
    }
}

/// Разложить карты в порядке значимости рангов.
fn order_cards(cards: &[Card; 5], rank_order: &[Rank]) -> Vec<Card> {
    let mut ordered = Vec::with_capacity(5);
    for rank in rank_order {
        for card in cards.iter().filter(|c| c.rank == *rank) {
            if !ordered.contains(card) {
                ordered.push(*card);
            }
        }
    }
    ordered
}
