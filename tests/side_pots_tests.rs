//! Side pot тесты.
//!
//! Проверяем:
//! - раскладку 100/250/500/500 на три банка;
//! - фишки сфолдивших входят в банк, но не дают права на него;
//! - сумма банков всегда равна сумме вкладов (proptest).

use std::collections::BTreeSet;

use proptest::prelude::*;

use poker_table_engine::domain::chips::Chips;
use poker_table_engine::domain::player::{GamePlayer, PlayerStatus};
use poker_table_engine::domain::PlayerId;
use poker_table_engine::engine::side_pots::pot_levels;
use poker_table_engine::engine::{calculate_side_pots, calculate_total_pot};

/// Игрок с заданным вкладом в банк; id = seat + 1.
fn contributor(seat: u8, total_bet: u64, status: PlayerStatus) -> GamePlayer {
    let mut p = GamePlayer::new(seat as PlayerId + 1, seat, Chips::ZERO);
    p.total_bet = Chips(total_bet);
    p.status = status;
    p
}

fn ids(list: &[PlayerId]) -> BTreeSet<PlayerId> {
    list.iter().copied().collect()
}

#[test]
fn four_way_all_in_builds_three_pots() {
    let players = vec![
        contributor(0, 100, PlayerStatus::AllIn),
        contributor(1, 250, PlayerStatus::AllIn),
        contributor(2, 500, PlayerStatus::AllIn),
        contributor(3, 500, PlayerStatus::Active),
    ];

    let pots = calculate_side_pots(&players);
    assert_eq!(pots.len(), 3);

    assert_eq!(pots[0].amount, Chips(400));
    assert_eq!(pots[0].eligible_player_ids, ids(&[1, 2, 3, 4]));

    assert_eq!(pots[1].amount, Chips(450));
    assert_eq!(pots[1].eligible_player_ids, ids(&[2, 3, 4]));

    assert_eq!(pots[2].amount, Chips(500));
    assert_eq!(pots[2].eligible_player_ids, ids(&[3, 4]));

    let sum: Chips = pots.iter().map(|p| p.amount).sum();
    assert_eq!(sum, Chips(1350));
    assert_eq!(calculate_total_pot(&players), Chips(1350));
}

#[test]
fn equal_contributions_make_a_single_pot() {
    let players = vec![
        contributor(0, 200, PlayerStatus::Active),
        contributor(1, 200, PlayerStatus::Active),
    ];
    let pots = calculate_side_pots(&players);
    assert_eq!(pots.len(), 1);
    assert_eq!(pots[0].amount, Chips(400));
}

#[test]
fn folded_chips_stay_in_the_pot() {
    let players = vec![
        contributor(0, 300, PlayerStatus::Folded),
        contributor(1, 100, PlayerStatus::AllIn),
        contributor(2, 300, PlayerStatus::Active),
    ];

    let pots = calculate_side_pots(&players);
    assert_eq!(pots.len(), 2);
    assert_eq!(pots[0].amount, Chips(300));
    assert_eq!(pots[0].eligible_player_ids, ids(&[2, 3]));
    assert_eq!(pots[1].amount, Chips(400));
    assert_eq!(pots[1].eligible_player_ids, ids(&[3]));
}

#[test]
fn level_without_eligible_players_keeps_its_contributors() {
    // Старший уровень оплатил только сфолдивший игрок.
    let players = vec![
        contributor(0, 500, PlayerStatus::Folded),
        contributor(1, 200, PlayerStatus::AllIn),
    ];

    let levels = pot_levels(&players);
    assert_eq!(levels.len(), 2);
    let top = &levels[1];
    assert!(top.pot.eligible_player_ids.is_empty());
    assert_eq!(top.contributors, vec![1]);
    assert_eq!(top.per_contributor, Chips(300));
    assert_eq!(top.pot.amount, Chips(300));
}

#[test]
fn players_without_contribution_are_ignored() {
    let players = vec![
        contributor(0, 0, PlayerStatus::Folded),
        contributor(1, 50, PlayerStatus::Active),
        contributor(2, 50, PlayerStatus::Active),
    ];
    let pots = calculate_side_pots(&players);
    assert_eq!(pots.len(), 1);
    assert_eq!(pots[0].eligible_player_ids, ids(&[2, 3]));
}

fn status_strategy() -> impl Strategy<Value = PlayerStatus> {
    prop_oneof![
        Just(PlayerStatus::Active),
        Just(PlayerStatus::AllIn),
        Just(PlayerStatus::Folded),
    ]
}

proptest! {
    #[test]
    fn side_pots_conserve_chips(
        bets in prop::collection::vec((0u64..5_000, status_strategy()), 2..10)
    ) {
        let players: Vec<GamePlayer> = bets
            .iter()
            .enumerate()
            .map(|(seat, (bet, status))| contributor(seat as u8, *bet, *status))
            .collect();

        let pots = calculate_side_pots(&players);
        let sum: Chips = pots.iter().map(|p| p.amount).sum();
        prop_assert_eq!(sum, calculate_total_pot(&players));

        for pot in &pots {
            for pid in &pot.eligible_player_ids {
                let p = &players[(*pid - 1) as usize];
                prop_assert!(p.is_in_hand());
            }
        }
    }
}
