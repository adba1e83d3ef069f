use crate::domain::player::GamePlayer;
use crate::domain::PlayerId;
use crate::state::TableState;

use super::dto::{PlayerAtTableDto, TableViewDto};

/// Сформировать DTO стола для зрителя `viewer`.
///
/// Во время раздачи показываются участники раздачи (стеки и ставки из неё),
/// между раздачами – все сидящие. Чужие карманные карты скрыты.
pub fn build_table_view(state: &TableState, viewer: Option<PlayerId>) -> TableViewDto {
    let snapshot = state.snapshot();
    let table = &state.table;

    let mut players: Vec<PlayerAtTableDto> = snapshot
        .players
        .iter()
        .map(|p| player_dto(p, viewer))
        .collect();

    // Севшие посреди раздачи тоже видны за столом.
    for seated in table.seats.iter().flatten() {
        if !players.iter().any(|p| p.player_id == seated.player_id) {
            players.push(player_dto(seated, viewer));
        }
    }
    players.sort_by_key(|p| p.seat_index);

    TableViewDto {
        table_id: table.id,
        name: table.name.clone(),
        max_seats: table.config.max_seats,
        small_blind: table.config.stakes.small_blind,
        big_blind: table.config.stakes.big_blind,
        game_id: snapshot.game_id,
        hand_number: snapshot.hand_number,
        phase: snapshot.phase,
        pot: snapshot.pot,
        side_pots: snapshot.side_pots,
        board: snapshot.community_cards,
        current_bet: snapshot.current_bet,
        min_raise: snapshot.min_raise,
        dealer_id: snapshot.dealer_id,
        small_blind_id: snapshot.small_blind_id,
        big_blind_id: snapshot.big_blind_id,
        active_player_id: snapshot.active_player_id,
        players,
        frozen: table.frozen,
    }
}

fn player_dto(p: &GamePlayer, viewer: Option<PlayerId>) -> PlayerAtTableDto {
    let show_cards = viewer == Some(p.player_id) && !p.hole_cards.is_empty();
    PlayerAtTableDto {
        player_id: p.player_id,
        seat_index: p.seat,
        chips: p.chips,
        current_bet: p.current_bet,
        total_bet: p.total_bet,
        status: p.status,
        hole_cards: if show_cards {
            Some(p.hole_cards.clone())
        } else {
            None
        },
    }
}
