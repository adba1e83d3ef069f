use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::PlayerStatus;
use crate::domain::{GameId, PlayerId, SeatIndex, TableId};
use crate::engine::side_pots::SidePot;

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAtTableDto {
    pub player_id: PlayerId,
    pub seat_index: SeatIndex,
    pub chips: Chips,
    pub current_bet: Chips,
    pub total_bet: Chips,
    pub status: PlayerStatus,
    /// Карманные карты – только для самого игрока.
    pub hole_cards: Option<Vec<Card>>,
}

/// DTO стола глазами конкретного зрителя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableViewDto {
    pub table_id: TableId,
    pub name: String,
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub game_id: Option<GameId>,
    pub hand_number: u64,
    pub phase: Phase,
    pub pot: Chips,
    pub side_pots: Vec<SidePot>,
    pub board: Vec<Card>,
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub dealer_id: Option<PlayerId>,
    pub small_blind_id: Option<PlayerId>,
    pub big_blind_id: Option<PlayerId>,
    /// Чей ход (если раздача идёт).
    pub active_player_id: Option<PlayerId>,
    pub players: Vec<PlayerAtTableDto>,
    pub frozen: bool,
}
