use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::{GamePlayer, PlayerStatus};
use crate::domain::{PlayerId, TableId};

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Стейки стола (SB/BB).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
        }
    }
}

/// Конфиг стола: сколько мест, блайнды, границы бай-ина.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    /// Максимальное количество мест за столом (2–10).
    pub max_seats: u8,
    pub stakes: TableStakes,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    /// Запускать следующую раздачу автоматически после FINISHED.
    pub auto_start_next_hand: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_seats: 6,
            stakes: TableStakes::new(Chips(10), Chips(20)),
            min_buy_in: Chips(400),
            max_buy_in: Chips(4_000),
            auto_start_next_hand: false,
        }
    }
}

/// Постоянное состояние стола между раздачами: места, кнопка, счётчик раздач.
///
/// Во время раздачи стеки живут в машине состояний раздачи;
/// сюда они возвращаются при завершении (или аннулировании) раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,

    /// Места за столом: индекс вектора = SeatIndex.
    /// None – место пустое.
    pub seats: Vec<Option<GamePlayer>>,

    /// Игроки, подключившиеся к столу (включая зрителей).
    pub observers: BTreeSet<PlayerId>,

    /// Индекс дилерской кнопки или None, если раздач ещё не было.
    pub dealer_button: Option<SeatIndex>,

    /// Сколько раздач начато за этим столом.
    pub hand_number: u64,

    /// Стол заморожен после нарушения инварианта: действия не принимаются.
    pub frozen: bool,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, name: impl Into<String>, config: TableConfig) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            name: name.into(),
            config,
            seats,
            observers: BTreeSet::new(),
            dealer_button: None,
            hand_number: 0,
            frozen: false,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    pub fn find_player(&self, player_id: PlayerId) -> Option<&GamePlayer> {
        self.seats
            .iter()
            .flatten()
            .find(|p| p.player_id == player_id)
    }

    pub fn find_player_mut(&mut self, player_id: PlayerId) -> Option<&mut GamePlayer> {
        self.seats
            .iter_mut()
            .flatten()
            .find(|p| p.player_id == player_id)
    }

    /// Может ли игрок на этом месте получить карты в следующей раздаче.
    pub fn is_seat_eligible(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .and_then(|s| s.as_ref())
            .map(|p| p.status != PlayerStatus::SittingOut && !p.chips.is_zero())
            .unwrap_or(false)
    }

    /// Сумма стеков всех сидящих игроков.
    pub fn total_chips(&self) -> Chips {
        self.seats.iter().flatten().map(|p| p.chips).sum()
    }
}
