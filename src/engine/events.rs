use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{Payout, Phase, Refund};
use crate::domain::{GameId, PlayerId, SeatIndex};
use crate::engine::actions::LoggedAction;
use crate::eval::HandRanking;

/// Открытые на шоудауне карты игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowdownHand {
    pub player_id: PlayerId,
    pub hole_cards: Vec<Card>,
    pub best_five: Vec<Card>,
    pub ranking: HandRanking,
    pub description: String,
}

/// Исходящее событие стола.
///
/// Все события, кроме `CardsDealt` и `Error`, рассылаются всем подключённым
/// к столу; `CardsDealt` получает только владелец карт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableEvent {
    PlayerJoined {
        player_id: PlayerId,
    },
    PlayerSeated {
        player_id: PlayerId,
        seat: SeatIndex,
        chips: Chips,
    },
    PlayerLeft {
        player_id: PlayerId,
        cashed_out: Chips,
    },
    /// Игрок пропускает раздачи; `busted` – остался без фишек.
    PlayerSatOut {
        player_id: PlayerId,
        busted: bool,
    },
    PlayerSatIn {
        player_id: PlayerId,
    },
    HandStarted {
        game_id: GameId,
        hand_number: u64,
        dealer_id: PlayerId,
        small_blind_id: PlayerId,
        big_blind_id: PlayerId,
        /// Коммит колоды публикуется до раздачи карт.
        deck_commitment: String,
    },
    BlindsPosted {
        small_blind_id: PlayerId,
        small_blind: Chips,
        big_blind_id: PlayerId,
        big_blind: Chips,
    },
    CardsDealt {
        player_id: PlayerId,
        cards: Vec<Card>,
    },
    CommunityCards {
        phase: Phase,
        cards: Vec<Card>,
    },
    PlayerActionApplied {
        player_id: PlayerId,
        action: LoggedAction,
        amount: Chips,
        resulting_chips: Chips,
    },
    BettingRoundComplete {
        pot: Chips,
        next_phase: Phase,
    },
    HandComplete {
        winners: Vec<PlayerId>,
        payouts: Vec<Payout>,
        showdown: Vec<ShowdownHand>,
    },
    HandVoided {
        reason: String,
        refunds: Vec<Refund>,
    },
    TableFrozen {
        reason: String,
    },
    Error {
        code: String,
        message: String,
    },
}

impl TableEvent {
    /// Приватное событие: кому оно адресовано. None – рассылка всем.
    pub fn private_recipient(&self) -> Option<PlayerId> {
        match self {
            TableEvent::CardsDealt { player_id, .. } => Some(*player_id),
            _ => None,
        }
    }
}
