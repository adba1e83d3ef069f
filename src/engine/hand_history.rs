use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::{Payout, Phase, Refund};
use crate::domain::{GameId, PlayerId, TableId};
use crate::engine::actions::{ActionSource, LoggedAction};
use crate::fairness::ShuffledDeck;
use crate::state::GameState;

/// Одно действие в упорядоченном логе раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionRecord {
    pub index: u32,
    pub phase: Phase,
    pub player_id: PlayerId,
    pub action: LoggedAction,
    /// Итоговая ставка игрока на улице после действия.
    pub street_bet: Chips,
    pub resulting_chips: Chips,
    pub source: ActionSource,
}

/// Упорядоченный лог действий раздачи (включая блайнды и авто-действия).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandHistory {
    pub actions: Vec<ActionRecord>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn push(
        &mut self,
        phase: Phase,
        player_id: PlayerId,
        action: LoggedAction,
        street_bet: Chips,
        resulting_chips: Chips,
        source: ActionSource,
    ) {
        let index = self.actions.len() as u32;
        self.actions.push(ActionRecord {
            index,
            phase,
            player_id,
            action,
            street_bet,
            resulting_chips,
            source,
        });
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Чем закончилась раздача.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandOutcome {
    /// Банк разыгран (на шоудауне или после фолдов).
    Completed {
        winners: Vec<PlayerId>,
        payouts: Vec<Payout>,
        went_to_showdown: bool,
    },
    /// Колода не прошла проверку: ставки возвращены.
    Voided {
        reason: String,
        refunds: Vec<Refund>,
    },
}

/// Полная запись о раздаче для архива и аудита: коммит колоды, seed и
/// доказательство перемешивания, лог действий и итог.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandRecord {
    pub table_id: TableId,
    pub game_id: GameId,
    pub hand_number: u64,
    pub deck: ShuffledDeck,
    pub actions: Vec<ActionRecord>,
    pub final_state: GameState,
    pub outcome: HandOutcome,
}
