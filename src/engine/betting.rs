use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::{GamePlayer, PlayerStatus};
use crate::domain::PlayerId;
use crate::engine::actions::BetKind;
use crate::engine::errors::BettingError;
use crate::engine::side_pots::{self, SidePot};
use crate::engine::validation::{diff_to_call, validate_bet, StreetView};

/// Торговля одной раздачи: участники, ставка улицы, минимальный рейз и указатель хода.
///
/// Движок не знает про очередность мест за столом; порядок хода задаёт вектор
/// `players` (по часовой стрелке от места 0), а кому начинать улицу решает
/// машина состояний раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingEngine {
    /// Участники раздачи, отсортированные по месту.
    pub players: Vec<GamePlayer>,
    /// Текущая улица.
    pub phase: Phase,
    /// Наибольшая ставка улицы, до которой должны дотянуться игроки.
    pub current_bet: Chips,
    /// Минимальный прирост следующего рейза.
    pub min_raise: Chips,
    pub big_blind: Chips,
    /// Игроки, которым неполный олл-ин не переоткрыл рейз: могут только call/fold.
    pub raise_closed: BTreeSet<PlayerId>,
    /// Индекс игрока, чей сейчас ход.
    pub action_index: Option<usize>,
}

impl BettingEngine {
    pub fn new(mut players: Vec<GamePlayer>, big_blind: Chips) -> Self {
        players.sort_by_key(|p| p.seat);
        Self {
            players,
            phase: Phase::PreFlop,
            current_bet: Chips::ZERO,
            min_raise: big_blind,
            big_blind,
            raise_closed: BTreeSet::new(),
            action_index: None,
        }
    }

    /// Начать улицу: обнулить ставки улицы, снять флаги хода у тех, кто ещё
    /// может действовать, и поставить указатель на первого такого игрока,
    /// начиная с `first_index`.
    pub fn start_betting_round(&mut self, phase: Phase, first_index: usize) {
        self.phase = phase;
        self.current_bet = Chips::ZERO;
        self.min_raise = self.big_blind;
        self.raise_closed.clear();

        for p in self.players.iter_mut() {
            p.current_bet = Chips::ZERO;
            if p.can_act() {
                p.has_acted = false;
            }
        }

        self.action_index = None;
        self.point_to_next_from(first_index);
    }

    pub fn index_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.player_id == player_id)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&GamePlayer> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    /// Чей сейчас ход.
    pub fn active_player_id(&self) -> Option<PlayerId> {
        self.action_index
            .and_then(|i| self.players.get(i))
            .map(|p| p.player_id)
    }

    /// Сколько игроку нужно доплатить до call.
    pub fn to_call(&self, player_id: PlayerId) -> Chips {
        self.player(player_id)
            .map(|p| diff_to_call(p, self.current_bet))
            .unwrap_or(Chips::ZERO)
    }

    /// Принять ставку игрока: `amount` – его итоговая ставка на улице.
    ///
    /// Все проверки выполняются до изменения состояния: при ошибке движок
    /// остаётся ровно таким, каким был.
    pub fn process_bet(&mut self, player_id: PlayerId, amount: Chips) -> Result<BetKind, BettingError> {
        let idx = self
            .index_of(player_id)
            .ok_or(BettingError::PlayerNotFound(player_id))?;

        let street = StreetView {
            current_bet: self.current_bet,
            min_raise: self.min_raise,
            raise_closed: self.raise_closed.contains(&player_id),
        };
        let kind = validate_bet(&self.players[idx], amount, &street)?;

        self.apply_bet(idx, amount, kind);
        Ok(kind)
    }

    /// Поставить блайнд. Если стека не хватает – игрок идёт в олл-ин на остаток.
    ///
    /// Блайнд засчитывается как ход, как и любая ставка: если все доколлировали
    /// до большого блайнда, улица закрыта. Малый блайнд всё равно должен
    /// ответить, пока его ставка меньше ставки улицы. Возвращает фактически
    /// поставленную сумму.
    pub fn post_blind(&mut self, player_id: PlayerId, amount: Chips) -> Result<Chips, BettingError> {
        let idx = self
            .index_of(player_id)
            .ok_or(BettingError::PlayerNotFound(player_id))?;
        let p = &mut self.players[idx];
        if !p.can_act() {
            return Err(BettingError::PlayerNotActive(player_id));
        }

        let posted = amount.min(p.chips);
        p.chips -= posted;
        p.current_bet += posted;
        p.total_bet += posted;
        p.has_acted = true;
        if p.chips.is_zero() {
            p.status = PlayerStatus::AllIn;
        }
        if p.current_bet > self.current_bet {
            self.current_bet = p.current_bet;
        }

        debug!(player_id, posted = posted.0, "blind posted");
        Ok(posted)
    }

    /// Фолд. Игрок в олл-ине сфолдить не может.
    pub fn fold(&mut self, player_id: PlayerId) -> Result<(), BettingError> {
        let p = self
            .players
            .iter_mut()
            .find(|p| p.player_id == player_id)
            .ok_or(BettingError::PlayerNotFound(player_id))?;
        match p.status {
            PlayerStatus::Folded => Err(BettingError::AlreadyFolded(player_id)),
            PlayerStatus::AllIn | PlayerStatus::SittingOut => {
                Err(BettingError::PlayerNotActive(player_id))
            }
            PlayerStatus::Active => {
                p.status = PlayerStatus::Folded;
                p.has_acted = true;
                self.raise_closed.remove(&player_id);
                Ok(())
            }
        }
    }

    /// Завершена ли улица.
    ///
    /// Помимо общего правила, улица закрыта, если ходить может только один
    /// игрок и он уже покрывает наибольшую ставку: торговаться ему не с кем.
    pub fn is_betting_round_complete(&self) -> bool {
        if is_betting_round_complete(&self.players) {
            return true;
        }

        let mut actors = self.players.iter().filter(|p| p.can_act());
        match (actors.next(), actors.next()) {
            (Some(only), None) => {
                let max_bet = self
                    .players
                    .iter()
                    .filter(|p| p.is_in_hand())
                    .map(|p| p.current_bet)
                    .max()
                    .unwrap_or(Chips::ZERO);
                only.current_bet >= max_bet
            }
            _ => false,
        }
    }

    /// Передвинуть указатель хода на следующего игрока, которому нужно действовать.
    /// Если такого нет – указатель сбрасывается.
    pub fn advance_action(&mut self) {
        let start = self.action_index.map(|i| i + 1).unwrap_or(0);
        self.point_to_next_from(start);
    }

    /// Поставить указатель на первого игрока, начиная с `start` (по кругу),
    /// которому нужно действовать.
    pub fn point_to_next_from(&mut self, start: usize) {
        self.action_index = None;
        if self.players.is_empty() || self.is_betting_round_complete() {
            return;
        }
        let n = self.players.len();
        for i in 0..n {
            let idx = (start + i) % n;
            let p = &self.players[idx];
            if p.can_act() && (!p.has_acted || p.current_bet < self.current_bet) {
                self.action_index = Some(idx);
                return;
            }
        }
    }

    /// Сколько игроков ещё претендуют на банк.
    pub fn in_hand_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_in_hand()).count()
    }

    pub fn calculate_side_pots(&self) -> Vec<SidePot> {
        side_pots::calculate_side_pots(&self.players)
    }

    pub fn calculate_total_pot(&self) -> Chips {
        side_pots::calculate_total_pot(&self.players)
    }

    fn apply_bet(&mut self, idx: usize, amount: Chips, kind: BetKind) {
        let previous_bet = self.current_bet;
        let player_id = {
            let p = &mut self.players[idx];
            let delta = amount - p.current_bet;
            p.chips -= delta;
            p.current_bet = amount;
            p.total_bet += delta;
            p.has_acted = true;
            if p.chips.is_zero() {
                p.status = PlayerStatus::AllIn;
            }
            p.player_id
        };

        match kind {
            BetKind::Bet | BetKind::Raise => {
                self.min_raise = amount - previous_bet;
                self.current_bet = amount;
                self.raise_closed.clear();
                for (i, other) in self.players.iter_mut().enumerate() {
                    if i != idx && other.can_act() {
                        other.has_acted = false;
                    }
                }
            }
            BetKind::IncompleteRaise => {
                // Уже походившие должны ответить, но рейзить им нельзя.
                self.current_bet = amount;
                for (i, other) in self.players.iter_mut().enumerate() {
                    if i != idx && other.can_act() && other.has_acted {
                        other.has_acted = false;
                        self.raise_closed.insert(other.player_id);
                    }
                }
            }
            BetKind::Check | BetKind::Call | BetKind::ShortCall => {}
        }

        debug!(
            player_id,
            ?kind,
            street_bet = amount.0,
            current_bet = self.current_bet.0,
            min_raise = self.min_raise.0,
            "bet applied"
        );
    }
}

/// Общее правило завершения улицы:
/// - в раздаче остался не более чем один игрок, или
/// - каждый, кто ещё может ставить, уже походил, и их ставки на улице равны.
pub fn is_betting_round_complete(players: &[GamePlayer]) -> bool {
    if players.iter().filter(|p| p.is_in_hand()).count() <= 1 {
        return true;
    }

    let mut actors = players.iter().filter(|p| p.can_act());
    let first_bet = match actors.clone().next() {
        Some(p) => p.current_bet,
        None => return true,
    };
    actors.all(|p| p.has_acted && p.current_bet == first_bet)
}
