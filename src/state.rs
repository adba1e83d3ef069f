//! Состояние стола: неизменяемый снапшот раздачи (`GameState`) и агрегат
//! `TableState`, которым владеет актор стола.
//!
//! `TableState::apply` – чистый переход "состояние + команда → новое
//! состояние + события"; ввод-вывод (кошелёк, архив) делает актор между
//! переходами.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::commands::TableCommand;
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::{GamePlayer, PlayerStatus};
use crate::domain::table::Table;
use crate::domain::{GameId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::ActionSource;
use crate::engine::errors::EngineError;
use crate::engine::events::TableEvent;
use crate::engine::game_loop::GameStateMachine;
use crate::engine::hand_history::HandRecord;
use crate::engine::side_pots::SidePot;
use crate::fairness::DeckSource;
use crate::infra::ids::IdGenerator;
use crate::infra::mapping::action_from_api;

/// Снапшот раздачи (или стола между раздачами).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub table_id: TableId,
    pub game_id: Option<GameId>,
    pub phase: Phase,
    /// Весь банк: сумма total_bet всех участников.
    pub pot: Chips,
    /// Основной банк (первый) и сайд-поты.
    pub side_pots: Vec<SidePot>,
    pub community_cards: Vec<Card>,
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub active_player_id: Option<PlayerId>,
    pub dealer_id: Option<PlayerId>,
    pub small_blind_id: Option<PlayerId>,
    pub big_blind_id: Option<PlayerId>,
    pub hand_number: u64,
    pub players: Vec<GamePlayer>,
}

impl GameState {
    /// Снапшот стола без активной раздачи.
    pub fn idle(table: &Table) -> Self {
        let dealer_id = table
            .dealer_button
            .and_then(|seat| table.seats.get(seat as usize))
            .and_then(|s| s.as_ref())
            .map(|p| p.player_id);

        Self {
            table_id: table.id,
            game_id: None,
            phase: Phase::Waiting,
            pot: Chips::ZERO,
            side_pots: Vec::new(),
            community_cards: Vec::new(),
            current_bet: Chips::ZERO,
            min_raise: table.config.stakes.big_blind,
            active_player_id: None,
            dealer_id,
            small_blind_id: None,
            big_blind_id: None,
            hand_number: table.hand_number,
            players: table.seats.iter().flatten().cloned().collect(),
        }
    }
}

/// Что нужно актору, чтобы начать раздачу.
pub struct HandContext<'a> {
    pub deck_source: &'a mut dyn DeckSource,
    pub ids: &'a IdGenerator,
}

/// Результат успешного перехода.
#[derive(Clone, Debug, Default)]
pub struct Transition {
    pub events: Vec<TableEvent>,
    /// Игроки, вставшие из-за стола, и их стеки: зачислить в кошелёк.
    pub cash_outs: Vec<(PlayerId, Chips)>,
    /// Завершённая (или аннулированная) раздача: отправить в архив.
    pub finished_hand: Option<HandRecord>,
}

impl Transition {
    pub fn hand_voided(&self) -> bool {
        self.finished_hand
            .as_ref()
            .map(|r| matches!(r.outcome, crate::engine::HandOutcome::Voided { .. }))
            .unwrap_or(false)
    }
}

/// Всё состояние одного стола.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableState {
    pub table: Table,
    pub hand: Option<GameStateMachine>,
    /// Ушли посреди раздачи: встанут из-за стола, когда она закончится.
    pub pending_leave: BTreeSet<PlayerId>,
    /// Потеряли соединение: на своём ходу получают действие по умолчанию.
    pub disconnected: BTreeSet<PlayerId>,
}

impl TableState {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            hand: None,
            pending_leave: BTreeSet::new(),
            disconnected: BTreeSet::new(),
        }
    }

    pub fn snapshot(&self) -> GameState {
        match &self.hand {
            Some(hand) => hand.snapshot(),
            None => GameState::idle(&self.table),
        }
    }

    /// Чей сейчас ход.
    pub fn active_player_id(&self) -> Option<PlayerId> {
        self.hand.as_ref().and_then(|h| h.active_player_id())
    }

    pub fn is_frozen(&self) -> bool {
        self.table.frozen
    }

    /// Заморозить стол до ручной сверки. Раздача остаётся как есть.
    pub fn freeze(&mut self) {
        self.table.frozen = true;
    }

    /// Применить команду. При ошибке исходное состояние не меняется.
    pub fn apply(&self, command: &TableCommand, ctx: &mut HandContext<'_>) -> Result<(TableState, Transition), EngineError> {
        if self.table.frozen && !matches!(command, TableCommand::JoinTable { .. } | TableCommand::Disconnect { .. }) {
            return Err(EngineError::TableFrozen);
        }

        let mut next = self.clone();
        let mut transition = Transition::default();

        match *command {
            TableCommand::JoinTable { player_id } => {
                next.table.observers.insert(player_id);
                next.disconnected.remove(&player_id);
                transition.events.push(TableEvent::PlayerJoined { player_id });
            }
            TableCommand::SitDown {
                player_id,
                seat,
                buy_in,
            } => {
                next.sit_down(player_id, seat, buy_in)?;
                transition.events.push(TableEvent::PlayerSeated {
                    player_id,
                    seat,
                    chips: buy_in,
                });
            }
            TableCommand::PlayerAction {
                player_id,
                action,
                amount,
            } => {
                let action = action_from_api(action, amount)?;
                let hand = next.running_hand_mut()?;
                let events = hand.apply_action(player_id, action, ActionSource::Player)?;
                transition.events.extend(events);
            }
            TableCommand::LeaveTable { player_id } => {
                next.leave(player_id, &mut transition)?;
            }
            TableCommand::SitOut { player_id } => {
                next.sit_out(player_id, &mut transition)?;
            }
            TableCommand::SitIn { player_id } => {
                next.sit_in(player_id, &mut transition)?;
            }
            TableCommand::StartHand => {
                if next.hand.is_some() {
                    return Err(EngineError::HandAlreadyInProgress);
                }
                let game_id = ctx.ids.next_game_id();
                let (hand, events) = GameStateMachine::start_hand(&mut next.table, ctx.deck_source, game_id)?;
                next.hand = Some(hand);
                transition.events.extend(events);
            }
            TableCommand::Timeout { player_id } => {
                let hand = next.running_hand_mut()?;
                if hand.active_player_id() != Some(player_id) {
                    return Err(EngineError::NotPlayersTurn(player_id));
                }
                transition.events.extend(hand.apply_default_action(player_id)?);
            }
            TableCommand::Disconnect { player_id } => {
                next.disconnected.insert(player_id);
                debug!(table_id = next.table.id, player_id, "player disconnected");
            }
        }

        next.settle(&mut transition)?;
        Ok((next, transition))
    }

    fn running_hand_mut(&mut self) -> Result<&mut GameStateMachine, EngineError> {
        match self.hand.as_mut() {
            Some(hand) if !hand.is_finished() => Ok(hand),
            _ => Err(EngineError::NoActiveHand),
        }
    }

    fn sit_down(&mut self, player_id: PlayerId, seat: SeatIndex, buy_in: Chips) -> Result<(), EngineError> {
        let config = &self.table.config;
        if seat >= config.max_seats || seat as usize >= self.table.seats.len() {
            return Err(EngineError::InvalidSeat(seat));
        }
        if self.table.find_player(player_id).is_some() {
            return Err(EngineError::PlayerAlreadySeated(player_id));
        }
        if !self.table.is_seat_empty(seat) {
            return Err(EngineError::SeatTaken(seat));
        }
        if buy_in < config.min_buy_in || buy_in > config.max_buy_in {
            return Err(EngineError::InvalidBuyIn(buy_in.0));
        }

        self.table.seats[seat as usize] = Some(GamePlayer::new(player_id, seat, buy_in));
        self.table.observers.insert(player_id);
        info!(table_id = self.table.id, player_id, seat, buy_in = buy_in.0, "player seated");
        Ok(())
    }

    fn leave(&mut self, player_id: PlayerId, transition: &mut Transition) -> Result<(), EngineError> {
        if self.table.find_player(player_id).is_none() {
            if self.table.observers.remove(&player_id) {
                self.disconnected.remove(&player_id);
                transition.events.push(TableEvent::PlayerLeft {
                    player_id,
                    cashed_out: Chips::ZERO,
                });
                return Ok(());
            }
            return Err(EngineError::PlayerNotSeated(player_id));
        }

        let in_running_hand = self
            .hand
            .as_ref()
            .map(|h| !h.is_finished() && h.betting.player(player_id).is_some())
            .unwrap_or(false);

        if in_running_hand {
            self.pending_leave.insert(player_id);
            if let Some(hand) = self.hand.as_mut() {
                transition.events.extend(hand.force_fold(player_id)?);
            }
        } else {
            self.stand_up(player_id, transition);
        }
        Ok(())
    }

    /// Место сохраняется, но в раздачи игрок не попадает. Идущую раздачу
    /// не трогает: статус за столом раздача не перезаписывает.
    fn sit_out(&mut self, player_id: PlayerId, transition: &mut Transition) -> Result<(), EngineError> {
        let table_id = self.table.id;
        let seated = self
            .table
            .find_player_mut(player_id)
            .ok_or(EngineError::PlayerNotSeated(player_id))?;
        if seated.status == PlayerStatus::SittingOut {
            return Ok(());
        }
        seated.status = PlayerStatus::SittingOut;
        info!(table_id, player_id, "player sat out");
        transition.events.push(TableEvent::PlayerSatOut {
            player_id,
            busted: false,
        });
        Ok(())
    }

    fn sit_in(&mut self, player_id: PlayerId, transition: &mut Transition) -> Result<(), EngineError> {
        let table_id = self.table.id;
        let seated = self
            .table
            .find_player_mut(player_id)
            .ok_or(EngineError::PlayerNotSeated(player_id))?;
        if seated.status != PlayerStatus::SittingOut {
            return Ok(());
        }
        if seated.chips.is_zero() {
            return Err(EngineError::NoChipsToPlay(player_id));
        }
        seated.status = PlayerStatus::Active;
        info!(table_id, player_id, "player sat in");
        transition.events.push(TableEvent::PlayerSatIn { player_id });
        Ok(())
    }

    fn stand_up(&mut self, player_id: PlayerId, transition: &mut Transition) {
        let mut cashed_out = Chips::ZERO;
        for seat in self.table.seats.iter_mut() {
            if seat.as_ref().map(|p| p.player_id) == Some(player_id) {
                if let Some(p) = seat.take() {
                    cashed_out = p.chips;
                }
            }
        }
        self.table.observers.remove(&player_id);
        self.disconnected.remove(&player_id);
        self.pending_leave.remove(&player_id);

        info!(table_id = self.table.id, player_id, cashed_out = cashed_out.0, "player left");
        transition.cash_outs.push((player_id, cashed_out));
        transition.events.push(TableEvent::PlayerLeft {
            player_id,
            cashed_out,
        });
    }

    /// После перехода: авто-действия за отключившихся, закрытие раздачи,
    /// sit out для оставшихся без фишек, выход тех, кто ждал окончания раздачи.
    fn settle(&mut self, transition: &mut Transition) -> Result<(), EngineError> {
        // Замороженная раздача стоит до ручной сверки.
        if self.table.frozen {
            return Ok(());
        }

        while let Some(hand) = self.hand.as_mut() {
            match hand.active_player_id() {
                Some(pid) if self.disconnected.contains(&pid) => {
                    transition.events.extend(hand.apply_default_action(pid)?);
                }
                _ => break,
            }
        }

        let finished = self.hand.as_ref().map(|h| h.is_finished()).unwrap_or(false);
        if !finished {
            return Ok(());
        }

        if let Some(hand) = self.hand.take() {
            hand.settle_into(&mut self.table);
            transition.finished_hand = hand.hand_record();
        }

        let table_id = self.table.id;
        for seated in self.table.seats.iter_mut().flatten() {
            if seated.chips.is_zero()
                && seated.status != PlayerStatus::SittingOut
                && !self.pending_leave.contains(&seated.player_id)
            {
                seated.status = PlayerStatus::SittingOut;
                debug!(table_id, player_id = seated.player_id, "busted player sat out");
                transition.events.push(TableEvent::PlayerSatOut {
                    player_id: seated.player_id,
                    busted: true,
                });
            }
        }

        let leaving: Vec<PlayerId> = self.pending_leave.iter().copied().collect();
        for player_id in leaving {
            self.stand_up(player_id, transition);
        }
        Ok(())
    }
}
