use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn, Instrument};

use crate::api::commands::TableCommand;
use crate::api::errors::ApiError;
use crate::api::queries::build_table_view;
use crate::config::{ActorConfig, EngineConfig};
use crate::domain::table::Table;
use crate::domain::{PlayerId, TableId};
use crate::engine::errors::{EngineError, ErrorKind};
use crate::engine::events::TableEvent;
use crate::infra::ids::IdGenerator;
use crate::state::{HandContext, TableState, Transition};
use crate::time_ctrl::{AutoActionDecision, TimeController};

use super::handle::TableHandle;
use super::messages::TableMessage;
use super::{ActorError, Addressed, TableDeps};

/// Актор одного стола.
pub struct TableActor {
    table_id: TableId,
    state: TableState,
    config: ActorConfig,
    auto_start_next_hand: bool,
    inbox: mpsc::Receiver<TableMessage>,
    events: broadcast::Sender<Addressed<TableEvent>>,
    time: TimeController,
    deps: TableDeps,
    ids: IdGenerator,
}

impl TableActor {
    /// Создать актор и ручку к нему (без запуска).
    pub fn new(table: Table, deps: TableDeps, config: &EngineConfig) -> (Self, TableHandle) {
        let table_id = table.id;
        let (sender, inbox) = mpsc::channel(config.actor.mailbox_capacity);
        let (events, _) = broadcast::channel(config.actor.event_capacity);

        let actor = Self {
            table_id,
            auto_start_next_hand: table.config.auto_start_next_hand,
            state: TableState::new(table),
            config: config.actor.clone(),
            inbox,
            events: events.clone(),
            time: TimeController::new(config.time.clone()),
            deps,
            ids: IdGenerator::for_table(table_id),
        };
        let handle = TableHandle::new(table_id, sender, events);
        (actor, handle)
    }

    /// Запустить актор отдельной задачей tokio.
    pub fn spawn(table: Table, deps: TableDeps, config: &EngineConfig) -> (TableHandle, JoinHandle<()>) {
        let (actor, handle) = Self::new(table, deps, config);
        let span = tracing::info_span!("table", table_id = actor.table_id);
        let task = tokio::spawn(actor.run().instrument(span));
        (handle, task)
    }

    /// Цикл актора: почтовый ящик + тик таймера хода.
    pub async fn run(mut self) {
        info!(table_id = self.table_id, name = %self.state.table.name, "table actor started");

        let mut tick = interval(Duration::from_millis(self.config.tick_millis));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(TableMessage::Shutdown { reply }) => {
                        let _ = reply.send(());
                        break;
                    }
                    Some(message) => self.handle_message(message).await,
                    None => break,
                },
                now = tick.tick() => {
                    let elapsed = now.saturating_duration_since(last_tick);
                    last_tick = now;
                    self.on_tick(elapsed).await;
                }
            }
        }

        info!(table_id = self.table_id, "table actor stopped");
    }

    async fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::Command { command, reply } => {
                let result = self.handle_command(command).await;
                let _ = reply.send(result);
            }
            TableMessage::View { viewer, reply } => {
                let _ = reply.send(build_table_view(&self.state, viewer));
            }
            TableMessage::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot());
            }
            TableMessage::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    async fn handle_command(&mut self, command: TableCommand) -> Result<Vec<TableEvent>, ActorError> {
        let requester = command.player_id();

        // Бай-ин списывается до посадки; если посадка не удалась – возвращается.
        if let TableCommand::SitDown { player_id, buy_in, .. } = command {
            if self.state.is_frozen() {
                return Err(self.reject(EngineError::TableFrozen, requester));
            }
            if let Err(err) = self.deps.ledger.debit_buy_in(player_id, buy_in).await {
                warn!(table_id = self.table_id, player_id, %err, "buy-in rejected");
                self.publish_error(requester, err.to_string(), "INSUFFICIENT_FUNDS");
                return Err(err.into());
            }
            let result = self.execute(command).await;
            if result.is_err() {
                if let Err(err) = self.deps.ledger.credit_cash_out(player_id, buy_in).await {
                    error!(table_id = self.table_id, player_id, %err, "buy-in refund failed");
                }
            }
            return result;
        }

        if matches!(command, TableCommand::StartHand) {
            return self.start_hand_with_redeal().await;
        }

        self.execute(command).await
    }

    /// Применить команду к состоянию и выполнить ввод-вывод перехода.
    async fn execute(&mut self, command: TableCommand) -> Result<Vec<TableEvent>, ActorError> {
        let requester = command.player_id();
        let result = {
            let mut ctx = HandContext {
                deck_source: self.deps.deck_source.as_mut(),
                ids: &self.ids,
            };
            self.state.apply(&command, &mut ctx)
        };

        let (next, transition) = match result {
            Ok(ok) => ok,
            Err(err) => return Err(self.reject(err, requester)),
        };

        self.state = next;
        if let (TableCommand::PlayerAction { player_id, .. }, false) = (&command, transition.events.is_empty()) {
            self.time.on_manual_action(*player_id);
        }

        let voided = transition.hand_voided();
        let finished = transition.finished_hand.is_some();
        let mut events = self.commit(transition).await;

        if voided {
            match self.start_hand_with_redeal().await {
                Ok(more) => events.extend(more),
                Err(err) => warn!(table_id = self.table_id, %err, "no fresh hand after void"),
            }
        } else if finished && self.auto_start_next_hand {
            match self.start_hand_with_redeal().await {
                Ok(more) => events.extend(more),
                Err(err) => debug!(table_id = self.table_id, %err, "next hand not started"),
            }
        }

        Ok(events)
    }

    /// Начать раздачу; если колода не прошла проверку или раздача
    /// аннулирована, попробовать с новой колодой (не более `max_deal_attempts` раз).
    async fn start_hand_with_redeal(&mut self) -> Result<Vec<TableEvent>, ActorError> {
        let mut events = Vec::new();

        for attempt in 1..=self.config.max_deal_attempts {
            let result = {
                let mut ctx = HandContext {
                    deck_source: self.deps.deck_source.as_mut(),
                    ids: &self.ids,
                };
                self.state.apply(&TableCommand::StartHand, &mut ctx)
            };

            match result {
                Ok((next, transition)) => {
                    self.state = next;
                    let voided = transition.hand_voided();
                    events.extend(self.commit(transition).await);
                    if !voided {
                        return Ok(events);
                    }
                    warn!(table_id = self.table_id, attempt, "hand voided, dealing a fresh deck");
                }
                Err(EngineError::Fairness(err)) => {
                    error!(table_id = self.table_id, attempt, %err, "deck rejected before dealing");
                    let event = TableEvent::HandVoided {
                        reason: err.to_string(),
                        refunds: Vec::new(),
                    };
                    self.publish(Addressed::broadcast(event.clone()));
                    events.push(event);
                }
                Err(err) => return Err(self.reject(err, None)),
            }
        }

        Err(self.reject(EngineError::Internal("deal attempts exhausted"), None))
    }

    /// Разослать события, зачислить стеки ушедших, сохранить раздачу.
    async fn commit(&mut self, transition: Transition) -> Vec<TableEvent> {
        let Transition {
            events,
            cash_outs,
            finished_hand,
        } = transition;

        for event in &events {
            let addressed = match event.private_recipient() {
                Some(player_id) => Addressed::to(player_id, event.clone()),
                None => Addressed::broadcast(event.clone()),
            };
            self.publish(addressed);
        }

        for (player_id, amount) in cash_outs {
            self.time.bank.forget(player_id);
            if let Err(err) = self.deps.ledger.credit_cash_out(player_id, amount).await {
                error!(table_id = self.table_id, player_id, amount = amount.0, %err, "cash-out failed");
            }
        }

        if let Some(record) = finished_hand {
            let game_id = record.game_id;
            if let Err(err) = self.deps.history.append(record).await {
                error!(table_id = self.table_id, game_id, %err, "hand record not stored");
            }
        }

        self.time.sync_turn(self.state.active_player_id());
        events
    }

    /// Отказ: состояние не изменилось. Нарушение инварианта замораживает стол.
    fn reject(&mut self, err: EngineError, requester: Option<PlayerId>) -> ActorError {
        match err.kind() {
            ErrorKind::Invariant => {
                error!(table_id = self.table_id, %err, "invariant violated, freezing table");
                self.state.freeze();
                self.time.sync_turn(None);
                self.publish(Addressed::broadcast(TableEvent::TableFrozen {
                    reason: err.to_string(),
                }));
            }
            ErrorKind::Fairness => {
                error!(table_id = self.table_id, %err, "fairness check failed");
            }
            ErrorKind::Validation => {
                debug!(table_id = self.table_id, player_id = ?requester, code = err.code(), "command rejected");
            }
        }

        let api = ApiError::from(&err);
        self.publish_error(requester, api.message, api.code);
        err.into()
    }

    fn publish_error(&self, requester: Option<PlayerId>, message: String, code: impl Into<String>) {
        if let Some(player_id) = requester {
            let event = ApiError::new(code, message).into_event();
            self.publish(Addressed::to(player_id, event));
        }
    }

    fn publish(&self, event: Addressed<TableEvent>) {
        // Нет подписчиков – не ошибка.
        let _ = self.events.send(event);
    }

    async fn on_tick(&mut self, elapsed: Duration) {
        if self.state.is_frozen() {
            return;
        }
        self.time.sync_turn(self.state.active_player_id());
        if let AutoActionDecision::TimeoutCheckOrFold(player_id) = self.time.on_time_passed(elapsed) {
            info!(table_id = self.table_id, player_id, "turn timed out");
            if let Err(err) = self.execute(TableCommand::Timeout { player_id }).await {
                warn!(table_id = self.table_id, player_id, %err, "timeout action failed");
            }
        }
    }
}
