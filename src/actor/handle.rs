use tokio::sync::{broadcast, mpsc, oneshot};

use crate::api::commands::{ActionKind, TableCommand};
use crate::api::dto::TableViewDto;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::events::TableEvent;
use crate::state::GameState;

use super::messages::{CommandReply, TableMessage};
use super::{ActorError, Addressed};

/// Ручка для общения с актором стола. Дёшево клонируется.
#[derive(Clone, Debug)]
pub struct TableHandle {
    table_id: TableId,
    sender: mpsc::Sender<TableMessage>,
    events: broadcast::Sender<Addressed<TableEvent>>,
}

impl TableHandle {
    pub(crate) fn new(
        table_id: TableId,
        sender: mpsc::Sender<TableMessage>,
        events: broadcast::Sender<Addressed<TableEvent>>,
    ) -> Self {
        Self {
            table_id,
            sender,
            events,
        }
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Подписаться на события стола.
    pub fn subscribe(&self) -> broadcast::Receiver<Addressed<TableEvent>> {
        self.events.subscribe()
    }

    /// Отправить команду и дождаться результата.
    pub async fn send(&self, command: TableCommand) -> CommandReply {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::Command { command, reply })
            .await
            .map_err(|_| ActorError::Closed(self.table_id))?;
        rx.await.map_err(|_| ActorError::Closed(self.table_id))?
    }

    pub async fn join(&self, player_id: PlayerId) -> CommandReply {
        self.send(TableCommand::JoinTable { player_id }).await
    }

    pub async fn sit_down(&self, player_id: PlayerId, seat: SeatIndex, buy_in: Chips) -> CommandReply {
        self.send(TableCommand::SitDown {
            player_id,
            seat,
            buy_in,
        })
        .await
    }

    pub async fn act(&self, player_id: PlayerId, action: ActionKind, amount: i64) -> CommandReply {
        self.send(TableCommand::PlayerAction {
            player_id,
            action,
            amount,
        })
        .await
    }

    pub async fn leave(&self, player_id: PlayerId) -> CommandReply {
        self.send(TableCommand::LeaveTable { player_id }).await
    }

    pub async fn sit_out(&self, player_id: PlayerId) -> CommandReply {
        self.send(TableCommand::SitOut { player_id }).await
    }

    pub async fn sit_in(&self, player_id: PlayerId) -> CommandReply {
        self.send(TableCommand::SitIn { player_id }).await
    }

    pub async fn start_hand(&self) -> CommandReply {
        self.send(TableCommand::StartHand).await
    }

    pub async fn timeout(&self, player_id: PlayerId) -> CommandReply {
        self.send(TableCommand::Timeout { player_id }).await
    }

    pub async fn disconnect(&self, player_id: PlayerId) -> CommandReply {
        self.send(TableCommand::Disconnect { player_id }).await
    }

    pub async fn view(&self, viewer: Option<PlayerId>) -> Result<TableViewDto, ActorError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::View { viewer, reply })
            .await
            .map_err(|_| ActorError::Closed(self.table_id))?;
        rx.await.map_err(|_| ActorError::Closed(self.table_id))
    }

    pub async fn snapshot(&self) -> Result<GameState, ActorError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::Snapshot { reply })
            .await
            .map_err(|_| ActorError::Closed(self.table_id))?;
        rx.await.map_err(|_| ActorError::Closed(self.table_id))
    }

    /// Остановить актор. Повторный вызов безопасен.
    pub async fn shutdown(&self) {
        let (reply, rx) = oneshot::channel();
        if self.sender.send(TableMessage::Shutdown { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }
}
