use tokio::sync::oneshot;

use crate::api::commands::TableCommand;
use crate::api::dto::TableViewDto;
use crate::domain::PlayerId;
use crate::engine::events::TableEvent;
use crate::state::GameState;

use super::ActorError;

/// Ответ на команду: события, порождённые ею, или причина отказа.
pub type CommandReply = Result<Vec<TableEvent>, ActorError>;

/// Сообщение в почтовый ящик актора стола.
#[derive(Debug)]
pub enum TableMessage {
    Command {
        command: TableCommand,
        reply: oneshot::Sender<CommandReply>,
    },
    /// Представление стола для зрителя.
    View {
        viewer: Option<PlayerId>,
        reply: oneshot::Sender<TableViewDto>,
    },
    /// Полный снапшот (для сервисных нужд и тестов).
    Snapshot { reply: oneshot::Sender<GameState> },
    Shutdown { reply: oneshot::Sender<()> },
}
