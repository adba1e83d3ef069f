//! Покерный движок: ставки, переход улиц, сайд-поты, шоудаун.
//!
//! Высокоуровневый объект: `GameStateMachine` (одна раздача).
//! Основные операции:
//!   - `GameStateMachine::start_hand` – запустить новую раздачу
//!   - `GameStateMachine::apply_action` – применить действие игрока
//!   - `BettingEngine::process_bet` – проверить и принять ставку

pub mod actions;
pub mod betting;
pub mod errors;
pub mod events;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod side_pots;
pub mod validation;

pub use actions::{ActionSource, BetKind, LoggedAction, PlayerAction};
pub use betting::{is_betting_round_complete, BettingEngine};
pub use errors::{BettingError, EngineError, ErrorKind};
pub use events::{ShowdownHand, TableEvent};
pub use game_loop::GameStateMachine;
pub use hand_history::{ActionRecord, HandHistory, HandOutcome, HandRecord};
pub use side_pots::{calculate_side_pots, calculate_total_pot, SidePot};
