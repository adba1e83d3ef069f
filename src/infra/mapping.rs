use crate::api::commands::ActionKind;
use crate::domain::chips::Chips;
use crate::engine::actions::PlayerAction;
use crate::engine::errors::BettingError;

/// Маппинг действия между API и engine.
///
/// Сумма приходит со знаком; отрицательная для BET/RAISE – `InvalidAmount`.
pub fn action_from_api(kind: ActionKind, amount: i64) -> Result<PlayerAction, BettingError> {
    let to_chips = || Chips::from_signed(amount).ok_or(BettingError::InvalidAmount);
    Ok(match kind {
        ActionKind::Fold => PlayerAction::Fold,
        ActionKind::Check => PlayerAction::Check,
        ActionKind::Call => PlayerAction::Call,
        ActionKind::Bet => PlayerAction::Bet(to_chips()?),
        ActionKind::Raise => PlayerAction::Raise(to_chips()?),
        ActionKind::AllIn => PlayerAction::AllIn,
    })
}

pub fn action_to_api(action: PlayerAction) -> (ActionKind, i64) {
    match action {
        PlayerAction::Fold => (ActionKind::Fold, 0),
        PlayerAction::Check => (ActionKind::Check, 0),
        PlayerAction::Call => (ActionKind::Call, 0),
        PlayerAction::Bet(c) => (ActionKind::Bet, i64::try_from(c.0).unwrap_or(i64::MAX)),
        PlayerAction::Raise(c) => (ActionKind::Raise, i64::try_from(c.0).unwrap_or(i64::MAX)),
        PlayerAction::AllIn => (ActionKind::AllIn, 0),
    }
}
