use crate::domain::chips::Chips;
use crate::domain::player::{GamePlayer, PlayerStatus};
use crate::engine::actions::BetKind;
use crate::engine::errors::BettingError;

/// Срез состояния улицы, нужный для проверки одной ставки.
#[derive(Clone, Copy, Debug)]
pub struct StreetView {
    pub current_bet: Chips,
    pub min_raise: Chips,
    /// Игроку закрыт рейз неполным олл-ином после его хода.
    pub raise_closed: bool,
}

/// Проверка ставки "до `target`" без изменения состояния.
///
/// Возвращает классификацию ставки, которую затем применяет `BettingEngine`.
pub fn validate_bet(
    player: &GamePlayer,
    target: Chips,
    street: &StreetView,
) -> Result<BetKind, BettingError> {
    match player.status {
        PlayerStatus::Folded => return Err(BettingError::AlreadyFolded(player.player_id)),
        PlayerStatus::AllIn | PlayerStatus::SittingOut => {
            return Err(BettingError::PlayerNotActive(player.player_id))
        }
        PlayerStatus::Active => {}
    }

    // Ставка на улице не уменьшается.
    let delta = target
        .checked_sub(player.current_bet)
        .ok_or(BettingError::InvalidAmount)?;

    if delta > player.chips {
        return Err(BettingError::InsufficientChips);
    }
    let all_in = !delta.is_zero() && delta == player.chips;

    if delta.is_zero() {
        return if street.current_bet > player.current_bet {
            Err(BettingError::CannotCheck)
        } else {
            Ok(BetKind::Check)
        };
    }

    if target < street.current_bet {
        return if all_in {
            Ok(BetKind::ShortCall)
        } else {
            Err(BettingError::IncompleteCall)
        };
    }

    if target == street.current_bet {
        return Ok(BetKind::Call);
    }

    // target > current_bet: bet или рейз.
    if street.raise_closed {
        return Err(BettingError::RaiseNotReopened);
    }

    let increment = target - street.current_bet;
    if increment < street.min_raise {
        return if all_in {
            Ok(BetKind::IncompleteRaise)
        } else {
            Err(BettingError::MinimumRaiseNotMet {
                increment: increment.0,
                min_raise: street.min_raise.0,
            })
        };
    }

    if street.current_bet.is_zero() {
        Ok(BetKind::Bet)
    } else {
        Ok(BetKind::Raise)
    }
}

/// Сколько фишек нужно добавить игроку, чтобы уравнять текущую ставку.
pub fn diff_to_call(player: &GamePlayer, current_bet: Chips) -> Chips {
    current_bet.saturating_sub(player.current_bet)
}
