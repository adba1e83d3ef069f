use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::player::GamePlayer;
use crate::domain::PlayerId;

/// Банк (основной или сайд-пот) и игроки, которые могут его выиграть.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    pub eligible_player_ids: BTreeSet<PlayerId>,
}

/// Уровень банка вместе с теми, кто его оплатил.
///
/// Нужен при распределении: если на уровне не осталось претендентов,
/// фишки уровня возвращаются тем, кто их внёс.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PotLevel {
    /// Порог вклада (total_bet), начиная с которого игрок участвует в уровне.
    pub level: Chips,
    /// Сколько внёс в уровень каждый участник.
    pub per_contributor: Chips,
    pub contributors: Vec<PlayerId>,
    pub pot: SidePot,
}

/// Разложить вклады игроков по уровням.
///
/// Уровни – различные ненулевые значения total_bet по возрастанию. Фишки
/// сфолдивших игроков входят в суммы, но сами они банк не выигрывают.
pub fn pot_levels(players: &[GamePlayer]) -> Vec<PotLevel> {
    let mut thresholds: Vec<Chips> = players
        .iter()
        .map(|p| p.total_bet)
        .filter(|c| !c.is_zero())
        .collect();
    thresholds.sort();
    thresholds.dedup();

    let mut levels = Vec::with_capacity(thresholds.len());
    let mut prev_level = Chips::ZERO;

    for level in thresholds {
        let level_diff = level - prev_level;

        let contributors: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.total_bet >= level)
            .map(|p| p.player_id)
            .collect();
        let eligible_player_ids: BTreeSet<PlayerId> = players
            .iter()
            .filter(|p| p.total_bet >= level && p.is_in_hand())
            .map(|p| p.player_id)
            .collect();

        let amount = Chips(level_diff.0 * contributors.len() as u64);
        levels.push(PotLevel {
            level,
            per_contributor: level_diff,
            contributors,
            pot: SidePot {
                amount,
                eligible_player_ids,
            },
        });

        prev_level = level;
    }

    levels
}

/// Основной банк и сайд-поты в порядке "от младших" к "старшим".
/// Первый элемент – основной банк.
pub fn calculate_side_pots(players: &[GamePlayer]) -> Vec<SidePot> {
    pot_levels(players).into_iter().map(|l| l.pot).collect()
}

/// Весь банк раздачи: сумма total_bet всех игроков, включая сфолдивших.
pub fn calculate_total_pot(players: &[GamePlayer]) -> Chips {
    players.iter().map(|p| p.total_bet).sum()
}
