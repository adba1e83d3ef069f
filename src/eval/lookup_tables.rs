use crate::domain::card::Rank;

/// Битовая маска рангов: бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Пять подряд идущих бит.
const RUN_OF_FIVE: RankMask = 0b1_1111;

/// Маска колеса A-2-3-4-5.
pub const WHEEL_MASK: RankMask = 0b1_0000_0000_1111;

/// Бит для одного ранга.
pub fn rank_to_bit(rank: Rank) -> RankMask {
    1 << (rank.value() - 2)
}

/// Маска для набора рангов.
pub fn mask_of(ranks: impl IntoIterator<Item = Rank>) -> RankMask {
    ranks.into_iter().fold(0, |acc, r| acc | rank_to_bit(r))
}

/// Старшая карта стрита в маске, если он есть.
///
/// Идём от бродвея вниз; колесо проверяется последним и даёт `Rank::Five`.
pub fn detect_straight(mask: RankMask) -> Option<Rank> {
    // low = индекс младшего бита пятёрки: 8 (T..A) ... 0 (2..6)
    for low in (0..=8u8).rev() {
        let run = RUN_OF_FIVE << low;
        if mask & run == run {
            return Rank::from_value(low + 6);
        }
    }
    if mask & WHEEL_MASK == WHEEL_MASK {
        return Some(Rank::Five);
    }
    None
}

/// Ранги стрита от старшего к младшему (для колеса туз идёт последним).
pub fn straight_ranks(high: Rank) -> Vec<Rank> {
    if high == Rank::Five {
        return vec![Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace];
    }
    (0..5u8)
        .filter_map(|i| Rank::from_value(high.value() - i))
        .collect()
}
