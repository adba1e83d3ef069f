use crate::domain::player::GamePlayer;
use crate::domain::{SeatIndex, Table};

/// Найти следующее место, которое может получить карты (по кругу, исключая start).
pub fn next_eligible_seat(table: &Table, start: SeatIndex) -> Option<SeatIndex> {
    let max = table.seats.len();
    if max == 0 {
        return None;
    }

    let mut idx = (start as usize + 1) % max;
    for _ in 0..max {
        if table.is_seat_eligible(idx as SeatIndex) {
            return Some(idx as SeatIndex);
        }
        idx = (idx + 1) % max;
    }

    None
}

/// Все места, которые получат карты, по кругу начиная с `start` (включительно).
pub fn collect_eligible_seats_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.seats.len();
    let mut seats = Vec::new();
    if max == 0 {
        return seats;
    }

    let mut idx = start as usize % max;
    for _ in 0..max {
        if table.is_seat_eligible(idx as SeatIndex) {
            seats.push(idx as SeatIndex);
        }
        idx = (idx + 1) % max;
    }

    seats
}

/// Следующая позиция дилера:
/// - если кнопка уже была – следующее место, получающее карты;
/// - если нет – первое такое место с нуля.
pub fn next_dealer(table: &Table) -> Option<SeatIndex> {
    match table.dealer_button {
        Some(button) => next_eligible_seat(table, button),
        None => collect_eligible_seats_from(table, 0).first().copied(),
    }
}

/// Индексы участников раздачи по часовой стрелке, начиная с первого места
/// строго после `seat`. Игроки в векторе отсортированы по месту.
pub fn clockwise_after(players: &[GamePlayer], seat: SeatIndex) -> Vec<usize> {
    let start = players
        .iter()
        .position(|p| p.seat > seat)
        .unwrap_or(0);
    (0..players.len())
        .map(|i| (start + i) % players.len())
        .collect()
}

/// Индекс участника, сидящего на `seat`.
pub fn index_of_seat(players: &[GamePlayer], seat: SeatIndex) -> Option<usize> {
    players.iter().position(|p| p.seat == seat)
}
