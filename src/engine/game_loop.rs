use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::DealCursor;
use crate::domain::hand::{Payout, Phase, Refund};
use crate::domain::player::GamePlayer;
use crate::domain::table::Table;
use crate::domain::{GameId, PlayerId, SeatIndex, TableId};
use crate::engine::actions::{ActionSource, LoggedAction, PlayerAction};
use crate::engine::betting::BettingEngine;
use crate::engine::errors::{BettingError, EngineError};
use crate::engine::events::{ShowdownHand, TableEvent};
use crate::engine::hand_history::{HandHistory, HandOutcome, HandRecord};
use crate::engine::positions::{clockwise_after, collect_eligible_seats_from, index_of_seat, next_dealer};
use crate::engine::side_pots::pot_levels;
use crate::eval::{compare_hands, evaluate_best_hand, HandEvaluation};
use crate::fairness::{DeckSource, ShuffleVerifier, ShuffledDeck};
use crate::state::GameState;

/// Машина состояний одной раздачи:
/// WAITING → PRE_FLOP → FLOP → TURN → RIVER → SHOWDOWN → FINISHED.
///
/// Из любой улицы раздача может досрочно уйти в FINISHED (все, кроме одного,
/// сфолдили) или быть аннулирована, если колода не прошла перепроверку.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateMachine {
    pub table_id: TableId,
    pub game_id: GameId,
    pub hand_number: u64,
    pub phase: Phase,
    pub deck: ShuffledDeck,
    pub cursor: DealCursor,
    pub betting: BettingEngine,
    pub community_cards: Vec<Card>,
    pub dealer_seat: SeatIndex,
    pub small_blind_seat: SeatIndex,
    pub big_blind_seat: SeatIndex,
    /// Сумма стеков участников на старте раздачи.
    pub starting_chips: Chips,
    pub history: HandHistory,
    pub outcome: Option<HandOutcome>,
}

impl GameStateMachine {
    /// Старт новой раздачи:
    /// - берёт и проверяет колоду;
    /// - двигает кнопку, ставит блайнды;
    /// - раздаёт по две карты, начиная слева от кнопки;
    /// - ставит указатель хода.
    ///
    /// Если колода не прошла проверку, стол не меняется и возвращается ошибка
    /// честности: вызывающий может запросить новую колоду.
    pub fn start_hand(
        table: &mut Table,
        deck_source: &mut dyn DeckSource,
        game_id: GameId,
    ) -> Result<(Self, Vec<TableEvent>), EngineError> {
        if table.frozen {
            return Err(EngineError::TableFrozen);
        }

        let dealer_seat = next_dealer(table).ok_or(EngineError::NotEnoughPlayers)?;
        let order = collect_eligible_seats_from(table, dealer_seat);
        if order.len() < 2 {
            return Err(EngineError::NotEnoughPlayers);
        }

        // Хедз-ап: кнопка ставит малый блайнд.
        let (small_blind_seat, big_blind_seat) = if order.len() == 2 {
            (order[0], order[1])
        } else {
            (order[1], order[2])
        };

        let hand_number = table.hand_number + 1;
        let deck = deck_source.next_deck(table.id, game_id, hand_number)?;
        ShuffleVerifier::new().check(&deck)?;

        table.dealer_button = Some(dealer_seat);
        table.hand_number = hand_number;

        let players: Vec<GamePlayer> = order
            .iter()
            .filter_map(|&seat| table.seats.get(seat as usize).and_then(|s| s.clone()))
            .map(|mut p| {
                p.reset_for_hand();
                p
            })
            .collect();
        let starting_chips: Chips = players.iter().map(|p| p.chips).sum();

        let mut machine = Self {
            table_id: table.id,
            game_id,
            hand_number,
            phase: Phase::PreFlop,
            deck,
            cursor: DealCursor::default(),
            betting: BettingEngine::new(players, table.config.stakes.big_blind),
            community_cards: Vec::new(),
            dealer_seat,
            small_blind_seat,
            big_blind_seat,
            starting_chips,
            history: HandHistory::new(),
            outcome: None,
        };

        let mut events = vec![TableEvent::HandStarted {
            game_id,
            hand_number,
            dealer_id: machine.player_at(dealer_seat)?,
            small_blind_id: machine.player_at(small_blind_seat)?,
            big_blind_id: machine.player_at(big_blind_seat)?,
            deck_commitment: machine.deck.original.commitment.clone(),
        }];

        machine.betting.start_betting_round(Phase::PreFlop, 0);

        let stakes = table.config.stakes.clone();
        let (small_blind_id, small_blind) =
            machine.post_blind(small_blind_seat, stakes.small_blind, LoggedAction::PostSmallBlind)?;
        let (big_blind_id, big_blind) =
            machine.post_blind(big_blind_seat, stakes.big_blind, LoggedAction::PostBigBlind)?;
        events.push(TableEvent::BlindsPosted {
            small_blind_id,
            small_blind,
            big_blind_id,
            big_blind,
        });

        machine.deal_hole_cards(&order, &mut events)?;

        // Первым на префлопе ходит игрок слева от BB; в хедз-апе – кнопка (SB).
        let first = if order.len() == 2 {
            index_of_seat(&machine.betting.players, small_blind_seat)
        } else {
            clockwise_after(&machine.betting.players, big_blind_seat).first().copied()
        }
        .ok_or(EngineError::Internal("no player to act pre-flop"))?;
        machine.betting.point_to_next_from(first);

        info!(
            table_id = machine.table_id,
            game_id,
            hand_number,
            dealer_seat,
            players = machine.betting.players.len(),
            "hand started"
        );

        machine.progress(&mut events)?;
        Ok((machine, events))
    }

    /// Применить действие игрока, чей сейчас ход.
    pub fn apply_action(
        &mut self,
        player_id: PlayerId,
        action: PlayerAction,
        source: ActionSource,
    ) -> Result<Vec<TableEvent>, EngineError> {
        if !self.phase.is_betting() {
            return Err(EngineError::NoActiveHand);
        }
        let player = self
            .betting
            .player(player_id)
            .cloned()
            .ok_or(BettingError::PlayerNotFound(player_id))?;
        if self.betting.active_player_id() != Some(player_id) {
            return Err(EngineError::NotPlayersTurn(player_id));
        }

        let logged = match action {
            PlayerAction::Fold => {
                self.betting.fold(player_id)?;
                LoggedAction::Fold
            }
            PlayerAction::Check => {
                let kind = self.betting.process_bet(player_id, player.current_bet)?;
                LoggedAction::from_bet(kind, false)
            }
            PlayerAction::Call => {
                if self.betting.to_call(player_id).is_zero() {
                    return Err(BettingError::NothingToCall.into());
                }
                let target = self.betting.current_bet.min(player.current_bet + player.chips);
                let kind = self.betting.process_bet(player_id, target)?;
                LoggedAction::from_bet(kind, self.went_all_in(player_id))
            }
            PlayerAction::Bet(target) | PlayerAction::Raise(target) => {
                // Bet/Raise обязаны поднять ставку улицы; уравнять – это Call.
                if target <= self.betting.current_bet {
                    return Err(BettingError::InvalidAmount.into());
                }
                let kind = self.betting.process_bet(player_id, target)?;
                LoggedAction::from_bet(kind, self.went_all_in(player_id))
            }
            PlayerAction::AllIn => {
                let kind = self
                    .betting
                    .process_bet(player_id, player.current_bet + player.chips)?;
                LoggedAction::from_bet(kind, true)
            }
        };

        let mut events = Vec::new();
        self.record_action(player_id, logged, source, &mut events);
        self.betting.advance_action();
        self.progress(&mut events)?;
        Ok(events)
    }

    /// Действие по умолчанию (таймаут, дисконнект): check, если ставить
    /// ничего не нужно, иначе fold.
    pub fn apply_default_action(&mut self, player_id: PlayerId) -> Result<Vec<TableEvent>, EngineError> {
        let action = if self.betting.to_call(player_id).is_zero() {
            PlayerAction::Check
        } else {
            PlayerAction::Fold
        };
        debug!(player_id, ?action, "default action");
        self.apply_action(player_id, action, ActionSource::Timeout)
    }

    /// Сфолдить игрока вне очереди (ушёл из-за стола). Игрок в олл-ине или уже
    /// сфолдивший остаётся как есть.
    pub fn force_fold(&mut self, player_id: PlayerId) -> Result<Vec<TableEvent>, EngineError> {
        let mut events = Vec::new();
        if !self.phase.is_betting() {
            return Ok(events);
        }
        let can_act = self.betting.player(player_id).map(|p| p.can_act()).unwrap_or(false);
        if !can_act {
            return Ok(events);
        }

        let was_turn = self.betting.active_player_id() == Some(player_id);
        self.betting.fold(player_id)?;
        self.record_action(player_id, LoggedAction::Fold, ActionSource::LeftTable, &mut events);
        if was_turn {
            self.betting.advance_action();
        }
        self.progress(&mut events)?;
        Ok(events)
    }

    /// Чей сейчас ход (None вне торговли).
    pub fn active_player_id(&self) -> Option<PlayerId> {
        if self.phase.is_betting() {
            self.betting.active_player_id()
        } else {
            None
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn is_voided(&self) -> bool {
        matches!(self.outcome, Some(HandOutcome::Voided { .. }))
    }

    /// Снапшот состояния раздачи.
    pub fn snapshot(&self) -> GameState {
        let pot = if self.phase == Phase::Finished {
            Chips::ZERO
        } else {
            self.betting.calculate_total_pot()
        };
        let side_pots = if self.phase == Phase::Finished {
            Vec::new()
        } else {
            self.betting.calculate_side_pots()
        };

        GameState {
            table_id: self.table_id,
            game_id: Some(self.game_id),
            phase: self.phase,
            pot,
            side_pots,
            community_cards: self.community_cards.clone(),
            current_bet: self.betting.current_bet,
            min_raise: self.betting.min_raise,
            active_player_id: self.active_player_id(),
            dealer_id: self.player_at(self.dealer_seat).ok(),
            small_blind_id: self.player_at(self.small_blind_seat).ok(),
            big_blind_id: self.player_at(self.big_blind_seat).ok(),
            hand_number: self.hand_number,
            players: self.betting.players.clone(),
        }
    }

    /// Запись для архива; есть только у завершённой раздачи.
    pub fn hand_record(&self) -> Option<HandRecord> {
        let outcome = self.outcome.clone()?;
        Some(HandRecord {
            table_id: self.table_id,
            game_id: self.game_id,
            hand_number: self.hand_number,
            deck: self.deck.clone(),
            actions: self.history.actions.clone(),
            final_state: self.snapshot(),
            outcome,
        })
    }

    /// Вернуть стеки завершённой раздачи на места за столом.
    pub fn settle_into(&self, table: &mut Table) {
        for p in &self.betting.players {
            if let Some(seated) = table.find_player_mut(p.player_id) {
                seated.chips = p.chips;
                seated.reset_for_hand();
            }
        }
    }

    fn player_at(&self, seat: SeatIndex) -> Result<PlayerId, EngineError> {
        self.betting
            .players
            .iter()
            .find(|p| p.seat == seat)
            .map(|p| p.player_id)
            .ok_or(EngineError::Internal("seat is not part of the hand"))
    }

    fn went_all_in(&self, player_id: PlayerId) -> bool {
        self.betting
            .player(player_id)
            .map(|p| p.chips.is_zero())
            .unwrap_or(false)
    }

    fn record_action(
        &mut self,
        player_id: PlayerId,
        action: LoggedAction,
        source: ActionSource,
        events: &mut Vec<TableEvent>,
    ) {
        let (street_bet, resulting_chips) = self.log_action(player_id, action, source);
        events.push(TableEvent::PlayerActionApplied {
            player_id,
            action,
            amount: street_bet,
            resulting_chips,
        });
    }

    /// Записать действие в лог раздачи. Возвращает ставку улицы и стек после действия.
    fn log_action(&mut self, player_id: PlayerId, action: LoggedAction, source: ActionSource) -> (Chips, Chips) {
        let (street_bet, resulting_chips) = self
            .betting
            .player(player_id)
            .map(|p| (p.current_bet, p.chips))
            .unwrap_or_default();
        self.history
            .push(self.phase, player_id, action, street_bet, resulting_chips, source);
        (street_bet, resulting_chips)
    }

    fn post_blind(&mut self, seat: SeatIndex, amount: Chips, action: LoggedAction) -> Result<(PlayerId, Chips), EngineError> {
        let player_id = self.player_at(seat)?;
        let posted = self.betting.post_blind(player_id, amount)?;
        self.log_action(player_id, action, ActionSource::Blind);
        Ok((player_id, posted))
    }

    fn deal_hole_cards(&mut self, order: &[SeatIndex], events: &mut Vec<TableEvent>) -> Result<(), EngineError> {
        // Слева от кнопки по кругу, кнопка последней.
        let mut deal_order: Vec<SeatIndex> = order.iter().skip(1).copied().collect();
        deal_order.push(order[0]);

        for _round in 0..2 {
            for &seat in &deal_order {
                let card = self
                    .cursor
                    .draw_n(&self.deck.shuffled_cards, 1)
                    .ok_or(EngineError::Internal("deck exhausted while dealing"))?;
                let idx = index_of_seat(&self.betting.players, seat)
                    .ok_or(EngineError::Internal("seat is not part of the hand"))?;
                self.betting.players[idx].hole_cards.extend(card);
            }
        }

        for p in &self.betting.players {
            events.push(TableEvent::CardsDealt {
                player_id: p.player_id,
                cards: p.hole_cards.clone(),
            });
        }
        Ok(())
    }

    /// Довести раздачу до следующей точки, где нужно решение игрока:
    /// закрыть улицы, открыть карты, доиграть олл-ин до шоудауна.
    fn progress(&mut self, events: &mut Vec<TableEvent>) -> Result<(), EngineError> {
        loop {
            self.check_invariants()?;

            if self.betting.in_hand_count() <= 1 {
                self.award(false, events)?;
                break;
            }

            if !self.betting.is_betting_round_complete() {
                if self.betting.action_index.is_none() {
                    self.betting.advance_action();
                }
                break;
            }

            let next_phase = self.phase.next();
            events.push(TableEvent::BettingRoundComplete {
                pot: self.betting.calculate_total_pot(),
                next_phase,
            });

            if next_phase == Phase::Showdown {
                self.phase = Phase::Showdown;
                self.check_invariants()?;
                self.award(true, events)?;
                break;
            }

            if !self.reveal(next_phase, events)? {
                break;
            }

            let first = clockwise_after(&self.betting.players, self.dealer_seat)
                .first()
                .copied()
                .ok_or(EngineError::Internal("empty hand"))?;
            self.betting.start_betting_round(next_phase, first);
        }

        self.check_invariants()
    }

    /// Перепроверить колоду и открыть карты улицы. false – раздача аннулирована.
    fn reveal(&mut self, phase: Phase, events: &mut Vec<TableEvent>) -> Result<bool, EngineError> {
        if let Err(err) = ShuffleVerifier::new().check(&self.deck) {
            self.void(err.to_string(), events);
            return Ok(false);
        }

        let cards = self
            .cursor
            .draw_n(&self.deck.shuffled_cards, phase.cards_revealed_on_entry())
            .ok_or(EngineError::Internal("deck exhausted while revealing"))?;
        self.community_cards.extend(cards.iter().copied());
        self.phase = phase;

        debug!(game_id = self.game_id, %phase, board = ?self.community_cards, "community cards");
        events.push(TableEvent::CommunityCards { phase, cards });
        Ok(true)
    }

    /// Разыграть банки. Без шоудауна на каждый уровень претендует один игрок.
    ///
    /// Уровень без претендентов (вложились только сфолдившие) возвращается
    /// внёсшим его игрокам. Нечётная фишка при делёжке уходит первому
    /// победителю по часовой стрелке от кнопки.
    fn award(&mut self, went_to_showdown: bool, events: &mut Vec<TableEvent>) -> Result<(), EngineError> {
        let mut evaluations: BTreeMap<PlayerId, HandEvaluation> = BTreeMap::new();
        let mut showdown = Vec::new();
        if went_to_showdown {
            for p in self.betting.players.iter().filter(|p| p.is_in_hand()) {
                let eval = evaluate_best_hand(&p.hole_cards, &self.community_cards)
                    .map_err(|e| EngineError::InvariantViolation(format!("showdown evaluation: {e}")))?;
                showdown.push(ShowdownHand {
                    player_id: p.player_id,
                    hole_cards: p.hole_cards.clone(),
                    best_five: eval.best_five.clone(),
                    ranking: eval.ranking,
                    description: eval.describe(),
                });
                evaluations.insert(p.player_id, eval);
            }
        }

        let seat_order: Vec<PlayerId> = clockwise_after(&self.betting.players, self.dealer_seat)
            .into_iter()
            .map(|i| self.betting.players[i].player_id)
            .collect();

        let mut won: BTreeMap<PlayerId, Chips> = BTreeMap::new();
        let mut winners: Vec<PlayerId> = Vec::new();

        for level in pot_levels(&self.betting.players) {
            let eligible = &level.pot.eligible_player_ids;
            if eligible.is_empty() {
                for id in &level.contributors {
                    *won.entry(*id).or_default() += level.per_contributor;
                }
                continue;
            }

            let mut pot_winners: Vec<PlayerId> = Vec::new();
            let mut best: Option<&HandEvaluation> = None;
            for id in seat_order.iter().filter(|id| eligible.contains(id)) {
                if eligible.len() == 1 {
                    pot_winners.push(*id);
                    break;
                }
                let eval = evaluations
                    .get(id)
                    .ok_or_else(|| EngineError::InvariantViolation(format!("no evaluation for player {id}")))?;
                match best.map(|b| compare_hands(eval, b)) {
                    None | Some(std::cmp::Ordering::Greater) => {
                        best = Some(eval);
                        pot_winners.clear();
                        pot_winners.push(*id);
                    }
                    Some(std::cmp::Ordering::Equal) => pot_winners.push(*id),
                    Some(std::cmp::Ordering::Less) => {}
                }
            }

            let count = pot_winners.len() as u64;
            if count == 0 {
                return Err(EngineError::InvariantViolation("pot without winner".into()));
            }
            let share = level.pot.amount.0 / count;
            let remainder = level.pot.amount.0 % count;
            for (i, id) in pot_winners.iter().enumerate() {
                let extra = if i == 0 { remainder } else { 0 };
                *won.entry(*id).or_default() += Chips(share + extra);
                if !winners.contains(id) {
                    winners.push(*id);
                }
            }
        }

        for p in self.betting.players.iter_mut() {
            if let Some(amount) = won.get(&p.player_id) {
                p.chips += *amount;
            }
        }

        let payouts: Vec<Payout> = won
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(player_id, amount)| Payout { player_id, amount })
            .collect();

        self.phase = Phase::Finished;
        self.betting.action_index = None;
        self.outcome = Some(HandOutcome::Completed {
            winners: winners.clone(),
            payouts: payouts.clone(),
            went_to_showdown,
        });

        info!(
            table_id = self.table_id,
            game_id = self.game_id,
            ?winners,
            showdown = went_to_showdown,
            "hand complete"
        );
        events.push(TableEvent::HandComplete {
            winners,
            payouts,
            showdown,
        });
        Ok(())
    }

    /// Аннулировать раздачу: вернуть каждому его вклад.
    fn void(&mut self, reason: String, events: &mut Vec<TableEvent>) {
        let mut refunds = Vec::new();
        for p in self.betting.players.iter_mut() {
            if !p.total_bet.is_zero() {
                p.chips += p.total_bet;
                refunds.push(Refund {
                    player_id: p.player_id,
                    amount: p.total_bet,
                });
            }
        }

        error!(
            table_id = self.table_id,
            game_id = self.game_id,
            %reason,
            "hand voided, bets refunded"
        );

        self.phase = Phase::Finished;
        self.betting.action_index = None;
        self.outcome = Some(HandOutcome::Voided {
            reason: reason.clone(),
            refunds: refunds.clone(),
        });
        events.push(TableEvent::HandVoided { reason, refunds });
    }

    /// Фишки не создаются и не исчезают; на столе столько общих карт,
    /// сколько положено фазе.
    fn check_invariants(&self) -> Result<(), EngineError> {
        let stacks: Chips = self.betting.players.iter().map(|p| p.chips).sum();
        let in_pot = if self.phase == Phase::Finished {
            Chips::ZERO
        } else {
            self.betting.calculate_total_pot()
        };
        if stacks + in_pot != self.starting_chips {
            warn!(
                game_id = self.game_id,
                stacks = stacks.0,
                pot = in_pot.0,
                expected = self.starting_chips.0,
                "chip conservation violated"
            );
            return Err(EngineError::InvariantViolation(format!(
                "chips {} + pot {} != {}",
                stacks, in_pot, self.starting_chips
            )));
        }

        if self.phase != Phase::Finished {
            let pots: Chips = self.betting.calculate_side_pots().iter().map(|p| p.amount).sum();
            if pots != in_pot {
                return Err(EngineError::InvariantViolation(format!(
                    "side pots {} != pot {}",
                    pots, in_pot
                )));
            }
            if self.community_cards.len() != self.phase.community_card_count() {
                return Err(EngineError::InvariantViolation(format!(
                    "{} community cards in {}",
                    self.community_cards.len(),
                    self.phase
                )));
            }
        }

        Ok(())
    }
}
