//! Тесты актора стола и реестра столов.
//!
//! Проверяем:
//! - бай-ин списывается из кошелька, стек возвращается при уходе;
//! - команды применяются строго в порядке поступления;
//! - карманные карты уходят только владельцу;
//! - таймаут хода (виртуальное время tokio);
//! - заморозка стола, когда новую колоду раздать не удаётся;
//! - реестр: создание, поиск и закрытие столов.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use poker_table_engine::actor::registry::RegistryError;
use poker_table_engine::actor::{ActorError, Addressed, TableActor, TableDeps, TableHandle, TableRegistry};
use poker_table_engine::api::commands::ActionKind;
use poker_table_engine::config::EngineConfig;
use poker_table_engine::domain::chips::Chips;
use poker_table_engine::domain::hand::Phase;
use poker_table_engine::domain::table::{Table, TableConfig};
use poker_table_engine::domain::{GameId, PlayerId, TableId};
use poker_table_engine::engine::{EngineError, HandOutcome, TableEvent};
use poker_table_engine::fairness::{DeckSource, FairnessError, SeededDeckSource, ShuffledDeck};
use poker_table_engine::infra::persistence::StorageError;
use poker_table_engine::infra::rng::DeterministicRng;
use poker_table_engine::infra::{InMemoryChipLedger, InMemoryHandHistory};
use poker_table_engine::time_ctrl::TimeRules;

const WALLET: u64 = 10_000;

struct Fixture {
    handle: TableHandle,
    ledger: Arc<InMemoryChipLedger>,
    history: Arc<InMemoryHandHistory>,
}

fn deps(ledger: &Arc<InMemoryChipLedger>, history: &Arc<InMemoryHandHistory>, seed: u64) -> TableDeps {
    TableDeps::new(ledger.clone(), history.clone())
        .with_deck_source(Box::new(SeededDeckSource::new(DeterministicRng::from_seed(seed))))
}

fn spawn_table(config: &EngineConfig, seed: u64) -> Fixture {
    let ledger = Arc::new(InMemoryChipLedger::with_balances(
        (1..=6).map(|pid| (pid as PlayerId, Chips(WALLET))),
    ));
    let history = Arc::new(InMemoryHandHistory::new());
    let table = Table::new(1, "Actor table", config.table.clone());
    let (handle, _task) = TableActor::spawn(table, deps(&ledger, &history, seed), config);
    Fixture {
        handle,
        ledger,
        history,
    }
}

async fn seat_players(handle: &TableHandle, count: usize, buy_in: u64) {
    for i in 0..count {
        let pid = i as PlayerId + 1;
        handle.join(pid).await.expect("join");
        handle
            .sit_down(pid, i as u8, Chips(buy_in))
            .await
            .expect("sit down");
    }
}

fn drain(rx: &mut broadcast::Receiver<Addressed<TableEvent>>) -> Vec<Addressed<TableEvent>> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

/// Колода, которая всегда приходит испорченной.
struct AlwaysTampered {
    inner: SeededDeckSource<DeterministicRng>,
}

impl DeckSource for AlwaysTampered {
    fn next_deck(
        &mut self,
        table_id: TableId,
        game_id: GameId,
        hand_number: u64,
    ) -> Result<ShuffledDeck, FairnessError> {
        let mut deck = self.inner.next_deck(table_id, game_id, hand_number)?;
        deck.shuffled_cards.reverse();
        Ok(deck)
    }
}

#[tokio::test]
async fn buy_in_is_debited_and_stack_is_credited_back() {
    let fx = spawn_table(&EngineConfig::default(), 1);
    seat_players(&fx.handle, 2, 1_000).await;

    assert_eq!(fx.ledger.balance(1).await, Chips(WALLET - 1_000));

    let events = fx.handle.leave(1).await.expect("leave");
    assert_eq!(
        events,
        vec![TableEvent::PlayerLeft {
            player_id: 1,
            cashed_out: Chips(1_000)
        }]
    );
    assert_eq!(fx.ledger.balance(1).await, Chips(WALLET));
}

#[tokio::test]
async fn buy_in_above_wallet_is_rejected() {
    let fx = spawn_table(&EngineConfig::default(), 2);
    let mut rx = fx.handle.subscribe();

    // Кошелёк проверяется раньше границ бай-ина стола.
    let err = fx.handle.sit_down(1, 0, Chips(WALLET + 1)).await.unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_FUNDS");
    assert!(matches!(err, ActorError::Storage(StorageError::InsufficientFunds { .. })));

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| e.recipient == Some(1)
        && matches!(&e.event, TableEvent::Error { code, .. } if code == "INSUFFICIENT_FUNDS")));
    assert_eq!(fx.ledger.balance(1).await, Chips(WALLET));
}

#[tokio::test]
async fn failed_sit_down_returns_the_buy_in() {
    let fx = spawn_table(&EngineConfig::default(), 3);

    let err = fx.handle.sit_down(1, 9, Chips(1_000)).await.unwrap_err();
    assert_eq!(err, ActorError::Engine(EngineError::InvalidSeat(9)));
    assert_eq!(fx.ledger.balance(1).await, Chips(WALLET));
}

#[tokio::test]
async fn commands_are_applied_in_arrival_order() {
    let fx = spawn_table(&EngineConfig::default(), 4);
    let mut rx = fx.handle.subscribe();

    let h = &fx.handle;
    let (a, b, c, d) = tokio::join!(h.join(4), h.join(2), h.join(3), h.join(1));
    for reply in [a, b, c, d] {
        reply.expect("join");
    }

    let joined: Vec<PlayerId> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e.event {
            TableEvent::PlayerJoined { player_id } => Some(player_id),
            _ => None,
        })
        .collect();
    assert_eq!(joined, vec![4, 2, 3, 1]);
}

#[tokio::test]
async fn hole_cards_are_private() {
    let fx = spawn_table(&EngineConfig::default(), 5);
    seat_players(&fx.handle, 3, 1_000).await;
    let mut rx = fx.handle.subscribe();

    fx.handle.start_hand().await.expect("start");

    let events = drain(&mut rx);
    let dealt: Vec<&Addressed<TableEvent>> = events
        .iter()
        .filter(|e| matches!(e.event, TableEvent::CardsDealt { .. }))
        .collect();
    assert_eq!(dealt.len(), 3);
    for e in dealt {
        match &e.event {
            TableEvent::CardsDealt { player_id, cards } => {
                assert_eq!(e.recipient, Some(*player_id));
                assert!(e.is_visible_to(*player_id));
                assert!(!e.is_visible_to(*player_id % 3 + 1));
                assert_eq!(cards.len(), 2);
            }
            _ => unreachable!(),
        }
    }

    let view = fx.handle.view(Some(2)).await.expect("view");
    for p in &view.players {
        if p.player_id == 2 {
            assert_eq!(p.hole_cards.as_ref().map(|c| c.len()), Some(2));
        } else {
            assert!(p.hole_cards.is_none());
        }
    }
    let spectator = fx.handle.view(None).await.expect("view");
    assert!(spectator.players.iter().all(|p| p.hole_cards.is_none()));
}

#[tokio::test]
async fn rejected_action_reports_error_to_the_sender_only() {
    let fx = spawn_table(&EngineConfig::default(), 6);
    seat_players(&fx.handle, 2, 1_000).await;
    fx.handle.start_hand().await.expect("start");
    let mut rx = fx.handle.subscribe();

    let err = fx.handle.act(2, ActionKind::Check, 0).await.unwrap_err();
    assert_eq!(err.code(), "NOT_PLAYERS_TURN");

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].recipient, Some(2));
    assert!(matches!(&events[0].event, TableEvent::Error { code, .. } if code == "NOT_PLAYERS_TURN"));

    let state = fx.handle.snapshot().await.expect("snapshot");
    assert_eq!(state.active_player_id, Some(1));
}

#[tokio::test]
async fn finished_hand_goes_to_history_and_chips_are_conserved() {
    let fx = spawn_table(&EngineConfig::default(), 7);
    seat_players(&fx.handle, 3, 1_000).await;

    for _ in 0..5 {
        fx.handle.start_hand().await.expect("start");
        loop {
            let state = fx.handle.snapshot().await.expect("snapshot");
            let Some(pid) = state.active_player_id else { break };
            let me = state.players.iter().find(|p| p.player_id == pid).expect("active player");
            let kind = if me.current_bet < state.current_bet { ActionKind::Call } else { ActionKind::Check };
            fx.handle.act(pid, kind, 0).await.expect("action");
        }
    }

    let records = fx.history.records().await;
    assert_eq!(records.len(), 5);
    for r in &records {
        assert!(matches!(r.outcome, HandOutcome::Completed { .. }));
        assert_eq!(r.table_id, 1);
    }
    assert!(fx.history.find(records[0].game_id).await.is_some());

    for pid in 1..=3 {
        fx.handle.leave(pid).await.expect("leave");
    }
    let mut total = Chips::ZERO;
    for pid in 1..=3 {
        total += fx.ledger.balance(pid).await;
    }
    assert_eq!(total, Chips(3 * WALLET));
}

#[tokio::test(start_paused = true)]
async fn turn_timeout_applies_default_action() {
    let mut config = EngineConfig::default();
    config.time = TimeRules::new(2, 0, 0);
    let fx = spawn_table(&config, 8);
    seat_players(&fx.handle, 2, 1_000).await;

    fx.handle.start_hand().await.expect("start");
    assert_eq!(fx.handle.snapshot().await.expect("snapshot").active_player_id, Some(1));

    tokio::time::sleep(Duration::from_secs(5)).await;

    // SB не успел: fold по таймауту, раздача закончилась.
    let state = fx.handle.snapshot().await.expect("snapshot");
    assert_eq!(state.phase, Phase::Waiting);
    let p1 = state.players.iter().find(|p| p.player_id == 1).expect("p1");
    assert_eq!(p1.chips, Chips(990));
    assert_eq!(fx.history.records().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn time_bank_extends_the_turn() {
    let mut config = EngineConfig::default();
    config.time = TimeRules::new(2, 4, 2);
    let fx = spawn_table(&config, 9);
    seat_players(&fx.handle, 2, 1_000).await;
    fx.handle.start_hand().await.expect("start");

    // 2 сек базового времени + 4 сек банка: через 4 сек ход ещё идёт.
    tokio::time::sleep(Duration::from_secs(4)).await;
    let state = fx.handle.snapshot().await.expect("snapshot");
    assert_eq!(state.active_player_id, Some(1));

    tokio::time::sleep(Duration::from_secs(4)).await;
    let state = fx.handle.snapshot().await.expect("snapshot");
    assert_eq!(state.phase, Phase::Waiting);
}

#[tokio::test]
async fn table_freezes_when_no_valid_deck_can_be_dealt() {
    let config = EngineConfig::default();
    let ledger = Arc::new(InMemoryChipLedger::with_balances([(1, Chips(WALLET)), (2, Chips(WALLET))]));
    let history = Arc::new(InMemoryHandHistory::new());
    let deps = TableDeps::new(ledger.clone(), history.clone()).with_deck_source(Box::new(AlwaysTampered {
        inner: SeededDeckSource::new(DeterministicRng::from_seed(10)),
    }));
    let (handle, _task) = TableActor::spawn(Table::new(1, "Frozen", config.table.clone()), deps, &config);
    seat_players(&handle, 2, 1_000).await;
    let mut rx = handle.subscribe();

    let err = handle.start_hand().await.unwrap_err();
    assert_eq!(err.code(), "INTERNAL");

    let events = drain(&mut rx);
    let voided = events
        .iter()
        .filter(|e| matches!(e.event, TableEvent::HandVoided { .. }))
        .count();
    assert_eq!(voided as u32, config.actor.max_deal_attempts);
    assert!(events.iter().any(|e| matches!(e.event, TableEvent::TableFrozen { .. })));

    let view = handle.view(None).await.expect("view");
    assert!(view.frozen);
    assert_eq!(view.hand_number, 0);

    assert_eq!(
        handle.sit_down(3, 2, Chips(1_000)).await.unwrap_err(),
        ActorError::Engine(EngineError::TableFrozen)
    );
    assert_eq!(
        handle.leave(1).await.unwrap_err(),
        ActorError::Engine(EngineError::TableFrozen)
    );
    handle.join(5).await.expect("join is allowed on a frozen table");
}

#[tokio::test]
async fn auto_start_deals_the_next_hand() {
    let mut config = EngineConfig::default();
    config.table.auto_start_next_hand = true;
    let fx = spawn_table(&config, 11);
    seat_players(&fx.handle, 2, 1_000).await;

    fx.handle.start_hand().await.expect("start");
    let events = fx.handle.act(1, ActionKind::Fold, 0).await.expect("fold");

    assert!(events.iter().any(|e| matches!(e, TableEvent::HandComplete { .. })));
    assert!(events.iter().any(|e| matches!(e, TableEvent::HandStarted { hand_number: 2, .. })));
    let state = fx.handle.snapshot().await.expect("snapshot");
    assert_eq!(state.phase, Phase::PreFlop);
    assert_eq!(state.hand_number, 2);
}

#[tokio::test]
async fn shut_down_actor_reports_closed() {
    let fx = spawn_table(&EngineConfig::default(), 12);
    fx.handle.shutdown().await;
    fx.handle.shutdown().await;

    let err = fx.handle.join(1).await.unwrap_err();
    assert_eq!(err, ActorError::Closed(1));
    assert!(fx.handle.view(None).await.is_err());
}

#[tokio::test]
async fn registry_runs_independent_tables() {
    let ledger = Arc::new(InMemoryChipLedger::with_balances(
        (1..=4).map(|pid| (pid as PlayerId, Chips(WALLET))),
    ));
    let history = Arc::new(InMemoryHandHistory::new());
    let mut registry = TableRegistry::new(EngineConfig::default());

    let a = registry.create_table("A", None, deps(&ledger, &history, 1));
    let b = registry.create_table("B", None, deps(&ledger, &history, 2));
    assert_ne!(a.table_id(), b.table_id());
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.table_ids().len(), 2);

    a.join(1).await.expect("join a");
    a.sit_down(1, 0, Chips(1_000)).await.expect("sit a");
    b.join(2).await.expect("join b");
    b.sit_down(2, 0, Chips(1_000)).await.expect("sit b");

    let view_a = registry.table(a.table_id()).expect("a").view(None).await.expect("view");
    assert_eq!(view_a.players.len(), 1);
    assert_eq!(view_a.players[0].player_id, 1);

    let dup = Table::new(a.table_id(), "dup", TableConfig::default());
    assert!(matches!(
        registry.add_table(dup, deps(&ledger, &history, 3)),
        Err(RegistryError::DuplicateTable(_))
    ));

    let id_a = a.table_id();
    registry.close_table(id_a).await.expect("close");
    assert!(!registry.has_table(id_a));
    assert_eq!(registry.close_table(id_a).await, Err(RegistryError::TableNotFound(id_a)));
    assert!(a.join(3).await.is_err());

    registry.shutdown_all().await;
}
