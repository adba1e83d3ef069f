//! table_sim: нагрузочный прогон движка – много столов параллельно,
//! простые боты, проверка сохранения фишек в конце.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use poker_table_engine::actor::{TableDeps, TableHandle, TableRegistry};
use poker_table_engine::api::commands::ActionKind;
use poker_table_engine::api::dto::TableViewDto;
use poker_table_engine::config::EngineConfig;
use poker_table_engine::domain::chips::Chips;
use poker_table_engine::domain::hand::Phase;
use poker_table_engine::domain::{PlayerId, SeatIndex};
use poker_table_engine::engine::PlayerAction;
use poker_table_engine::fairness::SeededDeckSource;
use poker_table_engine::infra::{
    action_to_api, init_logging, DeterministicRng, InMemoryChipLedger, InMemoryHandHistory,
};

#[derive(Parser, Debug)]
#[command(name = "table_sim", about = "Нагрузочный прогон столов с ботами")]
struct Args {
    /// Сколько столов запустить.
    #[arg(long, default_value_t = 16)]
    tables: usize,

    /// Игроков за столом.
    #[arg(long, default_value_t = 6)]
    players: usize,

    /// Раздач на стол.
    #[arg(long, default_value_t = 100)]
    hands: u32,

    /// Seed для детерминированного прогона (колоды и боты).
    #[arg(long)]
    seed: Option<u64>,

    /// Путь к TOML-конфигу движка.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Логи в JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct TableStats {
    hands: u64,
    showdowns: u64,
    voided: u64,
    max_pot: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if args.json {
        config.logging.json = true;
    }
    // Раздачи запускает драйвер стола.
    config.table.auto_start_next_hand = false;
    let _ = init_logging(&config.logging);

    if args.players < 2 || args.players > config.table.max_seats as usize {
        bail!("players must be in 2..={}", config.table.max_seats);
    }

    let buy_in = config.table.max_buy_in;
    let player_count = args.tables * args.players;
    let ledger = Arc::new(InMemoryChipLedger::with_balances(
        (1..=player_count as PlayerId).map(|pid| (pid, buy_in)),
    ));
    let history = Arc::new(InMemoryHandHistory::new());

    let mut registry = TableRegistry::new(config.clone());
    let mut drivers = Vec::with_capacity(args.tables);

    for t in 0..args.tables {
        let mut deps = TableDeps::new(ledger.clone(), history.clone());
        if let Some(seed) = args.seed {
            let entropy = DeterministicRng::from_seed(seed.wrapping_add(t as u64));
            deps = deps.with_deck_source(Box::new(SeededDeckSource::new(entropy)));
        }
        let handle = registry.create_table(format!("SIM TABLE {}", t + 1), None, deps);

        let first_player = (t * args.players) as PlayerId + 1;
        let players: Vec<PlayerId> = (0..args.players as PlayerId).map(|i| first_player + i).collect();
        let bot_seed = args.seed.unwrap_or_else(rand::random).wrapping_add(1_000 + t as u64);
        let hands = args.hands;

        drivers.push(tokio::spawn(async move {
            drive_table(handle, players, buy_in, hands, bot_seed).await
        }));
    }

    info!(tables = args.tables, players = args.players, hands = args.hands, "simulation started");

    let mut total = TableStats::default();
    for driver in drivers {
        match driver.await {
            Ok(Ok(stats)) => {
                total.hands += stats.hands;
                total.showdowns += stats.showdowns;
                total.voided += stats.voided;
                total.max_pot = total.max_pot.max(stats.max_pot);
            }
            Ok(Err(err)) => warn!(%err, "table driver failed"),
            Err(err) => warn!(%err, "table driver panicked"),
        }
    }

    registry.shutdown_all().await;

    // Все встали из-за стола: всё должно вернуться в кошелёк.
    let mut wallet_total = 0u64;
    for pid in 1..=player_count as PlayerId {
        wallet_total += ledger.balance(pid).await.0;
    }
    let expected = buy_in.0 * player_count as u64;

    println!("=========== TABLE SIM SUMMARY ===========");
    println!("Сыграно рук: {}", total.hands);
    println!("До шоудауна: {}", total.showdowns);
    println!("Аннулировано: {}", total.voided);
    println!("Максимальный банк: {}", total.max_pot);
    println!("Записей в архиве: {}", history.records().await.len());
    println!("Фишки: {} / {}", wallet_total, expected);
    println!("=========================================");

    if wallet_total != expected {
        bail!("chip conservation violated: {wallet_total} != {expected}");
    }
    Ok(())
}

async fn drive_table(
    handle: TableHandle,
    players: Vec<PlayerId>,
    buy_in: Chips,
    hands: u32,
    bot_seed: u64,
) -> Result<TableStats> {
    let mut rng = StdRng::seed_from_u64(bot_seed);
    let mut stats = TableStats::default();

    for (seat, &pid) in players.iter().enumerate() {
        handle.join(pid).await?;
        handle.sit_down(pid, seat as SeatIndex, buy_in).await?;
    }

    for _ in 0..hands {
        if handle.start_hand().await.is_err() {
            break;
        }

        loop {
            let view = handle.view(None).await?;
            if view.pot.0 > stats.max_pot {
                stats.max_pot = view.pot.0;
            }
            let actor = match (view.phase, view.active_player_id) {
                (phase, Some(pid)) if phase != Phase::Finished => pid,
                _ => break,
            };
            let action = pick_action(&view, actor, &mut rng);
            let (kind, amount) = action_to_api(action);
            if handle.act(actor, kind, amount).await.is_err() {
                // Бот ошибся с суммой – просто коллируем/чекаем.
                let fallback = if to_call(&view, actor).is_zero() { ActionKind::Check } else { ActionKind::Call };
                handle.act(actor, fallback, 0).await?;
            }
        }
        stats.hands += 1;
    }

    for &pid in &players {
        let _ = handle.leave(pid).await;
    }

    Ok(stats)
}

fn to_call(view: &TableViewDto, pid: PlayerId) -> Chips {
    view.players
        .iter()
        .find(|p| p.player_id == pid)
        .map(|p| view.current_bet.saturating_sub(p.current_bet))
        .unwrap_or(Chips::ZERO)
}

/// Простой бот: чаще check/call, иногда bet/raise на минимум, иногда fold.
fn pick_action(view: &TableViewDto, pid: PlayerId, rng: &mut StdRng) -> PlayerAction {
    let Some(me) = view.players.iter().find(|p| p.player_id == pid) else {
        return PlayerAction::Fold;
    };
    let owed = to_call(view, pid);
    let max_target = me.current_bet + me.chips;
    let raise_to = view.current_bet + view.min_raise;

    if owed.is_zero() {
        if rng.gen_bool(0.25) {
            if raise_to >= max_target {
                PlayerAction::AllIn
            } else if view.current_bet.is_zero() {
                PlayerAction::Bet(raise_to)
            } else {
                PlayerAction::Raise(raise_to)
            }
        } else {
            PlayerAction::Check
        }
    } else {
        let roll: f64 = rng.gen();
        if roll < 0.2 {
            PlayerAction::Fold
        } else if roll < 0.3 && raise_to < max_target {
            PlayerAction::Raise(raise_to)
        } else {
            PlayerAction::Call
        }
    }
}
