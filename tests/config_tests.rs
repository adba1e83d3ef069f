//! Тесты загрузки конфигурации из TOML.

use poker_table_engine::config::{ConfigError, EngineConfig};
use poker_table_engine::domain::chips::Chips;

#[test]
fn empty_toml_gives_defaults() {
    let config = EngineConfig::from_toml_str("").expect("defaults are valid");
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.table.max_seats, 6);
    assert_eq!(config.time.base_action_secs, 20);
    assert_eq!(config.actor.max_deal_attempts, 3);
}

#[test]
fn partial_toml_overrides_only_given_fields() {
    let raw = r#"
        [table]
        max_seats = 9
        min_buy_in = 1000
        max_buy_in = 10000
        auto_start_next_hand = true

        [table.stakes]
        small_blind = 50
        big_blind = 100

        [time]
        base_action_secs = 15

        [actor]
        tick_millis = 100

        [logging]
        json = true
    "#;

    let config = EngineConfig::from_toml_str(raw).expect("valid config");
    assert_eq!(config.table.max_seats, 9);
    assert_eq!(config.table.stakes.big_blind, Chips(100));
    assert!(config.table.auto_start_next_hand);
    assert_eq!(config.time.base_action_secs, 15);
    assert_eq!(config.time.bank_per_player_secs, 60);
    assert_eq!(config.actor.tick_millis, 100);
    assert_eq!(config.actor.mailbox_capacity, 256);
    assert!(config.logging.json);
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        "[table]\nmax_seats = 1",
        "[table]\nmax_seats = 11",
        "[table.stakes]\nsmall_blind = 30\nbig_blind = 20",
        "[table.stakes]\nsmall_blind = 0\nbig_blind = 20",
        "[table]\nmin_buy_in = 5000\nmax_buy_in = 4000",
        "[time]\nbase_action_secs = 0",
        "[actor]\nmax_deal_attempts = 0",
    ];
    for raw in cases {
        assert!(
            matches!(EngineConfig::from_toml_str(raw), Err(ConfigError::Invalid(_))),
            "должно быть отклонено: {raw}"
        );
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        EngineConfig::from_toml_str("[table\nmax_seats = 6"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        EngineConfig::from_toml_str("[table]\nmax_seats = \"six\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        EngineConfig::from_file("/definitely/not/here.toml"),
        Err(ConfigError::Io(_))
    ));
}
