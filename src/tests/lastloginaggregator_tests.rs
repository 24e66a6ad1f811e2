// src/tests/lastloginaggregator_tests.rs

//! tests for `lastloginaggregator.rs`

use crate::common::EpochSeconds;
use crate::data::sessionevent::{SessionEvent, UserSession};
use crate::readers::lastloginaggregator::{aggregate, LastLoginAggregator, LastLoginIndex};
use crate::tests::common::set_users;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn login(user: &str, timestamp: EpochSeconds) -> SessionEvent {
    SessionEvent::Login(UserSession::new(String::from(user), timestamp, None))
}

fn logout(user: &str, timestamp: EpochSeconds) -> SessionEvent {
    SessionEvent::Logout(UserSession::new(String::from(user), timestamp, None))
}

fn index(entries: &[(&str, EpochSeconds)]) -> LastLoginIndex {
    entries.iter().map(|(u, t)| (String::from(*u), *t)).collect()
}

#[test]
fn test_aggregate_maximum() {
    let events = vec![login("alice", 1000), login("alice", 2000), login("bob", 1500)];
    let result = aggregate(events.iter(), set_users(&["alice", "bob"]));
    assert_eq!(result, index(&[("alice", 2000), ("bob", 1500)]));
}

#[test]
fn test_aggregate_order_independent() {
    let mut events = vec![
        login("alice", 2000),
        login("bob", 1500),
        login("alice", 1000),
        login("bob", 1499),
        login("alice", 1999),
    ];
    let users = set_users(&["alice", "bob"]);
    let forward = aggregate(events.iter(), users.clone());
    events.reverse();
    let backward = aggregate(events.iter(), users);
    assert_eq!(forward, backward);
    assert_eq!(forward, index(&[("alice", 2000), ("bob", 1500)]));
}

#[test]
fn test_aggregate_not_current_user() {
    let events = vec![login("alice", 1000), login("carol", 3000)];
    let result = aggregate(events.iter(), set_users(&["alice", "bob"]));
    assert_eq!(result, index(&[("alice", 1000)]));
    assert!(!result.contains_key("bob"));
}

#[test]
fn test_aggregate_ignores_other_events() {
    let events = vec![
        SessionEvent::Reboot { timestamp: 5000 },
        SessionEvent::Shutdown { timestamp: 5001 },
        logout("alice", 4000),
        login("alice", 1000),
    ];
    let result = aggregate(events.iter(), set_users(&["alice"]));
    assert_eq!(result, index(&[("alice", 1000)]));
}

#[test]
fn test_aggregate_empty() {
    let events: Vec<SessionEvent> = Vec::new();
    assert!(aggregate(events.iter(), set_users(&["alice"])).is_empty());
    let events = vec![login("alice", 1)];
    assert!(aggregate(events.iter(), set_users(&[])).is_empty());
}

#[test]
fn test_aggregate_negative_timestamps() {
    let events = vec![login("alice", -100), login("alice", -5)];
    let result = aggregate(events.iter(), set_users(&["alice"]));
    assert_eq!(result, index(&[("alice", -5)]));
}

#[test]
fn test_aggregator_add() {
    let mut aggregator = LastLoginAggregator::new(set_users(&["alice"]));
    assert!(aggregator.add(&login("alice", 10)));
    assert!(!aggregator.add(&login("alice", 10)));
    assert!(!aggregator.add(&login("alice", 9)));
    assert!(aggregator.add(&login("alice", 11)));
    assert!(!aggregator.add(&login("bob", 99)));
    assert!(!aggregator.add(&logout("alice", 99)));
    assert_eq!(aggregator.index(), &index(&[("alice", 11)]));
    assert_eq!(aggregator.finish(), index(&[("alice", 11)]));
}
