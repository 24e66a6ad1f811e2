// src/tests/exclusionfilter_tests.rs

//! tests for `exclusionfilter.rs`

use crate::data::sessionevent::{SessionEvent, UserSession};
use crate::readers::exclusionfilter::{
    ExclusionConfig,
    ExclusionFilter,
    SYSTEM_EXCLUDE_USERS,
};

use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn login(user: &str) -> SessionEvent {
    SessionEvent::Login(UserSession::new(String::from(user), 100, None))
}

fn logout(user: &str) -> SessionEvent {
    SessionEvent::Logout(UserSession::new(String::from(user), 100, None))
}

#[test]
fn test_exclusion_config_system_only() {
    let config = ExclusionConfig::system_only();
    assert!(config.custom().is_empty());
    assert_eq!(config.merged().len(), SYSTEM_EXCLUDE_USERS.len());
    assert!(config.is_excluded("root"));
    assert!(config.is_excluded("_mbsetupuser"));
    assert!(!config.is_excluded("alice"));
}

#[test]
fn test_exclusion_config_custom() {
    let config = ExclusionConfig::new(["alice", "", "alice", " bob ", "root"]);
    assert_eq!(config.custom(), &[String::from("alice"), String::from("bob"), String::from("root")]);
    assert_eq!(config.merged().len(), 4);
    assert!(config.is_excluded("alice"));
    assert!(config.is_excluded("bob"));
    assert!(!config.is_excluded(" bob "));
}

#[test]
fn test_exclusion_config_is_case_sensitive() {
    let config = ExclusionConfig::new(["Alice"]);
    assert!(config.is_excluded("Alice"));
    assert!(!config.is_excluded("alice"));
    assert!(!config.is_excluded("ROOT"));
}

#[test_case(login("root"), false)]
#[test_case(logout("root"), false)]
#[test_case(login("_mbsetupuser"), false)]
#[test_case(login("alice"), false)]
#[test_case(logout("alice"), false)]
#[test_case(login("carol"), true)]
#[test_case(SessionEvent::Reboot { timestamp: 1 }, true)]
#[test_case(SessionEvent::Shutdown { timestamp: 2 }, true)]
fn test_exclusion_filter_pass(
    event: SessionEvent,
    expect: bool,
) {
    let filter = ExclusionFilter::new(ExclusionConfig::new(["root", "alice"]));
    assert_eq!(filter.pass(&event), expect);
}

#[test]
fn test_exclusion_filter_config() {
    let config = ExclusionConfig::new(["zed"]);
    let filter = ExclusionFilter::new(config.clone());
    assert_eq!(filter.config(), &config);
}
