// src/tests/identity_tests.rs

//! tests for `identity.rs`

use crate::common::FPath;
use crate::data::sessionevent::Uid;
use crate::debug::helpers::{create_temp_file_bytes, ntf_fpath};
use crate::readers::identity::{
    new_resolver,
    CachingResolver,
    IdCommandResolver,
    IdentityResolver,
    NoResolver,
    PasswdResolver,
    UidLookup,
};
use crate::tests::common::MapResolver;

use std::str::FromStr;

use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn test_no_resolver() {
    let mut resolver = NoResolver {};
    assert_eq!(resolver.resolve("root"), None);
    assert_eq!(resolver.resolve(""), None);
}

#[test]
fn test_caching_resolver_memoises() {
    let stub = MapResolver::new(&[("alice", 501)]);
    let calls = stub.calls();
    let mut resolver = CachingResolver::new(stub);
    assert_eq!(resolver.resolve("alice"), Some(501));
    assert_eq!(resolver.resolve("alice"), Some(501));
    assert_eq!(resolver.resolve("bob"), None);
    assert_eq!(resolver.resolve("bob"), None);
    assert_eq!(calls.get(), 2);
    assert_eq!(resolver.hits(), 2);
    assert_eq!(resolver.misses(), 2);
}

#[test_case(b"501\n", Some(501))]
#[test_case(b" 0 \n", Some(0))]
#[test_case(b"4294967295", Some(Uid::MAX))]
#[test_case(b"4294967296", None; "overflow")]
#[test_case(b"-1\n", None)]
#[test_case(b"abc\n", None)]
#[test_case(b"", None; "empty")]
#[test_case(b"5\xFF", None; "invalid utf8")]
fn test_id_command_parse_output(
    stdout: &[u8],
    expect: Option<Uid>,
) {
    assert_eq!(IdCommandResolver::parse_output(stdout), expect);
}

#[test]
fn test_id_command_missing_program() {
    let mut resolver = IdCommandResolver::new(FPath::from("/nonexistent/lastlogins/id"));
    assert_eq!(resolver.resolve("root"), None);
}

// `sh -u -- <path>` runs the script at `<path>` so `/bin/sh` can stand in for
// the `id` program, with the "username" being a script.

#[test]
fn test_id_command_parses_stdout() {
    let script = create_temp_file_bytes(b"echo 501\n");
    let mut resolver = IdCommandResolver::new(FPath::from("/bin/sh"));
    assert_eq!(resolver.resolve(&ntf_fpath(&script)), Some(501));
}

#[test]
fn test_id_command_nonzero_exit() {
    let script = create_temp_file_bytes(b"echo 501\nexit 1\n");
    let mut resolver = IdCommandResolver::new(FPath::from("/bin/sh"));
    assert_eq!(resolver.resolve(&ntf_fpath(&script)), None);
}

#[test]
fn test_id_command_bad_output() {
    let script = create_temp_file_bytes(b"echo no such user\n");
    let mut resolver = IdCommandResolver::new(FPath::from("/bin/sh"));
    assert_eq!(resolver.resolve(&ntf_fpath(&script)), None);
}

#[test]
fn test_passwd_resolver_root() {
    let mut resolver = PasswdResolver::new();
    assert_eq!(resolver.resolve("root"), Some(0));
}

#[test]
fn test_passwd_resolver_unknown() {
    let mut resolver = PasswdResolver::new();
    assert_eq!(resolver.resolve("no-such-user-lastlogins-test"), None);
}

#[test]
fn test_new_resolver_none() {
    let mut resolver = new_resolver(UidLookup::None);
    assert_eq!(resolver.resolve("root"), None);
}

#[test]
fn test_new_resolver_passwd() {
    let mut resolver = new_resolver(UidLookup::Passwd);
    assert_eq!(resolver.resolve("root"), Some(0));
}

#[test_case("passwd", Ok(UidLookup::Passwd))]
#[test_case("id-command", Ok(UidLookup::IdCommand); "id hyphen command")]
#[test_case("id_command", Ok(UidLookup::IdCommand); "id underscore command")]
#[test_case("none", Ok(UidLookup::None))]
#[test_case("ldap", Err(()))]
fn test_uid_lookup_from_str(
    input: &str,
    expect: Result<UidLookup, ()>,
) {
    assert_eq!(UidLookup::from_str(input), expect);
}

#[test]
fn test_uid_lookup_display() {
    assert_eq!(UidLookup::Passwd.to_string(), "passwd");
    assert_eq!(UidLookup::IdCommand.to_string(), "id-command");
    assert_eq!(UidLookup::None.to_string(), "none");
    assert_eq!(UidLookup::default(), UidLookup::Passwd);
}
