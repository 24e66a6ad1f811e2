// src/tests/common.rs

//! Common data and stubs shared by the tests.

#![allow(non_upper_case_globals)]

use crate::common::{Count, EpochSeconds, ResultS3};
use crate::data::sessionevent::Uid;
use crate::data::utmpx::{
    RawRecord,
    BOOT_TIME,
    DEAD_PROCESS,
    SHUTDOWN_TIME,
    USER_PROCESS,
    UTMPX_SZ,
};
use crate::readers::exclusionfilter::SetUsernames;
use crate::readers::identity::IdentityResolver;
use crate::readers::utmpxreader::{RecordReader, ResultS3RawRecord};

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::io::{Error, ErrorKind};
use std::rc::Rc;

use ::lazy_static::lazy_static;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// record builders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn user_process(
    user: &str,
    line: &str,
    host: &str,
    tv_sec: EpochSeconds,
) -> RawRecord {
    RawRecord::new(USER_PROCESS, user, line, host, tv_sec)
}

pub fn dead_process(
    user: &str,
    line: &str,
    host: &str,
    tv_sec: EpochSeconds,
) -> RawRecord {
    RawRecord::new(DEAD_PROCESS, user, line, host, tv_sec)
}

pub fn boot_time(tv_sec: EpochSeconds) -> RawRecord {
    RawRecord::new(BOOT_TIME, "reboot", "~", "", tv_sec)
}

pub fn shutdown_time(tv_sec: EpochSeconds) -> RawRecord {
    RawRecord::new(SHUTDOWN_TIME, "shutdown", "~", "", tv_sec)
}

/// Concatenate the bytes of `records`, as found in a `wtmpx` file.
pub fn records_to_bytes(records: &[RawRecord]) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::with_capacity(records.len() * UTMPX_SZ);
    for record in records.iter() {
        buffer.extend_from_slice(&record.as_bytes());
    }

    buffer
}

pub fn set_users(users: &[&str]) -> SetUsernames {
    users.iter().map(|s| String::from(*s)).collect()
}

lazy_static! {
    /// Two console logins of alice and a terminal login of bob.
    pub static ref SCENARIO_A: Vec<RawRecord> = vec![
        user_process("alice", "console", "", 1000),
        user_process("alice", "console", "", 2000),
        user_process("bob", "ttys001", "", 1500),
    ];

    /// `SCENARIO_A` and a remote login of carol.
    pub static ref SCENARIO_B: Vec<RawRecord> = {
        let mut records = SCENARIO_A.clone();
        records.push(user_process("carol", "ttys002", "office.example.com", 3000));
        records
    };

    /// A little of everything, in no particular time order.
    pub static ref RECORDS_MIXED: Vec<RawRecord> = vec![
        boot_time(900),
        user_process("alice", "console", "", 1000),
        RawRecord::new(6, "LOGIN", "ttys000", "", 1001),
        user_process("root", "console", "", 1100),
        dead_process("alice", "console", "", 1200),
        user_process("carol", "ttys002", "office.example.com", 3000),
        user_process("", "console", "", 1300),
        user_process("bob", "ttys001", "", 1500),
        shutdown_time(2900),
        user_process("alice", "console", "", 2000),
    ];

    /// The bytes of a `USER_PROCESS` record built field by field at the
    /// Darwin `utmpx` offsets.
    pub static ref BUFFER_ALICE_REMOTE: [u8; UTMPX_SZ] = {
        let mut buffer: [u8; UTMPX_SZ] = [0; UTMPX_SZ];
        buffer[0..5].copy_from_slice(b"alice");
        buffer[256..260].copy_from_slice(b"s001");
        buffer[260..267].copy_from_slice(b"ttys001");
        buffer[292..296].copy_from_slice(&4242_i32.to_ne_bytes());
        buffer[296..298].copy_from_slice(&USER_PROCESS.to_ne_bytes());
        buffer[304..312].copy_from_slice(&1_700_000_000_i64.to_ne_bytes());
        buffer[312..316].copy_from_slice(&123_456_i32.to_ne_bytes());
        buffer[320..338].copy_from_slice(b"office.example.com");
        buffer[576..580].copy_from_slice(&0xFFFF_FFFF_u32.to_ne_bytes());
        buffer
    };
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// stubs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// In-memory [`RecordReader`]. Optionally returns an error after
/// `error_after` records. Counts handle releases in `closes`.
pub struct VecRecordReader {
    records: VecDeque<RawRecord>,
    error_after: Option<usize>,
    closes: Rc<Cell<usize>>,
    is_open: bool,
    is_done: bool,
    records_read: Count,
}

impl VecRecordReader {
    pub fn new(records: &[RawRecord]) -> VecRecordReader {
        VecRecordReader {
            records: records.iter().cloned().collect(),
            error_after: None,
            closes: Rc::new(Cell::new(0)),
            is_open: true,
            is_done: false,
            records_read: 0,
        }
    }

    /// Return an `Err` instead of record `error_after` (0-based).
    pub fn with_error_after(
        records: &[RawRecord],
        error_after: usize,
    ) -> VecRecordReader {
        let mut reader = VecRecordReader::new(records);
        reader.error_after = Some(error_after);

        reader
    }

    /// Shared count of handle releases, readable after the reader is
    /// dropped.
    pub fn closes(&self) -> Rc<Cell<usize>> {
        self.closes.clone()
    }
}

impl RecordReader for VecRecordReader {
    fn next(&mut self) -> ResultS3RawRecord {
        if !self.is_open || self.is_done {
            return ResultS3::Done;
        }
        if self.error_after == Some(self.records_read as usize) {
            self.is_done = true;
            return ResultS3::Err(Error::new(ErrorKind::Other, "injected read error"));
        }
        match self.records.pop_front() {
            Some(record) => {
                self.records_read += 1;
                ResultS3::Found(record)
            }
            None => {
                self.is_done = true;
                ResultS3::Done
            }
        }
    }

    fn close(&mut self) {
        if self.is_open {
            self.is_open = false;
            self.closes.set(self.closes.get() + 1);
        }
    }

    fn records_read(&self) -> Count {
        self.records_read
    }

    fn source(&self) -> String {
        String::from("memory")
    }
}

impl Drop for VecRecordReader {
    fn drop(&mut self) {
        self.close();
    }
}

/// Map-backed [`IdentityResolver`]. Counts calls in `calls`.
pub struct MapResolver {
    map: HashMap<String, Uid>,
    calls: Rc<Cell<usize>>,
}

impl MapResolver {
    pub fn new(entries: &[(&str, Uid)]) -> MapResolver {
        MapResolver {
            map: entries.iter().map(|(u, uid)| (String::from(*u), *uid)).collect(),
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn calls(&self) -> Rc<Cell<usize>> {
        self.calls.clone()
    }
}

impl IdentityResolver for MapResolver {
    fn resolve(&mut self, username: &str) -> Option<Uid> {
        self.calls.set(self.calls.get() + 1);

        self.map.get(username).copied()
    }
}
