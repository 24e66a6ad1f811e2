// src/bin/lastlogins.rs

//! Driver program _lastlogins_ drives the [_lllib_].
//!
//! Processes user-passed command-line arguments.
//! Then enumerates the current users, opens the login accounting log
//! (with the native `libSystem` functions or from a file passed with
//! `--file`), and runs one [`SessionProcessor`] over it.
//!
//! Prints the last login of each current user to STDOUT. With `--events`
//! first prints every session event in the manner of `last`. With
//! `--summary` prints a [`SummarySessionProcessor`] to STDERR.
//!
//! Exits with a failure status if the current users cannot be enumerated,
//! if the log cannot be opened, or if reading the log stopped at an error
//! (the partial results are still printed).
//!
//! [_lllib_]: lllib
//! [`SessionProcessor`]: lllib::readers::sessionprocessor::SessionProcessor
//! [`SummarySessionProcessor`]: lllib::readers::summary::SummarySessionProcessor

#![allow(non_camel_case_types)]

use std::process::ExitCode;

use ::anyhow::Context;
use ::chrono::{FixedOffset, Local};
use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;
use ::si_trace_print::{defn, defo, defx};
use ::termcolor::{ColorChoice, StandardStream};

use ::lllib::common::FPath;
use ::lllib::data::sessionevent::SessionMode;
use ::lllib::debug::printers::{e_err, e_wrn};
use ::lllib::printer::printers::{print_events, print_report};
use ::lllib::printer::summary::print_summary;
use ::lllib::readers::currentusers::{CurrentUsers, UsersDirectory, USERS_DIR};
use ::lllib::readers::exclusionfilter::{ExclusionConfig, SetUsernames};
use ::lllib::readers::identity::{new_resolver, UidLookup};
use ::lllib::readers::sessionprocessor::{
    ResultSessionRun,
    ResultSessionRunError,
    SessionProcessor,
    SessionReport,
};
use ::lllib::readers::summary::SummarySessionProcessor;
use ::lllib::readers::utmpxreader::{UtmpxApiReader, UtmpxFileReader};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

const CLI_HELP_AFTER: &str = concatcp!(
    "Session modes:
  console-only       only logins on the \"console\" line (also \"gui\")
  console-or-remote  logins on the \"console\" line or from a remote host
                     (also \"gui_ssh\")

The users \"_mbsetupuser\" and \"root\" are always excluded.

Current users are the subdirectories of --users-dir not beginning with \"_\".

Default log: /var/log/utmpx read with the ", lllib::libload::utmpx_dlopen2::LIB_NAME_SYSTEM, " functions.
"
);

// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "lastlogins",
    // write expanded information for the `--version` output
    version = concatcp!(
        "\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Author: ", env!("CARGO_PKG_AUTHORS"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Which user records count as interactive sessions.
    #[clap(
        short = 'm',
        long = "session-mode",
        verbatim_doc_comment,
        value_enum,
        default_value_t = SessionMode::ConsoleOrRemote,
    )]
    session_mode: SessionMode,

    /// Exclude this user. May be passed more than once or as a
    /// comma-separated list.
    #[clap(
        short = 'x',
        long = "exclude",
        verbatim_doc_comment,
        value_delimiter = ',',
    )]
    exclude: Vec<String>,

    /// Read records from this file instead of the system login accounting
    /// log, e.g. a copy of /var/log/utmpx.
    #[clap(
        short = 'f',
        long = "file",
        verbatim_doc_comment,
    )]
    file: Option<FPath>,

    /// Directory of user home directories.
    #[clap(
        short = 'd',
        long = "users-dir",
        verbatim_doc_comment,
        default_value_t = FPath::from(USERS_DIR),
    )]
    users_dir: FPath,

    /// How to find the numeric user ID of a user.
    #[clap(
        short = 'u',
        long = "uid-lookup",
        verbatim_doc_comment,
        value_enum,
        default_value_t = UidLookup::Passwd,
    )]
    uid_lookup: UidLookup,

    /// Also print every session event, oldest record first.
    #[clap(
        short = 'e',
        long = "events",
        verbatim_doc_comment,
    )]
    events: bool,

    /// Choose to print using colors.
    #[clap(
        required = false,
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Print a summary of the records processed to stderr.
    #[clap(
        short,
        long,
        verbatim_doc_comment,
    )]
    summary: bool,
}

const fn cli_color_choice(color_choice: CLI_Color_Choice) -> ColorChoice {
    match color_choice {
        CLI_Color_Choice::always => ColorChoice::Always,
        CLI_Color_Choice::auto => ColorChoice::Auto,
        CLI_Color_Choice::never => ColorChoice::Never,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// processing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn current_users(users_dir: &FPath) -> anyhow::Result<SetUsernames> {
    let users = UsersDirectory::new(users_dir.clone())
        .current_users()
        .with_context(|| format!("failed to enumerate current users in {:?}", users_dir))?;
    if users.is_empty() {
        e_wrn!("no current users found in {:?}", users_dir);
    }

    Ok(users)
}

fn print_results(
    report: &SessionReport,
    print_event_list: bool,
    tz: &FixedOffset,
    color_choice: ColorChoice,
) -> anyhow::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice);
    if print_event_list {
        print_events(&report.events, tz, &mut stdout).context("failed to print events")?;
    }
    print_report(report, tz, &mut stdout).context("failed to print last logins")?;

    Ok(())
}

fn print_summary_stderr(
    summary: &SummarySessionProcessor,
    tz: &FixedOffset,
    color_choice: ColorChoice,
) -> anyhow::Result<()> {
    let mut stderr = StandardStream::stderr(color_choice);
    print_summary(summary, tz, &mut stderr).context("failed to print summary")?;

    Ok(())
}

pub fn main() -> ExitCode {
    defn!();
    let args = CLI_Args::parse();
    defo!("args {:?}", args);

    let color_choice: ColorChoice = cli_color_choice(args.color_choice);
    let tz: FixedOffset = *Local::now().offset();

    let users: SetUsernames = match current_users(&args.users_dir) {
        Ok(users) => users,
        Err(err) => {
            e_err!("{:#}", err);
            defx!("return FAILURE");
            return ExitCode::FAILURE;
        }
    };
    defo!("current users {:?}", users);

    let exclusions = ExclusionConfig::new(args.exclude.iter());
    let mut processor = SessionProcessor::new(
        args.session_mode,
        exclusions,
        new_resolver(args.uid_lookup),
    );
    let result: ResultSessionRunError = match &args.file {
        Some(path) => processor.open_and_run(|| UtmpxFileReader::open(path), &users),
        None => processor.open_and_run(UtmpxApiReader::open, &users),
    };
    defo!("result {}", result);

    let mut exitcode: ExitCode = ExitCode::SUCCESS;
    match &result {
        ResultSessionRun::ErrOpen(err) => {
            e_err!("failed to open the login accounting log: {}", err);
            exitcode = ExitCode::FAILURE;
        }
        ResultSessionRun::Partial(report, err) => {
            if let Err(err_print) = print_results(report, args.events, &tz, color_choice) {
                e_err!("{:#}", err_print);
            }
            e_err!("reading stopped early, results are partial: {}", err);
            exitcode = ExitCode::FAILURE;
        }
        ResultSessionRun::Ok(report) => {
            if let Err(err_print) = print_results(report, args.events, &tz, color_choice) {
                e_err!("{:#}", err_print);
                exitcode = ExitCode::FAILURE;
            }
        }
    }

    if args.summary {
        if let Err(err) = print_summary_stderr(processor.summary(), &tz, color_choice) {
            e_err!("{:#}", err);
        }
    }
    defx!("exitcode {:?}", exitcode);

    exitcode
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
