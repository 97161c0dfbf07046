pub mod progress;
pub mod slots;

use std::path::PathBuf;

use ansi_term::Colour;
use anyhow::Result;
use clap::{Parser, Subcommand};
use progress::{
    process_dates_command, process_fill_command, process_set_command, process_show_command,
    DayArgs, RangeArgs,
};
use slots::process_slots_command;
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    error::TrackerError,
    storage::entry_store::CorruptDataPolicy,
    tracker::notice::{Notice, NoticeKind},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, LogSettings},
        runtime::single_thread_runtime,
    },
};

#[derive(Parser, Debug)]
#[command(name = "Hourtrack", version, long_about = None)]
#[command(about = "Keep free-text progress notes for every hour of the day", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long = "log",
        global = true,
        help = "Print logs of at least this level to stderr, e.g. debug or trace"
    )]
    log: Option<LevelFilter>,
    #[arg(
        long = "on-corrupt",
        global = true,
        default_value_t = CorruptDataPolicy::Fail,
        help = "What to do when saved progress can't be read. `reset` starts over and the next save overwrites it"
    )]
    on_corrupt: CorruptDataPolicy,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Print the hourly slots between two times")]
    Slots {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, help = "List the hours a range can start or end at instead")]
        options: bool,
    },
    #[command(about = "Show the progress noted for a day")]
    Show {
        #[command(flatten)]
        day: DayArgs,
        #[command(flatten)]
        range: RangeArgs,
    },
    #[command(about = "Write the note for one slot and save the day")]
    Set {
        #[command(flatten)]
        day: DayArgs,
        #[arg(long, help = "Slot to write, e.g. 09:00")]
        slot: String,
        #[arg(long, help = "Progress made during the slot")]
        text: String,
    },
    #[command(about = "Go through every slot of a day interactively, then save")]
    Fill {
        #[command(flatten)]
        day: DayArgs,
        #[command(flatten)]
        range: RangeArgs,
    },
    #[command(about = "List the days that have saved progress")]
    Dates {},
}

/// What every command needs to reach the store.
pub struct CommandContext {
    pub dir: PathBuf,
    pub policy: CorruptDataPolicy,
    pub clock: Box<dyn Clock>,
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;
    enable_logging(&LogSettings::new(
        &dir,
        args.log,
        std::env::var("RUST_LOG").ok(),
    ))?;
    debug!("Using {dir:?}");

    let context = CommandContext {
        dir,
        policy: args.on_corrupt,
        clock: Box::new(DefaultClock),
    };

    single_thread_runtime()?.block_on(async move { run_command(&context, args.commands).await })
}

async fn run_command(context: &CommandContext, commands: Commands) -> Result<()> {
    match commands {
        Commands::Slots { range, options } => process_slots_command(range, options),
        Commands::Show { day, range } => process_show_command(context, day, range).await,
        Commands::Set { day, slot, text } => process_set_command(context, day, slot, text).await,
        Commands::Fill { day, range } => process_fill_command(context, day, range).await,
        Commands::Dates {} => process_dates_command(context).await,
    }
}

pub fn print_notice(notice: &Notice) {
    let colour = match notice.kind {
        NoticeKind::Success => Colour::Green,
        NoticeKind::Failure => Colour::Red,
    };
    let title = colour.bold().paint(notice.title.as_str());
    match notice.kind {
        NoticeKind::Success => println!("{title}: {}", notice.description),
        NoticeKind::Failure => eprintln!("{title}: {}", notice.description),
    }
}

/// The failure notice for `error`, if a [TrackerError] caused it.
fn failure_notice(error: &anyhow::Error) -> Option<Notice> {
    error.downcast_ref::<TrackerError>().map(Notice::failure)
}

/// Shows a failed command to the user. Tracker errors get the same notice a failed save does.
pub fn report_failure(error: &anyhow::Error) {
    match failure_notice(error) {
        Some(notice) => print_notice(&notice),
        None => eprintln!("{} {error:#}", Colour::Red.bold().paint("Error:")),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use anyhow::{anyhow, Context};

    use crate::{error::TrackerError, tracker::notice::NoticeKind};

    use super::failure_notice;

    #[test]
    fn test_tracker_errors_become_notices() {
        let error = anyhow::Error::from(TrackerError::time_format("9am"));
        let notice = failure_notice(&error).expect("tracker error should produce a notice");
        assert_eq!(notice.kind, NoticeKind::Failure);
        assert_eq!(notice.title, "Invalid Input");
    }

    #[test]
    fn test_context_keeps_tracker_error() {
        let result: Result<(), TrackerError> = Err(TrackerError::storage(
            "progressEntries",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        ));
        let error = result.context("Failed to save the day").unwrap_err();

        let notice = failure_notice(&error).expect("context should not hide the tracker error");
        assert_eq!(notice.title, "Progress Not Saved");
    }

    #[test]
    fn test_other_errors_have_no_notice() {
        assert_eq!(failure_notice(&anyhow!("no home directory")), None);
    }
}
