use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_english::{parse_date_string, Dialect};
use clap::CommandFactory;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use crate::{
    slots::TimeSlot,
    storage::{
        entry_store::EntryStore,
        kv_store::{FileKeyValueStore, KeyValueStore},
    },
    tracker::{state::TrackerState, Tracker, TrackerAction},
    utils::{
        clock::Clock,
        time::{date_to_key, parse_date_key},
    },
};

use super::{print_notice, Args, CommandContext};

#[derive(Debug, Clone, clap::Args)]
pub struct DayArgs {
    #[arg(
        long,
        short,
        help = "Day to work with. Examples are \"2025-03-15\", \"yesterday\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
}

impl DayArgs {
    fn resolve(&self, clock: &dyn Clock) -> Result<NaiveDate> {
        match &self.date {
            Some(value) => parse_date_arg(value, clock),
            None => Ok(clock.today()),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct RangeArgs {
    #[arg(long, short, default_value = "09:00", help = "First slot, HH:mm")]
    pub start: String,
    #[arg(long, short, default_value = "17:00", help = "Last slot, HH:mm")]
    pub end: String,
}

impl RangeArgs {
    fn parse(&self) -> Result<(TimeSlot, TimeSlot)> {
        Ok((
            self.start.parse::<TimeSlot>()?,
            self.end.parse::<TimeSlot>()?,
        ))
    }
}

/// Accepts the stored `yyyy-MM-dd` form first, then falls back to phrases like "yesterday".
/// Day/month order follows the UK style.
fn parse_date_arg(value: &str, clock: &dyn Clock) -> Result<NaiveDate> {
    if let Ok(date) = parse_date_key(value) {
        return Ok(date);
    }
    match parse_date_string(value, clock.now(), Dialect::Uk) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value:?}: {e}"),
            )
            .into()),
    }
}

async fn open_tracker(
    context: &CommandContext,
    date: NaiveDate,
) -> Result<Tracker<FileKeyValueStore>> {
    let store = FileKeyValueStore::new(context.dir.clone())
        .with_context(|| format!("Failed to open store in {:?}", context.dir))?;
    Ok(Tracker::open(EntryStore::new(store, context.policy), date).await?)
}

async fn select_range<S: KeyValueStore>(tracker: &mut Tracker<S>, range: &RangeArgs) -> Result<()> {
    let (start, end) = range.parse()?;
    tracker.dispatch(TrackerAction::SelectStart(start)).await?;
    tracker.dispatch(TrackerAction::SelectEnd(end)).await?;
    Ok(())
}

async fn save<S: KeyValueStore>(tracker: &mut Tracker<S>) -> Result<()> {
    if let Some(notice) = tracker.dispatch(TrackerAction::Save).await? {
        print_notice(&notice);
    }
    Ok(())
}

fn print_rows(state: &TrackerState) {
    println!(
        "{}  {} to {}",
        date_to_key(state.date),
        state.start.display_label(),
        state.end.display_label()
    );
    let rows = state.rows();
    if rows.is_empty() {
        println!("No slots, the range ends before it starts");
    }
    for (slot, text) in rows {
        println!("{:>8}\t{text}", slot.display_label());
    }
}

pub async fn process_show_command(
    context: &CommandContext,
    day: DayArgs,
    range: RangeArgs,
) -> Result<()> {
    let date = day.resolve(context.clock.as_ref())?;
    let mut tracker = open_tracker(context, date).await?;
    select_range(&mut tracker, &range).await?;
    print_rows(tracker.state());
    Ok(())
}

pub async fn process_set_command(
    context: &CommandContext,
    day: DayArgs,
    slot: String,
    text: String,
) -> Result<()> {
    let date = day.resolve(context.clock.as_ref())?;
    let slot = slot.parse::<TimeSlot>()?;
    let mut tracker = open_tracker(context, date).await?;
    tracker
        .dispatch(TrackerAction::EditSlot { slot, text })
        .await?;
    save(&mut tracker).await
}

/// What an answered prompt does to the note of its slot.
#[derive(Debug, PartialEq, Eq)]
enum FillAnswer {
    Keep,
    Replace(String),
}

/// An empty line keeps the current text and a single `-` clears it. Anything else replaces it,
/// minus trailing whitespace.
fn parse_fill_answer(line: &str) -> FillAnswer {
    match line.trim_end() {
        "" => FillAnswer::Keep,
        "-" => FillAnswer::Replace(String::new()),
        value => FillAnswer::Replace(value.to_owned()),
    }
}

/// Prompts for every visible slot, reading answers from `input`, then saves. Input ending early
/// still saves whatever was entered.
async fn fill_and_save<S, R>(tracker: &mut Tracker<S>, input: R) -> Result<()>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
{
    let rows = tracker
        .state()
        .rows()
        .into_iter()
        .map(|(slot, text)| (slot, text.to_owned()))
        .collect::<Vec<_>>();
    if rows.is_empty() {
        println!("No slots, the range ends before it starts");
        return Ok(());
    }

    println!("Progress for {}", date_to_key(tracker.state().date));
    let mut lines = input.lines();
    for (slot, current) in rows {
        print!("{:>8} [{current}]: ", slot.display_label());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if let FillAnswer::Replace(text) = parse_fill_answer(&line) {
            tracker
                .dispatch(TrackerAction::EditSlot { slot, text })
                .await?;
        }
    }

    save(tracker).await
}

pub async fn process_fill_command(
    context: &CommandContext,
    day: DayArgs,
    range: RangeArgs,
) -> Result<()> {
    let date = day.resolve(context.clock.as_ref())?;
    let mut tracker = open_tracker(context, date).await?;
    select_range(&mut tracker, &range).await?;
    fill_and_save(&mut tracker, BufReader::new(tokio::io::stdin())).await
}

pub async fn process_dates_command(context: &CommandContext) -> Result<()> {
    let store = FileKeyValueStore::new(context.dir.clone())
        .with_context(|| format!("Failed to open store in {:?}", context.dir))?;
    let collection = EntryStore::new(store, context.policy).load().await?;
    info!("Listing {} days", collection.len());

    if collection.is_empty() {
        println!("No progress saved yet");
    }
    for date in collection.dates() {
        let notes = collection
            .entries_for(date)
            .values()
            .filter(|text| !text.trim().is_empty())
            .count();
        println!("{}\t{notes} notes", date_to_key(date));
    }
    Ok(())
}
