use anyhow::Result;

use crate::slots::{generate_time_slots, time_options};

use super::progress::RangeArgs;

pub fn process_slots_command(range: RangeArgs, options: bool) -> Result<()> {
    let slots = if options {
        time_options()
    } else {
        generate_time_slots(&range.start, &range.end)?
    };

    if slots.is_empty() {
        println!("No slots, {} is after {}", range.start, range.end);
    }
    for slot in slots {
        println!("{slot}\t{}", slot.display_label());
    }
    Ok(())
}
