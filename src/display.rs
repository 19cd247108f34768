use std::fs::File;
use std::io::Write;

use junta_roster::{GroupInfo, RosterSnapshot, Slot};

/// Cards alternate sides: odd positions on the left, even on the right
pub fn card_side(position: usize) -> &'static str {
    if position % 2 != 0 {
        "left"
    } else {
        "right"
    }
}

/// Formats a member name with the draw number they hold
pub fn format_member(slot: &Slot) -> String {
    match slot.draw_number {
        Some(number) => format!("[{}] {}", number, slot.display_name),
        None => slot.display_name.clone(),
    }
}

/// Writes the roster to a file, one slot per line: `#pos [n] name (label)`
pub fn write_roster_to_file(
    info: &GroupInfo,
    snapshot: &RosterSnapshot,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** {} - {} **", info.name, info.formatted_amount())?;

    for (index, slot) in snapshot.slots.iter().enumerate() {
        if slot.occupied {
            writeln!(file, "#{} {} ({})", index + 1, format_member(slot), slot.member_label())?;
        } else {
            writeln!(file, "#{} [EMPTY]", index + 1)?;
        }
    }

    Ok(())
}

/// Prints the roster in a readable format
pub fn print_roster(info: &GroupInfo, snapshot: &RosterSnapshot) {
    let (start, end) = info.formatted_dates();
    println!("\n=== {} ===", info.name);
    println!(
        "Contribution: {} ({:?}), {} to {}",
        info.formatted_amount(),
        info.period,
        start,
        end
    );
    println!(
        "Slots: {} of {} max, {} vacant",
        snapshot.size, snapshot.max_slots, snapshot.vacancies
    );

    let mut by_number: Vec<&Slot> = snapshot
        .slots
        .iter()
        .filter(|s| s.draw_number.is_some())
        .collect();
    by_number.sort_by_key(|s| s.draw_number);

    println!("\nRoster by slot:");
    for (index, slot) in snapshot.slots.iter().enumerate() {
        if slot.occupied {
            println!(
                "  Slot {} -> {} ({}) {}",
                index + 1,
                format_member(slot),
                slot.member_label(),
                slot.phone
            );
        } else {
            println!("  Slot {} -> [EMPTY]", index + 1);
        }
    }

    if !by_number.is_empty() {
        println!("\nPayout order:");
        for slot in by_number {
            println!("  {}", format_member(slot));
        }
    }
}
