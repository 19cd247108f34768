use csv::WriterBuilder;
use std::path::Path;

use junta_roster::RosterSnapshot;

/// Writes a roster snapshot to CSV, one row per slot in position order
pub fn export_roster_csv(snapshot: &RosterSnapshot, csv_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(csv_path)?;

    wtr.write_record(["position", "draw_number", "name", "member", "document_id", "phone", "email"])?;

    for (index, slot) in snapshot.slots.iter().enumerate() {
        let position = (index + 1).to_string();
        let number = slot.draw_label().unwrap_or_default();
        wtr.write_record([
            position.as_str(),
            number.as_str(),
            slot.display_name.as_str(),
            slot.member_label(),
            slot.document_id.as_str(),
            slot.phone.as_str(),
            slot.email.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
