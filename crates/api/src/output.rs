use std::fs;
use std::io;
use std::path::Path;

use crate::pipeline::{HARD_CSV, SOFT_CSV};
use types::TimetablePayload;

pub const JSON_FILE: &str = "timetable.json";

/// Write the CSV and JSON artifacts into `dir`, then delete whichever CSV a
/// previous run may have left behind under the other name so the directory
/// never shows two timetables at once.
pub fn write_outputs(
    payload: &TimetablePayload,
    csv_name: &str,
    dir: &Path,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(dir.join(csv_name))?;
    writer.write_record(["Day", "Slot", "Track", "Teacher", "Code", "Subject", "Students"])?;
    for entry in &payload.entries {
        let slot = entry.slot.to_string();
        let track = entry.track.to_string();
        let students = entry
            .students
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        writer.write_record([
            entry.day.as_str(),
            slot.as_str(),
            track.as_str(),
            entry.teacher.as_str(),
            entry.code.as_str(),
            entry.subject.as_str(),
            students.as_str(),
        ])?;
    }
    writer.flush()?;

    let json_file = fs::File::create(dir.join(JSON_FILE))?;
    serde_json::to_writer_pretty(json_file, payload)?;

    let stale = if csv_name == HARD_CSV { SOFT_CSV } else { HARD_CSV };
    match fs::remove_file(dir.join(stale)) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
