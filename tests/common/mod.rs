use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

pub const COMMAND_HEADER: &str =
    "action, booking, customer, room, staff, payment, check_in, check_out, amount, method, notes";

/// Four-room catalog: two Doubles at 150.00, one Suite at 300.00 and one
/// Suite down for maintenance.
pub fn rooms_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "room, number, floor, type, price, capacity, status").unwrap();
    writeln!(file, "101, 101, 1, Double, 150.00, 2,").unwrap();
    writeln!(file, "102, 102, 1, Double, 150.00, 2,").unwrap();
    writeln!(file, "201, 201, 2, Suite, 300.00, 4,").unwrap();
    writeln!(file, "202, 202, 2, Suite, 300.00, 4, Maintenance").unwrap();
    file
}

pub fn commands_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{COMMAND_HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// Builds the CLI invocation with the catalog and a pinned "today" so
/// fixtures stay valid regardless of when the suite runs.
pub fn innkeeper_cmd(commands: &NamedTempFile, rooms: &NamedTempFile) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("innkeeper"));
    cmd.arg(commands.path())
        .arg("--rooms")
        .arg(rooms.path())
        .arg("--today")
        .arg("2026-01-01");
    cmd
}
