use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;

#[test]
fn test_double_booking_rejected() {
    let rooms = common::rooms_csv();
    let commands = common::commands_csv(&[
        "book, , 7, 101, , , 2026-09-01, 2026-09-05, , ,",
        // Overlaps the first stay; still Pending, still blocks the slot.
        "book, , 8, 101, , , 2026-09-03, 2026-09-06, , ,",
    ]);

    common::innkeeper_cmd(&commands, &rooms)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "room 101 is not available for the selected dates",
        ))
        .stdout(predicate::str::contains("1,7,101"))
        .stdout(predicate::str::contains("2,8,101").not());
}

#[test]
fn test_same_day_turnover_accepted() {
    let rooms = common::rooms_csv();
    let commands = common::commands_csv(&[
        "book, , 7, 101, , , 2026-09-01, 2026-09-04, , ,",
        "book, , 8, 101, , , 2026-09-04, 2026-09-06, , ,",
    ]);

    common::innkeeper_cmd(&commands, &rooms)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1,7,101,2026-09-01,2026-09-04,3,Pending,450.00",
        ))
        .stdout(predicate::str::contains(
            "2,8,101,2026-09-04,2026-09-06,2,Pending,300.00",
        ));
}

#[test]
fn test_cancelled_booking_frees_the_room() {
    let rooms = common::rooms_csv();
    let commands = common::commands_csv(&[
        "book, , 7, 101, , , 2026-09-01, 2026-09-05, , ,",
        "cancel, 1, , , , , , , , ,",
        "book, , 8, 101, , , 2026-09-03, 2026-09-06, , ,",
    ]);

    common::innkeeper_cmd(&commands, &rooms)
        .assert()
        .success()
        .stdout(predicate::str::contains("1,7,101,2026-09-01,2026-09-05,4,Cancelled"))
        .stdout(predicate::str::contains("2,8,101,2026-09-03,2026-09-06,3,Pending"));
}

#[test]
fn test_other_rooms_unaffected() {
    let rooms = common::rooms_csv();
    let commands = common::commands_csv(&[
        "book, , 7, 101, , , 2026-09-01, 2026-09-05, , ,",
        "book, , 8, 102, , , 2026-09-01, 2026-09-05, , ,",
    ]);

    common::innkeeper_cmd(&commands, &rooms)
        .assert()
        .success()
        .stdout(predicate::str::contains("1,7,101"))
        .stdout(predicate::str::contains("2,8,102"));
}
