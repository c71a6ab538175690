use super::common::*;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::workflows::leave::query::{project_requests, stored_leave_days, summarize, LeaveStats};
use crate::workflows::leave::LeaveRequestService;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 20).expect("valid")
}

#[test]
fn empty_sheet_yields_zeroed_stats() {
    assert_eq!(summarize(&[], today()), LeaveStats::default());

    let stats = summarize(&[], today());
    let json = serde_json::to_value(stats).expect("stats serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "total": 0,
            "pending": 0,
            "approved": 0,
            "rejected": 0,
            "thisMonth": 0,
            "totalLeaveDays": 0
        })
    );
}

#[test]
fn status_counts_use_exact_labels() {
    let rows = vec![
        sheet_row("LR-AAAAAAA1", "2024-02-01T12:00:00+00:00", "Pending", "1"),
        sheet_row("LR-AAAAAAA2", "2024-02-02T12:00:00+00:00", "Approved", "2"),
        sheet_row("LR-AAAAAAA3", "2024-02-03T12:00:00+00:00", "Rejected", "3"),
        sheet_row("LR-AAAAAAA4", "2024-02-04T12:00:00+00:00", "approved", "4"),
        sheet_row("LR-AAAAAAA5", "2024-02-05T12:00:00+00:00", "", "5"),
        sheet_row("LR-AAAAAAA6", "2024-02-06T12:00:00+00:00", "On Hold", "6"),
    ];

    let stats = summarize(&rows, today());

    assert_eq!(stats.total, 6);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.rejected, 1);
}

#[test]
fn this_month_matches_month_and_year() {
    let rows = vec![
        sheet_row("LR-AAAAAAA1", "2024-02-15T12:00:00+00:00", "Pending", "1"),
        sheet_row("LR-AAAAAAA2", "2023-02-15T12:00:00+00:00", "Pending", "1"),
        sheet_row("LR-AAAAAAA3", "2024-01-15T12:00:00+00:00", "Pending", "1"),
        sheet_row("LR-AAAAAAA4", "2024-02-14 09:30:00", "Pending", "1"),
        sheet_row("LR-AAAAAAA5", "yesterday", "Pending", "1"),
    ];

    assert_eq!(summarize(&rows, today()).this_month, 2);
}

#[test]
fn total_leave_days_sums_stored_cells_verbatim() {
    // Stored day counts disagree with the dates on purpose.
    let rows = vec![
        sheet_row("LR-AAAAAAA1", "2024-02-15T12:00:00+00:00", "Pending", "10"),
        sheet_row("LR-AAAAAAA2", "2024-02-15T12:00:00+00:00", "Approved", "7"),
        sheet_row("LR-AAAAAAA3", "2024-02-15T12:00:00+00:00", "Approved", ""),
        sheet_row("LR-AAAAAAA4", "2024-02-15T12:00:00+00:00", "Approved", "2.0"),
        sheet_row("LR-AAAAAAA5", "2024-02-15T12:00:00+00:00", "Approved", "n/a"),
    ];

    assert_eq!(summarize(&rows, today()).total_leave_days, 19);
}

#[test]
fn total_leave_days_saturates_on_huge_cells() {
    let rows = vec![
        sheet_row("LR-AAAAAAA1", "2024-02-15T12:00:00+00:00", "Pending", "9223372036854775807"),
        sheet_row("LR-AAAAAAA2", "2024-02-15T12:00:00+00:00", "Pending", "1"),
        sheet_row("LR-AAAAAAA3", "2024-02-15T12:00:00+00:00", "Pending", "1e300"),
    ];

    let stats = summarize(&rows, today());

    assert_eq!(stats.total, 3);
    assert_eq!(stats.total_leave_days, i64::MAX);
}

#[test]
fn stored_leave_days_tolerates_odd_cells() {
    assert_eq!(stored_leave_days(" 4 "), 4);
    assert_eq!(stored_leave_days("3.9"), 3);
    assert_eq!(stored_leave_days(""), 0);
    assert_eq!(stored_leave_days("NaN"), 0);
}

#[test]
fn projection_fills_blank_id_and_status() {
    let rows = vec![
        sheet_row("LR-AAAAAAA1", "2024-02-15T12:00:00+00:00", "Approved", "3"),
        sheet_row("", "2024-02-16T12:00:00+00:00", "  ", "2"),
    ];

    let views = project_requests(&rows);

    assert_eq!(views.len(), 2);
    assert_eq!(views[0].id, "req-2");
    assert_eq!(views[0].status, "Pending");
    assert_eq!(views[1].id, "LR-AAAAAAA1");
    assert_eq!(views[1].status, "Approved");
    assert_eq!(views[1].leave_days, 3);
}

#[test]
fn projection_serializes_camel_case() {
    let rows = vec![sheet_row(
        "LR-AAAAAAA1",
        "2024-02-15T12:00:00+00:00",
        "Pending",
        "3",
    )];

    let json = serde_json::to_value(project_requests(&rows)).expect("views serialize");
    let view = &json[0];
    assert_eq!(view["leaveType"], "Annual Leave");
    assert_eq!(view["startDate"], "2024-02-01");
    assert_eq!(view["leaveDays"], 3);
    assert_eq!(view["hodApproval"], "");
}

#[test]
fn listing_does_not_mutate_the_store() {
    let rows = vec![
        sheet_row("", "2024-02-15T12:00:00+00:00", "", "3"),
        sheet_row("LR-AAAAAAA2", "2024-02-16T12:00:00+00:00", "Rejected", "1"),
    ];
    let store = Arc::new(MemoryStore::with_rows(rows.clone()));
    let service = LeaveRequestService::new(
        store.clone(),
        Arc::new(RecordingCalendar::default()),
        Arc::new(RecordingMailer::default()),
        leave_config(),
    );

    let views = service.list_requests().expect("list succeeds");
    let stats = service.compute_stats(today()).expect("stats succeed");

    assert_eq!(views[1].id, "req-1");
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.rejected, 1);
    assert_eq!(store.rows(), rows);
}
