use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use leave_desk::config::AppConfig;
use leave_desk::error::AppError;
use leave_desk::workflows::leave::query::{project_requests, summarize};
use leave_desk::workflows::leave::{
    CsvLeaveStore, LeaveRequestView, LeaveSheetRow, LeaveStats, LeaveStore,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// CSV leave register to read (defaults to LEAVE_STORE_PATH)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Only show the most recent N requests
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    /// CSV leave register to read (defaults to LEAVE_STORE_PATH)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Date deciding the current month (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

fn load_rows(store: Option<PathBuf>) -> Result<Vec<LeaveSheetRow>, AppError> {
    let path = match store {
        Some(path) => path,
        None => AppConfig::load()?.store.csv_path,
    };
    let store = CsvLeaveStore::open(path)?;
    Ok(store.read_all()?)
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let rows = load_rows(args.store)?;
    let mut views = project_requests(&rows);
    if let Some(limit) = args.limit {
        views.truncate(limit);
    }
    print!("{}", render_requests(&views));
    Ok(())
}

pub(crate) fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let rows = load_rows(args.store)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    print!("{}", render_stats(&summarize(&rows, today), today));
    Ok(())
}

pub(crate) fn render_requests(views: &[LeaveRequestView]) -> String {
    if views.is_empty() {
        return "No leave requests recorded\n".to_string();
    }

    let mut output = String::from("Leave requests (newest first)\n");
    for view in views {
        output.push_str(&format!(
            "- {} | {} | {} | {} | {} -> {} ({} day(s)) | {}\n",
            view.id,
            view.name,
            view.department,
            view.leave_type,
            view.start_date,
            view.end_date,
            view.leave_days,
            view.status
        ));
    }
    output
}

pub(crate) fn render_stats(stats: &LeaveStats, today: NaiveDate) -> String {
    format!(
        "Leave register summary ({})\n\
         - Total requests: {}\n\
         - Pending: {}\n\
         - Approved: {}\n\
         - Rejected: {}\n\
         - Submitted this month: {}\n\
         - Total leave days: {}\n",
        today.format("%B %Y"),
        stats.total,
        stats.pending,
        stats.approved,
        stats.rejected,
        stats.this_month,
        stats.total_leave_days
    )
}
