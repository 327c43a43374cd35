//! Dashboard CLI command

use crate::config::settings::Settings;
use crate::display::{format_dashboard, format_trend};
use crate::error::LibroResult;
use crate::services::DashboardService;
use crate::storage::Storage;

use super::args::{parse_month_or_current, today};

/// Print the month summary and, when asked, the income/expense trend
pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    month: Option<&str>,
    trend: Option<usize>,
) -> LibroResult<()> {
    let month = parse_month_or_current(month)?;
    let service = DashboardService::new(storage);

    let summary = service.summary(month, today(), settings.upcoming_days)?;
    print!("{}", format_dashboard(&summary, &settings.business_name));

    if let Some(months) = trend {
        println!();
        print!("{}", format_trend(&service.trend(month, months.max(1))?));
    }

    Ok(())
}
