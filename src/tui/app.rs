//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.

use chrono::NaiveDate;

use crate::config::paths::LibroPaths;
use crate::config::settings::Settings;
use crate::models::YearMonth;
use crate::storage::Storage;

/// Top-level tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Journal,
    CashFlow,
    Budget,
    Partners,
    Taxes,
    Inventory,
    Reports,
    Education,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 10] = [
        Tab::Dashboard,
        Tab::Journal,
        Tab::CashFlow,
        Tab::Budget,
        Tab::Partners,
        Tab::Taxes,
        Tab::Inventory,
        Tab::Reports,
        Tab::Education,
        Tab::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Journal => "Journal",
            Tab::CashFlow => "Cash Flow",
            Tab::Budget => "Budget",
            Tab::Partners => "Partners",
            Tab::Taxes => "Taxes",
            Tab::Inventory => "Inventory",
            Tab::Reports => "Reports",
            Tab::Education => "Education",
            Tab::Settings => "Settings",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    /// Tab bound to a number key; `0` is the tenth tab
    pub fn from_digit(digit: u32) -> Option<Tab> {
        match digit {
            0 => Some(Tab::Settings),
            d => Self::ALL.get(d as usize - 1).copied(),
        }
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Statement shown on the Reports tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    #[default]
    IncomeStatement,
    BalanceSheet,
    TrialBalance,
    BudgetOverview,
}

impl ReportKind {
    pub fn next(&self) -> ReportKind {
        match self {
            ReportKind::IncomeStatement => ReportKind::BalanceSheet,
            ReportKind::BalanceSheet => ReportKind::TrialBalance,
            ReportKind::TrialBalance => ReportKind::BudgetOverview,
            ReportKind::BudgetOverview => ReportKind::IncomeStatement,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::IncomeStatement => "Income Statement",
            ReportKind::BalanceSheet => "Balance Sheet",
            ReportKind::TrialBalance => "Trial Balance",
            ReportKind::BudgetOverview => "Budget Overview",
        }
    }
}

/// Main application state
pub struct App<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    pub paths: &'a LibroPaths,

    pub should_quit: bool,

    pub active_tab: Tab,

    /// Month shown by the month-based tabs
    pub month: YearMonth,

    /// Reference date for overdue and upcoming checks
    pub today: NaiveDate,

    /// First visible row of the active tab
    pub scroll: usize,

    pub report: ReportKind,

    pub show_help: bool,

    /// Status message to display
    pub status_message: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings, paths: &'a LibroPaths, today: NaiveDate) -> Self {
        Self {
            storage,
            settings,
            paths,
            should_quit: false,
            active_tab: Tab::default(),
            month: YearMonth::of(today),
            today,
            scroll: 0,
            report: ReportKind::default(),
            show_help: false,
            status_message: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Switch tabs; the new tab starts at the top
    pub fn switch_tab(&mut self, tab: Tab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.scroll = 0;
        }
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_add(rows);
    }

    pub fn prev_month(&mut self) {
        self.month = self.month.prev();
        self.scroll = 0;
    }

    pub fn next_month(&mut self) {
        self.month = self.month.next();
        self.scroll = 0;
    }

    pub fn current_month(&mut self) {
        self.month = YearMonth::of(self.today);
        self.scroll = 0;
    }
}
