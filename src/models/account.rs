//! Chart of accounts
//!
//! The chart is a fixed reference table compiled into the binary. It is never
//! persisted; journal entries refer to accounts by their stable code
//! (`acc_bank`, `acc_sales`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Accounting class of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

/// The side on which an account's balance increases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalSide {
    Debit,
    Credit,
}

impl AccountType {
    pub fn normal_side(&self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalSide::Credit,
        }
    }

    /// Balance movement produced by the given debit and credit totals
    pub fn balance_change(
        &self,
        debit: super::Money,
        credit: super::Money,
    ) -> super::Money {
        match self.normal_side() {
            NormalSide::Debit => debit - credit,
            NormalSide::Credit => credit - debit,
        }
    }

    /// Parse an account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "activo" => Some(Self::Asset),
            "liability" | "pasivo" => Some(Self::Liability),
            "equity" | "patrimonio" => Some(Self::Equity),
            "income" | "revenue" | "ingreso" => Some(Self::Income),
            "expense" | "gasto" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn all() -> [AccountType; 5] {
        [
            Self::Asset,
            Self::Liability,
            Self::Equity,
            Self::Income,
            Self::Expense,
        ]
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::Expense => "Expense",
        };
        f.pad(name)
    }
}

/// An entry of the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub description: &'static str,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

macro_rules! account {
    ($id:literal, $name:literal, $ty:ident, $desc:literal) => {
        Account {
            id: $id,
            name: $name,
            account_type: AccountType::$ty,
            description: $desc,
        }
    };
}

pub const CASH: &str = "acc_cash";
pub const BANK: &str = "acc_bank";
pub const VAT_CREDIT: &str = "acc_vat_credit";
pub const VAT_PAYABLE: &str = "acc_vat_payable";

/// Accounts that hold money on hand; the liquid balance is computed over them
pub const LIQUID_ACCOUNTS: [&str; 2] = [CASH, BANK];

static CHART: [Account; 26] = [
    account!("acc_cash", "Caja", Asset, "Cash on hand"),
    account!("acc_bank", "Banco", Asset, "Bank current and savings accounts"),
    account!("acc_receivables", "Deudores por ventas", Asset, "Amounts owed by clients"),
    account!("acc_inventory", "Mercaderías", Asset, "Goods held for sale"),
    account!("acc_vat_credit", "IVA crédito fiscal", Asset, "VAT paid on purchases"),
    account!("acc_tax_advances", "Anticipos de impuestos", Asset, "Withholdings and tax prepayments"),
    account!("acc_equipment", "Bienes de uso", Asset, "Furniture, equipment and vehicles"),
    account!("acc_payables", "Proveedores", Liability, "Amounts owed to suppliers"),
    account!("acc_vat_payable", "IVA débito fiscal", Liability, "VAT charged on sales"),
    account!("acc_taxes_payable", "Impuestos a pagar", Liability, "Other taxes owed"),
    account!("acc_salaries_payable", "Sueldos a pagar", Liability, "Wages and social charges owed"),
    account!("acc_loans", "Préstamos", Liability, "Bank and personal loans"),
    account!("acc_capital", "Capital", Equity, "Owner contributions"),
    account!("acc_retained", "Resultados acumulados", Equity, "Accumulated results of prior periods"),
    account!("acc_sales", "Ventas", Income, "Revenue from goods sold"),
    account!("acc_services", "Servicios prestados", Income, "Revenue from services"),
    account!("acc_other_income", "Otros ingresos", Income, "Interest and other income"),
    account!("acc_cogs", "Costo de mercaderías vendidas", Expense, "Cost of goods sold"),
    account!("acc_rent", "Alquileres", Expense, "Premises rent"),
    account!("acc_salaries", "Sueldos y cargas", Expense, "Wages and social charges"),
    account!("acc_utilities", "Servicios públicos", Expense, "Electricity, gas, water, internet"),
    account!("acc_supplies", "Insumos", Expense, "Consumables and office supplies"),
    account!("acc_marketing", "Publicidad", Expense, "Advertising and marketing"),
    account!("acc_bank_fees", "Gastos bancarios", Expense, "Bank fees and commissions"),
    account!("acc_taxes", "Impuestos y tasas", Expense, "Taxes recognised as expense"),
    account!("acc_other_expense", "Otros gastos", Expense, "Miscellaneous expenses"),
];

/// The full chart of accounts, in display order
pub fn chart_of_accounts() -> &'static [Account] {
    &CHART
}

/// Look up an account by code
pub fn find_account(id: &str) -> Option<&'static Account> {
    CHART.iter().find(|a| a.id == id)
}

/// Look up an account by code or (case-insensitive) name
pub fn resolve_account(identifier: &str) -> Option<&'static Account> {
    let identifier = identifier.trim();
    find_account(identifier).or_else(|| {
        let lower = identifier.to_lowercase();
        CHART
            .iter()
            .find(|a| a.name.to_lowercase() == lower || a.id.trim_start_matches("acc_") == lower)
    })
}

/// Type of the account with this code, if it exists
pub fn account_type_of(id: &str) -> Option<AccountType> {
    find_account(id).map(|a| a.account_type)
}

pub fn is_liquid(id: &str) -> bool {
    LIQUID_ACCOUNTS.contains(&id)
}

/// The chart rendered as the context string handed to the assistant
pub fn chart_context() -> String {
    let mut out = String::from("Chart of accounts (id | name | type):\n");
    for account in CHART.iter() {
        out.push_str(&format!(
            "{} | {} | {}\n",
            account.id, account.name, account.account_type
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::collections::HashSet;

    #[test]
    fn test_chart_ids_are_unique() {
        let ids: HashSet<_> = chart_of_accounts().iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), chart_of_accounts().len());
    }

    #[test]
    fn test_liquid_accounts_are_assets() {
        for id in LIQUID_ACCOUNTS {
            assert_eq!(account_type_of(id), Some(AccountType::Asset));
        }
        assert!(is_liquid("acc_bank"));
        assert!(!is_liquid("acc_receivables"));
    }

    #[test]
    fn test_resolve_by_name_or_short_code() {
        assert_eq!(resolve_account("acc_sales").unwrap().id, "acc_sales");
        assert_eq!(resolve_account("ventas").unwrap().id, "acc_sales");
        assert_eq!(resolve_account("bank").unwrap().id, "acc_bank");
        assert!(resolve_account("nope").is_none());
    }

    #[test]
    fn test_balance_change_by_normal_side() {
        let d = Money::from_units(100);
        let c = Money::from_units(30);
        assert_eq!(AccountType::Asset.balance_change(d, c), Money::from_units(70));
        assert_eq!(AccountType::Expense.balance_change(d, c), Money::from_units(70));
        assert_eq!(AccountType::Income.balance_change(d, c), Money::from_units(-70));
        assert_eq!(AccountType::Liability.normal_side(), NormalSide::Credit);
    }

    #[test]
    fn test_account_type_parse() {
        assert_eq!(AccountType::parse("Expense"), Some(AccountType::Expense));
        assert_eq!(AccountType::parse("pasivo"), Some(AccountType::Liability));
        assert_eq!(AccountType::parse("other"), None);
    }

    #[test]
    fn test_chart_context_lists_every_account() {
        let context = chart_context();
        for account in chart_of_accounts() {
            assert!(context.contains(account.id));
        }
    }
}
