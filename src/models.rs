// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// The signed-in state. Only `auth` looks inside; everything else checks
/// presence and reads the owner id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    pub started_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: i64,
    pub code: String,
    pub is_main: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    CreditCard,
    Investment,
    Loan,
    Cash,
    Other,
}

impl AccountType {
    pub const ALL: [&'static str; 7] = [
        "checking",
        "savings",
        "credit_card",
        "investment",
        "loan",
        "cash",
        "other",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::CreditCard => "credit_card",
            AccountType::Investment => "investment",
            AccountType::Loan => "loan",
            AccountType::Cash => "cash",
            AccountType::Other => "other",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            "credit_card" => Ok(AccountType::CreditCard),
            "investment" => Ok(AccountType::Investment),
            "loan" => Ok(AccountType::Loan),
            "cash" => Ok(AccountType::Cash),
            "other" => Ok(AccountType::Other),
            other => Err(LedgerError::validation(format!(
                "Unknown account type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub r#type: AccountType,
    pub currency: String,
    pub starting_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub r#type: AccountType,
    pub starting_balance: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub r#type: Option<AccountType>,
    pub starting_balance: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

impl Category {
    pub fn is_group(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Parent selection as it arrives from a form: the literal `None` (any case)
/// or an empty string means "top-level group".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    None,
    Group(i64),
}

impl ParentRef {
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let s = raw.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(ParentRef::None);
        }
        s.parse::<i64>()
            .map(ParentRef::Group)
            .map_err(|_| LedgerError::validation(format!("Invalid parent id '{}'", s)))
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            ParentRef::None => None,
            ParentRef::Group(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub parent: Option<ParentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount_original: Decimal,
    pub currency_original: String,
    pub exchange_rate: Decimal,
    pub amount_home: Decimal,
    pub account_id: i64,
    pub category_id: i64,
    pub transfer_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount_original: Decimal,
    pub account_id: i64,
    pub category_id: i64,
    pub exchange_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub amount_original: Option<Decimal>,
    pub exchange_rate: Option<Decimal>,
}

/// Transaction joined with the names a listing needs.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRow {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub account_name: String,
    pub account_currency: String,
    pub category_name: String,
    pub category_parent_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<i64>,
    pub category_id: Option<i64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CreateTransfer {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub category_id: i64,
}

/// Both legs of a stored transfer.
#[derive(Debug, Clone, Serialize)]
pub struct Transfer {
    pub id: i64,
    pub debit: Transaction,
    pub credit: Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxRate {
    pub date: NaiveDate,
    pub base: String,
    pub quote: String,
    pub rate: Decimal,
}

/// One row of the management overview. The `kind` tag replaces guessing the
/// entity from which fields happen to be present.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManagedItem {
    Account(Account),
    Group(Category),
    Category(Category),
    Currency(Currency),
}

impl ManagedItem {
    pub fn kind(&self) -> &'static str {
        match self {
            ManagedItem::Account(_) => "account",
            ManagedItem::Group(_) => "group",
            ManagedItem::Category(_) => "category",
            ManagedItem::Currency(_) => "currency",
        }
    }

    pub fn label(&self) -> String {
        match self {
            ManagedItem::Account(a) => format!("{} ({})", a.name, a.currency),
            ManagedItem::Group(c) => c.name.clone(),
            ManagedItem::Category(c) => format!("  - {}", c.name),
            ManagedItem::Currency(c) if c.is_main => format!("{} (main)", c.code),
            ManagedItem::Currency(c) => c.code.clone(),
        }
    }
}
