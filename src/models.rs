// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Budget key that applies to total monthly spend across all categories.
pub const OVERALL: &str = "overall";

/// Most recent notifications kept; older ones are evicted on insert.
pub const NOTIFICATION_CAP: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub merchant: String,
    /// Stored verbatim; unknown names are displayed as `Other`.
    #[serde(default)]
    pub category: String,
    /// Negative = spending, positive = income or refund.
    pub amount: Decimal,
    #[serde(default = "default_currency_code")]
    pub currency: String,
    pub timestamp: String,
}

impl Transaction {
    /// Category used for grouping, `Other` when none was recorded.
    pub fn category_or_other(&self) -> &str {
        if self.category.is_empty() {
            Category::Other.label()
        } else {
            &self.category
        }
    }
}

fn default_currency_code() -> String {
    Currency::Usd.code().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Info => f.write_str("info"),
            NotificationKind::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
}

/// Category name (or [`OVERALL`]) to monthly threshold. Values `<= 0` are inactive.
pub type BudgetMap = BTreeMap<String, Decimal>;

/// Threshold for `key` if one is active.
pub fn active_budget(budgets: &BudgetMap, key: &str) -> Option<Decimal> {
    budgets.get(key).copied().filter(|v| *v > Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Subscriptions,
    Travel,
    Accommodation,
    Entertainment,
    Health,
    Bills,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Subscriptions,
        Category::Travel,
        Category::Accommodation,
        Category::Entertainment,
        Category::Health,
        Category::Bills,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Subscriptions => "Subscriptions",
            Category::Travel => "Travel",
            Category::Accommodation => "Accommodation",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Category::Food => "#ff6b6b",
            Category::Transport => "#4ecdc4",
            Category::Shopping => "#95e1d3",
            Category::Subscriptions => "#f38181",
            Category::Travel => "#a8e6cf",
            Category::Accommodation => "#ffd3a5",
            Category::Entertainment => "#fd9853",
            Category::Health => "#a8dadc",
            Category::Bills => "#ffaaa5",
            Category::Other => "#9ca3af",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Category::Food => "🍔",
            Category::Transport => "🚗",
            Category::Shopping => "🛍️",
            Category::Subscriptions => "📱",
            Category::Travel => "✈️",
            Category::Accommodation => "🏨",
            Category::Entertainment => "🎬",
            Category::Health => "🏥",
            Category::Bills => "📄",
            Category::Other => "📦",
        }
    }

    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == name)
    }

    /// Presentation for a stored category name; unknown names borrow `Other`'s styling.
    pub fn display(name: &str) -> String {
        let style = Category::from_name(name).unwrap_or(Category::Other);
        format!("{} {}", style.emoji(), name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Ils,
    Jpy,
    Cad,
    Aud,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Ils,
        Currency::Jpy,
        Currency::Cad,
        Currency::Aud,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Ils => "ILS",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Ils => "₪",
            Currency::Jpy => "¥",
            Currency::Cad => "C$",
            Currency::Aud => "A$",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
            Currency::Ils => "Israeli Shekel",
            Currency::Jpy => "Japanese Yen",
            Currency::Cad => "Canadian Dollar",
            Currency::Aud => "Australian Dollar",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| format!("Unknown currency '{}'", s))
    }
}
