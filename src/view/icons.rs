// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const DEFAULT_ICON: &str = "💳";

static ICONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ATM Fee", "🏧"),
        ("Business", "💼"),
        ("Cash Withdrawal", "💳"),
        ("Clothing", "👚"),
        ("Dining Out", "🍽️"),
        ("Education", "🎓"),
        ("Entertainment", "🎭"),
        ("Fuel", "⛽"),
        ("General", "📦"),
        ("Gifts & Donations", "🎁"),
        ("Groceries", "🛒"),
        ("Health & Fitness", "💪"),
        ("Home Maintenance", "🛠️"),
        ("Insurance", "🛡️"),
        ("Internet", "🌐"),
        ("Investments", "💹"),
        ("Kids", "🧸"),
        ("Miscellaneous", "✨"),
        ("Mobile Phone", "📱"),
        ("Personal Care", "🧴"),
        ("Pets", "🐾"),
        ("Rent", "🏠"),
        ("Revolut", "💳"),
        ("Savings", "💰"),
        ("Shopping", "🛍️"),
        ("Streaming Services", "📺"),
        ("Subscriptions", "🔄"),
        ("Taxes", "🧾"),
        ("Transportation", "🚗"),
        ("Travel", "✈️"),
        ("Utilities", "💡"),
    ])
});

/// Glyph for a category or title; unknown or missing names get [`DEFAULT_ICON`].
pub fn icon_for(name: Option<&str>) -> &'static str {
    name.and_then(|n| ICONS.get(n).copied())
        .unwrap_or(DEFAULT_ICON)
}
