//! Display helpers shared by the views.

use downline_types::{AccountSnapshot, Address, Earnings, Grade};

/// Abbreviated address: `0x1234...abcd`.
pub fn short_address(address: Address) -> String {
    address.short()
}

/// Earnings in whole tokens with two decimals, e.g. `12.50`.
pub fn format_earnings(earnings: Earnings) -> String {
    earnings.to_string()
}

/// Grade name, e.g. `Emerald`.
pub const fn grade_label(grade: Grade) -> &'static str {
    grade.label()
}

/// Grade with level, e.g. `Gold L3`. Expired accounts are marked.
pub fn grade_badge(snapshot: &AccountSnapshot) -> String {
    if snapshot.is_expired() {
        format!("{} L{} (expired)", snapshot.grade.label(), snapshot.level)
    } else {
        format!("{} L{}", snapshot.grade.label(), snapshot.level)
    }
}

/// `count` followed by `noun`, pluralized with a trailing `s`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
