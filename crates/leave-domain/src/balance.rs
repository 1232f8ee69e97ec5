//! Leave types, balances, and employee classification.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Annual paid-leave entitlement for a full year of service.
pub const FULL_PL: u32 = 24;
/// Annual casual-leave entitlement for a full year of service.
pub const FULL_CL: u32 = 8;
/// Restricted holidays per year; never prorated.
pub const RH_CAP: u32 = 2;

const UNSET_CODE: i32 = -1;
const EXISTING_CODE: i32 = -99;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeaveType {
    #[serde(rename = "PL")]
    Paid,
    #[serde(rename = "CL")]
    Casual,
    #[serde(rename = "RH")]
    Restricted,
}

impl LeaveType {
    pub const ALL: [LeaveType; 3] = [LeaveType::Paid, LeaveType::Casual, LeaveType::Restricted];

    pub fn code(self) -> &'static str {
        match self {
            LeaveType::Paid => "PL",
            LeaveType::Casual => "CL",
            LeaveType::Restricted => "RH",
        }
    }

    /// True when weekend days inside the span are charged.
    pub fn counts_weekends(self) -> bool {
        matches!(self, LeaveType::Paid)
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LeaveType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PL" => Ok(LeaveType::Paid),
            "CL" => Ok(LeaveType::Casual),
            "RH" => Ok(LeaveType::Restricted),
            other => Err(format!("unknown leave type `{other}` (expected PL, CL or RH)")),
        }
    }
}

/// Remaining days per leave type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LeaveBalance {
    pub pl: u32,
    pub cl: u32,
    pub rh: u32,
}

impl LeaveBalance {
    pub const fn new(pl: u32, cl: u32, rh: u32) -> Self {
        Self { pl, cl, rh }
    }

    /// The balance a fresh profile starts with.
    pub const fn full() -> Self {
        Self::new(FULL_PL, FULL_CL, RH_CAP)
    }

    pub fn available(&self, leave_type: LeaveType) -> u32 {
        match leave_type {
            LeaveType::Paid => self.pl,
            LeaveType::Casual => self.cl,
            LeaveType::Restricted => self.rh,
        }
    }

    pub fn covers(&self, leave_type: LeaveType, days: u32) -> bool {
        self.available(leave_type) >= days
    }

    /// Subtracts `days` from one field. Callers check [`LeaveBalance::covers`] first.
    pub fn debit(&mut self, leave_type: LeaveType, days: u32) {
        let slot = self.slot_mut(leave_type);
        *slot = slot.saturating_sub(days);
    }

    /// Field-wise subtraction floored at zero.
    pub fn saturating_sub(&self, other: &LeaveBalance) -> LeaveBalance {
        LeaveBalance {
            pl: self.pl.saturating_sub(other.pl),
            cl: self.cl.saturating_sub(other.cl),
            rh: self.rh.saturating_sub(other.rh),
        }
    }

    pub fn total(&self) -> u32 {
        self.pl + self.cl + self.rh
    }

    fn slot_mut(&mut self, leave_type: LeaveType) -> &mut u32 {
        match leave_type {
            LeaveType::Paid => &mut self.pl,
            LeaveType::Casual => &mut self.cl,
            LeaveType::Restricted => &mut self.rh,
        }
    }
}

impl fmt::Display for LeaveBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PL {} | CL {} | RH {}", self.pl, self.cl, self.rh)
    }
}

/// How the employee's yearly entitlement is derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmployeeClass {
    #[default]
    Unset,
    /// Joined this year; `month` is zero-based (0 = January).
    NewJoiner { month: u8 },
    Existing,
}

impl EmployeeClass {
    /// Validated constructor for a new joiner.
    pub fn new_joiner(month: u8) -> Option<Self> {
        (month <= 11).then_some(EmployeeClass::NewJoiner { month })
    }

    /// Decodes the persisted `joiningMonth` integer (`-1`, `0..=11`, `-99`).
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            UNSET_CODE => Some(EmployeeClass::Unset),
            EXISTING_CODE => Some(EmployeeClass::Existing),
            0..=11 => Some(EmployeeClass::NewJoiner { month: code as u8 }),
            _ => None,
        }
    }

    /// Encodes the classification as the persisted `joiningMonth` integer.
    pub fn code(self) -> i32 {
        match self {
            EmployeeClass::Unset => UNSET_CODE,
            EmployeeClass::Existing => EXISTING_CODE,
            EmployeeClass::NewJoiner { month } => month as i32,
        }
    }

    pub fn is_configured(self) -> bool {
        !matches!(self, EmployeeClass::Unset)
    }

    /// Full-year entitlement for this classification; `None` when unset.
    pub fn entitlement(self) -> Option<LeaveBalance> {
        match self {
            EmployeeClass::Unset => None,
            EmployeeClass::Existing => Some(LeaveBalance::full()),
            EmployeeClass::NewJoiner { month } => {
                let eligible_months = 12i64 - (month as i64 + 1);
                let pl = (eligible_months * 2).max(0) as u32;
                let cl = (eligible_months * FULL_CL as i64 / 12).max(0) as u32;
                Some(LeaveBalance::new(pl, cl, RH_CAP))
            }
        }
    }
}

impl fmt::Display for EmployeeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeClass::Unset => f.write_str("not configured"),
            EmployeeClass::Existing => f.write_str("existing employee"),
            EmployeeClass::NewJoiner { month } => {
                write!(f, "new joiner ({})", MONTH_NAMES[*month as usize % 12])
            }
        }
    }
}

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Resolves a month name, three-letter abbreviation, or 1-based number to a zero-based index.
pub fn month_index(value: &str) -> Option<u8> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<u8>() {
        return (1..=12).contains(&number).then(|| number - 1);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.to_ascii_lowercase().starts_with(&lower))
        .map(|idx| idx as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_joiner_entitlement_is_prorated() {
        let march = EmployeeClass::new_joiner(2).unwrap();
        assert_eq!(march.entitlement(), Some(LeaveBalance::new(18, 6, 2)));

        let january = EmployeeClass::new_joiner(0).unwrap();
        assert_eq!(january.entitlement(), Some(LeaveBalance::new(22, 7, 2)));

        let december = EmployeeClass::new_joiner(11).unwrap();
        assert_eq!(december.entitlement(), Some(LeaveBalance::new(0, 0, 2)));

        assert!(EmployeeClass::new_joiner(12).is_none());
    }

    #[test]
    fn prorating_matches_formula_for_every_month() {
        for month in 0u8..=11 {
            let eligible = 12 - (month as u32 + 1);
            let expected = LeaveBalance::new(eligible * 2, eligible * 8 / 12, 2);
            assert_eq!(
                EmployeeClass::NewJoiner { month }.entitlement(),
                Some(expected),
                "month index {month}"
            );
        }
    }

    #[test]
    fn legacy_codes_round_trip() {
        assert_eq!(EmployeeClass::from_code(-1), Some(EmployeeClass::Unset));
        assert_eq!(EmployeeClass::from_code(-99), Some(EmployeeClass::Existing));
        assert_eq!(
            EmployeeClass::from_code(4),
            Some(EmployeeClass::NewJoiner { month: 4 })
        );
        assert_eq!(EmployeeClass::from_code(12), None);
        assert_eq!(EmployeeClass::Existing.code(), -99);
        assert_eq!(EmployeeClass::Unset.entitlement(), None);
    }

    #[test]
    fn balance_debit_and_lookup() {
        let mut balance = LeaveBalance::new(10, 5, 2);
        assert!(balance.covers(LeaveType::Casual, 5));
        assert!(!balance.covers(LeaveType::Casual, 6));
        balance.debit(LeaveType::Casual, 5);
        assert_eq!(balance, LeaveBalance::new(10, 0, 2));
        assert_eq!("rh".parse::<LeaveType>(), Ok(LeaveType::Restricted));
        assert!("XL".parse::<LeaveType>().is_err());
    }

    #[test]
    fn month_names_resolve() {
        assert_eq!(month_index("March"), Some(2));
        assert_eq!(month_index("mar"), Some(2));
        assert_eq!(month_index("3"), Some(2));
        assert_eq!(month_index("13"), None);
        assert_eq!(month_index("ju"), None);
    }
}
