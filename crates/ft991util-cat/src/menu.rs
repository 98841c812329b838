//! The menu setting record model and the per-item value domain table.
//!
//! The FT-991 exposes 153 numbered menu items through the `EX` command.
//! Each item number maps to exactly one value domain; unknown item
//! numbers are rejected outright. The domain table is data, not code:
//! tightening an item's bounds (or marking it read-only) is an edit to
//! [`MENU_DOMAINS`], stamped with [`MENU_TABLE_REV`].
//!
//! The shipped revision pins down the items this utility must treat
//! specially (item 087, Radio ID, is read-only and must never be written
//! back) and gives the remaining items a conservative numeric domain
//! matching what the `EX` wire format can carry. The authoritative
//! per-item bounds come from the model's CAT reference and can be
//! tightened without touching any code.

use ft991util_core::error::FieldViolation;

/// Lowest valid menu item number.
pub const MENU_ITEM_MIN: u16 = 1;
/// Highest valid menu item number.
pub const MENU_ITEM_MAX: u16 = 153;

/// Revision stamp of the shipped menu domain table.
pub const MENU_TABLE_REV: &str = "ft991a-menu-r1";

/// Longest value the `EX` wire format carries for any item.
pub const MENU_VALUE_MAX_LEN: usize = 5;

/// Legal value domain of one menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDomain {
    /// A bounded integer selection (enumerated choices and numeric
    /// ranges both render as integers on the wire).
    Numeric {
        /// Smallest legal value.
        min: i32,
        /// Largest legal value.
        max: i32,
    },
    /// Backed up, never restored (the rig rejects writes).
    ReadOnly,
}

/// One contiguous run of menu items sharing a domain.
#[derive(Debug, Clone, Copy)]
struct DomainRange {
    first: u16,
    last: u16,
    domain: MenuDomain,
}

/// The menu domain table, covering every item 1..=153 exactly once.
const MENU_DOMAINS: &[DomainRange] = &[
    DomainRange {
        first: 1,
        last: 86,
        domain: MenuDomain::Numeric {
            min: -9999,
            max: 99999,
        },
    },
    // Item 087 is the Radio ID; the rig answers reads but rejects writes.
    DomainRange {
        first: 87,
        last: 87,
        domain: MenuDomain::ReadOnly,
    },
    DomainRange {
        first: 88,
        last: 153,
        domain: MenuDomain::Numeric {
            min: -9999,
            max: 99999,
        },
    },
];

/// The domain of `item`, or `None` for item numbers the device does not
/// have.
pub fn domain_of(item: u16) -> Option<MenuDomain> {
    MENU_DOMAINS
        .iter()
        .find(|r| item >= r.first && item <= r.last)
        .map(|r| r.domain)
}

/// One menu setting: an item number and the device's rendering of its
/// value.
///
/// The value keeps the exact wire digits (including zero padding) so a
/// backup restores byte-identically; `as_int` gives the numeric view
/// for domain checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSetting {
    /// Menu item number (1-153).
    pub item: u16,
    /// Value digits as carried on the wire.
    pub value: String,
}

impl MenuSetting {
    /// Create a setting without validating it; call
    /// [`validate`](MenuSetting::validate) before using it.
    pub fn new(item: u16, value: impl Into<String>) -> Self {
        MenuSetting {
            item,
            value: value.into(),
        }
    }

    /// The numeric value, if the digits parse.
    pub fn as_int(&self) -> Option<i32> {
        self.value.parse().ok()
    }

    /// Whether this item may be written back to the rig.
    pub fn is_writable(&self) -> bool {
        !matches!(domain_of(self.item), Some(MenuDomain::ReadOnly))
    }

    /// Validate the item number and value against the domain table.
    pub fn validate(&self) -> Result<(), FieldViolation> {
        let record = format!("menu item {}", self.item);

        let domain = match domain_of(self.item) {
            Some(domain) => domain,
            None => {
                return Err(FieldViolation::new(
                    record,
                    "item",
                    format!(
                        "not in the device's menu table \
                         ({MENU_ITEM_MIN}-{MENU_ITEM_MAX}, {MENU_TABLE_REV})"
                    ),
                ));
            }
        };

        if self.value.is_empty() || self.value.len() > MENU_VALUE_MAX_LEN {
            return Err(FieldViolation::new(
                record.as_str(),
                "value",
                format!(
                    "{:?} must be 1 to {MENU_VALUE_MAX_LEN} characters",
                    self.value
                ),
            ));
        }

        let digits_ok = self
            .value
            .strip_prefix('-')
            .unwrap_or(&self.value)
            .bytes()
            .all(|b| b.is_ascii_digit());
        if !digits_ok {
            return Err(FieldViolation::new(
                record.as_str(),
                "value",
                format!("{:?} is not a decimal number", self.value),
            ));
        }

        match domain {
            MenuDomain::Numeric { min, max } => {
                let n = self.as_int().ok_or_else(|| {
                    FieldViolation::new(
                        record.as_str(),
                        "value",
                        format!("{:?} is not a decimal number", self.value),
                    )
                })?;
                if n < min || n > max {
                    return Err(FieldViolation::new(
                        record.as_str(),
                        "value",
                        format!("{n} outside legal range {min}..={max}"),
                    ));
                }
            }
            // Read-only items carry whatever the rig reported.
            MenuDomain::ReadOnly => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_item_has_exactly_one_domain() {
        for item in MENU_ITEM_MIN..=MENU_ITEM_MAX {
            let covering = MENU_DOMAINS
                .iter()
                .filter(|r| item >= r.first && item <= r.last)
                .count();
            assert_eq!(covering, 1, "item {item} covered {covering} times");
        }
    }

    #[test]
    fn unknown_items_have_no_domain() {
        assert!(domain_of(0).is_none());
        assert!(domain_of(154).is_none());
        assert!(domain_of(999).is_none());
    }

    #[test]
    fn radio_id_is_read_only() {
        assert_eq!(domain_of(87), Some(MenuDomain::ReadOnly));
        assert!(!MenuSetting::new(87, "0570").is_writable());
        assert!(MenuSetting::new(86, "1").is_writable());
    }

    #[test]
    fn valid_setting_passes() {
        assert!(MenuSetting::new(31, "5").validate().is_ok());
        assert!(MenuSetting::new(153, "0").validate().is_ok());
        assert!(MenuSetting::new(62, "1500").validate().is_ok());
    }

    #[test]
    fn zero_padding_is_preserved() {
        let setting = MenuSetting::new(62, "0300");
        assert!(setting.validate().is_ok());
        assert_eq!(setting.value, "0300");
        assert_eq!(setting.as_int(), Some(300));
    }

    #[test]
    fn negative_value_passes() {
        assert!(MenuSetting::new(53, "-3000").validate().is_ok());
    }

    #[test]
    fn unknown_item_rejected() {
        let v = MenuSetting::new(154, "0").validate().unwrap_err();
        assert_eq!(v.field, "item");
        assert!(v.to_string().starts_with("menu item 154:"));
    }

    #[test]
    fn item_zero_rejected() {
        assert_eq!(MenuSetting::new(0, "0").validate().unwrap_err().field, "item");
    }

    #[test]
    fn empty_value_rejected() {
        assert_eq!(MenuSetting::new(10, "").validate().unwrap_err().field, "value");
    }

    #[test]
    fn oversized_value_rejected() {
        let v = MenuSetting::new(10, "123456").validate().unwrap_err();
        assert_eq!(v.field, "value");
    }

    #[test]
    fn non_numeric_value_rejected() {
        assert_eq!(
            MenuSetting::new(10, "12a").validate().unwrap_err().field,
            "value"
        );
        assert_eq!(
            MenuSetting::new(10, "--1").validate().unwrap_err().field,
            "value"
        );
    }

    #[test]
    fn read_only_value_accepted_as_reported() {
        assert!(MenuSetting::new(87, "0570").validate().is_ok());
    }
}
