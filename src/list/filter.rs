use std::collections::BTreeMap;

use super::Fielded;

#[derive(Debug, Clone, Eq, PartialEq)]
struct FilterSlot {
    field: String,
    value: String,
}

/// Exact-match filters keyed by name (`department`, `class`, `status`, ...).
///
/// Only the keys a screen offers exist in the set; a key with an empty value
/// is offered but inactive.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AttributeFilterSet {
    slots: BTreeMap<String, FilterSlot>,
}

impl AttributeFilterSet {
    /// Builds the set from `(key, field)` pairs, e.g. `("department", "departmentId")`.
    pub fn new<K: ToString, F: ToString>(offered: impl IntoIterator<Item = (K, F)>) -> Self {
        let slots = offered
            .into_iter()
            .map(|(key, field)| {
                (
                    key.to_string(),
                    FilterSlot {
                        field: field.to_string(),
                        value: String::new(),
                    },
                )
            })
            .collect();
        AttributeFilterSet { slots }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(|it| it.value.as_str())
    }

    /// Sets the value of an offered key. Keys the screen doesn't offer are
    /// ignored. Returns `true` if the set changed.
    pub fn set(&mut self, key: &str, value: impl ToString) -> bool {
        match self.slots.get_mut(key) {
            Some(slot) => {
                let value = value.to_string();
                if slot.value == value {
                    return false;
                }
                slot.value = value;
                true
            }
            None => {
                tracing::debug!("ignoring filter '{}', not offered by this list", key);
                false
            }
        }
    }

    /// Resets every offered key to an empty value.
    pub fn clear(&mut self) -> bool {
        let mut changed = false;
        for slot in self.slots.values_mut() {
            if !slot.value.is_empty() {
                slot.value.clear();
                changed = true;
            }
        }
        changed
    }

    pub fn is_active(&self) -> bool {
        self.slots.values().any(|it| !it.value.is_empty())
    }

    pub fn matches<T: Fielded>(&self, row: &T) -> bool {
        self.slots
            .values()
            .filter(|slot| !slot.value.is_empty())
            .all(|slot| {
                row.field(&slot.field)
                    .map(|it| it.equals(&slot.value))
                    .unwrap_or(false)
            })
    }

    pub fn apply<'a, T: Fielded + 'a>(&self, rows: impl IntoIterator<Item = &'a T>) -> Vec<&'a T> {
        rows.into_iter().filter(|row| self.matches(*row)).collect()
    }
}
