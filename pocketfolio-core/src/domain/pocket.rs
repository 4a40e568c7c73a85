//! Pocket — a named bucket of capital — and the ordered set of pockets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a pocket (e.g. `"pea"`).
pub type PocketKey = String;

/// Errors raised while assembling a pocket set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PocketError {
    #[error("pocket key must not be empty")]
    EmptyKey,

    #[error("duplicate pocket key '{0}'")]
    DuplicateKey(String),

    #[error("pocket '{key}': {field} must be a finite number")]
    NonFinite { key: String, field: &'static str },
}

/// A named bucket of capital with its own balance, contribution and expected return.
///
/// `monthly_contribution` may be zero or negative (withdrawals). Rates are
/// fractions: `0.06` is 6 % a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub key: PocketKey,
    pub label: String,
    pub initial_balance: f64,
    pub monthly_contribution: f64,
    pub expected_annual_return: f64,
}

impl Pocket {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        initial_balance: f64,
        monthly_contribution: f64,
        expected_annual_return: f64,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            initial_balance,
            monthly_contribution,
            expected_annual_return,
        }
    }

    /// Reject empty keys and non-finite numeric fields.
    pub fn validate(&self) -> Result<(), PocketError> {
        if self.key.trim().is_empty() {
            return Err(PocketError::EmptyKey);
        }
        let fields = [
            ("initial_balance", self.initial_balance),
            ("monthly_contribution", self.monthly_contribution),
            ("expected_annual_return", self.expected_annual_return),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(PocketError::NonFinite {
                    key: self.key.clone(),
                    field,
                });
            }
        }
        Ok(())
    }
}

/// Ordered mapping from key to pocket.
///
/// Declaration order is preserved; it drives allocation order and color
/// assignment. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pocket>", into = "Vec<Pocket>")]
pub struct PocketSet {
    pockets: Vec<Pocket>,
}

impl PocketSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pocket. Fails on an invalid pocket or a key already present.
    pub fn insert(&mut self, pocket: Pocket) -> Result<(), PocketError> {
        pocket.validate()?;
        if self.contains(&pocket.key) {
            return Err(PocketError::DuplicateKey(pocket.key));
        }
        self.pockets.push(pocket);
        Ok(())
    }

    /// Remove a pocket by key, returning it if it existed.
    pub fn remove(&mut self, key: &str) -> Option<Pocket> {
        let idx = self.pockets.iter().position(|p| p.key == key)?;
        Some(self.pockets.remove(idx))
    }

    pub fn get(&self, key: &str) -> Option<&Pocket> {
        self.pockets.iter().find(|p| p.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pocket> {
        self.pockets.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pockets.iter().map(|p| p.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.pockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pockets.is_empty()
    }

    /// Sum of monthly contributions across all pockets.
    pub fn total_monthly(&self) -> f64 {
        self.pockets.iter().map(|p| p.monthly_contribution).sum()
    }
}

impl TryFrom<Vec<Pocket>> for PocketSet {
    type Error = PocketError;

    fn try_from(pockets: Vec<Pocket>) -> Result<Self, Self::Error> {
        let mut set = PocketSet::new();
        for pocket in pockets {
            set.insert(pocket)?;
        }
        Ok(set)
    }
}

impl From<PocketSet> for Vec<Pocket> {
    fn from(set: PocketSet) -> Self {
        set.pockets
    }
}

impl<'a> IntoIterator for &'a PocketSet {
    type Item = &'a Pocket;
    type IntoIter = std::slice::Iter<'a, Pocket>;

    fn into_iter(self) -> Self::IntoIter {
        self.pockets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pea() -> Pocket {
        Pocket::new("pea", "PEA", 10_000.0, 200.0, 0.06)
    }

    #[test]
    fn insert_preserves_declaration_order() {
        let mut set = PocketSet::new();
        set.insert(Pocket::new("livret", "Livret", 5_000.0, 0.0, 0.03))
            .unwrap();
        set.insert(pea()).unwrap();
        set.insert(Pocket::new("cto", "CTO", 0.0, 100.0, 0.05))
            .unwrap();
        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, vec!["livret", "pea", "cto"]);
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut set = PocketSet::new();
        set.insert(pea()).unwrap();
        assert_eq!(
            set.insert(pea()),
            Err(PocketError::DuplicateKey("pea".into()))
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn non_finite_field_rejected() {
        let mut pocket = pea();
        pocket.monthly_contribution = f64::NAN;
        assert!(matches!(
            pocket.validate(),
            Err(PocketError::NonFinite {
                field: "monthly_contribution",
                ..
            })
        ));
    }

    #[test]
    fn blank_key_rejected() {
        let pocket = Pocket::new("  ", "Nameless", 0.0, 0.0, 0.0);
        assert_eq!(pocket.validate(), Err(PocketError::EmptyKey));
    }

    #[test]
    fn remove_returns_pocket() {
        let mut set = PocketSet::try_from(vec![pea()]).unwrap();
        let removed = set.remove("pea").unwrap();
        assert_eq!(removed.label, "PEA");
        assert!(set.is_empty());
        assert!(set.remove("pea").is_none());
    }

    #[test]
    fn negative_contribution_is_allowed() {
        let pocket = Pocket::new("livret", "Livret", 1_000.0, -50.0, 0.03);
        assert!(pocket.validate().is_ok());
    }

    #[test]
    fn deserialize_rejects_duplicates() {
        let json = r#"[
            {"key":"pea","label":"PEA","initial_balance":0.0,"monthly_contribution":0.0,"expected_annual_return":0.06},
            {"key":"pea","label":"PEA bis","initial_balance":0.0,"monthly_contribution":0.0,"expected_annual_return":0.06}
        ]"#;
        assert!(serde_json::from_str::<PocketSet>(json).is_err());
    }

    #[test]
    fn total_monthly_sums_all_pockets() {
        let set = PocketSet::try_from(vec![
            Pocket::new("a", "A", 0.0, 150.0, 0.0),
            Pocket::new("b", "B", 0.0, -50.0, 0.0),
        ])
        .unwrap();
        assert_eq!(set.total_monthly(), 100.0);
    }
}
