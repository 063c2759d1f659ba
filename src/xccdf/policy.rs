//! Policy: evaluates effective selection and values of benchmark items under
//! a profile.
//!
//! Selection is answered from the policy's working Select set (seeded from the
//! profile, extended through `add_select`), values from the profile's SetValue
//! overrides. Both fall back to the document defaults. Nothing is cached, so a
//! freshly added override is visible to the very next query.

use super::{Benchmark, Profile};
use crate::error::{Result, TailoringError};
use crate::models::{ItemType, Select};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Policy {
    benchmark: Rc<Benchmark>,
    profile: Option<Profile>,
    selects: Vec<Select>,
}

impl Policy {
    pub fn new(benchmark: Rc<Benchmark>, profile: Profile) -> Self {
        let selects = profile.selects().to_vec();
        Policy {
            benchmark,
            profile: Some(profile),
            selects,
        }
    }

    /// Policy evaluating plain document defaults, with no profile attached
    pub fn without_profile(benchmark: Rc<Benchmark>) -> Self {
        Policy {
            benchmark,
            profile: None,
            selects: Vec::new(),
        }
    }

    pub fn benchmark(&self) -> &Rc<Benchmark> {
        &self.benchmark
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn profile_mut(&mut self) -> Option<&mut Profile> {
        self.profile.as_mut()
    }

    pub fn add_select(&mut self, select: Select) {
        self.selects.push(select);
    }

    /// Effective selection of an item.
    pub fn is_selected(&self, item: &str) -> Result<bool> {
        let doc_item = self.benchmark.item(item)?;
        Ok(self
            .selects
            .iter()
            .rev()
            .find(|s| s.item == item)
            .map(|s| s.selected)
            .unwrap_or(doc_item.selected))
    }

    /// Effective value of a Value item.
    pub fn value_of(&self, item: &str) -> Result<String> {
        let doc_item = self.benchmark.item(item)?;
        if doc_item.kind != ItemType::Value {
            return Err(TailoringError::WrongItemType {
                item: item.to_string(),
                expected: ItemType::Value.as_str(),
                actual: doc_item.kind.as_str(),
            });
        }
        let overridden = self
            .profile
            .as_ref()
            .and_then(|p| p.setvalue_for(item))
            .map(|s| s.value.clone());
        Ok(overridden.unwrap_or_else(|| doc_item.default_value().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SetValue, TextSet, ValueType};

    fn fixture() -> Rc<Benchmark> {
        let t = |s: &str| TextSet::single("en-US", s);
        let mut b = Benchmark::new("bench", t("Bench"));
        b.add_rule("bench", "r1", t("Rule")).unwrap();
        b.set_default_selected("r1", false).unwrap();
        b.add_value("bench", "v1", t("Value"), ValueType::Number).unwrap();
        b.add_instance("v1", None, "30").unwrap();
        Rc::new(b)
    }

    #[test]
    fn test_defaults_without_overrides() {
        let policy = Policy::without_profile(fixture());
        assert!(!policy.is_selected("r1").unwrap());
        assert!(policy.is_selected("bench").unwrap());
        assert_eq!(policy.value_of("v1").unwrap(), "30");
        assert!(policy.profile().is_none());
    }

    #[test]
    fn test_latest_select_wins() {
        let mut profile = Profile::new("p", TextSet::new(), TextSet::new());
        profile.add_select(Select::new("r1", true));
        let mut policy = Policy::new(fixture(), profile);
        assert!(policy.is_selected("r1").unwrap());
        policy.add_select(Select::new("r1", false));
        assert!(!policy.is_selected("r1").unwrap());
    }

    #[test]
    fn test_setvalue_is_read_from_profile() {
        let mut policy = Policy::new(fixture(), Profile::new("p", TextSet::new(), TextSet::new()));
        policy
            .profile_mut()
            .unwrap()
            .add_setvalue(SetValue::new("v1", "60"));
        assert_eq!(policy.value_of("v1").unwrap(), "60");
    }

    #[test]
    fn test_unknown_and_wrong_items() {
        let policy = Policy::without_profile(fixture());
        assert_eq!(
            policy.is_selected("nope"),
            Err(TailoringError::UnknownItem("nope".to_string()))
        );
        assert!(matches!(
            policy.value_of("r1"),
            Err(TailoringError::WrongItemType { .. })
        ));
    }
}
