//! Trigger character bindings
//!
//! Condition-style fields bind `#` to tags and `$` to variables, while function
//! argument fields bind `#` to both domains behind a toggle. The two conventions
//! are kept side by side as separate maps rather than unified.

use std::collections::BTreeMap;

use crate::domain::reference::ReferenceDomain;
use crate::domain::DomainError;

/// Domains reachable through one trigger character.
///
/// The first domain is the default; more than one domain enables the toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerBinding {
    domains: Vec<ReferenceDomain>,
}

impl TriggerBinding {
    pub fn new(domains: Vec<ReferenceDomain>) -> Result<Self, DomainError> {
        if domains.is_empty() {
            return Err(DomainError::configuration(
                "Trigger binding must allow at least one domain",
            ));
        }

        let mut unique = Vec::with_capacity(domains.len());
        for domain in domains {
            if !unique.contains(&domain) {
                unique.push(domain);
            }
        }

        Ok(Self { domains: unique })
    }

    fn single(domain: ReferenceDomain) -> Self {
        Self {
            domains: vec![domain],
        }
    }

    pub fn domains(&self) -> &[ReferenceDomain] {
        &self.domains
    }

    pub fn default_domain(&self) -> ReferenceDomain {
        self.domains[0]
    }

    pub fn allows(&self, domain: ReferenceDomain) -> bool {
        self.domains.contains(&domain)
    }

    pub fn has_toggle(&self) -> bool {
        self.domains.len() > 1
    }

    /// Domain after `current` in cycle order
    pub fn next_after(&self, current: ReferenceDomain) -> ReferenceDomain {
        match self.domains.iter().position(|d| *d == current) {
            Some(i) => self.domains[(i + 1) % self.domains.len()],
            None => self.default_domain(),
        }
    }
}

/// Ordered mapping of trigger characters to the domains they open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMap {
    bindings: Vec<(char, TriggerBinding)>,
}

impl TriggerMap {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// `#` for tags, `$` for variables
    pub fn split() -> Self {
        Self::new()
            .with_binding('#', TriggerBinding::single(ReferenceDomain::Tag))
            .with_binding('$', TriggerBinding::single(ReferenceDomain::Variable))
    }

    /// `#` for variables and tags, switchable from the popup
    pub fn toggle() -> Self {
        Self::new().with_binding(
            '#',
            TriggerBinding {
                domains: vec![ReferenceDomain::Variable, ReferenceDomain::Tag],
            },
        )
    }

    /// `#` for variables only
    pub fn variables_only() -> Self {
        Self::new().with_binding('#', TriggerBinding::single(ReferenceDomain::Variable))
    }

    /// Add or replace the binding for a trigger
    pub fn with_binding(mut self, trigger: char, binding: TriggerBinding) -> Self {
        match self.bindings.iter_mut().find(|(t, _)| *t == trigger) {
            Some(existing) => existing.1 = binding,
            None => self.bindings.push((trigger, binding)),
        }
        self
    }

    /// Build a map from configuration entries such as `{"#": ["tag"]}`
    pub fn from_config(entries: &BTreeMap<String, Vec<String>>) -> Result<Self, DomainError> {
        let mut map = Self::new();

        for (key, domains) in entries {
            let mut chars = key.chars();
            let trigger = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(DomainError::configuration(format!(
                        "Trigger '{}' must be a single character",
                        key
                    )));
                }
            };

            if trigger.is_whitespace() || trigger.is_alphanumeric() {
                return Err(DomainError::configuration(format!(
                    "Trigger '{}' must be a symbol",
                    key
                )));
            }

            let domains = domains
                .iter()
                .map(|d| d.parse::<ReferenceDomain>())
                .collect::<Result<Vec<_>, _>>()?;

            map = map.with_binding(trigger, TriggerBinding::new(domains)?);
        }

        if map.is_empty() {
            return Err(DomainError::configuration(
                "Trigger map must define at least one trigger",
            ));
        }

        Ok(map)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn triggers(&self) -> Vec<char> {
        self.bindings.iter().map(|(t, _)| *t).collect()
    }

    pub fn binding(&self, trigger: char) -> Option<&TriggerBinding> {
        self.bindings
            .iter()
            .find(|(t, _)| *t == trigger)
            .map(|(_, b)| b)
    }

    pub fn is_trigger(&self, c: char) -> bool {
        self.binding(c).is_some()
    }
}

impl Default for TriggerMap {
    fn default() -> Self {
        Self::split()
    }
}

/// Trigger maps for each family of reference-bearing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerProfiles {
    /// Conditions, queries and cache keys
    pub condition: TriggerMap,

    /// Function argument fields
    pub argument: TriggerMap,

    /// Function return-variable field
    pub return_variable: TriggerMap,
}

impl TriggerProfiles {
    /// Every trigger character used by any profile
    pub fn all_triggers(&self) -> Vec<char> {
        let mut all = Vec::new();
        for map in [&self.condition, &self.argument, &self.return_variable] {
            for trigger in map.triggers() {
                if !all.contains(&trigger) {
                    all.push(trigger);
                }
            }
        }
        all
    }
}

impl Default for TriggerProfiles {
    fn default() -> Self {
        Self {
            condition: TriggerMap::split(),
            argument: TriggerMap::toggle(),
            return_variable: TriggerMap::variables_only(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_profile() {
        let map = TriggerMap::split();
        assert_eq!(map.triggers(), vec!['#', '$']);
        assert_eq!(
            map.binding('#').unwrap().default_domain(),
            ReferenceDomain::Tag
        );
        assert_eq!(
            map.binding('$').unwrap().default_domain(),
            ReferenceDomain::Variable
        );
        assert!(!map.binding('#').unwrap().has_toggle());
    }

    #[test]
    fn test_toggle_cycles() {
        let map = TriggerMap::toggle();
        let binding = map.binding('#').unwrap();

        assert!(binding.has_toggle());
        assert_eq!(binding.default_domain(), ReferenceDomain::Variable);
        assert_eq!(binding.next_after(ReferenceDomain::Variable), ReferenceDomain::Tag);
        assert_eq!(binding.next_after(ReferenceDomain::Tag), ReferenceDomain::Variable);
        assert!(!map.is_trigger('$'));
    }

    #[test]
    fn test_from_config() {
        let mut entries = BTreeMap::new();
        entries.insert("@".to_string(), vec!["variable".to_string(), "tag".to_string()]);

        let map = TriggerMap::from_config(&entries).unwrap();
        let binding = map.binding('@').unwrap();
        assert_eq!(
            binding.domains(),
            &[ReferenceDomain::Variable, ReferenceDomain::Tag]
        );
    }

    #[test]
    fn test_from_config_rejects_invalid_entries() {
        let mut entries = BTreeMap::new();
        entries.insert("##".to_string(), vec!["tag".to_string()]);
        assert!(TriggerMap::from_config(&entries).is_err());

        let mut entries = BTreeMap::new();
        entries.insert(" ".to_string(), vec!["tag".to_string()]);
        assert!(TriggerMap::from_config(&entries).is_err());

        let mut entries = BTreeMap::new();
        entries.insert("#".to_string(), vec![]);
        assert!(TriggerMap::from_config(&entries).is_err());

        let mut entries = BTreeMap::new();
        entries.insert("#".to_string(), vec!["widget".to_string()]);
        assert!(TriggerMap::from_config(&entries).is_err());

        assert!(TriggerMap::from_config(&BTreeMap::new()).is_err());
    }

    #[test]
    fn test_binding_deduplicates() {
        let binding =
            TriggerBinding::new(vec![ReferenceDomain::Tag, ReferenceDomain::Tag]).unwrap();
        assert_eq!(binding.domains(), &[ReferenceDomain::Tag]);
        assert!(!binding.has_toggle());
    }

    #[test]
    fn test_all_triggers() {
        let profiles = TriggerProfiles::default();
        assert_eq!(profiles.all_triggers(), vec!['#', '$']);
    }
}
