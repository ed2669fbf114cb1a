//! Compile-time registry of state and union territory capitals.
//!
//! The registry is embedded TOML (`data/capitals.toml`) with one
//! `[[capitals]]` table per map point and a `[[shared_capitals]]` table
//! per physical capital that serves more than one state.
//!
//! The default mode renders the raw list. Every other mode goes through
//! the shared capital policy so each state appears exactly once, even
//! when the raw list leaves it out.

use std::collections::BTreeSet;

use mausam_map_region_models::{CapitalEntry, Mode};
use serde::Deserialize;
use thiserror::Error;

use crate::normalize::normalize;

/// Embedded capital registry for India.
const INDIA_TOML: &str = include_str!("../data/capitals.toml");

/// Errors building a registry from TOML.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The document is not valid registry TOML.
    #[error("Failed to parse capital registry: {0}")]
    Parse(#[from] toml::de::Error),

    /// A shared capital names a city that has no registry entry.
    #[error("Shared capital '{city}' has no entry in the registry")]
    UnknownSharedCapital {
        /// City named by the policy.
        city: String,
    },

    /// A suppressed state is not one of the policy's states.
    #[error("Shared capital '{city}' suppresses '{state}', which is not one of its states")]
    UnknownSuppressedState {
        /// City named by the policy.
        city: String,
        /// Offending state.
        state: String,
    },
}

/// One physical capital serving several states.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct SharedCapital {
    city: String,
    /// Every state governed from this city.
    states: Vec<String>,
    /// States that should not get a marker outside the default mode.
    #[serde(default)]
    suppress: Vec<String>,
}

impl SharedCapital {
    fn suppresses(&self, state: &str) -> bool {
        let key = normalize(state);
        self.suppress.iter().any(|s| normalize(s) == key)
    }
}

#[derive(Deserialize)]
struct RegistryFile {
    capitals: Vec<CapitalEntry>,
    #[serde(default)]
    shared_capitals: Vec<SharedCapital>,
}

/// The fixed set of map points, one per state or union territory.
#[derive(Debug, Clone, PartialEq)]
pub struct CapitalRegistry {
    capitals: Vec<CapitalEntry>,
    shared: Vec<SharedCapital>,
}

impl CapitalRegistry {
    /// Parses a registry document.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the TOML is malformed or the shared
    /// capital policy refers to a city or state it cannot honor.
    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::de::from_str(content)?;

        for policy in &file.shared_capitals {
            let city = normalize(&policy.city);
            if !file.capitals.iter().any(|c| normalize(&c.city) == city) {
                return Err(RegistryError::UnknownSharedCapital {
                    city: policy.city.clone(),
                });
            }
            let states: BTreeSet<_> = policy.states.iter().map(|s| normalize(s)).collect();
            if let Some(state) = policy
                .suppress
                .iter()
                .find(|s| !states.contains(&normalize(s)))
            {
                return Err(RegistryError::UnknownSuppressedState {
                    city: policy.city.clone(),
                    state: state.clone(),
                });
            }
        }

        Ok(Self {
            capitals: file.capitals,
            shared: file.shared_capitals,
        })
    }

    /// Returns the embedded registry of Indian state and UT capitals.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. Since it is a
    /// compile-time constant, a failure indicates a development error and
    /// is caught by tests.
    #[must_use]
    pub fn india() -> Self {
        Self::from_toml(INDIA_TOML)
            .unwrap_or_else(|e| panic!("Failed to load embedded capital registry: {e}"))
    }

    /// Every raw registry entry, in document order.
    #[must_use]
    pub fn all(&self) -> &[CapitalEntry] {
        &self.capitals
    }

    /// Capitals to render for a mode.
    ///
    /// [`Mode::DEFAULT`] gets the raw registry unchanged. Every other
    /// mode gets the shared capital policy applied, then exactly one
    /// entry per state, sorted by state name.
    #[must_use]
    pub fn for_mode(&self, mode: Mode) -> Vec<CapitalEntry> {
        if mode == Mode::DEFAULT {
            return self.capitals.clone();
        }
        self.with_shared_capitals()
    }

    /// Finds a capital by city name, ignoring case, spacing, and `&`.
    ///
    /// When several states share the city the first raw entry wins.
    #[must_use]
    pub fn find_city(&self, raw: &str) -> Option<&CapitalEntry> {
        let key = normalize(raw);
        if key.is_empty() {
            return None;
        }
        self.capitals.iter().find(|c| normalize(&c.city) == key)
    }

    /// Finds the map point for a state, including states that only exist
    /// through a shared capital.
    #[must_use]
    pub fn find_state(&self, raw: &str) -> Option<CapitalEntry> {
        let key = normalize(raw);
        if key.is_empty() {
            return None;
        }
        self.with_shared_capitals()
            .into_iter()
            .find(|c| normalize(&c.state) == key)
    }

    fn is_suppressed(&self, entry: &CapitalEntry) -> bool {
        let city = normalize(&entry.city);
        self.shared
            .iter()
            .any(|p| normalize(&p.city) == city && p.suppresses(&entry.state))
    }

    fn with_shared_capitals(&self) -> Vec<CapitalEntry> {
        let mut entries: Vec<CapitalEntry> = self
            .capitals
            .iter()
            .filter(|c| !self.is_suppressed(c))
            .cloned()
            .collect();

        for policy in &self.shared {
            let city = normalize(&policy.city);
            let Some(anchor) = self.capitals.iter().find(|c| normalize(&c.city) == city) else {
                continue;
            };

            for state in &policy.states {
                let key = normalize(state);
                if policy.suppresses(state) || entries.iter().any(|e| normalize(&e.state) == key) {
                    continue;
                }
                log::trace!("Adding {state} at shared capital {}", policy.city);
                entries.push(anchor.for_state(state));
            }
        }

        let mut seen = BTreeSet::new();
        entries.retain(|e| seen.insert(normalize(&e.state)));
        entries.sort_by(|a, b| a.state.cmp(&b.state));

        entries
    }
}
