// anesthetic/registry.rs
// Read-only table of anesthetic profiles keyed by folded name

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{AnestheticClass, AnestheticProfile, OnsetRange};
use super::RegistryError;
use crate::utils::normalize_key;

/// Anesthetic profiles in insertion order with a folded-name index.
///
/// Built once (from the defaults, optionally extended by the config file) and
/// then only read. Lookups go through [`normalize_key`], so "Lidocaína",
/// "lidocaina" and "LIDOCAINA" resolve to the same profile.
#[derive(Clone, Debug, Default)]
pub struct AnestheticRegistry {
    profiles: Vec<AnestheticProfile>,
    index: HashMap<String, usize>,
}

static BUILTIN: Lazy<AnestheticRegistry> = Lazy::new(|| {
    use AnestheticClass::*;
    let minutes = |min: f64, max: f64| OnsetRange::Minutes { min, max };
    let mut r = AnestheticRegistry::default();
    for profile in [
        AnestheticProfile::new("Benzocaína", Ester, 3.5, 100.0, OnsetRange::Unknown),
        AnestheticProfile::new("Procaína", Ester, 9.1, 2.0, minutes(14.0, 18.0)),
        AnestheticProfile::new("Mepivacaína", Amide, 7.7, 33.0, minutes(2.0, 4.0)),
        AnestheticProfile::new("Lidocaína", Amide, 7.7, 29.0, minutes(2.0, 4.0)),
        AnestheticProfile::new("Prilocaína", Amide, 7.7, 25.0, minutes(2.0, 4.0)),
        AnestheticProfile::new("Articaína", Amide, 7.8, 29.0, minutes(2.0, 4.0)),
        AnestheticProfile::new("Bupivacaína", Amide, 8.1, 17.0, minutes(5.0, 8.0)),
    ] {
        r.upsert(profile);
    }
    r
});

impl AnestheticRegistry {
    /// The built-in seven-drug table.
    pub fn builtin() -> &'static AnestheticRegistry {
        &BUILTIN
    }

    /// Build a registry from explicit profiles. Later entries with the same
    /// folded name replace earlier ones.
    pub fn from_profiles<I>(profiles: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = AnestheticProfile>,
    {
        let mut r = AnestheticRegistry::default();
        for profile in profiles {
            profile.validate()?;
            r.upsert(profile);
        }
        Ok(r)
    }

    /// Copy of this registry with `extra` added on top.
    pub fn extended<I>(&self, extra: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = AnestheticProfile>,
    {
        let mut r = self.clone();
        for profile in extra {
            profile.validate()?;
            if r.index.contains_key(&profile.key()) {
                log::info!("Overriding built-in profile for {}", profile.name);
            }
            r.upsert(profile);
        }
        Ok(r)
    }

    fn upsert(&mut self, profile: AnestheticProfile) {
        let key = profile.key();
        match self.index.get(&key) {
            Some(&i) => self.profiles[i] = profile,
            None => {
                self.index.insert(key, self.profiles.len());
                self.profiles.push(profile);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&AnestheticProfile> {
        self.index
            .get(&normalize_key(name))
            .map(|&i| &self.profiles[i])
    }

    /// Like [`get`](Self::get) but with an error naming the missing drug.
    pub fn lookup(&self, name: &str) -> Result<&AnestheticProfile, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownAnesthetic(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnestheticProfile> {
        self.profiles.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
