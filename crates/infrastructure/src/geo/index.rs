use super::fuzzy::{candidate_lengths, normalized_distance, MAX_FUZZY_DISTANCE};
use dnstoys_application::ports::{GeoResolution, GeoResolver};
use dnstoys_domain::{DomainError, GeoLocation, GeoMatch};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

type LocationIds = SmallVec<[u32; 2]>;

struct FuzzyName {
    chars: Box<[char]>,
    ids: LocationIds,
}

/// Lower-cases and folds `-`/`_` and runs of whitespace into single spaces,
/// the same shape query labels are parsed into.
pub fn normalize_name(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// In-memory place index, immutable once built.
///
/// Every canonical name and alias is keyed by `normalize_name`. Fuzzy
/// candidates are bucketed by char length so a miss only scans names of
/// compatible length.
pub struct GeoIndex {
    locations: Vec<Arc<GeoLocation>>,
    exact: FxHashMap<String, LocationIds>,
    fuzzy_by_len: BTreeMap<usize, Vec<FuzzyName>>,
    timezones_by_country: FxHashMap<String, Vec<Arc<str>>>,
}

impl GeoIndex {
    pub fn new(locations: Vec<GeoLocation>) -> Self {
        let locations: Vec<Arc<GeoLocation>> = locations.into_iter().map(Arc::new).collect();

        let mut exact: FxHashMap<String, LocationIds> = FxHashMap::default();
        let mut zones: FxHashMap<String, BTreeSet<Arc<str>>> = FxHashMap::default();

        for (id, loc) in locations.iter().enumerate() {
            let id = id as u32;
            for name in std::iter::once(&loc.name).chain(loc.aliases.iter()) {
                let ids = exact.entry(normalize_name(name)).or_default();
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            zones
                .entry(loc.country_code.to_ascii_uppercase())
                .or_default()
                .insert(Arc::clone(&loc.timezone));
        }

        let mut fuzzy_by_len: BTreeMap<usize, Vec<FuzzyName>> = BTreeMap::new();
        for (name, ids) in &exact {
            let chars: Box<[char]> = name.chars().collect();
            fuzzy_by_len.entry(chars.len()).or_default().push(FuzzyName {
                chars,
                ids: ids.clone(),
            });
        }

        let timezones_by_country = zones
            .into_iter()
            .map(|(cc, set)| (cc, set.into_iter().collect()))
            .collect();

        debug!(
            locations = locations.len(),
            names = exact.len(),
            "Geo index built"
        );

        Self {
            locations,
            exact,
            fuzzy_by_len,
            timezones_by_country,
        }
    }

    /// Hinted country first, then larger priority, then name and country.
    fn preference(&self, a: u32, b: u32, hint: Option<&str>) -> Ordering {
        let la: &GeoLocation = &self.locations[a as usize];
        let lb: &GeoLocation = &self.locations[b as usize];
        let hinted = |l: &GeoLocation| hint.is_some_and(|h| l.country_code.eq_ignore_ascii_case(h));
        (!hinted(la), Reverse(la.priority), &la.name, &la.country_code).cmp(&(
            !hinted(lb),
            Reverse(lb.priority),
            &lb.name,
            &lb.country_code,
        ))
    }

    fn best_of(&self, ids: impl Iterator<Item = u32>, hint: Option<&str>) -> Option<u32> {
        ids.min_by(|a, b| self.preference(*a, *b, hint))
    }

    fn fuzzy_match(&self, needle: &[char], hint: Option<&str>) -> Option<u32> {
        let mut best: Option<(f64, u32)> = None;

        for (_, bucket) in self.fuzzy_by_len.range(candidate_lengths(needle.len())) {
            for candidate in bucket {
                let distance = normalized_distance(needle, &candidate.chars);
                if distance > MAX_FUZZY_DISTANCE {
                    continue;
                }
                for &id in &candidate.ids {
                    let better = match best {
                        None => true,
                        Some((best_distance, best_id)) => match distance.total_cmp(&best_distance) {
                            Ordering::Less => true,
                            Ordering::Equal => {
                                self.preference(id, best_id, hint) == Ordering::Less
                            }
                            Ordering::Greater => false,
                        },
                    };
                    if better {
                        best = Some((distance, id));
                    }
                }
            }
        }

        best.map(|(_, id)| id)
    }
}

impl GeoResolver for GeoIndex {
    fn resolve(
        &self,
        name: &str,
        country_hint: Option<&str>,
    ) -> Result<GeoResolution, DomainError> {
        let needle = normalize_name(name);
        if needle.is_empty() {
            return Err(DomainError::PlaceNotFound(name.to_string()));
        }

        if let Some(ids) = self.exact.get(&needle) {
            if let Some(id) = self.best_of(ids.iter().copied(), country_hint) {
                return Ok(GeoResolution {
                    location: Arc::clone(&self.locations[id as usize]),
                    matched: GeoMatch::Exact,
                });
            }
        }

        let chars: Vec<char> = needle.chars().collect();
        match self.fuzzy_match(&chars, country_hint) {
            Some(id) => {
                let location = Arc::clone(&self.locations[id as usize]);
                debug!(query = %needle, matched = %location.name, "Fuzzy geo match");
                Ok(GeoResolution {
                    location,
                    matched: GeoMatch::Fuzzy,
                })
            }
            None => Err(DomainError::PlaceNotFound(name.to_string())),
        }
    }

    fn country_timezones(&self, country_code: &str) -> Vec<Arc<str>> {
        self.timezones_by_country
            .get(&country_code.to_ascii_uppercase())
            .cloned()
            .unwrap_or_default()
    }

    fn count(&self) -> usize {
        self.locations.len()
    }
}
