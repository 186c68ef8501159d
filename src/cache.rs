//! An explicit, per-run primer-design cache. Deliberately a value the caller
//! owns and threads through the engine rather than a global/`static` cache:
//! two concurrent planning runs never share state, and a cache can be
//! dropped (or persisted) independently of process lifetime.

use std::collections::HashMap;

use crate::primer::Primer;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrimerCacheKey {
    pub template_id: String,
    pub region: (usize, usize),
}

#[derive(Default)]
pub struct PrimerCache {
    entries: HashMap<PrimerCacheKey, (Primer, Primer)>,
}

impl PrimerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PrimerCacheKey) -> Option<&(Primer, Primer)> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: PrimerCacheKey, pair: (Primer, Primer)) {
        self.entries.insert(key, pair);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primer::PrimerDirection;
    use crate::sequence::seq_from_str;

    fn pair() -> (Primer, Primer) {
        let p = Primer {
            sequence: seq_from_str("ACGTACGTACGTACGTACGT"),
            direction: PrimerDirection::Forward,
            range: (0, 19),
            tm: 60.0,
            gc_fraction: 0.5,
            penalty: 1.0,
            notes: String::new(),
        };
        (p.clone(), p)
    }

    #[test]
    fn cache_round_trips_an_entry() {
        let mut cache = PrimerCache::new();
        let key = PrimerCacheKey {
            template_id: "t1".into(),
            region: (10, 40),
        };
        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), pair());
        assert!(cache.get(&key).is_some());
        assert_eq!(cache.len(), 1);
    }
}
