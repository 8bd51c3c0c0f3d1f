//! Deterministic id allocation for columns and groups.

use std::collections::HashSet;

/// Issues unique ids for one tree build.
///
/// An id is the preferred id if given, else the preferred field, else a
/// sequential number. A taken candidate gets a `_1`, `_2`, ... suffix (the
/// sequential form just counts up). Output depends only on the reserved ids
/// and the order of calls, so rebuilding the same definitions yields the same
/// ids.
///
/// # Example
///
/// ```
/// use horizon_grid::IdAllocator;
///
/// let mut ids = IdAllocator::new();
/// assert_eq!(ids.issue(Some("price"), None), "price");
/// assert_eq!(ids.issue(Some("price"), None), "price_1");
/// assert_eq!(ids.issue(None, Some("country")), "country");
/// assert_eq!(ids.issue(None, None), "0");
/// ```
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark ids as already in use so they are never issued.
    pub fn reserve<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taken.extend(ids.into_iter().map(Into::into));
    }

    /// Returns `true` if `id` has been reserved or issued.
    pub fn is_taken(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    /// Issue a unique id.
    pub fn issue(&mut self, preferred_id: Option<&str>, preferred_field: Option<&str>) -> String {
        let base = preferred_id
            .filter(|id| !id.is_empty())
            .or(preferred_field.filter(|field| !field.is_empty()));

        let mut count: usize = 0;
        loop {
            let candidate = match base {
                Some(base) if count == 0 => base.to_string(),
                Some(base) => format!("{base}_{count}"),
                None => count.to_string(),
            };
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_order() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.issue(Some("id"), Some("field")), "id");
        assert_eq!(ids.issue(None, Some("field")), "field");
        assert_eq!(ids.issue(Some(""), Some("other")), "other");
        assert_eq!(ids.issue(None, None), "0");
        assert_eq!(ids.issue(None, None), "1");
    }

    #[test]
    fn test_collisions_get_suffixes() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.issue(Some("dup"), None), "dup");
        assert_eq!(ids.issue(Some("dup"), None), "dup_1");
        assert_eq!(ids.issue(None, Some("dup")), "dup_2");
    }

    #[test]
    fn test_reserved_ids_are_skipped() {
        let mut ids = IdAllocator::new();
        ids.reserve(["a", "0", "1"]);
        assert!(ids.is_taken("a"));
        assert_eq!(ids.issue(Some("a"), None), "a_1");
        assert_eq!(ids.issue(None, None), "2");
    }

    #[test]
    fn test_same_sequence_same_ids() {
        let run = || {
            let mut ids = IdAllocator::new();
            vec![
                ids.issue(None, Some("x")),
                ids.issue(None, None),
                ids.issue(None, Some("x")),
                ids.issue(Some("g"), None),
            ]
        };
        assert_eq!(run(), run());
    }
}
