//! Static key/value table indexed by a minimal perfect hash.

use crate::{Error, Mphf, MphfBuilder, Result};

/// A read-only map from byte-string keys to values.
///
/// Each entry sits at its key's [`Mphf::hashcode`]. Lookups compare the
/// stored key, so unlike a bare [`Mphf`] a miss is always reported.
///
/// # Example
///
/// ```
/// use mphash_mphf::PerfectTable;
///
/// let table = PerfectTable::new(vec![("foo", "hoge"), ("bar", "fuga")])?;
/// assert_eq!(table.get("foo"), Some(&"hoge"));
/// assert_eq!(table.get("baz"), None);
/// # Ok::<(), mphash_mphf::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PerfectTable<V> {
    mphf: Mphf,
    entries: Vec<(Vec<u8>, V)>,
}

impl<V> PerfectTable<V> {
    /// Build a table from distinct keys.
    pub fn new<K: AsRef<[u8]>>(entries: Vec<(K, V)>) -> Result<Self> {
        Self::with_builder(entries, &MphfBuilder::new())
    }

    /// Build a table, generating its hash function with `builder`.
    pub fn with_builder<K: AsRef<[u8]>>(
        entries: Vec<(K, V)>,
        builder: &MphfBuilder,
    ) -> Result<Self> {
        let mphf = {
            let keys: Vec<&[u8]> = entries.iter().map(|(k, _)| k.as_ref()).collect();
            builder.build(&keys)?
        };

        let mut slots: Vec<Option<(Vec<u8>, V)>> = (0..entries.len()).map(|_| None).collect();
        for (key, value) in entries {
            let key = key.as_ref();
            let Some(index) = mphf.hashcode(key) else {
                return Err(Error::Corrupt(format!(
                    "key {} has no index",
                    mphash_common::escape::escape_c_string(key)
                )));
            };
            slots[index] = Some((key.to_vec(), value));
        }

        let entries = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::Corrupt("two keys share an index".to_string()))?;

        Ok(Self { mphf, entries })
    }

    /// Look up a key.
    pub fn get<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> Option<&V> {
        let key = key.as_ref();
        let index = self.mphf.hashcode(key)?;
        let (stored, value) = &self.entries[index];
        (stored.as_slice() == key).then_some(value)
    }

    /// Index of a key, if present.
    pub fn index_of<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> Option<usize> {
        let key = key.as_ref();
        let index = self.mphf.hashcode(key)?;
        (self.entries[index].0 == key).then_some(index)
    }

    pub fn contains_key<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> bool {
        self.index_of(key).is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The underlying hash function.
    #[inline]
    pub fn mphf(&self) -> &Mphf {
        &self.mphf
    }

    /// Iterate entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &V)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let table = PerfectTable::new(vec![("foo", "hoge"), ("bar", "fuga")]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("foo"), Some(&"hoge"));
        assert_eq!(table.get("bar"), Some(&"fuga"));
        assert_eq!(table.get("baz"), None);
        assert!(!table.contains_key("not-found"));
    }

    #[test]
    fn test_misses_never_match() {
        let entries: Vec<(String, usize)> = (0..500).map(|i| (format!("key{}", i), i)).collect();
        let table = PerfectTable::new(entries).unwrap();

        for i in 0..500 {
            assert_eq!(table.get(&format!("key{}", i)), Some(&i));
        }
        for i in 500..1500 {
            assert_eq!(table.get(&format!("key{}", i)), None);
        }
    }

    #[test]
    fn test_iter_in_index_order() {
        let table = PerfectTable::new(vec![("a", 1), ("b", 2), ("c", 3)]).unwrap();
        for (position, (key, _)) in table.iter().enumerate() {
            assert_eq!(table.index_of(key), Some(position));
        }
        let mut values: Vec<_> = table.iter().map(|(_, &v)| v).collect();
        values.sort();
        assert_eq!(values, [1, 2, 3]);
    }

    #[test]
    fn test_empty_and_duplicates() {
        let table: PerfectTable<u32> = PerfectTable::new(Vec::<(&str, u32)>::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.get("x"), None);

        let err = PerfectTable::new(vec![("x", 1), ("x", 2)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
    }

    #[test]
    fn test_with_builder() {
        let entries = vec![("foo", 1), ("bar", 2), ("baz", 3)];
        let table =
            PerfectTable::with_builder(entries.clone(), &MphfBuilder::new().first_salt(9)).unwrap();
        let salts = table.mphf().salts();
        assert!(salts[0] >= 9 && salts[0] % 3 == 0, "{:?}", salts);
        assert_eq!(table.get("baz"), Some(&3));

        let err = PerfectTable::with_builder(entries, &MphfBuilder::new().max_attempts(0)).unwrap_err();
        assert!(matches!(err, Error::TooManyAttempts { attempts: 0, .. }));
    }
}
