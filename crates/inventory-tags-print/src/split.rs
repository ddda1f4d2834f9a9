//! Mapping between one inventory tag id and a pair of per-family marker ids.
//!
//! The id space is the mixed-radix product of the two family sizes with
//! family B as the least significant digit:
//!
//! ```text
//! id = index_a * count_b + index_b
//! ```

use inventory_tags_apriltag::FamilySpec;
use serde::{Deserialize, Serialize};

/// Marker ids for the two families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitResult {
    pub index_a: u32,
    pub index_b: u32,
}

/// Id or component outside its valid range.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("inventory tag id {id} out of range [0, {capacity})")]
    Id { id: i64, capacity: u64 },
    #[error("{family} index {index} out of range [0, {count})")]
    Index {
        family: String,
        index: u32,
        count: u32,
    },
}

/// Bijection between `[0, count_a * count_b)` and `(index_a, index_b)` pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdSplitter {
    family_a: FamilySpec,
    family_b: FamilySpec,
}

impl Default for IdSplitter {
    fn default() -> Self {
        Self::new(FamilySpec::TAG_STANDARD_41H12, FamilySpec::TAG_STANDARD_52H13)
    }
}

impl IdSplitter {
    pub fn new(family_a: FamilySpec, family_b: FamilySpec) -> Self {
        Self { family_a, family_b }
    }

    #[inline]
    pub fn family_a(&self) -> &FamilySpec {
        &self.family_a
    }

    #[inline]
    pub fn family_b(&self) -> &FamilySpec {
        &self.family_b
    }

    /// Number of representable ids (exclusive upper bound).
    #[inline]
    pub fn capacity(&self) -> u64 {
        u64::from(self.family_a.count) * u64::from(self.family_b.count)
    }

    /// Split `id` into per-family marker ids.
    pub fn split(&self, id: i64) -> Result<SplitResult, RangeError> {
        let capacity = self.capacity();
        let id_u = u64::try_from(id).map_err(|_| RangeError::Id { id, capacity })?;
        if id_u >= capacity {
            return Err(RangeError::Id { id, capacity });
        }

        let count_b = u64::from(self.family_b.count);
        // both quotients are bounded by the family sizes, which are u32
        Ok(SplitResult {
            index_a: (id_u / count_b) as u32,
            index_b: (id_u % count_b) as u32,
        })
    }

    /// Inverse of [`split`](Self::split).
    ///
    /// Each component is checked against its own family size; nothing wraps.
    pub fn join(&self, index_a: u32, index_b: u32) -> Result<u64, RangeError> {
        for (family, index) in [(&self.family_a, index_a), (&self.family_b, index_b)] {
            if index >= family.count {
                return Err(RangeError::Index {
                    family: family.name.to_string(),
                    index,
                    count: family.count,
                });
            }
        }
        Ok(u64::from(index_a) * u64::from(self.family_b.count) + u64::from(index_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A_COUNT: u32 = 2115;
    const B_COUNT: u32 = 48714;
    const N: i64 = 103_030_110;

    #[test]
    fn standard_capacity() {
        assert_eq!(IdSplitter::default().capacity(), N as u64);
    }

    #[test]
    fn boundaries() {
        let s = IdSplitter::default();
        assert_eq!(
            s.split(0),
            Ok(SplitResult {
                index_a: 0,
                index_b: 0
            })
        );
        assert_eq!(
            s.split(2),
            Ok(SplitResult {
                index_a: 0,
                index_b: 2
            })
        );
        assert_eq!(
            s.split(N - 1),
            Ok(SplitResult {
                index_a: A_COUNT - 1,
                index_b: B_COUNT - 1
            })
        );
        assert_eq!(
            s.split(i64::from(B_COUNT)),
            Ok(SplitResult {
                index_a: 1,
                index_b: 0
            })
        );
    }

    #[test]
    fn both_ends_are_exclusive() {
        let s = IdSplitter::default();
        assert_eq!(
            s.split(-1),
            Err(RangeError::Id {
                id: -1,
                capacity: N as u64
            })
        );
        assert_eq!(
            s.split(N),
            Err(RangeError::Id {
                id: N,
                capacity: N as u64
            })
        );
        assert!(s.split(i64::MIN).is_err());
        assert!(s.split(i64::MAX).is_err());
    }

    #[test]
    fn split_then_join_recovers_id() {
        let s = IdSplitter::default();
        let step = 7_919; // prime stride through the whole range
        let mut id = 0i64;
        while id < N {
            let r = s.split(id).expect("split");
            assert!(r.index_a < A_COUNT);
            assert!(r.index_b < B_COUNT);
            assert_eq!(
                u64::from(r.index_a) * u64::from(B_COUNT) + u64::from(r.index_b),
                id as u64
            );
            assert_eq!(s.join(r.index_a, r.index_b), Ok(id as u64));
            id += step;
        }
    }

    #[test]
    fn small_families_are_a_bijection() {
        let s = IdSplitter::new(FamilySpec::new("a", 3), FamilySpec::new("b", 5));
        let mut seen = std::collections::HashSet::new();
        for id in 0..15 {
            let r = s.split(id).expect("split");
            assert!(seen.insert(r), "duplicate pair for id {id}");
        }
        assert_eq!(seen.len(), 15);
        assert!(s.split(15).is_err());
    }

    #[test]
    fn join_rejects_out_of_range_components() {
        let s = IdSplitter::default();
        assert_eq!(
            s.join(A_COUNT, 0),
            Err(RangeError::Index {
                family: "tagStandard41h12".to_string(),
                index: A_COUNT,
                count: A_COUNT
            })
        );
        assert!(matches!(
            s.join(0, B_COUNT),
            Err(RangeError::Index { index, .. }) if index == B_COUNT
        ));
        assert_eq!(s.join(A_COUNT - 1, B_COUNT - 1), Ok(N as u64 - 1));
    }
}
