use std::cmp::min;
use std::ops::Index;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

/// Hash-consing table: a growable arena of values with intrusive
/// collision chains.
///
/// Index 0 is a sentinel meaning "end of chain", so real entries start at 1.
/// Entries are never removed, hence indices stay valid for the lifetime of the table.
pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T> {
    /// Create a new table with `2^min(bits, 16)` buckets.
    ///
    /// `sentinel` occupies index 0 and is never returned by lookups.
    pub fn new(bits: usize, sentinel: T) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let buckets_bits = min(bits, 16);
        let buckets_size = 1 << buckets_bits;

        Self {
            data: vec![Entry {
                value: sentinel,
                next: 0,
            }],
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
        }
    }

    /// Get the number of stored values (excluding the sentinel).
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }
    /// Get the number of buckets.
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }
    /// Get the index of the next entry in the same chain.
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next
    }

    /// Add a value without linking it into any chain and return its index.
    ///
    /// Used for values that must never be found by [`Table::put`], such as terminals.
    pub fn add(&mut self, value: T) -> usize {
        self.data.push(Entry { value, next: 0 });
        self.data.len() - 1
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Return the index of an equal value, inserting it first if absent.
    pub fn put(&mut self, value: T) -> usize {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        while index != 0 {
            if &value == self.value(index) {
                return index;
            }
            index = self.next(index);
        }

        // Prepend the new entry to its chain.
        let head = self.buckets[bucket_index];
        let i = self.add(value);
        self.data[i].next = head;
        self.buckets[bucket_index] = i;
        i
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}
