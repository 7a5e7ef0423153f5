// Copyright 2026 the Subduction Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable [`DirtyRegions`] containers for scratch work within a pass.
//!
//! Containers are only reachable inside [`RegionPool::with_lease`]: the
//! closure receives a `&mut DirtyRegions` that cannot outlive the call, and
//! the container goes back to the pool, cleared, when the closure returns.
//! No container is lent to two holders at once, and a lent container cannot
//! be returned to any pool but its own.
//!
//! The closure also receives the pool, so leases nest:
//!
//! ```
//! use subduction_core::bounds::Bounds;
//! use subduction_core::pool::RegionPool;
//!
//! let mut pool = RegionPool::new(2, 4);
//! let count = pool.with_lease(|pool, outer| {
//!     outer.add_dirty_region(Bounds::new(0.0, 0.0, 10.0, 10.0));
//!     pool.with_lease(|_, inner| {
//!         inner.derive_with_container(outer);
//!         inner.translate(50.0, 0.0);
//!         outer.merge(inner);
//!     });
//!     outer.len()
//! });
//! assert_eq!(count, 2);
//! assert_eq!(pool.outstanding(), 0);
//! ```

use alloc::vec::Vec;

use crate::region::DirtyRegions;

/// A pool of [`DirtyRegions`] containers sharing one capacity.
#[derive(Debug)]
pub struct RegionPool {
    free: Vec<DirtyRegions>,
    lent: usize,
    region_capacity: usize,
}

impl RegionPool {
    /// Creates a pool with `slots` preallocated containers, each holding at
    /// most `region_capacity` rectangles.
    ///
    /// # Panics
    ///
    /// Panics if `region_capacity` is zero.
    #[must_use]
    pub fn new(slots: usize, region_capacity: usize) -> Self {
        assert!(region_capacity > 0, "region capacity must be at least 1");
        let mut free = Vec::with_capacity(slots);
        for _ in 0..slots {
            free.push(DirtyRegions::new(region_capacity));
        }
        Self {
            free,
            lent: 0,
            region_capacity,
        }
    }

    /// Returns the capacity of every container in the pool.
    #[inline]
    #[must_use]
    pub const fn region_capacity(&self) -> usize {
        self.region_capacity
    }

    /// Returns the total number of containers, lent or not.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> usize {
        self.free.len() + self.lent
    }

    /// Returns the number of containers currently lent out.
    #[inline]
    #[must_use]
    pub const fn outstanding(&self) -> usize {
        self.lent
    }

    /// Lends an empty container to `f` and takes it back when `f` returns.
    ///
    /// The pool grows by one container when every slot is already lent, so
    /// it ends up as large as the deepest nesting of leases.
    pub fn with_lease<R>(&mut self, f: impl FnOnce(&mut Self, &mut DirtyRegions) -> R) -> R {
        let mut regions = match self.free.pop() {
            Some(regions) => regions,
            None => DirtyRegions::new(self.region_capacity),
        };
        self.lent += 1;
        let result = f(self, &mut regions);
        self.lent -= 1;
        regions.reset();
        self.free.push(regions);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Bounds;

    #[test]
    fn nested_leases_are_distinct() {
        let mut pool = RegionPool::new(2, 4);
        pool.with_lease(|pool, a| {
            a.add_dirty_region(Bounds::new(0.0, 0.0, 1.0, 1.0));
            pool.with_lease(|pool, b| {
                assert!(b.is_empty());
                assert_eq!(a.len(), 1);
                assert_eq!(pool.outstanding(), 2);
            });
        });
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.slots(), 2);
    }

    #[test]
    fn exhausted_pool_grows_to_nesting_depth() {
        let mut pool = RegionPool::new(1, 4);
        pool.with_lease(|pool, _| {
            pool.with_lease(|pool, b| {
                assert_eq!(b.max_space(), 4);
                assert_eq!(pool.slots(), 2);
            });
        });
        assert_eq!(pool.slots(), 2);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn repeated_leases_do_not_grow_the_pool() {
        let mut pool = RegionPool::new(2, 4);
        for i in 0..100 {
            let x = f64::from(i);
            pool.with_lease(|pool, a| {
                a.add_dirty_region(Bounds::new(x, 0.0, x + 1.0, 1.0));
                pool.with_lease(|_, b| b.merge(a));
            });
        }
        assert_eq!(pool.slots(), 2);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn returned_container_comes_back_empty() {
        let mut pool = RegionPool::new(1, 4);
        pool.with_lease(|_, lease| {
            lease.add_dirty_region(Bounds::new(0.0, 0.0, 1.0, 1.0));
            assert_eq!(lease.len(), 1);
        });
        pool.with_lease(|_, again| assert!(again.is_empty()));
    }

    #[test]
    fn lease_result_is_returned() {
        let mut pool = RegionPool::new(0, 4);
        let len = pool.with_lease(|_, lease| {
            lease.add_dirty_region(Bounds::new(0.0, 0.0, 1.0, 1.0));
            lease.add_dirty_region(Bounds::new(5.0, 0.0, 6.0, 1.0));
            lease.len()
        });
        assert_eq!(len, 2);
        assert_eq!(pool.slots(), 1);
    }
}
