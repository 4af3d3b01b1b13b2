use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` shared
/// across threads, backed by an `Arc<RwLock<T>>`. The chunk and light layers
/// are not internally synchronized, so a world that is touched by more than
/// one thread (network decode, simulation, render read-back) lives inside one
/// of these.
///
/// The guard returned by [`get`](MtResource::get) is the scoped-read
/// discipline for bulk scans: any code reading more than one position (a full
/// section recalculation, a mesh-building pass over 4096 slots) must hold the
/// guard for the whole scan so a concurrent single-slot writer can never be
/// observed mid-update.
///
/// # Examples
///
/// ```
/// use voxel_engine_core::core::MtResource;
///
/// let shared = MtResource::new(vec![0u8; 4096]);
///
/// // Writer thread: single-slot update under the write guard.
/// shared.get_mut()[17] = 15;
///
/// // Reader: the guard is held for the entire scan.
/// let guard = shared.get();
/// let lit = guard.iter().filter(|&&level| level > 0).count();
/// assert_eq!(lit, 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard for the contained value.
    ///
    /// Multiple readers may hold guards concurrently; hold it for the whole
    /// duration of a multi-position scan.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns an exclusive write guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn shared_between_threads() {
        let counter = MtResource::new(0);
        let clone = counter.clone();

        let handle = thread::spawn(move || {
            *clone.get_mut() += 1;
        });
        handle.join().unwrap();

        assert_eq!(*counter.get(), 1);
    }

    #[test]
    fn concurrent_readers() {
        let values = MtResource::new([1u8, 2, 3]);
        let first = values.get();
        let second = values.get();
        assert_eq!(first[0], second[0]);
    }
}
