//! Geometry buffer storage
//!
//! Two kinds of storage back draw records:
//!
//! - [`NativeBuffer`]: fixed-capacity float storage owned by a figure record.
//!   Allocated once, fallibly, and never resized. Its address is its identity;
//!   a record reused from a pool keeps the same storage for its whole life.
//! - [`ClientBuffer`]: caller-owned storage shared by reference with primitive
//!   records. The pipeline only ever reads it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::render::{RenderError, RenderResult};

/// Fixed-capacity float storage with stable identity
#[derive(Debug)]
pub struct NativeBuffer {
    data: Box<[f32]>,
}

impl NativeBuffer {
    /// Allocate `capacity` zeroed floats
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::AllocationFailed`] when the storage cannot be
    /// obtained. No partial buffer is returned.
    pub fn allocate(capacity: usize) -> RenderResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| RenderError::AllocationFailed { requested: capacity })?;
        data.resize(capacity, 0.0);
        Ok(Self {
            data: data.into_boxed_slice(),
        })
    }

    /// Number of floats this buffer holds
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Read access to the full buffer
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Write access to the full buffer
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Address of the underlying storage, used to compare buffer identity
    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }
}

/// Caller-owned buffer shared by reference
///
/// Cloning a `ClientBuffer` clones the handle, not the data: writes made
/// through any handle are visible to every other handle, including handles
/// captured by draw records that have not been rendered yet.
#[derive(Debug)]
pub struct ClientBuffer<T> {
    inner: Arc<RwLock<Vec<T>>>,
}

impl<T> ClientBuffer<T> {
    /// Wrap caller data
    pub fn new(data: Vec<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    /// Shared read access
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.inner.read().unwrap_or_else(|poisoned| {
            log::warn!("Client buffer lock poisoned, recovering contents");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Exclusive write access, for the owning caller
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.inner.write().unwrap_or_else(|poisoned| {
            log::warn!("Client buffer lock poisoned, recovering contents");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Number of elements currently stored
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether two handles refer to the same storage
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for ClientBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<Vec<T>> for ClientBuffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}
