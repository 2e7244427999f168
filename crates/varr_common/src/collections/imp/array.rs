use std::{
    alloc::{self, Layout},
    marker::PhantomData,
    mem,
    ptr::NonNull,
};

use crate::collections::{GrowthStrategy, TryReserveError};

/// Low level utility for more ergonomically allocating, reallocating, and deallocating a buffer
/// of memory without having to worry about all the corner cases involved. In particular:
///
/// - Produces a dangling pointer on zero-sized types.
/// - Produces a dangling pointer on zero-length allocations.
/// - Avoids freeing a dangling pointer.
/// - Catches all overflows in capacity computations (promotes them to "capacity overflow" errors).
/// - Keeps every allocation below `isize::MAX` bytes.
///
/// This type does not in any way inspect the memory it manages. When dropped it *will* free its
/// memory, but it *won't* try to drop its contents. It is up to the user of `RawArray` to handle
/// the actual things *stored* inside of it.
///
/// Note that a zero-sized type never allocates, so `capacity()` always returns `usize::MAX` for one.
pub(crate) struct RawArray<T, G: GrowthStrategy> {
    ptr: NonNull<T>,
    cap: usize,
    _growth: PhantomData<G>,
}

impl<T, G: GrowthStrategy> RawArray<T, G> {
    /// Creates the biggest possible `RawArray` without allocating.
    ///
    /// If `T` has a non-zero size, this makes a `RawArray` with a capacity of `0`.
    /// If `T` is zero-sized, it makes a `RawArray` with a capacity of `usize::MAX`.
    /// Useful for implementing delayed allocation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if mem::size_of::<T>() == 0 { usize::MAX } else { 0 },
            _growth: PhantomData,
        }
    }

    /// Creates a `RawArray` with exactly the capacity and alignment requirements for a
    /// `[T; capacity]`. This is equivalent to calling `RawArray::new` when `capacity` is `0` or
    /// `T` is zero-sized.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(arr) => arr,
            Err(err) => handle_reserve_error(err),
        }
    }

    fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        if mem::size_of::<T>() == 0 || capacity == 0 {
            return Ok(Self::new());
        }

        let layout = array_layout::<T>(capacity)?;
        // Safety: the layout has a non-zero size, as both the element size and `capacity` are
        // non-zero here.
        let ptr = unsafe { alloc::alloc(layout) };
        let Some(ptr) = NonNull::new(ptr as *mut T) else {
            return Err(TryReserveError::AllocError(layout));
        };
        Ok(Self { ptr, cap: capacity, _growth: PhantomData })
    }

    /// Gets a raw pointer to the start of the allocation, or a dangling pointer valid for
    /// zero-sized reads if there is no allocation.
    #[inline]
    pub fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Gets the capacity of the allocation.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// Ensures that the buffer contains at least enough space to hold `len + additional`
    /// elements, growing per the strategy `G` when it doesn't.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn reserve(&mut self, len: usize, additional: usize) {
        if self.needs_to_grow(len, additional) {
            if let Err(err) = self.grow(len, additional) {
                handle_reserve_error(err);
            }
        }
    }

    /// Grows the buffer to hold at least one more element, per the strategy `G`.
    ///
    /// The caller is expected to only call this when the buffer is full, so the required capacity
    /// is one past the current one.
    pub fn grow_one(&mut self) {
        if let Err(err) = self.grow(self.cap, 1) {
            handle_reserve_error(err);
        }
    }

    /// The same as `reserve`, but returns errors instead of panicking or aborting.
    pub fn try_reserve(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            self.grow(len, additional)
        } else {
            Ok(())
        }
    }

    fn needs_to_grow(&self, len: usize, additional: usize) -> bool {
        additional > self.cap.wrapping_sub(len)
    }

    fn grow(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        debug_assert!(self.needs_to_grow(len, additional));

        if mem::size_of::<T>() == 0 {
            // The capacity is already `usize::MAX` for zero-sized types, so growing means the
            // length calculation overflowed.
            return Err(TryReserveError::CapacityOverflow);
        }

        let required = len.checked_add(additional).ok_or(TryReserveError::CapacityOverflow)?;
        let new_cap = G::next_capacity(self.cap, required).map_err(|_| TryReserveError::CapacityOverflow)?;
        debug_assert!(new_cap >= required && new_cap > self.cap);
        self.reallocate(new_cap)
    }

    /// Shrinks the buffer down to the specified capacity.
    ///
    /// `cap` must not be less than the number of live elements the caller keeps in the buffer.
    pub fn shrink_to_fit(&mut self, cap: usize) {
        debug_assert!(cap <= self.cap);

        if mem::size_of::<T>() == 0 || cap == self.cap {
            return;
        }
        if cap == 0 {
            // Safety: the capacity is non-zero (`cap != self.cap`) and the element is not
            // zero-sized, so there is a live allocation matching this layout.
            unsafe {
                let layout = Layout::array::<T>(self.cap).unwrap_unchecked();
                alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout);
            }
            self.ptr = NonNull::dangling();
            self.cap = 0;
        } else if let Err(err) = self.reallocate(cap) {
            handle_reserve_error(err);
        }
    }

    fn reallocate(&mut self, new_cap: usize) -> Result<(), TryReserveError> {
        let new_layout = array_layout::<T>(new_cap)?;

        let ptr = if self.cap == 0 {
            // Safety: `new_cap` is non-zero on every path that gets here, so the layout has a
            // non-zero size.
            unsafe { alloc::alloc(new_layout) }
        } else {
            // Safety: the old layout is the layout the current allocation was made with, and the
            // new size is non-zero.
            unsafe {
                let old_layout = Layout::array::<T>(self.cap).unwrap_unchecked();
                alloc::realloc(self.ptr.as_ptr() as *mut u8, old_layout, new_layout.size())
            }
        };
        let Some(ptr) = NonNull::new(ptr as *mut T) else {
            return Err(TryReserveError::AllocError(new_layout));
        };

        self.ptr = ptr;
        self.cap = new_cap;
        Ok(())
    }
}

impl<T, G: GrowthStrategy> Drop for RawArray<T, G> {
    fn drop(&mut self) {
        if mem::size_of::<T>() != 0 && self.cap != 0 {
            // Safety: the layout matches the one the allocation was made with, which also means
            // it was already validated at allocation time.
            unsafe {
                let layout = Layout::array::<T>(self.cap).unwrap_unchecked();
                alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout);
            }
        }
    }
}

fn array_layout<T>(cap: usize) -> Result<Layout, TryReserveError> {
    let layout = Layout::array::<T>(cap).map_err(|_| TryReserveError::CapacityOverflow)?;
    if layout.size() > isize::MAX as usize {
        return Err(TryReserveError::CapacityOverflow);
    }
    Ok(layout)
}

#[cold]
fn handle_reserve_error(err: TryReserveError) -> ! {
    match err {
        TryReserveError::CapacityOverflow => panic!("capacity overflow"),
        TryReserveError::AllocError(layout) => alloc::handle_alloc_error(layout),
    }
}
