use std::{
    cell::UnsafeCell,
    fmt::{Debug, Formatter},
    mem,
    rc::{Rc, Weak},
};

pub struct CloneCell<T: UnsafeCellCloneSafe> {
    data: UnsafeCell<T>,
}

impl<T: UnsafeCellCloneSafe + Debug> Debug for CloneCell<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        unsafe { (*self.data.get()).fmt(f) }
    }
}

impl<T: UnsafeCellCloneSafe> CloneCell<T> {
    pub fn new(t: T) -> Self {
        Self {
            data: UnsafeCell::new(t),
        }
    }

    #[inline(always)]
    pub fn get(&self) -> T {
        unsafe { (*self.data.get()).clone() }
    }

    #[inline(always)]
    pub fn set(&self, t: T) -> T {
        unsafe { mem::replace(&mut *self.data.get(), t) }
    }

    #[inline(always)]
    pub fn take(&self) -> T
    where
        T: Default,
    {
        unsafe { mem::take(&mut *self.data.get()) }
    }
}

impl<T: Default + UnsafeCellCloneSafe> Default for CloneCell<T> {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

/// Safety: Clone must not recurse into the containing CloneCell.
pub unsafe trait UnsafeCellCloneSafe: Clone {}

unsafe impl<T: UnsafeCellCloneSafe> UnsafeCellCloneSafe for Option<T> {}

unsafe impl<T: ?Sized> UnsafeCellCloneSafe for Rc<T> {}

unsafe impl<T: ?Sized> UnsafeCellCloneSafe for Weak<T> {}
