// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{MutexGuard, PoisonError, RwLockReadGuard, RwLockWriteGuard};

pub type StdMutex<T> = std::sync::Mutex<T>;
pub type StdRwLock<T> = std::sync::RwLock<T>;

/// Lock helpers that recover from poisoning instead of panicking. Every critical section
/// in this crate leaves its state consistent between statements, so the data behind a
/// poisoned lock is still usable.
pub trait LockRecoverExt<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T>;
}

impl<T> LockRecoverExt<T> for StdMutex<T> {
    fn lock_recover(&self) -> MutexGuard<'_, T> {
        self.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub trait RwLockRecoverExt<T> {
    fn read_recover(&self) -> RwLockReadGuard<'_, T>;
    fn write_recover(&self) -> RwLockWriteGuard<'_, T>;
}

impl<T> RwLockRecoverExt<T> for StdRwLock<T> {
    fn read_recover(&self) -> RwLockReadGuard<'_, T> {
        self.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_recover(&self) -> RwLockWriteGuard<'_, T> {
        self.write().unwrap_or_else(PoisonError::into_inner)
    }
}
