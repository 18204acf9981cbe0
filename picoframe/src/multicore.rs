//! # Dual-core
//!
//! The device has two physical cores. Core 0 runs the frame loop; core 1 is idle
//! until [`launch_core1`] hands it an entry function, which then runs until reset.
//! There is no way to stop core 1 or wait for it to finish.
//!
//! ```ignore
//! static SAMPLES: Mutex<[u8; 256]> = Mutex::new([0; 256]);
//!
//! launch_core1(|| loop {
//!     let mut samples = SAMPLES.lock();
//!     mix_audio(&mut samples);
//! });
//! ```
//!
//! Anything both cores touch goes behind a [`Mutex`]. Its enter/exit points are the
//! only ordering guarantee between the cores (acquire on enter, release on exit).
//!
//! The lock is the device's native one: not re-entrant, no timeout, and a waiting
//! core spins until the holder lets go. Locking twice from the same core deadlocks;
//! debug builds assert on that and on an exit by a core that doesn't hold the lock.

use alloc::boxed::Box;
use core::cell::UnsafeCell;
use core::hint::spin_loop;
use core::marker::PhantomData;
use core::mem::{align_of, size_of, MaybeUninit};
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};

use log::info;

use crate::platform;

/// Return type of a core 1 entry function. It has no values, so an entry can only
/// satisfy it by never returning.
pub type Never = core::convert::Infallible;

static CORE1_TAKEN: AtomicBool = AtomicBool::new(false);

/// The right to start core 1.
///
/// There is one per boot. Whatever it launches runs forever: no join, no stop, no
/// restart.
#[derive(Debug)]
pub struct Core1 {
    _private: (),
}

impl Core1 {
    /// `Some` exactly once per process.
    pub fn take() -> Option<Core1> {
        if CORE1_TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Core1 { _private: () })
        }
    }

    pub fn launch<F>(self, entry: F)
    where
        F: FnOnce() -> Never + Send + 'static,
    {
        info!("launching core 1");
        platform::get().launch_core1(Box::new(entry));
    }
}

/// Start core 1 running `entry`.
///
/// # Panics
///
/// If core 1 was already launched (or its [`Core1`] taken), or no platform is
/// installed. The latter leaves the right to launch untouched.
pub fn launch_core1<F>(entry: F)
where
    F: FnOnce() -> Never + Send + 'static,
{
    if platform::try_get().is_none() {
        panic!("picoframe: no platform installed, cannot launch core 1");
    }
    match Core1::take() {
        Some(core1) => core1.launch(entry),
        None => panic!("core 1 has already been launched"),
    }
}

/// Number of the calling core, 0 before a platform is installed.
#[inline]
pub fn core_num() -> u8 {
    platform::try_get().map_or(0, |p| p.core_num())
}

const FREE: usize = 0;
const HELD: usize = 1;
const NO_OWNER: isize = -1;

/// The device's lock word pair: the spin lock itself and the owning core.
///
/// Layout is fixed at two machine words with word alignment so it can live in
/// storage shared with native code.
#[repr(C)]
pub struct MutexToken {
    lock: AtomicUsize,
    owner: AtomicIsize,
}

const _: () = assert!(size_of::<MutexToken>() == 2 * size_of::<usize>());
const _: () = assert!(align_of::<MutexToken>() == align_of::<usize>());

impl MutexToken {
    pub const fn new() -> Self {
        Self {
            lock: AtomicUsize::new(FREE),
            owner: AtomicIsize::new(NO_OWNER),
        }
    }

    /// Spin until this core owns the lock.
    #[inline]
    pub fn enter_blocking(&self) {
        let me = core_num() as isize;
        debug_assert_ne!(
            self.owner.load(Ordering::Relaxed),
            me,
            "mutex re-entered on core {me}; this deadlocks"
        );
        while self
            .lock
            .compare_exchange_weak(FREE, HELD, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.lock.load(Ordering::Relaxed) != FREE {
                spin_loop();
            }
        }
        self.owner.store(me, Ordering::Relaxed);
    }

    /// Take the lock if it is free right now.
    #[inline]
    pub fn try_enter(&self) -> bool {
        if self
            .lock
            .compare_exchange(FREE, HELD, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.owner.store(core_num() as isize, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Release the lock.
    ///
    /// # Safety
    ///
    /// The calling core must hold the lock.
    #[inline]
    pub unsafe fn exit(&self) {
        debug_assert_eq!(
            self.owner.load(Ordering::Relaxed),
            core_num() as isize,
            "mutex released by a core that does not hold it"
        );
        self.owner.store(NO_OWNER, Ordering::Relaxed);
        self.lock.store(FREE, Ordering::Release);
    }

    pub fn is_held(&self) -> bool {
        self.lock.load(Ordering::Relaxed) == HELD
    }
}

impl Default for MutexToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize a token in caller-provided storage. Do this once, before any enter.
pub fn mutex_init(storage: &mut MaybeUninit<MutexToken>) -> &mut MutexToken {
    storage.write(MutexToken::new())
}

#[inline]
pub fn mutex_enter_blocking(token: &MutexToken) {
    token.enter_blocking();
}

#[inline]
pub fn mutex_try_enter(token: &MutexToken) -> bool {
    token.try_enter()
}

/// # Safety
///
/// The calling core must hold `token`.
#[inline]
pub unsafe fn mutex_exit(token: &MutexToken) {
    unsafe { token.exit() }
}

/// Data shared between the two cores.
pub struct Mutex<T: ?Sized> {
    token: MutexToken,
    data: UnsafeCell<T>,
}

unsafe impl<T: ?Sized + Send> Send for Mutex<T> {}
unsafe impl<T: ?Sized + Send> Sync for Mutex<T> {}

impl<T> Mutex<T> {
    #[inline]
    pub const fn new(t: T) -> Mutex<T> {
        Mutex {
            token: MutexToken::new(),
            data: UnsafeCell::new(t),
        }
    }

    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> Mutex<T> {
    /// Spin until the lock is ours. Locking again from the same core deadlocks.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.token.enter_blocking();
        MutexGuard {
            lock: self,
            _core_bound: PhantomData,
        }
    }

    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.token.try_enter().then(|| MutexGuard {
            lock: self,
            _core_bound: PhantomData,
        })
    }

    /// No locking needed with exclusive access.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    pub fn token(&self) -> &MutexToken {
        &self.token
    }
}

impl<T: Default> Default for Mutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Held lock. Released on drop, on the core that took it.
#[must_use]
pub struct MutexGuard<'a, T: ?Sized + 'a> {
    lock: &'a Mutex<T>,
    // must be dropped on the core that locked
    _core_bound: PhantomData<*const ()>,
}

unsafe impl<T: ?Sized + Sync> Sync for MutexGuard<'_, T> {}

impl<T: ?Sized> Drop for MutexGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        unsafe { self.lock.token.exit() }
    }
}

impl<T: ?Sized> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.data.get() }
    }
}
