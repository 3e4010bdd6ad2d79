//! UULID generator and related types.

use std::{
    iter::FusedIterator,
    sync::{Mutex, MutexGuard, PoisonError},
    time::SystemTime,
};

use rand::{rngs::OsRng, RngCore};

use crate::{time::MAX_TIMESTAMP, Error, Uulid};

/// A trait that defines the minimum system clock interface for [`Generator`].
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// The default [`TimeSource`] that uses [`SystemTime`].
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> u64 {
        crate::time::timestamp(SystemTime::now())
    }
}

/// Represents a UULID generator that encapsulates an 80-bit entropy counter and guarantees the
/// monotonic order of UULIDs generated within the same millisecond.
///
/// The generator keeps its state behind a mutex, so a single instance can be shared by reference
/// or through an [`Arc`](std::sync::Arc) and every call sees a distinct, larger UULID than the
/// call that acquired the lock before it.
///
/// # Examples
///
/// ```rust
/// use std::{sync, thread};
/// use uulid::Generator;
///
/// let g = sync::Arc::new(Generator::new()?);
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.generate().unwrap(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// # Ok::<(), uulid::Error>(())
/// ```
///
/// # Entropy sequencing
///
/// When the clock moves to a new millisecond, both halves of the entropy field are drawn from a
/// small internal pseudo-random function seeded at construction. Within the same millisecond the
/// 80-bit entropy is incremented by one per call instead. A millisecond smaller than the last one
/// used is rejected with [`Error::ClockWentBackward`], and running out of entropy within one
/// millisecond is reported as [`Error::EntropyExhausted`]; the generator state is left untouched
/// by both errors.
#[derive(Debug)]
pub struct Generator<T = StdSystemTime> {
    state: Mutex<State<T>>,
}

#[derive(Debug)]
struct State<T> {
    seed: u64,
    last: Option<u64>,
    hi: u16,
    lo: u64,
    time: T,
}

impl Generator {
    /// Creates a generator seeded from the operating system's secure random source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SeedUnavailable`] if the random source cannot be read.
    pub fn new() -> Result<Self, Error> {
        Ok(Self::with_seed(secure_seed()?))
    }

    /// Creates a generator from an explicit seed.
    ///
    /// Generators created with the same seed produce the same entropy for the same sequence of
    /// timestamps, which is mostly useful for tests. Use [`Generator::new`] otherwise.
    pub const fn with_seed(seed: u64) -> Self {
        Self::with_time_source(seed, StdSystemTime)
    }
}

impl<T: TimeSource> Generator<T> {
    /// Creates a generator with an explicit seed and a custom clock.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uulid::{Generator, TimeSource};
    ///
    /// struct Frozen(u64);
    /// impl TimeSource for Frozen {
    ///     fn unix_ts_ms(&mut self) -> u64 {
    ///         self.0
    ///     }
    /// }
    ///
    /// let g = Generator::with_time_source(42, Frozen(1_617_634_303_663));
    /// let a = g.generate()?;
    /// let b = g.generate()?;
    /// assert_eq!(a.timestamp(), b.timestamp());
    /// assert!(a < b);
    /// # Ok::<(), uulid::Error>(())
    /// ```
    pub const fn with_time_source(seed: u64, time: T) -> Self {
        Self {
            state: Mutex::new(State {
                seed,
                last: None,
                hi: 0,
                lo: 0,
                time,
            }),
        }
    }

    /// Generates a new UULID from the current timestamp.
    ///
    /// The clock is read while the internal lock is held.
    ///
    /// # Errors
    ///
    /// See [`Generator::generate_core`].
    pub fn generate(&self) -> Result<Uulid, Error> {
        let mut state = self.lock();
        let unix_ts_ms = state.time.unix_ts_ms();
        state.generate_core(unix_ts_ms)
    }

    /// Generates a new UULID from the `unix_ts_ms` passed.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampTooLarge`] if `unix_ts_ms` does not fit in 48 bits.
    /// - [`Error::ClockWentBackward`] if `unix_ts_ms` is smaller than the previous one.
    /// - [`Error::EntropyExhausted`] if all 2^80 entropy values of the millisecond are used.
    pub fn generate_core(&self, unix_ts_ms: u64) -> Result<Uulid, Error> {
        self.lock().generate_core(unix_ts_ms)
    }

    /// Returns an infinite iterator that produces the result of [`Generator::generate`] for each
    /// call of `next()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uulid::Generator;
    ///
    /// Generator::new()?
    ///     .iter()
    ///     .enumerate()
    ///     .skip(4)
    ///     .take(4)
    ///     .for_each(|(i, e)| println!("[{}] {}", i, e.unwrap()));
    /// # Ok::<(), uulid::Error>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { generator: self }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // the state is plain integers updated only after all checks pass
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> State<T> {
    fn generate_core(&mut self, unix_ts_ms: u64) -> Result<Uulid, Error> {
        if unix_ts_ms > MAX_TIMESTAMP {
            return Err(Error::TimestampTooLarge);
        }

        match self.last {
            Some(last) if unix_ts_ms == last => {
                let (lo, carry) = self.lo.overflowing_add(1);
                let hi = if carry {
                    self.hi.checked_add(1).ok_or_else(|| {
                        log::warn!("uulid: entropy exhausted within millisecond {}", unix_ts_ms);
                        Error::EntropyExhausted
                    })?
                } else {
                    self.hi
                };
                self.hi = hi;
                self.lo = lo;
            }
            Some(last) if unix_ts_ms < last => {
                log::warn!(
                    "uulid: clock went backward from {} to {}, refusing to generate",
                    last,
                    unix_ts_ms
                );
                return Err(Error::ClockWentBackward {
                    last,
                    now: unix_ts_ms,
                });
            }
            _ => self.advance(unix_ts_ms),
        }

        Uulid::from_fields(unix_ts_ms, self.hi, self.lo)
    }

    /// Moves to a new millisecond and draws fresh entropy.
    fn advance(&mut self, unix_ts_ms: u64) {
        self.last = Some(unix_ts_ms);
        self.hi = self.next_u64() as u16;
        self.lo = self.next_u64();
    }

    fn next_u64(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(0xa076_1d64_78bd_642f);
        let t = u128::from(self.seed ^ 0xe703_7ed1_a0b4_28db) * u128::from(self.seed);
        (t >> 64) as u64 ^ t as u64
    }
}

/// Reads a 64-bit seed from [`OsRng`].
fn secure_seed() -> Result<u64, Error> {
    let mut bytes = [0u8; 8];
    OsRng.try_fill_bytes(&mut bytes)?;
    log::debug!("uulid: seeded generator from the operating system");
    Ok(u64::from_be_bytes(bytes))
}

/// Infinite iterator over [`Generator::generate`] results, created by [`Generator::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    generator: &'a Generator<T>,
}

impl<T: TimeSource> Iterator for Iter<'_, T> {
    type Item = Result<Uulid, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T: TimeSource> FusedIterator for Iter<'_, T> {}
