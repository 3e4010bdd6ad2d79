//! Default generator and entry point function.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync::OnceLock;

use crate::{Error, Generator, Uulid};

/// Returns the process-wide default generator, creating one with a secure seed if none exists.
///
/// A failed creation is returned to the caller and retried on the next call. When two threads
/// race to create the generator, only one instance is ever installed.
pub fn default_generator() -> Result<&'static Generator, Error> {
    static G: OnceLock<Generator> = OnceLock::new();
    if let Some(g) = G.get() {
        return Ok(g);
    }

    let g = Generator::new()?;
    Ok(G.get_or_init(|| {
        log::debug!("uulid: installed default generator");
        g
    }))
}

/// Generates a UULID with the process-wide default generator.
///
/// This function guarantees the process-wide monotonic order of UULIDs generated within the same
/// millisecond.
///
/// # Examples
///
/// ```rust
/// let id = uulid::new()?;
/// println!("{}", id); // e.g., "0178a284-9eaf-b3e7-036d-5b1b9f3cd753"
/// println!("{:?}", id.as_bytes()); // as 16-byte big-endian array
///
/// let id_string: String = uulid::new()?.into();
/// # Ok::<(), uulid::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::SeedUnavailable`] if the default generator cannot be seeded, and otherwise
/// the errors of [`Generator::generate`].
pub fn new() -> Result<Uulid, Error> {
    default_generator()?.generate()
}
