//! Value and scan helpers for database drivers.
//!
//! UULIDs are persisted in their 8-4-4-4-12 text form rather than as raw bytes so that stored
//! values stay readable and sort the same way in text-typed indexes.

use std::any::Any;

use crate::{Error, Uulid};

impl Uulid {
    /// Returns the value handed to a storage driver, which is the 8-4-4-4-12 text form.
    pub fn value(&self) -> String {
        self.to_string()
    }

    /// Reads a UULID from a dynamically typed value returned by a storage driver.
    ///
    /// `None` stands for a SQL `NULL` and yields `Ok(None)`. Text (`String` or `&str`) and bytes
    /// (`Vec<u8>`, `&'static [u8]` or `[u8; 16]`) are passed to [`Uulid::parse`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uulid::Uulid;
    ///
    /// let text = String::from("0178a284-9eaf-b3e7-036d-5b1b9f3cd753");
    /// let id = Uulid::scan(Some(&text))?.unwrap();
    /// assert_eq!(id.value(), text);
    ///
    /// assert!(Uulid::scan(None)?.is_none());
    /// assert!(Uulid::scan(Some(&42i64)).is_err());
    /// # Ok::<(), uulid::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSourceType`] for any other type, or the error of
    /// [`Uulid::parse`].
    pub fn scan(src: Option<&dyn Any>) -> Result<Option<Self>, Error> {
        let Some(src) = src else {
            return Ok(None);
        };

        let data: &[u8] = if let Some(s) = src.downcast_ref::<String>() {
            s.as_bytes()
        } else if let Some(s) = src.downcast_ref::<&str>() {
            s.as_bytes()
        } else if let Some(b) = src.downcast_ref::<Vec<u8>>() {
            b
        } else if let Some(b) = src.downcast_ref::<&[u8]>() {
            b
        } else if let Some(b) = src.downcast_ref::<[u8; 16]>() {
            b
        } else {
            return Err(Error::InvalidSourceType);
        };

        Self::parse(data).map(Some)
    }
}
