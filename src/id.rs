use std::{fmt, str, time::SystemTime};

use fstr::FStr;

use crate::{time::MAX_TIMESTAMP, Error};

/// Length of the binary representation in bytes.
pub const BINARY_SIZE: usize = 16;

/// Length of the hexadecimal representation without dashes.
pub const HEX_SIZE: usize = 32;

/// Length of the 8-4-4-4-12 canonical text representation.
pub const TEXT_SIZE: usize = 36;

/// Length of the entropy field in bytes.
pub const ENTROPY_SIZE: usize = 10;

/// Represents a UUID compatible, lexicographically sortable identifier.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                      32_bit_uint_time_high                    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     16_bit_uint_time_low      |       16_bit_uint_random      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       32_bit_uint_random                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       32_bit_uint_random                      |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// All fields are big-endian, so the derived ordering sorts by timestamp first and entropy second.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uulid([u8; 16]);

impl Uulid {
    /// Nil UULID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0x00; 16]);

    /// Max UULID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([0xff; 16]);

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns a copy of the underlying byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Creates a UULID from the timestamp and the high and low halves of the entropy field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampTooLarge`] if `unix_ts_ms` does not fit in 48 bits.
    pub fn from_fields(unix_ts_ms: u64, entropy_hi: u16, entropy_lo: u64) -> Result<Self, Error> {
        let mut id = Self::NIL;
        id.set_timestamp(unix_ts_ms)?;
        id.0[6..8].copy_from_slice(&entropy_hi.to_be_bytes());
        id.0[8..16].copy_from_slice(&entropy_lo.to_be_bytes());
        Ok(id)
    }

    /// Parses a UULID from its binary, 32-digit hex or 8-4-4-4-12 hex representation.
    ///
    /// The representation is picked by the length of `data`: 16 bytes are copied verbatim, 32
    /// bytes are decoded as plain hex and 36 bytes as dashed hex.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uulid::Uulid;
    ///
    /// let x = Uulid::parse(b"0178a284-9eaf-b3e7-036d-5b1b9f3cd753")?;
    /// let y = Uulid::parse(b"0178a2849eafb3e7036d5b1b9f3cd753")?;
    /// assert_eq!(x, y);
    /// assert_eq!(x.timestamp(), 1_617_634_303_663);
    /// # Ok::<(), uulid::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadDataSize`] for any other length, [`Error::InvalidHex`] for malformed
    /// digits or separators and [`Error::TimestampTooLarge`] if the decoded timestamp is out of
    /// range.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        let mut dst = [0u8; 16];
        match data.len() {
            BINARY_SIZE => dst.copy_from_slice(data),
            HEX_SIZE => hex::decode_to_slice(data, &mut dst)?,
            TEXT_SIZE => {
                for i in [8, 13, 18, 23] {
                    if data[i] != b'-' {
                        return Err(hex::FromHexError::InvalidHexCharacter {
                            c: char::from(data[i]),
                            index: i,
                        }
                        .into());
                    }
                }
                hex::decode_to_slice(&data[0..8], &mut dst[0..4])?;
                hex::decode_to_slice(&data[9..13], &mut dst[4..6])?;
                hex::decode_to_slice(&data[14..18], &mut dst[6..8])?;
                hex::decode_to_slice(&data[19..23], &mut dst[8..10])?;
                hex::decode_to_slice(&data[24..36], &mut dst[10..16])?;
            }
            _ => return Err(Error::BadDataSize),
        }

        let id = Self(dst);
        if id.timestamp() > MAX_TIMESTAMP {
            return Err(Error::TimestampTooLarge);
        }
        Ok(id)
    }

    /// Returns the millisecond Unix timestamp stored in the first six bytes.
    pub const fn timestamp(&self) -> u64 {
        (self.0[0] as u64) << 40
            | (self.0[1] as u64) << 32
            | (self.0[2] as u64) << 24
            | (self.0[3] as u64) << 16
            | (self.0[4] as u64) << 8
            | self.0[5] as u64
    }

    /// Sets the timestamp field to the given Unix time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampTooLarge`] if `ms` does not fit in 48 bits; the identifier is
    /// left untouched in that case.
    pub fn set_timestamp(&mut self, ms: u64) -> Result<(), Error> {
        if ms > MAX_TIMESTAMP {
            return Err(Error::TimestampTooLarge);
        }
        self.0[0..6].copy_from_slice(&ms.to_be_bytes()[2..]);
        Ok(())
    }

    /// Returns the timestamp field as a [`SystemTime`] with millisecond precision.
    pub fn time(&self) -> SystemTime {
        crate::time::time(self.timestamp())
    }

    /// Sets the timestamp field from a [`SystemTime`].
    pub fn set_time(&mut self, t: SystemTime) -> Result<(), Error> {
        self.set_timestamp(crate::time::timestamp(t))
    }

    /// Returns a copy of the 80-bit entropy field.
    pub fn entropy(&self) -> [u8; ENTROPY_SIZE] {
        let mut dst = [0u8; ENTROPY_SIZE];
        dst.copy_from_slice(&self.0[6..]);
        dst
    }

    /// Overwrites the entropy field with `e`, which must be exactly ten bytes long.
    pub fn set_entropy(&mut self, e: &[u8]) -> Result<(), Error> {
        if e.len() != ENTROPY_SIZE {
            return Err(Error::BadDataSize);
        }
        self.0[6..].copy_from_slice(e);
        Ok(())
    }

    /// Returns the entropy field as an 80-bit integer.
    #[cfg(test)]
    pub(crate) fn entropy_value(&self) -> u128 {
        u128::from_be_bytes(self.0) & ((1 << 80) - 1)
    }

    /// Writes the binary representation into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadBufferSize`] unless `dst` is exactly 16 bytes long.
    pub fn encode_binary_to(&self, dst: &mut [u8]) -> Result<(), Error> {
        if dst.len() != BINARY_SIZE {
            return Err(Error::BadBufferSize);
        }
        dst.copy_from_slice(&self.0);
        Ok(())
    }

    /// Writes the 8-4-4-4-12 representation into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadBufferSize`] unless `dst` is exactly 36 bytes long.
    pub fn encode_text_to(&self, dst: &mut [u8]) -> Result<(), Error> {
        let dst: &mut [u8; TEXT_SIZE] = dst.try_into().map_err(|_| Error::BadBufferSize)?;
        self.write_text(dst);
        Ok(())
    }

    /// Writes the JSON string body into `dst`, which is the same as [`Uulid::encode_text_to`].
    pub fn encode_json_to(&self, dst: &mut [u8]) -> Result<(), Error> {
        self.encode_text_to(dst)
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string-like type that can be handled like [`str`] through `Deref` and other common traits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uulid::Uulid;
    ///
    /// let x = "0178a284-9eaf-b3e7-036d-5b1b9f3cd753".parse::<Uulid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "0178a284-9eaf-b3e7-036d-5b1b9f3cd753");
    /// # Ok::<(), uulid::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<TEXT_SIZE> {
        let mut buffer = [0u8; TEXT_SIZE];
        self.write_text(&mut buffer);
        debug_assert!(buffer.is_ascii());
        // SAFETY: `write_text` fills the buffer with ASCII hex digits and dashes only
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    fn write_text(&self, dst: &mut [u8; TEXT_SIZE]) {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut dst_iter = dst.iter_mut();
        for (i, e) in self.0.iter().enumerate() {
            if let Some(d) = dst_iter.next() {
                *d = DIGITS[usize::from(e >> 4)];
            }
            if let Some(d) = dst_iter.next() {
                *d = DIGITS[usize::from(e & 15)];
            }
            if i == 3 || i == 5 || i == 7 || i == 9 {
                if let Some(d) = dst_iter.next() {
                    *d = b'-';
                }
            }
        }
    }
}

impl fmt::Display for Uulid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uulid {
    type Err = Error;

    /// Creates an object from the 8-4-4-4-12 or the 32-digit hexadecimal representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse(src.as_bytes())
    }
}

impl TryFrom<&[u8]> for Uulid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::parse(src)
    }
}

impl TryFrom<&str> for Uulid {
    type Error = Error;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::parse(src.as_bytes())
    }
}

impl TryFrom<String> for Uulid {
    type Error = Error;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        Self::parse(src.as_bytes())
    }
}

impl From<Uulid> for String {
    fn from(src: Uulid) -> Self {
        src.to_string()
    }
}

impl From<Uulid> for [u8; 16] {
    fn from(src: Uulid) -> Self {
        src.0
    }
}

impl From<[u8; 16]> for Uulid {
    /// Wraps sixteen bytes; every byte pattern holds an in-range 48-bit timestamp.
    fn from(src: [u8; 16]) -> Self {
        Self(src)
    }
}

impl AsRef<[u8]> for Uulid {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Uulid> for u128 {
    fn from(src: Uulid) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl From<u128> for Uulid {
    fn from(src: u128) -> Self {
        Self(src.to_be_bytes())
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uulid;

    impl From<Uulid> for uuid::Uuid {
        fn from(src: Uulid) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl From<uuid::Uuid> for Uulid {
        fn from(src: uuid::Uuid) -> Self {
            Self(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uulid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uulid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uulid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uulid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UULID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Uulid::parse(value.as_bytes()).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Uulid::parse(value).map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{Uulid, BINARY_SIZE, TEXT_SIZE};
    use crate::{time::MAX_TIMESTAMP, Error};

    const ENCODED: &str = "0178a284-9eaf-b3e7-036d-5b1b9f3cd753";
    const TIMESTAMP: u64 = 1_617_634_303_663;
    const ENTROPY: &str = "b3e7036d5b1b9f3cd753";

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((u64, u16, u64), &'static str)] {
        &[
            ((0, 0, 0), "00000000-0000-0000-0000-000000000000"),
            ((MAX_TIMESTAMP, 0, 0), "ffffffff-ffff-0000-0000-000000000000"),
            ((0, u16::MAX, 0), "00000000-0000-ffff-0000-000000000000"),
            ((0, 0, u64::MAX), "00000000-0000-0000-ffff-ffffffffffff"),
            (
                (MAX_TIMESTAMP, u16::MAX, u64::MAX),
                "ffffffff-ffff-ffff-ffff-ffffffffffff",
            ),
            (
                (TIMESTAMP, 0xb3e7, 0x036d_5b1b_9f3c_d753),
                "0178a284-9eaf-b3e7-036d-5b1b9f3cd753",
            ),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (fs, text) in prepare_cases() {
            let from_fields = Uulid::from_fields(fs.0, fs.1, fs.2).unwrap();
            assert_eq!(from_fields.timestamp(), fs.0);
            assert_eq!(text.parse::<Uulid>().unwrap(), from_fields);
            assert_eq!(text.to_uppercase().parse::<Uulid>().unwrap(), from_fields);
            assert_eq!(text.replace('-', "").parse::<Uulid>().unwrap(), from_fields);
            assert_eq!(&from_fields.encode() as &str, *text);
            assert_eq!(&from_fields.to_string(), text);
            #[cfg(feature = "uuid")]
            assert_eq!(&uuid::Uuid::from(from_fields).to_string(), text);
        }
    }

    /// Parses the reference identifier into its fields
    #[test]
    fn parses_the_reference_identifier_into_its_fields() {
        let id = Uulid::parse(ENCODED.as_bytes()).unwrap();
        assert_eq!(id.timestamp(), TIMESTAMP);
        assert_eq!(hex::encode(id.entropy()), ENTROPY);
        assert_eq!(id.to_string(), ENCODED);
        assert_eq!(&id.encode() as &str, ENCODED);
    }

    /// Round-trips through binary and text forms
    #[test]
    fn round_trips_through_binary_and_text_forms() {
        for (fs, _) in prepare_cases() {
            let e = Uulid::from_fields(fs.0, fs.1, fs.2).unwrap();

            let mut bin = [0u8; BINARY_SIZE];
            e.encode_binary_to(&mut bin).unwrap();
            assert_eq!(Uulid::parse(&bin).unwrap(), e);
            assert_eq!(Uulid::parse(&e.to_bytes()).unwrap(), e);

            let mut text = [0u8; TEXT_SIZE];
            e.encode_text_to(&mut text).unwrap();
            assert_eq!(Uulid::parse(&text).unwrap(), e);

            let mut json = [0u8; TEXT_SIZE];
            e.encode_json_to(&mut json).unwrap();
            assert_eq!(json, text);
        }
    }

    /// Returns error to invalid data sizes
    #[test]
    fn returns_error_to_invalid_data_sizes() {
        let cases: [&[u8]; 7] = [
            b"",
            b"0178a284-9eaf",
            &[0u8; 12],
            &[0u8; 15],
            &[0u8; 17],
            b"0178a284-9eaf-b3e7-036d-5b1b9f3cd753 ",
            b"{0178a284-9eaf-b3e7-036d-5b1b9f3cd753}",
        ];

        for e in cases {
            assert!(matches!(Uulid::parse(e), Err(Error::BadDataSize)));
        }
    }

    /// Returns error to malformed hex digits
    #[test]
    fn returns_error_to_malformed_hex_digits() {
        let cases = [
            "0178a284-9eaf-b3e7-036d-5b1b9f3cd75g",
            "0178a28g-9eaf-b3e7-036d-5b1b9f3cd753",
            "0178a284-9eaf-b3e7-036d_5b1b9f3cd753",
            "0178a284-9eafb3e7-036d-5b1b9f3cd7535",
            " 178a284-9eaf-b3e7-036d-5b1b9f3cd753",
            "+178a284-9eaf-b3e7-036d-5b1b9f3cd753",
            "0178a284-9e f-b3e7-036d-5b1b9f3cd753",
            "0178a2849eafb3e7036d5b1b9f3cd75z",
        ];

        for e in cases {
            assert!(
                matches!(e.parse::<Uulid>(), Err(Error::InvalidHex(_))),
                "{}",
                e
            );
        }
    }

    /// Checks the timestamp range when setting fields
    #[test]
    fn checks_the_timestamp_range_when_setting_fields() {
        let mut id: Uulid = ENCODED.parse().unwrap();
        id.set_timestamp(MAX_TIMESTAMP).unwrap();
        assert_eq!(id.timestamp(), MAX_TIMESTAMP);

        assert!(matches!(
            id.set_timestamp(MAX_TIMESTAMP + 1),
            Err(Error::TimestampTooLarge)
        ));
        assert_eq!(id.timestamp(), MAX_TIMESTAMP);

        id.set_timestamp(TIMESTAMP).unwrap();
        assert_eq!(id.to_string(), ENCODED);

        assert!(matches!(
            Uulid::from_fields(MAX_TIMESTAMP + 1, 0, 0),
            Err(Error::TimestampTooLarge)
        ));
    }

    /// Converts the timestamp field to and from system time
    #[test]
    fn converts_the_timestamp_field_to_and_from_system_time() {
        let id: Uulid = ENCODED.parse().unwrap();
        let mut other = Uulid::NIL;
        other.set_time(id.time()).unwrap();
        assert_eq!(other.timestamp(), TIMESTAMP);
        assert_eq!(other.entropy(), [0u8; 10]);
    }

    /// Replaces entropy only with ten bytes
    #[test]
    fn replaces_entropy_only_with_ten_bytes() {
        let mut id: Uulid = ENCODED.parse().unwrap();
        assert!(matches!(id.set_entropy(&[0u8; 9]), Err(Error::BadDataSize)));
        assert!(matches!(id.set_entropy(&[0u8; 11]), Err(Error::BadDataSize)));
        assert_eq!(hex::encode(id.entropy()), ENTROPY);

        id.set_entropy(&[0xff; 10]).unwrap();
        assert_eq!(id.timestamp(), TIMESTAMP);
        assert_eq!(id.to_string(), "0178a284-9eaf-ffff-ffff-ffffffffffff");
        assert_eq!(id.entropy_value(), (1 << 80) - 1);
    }

    /// Rejects output buffers of the wrong size
    #[test]
    fn rejects_output_buffers_of_the_wrong_size() {
        let id: Uulid = ENCODED.parse().unwrap();
        for len in [0, 6, 15, 17, 32, 35, 37] {
            let mut buf = vec![0u8; len];
            assert!(matches!(
                id.encode_binary_to(&mut buf),
                Err(Error::BadBufferSize)
            ));
            assert!(matches!(
                id.encode_text_to(&mut buf),
                Err(Error::BadBufferSize)
            ));
            assert!(matches!(
                id.encode_json_to(&mut buf),
                Err(Error::BadBufferSize)
            ));
        }
    }

    /// Orders by timestamp then entropy
    #[test]
    fn orders_by_timestamp_then_entropy() {
        let a = Uulid::from_fields(TIMESTAMP, u16::MAX, u64::MAX).unwrap();
        let b = Uulid::from_fields(TIMESTAMP + 1, 0, 0).unwrap();
        let c = Uulid::from_fields(TIMESTAMP + 1, 0, 1).unwrap();
        let d = Uulid::from_fields(TIMESTAMP + 1, 1, 0).unwrap();
        assert!(Uulid::NIL < a && a < b && b < c && c < d && d < Uulid::MAX);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
        assert!(a.to_string() < b.to_string());
    }

    /// Returns Nil and Max UULIDs
    #[test]
    fn returns_nil_and_max_uulids() {
        assert_eq!(
            &Uulid::NIL.encode() as &str,
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            &Uulid::MAX.encode() as &str,
            "ffffffff-ffff-ffff-ffff-ffffffffffff"
        );
        assert_eq!(Uulid::MAX.timestamp(), MAX_TIMESTAMP);
        assert_eq!(Uulid::default(), Uulid::NIL);
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (fs, _) in prepare_cases() {
            let e = Uulid::from_fields(fs.0, fs.1, fs.2).unwrap();
            assert_eq!(Uulid::from(<[u8; 16]>::from(e)), e);
            assert_eq!(Uulid::from(u128::from(e)), e);
            assert_eq!(Uulid::try_from(e.as_bytes().as_slice()).unwrap(), e);
            assert_eq!(Uulid::try_from(String::from(e)).unwrap(), e);
            assert_eq!(Uulid::try_from(&e.encode() as &str).unwrap(), e);
            assert_eq!(e.as_ref(), e.as_bytes());
            #[cfg(feature = "uuid")]
            assert_eq!(Uulid::from(<uuid::Uuid>::from(e)), e);
            #[cfg(feature = "uuid")]
            assert_eq!(uuid::Uuid::from(e).as_u128(), u128::from(e));
        }
    }
}
