//! Encoder.

use crate::{fountain, ur::UR};
use core::str;

/// A uniform resource encoder with an underlying fountain encoding.
///
/// # Examples
///
/// See the [`crate`] documentation for an example.
#[derive(Default)]
pub struct Encoder<'a, 'b> {
    ur_type: Option<&'a str>,
    fountain: fountain::encoder::Encoder<'b>,
}

impl<'a, 'b> Encoder<'a, 'b> {
    /// Construct a new [`Encoder`].
    pub const fn new() -> Self {
        Self {
            ur_type: None,
            fountain: fountain::encoder::Encoder::new(),
        }
    }

    /// Creates a new encoder for the given message payload.
    ///
    /// The emitted fountain parts will respect the maximum fragment length
    /// argument.
    ///
    /// # Examples
    ///
    /// See the [`crate`] documentation for an example.
    ///
    /// # Panics
    ///
    /// This function panics if `ur_type` or `message` is empty, or if
    /// `max_fragment_length` is zero.
    pub fn start(&mut self, ur_type: &'a str, message: &'b [u8], max_fragment_length: usize) {
        self.ur_type = Some(ur_type);
        self.fountain.start(message, max_fragment_length);
    }

    /// Returns the current count of already emitted parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use ur::Encoder;
    ///
    /// let mut encoder = Encoder::new();
    /// encoder.start("bytes", "data".as_bytes(), 5);
    ///
    /// assert_eq!(encoder.current_sequence(), 0);
    /// encoder.next_part();
    /// assert_eq!(encoder.current_sequence(), 1);
    /// ```
    #[inline]
    pub fn current_sequence(&self) -> u32 {
        self.fountain.current_sequence()
    }

    /// Returns the number of segments the original message has been split up into.
    ///
    /// # Examples
    ///
    /// ```
    /// use ur::Encoder;
    ///
    /// let mut encoder = Encoder::new();
    /// encoder.start("bytes", "data".as_bytes(), 3);
    /// assert_eq!(encoder.sequence_count(), 2);
    /// ```
    #[inline]
    pub fn sequence_count(&self) -> u32 {
        self.fountain.sequence_count()
    }

    /// Returns the URI corresponding to next fountain part.
    ///
    /// # Examples
    ///
    /// See the [`crate`] documentation for an example.
    pub fn next_part(&mut self) -> UR<'_> {
        UR::MultiPartDeserialized {
            ur_type: self.ur_type.expect("encoder is not initialized"),
            fragment: self.fountain.next_part(),
        }
    }
}
