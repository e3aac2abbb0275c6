// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-FileCopyrightText: © 2020 Dominik Spicher <dominikspicher@gmail.com>
// SPDX-License-Identifier: MIT

//! Decoder.

use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::fmt;

use crate::fountain::{
    chooser::FragmentChooser,
    part::{IndexedPart, MessageDescription, Part},
};

/// A decoder capable of receiving and recombining fountain-encoded transmissions.
///
/// # Examples
///
/// See the [`crate::fountain`] module documentation for an example.
#[derive(Default)]
pub struct Decoder {
    message: Vec<u8>,
    mixed_parts: Vec<IndexedPart>,
    received: BTreeSet<usize>,
    queue: VecDeque<IndexedPart>,
    fragment_chooser: FragmentChooser,
    message_description: Option<MessageDescription>,
}

impl Decoder {
    /// Receives a fountain-encoded part into the decoder.
    ///
    /// # Examples
    ///
    /// See the [`crate::fountain`] module documentation for an example.
    ///
    /// # Errors
    ///
    /// If the part would fail [`validate`] because it is inconsistent
    /// with previously received parts, an error will be returned.
    ///
    /// [`validate`]: Decoder::is_part_consistent
    pub fn receive(&mut self, part: &Part) -> Result<bool, Error> {
        if self.is_complete() {
            return Ok(false);
        }

        if !part.is_valid() {
            return Err(Error::InvalidPart);
        }

        if self.is_empty() {
            let message_len = part.data.len() * usize::try_from(part.sequence_count).unwrap();
            self.message.resize(message_len, 0);
            self.message_description = Some(part.to_message_description());
        } else if !self.is_part_consistent(part) {
            return Err(Error::InconsistentPart {
                received: part.to_message_description(),
                expected: self.message_description.clone().unwrap(),
            });
        }

        let indexes = self.fragment_chooser.choose_fragments(
            part.sequence,
            part.sequence_count,
            part.checksum,
        );

        let data = part.data.to_vec();

        let part = IndexedPart::new(data, indexes);
        self.queue.push_back(part);

        while !self.is_complete() && !self.queue.is_empty() {
            let part = self.queue.pop_front().unwrap();
            if part.is_simple() {
                self.process_simple(&part)?;
            } else {
                self.process_mixed(part);
            }
        }
        Ok(!self.is_complete())
    }

    /// Checks whether a [`Part`] is receivable by the decoder.
    ///
    /// This can fail if other parts were previously received whose
    /// metadata (such as number of segments) is inconsistent with the
    /// present [`Part`]. Note that a fresh decoder will always return
    /// false here.
    #[must_use]
    pub fn is_part_consistent(&self, part: &Part) -> bool {
        match self.message_description {
            Some(ref message_description) => part == message_description,
            None => false,
        }
    }

    /// If [`complete`], returns the decoded message, `None` otherwise.
    ///
    /// # Errors
    ///
    /// If an inconsistent internal state is detected, an error will be returned.
    ///
    /// # Examples
    ///
    /// See the [`crate::fountain`] module documentation for an example.
    ///
    /// [`complete`]: Decoder::is_complete
    pub fn message(&self) -> Result<Option<&[u8]>, Error> {
        if self.is_complete() {
            if self.message[self.message_description.as_ref().unwrap().message_length..]
                .iter()
                .any(|&b| b != 0)
            {
                return Err(Error::InvalidPadding);
            }

            Ok(Some(
                &self.message[..self.message_description.as_ref().unwrap().message_length],
            ))
        } else {
            Ok(None)
        }
    }

    /// Returns whether the decoder is complete and hence the message available.
    ///
    /// # Examples
    ///
    /// See the [`crate::fountain`] module documentation for an example.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        self.received.len()
            == self
                .message_description
                .as_ref()
                .unwrap()
                .sequence_count
                .try_into()
                .unwrap()
    }

    /// Calculate estimated percentage of completion.
    pub fn estimated_percent_complete(&self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }

        if self.is_empty() {
            return 0.0;
        }

        let estimated_input_parts =
            f64::from(self.message_description.as_ref().unwrap().sequence_count) * 1.75;
        let received_parts = u32::try_from(self.received.len()).unwrap();
        f64::min(0.99, f64::from(received_parts) / estimated_input_parts)
    }

    /// Returns `true` if the decoder doesn't contain any data.
    ///
    /// Once a part is successfully [received](Self::receive) this method will
    /// return `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
            && self.mixed_parts.is_empty()
            && self.received.is_empty()
            && self.queue.is_empty()
            && self.message_description.is_none()
    }

    /// Clear the decoder so that it can be used again.
    pub fn clear(&mut self) {
        self.message.clear();
        self.mixed_parts.clear();
        self.received.clear();
        self.queue.clear();
        self.message_description = None;

        debug_assert!(self.is_empty());
    }

    fn reduce_mixed(&mut self, part: &IndexedPart) {
        self.mixed_parts.retain_mut(|mixed_part| {
            mixed_part.reduce(part);

            if mixed_part.is_simple() {
                self.queue.push_back(mixed_part.clone());
            }

            !mixed_part.is_simple()
        });
    }

    fn process_simple(&mut self, part: &IndexedPart) -> Result<(), Error> {
        let index = *part.indexes.first().unwrap();
        if self.received.contains(&index) {
            return Ok(());
        }

        self.reduce_mixed(part);

        let offset = index * self.message_description.as_ref().unwrap().fragment_length;
        self.message[offset..offset + self.message_description.as_ref().unwrap().fragment_length]
            .copy_from_slice(&part.data);
        self.received.insert(index);

        Ok(())
    }

    fn process_mixed(&mut self, mut part: IndexedPart) {
        for mixed_part in self.mixed_parts.iter() {
            if part.indexes == mixed_part.indexes {
                return;
            }
        }

        // Reduce this part by all simple parts.
        for &index in self.received.iter() {
            let offset = index * self.message_description.as_ref().unwrap().fragment_length;
            part.reduce_by_simple(
                &self.message
                    [offset..offset + self.message_description.as_ref().unwrap().fragment_length],
                index,
            );
            if part.is_simple() {
                break;
            }
        }

        // Then reduce this part by all the mixed parts.
        if !part.is_simple() {
            for mixed_part in self.mixed_parts.iter() {
                part.reduce(mixed_part);
                if part.is_simple() {
                    break;
                }
            }
        }

        if part.is_simple() {
            self.queue.push_back(part);
        } else {
            self.reduce_mixed(&part);
            self.mixed_parts.push(part);
        }
    }
}

/// Errors that can happen during decoding.
#[derive(Debug)]
pub enum Error {
    /// The padding is invalid.
    InvalidPadding,
    /// The received part is inconsistent with the previously received ones.
    InconsistentPart {
        /// The description of the message from the received part.
        received: MessageDescription,
        /// The expected description of the message originated from the previous parts scanned.
        expected: MessageDescription,
    },
    /// The received part is empty.
    InvalidPart,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPadding => write!(f, "Invalid padding")?,
            Error::InconsistentPart { received, expected } => {
                write!(f, "Inconsistent part: ")?;

                if received.sequence_count != expected.sequence_count {
                    write!(
                        f,
                        "sequence count mismatch (received {}, expected {}). ",
                        received.sequence_count, expected.sequence_count
                    )?;
                }

                if received.message_length != expected.message_length {
                    write!(
                        f,
                        "message length mismatch (received {}, expected {}). ",
                        received.message_length, expected.message_length
                    )?;
                }

                if received.checksum != expected.checksum {
                    write!(
                        f,
                        "checksum mismatch (received {:X}, expected {:X}). ",
                        received.checksum, expected.checksum
                    )?;
                }

                if received.fragment_length != expected.fragment_length {
                    write!(
                        f,
                        "checksum mismatch (received {:X}, expected {:X}). ",
                        received.fragment_length, expected.fragment_length
                    )?;
                }
            }
            Error::InvalidPart => write!(f, "The scanned part is empty")?,
        };
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::{fountain::Encoder, xoshiro::test_utils::make_message};

    const MESSAGE_SIZE: usize = 32767;
    const MAX_FRAGMENT_LEN: usize = 1000;
    const SEED: &str = "Wolf";

    fn message() -> Vec<u8> {
        make_message(SEED, MESSAGE_SIZE)
    }

    #[test]
    fn test_decoder() {
        let message = message();
        let mut encoder = Encoder::new();
        encoder.start(&message, MAX_FRAGMENT_LEN);
        let mut decoder = Decoder::default();
        while !decoder.is_complete() {
            assert_eq!(decoder.message().unwrap(), None);
            let part = encoder.next_part();
            let _next = decoder.receive(&part).unwrap();
        }
        assert_eq!(decoder.message().unwrap(), Some(message.as_slice()));
    }

    #[test]
    fn test_decoder_skip_some_simple_fragments() {
        let message = make_message(SEED, MESSAGE_SIZE);
        let mut encoder = Encoder::new();
        encoder.start(&message, MAX_FRAGMENT_LEN);
        let mut decoder = Decoder::default();
        let mut skip = false;
        while !decoder.is_complete() {
            let part = encoder.next_part();
            if !skip {
                let _next = decoder.receive(&part);
            }
            skip = !skip;
        }
        assert_eq!(decoder.message().unwrap(), Some(message.as_slice()));
    }

    #[test]
    fn test_decoder_receive_return_value() {
        let message = make_message(SEED, MESSAGE_SIZE);
        let mut encoder = Encoder::new();
        encoder.start(&message, MAX_FRAGMENT_LEN);
        let mut decoder = Decoder::default();
        let part = encoder.next_part();
        assert!(decoder.receive(&part).unwrap());
        // non-valid
        let mut part = encoder.next_part();
        part.checksum += 1;
        // decoder complete
        while !decoder.is_complete() {
            let part = encoder.next_part();
            decoder.receive(&part).unwrap();
        }
        let part = encoder.next_part();
        assert!(!decoder.receive(&part).unwrap());
    }

    #[test]
    fn test_decoder_part_validation() {
        let mut encoder = Encoder::new();
        encoder.start("foo".as_bytes(), 2);
        let mut decoder = Decoder::default();

        let mut part = encoder.next_part();
        assert!(decoder.receive(&part).unwrap());
        assert!(decoder.is_part_consistent(&part));
        part.checksum += 1;
        assert!(!decoder.is_part_consistent(&part));
        part.checksum -= 1;
        part.message_length += 1;
        assert!(!decoder.is_part_consistent(&part));
        part.message_length -= 1;
        part.sequence_count += 1;
        assert!(!decoder.is_part_consistent(&part));
        part.sequence_count -= 1;
        part.data = &[0];
        assert!(!decoder.is_part_consistent(&part));
    }

    #[test]
    fn test_empty_decoder_empty_part() {
        let mut decoder = Decoder::default();
        let mut part = Part {
            sequence: 12,
            sequence_count: 8,
            message_length: 100,
            checksum: 0x1234_5678,
            data: &[1, 5, 3, 3, 5],
        };

        // Check sequence_count.
        part.sequence_count = 0;
        assert!(matches!(decoder.receive(&part), Err(Error::InvalidPart)));
        part.sequence_count = 8;

        // Check message_length.
        part.message_length = 0;
        assert!(matches!(decoder.receive(&part), Err(Error::InvalidPart)));
        part.message_length = 100;

        // Check data.
        part.data = &[];
        assert!(matches!(decoder.receive(&part), Err(Error::InvalidPart)));
        part.data = &[1, 5, 3, 3, 5];

        // Should not validate as there aren't any previous parts received.
        assert!(!decoder.is_part_consistent(&part));
    }
}
