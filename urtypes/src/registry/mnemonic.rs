// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use alloc::vec::Vec;

use minicbor::{data::Tag, data::Type, decode::Error, encode::Write, Decode, Decoder, Encode, Encoder};

/// A BIP-39 mnemonic seed phrase.
///
/// This type only carries the word list and language tag; converting the
/// words to seed entropy is left to a collaborator.
#[doc(alias("crypto-bip39"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mnemonic<'a> {
    /// The mnemonic words, in order.
    pub words: Vec<&'a str>,
    /// BCP-47 language tag, e.g. `"en"`.
    pub lang: Option<&'a str>,
}

impl<'a> Mnemonic<'a> {
    /// Tag used by the current UR registry (BCR-2023-...).
    pub const TAG: Tag = Tag::new(40310);
    /// Legacy tag still found in the wild.
    pub const TAG_LEGACY: Tag = Tag::new(301);
}

impl<'b, C> Decode<'b, C> for Mnemonic<'b> {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, Error> {
        let mut words = None;
        let mut lang = None;

        let mut len = d.map()?;
        loop {
            match len {
                Some(n) if n == 0 => break,
                Some(n) => len = Some(n - 1),
                None => {
                    if d.datatype()? == Type::Break {
                        break;
                    }
                }
            }

            match d.u32()? {
                1 => {
                    let mut list = Vec::new();
                    for word in d.array_iter::<&str>()? {
                        list.push(word?);
                    }
                    words = Some(list);
                }
                2 => lang = Some(d.str()?),
                _ => return Err(Error::message("unknown map entry")),
            }
        }

        Ok(Self {
            words: words.ok_or_else(|| Error::message("words is missing"))?,
            lang,
        })
    }
}

impl<'a, C> Encode<C> for Mnemonic<'a> {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        let len = 1 + self.lang.is_some() as u64;
        e.map(len)?;

        e.u8(1)?.array(self.words.len() as u64)?;
        for word in &self.words {
            e.str(word)?;
        }

        if let Some(lang) = self.lang {
            e.u8(2)?.str(lang)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mnemonic = Mnemonic {
            words: Vec::from([
                "shield", "group", "erode", "awake", "lock", "sausage", "cash", "glare", "wave",
                "crew", "flame", "glove",
            ]),
            lang: Some("en"),
        };

        let cbor = minicbor::to_vec(&mnemonic).unwrap();
        let decoded: Mnemonic = minicbor::decode(&cbor).unwrap();
        assert_eq!(mnemonic, decoded);
    }

    #[test]
    fn test_accepts_legacy_and_current_tag() {
        assert_ne!(Mnemonic::TAG, Mnemonic::TAG_LEGACY);
    }

    #[test]
    fn test_bip39_fixture() {
        const EXPECTED: &[u8] = &[
            0xa2, 0x01, 0x8c, 0x66, 0x73, 0x68, 0x69, 0x65, 0x6c, 0x64, 0x65, 0x67, 0x72, 0x6f,
            0x75, 0x70, 0x65, 0x65, 0x72, 0x6f, 0x64, 0x65, 0x65, 0x61, 0x77, 0x61, 0x6b, 0x65,
            0x64, 0x6c, 0x6f, 0x63, 0x6b, 0x67, 0x73, 0x61, 0x75, 0x73, 0x61, 0x67, 0x65, 0x64,
            0x63, 0x61, 0x73, 0x68, 0x65, 0x67, 0x6c, 0x61, 0x72, 0x65, 0x64, 0x77, 0x61, 0x76,
            0x65, 0x64, 0x63, 0x72, 0x65, 0x77, 0x65, 0x66, 0x6c, 0x61, 0x6d, 0x65, 0x65, 0x67,
            0x6c, 0x6f, 0x76, 0x65, 0x02, 0x62, 0x65, 0x6e,
        ];

        let mnemonic = Mnemonic {
            words: Vec::from([
                "shield", "group", "erode", "awake", "lock", "sausage", "cash", "glare", "wave",
                "crew", "flame", "glove",
            ]),
            lang: Some("en"),
        };

        let cbor = minicbor::to_vec(&mnemonic).unwrap();
        assert_eq!(cbor, EXPECTED);

        let decoded: Mnemonic = minicbor::decode(EXPECTED).unwrap();
        assert_eq!(decoded, mnemonic);
    }
}
