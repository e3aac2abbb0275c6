// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Generic CBOR encoding/decoding helpers shared across registry items.

mod timestamp;
pub mod uuid;

pub use self::timestamp::Timestamp;
