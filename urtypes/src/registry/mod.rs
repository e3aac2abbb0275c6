// SPDX-FileCopyrightText: © 2023 Foundation Devices, Inc. <hello@foundationdevices.com>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Uniform Resources registry.

mod crypto_address;
mod crypto_coininfo;
mod crypto_eckey;
mod crypto_hdkey;
mod crypto_keypath;
mod crypto_output;
mod crypto_seed;
mod mnemonic;

pub use self::crypto_address::*;
pub use self::crypto_coininfo::*;
pub use self::crypto_eckey::*;
pub use self::crypto_hdkey::*;
pub use self::crypto_keypath::*;
pub use self::crypto_output::*;
pub use self::crypto_seed::*;
pub use self::mnemonic::*;
