// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vendor color payload decoding.
//!
//! Bulbs report their color in several encodings depending on firmware and
//! mode: an `{r, g, b}` component object, an `R,G,B` triplet string
//! (sometimes normalized to 0..1), an `H;S;V`-style string, or a bare hex
//! literal with or without `#`. This module normalizes all of them into a
//! canonical [`HexColor`], treating anything malformed as simply
//! unavailable — decoding never fails a device read.

mod decode;
mod hex;
mod hsv;

pub use decode::{decode_body_color, decode_color};
pub use hex::HexColor;
pub use hsv::decode_ambiguous_hsv;
