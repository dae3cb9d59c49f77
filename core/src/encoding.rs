// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Base64 encoding with a configurable dictionary and pad symbol.
//!
//! JWT segments use [`Base64Url::URL_SAFE_NO_PAD`]. The encoder works on raw
//! bytes, so string input is always encoded through its UTF-8 representation.

use crate::{Error, Result};
use std::fmt::{self, Debug};

const STANDARD_DICTIONARY: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const URL_SAFE_DICTIONARY: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Base64 encoder parameterised by its 64-symbol dictionary and pad symbol.
///
/// - Every 3 input bytes produce 4 output symbols.
/// - 1 leftover byte produces 2 symbols followed by 2 pads.
/// - 2 leftover bytes produce 3 symbols followed by 1 pad.
///
/// Without a pad symbol the trailing pad positions are omitted. Symbols and
/// the pad are single ASCII bytes, so every encoded string is ASCII.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Base64Url {
    dictionary: [u8; 64],
    pad: Option<u8>,
}

impl Debug for Base64Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Base64Url")
            .field("dictionary", &String::from_utf8_lossy(&self.dictionary))
            .field("pad", &self.pad.map(char::from))
            .finish()
    }
}

impl Base64Url {
    /// RFC 4648 standard alphabet with `=` padding.
    pub const STANDARD: Base64Url = Base64Url::from_ascii(*STANDARD_DICTIONARY, Some(b'='));

    /// RFC 4648 URL-safe alphabet (`-` and `_`) with `=` padding.
    pub const URL_SAFE: Base64Url = Base64Url::from_ascii(*URL_SAFE_DICTIONARY, Some(b'='));

    /// RFC 4648 URL-safe alphabet without padding, as used by JWT.
    pub const URL_SAFE_NO_PAD: Base64Url = Base64Url::from_ascii(*URL_SAFE_DICTIONARY, None);

    /// Create an encoder from a dictionary and an optional pad symbol.
    ///
    /// Returns a config error if any symbol or the pad is not ASCII.
    pub fn new(dictionary: [u8; 64], pad: Option<u8>) -> Result<Self> {
        if !dictionary.is_ascii() {
            return Err(Error::config_invalid(
                "base64 dictionary must only contain ASCII symbols",
            ));
        }

        Self::from_ascii(dictionary, None).with_pad(pad)
    }

    /// Replace the pad symbol.
    ///
    /// Returns a config error if the pad is not ASCII.
    pub fn with_pad(mut self, pad: Option<u8>) -> Result<Self> {
        if pad.is_some_and(|p| !p.is_ascii()) {
            return Err(Error::config_invalid("base64 pad symbol must be ASCII"));
        }

        self.pad = pad;
        Ok(self)
    }

    const fn from_ascii(dictionary: [u8; 64], pad: Option<u8>) -> Self {
        Self { dictionary, pad }
    }

    /// Encode the input bytes.
    pub fn encode(&self, input: impl AsRef<[u8]>) -> String {
        let input = input.as_ref();
        let mut out = String::with_capacity(input.len().div_ceil(3) * 4);

        let mut chunks = input.chunks_exact(3);
        for chunk in chunks.by_ref() {
            let n = u32::from(chunk[0]) << 16 | u32::from(chunk[1]) << 8 | u32::from(chunk[2]);
            self.push_symbols(&mut out, n, 4);
        }

        match *chunks.remainder() {
            [a] => {
                self.push_symbols(&mut out, u32::from(a) << 16, 2);
                self.push_pad(&mut out, 2);
            }
            [a, b] => {
                self.push_symbols(&mut out, u32::from(a) << 16 | u32::from(b) << 8, 3);
                self.push_pad(&mut out, 1);
            }
            _ => {}
        }

        out
    }

    /// Encode the UTF-8 representation of `input`.
    pub fn encode_str(&self, input: &str) -> String {
        self.encode(input.as_bytes())
    }

    /// Emit the first `count` 6-bit groups of a 24-bit block.
    fn push_symbols(&self, out: &mut String, block: u32, count: usize) {
        for i in 0..count {
            let idx = (block >> (18 - 6 * i)) & 0x3f;
            out.push(char::from(self.dictionary[idx as usize]));
        }
    }

    fn push_pad(&self, out: &mut String, count: usize) {
        if let Some(pad) = self.pad {
            for _ in 0..count {
                out.push(char::from(pad));
            }
        }
    }
}

impl Default for Base64Url {
    fn default() -> Self {
        Self::URL_SAFE
    }
}

/// Base64url encode without padding.
pub fn base64url_encode(content: impl AsRef<[u8]>) -> String {
    Base64Url::URL_SAFE_NO_PAD.encode(content)
}
