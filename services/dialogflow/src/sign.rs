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

use flowbridge_core::{Error, Result};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::Sha256;
use std::fmt::Debug;

/// SignAssertion produces the signature segment of a JWT assertion.
///
/// Implementations receive the ASCII bytes `header.claims` and the PEM encoded
/// private key of the service account. Errors are never retried with the same key.
#[async_trait::async_trait]
pub trait SignAssertion: Debug + Send + Sync + 'static {
    /// Sign `message` with `private_key_pem`, returning the raw signature bytes.
    async fn sign(&self, message: &[u8], private_key_pem: &str) -> Result<Vec<u8>>;
}

/// RSASSA-PKCS1-v1_5 with SHA-256, the `RS256` JWT algorithm.
///
/// Accepts both PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1 (`BEGIN RSA PRIVATE KEY`) keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaSha256Signer;

#[async_trait::async_trait]
impl SignAssertion for RsaSha256Signer {
    async fn sign(&self, message: &[u8], private_key_pem: &str) -> Result<Vec<u8>> {
        let pem = normalize_pem(private_key_pem);

        let private_key = RsaPrivateKey::from_pkcs8_pem(&pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
            .map_err(|e| Error::credential_invalid("failed to parse RSA private key").with_source(e))?;

        let signing_key = SigningKey::<Sha256>::new(private_key);
        let signature = signing_key
            .try_sign(message)
            .map_err(|e| Error::credential_invalid("failed to sign JWT assertion").with_source(e))?;

        Ok(signature.to_vec())
    }
}

/// Keys pasted into single-line settings usually carry literal `\n` escapes.
fn normalize_pem(pem: &str) -> String {
    pem.trim().replace("\\n", "\n")
}
