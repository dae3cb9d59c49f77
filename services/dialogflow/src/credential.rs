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

use bytes::Bytes;
use flowbridge_core::time::DateTime;
use flowbridge_core::utils::Redact;
use flowbridge_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// ServiceAccount holds the client email and private key for service account authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccount {
    /// The client email of credential
    pub client_email: String,
    /// PEM encoded private key of credential
    pub private_key: String,
}

impl ServiceAccount {
    /// Create a new service account credential.
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
        }
    }
}

impl Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key", &Redact::from(&self.private_key))
            .finish()
    }
}

/// CredentialFile represents a Google credential key file.
///
/// Only service account keys can be exchanged through the JWT-bearer grant.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum CredentialFile {
    ServiceAccount {
        client_email: String,
        private_key: String,
        #[serde(default)]
        project_id: Option<String>,
    },
}

impl CredentialFile {
    /// Parse credential file from bytes.
    pub(crate) fn from_slice(v: &[u8]) -> Result<Self> {
        serde_json::from_slice(v).map_err(|e| {
            Error::config_invalid("failed to parse service account credential file").with_source(e)
        })
    }
}

/// AccessToken is a bearer token issued for one conversation session.
///
/// `expiration` is always derived from the `expires_in` returned by the token
/// endpoint that issued it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The bearer token.
    pub token: String,
    /// The instant after which the token must not be used.
    pub expiration: DateTime,
}

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>, expiration: DateTime) -> Self {
        Self {
            token: token.into(),
            expiration,
        }
    }

    /// Check if the token is still usable at `at`.
    pub fn is_valid_at(&self, at: DateTime) -> bool {
        !self.token.is_empty() && at < self.expiration
    }

    /// Encode the token in the shape kept by a [`TokenStore`](crate::TokenStore).
    pub fn to_bytes(&self) -> Result<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| Error::unexpected("failed to serialize access token").with_source(e))
    }

    /// Decode a token previously written by [`AccessToken::to_bytes`].
    pub fn from_slice(v: &[u8]) -> Result<Self> {
        serde_json::from_slice(v)
            .map_err(|e| Error::unexpected("failed to parse cached access token").with_source(e))
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &Redact::from(&self.token))
            .field("expiration", &self.expiration)
            .finish()
    }
}
