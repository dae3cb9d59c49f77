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

//! JWT assertions for the OAuth2 JWT-bearer grant.
//!
//! Reference: [Using OAuth 2.0 for Server to Server Applications](https://developers.google.com/identity/protocols/oauth2/service-account#authorizingrequests)

use flowbridge_core::encoding::base64url_encode;
use flowbridge_core::time::DateTime;
use flowbridge_core::{Error, Result};
use log::debug;
use serde::Serialize;
use std::fmt::{self, Debug, Display};

use crate::constants::ASSERTION_LIFETIME_SECS;
use crate::credential::ServiceAccount;
use crate::sign::SignAssertion;

/// Header of every assertion: RS256 signed JWT.
#[derive(Debug, Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

const RS256_HEADER: Header = Header {
    alg: "RS256",
    typ: "JWT",
};

/// Claims is used to build JWT for the Google token endpoint.
///
/// ```json
/// {
///   "iss": "bot@demo-agent.iam.gserviceaccount.com",
///   "sub": "bot@demo-agent.iam.gserviceaccount.com",
///   "scope": "https://www.googleapis.com/auth/cloud-platform",
///   "aud": "https://oauth2.googleapis.com/token",
///   "iat": 1328550785,
///   "exp": 1328554385
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    /// Issuer, the service account email.
    pub iss: String,
    /// Subject, the service account email.
    pub sub: String,
    /// Requested OAuth2 scope.
    pub scope: String,
    /// Audience, the token endpoint URL.
    pub aud: String,
    /// Issued at, unix seconds.
    pub iat: i64,
    /// Expires at, unix seconds. Always `iat + 3600`.
    pub exp: i64,
}

impl Claims {
    /// Create claims for `client_email` issued at `issued_at`.
    pub fn new(client_email: &str, audience: &str, scope: &str, issued_at: DateTime) -> Self {
        let iat = issued_at.timestamp();

        Claims {
            iss: client_email.to_string(),
            sub: client_email.to_string(),
            scope: scope.to_string(),
            aud: audience.to_string(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// JwtAssertion is a signed `header.claims.signature` triple.
///
/// Every segment is base64url encoded without padding. An assertion is built once
/// per token fetch and never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtAssertion {
    header: String,
    claims: String,
    signature: String,
}

impl JwtAssertion {
    /// Build and sign an assertion for `service_account`.
    pub async fn build(
        service_account: &ServiceAccount,
        audience: &str,
        scope: &str,
        issued_at: DateTime,
        signer: &dyn SignAssertion,
    ) -> Result<Self> {
        let claims = Claims::new(&service_account.client_email, audience, scope, issued_at);
        debug!("building JWT assertion for {} with scope {}", claims.iss, claims.scope);

        let header = encode_json(&RS256_HEADER)?;
        let claims = encode_json(&claims)?;

        let signature = signer
            .sign(
                signing_input(&header, &claims).as_bytes(),
                &service_account.private_key,
            )
            .await?;

        Ok(Self {
            header,
            claims,
            signature: base64url_encode(signature),
        })
    }

    /// The encoded header segment.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The encoded claims segment.
    pub fn claims(&self) -> &str {
        &self.claims
    }

    /// The encoded signature segment.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl Display for JwtAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.header, self.claims, self.signature)
    }
}

impl Debug for JwtAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAssertion")
            .field("header", &self.header)
            .field("claims", &self.claims)
            .field("signature", &"<redacted>")
            .finish()
    }
}

fn signing_input(header: &str, claims: &str) -> String {
    format!("{header}.{claims}")
}

fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)
        .map_err(|e| Error::unexpected("failed to serialize JWT segment").with_source(e))?;
    Ok(base64url_encode(json))
}
