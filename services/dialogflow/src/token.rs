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

use flowbridge_core::time::{add_seconds, now};
use flowbridge_core::{Context, Error, Result};
use http::header;
use log::{debug, error, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::Config;
use crate::constants::JWT_BEARER_GRANT_TYPE;
use crate::credential::{AccessToken, ServiceAccount};
use crate::jwt::JwtAssertion;
use crate::sign::{RsaSha256Signer, SignAssertion};
use crate::store::TokenStore;

/// OAuth2 token response.
///
/// Google answers `{"error": ..., "error_description": ...}` on failure.
#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// TokenCache hands out a valid bearer token per conversation session.
///
/// A cached, unexpired token is returned without touching the signer or the
/// network. Otherwise a fresh token is fetched through the JWT-bearer grant and
/// written back to the [`TokenStore`], replacing the previous one.
///
/// Two concurrent misses for the same session may both fetch; both tokens are
/// valid and the last write wins.
#[derive(Debug, Clone)]
pub struct TokenCache {
    config: Config,
    store: Arc<dyn TokenStore>,
    signer: Arc<dyn SignAssertion>,
}

impl TokenCache {
    /// Create a new token cache signing with [`RsaSha256Signer`].
    pub fn new(config: Config, store: impl TokenStore) -> Self {
        Self {
            config,
            store: Arc::new(store),
            signer: Arc::new(RsaSha256Signer),
        }
    }

    /// Replace the assertion signer.
    pub fn with_signer(mut self, signer: impl SignAssertion) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    /// Get a valid access token for `session_id`.
    ///
    /// # Errors
    ///
    /// - config error if the service account is not configured, before any I/O.
    /// - credential error if a fresh token can't be obtained.
    pub async fn get_token(&self, ctx: &Context, session_id: &str) -> Result<String> {
        let service_account = self.config.service_account(ctx).await?;

        if let Some(token) = self.load_cached(session_id).await {
            if token.is_valid_at(now()) {
                debug!("session {session_id}: using cached access token");
                return Ok(token.token);
            }
            debug!(
                "session {session_id}: cached access token expired at {}",
                token.expiration
            );
        } else {
            debug!("session {session_id}: no cached access token");
        }

        let token = self.fetch_token(ctx, &service_account).await?;

        match token.to_bytes() {
            Ok(bs) => {
                if let Err(err) = self.store.set(session_id, bs).await {
                    warn!("session {session_id}: failed to store access token: {err:?}");
                }
            }
            Err(err) => warn!("session {session_id}: failed to encode access token: {err:?}"),
        }

        Ok(token.token)
    }

    /// Read the stored token, treating anything unreadable as a miss.
    async fn load_cached(&self, session_id: &str) -> Option<AccessToken> {
        let bs = match self.store.get(session_id).await {
            Ok(v) => v?,
            Err(err) => {
                warn!("session {session_id}: failed to read cached access token: {err:?}");
                return None;
            }
        };

        match AccessToken::from_slice(&bs) {
            Ok(token) => Some(token),
            Err(err) => {
                warn!("session {session_id}: discarding malformed cached access token: {err:?}");
                None
            }
        }
    }

    /// Exchange a service account for an access token.
    ///
    /// The returned expiration is the request time plus the `expires_in`
    /// announced by the token endpoint.
    ///
    /// Reference: [Using OAuth 2.0 for Server to Server Applications](https://developers.google.com/identity/protocols/oauth2/service-account#authorizingrequests)
    pub async fn fetch_token(
        &self,
        ctx: &Context,
        service_account: &ServiceAccount,
    ) -> Result<AccessToken> {
        let token_url = self.config.token_url();
        let requested_at = now();

        let assertion = JwtAssertion::build(
            service_account,
            token_url,
            self.config.scope(),
            requested_at,
            self.signer.as_ref(),
        )
        .await?;

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", JWT_BEARER_GRANT_TYPE)
            .append_pair("assertion", &assertion.to_string())
            .finish();
        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(token_url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::ACCEPT, "application/json")
            .body(body.into_bytes().into())
            .map_err(|e| Error::credential_invalid("failed to build token request").with_source(e))?;

        debug!("exchanging JWT assertion for access token at {token_url}");
        let resp = ctx.http_send(req).await.map_err(|e| {
            Error::credential_invalid(format!("failed to reach token endpoint {token_url}"))
                .with_source(e)
        })?;

        let status = resp.status();
        let parsed: Option<TokenResponse> = serde_json::from_slice(resp.body()).ok();

        if !status.is_success() || parsed.as_ref().is_some_and(|v| v.error.is_some()) {
            error!("exchange token got unexpected response: {status}");
            let detail = match &parsed {
                Some(TokenResponse {
                    error: Some(error),
                    error_description,
                    ..
                }) => match error_description {
                    Some(desc) => format!("{error}: {desc}"),
                    None => error.clone(),
                },
                _ => String::from_utf8_lossy(resp.body()).to_string(),
            };
            return Err(Error::credential_invalid(format!(
                "exchange token failed ({status}): {detail}"
            )));
        }

        let Some(parsed) = parsed else {
            return Err(Error::credential_invalid(format!(
                "failed to parse token response: {}",
                String::from_utf8_lossy(resp.body())
            )));
        };

        let token = parsed
            .access_token
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::credential_invalid("token response missing access_token"))?;
        let expires_in = parsed
            .expires_in
            .ok_or_else(|| Error::credential_invalid("token response missing expires_in"))?;
        let expiration = add_seconds(requested_at, expires_in).map_err(|e| {
            Error::credential_invalid("token response has invalid expires_in").with_source(e)
        })?;

        debug!("fetched access token expiring at {expiration}");
        Ok(AccessToken::new(token, expiration))
    }
}
