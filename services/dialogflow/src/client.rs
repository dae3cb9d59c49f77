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
use flowbridge_core::{Context, Error, Result};
use http::header;
use log::{debug, error};
use percent_encoding::utf8_percent_encode;
use serde_json::json;

use crate::config::Config;
use crate::constants::PATH_SEGMENT_ENCODE_SET;
use crate::reply::{parse_detect_intent_response, NluReply};
use crate::sign::SignAssertion;
use crate::store::TokenStore;
use crate::token::TokenCache;

/// DialogflowClient sends chat messages to a Dialogflow agent.
///
/// ```no_run
/// use flowbridge_core::{Context, OsEnv};
/// use flowbridge_dialogflow::{Config, DialogflowClient, MemoryTokenStore};
/// use flowbridge_http_send_reqwest::ReqwestHttpSend;
///
/// # async fn example() -> flowbridge_core::Result<()> {
/// let ctx = Context::new()
///     .with_http_send(ReqwestHttpSend::default())
///     .with_env(OsEnv);
/// let config = Config::from_env(&ctx);
///
/// let client = DialogflowClient::new(ctx, config, MemoryTokenStore::new());
/// let reply = client.send_message("session-1", "hello").await?;
/// println!("{}", reply.message);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DialogflowClient {
    ctx: Context,
    config: Config,
    tokens: TokenCache,
}

impl DialogflowClient {
    /// Create a new client caching tokens in `store`.
    pub fn new(ctx: Context, config: Config, store: impl TokenStore) -> Self {
        let tokens = TokenCache::new(config.clone(), store);
        Self {
            ctx,
            config,
            tokens,
        }
    }

    /// Replace the assertion signer used when fetching tokens.
    pub fn with_signer(mut self, signer: impl SignAssertion) -> Self {
        self.tokens = self.tokens.with_signer(signer);
        self
    }

    /// The token cache used by this client.
    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// Send `text` to the agent within conversation `session_id`.
    ///
    /// # Errors
    ///
    /// - config error if the project or the service account is not configured.
    /// - credential error if no valid access token can be obtained.
    /// - protocol error if Dialogflow can't be reached or answers with an error.
    ///
    /// Nothing is retried.
    pub async fn send_message(&self, session_id: &str, text: &str) -> Result<NluReply> {
        let url = self.detect_intent_url(session_id).await?;
        let req = self.build_request(&url, text)?;

        debug!("session {session_id}: sending message to Dialogflow");
        let resp = self.ctx.http_send(req).await.map_err(|e| {
            error!("session {session_id}: failed to reach Dialogflow: {e:?}");
            Error::protocol_invalid("failed to reach Dialogflow").with_source(e)
        })?;

        parse_detect_intent_response(resp.body()).inspect_err(|e| {
            error!(
                "session {session_id}: Dialogflow request failed with {}: {e}",
                resp.status()
            )
        })
    }

    async fn detect_intent_url(&self, session_id: &str) -> Result<String> {
        let project_id = self.config.project_id(&self.ctx).await?;
        let token = self.tokens.get_token(&self.ctx, session_id).await?;

        Ok(format!(
            "{}/v2/projects/{}/agent/environments/draft/users/-/sessions/{}:detectIntent?access_token={}",
            self.config.endpoint(),
            utf8_percent_encode(&project_id, &PATH_SEGMENT_ENCODE_SET),
            utf8_percent_encode(session_id, &PATH_SEGMENT_ENCODE_SET),
            utf8_percent_encode(&token, &PATH_SEGMENT_ENCODE_SET),
        ))
    }

    fn build_request(&self, url: &str, text: &str) -> Result<http::Request<Bytes>> {
        let body = json!({
            "queryInput": {
                "text": {
                    "languageCode": self.config.language_code(),
                    "text": text,
                }
            }
        });
        let body = serde_json::to_vec(&body)
            .map_err(|e| Error::unexpected("failed to serialize query").with_source(e))?;

        http::Request::builder()
            .method(http::Method::POST)
            .uri(url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .map_err(|e| Error::protocol_invalid("failed to build Dialogflow request").with_source(e))
    }
}
