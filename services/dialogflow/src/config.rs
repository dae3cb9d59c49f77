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

use flowbridge_core::utils::Redact;
use flowbridge_core::{Context, Error, Result};
use log::debug;
use std::fmt::{self, Debug};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::constants::*;
use crate::credential::{CredentialFile, ServiceAccount};

/// Config carries all the configuration for the Dialogflow client.
///
/// The service account can be given inline (`client_email` + `private_key`) or
/// through a Google service account key file (`credential_path`). Inline values
/// win over values read from the file.
///
/// The credential file is read at most once; clones share the parsed content.
#[derive(Clone, Default)]
pub struct Config {
    /// Dialogflow agent project id.
    pub project_id: Option<String>,
    /// Service account client email.
    pub client_email: Option<String>,
    /// Service account private key in PEM format.
    pub private_key: Option<String>,
    /// Path to a service account key file.
    pub credential_path: Option<String>,
    /// Language of the queries, `en` by default.
    pub language_code: Option<String>,
    /// Dialogflow API endpoint, `https://dialogflow.googleapis.com` by default.
    pub endpoint: Option<String>,
    /// OAuth2 token endpoint, `https://oauth2.googleapis.com/token` by default.
    pub token_url: Option<String>,
    /// Scope requested in the JWT assertion.
    pub scope: Option<String>,

    credential_file: Arc<OnceCell<CredentialFile>>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &Redact::from(&self.private_key))
            .field("credential_path", &self.credential_path)
            .field("language_code", &self.language_code)
            .field("endpoint", &self.endpoint)
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .finish()
    }
}

impl Config {
    /// Create a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Dialogflow project id.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the service account client email.
    pub fn with_client_email(mut self, client_email: impl Into<String>) -> Self {
        self.client_email = Some(client_email.into());
        self
    }

    /// Set the service account private key.
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Set credential file path.
    pub fn with_credential_path(mut self, path: impl Into<String>) -> Self {
        self.credential_path = Some(path.into());
        self.credential_file = Arc::default();
        self
    }

    /// Set the language code of queries.
    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = Some(language_code.into());
        self
    }

    /// Set the Dialogflow API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the OAuth2 token endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = Some(token_url.into());
        self
    }

    /// Set the OAuth2 scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Self {
        Self {
            project_id: ctx.env_var(DIALOGFLOW_PROJECT_ID),
            client_email: ctx.env_var(DIALOGFLOW_CLIENT_EMAIL),
            private_key: ctx.env_var(DIALOGFLOW_PRIVATE_KEY),
            credential_path: ctx.env_var(GOOGLE_APPLICATION_CREDENTIALS),
            language_code: ctx.env_var(DIALOGFLOW_LANGUAGE_CODE),
            scope: ctx.env_var(DIALOGFLOW_SCOPE),
            ..Default::default()
        }
    }

    /// The language code sent with every query.
    pub fn language_code(&self) -> &str {
        non_empty(&self.language_code).unwrap_or(DEFAULT_LANGUAGE_CODE)
    }

    /// The Dialogflow API endpoint without trailing slash.
    pub fn endpoint(&self) -> &str {
        non_empty(&self.endpoint)
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }

    /// The OAuth2 token endpoint, also used as the JWT audience.
    pub fn token_url(&self) -> &str {
        non_empty(&self.token_url).unwrap_or(DEFAULT_TOKEN_URL)
    }

    /// The scope requested in the JWT assertion.
    pub fn scope(&self) -> &str {
        non_empty(&self.scope).unwrap_or(DEFAULT_SCOPE)
    }

    /// Resolve the Dialogflow project id.
    ///
    /// Falls back to the `project_id` of the credential file.
    pub async fn project_id(&self, ctx: &Context) -> Result<String> {
        if let Some(v) = non_empty(&self.project_id) {
            return Ok(v.to_string());
        }

        match self.load_credential_file(ctx).await? {
            Some(CredentialFile::ServiceAccount {
                project_id: Some(v),
                ..
            }) if !v.is_empty() => Ok(v.clone()),
            _ => Err(Error::config_invalid("project id is not configured")),
        }
    }

    /// Resolve the service account used to sign JWT assertions.
    ///
    /// Fails with a config error when either the client email or the private key
    /// can't be found. No network call is made here.
    pub async fn service_account(&self, ctx: &Context) -> Result<ServiceAccount> {
        let mut client_email = non_empty(&self.client_email).map(str::to_string);
        let mut private_key = non_empty(&self.private_key).map(str::to_string);

        if client_email.is_none() || private_key.is_none() {
            if let Some(CredentialFile::ServiceAccount {
                client_email: file_email,
                private_key: file_key,
                ..
            }) = self.load_credential_file(ctx).await?
            {
                client_email = client_email.or_else(|| non_empty_str(file_email));
                private_key = private_key.or_else(|| non_empty_str(file_key));
            }
        }

        let client_email =
            client_email.ok_or_else(|| Error::config_invalid("client email is not configured"))?;
        let private_key =
            private_key.ok_or_else(|| Error::config_invalid("private key is not configured"))?;

        Ok(ServiceAccount::new(client_email, private_key))
    }

    async fn load_credential_file(&self, ctx: &Context) -> Result<Option<&CredentialFile>> {
        let Some(path) = non_empty(&self.credential_path) else {
            return Ok(None);
        };

        self.credential_file
            .get_or_try_init(|| async {
                debug!("loading service account credential from {path}");
                let content = ctx.file_read(path).await.map_err(|e| {
                    Error::config_invalid(format!("failed to read credential file {path}"))
                        .with_source(e)
                })?;
                CredentialFile::from_slice(&content)
            })
            .await
            .map(Some)
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|v| !v.is_empty())
}

fn non_empty_str(v: &str) -> Option<String> {
    (!v.is_empty()).then(|| v.to_string())
}
