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
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// NluReply is the structured answer of Dialogflow for one message.
///
/// Serializes as `{"message", "isFallback", "quickReplies"}`; `quickReplies`
/// is omitted when the agent offered none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NluReply {
    /// Fulfillment text chosen by the agent.
    pub message: String,
    /// Whether the fallback intent answered.
    pub is_fallback: bool,
    /// Quick replies in the order the agent listed them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<QuickReply>>,
}

/// A suggested short reply offered alongside the message.
///
/// Fields other than `text` (for example an action id or a value) are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    /// Text shown to the user.
    #[serde(default)]
    pub text: String,
    /// Every other field of the payload entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuickReply {
    /// Create a quick reply carrying only a text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectIntentResponse {
    #[serde(default)]
    query_result: Option<QueryResult>,
    #[serde(default)]
    error: Option<RemoteError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResult {
    #[serde(default)]
    fulfillment_text: Option<String>,
    #[serde(default)]
    intent: Option<Intent>,
    #[serde(default)]
    fulfillment_messages: Option<Vec<FulfillmentMessage>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Intent {
    #[serde(default)]
    is_fallback: Option<bool>,
}

#[derive(Deserialize)]
struct FulfillmentMessage {
    #[serde(default)]
    payload: Option<Payload>,
}

/// Custom payload, `quick_replies` is the only key we understand.
#[derive(Deserialize)]
struct Payload {
    #[serde(default)]
    quick_replies: Option<Vec<QuickReply>>,
}

#[derive(Deserialize)]
struct RemoteError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Parse the body of a `detectIntent` response.
///
/// # Errors
///
/// Returns a protocol error when the body is empty or not JSON, carries an
/// `error` object, or has neither `queryResult` nor `error`.
pub fn parse_detect_intent_response(body: &[u8]) -> Result<NluReply> {
    if body.is_empty() {
        return Err(Error::protocol_invalid(
            "failed to parse Dialogflow response: content is empty",
        ));
    }

    let resp: DetectIntentResponse = serde_json::from_slice(body).map_err(|e| {
        Error::protocol_invalid("failed to parse Dialogflow response").with_source(e)
    })?;

    if let Some(result) = resp.query_result {
        let quick_replies: Vec<QuickReply> = result
            .fulfillment_messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.payload)
            .filter_map(|p| p.quick_replies)
            .flatten()
            .collect();

        return Ok(NluReply {
            message: result.fulfillment_text.unwrap_or_default(),
            is_fallback: result
                .intent
                .and_then(|intent| intent.is_fallback)
                .unwrap_or(false),
            quick_replies: (!quick_replies.is_empty()).then_some(quick_replies),
        });
    }

    match resp.error {
        Some(err) => {
            let message = err.message.unwrap_or_default();
            let status = err.status.unwrap_or_default();
            let code = err.code.map(|c| format!(" (code {c})")).unwrap_or_default();
            Err(Error::protocol_invalid(format!(
                "Dialogflow returned an error{code}: message: {message}, status: {status}. \
                 Check the Google credentials in the settings and the network connectivity"
            )))
        }
        None => Err(Error::protocol_invalid(
            "Dialogflow response has neither queryResult nor error",
        )),
    }
}
