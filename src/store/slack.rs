// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Slack Web API implementation of [`ChannelStore`].
//!
//! ```text
//! resolve_channel   GET  conversations.list (bot, paged by cursor)
//! latest_snapshot   GET  auth.test (bot) -> user_id
//!                   GET  files.list?channel&user&count=1 (user token)
//! snapshot_contents GET  url_private (bot, streamed, 1 MiB cap)
//! upload_snapshot   POST files.getUploadURLExternal -> upload_url, file_id
//!                   POST upload_url (multipart)
//!                   POST files.completeUploadExternal (channel_id)
//! ```
//!
//! Every reply is checked against the `{ "ok": bool, "error": "..." }`
//! envelope before the payload is decoded.

use std::time::{SystemTime, UNIX_EPOCH};

use bon::Builder;
use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, info};

use super::{Channel, ChannelStore, SnapshotRef};
use crate::error::{EnvbotResult, TokenKind, TransportError};

/// Default Slack Web API endpoint.
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Largest snapshot body that will be downloaded.
pub const MAX_SNAPSHOT_BYTES: usize = 1024 * 1024;

const PAGE_LIMIT: &str = "200";

/// Upper bound on `conversations.list` pages fetched for one lookup.
const MAX_PAGES: u32 = 1000;

fn default_client() -> Client {
    Client::builder()
        .user_agent(format!("envbot/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Slack-backed channel store.
///
/// Uses the bot token for everything except listing files, which needs the
/// user token to filter by author.
///
/// ```no_run
/// use envbot::store::slack::SlackStore;
///
/// let store = SlackStore::builder()
///     .bot_token("xoxb-...")
///     .user_token("xoxp-...")
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct SlackStore {
    #[builder(default = default_client())]
    client: Client,
    #[builder(into, default = DEFAULT_API_URL.to_string())]
    api_url: String,
    #[builder(into)]
    bot_token: Option<String>,
    #[builder(into)]
    user_token: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ConversationsList {
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Deserialize)]
struct AuthTest {
    user_id: String,
}

#[derive(Deserialize)]
struct FilesList {
    #[serde(default)]
    files: Vec<FileInfo>,
}

#[derive(Deserialize)]
struct FileInfo {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url_private: Option<String>,
}

#[derive(Deserialize)]
struct UploadTicket {
    upload_url: String,
    file_id: String,
}

fn decode_error(method: &str, err: &serde_json::Error) -> TransportError {
    TransportError::Decode {
        method: method.to_string(),
        message: err.to_string(),
    }
}

/// Checks the HTTP status and the API envelope, then decodes the payload.
async fn decode<T: DeserializeOwned>(method: &str, response: Response) -> EnvbotResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::HttpError {
            status: status.as_u16(),
            url: response.url().to_string(),
        }
        .into());
    }

    let body = response.bytes().await.map_err(TransportError::Reqwest)?;
    let envelope: Envelope =
        serde_json::from_slice(&body).map_err(|e| decode_error(method, &e))?;
    if !envelope.ok {
        return Err(TransportError::Api {
            method: method.to_string(),
            code: envelope.error.unwrap_or_else(|| "unknown_error".to_string()),
        }
        .into());
    }

    Ok(serde_json::from_slice(&body).map_err(|e| decode_error(method, &e))?)
}

/// Uploaded files are named after the current Unix time in milliseconds.
fn snapshot_filename() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

impl SlackStore {
    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_url.trim_end_matches('/'))
    }

    fn bot_token(&self) -> EnvbotResult<&str> {
        Ok(self
            .bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(TransportError::MissingToken(TokenKind::Bot))?)
    }

    fn user_token(&self) -> EnvbotResult<&str> {
        Ok(self
            .user_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(TransportError::MissingToken(TokenKind::User))?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        token: &str,
        query: &[(&str, &str)],
    ) -> EnvbotResult<T> {
        debug!(method, "calling slack api");
        let response = self
            .client
            .get(self.method_url(method))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(TransportError::Reqwest)?;
        decode(method, response).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        method: &str,
        token: &str,
        form: &[(&str, &str)],
    ) -> EnvbotResult<T> {
        debug!(method, "calling slack api");
        let response = self
            .client
            .post(self.method_url(method))
            .bearer_auth(token)
            .form(form)
            .send()
            .await
            .map_err(TransportError::Reqwest)?;
        decode(method, response).await
    }

    async fn find_channel(&self, name: &str) -> EnvbotResult<Option<Channel>> {
        let token = self.bot_token()?;
        let mut cursor = String::new();
        let mut pages = 0_u32;

        loop {
            let page: ConversationsList = {
                let mut query = vec![
                    ("exclude_archived", "true"),
                    ("types", "public_channel,private_channel"),
                    ("limit", PAGE_LIMIT),
                ];
                if !cursor.is_empty() {
                    query.push(("cursor", cursor.as_str()));
                }
                self.get("conversations.list", token, &query).await?
            };
            pages += 1;

            if let Some(channel) = page.channels.into_iter().find(|c| c.name == name) {
                debug!(
                    channel = %channel.name,
                    id = %channel.id,
                    private = channel.is_private,
                    "channel resolved"
                );
                return Ok(Some(channel));
            }

            let next = page
                .response_metadata
                .map(|m| m.next_cursor)
                .unwrap_or_default();
            if next.is_empty() {
                debug!(channel = name, pages, "channel not in conversation list");
                return Ok(None);
            }
            if next == cursor || pages >= MAX_PAGES {
                return Err(TransportError::Decode {
                    method: "conversations.list".to_string(),
                    message: format!("pagination did not finish after {pages} pages"),
                }
                .into());
            }
            cursor = next;
        }
    }

    async fn find_latest_snapshot(&self, channel: &Channel) -> EnvbotResult<Option<SnapshotRef>> {
        let bot = self.bot_token()?;
        let user = self.user_token()?;

        let auth: AuthTest = self.get("auth.test", bot, &[]).await?;
        let listing: FilesList = self
            .get(
                "files.list",
                user,
                &[
                    ("channel", channel.id.as_str()),
                    ("user", auth.user_id.as_str()),
                    ("count", "1"),
                ],
            )
            .await?;

        let latest = listing.files.into_iter().next().map(|f| SnapshotRef {
            id: f.id,
            title: f.title,
            url: f.url_private,
        });
        debug!(
            channel = %channel.name,
            snapshot = latest.as_ref().map(|s| s.id.as_str()),
            title = latest.as_ref().map(|s| s.title.as_str()),
            "latest bot snapshot"
        );
        Ok(latest)
    }

    async fn download(&self, snapshot: &SnapshotRef) -> EnvbotResult<Vec<u8>> {
        let token = self.bot_token()?;
        let url = snapshot
            .url
            .as_deref()
            .ok_or_else(|| TransportError::Decode {
                method: "files.list".to_string(),
                message: format!("snapshot {} has no download url", snapshot.id),
            })?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(TransportError::Reqwest)?;

        if !response.status().is_success() {
            return Err(TransportError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let mut contents = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(TransportError::Reqwest)?;
            if contents.len() + chunk.len() > MAX_SNAPSHOT_BYTES {
                return Err(TransportError::TooLarge {
                    url: url.to_string(),
                    limit: MAX_SNAPSHOT_BYTES,
                }
                .into());
            }
            contents.extend_from_slice(&chunk);
        }

        debug!(snapshot = %snapshot.id, bytes = contents.len(), "snapshot downloaded");
        Ok(contents)
    }

    async fn upload(&self, channel: &Channel, contents: Vec<u8>) -> EnvbotResult<()> {
        let token = self.bot_token()?;
        let filename = snapshot_filename();
        let length = contents.len().to_string();

        let ticket: UploadTicket = self
            .post_form(
                "files.getUploadURLExternal",
                token,
                &[("filename", filename.as_str()), ("length", length.as_str())],
            )
            .await?;

        let form = Form::new().part("file", Part::bytes(contents).file_name(filename.clone()));
        let response = self
            .client
            .post(&ticket.upload_url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::Reqwest)?;
        if !response.status().is_success() {
            return Err(TransportError::HttpError {
                status: response.status().as_u16(),
                url: ticket.upload_url,
            }
            .into());
        }

        let files = serde_json::json!([{ "id": ticket.file_id, "title": filename }]).to_string();
        let _: IgnoredAny = self
            .post_form(
                "files.completeUploadExternal",
                token,
                &[("files", files.as_str()), ("channel_id", channel.id.as_str())],
            )
            .await?;

        info!(
            channel = %channel.name,
            file = %ticket.file_id,
            bytes = %length,
            "snapshot uploaded"
        );
        Ok(())
    }
}

impl ChannelStore for SlackStore {
    fn resolve_channel<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, EnvbotResult<Option<Channel>>> {
        Box::pin(self.find_channel(name))
    }

    fn latest_snapshot<'a>(
        &'a self,
        channel: &'a Channel,
    ) -> BoxFuture<'a, EnvbotResult<Option<SnapshotRef>>> {
        Box::pin(self.find_latest_snapshot(channel))
    }

    fn snapshot_contents<'a>(
        &'a self,
        snapshot: &'a SnapshotRef,
    ) -> BoxFuture<'a, EnvbotResult<Vec<u8>>> {
        Box::pin(self.download(snapshot))
    }

    fn upload_snapshot<'a>(
        &'a self,
        channel: &'a Channel,
        contents: Vec<u8>,
    ) -> BoxFuture<'a, EnvbotResult<()>> {
        Box::pin(self.upload(channel, contents))
    }
}
