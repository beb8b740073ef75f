use super::traits::{Label, Mailbox, MailboxFuture, ThreadRef};
use crate::error::MailboxError;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com";

const INBOX_LABEL_ID: &str = "INBOX";
const THREADS_PAGE_SIZE: &str = "500";

pub fn build_gmail_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Deserialize)]
struct LabelsResponse {
    #[serde(default)]
    labels: Vec<LabelResource>,
}

#[derive(Debug, Deserialize)]
struct LabelResource {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadsPage {
    #[serde(default)]
    threads: Vec<ThreadResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ThreadResource {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ThreadDetail {
    #[serde(default)]
    messages: Vec<MessageResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageResource {
    /// Epoch milliseconds, encoded by the API as a decimal string.
    internal_date: Option<String>,
}

/// Gmail REST v1 mailbox for the authenticated user.
pub struct GmailMailbox {
    client: Client,
    api_base: String,
    access_token: String,
}

impl GmailMailbox {
    pub fn new(api_base: &str, access_token: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/gmail/v1/users/me/{path}", self.api_base)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, MailboxError> {
        let response = self.send(endpoint, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| MailboxError::Malformed(format!("{endpoint}: {e}")))
    }

    async fn send(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, MailboxError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| MailboxError::Request {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailboxError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn modify_thread(
        &self,
        thread: &ThreadRef,
        remove_label_id: &str,
    ) -> Result<(), MailboxError> {
        let endpoint = format!("threads/{}/modify", thread.id);
        let request = self
            .client
            .post(self.url(&endpoint))
            .json(&json!({ "removeLabelIds": [remove_label_id] }));
        self.send(&endpoint, request)
            .await
            .map_err(|e| not_found_as_thread(e, thread))?;
        Ok(())
    }
}

fn not_found_as_thread(err: MailboxError, thread: &ThreadRef) -> MailboxError {
    match err {
        MailboxError::Api { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            MailboxError::ThreadNotFound {
                thread_id: thread.id.clone(),
            }
        }
        other => other,
    }
}

fn latest_internal_date(
    thread: &ThreadRef,
    messages: &[MessageResource],
) -> Result<DateTime<Utc>, MailboxError> {
    let mut latest: Option<i64> = None;
    for message in messages {
        let Some(raw) = message.internal_date.as_deref() else {
            continue;
        };
        let millis: i64 = raw.parse().map_err(|_| {
            MailboxError::Malformed(format!(
                "thread {} has non-numeric internalDate '{raw}'",
                thread.id
            ))
        })?;
        latest = Some(latest.map_or(millis, |current| current.max(millis)));
    }

    let millis = latest.ok_or_else(|| MailboxError::EmptyThread {
        thread_id: thread.id.clone(),
    })?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        MailboxError::Malformed(format!(
            "thread {} internalDate {millis} is out of range",
            thread.id
        ))
    })
}

impl Mailbox for GmailMailbox {
    fn name(&self) -> &str {
        "gmail"
    }

    fn find_label<'a>(&'a self, name: &'a str) -> MailboxFuture<'a, Option<Label>> {
        Box::pin(async move {
            let request = self.client.get(self.url("labels"));
            let response: LabelsResponse = self.send_json("labels", request).await?;
            Ok(response
                .labels
                .into_iter()
                .find(|label| label.name == name)
                .map(|label| Label {
                    id: label.id,
                    name: label.name,
                }))
        })
    }

    fn threads<'a>(&'a self, label: &'a Label) -> MailboxFuture<'a, Vec<ThreadRef>> {
        Box::pin(async move {
            let mut threads = Vec::new();
            let mut page_token: Option<String> = None;

            loop {
                let mut query = vec![
                    ("labelIds", label.id.as_str()),
                    ("maxResults", THREADS_PAGE_SIZE),
                ];
                if let Some(token) = page_token.as_deref() {
                    query.push(("pageToken", token));
                }
                let request = self.client.get(self.url("threads")).query(&query);
                let page: ThreadsPage = self.send_json("threads", request).await?;

                threads.extend(page.threads.into_iter().map(|t| ThreadRef::new(t.id)));
                match page.next_page_token {
                    Some(token) if !token.is_empty() => page_token = Some(token),
                    _ => break,
                }
            }

            Ok(threads)
        })
    }

    fn last_activity<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, DateTime<Utc>> {
        Box::pin(async move {
            let endpoint = format!("threads/{}", thread.id);
            let request = self
                .client
                .get(self.url(&endpoint))
                .query(&[("format", "minimal")]);
            let detail: ThreadDetail = self
                .send_json(&endpoint, request)
                .await
                .map_err(|e| not_found_as_thread(e, thread))?;
            latest_internal_date(thread, &detail.messages)
        })
    }

    fn archive<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, ()> {
        Box::pin(async move { self.modify_thread(thread, INBOX_LABEL_ID).await })
    }

    fn trash<'a>(&'a self, thread: &'a ThreadRef) -> MailboxFuture<'a, ()> {
        Box::pin(async move {
            let endpoint = format!("threads/{}/trash", thread.id);
            let request = self.client.post(self.url(&endpoint));
            self.send(&endpoint, request)
                .await
                .map_err(|e| not_found_as_thread(e, thread))?;
            Ok(())
        })
    }

    fn remove_label<'a>(
        &'a self,
        thread: &'a ThreadRef,
        label: &'a Label,
    ) -> MailboxFuture<'a, ()> {
        Box::pin(async move { self.modify_thread(thread, &label.id).await })
    }
}
