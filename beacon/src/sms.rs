//! Outbound SMS dispatch for check-in notifications.
//!
//! The gateway is optional: when no credentials are configured, notifications
//! are skipped without error. Dispatch happens only after the check-in record
//! is durably persisted, and a dispatch failure never rolls the record back -
//! the outcome is reported alongside the created record instead.

use std::time::Duration;

use serde::Serialize;
use tracing::instrument;
use url::Url;
use utoipa::ToSchema;

use crate::config::SmsConfig;
use crate::db::models::checkins::CheckinDBResponse;
use crate::errors::{Error, Result};

/// Outcome of the notification step of a check-in submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// SMS accepted by the gateway
    Sent,
    /// No gateway configured; nothing attempted
    Skipped,
    /// Gateway rejected or unreachable; the record is still persisted
    Failed,
}

/// Client for a Twilio-compatible SMS gateway.
#[derive(Debug, Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    api_url: Url,
    account_sid: String,
    auth_token: String,
    from: String,
    timeout: Duration,
}

impl SmsClient {
    pub fn new(http: reqwest::Client, config: &SmsConfig) -> Self {
        Self {
            http,
            api_url: config.api_url.clone(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from: config.from.clone(),
            timeout: config.timeout,
        }
    }

    /// Send the fixed-template check-in message to `phone`.
    #[instrument(skip(self, message), fields(to = %phone), err)]
    pub async fn send_checkin_message(&self, phone: &str, message: &str) -> Result<()> {
        let url = self
            .api_url
            .join(&format!("2010-04-01/Accounts/{}/Messages.json", self.account_sid))
            .map_err(|e| Error::Internal {
                operation: format!("build SMS gateway URL: {e}"),
            })?;

        let body = format!("New check-in received: {message}");

        self.http
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", phone), ("From", self.from.as_str()), ("Body", body.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Upstream {
                service: "sms gateway",
                reason: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| Error::Upstream {
                service: "sms gateway",
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

/// Run the notification step for a persisted check-in.
///
/// Never fails: the record already exists, so every dispatch outcome folds
/// into a [`NotificationStatus`] for the response body.
pub async fn notify_checkin(sms: &Option<SmsClient>, record: &CheckinDBResponse) -> NotificationStatus {
    match sms {
        None => NotificationStatus::Skipped,
        Some(client) => match client.send_checkin_message(&record.phone, &record.message).await {
            Ok(()) => NotificationStatus::Sent,
            Err(e) => {
                tracing::warn!(checkin_id = %record.id, error = %e, "Check-in stored but SMS dispatch failed");
                NotificationStatus::Failed
            }
        },
    }
}
