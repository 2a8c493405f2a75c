//! Fire-and-forget "new articles" notification through an HTTP email API.
//!
//! Configuration comes from the environment; when it is absent the
//! notification is skipped with a warning instead of failing the run. The
//! caller only invokes this after the ledger is already saved, so nothing
//! here can affect durability.

use std::env;

use serde_json::{json, Value};
use tracing::{debug, error, warn};

/// Announce that `new_count` new articles showed up on the tracked page.
pub async fn send_new_headlines(new_count: usize) -> anyhow::Result<()> {
    match NotifyProperties::load() {
        Ok(properties) => {
            let body = json!({
                "from": {
                    "name": &properties.sender_name,
                    "email": &properties.sender_email,
                },
                "to": [
                    {
                        "email": &properties.recipient,
                    }
                ],
                "subject": "You have new articles to read",
                "text": format!(
                    "Hello,\n\n{new_count} new article(s) showed up on the tracked page.\n\nBye."
                ),
            });
            post_notification(&body, &properties).await?;
        }
        Err(e) => warn!(?e, "Could not load notifier properties. No email will be sent"),
    }
    Ok(())
}

async fn post_notification(
    body: &Value,
    properties: &NotifyProperties,
) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    debug!("Notification body {body}");
    let response = client
        .post(&properties.endpoint)
        .header("X-Auth-Token", &properties.api_key)
        .json(body)
        .send()
        .await?;

    if !response.status().is_success() {
        error!("Notification response {:?}", response.status());
        debug!("{:?}", response.text().await?);
    } else {
        debug!("Notification sent");
    }

    Ok(())
}

struct NotifyProperties {
    sender_name: String,
    sender_email: String,
    recipient: String,
    endpoint: String,
    api_key: String,
}

impl NotifyProperties {
    fn load() -> Result<Self, env::VarError> {
        Ok(NotifyProperties {
            sender_name: env::var("HT_EMAIL_SENDER_NAME")?,
            sender_email: env::var("HT_EMAIL_SENDER")?,
            recipient: env::var("HT_EMAIL_RECIPIENT")?,
            endpoint: env::var("HT_EMAIL_ENDPOINT")?,
            api_key: env::var("HT_EMAIL_API_KEY")?,
        })
    }
}
