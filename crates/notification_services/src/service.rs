use std::sync::Arc;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ses::Client as SesClient;
use aws_sdk_sns::Client as SnsClient;
use campground_scan::{NotificationError, NotificationMessage, Notifier};
use uuid::Uuid;

use crate::speech::SpeechNotifier;
use crate::types::{NotificationChannel, NotificationConfig};

/// Email channel backed by AWS SES.
#[derive(Debug, Clone)]
pub struct SesEmailNotifier {
    ses_client: SesClient,
    from_email: String,
    default_to: Option<String>,
}

impl SesEmailNotifier {
    /// Creates an email notifier from a loaded AWS configuration.
    pub fn new(
        aws: &aws_config::SdkConfig,
        config: &NotificationConfig,
    ) -> Result<Self, NotificationError> {
        let from_email = config.from_email.clone().ok_or_else(|| {
            NotificationError::Email("FROM_EMAIL environment variable not set".to_string())
        })?;

        Ok(Self {
            ses_client: SesClient::new(aws),
            from_email,
            default_to: config.email_to.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SesEmailNotifier {
    async fn notify(
        &self,
        message: &NotificationMessage,
        target: Option<&str>,
    ) -> Result<String, NotificationError> {
        let to = target.or(self.default_to.as_deref()).ok_or_else(|| {
            NotificationError::Email("no recipient: set NOTIFY_EMAIL_TO or pass a target".to_string())
        })?;

        log::info!("📧 Sending availability email to {}", to);

        let subject_content = aws_sdk_ses::types::Content::builder()
            .data(&message.subject)
            .build()
            .map_err(|e| {
                log::error!("❌ Failed to build subject content: {}", e);
                NotificationError::Email(format!("Failed to build subject: {}", e))
            })?;

        let text_content = aws_sdk_ses::types::Content::builder()
            .data(&message.body)
            .build()
            .map_err(|e| {
                log::error!("❌ Failed to build text content: {}", e);
                NotificationError::Email(format!("Failed to build text body: {}", e))
            })?;

        let body = aws_sdk_ses::types::Body::builder().text(text_content).build();

        let email = aws_sdk_ses::types::Message::builder()
            .subject(subject_content)
            .body(body)
            .build();

        let destination = aws_sdk_ses::types::Destination::builder()
            .to_addresses(to)
            .build();

        let result = self
            .ses_client
            .send_email()
            .source(&self.from_email)
            .destination(destination)
            .message(email)
            .send()
            .await;

        match result {
            Ok(output) => {
                let message_id = output.message_id();
                log::info!("✅ Availability email sent to {}", to);
                log::info!("📧 SES Message ID: {}", message_id);
                Ok(message_id.to_string())
            }
            Err(e) => {
                log::error!("❌ AWS SES error: {:#?}", e);
                let error_msg = if let Some(service_error) = e.as_service_error() {
                    format!("AWS SES service error: {:?}", service_error)
                } else {
                    format!("AWS SES error: {}", e)
                };
                Err(NotificationError::Email(error_msg))
            }
        }
    }
}

/// Normalizes a phone number to E.164 (`+` followed by digits).
pub fn format_phone_number(phone: &str) -> String {
    if phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("+{}", phone.replace(['(', ')', '-', ' ', '.'], ""))
    }
}

/// Text message channel backed by AWS SNS. Sends the short text.
#[derive(Debug, Clone)]
pub struct SnsSmsNotifier {
    sns_client: SnsClient,
    default_phone: Option<String>,
}

impl SnsSmsNotifier {
    /// Creates an SMS notifier from a loaded AWS configuration.
    pub fn new(aws: &aws_config::SdkConfig, config: &NotificationConfig) -> Self {
        Self {
            sns_client: SnsClient::new(aws),
            default_phone: config.phone.clone(),
        }
    }
}

#[async_trait]
impl Notifier for SnsSmsNotifier {
    async fn notify(
        &self,
        message: &NotificationMessage,
        target: Option<&str>,
    ) -> Result<String, NotificationError> {
        let phone = target.or(self.default_phone.as_deref()).ok_or_else(|| {
            NotificationError::Sms("no recipient: set NOTIFY_PHONE or pass a target".to_string())
        })?;
        let formatted_phone = format_phone_number(phone);

        let output = self
            .sns_client
            .publish()
            .phone_number(&formatted_phone)
            .message(&message.short_text)
            .send()
            .await
            .map_err(|e| NotificationError::Sms(e.to_string()))?;

        log::info!("📱 Availability SMS sent to {}", formatted_phone);
        Ok(output.message_id().unwrap_or_default().to_string())
    }
}

/// Channel that only writes the message to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        message: &NotificationMessage,
        target: Option<&str>,
    ) -> Result<String, NotificationError> {
        if let Some(target) = target {
            log::info!("🔔 [LOG NOTIFY] To: {}", target);
        }
        log::info!("🔔 [LOG NOTIFY] Subject: {}", message.subject);
        log::info!("🔔 [LOG NOTIFY] {}", message.short_text);

        Ok(format!("log-{}", Uuid::new_v4()))
    }
}

/// Sends through every wrapped channel in turn.
///
/// All channels are attempted even if one fails; the first error is returned
/// afterwards. On success the delivery IDs are joined with commas. A recipient
/// override only reaches the channels it fits (see
/// [`NotificationChannel::accepts_target`]); the others use their configured
/// recipient.
pub struct MultiNotifier {
    notifiers: Vec<(NotificationChannel, Arc<dyn Notifier>)>,
}

impl MultiNotifier {
    /// Wraps `notifiers`, each tagged with its channel.
    pub fn new(notifiers: Vec<(NotificationChannel, Arc<dyn Notifier>)>) -> Self {
        Self { notifiers }
    }
}

#[async_trait]
impl Notifier for MultiNotifier {
    async fn notify(
        &self,
        message: &NotificationMessage,
        target: Option<&str>,
    ) -> Result<String, NotificationError> {
        let mut ids = Vec::new();
        let mut first_error = None;

        for (channel, notifier) in &self.notifiers {
            let channel_target = target.filter(|t| channel.accepts_target(t));
            if target.is_some() && channel_target.is_none() {
                log::debug!("Recipient override does not fit {}, using its default", channel);
            }

            match notifier.notify(message, channel_target).await {
                Ok(id) => ids.push(id),
                Err(e) => {
                    log::error!("❌ Notification channel {} failed: {}", channel, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(ids.join(",")),
        }
    }
}

/// Builds a notifier for `channels`, or `None` when no channel is selected.
///
/// Channels are always wrapped in a [`MultiNotifier`] so recipient overrides are
/// routed the same way for one channel or several.
///
/// The AWS configuration is only loaded when an email or SMS channel is requested.
pub async fn build_notifier(
    config: &NotificationConfig,
    channels: &[NotificationChannel],
) -> Result<Option<Arc<dyn Notifier>>, NotificationError> {
    let needs_aws = channels
        .iter()
        .any(|c| matches!(c, NotificationChannel::Email | NotificationChannel::Sms));
    let aws = if needs_aws {
        Some(aws_config::defaults(BehaviorVersion::latest()).load().await)
    } else {
        None
    };

    let mut notifiers: Vec<(NotificationChannel, Arc<dyn Notifier>)> = Vec::new();
    for channel in channels {
        let notifier: Arc<dyn Notifier> = match (channel, &aws) {
            (NotificationChannel::Email, Some(aws)) => {
                Arc::new(SesEmailNotifier::new(aws, config)?)
            }
            (NotificationChannel::Sms, Some(aws)) => Arc::new(SnsSmsNotifier::new(aws, config)),
            (NotificationChannel::Say, _) => Arc::new(SpeechNotifier::new(&config.say_message)),
            _ => Arc::new(LogNotifier),
        };
        log::info!("🔔 Notification channel enabled: {}", channel);
        notifiers.push((*channel, notifier));
    }

    if notifiers.is_empty() {
        return Ok(None);
    }
    Ok(Some(Arc::new(MultiNotifier::new(notifiers))))
}
