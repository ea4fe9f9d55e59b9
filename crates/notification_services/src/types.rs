use std::{fmt, str::FromStr};

use campground_scan::NotificationError;

/// Phrase spoken by the speech channel when nothing else is configured.
pub const DEFAULT_SAY_MESSAGE: &str = "campsite found";

/// A way of announcing availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationChannel {
    /// Email through AWS SES
    Email,
    /// Text message through AWS SNS
    Sms,
    /// Local text-to-speech (`say`)
    Say,
    /// Log only
    Log,
}

impl FromStr for NotificationChannel {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "say" => Ok(Self::Say),
            "log" => Ok(Self::Log),
            other => Err(NotificationError::Config(format!(
                "unknown notification channel '{}' (expected email, sms, say or log)",
                other
            ))),
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Say => "say",
            Self::Log => "log",
        };
        f.write_str(name)
    }
}

impl NotificationChannel {
    /// Whether a recipient override fits this channel.
    ///
    /// Email takes addresses, SMS takes phone numbers and the log takes anything.
    /// The speech channel never takes one; its phrase comes from `SAY_MESSAGE`.
    pub fn accepts_target(&self, target: &str) -> bool {
        match self {
            Self::Email => target.contains('@'),
            Self::Sms => {
                target.chars().any(|c| c.is_ascii_digit())
                    && target
                        .chars()
                        .all(|c| c.is_ascii_digit() || "+()-. ".contains(c))
            }
            Self::Say => false,
            Self::Log => true,
        }
    }
}

/// Notification settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationConfig {
    /// Sender address for email (`FROM_EMAIL`)
    pub from_email: Option<String>,
    /// Default email recipient (`NOTIFY_EMAIL_TO`)
    pub email_to: Option<String>,
    /// Default SMS recipient (`NOTIFY_PHONE`)
    pub phone: Option<String>,
    /// Phrase for the speech channel (`SAY_MESSAGE`)
    pub say_message: String,
    /// Channels enabled for the HTTP service (`NOTIFY_CHANNELS`, comma separated)
    pub channels: Vec<NotificationChannel>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            from_email: None,
            email_to: None,
            phone: None,
            say_message: DEFAULT_SAY_MESSAGE.to_string(),
            channels: Vec::new(),
        }
    }
}

impl NotificationConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, NotificationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`. Unset or empty values fall back to defaults.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, NotificationError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let channels = match get("NOTIFY_CHANNELS") {
            Some(list) => list
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(NotificationChannel::from_str)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            from_email: get("FROM_EMAIL"),
            email_to: get("NOTIFY_EMAIL_TO"),
            phone: get("NOTIFY_PHONE"),
            say_message: get("SAY_MESSAGE").unwrap_or_else(|| DEFAULT_SAY_MESSAGE.to_string()),
            channels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_parsing() {
        assert_eq!("email".parse::<NotificationChannel>().unwrap(), NotificationChannel::Email);
        assert_eq!(" SMS ".parse::<NotificationChannel>().unwrap(), NotificationChannel::Sms);
        assert_eq!("say".parse::<NotificationChannel>().unwrap(), NotificationChannel::Say);
        assert_eq!("log".parse::<NotificationChannel>().unwrap(), NotificationChannel::Log);
        assert!(matches!(
            "tweet".parse::<NotificationChannel>(),
            Err(NotificationError::Config(_))
        ));
    }

    #[test]
    fn test_target_fits_channel() {
        assert!(NotificationChannel::Email.accepts_target("me@example.com"));
        assert!(!NotificationChannel::Email.accepts_target("+15551234567"));
        assert!(NotificationChannel::Sms.accepts_target("+1 (555) 123-4567"));
        assert!(!NotificationChannel::Sms.accepts_target("me@example.com"));
        assert!(!NotificationChannel::Sms.accepts_target("+"));
        assert!(!NotificationChannel::Say.accepts_target("campsite found"));
        assert!(NotificationChannel::Log.accepts_target("anyone"));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = NotificationConfig::from_lookup(|key| match key {
            "FROM_EMAIL" => Some("alerts@example.com".to_string()),
            "NOTIFY_EMAIL_TO" => Some("me@example.com".to_string()),
            "NOTIFY_CHANNELS" => Some("email, log,".to_string()),
            "SAY_MESSAGE" => Some("   ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.from_email.as_deref(), Some("alerts@example.com"));
        assert_eq!(config.email_to.as_deref(), Some("me@example.com"));
        assert_eq!(config.phone, None);
        assert_eq!(config.say_message, DEFAULT_SAY_MESSAGE);
        assert_eq!(
            config.channels,
            vec![NotificationChannel::Email, NotificationChannel::Log]
        );
    }

    #[test]
    fn test_config_rejects_unknown_channel() {
        let result = NotificationConfig::from_lookup(|key| {
            (key == "NOTIFY_CHANNELS").then(|| "pigeon".to_string())
        });

        assert!(matches!(result, Err(NotificationError::Config(_))));
    }
}
