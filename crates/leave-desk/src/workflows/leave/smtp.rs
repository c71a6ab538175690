use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};

use super::notify::{MailError, Mailer, OutgoingMail};
use crate::config::SmtpConfig;

/// SMTP relay mailer. Each message is sent as `"{sender_name}" <from_address>`.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from_address: Address,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let from_address = parse_address(&config.from_address)?;

        let builder = if config.starttls {
            SmtpTransport::starttls_relay(&config.host)
                .map_err(|err| MailError::Transport(err.to_string()))?
        } else {
            SmtpTransport::builder_dangerous(&config.host)
        };
        let builder = builder.port(config.port);
        let builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from_address,
        })
    }

    pub(crate) fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailError> {
        let from = Mailbox::new(Some(mail.sender_name.clone()), self.from_address.clone());
        let to = Mailbox::new(None, parse_address(&mail.to)?);

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|err| MailError::Message(err.to_string()))
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from_address", &self.from_address.to_string())
            .finish_non_exhaustive()
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(mail)?;
        self.transport
            .send(&message)
            .map_err(|err| MailError::Transport(err.to_string()))?;
        Ok(())
    }
}

fn parse_address(raw: &str) -> Result<Address, MailError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|err| MailError::InvalidAddress {
            address: raw.to_string(),
            reason: err.to_string(),
        })
}
