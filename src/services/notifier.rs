use crate::{
    config::SmtpConfig,
    error::{AppError, AppResult},
    models::StockRecord,
    utils::Logger,
};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::fmt::Write;

/// A plaintext message ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait MailTransport {
    /// One delivery attempt; an error is final.
    async fn send(&self, mail: &OutgoingMail) -> AppResult<()>;
}

/// Authenticated SMTP submission over STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let sender: Mailbox = config
            .sender()
            .parse()
            .map_err(|e| AppError::Delivery(format!("invalid sender '{}': {}", config.sender(), e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Delivery(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, sender })
    }

    pub fn build_message(&self, mail: &OutgoingMail) -> AppResult<Message> {
        let recipient: Mailbox = mail
            .to
            .parse()
            .map_err(|e| AppError::Delivery(format!("invalid recipient '{}': {}", mail.to, e)))?;

        Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| AppError::Delivery(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
        let message = self.build_message(mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Delivery(e.to_string()))?;
        Ok(())
    }
}

pub fn format_subject(record: &StockRecord) -> String {
    format!(
        "PSE Notifier: {} is at target price {:.6}",
        record.symbol, record.last_traded_price
    )
}

/// Fixed-layout summary, one field per line, numbers with six decimals.
pub fn format_body(record: &StockRecord) -> String {
    let mut body = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(body, "Symbol: {}", record.symbol);
    let _ = writeln!(body, "Last Traded Price: {:.6}", record.last_traded_price);
    let _ = writeln!(body, "Change: {}", record.change_raw);
    let _ = writeln!(body, "Open: {:.6}", record.open);
    let _ = writeln!(body, "Close: {:.6}", record.prev_close_price);
    let _ = writeln!(body, "High: {:.6}", record.high);
    let _ = writeln!(body, "Low: {:.6}", record.low);
    let _ = writeln!(body, "Average: {:.6}", record.average);
    let _ = writeln!(body, "Value: {}", record.value);
    let _ = writeln!(body, "Volume: {}", record.volume);
    let _ = writeln!(body, "52-Week High: {:.6}", record.high_52_week);
    let _ = writeln!(body, "52-Week Low: {:.6}", record.low_52_week);
    body
}

pub struct Notifier<T: MailTransport> {
    transport: T,
    logger: Logger,
}

impl<T: MailTransport> Notifier<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            logger: Logger::new("NOTIFIER"),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn notify(&self, recipient: &str, record: &StockRecord) -> AppResult<()> {
        let mail = OutgoingMail {
            to: recipient.to_string(),
            subject: format_subject(record),
            body: format_body(record),
        };

        match self.transport.send(&mail).await {
            Ok(()) => {
                self.logger
                    .info(&format!("Sent {} summary to {}", record.symbol, recipient));
                Ok(())
            }
            Err(e) => {
                self.logger.error_with_error("Delivery failed", &e);
                Err(e)
            }
        }
    }
}
