use lettre::message::{Mailbox, MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, instrument};

use acadex_core::AppError;

use crate::config::email::EmailConfig;

fn mail_error(context: &str, err: impl std::fmt::Display) -> AppError {
    AppError::internal(anyhow::anyhow!("{}: {}", context, err))
}

/// Outbound SMTP mail, disabled unless configured.
///
/// Every caller treats a send as best-effort: the state change that triggered
/// the notification has already been persisted by the time this runs, and a
/// failure here is logged at the call site rather than surfaced.
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the reply an admin wrote to a contact-form message.
    #[instrument(skip(self, reply_body))]
    pub async fn send_message_reply(
        &self,
        to_email: &str,
        to_name: &str,
        subject: &str,
        reply_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            debug!("SMTP disabled; skipping reply notification");
            return Ok(());
        }

        let subject_line = if subject.is_empty() {
            "Re: your message to Acadex Academy".to_string()
        } else {
            format!("Re: {}", subject)
        };
        let text_body = format!(
            "Hi {},\n\n{}\n\nBest regards,\nAcadex Academy",
            to_name, reply_body
        );
        let html_body = self.reply_template(to_name, reply_body);

        let email = Message::builder()
            .from(self.sender()?)
            .to(to_email
                .parse::<Mailbox>()
                .map_err(|e| mail_error("Invalid recipient address", e))?)
            .subject(subject_line)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| mail_error("Failed to build email", e))?;

        let mailer = self.transport()?;
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| mail_error("Task join error", e))?
            .map_err(|e| mail_error("Failed to send email", e))?;

        Ok(())
    }

    fn sender(&self) -> Result<Mailbox, AppError> {
        format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| mail_error("Invalid sender address", e))
    }

    /// Unauthenticated transport when no SMTP credentials are configured
    /// (local dev against a mail catcher), an authenticated relay otherwise.
    fn transport(&self) -> Result<SmtpTransport, AppError> {
        if self.config.smtp_username.is_empty() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let credentials = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );
        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| mail_error("Failed to create SMTP relay", e))?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .build())
    }

    fn reply_template(&self, name: &str, reply_body: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Reply from Acadex Academy</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
                    <tr>
                        <td style="background-color: #1D4ED8; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">Acadex Academy</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                Hi <strong>{}</strong>,
                            </p>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                Thank you for getting in touch. Here is our reply to your message:
                            </p>
                            <div style="background-color: #F3F4F6; border-left: 4px solid #1D4ED8; padding: 15px; margin: 20px 0;">
                                <p style="margin: 0; color: #333333; font-size: 15px; line-height: 1.6; white-space: pre-line;">{}</p>
                            </div>
                            <p style="margin: 0; color: #666666; font-size: 14px; line-height: 1.5;">
                                If you have further questions, just reply to this email or book an appointment on our website.
                            </p>
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">
                                This email was sent by Acadex Academy in response to your enquiry.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            name, reply_body
        )
    }
}
