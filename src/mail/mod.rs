//! 邮件发送模块
//!
//! 基于 lettre 的异步 SMTP 发送。SMTP 未配置时整体停用，
//! 所有 send_* 返回 false 而不报错，portfolio 在无邮箱环境也能跑。
//! 每次成功发送都会补一条 EMAIL_SENT 指标（尽力而为）。

use std::sync::Arc;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;
use tracing::{error, info, warn};

use crate::analytics::{MetricType, MetricsRecorder, NewMetric};
use crate::config::MailConfig;

pub struct Mailer {
    config: MailConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    recorder: Arc<MetricsRecorder>,
}

impl Mailer {
    pub fn new(config: MailConfig, recorder: Arc<MetricsRecorder>) -> Self {
        let transport = if config.enabled() {
            match Self::build_transport(&config) {
                Ok(transport) => Some(transport),
                Err(e) => {
                    error!("Failed to build SMTP transport, mail disabled: {}", e);
                    None
                }
            }
        } else {
            info!("SMTP not configured, outbound mail disabled");
            None
        };

        Self {
            config,
            transport,
            recorder,
        }
    }

    /// 构建 SMTP 传输（STARTTLS 或隐式 TLS）
    fn build_transport(config: &MailConfig) -> anyhow::Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        };

        let mut builder = builder.port(config.smtp_port);
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }
        Ok(builder.build())
    }

    /// 底层发送
    async fn send_raw(
        &self,
        to: &str,
        subject: &str,
        html: String,
        reply_to: Option<&str>,
    ) -> anyhow::Result<()> {
        let Some(transport) = &self.transport else {
            anyhow::bail!("SMTP transport not configured");
        };

        let from = format!("\"{}\" <{}>", self.config.from_name, self.config.from_address);
        let mut builder = Message::builder()
            .from(from.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML);

        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }

        let message = builder.body(html)?;
        transport.send(message).await?;
        Ok(())
    }

    /// 记录 EMAIL_SENT 指标；失败只记日志
    async fn record_email_metric(&self, path: &str, metadata: serde_json::Value) {
        let mut metric = NewMetric::new(MetricType::EmailSent, path);
        metric.metadata = Some(metadata);
        if let Err(e) = self.recorder.create_metric(metric).await {
            warn!("Failed to record EMAIL_SENT metric: {}", e);
        }
    }

    /// 给访客的留言确认邮件
    pub async fn send_contact_confirmation(&self, to: &str, name: &str) -> bool {
        let html = format!(
            "<p>Hi {},</p>\
             <p>Thanks for reaching out — your message has been received and \
             I will get back to you shortly.</p>\
             <p>— Portfolio</p>",
            name
        );

        match self.send_raw(to, "Your message has been received", html, None).await {
            Ok(()) => {
                self.record_email_metric(
                    "/contact",
                    json!({ "emailType": "contact-confirmation", "recipient": to }),
                )
                .await;
                true
            }
            Err(e) => {
                error!("Error sending contact confirmation email: {}", e);
                false
            }
        }
    }

    /// 给站长的新留言通知（回复地址指向访客）
    pub async fn send_contact_notification(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> bool {
        if self.config.admin_address.is_empty() {
            warn!("mail.admin_address not configured, skipping contact notification");
            return false;
        }

        let html = format!(
            "<h3>New contact message</h3>\
             <p><strong>From:</strong> {} &lt;{}&gt;</p>\
             <p><strong>Subject:</strong> {}</p>\
             <p>{}</p>",
            name, email, subject, message
        );

        let admin_address = self.config.admin_address.clone();
        match self
            .send_raw(
                &admin_address,
                &format!("New contact message: {}", subject),
                html,
                Some(email),
            )
            .await
        {
            Ok(()) => {
                self.record_email_metric(
                    "/contact",
                    json!({ "emailType": "contact-notification", "sender": email }),
                )
                .await;
                true
            }
            Err(e) => {
                error!("Error sending contact notification email: {}", e);
                false
            }
        }
    }

    /// 密码重置链接邮件
    pub async fn send_password_reset(&self, to: &str, reset_token: &str, frontend_url: &str) -> bool {
        let reset_url = format!("{}/reset-password?token={}", frontend_url, reset_token);
        let html = format!(
            "<p>A password reset was requested for your account.</p>\
             <p><a href=\"{}\">Reset your password</a></p>\
             <p>If you did not request this, you can ignore this email.</p>",
            reset_url
        );

        match self.send_raw(to, "Password reset", html, None).await {
            Ok(()) => {
                self.record_email_metric(
                    "/auth/reset-password",
                    json!({ "emailType": "password-reset", "recipient": to }),
                )
                .await;
                true
            }
            Err(e) => {
                error!("Error sending password reset email: {}", e);
                false
            }
        }
    }

    /// 密码已修改确认邮件
    pub async fn send_password_changed(&self, to: &str) -> bool {
        let html = "<p>Your password has been changed successfully.</p>\
                    <p>If this wasn't you, request a new reset immediately.</p>"
            .to_string();

        match self.send_raw(to, "Password changed", html, None).await {
            Ok(()) => {
                self.record_email_metric(
                    "/auth/reset-password",
                    json!({ "emailType": "password-changed", "recipient": to }),
                )
                .await;
                true
            }
            Err(e) => {
                error!("Error sending password changed email: {}", e);
                false
            }
        }
    }
}
