//! 留言提交编排
//!
//! 一次提交要做三件事：落库、补一条 CONTACT_FORM_SUBMITTED 指标、
//! 给访客和站长各发一封邮件。指标和邮件都是副作用，失败只记日志，
//! 不影响留言本身的成功返回。

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::analytics::{MetricType, MetricsRecorder, NewMetric};
use crate::errors::Result;
use crate::mail::Mailer;
use crate::storage::SeaOrmStorage;
use crate::storage::models::{Contact, ContactInput};

pub struct ContactService {
    storage: Arc<SeaOrmStorage>,
    recorder: Arc<MetricsRecorder>,
    mailer: Arc<Mailer>,
}

impl ContactService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        recorder: Arc<MetricsRecorder>,
        mailer: Arc<Mailer>,
    ) -> Self {
        Self {
            storage,
            recorder,
            mailer,
        }
    }

    pub async fn submit(&self, input: ContactInput) -> Result<Contact> {
        let contact = self.storage.create_contact(input).await?;

        let mut metric = NewMetric::new(MetricType::ContactFormSubmitted, "/contact");
        metric.metadata = Some(json!({ "contactId": contact.id }));
        if let Err(e) = self.recorder.create_metric(metric).await {
            warn!("Failed to record contact form metric: {}", e);
        }

        self.mailer
            .send_contact_confirmation(&contact.email, &contact.name)
            .await;
        self.mailer
            .send_contact_notification(
                &contact.name,
                &contact.email,
                &contact.subject,
                &contact.message,
            )
            .await;

        Ok(contact)
    }
}
