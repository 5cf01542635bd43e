//! Email delivery task.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::executor::{JobExecutionError, JobHandler};
use crate::job::Job;

use super::{SEND_EMAIL, required_str};

const SIMULATED_WORK: Duration = Duration::from_secs(1);

/// `send_email(to_email, subject, body)`: pretends to send a message.
#[derive(Debug, Default)]
pub struct SendEmailHandler;

#[async_trait]
impl JobHandler for SendEmailHandler {
    fn job_type(&self) -> &str {
        SEND_EMAIL
    }

    async fn execute(&self, job: &Job) -> Result<Value, JobExecutionError> {
        let to_email = required_str(job, 0, "to_email")?;
        let subject = required_str(job, 1, "subject")?;
        let body = required_str(job, 2, "body")?;

        tracing::info!(
            job_id = %job.id,
            subject = %subject,
            body_len = body.len(),
            "Sending email to {}",
            to_email
        );

        tokio::time::sleep(SIMULATED_WORK).await;

        tracing::info!(job_id = %job.id, "Email sent successfully to {}", to_email);
        Ok(json!({
            "status": "sent",
            "to": to_email,
        }))
    }
}
