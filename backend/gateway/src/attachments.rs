//! Submit form parsing.
//!
//! The UI posts `multipart/form-data` with a `question` text field and an
//! optional `image` file field.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use codelens_agent::Submission;
use codelens_media::{MediaPayload, UploadPolicy, UploadRejection};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("malformed form data: {0}")]
    Multipart(#[from] MultipartError),

    #[error("upload rejected: {0}")]
    Rejected(#[from] UploadRejection),
}

/// Raw contents of one submit form.
#[derive(Debug, Default)]
pub struct SubmitForm {
    pub question: String,
    pub upload: Option<MediaPayload>,
}

impl SubmitForm {
    /// Check the upload against the policy and turn the form into a turn input.
    pub fn into_submission(self, policy: &UploadPolicy) -> Result<Submission, AttachmentError> {
        match self.upload {
            Some(upload) => {
                policy.check(&upload)?;
                info!(
                    filename = %upload.filename,
                    size = upload.data.len(),
                    "Received screenshot upload"
                );
                Ok(Submission::image(upload.data.to_vec()))
            }
            None => Ok(Submission::text(self.question)),
        }
    }
}

/// Read every field of the submit form. Unknown fields are skipped.
pub async fn read_submit_form(mut multipart: Multipart) -> Result<SubmitForm, AttachmentError> {
    let mut form = SubmitForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "question" => form.question = field.text().await?,
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                // Browsers send an empty, nameless part when no file was chosen.
                if !(filename.is_empty() && data.is_empty()) {
                    form.upload = Some(MediaPayload::new(filename, data));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}
