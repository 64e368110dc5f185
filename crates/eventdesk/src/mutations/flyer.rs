use uuid::Uuid;

use eventdesk_core::event::{EventDraft, FlyerUpload};

use crate::state::AppState;

/// Uploads a flyer and points the draft at its public URL.
///
/// An upload failure is logged and swallowed; the draft keeps no flyer and
/// the event is still saved. Returns the public URL on success.
pub async fn attach_flyer(
    state: &AppState,
    draft: &mut EventDraft,
    upload: &FlyerUpload,
) -> Option<String> {
    let name = upload.object_name(Uuid::new_v4());
    match state
        .objects
        .upload(&name, &upload.content_type, upload.bytes.clone())
        .await
    {
        Ok(handle) => {
            let url = state.objects.public_url(&handle);
            tracing::debug!(object = %name, url = %url, "Uploaded flyer");
            draft.flyer_url = Some(url.clone());
            Some(url)
        }
        Err(err) => {
            tracing::warn!(file = %upload.file_name, error = %err, "Flyer upload failed");
            draft.flyer_url = None;
            None
        }
    }
}
