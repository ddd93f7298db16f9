pub mod brand;
pub mod comment;
pub mod product;
pub mod transaction;

use futures::future::try_join_all;
use uuid::Uuid;

use crate::entities::image::ImageAsset;
use crate::error::ApiError;
use crate::media::UploadFile;
use crate::state::AppState;

/// Path IDs arrive as strings; anything that does not parse as a UUID is
/// rejected before the store is queried.
pub fn parse_id(kind: &str, id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::InvalidInput(format!("Invalid {} ID: {}", kind, id)))
}

/// Uploads every attached file to the media host concurrently. All uploads
/// must succeed; a single failure fails the batch.
pub(crate) async fn upload_all(
    state: &AppState,
    files: &[UploadFile],
) -> Result<Vec<ImageAsset>, ApiError> {
    try_join_all(files.iter().map(|file| state.media.upload(file))).await
}
