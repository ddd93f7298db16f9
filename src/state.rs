use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::media::MediaHost;
use crate::notifier::Notifier;
use crate::profanity::ProfanityFilter;

/// Shared handle to the store and the external collaborators, passed to every
/// handler through an `Extension`.
pub struct AppState {
    pub db: DatabaseConnection,
    pub media: Arc<dyn MediaHost>,
    pub notifier: Arc<dyn Notifier>,
    pub profanity: ProfanityFilter,
    pub jwt_secret: String,
}
