//! Server configuration collected from environment variables.

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog store connection string, e.g. `sqlite://catalog.db?mode=rwc`.
    pub database_url: String,
    pub port: u16,
    /// HS256 secret for bearer tokens.
    pub jwt_secret: String,
    /// Media host base URL and credential for image uploads.
    pub media_base_url: String,
    pub media_api_key: String,
    /// Notifier endpoint and credential for transactional mail.
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    /// Comma-separated custom blocklist merged into the profanity filter.
    pub profanity_extra_words: Vec<String>,
    pub seed_admin_username: String,
    pub seed_admin_email: String,
    pub seed_admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, BoxError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt_secret: std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set")?,
            media_base_url: std::env::var("MEDIA_BASE_URL")
                .map_err(|_| "MEDIA_BASE_URL must be set")?,
            media_api_key: std::env::var("MEDIA_API_KEY").unwrap_or_default(),
            mail_api_url: std::env::var("MAIL_API_URL").map_err(|_| "MAIL_API_URL must be set")?,
            mail_api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@hardware-mart.local".into()),
            profanity_extra_words: std::env::var("PROFANITY_EXTRA_WORDS")
                .unwrap_or_default()
                .split(',')
                .map(|word| word.trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
            seed_admin_username: std::env::var("SEED_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".into()),
            seed_admin_email: std::env::var("SEED_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@hardware-mart.local".into()),
            seed_admin_password: std::env::var("SEED_ADMIN_PASSWORD")
                .map_err(|_| "SEED_ADMIN_PASSWORD must be set")?,
        })
    }
}
