/// Default bucket holding entity images.
pub const DEFAULT_BUCKET: &str = "app-images";

/// Connection settings for Supabase Storage.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Project base URL, without a trailing slash.
    pub base_url: String,
    /// Service key sent as both bearer token and `apikey`.
    pub service_key: String,
    pub bucket: String,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var          | Required | Default      |
    /// |------------------|----------|--------------|
    /// | `SUPABASE_URL`   | **yes**  | --           |
    /// | `SUPABASE_KEY`   | **yes**  | --           |
    /// | `STORAGE_BUCKET` | no       | `app-images` |
    ///
    /// # Panics
    ///
    /// Panics if `SUPABASE_URL` or `SUPABASE_KEY` is not set or is empty.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set in the environment");
        assert!(!base_url.is_empty(), "SUPABASE_URL must not be empty");

        let service_key =
            std::env::var("SUPABASE_KEY").expect("SUPABASE_KEY must be set in the environment");
        assert!(!service_key.is_empty(), "SUPABASE_KEY must not be empty");

        let bucket = std::env::var("STORAGE_BUCKET")
            .ok()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_BUCKET.into());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }
}
