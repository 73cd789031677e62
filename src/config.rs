use std::env;

/// Runtime configuration, read once at startup. Every value has a default so
/// the service starts with an empty environment; the endpoints are
/// overridable so tests can point them at local mock servers.
pub struct AppConfig {
    pub port: u16,
    pub region: String,
    pub model_id: String,
    pub model_endpoint: String,
    pub model_api_key: Option<String>,
    pub bucket: String,
    pub storage_endpoint: String,
    pub timeout_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        let model_id =
            env::var("MODEL_ID").unwrap_or_else(|_| "meta.llama3-70b-instruct-v1:0".to_string());

        let model_endpoint = env::var("MODEL_ENDPOINT").unwrap_or_else(|_| {
            format!("https://bedrock-runtime.{region}.amazonaws.com/model/{model_id}/invoke")
        });

        let model_api_key = env::var("MODEL_API_KEY").ok().filter(|key| !key.is_empty());

        let bucket = env::var("BLOG_BUCKET").unwrap_or_else(|_| "blog-artifacts".to_string());

        let storage_endpoint = env::var("STORAGE_ENDPOINT")
            .unwrap_or_else(|_| format!("https://s3.{region}.amazonaws.com"));

        let timeout_ms = env::var("TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(30_000);

        Self {
            port,
            region,
            model_id,
            model_endpoint,
            model_api_key,
            bucket,
            storage_endpoint,
            timeout_ms,
        }
    }
}
