pub mod domain;
pub mod model;
pub mod time;

pub mod config {
    #[derive(Debug, Clone)]
    pub struct Settings {
        pub model_path: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                model_path: std::env::var("MODEL_PATH").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        /// Path of the serialized model artifact. The deployment historically
        /// reads a fixed filename from the working directory; MODEL_PATH
        /// overrides it.
        pub fn model_path(&self) -> &str {
            self.model_path
                .as_deref()
                .unwrap_or("serialized_model.json")
        }
    }
}
