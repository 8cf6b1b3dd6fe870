use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// Everything has a development-friendly default except the RunPod
/// credentials, which are required: the server refuses to start without
/// them rather than failing on the first submission.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90` — an upload may
    /// carry a whole video plus one synchronous provider round-trip).
    pub request_timeout_secs: u64,
    /// Upload size cap in bytes (default: 512 MiB).
    pub max_upload_bytes: usize,
    /// When set, `/upload` returns as soon as the job record exists and
    /// a background task performs the submit-and-wait cycle.
    pub background_ingest: bool,
    /// Deadline for one background ingest cycle (default: `600`).
    pub ingest_deadline_secs: u64,
    /// Interval between provider status polls in background mode
    /// (default: `2`).
    pub poll_interval_secs: u64,
    /// Local storage layout.
    pub storage: StorageConfig,
    /// RunPod endpoint credentials.
    pub runpod: RunPodConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `90`                    |
    /// | `MAX_UPLOAD_BYTES`     | `536870912`             |
    /// | `BACKGROUND_INGEST`    | `false`                 |
    /// | `INGEST_DEADLINE_SECS` | `600`                   |
    /// | `POLL_INTERVAL_SECS`   | `2`                     |
    /// | `STORAGE_DIR`          | `storage`               |
    /// | `RUNPOD_API_BASE`      | `https://api.runpod.ai` |
    /// | `RUNPOD_ENDPOINT_ID`   | (required)              |
    /// | `RUNPOD_API_KEY`       | (required)              |
    ///
    /// # Panics
    ///
    /// Panics when a value does not parse or a required RunPod variable
    /// is missing. Called once at startup, before the listener binds.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| (512 * 1024 * 1024).to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let background_ingest = std::env::var("BACKGROUND_INGEST")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let ingest_deadline_secs: u64 = std::env::var("INGEST_DEADLINE_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("INGEST_DEADLINE_SECS must be a valid u64");

        let poll_interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "2".into())
            .parse()
            .expect("POLL_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            background_ingest,
            ingest_deadline_secs,
            poll_interval_secs,
            storage: StorageConfig::from_env(),
            runpod: RunPodConfig::from_env(),
        }
    }
}

/// Local storage layout, all under one configurable root.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let root = std::env::var("STORAGE_DIR").unwrap_or_else(|_| "storage".into());
        Self { root: root.into() }
    }

    /// Uploaded payloads, kept for traceability.
    pub fn input_dir(&self) -> PathBuf {
        self.root.join("input")
    }

    /// Decoded result artifacts.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// Job records (the file-backed progress store).
    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    /// Create the directory tree. Idempotent.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [self.input_dir(), self.output_dir(), self.state_dir()] {
            tokio::fs::create_dir_all(&dir).await?;
        }
        Ok(())
    }
}

/// RunPod endpoint credentials. Missing credentials are fatal at
/// startup — there is no degraded mode without a provider.
#[derive(Debug, Clone)]
pub struct RunPodConfig {
    pub api_base: String,
    pub endpoint_id: String,
    pub api_key: String,
}

impl RunPodConfig {
    pub fn from_env() -> Self {
        let api_base =
            std::env::var("RUNPOD_API_BASE").unwrap_or_else(|_| "https://api.runpod.ai".into());
        let endpoint_id = std::env::var("RUNPOD_ENDPOINT_ID")
            .expect("RUNPOD_ENDPOINT_ID must be set");
        let api_key = std::env::var("RUNPOD_API_KEY").expect("RUNPOD_API_KEY must be set");
        Self {
            api_base,
            endpoint_id,
            api_key,
        }
    }
}
