use anyhow::Result;
use async_trait::async_trait;
use narrator_backend::controllers::job::JobController;
use narrator_backend::domain::job::{JobIdPolicy, JobRegistry, JobRunner, Pipeline};
use narrator_backend::domain::tts::{AudioFormat, TtsBackend, TtsManager};
use narrator_backend::infrastructure::audio::WavMerger;
use narrator_backend::infrastructure::http::build_router;
use narrator_backend::infrastructure::repositories::TtsRepository;
use narrator_backend::infrastructure::storage::Storage;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod api_client;
pub mod assertions;

use api_client::TestClient;

/// Chunk bound used by the test app; small enough to split short texts
pub const TEST_MAX_CHUNK_CHARS: usize = 20;

/// Chunks containing this word make the backend fail
pub const FAILING_WORD: &str = "explode";

/// Chunks containing this word are synthesized slowly
pub const SLOW_WORD: &str = "slowly";

/// Speaks each chunk as a one-sample WAV whose value is the chunk's length
pub struct ScriptedTtsRepository;

#[async_trait]
impl TtsRepository for ScriptedTtsRepository {
    fn output_format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, String> {
        if text.contains(FAILING_WORD) {
            return Err("scripted engine failure".to_string());
        }
        if text.contains(SLOW_WORD) {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(|e| e.to_string())?;
            writer
                .write_sample(text.chars().count() as i16)
                .map_err(|e| e.to_string())?;
            writer.finalize().map_err(|e| e.to_string())?;
        }
        Ok(cursor.into_inner())
    }
}

pub struct TestContext {
    pub client: TestClient,
    pub registry: Arc<JobRegistry>,
    pub storage: Storage,
    _root: TempDir,
}

impl TestContext {
    /// Start an app whose job ids follow `policy`
    pub async fn start(policy: JobIdPolicy) -> Result<Self> {
        let root = tempfile::tempdir()?;
        let storage = Storage::new(root.path().join("temp"), root.path().join("results"));
        storage.bootstrap().await?;

        let mut tts = TtsManager::new();
        tts.install(TtsBackend::Espeak, Arc::new(ScriptedTtsRepository));
        let tts = Arc::new(tts);

        let registry = Arc::new(JobRegistry::new(storage.clone()));
        let pipeline = Arc::new(Pipeline::new(
            tts.clone(),
            Arc::new(WavMerger::new()),
            AudioFormat::Wav,
            TEST_MAX_CHUNK_CHARS,
        ));
        let runner = Arc::new(JobRunner::new(registry.clone(), pipeline, storage.clone(), policy));
        let controller = Arc::new(JobController::new(runner, registry.clone(), AudioFormat::Wav));
        let app = build_router(controller, tts, registry.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            client: TestClient::new(&base_url),
            registry,
            storage,
            _root: root,
        })
    }

    /// Submit `text` and return the issued job id
    pub async fn submit(&self, text: &str) -> String {
        let response = self
            .client
            .post("/generate", &serde_json::json!({ "text": text }))
            .await
            .unwrap();
        response.assert_status(hyper::StatusCode::OK);
        response
            .body
            .as_ref()
            .and_then(|b| b.get("job_id"))
            .and_then(|v| v.as_str())
            .expect("Missing job_id in generate response")
            .to_string()
    }

    /// Poll `/status` until the job leaves `processing`, recording every
    /// observed progress value
    pub async fn wait_for_terminal(&self, job_id: &str) -> (Value, Vec<u64>) {
        let mut observed = Vec::new();
        for _ in 0..300 {
            let response = self.client.get(&format!("/status/{}", job_id)).await.unwrap();
            let body = response.body.clone().expect("Missing status body");
            if let Some(progress) = body.get("progress").and_then(|v| v.as_u64()) {
                observed.push(progress);
            }
            if body.get("status").and_then(|v| v.as_str()) != Some("processing") {
                return (body, observed);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {} never reached a terminal state", job_id);
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            TestContext::start(JobIdPolicy::Random)
                .await
                .expect("Failed to start test app")
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Temporary storage is removed when `_root` is dropped
        }
    }
}
