use super::mock_provider::RecordingProvider;
use knowledge_hub::providers::{AiProvider, CompletionProvider, ModelIdentifier};
use knowledge_hub::{AnswerCatalog, AppState, CompletionGateway, build_router};
use reqwest::{Client, redirect::Policy};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Model name the test gateway is configured with
pub const TEST_MODEL: &str = "test-model";

/// Build a gateway around a recording provider with the default test settings
pub fn test_gateway(provider: Arc<RecordingProvider>) -> CompletionGateway {
    CompletionGateway::new(
        provider as Arc<dyn CompletionProvider>,
        ModelIdentifier {
            provider: AiProvider::OpenAi,
            model: TEST_MODEL.to_string(),
        },
        500,
        Duration::from_secs(5),
    )
    .expect("Failed to build test gateway")
}

/// HTTP test application wrapper
///
/// Runs the full router on a random port, backed by the embedded catalog and a
/// recording provider instead of a real completion service.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client for making requests
    pub client: Client,
    /// Provider double shared with the running server
    pub provider: Arc<RecordingProvider>,
    /// State the server runs with
    pub state: AppState,
}

impl TestApp {
    /// Create a test app whose provider always answers "ANSWER"
    pub async fn new() -> Self {
        Self::with_provider(RecordingProvider::replying("ANSWER")).await
    }

    /// Create a test app around the given provider double
    ///
    /// # How it works:
    /// 1. Builds AppState from the embedded catalog and the provider double
    /// 2. Binds to port 0 (OS assigns random available port)
    /// 3. Starts server in background task
    /// 4. Creates reqwest client configured for testing
    pub async fn with_provider(provider: RecordingProvider) -> Self {
        let provider = Arc::new(provider);
        let catalog = AnswerCatalog::embedded().expect("Embedded catalog must be valid");
        let state = AppState::new(catalog, test_gateway(Arc::clone(&provider)));

        let app = build_router(state.clone());

        // Bind to random port (port 0 tells OS to assign available port)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        // Start server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            address,
            client,
            provider,
            state,
        }
    }

    /// Get the full URL for an API endpoint
    ///
    /// # Example
    /// ```rust
    /// let url = app.url("/api/v1/health");
    /// // Returns: "http://127.0.0.1:54321/api/v1/health"
    /// ```
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
