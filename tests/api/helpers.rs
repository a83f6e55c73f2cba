use chrono::NaiveDate;

use url::Url;

use wiremock::MockServer;

use contact_form::client::RelayClient;
use contact_form::form::{Field, FormController, FormVariant, SubmissionStatus};

pub const SERVICE_ID: &str = "service_test";
pub const TEMPLATE_ID: &str = "template_test";
pub const PUBLIC_KEY: &str = "TestPublicKey";

pub struct TestForm {
    pub controller: FormController,
    pub relay: RelayClient,
    pub relay_server: MockServer,
}

impl TestForm {
    pub async fn spawn(variant: FormVariant) -> Self {
        let relay_server = MockServer::start().await;
        let relay = relay_client(&relay_server.uri());

        Self {
            controller: FormController::new(variant),
            relay,
            relay_server,
        }
    }

    pub fn fill(&mut self, values: &[(Field, &str)]) {
        for (field, value) in values {
            self.controller.edit(*field, *value);
        }
    }

    pub async fn submit(&mut self) -> SubmissionStatus {
        self.controller.submit(&self.relay, today()).await.clone()
    }

    /// Bodies of every request the mock relay received
    pub async fn relay_requests(&self) -> Vec<serde_json::Value> {
        self.relay_server
            .received_requests()
            .await
            .expect("Request recording is disabled")
            .iter()
            .map(|req| serde_json::from_slice(&req.body).expect("Request body is not JSON"))
            .collect()
    }
}

pub fn relay_client(server_uri: &str) -> RelayClient {
    let api_base_url = Url::parse(server_uri).expect("Failed to parse mock server uri");

    let mut client = RelayClient::new(api_base_url, SERVICE_ID, TEMPLATE_ID, None)
        .expect("Failed to create relay client");
    client.init(PUBLIC_KEY.parse().expect("Failed to parse public key"));
    client
}

/// Fixed date every submission in these tests is validated against
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("Invalid test date")
}
