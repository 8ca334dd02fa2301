use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::SubmitError;
use crate::signing::ReportSigner;

/// Astronomer server that collects signed reports.
pub const DEFAULT_ENDPOINT: &str = "https://astronomer.ullaakut.eu";

/// The only status the server answers with when it trusts a report.
pub const SUCCESS_STATUS: StatusCode = StatusCode::CREATED;

/// Keys the envelope adds next to the report's own fields.
pub const ENVELOPE_FIELDS: [&str; 3] = ["RepositoryOwner", "RepositoryName", "Signature"];

/// A report that has been signed by a legitimate build of astronomer.
///
/// The report's own fields are inlined next to the repository identity, so
/// the receiver can rebuild the signed bytes by dropping the three envelope
/// fields.
#[derive(Debug, Serialize)]
pub struct SignedReport<'a, R> {
    #[serde(flatten)]
    pub report: &'a R,
    #[serde(rename = "RepositoryOwner")]
    pub repository_owner: &'a str,
    #[serde(rename = "RepositoryName")]
    pub repository_name: &'a str,
    #[serde(rename = "Signature", serialize_with = "as_base64")]
    pub signature: Vec<u8>,
}

fn as_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// Signs reports and posts them to the astronomer server.
#[derive(Clone)]
pub struct ReportTransmitter {
    client: reqwest::Client,
    endpoint: String,
    signer: ReportSigner,
}

impl ReportTransmitter {
    pub fn new(signer: ReportSigner) -> Result<Self, SubmitError> {
        Self::with_endpoint(signer, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(
        signer: ReportSigner,
        endpoint: impl Into<String>,
    ) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("astronomer-report/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SubmitError::Transport)?;
        Ok(Self { client, endpoint: endpoint.into(), signer })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Signs `report`, wraps it with the context's repository and posts it once.
    ///
    /// Nothing is retried. Any status other than 201 is a rejection.
    pub async fn submit<R: Serialize>(&self, ctx: &Context, report: &R) -> Result<(), SubmitError> {
        let signature = self.signer.sign(report)?;
        let fields = report_fields(report)?;

        let signed = SignedReport {
            report: &fields,
            repository_owner: &ctx.repo_owner,
            repository_name: &ctx.repo_name,
            signature,
        };
        let body = serde_json::to_vec(&signed).map_err(SubmitError::Serialization)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(SubmitError::Transport)?;

        let status = response.status();
        if status != SUCCESS_STATUS {
            warn!(%status, endpoint = %self.endpoint, "report rejected");
            return Err(SubmitError::Rejected { status });
        }

        debug!("Signed report successfully sent to astronomer server, thanks for your contribution!");
        Ok(())
    }
}

/// The report as a JSON object that the envelope can extend without shadowing.
fn report_fields<R: Serialize>(report: &R) -> Result<Map<String, Value>, SubmitError> {
    let fields = match serde_json::to_value(report).map_err(SubmitError::Serialization)? {
        Value::Object(fields) => fields,
        _ => {
            return Err(SubmitError::Serialization(serde_json::Error::custom(
                "trust report must serialize to a JSON object",
            )));
        }
    };

    if let Some(key) = ENVELOPE_FIELDS.iter().find(|key| fields.contains_key(**key)) {
        return Err(SubmitError::Serialization(serde_json::Error::custom(format!(
            "trust report already has envelope field {key}"
        ))));
    }
    Ok(fields)
}
