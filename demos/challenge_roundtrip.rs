// # Contabo DNS-01 Challenge Round Trip
//
// Presents a challenge TXT record through the Contabo DNS API and then
// cleans it up again, using the same Solver path a webhook server would.
//
// ## Usage
//
// ```bash
// CONTABO_CLIENT_ID=... \
// CONTABO_CLIENT_SECRET=... \
// CONTABO_API_USER=... \
// CONTABO_API_PASSWORD=... \
// ACME_DNS_ZONE=example.com \
// ACME_DNS_PROOF=test-proof-value \
// cargo run -p acme_dns_demo --bin challenge_roundtrip
// ```
//
// ## Environment Variables
//
// Required:
// - `CONTABO_CLIENT_ID`, `CONTABO_CLIENT_SECRET`: OAuth client
// - `CONTABO_API_USER`, `CONTABO_API_PASSWORD`: API user
// - `ACME_DNS_ZONE`: Zone managed in Contabo (e.g., "example.com")
// - `ACME_DNS_PROOF`: TXT value to present
//
// Optional:
// - `ACME_DNS_FQDN`: Record name (default: `_acme-challenge.<zone>.`)
// - `ACME_DNS_MODE`: "present", "cleanup", or "roundtrip" (default: roundtrip)
// - `ACME_DNS_TTL`: Record TTL in seconds (default: 120)
// - `ACME_DNS_TIMEOUT_SECS`: Deadline per call (default: 15)
// - `CONTABO_BASE_URL`, `CONTABO_AUTH_URL`: Endpoint overrides
// - `ACME_DNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use acme_dns_core::{
    ChallengeContext, ChallengeRequest, CredentialSource, MemoryCredentialSource, Solver,
};
use acme_dns_provider_contabo::ContaboFactory;
use anyhow::{Context, Result};
use serde_json::json;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const SECRET_NAMESPACE: &str = "demo";
const SECRET_NAME: &str = "contabo-credentials";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Present,
    CleanUp,
    RoundTrip,
}

struct DemoConfig {
    client_id: String,
    client_secret: String,
    api_user: String,
    api_password: String,
    zone: String,
    fqdn: String,
    proof: String,
    mode: Mode,
    ttl: i64,
    timeout_secs: i64,
    base_url: Option<String>,
    auth_url: Option<String>,
    log_level: Level,
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{} environment variable is required", name))
}

fn parse_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "ACME_DNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}

impl DemoConfig {
    fn from_env() -> Result<Self> {
        let zone = required("ACME_DNS_ZONE")?;
        let fqdn = env::var("ACME_DNS_FQDN")
            .unwrap_or_else(|_| format!("_acme-challenge.{}.", zone.trim_end_matches('.')));

        let mode = match env::var("ACME_DNS_MODE")
            .unwrap_or_else(|_| "roundtrip".to_string())
            .to_lowercase()
            .as_str()
        {
            "present" => Mode::Present,
            "cleanup" => Mode::CleanUp,
            "roundtrip" => Mode::RoundTrip,
            other => anyhow::bail!(
                "ACME_DNS_MODE '{}' is not valid. Valid modes: present, cleanup, roundtrip",
                other
            ),
        };

        let ttl = match env::var("ACME_DNS_TTL") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("ACME_DNS_TTL must be an integer. Got: {}", raw))?,
            Err(_) => 0,
        };
        let timeout_secs = match env::var("ACME_DNS_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().with_context(|| {
                format!("ACME_DNS_TIMEOUT_SECS must be an integer. Got: {}", raw)
            })?,
            Err(_) => 0,
        };

        Ok(Self {
            client_id: required("CONTABO_CLIENT_ID")?,
            client_secret: required("CONTABO_CLIENT_SECRET")?,
            api_user: required("CONTABO_API_USER")?,
            api_password: required("CONTABO_API_PASSWORD")?,
            zone,
            fqdn,
            proof: required("ACME_DNS_PROOF")?,
            mode,
            ttl,
            timeout_secs,
            base_url: env::var("CONTABO_BASE_URL").ok(),
            auth_url: env::var("CONTABO_AUTH_URL").ok(),
            log_level: parse_level(
                &env::var("ACME_DNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            )?,
        })
    }

    fn solver_config(&self) -> serde_json::Value {
        let mut config = json!({
            "credentialsSecretName": SECRET_NAME,
            "ttl": self.ttl,
            "timeoutSeconds": self.timeout_secs,
        });
        if let Some(base_url) = &self.base_url {
            config["baseUrl"] = json!(base_url);
        }
        if let Some(auth_url) = &self.auth_url {
            config["authUrl"] = json!(auth_url);
        }
        config
    }
}

async fn run(config: DemoConfig) -> Result<()> {
    let secrets = MemoryCredentialSource::new();
    secrets
        .insert_credentials(
            SECRET_NAMESPACE,
            SECRET_NAME,
            &config.client_id,
            &config.client_secret,
            &config.api_user,
            &config.api_password,
        )
        .await;
    let secrets: Arc<dyn CredentialSource> = Arc::new(secrets);
    let solver = Solver::new(secrets, Arc::new(ContaboFactory));

    let request = ChallengeRequest {
        challenge: ChallengeContext::new(&config.zone, &config.fqdn, &config.proof),
        resource_namespace: SECRET_NAMESPACE.to_string(),
        config: Some(config.solver_config()),
    };

    tracing::info!("Provider: {}", solver.name());
    tracing::info!("  Zone: {}", config.zone);
    tracing::info!("  Record: {}", config.fqdn);
    tracing::info!("  Mode: {:?}", config.mode);

    if matches!(config.mode, Mode::Present | Mode::RoundTrip) {
        tracing::info!("--- Step 1: Present ---");
        solver
            .present(&request)
            .await
            .context("Present failed")?;
        tracing::info!("Challenge record created");
    }

    if matches!(config.mode, Mode::CleanUp | Mode::RoundTrip) {
        tracing::info!("--- Step 2: CleanUp ---");
        let deleted = solver
            .clean_up(&request)
            .await
            .context("CleanUp failed")?;
        tracing::info!("Deleted {} challenge record(s)", deleted);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExitCode::from(2);
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
