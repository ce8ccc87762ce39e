//! eg-keytool: Envelope Guard key tool
//!
//! Generates Ed25519 keypairs, signs call envelopes and checks envelope
//! signatures offline. `check` never touches replay state; it only answers
//! whether the signature matches the fields.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use eg_envelope_auth::{
    create_nonce, sign_envelope, verify_base58, CanonicalFields, EnvelopeRequest,
    EnvelopeSerializer, GenericSerializer, SerializationTarget, SystemTimeSource,
};
use eg_telemetry::{init_logging, TelemetryConfig};
use shared_crypto::Ed25519KeyPair;
use shared_types::Envelope;

/// eg-keytool: sign and check call envelopes
#[derive(Parser, Debug)]
#[command(name = "eg-keytool")]
#[command(about = "Key generation, envelope signing and offline signature checks")]
struct Args {
    /// Log level filter (overrides EG_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a keypair and print it as JSON
    Keygen,

    /// Sign an envelope for one call
    Sign(SignArgs),

    /// Check an envelope's signature against a payload
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct SignArgs {
    /// Base58 private key (32-byte seed or 64-byte keypair form)
    #[arg(long)]
    private_key: String,

    /// Call payload, exactly as it will be sent
    #[arg(long)]
    payload: String,

    #[arg(long)]
    channel: String,

    #[arg(long)]
    chaincode: String,

    #[arg(long)]
    method: String,

    /// Nonce (default: current Unix time in seconds)
    #[arg(long)]
    nonce: Option<String>,

    /// Expiry as RFC 3339, e.g. 2030-01-01T00:00:00Z
    #[arg(long)]
    deadline: Option<String>,

    /// Output format: json, or binary printed as hex
    #[arg(long, default_value = "json")]
    format: SerializationTarget,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Envelope JSON
    #[arg(long)]
    envelope: String,

    /// Call payload the envelope was signed for
    #[arg(long)]
    payload: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &args.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    init_logging(&telemetry).context("Failed to initialize logging")?;

    let output = match args.command {
        Command::Keygen => keygen()?,
        Command::Sign(sign) => sign_call(&sign)?,
        Command::Check(check) => check_envelope(&check)?,
    };
    println!("{output}");
    Ok(())
}

fn keygen() -> Result<String> {
    let keypair = Ed25519KeyPair::generate();
    info!(public_key = %keypair.public_key().to_base58(), "Generated keypair");

    let json = serde_json::json!({
        "publicKey": keypair.public_key().to_base58(),
        "privateKey": keypair.to_base58().as_str(),
    });
    Ok(serde_json::to_string_pretty(&json)?)
}

fn sign_call(args: &SignArgs) -> Result<String> {
    let keypair =
        Ed25519KeyPair::from_base58(&args.private_key).context("Invalid private key")?;

    let nonce = match &args.nonce {
        Some(nonce) => nonce.clone(),
        None => create_nonce(&SystemTimeSource),
    };
    let mut request = EnvelopeRequest::new(
        args.channel.as_str(),
        args.chaincode.as_str(),
        args.method.as_str(),
        args.payload.as_bytes(),
    )
    .with_nonce(nonce);
    if let Some(deadline) = &args.deadline {
        request = request.with_deadline(parse_deadline(deadline)?);
    }

    let envelope = sign_envelope(&request, &keypair);
    debug!(
        method = envelope.method.as_str(),
        nonce = envelope.nonce.as_str(),
        "Signed envelope"
    );

    let serializer = GenericSerializer::new(args.format);
    let bytes = serializer
        .to_bytes(&envelope)
        .context("Failed to encode envelope")?;
    Ok(match args.format {
        SerializationTarget::Json => String::from_utf8(bytes)?,
        SerializationTarget::Binary => hex::encode(bytes),
    })
}

fn check_envelope(args: &CheckArgs) -> Result<String> {
    let envelope: Envelope = GenericSerializer::json()
        .from_bytes(args.envelope.as_bytes())
        .context("Envelope is not valid JSON")?;

    let fields = CanonicalFields::from_envelope(&envelope, args.payload.as_bytes());
    if let Err(e) = verify_base58(&fields, &envelope.public_key, &envelope.signature) {
        bail!("Signature check failed: {e}");
    }
    Ok(format!("valid signature from {}", envelope.public_key))
}

fn parse_deadline(text: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("Deadline {text:?} is not RFC 3339"))?;
    Ok(parsed.with_timezone(&Utc))
}
