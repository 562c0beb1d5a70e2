//! # `vws` command-line client
//!
//! Thin wrapper over the library for managing cloud targets by hand.
//!
//! ```bash
//! vws --access-key AK --secret-key SK list
//! vws --access-key AK --secret-key SK create --image poster.jpg --name poster --width 0.5
//! vws --access-key CAK --secret-key CSK query --image photo.jpg --max-num-results 5
//! ```
//!
//! The key pair given on the command line is used as the server pair for
//! target management and as the client pair for `query`.

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vuforia_vws::pipeline::RequestPipeline;
use vuforia_vws::response::check_status;
use vuforia_vws::{
    CreateTargetRequest, Endpoint, GenerateInstanceRequest, HmacSigner, IncludeTargetData,
    InstanceFormat, Operation, QueryRequest, ReqwestTransport, ResultEnvelope,
    StaticCredentialsProvider, UpdateTargetRequest, VwsConfig, VwsCredentials,
};

/// Cloud Target Web API client
#[derive(Parser, Debug)]
#[command(name = "vws", author, version, about, long_about = None)]
struct Cli {
    /// The VWS server or client access key
    #[arg(long)]
    access_key: String,

    /// The VWS server or client secret key
    #[arg(long)]
    secret_key: String,

    /// Enable detailed logging. Repeat the option for more verbose logging.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[arg(long, default_value = "production", hide = true)]
    environment: String,

    #[arg(long, hide = true)]
    environments_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get information about a specific target
    Get {
        /// ID of the target
        target_id: String,
    },

    /// Create a Cloud Target
    Create {
        /// Path to the source image in JPG or PNG format
        #[arg(long)]
        image: PathBuf,
        /// Name of the created target
        #[arg(long)]
        name: String,
        /// The width of the target in scene units
        #[arg(long)]
        width: f64,
        /// The base64 encoded application metadata associated with the target
        #[arg(long)]
        metadata_base64: Option<String>,
        /// Whether or not the target is active for query
        #[arg(long, value_parser = parse_bool)]
        active: Option<bool>,
    },

    /// Update a Cloud Target
    Update {
        /// ID of the target
        target_id: String,
        /// Path to the new source image in JPG or PNG format
        #[arg(long)]
        image: Option<PathBuf>,
        /// The updated name of the target
        #[arg(long)]
        name: Option<String>,
        /// The updated width of the target in scene units
        #[arg(long)]
        width: Option<f64>,
        /// The updated base64 encoded application metadata
        #[arg(long)]
        metadata_base64: Option<String>,
        /// Whether or not the updated target is active for query
        #[arg(long, value_parser = parse_bool)]
        active: Option<bool>,
    },

    /// Delete a Cloud Target with all the associated artifacts
    Delete {
        /// ID of the target to delete
        target_id: String,
    },

    /// List all Cloud Reco targets
    List,

    /// Get the target summary report
    GetTargetReport {
        /// ID of the target
        target_id: String,
    },

    /// Get the database summary report
    GetDatabaseReport,

    /// Search the database for duplicate and similar images
    GetDuplicates {
        /// ID of the target
        target_id: String,
    },

    /// Query a Cloud Target database
    Query {
        /// Path to the query image in JPG or PNG format
        #[arg(long)]
        image: PathBuf,
        /// The maximum number of matching targets to be returned
        #[arg(long, default_value_t = 1)]
        max_num_results: u32,
        /// Target data to include: top, none or all
        #[arg(long, default_value = "top")]
        include_target_data: IncludeTargetData,
    },

    /// Generate a single instance of a VuMark
    GenerateInstance {
        /// The ID of the VuMark template target
        #[arg(long)]
        target_id: String,
        /// The ID of the instance to create
        #[arg(long)]
        instance_id: String,
        /// The output format of the instance
        #[arg(long, default_value = "image/svg+xml")]
        format: InstanceFormat,
        /// File to write the rendered instance to
        #[arg(long)]
        output: PathBuf,
    },
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(format!("Boolean value expected. Received: {}", value)),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))
}

fn operation(command: &Command) -> anyhow::Result<Operation> {
    let operation = match command {
        Command::Get { target_id } => Operation::GetTarget {
            target_id: target_id.clone(),
        },
        Command::Create {
            image,
            name,
            width,
            metadata_base64,
            active,
        } => {
            let mut request = CreateTargetRequest::new(name.clone(), read_image(image)?, *width);
            if let Some(metadata) = metadata_base64 {
                request = request.with_metadata(metadata.clone());
            }
            if let Some(active) = active {
                request = request.with_active(*active);
            }
            Operation::CreateTarget(request)
        }
        Command::Update {
            target_id,
            image,
            name,
            width,
            metadata_base64,
            active,
        } => Operation::UpdateTarget {
            target_id: target_id.clone(),
            request: UpdateTargetRequest {
                image: image.as_deref().map(read_image).transpose()?.map(Into::into),
                name: name.clone(),
                width: *width,
                application_metadata: metadata_base64.clone(),
                active_flag: *active,
            },
        },
        Command::Delete { target_id } => Operation::DeleteTarget {
            target_id: target_id.clone(),
        },
        Command::List => Operation::ListTargets,
        Command::GetTargetReport { target_id } => Operation::TargetSummary {
            target_id: target_id.clone(),
        },
        Command::GetDatabaseReport => Operation::DatabaseSummary,
        Command::GetDuplicates { target_id } => Operation::Duplicates {
            target_id: target_id.clone(),
        },
        Command::Query {
            image,
            max_num_results,
            include_target_data,
        } => {
            let mut request = QueryRequest::new(read_image(image)?)
                .with_max_results(*max_num_results)
                .with_include_target_data(*include_target_data);
            if let Some(filename) = image.file_name().and_then(|n| n.to_str()) {
                request = request.with_filename(filename);
            }
            Operation::Query(request)
        }
        Command::GenerateInstance {
            target_id,
            instance_id,
            format,
            ..
        } => Operation::GenerateInstance {
            target_id: target_id.clone(),
            request: GenerateInstanceRequest::new(instance_id.clone()).with_format(*format),
        },
    };
    Ok(operation)
}

/// Pipeline for the endpoint and key role `operation` needs, signed with
/// the single key pair given on the command line.
fn pipeline(
    config: &VwsConfig,
    operation: &Operation,
    credentials: VwsCredentials,
) -> anyhow::Result<RequestPipeline> {
    let base_url = match operation.endpoint() {
        Endpoint::Provisioning => config.provisioning_url.clone(),
        Endpoint::Query => config.query_url.clone(),
    };
    let transport = ReqwestTransport::builder()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .verify_ssl(config.verify_ssl)
        .user_agent(config.user_agent.clone())
        .build()?;
    let signer = HmacSigner::new(
        Arc::new(StaticCredentialsProvider::new(credentials)),
        operation.key_role(),
    );

    Ok(RequestPipeline::new(
        base_url,
        operation.key_role(),
        Arc::new(transport),
        Arc::new(signer),
    ))
}

/// The full response body, `result_code` and unmodelled fields included.
fn render(envelope: &ResultEnvelope) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&envelope.body)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut builder = VwsConfig::builder().environment(cli.environment.clone());
    if let Some(path) = &cli.environments_file {
        builder = builder.environments_file(path.clone());
    }
    let config = builder.build()?;

    let operation = operation(&cli.command)?;
    let credentials = VwsCredentials::new(cli.access_key, cli.secret_key);
    let pipeline = pipeline(&config, &operation, credentials)?;

    if let Command::GenerateInstance { output, .. } = &cli.command {
        let response = pipeline.dispatch(&operation).await?;
        check_status(&response)?;
        std::fs::write(output, &response.body)
            .with_context(|| format!("failed to write {}", output.display()))?;
        eprintln!("Wrote {} bytes to {}", response.body.len(), output.display());
        return Ok(());
    }

    let envelope = pipeline.execute(&operation).await?;
    println!("{}", render(&envelope)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use vuforia_vws::mocks::{MockResponse, MockSigner, MockTransport};
    use vuforia_vws::KeyRole;

    #[test_case("yes", true)]
    #[test_case("TRUE", true)]
    #[test_case("1", true)]
    #[test_case("No", false)]
    #[test_case("false", false)]
    #[test_case("0", false)]
    fn test_parse_bool(input: &str, expected: bool) {
        assert_eq!(parse_bool(input), Ok(expected));
    }

    #[test]
    fn test_parse_bool_rejects_other_values() {
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_cli_parses_create() {
        let cli = Cli::try_parse_from([
            "vws",
            "--access-key",
            "ak",
            "--secret-key",
            "sk",
            "create",
            "--image",
            "poster.jpg",
            "--name",
            "poster",
            "--width",
            "0.5",
            "--active",
            "no",
        ])
        .unwrap();

        assert_eq!(cli.environment, "production");
        match cli.command {
            Command::Create { name, width, active, metadata_base64, .. } => {
                assert_eq!(name, "poster");
                assert_eq!(width, 0.5);
                assert_eq!(active, Some(false));
                assert!(metadata_base64.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_positional_target_id() {
        let cli = Cli::try_parse_from([
            "vws",
            "--access-key",
            "ak",
            "--secret-key",
            "sk",
            "-vv",
            "get-target-report",
            "abc123",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::GetTargetReport { ref target_id } if target_id == "abc123"));
    }

    #[test]
    fn test_cli_query_defaults() {
        let cli = Cli::try_parse_from([
            "vws", "--access-key", "ak", "--secret-key", "sk", "query", "--image", "q.jpg",
        ])
        .unwrap();

        match cli.command {
            Command::Query {
                max_num_results,
                include_target_data,
                ..
            } => {
                assert_eq!(max_num_results, 1);
                assert_eq!(include_target_data, IncludeTargetData::Top);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_update_sends_only_given_fields() {
        let command = Command::Update {
            target_id: "abc".to_string(),
            image: None,
            name: Some("renamed".to_string()),
            width: None,
            metadata_base64: None,
            active: Some(true),
        };

        match operation(&command).unwrap() {
            Operation::UpdateTarget { target_id, request } => {
                assert_eq!(target_id, "abc");
                assert_eq!(request.name.as_deref(), Some("renamed"));
                assert_eq!(request.active_flag, Some(true));
                assert!(request.image.is_none());
                assert!(request.width.is_none());
            }
            other => panic!("unexpected operation: {:?}", other),
        }
    }

    #[test]
    fn test_query_uses_client_key_pair() {
        let config = VwsConfig::default();
        let query = Operation::Query(QueryRequest::new(&b"img"[..]));

        let pipeline = pipeline(&config, &query, VwsCredentials::new("cak", "csk")).unwrap();

        assert_eq!(pipeline.role(), KeyRole::Client);
        assert_eq!(pipeline.base_url().as_str(), "https://cloudreco.vuforia.com/");
    }

    #[tokio::test]
    async fn test_render_prints_whole_envelope() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_response(MockResponse::ok_with_body(
            r#"{"result_code":"Success","transaction_id":"tx-1","results":["a"],"extra":7}"#,
        ));
        let pipeline = RequestPipeline::new(
            VwsConfig::default().provisioning_url,
            KeyRole::Server,
            transport,
            Arc::new(MockSigner::new()),
        );

        let envelope = pipeline.execute(&Operation::ListTargets).await.unwrap();
        let printed: serde_json::Value = serde_json::from_str(&render(&envelope).unwrap()).unwrap();

        assert_eq!(printed["result_code"], "Success");
        assert_eq!(printed["transaction_id"], "tx-1");
        assert_eq!(printed["extra"], 7);
    }
}
