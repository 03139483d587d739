//! Motion CLI - Command-line interface for Motion Insight
//!
//! Commands:
//! - analyze: Run the analysis pipeline over a request file
//! - validate: Check a request without analyzing it
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use motion_insight::types::AnalysisResponse;
use motion_insight::{parse_request, AnalysisConfig, AnalysisService, ComputeError};
use motion_insight::{MOTION_VERSION, PRODUCER_NAME};

/// Motion - Activity analysis for accelerometer data
#[derive(Parser)]
#[command(name = "motion")]
#[command(version = MOTION_VERSION)]
#[command(about = "Analyze accelerometer sessions into metrics and advice", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr, filtered by RUST_LOG)
    #[arg(long, global = true, default_value = "compact")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an accelerometer session
    Analyze {
        /// Input request file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Analysis configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Omit insights regardless of the request
        #[arg(long)]
        no_insights: bool,

        /// Omit recommendations regardless of the request
        #[arg(long)]
        no_recommendations: bool,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Validate an analysis request without running it
    Validate {
        /// Input request file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check an analysis configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Human-readable summary
    Text,
}

#[derive(Clone, ValueEnum)]
enum LogFormat {
    /// Human readable, multi-field
    Pretty,
    /// Human readable, one line per event
    Compact,
    /// Structured JSON lines
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_format);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(format: &LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => {
            registry
                .with(fmt::layer().with_writer(io::stderr).json())
                .init();
        }
        LogFormat::Pretty => {
            registry
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .init();
        }
        LogFormat::Compact => {
            registry
                .with(fmt::layer().with_writer(io::stderr).compact())
                .init();
        }
    }
}

fn run(cli: Cli) -> Result<(), MotionCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            config,
            no_insights,
            no_recommendations,
            output_format,
        } => cmd_analyze(
            &input,
            &output,
            config.as_deref(),
            no_insights,
            no_recommendations,
            output_format,
        ),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    no_insights: bool,
    no_recommendations: bool,
    output_format: OutputFormat,
) -> Result<(), MotionCliError> {
    let input_data = read_input(input)?;

    let mut request = parse_request(&input_data)?;
    if no_insights {
        request.include_insights = false;
    }
    if no_recommendations {
        request.include_recommendations = false;
    }

    let service = match config {
        Some(path) => AnalysisService::with_config(load_config(path)?)?,
        None => AnalysisService::new(),
    };

    info!(
        samples = request.acceleration_data.samples.len(),
        sampling_rate_hz = request.acceleration_data.sampling_rate_hz,
        "analyzing session"
    );
    let response = service.analyze(&request);

    let output_data = format_output(&response, &output_format)?;

    if is_stdio(output) {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
        debug!(path = %output.display(), "wrote analysis");
    }

    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), MotionCliError> {
    let input_data = read_input(input)?;

    let report = match parse_request(&input_data) {
        Ok(request) => ValidationReport {
            valid: true,
            user_id: Some(request.user_id.clone()),
            samples: request.acceleration_data.samples.len(),
            sampling_rate_hz: Some(request.acceleration_data.sampling_rate_hz),
            error: None,
        },
        Err(e) => ValidationReport {
            valid: false,
            user_id: None,
            samples: 0,
            sampling_rate_hz: None,
            error: Some(e.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Valid:         {}", report.valid);
        if let Some(user_id) = &report.user_id {
            println!("User:          {}", user_id);
        }
        println!("Samples:       {}", report.samples);
        if let Some(rate) = report.sampling_rate_hz {
            println!("Sampling rate: {} Hz", rate);
        }
        if let Some(error) = &report.error {
            println!("\nError: {}", error);
        }
    }

    if report.valid {
        Ok(())
    } else {
        Err(MotionCliError::ValidationFailed)
    }
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), MotionCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} version {}", PRODUCER_NAME, MOTION_VERSION),
    });

    match config {
        Some(path) if path.exists() => match load_config(path) {
            Ok(_) => checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!("Configuration file valid: {}", path.display()),
            }),
            Err(e) => checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid configuration: {}", CliError::from(e).message),
            }),
        },
        Some(_) => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Warning,
            message: "Configuration file does not exist".to_string(),
        }),
        None => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "Using built-in defaults".to_string(),
        }),
    }

    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (pass a request file with --input)"
    } else {
        "stdin is a pipe (--input - ready)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: MOTION_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Motion Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(MotionCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn read_input(input: &Path) -> Result<String, MotionCliError> {
    if is_stdio(input) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn load_config(path: &Path) -> Result<AnalysisConfig, MotionCliError> {
    let json = fs::read_to_string(path)?;
    Ok(AnalysisConfig::from_json(&json)?)
}

fn format_output(
    response: &AnalysisResponse,
    format: &OutputFormat,
) -> Result<String, MotionCliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(response)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Text => Ok(format_text(response)),
    }
}

fn format_text(response: &AnalysisResponse) -> String {
    let metrics = &response.metrics;
    let mut lines = vec![
        "Activity Metrics".to_string(),
        "================".to_string(),
        format!("Average intensity:    {:.3}", metrics.avg_intensity),
        format!("Peak intensity:       {:.3}", metrics.peak_intensity),
        format!("Movement consistency: {:.3}", metrics.movement_consistency),
        format!("Active minutes:       {:.2}", metrics.active_minutes),
        format!("Total duration:       {:.2} min", metrics.total_duration),
    ];

    if !response.insights.is_empty() {
        lines.push(String::new());
        lines.push("Insights:".to_string());
        for insight in &response.insights {
            lines.push(format!(
                "  [{}] {}: {}",
                insight.priority.as_str(),
                insight.insight_type.as_str(),
                insight.message
            ));
        }
    }

    if !response.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        for rec in &response.recommendations {
            lines.push(format!(
                "  [{}] {} ({})",
                rec.priority.as_str(),
                rec.title,
                rec.recommendation_type.as_str()
            ));
            lines.push(format!("      {}", rec.message));
        }
    }

    lines.join("\n")
}

// Error types

#[derive(Debug)]
enum MotionCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    ValidationFailed,
    DoctorFailed,
}

impl From<io::Error> for MotionCliError {
    fn from(e: io::Error) -> Self {
        MotionCliError::Io(e)
    }
}

impl From<ComputeError> for MotionCliError {
    fn from(e: ComputeError) -> Self {
        MotionCliError::Compute(e)
    }
}

impl From<serde_json::Error> for MotionCliError {
    fn from(e: serde_json::Error) -> Self {
        MotionCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MotionCliError> for CliError {
    fn from(e: MotionCliError) -> Self {
        match e {
            MotionCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            MotionCliError::Compute(e @ ComputeError::InvalidConfig(_)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'motion doctor --config <file>' for details".to_string()),
            },
            MotionCliError::Compute(e) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'motion validate' for details".to_string()),
            },
            MotionCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            MotionCliError::ValidationFailed => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: "Request failed validation".to_string(),
                hint: Some("Fix the reported error and retry".to_string()),
            },
            MotionCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    valid: bool,
    user_id: Option<String>,
    samples: usize,
    sampling_rate_hz: Option<i64>,
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
