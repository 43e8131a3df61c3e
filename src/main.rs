use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use broker_ai::config::AppConfig;
use broker_ai::error::AppError;
use broker_ai::telemetry;
use broker_ai::workflows::submission::{
    build_risk_profile, directory, submission_router, ContactWindow, InMemorySubmissionStore,
    MappedFormOutput, RiskProfile, RoutingConfig, RoutingEngine, ScoredCandidate, StaticDirectory,
    SubmissionRecord, SubmissionService, TemporalResolver, UnderwriterDirectory, DEFAULT_TOP_N,
};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Broker Routing Orchestrator",
    about = "Run the submission routing and scheduling engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Route a mapped submission and print the recommendation pipeline
    Route(RouteArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Mapped form output (JSON) produced by the upstream form mapper
    #[arg(long)]
    mapped_json: PathBuf,
    /// Optional underwriter panel CSV; the bundled panel is used otherwise
    #[arg(long)]
    directory_csv: Option<PathBuf>,
    /// Number of recommendations to keep
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
    /// Fixed reference instant (YYYY-MM-DDTHH:MM:SS) for reproducible output
    #[arg(long, value_parser = parse_datetime)]
    now: Option<NaiveDateTime>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Route(args) => run_route_demo(args),
    }
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM:SS ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let panel = match &config.directory.panel_csv {
        Some(path) => directory::load_panel_csv(path)?,
        None => StaticDirectory::standard_panel(),
    };

    let service = Arc::new(SubmissionService::new(
        Arc::new(InMemorySubmissionStore::default()),
        Arc::new(panel),
        RoutingConfig::default(),
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/routing/preview",
            axum::routing::post(route_preview_endpoint),
        )
        .with_state(state)
        .merge(submission_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "submission routing orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_route_demo(args: RouteArgs) -> Result<(), AppError> {
    let RouteArgs {
        mapped_json,
        directory_csv,
        top_n,
        now,
    } = args;

    let raw = std::fs::read_to_string(mapped_json)?;
    let mapped: MappedFormOutput = serde_json::from_str(&raw)?;

    let panel = match directory_csv {
        Some(path) => directory::load_panel_csv(path)?,
        None => StaticDirectory::standard_panel(),
    };

    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let record = route_pipeline(mapped, panel, top_n, now)?;
    render_route_report(&record);

    Ok(())
}

/// Drive a single submission through intake, routing, approval, and
/// scheduling with a fixed reference instant.
fn route_pipeline(
    mapped: MappedFormOutput,
    panel: StaticDirectory,
    top_n: usize,
    now: NaiveDateTime,
) -> Result<SubmissionRecord, AppError> {
    let service = SubmissionService::new(
        Arc::new(InMemorySubmissionStore::default()),
        Arc::new(panel),
        RoutingConfig::default(),
    );

    let record = service.intake(mapped, now)?;
    let id = record.submission.id().clone();
    service.route(&id, top_n, now)?;
    service.approve(&id, now)?;
    Ok(service.schedule(&id, now)?)
}

#[derive(Debug, Deserialize)]
struct RoutePreviewRequest {
    mapped: MappedFormOutput,
    #[serde(default)]
    top_n: Option<usize>,
    /// Inline panel CSV export; the bundled panel is used otherwise.
    #[serde(default)]
    panel_csv: Option<String>,
    #[serde(default)]
    now: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
struct RoutePreviewResponse {
    profile: RiskProfile,
    recommendations: Vec<ScoredCandidate>,
    contact_window: ContactWindow,
}

/// Stateless dry run: rank and resolve a contact window without registering a
/// submission.
async fn route_preview_endpoint(
    Json(payload): Json<RoutePreviewRequest>,
) -> Result<Json<RoutePreviewResponse>, AppError> {
    let RoutePreviewRequest {
        mapped,
        top_n,
        panel_csv,
        now,
    } = payload;

    let panel = match panel_csv {
        Some(csv) => directory::read_panel_csv(Cursor::new(csv.into_bytes()))?,
        None => StaticDirectory::standard_panel(),
    };

    let profile = build_risk_profile(&mapped);
    let engine = RoutingEngine::new(RoutingConfig::default());
    let recommendations = engine.rank(
        &profile,
        &panel.list_underwriters(),
        top_n.unwrap_or(DEFAULT_TOP_N),
    );

    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let contact_window = TemporalResolver::new().resolve(now, &mapped.social_context);

    Ok(Json(RoutePreviewResponse {
        profile,
        recommendations,
        contact_window,
    }))
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn render_route_report(record: &SubmissionRecord) {
    let submission = &record.submission;

    println!("Submission routing demo");
    println!(
        "Submission {} ({}), state {}",
        submission.id().as_str(),
        submission.business_name(),
        submission.state().label()
    );

    if let Some(outcome) = submission.routing() {
        let profile = &outcome.profile;
        println!("\nRisk profile");
        println!(
            "- Industry code: {}",
            profile.industry_code.as_deref().unwrap_or("unknown")
        );
        println!(
            "- Region: {}",
            profile
                .region
                .map(|region| region.label())
                .unwrap_or("unknown")
        );
        println!(
            "- Hazards: {}",
            if profile.hazards.is_empty() {
                "none identified".to_string()
            } else {
                profile.hazards.iter().cloned().collect::<Vec<_>>().join(", ")
            }
        );
        println!(
            "- Liquor liability: {}",
            if profile.requires_liquor_liability {
                "yes"
            } else {
                "no"
            }
        );

        if outcome.ranked.is_empty() {
            println!("\nRecommendations: none (empty directory)");
        } else {
            println!("\nRecommendations");
            for (position, candidate) in outcome.ranked.iter().enumerate() {
                println!(
                    "#{} {}: {:.1} points",
                    position + 1,
                    candidate.underwriter.name,
                    candidate.score
                );
                println!("   {}", candidate.summary());
            }
        }
    }

    if let Some(window) = submission.contact_window() {
        println!("\nScheduled contact: {}", window.earliest_contact);
        println!("Reason: {}", window.reason);
    }

    println!("\nState history");
    for entry in submission.history() {
        println!("- {}: {}", entry.state.label(), entry.entered_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broker_ai::workflows::submission::{
        ApplicantSnapshot, ClassificationSnapshot, OperationsSnapshot, PremisesSnapshot,
        SocialContextNotes, SubmissionState,
    };
    use chrono::NaiveDate;

    fn sample_mapped() -> MappedFormOutput {
        MappedFormOutput {
            applicant: Some(ApplicantSnapshot {
                legal_name: Some("Teddy's Tavern LLC".to_string()),
                dba: Some("Teddy's Tavern".to_string()),
            }),
            classification: Some(ClassificationSnapshot {
                industry_code: Some("722410".to_string()),
                description: Some("Neighborhood bar".to_string()),
            }),
            premises: Some(PremisesSnapshot {
                city: Some("Savannah".to_string()),
                state: Some("GA".to_string()),
            }),
            operations: Some(OperationsSnapshot {
                hazards: vec!["cooking equipment".to_string()],
                alcohol_sales_pct: Some(60.0),
                liquor_liability_required: true,
                live_entertainment: true,
            }),
            revenue: None,
            open_task_count: 2,
            social_context: SocialContextNotes {
                availability_notes: Some("Unavailable until Tuesday 1:00 PM".to_string()),
                ..SocialContextNotes::default()
            },
        }
    }

    #[test]
    fn parse_datetime_accepts_iso_like_format() {
        let parsed = parse_datetime("2025-03-03T10:00:00").expect("valid datetime");
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2025, 3, 3)
                .expect("valid date")
                .and_hms_opt(10, 0, 0)
                .expect("valid time")
        );
    }

    #[tokio::test]
    async fn route_preview_endpoint_returns_ranked_candidates() {
        let request = RoutePreviewRequest {
            mapped: sample_mapped(),
            top_n: Some(2),
            panel_csv: None,
            now: Some(
                NaiveDate::from_ymd_opt(2025, 3, 3)
                    .expect("valid date")
                    .and_hms_opt(10, 0, 0)
                    .expect("valid time"),
            ),
        };

        let Json(body) = route_preview_endpoint(Json(request))
            .await
            .expect("preview builds");

        assert_eq!(body.recommendations.len(), 2);
        assert!(body.profile.requires_liquor_liability);
        assert_eq!(
            body.contact_window.earliest_contact,
            NaiveDate::from_ymd_opt(2025, 3, 4)
                .expect("valid date")
                .and_hms_opt(13, 0, 0)
                .expect("valid time")
        );
    }

    #[tokio::test]
    async fn route_preview_endpoint_accepts_inline_panel_csv() {
        let request = RoutePreviewRequest {
            mapped: sample_mapped(),
            top_n: None,
            panel_csv: Some(
                "id,name,email,phone,region,appetite,aversions,specialties,secondary_specialties,avg_turnaround_days,acceptance_rate,open_submissions,notes\nuw-solo,Only Option,solo@uw.com,(555) 555-0199,Southeast,bar,,722410,,2.0,0.8,3,\n".to_string(),
            ),
            now: None,
        };

        let Json(body) = route_preview_endpoint(Json(request))
            .await
            .expect("preview builds");

        assert_eq!(body.recommendations.len(), 1);
        assert_eq!(body.recommendations[0].underwriter.id.as_str(), "uw-solo");
    }

    #[test]
    fn route_pipeline_schedules_around_availability() {
        // Monday morning receipt; the client is out until Tuesday afternoon.
        let now = NaiveDate::from_ymd_opt(2025, 3, 3)
            .expect("valid date")
            .and_hms_opt(10, 0, 0)
            .expect("valid time");

        let record = route_pipeline(
            sample_mapped(),
            StaticDirectory::standard_panel(),
            3,
            now,
        )
        .expect("pipeline completes");

        assert_eq!(record.submission.state(), SubmissionState::Scheduled);
        assert_eq!(
            record.submission.scheduled_contact(),
            NaiveDate::from_ymd_opt(2025, 3, 4)
                .expect("valid date")
                .and_hms_opt(13, 0, 0)
        );

        let outcome = record.submission.routing().expect("routing recorded");
        assert_eq!(outcome.ranked.len(), 3);
        // Hospitality specialists in the Southeast should lead the ranking.
        let leader = &outcome.ranked[0].underwriter;
        assert!(leader.id.as_str() == "uw-obrien" || leader.id.as_str() == "uw-mitchell");
    }
}
