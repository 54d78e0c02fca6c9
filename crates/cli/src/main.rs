mod render;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitals_core::config::{api_base_url_from_env_value, request_timeout_from_env_value};
use vitals_core::{
    triage, CoreConfig, Disposition, MonitorError, MonitorResult, MonitoringService,
    PatientDetailScreen, PatientId, PatientListScreen, TrendProjection,
};
use vitals_http::HttpPatientStore;

#[derive(Parser)]
#[command(name = "vitals")]
#[command(about = "Patient vital-sign monitoring client")]
struct Cli {
    /// Backend base URL (overrides VITALS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List patients, one page at a time
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show a patient's readings and latest risk assessment
    Show { patient_id: PatientId },
    /// Register a new patient
    AddPatient {
        name: String,
        age: String,
        /// Medical record number
        mrn: String,
    },
    /// Log a set of vital signs for a patient
    LogVitals {
        patient_id: PatientId,
        /// Blood pressure as systolic/diastolic, e.g. 120/80
        #[arg(long)]
        bp: String,
        /// Heart rate (bpm)
        #[arg(long)]
        hr: String,
        /// Temperature (°F)
        #[arg(long)]
        temp: String,
        /// Oxygen saturation (%)
        #[arg(long)]
        spo2: String,
    },
    /// Request a risk assessment from the patient's readings
    Predict { patient_id: PatientId },
    /// Show the trend series for a patient's readings
    Trend { patient_id: PatientId },
    /// Rank all patients by urgency
    Triage,
}

type Service = MonitoringService<HttpPatientStore>;

/// Resolves the backend configuration. A command-line URL wins over the environment value.
fn resolve_config(
    cli_url: Option<String>,
    env_url: Option<String>,
    env_timeout: Option<String>,
) -> MonitorResult<CoreConfig> {
    let api_base_url = api_base_url_from_env_value(cli_url.or(env_url))?;
    let request_timeout = request_timeout_from_env_value(env_timeout)?;
    CoreConfig::new(api_base_url, request_timeout)
}

fn exit_code(disposition: Disposition) -> ExitCode {
    match disposition {
        Disposition::Reprompt => ExitCode::from(2),
        Disposition::ExitView => ExitCode::from(3),
        Disposition::Retry => ExitCode::from(4),
    }
}

/// Prints a failed action the way each screen would surface it.
fn report(err: &MonitorError) -> ExitCode {
    let disposition = err.disposition();
    match disposition {
        Disposition::Reprompt => eprintln!("Error: {err}"),
        Disposition::ExitView => eprintln!("Error: {err}. Returning to the patient list."),
        Disposition::Retry => eprintln!("Error: {err}. Please try again."),
    }
    exit_code(disposition)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vitals=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'vitals --help' for commands");
        return Ok(ExitCode::SUCCESS);
    };

    let store = match resolve_config(
        cli.api_url,
        std::env::var("VITALS_API_URL").ok(),
        std::env::var("VITALS_TIMEOUT_SECS").ok(),
    )
    .and_then(|cfg| HttpPatientStore::new(&cfg))
    {
        Ok(store) => store,
        Err(err) => return Ok(report(&err)),
    };
    tracing::debug!(base_url = store.base_url(), "using backend");
    let service = MonitoringService::new(Arc::new(store));

    match run(command, service).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => Ok(report(&err)),
    }
}

async fn run(command: Commands, service: Service) -> MonitorResult<()> {
    match command {
        Commands::List { page } => list(service, page).await,
        Commands::Show { patient_id } => {
            let mut screen = PatientDetailScreen::new(service, patient_id);
            let view = screen.open().await?;
            print_lines(render::monitoring_view(view));
            Ok(())
        }
        Commands::AddPatient { name, age, mrn } => {
            let mut screen = PatientListScreen::new(service);
            let created = screen.add_patient(&name, &age, &mrn).await?;
            println!("Added patient: {}", render::patient_row(&created));
            if let Some(summary) = screen.summary() {
                println!("{summary}");
            }
            Ok(())
        }
        Commands::LogVitals {
            patient_id,
            bp,
            hr,
            temp,
            spo2,
        } => {
            let mut screen = PatientDetailScreen::new(service, patient_id);
            let view = screen.log_vitals(&bp, &hr, &temp, &spo2).await?;
            if let Some(latest) = view.latest_reading() {
                println!("Logged: {}", render::reading_line(latest));
            }
            if let Some(warning) = screen.reading_warning() {
                println!("{}", render::auditor_warning(warning));
            }
            Ok(())
        }
        Commands::Predict { patient_id } => {
            let mut screen = PatientDetailScreen::new(service, patient_id);
            screen.open().await?;
            let view = screen.request_prediction().await?;
            print_lines(render::monitoring_view(view));
            Ok(())
        }
        Commands::Trend { patient_id } => {
            let mut screen = PatientDetailScreen::new(service, patient_id);
            screen.open().await?;
            match screen.trend(&chrono::Local) {
                TrendProjection::NoData => println!("No readings to chart yet"),
                TrendProjection::Series(series) => print_lines(render::trend_series(&series)),
            }
            Ok(())
        }
        Commands::Triage => triage_all(service).await,
    }
}

async fn list(service: Service, page: u32) -> MonitorResult<()> {
    let mut screen = PatientListScreen::new(service);
    let loaded = screen.load(page).await?;

    if loaded.items.is_empty() {
        println!("No patients found.");
    } else {
        for patient in &loaded.items {
            println!("{}", render::patient_row(patient));
        }
    }

    if let (Some(summary), Some(window)) = (screen.summary(), screen.window()) {
        println!("{summary}");
        println!("{}", window.label());
        if let Some(prev) = window.previous() {
            println!("Previous: vitals list --page {prev}");
        }
        if let Some(next) = window.next() {
            println!("Next: vitals list --page {next}");
        }
    }
    Ok(())
}

/// Walks every page of the patient list, loads each patient's view and ranks them.
async fn triage_all(service: Service) -> MonitorResult<()> {
    let mut screen = PatientListScreen::new(service.clone());
    let mut ids: Vec<PatientId> = Vec::new();

    screen.load(1).await?;
    loop {
        if let Some(loaded) = screen.page() {
            ids.extend(loaded.items.iter().map(|p| p.id.clone()));
        }
        if screen.next().await?.is_none() {
            break;
        }
    }

    let mut views = Vec::with_capacity(ids.len());
    for id in &ids {
        match service.load_view(id).await {
            Ok(view) => views.push(view),
            // Removed between listing and loading.
            Err(MonitorError::NotFound(missing)) => {
                tracing::warn!(patient_id = %missing, "skipping patient during triage");
            }
            Err(err) => return Err(err),
        }
    }

    let ranked = triage::rank(&views);
    if ranked.is_empty() {
        println!("No patients found.");
    }
    for (i, score) in ranked.iter().enumerate() {
        println!("{}", render::triage_row(i + 1, score));
    }
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vitals_core::constants::DEFAULT_API_BASE_URL;

    #[test]
    fn test_cli_url_overrides_environment() {
        let cfg = resolve_config(
            Some("http://cli:9000/api/v1/".into()),
            Some("http://env:8000/api/v1".into()),
            None,
        )
        .unwrap();
        assert_eq!(cfg.api_base_url(), "http://cli:9000/api/v1");
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let cfg = resolve_config(None, None, None).unwrap();
        assert_eq!(cfg.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_bad_config_is_reported_for_correction() {
        let err = resolve_config(None, Some("ftp://nope".into()), None).unwrap_err();
        assert_eq!(err.disposition(), Disposition::Reprompt);
        let err = resolve_config(None, None, Some("0".into())).unwrap_err();
        assert!(matches!(err, MonitorError::InvalidConfig(_)));
    }

    #[test]
    fn test_cli_parses_log_vitals() {
        let cli = Cli::try_parse_from([
            "vitals", "log-vitals", "7", "--bp", "120/80", "--hr", "72", "--temp", "98.6",
            "--spo2", "98",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::LogVitals { ref patient_id, ref bp, .. })
                if patient_id.as_str() == "7" && bp == "120/80"
        ));
    }

    #[test]
    fn test_blank_patient_id_is_rejected_at_parse() {
        assert!(Cli::try_parse_from(["vitals", "show", ""]).is_err());
        assert!(Cli::try_parse_from(["vitals", "trend", "   "]).is_err());

        let cli = Cli::try_parse_from(["vitals", "predict", " 12 "]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Predict { ref patient_id }) if patient_id.as_str() == "12"
        ));
    }
}
