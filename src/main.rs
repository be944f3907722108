use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dermadetect::{
    AnalysisScreen, Channel, DermaClient, DermaSettings, DirectorySink, FieldUpdate, FormField,
    HistoryBrowser, ImageFile, LesionLocalization, PatientId, ReportSink, Sex, StatusMessage,
    SubmissionOrchestrator, download_images, format_probability, get_config, load_gallery,
};

/// Skin-lesion analysis client for the DermaDetect backend.
///
/// The backend is configured with `DERMADETECT_`-prefixed environment variables.
#[derive(Parser, Debug)]
#[command(name = "dermadetect", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a lesion image for prediction and download the generated report
    Submit(SubmitArgs),
    /// List past predictions
    History {
        /// Only show patients whose identification number contains this
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Download the most recent report of a patient
    Report { patient_id: String },
    /// Show the reference gallery
    Gallery {
        /// Also download every image into this directory
        #[arg(long)]
        download: Option<Utf8PathBuf>,
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
}

#[derive(clap::Args, Debug)]
struct SubmitArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    identification: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    sex: Sex,
    #[arg(long)]
    localization: LesionLocalization,
    #[arg(long, default_value = "")]
    observacion: String,
    /// Dermatoscopic image (PNG or JPEG)
    #[arg(long)]
    image: Utf8PathBuf,
    /// Preview zoom percentage (50-200)
    #[arg(long, default_value_t = 100)]
    zoom: u16,
    /// Preview brightness percentage (50-150)
    #[arg(long, default_value_t = 100)]
    brightness: u16,
    /// Preview contrast percentage (50-150)
    #[arg(long, default_value_t = 100)]
    contrast: u16,
    /// Save the adjusted preview as PNG
    #[arg(long)]
    preview_out: Option<Utf8PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(std::io::stderr)
            .finish(),
    )
    .unwrap_or_else(|e| eprintln!("Could not set up global logger: {e}"));

    let args = Args::parse();
    let settings: DermaSettings = get_config()
        .extract()
        .context("Invalid DERMADETECT_ configuration")?;
    let client = DermaClient::from_settings(&settings)?;

    match args.command {
        Command::Submit(submit_args) => submit(client, &settings, submit_args).await,
        Command::History { search } => history(client, &search).await,
        Command::Report { patient_id } => {
            let browser = HistoryBrowser::new(client);
            let report = browser
                .download_latest_report(&PatientId::new(patient_id))
                .await?;
            let mut sink = DirectorySink::new(&settings.output_dir);
            sink.deliver(report).await?;
            for path in sink.saved() {
                println!("{path}");
            }
            Ok(())
        }
        Command::Gallery {
            download,
            concurrency,
        } => gallery(client, download, concurrency).await,
    }
}

async fn submit(
    client: DermaClient,
    settings: &DermaSettings,
    args: SubmitArgs,
) -> anyhow::Result<()> {
    let mut screen = AnalysisScreen::default();
    let fields = [
        (FormField::Name, args.name.as_str()),
        (FormField::Identification, args.identification.as_str()),
        (FormField::Age, args.age.as_str()),
        (FormField::Sex, args.sex.as_str()),
        (FormField::Localization, args.localization.as_str()),
        (FormField::Observacion, args.observacion.as_str()),
    ];
    for (field, value) in fields {
        if screen.update_field(field, value) == FieldUpdate::Rejected {
            tracing::warn!(field = field.as_str(), value, "value rejected");
        }
    }

    let bytes = fs_err::tokio::read(&args.image).await?;
    let filename = args.image.file_name().unwrap_or("image").to_string();
    if let Err(e) = screen.select_image(ImageFile::new(filename, bytes)).await {
        tracing::warn!(error = %e, "could not decode image for preview");
    }
    screen.set_adjustment(Channel::Zoom, args.zoom);
    screen.set_adjustment(Channel::Brightness, args.brightness);
    screen.set_adjustment(Channel::Contrast, args.contrast);
    if let Some(dst) = args.preview_out {
        match screen.preview().encode_png()? {
            Some(png) => fs_err::tokio::write(&dst, png).await?,
            None => tracing::warn!("no preview to save"),
        }
    }

    let orchestrator = SubmissionOrchestrator::new(client);
    let mut sink = DirectorySink::new(&settings.output_dir);
    screen.submit(&orchestrator, &mut sink).await;
    match screen.status() {
        Some(StatusMessage::Success(message)) => {
            println!("{message}");
            for path in sink.saved() {
                println!("{path}");
            }
            Ok(())
        }
        Some(StatusMessage::Error(message)) => bail!("{message}"),
        None => Ok(()),
    }
}

async fn history(client: DermaClient, search: &str) -> anyhow::Result<()> {
    let mut browser = HistoryBrowser::new(client);
    browser.load().await?;
    for record in browser.filter(search) {
        let id = record
            .paciente
            .numero_identificacion
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let probability = record
            .predicted_class
            .as_ref()
            .and_then(|class| record.probabilities.get(class))
            .map(|p| format_probability(*p))
            .unwrap_or_default();
        println!(
            "{id}\t{}\t{}\t{}\t{probability}",
            record.paciente.nombre.as_deref().unwrap_or(""),
            record.diagnostico.fecha_diagnostico.as_deref().unwrap_or(""),
            record.predicted_class.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

async fn gallery(
    client: DermaClient,
    download: Option<Utf8PathBuf>,
    concurrency: usize,
) -> anyhow::Result<()> {
    let gallery = load_gallery(&client).await?;
    println!("{}", gallery.description);
    for entry in &gallery.entries {
        println!("{}\t{}\t{}", entry.id, entry.title, entry.url);
    }
    if let Some(dir) = download {
        let names: Vec<String> = gallery.entries.into_iter().map(|e| e.id).collect();
        fs_err::tokio::create_dir_all(&dir).await?;
        for (name, bytes) in download_images(&client, &names, concurrency).await? {
            let Some(basename) = camino::Utf8Path::new(&name).file_name() else {
                continue;
            };
            fs_err::tokio::write(dir.join(basename), bytes).await?;
        }
    }
    Ok(())
}
