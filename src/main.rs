use anyhow::{Context, Result};
use clap::Parser;
use epic_postcard::generation::Orchestrator;
use epic_postcard::models::{Config, GenerationRequest, Postcard};
use epic_postcard::{photo, prompts};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "epic-postcard")]
#[command(about = "Generate an epic postcard from a name, a profession and a photo")]
struct CliArgs {
    /// Name shown on the postcard.
    #[arg(long)]
    name: String,

    /// Catalog id (e.g. "Analista de Datos") or free text.
    #[arg(long)]
    profession: String,

    /// PNG or JPEG photo of the person.
    #[arg(long, value_name = "PATH")]
    photo: PathBuf,

    /// Overrides EPIC_PROVIDER.
    #[arg(long, value_name = "ID")]
    provider: Option<String>,

    /// Write the generated image to this file.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epic_postcard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    if let Err(e) = run(args).await {
        error!("Postcard generation failed: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: CliArgs) -> Result<()> {
    prompts::validate_request_fields(&args.name, &args.profession)?;

    let mut config = Config::from_env()?;
    if let Some(provider) = args.provider {
        config.generation.provider_id = Some(provider);
    }

    let photo = photo::load_photo(&args.photo)
        .await
        .with_context(|| format!("Could not use photo {}", args.photo.display()))?;
    info!("Prepared {}x{} photo", photo.width, photo.height);

    let request = GenerationRequest::new(args.name.trim(), args.profession.trim(), photo.bytes);
    let generation = Orchestrator::new(config.mock.clone())
        .generate(&request, &config.generation)
        .await?;

    let postcard = Postcard::new(&request, generation.result);

    if let Some(path) = &args.save {
        save_image(&postcard.image_url, path).await?;
        info!("Saved postcard image to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&postcard)?);
    println!();
    println!(
        "{}",
        prompts::build_share_message(
            &postcard.name,
            &postcard.profession,
            &postcard.description,
            &postcard.image_url,
        )
    );

    Ok(())
}

async fn save_image(image_url: &str, path: &Path) -> Result<()> {
    let bytes = match decode_data_uri(image_url) {
        Some(decoded) => decoded?,
        None => reqwest::get(image_url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec(),
    };
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Could not write {}", path.display()))
}

/// Payload of a base64 `data:` URI, `None` for any other URL.
fn decode_data_uri(uri: &str) -> Option<Result<Vec<u8>>> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = match rest.split_once(',') {
        Some(parts) => parts,
        None => return Some(Err(anyhow::anyhow!("Malformed data URI"))),
    };
    if !meta.ends_with(";base64") {
        return Some(Err(anyhow::anyhow!("Only base64 data URIs are supported")));
    }
    use base64::Engine as _;
    Some(
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .context("Invalid base64 image data"),
    )
}
