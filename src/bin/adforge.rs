use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use adforge::{
    AdRecord, AdStore, Brief, FontBook, GenerateRequest, LocalFsStore, Pipeline, PipelineConfig,
    Platform, PlanOverride, Tone, new_image_id, open_image,
};

#[derive(Parser, Debug)]
#[command(name = "adforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one ad image as a PNG.
    Generate(GenerateArgs),
    /// Print the stored history of an identity as JSON.
    History(HistoryArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Product name.
    #[arg(long)]
    product: String,

    /// Tone: 캐주얼 / 고급 / 감성 (or casual / premium / emotional).
    #[arg(long, default_value = "casual")]
    tone: Tone,

    /// Discount text, e.g. "50% 할인".
    #[arg(long)]
    discount: Option<String>,

    /// Extra background hint; dropped when it asks for text, logos or watermarks.
    #[arg(long)]
    prompt_extra: Option<String>,

    /// Product photo to cut out and place on the background.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Plan override JSON (e.g. produced by a language model).
    #[arg(long = "override")]
    override_path: Option<PathBuf>,

    /// Pipeline config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target platform, overriding the config.
    #[arg(long)]
    platform: Option<Platform>,

    /// Fall back to installed system fonts when the configured files are missing.
    #[arg(long, default_value_t = false)]
    system_fonts: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the plan as JSON.
    #[arg(long)]
    plan_out: Option<PathBuf>,

    /// Store root; with `--user`, the image and a history record are persisted there.
    #[arg(long, requires = "user")]
    store: Option<PathBuf>,

    /// Identity used as the storage namespace.
    #[arg(long, requires = "store")]
    user: Option<String>,
}

#[derive(Parser, Debug)]
struct HistoryArgs {
    /// Store root.
    #[arg(long)]
    store: PathBuf,

    /// Identity whose history to print.
    #[arg(long)]
    user: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::History(args) => cmd_history(args),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(platform) = args.platform {
        config.platform = platform;
    }
    if args.system_fonts {
        config.fonts.system_fallback = true;
    }

    let mut brief = Brief::new(args.product, args.tone);
    brief.discount = args.discount;
    brief.prompt_extra = args.prompt_extra;

    let mut req = GenerateRequest::new(brief.clone());
    if let Some(path) = &args.image {
        req = req.with_main_image(open_image(path)?);
    }
    if let Some(path) = &args.override_path {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read override '{}'", path.display()))?;
        req = req.with_override(PlanOverride::from_json_str(&text)?);
    }

    let fonts = FontBook::load(&config.fonts)?;
    let pipeline = Pipeline::with_fonts(config, fonts)?;
    let generation = pipeline.generate(req)?;

    adforge::save_png(&generation.image, &args.out)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(path) = &args.plan_out {
        std::fs::write(path, generation.plan.to_json_pretty()?)
            .with_context(|| format!("write plan '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    if let (Some(root), Some(user)) = (&args.store, &args.user) {
        let store = LocalFsStore::new(root);
        let image_id = new_image_id(&brief, chrono::Utc::now());
        let image_path = store.save_image(user, &image_id, &generation.image)?;
        let cfg = pipeline.config();
        let record = AdRecord::from_generation(
            user,
            &brief,
            &generation,
            &image_id,
            &image_path,
            cfg.platform.name(),
            cfg.background.backend.name(),
        );
        store.append_history(user, record)?;
        eprintln!("stored {image_id} for {user}");
    }
    Ok(())
}

fn cmd_history(args: HistoryArgs) -> anyhow::Result<()> {
    let store = LocalFsStore::new(&args.store);
    let history = store.load_history(&args.user)?;
    println!("{}", serde_json::to_string_pretty(&history)?);
    Ok(())
}
