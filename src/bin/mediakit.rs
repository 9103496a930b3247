use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediakit::config::{
    CardsConfig, PdfConfig, SplitConfig, StillsConfig, StoryboardConfig, load_config,
    timeout_from_ms,
};

#[derive(Parser, Debug)]
#[command(name = "mediakit", version, about = "Batch media composition and export")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cut images into grid tiles (`split_images.zip`).
    Split(ToolArgs),
    /// Tile images and video posters into one storyboard JPEG.
    Storyboard(ToolArgs),
    /// Compose captioned logo cards (`logos.zip`).
    Cards(CardArgs),
    /// Sample roughly one still per second from videos (`video_stills.zip`).
    Stills(ToolArgs),
    /// Render PDF pages to PNG (`<document>_images.zip`).
    Pdf(ToolArgs),
    /// Rename files with a rule set (`renamed_files.zip`).
    Rename(ToolArgs),
    /// Print ad and story markup for hosted files.
    Adlinks(AdLinkArgs),
}

#[derive(Parser, Debug)]
struct ToolArgs {
    /// Tool configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the output is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Input files; the MIME type is guessed from the extension.
    inputs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct CardArgs {
    #[command(flatten)]
    tool: ToolArgs,

    /// Regular caption font (overrides the config).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold caption font (overrides the config).
    #[arg(long)]
    bold_font: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ServerChoice {
    Aldi,
    S3,
}

#[derive(Parser, Debug)]
struct AdLinkArgs {
    /// Request JSON (`server`, `folder`, `filenames`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hosting server (overrides the config).
    #[arg(long, value_enum)]
    server: Option<ServerChoice>,

    /// Folder below the server root (overrides the config).
    #[arg(long)]
    folder: Option<String>,

    /// File names appended to the configured ones.
    filenames: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Split(args) => cmd_split(args),
        Command::Storyboard(args) => cmd_storyboard(args),
        Command::Cards(args) => cmd_cards(args),
        Command::Stills(args) => cmd_stills(args),
        Command::Pdf(args) => cmd_pdf(args),
        Command::Rename(args) => cmd_rename(args),
        Command::Adlinks(args) => cmd_adlinks(args),
    }
}

fn read_inputs(paths: &[PathBuf]) -> anyhow::Result<Vec<mediakit::AssetInput>> {
    if paths.is_empty() {
        anyhow::bail!("no input files given");
    }
    paths
        .iter()
        .map(|p| mediakit::AssetInput::from_path(p).map_err(anyhow::Error::from))
        .collect()
}

fn write_output(out_dir: &Path, output: &mediakit::ExportOutput) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;
    let path = out_dir.join(output.file_name());
    std::fs::write(&path, output.bytes()).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(path)
}

fn write_archive(
    out_dir: &Path,
    archive: &str,
    entries: Vec<mediakit::ExportEntry>,
) -> anyhow::Result<()> {
    match mediakit::ExportPackager::new(archive).package(entries)? {
        Some(output) => {
            write_output(out_dir, &output)?;
        }
        None => eprintln!("nothing to export"),
    }
    Ok(())
}

fn report(summary: mediakit::BatchSummary) -> anyhow::Result<()> {
    eprintln!(
        "processed {}, failed {}, skipped {}",
        summary.processed, summary.failed, summary.skipped
    );
    if summary.processed == 0 && summary.failed > 0 {
        anyhow::bail!("every input failed");
    }
    Ok(())
}

fn cmd_split(args: ToolArgs) -> anyhow::Result<()> {
    let cfg: SplitConfig = load_config(args.config.as_deref())?;
    let mut splitter = mediakit::Splitter::new(cfg.grid, cfg.threading)?;
    splitter.add(read_inputs(&args.inputs)?);
    report(splitter.process()?)?;
    write_archive(&args.out_dir, mediakit::SPLIT_ARCHIVE, splitter.export_entries())
}

fn cmd_storyboard(args: ToolArgs) -> anyhow::Result<()> {
    let cfg: StoryboardConfig = load_config(args.config.as_deref())?;
    let sample = mediakit::SampleOpts {
        op_timeout: timeout_from_ms(cfg.op_timeout_ms),
        ..mediakit::SampleOpts::default()
    };
    let opener = mediakit::FfmpegOpener {
        op_timeout: sample.op_timeout,
    };
    let mut ws = mediakit::StoryboardWorkspace::new().with_video(Arc::new(opener), sample);
    ws.rename_active(&cfg.name)?;
    ws.set_settings(cfg.board)?;
    report(ws.add(read_inputs(&args.inputs)?))?;

    let Some(entry) = ws.save_current()? else {
        eprintln!("nothing to export");
        return Ok(());
    };
    if let Some((w, h)) = ws.active().last_size() {
        eprintln!("storyboard {w}x{h}");
    }
    write_output(&args.out_dir, &mediakit::ExportPackager::single(entry)?)?;
    Ok(())
}

fn cmd_cards(args: CardArgs) -> anyhow::Result<()> {
    let cfg: CardsConfig = load_config(args.tool.config.as_deref())?;
    let regular = args.font.or(cfg.font);
    let bold = args.bold_font.or(cfg.bold_font);
    let fonts = match regular {
        Some(r) => Some(mediakit::FontSet::from_paths(&r, bold.as_deref())?),
        None => None,
    };

    let mut deck = mediakit::CardDeck::new(cfg.deck, fonts)?;
    report(deck.add(read_inputs(&args.tool.inputs)?))?;

    let ids: Vec<u64> = deck.cards().iter().map(|c| c.id).collect();
    for (id, o) in ids.iter().zip(&cfg.cards) {
        deck.set_card(*id, o.to_card(cfg.deck.global_image_offset_percent))?;
        if !o.text.is_empty() {
            deck.set_text(*id, &o.text)?;
        }
        if let Some(name) = &o.filename {
            deck.set_filename(*id, name)?;
        }
    }

    if let [id] = ids.as_slice() {
        let entry = deck.download(*id)?;
        write_output(&args.tool.out_dir, &mediakit::ExportPackager::single(entry)?)?;
        return Ok(());
    }
    write_archive(&args.tool.out_dir, mediakit::CARD_ARCHIVE, deck.export_all())
}

fn cmd_stills(args: ToolArgs) -> anyhow::Result<()> {
    let cfg: StillsConfig = load_config(args.config.as_deref())?;
    let op_timeout = timeout_from_ms(cfg.op_timeout_ms);
    let sample = mediakit::SampleOpts {
        op_timeout,
        ..mediakit::SampleOpts::default()
    };
    let mut stills = mediakit::VideoStills::new(
        Arc::new(mediakit::FfmpegOpener { op_timeout }),
        sample,
        cfg.threading,
    );
    stills.add(read_inputs(&args.inputs)?);
    report(stills.process()?)?;
    write_archive(&args.out_dir, mediakit::STILLS_ARCHIVE, stills.export_entries())
}

fn cmd_pdf(args: ToolArgs) -> anyhow::Result<()> {
    let cfg: PdfConfig = load_config(args.config.as_deref())?;
    let op_timeout = timeout_from_ms(cfg.op_timeout_ms);
    let sample = mediakit::SampleOpts {
        op_timeout,
        ..mediakit::SampleOpts::default()
    };
    let mut docs =
        mediakit::PdfDocuments::new(Arc::new(mediakit::PdftoppmOpener { op_timeout }), sample)
            .with_scale(cfg.scale)?;
    let batch = docs.add(read_inputs(&args.inputs)?);

    for doc in docs.documents() {
        write_archive(&args.out_dir, &doc.archive_name(), docs.export_entries(doc.id)?)?;
    }
    match batch.error {
        Some(e) => Err(anyhow::Error::from(e).context("PDF batch stopped")),
        None => Ok(()),
    }
}

fn cmd_rename(args: ToolArgs) -> anyhow::Result<()> {
    let rules: mediakit::RenameRules = load_config(args.config.as_deref())?;
    let mut batch = mediakit::RenameBatch::new();
    batch.set_rules(rules)?;
    batch.add(read_inputs(&args.inputs)?);
    for item in batch.items() {
        eprintln!("{}{} -> {}", item.original_base, item.extension, item.new_name);
    }
    write_archive(&args.out_dir, mediakit::RENAME_ARCHIVE, batch.export_entries())
}

fn cmd_adlinks(args: AdLinkArgs) -> anyhow::Result<()> {
    let mut req: mediakit::adlinks::AdLinkRequest = load_config(args.config.as_deref())?;
    if let Some(server) = args.server {
        req.server = match server {
            ServerChoice::Aldi => mediakit::adlinks::AdServer::Aldi,
            ServerChoice::S3 => mediakit::adlinks::AdServer::S3,
        };
    }
    if let Some(folder) = args.folder {
        req.folder = folder;
    }
    req.filenames.extend(args.filenames);

    let links = mediakit::adlinks::generate(&req);
    println!("{}", links.ads);
    println!();
    println!("{}", links.story);
    Ok(())
}
