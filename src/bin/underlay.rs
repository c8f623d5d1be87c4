use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "underlay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene description to a PNG.
    Render(RenderArgs),
    /// List font families the renderer can resolve.
    Fonts(FontArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene description JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render a preview whose longer edge is at most this many pixels instead of the native size.
    #[arg(long)]
    preview: Option<u32>,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Args, Debug)]
struct FontArgs {
    /// Extra directory of .ttf/.otf/.ttc files. Repeatable.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Do not load system fonts.
    #[arg(long)]
    no_system_fonts: bool,
}

impl FontArgs {
    fn font_book(&self) -> underlay::FontBook {
        underlay::FontBook::new(&underlay::FontSettings {
            load_system_fonts: !self.no_system_fonts,
            font_dirs: self.font_dirs.clone(),
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let doc = underlay::SceneDoc::from_path(&args.scene)
        .with_context(|| format!("load scene '{}'", args.scene.display()))?;
    let scene = doc.load()?;

    let opts = underlay::SessionOpts {
        render: doc.render.clone(),
        ..underlay::SessionOpts::default()
    };
    let mut session = underlay::EditorSession::with_scene(opts, args.fonts.font_book(), scene);

    let target = match args.preview {
        Some(max_edge) => underlay::RenderTarget::Preview { max_edge },
        None => underlay::RenderTarget::Export,
    };
    let frame = session.render(target)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    underlay::export_png(&frame, &args.out)?;

    eprintln!("wrote {} ({}x{})", args.out.display(), frame.width, frame.height);
    Ok(())
}

fn cmd_fonts(args: FontArgs) -> anyhow::Result<()> {
    let book = args.font_book();
    if book.is_empty() {
        anyhow::bail!("no fonts found");
    }
    for family in book.families() {
        println!("{family}");
    }
    Ok(())
}
