//! printsheet CLI - worksheet layout and export tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use printsheet::convert::PagedImageExporter;
use printsheet::render::collect_stats;
use printsheet::{
    Columns, ExportJob, ExportOptions, ExporterRegistry, JsonFormat, PageSize, Printsheet,
};

#[derive(Parser)]
#[command(name = "printsheet")]
#[command(version)]
#[command(about = "Lay out worksheets and export them to PDF pages, DOCX, text, and HTML slides", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a job to one or more formats
    Export {
        /// Job file (blocks, format options, test info)
        #[arg(value_name = "JOB")]
        input: PathBuf,

        /// Output format: pdf, docx, txt, hwp, html, json, or all
        #[arg(short, long, value_name = "FORMAT", default_value = "all")]
        format: Vec<String>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Append an answer key page to paged output
        #[arg(long)]
        answer_key: bool,

        /// Prepend a header page to paged output
        #[arg(long)]
        header: bool,

        /// Raster resolution for paged output
        #[arg(long, default_value = "144")]
        dpi: f32,

        /// Directory image references are resolved against
        #[arg(long, value_name = "DIR", env = "PRINTSHEET_IMAGES")]
        images: Option<PathBuf>,

        /// Extra directory searched for fonts
        #[arg(long, value_name = "DIR", env = "PRINTSHEET_FONTS")]
        fonts: Option<PathBuf>,

        /// Override the job's column count
        #[arg(long, value_enum)]
        columns: Option<ColumnsArg>,

        /// Override the job's page size
        #[arg(long, value_enum)]
        page_size: Option<PageSizeArg>,

        /// Export formats one after another
        #[arg(long)]
        sequential: bool,
    },

    /// Print the computed layout as JSON
    Layout {
        /// Job file
        #[arg(value_name = "JOB")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show layout information for a job
    Info {
        /// Job file
        #[arg(value_name = "JOB")]
        input: PathBuf,
    },

    /// List available export formats
    Formats,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ColumnsArg {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

impl From<ColumnsArg> for Columns {
    fn from(arg: ColumnsArg) -> Self {
        match arg {
            ColumnsArg::One => Columns::One,
            ColumnsArg::Two => Columns::Two,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSizeArg {
    A4,
    A3,
    B4,
    B3,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::A3 => PageSize::A3,
            PageSizeArg::B4 => PageSize::B4,
            PageSizeArg::B3 => PageSize::B3,
        }
    }
}

struct ExportArgs {
    formats: Vec<String>,
    output: Option<PathBuf>,
    answer_key: bool,
    header: bool,
    dpi: f32,
    images: Option<PathBuf>,
    fonts: Option<PathBuf>,
    columns: Option<ColumnsArg>,
    page_size: Option<PageSizeArg>,
    sequential: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Export {
            input,
            format,
            output,
            answer_key,
            header,
            dpi,
            images,
            fonts,
            columns,
            page_size,
            sequential,
        }) => cmd_export(
            &input,
            ExportArgs {
                formats: format,
                output,
                answer_key,
                header,
                dpi,
                images,
                fonts,
                columns,
                page_size,
                sequential,
            },
        ),
        Some(Commands::Layout {
            input,
            output,
            compact,
        }) => cmd_layout(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Formats) => {
            cmd_formats();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: printsheet export <JOB> [-f FORMAT] [-o DIR]".yellow());
            println!("       printsheet --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn registry(images: Option<&Path>, fonts: Option<&Path>) -> ExporterRegistry {
    let mut registry = ExporterRegistry::with_defaults();
    if images.is_none() && fonts.is_none() {
        return registry;
    }
    let mut paged = PagedImageExporter::new();
    if let Some(root) = images {
        paged = paged.with_image_root(root);
    }
    if let Some(dir) = fonts {
        paged = paged.with_font_dir(dir);
    }
    registry.register(Arc::new(paged));
    registry
}

/// Expand `all` and comma-separated lists into format names.
fn resolve_formats(requested: &[String], registry: &ExporterRegistry) -> Vec<String> {
    let mut formats: Vec<String> = Vec::new();
    for item in requested.iter().flat_map(|f| f.split(',')) {
        let item = item.trim().to_lowercase();
        if item.is_empty() {
            continue;
        }
        if item == "all" {
            formats.extend(registry.names().into_iter().map(str::to_string));
        } else {
            formats.push(item);
        }
    }
    formats.dedup();
    formats
}

fn cmd_export(input: &Path, args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut job = ExportJob::from_file(input)?;
    if let Some(columns) = args.columns {
        job.format.columns = columns.into();
    }
    if let Some(page_size) = args.page_size {
        job.format.page_size = page_size.into();
    }

    let output_dir = args.output.clone().unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });
    fs::create_dir_all(&output_dir)?;

    let registry = registry(args.images.as_deref(), args.fonts.as_deref());
    let formats = resolve_formats(&args.formats, &registry);
    debug!("Formats: {}", formats.join(", "));

    let sheet = Printsheet::new().layout_job(job);

    let options = ExportOptions::new()
        .with_header(args.header)
        .with_answer_key(args.answer_key)
        .with_dpi(args.dpi)
        .with_parallel(!args.sequential);

    let pb = ProgressBar::new(formats.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Rendering...");
    let names: Vec<&str> = formats.iter().map(String::as_str).collect();
    let results = registry.export_all(&names, sheet.document(), &options)?;
    pb.inc(1);

    let mut written = Vec::new();
    for result in &results {
        pb.set_message(format!("Writing {}...", result.format));
        for artifact in &result.artifacts {
            written.push((artifact.write_to(&output_dir)?, result.fell_back));
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{} {}", "Output files:".green().bold(), output_dir.display());
    let count = written.len();
    for (i, (path, fell_back)) in written.iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        if *fell_back {
            println!("  {} {} {}", branch.dimmed(), name, "(fallback)".yellow());
        } else {
            println!("  {} {}", branch.dimmed(), name);
        }
    }

    Ok(())
}

fn cmd_layout(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = Printsheet::new().load(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = sheet.to_json(format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = Printsheet::new().load(input)?;
    let doc = sheet.document();

    println!("{}", "Layout Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = doc.test_info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    println!("{}: {}", "Page size".bold(), doc.format.page_size);
    println!("{}: {}", "Columns".bold(), doc.format.columns.count());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Placed blocks".bold(), doc.node_count());

    for page in &doc.pages {
        println!(
            "  {} page {}: {} blocks",
            "├─".dimmed(),
            page.index + 1,
            page.node_count()
        );
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = collect_stats(&doc.blocks);
    println!("{}: {}", "Questions".bold(), stats.question_count);
    println!("{}: {}", "Passages".bold(), stats.passage_count);
    println!("{}: {}", "Concepts".bold(), stats.concept_count);
    println!("{}: {}", "Explanations".bold(), stats.explanation_count);
    println!("{}: {}", "Options".bold(), stats.option_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Words".bold(), stats.word_count);

    Ok(())
}

fn cmd_formats() {
    println!("{}", "Export formats".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for exporter in ExporterRegistry::with_defaults().exporters() {
        println!(
            "  {:<6} {} ({})",
            exporter.name().bold(),
            exporter.description(),
            exporter.extensions().join(", ").dimmed()
        );
    }
}

fn cmd_version() {
    println!("{} {}", "printsheet".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Worksheet layout and export tool");
    println!();
    println!("License: MIT");
}
