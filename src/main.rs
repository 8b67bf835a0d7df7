//! svg2img CLI
//!
//! Usage:
//!   svg2img [OPTIONS] [INPUT]
//!
//! Options:
//!   -o, --output <FILE>      Write the image to FILE and print its path
//!   -f, --format <FORMAT>    png, jpg, jpeg, gif or webp
//!   -w, --width <PX>         Output width
//!   -H, --height <PX>        Output height
//!   -s, --super-sampling <N> Render N times larger, then average down
//!   -c, --config <FILE>      Option profile (TOML format)
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use svg2img::{
    convert_plan, parse_background, ConvertOptions, Error, Output, OutputFormat, Plan, Profile,
};

#[derive(Parser)]
#[command(name = "svg2img")]
#[command(about = "Convert SVG documents into PNG, JPEG, GIF or WebP images")]
struct Cli {
    /// Input SVG file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output file; its path is printed once written
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format; defaults to the output file extension, then png
    #[arg(short, long)]
    format: Option<String>,

    /// Output width in pixels
    #[arg(short, long)]
    width: Option<String>,

    /// Output height in pixels
    #[arg(short = 'H', long)]
    height: Option<String>,

    /// Shrink to at most this width, keeping the aspect ratio
    #[arg(long)]
    max_width: Option<String>,

    /// Shrink to at most this height, keeping the aspect ratio
    #[arg(long)]
    max_height: Option<String>,

    /// Render at this multiple of the output size, then average down
    #[arg(short, long)]
    super_sampling: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    quality: Option<u8>,

    /// Background color painted under the image
    #[arg(long)]
    background: Option<String>,

    /// Disable anti-aliasing
    #[arg(long)]
    no_anti_alias: bool,

    /// Create missing parent directories of the output file
    #[arg(long)]
    create_dirs: bool,

    /// Write to a new file in the system temp directory and print its path
    #[arg(long, conflicts_with = "output")]
    temp: bool,

    /// Option profile (TOML format); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log pipeline stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Validate every flag before reading input
    let plan = match prepare(&cli) {
        Ok(plan) => plan,
        Err(e) => fail(&e),
    };

    // Image bytes are binary: refuse to dump them onto a terminal
    let to_stdout = cli.output.is_none() && !cli.temp;
    if to_stdout && io::stdout().is_terminal() {
        fail("refusing to write image data to a terminal; use --output or redirect stdout");
    }

    let (source, filename) = match read_input(&cli) {
        Ok(input) => input,
        Err(e) => fail(&e),
    };

    match convert_plan(&source, plan) {
        Ok(Output::Path(path)) => println!("{}", path.display()),
        Ok(Output::Bytes(bytes)) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(&bytes).and_then(|()| stdout.flush()) {
                fail(&format!("Error writing to stdout: {}", e));
            }
        }
        Err(Error::Parse(e)) => {
            eprint!("{}", e.format(&source, &filename));
            process::exit(1);
        }
        Err(e) => fail(&format!("Error: {}", e)),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "svg2img=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(cli: &Cli) -> Result<(String, String), String> {
    match &cli.input {
        Some(path) => fs::read_to_string(path)
            .map(|content| (content, path.display().to_string()))
            .map_err(|e| format!("Error reading file '{}': {}", path.display(), e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map(|_| (buffer, "<stdin>".to_string()))
                .map_err(|e| format!("Error reading from stdin: {}", e))
        }
    }
}

/// Build and validate the conversion options without touching the input
fn prepare(cli: &Cli) -> Result<Plan<'static>, String> {
    build_options(cli)?
        .validate()
        .map_err(|e| format!("Error: {}", e))
}

/// Profile values first, then explicit flags on top
fn build_options(cli: &Cli) -> Result<ConvertOptions<'static>, String> {
    let mut options = ConvertOptions::default();
    if let Some(path) = &cli.config {
        let profile = Profile::from_file(path)
            .map_err(|e| format!("Error loading config '{}': {}", path.display(), e))?;
        options = profile
            .apply(options)
            .map_err(|e| format!("Error in config '{}': {}", path.display(), e))?;
    }

    let error = |e: Error| format!("Error: {}", e);
    let format = match (&cli.format, &cli.output) {
        (Some(name), _) => Some(name.parse::<OutputFormat>().map_err(error)?),
        (None, Some(path)) => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse::<OutputFormat>().ok()),
        (None, None) => None,
    };
    if let Some(format) = format {
        options.format = format;
    }

    let dimension = |option: &str, text: &Option<String>| {
        text.as_deref()
            .map(|t| svg2img::parse_dimension(option, t))
            .transpose()
            .map_err(error)
    };
    if let Some(width) = dimension("width", &cli.width)? {
        options.width = Some(width);
    }
    if let Some(height) = dimension("height", &cli.height)? {
        options.height = Some(height);
    }
    if let Some(max_width) = dimension("max_width", &cli.max_width)? {
        options.max_width = Some(max_width);
    }
    if let Some(max_height) = dimension("max_height", &cli.max_height)? {
        options.max_height = Some(max_height);
    }
    if let Some(factor) = cli.super_sampling {
        options.super_sampling = factor;
    }
    if let Some(quality) = cli.quality {
        options.quality = quality;
    }
    if let Some(background) = &cli.background {
        options.background = Some(parse_background(background).map_err(error)?);
    }
    if cli.no_anti_alias {
        options.anti_alias = false;
    }
    if cli.create_dirs {
        options.create_dirs = true;
    }
    if let Some(path) = &cli.output {
        options.output_path = Some(path.clone());
    }
    if cli.temp {
        options.temp_file = true;
    }
    let input_dir = cli
        .input
        .as_deref()
        .and_then(|path| path.parent())
        .filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = input_dir {
        options.resources_dir = Some(dir.to_path_buf());
    }
    Ok(options)
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}
