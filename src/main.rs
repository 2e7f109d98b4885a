//! CLI binary for qrpipe.
//!
//! A thin shim over the library crate that maps CLI flags onto
//! `EncodeOptions` and prints decode results.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use qrpipe::{decode_file, preview_text, Color, Decoded, ECLevel, EncodeOptions};
use tracing_subscriber::EnvFilter;

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// CLI definition
//------------------------------------------------------------------------------

/// Generate QR code images and decode QR codes from images.
#[derive(Debug, Parser)]
#[command(name = "qrpipe", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "QRPIPE_VERBOSE")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, env = "QRPIPE_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode text into a PNG QR code.
    Encode(EncodeArgs),
    /// Decode the first QR code found in a JPEG, PNG, BMP or GIF image.
    Decode(DecodeArgs),
}

#[derive(Debug, Args)]
struct EncodeArgs {
    /// Text or URL to encode.
    content: String,

    /// Output file. Defaults to qrcode_<YYYYMMDD>_<HHMMSS>.png.
    #[arg(short, long, env = "QRPIPE_OUTPUT")]
    output: Option<PathBuf>,

    /// Pixels per module (1-20).
    #[arg(short = 's', long, env = "QRPIPE_MODULE_SIZE", default_value_t = 10,
          value_parser = clap::value_parser!(u32).range(1..=20))]
    module_size: u32,

    /// Quiet zone width in modules (0-10).
    #[arg(short, long, env = "QRPIPE_BORDER", default_value_t = 4,
          value_parser = clap::value_parser!(u32).range(0..=10))]
    border: u32,

    /// Error correction level: L (7%), M (15%), Q (25%) or H (30%).
    #[arg(short, long, env = "QRPIPE_EC_LEVEL", default_value = "M")]
    ec_level: ECLevel,

    /// Module color, as #RRGGBB, #RGB or a color name.
    #[arg(long, env = "QRPIPE_FOREGROUND", default_value = "#000000")]
    foreground: Color,

    /// Background color, as #RRGGBB, #RGB or a color name.
    #[arg(long, env = "QRPIPE_BACKGROUND", default_value = "#FFFFFF")]
    background: Color,

    /// Also print the code to the terminal.
    #[arg(long)]
    preview: bool,
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Image file containing a QR code.
    input: PathBuf,

    /// Print the result as JSON.
    #[arg(long, env = "QRPIPE_JSON")]
    json: bool,
}

impl From<&EncodeArgs> for EncodeOptions {
    fn from(args: &EncodeArgs) -> Self {
        Self {
            content: args.content.clone(),
            module_size: args.module_size,
            border_width: args.border,
            ec_level: args.ec_level,
            foreground: args.foreground,
            background: args.background,
        }
    }
}

// Commands
//------------------------------------------------------------------------------

fn run_encode(args: &EncodeArgs) -> Result<()> {
    if args.content.is_empty() {
        bail!("Please enter text or URL to generate QR code.");
    }

    let opts = EncodeOptions::from(args);
    let qr = opts.builder().build().context("Failed to generate QR code")?;
    let output = args.output.clone().unwrap_or_else(|| PathBuf::from(qr.export_filename()));

    let png = qr.to_png()?;
    std::fs::write(&output, png)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    if args.preview {
        print!("{}", qr.render_as_string());
    }
    println!("{} {}", green("Saved"), output.display());
    println!(
        "{}",
        dim(&format!(
            "{} | {}x{} px | Encoded data: {}",
            qr.metadata(),
            qr.image_size(),
            qr.image_size(),
            preview_text(&opts.content, qrpipe::builder::PREVIEW_CHARS)
        ))
    );
    Ok(())
}

fn run_decode(args: &DecodeArgs) -> Result<()> {
    let res = decode_file(&args.input)
        .with_context(|| format!("Error processing image '{}'", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&res)?);
        return Ok(());
    }

    match res {
        Decoded::Found(symbol) => {
            eprintln!("{}", green("QR Code detected!"));
            println!("{}", symbol.text);
            if symbol.url_like {
                eprintln!("{} {}", dim("Open URL:"), symbol.text);
            }
            Ok(())
        }
        Decoded::NotFound => bail!("No QR code detected in the image."),
    }
}

fn init_tracing(cli: &Cli) {
    let default = match (cli.verbose, cli.quiet) {
        (true, _) => "qrpipe=debug",
        (_, true) => "error",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let res = match &cli.command {
        Command::Encode(args) => run_encode(args),
        Command::Decode(args) => run_decode(args),
    };

    if let Err(e) = res {
        eprintln!("{} {e:#}", red("error:"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod cli_tests {
    use clap::{CommandFactory, Parser};

    use super::{run_decode, run_encode, Cli, Command, DecodeArgs};
    use qrpipe::{Color, ECLevel, EncodeOptions, QRBuilder};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_encode_defaults() {
        let cli = Cli::try_parse_from(["qrpipe", "encode", "TEST123"]).unwrap();
        let Command::Encode(args) = cli.command else { panic!("expected encode") };
        let opts = EncodeOptions::from(&args);
        assert_eq!(opts, EncodeOptions::new("TEST123"));
        assert!(args.output.is_none());
    }

    #[test]
    fn test_encode_flags() {
        let cli = Cli::try_parse_from([
            "qrpipe", "encode", "hi", "-s", "3", "-b", "0", "-e", "h", "--foreground", "navy",
            "--background", "#ff0",
        ])
        .unwrap();
        let Command::Encode(args) = cli.command else { panic!("expected encode") };
        assert_eq!(args.module_size, 3);
        assert_eq!(args.border, 0);
        assert_eq!(args.ec_level, ECLevel::H);
        assert_eq!(args.foreground, Color::new(0, 0, 128));
        assert_eq!(args.background, Color::new(255, 255, 0));
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert!(Cli::try_parse_from(["qrpipe", "encode", "hi", "-s", "21"]).is_err());
        assert!(Cli::try_parse_from(["qrpipe", "encode", "hi", "-b", "11"]).is_err());
        assert!(Cli::try_parse_from(["qrpipe", "encode", "hi", "-e", "X"]).is_err());
        assert!(Cli::try_parse_from(["qrpipe", "encode", "hi", "--foreground", "#12"]).is_err());
    }

    #[test]
    fn test_encode_then_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let path_str = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["qrpipe", "encode", "cli round trip", "-o", path_str]).unwrap();
        let Command::Encode(args) = cli.command else { panic!("expected encode") };
        run_encode(&args).unwrap();
        assert!(path.exists());

        run_decode(&DecodeArgs { input: path, json: false }).unwrap();
    }

    #[test]
    fn test_encode_empty_content() {
        let cli = Cli::try_parse_from(["qrpipe", "encode", ""]).unwrap();
        let Command::Encode(args) = cli.command else { panic!("expected encode") };
        assert!(run_encode(&args).is_err());
    }

    #[test]
    fn test_decode_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        image::RgbImage::from_pixel(64, 64, image::Rgb([255, 255, 255])).save(&path).unwrap();

        let err = run_decode(&DecodeArgs { input: path, json: false }).unwrap_err();
        assert_eq!(err.to_string(), "No QR code detected in the image.");
    }

    #[test]
    fn test_decode_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.bmp");
        let qr = QRBuilder::new("json").build().unwrap();
        qr.to_image().save(&path).unwrap();

        run_decode(&DecodeArgs { input: path, json: true }).unwrap();
    }
}
