//! jlsframes CLI - inspect and tidy JPEG-LS fragments extracted from DICOM pixel data.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use jpegls_frames::TransferSyntax;
use jpegls_frames::fragment_assembler::trim_to_end_marker;
use jpegls_frames::header::describe;
use jpegls_frames::jpeg_stream_reader::read_frame_header;
use tracing_subscriber::{EnvFilter, fmt};

/// JPEG-LS fragment inspector for DICOM encapsulated pixel data
#[derive(Parser)]
#[command(name = "jlsframes")]
#[command(version)]
#[command(about = "Inspect and trim JPEG-LS fragments", long_about = None)]
#[command(after_help = "EXAMPLES:
    jlsframes info -i frame0.jls frame1.jls
    jlsframes trim -i padded.jls -o frame.jls
    jlsframes list

Set RUST_LOG=debug for per-fragment diagnostics.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the frame header of one or more fragments
    ///
    /// Each file is treated as one frame. Trailing padding after the end of
    /// image marker is ignored.
    #[command(visible_alias = "i")]
    Info {
        /// Fragment files, one frame each
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,
    },

    /// Strip padding after the end of image marker
    #[command(visible_alias = "t")]
    Trim {
        /// Input fragment file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the trimmed bitstream
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List supported transfer syntaxes
    #[command(visible_alias = "l")]
    List,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { input } => show_info(&input),
        Commands::Trim { input, output } => trim_fragment(&input, &output),
        Commands::List => list_syntaxes(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn show_info(inputs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut first_header = None;

    for (index, path) in inputs.iter().enumerate() {
        let data = fs::read(path)?;
        let stream = trim_to_end_marker(&data, index)?;
        let header = read_frame_header(stream)?;

        println!("File: {:?}", path);
        println!("  Size:        {} bytes", data.len());
        if stream.len() < data.len() {
            println!("  Padding:     {} bytes", data.len() - stream.len());
        }
        println!("  Dimensions:  {}x{}", header.width, header.height);
        println!("  Bit depth:   {} bits", header.bits_per_sample);
        println!("  Components:  {}", header.component_count);
        println!("  Interleave:  {:?}", header.interleave_mode);
        println!("  NEAR:        {}", header.allowed_lossy_error);

        match describe(&header) {
            Ok(descriptor) => {
                let format = descriptor.pixel_format;
                println!("  Photometric: {}", descriptor.photometric);
                println!(
                    "  Pixels:      allocated {} stored {} high bit {} signed {}",
                    format.bits_allocated,
                    format.bits_stored,
                    format.high_bit,
                    format.is_signed()
                );
                println!("  Syntax:      {}", descriptor.transfer_syntax);
            }
            Err(e) => println!("  Not representable: {}", e),
        }

        match first_header {
            None => first_header = Some(header),
            Some(first) if !header.same_geometry(&first) => {
                println!("  Warning:     geometry differs from the first fragment");
            }
            Some(_) => {}
        }
        println!();
    }
    Ok(())
}

fn trim_fragment(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let stream = trim_to_end_marker(&data, 0)?;
    read_frame_header(stream)?;
    fs::write(output, stream)?;
    println!(
        "Trimmed {:?}: {} -> {} bytes",
        input,
        data.len(),
        stream.len()
    );
    Ok(())
}

fn list_syntaxes() -> Result<(), Box<dyn std::error::Error>> {
    println!("Supported Transfer Syntaxes:");
    println!();
    for syntax in TransferSyntax::ALL {
        println!("  {}", syntax.name());
        println!("    UID:   {}", syntax.uid());
        println!("    Lossy: {}", if syntax.is_lossy() { "yes" } else { "no" });
        println!();
    }
    Ok(())
}
