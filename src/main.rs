//! binary font import tool
//!
//! Takes a font file and a codepoint selection, and writes the imported face
//! record as JSON.

use clap::Parser;
use rista::{import_face, parse_unicodes, FaceSource, Selection, Size};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input font file.
    #[arg(short, long)]
    path: std::path::PathBuf,

    /// List of unicode codepoints; '*' selects every mapped codepoint
    #[arg(short, long)]
    unicodes: Option<String>,

    /// Pixels per em; 0 or less keeps font units
    #[arg(short, long, default_value_t = 0.0)]
    size: f32,

    /// Face index for font collections
    #[arg(long, default_value_t = 0)]
    index: u32,

    /// The output JSON file; stdout when omitted
    #[arg(short, long)]
    output_file: Option<std::path::PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let codes = match args.unicodes.as_deref().map(str::trim) {
        None | Some("*") => None,
        Some(input) => match parse_unicodes(input) {
            Ok(codes) => Some(codes),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    };
    let selection = match &codes {
        Some(codes) => Selection::Explicit(codes),
        None => Selection::All,
    };

    let font_bytes = match std::fs::read(&args.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("failed to read {}: {e}", args.path.display());
            std::process::exit(1);
        }
    };
    let mut source = match FaceSource::with_index(&font_bytes, args.index, Size::new(args.size)) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let record = import_face(&mut source, selection);

    match &args.output_file {
        Some(output_file) => {
            let json =
                serde_json::to_string_pretty(&record).expect("Error serializing face record");
            std::fs::write(output_file, json).unwrap();
        }
        None => {
            let json = serde_json::to_string(&record).expect("Error serializing face record");
            println!("{json}");
        }
    }
}
