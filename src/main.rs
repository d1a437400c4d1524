//! Classify handwritten digits with a pre-trained 4-layer MLP.
//!
//! Usage:
//!   mlp-digits w1 w2 w3 w4 b1 b2 b3 b4
//!   mlp-digits --manifest net.json
//!
//! Then type image paths on stdin; `q` quits.

use anyhow::{bail, Context, Result};
use log::info;
use mlp_digits::{input::load_image, network::spec::MLP_SIZE, WeightFiles};
use std::io::{self, BufRead, Write};
use std::path::Path;

const USAGE: &str = "Usage: mlp-digits w1 w2 w3 w4 b1 b2 b3 b4\n       mlp-digits --manifest <net.json>";

fn weight_files(args: &[String]) -> Result<WeightFiles> {
    match args {
        [flag, manifest] if flag == "--manifest" || flag == "-m" => {
            Ok(WeightFiles::load_json(Path::new(manifest))?)
        }
        _ if args.len() == 2 * MLP_SIZE => {
            let paths: &[String; 2 * MLP_SIZE] = args.try_into()?;
            Ok(WeightFiles::from_paths(paths))
        }
        _ => bail!("{}", USAGE),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let network = weight_files(&args)?
        .load()
        .context("failed to load network weights")?;
    info!("network ready: {} layers", network.layers().len());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("Please insert image path:");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let path = line.trim();
        if path == "q" {
            break;
        }
        if path.is_empty() {
            continue;
        }

        let image = match load_image(Path::new(path)) {
            Ok(image) => image,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };
        let digit = network.classify(&image)?;

        print!("Image processed:\n{}", image.visual());
        println!("{}", digit);
    }

    Ok(())
}
