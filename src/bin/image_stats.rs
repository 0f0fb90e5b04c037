use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use imgenh::{ChannelMode, ImageStatistics, IntensityMatrix, OpenMode};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    Grayscale,
    Color,
    Unchanged,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Parameters {
    ///Path to the input image.
    input: PathBuf,
    ///How to open it.
    #[arg(long, value_enum, default_value_t = Mode::Grayscale)]
    mode: Mode,
}

fn main() {
    env_logger::init();
    let params = Parameters::parse();
    let mode = match params.mode {
        Mode::Grayscale => OpenMode::Grayscale,
        Mode::Color => OpenMode::Color,
        Mode::Unchanged => OpenMode::Unchanged,
    };
    let img = match IntensityMatrix::decode(&params.input, mode) {
        Ok(img) => img,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let stats = ImageStatistics::new(&img);
    println!("resolution: {:?}", img.resolution());
    println!("levels:     {}", img.levels());
    println!("sum:        {}", stats.sum());
    println!("mean:       {:.4}", stats.mean());
    println!("variance:   {:.4}", stats.variance());
    println!("std:        {:.4}", stats.std());
    println!("min:        {}", stats.minimum());
    println!("max:        {}", stats.maximum());

    if img.mode() == ChannelMode::Grayscale {
        let hist = stats.histogram().expect("grayscale histogram");
        let observed = hist.iter().filter(|&&count| count > 0).count();
        println!("observed levels: {observed}");
    }
}
