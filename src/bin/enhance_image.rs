use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use imgenh::{BoostType, ImageEnhancement, IntensityMatrix, OpenMode};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Mode {
    Grayscale,
    Color,
    Unchanged,
}

impl From<Mode> for OpenMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Grayscale => OpenMode::Grayscale,
            Mode::Color => OpenMode::Color,
            Mode::Unchanged => OpenMode::Unchanged,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Parameters {
    ///Path to the input image.
    #[arg(long)]
    input: PathBuf,
    ///How to open it.
    #[arg(long, value_enum, default_value_t = Mode::Grayscale)]
    mode: Mode,
    ///Directory the filtered image is written to.
    #[arg(long, default_value = "res/filt")]
    out_dir: PathBuf,
    ///Operators applied in order: negative, stretch=P, contract=P,
    ///slice=LO..HI:up|down, bitplane=N, equalize[=LO..HI], average,
    ///subtract=PATH.
    ops: Vec<String>,
}

fn main() {
    env_logger::init();
    let params = Parameters::parse();
    if let Err(err) = run(&params) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(params: &Parameters) -> Result<(), Box<dyn Error>> {
    let mut ie = ImageEnhancement::open(&params.input, params.mode.into())?;
    for op in &params.ops {
        apply(&mut ie, op, params.mode.into())?;
    }
    let path = ie.save(&params.out_dir)?;
    println!("{}", path.display());
    Ok(())
}

fn apply(ie: &mut ImageEnhancement, op: &str, mode: OpenMode) -> Result<(), Box<dyn Error>> {
    let (name, arg) = match op.split_once('=') {
        Some((name, arg)) => (name, Some(arg)),
        None => (op, None),
    };
    match (name, arg) {
        ("negative", None) => {
            ie.negative();
        }
        ("stretch", Some(percent)) => {
            ie.stretch_contrast(percent.parse()?);
        }
        ("contract", Some(percent)) => {
            ie.contract_contrast(percent.parse()?);
        }
        ("slice", Some(value)) => {
            let (range, boost) = value
                .split_once(':')
                .ok_or("slice takes LO..HI:up or LO..HI:down")?;
            let boost = match boost {
                "up" => BoostType::Up,
                "down" => BoostType::Down,
                other => return Err(format!("unknown boost type: {other}").into()),
            };
            ie.gray_level_slicing(parse_range(range)?, boost);
        }
        ("bitplane", Some(plane)) => {
            ie.bit_plane_slicing(plane.parse()?)?;
        }
        ("equalize", None) => {
            ie.histogram_equalization()?;
        }
        ("equalize", Some(range)) => {
            ie.histogram_equalization_in_range(parse_range(range)?)?;
        }
        ("average", None) => {
            ie.averaging();
        }
        ("subtract", Some(path)) => {
            let other = IntensityMatrix::decode(path, mode)?;
            ie.subtract(&other)?;
        }
        _ => return Err(format!("unknown operator: {op}").into()),
    }
    Ok(())
}

fn parse_range(s: &str) -> Result<(u32, u32), Box<dyn Error>> {
    let (lo, hi) = s.split_once("..").ok_or("range takes the form LO..HI")?;
    Ok((lo.parse()?, hi.parse()?))
}
