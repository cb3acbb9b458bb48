extern crate clap;
extern crate mandelbrot;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use mandelbrot::{Pixel, RenderConfig, RenderError, Renderer, Smoothing};
use num::Complex;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const SCALE: &str = "scale";
const ZOOM: &str = "zoom";
const PAN: &str = "pan";
const FOCUS: &str = "focus";
const ITERATIONS: &str = "iterations";
const SPREAD: &str = "spread";
const SMOOTHING: &str = "smoothing";
const THREADS: &str = "threads";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get() * 4;

    App::new("mandel")
        .version("0.1.0")
        .about("Smooth-coloured Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("320x260")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse the center point"))
                .help("Center of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(SCALE)
                .required(false)
                .long(SCALE)
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse scale",
                        "Scale must be a positive number",
                    )
                })
                .help("Size of the view; 1 shows four units across"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| {
                    f64::from_str(&s)
                        .map(|_| ())
                        .map_err(|_| "Could not parse zoom factor".to_string())
                })
                .help("Zoom factor applied after positioning; factors <= 0 are ignored"),
        )
        .arg(
            Arg::with_name(PAN)
                .required(false)
                .long(PAN)
                .short("p")
                .takes_value(true)
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse pan offset"))
                .help("Pan offset dx,dy, relative to the current scale"),
        )
        .arg(
            Arg::with_name(FOCUS)
                .required(false)
                .long(FOCUS)
                .short("f")
                .takes_value(true)
                .validator(|s| validate_pair::<usize>(&s, ',', "Could not parse focus pixel"))
                .help("Recenter on the point shown at pixel col,row"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("80")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum iterations per pixel"),
        )
        .arg(
            Arg::with_name(SPREAD)
                .required(false)
                .long(SPREAD)
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse spread",
                        "Spread must be a positive number",
                    )
                })
                .help("Iterations per palette step"),
        )
        .arg(
            Arg::with_name(SMOOTHING)
                .required(false)
                .long(SMOOTHING)
                .takes_value(true)
                .possible_values(&["normalize", "linear"])
                .default_value("normalize")
                .help("How escape iterations become colors"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in renderer"),
        )
        .get_matches()
}

fn bad(msg: &str) -> RenderError {
    RenderError::InvalidGridConfig(msg.to_string())
}

fn number<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, RenderError> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| bad(&format!("Could not parse {}", name)))
}

fn run(matches: &ArgMatches) -> Result<(), RenderError> {
    let (width, height) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<usize>(s, 'x'))
        .ok_or_else(|| bad("Error parsing image dimensions"))?;
    let center = matches
        .value_of(CENTER)
        .and_then(parse_complex)
        .ok_or_else(|| bad("Error parsing center point"))?;
    let smoothing = match matches.value_of(SMOOTHING) {
        Some("linear") => Smoothing::Linear,
        _ => Smoothing::Normalize,
    };
    let output = matches.value_of(OUTPUT).ok_or_else(|| bad("No output file"))?;
    let threads: usize = number(matches, THREADS)?;

    let mut renderer = Renderer::new(RenderConfig {
        max_iterations: number(matches, ITERATIONS)?,
        center,
        scale: number(matches, SCALE)?,
        spread: number(matches, SPREAD)?,
        smoothing,
        ..RenderConfig::with_size(width, height)
    })?;

    if let Some((column, row)) = matches.value_of(FOCUS).and_then(|s| parse_pair(s, ',')) {
        renderer.focus(&Pixel(column, row));
    }
    if let Some((dx, dy)) = matches.value_of(PAN).and_then(|s| parse_pair(s, ',')) {
        renderer.pan(dx, dy);
    }
    if matches.is_present(ZOOM) {
        renderer.zoom(number(matches, ZOOM)?);
    }

    let frame = if threads > 1 {
        renderer.render_threaded(threads)?
    } else {
        renderer.render()
    };
    frame.write_png(output)
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
