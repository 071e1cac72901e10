// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelview;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use mandelview::{
    Camera, Color, Complex, Dimensions, Histogram, Mandelbrot, RenderJob, RenderMode,
    RenderRequest,
};

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

fn parse_list<T: FromStr>(s: &str) -> Result<Vec<T>, T::Err> {
    s.split(',').map(|item| T::from_str(item.trim())).collect()
}

fn validate_finite_pair(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<f64>(s, separator) {
        Some((a, b)) if a.is_finite() && b.is_finite() => Ok(()),
        _ => Err(err.to_string()),
    }
}

fn validate_positive_pair(s: &str, separator: char, err: &str) -> Result<(), String> {
    validate_finite_pair(s, separator, err)?;
    match parse_pair::<f64>(s, separator) {
        Some((a, b)) if a > 0.0 && b > 0.0 => Ok(()),
        _ => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
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

fn validate_list<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match parse_list::<T>(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const EXTENT: &str = "extent";
const SUPERSAMPLING: &str = "supersampling";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const BREAKPOINTS: &str = "breakpoints";
const PALETTE: &str = "palette";
const MODE: &str = "mode";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandelview")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Supersampled Mandelbrot renderer with histogram coloring")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PPM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("600x400")
                .validator(|s| match parse_pair::<u16>(&s, 'x') {
                    Some((w, h)) if w > 0 && h > 0 => Ok(()),
                    _ => Err("Could not parse output image size".to_string()),
                })
                .help("Size of output image, in pixels"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.5,0")
                .validator(|s| {
                    validate_finite_pair(&s, ',', "View center must be two finite numbers")
                })
                .help("Center of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(EXTENT)
                .required(false)
                .long(EXTENT)
                .short("e")
                .takes_value(true)
                .validator(|s| {
                    validate_positive_pair(
                        &s,
                        'x',
                        "View extent must be two positive finite numbers",
                    )
                })
                .help("Width and height of the view on the complex plane [default: 3 wide]"),
        )
        .arg(
            Arg::with_name(SUPERSAMPLING)
                .required(false)
                .long(SUPERSAMPLING)
                .short("a")
                .takes_value(true)
                .default_value("3")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        8,
                        "Could not parse supersampling",
                        "Supersampling must be between 1 and 8",
                    )
                })
                .help("Side of the sampling grid inside each pixel"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("500")
                .validator(|s| {
                    validate_range(
                        &s,
                        10,
                        100_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 10 and 100000",
                    )
                })
                .help("Iterations before a point is considered part of the set"),
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
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(BREAKPOINTS)
                .required(false)
                .long(BREAKPOINTS)
                .short("b")
                .takes_value(true)
                .validator(|s| validate_list::<f64>(&s, "Could not parse breakpoints"))
                .help("Comma-separated palette positions, 0.0 to 1.0"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .validator(|s| validate_list::<Color>(&s, "Could not parse palette colors"))
                .help("Comma-separated palette colors, as #rrggbb"),
        )
        .arg(
            Arg::with_name(MODE)
                .required(false)
                .long(MODE)
                .short("m")
                .takes_value(true)
                .possible_values(&["supersampled", "averaged"])
                .default_value("supersampled")
                .help("Plot every sub-pixel, or average them into one pixel"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, failure::Error> {
    matches
        .value_of(name)
        .ok_or_else(|| format_err!("missing value for --{}", name))
}

fn number<T>(matches: &ArgMatches, name: &str) -> Result<T, failure::Error>
where
    T: FromStr,
    T::Err: failure::Fail,
{
    Ok(T::from_str(value(matches, name)?)?)
}

/// Builds the palette from the command line.  Colors alone replace the
/// six default colors; breakpoints alone keep the default colors.
fn histogram(matches: &ArgMatches) -> Result<Histogram, failure::Error> {
    let colors = match matches.value_of(PALETTE) {
        Some(s) => Some(parse_list::<Color>(s)?),
        None => None,
    };
    let breakpoints = match matches.value_of(BREAKPOINTS) {
        Some(s) => Some(parse_list::<f64>(s)?),
        None => None,
    };
    let histogram = match (breakpoints, colors) {
        (None, None) => Histogram::default(),
        (None, Some(colors)) => Histogram::with_colors(colors)?,
        (Some(breakpoints), colors) => {
            let colors = colors.unwrap_or_else(|| Histogram::default().colors().to_vec());
            Histogram::new(breakpoints, colors)?
        }
    };
    Ok(histogram)
}

fn camera(matches: &ArgMatches, dimensions: Dimensions) -> Result<Camera, failure::Error> {
    let center = parse_complex(value(matches, CENTER)?)
        .ok_or_else(|| format_err!("Error parsing view center"))?;
    match matches.value_of(EXTENT) {
        Some(extent) => {
            let (width, height) = parse_pair::<f64>(extent, 'x')
                .ok_or_else(|| format_err!("Error parsing view extent"))?;
            Ok(Camera::from_extent(center, width, height))
        }
        None => Ok(Camera::new(
            center,
            mandelview::camera::HOME_WIDTH,
            dimensions.aspect_ratio(),
        )),
    }
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (u32, u32)) -> Result<(), std::io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0, bounds.1, ColorType::RGB(8))?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let (width, height) = parse_pair::<u32>(value(matches, SIZE)?, 'x')
        .ok_or_else(|| format_err!("Error parsing image dimensions"))?;
    let dimensions =
        Dimensions::new(width, height).with_supersampling(number(matches, SUPERSAMPLING)?);
    let histogram = histogram(matches)?;
    let camera = camera(matches, dimensions)?;
    let mode = value(matches, MODE)?
        .parse::<RenderMode>()
        .map_err(|e: String| format_err!("{}", e))?;

    let request = RenderRequest {
        camera,
        dimensions,
        evaluator: Mandelbrot::new(number(matches, ITERATIONS)?),
        histogram,
        threads: number(matches, THREADS)?,
    };
    info!(
        "rendering {}x{} at {}x{} supersampling, center {}, view {}x{}, {} threads",
        width,
        height,
        dimensions.supersampling,
        dimensions.supersampling,
        camera.center(),
        camera.width(),
        camera.height(),
        request.threads
    );

    let started = Instant::now();
    let frame = RenderJob::submit(request).wait()?;
    info!(
        "{} of {} sub-pixels escaped, rendered in {:?}",
        frame.colored_count(),
        frame.sub_pixels().len(),
        started.elapsed()
    );

    let image = frame.to_image(mode);
    let bounds = image.dimensions();
    let output = value(matches, OUTPUT)?;
    write_image(output, &image.into_raw(), bounds)?;
    info!("wrote {}x{} image to {}", bounds.0, bounds.1, output);
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
