//! Mannequin binary: measurement-driven 3D humanoid viewer.

use mannequin::measurements::MeasurementSet;
use mannequin::options::Options;
use mannequin::{FigureCategory, Viewer};

/// Parsed command line: figure category, measurements, options.
struct CliArgs {
    category: FigureCategory,
    measurements: MeasurementSet,
    options: Option<Options>,
}

fn usage() -> ! {
    log::error!(
        "Usage: mannequin [--category man|woman] [--profile FILE.toml] \
         [--options FILE.toml] [KEY=VALUE ...]\n\
         Measurement keys: height weight chest underbust waist hips \
         sleeve thigh inseam outseam (values in cm)"
    );
    std::process::exit(1);
}

fn parse_args() -> CliArgs {
    let mut category = FigureCategory::default();
    let mut measurements = MeasurementSet::default();
    let mut options = None;
    let mut entries: Vec<(String, String)> = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--category" => {
                let Some(label) = args.next() else { usage() };
                match FigureCategory::from_label(&label) {
                    Some(c) => category = c,
                    None => {
                        log::error!("unknown category {label:?}");
                        usage();
                    }
                }
            }
            "--profile" => {
                let Some(path) = args.next() else { usage() };
                match MeasurementSet::load_profile(std::path::Path::new(&path))
                {
                    Ok(profile) => measurements = profile,
                    Err(e) => {
                        log::error!("failed to load profile {path}: {e}");
                        std::process::exit(1);
                    }
                }
            }
            "--options" => {
                let Some(path) = args.next() else { usage() };
                match Options::load(std::path::Path::new(&path)) {
                    Ok(opts) => options = Some(opts),
                    Err(e) => {
                        log::error!("failed to load options {path}: {e}");
                        std::process::exit(1);
                    }
                }
            }
            "--help" | "-h" => usage(),
            other => {
                let Some((key, value)) = other.split_once('=') else {
                    log::error!("unrecognized argument {other:?}");
                    usage();
                };
                entries.push((key.to_owned(), value.to_owned()));
            }
        }
    }

    // CLI measurements override profile values; malformed values fall
    // back to absent, same as empty form fields.
    if !entries.is_empty() {
        let overrides = MeasurementSet::from_entries(
            entries.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        merge(&mut measurements, &overrides);
    }

    CliArgs {
        category,
        measurements,
        options,
    }
}

fn merge(base: &mut MeasurementSet, overrides: &MeasurementSet) {
    use mannequin::measurements::Measurement;
    for m in Measurement::ALL {
        if let Some(value) = overrides.get(m) {
            base.set(m, Some(value));
        }
    }
}

fn main() {
    env_logger::init();

    let args = parse_args();
    log::info!(
        "presenting {:?} figure: {:?}",
        args.category,
        args.measurements
    );

    let mut builder = Viewer::builder()
        .with_category(args.category)
        .with_measurements(args.measurements);
    if let Some(options) = args.options {
        builder = builder.with_options(options);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
