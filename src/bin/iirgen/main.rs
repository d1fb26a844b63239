//! Butterworth IIR filter code generator

use std::{fmt, path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{ArgAction, Parser};
use iirgen::{
    config::Config,
    emit,
    formats::rew::ToRew,
    output::write_atomic,
    response::{FrequencyResponse, DEFAULT_POINTS},
    Biquad, FilterRequest, FilterSpec, Language, Stage,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(version, author, about)]
struct Opts {
    /// Verbosity level. -v logs the pipeline steps, -vv the intermediate designs, -vvv everything
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Output response format (text (default), json, jsonline)
    #[arg(long = "output", short = 'o', default_value = "text")]
    output_format: OutputFormat,

    /// Read the filter request from a TOML file, other flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Filter type: lowpass, highpass, bandpass, bandstop (default lowpass)
    #[arg(long = "type")]
    filter_type: Option<String>,

    /// Sampling frequency in Hz (default 10)
    #[arg(long, allow_hyphen_values = true)]
    rate: Option<f64>,

    /// Filter order (default 4)
    #[arg(long, allow_hyphen_values = true)]
    order: Option<i64>,

    /// Cutoff frequency, or center of the band for bandpass and bandstop (default 1.0 Hz)
    #[arg(long, allow_hyphen_values = true)]
    freq: Option<f64>,

    /// Width of the band in Hz, required for bandpass and bandstop
    #[arg(long, allow_hyphen_values = true)]
    width: Option<f64>,

    /// Name of the generated class
    #[arg(long)]
    name: Option<String>,

    /// Output language: python (default), c++, c, javascript, typescript, java, rust
    #[arg(long, env = "IIRGEN_LANGUAGE")]
    language: Option<String>,

    /// Path of the generated source file, the language extension is added if missing
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write the frequency response as JSON to this file
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Number of frequencies in the response data (default 512)
    #[arg(long)]
    plot_points: Option<usize>,

    /// Also export the coefficients in REW biquad format to this file
    #[arg(long)]
    rew: Option<PathBuf>,
}

impl Opts {
    fn request(&self) -> FilterRequest {
        FilterRequest {
            filter_type: self.filter_type.clone(),
            rate: self.rate,
            order: self.order,
            freq: self.freq,
            width: self.width,
            name: self.name.clone(),
            language: self.language.clone(),
        }
    }
}

#[derive(Debug, strum::EnumString, strum::Display, Clone, Copy, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    JsonLine,
}

impl OutputFormat {
    pub fn format<T>(self, obj: &T) -> Result<String>
    where
        T: serde::Serialize + fmt::Display,
    {
        Ok(match self {
            OutputFormat::Text => format!("{}", obj),
            OutputFormat::Json => serde_json::to_string_pretty(obj)?,
            OutputFormat::JsonLine => serde_json::to_string(obj)?,
        })
    }
}

/// Summary of a successful run
#[derive(Serialize)]
struct Report<'a> {
    language: Language,
    file: PathBuf,
    plot: Option<PathBuf>,
    rew: Option<PathBuf>,
    spec: &'a FilterSpec,
    sections: &'a [Biquad],
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated {} filter: {}",
            self.language,
            self.file.display()
        )?;
        if let Some(plot) = &self.plot {
            writeln!(f, "Frequency response: {}", plot.display())?;
        }
        if let Some(rew) = &self.rew {
            writeln!(f, "REW coefficients: {}", rew.display())?;
        }

        writeln!(
            f,
            "{:>7} {:>14} {:>14} {:>14} {:>14} {:>14}",
            "section", "b0", "b1", "b2", "a1", "a2"
        )?;
        for s in self.sections {
            writeln!(
                f,
                "{:>7} {:>14.8} {:>14.8} {:>14.8} {:>14.8} {:>14.8}",
                s.index, s.b0, s.b1, s.b2, s.a1, s.a2
            )?;
        }
        Ok(())
    }
}

fn run(opts: &Opts) -> Result<()> {
    let config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let spec = config.request.clone().merge(opts.request()).validate()?;
    log::debug!("validated request: {:?}", spec);

    let cascade = iirgen::design(&spec)?;
    let artifact = emit::emit(&spec, &cascade);

    let out = opts.out.clone().or(config.out);
    let file = artifact.destination(out.as_deref());
    write_atomic(&file, artifact.source.as_bytes())?;

    let plot = opts.plot.clone().or(config.plot);
    if let Some(plot) = &plot {
        let points = opts
            .plot_points
            .or(config.plot_points)
            .unwrap_or(DEFAULT_POINTS);
        let response = FrequencyResponse::compute(&cascade, spec.sampling_rate(), points);
        write_atomic(plot, &serde_json::to_vec_pretty(&response)?)?;
    }

    let rew = opts.rew.clone().or(config.rew);
    if let Some(rew) = &rew {
        write_atomic(rew, cascade.to_rew().as_bytes())?;
    }

    let report = Report {
        language: artifact.language,
        file,
        plot,
        rew,
        spec: &spec,
        sections: &cascade.sections,
    };
    print!("{}", opts.output_format.format(&report)?);
    if opts.output_format != OutputFormat::Text {
        println!();
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// One line diagnostic naming the stage that failed
fn diagnostic(err: &anyhow::Error) -> String {
    let stage = err
        .downcast_ref::<iirgen::Error>()
        .map(|e| e.stage())
        .unwrap_or(Stage::Output);
    format!("{} error: {:#}", stage, err)
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", diagnostic(&err));
            ExitCode::FAILURE
        }
    }
}
