//! Offline scoring: normalizes a saved model answer (or none) against an ad
//! file and prints the resulting assessment.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use common::config::Config;
use scoring::model::RawAd;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ad JSON, either the bare ad or a `{"data": ...}` request body
    #[arg(long)]
    ad: PathBuf,

    /// Raw model output to normalize; heuristic only when omitted
    #[arg(long)]
    model_output: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn read_ad(path: &PathBuf) -> Result<RawAd> {
    let text = fs::read_to_string(path).with_context(|| format!("reading ad {:?}", path))?;
    let mut value: Value = serde_json::from_str(&text).with_context(|| format!("parsing ad {:?}", path))?;

    if let Some(data) = value.get_mut("data").map(Value::take) {
        value = data;
    }
    if value.is_null() {
        bail!("ad file {:?} holds no ad", path);
    }

    let ad: RawAd = serde_json::from_value(value).context("ad does not match the expected shape")?;
    ad.validate()?;
    Ok(ad)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let ad = read_ad(&args.ad)?;
    let model_output = args
        .model_output
        .as_ref()
        .map(|path| fs::read_to_string(path).with_context(|| format!("reading model output {:?}", path)))
        .transpose()?;

    let normalizer = classifieds::build_normalizer(&config)?;
    let assessment = normalizer.normalize(model_output.as_deref(), &ad);

    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}
