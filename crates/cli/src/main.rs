//! fanatitra CLI - turn pasted delivery records into a receipt PDF

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

use fanatitra::{
    parse_content, validate_input, FixedFontResolver, FontPaths, FontResolver, HeightPolicy,
    OutputLocation, PdfConfig, ReceiptGenerator, SystemFontResolver,
};

#[derive(Parser, Debug)]
#[command(name = "fanatitra")]
#[command(version)]
#[command(about = "Compose a delivery receipt PDF from tab-separated records", long_about = None)]
struct Cli {
    /// Delivery zone printed as the heading
    #[arg(short, long)]
    zone: String,

    /// Records file, one delivery per line (stdin if omitted or "-")
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// JSON layout configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory (defaults to ~/Downloads)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Regular font file, skips font discovery
    #[arg(long, value_name = "FILE", requires = "font_bold")]
    font_regular: Option<PathBuf>,

    /// Bold font file, skips font discovery
    #[arg(long, value_name = "FILE", requires = "font_regular")]
    font_bold: Option<PathBuf>,

    /// Size the page to its content instead of a per-entry estimate
    #[arg(long)]
    measured_height: bool,

    /// Date printed on the receipt (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let content = read_content(cli.input.as_deref())?;
    validate_input(&cli.zone, &content)?;

    let config = load_config(&cli)?;
    let entries = parse_content(&content);
    log::info!("{} entries for zone {}", entries.len(), cli.zone);

    let fonts: Box<dyn FontResolver> = match (cli.font_regular, cli.font_bold) {
        (Some(regular), Some(bold)) => {
            Box::new(FixedFontResolver::new(FontPaths::new(regular, bold)))
        }
        _ => Box::new(SystemFontResolver::new()),
    };

    let mut generator = ReceiptGenerator::new(&config, fonts.as_ref());
    if let Some(dir) = cli.output_dir {
        generator = generator.with_output(OutputLocation::at(dir));
    }
    if let Some(date) = cli.date {
        generator = generator.with_date(date);
    }

    let receipt = generator
        .generate(cli.zone.trim(), &entries)
        .context("failed to generate receipt")?;

    println!("{}", receipt.path.display());
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<PdfConfig> {
    let mut config = match &cli.config {
        Some(path) => PdfConfig::from_json_file(path)?,
        None => PdfConfig::default(),
    };

    if cli.measured_height {
        config.height_policy = HeightPolicy::Measured;
    }

    Ok(config)
}

fn read_content(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            Ok(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal_args() {
        let cli = Cli::try_parse_from(["fanatitra", "--zone", "North", "records.tsv"]).unwrap();

        assert_eq!(cli.zone, "North");
        assert_eq!(cli.input, Some(PathBuf::from("records.tsv")));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.measured_height);
    }

    #[test]
    fn test_zone_is_required() {
        assert!(Cli::try_parse_from(["fanatitra", "records.tsv"]).is_err());
    }

    #[test]
    fn test_fonts_come_in_pairs() {
        let result =
            Cli::try_parse_from(["fanatitra", "-z", "North", "--font-regular", "r.ttf"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "fanatitra",
            "-z",
            "North",
            "--font-regular",
            "r.ttf",
            "--font-bold",
            "b.ttf",
        ])
        .unwrap();
        assert_eq!(cli.font_bold, Some(PathBuf::from("b.ttf")));
    }

    #[test]
    fn test_parse_date_and_verbosity() {
        let cli =
            Cli::try_parse_from(["fanatitra", "-z", "North", "--date", "2026-10-19", "-vv"])
                .unwrap();

        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2026, 10, 19));
        assert_eq!(cli.verbose, 2);

        assert!(Cli::try_parse_from(["fanatitra", "-z", "North", "--date", "19/10/2026"]).is_err());
    }

    #[test]
    fn test_measured_height_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{"page_width": 58}"#).unwrap();

        let cli = Cli::try_parse_from([
            "fanatitra",
            "-z",
            "North",
            "--config",
            path.to_str().unwrap(),
            "--measured-height",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.page_width, 58.0);
        assert_eq!(config.height_policy, HeightPolicy::Measured);
    }

    #[test]
    fn test_read_content_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.tsv");
        std::fs::write(&path, "1\tA\tB\tC\t10\n").unwrap();

        assert_eq!(read_content(Some(&path)).unwrap(), "1\tA\tB\tC\t10\n");
        assert!(read_content(Some(&dir.path().join("missing.tsv"))).is_err());
    }
}
