use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Parser;
use copypasta_ext::prelude::*;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use passgen::config::Config;
use passgen::form::PasswordForm;
use passgen::{CharacterClass, GeneratorError, Result};

const MAX_COUNT: u64 = 1000;

#[derive(Parser, Debug)]
#[command(name = "passgen", version, about = "Generate random passwords from selected character classes")]
struct Args {
    /// Password length
    #[arg(short = 'L', long)]
    length: Option<String>,

    /// Include lowercase letters
    #[arg(short, long)]
    lowercase: bool,

    /// Include uppercase letters
    #[arg(short, long)]
    uppercase: bool,

    /// Include numbers
    #[arg(short, long)]
    numbers: bool,

    /// Include symbols
    #[arg(short, long)]
    symbols: bool,

    /// Number of passwords to generate
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..=MAX_COUNT))]
    count: u64,

    /// Seed the random generator for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Copy the result to the clipboard instead of printing it
    #[arg(long)]
    copy: bool,

    /// Alternative config file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// Classes picked on the command line, or `None` to keep the configured ones.
    fn selected_classes(&self) -> Option<BTreeSet<CharacterClass>> {
        let flags = [
            (self.lowercase, CharacterClass::Lowercase),
            (self.uppercase, CharacterClass::Uppercase),
            (self.numbers, CharacterClass::Digit),
            (self.symbols, CharacterClass::Symbol),
        ];

        let classes: BTreeSet<CharacterClass> = flags
            .into_iter()
            .filter_map(|(enabled, class)| enabled.then_some(class))
            .collect();

        if classes.is_empty() { None } else { Some(classes) }
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let passwords = build_passwords(&args)?;
    let output = passwords.join("\n");

    if args.copy {
        copy_to_clipboard(&output)?;
        println!("Copied {} password(s) to the clipboard.", passwords.len());
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn build_passwords(args: &Args) -> Result<Vec<String>> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    debug!("using config {:?}", config);

    let mut form = PasswordForm::new(&config);
    let length = args.length.clone().unwrap_or_else(|| config.length.to_string());
    form.set_length(&length);

    if let Some(classes) = args.selected_classes() {
        form.set_classes(classes);
    }

    // clap bounds the count to 1..=MAX_COUNT
    let count = args.count as usize;

    match args.seed {
        Some(seed) => {
            info!("using seeded generator");
            generate_all(&mut form, &mut StdRng::seed_from_u64(seed), count)
        }
        None => generate_all(&mut form, &mut rand::rng(), count),
    }
}

fn generate_all<R: Rng>(form: &mut PasswordForm, rng: &mut R, count: usize) -> Result<Vec<String>> {
    (0..count)
        .map(|_| form.submit(rng).map(str::to_string))
        .collect()
}

fn copy_to_clipboard(contents: &str) -> Result<()> {
    let mut ctx = copypasta_ext::try_context()
        .ok_or_else(|| GeneratorError::Clipboard(String::from("no clipboard available")))?;

    ctx.set_contents(contents.to_string())
        .map_err(|e| GeneratorError::Clipboard(e.to_string()))?;

    Ok(())
}
