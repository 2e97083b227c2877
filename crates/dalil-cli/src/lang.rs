use clap::Subcommand;
use dalil_core::{AppConfig, Language};
use dalil_store::{FileStore, PreferenceStore};

/// Sub-commands available under `lang`.
#[derive(Debug, Subcommand)]
pub enum LangCommands {
    /// Print the active display language
    Show,
    /// Switch to the other display language
    Toggle,
    /// Set the display language
    Set {
        #[arg(value_parser = parse_language)]
        language: Language,
    },
}

pub(crate) fn parse_language(s: &str) -> Result<Language, String> {
    Language::from_token(s).ok_or_else(|| format!("expected 'primary' or 'secondary', got '{s}'"))
}

pub(crate) fn run_lang(config: &AppConfig, command: &LangCommands) {
    let preferences = PreferenceStore::new(FileStore::new(&config.cache_dir));
    let language = match command {
        LangCommands::Show => preferences.load(),
        LangCommands::Toggle => {
            let next = preferences.load().toggle();
            preferences.save(next);
            next
        }
        LangCommands::Set { language } => {
            preferences.save(*language);
            *language
        }
    };
    println!("{language}");
}
