use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use wikigen::ProviderKind;

#[derive(clap::Parser)]
#[command(name = "wikigen", version, about = "Generate encyclopedia-style markdown documents")]
pub struct Cli {
    /// Settings file shared by every subcommand
    #[arg(long, env = "WIKIGEN_SETTINGS", default_value = "wikigen.json", global = true)]
    pub settings: PathBuf,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Overwrite a markdown file with a document generated from its file name
    Generate {
        file: PathBuf,
        #[arg(long)]
        provider: Option<Provider>,
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        gemini_api_key: Option<String>,
        /// JSON file with per-provider prompt templates
        #[arg(long)]
        templates: Option<PathBuf>,
    },
    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// List known model ids
    Models {
        #[arg(long)]
        provider: Option<Provider>,
    },
    /// Print the base url a custom endpoint resolves to
    Endpoint { url: Option<String> },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    Show,
    Set {
        #[arg(long)]
        provider: Option<Provider>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        gemini_api_key: Option<String>,
        #[arg(long)]
        gemini_model: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Provider {
    Openai,
    Gemini,
}

impl From<Provider> for ProviderKind {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Openai => ProviderKind::OpenAi,
            Provider::Gemini => ProviderKind::Gemini,
        }
    }
}
