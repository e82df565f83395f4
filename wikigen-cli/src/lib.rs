use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use wikigen::{
    Dispatcher, HostAdapter, PromptTemplates, ProviderKind, ReqwestTransport, Settings,
    StatusLog, generate_active_document, resolve_base_url,
};

use crate::{
    cli::{Cli, Commands, SettingsCommands},
    host::{FileHost, SettingsOverride},
};

mod cli;
mod host;
pub mod telemetry;

pub async fn run() -> anyhow::Result<()> {
    let args = Cli::parse();

    match args.command {
        Some(Commands::Generate {
            file,
            provider,
            api_key,
            gemini_api_key,
            templates,
        }) => {
            let overrides = SettingsOverride {
                provider: provider.map(Into::into),
                api_key,
                gemini_api_key,
            };
            generate(&args.settings, file, overrides, templates.as_deref()).await?;
        }
        Some(Commands::Settings { command }) => {
            let host = FileHost::new(&args.settings);
            match command {
                SettingsCommands::Show => show_settings(&host).await?,
                SettingsCommands::Set {
                    provider,
                    api_key,
                    model,
                    api_url,
                    gemini_api_key,
                    gemini_model,
                } => {
                    let mut settings = host.load_settings().await?;
                    if let Some(provider) = provider {
                        settings.provider = provider.into();
                    }
                    replace(&mut settings.api_key, api_key);
                    replace(&mut settings.model, model);
                    replace(&mut settings.api_url, api_url);
                    replace(&mut settings.gemini_api_key, gemini_api_key);
                    replace(&mut settings.gemini_model, gemini_model);
                    host.save_settings(&settings).await?;
                    println!("Saved {}", args.settings.display());
                }
            }
        }
        Some(Commands::Models { provider }) => {
            let providers = match provider {
                Some(provider) => vec![provider.into()],
                None => vec![ProviderKind::OpenAi, ProviderKind::Gemini],
            };
            for provider in providers {
                println!("{}:", provider.display_name());
                for model in provider.known_models() {
                    println!("  {model}");
                }
            }
        }
        Some(Commands::Endpoint { url }) => {
            println!("{}", resolve_base_url(url.as_deref()));
        }
        None => {
            Cli::command().print_long_help()?;
        }
    }

    Ok(())
}

async fn generate(
    settings_path: &Path,
    file: PathBuf,
    overrides: SettingsOverride,
    templates: Option<&Path>,
) -> anyhow::Result<()> {
    let host = FileHost::new(settings_path)
        .with_document(file)
        .with_overrides(overrides);

    let templates = match templates {
        Some(path) => PromptTemplates::from_json(&tokio::fs::read_to_string(path).await?)?,
        None => PromptTemplates::default(),
    };
    let dispatcher = Dispatcher::new(ReqwestTransport::new()?).with_templates(templates);

    let mut status = StatusLog::new();
    let outcome = generate_active_document(&host, &dispatcher, &mut status).await;
    if let Some(entry) = status.last() {
        println!("{}", entry.message);
    }

    if !outcome.is_saved() {
        anyhow::bail!("generation did not complete: {outcome:?}");
    }
    Ok(())
}

async fn show_settings(host: &FileHost) -> anyhow::Result<()> {
    let settings = host.load_settings().await?;
    let masked = Settings {
        api_key: mask_secret(&settings.api_key),
        gemini_api_key: mask_secret(&settings.gemini_api_key),
        ..settings
    };
    println!("{}", serde_json::to_string_pretty(&masked)?);
    Ok(())
}

fn replace(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Keeps the last four characters of long secrets.
fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 8 {
        return "*".repeat(len);
    }
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("{}{tail}", "*".repeat(len - 4))
}

#[cfg(test)]
mod tests {
    use crate::mask_secret;

    #[test]
    fn masks_all_but_tail() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret("sk-abcdefgh1234"), "***********1234");
    }
}
