//! Command handlers.
//!
//! `schema`, `config` and resource validation work offline; every other
//! command signs in once and dispatches through the provider facade.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use ipm_config::Config;
use ipm_core::{Diagnostic, Provider, Registry};
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{ConfigCommand, DataArgs, GlobalOpts, Operation, ResourceArgs};
use crate::error::CliError;

// ── Input / output ──────────────────────────────────────────────────

/// Read a JSON document from a file, or stdin for `-`.
fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Read {
                path: "stdin".into(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        })?
    };
    Ok(serde_json::from_str(&text)?)
}

fn document(
    path: Option<&PathBuf>,
    operation: &'static str,
    flag: &'static str,
) -> Result<Value, CliError> {
    let path = path.ok_or(CliError::MissingArgument { operation, flag })?;
    read_json(path)
}

fn print(value: &impl serde::Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Provider block ──────────────────────────────────────────────────

fn config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(ipm_config::config_path)
}

fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_path(global);
    let mut cfg = ipm_config::load_config_from(&path).map_err(|source| CliError::Config {
        path: path.display().to_string(),
        source,
    })?;
    if global.insecure {
        cfg.insecure = true;
        cfg.ca_cert = None;
    }
    Ok(cfg)
}

async fn sign_in(global: &GlobalOpts) -> Result<Provider, CliError> {
    let cfg = load(global)?;
    let provider_config = ipm_config::to_provider_config(&cfg).map_err(|source| CliError::Config {
        path: config_path(global).display().to_string(),
        source,
    })?;
    debug!(host = %provider_config.host, "configuring provider");
    Ok(Provider::configure(&provider_config).await?)
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn schema() -> Result<(), CliError> {
    print(&Registry::new().schema())
}

pub fn config(command: &ConfigCommand, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = load(global)?;
    let to_cli = |source| CliError::Config {
        path: config_path(global).display().to_string(),
        source,
    };
    match command {
        ConfigCommand::Show => {
            print!("{}", cfg.to_toml().map_err(to_cli)?);
            Ok(())
        }
        ConfigCommand::SetPassword => {
            let mut password = String::new();
            std::io::stdin()
                .read_line(&mut password)
                .map_err(|source| CliError::Read {
                    path: "stdin".into(),
                    source,
                })?;
            ipm_config::store_password(&cfg.host, &cfg.username, password.trim_end_matches(['\r', '\n']))
                .map_err(to_cli)?;
            eprintln!("Password stored for {}@{}", cfg.username, cfg.host);
            Ok(())
        }
    }
}

fn invalid(diagnostics: &[Diagnostic]) -> CliError {
    let details = diagnostics
        .iter()
        .map(|d| format!("  {}: {}", d.summary, d.detail))
        .collect::<Vec<_>>()
        .join("\n");
    CliError::Invalid {
        count: diagnostics.len(),
        details,
    }
}

pub async fn resource(args: &ResourceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.operation == Operation::Validate {
        let plan = document(args.plan.as_ref(), "validate", "--plan")?;
        let diagnostics = Registry::new().validate(&args.type_name, &plan);
        if diagnostics.is_empty() {
            return print(&json!({"valid": true}));
        }
        return Err(invalid(&diagnostics));
    }

    let provider = sign_in(global).await?;
    let name = args.type_name.as_str();
    match args.operation {
        Operation::Validate => Ok(()),
        Operation::Create => {
            let plan = document(args.plan.as_ref(), "create", "--plan")?;
            let diagnostics = provider.validate(name, &plan);
            if !diagnostics.is_empty() {
                return Err(invalid(&diagnostics));
            }
            print(&provider.create(name, plan).await?)
        }
        Operation::Read => {
            let prior = document(args.prior.as_ref(), "read", "--prior")?;
            // `null` tells the caller the object is gone.
            print(&provider.read(name, prior).await?)
        }
        Operation::Update => {
            let plan = document(args.plan.as_ref(), "update", "--plan")?;
            let prior = document(args.prior.as_ref(), "update", "--prior")?;
            print(&provider.update(name, plan, prior).await?)
        }
        Operation::Delete => {
            let prior = document(args.prior.as_ref(), "delete", "--prior")?;
            provider.delete(name, prior).await?;
            print(&Value::Null)
        }
        Operation::Import => {
            let id = args.id.as_deref().ok_or(CliError::MissingArgument {
                operation: "import",
                flag: "--id",
            })?;
            print(&provider.import(name, id).await?)
        }
    }
}

pub async fn data(args: &DataArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let query = match args.query.as_ref() {
        Some(path) => read_json(path)?,
        None => json!({}),
    };
    let provider = sign_in(global).await?;
    print(&provider.read_data(&args.type_name, query).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn reads_json_documents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"config": {{"name": "nc1"}}}}"#).unwrap();
        let value = read_json(file.path()).unwrap();
        assert_eq!(value["config"]["name"], json!("nc1"));
    }

    #[test]
    fn missing_document_names_the_flag() {
        let err = document(None, "update", "--prior").unwrap_err();
        assert_eq!(err.to_string(), "`update` needs --prior");
    }

    #[test]
    fn malformed_document_is_a_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(read_json(file.path()), Err(CliError::Json(_))));
    }
}
