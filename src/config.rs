use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::types::{CheckSpec, Method, Probe};

const DEFAULT_CATALOG: &str = include_str!("../config/catalog.toml");

/// A titled group of checks, reported under one header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(rename = "check", default)]
    pub checks: Vec<CheckSpec>,
}

/// Ordered list of sections making up one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "section", default)]
    pub sections: Vec<Section>,
}

impl Catalog {
    pub fn checks(&self) -> impl Iterator<Item = &CheckSpec> {
        self.sections.iter().flat_map(|s| s.checks.iter())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.checks().next().is_none() {
            bail!("Catalog contains no checks");
        }
        for section in &self.sections {
            for check in &section.checks {
                validate_check(check)
                    .with_context(|| format!("Invalid check '{}' in section '{}'", check.description, section.title))?;
            }
        }
        Ok(())
    }
}

fn validate_check(check: &CheckSpec) -> anyhow::Result<()> {
    if !check.path.starts_with('/') {
        bail!("path must start with '/': {:?}", check.path);
    }
    match check.probe {
        Probe::Schema if check.required_fields.is_empty() => {
            bail!("schema probe needs at least one required field")
        }
        Probe::Cors if check.method != Method::Options => {
            bail!("CORS probe must use OPTIONS, got {}", check.method)
        }
        _ => Ok(()),
    }
}

/// The catalog shipped with the binary.
pub fn default_catalog() -> anyhow::Result<Catalog> {
    parse_toml(DEFAULT_CATALOG).context("Failed to parse built-in catalog")
}

fn parse_toml(content: &str) -> anyhow::Result<Catalog> {
    let catalog: Catalog = toml::from_str(content)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Load a check catalog from a TOML or YAML file.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

    let catalog: Catalog = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML catalog: {}", path.display()))?,
        _ => toml::from_str(&content)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))?,
    };

    catalog.validate()?;
    Ok(catalog)
}

/// Use `path` when given, the built-in catalog otherwise.
pub fn resolve_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(p) => load_catalog(p),
        None => default_catalog(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Role, Target};
    use std::io::Write;

    #[test]
    fn test_default_catalog_order() {
        let catalog = default_catalog().unwrap();
        let paths: Vec<(Method, &str)> = catalog.checks().map(|c| (c.method, c.path.as_str())).collect();
        assert_eq!(
            paths,
            vec![
                (Method::Get, "/health"),
                (Method::Get, "/"),
                (Method::Get, "/api/blockchain/height"),
                (Method::Get, "/api/blockchain/blocks"),
                (Method::Get, "/api/blockchain/stats"),
                (Method::Post, "/api/transaction"),
                (Method::Get, "/api/mempool"),
                (Method::Get, "/api/mining/status"),
                (Method::Get, "/api/network/peers"),
                (Method::Get, "/api/network/info"),
                (Method::Get, "/api/health"),
                (Method::Get, "/api/stats"),
                (Method::Post, "/api/wallet/create"),
                (Method::Options, "/api/blockchain/stats"),
                (Method::Get, "/api/blockchain/stats"),
            ]
        );
    }

    #[test]
    fn test_default_catalog_connectivity_section() {
        let catalog = default_catalog().unwrap();
        let first = &catalog.sections[0];
        assert_eq!(first.checks.len(), 2);
        assert_eq!(first.checks[0].role, Role::Precondition);
        assert_eq!(first.checks[0].target, Target::Api);
        assert_eq!(first.checks[1].role, Role::Advisory);
        assert_eq!(first.checks[1].target, Target::Dashboard);
        assert!(first.checks.iter().all(|c| c.probe == Probe::Reachable));
    }

    #[test]
    fn test_default_catalog_schema_fields() {
        let catalog = default_catalog().unwrap();
        let schema = catalog.checks().find(|c| c.probe == Probe::Schema).unwrap();
        assert_eq!(
            schema.required_fields,
            vec!["height", "difficulty", "mempool_size", "total_blocks"]
        );
    }

    #[test]
    fn test_load_yaml_catalog() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            "section:\n  - title: Extra\n    check:\n      - description: Peers\n        path: /api/network/peers\n"
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.checks().count(), 1);
        let check = catalog.checks().next().unwrap();
        assert_eq!(check.method, Method::Get);
        assert_eq!(check.probe, Probe::Json);
        assert_eq!(check.role, Role::Standard);
    }

    #[test]
    fn test_rejects_relative_path() {
        let result = parse_toml("[[section]]\ntitle = \"x\"\n[[section.check]]\ndescription = \"bad\"\npath = \"api/stats\"\n");
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("must start with '/'"));
    }

    #[test]
    fn test_rejects_schema_without_fields() {
        let result = parse_toml(
            "[[section]]\ntitle = \"x\"\n[[section.check]]\ndescription = \"s\"\npath = \"/s\"\nprobe = \"schema\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_cors_without_options() {
        let result = parse_toml(
            "[[section]]\ntitle = \"x\"\n[[section.check]]\ndescription = \"c\"\npath = \"/c\"\nprobe = \"cors\"\n",
        );
        assert!(format!("{:#}", result.unwrap_err()).contains("OPTIONS"));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(parse_toml("").is_err());
    }

    #[test]
    fn test_missing_catalog_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }
}
