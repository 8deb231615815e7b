use serde::Serialize;

use crate::check::join_url;
use crate::config::Catalog;
use crate::types::{Method, Probe, Role, Target};

/// One catalog row, flattened for display.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub section: String,
    pub description: String,
    pub method: Method,
    pub url: String,
    pub role: Role,
    pub probe: Probe,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<String>,
}

pub fn entries(catalog: &Catalog, api_url: &str, dashboard_url: &str) -> Vec<CatalogEntry> {
    catalog
        .sections
        .iter()
        .flat_map(|section| {
            section.checks.iter().map(move |check| {
                let base = match check.target {
                    Target::Api => api_url,
                    Target::Dashboard => dashboard_url,
                };
                CatalogEntry {
                    section: section.title.clone(),
                    description: check.description.clone(),
                    method: check.method,
                    url: join_url(base, &check.path),
                    role: check.role,
                    probe: check.probe,
                    required_fields: check.required_fields.clone(),
                }
            })
        })
        .collect()
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Precondition => "required",
        Role::Standard => "",
        Role::Advisory => "advisory",
    }
}

fn probe_label(probe: Probe) -> &'static str {
    match probe {
        Probe::Reachable => "reachable",
        Probe::Json => "json",
        Probe::Cors => "cors",
        Probe::Schema => "schema",
    }
}

/// Print a human-readable table of catalog entries.
pub fn print_table(entries: &[CatalogEntry]) {
    println!(
        "{:<8} {:<45} {:<10} {:<9} {}",
        "METHOD", "URL", "PROBE", "ROLE", "DESCRIPTION"
    );
    println!(
        "{:<8} {:<45} {:<10} {:<9} {}",
        "------", "---", "-----", "----", "-----------"
    );
    for e in entries {
        println!(
            "{:<8} {:<45} {:<10} {:<9} {}",
            e.method.to_string(),
            e.url,
            probe_label(e.probe),
            role_label(e.role),
            e.description
        );
    }
}

/// Print catalog entries as JSON.
pub fn print_json(entries: &[CatalogEntry]) {
    match serde_json::to_string_pretty(entries) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing JSON: {e}"),
    }
}
