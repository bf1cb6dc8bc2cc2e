use bazaar_agent::ChatCompletionsClient;
use bazaar_core::config::{AppConfig, LoadOptions};
use bazaar_marketplace::MarketplaceClient;
use secrecy::ExposeSecret;
use serde::Serialize;

use super::{escape_json, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const DEPENDENT_CHECKS: [&str; 5] = [
    "inference_credentials",
    "marketplace_token",
    "config_validation",
    "inference_client",
    "marketplace_client",
];

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report(AppConfig::resolve(LoadOptions::default()));
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    if json_output {
        let output = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult { exit_code, output };
    }

    CommandResult { exit_code, output: render_human(&report) }
}

// Credential checks run on the resolved config before validation so each
// missing secret is reported on its own line.
fn build_report<E: std::fmt::Display>(resolved: Result<AppConfig, E>) -> DoctorReport {
    let mut checks = Vec::new();

    match resolved {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_resolution",
                status: CheckStatus::Pass,
                details: "config file and environment resolved".to_string(),
            });
            checks.push(check_inference_credentials(&config));
            checks.push(check_marketplace_token(&config));
            match config.validate() {
                Ok(()) => {
                    checks.push(DoctorCheck {
                        name: "config_validation",
                        status: CheckStatus::Pass,
                        details: "configuration validated".to_string(),
                    });
                    checks.push(check_inference_client(&config));
                    checks.push(check_marketplace_client(&config));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "config_validation",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.extend(skipped(&DEPENDENT_CHECKS[3..], "configuration is invalid"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_resolution",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(skipped(&DEPENDENT_CHECKS, "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn skipped(names: &[&'static str], reason: &str) -> Vec<DoctorCheck> {
    names
        .iter()
        .map(|&name| DoctorCheck {
            name,
            status: CheckStatus::Skipped,
            details: format!("skipped because {reason}"),
        })
        .collect()
}

fn check_inference_credentials(config: &AppConfig) -> DoctorCheck {
    let provider = config.llm.provider;
    let has_key =
        config.llm.api_key.as_ref().is_some_and(|key| !key.expose_secret().trim().is_empty());

    let (status, details) = match (has_key, provider.requires_api_key()) {
        (true, _) => (CheckStatus::Pass, format!("api key present for {provider:?}")),
        (false, false) => (CheckStatus::Pass, format!("{provider:?} does not require an api key")),
        (false, true) => (
            CheckStatus::Fail,
            format!("{provider:?} requires an api key (set BAZAAR_LLM_API_KEY)"),
        ),
    };
    DoctorCheck { name: "inference_credentials", status, details }
}

fn check_marketplace_token(config: &AppConfig) -> DoctorCheck {
    if config.marketplace.token.expose_secret().trim().is_empty() {
        return DoctorCheck {
            name: "marketplace_token",
            status: CheckStatus::Fail,
            details: "marketplace token missing (set BAZAAR_MARKETPLACE_TOKEN)".to_string(),
        };
    }
    DoctorCheck {
        name: "marketplace_token",
        status: CheckStatus::Pass,
        details: "marketplace token present".to_string(),
    }
}

fn check_inference_client(config: &AppConfig) -> DoctorCheck {
    match ChatCompletionsClient::from_config(&config.llm) {
        Ok(_) => DoctorCheck {
            name: "inference_client",
            status: CheckStatus::Pass,
            details: format!("model `{}` at {}", config.llm.model, config.llm.base_url),
        },
        Err(error) => DoctorCheck {
            name: "inference_client",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_marketplace_client(config: &AppConfig) -> DoctorCheck {
    match MarketplaceClient::from_config(&config.marketplace) {
        Ok(_) => DoctorCheck {
            name: "marketplace_client",
            status: CheckStatus::Pass,
            details: format!("search endpoint {}", config.marketplace.search_url),
        },
        Err(error) => DoctorCheck {
            name: "marketplace_client",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
