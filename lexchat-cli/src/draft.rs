//! `lexchat draft` subcommands

use anyhow::Result;
use clap::Args;
use console::style;
use lexchat_core::config::Config;
use lexchat_remote::{DomicileCertificateRequest, DraftingClient};

#[derive(Args, Debug)]
pub struct DomicileArgs {
    /// Applicant's full name
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub father_name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub state: String,
    /// Years the applicant has lived in the state
    #[arg(long)]
    pub years: u32,
    #[arg(long)]
    pub purpose: String,
    /// Issuing authority
    #[arg(long)]
    pub authority: String,
    /// Issue date, today when omitted
    #[arg(long)]
    pub issue_date: Option<String>,
    /// Template stored on the drafting service
    #[arg(long)]
    pub template: Option<String>,
}

impl DomicileArgs {
    fn into_request(self) -> (Option<String>, DomicileCertificateRequest) {
        let issue_date = self
            .issue_date
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
        let request = DomicileCertificateRequest {
            name: self.name,
            father_name: self.father_name,
            address: self.address,
            state: self.state,
            years_of_residence: self.years,
            purpose: self.purpose,
            issue_date,
            authority: self.authority,
        };
        (self.template, request)
    }
}

pub async fn run_domicile(config: &Config, args: DomicileArgs) -> Result<()> {
    let client = DraftingClient::from_config(&config.drafter)?;
    let (template, request) = args.into_request();
    let template = template.unwrap_or_else(|| config.drafter.default_template.clone());

    let receipt = client
        .generate_domicile_certificate(&template, &request)
        .await?;

    if let Some(text) = &receipt.certificate {
        println!("{}\n", text);
    }
    println!("{} {}", style("PDF:").green().bold(), receipt.pdf_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(issue_date: Option<&str>) -> DomicileArgs {
        DomicileArgs {
            name: "Asha Rao".to_string(),
            father_name: "Ravi Rao".to_string(),
            address: "12 MG Road".to_string(),
            state: "Maharashtra".to_string(),
            years: 15,
            purpose: "Admission".to_string(),
            authority: "Tehsildar".to_string(),
            issue_date: issue_date.map(ToString::to_string),
            template: None,
        }
    }

    #[test]
    fn test_explicit_issue_date_kept() {
        let (template, request) = args(Some("2026-01-02")).into_request();
        assert!(template.is_none());
        assert_eq!(request.issue_date, "2026-01-02");
        assert_eq!(request.years_of_residence, 15);
    }

    #[test]
    fn test_issue_date_defaults_to_today() {
        let (_, request) = args(None).into_request();
        assert_eq!(request.issue_date.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&request.issue_date, "%Y-%m-%d").is_ok());
    }
}
