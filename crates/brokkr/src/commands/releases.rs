//! Releases command

use anyhow::Result;
use brokkr_catalog::{CatalogRefresher, ReleaseCatalog};
use brokkr_core::types::Release;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::ReleasesArgs;
use crate::output;

pub async fn run(args: ReleasesArgs) -> Result<()> {
    let catalog = ReleaseCatalog::baseline()?;
    if args.refresh {
        let spinner = output::spinner("Refreshing release catalog...");
        CatalogRefresher::new().refresh(&catalog).await;
        spinner.finish_and_clear();
        if !args.json {
            output::success("Release catalog refreshed");
        }
    }

    let releases: Vec<Release> = catalog
        .get_all()
        .iter()
        .filter(|r| args.include_dev || !r.is_dev())
        .cloned()
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&releases)?);
        return Ok(());
    }

    let today = chrono::Utc::now().date_naive();
    let rows: Vec<ReleaseRow> = releases
        .iter()
        .map(|r| ReleaseRow {
            version: r.version.to_string(),
            release_type: format!("{:?}", r.release_type).to_lowercase(),
            released: r
                .release_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            security_until: r
                .security_support_until
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            php: r.php_range.clone().unwrap_or_else(|| "-".to_string()),
            status: if r.is_security_supported(today) {
                "supported".to_string()
            } else {
                "EOL".to_string()
            },
        })
        .collect();

    output::header("Known TYPO3 releases");
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Tabled)]
struct ReleaseRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Type")]
    release_type: String,
    #[tabled(rename = "Released")]
    released: String,
    #[tabled(rename = "Security until")]
    security_until: String,
    #[tabled(rename = "PHP")]
    php: String,
    #[tabled(rename = "Status")]
    status: String,
}
