use tracing::info;

use service::company::CreateCompany;
use service::errors::ServiceError;

use crate::routes::DynCompanyService;

fn defaults() -> Vec<CreateCompany> {
    let company = |name: &str, ticker: &str, exchange: &str, isin: &str, website: Option<&str>| {
        CreateCompany {
            name: name.into(),
            stock_ticker: ticker.into(),
            exchange: exchange.into(),
            isin: isin.into(),
            website: website.map(Into::into),
        }
    };
    vec![
        company("Apple Inc.", "AAPL", "NASDAQ", "US0378331005", Some("http://www.apple.com")),
        company("British Airways Plc", "BAIRY", "Pink Sheets", "US1104193065", None),
        company("Heineken NV", "HEIA", "Euronext Amsterdam", "NL0000009165", None),
        company("Panasonic Corp", "6752", "Tokyo Stock Exchange", "JP3866800000", Some("http://www.panasonic.co.jp")),
        company("Porsche Automobil", "PAH3", "Deutsche Börse", "DE000PAH0038", Some("https://www.porsche.com/")),
    ]
}

/// Insert the default registry entries when the table is empty. Goes through
/// the service so the uniqueness check applies to this write path too.
pub async fn seed_if_empty(companies: &DynCompanyService) -> anyhow::Result<()> {
    if !companies.list_all().await?.is_empty() {
        return Ok(());
    }
    let mut seeded = 0usize;
    for input in defaults() {
        match companies.create(input).await {
            Ok(view) => {
                seeded += 1;
                info!(id = view.id, isin = %view.isin, name = %view.name, "seeded company");
            }
            // A concurrent instance may have seeded the same ISIN already.
            Err(ServiceError::Conflict(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }
    info!(seeded, "seed pass complete");
    Ok(())
}
