use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::form::FormSnapshot;

pub const CURRENCY: &str = "Rs.";
pub const PLACEHOLDER_PRICE: &str = "Rs. --";

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("invalid price endpoint {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("price request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("price endpoint returned HTTP {0}")]
    Status(u16),
    #[error("could not decode price response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("price worker stopped without a reply")]
    Worker,
}

/// Anything that can turn a form snapshot into a price.
pub trait PriceEstimator: Send + Sync {
    fn estimate(&self, snapshot: &FormSnapshot) -> Result<f64, EstimateError>;
}

#[derive(Debug, Default, Deserialize)]
struct PriceResponse {
    price: Option<f64>,
    predicted_price: Option<f64>,
}

impl PriceResponse {
    fn value(&self) -> f64 {
        self.price.or(self.predicted_price).unwrap_or(0.0)
    }
}

pub struct HttpEstimator {
    client: Client,
    endpoint: String,
}

impl HttpEstimator {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, EstimateError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(EstimateError::Transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl PriceEstimator for HttpEstimator {
    fn estimate(&self, snapshot: &FormSnapshot) -> Result<f64, EstimateError> {
        let url = price_url(&self.endpoint, snapshot)?;
        debug!(%url, "requesting price");

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(EstimateError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EstimateError::Status(status.as_u16()));
        }

        let body: PriceResponse = response.json().map_err(EstimateError::Decode)?;
        let price = body.value();
        info!(price, "price estimate received");
        Ok(price)
    }
}

/// Endpoint with every non-empty snapshot entry appended as a query parameter.
pub fn price_url(endpoint: &str, snapshot: &FormSnapshot) -> Result<Url, EstimateError> {
    Url::parse_with_params(endpoint, snapshot.query_pairs()).map_err(|e| EstimateError::InvalidUrl {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Groups the integer digits in threes: `1234567` becomes `1,234,567`.
pub fn format_price(price: f64) -> String {
    let text = price.to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn price_label(price: f64) -> String {
    format!("{CURRENCY} {}", format_price(price))
}
