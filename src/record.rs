//! Dataset records as returned by the federated search API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::Result;

/// One search result. Fields this crate does not read are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Federated catalog id, unique per source site and dataset.
    pub xckan_id: String,
    pub xckan_title: String,
    /// Root URL of the portal the dataset was harvested from.
    pub xckan_site_url: String,
    /// CKAN package id on the source portal.
    #[serde(default)]
    pub id: Option<String>,
    /// CKAN package name on the source portal.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Dataset {
    /// Parse a JSON array of records.
    pub fn from_json_array(json: &str) -> Result<Vec<Dataset>> {
        Ok(serde_json::from_str(json)?)
    }

    /// `(id, name)` when both are present and non-empty.
    pub fn package_key(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.id)?, non_empty(&self.name)?))
    }

    /// Host name of the source portal, if the site URL parses.
    pub fn site_hostname(&self) -> Option<String> {
        site_hostname(&self.xckan_site_url)
    }
}

/// Host name of `url_str`, lowercased by URL parsing.
pub fn site_hostname(url_str: &str) -> Option<String> {
    let parsed = Url::parse(url_str.trim()).ok()?;
    parsed.host_str().map(str::to_string)
}
