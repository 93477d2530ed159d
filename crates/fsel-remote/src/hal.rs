//! Just enough of the API v3 HAL collection shape to read option identity
//! and label. Everything else in the payload is ignored.

use fsel_core::SelectOption;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Collection {
    #[serde(rename = "_embedded", default)]
    embedded: Embedded,
}

#[derive(Debug, Default, Deserialize)]
struct Embedded {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(rename = "_links", default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(rename = "self", default)]
    this: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl Collection {
    /// Elements without a self href have no identity and are skipped.
    pub(crate) fn into_options(self) -> Vec<SelectOption> {
        self.embedded
            .elements
            .into_iter()
            .filter_map(Element::into_option)
            .collect()
    }
}

impl Element {
    fn into_option(self) -> Option<SelectOption> {
        let link = self.links.this?;
        let href = link.href?;
        let label = self
            .name
            .or(self.subject)
            .or(link.title)
            .unwrap_or_else(|| href.clone());
        let id = self.id.map(|id| match id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        Some(SelectOption { href, id, label })
    }
}
