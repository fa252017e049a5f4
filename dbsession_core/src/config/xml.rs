//! XML property lists: one root element holding `<property name="..">value</property>` children.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct XmlConfig {
    // other child elements are ignored; `overlapped-lists` lets them sit between properties
    #[serde(rename = "property", default)]
    properties: Vec<XmlProperty>,
}

#[derive(Debug, Deserialize)]
struct XmlProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "$text", default)]
    value: String,
}

/// Parses an XML property list into `(name, text)` pairs in document order.
///
/// The bytes are decoded per the document's encoding declaration. Text is
/// trimmed and inner whitespace runs are collapsed to one space.
pub fn parse(content: &[u8]) -> Result<Vec<(String, String)>, quick_xml::DeError> {
    let config: XmlConfig = quick_xml::de::from_reader(content)?;
    Ok(config
        .properties
        .into_iter()
        .map(|p| (p.name, collapse_whitespace(&p.value)))
        .collect())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
