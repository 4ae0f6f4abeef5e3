//! Rendering target the controller installs filters and markers into

use std::collections::BTreeMap;

use crate::constants::filter::CONTAINER_ID;

/// Consumer of filter markup and document-root marker attributes
pub trait RenderTarget {
    /// Replace the installed filter markup
    fn install_filter(&mut self, markup: &str);

    fn clear_filter(&mut self) {
        self.install_filter("");
    }

    fn set_attribute(&mut self, name: &str, value: &str);

    fn remove_attribute(&mut self, name: &str);
}

/// In-memory document root: installed markup plus root attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRoot {
    filter_markup: String,
    attributes: BTreeMap<String, String>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter_markup(&self) -> &str {
        &self.filter_markup
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Hidden zero-size SVG container holding the filter
    pub fn svg_container(&self) -> String {
        format!(
            r#"<svg id="{CONTAINER_ID}" style="position:absolute;width:0;height:0;pointer-events:none">{}</svg>"#,
            self.filter_markup
        )
    }

    /// Attributes as `name="value"` pairs in name order
    pub fn attribute_list(&self) -> Vec<String> {
        self.attributes
            .iter()
            .map(|(name, value)| format!("{name}=\"{value}\""))
            .collect()
    }
}

impl RenderTarget for DocumentRoot {
    fn install_filter(&mut self, markup: &str) {
        self.filter_markup = markup.to_string();
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }
}
