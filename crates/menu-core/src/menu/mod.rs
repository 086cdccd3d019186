//! Restaurant menu document model.
//!
//! Only `restaurant.name` (non-empty) and `menus` are required at the top
//! level. Nested objects, when present, must carry their identifying fields;
//! a document that fails any of this is rejected as a whole.

mod parse;
pub mod price;

pub use parse::{parse_menu_document, DocumentError};

use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "COP".to_string()
}

fn default_locale() -> String {
    "es-CO".to_string()
}

/// Brand palette; every entry optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandColors {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub action: Option<String>,
    pub muted: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuImage {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub ingredients_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form marketing tags ("Nuevo", "Recomendado").
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub display: Option<bool>,
    #[serde(default)]
    pub image: Option<MenuImage>,
    #[serde(default)]
    pub image_thumbnail: Option<MenuImage>,
}

impl Item {
    /// Items are shown unless explicitly hidden.
    pub fn is_displayed(&self) -> bool {
        self.display.unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Category {
    /// Direct items followed by section items, in document order.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.items.iter()))
    }
}

/// One menu grouping (e.g. "Food", "Drinks").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuGroup {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInfo {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub colors: Option<BrandColors>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraLink {
    pub label: String,
    pub url: String,
}

/// The full displayable menu document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResource {
    #[serde(default)]
    pub version: Option<u32>,
    pub restaurant: RestaurantInfo,
    #[serde(default)]
    pub social_media: Vec<SocialLink>,
    #[serde(default)]
    pub additional_links: Vec<ExtraLink>,
    pub menus: Vec<MenuGroup>,
}

impl MenuResource {
    /// Display name used for the page title and listings.
    pub fn display_name(&self) -> &str {
        self.restaurant.name.trim()
    }

    pub fn item_count(&self) -> usize {
        self.menus
            .iter()
            .flat_map(|m| m.categories.iter())
            .map(|c| c.all_items().count())
            .sum()
    }
}
