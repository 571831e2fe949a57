//! Core data structures for the moodrecipes application.
//!
//! A [`Recipe`] is the single persisted entity. Its serialized form uses the
//! camelCase field names of the stored collection (`howToCook`, `lastEdited`).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Mood labels offered when creating a recipe, in picker order.
pub const KNOWN_MOODS: [&str; 5] = ["Happy", "Sad", "Hungry", "Cool", "Stressed"];

/// Represents a single saved dish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier, assigned by the store on creation
    pub id: String,
    /// Recipe name
    #[serde(default)]
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Ingredients, one per line
    #[serde(rename = "recipe", default)]
    pub ingredients: String,
    /// Cooking steps, one per line, in order
    #[serde(default)]
    pub how_to_cook: String,
    /// Mood label used for filtering and suggestions
    #[serde(default)]
    pub mood: String,
    /// URI of the recipe picture
    #[serde(default)]
    pub image: String,
    /// Marked as favorite by the user
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub favorite: bool,
    /// Soft-delete flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Creation time, set by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Last edit time, set by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<DateTime<Utc>>,
    /// Stored fields this version does not know, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recipe that has not been stored yet, so it has no id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "recipe", default)]
    pub ingredients: String,
    #[serde(default)]
    pub how_to_cook: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<DateTime<Utc>>,
}

impl RecipeDraft {
    /// Creates a draft with the given name and mood, everything else empty
    pub fn new(name: impl Into<String>, mood: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mood: mood.into(),
            ..Self::default()
        }
    }

    /// Names of the fields the create form requires that are still blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        missing_fields(
            &self.name,
            &self.description,
            &self.ingredients,
            &self.how_to_cook,
            &self.mood,
            &self.image,
        )
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Turns the draft into a recipe with a freshly generated id
    pub(crate) fn into_recipe(self) -> Recipe {
        Recipe {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            description: self.description,
            ingredients: self.ingredients,
            how_to_cook: self.how_to_cook,
            mood: self.mood,
            image: self.image,
            favorite: self.favorite,
            hidden: self.hidden,
            date: self.date,
            last_edited: self.last_edited,
            extra: Map::new(),
        }
    }
}

impl From<Recipe> for RecipeDraft {
    fn from(recipe: Recipe) -> Self {
        Self {
            name: recipe.name,
            description: recipe.description,
            ingredients: recipe.ingredients,
            how_to_cook: recipe.how_to_cook,
            mood: recipe.mood,
            image: recipe.image,
            favorite: recipe.favorite,
            hidden: recipe.hidden,
            date: recipe.date,
            last_edited: recipe.last_edited,
        }
    }
}

impl Recipe {
    /// Whether the recipe shows up in default listings
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

fn missing_fields(
    name: &str,
    description: &str,
    ingredients: &str,
    how_to_cook: &str,
    mood: &str,
    image: &str,
) -> Vec<&'static str> {
    [
        ("name", name),
        ("description", description),
        ("recipe", ingredients),
        ("howToCook", how_to_cook),
        ("mood", mood),
        ("image", image),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect()
}
