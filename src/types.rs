//! Shared types for the moodrecipes application.
//!
//! This module holds the crate-wide `Result` alias, the outcome of
//! id-matched writes, and the CLI subcommands.
use clap::Subcommand;

use crate::RecipeError;

/// A specialized Result type for moodrecipes operations.
pub type Result<T> = std::result::Result<T, RecipeError>;

/// Outcome of a write that targets an existing recipe by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A recipe with the id existed and the change was applied
    Applied,
    /// No recipe with the id exists; nothing was written
    NotFound,
}

/// Available subcommands for the moodrecipes application
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new recipe
    Add {
        /// Name of the recipe
        #[clap(short, long)]
        name: Option<String>,

        /// Short description
        #[clap(short, long)]
        description: Option<String>,

        /// Ingredients, separated by newlines or ';'
        #[clap(short, long)]
        ingredients: Option<String>,

        /// Cooking steps, separated by newlines or ';'
        #[clap(short, long)]
        steps: Option<String>,

        /// Mood the recipe fits (Happy, Sad, Hungry, Cool, Stressed, ...)
        #[clap(short, long)]
        mood: Option<String>,

        /// Path or URI of the recipe image
        #[clap(long)]
        image: Option<String>,

        /// Write ingredients and steps in the editor
        #[clap(short, long)]
        edit: bool,

        /// Save even if some fields are empty
        #[clap(short, long)]
        force: bool,
    },

    /// List recipes
    List {
        /// Only recipes with this mood
        #[clap(short, long)]
        mood: Option<String>,

        /// Only favorite recipes
        #[clap(short, long, conflicts_with_all = ["hidden", "all"])]
        favorites: bool,

        /// Only removed (hidden) recipes
        #[clap(long, conflicts_with = "all")]
        hidden: bool,

        /// Include removed recipes
        #[clap(short, long)]
        all: bool,

        /// Limit the number of recipes shown (0 shows all)
        #[clap(short = 'n', long, default_value_t = 0)]
        limit: usize,

        /// Show ingredients and steps of every recipe
        #[clap(short, long)]
        detailed: bool,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// View a recipe by ID
    View {
        /// ID of the recipe to view
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing recipe
    Edit {
        /// ID of the recipe to edit
        id: String,

        #[clap(short, long)]
        name: Option<String>,

        #[clap(short, long)]
        description: Option<String>,

        #[clap(short, long)]
        ingredients: Option<String>,

        #[clap(short, long)]
        steps: Option<String>,

        #[clap(short, long)]
        mood: Option<String>,

        #[clap(long)]
        image: Option<String>,

        /// Edit ingredients and steps in the editor
        #[clap(short, long)]
        edit: bool,
    },

    /// Toggle the favorite flag of a recipe
    Favorite {
        /// ID of the recipe
        id: String,
    },

    /// Move a recipe to "recently removed"
    Hide {
        /// ID of the recipe
        id: String,
    },

    /// Bring back a removed recipe
    Restore {
        /// ID of the recipe
        id: String,
    },

    /// Permanently delete a recipe
    Delete {
        /// ID of the recipe to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Search visible recipes by name
    Search {
        /// Text contained in the recipe name
        query: String,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Pick a random recipe for a mood
    Suggest {
        /// Mood to pick a recipe for
        mood: String,
    },

    /// Show how many recipes each mood has
    Moods,

    /// View or change app settings
    Settings {
        /// Show current settings
        #[clap(short = 'S', long)]
        show: bool,

        /// Change a setting, as key=value
        #[clap(short, long)]
        set: Option<String>,

        /// Reset settings to defaults
        #[clap(short, long)]
        reset: bool,
    },
}
