//! CLI module for the moodrecipes application
//!
//! This module handles the command-line interface for interacting with the
//! recipe store. Each subcommand plays the part of one of the app screens.
use std::{
    fs::{read_to_string, write},
    io::{stdin, stdout, Write},
    path::Path,
    process::Command,
};

use chrono::Utc;
use log::{info, warn};
use shell_words::split;
use tempfile::Builder;

use crate::{
    cooking_steps, editor_template, ingredient_list, parse_editor_content, parse_list_input,
    Commands, Config, PreferenceStore, Recipe, RecipeDraft, RecipeError, RecipeStore, Result,
    WriteOutcome, KNOWN_MOODS,
};

/// Field values given on the command line for add and edit
#[derive(Debug, Default)]
struct RecipeFields {
    name: Option<String>,
    description: Option<String>,
    ingredients: Option<String>,
    steps: Option<String>,
    mood: Option<String>,
    image: Option<String>,
}

/// Filters and output options of the list command
#[derive(Debug, Default)]
struct ListOptions {
    mood: Option<String>,
    favorites: bool,
    hidden: bool,
    all: bool,
    limit: usize,
    detailed: bool,
    json: bool,
}

impl ListOptions {
    fn matches(&self, recipe: &Recipe) -> bool {
        let shown = if self.hidden {
            recipe.hidden
        } else if self.favorites {
            recipe.favorite && recipe.is_visible()
        } else {
            self.all || recipe.is_visible()
        };
        match &self.mood {
            Some(mood) => shown && &recipe.mood == mood,
            None => shown,
        }
    }
}

/// CLI Application handler - processes CLI commands and interfaces with RecipeStore
pub struct App {
    /// The recipe store backend
    store: RecipeStore,

    /// App settings, kept next to the recipes
    preferences: PreferenceStore,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application with the given stores and config
    pub fn new(
        store: RecipeStore,
        preferences: PreferenceStore,
        config: Config,
        verbose: bool,
    ) -> Self {
        Self {
            store,
            preferences,
            config,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                name,
                description,
                ingredients,
                steps,
                mood,
                image,
                edit,
                force,
            } => {
                let fields = RecipeFields {
                    name,
                    description,
                    ingredients,
                    steps,
                    mood,
                    image,
                };
                self.handle_add(fields, edit, force).await?;
            }

            Commands::List {
                mood,
                favorites,
                hidden,
                all,
                limit,
                detailed,
                json,
            } => {
                let options = ListOptions {
                    mood,
                    favorites,
                    hidden,
                    all,
                    limit,
                    detailed,
                    json,
                };
                self.handle_list(options).await?
            }

            Commands::View { id, json } => self.handle_view(&id, json).await?,

            Commands::Edit {
                id,
                name,
                description,
                ingredients,
                steps,
                mood,
                image,
                edit,
            } => {
                let fields = RecipeFields {
                    name,
                    description,
                    ingredients,
                    steps,
                    mood,
                    image,
                };
                self.handle_edit(&id, fields, edit).await?;
            }

            Commands::Favorite { id } => self.handle_favorite(&id).await?,

            Commands::Hide { id } => self.handle_hide(&id).await?,

            Commands::Restore { id } => self.handle_restore(&id).await?,

            Commands::Delete { id, force } => self.handle_delete(&id, force).await?,

            Commands::Search { query, json } => self.handle_search(&query, json).await?,

            Commands::Suggest { mood } => self.handle_suggest(&mood).await?,

            Commands::Moods => self.handle_moods().await,

            Commands::Settings { show, set, reset } => {
                self.handle_settings(show, set, reset).await?
            }
        }

        Ok(())
    }

    async fn handle_add(&self, fields: RecipeFields, open_editor: bool, force: bool) -> Result<()> {
        let mood = fields
            .mood
            .unwrap_or_else(|| self.config.default_mood.clone());
        self.warn_unknown_mood(&mood);

        let mut draft = RecipeDraft {
            name: fields.name.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            ingredients: fields
                .ingredients
                .as_deref()
                .map(parse_list_input)
                .unwrap_or_default(),
            how_to_cook: fields
                .steps
                .as_deref()
                .map(parse_list_input)
                .unwrap_or_default(),
            mood,
            image: fields.image.unwrap_or_default(),
            date: Some(Utc::now()),
            ..RecipeDraft::default()
        };

        if open_editor {
            let (ingredients, steps) =
                self.edit_lists(&draft.name, &draft.ingredients, &draft.how_to_cook)?;
            draft.ingredients = ingredients;
            draft.how_to_cook = steps;
        }

        if !draft.is_complete() && !force {
            return Err(RecipeError::InvalidRecipe {
                message: format!(
                    "Please fill out all fields and select an image (missing: {}). Use --force to save anyway.",
                    draft.missing_fields().join(", ")
                ),
            });
        }

        let recipe = self.store.add(draft).await?;
        println!("Recipe created with ID: {}", recipe.id);
        Ok(())
    }

    async fn handle_list(&self, options: ListOptions) -> Result<()> {
        // Unreadable storage is an error here, never an empty list
        let mut recipes: Vec<Recipe> = self
            .store
            .try_list()
            .await?
            .into_iter()
            .filter(|r| options.matches(r))
            .collect();

        // 0 means no limit
        if options.limit > 0 && recipes.len() > options.limit {
            recipes.truncate(options.limit);
        }

        self.display_recipes(&recipes, options.json, options.detailed)
    }

    async fn handle_view(&self, id: &str, json: bool) -> Result<()> {
        let recipe = self.find(id).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        } else {
            self.display_recipe(&recipe, true);
        }
        Ok(())
    }

    async fn handle_edit(&self, id: &str, fields: RecipeFields, open_editor: bool) -> Result<()> {
        let mut recipe = self.find(id).await?;

        if let Some(name) = fields.name {
            recipe.name = name;
        }
        if let Some(description) = fields.description {
            recipe.description = description;
        }
        if let Some(ingredients) = fields.ingredients {
            recipe.ingredients = parse_list_input(&ingredients);
        }
        if let Some(steps) = fields.steps {
            recipe.how_to_cook = parse_list_input(&steps);
        }
        if let Some(mood) = fields.mood {
            self.warn_unknown_mood(&mood);
            recipe.mood = mood;
        }
        if let Some(image) = fields.image {
            recipe.image = image;
        }

        if open_editor {
            let (ingredients, steps) =
                self.edit_lists(&recipe.name, &recipe.ingredients, &recipe.how_to_cook)?;
            recipe.ingredients = ingredients;
            recipe.how_to_cook = steps;
        }

        recipe.last_edited = Some(Utc::now());

        match self.store.update(recipe).await? {
            WriteOutcome::Applied => {
                println!("Recipe {} updated successfully", id);
                Ok(())
            }
            WriteOutcome::NotFound => Err(not_found(id)),
        }
    }

    async fn handle_favorite(&self, id: &str) -> Result<()> {
        match self.store.toggle_favorite(id).await? {
            Some(true) => println!("Recipe {} added to favorites", id),
            Some(false) => println!("Recipe {} removed from favorites", id),
            None => return Err(not_found(id)),
        }
        Ok(())
    }

    async fn handle_hide(&self, id: &str) -> Result<()> {
        match self.store.hide(id).await? {
            WriteOutcome::Applied => {
                println!(
                    "Recipe {} moved to recently removed. Use `restore {}` to bring it back.",
                    id, id
                );
                Ok(())
            }
            WriteOutcome::NotFound => Err(not_found(id)),
        }
    }

    async fn handle_restore(&self, id: &str) -> Result<()> {
        match self.store.restore(id).await? {
            WriteOutcome::Applied => {
                println!("Recipe {} has been restored.", id);
                Ok(())
            }
            WriteOutcome::NotFound => Err(not_found(id)),
        }
    }

    async fn handle_delete(&self, id: &str, force: bool) -> Result<()> {
        // Step 1: Fetch the recipe to be deleted (to verify it exists and show details in the prompt)
        let recipe = self.find(id).await?;

        // Step 2: Show recipe details and prompt for confirmation (unless force flag is set)
        if !force {
            println!("You are about to delete the following recipe:");
            println!("ID:    {}", recipe.id);
            println!("Name:  {}", recipe.name);
            println!("Mood:  {}", recipe.mood);
            if let Some(date) = recipe.date {
                println!("Created: {}", date.format("%Y-%m-%d %H:%M:%S"));
            }

            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this recipe? [y/N]: ");
            stdout().flush().map_err(RecipeError::Io)?;

            let mut input = String::new();
            stdin().read_line(&mut input).map_err(RecipeError::Io)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        // Step 3: Delete the recipe
        if self.store.delete(id).await? == WriteOutcome::NotFound {
            return Err(not_found(id));
        }

        println!(
            "Recipe '{}' ({}) has been permanently deleted.",
            recipe.name, recipe.id
        );
        Ok(())
    }

    async fn handle_search(&self, query: &str, json: bool) -> Result<()> {
        let results = self.store.search(query).await;
        if results.is_empty() && !json {
            println!("No recipes found matching query: \"{}\"", query);
            return Ok(());
        }
        self.display_recipes(&results, json, false)
    }

    async fn handle_suggest(&self, mood: &str) -> Result<()> {
        match self.store.suggest_for_mood(mood).await {
            Some(recipe) => {
                println!(
                    "Feeling {}? Try this:\n",
                    console::style(mood).yellow().bold()
                );
                self.display_recipe(&recipe, true);
            }
            None => println!("No recipes found for mood {}.", mood),
        }
        Ok(())
    }

    async fn handle_moods(&self) {
        let counts = self.store.mood_counts().await;

        for mood in KNOWN_MOODS {
            let count = counts.get(mood).copied().unwrap_or(0);
            println!("{:<10} {}", mood, count);
        }
        // Moods typed by hand that are not in the picker
        for (mood, count) in counts.iter().filter(|(m, _)| !KNOWN_MOODS.contains(&m.as_str())) {
            println!("{:<10} {}", mood, count);
        }
    }

    async fn handle_settings(&self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        if reset {
            self.preferences.reset().await?;
            println!("Settings reset to defaults.");
        }

        if let Some(assignment) = set {
            let (key, value) =
                assignment
                    .split_once('=')
                    .ok_or_else(|| RecipeError::ConfigError {
                        message: format!("Expected key=value, got '{}'", assignment),
                    })?;
            self.preferences.set(key.trim(), value).await?;
            println!("Setting {} updated.", key.trim());
        }

        if show || !reset {
            println!("{}", self.preferences.load().await);
            if self.verbose {
                println!("dataDir: {}", self.config.data_dir.display());
            }
        }

        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Recipe> {
        self.store
            .try_get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    fn warn_unknown_mood(&self, mood: &str) {
        if !KNOWN_MOODS.contains(&mood) {
            warn!("Mood '{}' is not one of {}", mood, KNOWN_MOODS.join(", "));
        }
    }

    /// Display recipes in the requested format
    fn display_recipes(&self, recipes: &[Recipe], json: bool, detailed: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(recipes)?);
            return Ok(());
        }

        if recipes.is_empty() {
            println!("No recipes found.");
            return Ok(());
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, recipe) in recipes.iter().enumerate() {
            // Add separator between recipes (except before the first)
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }
            self.display_recipe(recipe, detailed);
        }

        println!(
            "\nFound {} recipe{}",
            recipes.len(),
            if recipes.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    fn display_recipe(&self, recipe: &Recipe, detailed: bool) {
        let mut title = console::style(&recipe.name).bold().to_string();
        if recipe.favorite {
            title.push_str(" ★");
        }
        if recipe.hidden {
            title.push_str(&format!(" {}", console::style("(removed)").dim()));
        }

        println!("ID: {} | Mood: {}", recipe.id, console::style(&recipe.mood).cyan());
        println!("Name: {}", title);
        if !recipe.description.is_empty() {
            println!("{}", recipe.description);
        }

        if !detailed {
            return;
        }

        if !recipe.image.is_empty() {
            println!("Image: {}", recipe.image);
        }
        if let Some(date) = recipe.date {
            println!("Created: {}", date.format("%Y-%m-%d %H:%M"));
        }
        if let Some(edited) = recipe.last_edited {
            println!("Last edited: {}", edited.format("%Y-%m-%d %H:%M"));
        }

        let ingredients = ingredient_list(recipe);
        if !ingredients.is_empty() {
            println!("\n{}", console::style("Ingredients").underlined());
            for ingredient in ingredients {
                println!("  • {}", ingredient);
            }
        }

        let steps = cooking_steps(recipe);
        if !steps.is_empty() {
            println!("\n{}", console::style("How to cook").underlined());
            for (n, step) in steps.iter().enumerate() {
                println!("  {}. {}", n + 1, step);
            }
        }
    }

    /// Lets the user write ingredients and steps in their editor
    fn edit_lists(&self, name: &str, ingredients: &str, how_to_cook: &str) -> Result<(String, String)> {
        let temp_file = Builder::new().suffix(".md").tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        write(&temp_path, editor_template(name, ingredients, how_to_cook))?;

        let editor_cmd = self.config.get_editor_command();
        info!("Opening editor for recipe lists. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        let content = read_to_string(&temp_path)?;
        Ok(parse_editor_content(&content))
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let path_str = file_path.to_string_lossy();

        // Handle shell-like command parsing
        let args = split(editor_cmd).map_err(|e| RecipeError::EditorError {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        let Some((program, rest)) = args.split_first() else {
            return Err(RecipeError::EditorError {
                message: "Empty editor command".to_string(),
            });
        };

        let status = Command::new(program)
            .args(rest)
            .arg(path_str.as_ref())
            .status()
            .map_err(|e| RecipeError::EditorError {
                message: format!("Failed to execute editor command: {}", e),
            })?;

        if !status.success() {
            return Err(RecipeError::EditorError {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }
}

fn not_found(id: &str) -> RecipeError {
    RecipeError::RecipeNotFound { id: id.to_string() }
}
