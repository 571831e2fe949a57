//! Helpers for interpreting the newline-delimited recipe text fields.

use log::trace;

use crate::Recipe;

pub const INGREDIENTS_HEADING: &str = "## Ingredients";
pub const STEPS_HEADING: &str = "## Steps";

/// Splits newline-delimited text into trimmed, non-empty entries
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ingredients of a recipe, one entry per line
pub fn ingredient_list(recipe: &Recipe) -> Vec<String> {
    split_lines(&recipe.ingredients)
}

/// Cooking steps of a recipe, in order
pub fn cooking_steps(recipe: &Recipe) -> Vec<String> {
    split_lines(&recipe.how_to_cook)
}

// Helper method for list input given on the command line, where ';' separates entries
pub fn parse_list_input(input: &str) -> String {
    input
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the text shown in the editor for writing ingredients and steps
pub fn editor_template(name: &str, ingredients: &str, how_to_cook: &str) -> String {
    let mut template = String::new();
    template.push_str(&format!("# {}\n\n", name));
    template.push_str("<!--\n");
    template.push_str("Write one ingredient per line under Ingredients\n");
    template.push_str("and one step per line under Steps.\n");
    template.push_str("Save and exit the editor when you're done.\n");
    template.push_str("-->\n\n");
    template.push_str(INGREDIENTS_HEADING);
    template.push('\n');
    for line in split_lines(ingredients) {
        template.push_str(&line);
        template.push('\n');
    }
    template.push('\n');
    template.push_str(STEPS_HEADING);
    template.push('\n');
    for line in split_lines(how_to_cook) {
        template.push_str(&line);
        template.push('\n');
    }
    template
}

/// Extracts (ingredients, steps) from edited template text.
///
/// Lines before the first heading and comment blocks are ignored. List
/// markers (`-`, `*`, `1.`) at the start of a line are stripped.
pub fn parse_editor_content(content: &str) -> (String, String) {
    enum Section {
        Preamble,
        Ingredients,
        Steps,
    }

    let mut section = Section::Preamble;
    let mut in_comment = false;
    let mut ingredients = Vec::new();
    let mut steps = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();

        if in_comment {
            in_comment = !trimmed.ends_with("-->");
            continue;
        }
        if trimmed.starts_with("<!--") {
            in_comment = !trimmed.ends_with("-->");
            continue;
        }

        if trimmed.eq_ignore_ascii_case(INGREDIENTS_HEADING) {
            section = Section::Ingredients;
            continue;
        }
        if trimmed.eq_ignore_ascii_case(STEPS_HEADING) {
            section = Section::Steps;
            continue;
        }

        let entry = strip_list_marker(trimmed);
        if entry.is_empty() {
            continue;
        }
        match section {
            Section::Preamble => trace!("Ignoring line outside sections: {}", entry),
            Section::Ingredients => ingredients.push(entry.to_string()),
            Section::Steps => steps.push(entry.to_string()),
        }
    }

    (ingredients.join("\n"), steps.join("\n"))
}

fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim();
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return rest.trim();
        }
    }
    line
}
