use std::{collections::BTreeMap, sync::Arc};

use log::{debug, error, info, trace, warn};
use rand::seq::SliceRandom;
use tokio::sync::Mutex;

use crate::{KeyValueBackend, Recipe, RecipeDraft, RecipeError, Result, WriteOutcome};

/// Key of the slot holding the serialized recipe collection
pub const RECIPES_KEY: &str = "recipes";

/// Manages storage and retrieval of the recipe collection.
///
/// The whole collection lives as one JSON array under [`RECIPES_KEY`]. Every
/// mutation reads the collection, changes it in memory and writes it back;
/// mutations are serialized through a lock shared by all clones of the store,
/// so two overlapping writes never drop each other's changes.
#[derive(Clone)]
pub struct RecipeStore {
    /// Where the serialized collection is kept
    backend: Arc<dyn KeyValueBackend>,

    /// Held for the full read-modify-write cycle of every mutation
    write_lock: Arc<Mutex<()>>,
}

impl RecipeStore {
    /// Creates a store on top of the given backend
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns every recipe in insertion order.
    ///
    /// Read failures and undecodable data are logged and yield an empty list,
    /// so callers rendering a list always get something to show. Use
    /// [`RecipeStore::try_list`] to see the error instead.
    pub async fn list(&self) -> Vec<Recipe> {
        match self.try_list().await {
            Ok(recipes) => recipes,
            Err(e) => {
                error!("Error reading recipes: {}", e);
                Vec::new()
            }
        }
    }

    /// Returns every recipe, reporting storage and decoding failures
    pub async fn try_list(&self) -> Result<Vec<Recipe>> {
        let raw = self.backend.get(RECIPES_KEY).await?;
        match raw {
            None => {
                trace!("No recipes stored yet");
                Ok(Vec::new())
            }
            Some(json) => {
                let recipes: Vec<Recipe> =
                    serde_json::from_str(&json).map_err(|e| RecipeError::Deserialization {
                        key: RECIPES_KEY.to_string(),
                        message: e.to_string(),
                    })?;
                trace!("Loaded {} recipes", recipes.len());
                Ok(recipes)
            }
        }
    }

    /// Stores a new recipe and returns it with its assigned id
    pub async fn add(&self, draft: RecipeDraft) -> Result<Recipe> {
        let _guard = self.write_lock.lock().await;

        let mut recipes = self.try_list().await?;
        let recipe = draft.into_recipe();
        info!("Adding recipe: {} ({})", recipe.id, recipe.name);

        recipes.push(recipe.clone());
        self.save(&recipes).await?;
        Ok(recipe)
    }

    /// Replaces the stored recipe that has the same id.
    ///
    /// Nothing is written when no recipe has that id, or when the stored
    /// recipe is already identical.
    pub async fn update(&self, recipe: Recipe) -> Result<WriteOutcome> {
        validate(&recipe)?;
        let _guard = self.write_lock.lock().await;

        let mut recipes = self.try_list().await?;
        let Some(slot) = recipes.iter_mut().find(|r| r.id == recipe.id) else {
            warn!("Cannot update recipe {}: Recipe not found", recipe.id);
            return Ok(WriteOutcome::NotFound);
        };

        if *slot == recipe {
            debug!("Recipe {} unchanged, skipping write", recipe.id);
            return Ok(WriteOutcome::Applied);
        }

        info!("Updating recipe: {}", recipe.id);
        *slot = recipe;
        self.save(&recipes).await?;
        Ok(WriteOutcome::Applied)
    }

    /// Permanently removes the recipe with the given id
    pub async fn delete(&self, id: &str) -> Result<WriteOutcome> {
        let _guard = self.write_lock.lock().await;

        let mut recipes = self.try_list().await?;
        let before = recipes.len();
        recipes.retain(|r| r.id != id);

        if recipes.len() == before {
            warn!("Cannot delete recipe {}: Recipe not found", id);
            return Ok(WriteOutcome::NotFound);
        }

        info!("Deleting recipe: {}", id);
        self.save(&recipes).await?;
        Ok(WriteOutcome::Applied)
    }

    /// Retrieves a recipe by its id, hidden or not
    pub async fn get_by_id(&self, id: &str) -> Option<Recipe> {
        debug!("Retrieving recipe by ID: {}", id);
        self.list().await.into_iter().find(|r| r.id == id)
    }

    /// Like [`RecipeStore::get_by_id`], but reports storage and decoding failures
    pub async fn try_get_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        Ok(self.try_list().await?.into_iter().find(|r| r.id == id))
    }

    /// Retrieves all recipes whose mood equals `mood` exactly, hidden ones included
    pub async fn get_by_mood(&self, mood: &str) -> Vec<Recipe> {
        let matching: Vec<Recipe> = self
            .list()
            .await
            .into_iter()
            .filter(|r| r.mood == mood)
            .collect();
        debug!("Found {} recipes with mood: {}", matching.len(), mood);
        matching
    }

    /// Recipes that are not soft-deleted
    pub async fn visible(&self) -> Vec<Recipe> {
        self.list()
            .await
            .into_iter()
            .filter(Recipe::is_visible)
            .collect()
    }

    /// Visible recipes marked as favorite
    pub async fn favorites(&self) -> Vec<Recipe> {
        self.list()
            .await
            .into_iter()
            .filter(|r| r.favorite && r.is_visible())
            .collect()
    }

    /// Soft-deleted recipes, which can still be restored or deleted for good
    pub async fn hidden(&self) -> Vec<Recipe> {
        self.list().await.into_iter().filter(|r| r.hidden).collect()
    }

    /// Visible recipes whose name contains `query`, ignoring case
    pub async fn search(&self, query: &str) -> Vec<Recipe> {
        let needle = query.trim().to_lowercase();
        self.visible()
            .await
            .into_iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Picks a random visible recipe with the given mood
    pub async fn suggest_for_mood(&self, mood: &str) -> Option<Recipe> {
        let candidates: Vec<Recipe> = self
            .get_by_mood(mood)
            .await
            .into_iter()
            .filter(Recipe::is_visible)
            .collect();
        candidates.choose(&mut rand::thread_rng()).cloned()
    }

    /// Number of visible recipes per mood
    pub async fn mood_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for recipe in self.visible().await {
            *counts.entry(recipe.mood).or_insert(0) += 1;
        }
        counts
    }

    /// Sets the favorite flag of a recipe
    pub async fn set_favorite(&self, id: &str, favorite: bool) -> Result<WriteOutcome> {
        self.modify(id, |r| r.favorite = favorite)
            .await
            .map(|found| outcome(found.is_some()))
    }

    /// Flips the favorite flag, returning its new value if the recipe exists
    pub async fn toggle_favorite(&self, id: &str) -> Result<Option<bool>> {
        self.modify(id, |r| r.favorite = !r.favorite)
            .await
            .map(|found| found.map(|r| r.favorite))
    }

    /// Soft-deletes a recipe
    pub async fn hide(&self, id: &str) -> Result<WriteOutcome> {
        self.modify(id, |r| r.hidden = true)
            .await
            .map(|found| outcome(found.is_some()))
    }

    /// Undoes a soft delete
    pub async fn restore(&self, id: &str) -> Result<WriteOutcome> {
        self.modify(id, |r| r.hidden = false)
            .await
            .map(|found| outcome(found.is_some()))
    }

    /// Applies `change` to the recipe with the given id under the write lock
    async fn modify<F>(&self, id: &str, change: F) -> Result<Option<Recipe>>
    where
        F: FnOnce(&mut Recipe),
    {
        let _guard = self.write_lock.lock().await;

        let mut recipes = self.try_list().await?;
        let Some(slot) = recipes.iter_mut().find(|r| r.id == id) else {
            warn!("Cannot modify recipe {}: Recipe not found", id);
            return Ok(None);
        };

        change(slot);
        let updated = slot.clone();
        self.save(&recipes).await?;
        debug!("Recipe {} modified", id);
        Ok(Some(updated))
    }

    async fn save(&self, recipes: &[Recipe]) -> Result<()> {
        let json = serde_json::to_string(recipes).map_err(|e| {
            error!("Failed to serialize recipes: {}", e);
            RecipeError::Serialization(e)
        })?;
        self.backend.set(RECIPES_KEY, &json).await.map_err(|e| {
            error!("Error saving recipes: {}", e);
            e
        })
    }
}

fn outcome(found: bool) -> WriteOutcome {
    if found {
        WriteOutcome::Applied
    } else {
        WriteOutcome::NotFound
    }
}

fn validate(recipe: &Recipe) -> Result<()> {
    if recipe.id.trim().is_empty() {
        return Err(RecipeError::InvalidRecipe {
            message: "recipe id must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileBackend, MemoryBackend};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn memory_store() -> (RecipeStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        (RecipeStore::new(backend.clone()), backend)
    }

    fn pancakes() -> RecipeDraft {
        RecipeDraft {
            name: "Pancakes".to_string(),
            description: "Fluffy".to_string(),
            ingredients: "flour\neggs\nmilk".to_string(),
            how_to_cook: "mix\nfry".to_string(),
            mood: "Happy".to_string(),
            image: "file:///pancakes.jpg".to_string(),
            ..RecipeDraft::default()
        }
    }

    /// Backend whose reads and writes can be made to fail
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_reads: bool,
        fail_writes: bool,
    }

    #[async_trait]
    impl KeyValueBackend for FlakyBackend {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(RecipeError::StorageUnavailable {
                    message: "read refused".to_string(),
                });
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(RecipeError::StorageUnavailable {
                    message: "write refused".to_string(),
                });
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_empty_storage_lists_nothing() {
        let (store, _) = memory_store();
        assert!(store.list().await.is_empty());
        assert!(store.try_list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_round_trips() {
        let (store, _) = memory_store();
        let draft = pancakes();

        let stored = store.add(draft.clone()).await.unwrap();
        assert!(!stored.id.is_empty());

        let all = store.list().await;
        assert_eq!(all.len(), 1);

        let fetched = store.get_by_id(&stored.id).await.unwrap();
        assert_eq!(fetched, stored);
        assert_eq!(RecipeDraft::from(fetched), draft);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (store, _) = memory_store();
        for i in 0..50 {
            store
                .add(RecipeDraft::new(format!("Dish {}", i), "Cool"))
                .await
                .unwrap();
        }

        let ids: HashSet<String> = store.list().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let (store, _) = memory_store();
        for name in ["Zucchini", "Apple pie", "Miso"] {
            store.add(RecipeDraft::new(name, "Sad")).await.unwrap();
        }

        let names: Vec<String> = store.list().await.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Zucchini", "Apple pie", "Miso"]);
    }

    #[tokio::test]
    async fn test_update_replaces_only_matching_record() {
        let (store, _) = memory_store();
        let a = store.add(pancakes()).await.unwrap();
        let b = store.add(RecipeDraft::new("Soup", "Sad")).await.unwrap();

        let outcome = store
            .update(Recipe {
                favorite: true,
                ..a.clone()
            })
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Applied);

        let all = store.list().await;
        assert_eq!(all.len(), 2);
        assert!(all.iter().find(|r| r.id == a.id).unwrap().favorite);
        assert_eq!(all.iter().find(|r| r.id == b.id).unwrap(), &b);
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let (store, backend) = memory_store();
        let a = store.add(pancakes()).await.unwrap();
        let edited = Recipe {
            name: "Blueberry pancakes".to_string(),
            ..a
        };

        store.update(edited.clone()).await.unwrap();
        let once = backend.get(RECIPES_KEY).await.unwrap();
        let outcome = store.update(edited).await.unwrap();
        let twice = backend.get(RECIPES_KEY).await.unwrap();

        assert_eq!(outcome, WriteOutcome::Applied);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_update_unknown_id_changes_nothing() {
        let (store, backend) = memory_store();
        store.add(pancakes()).await.unwrap();
        let before = backend.get(RECIPES_KEY).await.unwrap();

        let mut ghost = pancakes().into_recipe();
        ghost.id = "nonexistent".to_string();
        let outcome = store.update(ghost).await.unwrap();

        assert_eq!(outcome, WriteOutcome::NotFound);
        assert_eq!(backend.get(RECIPES_KEY).await.unwrap(), before);
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_id() {
        let (store, _) = memory_store();
        let mut recipe = pancakes().into_recipe();
        recipe.id = "  ".to_string();

        let err = store.update(recipe).await.unwrap_err();
        assert!(matches!(err, RecipeError::InvalidRecipe { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_final() {
        let (store, _) = memory_store();
        let a = store.add(pancakes()).await.unwrap();

        assert_eq!(store.delete(&a.id).await.unwrap(), WriteOutcome::Applied);
        assert!(store.get_by_id(&a.id).await.is_none());
        assert!(store.list().await.is_empty());
        assert_eq!(store.delete(&a.id).await.unwrap(), WriteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_get_by_mood_filters_exactly_in_order() {
        let (store, _) = memory_store();
        let first = store.add(RecipeDraft::new("Waffles", "Happy")).await.unwrap();
        store.add(RecipeDraft::new("Soup", "Sad")).await.unwrap();
        let third = store.add(RecipeDraft::new("Tacos", "Happy")).await.unwrap();
        store.add(RecipeDraft::new("Ramen", "happy")).await.unwrap();

        let happy = store.get_by_mood("Happy").await;
        assert_eq!(happy, vec![first, third]);
        assert!(store.get_by_mood("Bored").await.is_empty());
    }

    #[tokio::test]
    async fn test_store_does_not_filter_hidden_recipes() {
        let (store, _) = memory_store();
        let a = store.add(pancakes()).await.unwrap();
        assert_eq!(store.hide(&a.id).await.unwrap(), WriteOutcome::Applied);

        let fetched = store.get_by_id(&a.id).await.unwrap();
        assert!(fetched.hidden);
        assert_eq!(store.get_by_mood("Happy").await.len(), 1);
        assert_eq!(store.list().await.len(), 1);

        assert!(store.visible().await.is_empty());
        assert_eq!(store.hidden().await.len(), 1);
    }

    #[tokio::test]
    async fn test_hide_and_restore() {
        let (store, _) = memory_store();
        let a = store.add(pancakes()).await.unwrap();

        store.hide(&a.id).await.unwrap();
        assert_eq!(store.restore(&a.id).await.unwrap(), WriteOutcome::Applied);
        assert_eq!(store.visible().await.len(), 1);
        assert!(store.hidden().await.is_empty());
        assert_eq!(store.restore("missing").await.unwrap(), WriteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_favorites_exclude_hidden() {
        let (store, _) = memory_store();
        let a = store.add(pancakes()).await.unwrap();
        let b = store.add(RecipeDraft::new("Soup", "Sad")).await.unwrap();
        store.add(RecipeDraft::new("Salad", "Cool")).await.unwrap();

        store.set_favorite(&a.id, true).await.unwrap();
        assert_eq!(store.toggle_favorite(&b.id).await.unwrap(), Some(true));
        store.hide(&b.id).await.unwrap();

        let favorites: Vec<String> = store.favorites().await.into_iter().map(|r| r.id).collect();
        assert_eq!(favorites, vec![a.id.clone()]);

        assert_eq!(store.toggle_favorite(&a.id).await.unwrap(), Some(false));
        assert_eq!(store.toggle_favorite("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_skips_hidden() {
        let (store, _) = memory_store();
        store.add(RecipeDraft::new("Chicken Curry", "Hungry")).await.unwrap();
        store.add(RecipeDraft::new("Curry Udon", "Sad")).await.unwrap();
        let gone = store.add(RecipeDraft::new("Old curry", "Sad")).await.unwrap();
        store.hide(&gone.id).await.unwrap();

        let names: Vec<String> = store
            .search("CURRY")
            .await
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Chicken Curry", "Curry Udon"]);
        assert_eq!(store.search("").await.len(), 2);
    }

    #[tokio::test]
    async fn test_suggest_for_mood_only_picks_visible_matches() {
        let (store, _) = memory_store();
        let a = store.add(RecipeDraft::new("Cake", "Happy")).await.unwrap();
        let b = store.add(RecipeDraft::new("Pie", "Happy")).await.unwrap();
        store.add(RecipeDraft::new("Soup", "Sad")).await.unwrap();
        store.hide(&b.id).await.unwrap();

        for _ in 0..10 {
            let pick = store.suggest_for_mood("Happy").await.unwrap();
            assert_eq!(pick.id, a.id);
        }
        assert!(store.suggest_for_mood("Stressed").await.is_none());
    }

    #[tokio::test]
    async fn test_mood_counts() {
        let (store, _) = memory_store();
        store.add(RecipeDraft::new("Cake", "Happy")).await.unwrap();
        store.add(RecipeDraft::new("Pie", "Happy")).await.unwrap();
        let soup = store.add(RecipeDraft::new("Soup", "Sad")).await.unwrap();
        store.add(RecipeDraft::new("Tea", "Cool")).await.unwrap();
        store.hide(&soup.id).await.unwrap();

        let counts = store.mood_counts().await;
        assert_eq!(counts.get("Happy"), Some(&2));
        assert_eq!(counts.get("Cool"), Some(&1));
        assert_eq!(counts.get("Sad"), None);
    }

    /// Backend that yields to the scheduler on every read, so concurrent
    /// read-modify-write cycles interleave unless they are serialized
    struct YieldingBackend {
        inner: MemoryBackend,
    }

    #[async_trait]
    impl KeyValueBackend for YieldingBackend {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let value = self.inner.get(key).await;
            tokio::task::yield_now().await;
            value
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            tokio::task::yield_now().await;
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    fn yielding_store() -> RecipeStore {
        RecipeStore::new(Arc::new(YieldingBackend {
            inner: MemoryBackend::new(),
        }))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_not_lost() {
        let store = yielding_store();
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .add(RecipeDraft::new(format!("Dish {}", i), "Hungry"))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list().await.len(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_changes_to_different_records_all_land() {
        let store = yielding_store();
        let mut ids = Vec::new();
        for i in 0..12 {
            let recipe = store
                .add(RecipeDraft::new(format!("Dish {}", i), "Cool"))
                .await
                .unwrap();
            ids.push(recipe.id);
        }

        let mut handles = Vec::new();
        for (i, id) in ids.iter().cloned().enumerate() {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    assert_eq!(store.toggle_favorite(&id).await.unwrap(), Some(true));
                } else {
                    let mut recipe = store.try_get_by_id(&id).await.unwrap().unwrap();
                    recipe.description = format!("edited {}", i);
                    assert_eq!(store.update(recipe).await.unwrap(), WriteOutcome::Applied);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = store.list().await;
        assert_eq!(all.len(), 12);
        for (i, id) in ids.iter().enumerate() {
            let recipe = all.iter().find(|r| &r.id == id).unwrap();
            if i % 2 == 0 {
                assert!(recipe.favorite, "favorite lost on {}", recipe.name);
            } else {
                assert_eq!(recipe.description, format!("edited {}", i));
            }
        }
    }

    #[tokio::test]
    async fn test_try_get_by_id_reports_corruption() {
        let (store, backend) = memory_store();
        let a = store.add(pancakes()).await.unwrap();
        assert_eq!(store.try_get_by_id(&a.id).await.unwrap(), Some(a.clone()));
        assert_eq!(store.try_get_by_id("missing").await.unwrap(), None);

        backend.set(RECIPES_KEY, "{not json").await.unwrap();
        assert!(matches!(
            store.try_get_by_id(&a.id).await,
            Err(RecipeError::Deserialization { .. })
        ));
        assert!(store.get_by_id(&a.id).await.is_none());
    }

    #[tokio::test]
    async fn test_rewrites_keep_unknown_fields() {
        let (store, backend) = memory_store();
        let stored = serde_json::json!([
            { "id": "old-1", "name": "Ramen", "mood": "Cool", "rating": 4 },
            { "id": "old-2", "name": "Stew", "mood": "Sad", "servings": { "min": 2 } }
        ]);
        backend
            .set(RECIPES_KEY, &stored.to_string())
            .await
            .unwrap();

        store.add(pancakes()).await.unwrap();
        store.toggle_favorite("old-1").await.unwrap();
        let mut stew = store.get_by_id("old-2").await.unwrap();
        stew.description = "Slow cooked".to_string();
        store.update(stew).await.unwrap();

        let raw = backend.get(RECIPES_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["rating"], 4);
        assert_eq!(value[0]["favorite"], true);
        assert_eq!(value[1]["servings"]["min"], 2);
        assert_eq!(value[1]["description"], "Slow cooked");
        assert!(value[2].get("rating").is_none());
    }

    #[tokio::test]
    async fn test_corrupted_data_reads_empty_but_blocks_writes() {
        let (store, backend) = memory_store();
        backend.set(RECIPES_KEY, "{not json").await.unwrap();

        assert!(store.list().await.is_empty());
        assert!(matches!(
            store.try_list().await,
            Err(RecipeError::Deserialization { .. })
        ));

        let err = store.add(pancakes()).await.unwrap_err();
        assert!(matches!(err, RecipeError::Deserialization { .. }));
        assert_eq!(
            backend.get(RECIPES_KEY).await.unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_empty() {
        let store = RecipeStore::new(Arc::new(FlakyBackend {
            inner: MemoryBackend::new(),
            fail_reads: true,
            fail_writes: false,
        }));

        assert!(store.list().await.is_empty());
        assert!(store.get_by_id("anything").await.is_none());
        assert!(matches!(
            store.add(pancakes()).await,
            Err(RecipeError::StorageUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let store = RecipeStore::new(Arc::new(FlakyBackend {
            inner: MemoryBackend::new(),
            fail_reads: false,
            fail_writes: true,
        }));

        let err = store.add(pancakes()).await.unwrap_err();
        assert!(matches!(err, RecipeError::StorageUnavailable { .. }));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_reads_collection_written_by_older_app() {
        let (store, backend) = memory_store();
        backend
            .set(
                RECIPES_KEY,
                r#"[{"id":"1712345678901","name":"Toast","mood":"Hungry","favorite":true,"date":"2024-04-05T08:00:00.000Z"}]"#,
            )
            .await
            .unwrap();

        let toast = store.get_by_id("1712345678901").await.unwrap();
        assert_eq!(toast.name, "Toast");
        assert!(toast.favorite);
        assert!(toast.date.is_some());
    }

    #[tokio::test]
    async fn test_file_backed_store_persists_across_instances() {
        let temp = TempDir::new().unwrap();
        let backend = Arc::new(FileBackend::new(temp.path()).unwrap());
        let a = RecipeStore::new(backend.clone()).add(pancakes()).await.unwrap();

        let reopened = RecipeStore::new(Arc::new(FileBackend::new(temp.path()).unwrap()));
        assert_eq!(reopened.get_by_id(&a.id).await, Some(a));
    }
}
