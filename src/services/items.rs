use thiserror::Error;
use tracing::debug;

use crate::{
    annotations::{self, AnnotationError},
    models::{
        item::{Priority, TodoItem},
        store::Store,
    },
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddItemError {
    #[error("Todo description cannot be empty")]
    EmptyDescription,

    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddItemParameters {
    /// Raw text, possibly carrying `+project` and `@x` tags
    pub text: String,
    /// Explicit project, wins over an inline tag
    pub project: Option<String>,
    /// Explicit priority, wins over an inline tag
    pub priority: Option<Priority>,
}

pub fn add_item(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddItemParameters,
) -> Result<TodoItem, AddItemError> {
    let extracted = annotations::extract(&parameters.text)?;

    if extracted.description.trim().is_empty() {
        return Err(AddItemError::EmptyDescription);
    }

    let project = parameters
        .project
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .or(extracted.project)
        .or_else(|| annotations::default_project(&extracted.description).map(String::from))
        .ok_or(AddItemError::EmptyDescription)?;

    let priority = parameters
        .priority
        .or(extracted.priority)
        .unwrap_or_default();

    let item = TodoItem::new(extracted.description, priority, project);
    debug!(id = %item.id, project = %item.project, priority = %item.priority, "adding item");

    store.pending.push(item.clone());
    store.sort_pending();

    storage.save(store)?;

    Ok(item)
}

#[derive(Debug, Error)]
pub enum CompleteItemError {
    #[error("Invalid index {index}. Please provide a number between 1 and {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct CompleteItemParameters {
    pub index: usize,
}

pub fn complete_item(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CompleteItemParameters,
) -> Result<TodoItem, CompleteItemError> {
    let position = store
        .resolve_index(parameters.index)
        .ok_or(CompleteItemError::InvalidIndex {
            index: parameters.index,
            len: store.pending.len(),
        })?;

    let mut item = store.pending.remove(position);
    item.complete();
    debug!(id = %item.id, "completing item");

    store.completed.push(item.clone());

    storage.save(store)?;

    Ok(item)
}

#[derive(Debug, Error)]
pub enum DeleteItemError {
    #[error("Invalid index {index}. Please provide a number between 1 and {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteItemParameters {
    pub index: usize,
}

pub fn delete_item(
    store: &mut Store,
    storage: &impl Storage,
    parameters: DeleteItemParameters,
) -> Result<TodoItem, DeleteItemError> {
    let position = store
        .resolve_index(parameters.index)
        .ok_or(DeleteItemError::InvalidIndex {
            index: parameters.index,
            len: store.pending.len(),
        })?;

    let item = store.pending.remove(position);
    debug!(id = %item.id, "deleting item");

    storage.save(store)?;

    Ok(item)
}

#[derive(Debug, Error)]
pub enum EditItemError {
    #[error("Invalid index {index}. Please provide a number between 1 and {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Text to add cannot be empty")]
    EmptyText,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct EditItemParameters {
    pub index: usize,
    pub text: String,
}

/// Adds text to the end of a description. The list is not re-sorted.
pub fn append_text(
    store: &mut Store,
    storage: &impl Storage,
    parameters: EditItemParameters,
) -> Result<TodoItem, EditItemError> {
    edit_description(store, storage, parameters, |description, text| {
        format!("{} {}", description, text)
    })
}

/// Adds text to the front of a description. The list is not re-sorted.
pub fn prepend_text(
    store: &mut Store,
    storage: &impl Storage,
    parameters: EditItemParameters,
) -> Result<TodoItem, EditItemError> {
    edit_description(store, storage, parameters, |description, text| {
        format!("{} {}", text, description)
    })
}

fn edit_description(
    store: &mut Store,
    storage: &impl Storage,
    parameters: EditItemParameters,
    combine: impl Fn(&str, &str) -> String,
) -> Result<TodoItem, EditItemError> {
    let position = store
        .resolve_index(parameters.index)
        .ok_or(EditItemError::InvalidIndex {
            index: parameters.index,
            len: store.pending.len(),
        })?;

    let text = parameters.text.trim();
    if text.is_empty() {
        return Err(EditItemError::EmptyText);
    }

    let item = &mut store.pending[position];
    item.description = combine(&item.description, text);
    debug!(id = %item.id, "edited description");
    let edited = item.clone();

    storage.save(store)?;

    Ok(edited)
}

#[derive(Debug, Error)]
pub enum SetPriorityError {
    #[error("Invalid index {index}. Please provide a number between 1 and {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct SetPriorityParameters {
    pub index: usize,
    pub priority: Priority,
}

pub fn set_priority(
    store: &mut Store,
    storage: &impl Storage,
    parameters: SetPriorityParameters,
) -> Result<TodoItem, SetPriorityError> {
    let position = store
        .resolve_index(parameters.index)
        .ok_or(SetPriorityError::InvalidIndex {
            index: parameters.index,
            len: store.pending.len(),
        })?;

    let item = &mut store.pending[position];
    item.priority = parameters.priority;
    debug!(id = %item.id, priority = %item.priority, "changed priority");
    let updated = item.clone();

    store.sort_pending();

    storage.save(store)?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::storage::json::JsonFileStorage;

    fn setup() -> (TempDir, JsonFileStorage, Store) {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("store.json"));
        (dir, storage, Store::default())
    }

    fn add(store: &mut Store, storage: &JsonFileStorage, text: &str) -> TodoItem {
        add_item(
            store,
            storage,
            AddItemParameters {
                text: text.to_string(),
                project: None,
                priority: None,
            },
        )
        .unwrap()
    }

    fn descriptions(store: &Store) -> Vec<&str> {
        store.pending.iter().map(|i| i.description.as_str()).collect()
    }

    fn pri(letter: char) -> Priority {
        Priority::try_from(letter).unwrap()
    }

    #[test]
    fn test_add_extracts_tags() {
        let (_dir, storage, mut store) = setup();

        let item = add(&mut store, &storage, "Buy milk +errands @b");

        assert_eq!(item.description, "Buy milk");
        assert_eq!(item.project, "errands");
        assert_eq!(item.priority, pri('b'));

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.pending.len(), 1);
        assert_eq!(loaded.pending[0].description, "Buy milk");
    }

    #[test]
    fn test_add_without_tags_uses_first_word_and_lowest_priority() {
        let (_dir, storage, mut store) = setup();

        let item = add(&mut store, &storage, "walk the dog");

        assert_eq!(item.description, "walk the dog");
        assert_eq!(item.project, "walk");
        assert_eq!(item.priority, pri('z'));
    }

    #[test]
    fn test_add_explicit_parameters_win_over_tags() {
        let (_dir, storage, mut store) = setup();

        let item = add_item(
            &mut store,
            &storage,
            AddItemParameters {
                text: "paint fence +house @c".to_string(),
                project: Some("garden".to_string()),
                priority: Some(pri('a')),
            },
        )
        .unwrap();

        assert_eq!(item.description, "paint fence");
        assert_eq!(item.project, "garden");
        assert_eq!(item.priority, pri('a'));
    }

    #[test]
    fn test_add_keeps_pending_sorted() {
        let (_dir, storage, mut store) = setup();

        add(&mut store, &storage, "walk the dog");
        add(&mut store, &storage, "pay rent @a");
        add(&mut store, &storage, "call mom +family @b");

        assert_eq!(descriptions(&store), vec!["pay rent", "call mom", "walk the dog"]);
    }

    #[test]
    fn test_add_rejects_empty_project_tag() {
        let (_dir, storage, mut store) = setup();

        let result = add_item(
            &mut store,
            &storage,
            AddItemParameters {
                text: "fix + bug".to_string(),
                project: None,
                priority: None,
            },
        );

        assert!(matches!(
            result,
            Err(AddItemError::Annotation(AnnotationError::EmptyProjectTag))
        ));
        assert!(store.pending.is_empty());
    }

    #[test]
    fn test_add_rejects_description_made_only_of_tags() {
        let (_dir, storage, mut store) = setup();

        let result = add_item(
            &mut store,
            &storage,
            AddItemParameters {
                text: "+errands @a".to_string(),
                project: None,
                priority: None,
            },
        );

        assert!(matches!(result, Err(AddItemError::EmptyDescription)));
        assert!(store.pending.is_empty());
    }

    #[test]
    fn test_complete_moves_item_to_completed() {
        let (_dir, storage, mut store) = setup();
        add(&mut store, &storage, "one @a");
        add(&mut store, &storage, "two @b");
        add(&mut store, &storage, "three @c");

        let params = CompleteItemParameters { index: 1 };
        let item = complete_item(&mut store, &storage, params).unwrap();

        assert_eq!(item.description, "one");
        assert!(item.completed_at.is_some());
        assert_eq!(store.pending.len(), 2);
        assert_eq!(store.completed.len(), 1);
        assert!(store.completed[0].completed_at.is_some());
        assert!(store.pending.iter().all(|i| i.completed_at.is_none()));

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.pending.len(), 2);
        assert_eq!(loaded.completed.len(), 1);
    }

    #[test]
    fn test_complete_out_of_range_leaves_state_unchanged() {
        let (_dir, storage, mut store) = setup();
        add(&mut store, &storage, "one");
        add(&mut store, &storage, "two");

        let result = complete_item(&mut store, &storage, CompleteItemParameters { index: 3 });

        assert!(matches!(
            result,
            Err(CompleteItemError::InvalidIndex { index: 3, len: 2 })
        ));
        assert_eq!(store.pending.len(), 2);
        assert!(store.completed.is_empty());

        let result = complete_item(&mut store, &storage, CompleteItemParameters { index: 0 });
        assert!(matches!(result, Err(CompleteItemError::InvalidIndex { .. })));
    }

    #[test]
    fn test_delete_removes_item() {
        let (_dir, storage, mut store) = setup();
        add(&mut store, &storage, "keep @a");
        add(&mut store, &storage, "drop @b");

        let item = delete_item(&mut store, &storage, DeleteItemParameters { index: 2 }).unwrap();

        assert_eq!(item.description, "drop");
        assert_eq!(store.pending.len(), 1);
        assert!(store.completed.is_empty());
        assert_eq!(storage.load().unwrap().pending.len(), 1);
    }

    #[test]
    fn test_delete_out_of_range() {
        let (_dir, storage, mut store) = setup();

        let result = delete_item(&mut store, &storage, DeleteItemParameters { index: 1 });

        assert!(matches!(
            result,
            Err(DeleteItemError::InvalidIndex { index: 1, len: 0 })
        ));
    }

    #[test]
    fn test_append_and_prepend_do_not_resort() {
        let (_dir, storage, mut store) = setup();
        add(&mut store, &storage, "bbb +p");
        add(&mut store, &storage, "ccc +p");

        let item = prepend_text(
            &mut store,
            &storage,
            EditItemParameters {
                index: 2,
                text: "aaa".to_string(),
            },
        )
        .unwrap();
        assert_eq!(item.description, "aaa ccc");

        let item = append_text(
            &mut store,
            &storage,
            EditItemParameters {
                index: 1,
                text: " soon ".to_string(),
            },
        )
        .unwrap();
        assert_eq!(item.description, "bbb soon");

        assert_eq!(descriptions(&store), vec!["bbb soon", "aaa ccc"]);
    }

    #[test]
    fn test_edit_rejects_bad_index_and_empty_text() {
        let (_dir, storage, mut store) = setup();
        add(&mut store, &storage, "only");

        let result = append_text(
            &mut store,
            &storage,
            EditItemParameters {
                index: 2,
                text: "more".to_string(),
            },
        );
        assert!(matches!(result, Err(EditItemError::InvalidIndex { .. })));

        let result = append_text(
            &mut store,
            &storage,
            EditItemParameters {
                index: 1,
                text: "   ".to_string(),
            },
        );
        assert!(matches!(result, Err(EditItemError::EmptyText)));
        assert_eq!(store.pending[0].description, "only");
    }

    #[test]
    fn test_set_priority_resorts() {
        let (_dir, storage, mut store) = setup();
        add(&mut store, &storage, "first @a");
        add(&mut store, &storage, "second @b");

        let item = set_priority(
            &mut store,
            &storage,
            SetPriorityParameters {
                index: 2,
                priority: pri('a'),
            },
        )
        .unwrap();

        assert_eq!(item.description, "second");
        assert_eq!(item.priority, pri('a'));
        assert_eq!(descriptions(&store), vec!["first", "second"]);
        assert!(store.pending.iter().all(|i| i.priority == pri('a')));
    }

    #[test]
    fn test_set_priority_out_of_range() {
        let (_dir, storage, mut store) = setup();
        add(&mut store, &storage, "first");

        let result = set_priority(
            &mut store,
            &storage,
            SetPriorityParameters {
                index: 5,
                priority: pri('a'),
            },
        );

        assert!(matches!(
            result,
            Err(SetPriorityError::InvalidIndex { index: 5, len: 1 })
        ));
        assert_eq!(store.pending[0].priority, pri('z'));
    }
}
