use crate::types::{FilterMode, Todo};

/// Returns the todos matching `mode`, keeping their input order.
pub fn select(todos: &[Todo], mode: FilterMode) -> Vec<Todo> {
    todos.iter().filter(|todo| mode.matches(todo)).cloned().collect()
}
