use todo_sync::{Todo, ViewSnapshot};

/// Renders one frame of the view as plain text.
pub fn render(view: &ViewSnapshot) -> String {
    let mut out = String::from("todos");
    if view.create_in_flight {
        out.push_str(" (adding...)");
    }
    out.push('\n');

    for todo in &view.visible {
        let marker = if view.pending_deletes.contains(&todo.id) {
            " (deleting)"
        } else {
            ""
        };
        out.push_str(&format!("  {} #{} {}{marker}\n", check(todo), todo.id, todo.title));
    }
    if let Some(todo) = &view.placeholder {
        out.push_str(&format!("  {} #- {} (saving)\n", check(todo), todo.title));
    }

    if view.active_count > 0 || view.has_completed {
        let noun = if view.active_count == 1 { "item" } else { "items" };
        out.push_str(&format!("{} {noun} left | filter: {}", view.active_count, view.filter));
        if view.has_completed {
            out.push_str(" | clear completed");
        }
        out.push('\n');
    }

    if let Some(error) = view.error {
        out.push_str(&format!("! {error} (dismiss to close)\n"));
    }
    out
}

fn check(todo: &Todo) -> &'static str {
    if todo.completed {
        "[x]"
    } else {
        "[ ]"
    }
}
