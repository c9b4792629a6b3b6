use std::fs;

use tracing::info;

use crate::apply::is_occupied;
use crate::observer::{notify, ProgressObserver};
use crate::rename::PathMapping;

/// Reverse previously applied renames, last applied first.
///
/// Walking the list backwards keeps chains such as `b -> c` followed by
/// `a -> b` from colliding on the intermediate name. Each mapping is tried
/// on its own: a missing file, an occupied original name or a failed rename
/// is recorded and the loop moves on. An original name that is occupied
/// again is never overwritten.
///
/// Returns the collected error messages, empty on full success.
pub fn undo_mappings(
    mappings: &[PathMapping],
    mut observer: Option<&mut dyn ProgressObserver<PathMapping>>,
) -> Vec<String> {
    let total = mappings.len();
    let mut errors = Vec::new();

    info!("Undoing {} renames", total);

    for (index, mapping) in mappings.iter().rev().enumerate() {
        if let Err(msg) = undo_one(mapping) {
            info!("{}", msg);
            errors.push(msg);
        }
        notify(&mut observer, index + 1, total, mapping);
    }

    info!(errors = errors.len(), "Undo finished");

    errors
}

fn undo_one(mapping: &PathMapping) -> Result<(), String> {
    let name = mapping.new_name();

    if !is_occupied(&mapping.new_path) {
        return Err(format!("Missing during undo: {}", name));
    }

    if is_occupied(&mapping.old_path) {
        return Err(format!(
            "Cannot undo {}: {} already exists",
            name,
            mapping.old_path.display()
        ));
    }

    fs::rename(&mapping.new_path, &mapping.old_path)
        .map_err(|e| format!("Error undoing {}: {}", name, e))?;

    info!(
        "Restored: {} -> {}",
        name,
        mapping.old_path.display()
    );

    Ok(())
}
