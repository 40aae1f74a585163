//! Documents and plans shared across test suites.

use quill_core::{ActionPlan, EditAction, FindAction};

/// A one-sentence document with a single `fox`.
pub const FOX_DOCUMENT: &str = "The quick brown fox";

/// A document where every word is `cat`.
pub const CAT_DOCUMENT: &str = "cat cat cat";

/// Inserts `" jumps"` at the `fox` of [`FOX_DOCUMENT`].
pub fn fox_insert_plan() -> ActionPlan {
    ActionPlan::new()
        .with_find(FindAction::new("fox_pos", "fox"))
        .with_edit(EditAction::insert("fox_pos", " jumps").with_explanation("add a verb"))
}

/// Deletes one `cat` of [`CAT_DOCUMENT`]; the search text matches three times.
pub fn cat_delete_plan() -> ActionPlan {
    ActionPlan::new()
        .with_find(FindAction::new("cat_pos", "cat"))
        .with_edit(EditAction::delete("cat_pos", 3).with_explanation("drop a cat"))
}

/// Looks for a `dog` that no fixture document contains.
pub fn dog_plan() -> ActionPlan {
    ActionPlan::new()
        .with_find(FindAction::new("dog_pos", "dog"))
        .with_edit(EditAction::insert("dog_pos", "big "))
}

/// Consumes a variable no find action binds.
pub fn missing_input_plan() -> ActionPlan {
    ActionPlan::new()
        .with_find(FindAction::new("fox", "fox"))
        .with_edit(EditAction::insert("fox_pos", " jumps"))
}
