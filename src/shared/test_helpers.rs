#[cfg(test)]
use chrono::Utc;
#[cfg(test)]
use fake::{faker::lorem::en::Word, Fake};
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::features::categories::models::{Category, CategoryStatus};

/// Build an active category record with the given name and parent
#[cfg(test)]
pub fn named_category(name: &str, parent_id: Option<Uuid>) -> Category {
    let now = Utc::now();
    Category {
        id: Uuid::now_v7(),
        parent_id,
        name: name.to_string(),
        status: CategoryStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

/// Build an active category record with a generated name
#[cfg(test)]
#[allow(dead_code)]
pub fn fake_category(parent_id: Option<Uuid>) -> Category {
    let name: String = Word().fake();
    named_category(&name, parent_id)
}
