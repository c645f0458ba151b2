pub mod create;
pub mod update;

pub use create::organization_create;
pub use update::organization_update;

use serde_json::{json, Value};

use crate::validation::{BodySchema, NOT_BLANK, TRIMMED};

/// Organization body schema; `name` is required on create and optional on update.
fn organization_schema(require_name: bool) -> BodySchema {
    let mut required = vec!["description", "email"];
    if require_name {
        required.push("name");
    }

    let name_type = if require_name { json!("string") } else { json!(["string", "null"]) };
    BodySchema::object(
        json!({
            "name": { "type": name_type, "minLength": 1, "maxLength": 80, "pattern": TRIMMED },
            "description": { "type": "string", "maxLength": 255, "pattern": NOT_BLANK },
            "website": optional_text(255),
            "phone": optional_text(20),
            "email": { "type": "string", "format": "email", "maxLength": 120 },
            "logo": optional_text(255),
        }),
        &required,
    )
}

fn optional_text(max: u64) -> Value {
    json!({ "type": ["string", "null"], "maxLength": max })
}
