#![allow(dead_code)]

use routeweave::contract::{Declaration, Implementation, PathTemplate, Resource};
use routeweave::validator::{SchemaValidator, ValidatorRef};
use serde_json::json;

/// Object schema validator requiring an integer `id`
pub fn integer_id() -> ValidatorRef {
    SchemaValidator::shared(json!({
        "type": "object",
        "properties": {"id": {"type": "integer", "minimum": 1}},
        "required": ["id"]
    }))
    .expect("valid schema")
}

/// Every method on a small zoo API, mounted at `/zoo`, plus a root route
pub fn zoo_declaration() -> Declaration {
    let animals = Resource::at("/animals")
        .route("list", PathTemplate::get(""))
        .route("create", PathTemplate::post(""))
        .route("read", PathTemplate::get("/{id}").path_params(integer_id()))
        .route("update", PathTemplate::put("/{id}").path_params(integer_id()))
        .route("patch", PathTemplate::patch("/{id}").path_params(integer_id()))
        .route("remove", PathTemplate::delete("/{id}").path_params(integer_id()));

    Resource::new()
        .route("root", PathTemplate::get("/"))
        .route(
            "zoo",
            Resource::at("/zoo")
                .route("animals", animals)
                .route("health", PathTemplate::get("/health")),
        )
        .into()
}

pub fn zoo_implementation() -> Implementation<&'static str> {
    Implementation::group()
        .with("root", Implementation::handler("root_handler"))
        .with(
            "zoo",
            Implementation::group()
                .with(
                    "animals",
                    Implementation::group()
                        .with("list", Implementation::handler("get_animals"))
                        .with("create", Implementation::handler("create_animal"))
                        .with("read", Implementation::handler("get_animal"))
                        .with("update", Implementation::handler("update_animal"))
                        .with("patch", Implementation::handler("patch_animal"))
                        .with("remove", Implementation::handler("delete_animal")),
                )
                .with("health", Implementation::handler("health_check")),
        )
}
