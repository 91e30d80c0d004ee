//! Binding files.
//!
//! Either a list of `{"groupId", "sceneId"}` objects or a plain
//! `{"group": "scene"}` map.

use std::{collections::BTreeMap, path::Path};

use castlink_session::GroupSceneBinding;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum BindingsFile {
    List(Vec<GroupSceneBinding>),
    Map(BTreeMap<String, String>),
}

/// Parse binding JSON.
pub fn parse(json: &str) -> Result<Vec<GroupSceneBinding>, serde_json::Error> {
    Ok(match serde_json::from_str(json)? {
        BindingsFile::List(bindings) => bindings,
        BindingsFile::Map(map) => {
            map.into_iter().map(|(group, scene)| GroupSceneBinding::new(group, scene)).collect()
        },
    })
}

/// Read and parse a binding file.
pub fn load(path: &Path) -> Result<Vec<GroupSceneBinding>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(parse(&json)?)
}

/// Parse a `name=value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.trim().to_owned(), value.trim().to_owned())),
        _ => Err(format!("expected name=value, got {raw:?}")),
    }
}
