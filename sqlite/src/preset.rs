//! Implements the `for` instruction: preset lookup, argument substitution,
//! and merge into the host query's instructions (spec §4.2).

use crate::error::{CompileError, Result};
use crate::model::Model;
use crate::symbols;
use serde_json::{Map, Value};

/// One `for` entry: a preset slug with an optional substitution argument.
struct PresetRef {
    slug: String,
    arg: Option<Value>,
}

fn parse_for(value: &Value) -> Result<Vec<PresetRef>> {
    match value {
        Value::Array(slugs) => slugs
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| PresetRef {
                        slug: s.to_string(),
                        arg: None,
                    })
                    .ok_or_else(|| CompileError::InvalidInstruction {
                        instruction: "for".into(),
                        reason: "list entries must be preset slugs".into(),
                    })
            })
            .collect(),
        Value::Object(map) => Ok(map
            .iter()
            .map(|(slug, arg)| PresetRef {
                slug: slug.clone(),
                arg: if arg.is_null() { None } else { Some(arg.clone()) },
            })
            .collect()),
        other => Err(CompileError::InvalidInstruction {
            instruction: "for".into(),
            reason: format!("must be a list of preset slugs or a slug-to-argument map, got {other}"),
        }),
    }
}

/// Expands `for` against `host`, mutating it in place with each named
/// preset's instructions merged in, host-wins-on-collision.
pub fn expand_presets(model: &Model, for_value: &Value, host: &mut Map<String, Value>) -> Result<()> {
    for entry in parse_for(for_value)? {
        let preset = model.preset(&entry.slug).ok_or_else(|| CompileError::PresetNotFound {
            preset: entry.slug.clone(),
            model: model.slug.clone(),
        })?;

        let mut expanded = preset.instructions.clone();
        if let Some(arg) = &entry.arg {
            substitute_value(&mut expanded, arg);
        }

        let Value::Object(clone_map) = expanded else {
            return Err(CompileError::InvalidInstruction {
                instruction: "for".into(),
                reason: format!("preset `{}` instructions must be an object", entry.slug),
            });
        };
        merge_into(host, clone_map);
    }
    Ok(())
}

fn substitute_value(value: &mut Value, arg: &Value) {
    match value {
        Value::String(s) if s == symbols::VALUE => {
            *value = Value::Object(Map::from_iter([(symbols::VALUE.to_string(), arg.clone())]));
        }
        Value::String(s) if s.contains(symbols::VALUE) => {
            let replacement = match arg {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            *s = s.replace(symbols::VALUE, &replacement);
        }
        Value::Array(items) => {
            for item in items {
                substitute_value(item, arg);
            }
        }
        Value::Object(map) => {
            for v in map.values_mut() {
                substitute_value(v, arg);
            }
        }
        _ => {}
    }
}

/// Merges `clone`'s clauses into `host`: arrays concatenate (preset first,
/// host second), objects shallow-merge with host keys winning, scalars use
/// the host value when present.
fn merge_into(host: &mut Map<String, Value>, clone: Map<String, Value>) {
    for (key, clone_value) in clone {
        match host.get_mut(&key) {
            None => {
                host.insert(key, clone_value);
            }
            Some(host_value) => match (host_value, clone_value) {
                (Value::Array(host_items), Value::Array(clone_items)) => {
                    let mut merged = clone_items;
                    merged.append(host_items);
                    *host_items = merged;
                }
                (Value::Object(host_obj), Value::Object(clone_obj)) => {
                    let mut merged = clone_obj;
                    for (k, v) in host_obj.iter() {
                        merged.insert(k.clone(), v.clone());
                    }
                    *host_obj = merged;
                }
                // scalar or mismatched shapes: host value already in place wins.
                _ => {}
            },
        }
    }
}
