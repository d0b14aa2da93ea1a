//! Deterministic source rendering of decision programs.
//!
//! The rendering is plain text, reproducible byte for byte for a given
//! program: branches appear in ascending index order and the selector
//! local of each conditional depth gets a stable name (`edge_index`,
//! `edge_index_1`, ...). The emitted function calls through three
//! name-keyed tables (`actions`, `feature_conditions`, `known_behaviors`)
//! matching the program's manifest.

use super::Decision;

/// Derive a snake-case identifier from a behavior name.
///
/// Alphanumerics are kept (lowercased, with a separator at lower-to-upper
/// camel boundaries); every other run of characters collapses into one
/// underscore. An empty result falls back to `behavior`.
pub(crate) fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut boundary = true;
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() {
                if prev_lower {
                    out.push('_');
                }
                out.extend(ch.to_lowercase());
                prev_lower = false;
            } else {
                out.push(ch);
                prev_lower = true;
            }
            boundary = false;
        } else if !boundary {
            out.push('_');
            boundary = true;
            prev_lower = false;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("behavior");
    }
    out
}

/// Render a decision program as a standalone function definition.
pub(crate) fn render(entry_point: &str, decision: &Decision) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "fn {entry_point}(observation: &Observation) -> Action {{\n"
    ));
    render_decision(&mut out, decision, 1, 0);
    out.push_str("}\n");
    out
}

fn render_decision(out: &mut String, decision: &Decision, indent: usize, depth: usize) {
    let pad = "    ".repeat(indent);
    match decision {
        Decision::CallAction { name } => {
            out.push_str(&format!("{pad}actions[\"{name}\"](observation)\n"));
        }
        Decision::CallBehavior { name } => {
            out.push_str(&format!("{pad}known_behaviors[\"{name}\"](observation)\n"));
        }
        Decision::Branch { condition, arms } => {
            let local = if depth == 0 {
                "edge_index".to_string()
            } else {
                format!("edge_index_{depth}")
            };
            out.push_str(&format!(
                "{pad}let {local} = feature_conditions[\"{condition}\"](observation);\n"
            ));
            for (position, (index, arm)) in arms.iter().enumerate() {
                if position == 0 {
                    out.push_str(&format!("{pad}if {local} == {index} {{\n"));
                } else {
                    out.push_str(&format!("{pad}}} else if {local} == {index} {{\n"));
                }
                render_decision(out, arm, indent + 1, depth + 1);
            }
            out.push_str(&format!("{pad}}} else {{\n"));
            out.push_str(&format!("{pad}    unreachable!()\n"));
            out.push_str(&format!("{pad}}}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::snake_case;

    #[test]
    fn snake_case_flattens_names() {
        assert_eq!(snake_case("Pet the cat"), "pet_the_cat");
        assert_eq!(snake_case("Greater or equal to 0 ?"), "greater_or_equal_to_0");
        assert_eq!(snake_case("GatherWood"), "gather_wood");
        assert_eq!(snake_case("  ?? "), "behavior");
    }
}
