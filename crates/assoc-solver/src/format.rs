//! Human-readable rendering of unions.
//!
//! `brief_value_text` produces the short summary shown by completion and
//! hover UI; `var_export` produces a PHP-style literal serialization for
//! "show computed value" displays. Both thread a [`RenderGuard`] so a
//! self-referential value draws a fixed circular marker instead of
//! recursing forever.

use crate::mt::Mt;
use crate::recursion::RenderGuard;
use assoc_common::Interner;
use assoc_common::limits::{SRC_TEXT_RENDER_LEN, TUPLE_ELEM_RENDER_LEN};

/// Marker drawn when a value reaches itself mid-render.
const CIRCULAR_MARKER: &str = "*circ*";

/// Truncate to `max_len` characters, appending an ellipsis marker when
/// anything was cut.
fn truncate(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Collapse a multi-line source fragment to one bounded line.
fn single_line(text: &str, max_len: usize) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&joined, max_len)
}

impl Mt {
    /// Brief rendering with a fresh in-progress set.
    pub fn brief_value_text_top(&self, max_len: usize, interner: &Interner) -> String {
        let mut guard = RenderGuard::new();
        self.brief_value_text(max_len, interner, &mut guard)
    }

    /// Brief rendering. Fragments, in priority order: tuple or key-name
    /// listing, literal alternatives, list element, raw-source fallback —
    /// joined with `|` and truncated to `max_len`.
    pub fn brief_value_text(
        &self,
        max_len: usize,
        interner: &Interner,
        guard: &mut RenderGuard,
    ) -> String {
        let members = self.types();
        if guard.any_visiting(&members) {
            return CIRCULAR_MARKER.to_string();
        }
        guard.mark(&members);

        let mut fragments: Vec<String> = Vec::new();

        let key_names = self.key_names(interner);
        if !key_names.is_empty() {
            let sequential = key_names
                .iter()
                .enumerate()
                .all(|(i, name)| name == &i.to_string());
            if sequential {
                let positions = key_names
                    .iter()
                    .map(|name| {
                        self.get_key(Some(name), interner).brief_value_text(
                            TUPLE_ELEM_RENDER_LEN,
                            interner,
                            guard,
                        )
                    })
                    .collect::<Vec<_>>();
                fragments.push(format!("({})", positions.join(", ")));
            } else {
                let listed = key_names
                    .iter()
                    .map(|name| format!("{name}:"))
                    .collect::<Vec<_>>();
                fragments.push(format!("{{{}}}", listed.join(", ")));
            }
        }

        let mut literals: Vec<String> = Vec::new();
        for t in members.iter() {
            let Some(lit) = t.literal else { continue };
            let text = interner.resolve(lit);
            let bare = t.brief.is_number()
                || members.iter().all(|m| m.src_text == Some(lit));
            let rendered = if bare {
                match t.cst_name {
                    Some(cst) => interner.resolve(cst),
                    None => text,
                }
            } else if t.brief.is_bool() && (text == "1" || text == "0") {
                if text == "1" { "true".to_string() } else { "false".to_string() }
            } else {
                format!("'{text}'")
            };
            if !literals.contains(&rendered) {
                literals.push(rendered);
            }
        }
        if !literals.is_empty() {
            fragments.push(literals.join("|"));
        }

        if members.iter().any(|t| t.has_list_elems()) {
            let elem = self.get_el(interner).brief_value_text(max_len, interner, guard);
            fragments.push(format!("[{elem}]"));
        }

        if fragments.is_empty() && !members.is_empty() {
            let mut sources: Vec<String> = Vec::new();
            for t in members.iter().filter(|t| t.exact) {
                let Some(src) = t.src_text else { continue };
                let line = interner.with_text(src, |s| single_line(s, SRC_TEXT_RENDER_LEN));
                if !sources.contains(&line) {
                    sources.push(line);
                }
            }
            fragments.push(sources.join("|"));
        }

        guard.unmark(&members);
        truncate(&fragments.join("|"), max_len)
    }

    /// PHP-style literal serialization of the computed value.
    pub fn var_export(&self, interner: &Interner) -> String {
        let mut guard = RenderGuard::new();
        self.var_export_guarded(interner, &mut guard)
    }

    fn var_export_guarded(&self, interner: &Interner, guard: &mut RenderGuard) -> String {
        let members = self.types();
        if guard.any_visiting(&members) {
            return format!("'{CIRCULAR_MARKER}'");
        }
        guard.mark(&members);

        let key_names = self.key_names(interner);
        let out = if !key_names.is_empty() {
            let entries = key_names
                .iter()
                .map(|name| {
                    let value = self
                        .get_key(Some(name), interner)
                        .var_export_guarded(interner, guard);
                    if name.bytes().all(|b| b.is_ascii_digit()) {
                        format!("{name} => {value}")
                    } else {
                        format!("'{name}' => {value}")
                    }
                })
                .collect::<Vec<_>>();
            format!("[{}]", entries.join(", "))
        } else if let Some(lit) = members.iter().find_map(|t| t.literal.map(|l| (t, l))) {
            let (t, lit) = lit;
            let text = interner.resolve(lit);
            if t.brief.is_number() {
                text
            } else if t.brief.is_bool() && (text == "1" || text == "0") {
                if text == "1" { "true".to_string() } else { "false".to_string() }
            } else {
                format!("'{text}'")
            }
        } else if members.iter().any(|t| t.has_list_elems()) {
            format!("[{}]", self.get_el(interner).var_export_guarded(interner, guard))
        } else {
            "null".to_string()
        };

        guard.unmark(&members);
        out
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
