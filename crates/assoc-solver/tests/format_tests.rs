use super::*;
use crate::build::Build;
use crate::key::{Key, KeyType};
use crate::lazy::MtCell;
use crate::types::BriefType;
use assoc_common::{Anchor, Interner};
use std::cell::RefCell;
use std::rc::Rc;

fn anchor() -> Anchor {
    Anchor::new(1, 0, 0)
}

fn str_literal(interner: &Interner, text: &str) -> Rc<crate::types::DeepType> {
    Build::new(anchor(), BriefType::string())
        .literal(interner.intern(text))
        .get()
}

/// An opaque value that renders through the raw-source fallback.
fn source_value(interner: &Interner, src: &str) -> Mt {
    Mt::single(
        Build::new(anchor(), BriefType::new())
            .src_text(interner.intern(src))
            .get(),
    )
}

#[test]
fn test_string_literal_union_renders_quoted_alternatives() {
    let interner = Interner::new();
    let mt = Mt::new(vec![
        str_literal(&interner, "x"),
        str_literal(&interner, "y"),
    ]);
    assert_eq!(mt.brief_value_text_top(100, &interner), "'x'|'y'");
}

#[test]
fn test_duplicate_literals_dedupe() {
    let interner = Interner::new();
    let mt = Mt::new(vec![
        str_literal(&interner, "x"),
        str_literal(&interner, "x"),
    ]);
    assert_eq!(mt.brief_value_text_top(100, &interner), "'x'");
}

#[test]
fn test_sequential_integer_keys_render_as_tuple() {
    let interner = Interner::new();
    let keys = [
        ("0", source_value(&interner, "A")),
        ("1", source_value(&interner, "B")),
    ]
    .map(|(name, value)| {
        Key::new(KeyType::string(interner.intern(name), anchor()), anchor())
            .value(MtCell::ready(value))
    });
    let mt = Build::new(anchor(), BriefType::array()).keys(keys).mt();
    assert_eq!(mt.brief_value_text_top(100, &interner), "(A, B)");
}

#[test]
fn test_named_keys_render_as_brace_listing() {
    let interner = Interner::new();
    let keys = ["id", "name"].map(|name| {
        Key::new(KeyType::string(interner.intern(name), anchor()), anchor())
            .value(MtCell::ready(Mt::new(Vec::new())))
    });
    let mt = Build::new(anchor(), BriefType::array()).keys(keys).mt();
    assert_eq!(mt.brief_value_text_top(100, &interner), "{id:, name:}");
}

#[test]
fn test_number_literal_renders_bare() {
    let interner = Interner::new();
    let mt = Mt::single(
        Build::new(anchor(), BriefType::int())
            .literal(interner.intern("42"))
            .get(),
    );
    assert_eq!(mt.brief_value_text_top(100, &interner), "42");
}

#[test]
fn test_bool_literal_renders_as_keyword() {
    let interner = Interner::new();
    let t = Mt::single(
        Build::new(anchor(), BriefType::bool())
            .literal(interner.intern("1"))
            .get(),
    );
    let f = Mt::single(
        Build::new(anchor(), BriefType::bool())
            .literal(interner.intern("0"))
            .get(),
    );
    assert_eq!(t.brief_value_text_top(100, &interner), "true");
    assert_eq!(f.brief_value_text_top(100, &interner), "false");
}

#[test]
fn test_bool_literal_with_odd_text_renders_quoted() {
    let interner = Interner::new();
    let odd = Mt::single(
        Build::new(anchor(), BriefType::bool())
            .literal(interner.intern("yes"))
            .get(),
    );
    assert_eq!(odd.brief_value_text_top(100, &interner), "'yes'");
    assert_eq!(odd.var_export(&interner), "'yes'");
}

#[test]
fn test_constant_rendered_by_name() {
    let interner = Interner::new();
    let mt = Mt::single(
        Build::new(anchor(), BriefType::int())
            .literal(interner.intern("3"))
            .cst_name(interner.intern("STATUS_DONE"))
            .get(),
    );
    assert_eq!(mt.brief_value_text_top(100, &interner), "STATUS_DONE");
}

#[test]
fn test_list_renders_element_in_brackets() {
    let interner = Interner::new();
    let mt = Mt::single(
        Build::new(anchor(), BriefType::array())
            .brief_elem(BriefType::int())
            .keys([Key::new(KeyType::integer_wildcard(anchor()), anchor())
                .value(MtCell::ready(Mt::single(
                    Build::new(anchor(), BriefType::int())
                        .literal(interner.intern("7"))
                        .get(),
                )))])
            .get(),
    );
    let text = mt.brief_value_text_top(100, &interner);
    assert!(text.starts_with('['), "got: {text}");
    assert!(text.contains('7'), "got: {text}");
}

#[test]
fn test_truncation_appends_ellipsis() {
    let interner = Interner::new();
    let mt = Mt::new(vec![
        str_literal(&interner, "first"),
        str_literal(&interner, "second"),
    ]);
    let text = mt.brief_value_text_top(8, &interner);
    assert_eq!(text, "'first'|...");
}

#[test]
fn test_source_fallback_single_lines_and_dedupes() {
    let interner = Interner::new();
    let a = Build::new(anchor(), BriefType::new())
        .src_text(interner.intern("foo(\n  1,\n  2\n)"))
        .get();
    let b = Build::new(anchor(), BriefType::new())
        .src_text(interner.intern("foo(\n  1,\n  2\n)"))
        .get();
    let mt = Mt::new(vec![a, b]);
    assert_eq!(mt.brief_value_text_top(100, &interner), "foo( 1, 2 )");
}

#[test]
fn test_self_referential_list_renders_circular_marker() {
    let interner = Interner::new();
    let slot: Rc<RefCell<Option<Mt>>> = Rc::new(RefCell::new(None));
    let thunk_slot = Rc::clone(&slot);
    let key = Key::new(KeyType::integer_wildcard(anchor()), anchor())
        .value(MtCell::new(move || thunk_slot.borrow().clone().unwrap()));
    let mt = Build::new(anchor(), BriefType::array()).keys([key]).mt();
    *slot.borrow_mut() = Some(mt.clone());

    let text = mt.brief_value_text_top(100, &interner);
    assert!(text.contains("*circ*"), "got: {text}");
}

#[test]
fn test_var_export_record() {
    let interner = Interner::new();
    let keys = [
        ("name", str_literal(&interner, "jo")),
        ("age", Build::new(anchor(), BriefType::int())
            .literal(interner.intern("30"))
            .get()),
    ]
    .map(|(name, value)| {
        Key::new(KeyType::string(interner.intern(name), anchor()), anchor())
            .value(MtCell::ready(Mt::single(value)))
    });
    let mt = Build::new(anchor(), BriefType::array()).keys(keys).mt();
    assert_eq!(mt.var_export(&interner), "['name' => 'jo', 'age' => 30]");
}

#[test]
fn test_var_export_scalars_and_null() {
    let interner = Interner::new();
    assert_eq!(
        Mt::single(str_literal(&interner, "s")).var_export(&interner),
        "'s'"
    );
    assert_eq!(
        Mt::single(Build::new(anchor(), BriefType::bool())
            .literal(interner.intern("1"))
            .get())
        .var_export(&interner),
        "true"
    );
    assert_eq!(Mt::new(Vec::new()).var_export(&interner), "null");
}
