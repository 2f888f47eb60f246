use super::*;
use crate::build::Build;
use crate::lazy::MtCell;
use crate::mt::Mt;
use crate::types::BriefType;
use assoc_common::{Anchor, Interner};
use std::cell::Cell;
use std::rc::Rc;

fn anchor() -> Anchor {
    Anchor::new(1, 0, 0)
}

#[test]
fn test_string_key_matches_exactly() {
    let interner = Interner::new();
    let kt = KeyType::string(interner.intern("name"), anchor());
    assert!(kt.matches(Some("name"), &interner));
    assert!(!kt.matches(Some("nam"), &interner));
    assert!(!kt.matches(Some("name2"), &interner));
}

#[test]
fn test_int_key_matches_numeric_lookup() {
    let interner = Interner::new();
    let kt = KeyType::int(5, anchor());
    assert!(kt.matches(Some("5"), &interner));
    assert!(!kt.matches(Some("7"), &interner));
    assert!(!kt.matches(Some("five"), &interner));
}

#[test]
fn test_integer_wildcard_matches_numeric_looking_only() {
    let interner = Interner::new();
    let kt = KeyType::integer_wildcard(anchor());
    assert!(kt.matches(Some("0"), &interner));
    assert!(kt.matches(Some("123"), &interner));
    assert!(!kt.matches(Some("abc"), &interner));
    assert!(!kt.matches(Some(""), &interner));
}

#[test]
fn test_any_wildcard_matches_everything() {
    let interner = Interner::new();
    let kt = KeyType::any(anchor());
    assert!(kt.matches(Some("whatever"), &interner));
    assert!(kt.matches(Some("0"), &interner));
}

#[test]
fn test_element_access_matches_all_entries() {
    let interner = Interner::new();
    assert!(KeyType::string(interner.intern("a"), anchor()).matches(None, &interner));
    assert!(KeyType::integer_wildcard(anchor()).matches(None, &interner));
}

#[test]
fn test_key_type_from_mt_collects_literals() {
    let interner = Interner::new();
    let a = Build::new(anchor(), BriefType::string())
        .literal(interner.intern("alpha"))
        .get();
    let idx = Build::new(anchor(), BriefType::int())
        .literal(interner.intern("3"))
        .get();
    let kt = KeyType::from_mt(&Mt::new(vec![a, idx]), anchor(), &interner);
    assert!(kt.matches(Some("alpha"), &interner));
    assert!(kt.matches(Some("3"), &interner));
    assert!(!kt.matches(Some("beta"), &interner));
}

#[test]
fn test_key_type_from_mt_non_literal_int_is_wildcard() {
    let interner = Interner::new();
    let idx = Build::new(anchor(), BriefType::int()).get();
    let kt = KeyType::from_mt(&Mt::new(vec![idx]), anchor(), &interner);
    assert!(kt.matches(Some("42"), &interner));
    assert!(!kt.matches(Some("x"), &interner));
}

#[test]
fn test_concrete_names_skip_wildcards() {
    let interner = Interner::new();
    let mut names = smallvec::SmallVec::new();
    names.push(KeyName::Str(interner.intern("a")));
    names.push(KeyName::Int(0));
    names.push(KeyName::Any);
    names.push(KeyName::AnyInt);
    let kt = KeyType::new(names, anchor());
    assert_eq!(kt.concrete_names(&interner), vec!["a".to_string(), "0".to_string()]);
}

#[test]
fn test_key_value_memoized_across_forces() {
    let interner = Interner::new();
    let runs = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&runs);
    let key = Key::new(KeyType::string(interner.intern("k"), anchor()), anchor()).value(
        MtCell::new(move || {
            counter.set(counter.get() + 1);
            Mt::single(Build::new(anchor(), BriefType::int()).get())
        }),
    );

    assert!(!key.is_value_forced());
    let first = key.value_types();
    let second = key.value_types();
    assert_eq!(runs.get(), 1);
    assert_eq!(first.types().len(), second.types().len());
    assert!(Rc::ptr_eq(&first.types()[0], &second.types()[0]));
}
