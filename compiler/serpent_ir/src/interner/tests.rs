use super::*;

#[test]
fn empty_string_is_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.get(""), Some(Name::EMPTY));
    assert_eq!(interner.lookup(Name::EMPTY), "");
    assert_eq!(interner.len(), 1);
}

#[test]
fn interning_is_idempotent() {
    let mut interner = StringInterner::new();
    let a = interner.intern("spam");
    let b = interner.intern("eggs");
    assert_ne!(a, b);
    assert_eq!(interner.intern("spam"), a);
    assert_eq!(interner.lookup(b), "eggs");
    assert_eq!(interner.len(), 3);
}

#[test]
fn non_ascii_identifiers() {
    let mut interner = StringInterner::new();
    let name = interner.intern("π_résumé");
    assert_eq!(interner.lookup(name), "π_résumé");
}

#[test]
fn foreign_handle_is_empty() {
    let mut big = StringInterner::new();
    for i in 0..10 {
        big.intern(&format!("n{i}"));
    }
    let small = StringInterner::new();
    let foreign = big.intern("n9");
    assert_eq!(small.lookup(foreign), "");
}
