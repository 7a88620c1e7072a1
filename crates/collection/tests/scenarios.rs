use rowstore_collection::{Collection, RowId};
use rowstore_value::Value;

fn object(pairs: &[(&str, Value)]) -> rowstore_collection::Object {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Scenario 1: Add `{name:"A"}`, Add `{name:"B"}`, Remove handle 0, Add
/// `{name:"C"}` -> last Add returns 0; Fetch(0)={name:"C"}, Fetch(1)={name:"B"}.
#[test]
fn handle_reuse_scenario() {
    let c = Collection::new();
    let a = c.add(object(&[("name", Value::String("A".into()))])).unwrap();
    let b = c.add(object(&[("name", Value::String("B".into()))])).unwrap();
    c.remove(a);
    let last = c.add(object(&[("name", Value::String("C".into()))])).unwrap();

    assert_eq!(last, RowId(0));
    assert_eq!(c.fetch(RowId(0)).unwrap()["name"], Value::String("C".into()));
    assert_eq!(c.fetch(b).unwrap()["name"], Value::String("B".into()));
}

/// Scenario 2: Insert 1000 rows with `{x:int, y:int}`;
/// `Where("x", v -> v>500).Count == |{i: 1..1000 : x_i > 500}|`.
#[test]
fn where_count_matches_predicate_over_1000_rows() {
    let c = Collection::new();
    let mut expected = 0u64;
    for i in 0..1000i64 {
        c.add(object(&[("x", Value::Int(i)), ("y", Value::Int(1000 - i))])).unwrap();
        if i > 500 {
            expected += 1;
        }
    }
    let q = c.query().where_("x", |v| *v.as_int().unwrap() > 500);
    assert_eq!(q.count(), expected);
}

#[test]
fn count_equals_size_minus_free_across_add_remove_sequence() {
    let c = Collection::new();
    let mut handles = Vec::new();
    for i in 0..50i32 {
        handles.push(c.add(object(&[("x", Value::I32(i))])).unwrap());
    }
    for h in handles.iter().step_by(3) {
        c.remove(*h);
    }
    let removed = (0..50).step_by(3).count() as u32;
    assert_eq!(c.count(), 50 - removed);
}

#[test]
fn fetch_succeeds_exactly_until_remove() {
    let c = Collection::new();
    let h = c.add(object(&[("x", Value::I32(1))])).unwrap();
    assert!(c.fetch(h).is_some());
    c.remove(h);
    assert!(c.fetch(h).is_none());
}

#[test]
fn where_composition_intersects_two_properties() {
    let c = Collection::new();
    for i in 0..20i32 {
        c.add(object(&[
            ("a", Value::I32(i)),
            ("b", Value::String(if i % 2 == 0 { "even".into() } else { "odd".into() })),
        ]))
        .unwrap();
    }
    let q = c
        .query()
        .where_("a", |v| *v.as_i32().unwrap() >= 10)
        .where_("b", |v| v.as_string().unwrap().as_str() == "even");
    // a>=10 -> i in 10..20 (10 values); even among those -> 10,12,14,16,18 (5)
    assert_eq!(q.count(), 5);
}
