//! Property-based tests for the read/write round trip.
//!
//! Container graphs are generated from the three value shapes the wire
//! format supports (bare-able tokens, strings needing quotes, multi-line
//! text) plus both sentinels, then pushed through serialize → parse and
//! serialize → parse → serialize.

use proptest::prelude::*;
use pdbx_cif::{parse_str, to_string, Category, Container, Value};

/// Single-line printable ASCII; the writer decides quoting.
fn inline_string() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{0,24}").expect("valid regex")
}

/// Multi-line text where no line begins with `;` (which would be
/// indistinguishable from the field terminator).
fn multiline_string() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -:<-~][ -~]{0,14}(\n([ -:<-~][ -~]{0,14})?){1,3}")
        .expect("valid regex")
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => inline_string().prop_map(Value::Present),
        2 => multiline_string().prop_map(Value::Present),
        1 => Just(Value::Unknown),
        1 => Just(Value::Inapplicable),
    ]
}

/// Rows for one category: fixed arity, 1..=4 rows.
fn category_rows() -> impl Strategy<Value = Vec<Vec<Value>>> {
    (1usize..=3).prop_flat_map(|items| {
        prop::collection::vec(prop::collection::vec(value(), items), 1..=4)
    })
}

fn containers() -> impl Strategy<Value = Vec<Container>> {
    prop::collection::vec(prop::collection::vec(category_rows(), 1..=3), 1..=2).prop_map(
        |blocks| {
            blocks
                .into_iter()
                .enumerate()
                .map(|(b, categories)| {
                    let mut block = Container::data(format!("block_{}", b));
                    for (c, rows) in categories.into_iter().enumerate() {
                        let mut category = Category::new(format!("cat_{}", c));
                        for i in 0..rows[0].len() {
                            category.add_item(format!("item_{}", i)).unwrap();
                        }
                        for row in rows {
                            category.append_row(row).unwrap();
                        }
                        block.insert_category(category).unwrap();
                    }
                    block
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn prop_roundtrip(original in containers()) {
        let text = to_string(&original).unwrap();
        let reparsed = parse_str(&text).unwrap();
        prop_assert_eq!(&original, &reparsed);
    }

    #[test]
    fn prop_serialization_idempotent(original in containers()) {
        let once = to_string(&original).unwrap();
        let twice = to_string(&parse_str(&once).unwrap()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_loop_values_divide_evenly(original in containers()) {
        let text = to_string(&original).unwrap();
        for container in parse_str(&text).unwrap() {
            for category in container.categories() {
                for row in category.rows() {
                    prop_assert_eq!(row.len(), category.items().len());
                }
            }
        }
    }

    #[test]
    fn prop_literal_sentinels_stay_literal(text in "[.?]") {
        let mut block = Container::data("d");
        let mut category = Category::new("c");
        category.add_item("v").unwrap();
        category.append_row(vec![Value::Present(text.clone())]).unwrap();
        block.insert_category(category).unwrap();

        let reparsed = parse_str(&to_string(&[block]).unwrap()).unwrap();
        let v = reparsed[0].category("c").unwrap().first("v").unwrap();
        prop_assert_eq!(v, &Value::Present(text));
    }
}
