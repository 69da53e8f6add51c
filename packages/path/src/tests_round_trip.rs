//! Parse/serialize round-trip behavior

use crate::{parse, parse_with_options, serialize, ParseOptions};

const CANONICAL: &[&str] = &[
    "M 10 20 L 30 40 Z",
    "M 0 0 C 1 2 3 4 5 6 L 7 8",
    "M 1.5 -2.25 L 3 4 Z M 10 10 L 20 20 Z",
    "M 0 0",
];

#[test]
fn test_canonical_text_survives_round_trip() {
    for text in CANONICAL {
        assert_eq!(&serialize(&parse(text)), text, "round trip of {text:?}");
    }
}

#[test]
fn test_canonical_nodes_survive_round_trip() {
    for text in CANONICAL {
        let nodes = parse(text);
        assert_eq!(parse(&serialize(&nodes)), nodes, "nodes of {text:?}");
    }
}

#[test]
fn test_whitespace_and_commas_normalize() {
    assert_eq!(
        serialize(&parse("M10,20L30,40z")),
        "M 10 20 L 30 40 Z"
    );
}

#[test]
fn test_serialization_is_idempotent_after_one_parse() {
    let inputs = [
        "M0 0 Q 10 10 20 0 T 40 0",
        "m 5 5 h 10 v 10 h -10 z",
        "M 0 0 C 10 10 20 10 30 0 S 50 -10 60 0",
        "M 0 0 A 25 25 0 0 1 50 20 a 1 1 0 0 0 2 2",
        "L 1 1 M 2 2 X 7 L 3",
        "M 0.1 0.2 L 0.30000000000000004 1e-7",
        "",
        "garbage",
    ];

    for input in inputs {
        let once = serialize(&parse(input));
        let twice = serialize(&parse(&once));
        assert_eq!(once, twice, "idempotence of {input:?}");
        assert_eq!(parse(&once), parse(&twice));
    }
}

#[test]
fn test_idempotence_with_implicit_repeat() {
    let options = ParseOptions {
        implicit_repeat: true,
        exact_quadratic: true,
    };
    let input = "M 0 0 10 10 20 0 q 5 5 10 0 5 -5 10 0";

    let once = serialize(&parse_with_options(input, options));
    let twice = serialize(&parse_with_options(&once, options));
    assert_eq!(once, twice);
}
