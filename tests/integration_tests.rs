// tests/integration_tests.rs
//! Integration tests for the block language and its ledger

use chainscript::{LedgerConfig, LineKind, Session, Value};
use proptest::prelude::*;
use sha2::{Digest, Sha256};

const PERSON: &str = "block Person = (name: str, age: int)";

fn session(difficulty: usize) -> Session {
    Session::with_config(LedgerConfig::default().with_difficulty(difficulty)).unwrap()
}

fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[test]
fn test_scenario_define_add_mine_export() {
    let dir = tempfile::tempdir().unwrap();
    let export_path = dir.path().join("blockchain.json");
    let mut session =
        Session::with_config(LedgerConfig::default().with_export_path(&export_path)).unwrap();

    let output = session.run(PERSON);
    assert_eq!(
        output.transcript.text(),
        "Created block \"Person\" with [('name', 'STR'), ('age', 'INT')]\n"
    );
    let fields: Vec<_> = session
        .registry()
        .get("Person")
        .unwrap()
        .fields()
        .iter()
        .map(|f| (f.name.as_str(), f.ty.name()))
        .collect();
    assert_eq!(fields, vec![("name", "STR"), ("age", "INT")]);

    let output = session.run(r#"add Person = (name: "Alice", age: 30)"#);
    assert_eq!(output.transcript.text(), "Person added to blockchain\n");
    assert_eq!(output.chain.len(), 2);
    assert_eq!(
        output.chain[1].data,
        Value::Dict(
            chainscript::FieldMap::new()
                .with_field("name", "Alice")
                .with_field("age", 30)
        )
    );

    let output = session.run("mine Person");
    assert_eq!(output.transcript.text(), "Mined blockchain!\n");
    assert!(output.chain[1].hash.starts_with("0000"));

    let output = session.run("export Person");
    assert!(output.transcript.is_empty());

    let exported: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&export_path).unwrap()).unwrap();
    let keys: Vec<_> = exported.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["Block0".to_string(), "Block1".to_string()]);
    assert_eq!(exported["Block1"]["Data"]["name"], "Alice");
    assert_eq!(exported["Block1"]["Previous Hash"], exported["Block0"]["Hash"]);
}

#[test]
fn test_scenario_missing_field() {
    let mut session = session(2);
    session.run(&format!("{}\nadd Person = (name: \"Alice\", age: 30)", PERSON));

    let output = session.run(r#"add Person = (name: "Bob")"#);

    assert_eq!(
        output.transcript.text(),
        "[Semantic Error] Missing required fields for 'Person': ['age']\n"
    );
    assert_eq!(output.chain.len(), 2);
}

#[test]
fn test_scenario_type_mismatch() {
    let mut session = session(2);
    session.run(PERSON);

    let output = session.run("add Person = (name: 42, age: 30)");

    assert_eq!(
        output.transcript.text(),
        "[Semantic Error] 'name' should be a string, got int\n"
    );
    assert_eq!(output.chain.len(), 1);
}

#[test]
fn test_scenario_illegal_character() {
    let mut session = session(2);

    let output = session.run(&format!("{}\n#\nadd Person = (name: \"A\", age: 1)", PERSON));

    let diagnostics: Vec<_> = output.transcript.diagnostics().collect();
    assert_eq!(diagnostics, vec!["[Lexical Error] Line 2: Illegal character '#'"]);
    assert!(output.transcript.text().contains("Person added to blockchain"));
    assert_eq!(output.chain.len(), 2);
}

#[test]
fn test_add_on_undefined_schema_leaves_chain_alone() {
    let mut session = session(2);

    let output = session.run("add Car = (wheels: 4)");

    assert_eq!(output.transcript.text(), "[Semantic Error] Undefined block 'Car'\n");
    assert_eq!(output.chain.len(), 1);
}

#[test]
fn test_extra_field_is_warned_and_stored() {
    let mut session = session(2);
    session.run(PERSON);

    let output = session.run(r#"add Person = (name: "Eve", age: 22, city: "Oslo")"#);

    assert_eq!(
        output.transcript.text(),
        "[Semantic Error] Unknown attribute 'city' for block 'Person'\nPerson added to blockchain\n"
    );
    assert_eq!(output.chain.len(), 2);
    assert_eq!(
        output.chain[1].data.as_dict().unwrap().get("city"),
        Some(&Value::from("Oslo"))
    );
}

#[test]
fn test_mine_twice_is_a_no_op() {
    let mut session = session(3);
    session.run(&format!("{}\nadd Person = (name: \"A\", age: 1)\nmine Person", PERSON));
    let first = session.snapshot();

    session.run("mine Person");

    assert_eq!(session.snapshot(), first);
}

#[test]
fn test_mined_chain_hashes_and_links() {
    let mut session = session(3);
    let output = session.run(&format!(
        "{}\nadd Person = (name: \"A\", age: 1)\nmine Person\nadd Person = (name: \"B\", age: 2)\nmine Person",
        PERSON
    ));

    for record in &output.chain {
        assert!(record.hash.starts_with("000"));
        assert_eq!(
            record.hash,
            sha256_hex(&format!("{}{}", record.data, record.nonce))
        );
    }
    for pair in output.chain.windows(2) {
        assert_eq!(pair[1].previous_hash.as_deref(), Some(pair[0].hash.as_str()));
    }
    assert!(session.ledger().is_valid());
}

#[test]
fn test_genesis_block() {
    let session = session(4);
    let genesis = &session.snapshot()[0];

    assert_eq!(genesis.index, Some(0));
    assert_eq!(genesis.previous_hash.as_deref(), Some("0".repeat(64).as_str()));
    assert!(genesis.hash.starts_with("0000"));
    assert_eq!(genesis.hash, sha256_hex(&format!("Genesis Block{}", genesis.nonce)));
}

#[test]
fn test_two_adds_before_mine_break_the_link() {
    let mut session = session(2);
    session.run(&format!(
        "{}\nadd Person = (name: \"A\", age: 1)\nadd Person = (name: \"B\", age: 2)\nmine Person",
        PERSON
    ));

    let faults = session.ledger().verify();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].to_string(), "block 2 does not link to the hash of block 1");
}

#[test]
fn test_tuple_literal_never_satisfies_tuple_field() {
    let mut session = session(2);
    session.run("block Point = (at: Tuple)");

    let output = session.run("add Point = (at: (x: 1, y: 2))");

    assert_eq!(
        output.transcript.text(),
        "[Semantic Error] 'at' should be tuple, got dict\n"
    );
    assert_eq!(output.chain.len(), 1);
}

#[test]
fn test_structured_fields() {
    let mut session = session(2);
    session.run("block Order = (items: List, meta: Dict, total: float, qty: long, pos: Dict)");

    let output = session.run(
        r#"add Order = (items: ["pen", 2, 1.5], meta: {"gift": "yes"}, total: 12, qty: 3, pos: (x: 1))"#,
    );

    assert!(!output.transcript.has_diagnostics(), "{}", output.transcript);
    assert_eq!(
        output.chain[1].data.to_string(),
        "{'items': ['pen', 2, 1.5], 'meta': {'gift': 'yes'}, 'total': 12, 'qty': 3, 'pos': {'x': 1}}"
    );
}

#[test]
fn test_syntax_error_recovers_at_next_statement() {
    let mut session = session(2);

    let output = session.run(&format!(
        "{}\nadd Person = (name \"A\", age: 1)\nadd Person = (name: \"B\", age: 2)",
        PERSON
    ));

    let kinds: Vec<LineKind> = output.transcript.lines().iter().map(|l| l.kind).collect();
    assert_eq!(kinds, vec![LineKind::Info, LineKind::Syntax, LineKind::Info]);
    assert_eq!(
        output.transcript.lines()[1].text,
        "[Syntax Error] Line 2: Unexpected token 'A'"
    );
    assert_eq!(output.chain.len(), 2);
}

#[test]
fn test_definitions_persist_across_runs() {
    let mut session = session(2);
    session.run(PERSON);
    session.run(r#"add Person = (name: "A", age: 1)"#);
    let output = session.run(r#"add Person = (name: "B", age: 2)"#);

    assert_eq!(output.chain.len(), 3);
    assert_eq!(output.chain[2].index, Some(2));
}

#[test]
fn test_print_lists_blocks_in_order() {
    let mut session = session(2);
    session.run(&format!("{}\nadd Person = (name: \"A\", age: 1)", PERSON));

    let output = session.run("print Person");

    let lines: Vec<_> = output.transcript.lines().iter().map(|l| l.text.clone()).collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[5], "Index : 1");
    assert_eq!(lines[7], format!("Previous Hash : {}", output.chain[0].hash));
    assert_eq!(lines[9], "Data : {'name': 'A', 'age': 1}");
}

#[test]
fn test_deeply_nested_literal_is_a_diagnostic() {
    let mut session = session(2);
    let source = format!(
        "block P = (x: int)\nadd P = (x: 1, t: {}1{})\nprint P",
        "(a: ".repeat(20_000),
        ")".repeat(20_001)
    );

    let output = session.run(&source);

    let diagnostics: Vec<_> = output.transcript.diagnostics().collect();
    assert_eq!(
        diagnostics,
        vec!["[Syntax Error] Line 2: Literal nested deeper than 128 levels"]
    );
    assert_eq!(output.chain.len(), 1);
    assert!(output.transcript.text().contains("Index : 0"));
}

#[test]
fn test_failed_export_is_one_runtime_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::with_config(
        LedgerConfig::default()
            .with_difficulty(2)
            .with_export_path(dir.path()),
    )
    .unwrap();

    let output = session.run("export Person\nprint Person");

    let lines = output.transcript.lines();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0].kind, LineKind::Runtime);
    assert!(lines[0].text.starts_with("[Runtime Error] export failed: "));
    assert!(lines[1..].iter().all(|line| line.kind == LineKind::Info));
    assert_eq!(lines[1].text, "Index : 0");
    assert_eq!(lines[5].text, "Data : Genesis Block");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_lexing_never_panics(source in "\\PC{0,200}") {
        let _ = chainscript::parser::parse(&source);
    }

    #[test]
    fn prop_mined_hash_matches_canonical_text(name in "[a-zA-Z0-9 ]{0,16}", age in 0i64..i64::MAX) {
        let mut session = session(1);
        let output = session.run(&format!(
            "{}\nadd Person = (name: \"{}\", age: {})\nmine Person",
            PERSON, name, age
        ));

        let record = &output.chain[1];
        let canonical = format!("{{'name': '{}', 'age': {}}}{}", name, age, record.nonce);
        prop_assert_eq!(&record.hash, &sha256_hex(&canonical));
        prop_assert!(record.hash.starts_with('0'));
    }
}
