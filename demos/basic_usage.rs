// demos/basic_usage.rs
//! Basic usage of the block language

use chainscript::{LedgerConfig, Session, Value};

fn main() {
    println!("=== chainscript - Basic Usage ===\n");

    let source = r#"
        // Schema for a person record
        block Person = (name: str, age: int)

        add Person = (name: "Alice", age: 30)
        add Person = (name: "Bob")
        add Person = (name: "Carol", age: 41, city: "Lyon")

        mine Person
        print Person
    "#;

    let mut session = match Session::with_config(LedgerConfig::default().with_difficulty(3)) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("bad configuration: {}", e);
            return;
        }
    };

    let output = session.run(source);

    println!("--- transcript ---");
    print!("{}", output.transcript);

    println!("\n--- diagnostics ---");
    for line in output.transcript.diagnostics() {
        println!("  {}", line);
    }

    // Records can also be added straight from Rust
    let added = session.instantiate(
        "Person",
        vec![
            ("name".to_string(), Value::from("Dave")),
            ("age".to_string(), Value::from(52)),
        ],
    );
    println!("\nhost instantiate -> {:?}", added);

    session.run("mine Person");

    println!("\n--- ledger ---");
    println!("blocks: {}", session.ledger().len());
    println!("valid:  {}", session.ledger().is_valid());
    for fault in session.ledger().verify() {
        println!("  fault: {}", fault);
    }

    match session.chain_json() {
        Ok(json) => println!("\n{}", json),
        Err(e) => eprintln!("could not serialize chain: {}", e),
    }
}
