//! Property-based tests for the Anna front end
//!
//! These use proptest to verify invariants across many generated inputs:
//! parsing is total (no panics), deterministic, and accepts every program
//! the generator derives from the grammar.

use anna::diagnostics::render_report;
use anna::parser::parse;
use anna::symbols::UnitSymbols;
use proptest::prelude::*;

/// Lowercase names that never collide with keywords.
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_filter("keywords are not identifiers", |name| {
        !matches!(
            name.as_str(),
            "def" | "main" | "if" | "else" | "while" | "import" | "return" | "var" | "true"
                | "false"
        )
    })
}

proptest! {
    /// Parsing arbitrary bytes never panics, and rendering whatever
    /// diagnostics come back never panics either.
    #[test]
    fn parse_is_total(source in ".*") {
        let (tree, diagnostics) = parse(&source, "fuzz.anna");
        if tree.is_some() {
            prop_assert!(diagnostics.is_empty());
        }
        let _ = render_report("fuzz.anna", &source, &diagnostics);
    }

    /// Same input, same result: structurally equal trees, identical
    /// diagnostics.
    #[test]
    fn parse_is_deterministic(source in ".*") {
        let first = parse(&source, "fuzz.anna");
        let second = parse(&source, "fuzz.anna");
        prop_assert_eq!(first.0, second.0);
        prop_assert_eq!(first.1, second.1);
    }

    /// Generated declaration sequences parse cleanly with either
    /// terminator spelling, and every declared name survives into the
    /// symbol collection.
    #[test]
    fn generated_globals_parse_cleanly(
        decls in prop::collection::vec((ident_strategy(), 0i64..1_000, prop::bool::ANY), 1..8)
    ) {
        let mut source = String::new();
        for (name, value, semicolon) in &decls {
            source.push_str(&format!("var {name} = {value}"));
            source.push(if *semicolon { ';' } else { '\n' });
        }

        let (tree, diagnostics) = parse(&source, "generated.anna");
        prop_assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics);
        let tree = tree.expect("tree");

        let symbols = UnitSymbols::collect(&tree);
        let names: Vec<&str> = symbols.globals.iter().map(|g| g.name.as_str()).collect();
        let declared: Vec<&str> = decls.iter().map(|(name, _, _)| name.as_str()).collect();
        prop_assert_eq!(names, declared);
    }

    /// Generated functions with arbitrary arity parse and report the
    /// declared parameter count.
    #[test]
    fn generated_functions_record_arity(
        name in ident_strategy(),
        params in prop::collection::vec(ident_strategy(), 0..5)
    ) {
        let source = format!("def @{name}({}) {{ return 1; }}\n", params.join(","));
        let (tree, diagnostics) = parse(&source, "generated.anna");
        prop_assert!(diagnostics.is_empty(), "diagnostics: {:?}", diagnostics);

        let symbols = UnitSymbols::collect(&tree.expect("tree"));
        prop_assert_eq!(symbols.functions.len(), 1);
        prop_assert_eq!(symbols.functions[0].name.as_str(), name.as_str());
        prop_assert_eq!(symbols.functions[0].params_count, params.len());
    }

    /// A failed parse always points at real input: every diagnostic's
    /// row exists in the source.
    #[test]
    fn diagnostics_reference_real_rows(source in ".*") {
        let (tree, diagnostics) = parse(&source, "fuzz.anna");
        if tree.is_none() {
            let rows = source.lines().count().max(1);
            for diag in &diagnostics {
                // Row may be one past the last line only for end-of-input
                prop_assert!(diag.row <= rows, "row {} out of range", diag.row);
            }
        }
    }
}
