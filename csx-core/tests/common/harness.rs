//! Test harness for running fixtures with stochastic variations

use crate::common::{ExpectedEvent, Gen, TestCase};
use csx_core::{
    build, AtomicValue, Event, Item, Node, SerializeOptions, Serializer, XdmTypedValue,
};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub items: Vec<Item>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Serialize with the options a fixture asks for.
fn collect_events(case: &TestCase, items: &[Item]) -> Vec<Event<'static>> {
    let options = SerializeOptions::default().fixup_namespaces(case.fixup);
    let mut events: Vec<Event<'static>> = Vec::new();
    let result = if case.xdm {
        Serializer::new()
            .with_typed_values(XdmTypedValue)
            .with_options(options)
            .serialize(items, &mut events)
    } else {
        Serializer::new().with_options(options).serialize(items, &mut events)
    };
    if let Err(never) = result {
        match never {}
    }
    events
}

fn format_atomic(value: &AtomicValue) -> String {
    format!("{} {}", value.kind().type_name(), value.lexical())
}

/// Format event for comparison: names in Clark form, atomics as `type lexical`
pub fn format_event(event: &Event) -> String {
    match event {
        Event::StartDocument => "StartDocument".to_string(),
        Event::EndDocument => "EndDocument".to_string(),
        Event::StartElement { name, bindings } if bindings.is_empty() => {
            format!("StartElement {:?}", name.clark())
        }
        Event::StartElement { name, bindings } => {
            let declared: Vec<String> = bindings
                .iter()
                .map(|b| format!("{}={}", b.prefix, b.uri))
                .collect();
            format!("StartElement {:?} {:?}", name.clark(), declared.join(" "))
        }
        Event::EndElement { name } => format!("EndElement {:?}", name.clark()),
        Event::Attribute { name, value } => {
            format!("Attribute {:?} {:?}", name.clark(), format_atomic(value))
        }
        Event::Characters { text } => format!("Characters {:?}", text),
        Event::AtomicValue { value } => format!("AtomicValue {:?}", format_atomic(value)),
        Event::Comment { text } => format!("Comment {:?}", text),
        Event::ProcessingInstruction { target, data } => {
            format!("ProcessingInstruction {:?} {:?}", target, data)
        }
    }
}

pub fn format_events(events: &[Event]) -> Vec<String> {
    events.iter().map(format_event).collect()
}

/// Format expected event for comparison
fn format_expected(event: &ExpectedEvent) -> String {
    match event {
        ExpectedEvent::Bare(name) => name.clone(),
        ExpectedEvent::WithContent(name, content) => format!("{} {:?}", name, content),
        ExpectedEvent::WithDetail(name, content, detail) => {
            format!("{} {:?} {:?}", name, content, detail)
        }
    }
}

/// Rebuild the tree from its events and compare with the input.
fn check_roundtrip(events: Vec<Event<'static>>, items: &[Item], errors: &mut Vec<String>) {
    match build(events) {
        Ok(rebuilt) if rebuilt == items => {}
        Ok(rebuilt) => errors.push(format!(
            "Round trip changed the tree:\n  in:  {:?}\n  out: {:?}",
            items, rebuilt
        )),
        Err(e) => errors.push(format!("Rebuilding failed: {}", e)),
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let items = case.tree();
    let events = collect_events(case, &items);

    let actual = format_events(&events);
    let expected: Vec<String> = case.events.iter().map(format_expected).collect();

    let mut errors = Vec::new();

    if actual.len() != expected.len() {
        errors.push(format!(
            "Event count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Event {}: expected '{}', got '{}'", i, exp, act));
        }
    }

    if case.roundtrip {
        check_roundtrip(events, &items, &mut errors);
    }

    TestResult {
        passed: errors.is_empty(),
        items,
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - 40% chance of random root items before
/// - Geometric nesting in random outer elements (node-only fixtures)
/// - 40% chance of random root items after
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let canonical = case.tree();
    let mut items = Vec::new();

    if gen.chance(0.4) {
        for _ in 0..1 + gen.geometric(0.5) {
            items.push(gen.sibling());
        }
    }

    let nodes: Option<Vec<Node>> = canonical
        .iter()
        .map(|item| item.as_node().cloned())
        .collect();
    match nodes {
        Some(nodes) => items.extend(gen.wrap(nodes).into_iter().map(Item::Node)),
        None => items.extend(canonical),
    }

    if gen.chance(0.4) {
        for _ in 0..1 + gen.geometric(0.5) {
            items.push(gen.sibling());
        }
    }

    let events = collect_events(case, &items);
    let actual = format_events(&events);
    let expected: Vec<String> = case.events.iter().map(format_expected).collect();

    // The fixture's events must still appear in order; the context adds more.
    let mut errors = Vec::new();
    let mut exp_idx = 0;
    for act in &actual {
        if exp_idx < expected.len() && act == &expected[exp_idx] {
            exp_idx += 1;
        }
    }
    if exp_idx < expected.len() {
        errors.push(format!(
            "Missing expected events starting at index {}: {:?}",
            exp_idx,
            &expected[exp_idx..]
        ));
    }

    if case.roundtrip {
        check_roundtrip(events, &items, &mut errors);
    }

    TestResult {
        passed: errors.is_empty(),
        items,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set CSX_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nItems:");
        eprintln!("{:#?}", self.items);
        eprintln!("\nExpected events:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual events:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
