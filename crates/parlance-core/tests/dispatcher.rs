// crates/parlance-core/tests/dispatcher.rs
// ============================================================================
// Module: Message Dispatcher Tests
// Description: Binding, dispatch, identity methods, and audit coverage.
// Purpose: Ensure binding is all-or-nothing and calls fail at the right stage.
// ============================================================================
//! ## Overview
//! End-to-end tests for [`MessageDispatcher`] over the shared fixtures.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod support;

use std::thread;

use parlance_core::BindingOutcome;
use parlance_core::ComponentTransformer;
use parlance_core::ContractDescriptor;
use parlance_core::DispatchError;
use parlance_core::FileAuditSink;
use parlance_core::FormatStyle;
use parlance_core::FormattingInput;
use parlance_core::InvocationConfiguration;
use parlance_core::InvocationContext;
use parlance_core::InvocationError;
use parlance_core::InvocationStage;
use parlance_core::InvocationValue;
use parlance_core::KeyPolicy;
use parlance_core::KeyResolution;
use parlance_core::MemoryAuditSink;
use parlance_core::MessageDispatcher;
use parlance_core::MethodDescriptor;
use parlance_core::ParameterDescriptor;
use parlance_core::ResultPolicy;
use parlance_core::TextNode;
use parlance_core::TranslatableNode;
use parlance_core::TranslationArgument;
use parlance_core::ValidationError;
use parlance_core::invocation_args;
use support::TestResult;
use support::Unregistered;
use support::ensure;
use support::greet_method;
use support::greeting_contract;
use support::text;

/// Binds the greeting contract under the named defaults.
fn bound() -> TestResult<MessageDispatcher> {
    let config = InvocationConfiguration::for_style(FormatStyle::Named);
    Ok(MessageDispatcher::bind(greeting_contract()?, &config)?)
}

/// Asserts a dispatch failure stage and source code.
fn expect_failure<T: std::fmt::Debug>(
    result: Result<T, DispatchError>,
    stage: InvocationStage,
    code: &str,
) -> TestResult {
    let err = match result {
        Ok(value) => return Err(format!("expected failure at {stage}, got {value:?}").into()),
        Err(err) => err,
    };
    ensure(err.stage == stage, format!("expected stage {stage}, got {}", err.stage))?;
    ensure(err.source.code() == code, format!("expected {code}, got {}", err.source.code()))
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

#[test]
fn greet_dispatches_to_translatable_node() -> TestResult {
    let dispatcher = bound()?;
    let greeting = String::from("hi");
    let node: TextNode = dispatcher.invoke("greet", &invocation_args![greeting])?;
    let expected = TextNode::Translatable(TranslatableNode::new(
        "hello.world",
        vec![FormattingInput::named("greeting", TranslationArgument::Component(text("hi")))],
    ));
    ensure(node == expected, format!("unexpected node {node:?}"))
}

#[test]
fn method_id_dispatch_matches_name_dispatch() -> TestResult {
    let dispatcher = bound()?;
    let id = dispatcher.method_id("greet").ok_or("greet must be indexed")?;
    let greeting = String::from("yo");
    let by_id: TextNode = dispatcher.invoke_id(id, &invocation_args![greeting])?;
    let by_name: TextNode = dispatcher.invoke("greet", &invocation_args![greeting])?;
    ensure(by_id == by_name, "both dispatch paths must agree")
}

#[test]
fn concurrent_calls_share_one_dispatcher() -> TestResult {
    let dispatcher = bound()?;
    let results: Vec<bool> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|index| {
                let dispatcher = dispatcher.clone();
                scope.spawn(move || {
                    let greeting = format!("hi {index}");
                    dispatcher
                        .invoke::<TextNode>("greet", &invocation_args![greeting])
                        .is_ok_and(|node| !node.is_empty())
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap_or(false)).collect()
    });
    ensure(results.iter().all(|ok| *ok), format!("some calls failed: {results:?}"))
}

#[test]
fn dispatcher_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MessageDispatcher>();
    assert_send_sync::<InvocationConfiguration>();
}

// ============================================================================
// SECTION: Call Failures
// ============================================================================

#[test]
fn unknown_method_fails_before_built() -> TestResult {
    let dispatcher = bound()?;
    expect_failure(
        dispatcher.invoke::<TextNode>("farewell", &[]),
        InvocationStage::Built,
        "unknown_method",
    )
}

#[test]
fn arity_mismatch_fails_before_built() -> TestResult {
    let dispatcher = bound()?;
    expect_failure(
        dispatcher.invoke::<TextNode>("greet", &[]),
        InvocationStage::Built,
        "arity_mismatch",
    )
}

#[test]
fn wrong_return_type_is_rejected_before_running() -> TestResult {
    let dispatcher = bound()?;
    let greeting = String::from("hi");
    expect_failure(
        dispatcher.invoke::<String>("greet", &invocation_args![greeting]),
        InvocationStage::Built,
        "return_type_mismatch",
    )
}

#[test]
fn null_argument_fails_before_arguments_adapted() -> TestResult {
    let dispatcher = bound()?;
    let result = dispatcher.invoke::<TextNode>("greet", &[InvocationValue::null()]);
    if let Err(err) = &result {
        ensure(
            err.to_string().contains("before reaching arguments_adapted"),
            format!("message lacks stage: {err}"),
        )?;
    }
    expect_failure(result, InvocationStage::ArgumentsAdapted, "null_argument")
}

/// `greet_key(greeting: String) -> String`, answered by calling `greet`.
fn greet_key_method() -> MethodDescriptor {
    MethodDescriptor::provided(
        "greet_key",
        |dispatcher: &MessageDispatcher,
         context: &InvocationContext<'_>|
         -> Result<String, InvocationError> {
            let greeting = context
                .arguments()
                .first()
                .and_then(|argument| argument.value().get())
                .and_then(|value| value.downcast_ref::<String>())
                .cloned()
                .ok_or_else(|| InvocationError::Custom {
                    method: context.method_name().to_string(),
                    message: "greeting required".to_string(),
                })?;
            let node: TextNode =
                dispatcher.invoke("greet", &invocation_args![greeting]).map_err(|err| err.source)?;
            match node {
                TextNode::Translatable(node) => Ok(node.key().to_string()),
                other => Err(InvocationError::Custom {
                    method: context.method_name().to_string(),
                    message: format!("unexpected node {other:?}"),
                }),
            }
        },
    )
    .with_parameter(ParameterDescriptor::new::<String>().with_identifier("greeting"))
}

#[test]
fn provided_methods_run_their_body_without_policies() -> TestResult {
    let contract = ContractDescriptor::builder("Greetings")
        .method(greet_method())
        .method(greet_key_method())
        .build()?;
    let config = InvocationConfiguration::for_style(FormatStyle::Named);
    let dispatcher = MessageDispatcher::bind(contract, &config)?;

    let greeting = String::from("hi");
    let key: String = dispatcher.invoke("greet_key", &invocation_args![greeting])?;
    ensure(key == "hello.world", format!("provided body must reach greet, got {key}"))?;
    expect_failure(
        dispatcher.invoke::<String>("greet_key", &[InvocationValue::null()]),
        InvocationStage::ResultTransformed,
        "custom",
    )?;
    expect_failure(
        dispatcher.invoke::<String>("greet_key", &[]),
        InvocationStage::Built,
        "arity_mismatch",
    )
}

// ============================================================================
// SECTION: Identity Methods
// ============================================================================

#[test]
fn equals_compares_handle_identity() -> TestResult {
    let dispatcher = bound()?;
    let same = dispatcher.clone();
    let other = bound()?;

    let with_clone: bool = dispatcher.invoke("equals", &invocation_args![same])?;
    let with_other: bool = dispatcher.invoke("equals", &invocation_args![other])?;
    let with_null: bool = dispatcher.invoke("equals", &[InvocationValue::null()])?;
    ensure(with_clone, "clones share one table")?;
    ensure(!with_other, "separate binds are distinct")?;
    ensure(!with_null, "null is never equal")?;
    ensure(dispatcher == same && dispatcher != other, "PartialEq follows identity")
}

#[test]
fn hash_and_display_are_answered_without_policies() -> TestResult {
    let dispatcher = bound()?;
    let hash: u64 = dispatcher.invoke("hash_code", &[])?;
    let display: String = dispatcher.invoke("to_string", &[])?;
    ensure(hash == dispatcher.identity_hash(), "hash_code must be the identity hash")?;
    ensure(display.starts_with("GreetingsImpl@"), format!("unexpected display {display}"))?;
    ensure(display == dispatcher.to_string(), "to_string matches Display")
}

// ============================================================================
// SECTION: Binding
// ============================================================================

#[test]
fn binding_checks_key_before_arguments() -> TestResult {
    let contract = ContractDescriptor::builder("Broken")
        .method(
            MethodDescriptor::message("bad")
                .with_parameter(ParameterDescriptor::new::<Unregistered>().with_name("thing")),
        )
        .build()?;
    let config = InvocationConfiguration::for_style(FormatStyle::Named);
    let result = MessageDispatcher::bind(contract, &config);
    ensure(
        matches!(result, Err(ValidationError::MissingKey { .. })),
        format!("expected MissingKey first, got {result:?}"),
    )
}

#[test]
fn binding_checks_arguments_before_result() -> TestResult {
    let contract = ContractDescriptor::builder("Broken")
        .method(
            MethodDescriptor::message("m")
                .with_key("broken.m")
                .with_parameter(ParameterDescriptor::new::<Unregistered>().with_name("thing"))
                .returning::<u64>(),
        )
        .build()?;
    let config = InvocationConfiguration::for_style(FormatStyle::Named)
        .with_result_policy(ResultPolicy::Standard(ComponentTransformer::default()));
    let result = MessageDispatcher::bind(contract, &config);
    ensure(
        matches!(
            &result,
            Err(ValidationError::UnsupportedParameter { method, position: 0, .. }) if method == "m"
        ),
        format!("expected UnsupportedParameter first, got {result:?}"),
    )
}

#[test]
fn binding_rejects_unsupported_return_types() -> TestResult {
    let contract = || {
        ContractDescriptor::builder("Labels")
            .method(MethodDescriptor::message("label").with_key("label").returning::<u64>())
            .build()
    };
    let unchanged = InvocationConfiguration::for_style(FormatStyle::Named);
    let result = MessageDispatcher::bind(contract()?, &unchanged);
    ensure(
        matches!(result, Err(ValidationError::NotNodeSupertype { .. })),
        format!("expected NotNodeSupertype, got {result:?}"),
    )?;

    let standard = unchanged
        .with_result_policy(ResultPolicy::Standard(ComponentTransformer::default()));
    let result = MessageDispatcher::bind(contract()?, &standard);
    ensure(
        matches!(result, Err(ValidationError::UnsupportedReturnType { .. })),
        format!("expected UnsupportedReturnType, got {result:?}"),
    )
}

#[test]
fn binding_stops_at_first_failing_method() -> TestResult {
    let contract = ContractDescriptor::builder("Mixed")
        .method(greet_method())
        .method(
            MethodDescriptor::message("bad_argument")
                .with_key("mixed.bad")
                .with_parameter(ParameterDescriptor::new::<Unregistered>().with_name("thing")),
        )
        .method(MethodDescriptor::message("bad_key"))
        .build()?;
    let sink = MemoryAuditSink::new();
    let config = InvocationConfiguration::for_style(FormatStyle::Named);
    let result = MessageDispatcher::bind_with_audit(contract, &config, &sink);
    ensure(
        matches!(
            &result,
            Err(ValidationError::UnsupportedParameter { method, .. }) if method == "bad_argument"
        ),
        format!("expected the second method to fail, got {result:?}"),
    )?;
    let events = sink.events();
    ensure(
        events.len() == 1 && events[0].message_methods == 1,
        format!("only greet passed before the failure, got {events:?}"),
    )
}

#[test]
fn positional_style_rejects_named_only_parameters() -> TestResult {
    let config = InvocationConfiguration::for_style(FormatStyle::Positional);
    let result = MessageDispatcher::bind(greeting_contract()?, &config);
    ensure(
        matches!(
            result,
            Err(ValidationError::UnsupportedParameter { ref method, .. }) if method == "welcome"
        ),
        format!("expected welcome to be rejected, got {result:?}"),
    )?;

    let contract = ContractDescriptor::builder("Plain").method(greet_method()).build()?;
    let dispatcher = MessageDispatcher::bind(contract, &config)?;
    let greeting = String::from("hi");
    let node: TextNode = dispatcher.invoke("greet", &invocation_args![greeting])?;
    let TextNode::Translatable(node) = node else {
        return Err("expected a translatable node".into());
    };
    let expected = [FormattingInput::Positional(TranslationArgument::Component(text("hi")))];
    ensure(node.arguments() == expected, "positional inputs carry no names")
}

#[test]
fn duplicate_method_names_are_rejected() -> TestResult {
    let result =
        ContractDescriptor::builder("Twice").method(greet_method()).method(greet_method()).build();
    ensure(
        matches!(
            result,
            Err(ValidationError::DuplicateMethod { ref method, .. }) if method == "greet"
        ),
        format!("expected DuplicateMethod, got {result:?}"),
    )?;
    let clash = ContractDescriptor::builder("Clash")
        .method(MethodDescriptor::message("equals").with_key("equals"))
        .build();
    ensure(clash.is_err(), "message methods cannot shadow identity methods")
}

#[test]
fn contracts_receive_identity_methods() -> TestResult {
    let contract = greeting_contract()?;
    for name in ["equals", "hash_code", "to_string"] {
        let method = contract.method(name).ok_or(format!("missing {name}"))?;
        ensure(!method.is_message(), format!("{name} must not be a message method"))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Custom Key Policy
// ============================================================================

/// Derives keys from the method name under a fixed namespace.
struct Namespaced;

impl KeyResolution for Namespaced {
    fn resolve_key(&self, context: &InvocationContext<'_>) -> Result<String, InvocationError> {
        if context.method_name() == "forbidden" {
            return Err(InvocationError::Custom {
                method: context.method_name().to_string(),
                message: "no key".to_string(),
            });
        }
        Ok(format!("ui.{}", context.method_name()))
    }

    fn validate(&self, _method: &MethodDescriptor) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[test]
fn custom_key_policy_replaces_declared_keys() -> TestResult {
    let contract = ContractDescriptor::builder("Menu")
        .method(MethodDescriptor::message("open"))
        .method(MethodDescriptor::message("forbidden"))
        .build()?;
    let config = InvocationConfiguration::for_style(FormatStyle::Named)
        .with_key_policy(KeyPolicy::custom(Namespaced));
    let dispatcher = MessageDispatcher::bind(contract, &config)?;

    let node: TextNode = dispatcher.invoke("open", &[])?;
    let TextNode::Translatable(node) = node else {
        return Err("expected a translatable node".into());
    };
    ensure(node.key() == "ui.open", format!("unexpected key {}", node.key()))?;
    expect_failure(
        dispatcher.invoke::<TextNode>("forbidden", &[]),
        InvocationStage::KeyResolved,
        "custom",
    )
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn binding_outcomes_are_audited() -> TestResult {
    let sink = MemoryAuditSink::new();
    let config = InvocationConfiguration::for_style(FormatStyle::Named);
    MessageDispatcher::bind_with_audit(greeting_contract()?, &config, &sink)?;
    let broken = ContractDescriptor::builder("Broken")
        .method(MethodDescriptor::message("ok").with_key("broken.ok"))
        .method(MethodDescriptor::message("ok2").with_key("broken.ok2"))
        .method(MethodDescriptor::message("bad"))
        .build()?;
    let rejected = MessageDispatcher::bind_with_audit(broken, &config, &sink);
    ensure(rejected.is_err(), "missing key must reject the contract")?;

    let events = sink.events();
    ensure(events.len() == 2, format!("expected two events, got {events:?}"))?;
    ensure(events[0].outcome == BindingOutcome::Bound, "first bind succeeds")?;
    ensure(events[0].message_methods == 2 && events[0].skipped_methods == 3, "counts methods")?;
    ensure(events[1].outcome == BindingOutcome::Rejected, "second bind is rejected")?;
    ensure(events[1].error_code == Some("missing_key"), "rejection carries the error code")?;
    ensure(
        events[1].message_methods == 2 && events[1].skipped_methods == 0,
        format!("rejection counts methods validated before it, got {:?}", events[1]),
    )
}

#[test]
fn file_audit_sink_writes_json_lines() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("binding.log");
    let sink = FileAuditSink::new(&path)?;
    let config = InvocationConfiguration::for_style(FormatStyle::Named);
    MessageDispatcher::bind_with_audit(greeting_contract()?, &config, &sink)?;

    let contents = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = contents.lines().collect();
    ensure(lines.len() == 1, format!("expected one line, got {contents}"))?;
    let value: serde_json::Value = serde_json::from_str(lines[0])?;
    ensure(value["event"] == "contract_binding", "event name is stable")?;
    ensure(value["contract"] == "Greetings", "contract is recorded")?;
    ensure(value["outcome"] == "bound", "outcome is snake_case")?;
    ensure(value["error"].is_null(), "bound events carry no error")
}
