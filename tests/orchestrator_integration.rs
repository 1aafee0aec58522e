//! Integration tests for request orchestration.
//!
//! These tests drive `Orchestrator::handle` end to end through the public API:
//! 1. Discovery against an in-memory registry
//! 2. Decision completion from a scripted mock provider
//! 3. Tool execution (success and failure)
//! 4. Synthesis completion and history bookkeeping
//!
//! No network access is needed.

use serde_json::json;
use std::sync::Arc;

use tool_relay::adapters::ai::{MockAIProvider, MockError};
use tool_relay::adapters::registry::{InMemoryToolRegistry, LazyToolRegistry};
use tool_relay::application::{
    CompletionClient, Orchestrator, OrchestratorError, OrchestratorSettings, ToolCatalog,
    ToolExecutor, NO_TOOL_CALLED,
};
use tool_relay::domain::conversation::{ConversationHistory, ConversationTurn, Role};
use tool_relay::domain::tools::Tool;
use tool_relay::ports::{MessageRole, RegistryError, ToolRegistry};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn get_config_tool() -> Tool {
    Tool::new(
        "get_config",
        "Retrieve the configuration of a network device",
        json!({
            "type": "object",
            "required": ["host"],
            "properties": {
                "host": {"type": "string"},
                "source": {"type": "string", "enum": ["running", "candidate", "startup"]}
            }
        }),
    )
    .with_tags(["netconf", "config"])
}

fn failing_tool() -> Tool {
    Tool::new("t", "A tool that always fails", json!({"type": "object"}))
}

fn lab_registry() -> Arc<InMemoryToolRegistry> {
    Arc::new(
        InMemoryToolRegistry::new()
            .with_tool(get_config_tool(), |_| Ok(json!({"ok": true, "result": "<config/>"})))
            .with_tool(failing_tool(), |_| {
                Err(RegistryError::tool_failed(500, "device rejected the request"))
            }),
    )
}

fn orchestrator(provider: &MockAIProvider, registry: Arc<dyn ToolRegistry>) -> Orchestrator {
    Orchestrator::new(
        ToolCatalog::new(registry.clone()),
        CompletionClient::new(Arc::new(provider.clone())),
        ToolExecutor::new(registry),
    )
}

fn prior_history() -> ConversationHistory {
    ConversationHistory::new()
        .with_turn(ConversationTurn::user("which devices are in the lab?"))
        .with_turn(ConversationTurn::assistant("10.0.0.1 and 10.0.0.2"))
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn direct_answer_grows_history_by_two() {
    let reply = "I can help with NETCONF devices. What would you like to check?";
    let provider = MockAIProvider::new().with_response(reply);
    let registry = lab_registry();
    let orchestrator = orchestrator(&provider, registry.clone());
    let history = prior_history();

    let outcome = orchestrator.handle("hello", &history).await.unwrap();

    assert_eq!(outcome.tool_result, NO_TOOL_CALLED);
    assert_eq!(outcome.final_answer, reply);
    assert_eq!(outcome.proposed_call, reply);
    assert_eq!(outcome.history.len(), history.len() + 2);
    assert_eq!(outcome.history.turns()[2], ConversationTurn::user("hello"));
    assert_eq!(outcome.history.turns()[3], ConversationTurn::assistant(reply));
    assert_eq!(provider.call_count(), 1);
    assert_eq!(registry.call_count(), 0);
}

#[tokio::test]
async fn end_to_end_get_config() {
    let provider = MockAIProvider::new()
        .with_response(
            "```json\n{\"tool_name\":\"get_config\",\"arguments\":{\"host\":\"10.0.0.1\",\"source\":\"running\"}}\n```",
        )
        .with_response("The running configuration of 10.0.0.1 is empty: `<config/>`.");
    let registry = lab_registry();
    let orchestrator = orchestrator(&provider, registry.clone());
    let history = prior_history();

    let outcome = orchestrator
        .handle("show running config on 10.0.0.1", &history)
        .await
        .unwrap();

    assert!(!outcome.final_answer.is_empty());
    assert_eq!(outcome.history.len(), history.len() + 3);
    assert_eq!(provider.call_count(), 2);

    let call = outcome.tool_call.as_ref().unwrap();
    assert_eq!(call.tool_name(), "get_config");
    assert_eq!(call.arguments()["host"], "10.0.0.1");
    assert_eq!(call.arguments()["source"], "running");

    let recorded = registry.calls();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].arguments["source"], "running");

    let result: serde_json::Value = serde_json::from_str(&outcome.tool_result).unwrap();
    assert_eq!(result, json!({"ok": true, "result": "<config/>"}));

    let new_turns = &outcome.history.turns()[history.len()..];
    assert_eq!(new_turns[0].role(), Role::User);
    assert_eq!(new_turns[1].content(), outcome.proposed_call);
    assert_eq!(new_turns[2].content(), outcome.final_answer);
}

#[tokio::test]
async fn execution_failure_still_produces_answer() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"tool_name": "t", "arguments": {"a": 1}}"#)
        .with_response("The device rejected the request. Check its NETCONF session limits.");
    let orchestrator = orchestrator(&provider, lab_registry());

    let outcome = orchestrator
        .handle("run t", &ConversationHistory::new())
        .await
        .unwrap();

    assert!(outcome.tool_result.contains("t"));
    assert!(outcome.tool_result.contains("device rejected the request"));
    assert!(outcome.tool_result.contains("{\"a\":1}"));
    assert!(!outcome.final_answer.is_empty());
    assert_eq!(outcome.history.len(), 3);

    let synthesis = &provider.get_calls()[1].messages;
    assert!(synthesis
        .last()
        .unwrap()
        .content
        .contains("device rejected the request"));
}

#[tokio::test]
async fn unknown_tool_is_reported_to_the_model() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"tool_name": "reboot", "arguments": {}}"#)
        .with_response("I can't reboot devices with the available tools.");
    let registry = lab_registry();
    let orchestrator = orchestrator(&provider, registry.clone());

    let outcome = orchestrator
        .handle("reboot 10.0.0.1", &ConversationHistory::new())
        .await
        .unwrap();

    assert!(outcome.tool_result.contains("Tool not found: reboot"));
    assert_eq!(registry.call_count(), 0);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn decision_prompt_lists_tools_and_replays_history() {
    let provider = MockAIProvider::new().with_response("Nothing to do.");
    let orchestrator = orchestrator(&provider, lab_registry());
    let history = prior_history();

    orchestrator.handle("thanks", &history).await.unwrap();

    let messages = &provider.get_calls()[0].messages;
    assert_eq!(messages.len(), history.len() + 2);
    assert_eq!(messages[0].role, MessageRole::System);
    assert!(messages[0].content.contains("\"enum\""));
    assert_eq!(messages[1].content, "which devices are in the lab?");
    assert_eq!(messages.last().unwrap().content, "thanks");
    assert!(provider.get_calls()[0].temperature.is_some());
}

#[tokio::test]
async fn caller_history_is_never_mutated() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"tool_name": "get_config", "arguments": {"host": "10.0.0.2"}}"#)
        .with_response("done");
    let orchestrator = orchestrator(&provider, lab_registry());
    let history = prior_history();
    let before = history.clone();

    let outcome = orchestrator.handle("config of .2", &history).await.unwrap();

    assert_eq!(history, before);
    assert_ne!(outcome.history, before);
}

#[tokio::test]
async fn synthesis_failure_is_fatal_and_history_untouched() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"tool_name": "get_config", "arguments": {"host": "10.0.0.1"}}"#)
        .with_error(MockError::Timeout { timeout_secs: 120 });
    let registry = lab_registry();
    let orchestrator = orchestrator(&provider, registry.clone());
    let history = prior_history();

    let result = orchestrator.handle("config please", &history).await;

    assert!(matches!(result, Err(OrchestratorError::Completion(_))));
    assert_eq!(history.len(), 2);
    assert_eq!(registry.call_count(), 1);
}

#[tokio::test]
async fn discovery_is_idempotent_through_the_orchestrator() {
    let provider = MockAIProvider::new()
        .with_response("first")
        .with_response("second");
    let orchestrator = orchestrator(&provider, lab_registry()).with_settings(OrchestratorSettings {
        discovery_query: Some("netconf".to_string()),
        discovery_limit: 50,
    });

    orchestrator.handle("a", &ConversationHistory::new()).await.unwrap();
    orchestrator.handle("a", &ConversationHistory::new()).await.unwrap();

    let calls = provider.get_calls();
    assert_eq!(calls[0].messages[0], calls[1].messages[0]);
}

#[tokio::test]
async fn shared_orchestrator_serves_concurrent_requests() {
    let provider = MockAIProvider::new();
    let registry: Arc<dyn ToolRegistry> = Arc::new(LazyToolRegistry::new(|| async {
        Ok(lab_registry() as Arc<dyn ToolRegistry>)
    }));
    let orchestrator = Arc::new(orchestrator(&provider, registry));

    let tasks = (0..4).map(|i| {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            orchestrator
                .handle(&format!("request {}", i), &ConversationHistory::new())
                .await
        })
    });
    let outcomes = futures::future::join_all(tasks).await;

    for outcome in outcomes {
        let outcome = outcome.unwrap().unwrap();
        assert_eq!(outcome.history.len(), 2);
        assert_eq!(outcome.tool_result, NO_TOOL_CALLED);
    }
    assert_eq!(provider.call_count(), 4);
}
