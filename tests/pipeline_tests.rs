mod common;

use common::{ReasonerScript, RecordingMemory, ScriptedReasoner};
use parley::pipeline::{
    self, EMPTY_REPLY, ERROR_REPLY, MEMORY_CATEGORY, MEMORY_IMPORTANCE, NOT_READY_REPLY,
};
use parley::registry::SubsystemRegistry;
use parley::subsystems::memory::MemoryStore;
use parley::subsystems::reasoner::Reasoner;
use parley::turn::Utterance;

fn registry_with(
    reasoner: Option<Box<dyn Reasoner>>,
    memory: Option<Box<dyn MemoryStore>>,
) -> SubsystemRegistry {
    SubsystemRegistry {
        reasoner,
        memory,
        knowledge: None,
        voice: None,
    }
}

#[tokio::test]
async fn not_ready_exactly_when_reasoner_absent() {
    let (memory, entries) = RecordingMemory::new();
    let mut registry = registry_with(None, Some(Box::new(memory)));

    for text in ["hello", "", "what time is it"] {
        let record = pipeline::process(&mut registry, &Utterance::typed(text)).await;
        assert_eq!(record.reply, NOT_READY_REPLY, "input: {text:?}");
        assert!(!record.ok);
        assert!(record.entry.is_none());
    }
    assert!(
        entries.lock().unwrap().is_empty(),
        "memory must not be touched while the reasoner is absent"
    );

    // With a reasoner present the fixed string never comes back.
    let (reasoner, _) = ScriptedReasoner::new(ReasonerScript::Reply("hi"));
    let mut registry = registry_with(Some(Box::new(reasoner)), None);
    let record = pipeline::process(&mut registry, &Utterance::typed("hello")).await;
    assert_ne!(record.reply, NOT_READY_REPLY);
}

#[tokio::test]
async fn reply_text_is_extracted_verbatim_and_summarized() {
    let (reasoner, calls) = ScriptedReasoner::new(ReasonerScript::Reply("It is sunny"));
    let (memory, entries) = RecordingMemory::new();
    let mut registry = registry_with(Some(Box::new(reasoner)), Some(Box::new(memory)));

    let record = pipeline::process(&mut registry, &Utterance::typed("What is the weather")).await;

    assert_eq!(record.reply, "It is sunny");
    assert!(record.ok);
    assert_eq!(calls.lock().unwrap().as_slice(), ["What is the weather"]);

    let stored = entries.lock().unwrap();
    assert_eq!(stored.len(), 1, "exactly one entry per successful turn");
    assert_eq!(stored[0].category, MEMORY_CATEGORY);
    assert_eq!(stored[0].importance, MEMORY_IMPORTANCE);
    assert_eq!(stored[0].content, "What is the weather -> It is sunny");
    assert!(!stored[0].metadata.timestamp.is_empty());
}

#[tokio::test]
async fn missing_response_field_becomes_placeholder() {
    let (reasoner, _) = ScriptedReasoner::new(ReasonerScript::NoText);
    let (memory, entries) = RecordingMemory::new();
    let mut registry = registry_with(Some(Box::new(reasoner)), Some(Box::new(memory)));

    let record = pipeline::process(&mut registry, &Utterance::typed("hello")).await;

    assert_eq!(record.reply, EMPTY_REPLY);
    assert!(record.ok, "a placeholder reply is still a completed turn");
    assert_eq!(
        entries.lock().unwrap().len(),
        1,
        "placeholder turns are still summarized into memory"
    );
}

#[tokio::test]
async fn reasoner_failure_returns_generic_reply_without_memory() {
    let (reasoner, _) = ScriptedReasoner::new(ReasonerScript::Fail);
    let (memory, entries) = RecordingMemory::new();
    let mut registry = registry_with(Some(Box::new(reasoner)), Some(Box::new(memory)));

    let record = pipeline::process(&mut registry, &Utterance::typed("hello")).await;

    assert_eq!(record.reply, ERROR_REPLY);
    assert!(!record.ok);
    assert!(
        entries.lock().unwrap().is_empty(),
        "a failed dispatch stores nothing"
    );
}

#[tokio::test]
async fn every_reasoner_behavior_yields_exactly_one_known_reply() {
    for script in [
        ReasonerScript::Reply("fine"),
        ReasonerScript::NoText,
        ReasonerScript::Fail,
    ] {
        let (reasoner, _) = ScriptedReasoner::new(script);
        let mut registry = registry_with(Some(Box::new(reasoner)), None);
        let record = pipeline::process(&mut registry, &Utterance::typed("anything")).await;

        let known =
            record.reply == "fine" || record.reply == EMPTY_REPLY || record.reply == ERROR_REPLY;
        assert!(known, "unexpected reply: {:?}", record.reply);
    }
}

#[tokio::test]
async fn memory_store_failure_never_changes_the_reply() {
    let utterance = Utterance::typed("What is the weather");

    let (reasoner, _) = ScriptedReasoner::new(ReasonerScript::Reply("It is sunny"));
    let (memory, entries) = RecordingMemory::with_failures(true, false);
    let mut failing = registry_with(Some(Box::new(reasoner)), Some(Box::new(memory)));
    let with_failing_memory = pipeline::process(&mut failing, &utterance).await;

    let (reasoner, _) = ScriptedReasoner::new(ReasonerScript::Reply("It is sunny"));
    let mut absent = registry_with(Some(Box::new(reasoner)), None);
    let with_absent_memory = pipeline::process(&mut absent, &utterance).await;

    assert_eq!(
        with_failing_memory.reply, with_absent_memory.reply,
        "persistence failure must be invisible in the reply"
    );
    assert!(with_failing_memory.ok);
    assert!(entries.lock().unwrap().is_empty());
}
