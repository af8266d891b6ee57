//! Agent Loop Performance Benchmarks
//!
//! Benchmarks the text-processing hot paths of the loop: action parsing,
//! prompt assembly, tool dispatch, and a full scripted run.

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use reagent::{
    ActionParser, AgentConfig, AgentLoop, Completion, PromptAssembler, RetryPolicy, ToolCall,
    ToolName, ToolRegistry, Transcript, Turn, standard_registry,
};
use reagent_testing::ScriptedModelClient;
use std::hint::black_box;

/// Benchmark parsing the common completion shapes
fn bench_action_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("action_parsing");
    group.throughput(Throughput::Elements(1));

    let registry = standard_registry().unwrap();
    let parser = ActionParser::new();

    let completions = vec![
        ("simple_action", "Action: echo\nAction Input: hello"),
        (
            "action_with_thought",
            "Thought: I should repeat the input back\nAction: echo\nAction Input: hello world",
        ),
        (
            "final_answer",
            "Thought: I now know the final answer\nFinal Answer: the result is 42",
        ),
        (
            "decorated_action",
            "Thought: compute\nAction: `calc`\nAction Input: ```\n2 * (3 + 4)\n```",
        ),
        ("untagged_prose", "I am not sure what I should do here."),
    ];

    for (name, text) in completions {
        let completion = Completion::new(text);
        group.bench_with_input(BenchmarkId::new("parse", name), &completion, |b, input| {
            b.iter(|| black_box(parser.parse(black_box(input), &registry)))
        });
    }

    group.finish();
}

/// Benchmark prompt assembly over growing transcripts
fn bench_prompt_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompt_assembly");
    group.throughput(Throughput::Elements(1));

    let registry = standard_registry().unwrap();
    let assembler = PromptAssembler::new();
    let echo = ToolName::parse("echo").unwrap();

    for rounds in [1usize, 8, 32] {
        let mut transcript = Transcript::new();
        transcript.push(Turn::UserInput {
            text: "benchmark goal".to_string(),
        });
        for i in 0..rounds {
            transcript.push(Turn::ActionRequest {
                tool: echo.clone(),
                input: format!("round {i}"),
            });
            transcript.push(Turn::observation(echo.clone(), format!("result {i}"), false));
        }

        group.bench_with_input(
            BenchmarkId::new("assemble", rounds),
            &transcript,
            |b, transcript| {
                b.iter(|| black_box(assembler.assemble(black_box(transcript), &registry).unwrap()))
            },
        );
    }

    group.finish();
}

/// Benchmark registry dispatch through the standard tools
fn bench_tool_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("tool_dispatch");
    group.throughput(Throughput::Elements(1));

    let registry = standard_registry().unwrap();
    let calls = vec![
        ("echo", ToolCall::new("echo", "hello").unwrap()),
        ("calc", ToolCall::new("calc", "2 * (3 + 4) - 10 / 2").unwrap()),
        (
            "text_count",
            ToolCall::new("text_count", "the quick brown fox jumps over the lazy dog").unwrap(),
        ),
    ];

    for (name, call) in calls {
        group.bench_with_input(BenchmarkId::new("dispatch", name), &call, |b, call| {
            b.iter(|| black_box(registry.dispatch(black_box(call)).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark a complete scripted run: two tool rounds plus a final answer
fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.throughput(Throughput::Elements(1));
    group.sample_size(200);

    group.bench_function("three_round_run", |b| {
        b.iter_batched(
            || {
                let model = ScriptedModelClient::new([
                    "Thought: reverse it first\nAction: text_reverse\nAction Input: stressed",
                    "Thought: now shout it\nAction: text_uppercase\nAction Input: desserts",
                    "Final Answer: DESSERTS",
                ]);
                let config = AgentConfig {
                    retry: RetryPolicy::none(),
                    ..AgentConfig::default()
                };
                AgentLoop::new(model, standard_registry().unwrap(), config)
            },
            |agent| black_box(agent.run("benchmark goal").unwrap()),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_action_parsing,
    bench_prompt_assembly,
    bench_tool_dispatch,
    bench_full_run
);
criterion_main!(benches);
