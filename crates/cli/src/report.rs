// Text rendering of suite results
//
// Renderers build strings so commands decide where they go and tests can
// inspect them.

use std::fmt::Write;

use crudbench_core::{
    Comparison, Operation, OperationStats, ProbeReport, RunSummary, SuiteReport, TargetBenchmark,
    TargetStress,
};

use crate::output::{field, fixed2, rule, table_header, table_row};

const SERVER_WIDTH: usize = 25;
const NUMBER_WIDTH: usize = 12;

pub fn render_probe(report: &ProbeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Checking server availability...");
    for status in &report.targets {
        let state = if status.available { "Running" } else { "Not Running" };
        let _ = writeln!(out, "  {}: {} ({})", status.target.name, state, status.target.base_url);
    }
    let _ = writeln!(
        out,
        "\n{} of {} server(s) available for testing.",
        report.available().count(),
        report.checked()
    );
    out
}

pub fn render_benchmark(entry: &TargetBenchmark) -> String {
    let run = &entry.run;
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "API Performance Benchmark - {}", entry.target.name);
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", field("Target", &entry.target.base_url));
    let _ = writeln!(out, "{}", field("Requests/operation", &run.requests.to_string()));
    let _ = writeln!(out, "{}", field("Concurrency", &run.concurrency.to_string()));
    let _ = writeln!(out);

    for stats in run.operations.values() {
        write_operation(&mut out, stats);
    }

    write_summary(&mut out, &run.summary);
    out
}

fn write_operation(out: &mut String, stats: &OperationStats) {
    let _ = writeln!(out, "{}:", stats.operation);

    let Some(latency) = &stats.latency else {
        let _ = writeln!(out, "  All requests failed! ({} issued)", stats.total);
        let _ = writeln!(out);
        return;
    };

    let lines = [
        ("Total Requests", stats.total.to_string()),
        ("Successful", stats.successful.to_string()),
        ("Failed", stats.failed.to_string()),
        ("Mean Duration", format!("{:.2} ms", latency.mean)),
        ("Median Duration", format!("{:.2} ms", latency.median)),
        ("Min Duration", format!("{:.2} ms", latency.min)),
        ("Max Duration", format!("{:.2} ms", latency.max)),
        ("P95 Duration", format!("{:.2} ms", latency.p95)),
        ("P99 Duration", format!("{:.2} ms", latency.p99)),
        ("Std Deviation", format!("{:.2} ms", latency.stdev)),
        ("Wall Time", format!("{:.3} s", stats.wall_time.as_secs_f64())),
        ("Requests/sec", fixed2(stats.req_per_sec)),
    ];
    for (label, value) in lines {
        let _ = writeln!(out, "  {}", field(label, &value));
    }
    let _ = writeln!(out);
}

fn write_summary(out: &mut String, summary: &RunSummary) {
    let _ = writeln!(out, "Overall Summary");
    let _ = writeln!(out, "{}", "-".repeat(15));
    let lines = [
        ("Total Requests", summary.total.to_string()),
        ("Successful", summary.successful.to_string()),
        ("Failed", summary.failed.to_string()),
        ("Wall Time", format!("{:.3} s", summary.wall_time.as_secs_f64())),
        ("Average Duration", format!("{} ms", fixed2(summary.mean_ms))),
        ("Throughput", format!("{} req/sec", fixed2(summary.req_per_sec))),
    ];
    for (label, value) in lines {
        let _ = writeln!(out, "{}", field(label, &value));
    }
    let _ = writeln!(out);
}

pub fn render_stress(entry: &TargetStress) -> String {
    let run = &entry.run;
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Stress Test - {}", entry.target.name);
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", field("Target", &entry.target.base_url));
    let _ = writeln!(
        out,
        "{}",
        field("Duration", &format!("{} s", run.duration.as_secs_f64()))
    );
    let _ = writeln!(out, "{}", field("Concurrent Workers", &run.workers.to_string()));
    let _ = writeln!(out);

    let Some(latency) = &run.latency else {
        let _ = writeln!(out, "All stress test requests failed! ({} issued)", run.total);
        let _ = writeln!(out);
        return out;
    };

    let lines = [
        ("Total Requests", run.total.to_string()),
        ("Successful", run.successful.to_string()),
        ("Failed", run.failed.to_string()),
        ("Total Time", format!("{:.2} s", run.total_time.as_secs_f64())),
        ("Requests/sec", fixed2(run.req_per_sec)),
        ("Mean Duration", format!("{:.2} ms", latency.mean)),
        ("Median Duration", format!("{:.2} ms", latency.median)),
        ("Min Duration", format!("{:.2} ms", latency.min)),
        ("Max Duration", format!("{:.2} ms", latency.max)),
        ("P95 Duration", format!("{:.2} ms", latency.p95)),
        ("P99 Duration", format!("{:.2} ms", latency.p99)),
        ("Std Deviation", format!("{:.2} ms", latency.stdev)),
    ];
    let _ = writeln!(out, "Stress Test Results:");
    for (label, value) in lines {
        let _ = writeln!(out, "  {}", field(label, &value));
    }
    let _ = writeln!(out);
    out
}

pub fn render_comparison(
    comparison: &Comparison,
    benchmarks: &[TargetBenchmark],
    stress: &[TargetStress],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "COMPARISON SUMMARY");
    let _ = writeln!(out, "{}", rule());

    if !benchmarks.is_empty() {
        let _ = writeln!(out, "\nBenchmark Results Comparison:");
        for winner in &comparison.operations {
            write_operation_table(&mut out, winner.operation, benchmarks);
            if let Some(target) = &winner.winner {
                let _ = writeln!(out, "  Winner: {}", target.name);
            }
        }
    }

    if !stress.is_empty() {
        let _ = writeln!(out, "\nStress Test Comparison:");
        let _ = writeln!(
            out,
            "  {}",
            table_header(&[
                ("Server", SERVER_WIDTH),
                ("Req/sec", NUMBER_WIDTH),
                ("Mean (ms)", NUMBER_WIDTH),
                ("Success Rate", 15),
            ])
        );
        let _ = writeln!(out, "  {}", "-".repeat(70));
        for entry in stress {
            let rps = fixed2(entry.run.req_per_sec);
            let mean = fixed2(entry.run.latency.as_ref().map(|l| l.mean));
            let rate = format!("{:.1}%", entry.run.success_rate() * 100.0);
            let _ = writeln!(
                out,
                "  {}",
                table_row(&[
                    (&entry.target.name, SERVER_WIDTH),
                    (&rps, NUMBER_WIDTH),
                    (&mean, NUMBER_WIDTH),
                    (&rate, 15),
                ])
            );
        }
        if let Some(winner) = &comparison.stress {
            let _ = writeln!(out, "  Winner: {}", winner.target.name);
        }
    }

    let _ = writeln!(out, "\n{}", rule());
    out
}

fn write_operation_table(out: &mut String, operation: Operation, benchmarks: &[TargetBenchmark]) {
    let _ = writeln!(out, "\n{}:", operation);
    let _ = writeln!(
        out,
        "  {}",
        table_header(&[
            ("Server", SERVER_WIDTH),
            ("Mean (ms)", NUMBER_WIDTH),
            ("Median (ms)", NUMBER_WIDTH),
            ("Req/sec", NUMBER_WIDTH),
        ])
    );
    let _ = writeln!(out, "  {}", "-".repeat(65));

    for entry in benchmarks {
        let stats = entry.run.get(operation);
        let latency = stats.and_then(|s| s.latency.as_ref());
        let mean = fixed2(latency.map(|l| l.mean));
        let median = fixed2(latency.map(|l| l.median));
        let rps = fixed2(stats.and_then(|s| s.req_per_sec));
        let _ = writeln!(
            out,
            "  {}",
            table_row(&[
                (&entry.target.name, SERVER_WIDTH),
                (&mean, NUMBER_WIDTH),
                (&median, NUMBER_WIDTH),
                (&rps, NUMBER_WIDTH),
            ])
        );
    }
}

/// Full text report of a suite run
pub fn render_suite(report: &SuiteReport) -> String {
    let mut out = String::new();

    for entry in &report.benchmarks {
        out.push_str(&render_benchmark(entry));
    }
    for entry in &report.stress {
        out.push_str(&render_stress(entry));
    }
    if let Some(comparison) = &report.comparison {
        out.push_str(&render_comparison(
            comparison,
            &report.benchmarks,
            &report.stress,
        ));
    }

    out
}
