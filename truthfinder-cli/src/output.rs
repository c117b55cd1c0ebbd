/// Output formatting: terminal tables and JSON.
use serde::Serialize;
use truthfinder_core::{ClaimEstimate, IterationStats, ScoredStatement, SourceEstimate, TrainResult};

#[derive(Serialize)]
struct JsonSubject {
    subject: String,
    most_likely: String,
    claims: Vec<ClaimEstimate>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    subjects: Vec<JsonSubject>,
    sources: Vec<SourceEstimate>,
    statements: &'a [ScoredStatement],
    iterations: usize,
    history: &'a [IterationStats],
}

/// Claims grouped by subject, each group already ranked by confidence.
fn group_by_subject(claims: Vec<ClaimEstimate>) -> Vec<Vec<ClaimEstimate>> {
    let mut groups: Vec<Vec<ClaimEstimate>> = Vec::new();
    for claim in claims {
        match groups.last_mut() {
            Some(group) if group[0].subject == claim.subject => group.push(claim),
            _ => groups.push(vec![claim]),
        }
    }
    groups
}

/// Print the statement table as the engine sees it.
pub fn print_statements(rows: &[ScoredStatement]) {
    let source_width = column_width(rows.iter().map(|r| r.source.as_str()), "Source");
    let claim_width = column_width(rows.iter().map(|r| r.claim.as_str()), "Claim");
    let subject_width = column_width(rows.iter().map(|r| r.subject.as_str()), "Subject");

    println!(
        "{:<source_width$} | {:<claim_width$} | {:<subject_width$} | Trustworthiness | Confidence",
        "Source", "Claim", "Subject",
    );
    println!(
        "{}-|-{}-|-{}-|-----------------|-----------",
        "-".repeat(source_width),
        "-".repeat(claim_width),
        "-".repeat(subject_width),
    );
    for r in rows {
        println!(
            "{:<source_width$} | {:<claim_width$} | {:<subject_width$} | {:>15.4} | {:>10.4}",
            r.source, r.claim, r.subject, r.trustworthiness, r.confidence,
        );
    }
}

/// Print results as formatted terminal tables: ranked claims per subject,
/// then sources by trustworthiness.
pub fn print_table(result: &TrainResult) {
    let groups = group_by_subject(result.claims());
    let claim_width = column_width(groups.iter().flatten().map(|c| c.claim.as_str()), "Claim");

    for group in &groups {
        println!("{}", group[0].subject);
        println!(" # | {:<claim_width$} | Confidence | Sources", "Claim");
        println!("---|-{}-|------------|--------", "-".repeat(claim_width));
        for (i, c) in group.iter().enumerate() {
            let marker = if i == 0 { '*' } else { ' ' };
            println!(
                "{}{:>2} | {:<claim_width$} | {:>10.4} | {}",
                marker,
                i + 1,
                c.claim,
                c.confidence,
                c.sources.join(", "),
            );
        }
        println!();
    }

    let sources = result.sources();
    let source_width = column_width(sources.iter().map(|s| s.source.as_str()), "Source");
    println!(" # | {:<source_width$} | Trustworthiness | Statements", "Source");
    println!("---|-{}-|-----------------|-----------", "-".repeat(source_width));
    for (i, s) in sources.iter().enumerate() {
        println!(
            "{:>2} | {:<source_width$} | {:>15.4} | {:>10}",
            i + 1,
            s.source,
            s.trustworthiness,
            s.statements,
        );
    }

    println!(
        "\n{} statements, {} subjects, {} sources, {} iterations",
        result.statements.len(),
        groups.len(),
        sources.len(),
        result.iterations,
    );
    if let Some(last) = result.history.last() {
        println!(
            "Last iteration moved trust by at most {:.2e} and confidence by at most {:.2e}",
            last.max_trust_delta, last.max_confidence_delta,
        );
    }
}

/// Print results as JSON.
pub fn print_json(result: &TrainResult) {
    let subjects = group_by_subject(result.claims())
        .into_iter()
        .map(|claims| JsonSubject {
            subject: claims[0].subject.clone(),
            most_likely: claims[0].claim.clone(),
            claims,
        })
        .collect();

    let output = JsonOutput {
        subjects,
        sources: result.sources(),
        statements: &result.statements,
        iterations: result.iterations,
        history: &result.history,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => crate::bail(format!("Failed to serialize results: {e}")),
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(0).max(header.len())
}
