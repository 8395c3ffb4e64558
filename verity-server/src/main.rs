use std::env;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use verity_pipeline::adapters::{NeutralImageSimilarity, TokenSetTextSimilarity};
use verity_pipeline::assembler::FeatureAssembler;
use verity_pipeline::catalog::CatalogSource;
use verity_pipeline::matcher::ReferenceMatcher;
use verity_pipeline::orchestrator::{DecisionOrchestrator, DEFAULT_TRUSTED_DOMAINS};
use verity_pipeline::source::ReferenceSource;
use verity_pipeline::types::{AnalysisReport, AnalysisRequest, ProductRecord};
use verity_signals::{AuthenticityClassifier, LogisticModel};

fn usage() -> ! {
    eprintln!(
        "Usage: verity-server <product.json> [--url URL] [--catalog NAME=PATH ...] \
         [--model PATH] [--trusted d1,d2,...] [--json]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --url      Listing URL (used for trusted-domain overrides)");
    eprintln!("  --catalog  Trusted marketplace catalog CSV, repeatable (NAME=PATH)");
    eprintln!("  --model    Trained model weights JSON (falls back to heuristic)");
    eprintln!("  --trusted  Comma-separated trusted domain list");
    eprintln!("  --json     Output as JSON instead of formatted text");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  verity-server listing.json --url https://example.shop/p/123 \\");
    eprintln!("      --catalog \"Amazon India\"=fixtures/amazon.csv --json");
    process::exit(1);
}

struct Args {
    product_path: String,
    url: String,
    catalogs: Vec<(String, String)>,
    model_path: Option<String>,
    trusted: Vec<String>,
    json_output: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let mut parsed = Args {
        product_path: args[1].clone(),
        url: String::new(),
        catalogs: Vec::new(),
        model_path: None,
        trusted: DEFAULT_TRUSTED_DOMAINS.iter().map(|s| s.to_string()).collect(),
        json_output: false,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--url" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --url requires a value");
                    process::exit(1);
                }
                parsed.url = args[i + 1].clone();
                i += 2;
            }
            "--catalog" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --catalog requires NAME=PATH");
                    process::exit(1);
                }
                match args[i + 1].split_once('=') {
                    Some((name, path)) if !name.is_empty() && !path.is_empty() => {
                        parsed.catalogs.push((name.to_string(), path.to_string()));
                    }
                    _ => {
                        eprintln!("Error: --catalog expects NAME=PATH, got '{}'", args[i + 1]);
                        process::exit(1);
                    }
                }
                i += 2;
            }
            "--model" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --model requires a path");
                    process::exit(1);
                }
                parsed.model_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--trusted" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --trusted requires a comma-separated domain list");
                    process::exit(1);
                }
                parsed.trusted = args[i + 1]
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                i += 2;
            }
            "--json" => {
                parsed.json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    parsed
}

fn load_record(path: &str) -> ProductRecord {
    let json = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {}", path, e);
            process::exit(1);
        }
    };
    let record: ProductRecord = match serde_json::from_str(&json) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error parsing product record '{}': {}", path, e);
            process::exit(1);
        }
    };
    record.finalize()
}

fn build_classifier(model_path: Option<&str>) -> AuthenticityClassifier {
    match model_path {
        Some(path) => match LogisticModel::from_json_file(path) {
            Ok(model) => AuthenticityClassifier::with_model(Arc::new(model)),
            Err(e) => {
                log::warn!("model '{}' not usable ({}); using fallback heuristic", path, e);
                AuthenticityClassifier::heuristic_only()
            }
        },
        None => AuthenticityClassifier::heuristic_only(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn print_human(report: &AnalysisReport, load_ms: u128, analysis_ms: u128) {
    println!();
    println!("  \u{2554}{}\u{2557}", "\u{2550}".repeat(62));
    println!("  \u{2551}{:^62}\u{2551}", "VERITY \u{2014} Listing Authenticity Report");
    println!("  \u{255a}{}\u{255d}", "\u{2550}".repeat(62));
    println!();

    println!(
        "  Verdict: {}  \u{00b7}  Score: {}/100  \u{00b7}  Reference: {}",
        report.verdict, report.authenticity_score, report.reference_source
    );
    println!();

    println!("  {:\u{2500}<64}", "");
    for (key, value) in &report.details {
        println!("  {:<24} {}", key, value);
    }
    println!("  {:\u{2500}<64}", "");
    println!();

    println!("  Recommendation: {}", report.recommendation);
    if let Some(note) = &report.note {
        println!("  Note: {}", note);
    }

    println!();
    println!(
        "  \u{23f1}  Inputs loaded in {}ms \u{00b7} Analysis ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        analysis_ms,
        load_ms + analysis_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = parse_args();

    let load_start = Instant::now();
    let record = load_record(&args.product_path);

    let mut sources: Vec<Box<dyn ReferenceSource>> = Vec::new();
    for (name, path) in &args.catalogs {
        match CatalogSource::from_file(name, path) {
            Ok(source) => {
                log::info!("loaded catalog {} ({} listings)", name, source.len());
                sources.push(Box::new(source));
            }
            Err(e) => {
                eprintln!("Error loading catalog '{}': {}", name, e);
                process::exit(1);
            }
        }
    }

    let classifier = build_classifier(args.model_path.as_deref());
    let load_ms = load_start.elapsed().as_millis();

    let orchestrator = DecisionOrchestrator::new(
        sources,
        ReferenceMatcher::default(),
        FeatureAssembler::new(
            Box::new(TokenSetTextSimilarity),
            Box::new(NeutralImageSimilarity),
        ),
        classifier,
        args.trusted.clone(),
    );

    let request = AnalysisRequest {
        url: args.url.clone(),
        record,
    };

    let analysis_start = Instant::now();
    let report = orchestrator.analyze(&request).await;
    let analysis_ms = analysis_start.elapsed().as_millis();

    if args.json_output {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        print_human(&report, load_ms, analysis_ms);
    }
}
