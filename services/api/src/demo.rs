use crate::infra::{load_catalog, InMemorySessionRepository};
use clap::Args;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use youth_navigator::error::AppError;
use youth_navigator::workflows::intake::{
    FactValue, Facts, IntakeService, QuestionFlow, QuestionKind,
};
use youth_navigator::workflows::matching::{classify, Classification};

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Fact set as a JSON object, e.g. '{"age": 19, "location": "Oakland"}'
    #[arg(long)]
    pub(crate) facts: String,
    /// JSON catalog to classify instead of the built-in one
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Situation typed at the first question
    #[arg(long, default_value = "I got kicked out last night")]
    pub(crate) situation: String,
    #[arg(long, default_value_t = 19)]
    pub(crate) age: u32,
    #[arg(long, default_value = "Oakland")]
    pub(crate) location: String,
    /// JSON catalog to match against instead of the built-in one
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

fn invalid_input(message: String) -> AppError {
    AppError::Io(io::Error::new(io::ErrorKind::InvalidInput, message))
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let facts: Facts = serde_json::from_str(&args.facts)
        .map_err(|err| invalid_input(format!("--facts must be a JSON object of scalars ({err})")))?;

    let classification = classify(catalog.resources(), &facts);
    let rendered = serde_json::to_string_pretty(&classification)
        .map_err(|err| invalid_input(format!("failed to render classification ({err})")))?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let service = IntakeService::new(
        Arc::new(InMemorySessionRepository::default()),
        QuestionFlow::standard(),
        catalog,
        chrono::Duration::hours(1),
    );
    let script = scripted_answers(&args);

    println!("Youth resource navigator demo");
    let mut session = service.start()?;
    while let Some(question) = session.current_question(service.flow()) {
        println!("\nQ: {}", question.text);
        let (_, next) = match script.get(question.field.as_str()) {
            Some(answer) => {
                println!("A: {answer}");
                service.answer(&session.id, answer)?
            }
            None => {
                println!("A: (skipped)");
                service.skip(&session.id)?
            }
        };
        session = next;
    }

    println!("\nCollected facts");
    for (field, value) in session.facts().iter() {
        println!("- {field}: {value}");
    }

    let classification = service.classification(&session.id)?;
    render_classification(&classification);

    if let Some(top) = classification.eligible.first() {
        let answers: BTreeMap<String, FactValue> = top
            .resource
            .follow_up_questions
            .iter()
            .filter(|question| question.kind == QuestionKind::YesNo)
            .map(|question| (question.field.clone(), FactValue::Flag(false)))
            .collect();
        let help = service.barrier_help(&top.resource.id, &answers, session.facts())?;

        println!("\nBarriers for {} (answering \"no\" to each follow-up)", top.resource.name);
        if help.barriers.is_empty() {
            println!("- none reported");
        }
        for barrier in &help.barriers {
            println!("- {barrier}");
        }
        for helper in &help.helpers {
            println!("  -> {} ({})", helper.name, helper.id);
        }
    }

    Ok(())
}

fn scripted_answers(args: &DemoArgs) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        ("situation", args.situation.clone()),
        ("age", args.age.to_string()),
        ("location", args.location.clone()),
        ("housingDuration", "A few days".to_string()),
        ("safePlaceTonight", "no".to_string()),
        ("inSchool", "no".to_string()),
        ("hasId", "no".to_string()),
        ("hasIncome", "no".to_string()),
    ])
}

fn render_classification(classification: &Classification<'_>) {
    println!("\nEligible ({})", classification.eligible.len());
    for entry in &classification.eligible {
        let urgency = if entry.resource.urgent { " [urgent]" } else { "" };
        match entry.proximity {
            Some(tier) => println!("- {}{urgency} ({})", entry.resource.name, tier.label()),
            None => println!("- {}{urgency}", entry.resource.name),
        }
    }

    println!(
        "\nNeed more information ({})",
        classification.potentially_eligible.len()
    );
    for entry in &classification.potentially_eligible {
        let missing: Vec<&str> = entry.missing_info.iter().map(|field| field.label()).collect();
        println!("- {}: {}", entry.resource.name, missing.join(", "));
    }

    println!("\nNot a fit ({})", classification.ineligible.len());
    for entry in &classification.ineligible {
        println!("- {}: {}", entry.resource.name, entry.reasons.join("; "));
    }
}
