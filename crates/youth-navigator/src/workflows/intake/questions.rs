use super::domain::{Condition, Question, QuestionKind};
use super::flow::QuestionFlow;

pub const SHELTER_SITUATION: &str = "Need shelter/housing";
pub const FOOD_SITUATION: &str = "Need food";
pub const MENTAL_HEALTH_SITUATION: &str = "Mental health support";

impl QuestionFlow {
    /// Built-in English intake questionnaire.
    ///
    /// Branches: housing follow-ups only for shelter seekers, the school
    /// questions only under 25, and ID/income are skipped for anyone who
    /// reported a crisis.
    pub fn standard() -> Self {
        Self::new(vec![
            Question::new(
                "initial",
                "situation",
                QuestionKind::Multiple,
                "What's your main situation right now?",
            )
            .with_context(
                "I'm asking this so I can understand what you're dealing with and find the best \
                 resources for your situation. Share as much or as little as you're comfortable with.",
            )
            .with_options([
                SHELTER_SITUATION,
                FOOD_SITUATION,
                MENTAL_HEALTH_SITUATION,
                "Education help",
                "Job training/employment",
                "Other/Multiple needs",
            ])
            .skippable()
            .sensitive(),
            Question::new("age", "age", QuestionKind::Number, "How old are you?")
                .with_context(
                    "Different programs have different age requirements, so knowing your age \
                     helps me show you programs you can actually use.",
                )
                .required(),
            Question::new(
                "housingDuration",
                "housingDuration",
                QuestionKind::Multiple,
                "How long have you needed housing?",
            )
            .with_context(
                "This helps me tell whether you need emergency shelter tonight or longer-term \
                 housing support.",
            )
            .with_options(["Tonight only", "A few days", "Weeks", "Months"])
            .skippable()
            .sensitive()
            .show_if(Condition::equals("situation", SHELTER_SITUATION)),
            Question::new(
                "safePlaceTonight",
                "safePlaceTonight",
                QuestionKind::YesNo,
                "Do you have somewhere safe to stay tonight?",
            )
            .skippable()
            .show_if(Condition::equals("situation", SHELTER_SITUATION)),
            Question::new(
                "foodFrequency",
                "foodFrequency",
                QuestionKind::Multiple,
                "How often do you need food assistance?",
            )
            .with_options(["Right now", "Daily", "Weekly", "Monthly"])
            .skippable()
            .show_if(Condition::equals("situation", FOOD_SITUATION)),
            Question::new(
                "crisisLevel",
                "crisisLevel",
                QuestionKind::YesNo,
                "Is this an emergency situation where you need help right away?",
            )
            .skippable()
            .show_if(Condition::equals("situation", MENTAL_HEALTH_SITUATION)),
            Question::new(
                "inSchool",
                "inSchool",
                QuestionKind::YesNo,
                "Are you going to school right now, or working on a GED?",
            )
            .skippable()
            .show_if(Condition::less_than("age", 25)),
            Question::new(
                "schoolType",
                "schoolType",
                QuestionKind::Multiple,
                "What type of school are you in?",
            )
            .with_options(["High school", "College", "Trade school", "GED program"])
            .skippable()
            .show_if(Condition::equals("inSchool", true)),
            Question::new(
                "location",
                "location",
                QuestionKind::Text,
                "What city or area are you in right now?",
            )
            .with_context(
                "Some programs are only in certain cities, so this helps me find what's \
                 actually available near you.",
            )
            .skippable(),
            Question::new(
                "hasId",
                "hasId",
                QuestionKind::YesNo,
                "Do you have an ID right now? Like a driver's license, state ID, or passport?",
            )
            .skippable()
            .skip_if(Condition::equals("crisisLevel", true)),
            Question::new(
                "hasIncome",
                "hasIncome",
                QuestionKind::YesNo,
                "Do you have any money coming in right now?",
            )
            .skippable()
            .sensitive()
            .skip_if(Condition::equals("crisisLevel", true)),
            Question::new(
                "duration",
                "duration",
                QuestionKind::Multiple,
                "How long have you been dealing with this?",
            )
            .with_options([
                "Just started - less than a week",
                "A few weeks (1-4 weeks)",
                "A few months (1-6 months)",
                "A long time - more than 6 months",
            ])
            .skippable()
            .sensitive()
            .skip_if(Condition::equals("situation", SHELTER_SITUATION)),
        ])
    }
}
