use std::io;

use quiz_core::model::SurveyDraft;

use crate::prompt::Prompter;

pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    /// `(score, label)` pairs in display order.
    pub options: &'static [(i32, &'static str)],
}

pub const CONSUMPTION_QUESTIONS: &[Question] = &[
    Question {
        id: "consumption1",
        text: "How much of your monthly income do you save?",
        options: &[(1, "Under 10%"), (2, "10-20%"), (3, "20-30%"), (4, "30% or more")],
    },
    Question {
        id: "consumption2",
        text: "How often do you buy on impulse?",
        options: &[
            (4, "Almost never"),
            (3, "Sometimes (1-2 times a month)"),
            (2, "Often (1-2 times a week)"),
            (1, "Very often (3+ times a week)"),
        ],
    },
    Question {
        id: "consumption3",
        text: "Do you plan a budget and track spending?",
        options: &[
            (4, "Always, and I stick to it"),
            (3, "Yes, but I sometimes overspend"),
            (2, "Only a rough budget"),
            (1, "No budget"),
        ],
    },
];

pub const KNOWLEDGE_QUESTIONS: &[Question] = &[
    Question {
        id: "finknow1",
        text: "What is compound interest?",
        options: &[
            (0, "Interest on the principal only"),
            (1, "Interest on principal and accrued interest"),
            (0, "Interest on interest only"),
            (0, "Not sure"),
        ],
    },
    Question {
        id: "finknow2",
        text: "What happens to the value of money when inflation is high?",
        options: &[(0, "It rises"), (1, "It falls"), (0, "No change"), (0, "Not sure")],
    },
    Question {
        id: "finknow3",
        text: "Which is generally riskier, stocks or bonds?",
        options: &[(1, "Stocks"), (0, "Bonds"), (0, "Equally risky"), (0, "Not sure")],
    },
    Question {
        id: "finknow4",
        text: "What is the main goal of diversification?",
        options: &[
            (0, "Maximising returns"),
            (1, "Reducing risk"),
            (0, "Saving tax"),
            (0, "Not sure"),
        ],
    },
    Question {
        id: "finknow5",
        text: "What does ETF stand for?",
        options: &[
            (0, "Electronic Trading Fund"),
            (0, "Extra Tax Freedom"),
            (1, "Exchange Traded Fund"),
            (0, "Not sure"),
        ],
    },
    Question {
        id: "finknow6",
        text: "What affects a credit score the most?",
        options: &[
            (0, "Income level"),
            (1, "Repayment history"),
            (0, "Number of accounts"),
            (0, "Not sure"),
        ],
    },
];

/// The numeric profile fields asked on the first survey step.
const PROFILE_FIELDS: [&str; 6] = [
    "Asset type",
    "Investable resources",
    "Credit score band",
    "Delinquencies",
    "Debt ratio band",
    "Comfort with digital finance",
];

/// Walks the three survey steps on the terminal, filling `draft`.
///
/// Returns `Ok(false)` when input ends before the survey is complete.
pub async fn fill_draft(prompter: &mut Prompter, draft: &mut SurveyDraft) -> io::Result<bool> {
    println!("-- Step 1/3 ({}%): your profile, 0 to 5 --", draft.step().progress_percent());
    let mut values = [0; PROFILE_FIELDS.len()];
    for (label, slot) in PROFILE_FIELDS.iter().zip(values.iter_mut()) {
        let Some(value) = prompter.ask_number(&format!("{label}: "), 0..=5).await? else {
            return Ok(false);
        };
        *slot = value;
    }
    let profile = draft.profile_mut();
    profile.asset_type = values[0];
    profile.invest_resource = values[1];
    profile.credit_score = values[2];
    profile.delinquent_count = values[3];
    profile.debt_ratio = values[4];
    profile.digital_friendly = values[5];
    draft.next_step();

    println!("-- Step 2/3 ({}%): spending habits --", draft.step().progress_percent());
    for question in CONSUMPTION_QUESTIONS {
        let Some(score) = ask_question(prompter, question).await? else {
            return Ok(false);
        };
        draft.answer_consumption(question.id, score);
    }
    draft.next_step();

    println!("-- Step 3/3 ({}%): financial knowledge --", draft.step().progress_percent());
    for question in KNOWLEDGE_QUESTIONS {
        let Some(score) = ask_question(prompter, question).await? else {
            return Ok(false);
        };
        draft.answer_knowledge(question.id, score);
    }
    Ok(true)
}

async fn ask_question(prompter: &mut Prompter, question: &Question) -> io::Result<Option<i32>> {
    println!("{}", question.text);
    for (index, (_, label)) in question.options.iter().enumerate() {
        println!("  {}. {label}", index + 1);
    }
    let last = i32::try_from(question.options.len()).unwrap_or(i32::MAX);
    let Some(picked) = prompter.ask_number("> ", 1..=last).await? else {
        return Ok(None);
    };
    let score = usize::try_from(picked - 1)
        .ok()
        .and_then(|index| question.options.get(index))
        .map_or(0, |(score, _)| *score);
    Ok(Some(score))
}
