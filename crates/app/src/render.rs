use ui::vm::{HomeVm, LeaderboardRowVm, ProfileVm, QuizCardStatus, QuizCardVm, SubmitFeedback};

pub fn print_home(home: &HomeVm) {
    println!("Hello, {}! Rank: {}", home.display_name, home.rank);
    if let Some(image) = &home.character_image {
        println!("Character: {image}");
    }
    println!("\"{}\"", home.quote);
    if home.recent.is_empty() {
        println!("No quizzes taken yet.");
        return;
    }
    println!("Recent quizzes:");
    for quiz in &home.recent {
        let mark = if quiz.is_correct { "O" } else { "X" };
        println!("  [{mark}] {} ({}, {})", quiz.prompt, quiz.subject, quiz.taken_at_str);
    }
}

pub fn print_profile(profile: &ProfileVm) {
    println!("Rank: {}", profile.rank);
    if let Some(image) = &profile.character_image {
        println!("Character: {image}");
    }
    println!(
        "Invest {:>4}  ({:.0}%)",
        profile.invest,
        profile.radar.invest * 100.0
    );
    println!(
        "Credit {:>4}  ({:.0}%)",
        profile.credit,
        profile.radar.credit * 100.0
    );
    println!(
        "Finance {:>3}  ({:.0}%)",
        profile.finance,
        profile.radar.finance * 100.0
    );
    println!("Total  {:>4}", profile.stat_sum);
}

pub fn print_leaderboard(rows: &[LeaderboardRowVm]) {
    if rows.is_empty() {
        println!("No entries on this page.");
        return;
    }
    for row in rows {
        println!("{:>4}. {:<20} {:>6}", row.position, row.nickname, row.stat_sum);
    }
}

pub fn print_card(card: &QuizCardVm) {
    let status = match card.status {
        QuizCardStatus::Collapsed => " ",
        QuizCardStatus::Open => ">",
        QuizCardStatus::Correct => "O",
        QuizCardStatus::Incorrect => "X",
        QuizCardStatus::Locked => "#",
    };
    println!("[{status}] #{} (level {}) {}", card.id, card.level, card.prompt);

    if matches!(card.status, QuizCardStatus::Open | QuizCardStatus::Incorrect) {
        for (index, choice) in card.choices.iter().enumerate() {
            let number = index + 1;
            let picked = card
                .selected
                .is_some_and(|selected| usize::from(selected) == number);
            let marker = if picked { "*" } else { " " };
            println!("     {marker}{number}. {choice}");
        }
    }
    if let Some(message) = &card.message {
        println!("     {message}");
    }
}

pub fn print_feedback(feedback: &SubmitFeedback) {
    match feedback {
        SubmitFeedback::NothingSelected => println!("Pick an answer first."),
        SubmitFeedback::Correct(message) => println!("Correct: {message}"),
        SubmitFeedback::Incorrect(message) => println!("Incorrect: {message}"),
        SubmitFeedback::Failed(message) => println!("{message}"),
    }
}
