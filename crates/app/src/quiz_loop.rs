use std::error::Error;
use std::str::SplitWhitespace;

use quiz_core::model::{QuizId, Subject};
use ui::AppContext;
use ui::views::ViewError;
use ui::vm::QuizVm;

use crate::prompt::Prompter;
use crate::render::{print_card, print_feedback};

const HELP: &str = "commands: list | open <id> | close <id> | pick <id> <n> | submit <id> | quit";

enum Command {
    List,
    Open(QuizId),
    Close(QuizId),
    Pick(QuizId, u8),
    Submit(QuizId),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next()?;
    let command = match verb {
        "list" | "ls" => Command::List,
        "open" => Command::Open(next_id(&mut words)?),
        "close" => Command::Close(next_id(&mut words)?),
        "submit" => Command::Submit(next_id(&mut words)?),
        "pick" => {
            let quiz = next_id(&mut words)?;
            let choice = words.next()?.parse().ok()?;
            Command::Pick(quiz, choice)
        }
        "quit" | "exit" | "q" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn next_id(words: &mut SplitWhitespace<'_>) -> Option<QuizId> {
    words.next()?.parse().ok()
}

/// Runs the quiz screen for `subject` until the user quits, input ends, or
/// Ctrl-C is pressed.
pub async fn run(ctx: &AppContext, subject: Subject) -> Result<(), Box<dyn Error>> {
    let mut vm = QuizVm::new(ctx);

    let token = vm.cancellation();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let outcome = drive(ctx, &mut vm, subject).await;
    watcher.abort();

    match outcome {
        Err(ViewError::Cancelled) => {
            println!();
            Ok(())
        }
        other => Ok(other?),
    }
}

async fn drive(ctx: &AppContext, vm: &mut QuizVm, subject: Subject) -> Result<(), ViewError> {
    vm.load(ctx.session(), subject).await?;
    if let (Some(subject), Some(rank)) = (vm.subject(), vm.rank()) {
        println!("{subject} quizzes for rank {rank} ({})", ctx.rank_filter().as_str());
    }
    list(vm);
    println!("{HELP}");

    let cancel = vm.cancellation();
    let mut prompter = Prompter::stdin();
    loop {
        let line = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ViewError::Cancelled),
            line = prompter.ask("quiz> ") => line.map_err(|err| ViewError::InvalidInput(err.to_string()))?,
        };
        let Some(line) = line else {
            return Ok(());
        };
        if line.is_empty() {
            continue;
        }
        let Some(command) = parse_command(&line) else {
            println!("{HELP}");
            continue;
        };

        let result = match command {
            Command::List => {
                list(vm);
                Ok(())
            }
            Command::Open(id) => vm.open(id).map(|()| show(vm, id)),
            Command::Close(id) => vm.close(id).map(|()| show(vm, id)),
            Command::Pick(id, choice) => vm.select(id, choice).map(|()| show(vm, id)),
            Command::Submit(id) => match vm.submit(ctx.session(), id).await {
                Ok(feedback) => {
                    print_feedback(&feedback);
                    show(vm, id);
                    Ok(())
                }
                Err(err) => Err(err),
            },
            Command::Quit => return Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(err @ (ViewError::Cancelled | ViewError::Unauthenticated)) => return Err(err),
            Err(err) => println!("{err}"),
        }
    }
}

fn list(vm: &QuizVm) {
    let cards = vm.cards();
    if cards.is_empty() {
        println!("No quizzes available.");
    }
    for card in &cards {
        print_card(card);
    }
}

fn show(vm: &QuizVm, id: QuizId) {
    if let Some(card) = vm.card(id) {
        print_card(&card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pick_with_choice() {
        let Some(Command::Pick(id, choice)) = parse_command("pick 7 2") else {
            panic!("expected pick");
        };
        assert_eq!(id, QuizId::new(7));
        assert_eq!(choice, 2);
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(parse_command("open").is_none());
        assert!(parse_command("pick 7").is_none());
        assert!(parse_command("dance").is_none());
    }
}
