use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented terminal input.
pub struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prints `label` and waits for one line. `None` means input is closed.
    pub async fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Repeats the question until the answer parses as a number in `range`.
    pub async fn ask_number(
        &mut self,
        label: &str,
        range: std::ops::RangeInclusive<i32>,
    ) -> io::Result<Option<i32>> {
        loop {
            let Some(raw) = self.ask(label).await? else {
                return Ok(None);
            };
            match raw.parse::<i32>() {
                Ok(value) if range.contains(&value) => return Ok(Some(value)),
                _ => println!(
                    "  enter a number from {} to {}",
                    range.start(),
                    range.end()
                ),
            }
        }
    }
}
