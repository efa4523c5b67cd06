//! Interactive prompting
//!
//! The rest of the crate talks to the user only through [`Prompter`]. Runs
//! with `--yes`, `--json` or without a terminal never construct one.

use inquire::{Confirm, MultiSelect, Select, Text};

use crate::error::Result;

const LIST_HELP: &str = "  ↑↓ navigate  space select  enter confirm  type to filter  esc skip";

pub trait Prompter {
    /// Pick any number of items. Returns indices into `items`; skipping yields none.
    fn multi_select(&self, message: &str, items: &[String], defaults: &[usize])
    -> Result<Vec<usize>>;

    /// Pick exactly one item. Skipping keeps `default`.
    fn select(&self, message: &str, items: &[String], default: usize) -> Result<usize>;

    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Free text; skipping yields an empty string
    fn input(&self, message: &str) -> Result<String>;
}

/// Terminal prompts via `inquire`
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn multi_select(
        &self,
        message: &str,
        items: &[String],
        defaults: &[usize],
    ) -> Result<Vec<usize>> {
        let picked = MultiSelect::new(message, items.to_vec())
            .with_default(defaults)
            .with_page_size(12)
            .with_help_message(LIST_HELP)
            .raw_prompt_skippable()?;
        Ok(picked
            .map(|options| options.into_iter().map(|o| o.index).collect())
            .unwrap_or_default())
    }

    fn select(&self, message: &str, items: &[String], default: usize) -> Result<usize> {
        let picked = Select::new(message, items.to_vec())
            .with_starting_cursor(default)
            .with_page_size(12)
            .raw_prompt_skippable()?;
        Ok(picked.map_or(default, |o| o.index))
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let answer = Confirm::new(message)
            .with_default(default)
            .prompt_skippable()?;
        Ok(answer.unwrap_or(default))
    }

    fn input(&self, message: &str) -> Result<String> {
        Ok(Text::new(message).prompt_skippable()?.unwrap_or_default())
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    //! Pre-recorded answers for tests

    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::Prompter;
    use crate::error::{AgntxError, Result};

    #[derive(Debug, Clone)]
    pub enum Answer {
        Many(Vec<usize>),
        One(usize),
        YesNo(bool),
        Text(String),
    }

    /// Replays answers in order and records every prompt message
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: RefCell<VecDeque<Answer>>,
        pub asked: RefCell<Vec<String>>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: RefCell::new(answers.into()),
                asked: RefCell::new(Vec::new()),
            }
        }

        fn next(&self, message: &str) -> Result<Answer> {
            self.asked.borrow_mut().push(message.to_string());
            self.answers
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| AgntxError::PromptFailed {
                    message: format!("unexpected prompt: {message}"),
                })
        }

        fn mismatch(message: &str, answer: &Answer) -> AgntxError {
            AgntxError::PromptFailed {
                message: format!("scripted answer {answer:?} does not fit prompt: {message}"),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn multi_select(&self, message: &str, _: &[String], _: &[usize]) -> Result<Vec<usize>> {
            match self.next(message)? {
                Answer::Many(v) => Ok(v),
                other => Err(Self::mismatch(message, &other)),
            }
        }

        fn select(&self, message: &str, _: &[String], _: usize) -> Result<usize> {
            match self.next(message)? {
                Answer::One(i) => Ok(i),
                other => Err(Self::mismatch(message, &other)),
            }
        }

        fn confirm(&self, message: &str, _: bool) -> Result<bool> {
            match self.next(message)? {
                Answer::YesNo(b) => Ok(b),
                other => Err(Self::mismatch(message, &other)),
            }
        }

        fn input(&self, message: &str) -> Result<String> {
            match self.next(message)? {
                Answer::Text(t) => Ok(t),
                other => Err(Self::mismatch(message, &other)),
            }
        }
    }
}
