//! User interaction seam of the policy enforcer.

use nu_ansi_term::Color;
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::errors::PolicyError;

const LINE_INITIAL: &str = "\u{250C}";
const LINE_MIDDLE: &str = "\u{2502}";
const LINE_FINAL: &str = "\u{2514}";

/// Default confirmation question
pub const CONTINUE_PROMPT: &str = "Would you like to continue?";

/// Everything the enforcer needs from a terminal.
pub trait Ui {
    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Declined` when the answer is no and
    /// `PolicyError::Ui` when no answer can be obtained.
    fn ask(&self, prompt: &str) -> Result<(), PolicyError>;

    fn print_blocks(&self, blocks: &[MessageBlock]);

    fn println(&self, line: &str);

    /// Skip every confirmation
    fn auto_approve(&self) -> bool {
        false
    }
}

/// Ask through `ui` unless it auto-approves.
///
/// # Errors
///
/// Propagates the error returned by [`Ui::ask`].
pub fn confirm(ui: &dyn Ui, prompt: &str) -> Result<(), PolicyError> {
    if ui.auto_approve() {
        return Ok(());
    }
    ui.ask(prompt)
}

/// Interpret a typed answer; `None` means ask again.
pub fn parse_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLevel {
    Error,
    Warn,
}

impl BlockLevel {
    fn color(self) -> Color {
        match self {
            BlockLevel::Error => Color::LightRed,
            BlockLevel::Warn => Color::LightYellow,
        }
    }
}

/// A framed message listing the paths an event is about.
///
/// ```
/// use kubitect_core::policy::MessageBlock;
///
/// let block = MessageBlock::config_change_error("Not allowed.", &["cluster.network.cidr"]);
/// assert_eq!(
///     block.render(false),
///     "┌\n│ Error type: Config Change\n│ Config paths:\n│   cluster.network.cidr\n│ Error:\n│   Not allowed.\n└"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock {
    pub level: BlockLevel,
    pub lines: Vec<String>,
}

impl MessageBlock {
    pub fn new(level: BlockLevel) -> Self {
        Self {
            level,
            lines: Vec::new(),
        }
    }

    /// `title` followed by `text` on the same line
    pub fn line(mut self, title: &str, text: &str) -> Self {
        self.lines.push(format!("{} {}", title, text));
        self
    }

    /// `title` followed by indented `items`; omitted when `items` is empty
    pub fn section<I, S>(mut self, title: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: Vec<String> = items
            .into_iter()
            .map(|i| format!("  {}", i.as_ref()))
            .collect();
        if !items.is_empty() {
            self.lines.push(title.to_string());
            self.lines.extend(items);
        }
        self
    }

    pub fn config_change_error<S: AsRef<str>>(message: &str, paths: &[S]) -> Self {
        Self::new(BlockLevel::Error)
            .line("Error type:", "Config Change")
            .section("Config paths:", paths)
            .section("Error:", message.lines())
    }

    pub fn config_change_warning<S: AsRef<str>>(message: &str, paths: &[S]) -> Self {
        Self::new(BlockLevel::Warn)
            .line("Warning type:", "Config Change")
            .section("Config path:", paths)
            .section("Warning:", message.lines())
    }

    /// Frame the lines with box-drawing gutters
    pub fn render(&self, color: bool) -> String {
        let gutter = |s: &str| {
            if color {
                self.level.color().paint(s).to_string()
            } else {
                s.to_string()
            }
        };

        let mut out = Vec::with_capacity(self.lines.len() + 2);
        out.push(gutter(LINE_INITIAL));
        for line in &self.lines {
            out.push(format!("{} {}", gutter(LINE_MIDDLE), line));
        }
        out.push(gutter(LINE_FINAL));
        out.join("\n")
    }
}

impl std::fmt::Display for MessageBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Ui driven by a fixed list of answers, recording everything it shows.
#[derive(Debug, Default)]
pub struct ScriptedUi {
    answers: RefCell<VecDeque<String>>,
    prompts: RefCell<Vec<String>>,
    output: RefCell<Vec<String>>,
    blocks: RefCell<Vec<MessageBlock>>,
    auto_approve: bool,
}

impl ScriptedUi {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn auto_approving() -> Self {
        Self {
            auto_approve: true,
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn output(&self) -> Vec<String> {
        self.output.borrow().clone()
    }

    pub fn blocks(&self) -> Vec<MessageBlock> {
        self.blocks.borrow().clone()
    }
}

impl Ui for ScriptedUi {
    fn ask(&self, prompt: &str) -> Result<(), PolicyError> {
        loop {
            self.prompts.borrow_mut().push(prompt.to_string());
            let answer = self
                .answers
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| PolicyError::Ui {
                    reason: "no answer left".to_string(),
                })?;
            match parse_answer(&answer) {
                Some(true) => return Ok(()),
                Some(false) => return Err(PolicyError::Declined),
                None => continue,
            }
        }
    }

    fn print_blocks(&self, blocks: &[MessageBlock]) {
        self.blocks.borrow_mut().extend_from_slice(blocks);
    }

    fn println(&self, line: &str) {
        self.output.borrow_mut().push(line.to_string());
    }

    fn auto_approve(&self) -> bool {
        self.auto_approve
    }
}
