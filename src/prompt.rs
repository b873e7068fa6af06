//! Asking the user for input files, free text and the output path.

use std::io::{BufRead, Write};
use std::path::PathBuf;

/// The free-text questions of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Question {
    Completed,
    Tolerance,
}

impl Question {
    pub fn message(&self) -> &'static str {
        match self {
            Question::Completed => "Enter the number of kilometers completed:",
            Question::Tolerance => "Enter simplify tolerance (e.g., 0.001):",
        }
    }
}

/// Source of user answers. `None` means the user gave nothing or cancelled.
pub trait Prompter {
    fn pick_input_files(&mut self) -> Option<Vec<PathBuf>>;
    fn prompt_text(&mut self, question: Question) -> Option<String>;
    fn pick_output_path(&mut self) -> Option<PathBuf>;
}

impl<P: Prompter + ?Sized> Prompter for Box<P> {
    fn pick_input_files(&mut self) -> Option<Vec<PathBuf>> {
        (**self).pick_input_files()
    }
    fn prompt_text(&mut self, question: Question) -> Option<String> {
        (**self).prompt_text(question)
    }
    fn pick_output_path(&mut self) -> Option<PathBuf> {
        (**self).pick_output_path()
    }
}

/// Gives the output an `.html` extension when it has none.
pub fn with_html_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("html")
    }
}

/// Line-based prompts on a reader and a writer, usually stdin and stdout.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, message: &str) -> Option<String> {
        write!(self.output, "{} ", message).ok()?;
        self.output.flush().ok()?;
        let mut line = String::new();
        if self.input.read_line(&mut line).ok()? == 0 {
            return None;
        }
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }
}

impl Console<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for Console<R, W> {
    fn pick_input_files(&mut self) -> Option<Vec<PathBuf>> {
        let line = self.ask("KML files (separated by spaces):")?;
        Some(line.split_whitespace().map(PathBuf::from).collect())
    }
    fn prompt_text(&mut self, question: Question) -> Option<String> {
        self.ask(question.message())
    }
    fn pick_output_path(&mut self) -> Option<PathBuf> {
        self.ask("Output HTML file:")
            .map(PathBuf::from)
            .map(with_html_extension)
    }
}

/// Answers given up front (on the command line); the rest is asked from `fallback`.
pub struct Preset<P> {
    pub files: Vec<PathBuf>,
    pub completed: Option<String>,
    pub tolerance: Option<String>,
    pub output: Option<PathBuf>,
    pub fallback: P,
}

impl<P: Prompter> Prompter for Preset<P> {
    fn pick_input_files(&mut self) -> Option<Vec<PathBuf>> {
        if self.files.is_empty() {
            return self.fallback.pick_input_files();
        }
        Some(std::mem::take(&mut self.files))
    }
    fn prompt_text(&mut self, question: Question) -> Option<String> {
        let preset = match question {
            Question::Completed => self.completed.take(),
            Question::Tolerance => self.tolerance.take(),
        };
        preset.or_else(|| self.fallback.prompt_text(question))
    }
    fn pick_output_path(&mut self) -> Option<PathBuf> {
        match self.output.take() {
            Some(path) => Some(with_html_extension(path)),
            None => self.fallback.pick_output_path(),
        }
    }
}

/// Native file dialogs for the paths; free text still comes from `text`.
#[cfg(feature = "dialogs")]
pub struct Dialogs<P> {
    pub text: P,
}

#[cfg(feature = "dialogs")]
impl<P: Prompter> Prompter for Dialogs<P> {
    fn pick_input_files(&mut self) -> Option<Vec<PathBuf>> {
        rfd::FileDialog::new()
            .set_title("Select KML files")
            .add_filter("KML files", &["kml"])
            .pick_files()
    }
    fn prompt_text(&mut self, question: Question) -> Option<String> {
        self.text.prompt_text(question)
    }
    fn pick_output_path(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save map as")
            .add_filter("HTML files", &["html"])
            .save_file()
            .map(with_html_extension)
    }
}
