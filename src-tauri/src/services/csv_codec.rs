use std::sync::OnceLock;

use csv::{ReaderBuilder, StringRecord};
use regex::Regex;

use crate::services::feedback::FeedbackOption;
use crate::services::prompt::build_prompt;
use crate::services::student::Student;

pub const CUSTOM_PROMPT_MARKER: &str = "# Custom Prompt:";

static CUSTOM_PROMPT_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_custom_prompt_regex() -> &'static Regex {
    CUSTOM_PROMPT_REGEX.get_or_init(|| Regex::new(r"^#\s*Custom Prompt:(.*)$").expect("Invalid regex pattern"))
}

/// A decoded option row. Only rows with a non-blank label survive decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRow {
    pub label: String,
    pub description: String,
}

impl FeedbackRow {
    /// Unquoted commas split a description into several fields, so everything after the label is
    /// joined back together.
    pub fn from_record(record: &StringRecord) -> Option<Self> {
        let label = record.get(0)?.trim();
        if label.is_empty() {
            return None;
        }

        let description = record.iter().skip(1).collect::<Vec<_>>().join(",");

        Some(Self {
            label: label.to_string(),
            description: description.trim().to_string(),
        })
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FeedbackCsv {
    pub custom_prompt: Option<String>,
    pub rows: Vec<FeedbackRow>,
}

pub fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        quote_csv_field(field)
    } else {
        field.to_string()
    }
}

pub fn quote_csv_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Folds every run of line breaks into one space.
pub fn single_line(text: &str) -> String {
    if !text.contains(['\r', '\n']) {
        return text.to_string();
    }

    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A prompt that is itself wrapped in quotes gets an extra pair, since reading strips one.
fn encode_custom_prompt(custom_prompt: &str) -> String {
    let prompt = single_line(custom_prompt);
    let prompt = prompt.trim();

    if is_quote_wrapped(prompt) {
        format!("\"{}\"", prompt)
    } else {
        prompt.to_string()
    }
}

fn is_quote_wrapped(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

pub fn encode_feedback_csv(options: &[FeedbackOption], custom_prompt: &str) -> String {
    let mut csv_content = format!("{} {}\n", CUSTOM_PROMPT_MARKER, encode_custom_prompt(custom_prompt));

    for option in options {
        csv_content.push_str(&escape_csv_field(&option.label));
        csv_content.push(',');
        csv_content.push_str(&escape_csv_field(&option.description));
        csv_content.push('\n');
    }

    csv_content
}

pub fn decode_feedback_csv(text: &str) -> FeedbackCsv {
    let text = text.trim_start_matches('\u{feff}').trim();
    let (first_line, remainder) = text.split_once('\n').unwrap_or((text, ""));

    let (custom_prompt, body) = match parse_custom_prompt_line(first_line) {
        Some(prompt) => (Some(prompt), remainder),
        None => (None, text),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let rows = reader
        .records()
        .filter_map(Result::ok)
        .filter_map(|record| FeedbackRow::from_record(&record))
        .collect();

    FeedbackCsv { custom_prompt, rows }
}

fn parse_custom_prompt_line(line: &str) -> Option<String> {
    let captures = get_custom_prompt_regex().captures(line.trim_end_matches('\r'))?;
    let prompt = captures.get(1).map_or("", |m| m.as_str()).trim();

    let unquoted = if is_quote_wrapped(prompt) {
        &prompt[1..prompt.len() - 1]
    } else {
        prompt
    };

    Some(unquoted.to_string())
}

pub fn decode_student_names(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// One row per student: name, grade, a Yes/No cell per option and the generated prompt.
pub fn encode_student_table(students: &[Student], options: &[FeedbackOption], custom_prompt: &str) -> String {
    let mut header = vec!["Name".to_string(), "Grade".to_string()];
    header.extend(options.iter().map(|option| escape_csv_field(&option.label)));
    header.push("Generated Prompt".to_string());

    let mut lines = vec![header.join(",")];

    for student in students {
        let mut cells = vec![escape_csv_field(&student.name), escape_csv_field(&student.grade)];
        cells.extend(options.iter().map(|option| {
            if student.is_selected(option.id) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }));
        cells.push(quote_csv_field(&build_prompt(custom_prompt, student, options)));

        lines.push(cells.join(","));
    }

    lines.join("\n")
}
