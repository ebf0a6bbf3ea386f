use plan_spec::{Choice, FieldKind, FormField, RenderPayload, RenderStatus};

/// Typed at a field prompt to abandon the wizard; any other text is an answer.
pub const ABORT_INPUT: &str = ":q";

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: field prompts, option labels and export results.
    Clean,
    /// Verbose output: input help and option codes next to labels.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints the form, its prompts and the outcome of preview/export actions.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            header_printed: false,
        }
    }

    pub fn show_header(&mut self, payload: &RenderPayload) {
        if self.header_printed {
            return;
        }
        println!("Form: {}", payload.form_title);
        if self.verbosity.is_verbose() {
            println!(
                "Help: blank keeps the current value, '-' clears it, '{}' aborts.",
                ABORT_INPUT
            );
        }
        self.header_printed = true;
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = format!("{}/{} {}", prompt.index, prompt.total, prompt.title);
        if !prompt.current.is_empty() {
            line.push_str(&format!(" [{}]", prompt.current));
        }
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{}", line);
        if !prompt.choices.is_empty() {
            for (position, choice) in prompt.choices.iter().enumerate() {
                if self.verbosity.is_verbose() {
                    println!("  {}. {} ({})", position + 1, choice.label, choice.code);
                } else {
                    println!("  {}. {}", position + 1, choice.label);
                }
            }
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_actions(&self, payload: &RenderPayload) {
        let mut actions = payload
            .actions
            .iter()
            .map(|action| action.id())
            .collect::<Vec<_>>();
        actions.extend(["edit", "exit"]);
        println!("Choose an action: {}", actions.join(", "));
    }

    pub fn show_export_status(&self, status: &RenderStatus) {
        match status {
            RenderStatus::Draft => {}
            RenderStatus::Exported { .. } => {
                if let Some(message) = status.message() {
                    println!("{}", message);
                }
            }
            RenderStatus::ExportFailed { .. } => {
                if let Some(message) = status.message() {
                    eprintln!("{}", message);
                }
            }
        }
    }
}

/// Context used to format a single field prompt.
pub struct PromptContext {
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub current: String,
    pub hint: Option<String>,
    pub choices: Vec<Choice>,
}

impl PromptContext {
    pub fn new(field: &FormField<'_>, index: usize, total: usize) -> Self {
        let choices = field.options.map(<[Choice]>::to_vec).unwrap_or_default();
        let hint = match field.kind {
            FieldKind::SingleChoice => Some(format!("(1-{}, code or label)", choices.len())),
            FieldKind::FreeText => None,
        };
        Self {
            index: index.max(1),
            total,
            title: field.label.to_string(),
            current: field.display_value().to_string(),
            hint,
            choices,
        }
    }
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// What a line of input means for the field being prompted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Keep,
    Set(String),
}

/// Interprets a raw line typed at a field prompt.
///
/// Blank keeps the current value and `-` clears it. Single-choice fields take
/// an option code, its 1-based position or its exact label; the stored value is
/// always the code.
pub fn parse_field_input(field: &FormField<'_>, raw: &str) -> Result<FieldInput, AnswerParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(FieldInput::Keep);
    }
    if trimmed == "-" {
        return Ok(FieldInput::Set(String::new()));
    }
    match field.options {
        None => Ok(FieldInput::Set(trimmed.to_string())),
        Some(options) => parse_choice(options, trimmed).map(FieldInput::Set),
    }
}

fn parse_choice(options: &[Choice], raw: &str) -> Result<String, AnswerParseError> {
    if let Some(choice) = options
        .iter()
        .find(|choice| choice.code.eq_ignore_ascii_case(raw) || choice.label == raw)
    {
        return Ok(choice.code.to_string());
    }
    if let Ok(position) = raw.parse::<usize>()
        && let Some(choice) = position.checked_sub(1).and_then(|index| options.get(index))
    {
        return Ok(choice.code.to_string());
    }
    let codes = options
        .iter()
        .map(|choice| choice.code)
        .collect::<Vec<_>>()
        .join(", ");
    Err(AnswerParseError::new(
        format!("Choose a number between 1 and {}.", options.len()),
        Some(format!("allowed codes: {}", codes)),
    ))
}

#[cfg(test)]
mod tests {
    use plan_spec::{FieldId, FormState};

    use super::*;

    fn field(state: &FormState, id: FieldId) -> FormField<'_> {
        state
            .fields()
            .into_iter()
            .find(|field| field.id == id)
            .expect("field exists")
    }

    #[test]
    fn blank_input_keeps_the_current_value() {
        let state = FormState::new().with_field(FieldId::StudentName, "דנה");
        let student = field(&state, FieldId::StudentName);
        assert_eq!(parse_field_input(&student, "  ").unwrap(), FieldInput::Keep);
    }

    #[test]
    fn words_like_exit_are_ordinary_answers() {
        let state = FormState::new();
        let student = field(&state, FieldId::StudentName);
        assert_eq!(
            parse_field_input(&student, "exit").unwrap(),
            FieldInput::Set("exit".into())
        );
    }

    #[test]
    fn dash_clears_a_value() {
        let state = FormState::new().with_field(FieldId::Subject, "math");
        let subject = field(&state, FieldId::Subject);
        assert_eq!(
            parse_field_input(&subject, "-").unwrap(),
            FieldInput::Set(String::new())
        );
    }

    #[test]
    fn free_text_is_taken_verbatim() {
        let state = FormState::new();
        let teacher = field(&state, FieldId::TeacherName);
        assert_eq!(
            parse_field_input(&teacher, " רונית ").unwrap(),
            FieldInput::Set("רונית".into())
        );
    }

    #[test]
    fn choices_accept_code_position_or_label() {
        let state = FormState::new();
        let exam = field(&state, FieldId::ExamDate);
        let expected = FieldInput::Set("summer2024".into());
        assert_eq!(parse_field_input(&exam, "summer2024").unwrap(), expected);
        assert_eq!(parse_field_input(&exam, "2").unwrap(), expected);
        assert_eq!(parse_field_input(&exam, "בגרות קיץ 2024").unwrap(), expected);
    }

    #[test]
    fn out_of_range_choices_are_rejected() {
        let state = FormState::new();
        let period = field(&state, FieldId::TimePeriod);
        for raw in ["0", "6", "sep2025"] {
            let err = parse_field_input(&period, raw).expect_err(raw);
            assert_eq!(err.user_message, "Choose a number between 1 and 5.");
        }
    }

    #[test]
    fn prompt_context_lists_choices_for_single_choice_fields() {
        let state = FormState::new().with_field(FieldId::Subject, "art");
        let fields = state.fields();
        let prompt = PromptContext::new(&fields[2], 3, fields.len());
        assert_eq!(prompt.title, "מקצוע");
        assert_eq!(prompt.current, "אומנות");
        assert_eq!(prompt.choices.len(), 6);
        assert_eq!(prompt.hint.as_deref(), Some("(1-6, code or label)"));

        let free = PromptContext::new(&fields[0], 1, fields.len());
        assert!(free.hint.is_none());
        assert!(free.choices.is_empty());
    }
}
