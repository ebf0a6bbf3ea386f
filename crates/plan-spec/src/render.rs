use serde_json::{Map, Value, json};

use crate::{
    spec::field::{FieldId, FieldKind},
    state::FormState,
};

/// Title shown above the form and in the exported document.
pub const FORM_TITLE: &str = "תל\"א - תכנית לימודים אישית";
pub const FORM_ID: &str = "learning-plan";

/// Outcome of the most recent export, as reported to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderStatus {
    /// Nothing exported yet.
    #[default]
    Draft,
    /// The last export wrote this file.
    Exported { file_name: String },
    /// The last export failed with this reason.
    ExportFailed { reason: String },
}

impl RenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStatus::Draft => "draft",
            RenderStatus::Exported { .. } => "exported",
            RenderStatus::ExportFailed { .. } => "export_failed",
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            RenderStatus::Draft => None,
            RenderStatus::Exported { file_name } => Some(format!("Exported {}", file_name)),
            RenderStatus::ExportFailed { reason } => Some(format!("Export failed: {}", reason)),
        }
    }
}

/// User actions offered below the fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAction {
    Preview,
    Export,
}

impl RenderAction {
    pub const ALL: [RenderAction; 2] = [RenderAction::Preview, RenderAction::Export];

    pub fn id(&self) -> &'static str {
        match self {
            RenderAction::Preview => "preview",
            RenderAction::Export => "export",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RenderAction::Preview => "תצוגה מקדימה",
            RenderAction::Export => "ייצוא למסמך Word",
        }
    }
}

/// Option entry for render outputs.
#[derive(Debug, Clone)]
pub struct RenderChoice {
    pub code: String,
    pub label: String,
}

/// Describes a single field for render outputs.
#[derive(Debug, Clone)]
pub struct RenderField {
    pub id: FieldId,
    pub label: String,
    pub kind: FieldKind,
    pub current_value: String,
    pub display_value: String,
    pub choices: Option<Vec<RenderChoice>>,
}

impl RenderField {
    pub fn placeholder(&self) -> Option<String> {
        match self.kind {
            FieldKind::SingleChoice => Some(format!("בחר/י {}", self.label)),
            FieldKind::FreeText => None,
        }
    }
}

/// Collected payload used by the text, JSON and card renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub form_id: String,
    pub form_title: String,
    pub status: RenderStatus,
    pub fields: Vec<RenderField>,
    pub actions: Vec<RenderAction>,
}

/// Build the renderer payload from the current state and last export status.
pub fn build_render_payload(state: &FormState, status: &RenderStatus) -> RenderPayload {
    let fields = state
        .fields()
        .into_iter()
        .map(|field| RenderField {
            id: field.id,
            label: field.label.to_string(),
            kind: field.kind,
            current_value: field.current_value.to_string(),
            display_value: field.display_value().to_string(),
            choices: field.options.map(|options| {
                options
                    .iter()
                    .map(|choice| RenderChoice {
                        code: choice.code.to_string(),
                        label: choice.label.to_string(),
                    })
                    .collect()
            }),
        })
        .collect();

    RenderPayload {
        form_id: FORM_ID.to_string(),
        form_title: FORM_TITLE.to_string(),
        status: status.clone(),
        fields,
        actions: RenderAction::ALL.to_vec(),
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let fields = payload
        .fields
        .iter()
        .map(|field| {
            let mut map = Map::new();
            map.insert("id".into(), Value::String(field.id.key().to_string()));
            map.insert("label".into(), Value::String(field.label.clone()));
            map.insert("type".into(), Value::String(field.kind.as_str().to_string()));
            map.insert(
                "current_value".into(),
                Value::String(field.current_value.clone()),
            );
            map.insert(
                "display_value".into(),
                Value::String(field.display_value.clone()),
            );
            if let Some(placeholder) = field.placeholder() {
                map.insert("placeholder".into(), Value::String(placeholder));
            }
            if let Some(choices) = &field.choices {
                map.insert(
                    "choices".into(),
                    Value::Array(
                        choices
                            .iter()
                            .map(|choice| json!({ "code": choice.code, "label": choice.label }))
                            .collect(),
                    ),
                );
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    let actions = payload
        .actions
        .iter()
        .map(|action| json!({ "id": action.id(), "title": action.title() }))
        .collect::<Vec<_>>();

    json!({
        "form_id": payload.form_id,
        "form_title": payload.form_title,
        "direction": "rtl",
        "status": payload.status.as_str(),
        "status_message": payload.status.message(),
        "fields": fields,
        "actions": actions,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {} ({})", payload.form_title, payload.form_id));
    lines.push(format!("Status: {}", payload.status.as_str()));
    if let Some(message) = payload.status.message() {
        lines.push(format!("  {}", message));
    }

    lines.push("Fields:".to_string());
    for (index, field) in payload.fields.iter().enumerate() {
        let mut entry = format!(" {}. {} ({})", index + 1, field.label, field.id);
        if field.current_value.is_empty() {
            entry.push_str(" = <empty>");
        } else if field.display_value != field.current_value {
            entry.push_str(&format!(
                " = {} [{}]",
                field.display_value, field.current_value
            ));
        } else {
            entry.push_str(&format!(" = {}", field.display_value));
        }
        lines.push(entry);
        if let Some(choices) = &field.choices {
            let listed = choices
                .iter()
                .map(|choice| format!("{}={}", choice.code, choice.label))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("    options: {}", listed));
        }
    }

    let actions = payload
        .actions
        .iter()
        .map(|action| format!("{} ({})", action.id(), action.title()))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("Actions: {}", actions));

    lines.join("\n")
}

/// Render the payload as an Adaptive Card v1.3 transport.
pub fn render_card(payload: &RenderPayload) -> Value {
    let mut body = Vec::new();

    body.push(json!({
        "type": "TextBlock",
        "text": payload.form_title,
        "weight": "Bolder",
        "size": "Large",
        "horizontalAlignment": "Right",
        "wrap": true,
    }));

    if let Some(message) = payload.status.message() {
        body.push(json!({
            "type": "TextBlock",
            "text": message,
            "color": if matches!(payload.status, RenderStatus::ExportFailed { .. }) {
                "Attention"
            } else {
                "Good"
            },
            "horizontalAlignment": "Right",
            "wrap": true,
        }));
    }

    for field in &payload.fields {
        body.push(json!({
            "type": "TextBlock",
            "text": field.label,
            "weight": "Bolder",
            "horizontalAlignment": "Right",
            "wrap": true,
        }));
        body.push(field_input(field));
    }

    let actions = payload
        .actions
        .iter()
        .map(|action| {
            json!({
                "type": "Action.Submit",
                "title": action.title(),
                "data": {
                    "plan": {
                        "formId": payload.form_id,
                        "action": action.id(),
                    }
                }
            })
        })
        .collect::<Vec<_>>();

    json!({
        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
        "type": "AdaptiveCard",
        "version": "1.3",
        "rtl": true,
        "body": body,
        "actions": actions,
    })
}

fn field_input(field: &RenderField) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), Value::String(field.id.key().to_string()));
    match field.kind {
        FieldKind::FreeText => {
            map.insert("type".into(), Value::String("Input.Text".into()));
        }
        FieldKind::SingleChoice => {
            map.insert("type".into(), Value::String("Input.ChoiceSet".into()));
            map.insert("style".into(), Value::String("compact".into()));
            let choices = field
                .choices
                .clone()
                .unwrap_or_default()
                .into_iter()
                .map(|choice| {
                    json!({
                        "title": choice.label,
                        "value": choice.code,
                    })
                })
                .collect::<Vec<_>>();
            map.insert("choices".into(), Value::Array(choices));
            if let Some(placeholder) = field.placeholder() {
                map.insert("placeholder".into(), Value::String(placeholder));
            }
        }
    }
    if !field.current_value.is_empty() {
        map.insert("value".into(), Value::String(field.current_value.clone()));
    }
    Value::Object(map)
}
