//! Statement emitters.
//!
//! Each emitter returns the lines of one statement block, or nothing when its
//! input is absent. Lines may contain embedded newlines; the final line of a
//! block carries the terminating period.

use sss_model::{Datafile, MultipleKind, RecordFormat};

use crate::compile::CompiledVariable;
use crate::error::{Result, SyntaxError};
use crate::options::{DichotomyLabels, SyntaxOptions};
use crate::quote::{quote_prefixed_lines, smart_quote, terminate};
use crate::wrap::{WRAP_WIDTH, wrap_text};

/// `ADD DOCUMENT` block listing the non-empty datafile attributes.
pub fn document(datafile: &Datafile) -> Vec<String> {
    let attributes = datafile.ordered_attributes();
    if attributes.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["ADD DOCUMENT ".to_string()];
    for (key, value) in attributes {
        lines.extend(quote_prefixed_lines(&format!("{key}: "), value));
    }
    terminate(&mut lines);
    lines
}

/// Split a delimited set string into its numeric components.
pub fn csv_fixups(compiled: &CompiledVariable<'_>, record_format: RecordFormat) -> Vec<String> {
    if record_format == RecordFormat::Fixed || compiled.multiple.is_none() {
        return Vec::new();
    }
    let name = &compiled.name;
    let width = compiled.subfield_width;
    let mut position = 1;
    compiled
        .members
        .iter()
        .map(|member| {
            let line = format!(
                "IF (CHAR.LENGTH(CHAR.SUBSTR({name}, {position}, {width})) > 0) \
                 {member} = NUMBER(CHAR.SUBSTR({name}, {position}, {width}), F{width}.0)."
            );
            position += width;
            line
        })
        .collect()
}

/// Variable labels, plus the dichotomy value labels for MD sets.
pub fn variable_labels(compiled: &CompiledVariable<'_>, options: &SyntaxOptions) -> Vec<String> {
    let variable = compiled.variable;
    let full_label = options.full_label_attribute;
    let mut lines = Vec::new();

    match compiled.multiple {
        None => {
            if let Some(label) = &variable.label {
                lines.push(label_statement(&compiled.name, label));
                lines.extend(full_label_attribute(&compiled.name, label, full_label));
            }
        }
        Some(MultipleKind::Category) => {
            if let Some(label) = variable.label.as_deref().filter(|label| !label.is_empty()) {
                for member in &compiled.members {
                    lines.push(label_statement(member, label));
                    lines.extend(full_label_attribute(member, label, full_label));
                }
            }
        }
        Some(MultipleKind::Dichotomy) => {
            for (index, member) in compiled.members.iter().enumerate() {
                if let Some(label) = variable.values.get(&(index + 1).to_string()) {
                    lines.push(label_statement(member, label));
                    lines.extend(full_label_attribute(member, label, full_label));
                }
            }
            lines.push(dichotomy_value_labels(
                &compiled.members,
                &options.dichotomy_labels,
            ));
        }
    }
    lines
}

fn label_statement(name: &str, label: &str) -> String {
    format!("VARIABLE LABELS {name} {}.", smart_quote(label))
}

fn dichotomy_value_labels(members: &[String], labels: &DichotomyLabels) -> String {
    let wrapped = wrap_text(&members.join(" "), WRAP_WIDTH).join("\n");
    format!(
        "VALUE LABELS {wrapped}\n0 {} 1 {}.",
        smart_quote(labels.unchecked()),
        smart_quote(labels.checked())
    )
}

/// `FullLabelText` custom attribute holding the untruncated label.
pub fn full_label_attribute(name: &str, label: &str, enabled: bool) -> Vec<String> {
    if !enabled {
        return Vec::new();
    }
    let wrapped = wrap_text(label, WRAP_WIDTH);
    if wrapped.is_empty() {
        return Vec::new();
    }
    let last = wrapped.len() - 1;
    let mut lines = vec![format!(
        "VARIABLE ATTRIBUTE VARIABLES = {name} ATTRIBUTE = FullLabelText("
    )];
    for (index, piece) in wrapped.iter().enumerate() {
        let quoted = smart_quote(&format!("{piece} "));
        if index < last {
            lines.push(format!("{quoted}+"));
        } else {
            lines.push(format!("{quoted})."));
        }
    }
    lines
}

/// Value labels keyed by code, or by score when score recoding is on.
pub fn value_labels(compiled: &CompiledVariable<'_>, score_recode: bool) -> Result<Vec<String>> {
    let variable = compiled.variable;
    if compiled.is_dichotomy() || variable.values.is_empty() {
        return Ok(Vec::new());
    }
    let score_recode = score_recode && variable.has_scores();
    let literal = compiled.is_literal();

    let mut lines = vec![format!("VALUE LABELS {}", compiled.vardef)];
    for (code, label) in &variable.values {
        let key = if score_recode {
            let score = variable
                .scores
                .get(code)
                .and_then(Option::as_deref)
                .ok_or_else(|| SyntaxError::MissingScore {
                    variable: compiled.vardef.clone(),
                    code: code.clone(),
                })?;
            check_score(compiled, code, score)?;
            score
        } else {
            code.as_str()
        };
        let key = if literal {
            smart_quote(key)
        } else {
            key.to_string()
        };
        lines.push(format!("{key} {}", smart_quote(label)));
    }
    terminate(&mut lines);
    Ok(lines)
}

/// `score` custom attribute array of `value | score` pairs.
pub fn score_attribute(compiled: &CompiledVariable<'_>) -> Vec<String> {
    let variable = compiled.variable;
    if compiled.is_dichotomy() || !variable.has_scores() {
        return Vec::new();
    }
    let mut lines = vec![format!(
        "VARIABLE ATTRIBUTE VARIABLES = {} ATTRIBUTE=",
        compiled.targets().join("\n")
    )];
    let scored = variable
        .scores
        .iter()
        .filter_map(|(code, score)| score.as_deref().map(|score| (code, score)));
    for (index, (code, score)) in scored.enumerate() {
        let entry = format!("{} | {score}", code.replace('|', "\\|"));
        lines.push(format!("score[{}]({})", index + 1, smart_quote(&entry)));
    }
    terminate(&mut lines);
    lines
}

/// Assign the sentinel to filtered-out cases and declare it missing.
pub fn missing_values(compiled: &CompiledVariable<'_>) -> Vec<String> {
    let Some(filter) = &compiled.variable.filter else {
        return Vec::new();
    };
    let name = &compiled.name;
    let code = &compiled.missing_code;
    vec![format!(
        "IF (NOT {filter}) {name} = {code}.\nMISSING VALUES {name} ({code})."
    )]
}

/// `Text` custom attribute array with one entry per `text` element.
pub fn text_attribute(compiled: &CompiledVariable<'_>) -> Vec<String> {
    let text = &compiled.variable.text;
    if text.is_empty() {
        return Vec::new();
    }
    let entries: Vec<String> = text
        .iter()
        .enumerate()
        .map(|(index, entry)| format!("Text[{}]({})", index + 1, smart_quote(entry)))
        .collect();
    vec![format!(
        "VARIABLE ATTRIBUTE VARIABLES={} ATTRIBUTE={}.",
        compiled.name,
        entries.join("\n")
    )]
}

/// Multiple-response set definition.
pub fn multiple_response_set(compiled: &CompiledVariable<'_>) -> Vec<String> {
    let name = &compiled.name;
    let label = smart_quote(compiled.variable.label.as_deref().unwrap_or_default());
    match compiled.multiple {
        None => Vec::new(),
        Some(MultipleKind::Category) => vec![format!(
            "MRSETS /MCGROUP NAME=${name} LABEL={label} \nVARIABLES={}.",
            compiled.vardef
        )],
        Some(MultipleKind::Dichotomy) => vec![format!(
            "MRSETS /MDGROUP name=${name} LABEL={label} \nVARIABLES={} \nVALUE=1.",
            compiled.dichotomy_members.join(" ")
        )],
    }
}

pub fn weight(compiled: &CompiledVariable<'_>) -> Vec<String> {
    if compiled.variable.usage.is_weight() {
        vec![format!("WEIGHT BY {}.", compiled.name)]
    } else {
        Vec::new()
    }
}

/// Recode raw codes into their scores.
pub fn recode(compiled: &CompiledVariable<'_>) -> Result<Vec<String>> {
    let variable = compiled.variable;
    if compiled.is_dichotomy() || !variable.has_scores() {
        return Ok(Vec::new());
    }
    let literal = compiled.is_literal();
    let mut lines = vec![format!("RECODE  {}", compiled.vardef)];
    for (code, score) in &variable.scores {
        let Some(score) = score else {
            continue;
        };
        check_score(compiled, code, score)?;
        if literal {
            lines.push(format!("({}={})", smart_quote(code), smart_quote(score)));
        } else {
            lines.push(format!("({code}={score})"));
        }
    }
    terminate(&mut lines);
    Ok(lines)
}

fn check_score(compiled: &CompiledVariable<'_>, code: &str, score: &str) -> Result<()> {
    if compiled.is_literal() || score.trim().parse::<f64>().is_ok() {
        return Ok(());
    }
    Err(SyntaxError::ScoreType {
        variable: compiled.vardef.clone(),
        code: code.to_string(),
        score: score.to_string(),
    })
}
