//! Inline annotations embedded in a todo description.
//!
//! A description may carry a `+project` tag and an `@x` priority tag
//! anywhere in its text. Both are removed from the description by their
//! matched byte range, so a repeated occurrence of the same text elsewhere
//! is left untouched.

use thiserror::Error;

use crate::models::item::Priority;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Project tag '+' must be followed by a project name")]
    EmptyProjectTag,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Annotations {
    pub description: String,
    pub project: Option<String>,
    pub priority: Option<Priority>,
}

/// Pulls the `+project` tag first and then the `@x` priority tag out of `raw`
pub fn extract(raw: &str) -> Result<Annotations, AnnotationError> {
    let (without_project, project) = extract_project(raw)?;
    let (description, priority) = extract_priority(&without_project);

    Ok(Annotations {
        description,
        project,
        priority,
    })
}

/// Project used when none was given: the first word of the description
pub fn default_project(description: &str) -> Option<&str> {
    description.split_whitespace().next()
}

fn extract_project(text: &str) -> Result<(String, Option<String>), AnnotationError> {
    let Some(plus) = text.find('+') else {
        return Ok((text.to_string(), None));
    };

    let name_start = plus + 1;
    let name_end = text[name_start..]
        .find(' ')
        .map_or(text.len(), |offset| name_start + offset);
    let name = &text[name_start..name_end];

    if name.is_empty() {
        return Err(AnnotationError::EmptyProjectTag);
    }

    Ok((remove_span(text, plus, name_end), Some(name.to_string())))
}

fn extract_priority(text: &str) -> (String, Option<Priority>) {
    let Some(at) = text.find('@') else {
        return (text.to_string(), None);
    };

    let mut following = text[at + 1..].chars();
    let Some(letter) = following.next() else {
        return (text.to_string(), None);
    };

    // the letter must end the tag: next char is a space or the string ends
    let terminated = matches!(following.next(), None | Some(' '));
    if !terminated || !letter.is_ascii_alphabetic() {
        return (text.to_string(), None);
    }

    match Priority::try_from(letter) {
        Ok(priority) => {
            let tag_end = at + 1 + letter.len_utf8();
            (remove_span(text, at, tag_end), Some(priority))
        }
        Err(_) => (text.to_string(), None),
    }
}

fn remove_span(text: &str, start: usize, end: usize) -> String {
    let mut cleaned = String::with_capacity(text.len() - (end - start));
    cleaned.push_str(&text[..start]);
    cleaned.push_str(&text[end..]);
    cleaned.trim().to_string()
}
