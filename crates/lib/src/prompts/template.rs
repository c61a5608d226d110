//! # Prompt Templates
//!
//! A minimal template engine using Python format-string syntax: `{name}` marks a
//! variable and `{{` / `}}` are literal braces. Templates are parsed once into
//! segments, so bound values are inserted verbatim and never re-scanned for
//! placeholders.

use crate::errors::TemplateError;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed template, possibly with some variables already bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses a template source string.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if chars.next_if(|&(_, next)| next == '{').is_some() {
                        literal.push('{');
                        continue;
                    }
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(TemplateError::UnclosedPlaceholder(pos)),
                            other => name.push(other),
                        }
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedPlaceholder(pos));
                    }
                    if name.trim().is_empty() {
                        return Err(TemplateError::EmptyPlaceholder(pos));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name));
                }
                '}' => {
                    if chars.next_if(|&(_, next)| next == '}').is_some() {
                        literal.push('}');
                    } else {
                        return Err(TemplateError::UnopenedPlaceholder(pos));
                    }
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// The names of the variables still unbound, in order of first appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Returns true once every variable has been bound.
    pub fn is_complete(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Binds `name` to `value` in every place it occurs, returning a new template.
    pub fn partial(&self, name: &str, value: &str) -> Result<Self, TemplateError> {
        if !self.variables().contains(&name) {
            return Err(TemplateError::UnknownVariable(name.to_string()));
        }

        let mut segments: Vec<Segment> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let next = match segment {
                Segment::Variable(var) if var == name => Segment::Literal(value.to_string()),
                other => other.clone(),
            };
            // Keep adjacent literals merged so rendering stays a simple concat.
            if let Segment::Literal(text) = &next {
                if let Some(Segment::Literal(prev)) = segments.last_mut() {
                    prev.push_str(text);
                    continue;
                }
            }
            segments.push(next);
        }
        Ok(Self { segments })
    }

    /// Renders the template. Every unbound variable must appear in `values`;
    /// extra values are ignored.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = values
                        .iter()
                        .find(|(key, _)| *key == name.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| TemplateError::MissingVariable(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
