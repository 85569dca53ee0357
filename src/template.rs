/*!
A tiny strict template combinator.

A template is a sequence of segments, each of which is either literal text or
a named value that is required to be present. Rendering fails on the first
absent value, so a document can never contain a stand-in for something that
was missing.

Optional sections are expressed by building them only when their input is
present (see `Template::when`). Absence there is just another branch and is
never an error.
*/

use std::borrow::Cow;

/// A sequence of literal and required value segments.
#[derive(Clone, Debug, Default)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

#[derive(Clone, Debug)]
enum Segment<'a> {
    Literal(Cow<'a, str>),
    Required { placeholder: Cow<'a, str>, value: Option<Cow<'a, str>> },
}

/// The error returned when rendering a template with an absent value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MissingValue {
    pub placeholder: String,
}

impl<'a> Template<'a> {
    pub fn new() -> Template<'a> {
        Template::default()
    }

    /// Appends literal text.
    pub fn lit(mut self, text: impl Into<Cow<'a, str>>) -> Template<'a> {
        self.segments.push(Segment::Literal(text.into()));
        self
    }

    /// Appends a value that must be present when this template is rendered.
    pub fn value<V: Into<Cow<'a, str>>>(
        mut self,
        placeholder: impl Into<Cow<'a, str>>,
        value: Option<V>,
    ) -> Template<'a> {
        self.segments.push(Segment::Required {
            placeholder: placeholder.into(),
            value: value.map(Into::into),
        });
        self
    }

    /// Appends the section built by `build` only when `input` is present.
    pub fn when<T>(
        self,
        input: Option<T>,
        build: impl FnOnce(Template<'a>, T) -> Template<'a>,
    ) -> Template<'a> {
        match input {
            Some(input) => build(self, input),
            None => self,
        }
    }

    /// Appends one section per item, with `separator` between them.
    pub fn join<T>(
        mut self,
        items: impl IntoIterator<Item = T>,
        separator: &'a str,
        mut build: impl FnMut(Template<'a>, T) -> Template<'a>,
    ) -> Template<'a> {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self = self.lit(separator);
            }
            self = build(self, item);
        }
        self
    }

    /// Renders this template, or reports the first absent value.
    pub fn render(&self) -> Result<String, MissingValue> {
        let mut out = String::new();
        for segment in self.segments.iter() {
            match *segment {
                Segment::Literal(ref text) => out.push_str(text),
                Segment::Required { ref value, ref placeholder } => {
                    let Some(value) = value else {
                        return Err(MissingValue {
                            placeholder: placeholder.to_string(),
                        });
                    };
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
